use std::env;
use std::process::ExitCode;

use colored::Colorize;
use offer_wizard::cli;

fn main() -> ExitCode {
    offer_wizard::init();

    let result = cli::parse_args(env::args().skip(1)).and_then(cli::run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(cli::CliError::Usage(message)) => {
            eprintln!("{}", format!("error: {message}").red());
            eprintln!("{}", cli::USAGE);
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("{}", format!("error: {err}").red());
            ExitCode::FAILURE
        }
    }
}
