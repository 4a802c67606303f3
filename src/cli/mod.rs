//! Terminal front end for the offer wizard.
//!
//! Everything here is presentation: prompts go through [`Prompter`], output
//! goes to any [`std::io::Write`], and all decisions are left to
//! [`OfferWizard`].

pub mod prompt;
pub mod render;
pub mod session;

use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::config::{ConfigError, RulesManager};
use crate::errors::WizardError;
use crate::rules::RuleConfiguration;
use crate::time::{Clock, FixedClock, SystemClock};
use crate::utils::build_info;
use crate::wizard::{LogSink, OfferWizard};

pub use prompt::{Answer, DialoguerPrompter, Prompter, ScriptedPrompter};
pub use session::{run_session, SessionOutcome};

pub const USAGE: &str = "\
Usage: offer_wizard_cli [OPTIONS]

Options:
  --rules <PATH>       Seller rules file (JSON). Defaults to the user config directory.
  --preset <NAME>      Built-in rules when no rules file exists: pilot | open-floor
  --today <YYYY-MM-DD> Pretend today is the given date
  --version            Print build information
  --help               Print this help";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error("{0}")]
    Usage(String),
    #[error("Script error: {0}")]
    Script(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    #[default]
    Pilot,
    OpenFloor,
}

impl Preset {
    fn parse(value: &str) -> Result<Self, CliError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pilot" => Ok(Preset::Pilot),
            "open-floor" | "open_floor" => Ok(Preset::OpenFloor),
            other => Err(CliError::Usage(format!("unknown preset `{other}`"))),
        }
    }

    pub fn rules(self) -> RuleConfiguration {
        match self {
            Preset::Pilot => RuleConfiguration::pilot(),
            Preset::OpenFloor => RuleConfiguration::open_floor(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Run,
    Version,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub command: CliCommand,
    pub rules_path: Option<PathBuf>,
    pub preset: Option<Preset>,
    pub today: Option<NaiveDate>,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            command: CliCommand::Run,
            rules_path: None,
            preset: None,
            today: None,
        }
    }
}

impl CliOptions {
    /// Rules from the explicit file, else the preset, else the default file.
    pub fn load_rules(&self) -> Result<RuleConfiguration, CliError> {
        if let Some(path) = &self.rules_path {
            return Ok(RulesManager::new(path.clone()).load()?);
        }
        if let Some(preset) = self.preset {
            return Ok(preset.rules());
        }
        Ok(RulesManager::from_default_location().load()?)
    }

    pub fn clock(&self) -> Box<dyn Clock> {
        match self.today {
            Some(date) => Box::new(FixedClock::on(date)),
            None => Box::new(SystemClock),
        }
    }
}

pub fn parse_args<I>(args: I) -> Result<CliOptions, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut options = CliOptions::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => options.command = CliCommand::Help,
            "--version" | "-V" => options.command = CliCommand::Version,
            "--rules" => options.rules_path = Some(PathBuf::from(value_for(&arg, args.next())?)),
            "--preset" => options.preset = Some(Preset::parse(&value_for(&arg, args.next())?)?),
            "--today" => {
                let raw = value_for(&arg, args.next())?;
                let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                    CliError::Usage(format!("--today expects YYYY-MM-DD, got `{raw}`"))
                })?;
                options.today = Some(date);
            }
            other => return Err(CliError::Usage(format!("unexpected argument `{other}`"))),
        }
    }
    Ok(options)
}

fn value_for(flag: &str, value: Option<String>) -> Result<String, CliError> {
    value.ok_or_else(|| CliError::Usage(format!("{flag} requires a value")))
}

/// Entry point used by the binary.
pub fn run(options: CliOptions) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    match options.command {
        CliCommand::Help => {
            println!("{USAGE}");
            Ok(())
        }
        CliCommand::Version => {
            println!("{}", build_info::current().summary());
            Ok(())
        }
        CliCommand::Run => {
            let rules = options.load_rules()?;
            let mut wizard = OfferWizard::new(rules, options.clock(), Box::new(LogSink));
            let mut prompter = DialoguerPrompter::new();
            run_session(&mut wizard, &mut prompter, &mut stdout)?;
            Ok(())
        }
    }
}
