use std::io::{self, Write};

use colored::Colorize;

use crate::currency::format_usd;
use crate::errors::SubmitError;
use crate::offer::{Financing, OfferSubmission};
use crate::rules::{DateBounds, RuleConfiguration};
use crate::validation::ValidationErrors;
use crate::wizard::Step;

/// Message categories used by the session output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

pub fn message(out: &mut dyn Write, kind: MessageKind, text: &str) -> io::Result<()> {
    let line = match kind {
        MessageKind::Info => format!("[i] {text}").normal(),
        MessageKind::Success => format!("[✓] {text}").green().bold(),
        MessageKind::Warning => format!("[!] {text}").yellow(),
        MessageKind::Error => format!("[x] {text}").red(),
        MessageKind::Section => format!("=== {} ===", text.trim()).cyan().bold(),
    };
    writeln!(out, "{line}")
}

/// Seller terms shown when the wizard opens.
pub fn banner(out: &mut dyn Write, rules: &RuleConfiguration, bounds: &DateBounds) -> io::Result<()> {
    message(out, MessageKind::Section, "Submit an offer")?;
    message(
        out,
        MessageKind::Info,
        &format!(
            "Minimum offer: {}",
            format_usd(rules.minimum_offer_amount)
        ),
    )?;
    message(
        out,
        MessageKind::Info,
        &format!("Closing date: {}", window_hint(bounds)),
    )?;
    if let Some(deposit) = rules.deposit_amount {
        message(
            out,
            MessageKind::Info,
            &format!("Earnest money deposit: {}", format_usd(deposit)),
        )?;
    }
    Ok(())
}

/// `2025-04-01 to 2025-05-01` or `on or after 2025-01-31`.
pub fn window_hint(bounds: &DateBounds) -> String {
    match bounds.max_iso() {
        Some(max) => format!("{} to {}", bounds.min_iso(), max),
        None => format!("on or after {}", bounds.min_iso()),
    }
}

/// Progress line: finished steps are ticked, the current one highlighted.
pub fn progress(out: &mut dyn Write, current: Step) -> io::Result<()> {
    let parts: Vec<String> = Step::ALL
        .iter()
        .map(|step| {
            if *step < current {
                format!("[✓] {}", step.title()).green().to_string()
            } else if *step == current {
                format!("[{}] {}", step.number(), step.title())
                    .bold()
                    .to_string()
            } else {
                format!("[{}] {}", step.number(), step.title())
                    .dimmed()
                    .to_string()
            }
        })
        .collect();
    writeln!(out)?;
    writeln!(out, "{}", parts.join("  "))
}

pub fn validation_errors(out: &mut dyn Write, errors: &ValidationErrors) -> io::Result<()> {
    for (_, text) in errors.iter() {
        message(out, MessageKind::Error, text)?;
    }
    Ok(())
}

pub fn submission_failed(out: &mut dyn Write, error: &SubmitError) -> io::Result<()> {
    message(
        out,
        MessageKind::Warning,
        &format!("Your offer could not be sent ({error}). Please try again."),
    )
}

pub fn submitted(out: &mut dyn Write, submission: &OfferSubmission) -> io::Result<()> {
    let record = submission.record();
    message(out, MessageKind::Success, "Offer submitted")?;
    writeln!(out, "  Reference:  {}", submission.id())?;
    writeln!(out, "  Buyer:      {} <{}>", record.buyer_name, record.buyer_email)?;
    if let Some(price) = record.offer_price {
        writeln!(out, "  Offer:      {}", format_usd(price))?;
    }
    if let Some(date) = record.closing_date {
        writeln!(out, "  Closing:    {date}")?;
    }
    match &record.financing {
        Financing::Condition(true) => writeln!(out, "  Financing:  contingent on financing")?,
        Financing::Choice(choice) => writeln!(out, "  Financing:  {choice}")?,
        Financing::Condition(false) | Financing::None => {}
    }
    if !record.contingencies.is_empty() {
        let tags: Vec<&str> = record.contingencies.iter().map(String::as_str).collect();
        writeln!(out, "  Contingent: {}", tags.join(", "))?;
    }
    Ok(())
}
