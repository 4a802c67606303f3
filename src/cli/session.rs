use std::io::Write;

use crate::currency::format_usd;
use crate::errors::WizardError;
use crate::offer::OfferSubmission;
use crate::rules::{FinancingMode, RuleConfiguration};
use crate::validation::{ClosingInput, IdentityInput, PricingInput};
use crate::wizard::{Advance, OfferWizard, Step, StepInput};

use super::prompt::Prompter;
use super::render::{self, MessageKind};
use super::CliError;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Submitted(OfferSubmission),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Continue,
    Back,
    Cancel,
}

/// Drives one offer from the first step to submission or cancellation.
pub fn run_session(
    wizard: &mut OfferWizard,
    prompter: &mut dyn Prompter,
    out: &mut dyn Write,
) -> Result<SessionOutcome, CliError> {
    let bounds = wizard.open();
    render::banner(out, wizard.rules(), &bounds)?;

    loop {
        let step = wizard.current_step();
        render::progress(out, step)?;
        let input = collect_step(wizard, step, prompter)?;

        match choose_action(step, prompter)? {
            Action::Continue => match wizard.advance(input) {
                Ok(Advance::Moved(_)) => {}
                Ok(Advance::Submitted(submission)) => {
                    render::submitted(out, &submission)?;
                    return Ok(SessionOutcome::Submitted(submission));
                }
                Err(WizardError::Validation(errors)) => render::validation_errors(out, &errors)?,
                Err(WizardError::Submission(error)) => render::submission_failed(out, &error)?,
            },
            Action::Back => {
                wizard.retreat(step);
            }
            Action::Cancel => {
                wizard.reset();
                render::message(out, MessageKind::Warning, "Offer cancelled")?;
                return Ok(SessionOutcome::Cancelled);
            }
        }
    }
}

fn collect_step(
    wizard: &OfferWizard,
    step: Step,
    prompter: &mut dyn Prompter,
) -> Result<StepInput, CliError> {
    let rules = wizard.rules();
    let input = match step {
        Step::Identity => StepInput::Identity(IdentityInput {
            name: prompter.text("Full name")?,
            email: prompter.text("Email")?,
            phone: prompter.text("Phone")?,
        }),
        Step::Pricing => StepInput::Pricing(collect_pricing(rules, prompter)?),
        Step::Closing => {
            let hint = render::window_hint(&wizard.date_bounds());
            StepInput::Closing(collect_closing(rules, &hint, prompter)?)
        }
    };
    Ok(input)
}

fn collect_pricing(
    rules: &RuleConfiguration,
    prompter: &mut dyn Prompter,
) -> Result<PricingInput, CliError> {
    let offer_price = prompter.text(&format!(
        "Offer price (minimum {})",
        format_usd(rules.minimum_offer_amount)
    ))?;
    let financing = match &rules.financing {
        FinancingMode::Selection { options } => {
            let index = prompter.select("Financing", options)?;
            options.get(index).cloned().unwrap_or_default()
        }
        FinancingMode::Checkbox => String::new(),
    };
    Ok(PricingInput {
        offer_price,
        financing,
    })
}

fn collect_closing(
    rules: &RuleConfiguration,
    window_hint: &str,
    prompter: &mut dyn Prompter,
) -> Result<ClosingInput, CliError> {
    let mut input = ClosingInput {
        closing_date: prompter.text(&format!("Closing date (YYYY-MM-DD, {window_hint})"))?,
        ..ClosingInput::default()
    };

    if rules.financing == FinancingMode::Checkbox {
        input.financing_condition = prompter.confirm("Is this offer contingent on financing?")?;
    }

    if rules.collects_contingencies {
        let options = &rules.contingency_options;
        let picked = prompter.multi_select("Contingencies", options)?;
        input.contingencies = picked
            .into_iter()
            .filter_map(|index| options.get(index).cloned())
            .collect();
    }

    input.additional_comments = prompter.text("Additional comments (optional)")?;

    if rules.requires_acknowledgment {
        input.acknowledgment =
            prompter.confirm("I have read and acknowledge the seller disclosures")?;
    }

    Ok(input)
}

fn choose_action(step: Step, prompter: &mut dyn Prompter) -> Result<Action, CliError> {
    let forward = if step == Step::Closing {
        "Submit offer"
    } else {
        "Continue"
    };
    let mut actions = vec![(forward, Action::Continue)];
    if step.previous().is_some() {
        actions.push(("Back", Action::Back));
    }
    actions.push(("Cancel", Action::Cancel));

    let labels: Vec<String> = actions.iter().map(|(label, _)| label.to_string()).collect();
    let index = prompter.select("Next", &labels)?;
    actions
        .get(index)
        .map(|(_, action)| *action)
        .ok_or_else(|| CliError::Usage(format!("no action at position {index}")))
}
