//! Three-step offer wizard.
//!
//! [`OfferWizard`] owns one session: the current step, the record built so
//! far and the errors surfaced by the last validation of each step. Advancing
//! runs the step's validator and commits every field whose own rule passed;
//! the step only moves when all of them did. Advancing from the closing step
//! finalizes the offer, hands the snapshot to the [`OfferSink`] and resets the
//! session.

mod sink;

use std::fmt;

use serde::Serialize;

use crate::errors::WizardError;
use crate::offer::{OfferRecord, OfferSubmission};
use crate::rules::{DateBounds, RuleConfiguration};
use crate::time::Clock;
use crate::validation::{
    self, ClosingInput, Field, IdentityInput, PricingInput, ValidationErrors,
};

pub use sink::{LogSink, OfferSink};

const IDENTITY_FIELDS: &[Field] = &[Field::BuyerName, Field::BuyerEmail, Field::BuyerPhone];
const PRICING_FIELDS: &[Field] = &[Field::OfferPrice, Field::Financing];
const CLOSING_FIELDS: &[Field] = &[Field::ClosingDate, Field::Acknowledgment];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Identity,
    Pricing,
    Closing,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Identity, Step::Pricing, Step::Closing];

    /// One-based position shown to the buyer.
    pub fn number(self) -> u8 {
        match self {
            Step::Identity => 1,
            Step::Pricing => 2,
            Step::Closing => 3,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Step::Identity),
            2 => Some(Step::Pricing),
            3 => Some(Step::Closing),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Identity => "Buyer information",
            Step::Pricing => "Offer price",
            Step::Closing => "Closing terms",
        }
    }

    fn fields(self) -> &'static [Field] {
        match self {
            Step::Identity => IDENTITY_FIELDS,
            Step::Pricing => PRICING_FIELDS,
            Step::Closing => CLOSING_FIELDS,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.title())
    }
}

/// Raw values for one step. The variant names the step being advanced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepInput {
    Identity(IdentityInput),
    Pricing(PricingInput),
    Closing(ClosingInput),
}

impl StepInput {
    pub fn step(&self) -> Step {
        match self {
            StepInput::Identity(_) => Step::Identity,
            StepInput::Pricing(_) => Step::Pricing,
            StepInput::Closing(_) => Step::Closing,
        }
    }
}

/// Successful result of [`OfferWizard::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// The wizard moved to the given step.
    Moved(Step),
    /// The offer was finalized and emitted; the wizard is back at step 1.
    Submitted(OfferSubmission),
}

pub struct OfferWizard {
    rules: RuleConfiguration,
    clock: Box<dyn Clock>,
    sink: Box<dyn OfferSink>,
    current_step: Step,
    record: OfferRecord,
    errors: ValidationErrors,
}

impl OfferWizard {
    pub fn new(rules: RuleConfiguration, clock: Box<dyn Clock>, sink: Box<dyn OfferSink>) -> Self {
        Self {
            rules,
            clock,
            sink,
            current_step: Step::Identity,
            record: OfferRecord::default(),
            errors: ValidationErrors::new(),
        }
    }

    pub fn rules(&self) -> &RuleConfiguration {
        &self.rules
    }

    pub fn current_step(&self) -> Step {
        self.current_step
    }

    pub fn record(&self) -> &OfferRecord {
        &self.record
    }

    /// Errors surfaced by the most recent validation of each step.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Advisory closing-date bounds as of right now.
    pub fn date_bounds(&self) -> DateBounds {
        self.rules.closing_window.bounds(self.clock.today())
    }

    /// Starts a fresh session and returns the closing-date bounds to display.
    pub fn open(&mut self) -> DateBounds {
        self.reset();
        let bounds = self.date_bounds();
        tracing::debug!(min = %bounds.min, max = ?bounds.max, "offer wizard opened");
        bounds
    }

    pub fn reset(&mut self) {
        self.current_step = Step::Identity;
        self.record = OfferRecord::default();
        self.errors = ValidationErrors::new();
    }

    /// Validates `input` for the step it belongs to and moves forward when
    /// every field passed. Fields that passed are committed either way.
    pub fn advance(&mut self, input: StepInput) -> Result<Advance, WizardError> {
        let from = input.step();
        let errors = match &input {
            StepInput::Identity(values) => self.commit_identity(values),
            StepInput::Pricing(values) => self.commit_pricing(values),
            StepInput::Closing(values) => self.commit_closing(values),
        };

        self.errors.clear_fields(from.fields());
        if !errors.is_empty() {
            self.errors.merge(&errors);
            let failed: Vec<&str> = errors.fields().map(Field::as_str).collect();
            tracing::warn!(step = from.number(), fields = ?failed, "step validation failed");
            return Err(WizardError::Validation(errors));
        }

        match from.next() {
            Some(next) => {
                self.current_step = next;
                tracing::debug!(from = from.number(), to = next.number(), "advanced");
                Ok(Advance::Moved(next))
            }
            None => self.finalize().map(Advance::Submitted),
        }
    }

    /// Steps back from `from` without validating. A no-op on the first step.
    pub fn retreat(&mut self, from: Step) -> Step {
        if let Some(previous) = from.previous() {
            self.current_step = previous;
            tracing::debug!(from = from.number(), to = previous.number(), "retreated");
        }
        self.current_step
    }

    fn finalize(&mut self) -> Result<OfferSubmission, WizardError> {
        let submission = OfferSubmission::new(self.record.clone(), self.clock.now());
        self.sink.submit(&submission)?;
        tracing::info!(submission_id = %submission.id(), "offer finalized");
        self.reset();
        Ok(submission)
    }

    fn commit_identity(&mut self, input: &IdentityInput) -> ValidationErrors {
        let outcome = validation::validate_identity(input);
        let accepted = outcome.accepted;
        if let Some(name) = accepted.name {
            self.record.buyer_name = name;
        }
        if let Some(email) = accepted.email {
            self.record.buyer_email = email;
        }
        if let Some(phone) = accepted.phone {
            self.record.buyer_phone = phone;
        }
        outcome.errors
    }

    fn commit_pricing(&mut self, input: &PricingInput) -> ValidationErrors {
        let outcome = validation::validate_pricing(input, &self.rules);
        let accepted = outcome.accepted;
        if let Some(price) = accepted.offer_price {
            self.record.offer_price = Some(price);
        }
        if let Some(financing) = accepted.financing {
            self.record.financing = financing;
        }
        outcome.errors
    }

    fn commit_closing(&mut self, input: &ClosingInput) -> ValidationErrors {
        let today = self.clock.today();
        let outcome = validation::validate_closing(input, &self.rules, today);
        let accepted = outcome.accepted;
        if let Some(date) = accepted.closing_date {
            self.record.closing_date = Some(date);
        }
        if let Some(financing) = accepted.financing {
            self.record.financing = financing;
        }
        if let Some(acknowledgment) = accepted.acknowledgment {
            self.record.acknowledgment = acknowledgment;
        }
        if let Some(tags) = accepted.contingencies {
            self.record.contingencies = tags;
        }
        if let Some(comments) = accepted.additional_comments {
            self.record.additional_comments = comments;
        }
        outcome.errors
    }
}

impl fmt::Debug for OfferWizard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OfferWizard")
            .field("rules", &self.rules)
            .field("current_step", &self.current_step)
            .field("record", &self.record)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}
