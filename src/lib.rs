#![doc(test(attr(deny(warnings))))]

//! Offer Wizard guides a buyer through a three-step real-estate purchase
//! offer and only lets it through once it satisfies the seller's acceptance
//! rules: a minimum price, a closing-date window and, for some listings, a
//! disclosure acknowledgment.
//!
//! The core is [`wizard::OfferWizard`], driven by pure validators in
//! [`validation`] and configured by [`rules::RuleConfiguration`]. The [`cli`]
//! module is a thin terminal front end over the same controller.

pub mod cli;
pub mod config;
pub mod currency;
pub mod errors;
pub mod offer;
pub mod rules;
pub mod time;
pub mod utils;
pub mod validation;
pub mod wizard;

use std::sync::Once;

pub use errors::{SubmitError, WizardError};
pub use offer::{Financing, OfferRecord, OfferSubmission};
pub use rules::{ClosingWindow, DateBounds, FinancingMode, RuleConfiguration};
pub use time::{Clock, FixedClock, SystemClock};
pub use validation::{ClosingInput, Field, IdentityInput, PricingInput, ValidationErrors};
pub use wizard::{Advance, LogSink, OfferSink, OfferWizard, Step, StepInput};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing once.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("offer wizard tracing initialized");
    });
}
