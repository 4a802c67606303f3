//! Pure step validators.
//!
//! Each validator takes the raw values a presentation layer collected, the
//! seller rules and (for closing terms) today's date. It reports every field
//! that passed its own rule together with the errors of the fields that did
//! not, so the controller can commit field by field.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::currency::format_usd;
use crate::offer::Financing;
use crate::rules::{FinancingMode, RuleConfiguration};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

const MIN_PHONE_DIGITS: usize = 10;

pub const NAME_REQUIRED: &str = "Please enter your full name.";
pub const EMAIL_INVALID: &str = "Please enter a valid email address.";
pub const PHONE_INVALID: &str = "Please enter a valid phone number with at least 10 digits.";
pub const FINANCING_REQUIRED: &str = "Please select a financing option.";
pub const DATE_REQUIRED: &str = "Please select a closing date.";
pub const DATE_MALFORMED: &str = "Please enter the closing date as YYYY-MM-DD.";
pub const ACKNOWLEDGMENT_REQUIRED: &str =
    "Please acknowledge the seller disclosures before submitting.";

/// Form fields that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    BuyerName,
    BuyerEmail,
    BuyerPhone,
    OfferPrice,
    Financing,
    ClosingDate,
    Acknowledgment,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::BuyerName => "buyerName",
            Field::BuyerEmail => "buyerEmail",
            Field::BuyerPhone => "buyerPhone",
            Field::OfferPrice => "offerPrice",
            Field::Financing => "financing",
            Field::ClosingDate => "closingDate",
            Field::Acknowledgment => "acknowledgment",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-to-message pairs produced by a failed step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<Field, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.fields.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.fields
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.keys().copied()
    }

    pub(crate) fn clear_fields(&mut self, fields: &[Field]) {
        for field in fields {
            self.fields.remove(field);
        }
    }

    pub(crate) fn merge(&mut self, other: &ValidationErrors) {
        for (field, message) in other.iter() {
            self.add(field, message);
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Outcome of one validator: the values that passed plus the failures.
#[derive(Debug, Clone, PartialEq)]
pub struct StepValidation<T> {
    pub accepted: T,
    pub errors: ValidationErrors,
}

impl<T> StepValidation<T> {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityInput {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricingInput {
    pub offer_price: String,
    /// Only read when the rules ask for a financing selection.
    pub financing: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingFields {
    pub offer_price: Option<f64>,
    pub financing: Option<Financing>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClosingInput {
    pub closing_date: String,
    /// Financing checkbox, only read in checkbox mode.
    pub financing_condition: bool,
    pub acknowledgment: bool,
    pub contingencies: Vec<String>,
    pub additional_comments: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClosingFields {
    pub closing_date: Option<NaiveDate>,
    pub financing: Option<Financing>,
    pub acknowledgment: Option<bool>,
    pub contingencies: Option<BTreeSet<String>>,
    pub additional_comments: Option<String>,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn phone_digit_count(phone: &str) -> usize {
    phone.chars().filter(char::is_ascii_digit).count()
}

/// Message used whenever the offer price is missing, malformed or too low.
pub fn price_message(rules: &RuleConfiguration) -> String {
    format!(
        "Offer price must be at least {}.",
        format_usd(rules.minimum_offer_amount)
    )
}

/// Step 1: name, email and phone are checked independently.
pub fn validate_identity(input: &IdentityInput) -> StepValidation<IdentityFields> {
    let mut accepted = IdentityFields::default();
    let mut errors = ValidationErrors::new();

    let name = input.name.trim();
    if name.is_empty() {
        errors.add(Field::BuyerName, NAME_REQUIRED);
    } else {
        accepted.name = Some(name.to_string());
    }

    let email = input.email.trim();
    if is_valid_email(email) {
        accepted.email = Some(email.to_string());
    } else {
        errors.add(Field::BuyerEmail, EMAIL_INVALID);
    }

    let phone = input.phone.trim();
    if phone_digit_count(phone) >= MIN_PHONE_DIGITS {
        accepted.phone = Some(phone.to_string());
    } else {
        errors.add(Field::BuyerPhone, PHONE_INVALID);
    }

    StepValidation { accepted, errors }
}

/// Step 2: offer price against the seller minimum, plus the financing choice
/// when the rules collect one here.
pub fn validate_pricing(
    input: &PricingInput,
    rules: &RuleConfiguration,
) -> StepValidation<PricingFields> {
    let mut accepted = PricingFields::default();
    let mut errors = ValidationErrors::new();

    match parse_price(&input.offer_price) {
        Some(price) if price >= rules.minimum_offer_amount => accepted.offer_price = Some(price),
        _ => errors.add(Field::OfferPrice, price_message(rules)),
    }

    if let FinancingMode::Selection { .. } = rules.financing {
        let choice = input.financing.trim();
        if choice.is_empty() {
            errors.add(Field::Financing, FINANCING_REQUIRED);
        } else {
            accepted.financing = Some(Financing::Choice(choice.to_string()));
        }
    }

    StepValidation { accepted, errors }
}

/// Step 3: closing date inside the window measured from `today`, plus the
/// acknowledgment when required. Comments, contingency tags and the financing
/// checkbox are captured as given.
pub fn validate_closing(
    input: &ClosingInput,
    rules: &RuleConfiguration,
    today: NaiveDate,
) -> StepValidation<ClosingFields> {
    let mut accepted = ClosingFields::default();
    let mut errors = ValidationErrors::new();

    let raw_date = input.closing_date.trim();
    if raw_date.is_empty() {
        errors.add(Field::ClosingDate, DATE_REQUIRED);
    } else {
        match NaiveDate::parse_from_str(raw_date, "%Y-%m-%d") {
            Ok(date) if rules.closing_window.contains(date, today) => {
                accepted.closing_date = Some(date)
            }
            Ok(_) => errors.add(
                Field::ClosingDate,
                rules.closing_window.violation_message(),
            ),
            Err(_) => errors.add(Field::ClosingDate, DATE_MALFORMED),
        }
    }

    if rules.requires_acknowledgment {
        if input.acknowledgment {
            accepted.acknowledgment = Some(true);
        } else {
            errors.add(Field::Acknowledgment, ACKNOWLEDGMENT_REQUIRED);
        }
    }

    if rules.financing == FinancingMode::Checkbox {
        accepted.financing = Some(Financing::Condition(input.financing_condition));
    }

    if rules.collects_contingencies {
        accepted.contingencies = Some(
            input
                .contingencies
                .iter()
                .map(|tag| tag.trim())
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
        );
    }

    accepted.additional_comments = Some(input.additional_comments.trim().to_string());

    StepValidation { accepted, errors }
}

fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|ch| *ch != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
}
