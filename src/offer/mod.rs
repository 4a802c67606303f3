//! The offer record accumulated across wizard steps and the snapshot emitted
//! on submission.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Financing condition as collected by the active rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Financing {
    #[default]
    None,
    /// Checkbox: the offer is contingent on financing.
    Condition(bool),
    /// Named financing option picked from the seller's list.
    Choice(String),
}

/// Buyer data committed step by step. Every field holds its default until the
/// rule that guards it has passed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRecord {
    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_phone: String,
    pub offer_price: Option<f64>,
    pub financing: Financing,
    pub closing_date: Option<NaiveDate>,
    pub contingencies: BTreeSet<String>,
    pub additional_comments: String,
    pub acknowledgment: bool,
}

impl OfferRecord {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Immutable snapshot handed to the submission collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferSubmission {
    id: Uuid,
    submitted_at: DateTime<Utc>,
    record: OfferRecord,
}

impl OfferSubmission {
    pub(crate) fn new(record: OfferRecord, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            submitted_at,
            record,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn record(&self) -> &OfferRecord {
        &self.record
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
