//! Seller-defined acceptance rules.
//!
//! A [`RuleConfiguration`] is plain data. Both deployment shapes (a bounded
//! closing window with a mandatory acknowledgment, and an open-ended floor with
//! contingency tags) are expressed by the same struct through optional fields.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Longest closing window a rules file may ask for (about a century).
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// Closing-date window measured in whole days from "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingWindow {
    pub min_days: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_days: Option<i64>,
}

impl ClosingWindow {
    pub fn bounded(min_days: i64, max_days: i64) -> Self {
        Self {
            min_days,
            max_days: Some(max_days),
        }
    }

    pub fn at_least(min_days: i64) -> Self {
        Self {
            min_days,
            max_days: None,
        }
    }

    /// Earliest and latest acceptable dates relative to `today`.
    pub fn bounds(&self, today: NaiveDate) -> DateBounds {
        DateBounds {
            min: shift(today, self.min_days),
            max: self.max_days.map(|days| shift(today, days)),
        }
    }

    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let offset = (date - today).num_days();
        offset >= self.min_days && self.max_days.map_or(true, |max| offset <= max)
    }

    /// Message shown when a closing date falls outside the window.
    pub fn violation_message(&self) -> String {
        match self.max_days {
            Some(max) => format!(
                "Closing date must be between {} and {} days from today.",
                self.min_days, max
            ),
            None => format!(
                "Closing date must be at least {} days from today.",
                self.min_days
            ),
        }
    }
}

/// `today` moved by `days`, clamped to the representable calendar.
fn shift(today: NaiveDate, days: i64) -> NaiveDate {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        today.checked_add_days(magnitude).unwrap_or(NaiveDate::MAX)
    } else {
        today.checked_sub_days(magnitude).unwrap_or(NaiveDate::MIN)
    }
}

/// Advisory date constraints for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateBounds {
    pub min: NaiveDate,
    pub max: Option<NaiveDate>,
}

impl DateBounds {
    pub fn min_iso(&self) -> String {
        self.min.format("%Y-%m-%d").to_string()
    }

    pub fn max_iso(&self) -> Option<String> {
        self.max.map(|date| date.format("%Y-%m-%d").to_string())
    }
}

/// How the financing condition is collected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FinancingMode {
    /// A plain "offer is contingent on financing" checkbox captured with the
    /// closing terms, never validated.
    #[default]
    Checkbox,
    /// A required choice collected alongside the offer price.
    Selection { options: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfiguration {
    pub minimum_offer_amount: f64,
    pub closing_window: ClosingWindow,
    #[serde(default)]
    pub requires_acknowledgment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_amount: Option<f64>,
    #[serde(default)]
    pub financing: FinancingMode,
    #[serde(default)]
    pub collects_contingencies: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contingency_options: Vec<String>,
}

impl Default for RuleConfiguration {
    fn default() -> Self {
        Self::pilot()
    }
}

impl RuleConfiguration {
    /// Rules of the pilot listing: bounded window, disclosure acknowledgment.
    pub fn pilot() -> Self {
        Self {
            minimum_offer_amount: 255_000.0,
            closing_window: ClosingWindow::bounded(90, 120),
            requires_acknowledgment: true,
            deposit_amount: Some(2_500.0),
            financing: FinancingMode::Checkbox,
            collects_contingencies: false,
            contingency_options: Vec::new(),
        }
    }

    /// Rules with an open-ended closing floor, a financing choice and
    /// contingency tags.
    pub fn open_floor() -> Self {
        Self {
            minimum_offer_amount: 255_000.0,
            closing_window: ClosingWindow::at_least(30),
            requires_acknowledgment: false,
            deposit_amount: None,
            financing: FinancingMode::Selection {
                options: vec![
                    "Cash".into(),
                    "Conventional loan".into(),
                    "FHA loan".into(),
                    "VA loan".into(),
                ],
            },
            collects_contingencies: true,
            contingency_options: vec![
                "inspection".into(),
                "appraisal".into(),
                "financing".into(),
                "home-sale".into(),
            ],
        }
    }

    pub fn financing_options(&self) -> &[String] {
        match &self.financing {
            FinancingMode::Selection { options } => options,
            FinancingMode::Checkbox => &[],
        }
    }

    /// Rejects rule sets no buyer could ever satisfy or that would make the
    /// checks meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.minimum_offer_amount.is_finite() || self.minimum_offer_amount < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "minimum offer amount must be a non-negative number (got {})",
                self.minimum_offer_amount
            )));
        }
        if let Some(deposit) = self.deposit_amount {
            if !deposit.is_finite() || deposit < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "deposit amount must be a non-negative number (got {deposit})"
                )));
            }
        }
        let window = self.closing_window;
        if window.min_days < 0 {
            return Err(ConfigError::Invalid(format!(
                "closing window cannot start in the past (min_days = {})",
                window.min_days
            )));
        }
        let furthest = window.max_days.map_or(window.min_days, |max| max.max(window.min_days));
        if furthest > MAX_WINDOW_DAYS {
            return Err(ConfigError::Invalid(format!(
                "closing window cannot reach beyond {MAX_WINDOW_DAYS} days (got {furthest})"
            )));
        }
        if let Some(max) = window.max_days {
            if max < window.min_days {
                return Err(ConfigError::Invalid(format!(
                    "closing window max_days ({max}) is below min_days ({})",
                    window.min_days
                )));
            }
        }
        if let FinancingMode::Selection { options } = &self.financing {
            if options.iter().all(|option| option.trim().is_empty()) {
                return Err(ConfigError::Invalid(
                    "financing selection needs at least one option".into(),
                ));
            }
        }
        Ok(())
    }
}
