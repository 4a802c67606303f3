#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use offer_wizard::{
    Clock, ClosingInput, IdentityInput, OfferSink, OfferSubmission, OfferWizard, PricingInput,
    RuleConfiguration, SubmitError,
};

/// Day zero for every scenario.
pub fn day0() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date")
}

pub fn day(offset: i64) -> NaiveDate {
    day0() + Duration::days(offset)
}

/// Clock whose date tests can move while a wizard holds it.
#[derive(Clone)]
pub struct ShiftClock {
    today: Arc<Mutex<NaiveDate>>,
}

impl ShiftClock {
    pub fn at(date: NaiveDate) -> Self {
        Self {
            today: Arc::new(Mutex::new(date)),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        *self.today.lock().expect("clock lock") = date;
    }
}

impl Clock for ShiftClock {
    fn now(&self) -> DateTime<Utc> {
        self.today().and_time(NaiveTime::MIN).and_utc()
    }

    fn today(&self) -> NaiveDate {
        *self.today.lock().expect("clock lock")
    }
}

/// Sink that keeps every submission it receives.
#[derive(Clone, Default)]
pub struct RecordingSink {
    submissions: Arc<Mutex<Vec<OfferSubmission>>>,
}

impl RecordingSink {
    pub fn submissions(&self) -> Vec<OfferSubmission> {
        self.submissions.lock().expect("sink lock").clone()
    }
}

impl OfferSink for RecordingSink {
    fn submit(&mut self, submission: &OfferSubmission) -> Result<(), SubmitError> {
        self.submissions
            .lock()
            .expect("sink lock")
            .push(submission.clone());
        Ok(())
    }
}

/// Sink that refuses a fixed number of submissions before accepting.
#[derive(Clone, Default)]
pub struct FlakySink {
    pub failures_left: Arc<Mutex<u32>>,
    pub inner: RecordingSink,
}

impl FlakySink {
    pub fn failing(times: u32) -> Self {
        Self {
            failures_left: Arc::new(Mutex::new(times)),
            inner: RecordingSink::default(),
        }
    }
}

impl OfferSink for FlakySink {
    fn submit(&mut self, submission: &OfferSubmission) -> Result<(), SubmitError> {
        let mut left = self.failures_left.lock().expect("sink lock");
        if *left > 0 {
            *left -= 1;
            return Err(SubmitError::Rejected("listing service unavailable".into()));
        }
        drop(left);
        self.inner.submit(submission)
    }
}

pub struct Harness {
    pub wizard: OfferWizard,
    pub clock: ShiftClock,
    pub sink: RecordingSink,
}

pub fn harness(rules: RuleConfiguration) -> Harness {
    let clock = ShiftClock::at(day0());
    let sink = RecordingSink::default();
    let wizard = OfferWizard::new(rules, Box::new(clock.clone()), Box::new(sink.clone()));
    Harness {
        wizard,
        clock,
        sink,
    }
}

pub fn valid_identity() -> IdentityInput {
    IdentityInput {
        name: "Dana Whitfield".into(),
        email: "dana.whitfield@example.com".into(),
        phone: "(555) 123-4567".into(),
    }
}

pub fn valid_pricing() -> PricingInput {
    PricingInput {
        offer_price: "260000".into(),
        financing: String::new(),
    }
}

pub fn valid_closing() -> ClosingInput {
    ClosingInput {
        closing_date: day(95).to_string(),
        financing_condition: true,
        acknowledgment: true,
        contingencies: Vec::new(),
        additional_comments: "Would like a final walkthrough.".into(),
    }
}
