mod common;

use std::collections::BTreeSet;

use common::{day, harness, valid_closing, valid_identity, valid_pricing, FlakySink, ShiftClock};
use offer_wizard::{
    validation, Advance, ClosingInput, Field, Financing, IdentityInput, OfferRecord, OfferWizard,
    PricingInput, RuleConfiguration, Step, StepInput, WizardError,
};

fn expect_errors(result: Result<Advance, WizardError>) -> offer_wizard::ValidationErrors {
    match result {
        Err(WizardError::Validation(errors)) => errors,
        other => panic!("expected validation failure, got {other:?}"),
    }
}

fn advance_to_closing(wizard: &mut OfferWizard) {
    wizard
        .advance(StepInput::Identity(valid_identity()))
        .expect("identity step");
    wizard
        .advance(StepInput::Pricing(valid_pricing()))
        .expect("pricing step");
    assert_eq!(wizard.current_step(), Step::Closing);
}

#[test]
fn identity_step_succeeds_only_with_all_three_fields() {
    let mut h = harness(RuleConfiguration::pilot());

    let cases = [
        ("", "dana@example.com", "5551234567", Some(Field::BuyerName)),
        ("Dana", "dana@example", "5551234567", Some(Field::BuyerEmail)),
        ("Dana", "dana@example.com", "555-123-456", Some(Field::BuyerPhone)),
        ("Dana", "dana@example.com", "+1 (555) 123-4567", None),
    ];

    for (name, email, phone, failing) in cases {
        h.wizard.reset();
        let result = h.wizard.advance(StepInput::Identity(IdentityInput {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }));
        match failing {
            Some(field) => {
                let errors = expect_errors(result);
                assert_eq!(errors.fields().collect::<Vec<_>>(), vec![field]);
                assert_eq!(h.wizard.current_step(), Step::Identity);
            }
            None => {
                assert_eq!(result.expect("valid identity"), Advance::Moved(Step::Pricing));
                assert_eq!(h.wizard.current_step(), Step::Pricing);
            }
        }
    }
}

#[test]
fn pricing_below_minimum_is_rejected_and_not_committed() {
    let mut h = harness(RuleConfiguration::pilot());
    h.wizard
        .advance(StepInput::Identity(valid_identity()))
        .expect("identity step");

    let errors = expect_errors(h.wizard.advance(StepInput::Pricing(PricingInput {
        offer_price: "254999".into(),
        financing: String::new(),
    })));

    assert_eq!(
        errors.get(Field::OfferPrice),
        Some("Offer price must be at least $255,000.")
    );
    assert_eq!(h.wizard.record().offer_price, None);
    assert_eq!(h.wizard.current_step(), Step::Pricing);
}

#[test]
fn pricing_requires_financing_choice_under_selection_rules() {
    let mut h = harness(RuleConfiguration::open_floor());
    h.wizard
        .advance(StepInput::Identity(valid_identity()))
        .expect("identity step");

    let errors = expect_errors(h.wizard.advance(StepInput::Pricing(PricingInput {
        offer_price: "300000".into(),
        financing: String::new(),
    })));
    assert_eq!(
        errors.get(Field::Financing),
        Some(validation::FINANCING_REQUIRED)
    );
    assert_eq!(h.wizard.record().offer_price, Some(300_000.0));

    let moved = h
        .wizard
        .advance(StepInput::Pricing(PricingInput {
            offer_price: "300000".into(),
            financing: "Conventional loan".into(),
        }))
        .expect("pricing step");
    assert_eq!(moved, Advance::Moved(Step::Closing));
    assert_eq!(
        h.wizard.record().financing,
        Financing::Choice("Conventional loan".into())
    );
}

#[test]
fn bounded_window_accepts_day_95() {
    let mut h = harness(RuleConfiguration::pilot());
    advance_to_closing(&mut h.wizard);

    let outcome = h
        .wizard
        .advance(StepInput::Closing(valid_closing()))
        .expect("closing step");
    assert!(matches!(outcome, Advance::Submitted(_)));
}

#[test]
fn bounded_window_rejects_dates_outside_range() {
    let mut h = harness(RuleConfiguration::pilot());
    advance_to_closing(&mut h.wizard);

    for offset in [89, 121] {
        let errors = expect_errors(h.wizard.advance(StepInput::Closing(ClosingInput {
            closing_date: day(offset).to_string(),
            ..valid_closing()
        })));
        assert_eq!(
            errors.get(Field::ClosingDate),
            Some("Closing date must be between 90 and 120 days from today.")
        );
        assert_eq!(h.wizard.current_step(), Step::Closing);
    }
    assert!(h.sink.submissions().is_empty());
}

#[test]
fn floor_window_rejects_day_29() {
    let mut h = harness(RuleConfiguration::open_floor());
    h.wizard
        .advance(StepInput::Identity(valid_identity()))
        .expect("identity step");
    h.wizard
        .advance(StepInput::Pricing(PricingInput {
            offer_price: "255000".into(),
            financing: "Cash".into(),
        }))
        .expect("pricing step");

    let errors = expect_errors(h.wizard.advance(StepInput::Closing(ClosingInput {
        closing_date: day(29).to_string(),
        ..ClosingInput::default()
    })));
    let message = errors.get(Field::ClosingDate).expect("closing date error");
    assert!(message.contains("at least 30 days"));
    assert_eq!(message, "Closing date must be at least 30 days from today.");
}

#[test]
fn missing_acknowledgment_blocks_submission() {
    let mut h = harness(RuleConfiguration::pilot());
    advance_to_closing(&mut h.wizard);

    let errors = expect_errors(h.wizard.advance(StepInput::Closing(ClosingInput {
        acknowledgment: false,
        ..valid_closing()
    })));
    assert_eq!(
        errors.fields().collect::<Vec<_>>(),
        vec![Field::Acknowledgment]
    );
    assert!(!h.wizard.record().acknowledgment);
    assert!(h.sink.submissions().is_empty());
}

#[test]
fn today_is_read_when_the_step_is_validated() {
    let mut h = harness(RuleConfiguration::pilot());
    let opened = h.wizard.open();
    assert_eq!(opened.min, day(90));
    advance_to_closing(&mut h.wizard);

    // Ten days pass between opening the form and submitting it.
    h.clock.set(day(10));
    let errors = expect_errors(h.wizard.advance(StepInput::Closing(valid_closing())));
    assert!(errors.contains(Field::ClosingDate));
    assert_eq!(h.wizard.date_bounds().min, day(100));

    let outcome = h.wizard.advance(StepInput::Closing(ClosingInput {
        closing_date: day(105).to_string(),
        ..valid_closing()
    }));
    assert!(matches!(outcome, Ok(Advance::Submitted(_))));
}

#[test]
fn retreat_from_first_step_is_a_no_op() {
    let mut h = harness(RuleConfiguration::pilot());
    assert_eq!(h.wizard.retreat(Step::Identity), Step::Identity);
    assert_eq!(h.wizard.current_step(), Step::Identity);
}

#[test]
fn retreat_steps_back_without_touching_the_record() {
    let mut h = harness(RuleConfiguration::pilot());
    advance_to_closing(&mut h.wizard);
    let before = h.wizard.record().clone();

    assert_eq!(h.wizard.retreat(Step::Closing), Step::Pricing);
    assert_eq!(h.wizard.record(), &before);
    assert_eq!(h.wizard.retreat(Step::Pricing), Step::Identity);
    assert_eq!(h.wizard.record(), &before);
}

#[test]
fn reset_and_open_restore_defaults() {
    let mut h = harness(RuleConfiguration::pilot());
    advance_to_closing(&mut h.wizard);
    let _ = h.wizard.advance(StepInput::Closing(ClosingInput::default()));
    assert!(!h.wizard.errors().is_empty());

    h.wizard.reset();
    assert_eq!(h.wizard.current_step(), Step::Identity);
    assert_eq!(h.wizard.record(), &OfferRecord::default());
    assert!(h.wizard.errors().is_empty());

    advance_to_closing(&mut h.wizard);
    h.wizard.open();
    assert_eq!(h.wizard.current_step(), Step::Identity);
    assert!(h.wizard.record().is_empty());
}

#[test]
fn advancing_twice_with_same_input_is_idempotent() {
    let mut h = harness(RuleConfiguration::pilot());

    let first = h
        .wizard
        .advance(StepInput::Identity(valid_identity()))
        .expect("first advance");
    let record_after_first = h.wizard.record().clone();
    let second = h
        .wizard
        .advance(StepInput::Identity(valid_identity()))
        .expect("second advance");

    assert_eq!(first, second);
    assert_eq!(h.wizard.record(), &record_after_first);
    assert_eq!(h.wizard.current_step(), Step::Pricing);
}

#[test]
fn fields_that_pass_are_committed_even_when_a_sibling_fails() {
    let mut h = harness(RuleConfiguration::pilot());

    let errors = expect_errors(h.wizard.advance(StepInput::Identity(IdentityInput {
        name: "Dana Whitfield".into(),
        email: "not-an-email".into(),
        phone: "555 123 4567".into(),
    })));

    assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::BuyerEmail]);
    assert_eq!(h.wizard.record().buyer_name, "Dana Whitfield");
    assert_eq!(h.wizard.record().buyer_phone, "555 123 4567");
    assert_eq!(h.wizard.record().buyer_email, "");
    assert_eq!(h.wizard.current_step(), Step::Identity);
}

#[test]
fn happy_path_submits_once_and_resets() {
    let mut h = harness(RuleConfiguration::pilot());
    h.wizard.open();

    assert_eq!(
        h.wizard
            .advance(StepInput::Identity(valid_identity()))
            .expect("identity step"),
        Advance::Moved(Step::Pricing)
    );
    assert_eq!(
        h.wizard
            .advance(StepInput::Pricing(valid_pricing()))
            .expect("pricing step"),
        Advance::Moved(Step::Closing)
    );
    let submission = match h
        .wizard
        .advance(StepInput::Closing(valid_closing()))
        .expect("closing step")
    {
        Advance::Submitted(submission) => submission,
        other => panic!("expected submission, got {other:?}"),
    };

    let submitted = h.sink.submissions();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0], submission);

    let record = submission.record();
    assert_eq!(record.buyer_name, "Dana Whitfield");
    assert_eq!(record.buyer_email, "dana.whitfield@example.com");
    assert_eq!(record.buyer_phone, "(555) 123-4567");
    assert_eq!(record.offer_price, Some(260_000.0));
    assert_eq!(record.financing, Financing::Condition(true));
    assert_eq!(record.closing_date, Some(day(95)));
    assert_eq!(record.additional_comments, "Would like a final walkthrough.");
    assert!(record.acknowledgment);
    assert!(record.contingencies.is_empty());

    assert_eq!(h.wizard.current_step(), Step::Identity);
    assert!(h.wizard.record().is_empty());
}

#[test]
fn open_floor_happy_path_keeps_contingencies() {
    let mut h = harness(RuleConfiguration::open_floor());
    h.wizard
        .advance(StepInput::Identity(valid_identity()))
        .expect("identity step");
    h.wizard
        .advance(StepInput::Pricing(PricingInput {
            offer_price: "$270,000".into(),
            financing: "VA loan".into(),
        }))
        .expect("pricing step");
    let outcome = h
        .wizard
        .advance(StepInput::Closing(ClosingInput {
            closing_date: day(30).to_string(),
            contingencies: vec!["inspection".into(), "appraisal".into()],
            ..ClosingInput::default()
        }))
        .expect("closing step");

    let Advance::Submitted(submission) = outcome else {
        panic!("expected submission");
    };
    let expected: BTreeSet<String> = ["appraisal", "inspection"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(submission.record().contingencies, expected);
    assert_eq!(
        submission.record().financing,
        Financing::Choice("VA loan".into())
    );
    assert!(!submission.record().acknowledgment);
}

#[test]
fn failed_submission_keeps_the_offer_for_retry() {
    let clock = ShiftClock::at(day(0));
    let sink = FlakySink::failing(1);
    let mut wizard = OfferWizard::new(
        RuleConfiguration::pilot(),
        Box::new(clock),
        Box::new(sink.clone()),
    );
    advance_to_closing(&mut wizard);

    let first = wizard.advance(StepInput::Closing(valid_closing()));
    assert!(matches!(first, Err(WizardError::Submission(_))));
    assert_eq!(wizard.current_step(), Step::Closing);
    assert_eq!(wizard.record().closing_date, Some(day(95)));
    assert!(sink.inner.submissions().is_empty());

    let second = wizard.advance(StepInput::Closing(valid_closing()));
    assert!(matches!(second, Ok(Advance::Submitted(_))));
    assert_eq!(sink.inner.submissions().len(), 1);
    assert!(wizard.record().is_empty());
}
