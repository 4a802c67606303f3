use crate::errors::SubmitError;
use crate::offer::OfferSubmission;

/// Receives a finalized offer. Called once per successful submission.
pub trait OfferSink: Send {
    fn submit(&mut self, submission: &OfferSubmission) -> Result<(), SubmitError>;
}

/// Sink that records the submission in the diagnostic log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl OfferSink for LogSink {
    fn submit(&mut self, submission: &OfferSubmission) -> Result<(), SubmitError> {
        let payload = submission.to_json()?;
        tracing::info!(submission_id = %submission.id(), %payload, "offer submitted");
        Ok(())
    }
}
