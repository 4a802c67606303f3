use thiserror::Error;

use crate::validation::ValidationErrors;

/// Failure reported by a submission collaborator.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Submission rejected: {0}")]
    Rejected(String),
}

/// Error type returned by wizard operations.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("Submission failed: {0}")]
    Submission(#[from] SubmitError),
}

impl WizardError {
    /// Field errors when the failure came from a validator.
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            WizardError::Validation(errors) => Some(errors),
            WizardError::Submission(_) => None,
        }
    }
}
