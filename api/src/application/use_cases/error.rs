use crate::application::ports::edms_client::EdmsClientError;
use crate::application::validation::ValidationErrors;

#[derive(thiserror::Error, Debug)]
pub enum UseCaseError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("`{0}` is not available to you for this document")]
    NotAvailable(&'static str),
    #[error(transparent)]
    Client(#[from] EdmsClientError),
}

impl From<ValidationErrors> for UseCaseError {
    fn from(value: ValidationErrors) -> Self {
        UseCaseError::Validation(value)
    }
}
