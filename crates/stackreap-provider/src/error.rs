use stackreap_core::StackName;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider has no record of the stack.
    #[error("stack {0} does not exist")]
    NotFound(StackName),
    /// The provider refused the call (permissions, validation, termination protection, ...).
    #[error("{code}: {message}")]
    Rejected { code: String, message: String },
    /// The call did not get an answer (network, throttling, deserialization, ...).
    #[error("{0}")]
    Transport(String),
}

impl ProviderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound(_))
    }

    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::Rejected { code: code.into(), message: message.into() }
    }
}
