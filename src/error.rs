use thiserror::Error;

/// Errors raised while validating inputs or running a computation.
///
/// Every error aborts the whole computation; no partial schedule is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmortizationError {
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Arithmetic overflow while computing {context}")]
    Overflow { context: String },

    #[error("Date for period {period} is out of range")]
    DateOutOfRange { period: u32 },
}

impl AmortizationError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        AmortizationError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(context: impl Into<String>) -> Self {
        AmortizationError::Overflow {
            context: context.into(),
        }
    }
}

pub type EngineResult<T> = Result<T, AmortizationError>;
