use thiserror::Error;

#[derive(Debug, Error)]
pub enum CarbonLoanError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Unknown emission profile: {0}")]
    UnknownProfile(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CarbonLoanError {
    fn from(e: serde_json::Error) -> Self {
        CarbonLoanError::SerializationError(e.to_string())
    }
}
