pub mod error;
pub mod types;

#[cfg(feature = "carbon")]
pub mod carbon;

#[cfg(feature = "loan")]
pub mod loan;

#[cfg(feature = "session")]
pub mod session;

pub use error::CarbonLoanError;
pub use types::*;

/// Standard result type for all carbon-loan operations
pub type CarbonLoanResult<T> = Result<T, CarbonLoanError>;
