pub mod carbon;
pub mod emissions;
pub mod loan;
