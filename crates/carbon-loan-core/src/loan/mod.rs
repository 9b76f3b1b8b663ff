pub mod amortization;
pub mod pricing;
