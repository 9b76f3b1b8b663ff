pub mod emissions;
pub mod profile;
pub mod rate_model;
