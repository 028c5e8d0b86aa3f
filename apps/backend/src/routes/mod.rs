pub mod auth;
pub mod memorization;
pub mod sections;
pub mod settings;
pub mod units;
