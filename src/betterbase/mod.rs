pub mod client;
pub mod config;
pub mod model;
pub mod onboarding;
pub mod store;
pub mod traits;
