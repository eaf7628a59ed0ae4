//! Application configuration module
//!
//! Environment-driven settings plus the constants shared by validation,
//! sessions, and persistence.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
