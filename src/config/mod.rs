//! Configuration module for remotify
//!
//! Settings are sourced from the environment once at startup and stay
//! immutable for the process lifetime.

mod settings;

pub use settings::Settings;
