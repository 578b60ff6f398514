//! Utility functions module
//!
//! Contains timestamp resolution helpers.

pub mod time;

// Re-export commonly used functions
pub use time::determine_time;
