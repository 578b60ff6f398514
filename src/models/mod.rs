//! Data models module
//!
//! Contains the parsed benchmark record structures and the
//! measured-field flag set.

pub mod record;

// Re-export commonly used types
pub use record::{
    BenchmarkRecord,
    BenchmarkSet,
    Measured,
    record_count,
};
