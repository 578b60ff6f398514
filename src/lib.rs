//! benchflux - benchmark results to InfluxDB
//!
//! Reads benchmark runner output from files or standard input, parses it
//! into records and writes every record as a tagged point to an InfluxDB
//! database in a single batch.

use std::fmt;

pub mod bench;
pub mod config;
pub mod influx;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod util;

// Common error types
#[derive(Debug)]
pub enum BenchfluxError {
    /// Reading an input stream failed
    IoError(std::io::Error),
    /// An input file could not be opened
    InputError(String),
    /// The explicit timestamp is not valid RFC 3339
    TimestampError(String),
    /// Benchmark text could not be parsed
    ParseError(String),
    /// A metric point was rejected during construction
    PointError(String),
    /// The database client could not be created
    ClientError(String),
    /// The batch write failed in transport or on the server
    WriteError(String),
    /// Command line arguments were rejected
    ConfigError(String),
}

impl fmt::Display for BenchfluxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchfluxError::IoError(err) => write!(f, "I/O error: {}", err),
            BenchfluxError::InputError(msg) => write!(f, "Input error: {}", msg),
            BenchfluxError::TimestampError(msg) => write!(f, "Timestamp error: {}", msg),
            BenchfluxError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            BenchfluxError::PointError(msg) => write!(f, "Point error: {}", msg),
            BenchfluxError::ClientError(msg) => write!(f, "Client error: {}", msg),
            BenchfluxError::WriteError(msg) => write!(f, "Write error: {}", msg),
            BenchfluxError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for BenchfluxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BenchfluxError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BenchfluxError {
    fn from(err: std::io::Error) -> Self {
        BenchfluxError::IoError(err)
    }
}

impl From<chrono::ParseError> for BenchfluxError {
    fn from(err: chrono::ParseError) -> Self {
        BenchfluxError::TimestampError(format!("RFC 3339 parsing error: {}", err))
    }
}

impl From<reqwest::Error> for BenchfluxError {
    fn from(err: reqwest::Error) -> Self {
        BenchfluxError::WriteError(format!("HTTP request failed: {}", err))
    }
}

impl From<clap::Error> for BenchfluxError {
    fn from(err: clap::Error) -> Self {
        BenchfluxError::ConfigError(err.to_string())
    }
}

/// Result type alias for benchflux operations
pub type Result<T> = std::result::Result<T, BenchfluxError>;

/// Error handling utilities
pub mod error {
    use super::BenchfluxError;

    /// Convert error to a short operator hint
    pub fn user_friendly_message(error: &BenchfluxError) -> String {
        match error {
            BenchfluxError::InputError(_) => {
                "Could not open an input file. Check that every path exists and is readable."
                    .to_string()
            }
            BenchfluxError::TimestampError(_) => {
                "The -now value must be RFC 3339, for example 2023-01-01T00:00:00Z.".to_string()
            }
            BenchfluxError::ParseError(_) | BenchfluxError::IoError(_) => {
                "Benchmark output could not be read. Check the input source.".to_string()
            }
            BenchfluxError::PointError(_) => {
                "A point was rejected. Set a measurement name with -measurement or BF_INFLUXDB_MEASUREMENT."
                    .to_string()
            }
            BenchfluxError::ClientError(_) => {
                "The database URL is invalid. Use http:// or https:// with -url or BF_INFLUXDB_URL."
                    .to_string()
            }
            BenchfluxError::WriteError(_) => {
                "The write to InfluxDB failed. Check that the server is reachable and the database exists."
                    .to_string()
            }
            BenchfluxError::ConfigError(msg) => {
                format!("Configuration error: {}. Check your flags.", msg)
            }
        }
    }
}

// Common types and constants
pub const USER_AGENT: &str = "benchflux";

pub const URL_ENV_OVERRIDE: &str = "BF_INFLUXDB_URL";
pub const DB_ENV_OVERRIDE: &str = "BF_INFLUXDB_DB";
pub const RP_ENV_OVERRIDE: &str = "BF_INFLUXDB_RP";
pub const MEASUREMENT_ENV_OVERRIDE: &str = "BF_INFLUXDB_MEASUREMENT";
pub const SOURCE_ENV_OVERRIDE: &str = "BF_SOURCE_NAME";
