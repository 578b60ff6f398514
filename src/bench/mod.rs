//! Benchmark parsing module
//!
//! Contains the benchmark text parser and the adapter that runs it
//! over every resolved input.

pub mod parse;

use std::collections::HashMap;

use tracing::debug;

use crate::io::Inputs;
use crate::models::{record_count, BenchmarkSet};
use crate::{BenchfluxError, Result};

// Re-export commonly used functions
pub use parse::{parse_line, parse_set};

/// Parse every input into a benchmark set keyed by its source label
///
/// Stops at the first input that fails; nothing is returned for the
/// inputs that did parse. Each stream is dropped right after its parse.
pub fn parse_benchmarks(inputs: Inputs) -> Result<HashMap<String, BenchmarkSet>> {
    let mut sets = HashMap::with_capacity(inputs.len());

    for (source, input) in inputs {
        let set = parse_set(input).map_err(|e| {
            BenchfluxError::ParseError(format!("failed to parse {}: {}", source, e))
        })?;
        debug!(source = %source, records = record_count(&set), "parsed benchmark input");
        sets.insert(source, set);
    }

    Ok(sets)
}
