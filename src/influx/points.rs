//! Benchmark records to metric points
//!
//! One point per record, tagged with where it came from and its position
//! within its benchmark's list.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use super::client::BatchWriter;
use super::point::{BatchPoints, BatchPointsConfig, FieldValue, Point, Precision};
use crate::config::Config;
use crate::models::{BenchmarkRecord, BenchmarkSet, Measured};
use crate::Result;

pub const TAG_SOURCE: &str = "source";
pub const TAG_BENCHMARK: &str = "benchmark";
pub const TAG_INDEX: &str = "index";

pub const FIELD_ITERATIONS: &str = "iterations";
pub const FIELD_NS_PER_OP: &str = "ns_per_op";
pub const FIELD_MB_PER_S: &str = "mb_per_s";
pub const FIELD_ALLOCED_BYTES_PER_OP: &str = "alloced_bytes_per_op";
pub const FIELD_ALLOCS_PER_OP: &str = "allocs_per_op";

/// Field set for a record: iterations always, the rest only when measured
pub fn record_fields(record: &BenchmarkRecord) -> BTreeMap<String, FieldValue> {
    let mut fields = BTreeMap::new();
    fields.insert(FIELD_ITERATIONS.to_string(), FieldValue::Integer(record.n));
    if record.measured.contains(Measured::NS_PER_OP) {
        fields.insert(FIELD_NS_PER_OP.to_string(), FieldValue::Float(record.ns_per_op));
    }
    if record.measured.contains(Measured::MB_PER_S) {
        fields.insert(FIELD_MB_PER_S.to_string(), FieldValue::Float(record.mb_per_s));
    }
    if record.measured.contains(Measured::ALLOCED_BYTES_PER_OP) {
        fields.insert(
            FIELD_ALLOCED_BYTES_PER_OP.to_string(),
            FieldValue::Integer(record.alloced_bytes_per_op as i64),
        );
    }
    if record.measured.contains(Measured::ALLOCS_PER_OP) {
        fields.insert(
            FIELD_ALLOCS_PER_OP.to_string(),
            FieldValue::Integer(record.allocs_per_op as i64),
        );
    }
    fields
}

/// Build the point for one record
pub fn benchmark_point(
    measurement: &str,
    source: &str,
    name: &str,
    index: usize,
    record: &BenchmarkRecord,
    now: DateTime<Utc>,
) -> Result<Point> {
    let mut tags = BTreeMap::new();
    tags.insert(TAG_SOURCE.to_string(), source.to_string());
    tags.insert(TAG_BENCHMARK.to_string(), name.to_string());
    tags.insert(TAG_INDEX.to_string(), index.to_string());

    Point::new(measurement, tags, record_fields(record), now)
}

/// Build a second-precision batch holding every record of every source
///
/// The first point that fails construction fails the whole batch.
pub fn build_batch(
    config: &Config,
    benchmarks: &HashMap<String, BenchmarkSet>,
    now: DateTime<Utc>,
) -> Result<BatchPoints> {
    let mut batch = BatchPoints::new(BatchPointsConfig {
        precision: Precision::Seconds,
        database: config.database.clone(),
        retention_policy: config.retention_policy.clone(),
    });

    for (source, set) in benchmarks {
        for (name, list) in set {
            for (index, record) in list.iter().enumerate() {
                let point = benchmark_point(&config.measurement, source, name, index, record, now)?;
                batch.add_point(point);
            }
        }
    }

    Ok(batch)
}

/// Build the batch and hand it to the writer in a single call
///
/// Returns the number of points written.
pub async fn write_benchmarks<W: BatchWriter>(
    writer: &W,
    config: &Config,
    benchmarks: &HashMap<String, BenchmarkSet>,
    now: DateTime<Utc>,
) -> Result<usize> {
    let batch = build_batch(config, benchmarks, now)?;
    debug!(
        database = batch.database(),
        retention_policy = batch.retention_policy(),
        points = batch.len(),
        "batch ready"
    );
    writer.write(&batch).await?;
    Ok(batch.len())
}
