//! InfluxDB module
//!
//! Contains metric point and batch types, line protocol encoding, the
//! HTTP write client and the mapping from benchmark records to points.

pub mod client;
pub mod point;
pub mod points;

// Re-export commonly used types
pub use client::{BatchWriter, HttpClient, HttpConfig};
pub use point::{BatchPoints, BatchPointsConfig, FieldValue, Point, Precision};
pub use points::{benchmark_point, build_batch, record_fields, write_benchmarks};
