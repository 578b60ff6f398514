//! Metric points and batches
//!
//! Points are validated on construction and encoded to InfluxDB line
//! protocol when a batch is written.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::{BenchfluxError, Result};

/// Time precision of the timestamps in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    #[default]
    Seconds,
    Minutes,
    Hours,
}

impl Precision {
    /// Value of the `precision` query parameter
    pub fn as_str(self) -> &'static str {
        match self {
            Precision::Nanoseconds => "ns",
            Precision::Microseconds => "u",
            Precision::Milliseconds => "ms",
            Precision::Seconds => "s",
            Precision::Minutes => "m",
            Precision::Hours => "h",
        }
    }

    fn nanos(self) -> i64 {
        match self {
            Precision::Nanoseconds => 1,
            Precision::Microseconds => 1_000,
            Precision::Milliseconds => 1_000_000,
            Precision::Seconds => 1_000_000_000,
            Precision::Minutes => 60 * 1_000_000_000,
            Precision::Hours => 3_600 * 1_000_000_000,
        }
    }
}

/// Numeric field value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

/// One timestamped, tagged, multi-field data point
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    measurement: String,
    tags: BTreeMap<String, String>,
    fields: BTreeMap<String, FieldValue>,
    time: DateTime<Utc>,
    time_nanos: i64,
}

impl Point {
    /// Create a point, rejecting anything the server could not store
    pub fn new(
        measurement: impl Into<String>,
        tags: BTreeMap<String, String>,
        fields: BTreeMap<String, FieldValue>,
        time: DateTime<Utc>,
    ) -> Result<Self> {
        let measurement = measurement.into();
        if measurement.is_empty() {
            return Err(BenchfluxError::PointError(
                "measurement name must not be empty".to_string(),
            ));
        }
        if fields.is_empty() {
            return Err(BenchfluxError::PointError(
                "point without fields is unsupported".to_string(),
            ));
        }
        if tags.keys().any(|k| k.is_empty()) {
            return Err(BenchfluxError::PointError(
                "all tags must have non-empty names".to_string(),
            ));
        }
        for (key, value) in &fields {
            if key.is_empty() {
                return Err(BenchfluxError::PointError(
                    "all fields must have non-empty names".to_string(),
                ));
            }
            if let FieldValue::Float(v) = value {
                if v.is_nan() {
                    return Err(BenchfluxError::PointError(format!(
                        "NaN is an unsupported value for field {}",
                        key
                    )));
                }
                if v.is_infinite() {
                    return Err(BenchfluxError::PointError(format!(
                        "+/-Inf is an unsupported value for field {}",
                        key
                    )));
                }
            }
        }
        let time_nanos = time.timestamp_nanos_opt().ok_or_else(|| {
            BenchfluxError::PointError(format!("time outside range: {}", time.to_rfc3339()))
        })?;

        Ok(Self {
            measurement,
            tags,
            fields,
            time,
            time_nanos,
        })
    }

    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Encode as one line of line protocol, without the trailing newline
    pub fn line_protocol(&self, precision: Precision) -> String {
        let mut line = escape(&self.measurement, &[',', ' ']);

        for (key, value) in &self.tags {
            // Empty tag values are not representable.
            if value.is_empty() {
                continue;
            }
            line.push(',');
            line.push_str(&escape(key, &[',', '=', ' ']));
            line.push('=');
            line.push_str(&escape(value, &[',', '=', ' ']));
        }

        let mut separator = ' ';
        for (key, value) in &self.fields {
            line.push(separator);
            separator = ',';
            line.push_str(&escape(key, &[',', '=', ' ']));
            line.push('=');
            match value {
                FieldValue::Integer(v) => {
                    let _ = write!(line, "{}i", v);
                }
                FieldValue::Float(v) => {
                    let _ = write!(line, "{}", v);
                }
            }
        }

        let _ = write!(line, " {}", self.time_nanos / precision.nanos());
        line
    }
}

fn escape(value: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Target and precision of a batch
#[derive(Debug, Clone, Default)]
pub struct BatchPointsConfig {
    pub precision: Precision,
    pub database: String,
    pub retention_policy: String,
}

/// Points collected for a single write
#[derive(Debug, Clone, Default)]
pub struct BatchPoints {
    config: BatchPointsConfig,
    points: Vec<Point>,
}

impl BatchPoints {
    pub fn new(config: BatchPointsConfig) -> Self {
        Self {
            config,
            points: Vec::new(),
        }
    }

    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn precision(&self) -> Precision {
        self.config.precision
    }

    pub fn database(&self) -> &str {
        &self.config.database
    }

    pub fn retention_policy(&self) -> &str {
        &self.config.retention_policy
    }

    /// Request body: one line per point, each newline terminated
    pub fn line_protocol(&self) -> String {
        let mut body = String::new();
        for point in &self.points {
            body.push_str(&point.line_protocol(self.config.precision));
            body.push('\n');
        }
        body
    }
}
