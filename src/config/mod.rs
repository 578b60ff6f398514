//! Configuration management module
//!
//! Handles command line parsing, environment variable overrides and
//! validation of the run configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::{
    BenchfluxError, Result, DB_ENV_OVERRIDE, MEASUREMENT_ENV_OVERRIDE, RP_ENV_OVERRIDE,
    SOURCE_ENV_OVERRIDE, URL_ENV_OVERRIDE,
};

pub const DEFAULT_SOURCE: &str = "stdin";
pub const DEFAULT_URL: &str = "http://localhost:8086";
pub const DEFAULT_DATABASE: &str = "benchmarks";
pub const DEFAULT_RETENTION_POLICY: &str = "default";

/// Long flags that may also be spelled with a single dash
const LONG_FLAGS: &[&str] = &[
    "source",
    "url",
    "db",
    "rp",
    "measurement",
    "now",
    "help",
    "version",
];

/// Command line arguments
#[derive(Debug, Clone, Parser)]
#[command(name = "benchflux", version, about = "Write benchmark results to InfluxDB")]
pub struct Cli {
    /// A source name to give the results.
    #[arg(long, default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// The URL of the InfluxDB host.
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,

    /// The InfluxDB database name.
    #[arg(long, default_value = DEFAULT_DATABASE)]
    pub db: String,

    /// The InfluxDB retention policy name.
    #[arg(long, default_value = DEFAULT_RETENTION_POLICY)]
    pub rp: String,

    /// The InfluxDB measurement name.
    #[arg(long, default_value = "")]
    pub measurement: String,

    /// The time to use when writing the results. If empty uses current time. RFC3339 format
    #[arg(long, default_value = "")]
    pub now: String,

    /// Files to read benchmark output from; standard input when omitted.
    pub files: Vec<PathBuf>,
}

impl Cli {
    /// Parse arguments, accepting single-dash long flags
    pub fn try_parse_normalized<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        Ok(Self::try_parse_from(normalize_flag_args(args))?)
    }
}

/// Rewrite `-flag` and `-flag=value` into `--flag` forms
///
/// The first argument (program name) and everything after `--` are left
/// alone, as are short flags that are not one of the known long names.
pub fn normalize_flag_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out = Vec::new();
    let mut args = args.into_iter();
    if let Some(program) = args.next() {
        out.push(program);
    }

    let mut rewriting = true;
    for arg in args {
        if arg == "--" {
            rewriting = false;
        }
        if rewriting && arg.starts_with('-') && !arg.starts_with("--") {
            let name = arg[1..].split('=').next().unwrap_or_default();
            if LONG_FLAGS.contains(&name) {
                out.push(format!("-{}", arg));
                continue;
            }
        }
        out.push(arg);
    }
    out
}

/// Resolved run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Label for standard input when no files are given
    pub source_name: String,
    /// Base URL of the InfluxDB host
    pub url: String,
    /// Target database
    pub database: String,
    /// Target retention policy
    pub retention_policy: String,
    /// Measurement name for every point
    pub measurement: String,
    /// Explicit RFC 3339 timestamp, empty for current time
    pub now: String,
    /// Input files
    pub files: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_name: DEFAULT_SOURCE.to_string(),
            url: DEFAULT_URL.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            retention_policy: DEFAULT_RETENTION_POLICY.to_string(),
            measurement: String::new(),
            now: String::new(),
            files: Vec::new(),
        }
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            source_name: cli.source,
            url: cli.url,
            database: cli.db,
            retention_policy: cli.rp,
            measurement: cli.measurement,
            now: cli.now,
            files: cli.files,
        }
    }
}

impl Config {
    pub fn from_cli(cli: Cli) -> Self {
        cli.into()
    }

    /// Apply non-empty environment overrides on top of the flags
    ///
    /// `lookup` is normally `std::env::var(..).ok()`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(url) = non_empty(URL_ENV_OVERRIDE) {
            self.url = url;
        }
        if let Some(db) = non_empty(DB_ENV_OVERRIDE) {
            self.database = db;
        }
        if let Some(rp) = non_empty(RP_ENV_OVERRIDE) {
            self.retention_policy = rp;
        }
        if let Some(measurement) = non_empty(MEASUREMENT_ENV_OVERRIDE) {
            self.measurement = measurement;
        }
        if let Some(source) = non_empty(SOURCE_ENV_OVERRIDE) {
            self.source_name = source;
        }
        self
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(BenchfluxError::ConfigError(
                "InfluxDB URL must not be empty".to_string(),
            ));
        }
        if self.database.is_empty() {
            return Err(BenchfluxError::ConfigError(
                "database name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_retention_policy(mut self, rp: impl Into<String>) -> Self {
        self.retention_policy = rp.into();
        self
    }

    pub fn with_measurement(mut self, measurement: impl Into<String>) -> Self {
        self.measurement = measurement.into();
        self
    }

    pub fn with_now(mut self, now: impl Into<String>) -> Self {
        self.now = now.into();
        self
    }

    pub fn with_files(mut self, files: Vec<PathBuf>) -> Self {
        self.files = files;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("benchflux")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    fn parse(list: &[&str]) -> Config {
        Config::from_cli(Cli::try_parse_normalized(args(list)).unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config, Config::default());
        assert_eq!(config.source_name, "stdin");
        assert_eq!(config.url, "http://localhost:8086");
        assert_eq!(config.database, "benchmarks");
        assert_eq!(config.retention_policy, "default");
        assert!(config.measurement.is_empty());
        assert!(config.now.is_empty());
        assert!(config.files.is_empty());
    }

    #[test]
    fn test_single_dash_flags() {
        let config = parse(&[
            "-source",
            "ci",
            "-db=perf",
            "-measurement",
            "go_bench",
            "-now=2023-01-01T00:00:00Z",
            "a.txt",
            "b.txt",
        ]);
        assert_eq!(config.source_name, "ci");
        assert_eq!(config.database, "perf");
        assert_eq!(config.measurement, "go_bench");
        assert_eq!(config.now, "2023-01-01T00:00:00Z");
        assert_eq!(config.files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
    }

    #[test]
    fn test_double_dash_flags() {
        let config = parse(&["--url", "http://influx:8086", "--rp=autogen"]);
        assert_eq!(config.url, "http://influx:8086");
        assert_eq!(config.retention_policy, "autogen");
    }

    #[test]
    fn test_normalize_leaves_positionals() {
        let normalized = normalize_flag_args(args(&["-rp", "x", "--", "-db", "-weird.txt"]));
        assert_eq!(normalized, args(&["--rp", "x", "--", "-db", "-weird.txt"]));
    }

    #[test]
    fn test_unknown_flag_is_config_error() {
        let err = Cli::try_parse_normalized(args(&["-bogus", "1"])).unwrap_err();
        assert!(matches!(err, BenchfluxError::ConfigError(_)));
    }

    #[test]
    fn test_env_overrides_flags() {
        let env: HashMap<&str, &str> = [
            (URL_ENV_OVERRIDE, "http://env:8086"),
            (DB_ENV_OVERRIDE, "envdb"),
            (RP_ENV_OVERRIDE, "envrp"),
            (MEASUREMENT_ENV_OVERRIDE, "envm"),
            (SOURCE_ENV_OVERRIDE, "envsource"),
        ]
        .into_iter()
        .collect();

        let config = parse(&["-url", "http://flag:8086", "-db", "flagdb", "-source", "flag"])
            .with_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.url, "http://env:8086");
        assert_eq!(config.database, "envdb");
        assert_eq!(config.retention_policy, "envrp");
        assert_eq!(config.measurement, "envm");
        assert_eq!(config.source_name, "envsource");
    }

    #[test]
    fn test_empty_env_is_ignored() {
        let config = parse(&["-db", "flagdb"])
            .with_env_overrides(|key| (key == DB_ENV_OVERRIDE).then(String::new));
        assert_eq!(config.database, "flagdb");
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());
        assert!(Config::default().with_url("").validate().is_err());
        assert!(Config::default().with_database("").validate().is_err());
    }
}
