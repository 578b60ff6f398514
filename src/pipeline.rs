use tracing::debug;

use crate::bench::parse_benchmarks;
use crate::config::Config;
use crate::influx::{write_benchmarks, BatchWriter};
use crate::io::determine_inputs;
use crate::util::determine_time;
use crate::Result;

/// Run one import: resolve inputs, parse them, write a single batch.
///
/// Connection settings are validated and the writer is created only after
/// every input parsed, so bad input is reported before a bad URL.
/// Returns the number of points written.
pub async fn run<W, F>(config: &Config, make_writer: F) -> Result<usize>
where
    W: BatchWriter,
    F: FnOnce(&Config) -> Result<W>,
{
    let inputs = determine_inputs(&config.source_name, &config.files)?;
    let now = determine_time(&config.now)?;
    let benchmarks = parse_benchmarks(inputs)?;

    config.validate()?;
    let writer = make_writer(config)?;
    let written = write_benchmarks(&writer, config, &benchmarks, now).await?;
    debug!(points = written, sources = benchmarks.len(), "write complete");
    Ok(written)
}
