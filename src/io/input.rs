use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use tracing::debug;

use crate::{BenchfluxError, Result};

/// Readable benchmark streams keyed by source label
pub type Inputs = HashMap<String, Box<dyn Read>>;

/// Resolve the positional arguments into labelled input streams
///
/// With no paths the result is a single entry for standard input under
/// `source_name`. Otherwise every path is opened and keyed by its name as
/// given; the first path that cannot be opened fails the whole call.
pub fn determine_inputs<P: AsRef<Path>>(source_name: &str, paths: &[P]) -> Result<Inputs> {
    if paths.is_empty() {
        debug!(source = source_name, "reading benchmarks from stdin");
        let mut inputs = Inputs::with_capacity(1);
        inputs.insert(source_name.to_string(), Box::new(io::stdin()));
        return Ok(inputs);
    }

    let mut inputs = Inputs::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            BenchfluxError::InputError(format!("failed to open {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "opened benchmark input");
        inputs.insert(path.display().to_string(), Box::new(file));
    }
    Ok(inputs)
}
