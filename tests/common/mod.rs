#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use benchflux::influx::{BatchPoints, BatchWriter};
use benchflux::{BenchfluxError, Result};

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Writer that keeps every batch it is handed instead of sending it
#[derive(Clone, Default)]
pub struct RecordingWriter {
    pub batches: Arc<Mutex<Vec<BatchPoints>>>,
    pub fail_with: Option<String>,
}

impl RecordingWriter {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

impl BatchWriter for RecordingWriter {
    async fn write(&self, batch: &BatchPoints) -> Result<()> {
        self.batches.lock().unwrap().push(batch.clone());
        match &self.fail_with {
            Some(message) => Err(BenchfluxError::WriteError(message.clone())),
            None => Ok(()),
        }
    }
}
