//! Run configuration
//!
//! [`RunConfig`] gathers the knobs of a single interpreter run. The binary builds it
//! from command-line arguments; tests usually start from [`RunConfig::default`] and
//! override one field with the builder methods.

use crate::interpreter::constants::{DEFAULT_HEAP_SIZE, DEFAULT_SNAPSHOT_LIMIT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Heap capacity in bytes
    pub heap_size: usize,
    /// Sweep temporaries after every statement
    pub sweep_temporaries: bool,
    /// Record a snapshot after every statement (for the inspector)
    pub record_snapshots: bool,
    /// Memory budget for recorded snapshots, in bytes
    pub snapshot_limit: usize,
    /// Write printed values to stdout as they are produced
    pub echo_output: bool,
}

impl RunConfig {
    pub fn with_heap_size(mut self, heap_size: usize) -> Self {
        self.heap_size = heap_size;
        self
    }

    pub fn without_sweep(mut self) -> Self {
        self.sweep_temporaries = false;
        self
    }

    pub fn recording_snapshots(mut self, limit: usize) -> Self {
        self.record_snapshots = true;
        self.snapshot_limit = limit;
        self
    }

    pub fn echoing_output(mut self) -> Self {
        self.echo_output = true;
        self
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            heap_size: DEFAULT_HEAP_SIZE,
            sweep_temporaries: true,
            record_snapshots: false,
            snapshot_limit: DEFAULT_SNAPSHOT_LIMIT,
            echo_output: false,
        }
    }
}
