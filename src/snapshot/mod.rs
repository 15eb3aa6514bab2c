// Snapshot management for stepping back through a finished run

use crate::memory::{heap::Heap, scope::ScopeStack};

/// Captured program output (values written by `#`)
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    pub lines: Vec<OutputLine>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        OutputBuffer { lines: Vec::new() }
    }

    /// Append one printed value
    pub fn print(&mut self, text: String, line: usize) {
        self.lines.push(OutputLine { text, line });
    }

    /// Get all lines as a vector of strings
    pub fn get_output(&self) -> Vec<String> {
        self.lines.iter().map(|ol| ol.text.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// A line of program output with source line tracking
#[derive(Debug, Clone)]
pub struct OutputLine {
    pub text: String,
    pub line: usize,
}

/// Snapshot of execution state after one statement
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub heap: Heap,
    pub scopes: ScopeStack,
    pub output: OutputBuffer,
    pub line: usize,
    /// Set on the final snapshot of a run that stopped on a fault
    pub faulted: bool,
}

impl Snapshot {
    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        // Heap: bytes plus reservation flags, and a rough cost per registry entry
        let heap_size = self.heap.capacity() * 2 + self.heap.live_count() * 32;

        // Scopes: assume 100 bytes per context on average
        let scope_size = self.scopes.depth() * 100;

        // Output: assume 50 bytes per line on average
        let output_size = self.output.lines.len() * 50;

        heap_size + scope_size + output_size
    }
}

/// Recorded execution history with a cursor for stepping through it
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
    position: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
            position: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), String> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(format!(
                "Snapshot memory limit exceeded: {} + {} > {}",
                self.current_memory, snapshot_size, self.max_memory
            ));
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Snapshot under the cursor
    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshots.get(self.position)
    }

    /// Cursor position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the cursor one snapshot forward; false at the end
    pub fn step_forward(&mut self) -> bool {
        if self.position + 1 < self.snapshots.len() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Move the cursor one snapshot back; false at the start
    pub fn step_backward(&mut self) -> bool {
        if self.position > 0 {
            self.position -= 1;
            true
        } else {
            false
        }
    }

    pub fn rewind_to_start(&mut self) {
        self.position = 0;
    }

    pub fn jump_to_end(&mut self) {
        self.position = self.snapshots.len().saturating_sub(1);
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    /// Get max memory limit
    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}
