// Constants for the evaluator

/// Default heap capacity in bytes (1 KiB)
pub const DEFAULT_HEAP_SIZE: usize = 1024;

/// Storage size of a number (IEEE-754 double)
pub const NUMBER_SIZE: usize = 8;

/// Storage size of a boolean flag
pub const BOOLEAN_SIZE: usize = 1;

/// Default memory budget for recorded snapshots (64 MiB)
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 64 * 1024 * 1024;

/// Maximum number of function contexts on the stack at once
pub const MAX_CALL_DEPTH: usize = 200;

/// Name of the outermost scope context
pub const GLOBAL_SCOPE_NAME: &str = "global";
