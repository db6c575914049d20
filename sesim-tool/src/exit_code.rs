//! Exit codes of the tool.

/// All cells were compared.
pub const NO_ERROR: i32 = 0;

/// The results were printed, but some cells failed.
pub const NON_FATAL_ERROR: i32 = 1;

/// Nothing was printed.
pub const FATAL_ERROR: i32 = 2;
