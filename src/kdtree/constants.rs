//! Default query parameters.

/// Bin size at which nearest neighbor descent stops and scans linearly.
pub const DEFAULT_GRANULARITY: usize = 10;

/// Nodes holding at most this many points are tested against range bounds as a whole before
/// descending.
pub const RANGE_SCAN_THRESHOLD: usize = 5;
