//! CLI command implementations.

pub mod seed;
pub mod train;

use std::time::Duration;

/// Upstream timeout for CLI operations (bulk inserts take longer than
/// request-path calls).
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);
