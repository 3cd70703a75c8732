//! Protocol constants and tuning parameters.
//!
//! Timeouts, limits and protocol values shared by the tracker and storage
//! layers. Defaults match the behaviour of the stock MogileFS clients where one
//! exists.

use std::time::Duration;

// ============================================================================
// Client identification
// ============================================================================

/// User agent string for storage node HTTP requests
pub const USER_AGENT: &str = "mogilefs-rs/0.1.0";

// ============================================================================
// Timeouts - Tracker
// ============================================================================

/// TCP connect timeout per tracker host
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(1);

/// Deadline for writing a request line and reading the reply line
pub const DEFAULT_TRACKER_IO_TIMEOUT: Duration = Duration::from_secs(30);

/// How long a tracker that refused or timed out a connect is skipped
pub const TRACKER_BLACKLIST_DURATION: Duration = Duration::from_secs(60);

// ============================================================================
// Timeouts - Storage nodes
// ============================================================================

/// HTTP connect timeout for storage nodes
pub const DEFAULT_STORAGE_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP read timeout for storage nodes (per read, not whole transfer)
pub const DEFAULT_STORAGE_READ_TIMEOUT: Duration = Duration::from_secs(60);

// ============================================================================
// Protocol limits
// ============================================================================

/// Maximum accepted length of a single tracker reply line (1MB)
pub const MAX_REPLY_LINE_LENGTH: u64 = 1024 * 1024;

/// Highest `pathN` key scanned in a `get_paths` reply.
///
/// Trackers never document behaviour past this index, so the scan stops here.
pub const MAX_PATH_SCAN: usize = 254;

/// Fewest paths ever requested from a tracker
pub const MIN_PATH_COUNT: u32 = 2;

/// Paths requested when the caller keeps the default options
pub const DEFAULT_PATH_COUNT: u32 = 2;

// ============================================================================
// Reply grammar
// ============================================================================

/// Prefix of a successful tracker reply
pub const REPLY_OK_PREFIX: &str = "OK ";

/// Prefix of a failed tracker reply
pub const REPLY_ERR_PREFIX: &str = "ERR ";

/// Line terminator used by the tracker protocol
pub const LINE_TERMINATOR: &str = "\r\n";
