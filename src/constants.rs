//! Shared crate-wide constants.

/// Position given to the very first window that is added without
/// `FIXED_POSITION`.
pub const FIRST_WINDOW_POSITION: (i32, i32) = (1, 1);

/// Offset applied to the most recently added window's position when
/// cascading a new window.
pub const CASCADE_OFFSET: (i32, i32) = (2, 1);

/// Top-left corner of an `EXPANDED` window.
pub const EXPANDED_POSITION: (i32, i32) = (1, 1);

/// Columns taken off the screen width for an `EXPANDED` window.
pub const EXPANDED_MARGIN_COLUMNS: u16 = 4;

/// Rows taken off the screen height for an `EXPANDED` window.
pub const EXPANDED_MARGIN_ROWS: u16 = 3;

/// Default sleep between idle passes when the gui polls for input instead of
/// blocking on it.
///
/// Units: milliseconds. Lower values make the loop more responsive at the
/// cost of waking up more often while nothing happens.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;
