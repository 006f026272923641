//! Clock port for time-related operations

use chrono::{DateTime, Datelike, Utc};

/// Port for getting the current time.
///
/// Reports and cost timestamps are built from "now", so tests substitute a
/// fixed clock.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current `(year, month)`, month 1-based.
    fn year_month(&self) -> (i32, u32) {
        let now = self.now();
        (now.year(), now.month())
    }
}
