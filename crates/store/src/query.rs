use chrono::{DateTime, Utc};
use ingest::LogRecord;

/// Half-open timestamp range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// From the earliest to the latest representable timestamp.
    pub fn unbounded() -> Self {
        Self {
            start: DateTime::<Utc>::MIN_UTC,
            end: DateTime::<Utc>::MAX_UTC,
        }
    }

    #[inline]
    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        self.start <= *timestamp && *timestamp < self.end
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Predicates a backend applies when listing a tenant's records.
///
/// Both predicates are optional; an empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Exact equality on `user_id`.
    pub user_id: Option<String>,
    /// Range on `timestamp`.
    pub timestamp: Option<TimeRange>,
}

impl LogFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_user_id<S: Into<String>>(mut self, user_id: S) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_time_range(mut self, range: TimeRange) -> Self {
        self.timestamp = Some(range);
        self
    }

    pub fn matches(&self, record: &LogRecord) -> bool {
        if let Some(user_id) = &self.user_id {
            if !record.has_user_id(user_id) {
                return false;
            }
        }
        match &self.timestamp {
            Some(range) => range.contains(&record.timestamp),
            None => true,
        }
    }
}
