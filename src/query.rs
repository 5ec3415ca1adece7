//! Query parameters for listing a tenant's logs and their translation into a
//! store [`LogFilter`].
//!
//! Dates are whole UTC days. `from` is the first included day, `to` the last,
//! so the range sent to the store is `[from 00:00, to + 1 day 00:00)`.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use ingest::Tenant;
use serde::Deserialize;
use store::{LogFilter, TimeRange};

use crate::error::LogServiceError;

/// Accepted date layout for `from` and `to`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parameters of a filtered log listing.
///
/// Empty strings count as absent, so `?user_id=&from=` behaves like no
/// parameters at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LogQuery {
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

impl LogQuery {
    pub fn for_app<S: Into<String>>(app_name: S) -> Self {
        Self {
            app_name: Some(app_name.into()),
            ..Self::default()
        }
    }

    pub fn with_user_id<S: Into<String>>(mut self, user_id: S) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_from<S: Into<String>>(mut self, from: S) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_to<S: Into<String>>(mut self, to: S) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Resolve the tenant, then build the store filter.
    ///
    /// The tenant is checked first: an unknown `app_name` with a bad date
    /// reports the tenant.
    pub fn resolve(&self) -> Result<(Tenant, LogFilter), LogServiceError> {
        let tenant = Tenant::resolve(self.app_name.as_deref().unwrap_or_default())?;

        let mut filter = LogFilter::all();
        if let Some(user_id) = non_empty(self.user_id.as_deref()) {
            filter = filter.with_user_id(user_id);
        }
        if let Some(range) = day_range(self.from.as_deref(), self.to.as_deref())? {
            filter = filter.with_time_range(range);
        }
        Ok((tenant, filter))
    }
}

/// Build the half-open range covering the days `from..=to`.
///
/// Returns `None` when neither bound is given. A missing `from` starts at the
/// earliest representable instant; a missing `to` ends at the latest.
pub fn day_range(from: Option<&str>, to: Option<&str>) -> Result<Option<TimeRange>, LogServiceError> {
    let from = non_empty(from);
    let to = non_empty(to);
    if from.is_none() && to.is_none() {
        return Ok(None);
    }

    let start = match from {
        Some(value) => start_of_day(parse_day("from", value)?),
        None => DateTime::<Utc>::MIN_UTC,
    };
    let end = match to {
        Some(value) => parse_day("to", value)?
            .checked_add_days(Days::new(1))
            .map(start_of_day)
            .unwrap_or(DateTime::<Utc>::MAX_UTC),
        None => DateTime::<Utc>::MAX_UTC,
    };
    Ok(Some(TimeRange::new(start, end)))
}

pub fn parse_day(field: &'static str, value: &str) -> Result<NaiveDate, LogServiceError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| LogServiceError::InvalidDateFormat {
        field,
        value: value.to_string(),
    })
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
