use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime};

use crate::error::HistoryError;

// Day-granular time handling lives here to keep the replay/walk code focused.

/// A timestamp normalized to end-of-day (23:59:59, sub-second zeroed).
///
/// Two markers are equal iff they denote the same calendar day; ordering
/// follows the underlying instant. This is the sole unit of historical
/// comparison in the replay and walk code.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct DayMarker(NaiveDateTime);

impl DayMarker {
  /// Pin any datetime to the last instant of its calendar day.
  pub fn from_datetime(dt: NaiveDateTime) -> Self {
    DayMarker(dt.date().and_hms_opt(23, 59, 59).unwrap())
  }

  /// Normalize a source timestamp string (see [`parse_timestamp`]).
  pub fn from_timestamp(raw: &str) -> Result<Self, HistoryError> {
    parse_timestamp(raw).map(Self::from_datetime)
  }

  /// End of the current day, honoring an optional override for determinism.
  pub fn today(now: Option<DateTime<Local>>) -> Self {
    Self::from_datetime(crate::util::effective_now(now).naive_local())
  }

  /// The marker one calendar day earlier.
  pub fn prev_day(self) -> Self {
    DayMarker(self.0 - Duration::days(1))
  }

  /// Day-string map key: year, zero-based month, day-of-month, no padding.
  ///
  /// The zero-based month is an inherited output quirk (2024-03-15 renders
  /// as "2024-2-15"); downstream consumers rely on it, so it stays.
  pub fn date_key(&self) -> String {
    format!("{}-{}-{}", self.0.year(), self.0.month0(), self.0.day())
  }
}

/// Parse a timestamp as the issue tracker emits them.
///
/// Accepts Jira's offset shape (`2024-03-15T10:30:00.000+0100`), RFC3339,
/// a naive datetime, or a bare date. The calendar day is taken from the
/// timestamp's own wall clock (not re-zoned), so a fetch from another
/// timezone still buckets events on the day the tracker recorded.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, HistoryError> {
  let s = raw.trim();

  if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
    return Ok(dt.naive_local());
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.naive_local());
  }
  if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
    return Ok(ndt);
  }
  if let Ok(nd) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
    return Ok(nd.and_hms_opt(0, 0, 0).unwrap());
  }

  Err(HistoryError::malformed(format!("unparseable timestamp {s:?}")))
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn same_day_markers_are_equal_regardless_of_time() {
    let morning = DayMarker::from_timestamp("2024-03-15T08:01:02.003+0100").unwrap();
    let night = DayMarker::from_timestamp("2024-03-15T23:59:59+0100").unwrap();
    assert_eq!(morning, night);
  }

  #[test]
  fn markers_order_by_calendar_day() {
    let a = DayMarker::from_timestamp("2024-03-14T23:00:00+0000").unwrap();
    let b = DayMarker::from_timestamp("2024-03-15T01:00:00+0000").unwrap();
    assert!(a < b);
    assert_eq!(b.prev_day(), a);
  }

  #[test]
  fn date_key_uses_zero_based_month_without_padding() {
    let m = DayMarker::from_timestamp("2024-03-15").unwrap();
    assert_eq!(m.date_key(), "2024-2-15");

    let jan = DayMarker::from_timestamp("2025-01-03").unwrap();
    assert_eq!(jan.date_key(), "2025-0-3");
  }

  #[test]
  fn parse_accepts_rfc3339_and_naive_forms() {
    assert!(parse_timestamp("2024-03-15T10:30:00Z").is_ok());
    assert!(parse_timestamp("2024-03-15T10:30:00").is_ok());
    assert!(parse_timestamp("2024-03-15").is_ok());
  }

  #[test]
  fn parse_rejects_garbage_as_malformed() {
    let err = parse_timestamp("next tuesday").unwrap_err();
    assert!(err.to_string().contains("unparseable timestamp"));
  }

  #[test]
  fn calendar_day_comes_from_the_timestamps_own_offset() {
    // 23:30 at +0100 is still March 15 on the tracker's wall clock.
    let m = DayMarker::from_timestamp("2024-03-15T23:30:00.000+0100").unwrap();
    assert_eq!(m.date_key(), "2024-2-15");
  }

  #[test]
  fn today_honors_override() {
    let fixed = Local.with_ymd_and_hms(2025, 8, 15, 12, 0, 0).single().unwrap();
    let today = DayMarker::today(Some(fixed));
    assert_eq!(today.date_key(), "2025-7-15");
  }
}
