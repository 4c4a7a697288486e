//! Attendance domain model.
//!
//! # Responsibility
//! - Define attendance status, calendar date and record types.
//! - Own the single accepted date text form (`YYYY-MM-DD`).
//!
//! # Invariants
//! - `AttendanceDate` never carries a time component.
//! - `AttendanceDate` text form is stable and sorts lexicographically in
//!   calendar order, which storage queries rely on.
//! - `DateRange` is inclusive on both ends and `start <= end`.

use crate::model::student::StudentId;
use crate::model::validation::ValidationError;
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid iso date regex"));

/// Attendance state for one student on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    /// Parses user input. Accepts `present|absent|p|a`, case-insensitive.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "present" | "p" => Ok(Self::Present),
            "absent" | "a" => Ok(Self::Absent),
            _ => Err(ValidationError::InvalidStatus(value.trim().to_string())),
        }
    }

    /// Human-facing label used by reports and exports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
        }
    }

    pub(crate) fn as_db_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }

    pub(crate) fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "present" => Some(Self::Present),
            "absent" => Some(Self::Absent),
            _ => None,
        }
    }
}

impl Display for AttendanceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Calendar date without time component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttendanceDate(NaiveDate);

impl AttendanceDate {
    /// Parses strict ISO `YYYY-MM-DD` text.
    ///
    /// Rejects unpadded components (`2024-1-5`) and impossible dates
    /// (`2023-02-29`).
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if !ISO_DATE_RE.is_match(trimmed) {
            return Err(ValidationError::InvalidDate(trimmed.to_string()));
        }
        NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDate(format!("{year:04}-{month:02}-{day:02}"));
        if !(0..=9999).contains(&year) {
            return Err(invalid());
        }
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(invalid)
    }

    /// Today's date in the local timezone.
    pub fn today() -> Self {
        Self(chrono::Local::now().date_naive())
    }

    pub fn as_naive(self) -> NaiveDate {
        self.0
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }
}

impl Display for AttendanceDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(ISO_DATE_FORMAT))
    }
}

impl TryFrom<String> for AttendanceDate {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AttendanceDate> for String {
    fn from(value: AttendanceDate) -> Self {
        value.to_string()
    }
}

/// Inclusive calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: AttendanceDate,
    end: AttendanceDate,
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Bounds {
            start: AttendanceDate,
            end: AttendanceDate,
        }

        let bounds = Bounds::deserialize(deserializer)?;
        Self::new(bounds.start, bounds.end).map_err(serde::de::Error::custom)
    }
}

impl DateRange {
    pub fn new(start: AttendanceDate, end: AttendanceDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Range covering exactly one day.
    pub fn single(date: AttendanceDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> AttendanceDate {
        self.start
    }

    pub fn end(&self) -> AttendanceDate {
        self.end
    }

    pub fn contains(&self, date: AttendanceDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// One persisted attendance row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub student_id: StudentId,
    pub date: AttendanceDate,
    pub status: AttendanceStatus,
}

/// Observable effect of one upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// No record existed; one was inserted.
    Created,
    /// A record existed with a different status; it was overwritten.
    Updated,
    /// A record existed with the same status; nothing was written.
    Unchanged,
}

impl MarkOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AttendanceDate, AttendanceStatus, DateRange};
    use crate::model::validation::ValidationError;

    #[test]
    fn parse_accepts_iso_dates_and_round_trips_display() {
        let date = AttendanceDate::parse(" 2024-01-10 ").unwrap();
        assert_eq!(date.to_string(), "2024-01-10");
        assert_eq!((date.year(), date.month(), date.day()), (2024, 1, 10));
    }

    #[test]
    fn parse_rejects_unpadded_and_impossible_dates() {
        for raw in ["2024-1-10", "10/01/2024", "2023-02-29", "2024-13-01", ""] {
            let err = AttendanceDate::parse(raw).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidDate(_)), "{raw}");
        }
        assert!(AttendanceDate::parse("2024-02-29").is_ok());
    }

    #[test]
    fn date_serializes_as_iso_string_and_rejects_bad_json() {
        let date = AttendanceDate::parse("2024-01-10").unwrap();
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2024-01-10\"");
        assert_eq!(
            serde_json::from_str::<AttendanceDate>("\"2024-01-10\"").unwrap(),
            date
        );
        assert!(serde_json::from_str::<AttendanceDate>("\"2024-1-10\"").is_err());
    }

    #[test]
    fn status_parse_is_case_insensitive_with_short_forms() {
        assert_eq!(AttendanceStatus::parse("PRESENT").unwrap(), AttendanceStatus::Present);
        assert_eq!(AttendanceStatus::parse(" a ").unwrap(), AttendanceStatus::Absent);
        assert!(AttendanceStatus::parse("late").is_err());
    }

    #[test]
    fn date_range_rejects_reversed_bounds() {
        let early = AttendanceDate::parse("2024-01-01").unwrap();
        let late = AttendanceDate::parse("2024-01-31").unwrap();

        let range = DateRange::new(early, late).unwrap();
        assert!(range.contains(early));
        assert!(range.contains(late));

        let err = DateRange::new(late, early).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidDateRange {
                start: late,
                end: early
            }
        );
    }

    #[test]
    fn date_range_deserialization_enforces_order() {
        let range: DateRange =
            serde_json::from_str(r#"{"start":"2024-01-01","end":"2024-01-31"}"#).unwrap();
        assert_eq!(range.start().to_string(), "2024-01-01");
        assert_eq!(
            serde_json::to_string(&range).unwrap(),
            r#"{"start":"2024-01-01","end":"2024-01-31"}"#
        );

        let err = serde_json::from_str::<DateRange>(r#"{"start":"2024-01-31","end":"2024-01-01"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("is after end"));
    }
}
