//! Validation errors raised before any input reaches storage.

use crate::model::attendance::AttendanceDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected user input. Surfaced to callers as `RepoError::InvalidInput`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Student name is empty after trimming.
    EmptyName,
    /// Roll number is empty after trimming.
    EmptyRollNumber,
    /// Roll number contains characters that cannot round-trip through exports.
    InvalidRollNumber(String),
    /// Text field exceeds the longest value every export format can hold.
    TooLong {
        field: &'static str,
        max_chars: usize,
    },
    /// Date text is not a real calendar date in `YYYY-MM-DD` form.
    InvalidDate(String),
    /// Status text is not one of the known attendance states.
    InvalidStatus(String),
    /// Range start is later than range end.
    InvalidDateRange {
        start: AttendanceDate,
        end: AttendanceDate,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "student name cannot be empty"),
            Self::EmptyRollNumber => write!(f, "roll number cannot be empty"),
            Self::InvalidRollNumber(value) => {
                write!(f, "roll number `{value}` contains control characters")
            }
            Self::TooLong { field, max_chars } => {
                write!(f, "{field} is longer than {max_chars} characters")
            }
            Self::InvalidDate(value) => {
                write!(f, "invalid date `{value}`; expected YYYY-MM-DD")
            }
            Self::InvalidStatus(value) => {
                write!(f, "invalid attendance status `{value}`; expected present|absent")
            }
            Self::InvalidDateRange { start, end } => {
                write!(f, "date range start {start} is after end {end}")
            }
        }
    }
}

impl Error for ValidationError {}
