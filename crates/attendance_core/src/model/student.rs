//! Student domain model.
//!
//! # Responsibility
//! - Define the persisted `Student` shape and its create/update requests.
//! - Normalize text input (trimming, blank section collapse) before storage.
//!
//! # Invariants
//! - `id` is assigned by storage and is immutable.
//! - `roll_number` is immutable after creation and unique across students.
//! - `name` is never empty.
//! - Stored text fields hold at most `MAX_TEXT_CHARS` characters, the xlsx
//!   cell limit, so every student exports to CSV and xlsx alike.

use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// Longest name, roll number or section accepted, in characters.
pub const MAX_TEXT_CHARS: usize = 32_767;

/// Storage-assigned surrogate key.
pub type StudentId = i64;

/// Persisted student identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    /// External identifier printed on class lists.
    pub roll_number: String,
    /// Optional class/section label.
    pub section: Option<String>,
}

/// Create request for a student that has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub roll_number: String,
    pub section: Option<String>,
}

impl NewStudent {
    pub fn new(
        name: impl Into<String>,
        roll_number: impl Into<String>,
        section: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            roll_number: roll_number.into(),
            section,
        }
    }

    /// Returns a trimmed copy, or the first validation failure.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: normalize_name(&self.name)?,
            roll_number: normalize_roll_number(&self.roll_number)?,
            section: normalize_section(self.section.as_deref())?,
        })
    }
}

/// Partial update for the mutable student fields.
///
/// `None` leaves a field untouched. `section: Some(None)` clears the section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub section: Option<Option<String>>,
}

impl StudentUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.section.is_none()
    }

    /// Returns a trimmed copy, or the first validation failure.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        let name = match self.name.as_deref() {
            Some(value) => Some(normalize_name(value)?),
            None => None,
        };
        let section = match self.section.as_ref() {
            Some(value) => Some(normalize_section(value.as_deref())?),
            None => None,
        };
        Ok(Self { name, section })
    }
}

pub fn normalize_name(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    check_length("name", trimmed)?;
    Ok(trimmed.to_string())
}

pub fn normalize_roll_number(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyRollNumber);
    }
    if trimmed.chars().any(char::is_control) {
        return Err(ValidationError::InvalidRollNumber(
            trimmed.escape_debug().to_string(),
        ));
    }
    check_length("roll number", trimmed)?;
    Ok(trimmed.to_string())
}

/// Blank sections are stored as absent.
pub fn normalize_section(value: Option<&str>) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        Some(section) => {
            check_length("section", section)?;
            Ok(Some(section.to_string()))
        }
        None => Ok(None),
    }
}

fn check_length(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_TEXT_CHARS {
        return Err(ValidationError::TooLong {
            field,
            max_chars: MAX_TEXT_CHARS,
        });
    }
    Ok(())
}
