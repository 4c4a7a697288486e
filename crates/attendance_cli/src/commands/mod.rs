//! CLI command implementations.
//!
//! Commands parse arguments, call core services and render results. They
//! hold no attendance rules of their own.

pub mod attendance;
pub mod export;
pub mod report;
pub mod student;

use crate::output::OutputFormat;
use anyhow::{bail, Result};
use attendance_core::{
    AttendanceDate, AttendanceService, DateRange, ReportService, SqliteAttendanceRepository,
    SqliteStudentRepository, StudentService,
};
use rusqlite::Connection;

/// Shared context for all commands.
pub struct Context {
    pub conn: Connection,
    pub format: OutputFormat,
    pub quiet: bool,
}

pub type SqliteAttendanceService<'conn> =
    AttendanceService<SqliteStudentRepository<'conn>, SqliteAttendanceRepository<'conn>>;
pub type SqliteReportService<'conn> =
    ReportService<SqliteStudentRepository<'conn>, SqliteAttendanceRepository<'conn>>;

impl Context {
    pub fn students(&self) -> Result<StudentService<SqliteStudentRepository<'_>>> {
        Ok(StudentService::new(SqliteStudentRepository::try_new(
            &self.conn,
        )?))
    }

    pub fn attendance(&self) -> Result<SqliteAttendanceService<'_>> {
        Ok(AttendanceService::new(
            SqliteStudentRepository::try_new(&self.conn)?,
            SqliteAttendanceRepository::try_new(&self.conn)?,
        ))
    }

    pub fn reports(&self) -> Result<SqliteReportService<'_>> {
        Ok(ReportService::new(
            SqliteStudentRepository::try_new(&self.conn)?,
            SqliteAttendanceRepository::try_new(&self.conn)?,
        ))
    }
}

/// Parses `YYYY-MM-DD`, defaulting to today.
pub fn date_or_today(value: Option<&str>) -> Result<AttendanceDate> {
    match value {
        Some(text) => Ok(AttendanceDate::parse(text)?),
        None => Ok(AttendanceDate::today()),
    }
}

/// Builds an inclusive range; both ends or neither must be given.
pub fn optional_range(from: Option<&str>, to: Option<&str>) -> Result<Option<DateRange>> {
    match (from, to) {
        (None, None) => Ok(None),
        (Some(from), Some(to)) => Ok(Some(DateRange::new(
            AttendanceDate::parse(from)?,
            AttendanceDate::parse(to)?,
        )?)),
        _ => bail!("--from and --to must be given together"),
    }
}

#[cfg(test)]
mod tests {
    use super::optional_range;

    #[test]
    fn optional_range_requires_both_ends() {
        assert!(optional_range(None, None).unwrap().is_none());
        assert!(optional_range(Some("2024-01-01"), None).is_err());
        assert!(optional_range(Some("2024-02-01"), Some("2024-01-01")).is_err());

        let range = optional_range(Some("2024-01-01"), Some("2024-01-31"))
            .unwrap()
            .unwrap();
        assert_eq!(range.start().to_string(), "2024-01-01");
        assert_eq!(range.end().to_string(), "2024-01-31");
    }
}
