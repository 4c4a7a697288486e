//! Read-only attendance reports.
//!
//! # Responsibility
//! - Compute by-student, by-date and summary views over stored attendance.
//! - Build the joined attendance detail view used by exports.
//!
//! # Invariants
//! - Reports hold no state; each call re-reads storage.
//! - Row order is deterministic: by-student rows by date, by-date and summary
//!   rows by student id, detail rows by date then student id.
//! - Unmarked days never count as absent; they are excluded from percentage
//!   denominators and shown as `NotMarked` in by-date reports.

use crate::model::attendance::{AttendanceDate, AttendanceStatus, DateRange};
use crate::model::student::{Student, StudentId};
use crate::repo::attendance_repo::{AttendanceQuery, AttendanceRepository};
use crate::repo::student_repo::{StudentListQuery, StudentRepository};
use crate::repo::{RepoError, RepoResult};
use std::collections::{BTreeMap, HashMap};

/// One dated entry in a by-student report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentReportEntry {
    pub date: AttendanceDate,
    pub status: AttendanceStatus,
}

/// Attendance history for one student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentReport {
    pub student: Student,
    pub range: Option<DateRange>,
    pub entries: Vec<StudentReportEntry>,
    pub present_days: u32,
    pub absent_days: u32,
}

impl StudentReport {
    pub fn percentage(&self) -> Option<f64> {
        attendance_percentage(self.present_days, self.absent_days)
    }
}

/// Status of one roster student on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateEntryStatus {
    Marked(AttendanceStatus),
    NotMarked,
}

impl DateEntryStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Marked(status) => status.label(),
            Self::NotMarked => "Not Marked",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateReportRow {
    pub student: Student,
    pub status: DateEntryStatus,
}

/// Roster status for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateReport {
    pub date: AttendanceDate,
    pub section: Option<String>,
    pub rows: Vec<DateReportRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub student: Student,
    pub present_days: u32,
    pub absent_days: u32,
    /// `None` when the student has no records in range.
    pub percentage: Option<f64>,
}

/// Per-student attendance percentages over a date range.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    pub range: DateRange,
    pub section: Option<String>,
    pub rows: Vec<SummaryRow>,
}

/// Attendance record joined with its student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceDetailRow {
    pub date: AttendanceDate,
    pub student: Student,
    pub status: AttendanceStatus,
}

/// Report engine over student and attendance repositories.
pub struct ReportService<S: StudentRepository, A: AttendanceRepository> {
    students: S,
    attendance: A,
}

impl<S: StudentRepository, A: AttendanceRepository> ReportService<S, A> {
    pub fn new(students: S, attendance: A) -> Self {
        Self {
            students,
            attendance,
        }
    }

    /// Attendance history of one student, optionally limited to a range.
    ///
    /// Fails with `NotFound` for unknown or deleted students.
    pub fn student_report(
        &self,
        student_id: StudentId,
        range: Option<DateRange>,
    ) -> RepoResult<StudentReport> {
        let student = self
            .students
            .get_student(student_id)?
            .ok_or_else(|| RepoError::student_not_found(student_id))?;

        let records = self.attendance.query_attendance(&AttendanceQuery {
            student_id: Some(student_id),
            range,
        })?;

        let mut present_days = 0;
        let mut absent_days = 0;
        let entries = records
            .into_iter()
            .map(|record| {
                match record.status {
                    AttendanceStatus::Present => present_days += 1,
                    AttendanceStatus::Absent => absent_days += 1,
                }
                StudentReportEntry {
                    date: record.date,
                    status: record.status,
                }
            })
            .collect();

        Ok(StudentReport {
            student,
            range,
            entries,
            present_days,
            absent_days,
        })
    }

    /// Every roster student with their status on `date`.
    pub fn date_report(
        &self,
        date: AttendanceDate,
        section: Option<&str>,
    ) -> RepoResult<DateReport> {
        let roster = self
            .students
            .list_students(&StudentListQuery::roster(section))?;
        let marked: HashMap<StudentId, AttendanceStatus> = self
            .attendance
            .query_attendance(&AttendanceQuery::for_range(DateRange::single(date)))?
            .into_iter()
            .map(|record| (record.student_id, record.status))
            .collect();

        let rows = roster
            .into_iter()
            .map(|student| {
                let status = marked
                    .get(&student.id)
                    .map_or(DateEntryStatus::NotMarked, |status| {
                        DateEntryStatus::Marked(*status)
                    });
                DateReportRow { student, status }
            })
            .collect();

        Ok(DateReport {
            date,
            section: section.map(str::to_string),
            rows,
        })
    }

    /// Present/absent counts and percentage per roster student over `range`.
    pub fn summary_report(
        &self,
        range: DateRange,
        section: Option<&str>,
    ) -> RepoResult<SummaryReport> {
        let roster = self
            .students
            .list_students(&StudentListQuery::roster(section))?;

        let mut counts: BTreeMap<StudentId, (u32, u32)> = BTreeMap::new();
        for record in self
            .attendance
            .query_attendance(&AttendanceQuery::for_range(range))?
        {
            let entry = counts.entry(record.student_id).or_insert((0, 0));
            match record.status {
                AttendanceStatus::Present => entry.0 += 1,
                AttendanceStatus::Absent => entry.1 += 1,
            }
        }

        let rows = roster
            .into_iter()
            .map(|student| {
                let (present_days, absent_days) =
                    counts.get(&student.id).copied().unwrap_or((0, 0));
                SummaryRow {
                    student,
                    present_days,
                    absent_days,
                    percentage: attendance_percentage(present_days, absent_days),
                }
            })
            .collect();

        Ok(SummaryReport {
            range,
            section: section.map(str::to_string),
            rows,
        })
    }

    /// Records joined with student identity, ordered by date then student id.
    pub fn attendance_detail(&self, range: Option<DateRange>) -> RepoResult<Vec<AttendanceDetailRow>> {
        let students: HashMap<StudentId, Student> = self
            .students
            .list_students(&StudentListQuery::default())?
            .into_iter()
            .map(|student| (student.id, student))
            .collect();

        self.attendance
            .query_attendance(&AttendanceQuery {
                student_id: None,
                range,
            })?
            .into_iter()
            .map(|record| {
                let student = students.get(&record.student_id).cloned().ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "attendance row references missing student {}",
                        record.student_id
                    ))
                })?;
                Ok(AttendanceDetailRow {
                    date: record.date,
                    student,
                    status: record.status,
                })
            })
            .collect()
    }
}

/// Present share of marked days as a percentage rounded to two decimals.
///
/// Returns `None` when no day was marked.
pub fn attendance_percentage(present_days: u32, absent_days: u32) -> Option<f64> {
    let marked = present_days + absent_days;
    if marked == 0 {
        return None;
    }
    let raw = f64::from(present_days) * 100.0 / f64::from(marked);
    Some((raw * 100.0).round() / 100.0)
}
