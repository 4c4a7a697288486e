//! Attendance marking engine.
//!
//! # Responsibility
//! - Translate "mark student X on date D" requests into idempotent upserts.
//! - Provide class-wide marking: everyone present, listed absentees absent.
//! - Provide the single-record correction workflow.
//!
//! # Invariants
//! - Marking the same status twice is observably a no-op; a different status
//!   overwrites.
//! - Any well-formed date is accepted, past or future.
//! - Class marking writes the whole roster in one transaction or nothing.
//! - Repository errors propagate unchanged.

use crate::model::attendance::{AttendanceDate, AttendanceStatus, DateRange, MarkOutcome};
use crate::model::student::StudentId;
use crate::repo::attendance_repo::{AttendanceQuery, AttendanceRepository};
use crate::repo::student_repo::{StudentListQuery, StudentRepository};
use crate::repo::{RepoError, RepoResult};
use log::info;
use std::collections::{BTreeMap, BTreeSet};

/// Request to mark a whole roster for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMarkRequest {
    pub date: AttendanceDate,
    /// Restrict the roster to one section. `None` marks every student.
    pub section: Option<String>,
    /// Students to mark absent; everyone else in the roster is present.
    pub absentees: Vec<StudentId>,
}

/// Result of a class-wide mark, ordered by student id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMarkSummary {
    pub date: AttendanceDate,
    pub present: usize,
    pub absent: usize,
    pub outcomes: Vec<(StudentId, AttendanceStatus, MarkOutcome)>,
}

/// One applied single-student mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkedEntry {
    pub student_id: StudentId,
    pub date: AttendanceDate,
    pub status: AttendanceStatus,
    pub outcome: MarkOutcome,
}

/// Marking engine over student and attendance repositories.
pub struct AttendanceService<S: StudentRepository, A: AttendanceRepository> {
    students: S,
    attendance: A,
}

impl<S: StudentRepository, A: AttendanceRepository> AttendanceService<S, A> {
    pub fn new(students: S, attendance: A) -> Self {
        Self {
            students,
            attendance,
        }
    }

    /// Marks one student on one date.
    pub fn mark_attendance(
        &self,
        student_id: StudentId,
        date: AttendanceDate,
        status: AttendanceStatus,
    ) -> RepoResult<MarkOutcome> {
        self.attendance.upsert_attendance(student_id, date, status)
    }

    /// Marks one student from raw text input. A missing date means today.
    ///
    /// Malformed date or status text fails with `InvalidInput` before storage
    /// is touched.
    pub fn mark_from_input(
        &self,
        student_id: StudentId,
        date: Option<&str>,
        status: &str,
    ) -> RepoResult<MarkedEntry> {
        let date = match date {
            Some(text) => AttendanceDate::parse(text)?,
            None => AttendanceDate::today(),
        };
        let status = AttendanceStatus::parse(status)?;
        let outcome = self.mark_attendance(student_id, date, status)?;
        Ok(MarkedEntry {
            student_id,
            date,
            status,
            outcome,
        })
    }

    /// Marks every roster student present, then the absentees absent.
    ///
    /// An absentee that is not in the selected roster fails with `NotFound`
    /// and nothing is written.
    pub fn mark_class(&self, request: &ClassMarkRequest) -> RepoResult<ClassMarkSummary> {
        let roster = self
            .students
            .list_students(&StudentListQuery::roster(request.section.as_deref()))?;
        let roster_ids: BTreeSet<StudentId> = roster.iter().map(|student| student.id).collect();

        let absentees: BTreeSet<StudentId> = request.absentees.iter().copied().collect();
        if let Some(unknown) = absentees
            .iter()
            .copied()
            .find(|id| !roster_ids.contains(id))
        {
            return Err(RepoError::student_not_found(unknown));
        }

        let entries: Vec<(StudentId, AttendanceStatus)> = roster
            .iter()
            .map(|student| {
                let status = if absentees.contains(&student.id) {
                    AttendanceStatus::Absent
                } else {
                    AttendanceStatus::Present
                };
                (student.id, status)
            })
            .collect();

        let outcomes = self
            .attendance
            .upsert_attendance_batch(request.date, &entries)?;

        let absent = absentees.len();
        let summary = ClassMarkSummary {
            date: request.date,
            present: entries.len() - absent,
            absent,
            outcomes: entries
                .into_iter()
                .zip(outcomes)
                .map(|((id, status), outcome)| (id, status, outcome))
                .collect(),
        };

        info!(
            "event=attendance_mark_class module=service status=ok date={} roster={} present={} absent={}",
            summary.date,
            summary.outcomes.len(),
            summary.present,
            summary.absent
        );
        Ok(summary)
    }

    /// Removes one record. Fails with `NotFound` when nothing was marked.
    pub fn clear_attendance(&self, student_id: StudentId, date: AttendanceDate) -> RepoResult<()> {
        self.attendance.delete_attendance(student_id, date)?;
        info!(
            "event=attendance_clear module=service status=ok student_id={student_id} date={date}"
        );
        Ok(())
    }

    /// Current status per student for one date, for pre-filling a roster.
    pub fn attendance_for_date(
        &self,
        date: AttendanceDate,
    ) -> RepoResult<BTreeMap<StudentId, AttendanceStatus>> {
        let records = self
            .attendance
            .query_attendance(&AttendanceQuery::for_range(DateRange::single(date)))?;
        Ok(records
            .into_iter()
            .map(|record| (record.student_id, record.status))
            .collect())
    }
}
