//! Attendance repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide upsert/delete/query APIs over the `attendance` table.
//! - Report the observable effect of each upsert (`MarkOutcome`).
//!
//! # Invariants
//! - At most one row per `(student_id, date)`; writes are upserts.
//! - Writes referencing an unknown student fail with `NotFound` and leave
//!   storage unchanged.
//! - A batch upsert is all-or-nothing.
//! - Query results are ordered by `date ASC, student_id ASC`.

use crate::model::attendance::{
    AttendanceDate, AttendanceRecord, AttendanceStatus, DateRange, MarkOutcome,
};
use crate::model::student::StudentId;
use crate::repo::{ensure_connection_ready, MissingEntity, RepoError, RepoResult};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction, TransactionBehavior,
};

const ATTENDANCE_COLUMNS: &[&str] = &["student_id", "date", "status", "updated_at"];
const STUDENT_KEY_COLUMNS: &[&str] = &["id"];

/// Filter for attendance queries. Both fields are optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceQuery {
    pub student_id: Option<StudentId>,
    pub range: Option<DateRange>,
}

impl AttendanceQuery {
    pub fn for_student(student_id: StudentId) -> Self {
        Self {
            student_id: Some(student_id),
            range: None,
        }
    }

    pub fn for_range(range: DateRange) -> Self {
        Self {
            student_id: None,
            range: Some(range),
        }
    }
}

/// Repository interface for attendance persistence.
pub trait AttendanceRepository {
    /// Inserts or overwrites the record for `(student_id, date)`.
    fn upsert_attendance(
        &self,
        student_id: StudentId,
        date: AttendanceDate,
        status: AttendanceStatus,
    ) -> RepoResult<MarkOutcome>;
    /// Upserts many students for one date in a single transaction.
    ///
    /// Outcomes are returned in input order.
    fn upsert_attendance_batch(
        &self,
        date: AttendanceDate,
        entries: &[(StudentId, AttendanceStatus)],
    ) -> RepoResult<Vec<MarkOutcome>>;
    /// Removes one record (correction workflow).
    fn delete_attendance(&self, student_id: StudentId, date: AttendanceDate) -> RepoResult<()>;
    /// Lists records ordered by `date ASC, student_id ASC`.
    fn query_attendance(&self, query: &AttendanceQuery) -> RepoResult<Vec<AttendanceRecord>>;
}

/// SQLite-backed attendance repository.
pub struct SqliteAttendanceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAttendanceRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[
                ("students", STUDENT_KEY_COLUMNS),
                ("attendance", ATTENDANCE_COLUMNS),
            ],
        )?;
        Ok(Self { conn })
    }
}

impl AttendanceRepository for SqliteAttendanceRepository<'_> {
    fn upsert_attendance(
        &self,
        student_id: StudentId,
        date: AttendanceDate,
        status: AttendanceStatus,
    ) -> RepoResult<MarkOutcome> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !student_exists(&tx, student_id)? {
            return Err(RepoError::student_not_found(student_id));
        }
        let outcome = upsert_in_tx(&tx, student_id, date, status)?;
        tx.commit()?;

        debug!(
            "event=attendance_upsert module=repo status=ok student_id={student_id} date={date} outcome={}",
            outcome.as_str()
        );
        Ok(outcome)
    }

    fn upsert_attendance_batch(
        &self,
        date: AttendanceDate,
        entries: &[(StudentId, AttendanceStatus)],
    ) -> RepoResult<Vec<MarkOutcome>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for (student_id, _) in entries {
            if !student_exists(&tx, *student_id)? {
                return Err(RepoError::student_not_found(*student_id));
            }
        }

        let mut outcomes = Vec::with_capacity(entries.len());
        for (student_id, status) in entries {
            outcomes.push(upsert_in_tx(&tx, *student_id, date, *status)?);
        }
        tx.commit()?;

        debug!(
            "event=attendance_upsert_batch module=repo status=ok date={date} entries={}",
            entries.len()
        );
        Ok(outcomes)
    }

    fn delete_attendance(&self, student_id: StudentId, date: AttendanceDate) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM attendance WHERE student_id = ?1 AND date = ?2;",
            params![student_id, date.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(MissingEntity::Attendance {
                student_id,
                date,
            }));
        }
        Ok(())
    }

    fn query_attendance(&self, query: &AttendanceQuery) -> RepoResult<Vec<AttendanceRecord>> {
        let mut sql = String::from(
            "SELECT
                student_id,
                date,
                status
             FROM attendance
             WHERE 1 = 1",
        );
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(student_id) = query.student_id {
            sql.push_str(" AND student_id = ?");
            bind_values.push(Value::Integer(student_id));
        }

        if let Some(range) = query.range {
            sql.push_str(" AND date >= ? AND date <= ?");
            bind_values.push(Value::Text(range.start().to_string()));
            bind_values.push(Value::Text(range.end().to_string()));
        }

        sql.push_str(" ORDER BY date ASC, student_id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_attendance_row(row)?);
        }

        Ok(records)
    }
}

fn upsert_in_tx(
    tx: &Transaction<'_>,
    student_id: StudentId,
    date: AttendanceDate,
    status: AttendanceStatus,
) -> RepoResult<MarkOutcome> {
    let date_text = date.to_string();
    let existing: Option<String> = tx
        .query_row(
            "SELECT status FROM attendance WHERE student_id = ?1 AND date = ?2;",
            params![student_id, date_text.as_str()],
            |row| row.get(0),
        )
        .optional()?;

    let outcome = match existing.as_deref() {
        None => MarkOutcome::Created,
        Some(current) if current == status.as_db_str() => return Ok(MarkOutcome::Unchanged),
        Some(_) => MarkOutcome::Updated,
    };

    tx.execute(
        "INSERT INTO attendance (student_id, date, status)
         VALUES (?1, ?2, ?3)
         ON CONFLICT (student_id, date) DO UPDATE SET
            status = excluded.status,
            updated_at = (strftime('%s', 'now') * 1000);",
        params![student_id, date_text.as_str(), status.as_db_str()],
    )?;

    Ok(outcome)
}

fn student_exists(tx: &Transaction<'_>, student_id: StudentId) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM students WHERE id = ?1);",
        [student_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_attendance_row(row: &Row<'_>) -> RepoResult<AttendanceRecord> {
    let date_text: String = row.get("date")?;
    let date = AttendanceDate::parse(&date_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid date `{date_text}` in attendance.date"))
    })?;

    let status_text: String = row.get("status")?;
    let status = AttendanceStatus::from_db_str(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in attendance.status"
        ))
    })?;

    Ok(AttendanceRecord {
        student_id: row.get("student_id")?,
        date,
        status,
    })
}
