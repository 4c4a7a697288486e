//! Student repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `students` table.
//! - Own the cascade that removes a student's attendance rows.
//!
//! # Invariants
//! - Write paths normalize input (`NewStudent::normalized`) before SQL.
//! - Roll-number uniqueness is enforced by the schema and reported as
//!   `DuplicateIdentifier`.
//! - Listing is deterministic: `id ASC`.
//! - `delete_student` removes the student and all of its attendance rows in
//!   one transaction, or nothing.

use crate::model::student::{NewStudent, Student, StudentId, StudentUpdate};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use log::{debug, info, warn};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    roll_number,
    section
FROM students";

const STUDENT_COLUMNS: &[&str] = &["id", "name", "roll_number", "section", "updated_at"];

/// Query options for listing students.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentListQuery {
    /// Exact section match.
    pub section: Option<String>,
    /// Case-insensitive substring match on name, folding non-ASCII letters too.
    pub name_contains: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl StudentListQuery {
    /// Roster for one section, or every student when `section` is `None`.
    pub fn roster(section: Option<&str>) -> Self {
        Self {
            section: section.map(str::to_string),
            ..Self::default()
        }
    }
}

/// Repository interface for student CRUD operations.
pub trait StudentRepository {
    fn add_student(&self, student: &NewStudent) -> RepoResult<Student>;
    fn update_student(&self, id: StudentId, update: &StudentUpdate) -> RepoResult<Student>;
    fn delete_student(&self, id: StudentId) -> RepoResult<()>;
    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>>;
    fn list_students(&self, query: &StudentListQuery) -> RepoResult<Vec<Student>>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[("students", STUDENT_COLUMNS)])?;
        Ok(Self { conn })
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn add_student(&self, student: &NewStudent) -> RepoResult<Student> {
        let student = student.normalized()?;

        let inserted = self.conn.execute(
            "INSERT INTO students (name, roll_number, section) VALUES (?1, ?2, ?3);",
            params![
                student.name.as_str(),
                student.roll_number.as_str(),
                student.section.as_deref(),
            ],
        );
        if let Err(err) = inserted {
            if is_unique_violation(&err) {
                warn!("event=student_add module=repo status=rejected error_code=duplicate_identifier");
                return Err(RepoError::DuplicateIdentifier(student.roll_number));
            }
            return Err(err.into());
        }

        let id = self.conn.last_insert_rowid();
        debug!("event=student_add module=repo status=ok student_id={id}");
        Ok(Student {
            id,
            name: student.name,
            roll_number: student.roll_number,
            section: student.section,
        })
    }

    fn update_student(&self, id: StudentId, update: &StudentUpdate) -> RepoResult<Student> {
        let update = update.normalized()?;

        if !update.is_empty() {
            let changed = self.conn.execute(
                "UPDATE students
                 SET
                    name = COALESCE(?2, name),
                    section = CASE WHEN ?3 = 1 THEN ?4 ELSE section END,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?1;",
                params![
                    id,
                    update.name.as_deref(),
                    bool_to_int(update.section.is_some()),
                    update.section.as_ref().and_then(|value| value.as_deref()),
                ],
            )?;
            if changed == 0 {
                return Err(RepoError::student_not_found(id));
            }
        }

        self.get_student(id)?
            .ok_or_else(|| RepoError::student_not_found(id))
    }

    fn delete_student(&self, id: StudentId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let removed_records = tx.execute("DELETE FROM attendance WHERE student_id = ?1;", [id])?;
        let changed = tx.execute("DELETE FROM students WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::student_not_found(id));
        }
        tx.commit()?;

        info!(
            "event=student_delete module=repo status=ok student_id={id} attendance_removed={removed_records}"
        );
        Ok(())
    }

    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_student_row(row)?));
        }
        Ok(None)
    }

    fn list_students(&self, query: &StudentListQuery) -> RepoResult<Vec<Student>> {
        let mut sql = format!("{STUDENT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(section) = query.section.as_deref() {
            sql.push_str(" AND section = ?");
            bind_values.push(Value::Text(section.trim().to_string()));
        }

        if let Some(needle) = query
            .name_contains
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            sql.push_str(" AND instr(unicode_lower(name), ?) > 0");
            bind_values.push(Value::Text(needle.to_lowercase()));
        }

        sql.push_str(" ORDER BY id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }

        Ok(students)
    }
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let id: StudentId = row.get("id")?;
    let name: String = row.get("name")?;
    if name.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty name for student {id} in students.name"
        )));
    }

    Ok(Student {
        id,
        name,
        roll_number: row.get("roll_number")?,
        section: row.get("section")?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
