//! Domain model for students and daily attendance.
//!
//! # Responsibility
//! - Define canonical data structures used by storage, engines and export.
//! - Own input normalization and validation rules for every write path.
//!
//! # Invariants
//! - A `Student` is identified by a storage-assigned `StudentId` that never
//!   changes and is never reused.
//! - An `AttendanceDate` always holds a real calendar date whose text form is
//!   ISO `YYYY-MM-DD`.
//! - At most one `AttendanceRecord` exists per `(student_id, date)`.

pub mod attendance;
pub mod student;
pub mod validation;
