//! Core domain logic for the student attendance tracker.
//! This crate is the single source of truth for roster and attendance rules.

pub mod auth;
pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::{Authenticator, Credentials, StaticCredentials};
pub use config::CoreConfig;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use export::{
    export_table, ExportError, ExportFormat, ExportReceipt, ExportResult, Table,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::attendance::{
    AttendanceDate, AttendanceRecord, AttendanceStatus, DateRange, MarkOutcome,
};
pub use model::student::{NewStudent, Student, StudentId, StudentUpdate};
pub use model::validation::ValidationError;
pub use repo::attendance_repo::{AttendanceQuery, AttendanceRepository, SqliteAttendanceRepository};
pub use repo::student_repo::{SqliteStudentRepository, StudentListQuery, StudentRepository};
pub use repo::{MissingEntity, RepoError, RepoResult};
pub use service::attendance_service::{
    AttendanceService, ClassMarkRequest, ClassMarkSummary, MarkedEntry,
};
pub use service::report_service::{
    AttendanceDetailRow, DateEntryStatus, DateReport, ReportService, StudentReport, SummaryReport,
};
pub use service::student_service::StudentService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
