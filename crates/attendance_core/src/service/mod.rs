//! Core use-case services (the attendance and report engines).
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep UI collaborators decoupled from storage details.
//!
//! # Invariants
//! - Services hold no persistent state of their own.
//! - Services never swallow or reinterpret repository errors.

pub mod attendance_service;
pub mod report_service;
pub mod student_service;
