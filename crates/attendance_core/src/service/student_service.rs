//! Student use-case service.
//!
//! # Responsibility
//! - Provide stable student CRUD entry points for UI collaborators.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Errors are propagated unchanged.

use crate::model::student::{NewStudent, Student, StudentId, StudentUpdate};
use crate::repo::student_repo::{StudentListQuery, StudentRepository};
use crate::repo::RepoResult;

/// Use-case service wrapper for student CRUD operations.
pub struct StudentService<S: StudentRepository> {
    repo: S,
}

impl<S: StudentRepository> StudentService<S> {
    pub fn new(repo: S) -> Self {
        Self { repo }
    }

    /// Adds a student. Fails with `DuplicateIdentifier` or `InvalidInput`.
    pub fn add_student(
        &self,
        name: impl Into<String>,
        roll_number: impl Into<String>,
        section: Option<String>,
    ) -> RepoResult<Student> {
        self.repo
            .add_student(&NewStudent::new(name, roll_number, section))
    }

    /// Edits name and/or section. Roll number and id stay fixed.
    pub fn update_student(&self, id: StudentId, update: &StudentUpdate) -> RepoResult<Student> {
        self.repo.update_student(id, update)
    }

    /// Deletes a student together with every attendance record it owns.
    pub fn delete_student(&self, id: StudentId) -> RepoResult<()> {
        self.repo.delete_student(id)
    }

    pub fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        self.repo.get_student(id)
    }

    pub fn list_students(&self, query: &StudentListQuery) -> RepoResult<Vec<Student>> {
        self.repo.list_students(query)
    }
}
