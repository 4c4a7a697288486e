//! Student roster commands.

use anyhow::{anyhow, Result};
use attendance_core::{Student, StudentId, StudentListQuery, StudentUpdate};
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use crate::commands::Context;
use crate::output::{optional_cell, print_output, print_single, print_success};

#[derive(Subcommand)]
pub enum StudentAction {
    /// Add a student
    Add {
        /// Full name
        #[arg(short, long)]
        name: String,

        /// Roll number, unique across all students
        #[arg(short, long)]
        roll: String,

        /// Class or section label
        #[arg(short, long)]
        section: Option<String>,
    },

    /// List students ordered by id
    List {
        /// Only students in this section
        #[arg(short, long)]
        section: Option<String>,

        /// Case-insensitive name filter
        #[arg(short, long)]
        name: Option<String>,

        /// Maximum number of students to show
        #[arg(short, long)]
        limit: Option<u32>,

        /// Number of students to skip
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// Show one student
    Show {
        /// Student id
        id: StudentId,
    },

    /// Edit name or section (roll number is fixed)
    Update {
        /// Student id
        id: StudentId,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New section
        #[arg(short, long, conflicts_with = "clear_section")]
        section: Option<String>,

        /// Remove the section
        #[arg(long)]
        clear_section: bool,
    },

    /// Delete a student and all of their attendance records
    Delete {
        /// Student id
        id: StudentId,
    },
}

/// Student row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct StudentRow {
    #[tabled(rename = "ID")]
    pub id: StudentId,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Roll")]
    pub roll_number: String,
    #[tabled(rename = "Section")]
    pub section: String,
}

impl From<Student> for StudentRow {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            section: optional_cell(student.section.as_deref()),
            name: student.name,
            roll_number: student.roll_number,
        }
    }
}

pub fn execute(ctx: &Context, action: StudentAction) -> Result<()> {
    let students = ctx.students()?;

    match action {
        StudentAction::Add {
            name,
            roll,
            section,
        } => {
            let student = students.add_student(name, roll, section)?;
            print_success(
                &format!("Added student {} ({})", student.id, student.roll_number),
                ctx.format,
                ctx.quiet,
            );
            print_single(&StudentRow::from(student), ctx.format)
        }
        StudentAction::List {
            section,
            name,
            limit,
            offset,
        } => {
            let rows: Vec<StudentRow> = students
                .list_students(&StudentListQuery {
                    section,
                    name_contains: name,
                    limit,
                    offset,
                })?
                .into_iter()
                .map(StudentRow::from)
                .collect();
            print_output(&rows, ctx.format)
        }
        StudentAction::Show { id } => {
            let student = students
                .get_student(id)?
                .ok_or_else(|| anyhow!("student {id} not found"))?;
            print_single(&StudentRow::from(student), ctx.format)
        }
        StudentAction::Update {
            id,
            name,
            section,
            clear_section,
        } => {
            let section = if clear_section {
                Some(None)
            } else {
                section.map(Some)
            };
            let student = students.update_student(id, &StudentUpdate { name, section })?;
            print_success(&format!("Updated student {id}"), ctx.format, ctx.quiet);
            print_single(&StudentRow::from(student), ctx.format)
        }
        StudentAction::Delete { id } => {
            students.delete_student(id)?;
            print_success(
                &format!("Deleted student {id} and their attendance records"),
                ctx.format,
                ctx.quiet,
            );
            Ok(())
        }
    }
}
