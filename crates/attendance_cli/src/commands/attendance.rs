//! Attendance marking commands.

use anyhow::Result;
use attendance_core::{AttendanceStatus, ClassMarkRequest, MarkOutcome, StudentId};
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use crate::commands::{date_or_today, Context};
use crate::output::{print_output, print_single, print_success};

#[derive(Subcommand)]
pub enum AttendanceAction {
    /// Mark one student present or absent
    Mark {
        /// Student id
        student_id: StudentId,

        /// present|absent (or p|a)
        status: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Mark a whole class: everyone present except the listed absentees
    Class {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,

        /// Only students in this section
        #[arg(short, long)]
        section: Option<String>,

        /// Comma-separated ids of absent students
        #[arg(short, long, value_delimiter = ',')]
        absent: Vec<StudentId>,
    },

    /// Remove a mark entered by mistake
    Clear {
        /// Student id
        student_id: StudentId,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show marks stored for one date
    Show {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
}

#[derive(Debug, Serialize, Tabled)]
pub struct MarkRow {
    #[tabled(rename = "Student")]
    pub student_id: StudentId,
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Result")]
    pub outcome: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct StoredMarkRow {
    #[tabled(rename = "Student")]
    pub student_id: StudentId,
    #[tabled(rename = "Status")]
    pub status: String,
}

pub fn execute(ctx: &Context, action: AttendanceAction) -> Result<()> {
    let service = ctx.attendance()?;

    match action {
        AttendanceAction::Mark {
            student_id,
            status,
            date,
        } => {
            let entry = service.mark_from_input(student_id, date.as_deref(), &status)?;
            print_single(
                &mark_row(
                    entry.student_id,
                    &entry.date.to_string(),
                    entry.status,
                    entry.outcome,
                ),
                ctx.format,
            )
        }
        AttendanceAction::Class {
            date,
            section,
            absent,
        } => {
            let date = date_or_today(date.as_deref())?;
            let summary = service.mark_class(&ClassMarkRequest {
                date,
                section,
                absentees: absent,
            })?;
            let date_text = summary.date.to_string();
            let rows: Vec<MarkRow> = summary
                .outcomes
                .iter()
                .map(|(student_id, status, outcome)| {
                    mark_row(*student_id, &date_text, *status, *outcome)
                })
                .collect();
            print_output(&rows, ctx.format)?;
            print_success(
                &format!(
                    "Marked {date_text}: {} present, {} absent",
                    summary.present, summary.absent
                ),
                ctx.format,
                ctx.quiet,
            );
            Ok(())
        }
        AttendanceAction::Clear { student_id, date } => {
            let date = date_or_today(date.as_deref())?;
            service.clear_attendance(student_id, date)?;
            print_success(
                &format!("Cleared attendance for student {student_id} on {date}"),
                ctx.format,
                ctx.quiet,
            );
            Ok(())
        }
        AttendanceAction::Show { date } => {
            let date = date_or_today(date.as_deref())?;
            let rows: Vec<StoredMarkRow> = service
                .attendance_for_date(date)?
                .into_iter()
                .map(|(student_id, status)| StoredMarkRow {
                    student_id,
                    status: status.label().to_string(),
                })
                .collect();
            print_output(&rows, ctx.format)
        }
    }
}

fn mark_row(
    student_id: StudentId,
    date: &str,
    status: AttendanceStatus,
    outcome: MarkOutcome,
) -> MarkRow {
    MarkRow {
        student_id,
        date: date.to_string(),
        status: status.label().to_string(),
        outcome: outcome.as_str().to_string(),
    }
}
