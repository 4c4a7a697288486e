//! Report commands.

use anyhow::Result;
use attendance_core::{AttendanceDate, DateRange, StudentId};
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use crate::commands::{date_or_today, optional_range, Context};
use crate::output::{optional_cell, print_output, print_success};

#[derive(Subcommand)]
pub enum ReportAction {
    /// Attendance history of one student
    Student {
        /// Student id
        id: StudentId,

        /// Range start (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Range end (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<String>,
    },

    /// Every student's status on one date
    Date {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,

        /// Only students in this section
        #[arg(short, long)]
        section: Option<String>,
    },

    /// Attendance percentage per student over a date range
    Summary {
        /// Range start (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// Range end (YYYY-MM-DD)
        #[arg(long)]
        to: String,

        /// Only students in this section
        #[arg(short, long)]
        section: Option<String>,
    },
}

#[derive(Debug, Serialize, Tabled)]
pub struct HistoryRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct RosterStatusRow {
    #[tabled(rename = "ID")]
    pub id: StudentId,
    #[tabled(rename = "Roll")]
    pub roll_number: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct SummaryRow {
    #[tabled(rename = "ID")]
    pub id: StudentId,
    #[tabled(rename = "Roll")]
    pub roll_number: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Present")]
    pub present: u32,
    #[tabled(rename = "Absent")]
    pub absent: u32,
    #[tabled(rename = "Attendance %")]
    pub percentage: String,
}

pub fn execute(ctx: &Context, action: ReportAction) -> Result<()> {
    let reports = ctx.reports()?;

    match action {
        ReportAction::Student { id, from, to } => {
            let range = optional_range(from.as_deref(), to.as_deref())?;
            let report = reports.student_report(id, range)?;
            let rows: Vec<HistoryRow> = report
                .entries
                .iter()
                .map(|entry| HistoryRow {
                    date: entry.date.to_string(),
                    status: entry.status.label().to_string(),
                })
                .collect();
            print_output(&rows, ctx.format)?;
            print_success(
                &format!(
                    "{} ({}): {} present, {} absent, attendance {}",
                    report.student.name,
                    report.student.roll_number,
                    report.present_days,
                    report.absent_days,
                    percentage_cell(report.percentage())
                ),
                ctx.format,
                ctx.quiet,
            );
            Ok(())
        }
        ReportAction::Date { date, section } => {
            let date = date_or_today(date.as_deref())?;
            let report = reports.date_report(date, section.as_deref())?;
            let rows: Vec<RosterStatusRow> = report
                .rows
                .into_iter()
                .map(|row| RosterStatusRow {
                    id: row.student.id,
                    roll_number: row.student.roll_number,
                    name: row.student.name,
                    status: row.status.label().to_string(),
                })
                .collect();
            print_output(&rows, ctx.format)
        }
        ReportAction::Summary { from, to, section } => {
            let range = DateRange::new(AttendanceDate::parse(&from)?, AttendanceDate::parse(&to)?)?;
            let report = reports.summary_report(range, section.as_deref())?;
            let rows: Vec<SummaryRow> = report
                .rows
                .into_iter()
                .map(|row| SummaryRow {
                    id: row.student.id,
                    roll_number: row.student.roll_number,
                    name: row.student.name,
                    present: row.present_days,
                    absent: row.absent_days,
                    percentage: percentage_cell(row.percentage),
                })
                .collect();
            print_output(&rows, ctx.format)
        }
    }
}

fn percentage_cell(percentage: Option<f64>) -> String {
    percentage.map_or_else(|| optional_cell(None), |value| format!("{value:.2}%"))
}

#[cfg(test)]
mod tests {
    use super::percentage_cell;

    #[test]
    fn percentage_cell_formats_two_decimals() {
        assert_eq!(percentage_cell(Some(100.0)), "100.00%");
        assert_eq!(percentage_cell(Some(33.33)), "33.33%");
        assert_eq!(percentage_cell(None), "-");
    }
}
