//! Export command: writes a table to a CSV or xlsx file.

use anyhow::{anyhow, Context as _, Result};
use attendance_core::export::sources::{
    attendance_detail_table, attendance_table, date_report_table, student_report_table,
    students_table, summary_report_table,
};
use attendance_core::{
    export_table, AttendanceQuery, AttendanceRepository, ExportFormat, SqliteAttendanceRepository,
    StudentId, StudentListQuery, Table,
};
use clap::{Args, ValueEnum};
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;

use crate::commands::{date_or_today, optional_range, Context};
use crate::output::print_single;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportTarget {
    /// Raw student table
    Students,
    /// Raw attendance table
    Attendance,
    /// Attendance joined with student details
    Detail,
    /// One student's history (needs --student)
    Student,
    /// Roster status on one date (--date, defaults to today)
    Date,
    /// Per-student percentages (needs --from and --to)
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl From<FileFormat> for ExportFormat {
    fn from(value: FileFormat) -> Self {
        match value {
            FileFormat::Csv => ExportFormat::Csv,
            FileFormat::Xlsx => ExportFormat::Xlsx,
        }
    }
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Table to export
    #[arg(value_enum)]
    pub target: ExportTarget,

    /// Destination file (.csv or .xlsx)
    #[arg(short, long)]
    pub output: PathBuf,

    /// File format; inferred from the extension when omitted
    #[arg(long, value_enum)]
    pub file_format: Option<FileFormat>,

    /// Range start (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Range end (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Date for the `date` target (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Student id for the `student` target
    #[arg(long)]
    pub student: Option<StudentId>,

    /// Only students in this section (`date` and `summary` targets)
    #[arg(short, long)]
    pub section: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
pub struct ReceiptRow {
    #[tabled(rename = "File")]
    pub path: String,
    #[tabled(rename = "Format")]
    pub format: String,
    #[tabled(rename = "Rows")]
    pub rows: usize,
}

pub fn execute(ctx: &Context, args: ExportArgs) -> Result<()> {
    let format = match args.file_format {
        Some(format) => ExportFormat::from(format),
        None => ExportFormat::from_path(&args.output).ok_or_else(|| {
            anyhow!(
                "cannot infer export format from `{}`; use a .csv or .xlsx extension or pass --file-format",
                args.output.display()
            )
        })?,
    };

    let table = build_table(ctx, &args)?;
    let receipt = export_table(&table, format, &args.output)
        .with_context(|| format!("export of `{}` failed", table.name()))?;

    info!(
        "event=cli_export module=cli status=ok target={:?} format={} rows={}",
        args.target, receipt.format, receipt.rows_written
    );
    print_single(
        &ReceiptRow {
            path: receipt.path.display().to_string(),
            format: receipt.format.to_string(),
            rows: receipt.rows_written,
        },
        ctx.format,
    )
}

fn build_table(ctx: &Context, args: &ExportArgs) -> Result<Table> {
    let range = optional_range(args.from.as_deref(), args.to.as_deref())?;

    let table = match args.target {
        ExportTarget::Students => {
            let students = ctx.students()?.list_students(&StudentListQuery::roster(
                args.section.as_deref(),
            ))?;
            students_table(&students)?
        }
        ExportTarget::Attendance => {
            let records = SqliteAttendanceRepository::try_new(&ctx.conn)?.query_attendance(
                &AttendanceQuery {
                    student_id: args.student,
                    range,
                },
            )?;
            attendance_table(&records)?
        }
        ExportTarget::Detail => attendance_detail_table(&ctx.reports()?.attendance_detail(range)?)?,
        ExportTarget::Student => {
            let id = args
                .student
                .ok_or_else(|| anyhow!("the `student` target needs --student <ID>"))?;
            student_report_table(&ctx.reports()?.student_report(id, range)?)?
        }
        ExportTarget::Date => {
            let date = date_or_today(args.date.as_deref())?;
            date_report_table(&ctx.reports()?.date_report(date, args.section.as_deref())?)?
        }
        ExportTarget::Summary => {
            let range =
                range.ok_or_else(|| anyhow!("the `summary` target needs --from and --to"))?;
            summary_report_table(&ctx.reports()?.summary_report(range, args.section.as_deref())?)?
        }
    };
    Ok(table)
}
