//! Builders that turn stored rows and reports into exportable tables.
//!
//! Column order here is the column order of the written file.

use super::table::{Cell, Column, ColumnType, Table};
use super::ExportResult;
use crate::model::attendance::AttendanceRecord;
use crate::model::student::Student;
use crate::service::report_service::{
    AttendanceDetailRow, DateReport, StudentReport, SummaryReport,
};

pub const STUDENTS_TABLE: &str = "students";
pub const ATTENDANCE_TABLE: &str = "attendance";
pub const ATTENDANCE_DETAIL_TABLE: &str = "attendance_detail";

fn student_columns() -> Vec<Column> {
    vec![
        Column::new("id", ColumnType::Integer),
        Column::new("name", ColumnType::Text),
        Column::new("roll_number", ColumnType::Text),
        Column::new("section", ColumnType::Text),
    ]
}

fn student_cells(student: &Student) -> Vec<Cell> {
    vec![
        Cell::Integer(student.id),
        Cell::text(student.name.as_str()),
        Cell::text(student.roll_number.as_str()),
        Cell::optional_text(student.section.as_deref()),
    ]
}

/// Raw student table.
pub fn students_table(students: &[Student]) -> ExportResult<Table> {
    let mut table = Table::new(STUDENTS_TABLE, student_columns());
    for student in students {
        table.push_row(student_cells(student))?;
    }
    Ok(table)
}

/// Raw attendance table.
pub fn attendance_table(records: &[AttendanceRecord]) -> ExportResult<Table> {
    let mut table = Table::new(
        ATTENDANCE_TABLE,
        vec![
            Column::new("student_id", ColumnType::Integer),
            Column::new("date", ColumnType::Date),
            Column::new("status", ColumnType::Text),
        ],
    );
    for record in records {
        table.push_row(vec![
            Cell::Integer(record.student_id),
            Cell::Date(record.date),
            Cell::text(record.status.label()),
        ])?;
    }
    Ok(table)
}

/// Attendance joined with student identity.
pub fn attendance_detail_table(rows: &[AttendanceDetailRow]) -> ExportResult<Table> {
    let mut table = Table::new(
        ATTENDANCE_DETAIL_TABLE,
        vec![
            Column::new("date", ColumnType::Date),
            Column::new("student_id", ColumnType::Integer),
            Column::new("roll_number", ColumnType::Text),
            Column::new("name", ColumnType::Text),
            Column::new("section", ColumnType::Text),
            Column::new("status", ColumnType::Text),
        ],
    );
    for row in rows {
        table.push_row(vec![
            Cell::Date(row.date),
            Cell::Integer(row.student.id),
            Cell::text(row.student.roll_number.as_str()),
            Cell::text(row.student.name.as_str()),
            Cell::optional_text(row.student.section.as_deref()),
            Cell::text(row.status.label()),
        ])?;
    }
    Ok(table)
}

pub fn student_report_table(report: &StudentReport) -> ExportResult<Table> {
    let mut table = Table::new(
        format!("student_{}", report.student.roll_number),
        vec![
            Column::new("date", ColumnType::Date),
            Column::new("status", ColumnType::Text),
        ],
    );
    for entry in &report.entries {
        table.push_row(vec![Cell::Date(entry.date), Cell::text(entry.status.label())])?;
    }
    Ok(table)
}

pub fn date_report_table(report: &DateReport) -> ExportResult<Table> {
    let mut columns = student_columns();
    columns.push(Column::new("status", ColumnType::Text));
    let mut table = Table::new(format!("date_{}", report.date), columns);
    for row in &report.rows {
        let mut cells = student_cells(&row.student);
        cells.push(Cell::text(row.status.label()));
        table.push_row(cells)?;
    }
    Ok(table)
}

pub fn summary_report_table(report: &SummaryReport) -> ExportResult<Table> {
    let mut columns = student_columns();
    columns.extend([
        Column::new("present_days", ColumnType::Integer),
        Column::new("absent_days", ColumnType::Integer),
        Column::new("percentage", ColumnType::Float),
    ]);
    let mut table = Table::new("summary", columns);
    for row in &report.rows {
        let mut cells = student_cells(&row.student);
        cells.extend([
            Cell::Integer(i64::from(row.present_days)),
            Cell::Integer(i64::from(row.absent_days)),
            Cell::optional_float(row.percentage),
        ]);
        table.push_row(cells)?;
    }
    Ok(table)
}
