//! Spreadsheet rendering: one sheet named after the table, bold header row,
//! typed cells.

use super::table::{Cell, Table};
use crate::model::attendance::AttendanceDate;
use rust_xlsxwriter::{ColNum, ExcelDateTime, Format, RowNum, Workbook, Worksheet, XlsxError};

const SHEET_NAME_MAX_CHARS: usize = 31;
const DATE_NUM_FORMAT: &str = "yyyy-mm-dd";

pub(crate) fn render_xlsx(table: &Table) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format(DATE_NUM_FORMAT);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(table.name()))?;

    for (col, header) in table.headers().enumerate() {
        worksheet.write_string_with_format(0, col as ColNum, header, &header_format)?;
    }

    for (index, row) in table.rows().iter().enumerate() {
        let row_num = (index + 1) as RowNum;
        for (col, cell) in row.iter().enumerate() {
            write_cell(worksheet, row_num, col as ColNum, cell, &date_format)?;
        }
    }

    worksheet.autofit();
    workbook.save_to_buffer()
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    cell: &Cell,
    date_format: &Format,
) -> Result<(), XlsxError> {
    match cell {
        Cell::Integer(value) => {
            worksheet.write_number(row, col, *value as f64)?;
        }
        Cell::Float(value) => {
            worksheet.write_number(row, col, *value)?;
        }
        Cell::Text(value) => {
            worksheet.write_string(row, col, value)?;
        }
        Cell::Date(date) => match excel_date(*date) {
            Some(datetime) => {
                worksheet.write_datetime_with_format(row, col, &datetime, date_format)?;
            }
            // Excel cannot represent dates before 1900; keep the ISO text.
            None => {
                worksheet.write_string(row, col, date.to_string())?;
            }
        },
        Cell::Empty => {}
    }
    Ok(())
}

fn excel_date(date: AttendanceDate) -> Option<ExcelDateTime> {
    let year = u16::try_from(date.year()).ok()?;
    let month = u8::try_from(date.month()).ok()?;
    let day = u8::try_from(date.day()).ok()?;
    ExcelDateTime::from_ymd(year, month, day).ok()
}

/// Maps a table name onto the worksheet naming rules.
fn sheet_name(table_name: &str) -> String {
    let cleaned: String = table_name
        .chars()
        .map(|ch| match ch {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            other => other,
        })
        .take(SHEET_NAME_MAX_CHARS)
        .collect();
    let cleaned = cleaned.trim_matches('\'');
    if cleaned.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned.to_string()
    }
}
