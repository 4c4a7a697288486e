//! CSV rendering: comma-delimited, one header row, standard quoting.

use super::table::{Cell, Table};
use std::io::{self, Write};

pub(crate) fn write_csv<W: Write>(table: &Table, writer: W) -> io::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(render_cell))?;
    }
    writer.flush()?;
    Ok(())
}

fn render_cell(cell: &Cell) -> String {
    match cell {
        Cell::Integer(value) => value.to_string(),
        Cell::Float(value) => value.to_string(),
        Cell::Text(value) => value.clone(),
        Cell::Date(date) => date.to_string(),
        Cell::Empty => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::write_csv;
    use crate::export::table::{Cell, Column, ColumnType, Table};
    use crate::model::attendance::AttendanceDate;

    #[test]
    fn writes_header_then_rows_with_quoting() {
        let mut table = Table::new(
            "t",
            vec![
                Column::new("id", ColumnType::Integer),
                Column::new("name", ColumnType::Text),
                Column::new("date", ColumnType::Date),
                Column::new("pct", ColumnType::Float),
            ],
        );
        table
            .push_row(vec![
                Cell::Integer(7),
                Cell::text("Doe, Jane"),
                Cell::Date(AttendanceDate::parse("2024-01-10").unwrap()),
                Cell::Float(66.67),
            ])
            .unwrap();
        table
            .push_row(vec![Cell::Integer(8), Cell::text("Bo"), Cell::Empty, Cell::Empty])
            .unwrap();

        let mut out = Vec::new();
        write_csv(&table, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,name,date,pct\n7,\"Doe, Jane\",2024-01-10,66.67\n8,Bo,,\n"
        );
    }
}
