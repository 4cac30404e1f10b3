//! Decoder for spreadsheet containers (xlsx, xlsm, xlsb, xls, ods).

use crate::error::{Result, SteekproefError};
use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use steekproef_engine::engine::{CellValue, Grid, RawSheet, Workbook};
use tracing::debug;

/// Decode workbook bytes into raw sheets, in container order.
///
/// Fails only when the container itself cannot be read. A sheet whose cells
/// cannot be loaded is kept as [`RawSheet::unreadable`] so the sampler can
/// report it and move on.
pub fn decode_workbook(bytes: &[u8]) -> Result<Workbook> {
    let mut source = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let names: Vec<String> = source.sheet_names().to_vec();
    if names.is_empty() {
        return Err(SteekproefError::NoSheets);
    }

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        match source.worksheet_range(&name) {
            Ok(range) => sheets.push(RawSheet::new(name, range_to_grid(&range))),
            Err(err) => {
                debug!(sheet = %name, error = %err, "cannot load sheet cells");
                sheets.push(RawSheet::unreadable(name, err.to_string()));
            }
        }
    }

    Ok(Workbook::new(sheets))
}

/// Used range of a sheet as a grid. Rows and columns before the first used
/// cell are not part of the range.
fn range_to_grid(range: &Range<Data>) -> Grid {
    range
        .rows()
        .map(|row| row.iter().map(parse_cell).collect())
        .collect()
}

/// Map a decoded cell onto the value shapes the sampler knows.
/// - Integers and floats -> Number
/// - Date-times -> DateTime (serial, 1900 date system)
/// - Strings, ISO dates/durations, booleans, error codes -> Text
/// - Empty cells and empty strings -> Empty
pub(crate) fn parse_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Float(n) => CellValue::Number(*n),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s.as_str()),
        Data::Bool(b) => CellValue::text(if *b { "TRUE" } else { "FALSE" }),
        Data::Error(e) => CellValue::text(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook as XlsxWorkbook;
    use steekproef_engine::engine::SheetContent;

    fn grid_of(wb: &Workbook, name: &str) -> Grid {
        match &wb.sheet(name).expect("sheet").content {
            SheetContent::Cells(grid) => grid.clone(),
            SheetContent::Unreadable(reason) => panic!("unreadable: {}", reason),
        }
    }

    #[test]
    fn test_decode_sheets_in_order() {
        let mut xlsx = XlsxWorkbook::new();
        for name in ["Zeta", "Alpha", "Mid"] {
            let ws = xlsx.add_worksheet();
            ws.set_name(name).unwrap();
            ws.write_string(0, 0, "A").unwrap();
        }
        let bytes = xlsx.save_to_buffer().unwrap();

        let wb = decode_workbook(&bytes).unwrap();
        assert_eq!(wb.sheet_names().collect::<Vec<_>>(), vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_decode_cell_values() {
        let mut xlsx = XlsxWorkbook::new();
        let ws = xlsx.add_worksheet();
        ws.set_name("Data").unwrap();
        ws.write_string(0, 0, "Name").unwrap();
        ws.write_string(0, 1, "Score").unwrap();
        ws.write_string(0, 2, "Passed").unwrap();
        ws.write_string(1, 0, "Ann").unwrap();
        ws.write_number(1, 1, 7.5).unwrap();
        ws.write_boolean(1, 2, true).unwrap();
        ws.write_number(2, 1, 3.0).unwrap();
        let bytes = xlsx.save_to_buffer().unwrap();

        let wb = decode_workbook(&bytes).unwrap();
        let grid = grid_of(&wb, "Data");
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0][0], CellValue::text("Name"));
        assert_eq!(grid[1][0], CellValue::text("Ann"));
        assert_eq!(grid[1][1], CellValue::Number(7.5));
        assert_eq!(grid[1][2], CellValue::text("TRUE"));
        assert_eq!(grid[2][0], CellValue::Empty);
        assert_eq!(grid[2][1], CellValue::Number(3.0));
    }

    #[test]
    fn test_decode_empty_sheet() {
        let mut xlsx = XlsxWorkbook::new();
        xlsx.add_worksheet().set_name("Blank").unwrap();
        let bytes = xlsx.save_to_buffer().unwrap();

        let wb = decode_workbook(&bytes).unwrap();
        assert!(grid_of(&wb, "Blank").is_empty());
    }

    #[test]
    fn test_decode_garbage_is_error() {
        let err = decode_workbook(b"definitely not a spreadsheet").unwrap_err();
        assert!(matches!(err, SteekproefError::Decode(_)));
    }

    #[test]
    fn test_parse_cell_mapping() {
        assert_eq!(parse_cell(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(parse_cell(&Data::String(String::new())), CellValue::Empty);
        assert_eq!(parse_cell(&Data::Bool(false)), CellValue::text("FALSE"));
        assert_eq!(
            parse_cell(&Data::DateTimeIso("2024-01-31".to_string())),
            CellValue::text("2024-01-31")
        );
        assert_eq!(
            parse_cell(&Data::Error(calamine::CellErrorType::Div0)),
            CellValue::text("#DIV/0!")
        );
    }
}
