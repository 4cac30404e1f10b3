//! Encoder for sampled sheets (always xlsx).

use crate::error::Result;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet, XlsxError};
use steekproef_engine::engine::{CellValue, Sheet};

/// Number formats for date-time cells, chosen by what the serial holds.
struct DateFormats {
    date: Format,
    time: Format,
    date_time: Format,
}

impl DateFormats {
    fn new() -> Self {
        DateFormats {
            date: Format::new().set_num_format("yyyy-mm-dd"),
            time: Format::new().set_num_format("hh:mm:ss"),
            date_time: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
        }
    }

    fn for_serial(&self, serial: f64) -> &Format {
        let has_date = serial.floor() > 0.0;
        let has_time = serial.fract().abs() > 0.0001;
        match (has_date, has_time) {
            (true, true) => &self.date_time,
            (false, true) => &self.time,
            _ => &self.date,
        }
    }
}

/// Encode sheets, in order, as an xlsx workbook.
///
/// The header row is written as text; cells keep their number/text type and
/// empty cells are left blank. Date-time cells get a date or time number
/// format; nothing else is styled.
pub fn encode_workbook(sheets: &[Sheet]) -> Result<Vec<u8>> {
    let mut workbook = XlsxWorkbook::new();
    let formats = DateFormats::new();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        write_sheet(worksheet, sheet, &formats)?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &Sheet,
    formats: &DateFormats,
) -> std::result::Result<(), XlsxError> {
    for (col, title) in sheet.columns.iter().enumerate() {
        worksheet.write_string(0, to_col(col)?, title.as_str())?;
    }

    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let row_num = to_row(row_idx + 1)?;
        for (col, value) in row.values.iter().enumerate() {
            match value {
                CellValue::Number(n) => {
                    worksheet.write_number(row_num, to_col(col)?, *n)?;
                }
                CellValue::DateTime(serial) => {
                    worksheet.write_number_with_format(
                        row_num,
                        to_col(col)?,
                        *serial,
                        formats.for_serial(*serial),
                    )?;
                }
                CellValue::Text(s) => {
                    worksheet.write_string(row_num, to_col(col)?, s.as_str())?;
                }
                CellValue::Empty => {}
            }
        }
    }
    Ok(())
}

fn to_row(row: usize) -> std::result::Result<u32, XlsxError> {
    u32::try_from(row).map_err(|_| XlsxError::RowColumnLimitError)
}

fn to_col(col: usize) -> std::result::Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}
