use calamine::{open_workbook, DataType, Reader, Xlsx};
use chrono::{Duration, NaiveDate};
use survey_stats::builder::Builder;

use crate::dashboard::{
    io_common::{format_number, simplify_file_name},
    *,
};

/// Reads a worksheet into a dataset. The first row is the header.
///
/// When no worksheet name is given, the first worksheet is used.
pub fn read_excel_dataset(path: &str, worksheet: Option<&str>) -> DashboardResult<Dataset> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match worksheet {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name })?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu {})?
            .context(OpeningExcelSnafu { path })?,
    };

    let mut rows = wrange.rows();
    let header_row = rows.next().context(EmptyExcelSnafu {})?;
    let header: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(idx, cell)| cell_text(cell, 1, idx))
        .collect::<DashboardResult<Vec<String>>>()?;
    debug!("read_excel_dataset: header: {:?}", header);

    let mut builder = Builder::new(&header).context(InvalidDatasetSnafu {})?;
    for (idx, row) in rows.enumerate() {
        let lineno = idx + 2;
        let fields: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(col, cell)| cell_text(cell, lineno, col))
            .collect::<DashboardResult<Vec<String>>>()?;
        builder.add_row(&fields).context(InvalidDatasetSnafu {})?;
    }
    info!(
        "read_excel_dataset: {}: {} rows",
        simplify_file_name(path),
        builder.num_rows()
    );
    builder.build().context(InvalidDatasetSnafu {})
}

// Excel serial dates count days from 1899-12-30.
fn excel_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(0.0..3e6).contains(&serial) {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_signed(Duration::days(serial.trunc() as i64))
}

fn cell_text(cell: &DataType, lineno: usize, col: usize) -> DashboardResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Float(f) => Ok(format_number(*f)),
        DataType::Bool(b) => Ok(b.to_string()),
        DataType::Empty => Ok(String::new()),
        // Some answers were turned into dates by a spreadsheet ("1-5" became
        // 5 January). They are read back in the day-month form of the survey.
        DataType::DateTime(serial) => match excel_date(*serial) {
            Some(d) => Ok(d.format("%-d-%b").to_string()),
            None => ExcelWrongCellTypeSnafu {
                lineno,
                content: format!("column {}: date {}", col + 1, serial),
            }
            .fail(),
        },
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("column {}: {:?}", col + 1, cell),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_as_text() {
        assert_eq!(cell_text(&DataType::Float(37.0), 2, 0).unwrap(), "37");
        assert_eq!(cell_text(&DataType::Int(41), 2, 0).unwrap(), "41");
        assert_eq!(
            cell_text(&DataType::String("Yes".to_string()), 2, 0).unwrap(),
            "Yes"
        );
        assert_eq!(cell_text(&DataType::Empty, 2, 0).unwrap(), "");
    }

    #[test]
    fn date_cells_read_as_day_and_month() {
        // 2022-01-05 and 2022-06-25
        assert_eq!(cell_text(&DataType::DateTime(44566.0), 2, 2).unwrap(), "5-Jan");
        assert_eq!(cell_text(&DataType::DateTime(44737.0), 3, 2).unwrap(), "25-Jun");
        assert!(matches!(
            cell_text(&DataType::DateTime(-1.0), 4, 2),
            Err(DashboardError::ExcelWrongCellType { lineno: 4, .. })
        ));
    }

    #[test]
    fn error_cells_are_rejected() {
        let res = cell_text(&DataType::Error(calamine::CellErrorType::NA), 5, 2);
        assert!(matches!(
            res,
            Err(DashboardError::ExcelWrongCellType { lineno: 5, .. })
        ));
    }

    #[test]
    fn missing_workbook_is_an_error() {
        assert!(matches!(
            read_excel_dataset("/nonexistent/survey.xlsx", None),
            Err(DashboardError::OpeningExcel { .. })
        ));
    }
}
