// Primitives for reading CSV files.

use survey_stats::builder::Builder;

use crate::dashboard::{io_common::simplify_file_name, *};

/// Reads a delimited file with a header row into a dataset.
///
/// Every record must have as many fields as the header.
pub fn read_csv_dataset(path: &str, delimiter: u8) -> DashboardResult<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { lineno: 1usize })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_csv_dataset: header: {:?}", header);

    let mut builder = Builder::new(&header).context(InvalidDatasetSnafu {})?;
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let fields: Vec<&str> = line.iter().collect();
        builder.add_row(&fields).context(InvalidDatasetSnafu {})?;
    }
    info!(
        "read_csv_dataset: {}: {} rows",
        simplify_file_name(path),
        builder.num_rows()
    );
    builder.build().context(InvalidDatasetSnafu {})
}
