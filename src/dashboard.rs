use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_stats::*;

use std::fs;
use std::path::Path;

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::dashboard::config_reader::*;

mod charts;
pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod pages;
mod summary;

#[derive(Debug, Snafu)]
pub enum DashboardError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {name} not found"))]
    MissingWorksheet { name: String },
    #[snafu(display("The spreadsheet has no worksheet"))]
    EmptyExcel {},
    #[snafu(display("Cannot read the cell in row {lineno}: {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of the CSV file"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Invalid survey data: {source}"))]
    InvalidDataset { source: StatsError },
    #[snafu(display("Could not compute {what}: {source}"))]
    Aggregation { source: StatsError, what: String },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("No survey file: pass --input or a configuration file"))]
    MissingInput {},
    #[snafu(display("Unknown input type {input_type:?}"))]
    UnknownProvider { input_type: String },
    #[snafu(display("The delimiter must be a single ASCII character, got {delimiter:?}"))]
    InvalidDelimiter { delimiter: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// The file formats that the survey can be read from.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Provider {
    Csv,
    Xlsx,
}

impl Provider {
    fn parse(s: &str) -> DashboardResult<Provider> {
        match s {
            "csv" => Ok(Provider::Csv),
            "xlsx" | "excel" => Ok(Provider::Xlsx),
            x => UnknownProviderSnafu { input_type: x }.fail(),
        }
    }
}

/// Everything needed for one run, after merging the configuration file and
/// the command line.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub input: String,
    pub provider: Provider,
    pub delimiter: u8,
    pub excel_worksheet_name: Option<String>,
    pub out_dir: Option<String>,
    pub summary: Option<String>,
    pub reference: Option<String>,
    pub site: SiteSettings,
}

/// Settings of the rendered pages.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SiteSettings {
    pub dashboard_name: String,
    pub plotly_js_url: String,
}

pub const DEFAULT_DASHBOARD_NAME: &str = "Employee Wellness Dashboard";
pub const DEFAULT_PLOTLY_JS_URL: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

fn resolve_settings(args: &Args) -> DashboardResult<RunSettings> {
    let config: Option<DashboardConfig> = match args.config.as_deref() {
        Some(p) => Some(read_config(p)?),
        None => None,
    };
    debug!("resolve_settings: config: {:?}", config);

    // Paths from the configuration file are relative to its directory.
    let config_root = match args.config.as_deref() {
        Some(p) => Some(
            Path::new(p)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf(),
        ),
        None => None,
    };

    let source: Option<&DataSource> = config.as_ref().map(|c| &c.data_source);
    let output: Option<&OutputSettings> = config.as_ref().map(|c| &c.output_settings);

    let input = match (&args.input, source, &config_root) {
        (Some(i), _, _) => i.clone(),
        (None, Some(s), Some(root)) => io_common::resolve_path(root, &s.file_path),
        _ => return MissingInputSnafu {}.fail(),
    };

    let provider = match (&args.input_type, source.and_then(|s| s.provider.clone())) {
        (Some(t), _) => Provider::parse(t)?,
        (None, Some(t)) => Provider::parse(&t)?,
        (None, None) if input.ends_with(".xlsx") => Provider::Xlsx,
        (None, None) => Provider::Csv,
    };

    let delimiter = match source {
        Some(s) => s.delimiter_byte()?,
        None => b',',
    };

    let excel_worksheet_name = args
        .excel_worksheet_name
        .clone()
        .or_else(|| source.and_then(|s| s.excel_worksheet_name.clone()));

    let out_dir = match (&args.out, output.and_then(|o| o.output_directory.clone())) {
        (Some(o), _) => Some(o.clone()),
        (None, Some(o)) => match &config_root {
            Some(root) => Some(io_common::resolve_path(root, &o)),
            None => Some(o),
        },
        (None, None) => None,
    };

    let site = SiteSettings {
        dashboard_name: output
            .and_then(|o| o.dashboard_name.clone())
            .unwrap_or_else(|| DEFAULT_DASHBOARD_NAME.to_string()),
        plotly_js_url: output
            .and_then(|o| o.plotly_js_url.clone())
            .unwrap_or_else(|| DEFAULT_PLOTLY_JS_URL.to_string()),
    };

    Ok(RunSettings {
        input,
        provider,
        delimiter,
        excel_worksheet_name,
        out_dir,
        summary: args.summary.clone(),
        reference: args.reference.clone(),
        site,
    })
}

/// Reads the survey file and checks that it has all the columns the
/// dashboard needs. Any problem here is fatal.
pub fn load_survey(settings: &RunSettings) -> DashboardResult<Survey> {
    info!(
        "Attempting to read survey file {:?} ({:?})",
        settings.input, settings.provider
    );
    let dataset = match settings.provider {
        Provider::Csv => io_csv::read_csv_dataset(&settings.input, settings.delimiter)?,
        Provider::Xlsx => io_excel::read_excel_dataset(
            &settings.input,
            settings.excel_worksheet_name.as_deref(),
        )?,
    };
    info!(
        "Read {} rows, columns: {:?}",
        dataset.num_rows(),
        dataset.column_names()
    );
    Survey::new(dataset).context(InvalidDatasetSnafu {})
}

fn write_summary(js: &JSValue, dest: &str) -> DashboardResult<()> {
    let pretty = serde_json::to_string_pretty(js).context(ParsingJsonSnafu {})?;
    if dest == "stdout" || dest.is_empty() {
        println!("{}", pretty);
    } else {
        info!("Writing summary to {}", dest);
        fs::write(dest, pretty).context(WritingOutputSnafu { path: dest })?;
    }
    Ok(())
}

fn check_reference(js: &JSValue, reference_path: &str) -> DashboardResult<()> {
    let summary_ref = read_summary(reference_path)?;
    let pretty_ref = serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    let pretty = serde_json::to_string_pretty(js).context(ParsingJsonSnafu {})?;
    if pretty_ref != pretty {
        warn!("Found differences with the reference summary");
        print_diff(pretty_ref.as_str(), pretty.as_str(), "\n");
        whatever!("Difference detected between computed summary and reference summary")
    }
    info!("Computed summary matches {}", reference_path);
    Ok(())
}

pub fn run_dashboard(args: &Args) -> DashboardResult<()> {
    let settings = resolve_settings(args)?;
    info!("settings: {:?}", settings);

    let survey = load_survey(&settings)?;

    if let Some(out_dir) = settings.out_dir.as_deref() {
        pages::write_site(&survey, &settings.site, Path::new(out_dir))?;
    }

    let summary_js = summary::build_summary_js(&survey)?;

    if let Some(dest) = settings.summary.as_deref() {
        write_summary(&summary_js, dest)?;
    } else if settings.out_dir.is_none() && settings.reference.is_none() {
        // Nothing else asked: the tables go to the standard output.
        write_summary(&summary_js, "stdout")?;
    }

    if let Some(reference) = settings.reference.as_deref() {
        check_reference(&summary_js, reference)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    pub(crate) fn sample_path() -> String {
        format!("{}/data/sample_survey.csv", env!("CARGO_MANIFEST_DIR"))
    }

    pub(crate) fn sample_survey() -> Survey {
        let ds = io_csv::read_csv_dataset(&sample_path(), b',').unwrap();
        Survey::new(ds).unwrap()
    }

    fn parse(argv: &[&str]) -> Args {
        let mut full = vec!["wellness"];
        full.extend_from_slice(argv);
        Args::parse_from(full)
    }

    #[test]
    fn command_line_without_input_fails() {
        let args = parse(&[]);
        assert!(matches!(
            resolve_settings(&args),
            Err(DashboardError::MissingInput {})
        ));
    }

    #[test]
    fn command_line_settings() {
        let args = parse(&["--input", "survey.xlsx", "--out", "site"]);
        let s = resolve_settings(&args).unwrap();
        assert_eq!(s.provider, Provider::Xlsx);
        assert_eq!(s.delimiter, b',');
        assert_eq!(s.out_dir, Some("site".to_string()));
        assert_eq!(s.site.dashboard_name, DEFAULT_DASHBOARD_NAME);
    }

    #[test]
    fn unknown_input_type_is_rejected() {
        let args = parse(&["--input", "survey.csv", "--input-type", "parquet"]);
        assert!(matches!(
            resolve_settings(&args),
            Err(DashboardError::UnknownProvider { input_type }) if input_type == "parquet"
        ));
    }

    #[test]
    fn config_file_paths_are_relative_to_the_config() {
        let config = format!("{}/data/sample_config.json", env!("CARGO_MANIFEST_DIR"));
        let args = parse(&["--config", config.as_str()]);
        let s = resolve_settings(&args).unwrap();
        assert_eq!(s.input, sample_path());
        assert_eq!(s.provider, Provider::Csv);
        assert_eq!(
            s.out_dir,
            Some(format!("{}/data/site", env!("CARGO_MANIFEST_DIR")))
        );
        assert_eq!(s.site.dashboard_name, "Employee Wellness (sample)");
    }

    #[test]
    fn sample_survey_loads() {
        let args = parse(&["--input", sample_path().as_str()]);
        let s = resolve_settings(&args).unwrap();
        let survey = load_survey(&s).unwrap();
        assert_eq!(survey.dataset().num_rows(), 40);
    }

    #[test]
    fn survey_without_required_column_fails_to_load() {
        let path = std::env::temp_dir().join("wellness_missing_column.csv");
        fs::write(&path, "Age,Gender,treatment\n30,Male,Yes\n").unwrap();
        let args = parse(&["--input", path.to_str().unwrap()]);
        let s = resolve_settings(&args).unwrap();
        let res = load_survey(&s);
        assert!(matches!(
            res,
            Err(DashboardError::InvalidDataset {
                source: StatsError::MissingColumn(_)
            })
        ));
    }

    #[test]
    fn summary_matches_itself_as_reference() {
        let survey = sample_survey();
        let js = summary::build_summary_js(&survey).unwrap();
        let path = std::env::temp_dir().join("wellness_reference.json");
        fs::write(&path, serde_json::to_string_pretty(&js).unwrap()).unwrap();
        assert!(check_reference(&js, path.to_str().unwrap()).is_ok());
    }
}
