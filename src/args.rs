use clap::Parser;

/// Builds the employee wellness dashboard from a survey file.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file describing the data source and the output.
    /// See the manual of survey_stats for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The survey data. Setting this option overrides the file path of the configuration.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default first sheet) When using an Excel file, the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (directory path) If specified, the pages of the dashboard are written in this directory.
    /// Setting this option overrides the output directory of the configuration.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path, 'stdout' or empty) If specified, all the computed tables are written in JSON format
    /// to the given location.
    #[clap(short, long, value_parser)]
    pub summary: Option<String>,

    /// (file path) A reference file with the expected tables in JSON format. If provided, the computed
    /// tables are compared with it and any difference fails the run.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
