use crate::dashboard::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "dashboardName")]
    pub dashboard_name: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "plotlyJsUrl")]
    pub plotly_js_url: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    pub delimiter: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl DataSource {
    pub fn delimiter_byte(&self) -> DashboardResult<u8> {
        match self.delimiter.as_deref() {
            None => Ok(b','),
            Some("\\t") | Some("tab") => Ok(b'\t'),
            Some(d) if d.len() == 1 && d.is_ascii() => Ok(d.as_bytes()[0]),
            Some(d) => InvalidDelimiterSnafu { delimiter: d }.fail(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "dataSource")]
    pub data_source: DataSource,
}

pub fn read_config(path: &str) -> DashboardResult<DashboardConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: DashboardConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    info!("config: {:?}", config);
    Ok(config)
}

/// Reads a reference summary, as written by a previous run.
pub fn read_summary(path: &str) -> DashboardResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}
