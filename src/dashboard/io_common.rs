use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Joins a path from the configuration to the directory of the configuration.
/// Absolute paths are kept as is.
pub fn resolve_path(root: &Path, file_path: &str) -> String {
    root.join(file_path).as_path().display().to_string()
}

/// Text of a numeric spreadsheet cell. Whole numbers lose their fractional part,
/// so that an age stored as `37.0` reads as `37`.
pub fn format_number(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{}", x as i64)
    } else {
        x.to_string()
    }
}
