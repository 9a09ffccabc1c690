use log::debug;
use std::collections::HashMap;

use crate::config::StatsError;

/// Cell contents that are read as a missing value.
pub const MISSING_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || MISSING_TOKENS.contains(&t)
}

/// An immutable, column-oriented table of survey answers.
///
/// Each column is addressed by name. Missing cells are `None`.
/// There is no way to modify a dataset once it is built: filtering
/// produces a new one.
#[derive(PartialEq, Debug, Clone)]
pub struct Dataset {
    names: Vec<String>,
    index: HashMap<String, usize>,
    columns: Vec<Vec<Option<String>>>,
    num_rows: usize,
}

impl Dataset {
    pub(crate) fn from_columns(
        names: Vec<String>,
        columns: Vec<Vec<Option<String>>>,
        num_rows: usize,
    ) -> Result<Dataset, StatsError> {
        let mut index: HashMap<String, usize> = HashMap::new();
        for (idx, n) in names.iter().enumerate() {
            if index.insert(n.clone(), idx).is_some() {
                return Err(StatsError::DuplicateColumn(n.clone()));
            }
        }
        Ok(Dataset {
            names,
            index,
            columns,
            num_rows,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All the cells of one column, in row order.
    pub fn column(&self, name: &str) -> Result<&[Option<String>], StatsError> {
        self.index
            .get(name)
            .map(|idx| self.columns[*idx].as_slice())
            .ok_or_else(|| StatsError::UnknownColumn(name.to_string()))
    }

    /// Checks that all the given columns are present.
    pub fn require(&self, names: &[&str]) -> Result<(), StatsError> {
        for n in names {
            if !self.has_column(n) {
                return Err(StatsError::MissingColumn(n.to_string()));
            }
        }
        Ok(())
    }

    /// The values of one column parsed as finite numbers. Missing cells are skipped.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, StatsError> {
        let mut res: Vec<f64> = Vec::new();
        for s in self.column(name)?.iter().flatten() {
            match s.trim().parse::<f64>() {
                Ok(x) if x.is_finite() => res.push(x),
                _ => {
                    return Err(StatsError::NotNumeric {
                        column: name.to_string(),
                        value: s.clone(),
                    })
                }
            }
        }
        Ok(res)
    }

    /// The rows for which `column` is not `level`.
    ///
    /// Rows where the column is missing are kept: a missing answer is not
    /// the excluded answer.
    pub fn without_level(&self, column: &str, level: &str) -> Result<Dataset, StatsError> {
        let keep: Vec<bool> = self
            .column(column)?
            .iter()
            .map(|c| c.as_deref() != Some(level))
            .collect();
        let num_rows = keep.iter().filter(|k| **k).count();
        debug!(
            "without_level: {}!={:?} keeps {} of {} rows",
            column, level, num_rows, self.num_rows
        );
        let columns: Vec<Vec<Option<String>>> = self
            .columns
            .iter()
            .map(|col| {
                col.iter()
                    .zip(keep.iter())
                    .filter_map(|(c, k)| if *k { Some(c.clone()) } else { None })
                    .collect()
            })
            .collect();
        Ok(Dataset {
            names: self.names.clone(),
            index: self.index.clone(),
            columns,
            num_rows,
        })
    }
}
