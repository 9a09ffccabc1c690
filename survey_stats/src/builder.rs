use crate::config::StatsError;
use crate::dataset::{is_missing, Dataset};

/// A builder for assembling a dataset row by row.
///
/// This is what the file readers use. Cells are trimmed, and the usual
/// missing-value markers (empty cell, `NA`, `NaN`, ...) are stored as missing.
///
/// ```
/// use survey_stats::builder::Builder;
/// # use survey_stats::StatsError;
///
/// let mut builder = Builder::new(&["treatment", "family_history"])?;
/// builder.add_row(&["Yes", "No"])?;
/// builder.add_row(&["No", ""])?;
/// let dataset = builder.build()?;
///
/// assert_eq!(dataset.num_rows(), 2);
/// # Ok::<(), StatsError>(())
/// ```
pub struct Builder {
    _names: Vec<String>,
    _columns: Vec<Vec<Option<String>>>,
    _num_rows: usize,
}

impl Builder {
    pub fn new<S: AsRef<str>>(header: &[S]) -> Result<Builder, StatsError> {
        let names: Vec<String> = header.iter().map(|h| h.as_ref().trim().to_string()).collect();
        for (idx, n) in names.iter().enumerate() {
            if names[..idx].contains(n) {
                return Err(StatsError::DuplicateColumn(n.clone()));
            }
        }
        let columns = names.iter().map(|_| Vec::new()).collect();
        Ok(Builder {
            _names: names,
            _columns: columns,
            _num_rows: 0,
        })
    }

    /// Adds one row. It must have exactly one field per column.
    pub fn add_row<S: AsRef<str>>(&mut self, fields: &[S]) -> Result<(), StatsError> {
        if fields.len() != self._names.len() {
            return Err(StatsError::RowLength {
                row: self._num_rows + 1,
                expected: self._names.len(),
                found: fields.len(),
            });
        }
        for (col, f) in self._columns.iter_mut().zip(fields.iter()) {
            let s = f.as_ref();
            if is_missing(s) {
                col.push(None);
            } else {
                col.push(Some(s.trim().to_string()));
            }
        }
        self._num_rows += 1;
        Ok(())
    }

    /// Adds the same row `count` times.
    pub fn add_rows<S: AsRef<str>>(&mut self, fields: &[S], count: usize) -> Result<(), StatsError> {
        for _ in 0..count {
            self.add_row(fields)?;
        }
        Ok(())
    }

    pub fn num_rows(&self) -> usize {
        self._num_rows
    }

    pub fn build(self) -> Result<Dataset, StatsError> {
        Dataset::from_columns(self._names, self._columns, self._num_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_header_is_rejected() {
        let res = Builder::new(&["treatment", "leave", "treatment"]);
        assert!(matches!(res, Err(StatsError::DuplicateColumn(c)) if c == "treatment"));
    }

    #[test]
    fn short_row_is_rejected() {
        let mut b = Builder::new(&["treatment", "leave"]).unwrap();
        b.add_row(&["Yes", "Very easy"]).unwrap();
        assert_eq!(
            b.add_row(&["No"]),
            Err(StatsError::RowLength {
                row: 2,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn cells_are_trimmed() {
        let mut b = Builder::new(&[" treatment "]).unwrap();
        b.add_row(&[" Yes "]).unwrap();
        let ds = b.build().unwrap();
        assert_eq!(ds.column("treatment").unwrap()[0], Some("Yes".to_string()));
    }
}
