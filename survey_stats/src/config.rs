// ******** Output data structures *********

use std::error::Error;
use std::fmt::Display;

/// The occurrence count of every category of one column.
///
/// Entries are ordered by decreasing count (ties by label) unless the
/// distribution was requested with an explicit category order.
#[derive(PartialEq, Debug, Clone)]
pub struct Distribution {
    pub column: String,
    pub entries: Vec<(String, u64)>,
}

impl Distribution {
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| *c).sum()
    }

    /// The entries expressed as a percentage of the total (0-100 scale).
    ///
    /// An empty distribution yields zero for every entry.
    pub fn percentages(&self) -> Vec<(String, f64)> {
        let total = self.total();
        self.entries
            .iter()
            .map(|(label, c)| (label.clone(), percentage(*c, total)))
            .collect()
    }

    pub fn count(&self, level: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(label, _)| label == level)
            .map(|(_, c)| *c)
    }

    /// The share of one level, on a 0-100 scale.
    ///
    /// Fails with `LevelAbsent` if the level was never observed.
    pub fn share(&self, level: &str) -> Result<f64, StatsError> {
        match self.count(level) {
            Some(c) if c > 0 => Ok(percentage(c, self.total())),
            _ => Err(StatsError::LevelAbsent {
                column: self.column.clone(),
                level: level.to_string(),
            }),
        }
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|(l, _)| l.clone()).collect()
    }
}

/// One row of a cross-tabulation. `cells` is aligned with the column labels
/// of the enclosing table.
#[derive(PartialEq, Debug, Clone)]
pub struct CrossTabRow {
    pub label: String,
    pub total: u64,
    pub cells: Vec<f64>,
}

/// A row-normalized cross-tabulation: every row sums to 100.
#[derive(PartialEq, Debug, Clone)]
pub struct CrossTab {
    pub row_column: String,
    pub col_column: String,
    pub col_labels: Vec<String>,
    pub rows: Vec<CrossTabRow>,
}

impl CrossTab {
    fn col_index(&self, col_level: &str) -> Option<usize> {
        self.col_labels.iter().position(|l| l == col_level)
    }

    /// The percentage of `col_level` within the row `row_level`.
    ///
    /// A column level that never occurs is a rate of zero. A row level that
    /// never occurs is an error: there is no rate to report.
    pub fn rate(&self, row_level: &str, col_level: &str) -> Result<f64, StatsError> {
        let row = self
            .rows
            .iter()
            .find(|r| r.label == row_level)
            .ok_or_else(|| StatsError::LevelAbsent {
                column: self.row_column.clone(),
                level: row_level.to_string(),
            })?;
        Ok(self
            .col_index(col_level)
            .and_then(|idx| row.cells.get(idx).cloned())
            .unwrap_or(0.0))
    }

    /// The rate of `col_level` for every row, in row order.
    pub fn rates(&self, col_level: &str) -> Vec<(String, f64)> {
        let idx = self.col_index(col_level);
        self.rows
            .iter()
            .map(|r| {
                let v = idx.and_then(|i| r.cells.get(i).cloned()).unwrap_or(0.0);
                (r.label.clone(), v)
            })
            .collect()
    }

    /// Reorders the rows by decreasing rate of `col_level`. The sort is
    /// stable, so equal rates keep the label order.
    pub fn sorted_by_rate_desc(mut self, col_level: &str) -> CrossTab {
        let idx = self.col_index(col_level);
        let rate_of = |r: &CrossTabRow| idx.and_then(|i| r.cells.get(i).cloned()).unwrap_or(0.0);
        self.rows.sort_by(|a, b| {
            rate_of(b)
                .partial_cmp(&rate_of(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self
    }

    pub fn row_labels(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.label.clone()).collect()
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct GroupShare {
    pub group: String,
    pub category: String,
    pub percentage: f64,
}

/// Long-form (group, category, percentage) table. Every group sums to 100.
#[derive(PartialEq, Debug, Clone)]
pub struct GroupedProportion {
    pub group_column: String,
    pub category_column: String,
    pub entries: Vec<GroupShare>,
}

impl GroupedProportion {
    /// The groups, in the order they appear in the table.
    pub fn groups(&self) -> Vec<String> {
        let mut res: Vec<String> = Vec::new();
        for e in self.entries.iter() {
            if !res.contains(&e.group) {
                res.push(e.group.clone());
            }
        }
        res
    }

    /// The categories, in order of first appearance.
    pub fn categories(&self) -> Vec<String> {
        let mut res: Vec<String> = Vec::new();
        for e in self.entries.iter() {
            if !res.contains(&e.category) {
                res.push(e.category.clone());
            }
        }
        res
    }

    pub fn share(&self, group: &str, category: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.group == group && e.category == category)
            .map(|e| e.percentage)
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: u64,
}

/// Equal-width histogram over a numeric column.
#[derive(PartialEq, Debug, Clone)]
pub struct Histogram {
    pub column: String,
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Percentage-point difference of the target rate between two levels of a factor.
#[derive(PartialEq, Debug, Clone)]
pub struct ImpactScore {
    pub name: String,
    pub delta: f64,
}

pub(crate) fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64) * 100.0 / (total as f64)
    }
}

/// Errors raised by the aggregations.
#[derive(PartialEq, Debug, Clone)]
pub enum StatsError {
    /// The column does not exist in the dataset. Always a caller bug.
    UnknownColumn(String),
    /// A column required by the question set is missing from the input.
    MissingColumn(String),
    /// The same column name appears twice in a header.
    DuplicateColumn(String),
    /// A fixed factor or KPI refers to a level that is not in the data.
    LevelAbsent { column: String, level: String },
    /// A row does not have as many fields as the header.
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    NotNumeric { column: String, value: String },
    /// The column holds no value at all.
    EmptyColumn(String),
}

impl Error for StatsError {}

impl Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::UnknownColumn(c) => write!(f, "unknown column {:?}", c),
            StatsError::MissingColumn(c) => {
                write!(f, "required column {:?} is missing from the dataset", c)
            }
            StatsError::DuplicateColumn(c) => write!(f, "column {:?} appears more than once", c),
            StatsError::LevelAbsent { column, level } => {
                write!(f, "level {:?} is absent from column {:?}", level, column)
            }
            StatsError::RowLength {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {} has {} fields, expected {}",
                row, found, expected
            ),
            StatsError::NotNumeric { column, value } => {
                write!(f, "value {:?} in column {:?} is not numeric", value, column)
            }
            StatsError::EmptyColumn(c) => write!(f, "column {:?} has no values", c),
        }
    }
}

// ********* Question configuration **********

// Column names of the survey file.
pub const AGE: &str = "Age";
pub const GENDER: &str = "Gender";
pub const COMPANY_SIZE: &str = "no_employees";
pub const TECH_COMPANY: &str = "tech_company";
pub const FAMILY_HISTORY: &str = "family_history";
pub const BENEFITS: &str = "benefits";
pub const WELLNESS_PROGRAM: &str = "wellness_program";
pub const CARE_OPTIONS: &str = "care_options";
pub const LEAVE: &str = "leave";
pub const TREATMENT: &str = "treatment";
pub const WORK_INTERFERE: &str = "work_interfere";
pub const MENTAL_HEALTH_CONSEQUENCE: &str = "mental_health_consequence";
pub const PHYS_HEALTH_CONSEQUENCE: &str = "phys_health_consequence";
pub const COWORKERS: &str = "coworkers";
pub const SUPERVISOR: &str = "supervisor";
pub const MENTAL_VS_PHYSICAL: &str = "mental_vs_physical";
pub const OBS_CONSEQUENCE: &str = "obs_consequence";
pub const REMOTE_WORK: &str = "remote_work";

/// Every column referenced by the question set.
pub const REQUIRED_COLUMNS: [&str; 18] = [
    AGE,
    GENDER,
    COMPANY_SIZE,
    TECH_COMPANY,
    FAMILY_HISTORY,
    BENEFITS,
    WELLNESS_PROGRAM,
    CARE_OPTIONS,
    LEAVE,
    TREATMENT,
    WORK_INTERFERE,
    MENTAL_HEALTH_CONSEQUENCE,
    PHYS_HEALTH_CONSEQUENCE,
    COWORKERS,
    SUPERVISOR,
    MENTAL_VS_PHYSICAL,
    OBS_CONSEQUENCE,
    REMOTE_WORK,
];

pub const YES: &str = "Yes";
pub const NO: &str = "No";

// The company size buckets. The first two were mangled into dates by a
// spreadsheet before the file was cleaned, and they are kept as such.
pub const COMPANY_SIZE_ORDER: [&str; 6] = [
    "5-Jan",
    "25-Jun",
    "26-100",
    "100-500",
    "500-1000",
    "More than 1000",
];

pub const TRUST_ORDER: [&str; 3] = ["Yes", "Some of them", "No"];

pub const AGE_BINS: usize = 10;

/// A factor whose impact on the treatment rate is measured.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ImpactFactor {
    pub name: &'static str,
    pub column: &'static str,
    pub baseline: &'static str,
    pub comparison: &'static str,
}

pub const IMPACT_FACTORS: [ImpactFactor; 3] = [
    ImpactFactor {
        name: "Family History",
        column: FAMILY_HISTORY,
        baseline: NO,
        comparison: YES,
    },
    ImpactFactor {
        name: "Work Interference (Often vs. Never)",
        column: WORK_INTERFERE,
        baseline: "Never",
        comparison: "Often",
    },
    ImpactFactor {
        name: "Fearing Consequences",
        column: MENTAL_HEALTH_CONSEQUENCE,
        baseline: NO,
        comparison: YES,
    },
];

/// A headline percentage shown on the summary page.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Kpi {
    pub name: &'static str,
    pub column: &'static str,
    pub level: &'static str,
}

pub const KPIS: [Kpi; 3] = [
    Kpi {
        name: "Overall Treatment Rate",
        column: TREATMENT,
        level: YES,
    },
    Kpi {
        name: "Family History of Mental Illness",
        column: FAMILY_HISTORY,
        level: YES,
    },
    Kpi {
        name: "Fear Negative Consequences",
        column: MENTAL_HEALTH_CONSEQUENCE,
        level: YES,
    },
];
