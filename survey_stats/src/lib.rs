/*!
Descriptive statistics over the employee mental-health survey.

The aggregations in this crate turn the raw survey answers into the small
tables that the dashboard charts: counts per category, row-normalized
cross-tabulations, proportions within groups, and the "impact score" of a
factor on the treatment rate.

All the functions are pure: they read an immutable [`Dataset`] and return a
fresh result. A [`Survey`] wraps a validated dataset and answers the fixed
set of questions of the dashboard.

```
use survey_stats::builder::Builder;
use survey_stats::*;

let mut builder = Builder::new(&["treatment"])?;
builder.add_rows(&["Yes"], 70)?;
builder.add_rows(&["No"], 30)?;
let dataset = builder.build()?;

assert_eq!(kpi(&dataset, "treatment", "Yes")?, "70.0%");
# Ok::<(), StatsError>(())
```
*/

pub mod builder;
mod config;
mod dataset;
pub mod manual;
mod questions;

use log::{debug, warn};

use std::collections::{BTreeMap, HashMap};

pub use crate::config::*;
pub use crate::dataset::*;
pub use crate::questions::*;

// Occurrences of every non-missing value of a column.
fn count_levels(cells: &[Option<String>]) -> HashMap<&str, u64> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for s in cells.iter().flatten() {
        *counts.entry(s.as_str()).or_insert(0) += 1;
    }
    counts
}

// Decreasing count, ties broken by label so that results do not depend on hashing.
fn sorted_counts(counts: HashMap<&str, u64>) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(label, c)| (label.to_string(), c))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}

/// The number of occurrences of every value present in a column.
///
/// Missing cells are not counted.
pub fn distribution(ds: &Dataset, column: &str) -> Result<Distribution, StatsError> {
    let cells = ds.column(column)?;
    let entries = sorted_counts(count_levels(cells));
    debug!("distribution: {}: {:?}", column, entries);
    Ok(Distribution {
        column: column.to_string(),
        entries,
    })
}

/// The distribution of a column over a fixed list of categories.
///
/// Every category of `order` gets an entry, with a count of zero if it was
/// never observed. Values that are not listed in `order` are left out.
pub fn distribution_in_order(
    ds: &Dataset,
    column: &str,
    order: &[&str],
) -> Result<Distribution, StatsError> {
    let counts = count_levels(ds.column(column)?);
    let dropped: Vec<&&str> = counts.keys().filter(|k| !order.contains(*k)).collect();
    if !dropped.is_empty() {
        warn!(
            "distribution_in_order: {}: values {:?} are not in the category order and are ignored",
            column, dropped
        );
    }
    let entries: Vec<(String, u64)> = order
        .iter()
        .map(|label| (label.to_string(), counts.get(label).cloned().unwrap_or(0)))
        .collect();
    debug!("distribution_in_order: {}: {:?}", column, entries);
    Ok(Distribution {
        column: column.to_string(),
        entries,
    })
}

/// Equal-width histogram of a numeric column, between its minimum and maximum.
///
/// The last bin is closed on both ends so that the maximum is counted.
pub fn histogram(ds: &Dataset, column: &str, num_bins: usize) -> Result<Histogram, StatsError> {
    let values = ds.numeric_column(column)?;
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if values.is_empty() {
        return Err(StatsError::EmptyColumn(column.to_string()));
    }
    let num_bins = num_bins.max(1);
    // A constant column still gets one bin of unit width.
    let (num_bins, width) = if max > min {
        (num_bins, (max - min) / num_bins as f64)
    } else {
        (1, 1.0)
    };
    let mut counts: Vec<u64> = vec![0; num_bins];
    for x in values.iter() {
        let idx = (((x - min) / width).floor() as usize).min(num_bins - 1);
        counts[idx] += 1;
    }
    let bins: Vec<HistogramBin> = counts
        .iter()
        .enumerate()
        .map(|(idx, c)| HistogramBin {
            start: min + width * idx as f64,
            end: min + width * (idx + 1) as f64,
            count: *c,
        })
        .collect();
    debug!("histogram: {}: {:?}", column, bins);
    Ok(Histogram {
        column: column.to_string(),
        bins,
    })
}

/// Cross-tabulation of two columns, normalized per row.
///
/// For every value of `row_column`, the percentage (0-100) of each value of
/// `col_column`. Only the rows where both columns are present are counted.
/// Rows and columns are sorted by label. A combination that never occurs is
/// reported as 0%.
pub fn cross_tab(ds: &Dataset, row_column: &str, col_column: &str) -> Result<CrossTab, StatsError> {
    let row_cells = ds.column(row_column)?;
    let col_cells = ds.column(col_column)?;

    let mut table: BTreeMap<&str, HashMap<&str, u64>> = BTreeMap::new();
    let mut col_set: BTreeMap<&str, ()> = BTreeMap::new();
    for (r, c) in row_cells.iter().zip(col_cells.iter()) {
        if let (Some(r), Some(c)) = (r, c) {
            *table
                .entry(r.as_str())
                .or_default()
                .entry(c.as_str())
                .or_insert(0) += 1;
            col_set.insert(c.as_str(), ());
        }
    }
    let col_labels: Vec<String> = col_set.keys().map(|s| s.to_string()).collect();

    let rows: Vec<CrossTabRow> = table
        .iter()
        .map(|(label, counts)| {
            let total: u64 = counts.values().sum();
            let cells: Vec<f64> = col_labels
                .iter()
                .map(|cl| percentage(counts.get(cl.as_str()).cloned().unwrap_or(0), total))
                .collect();
            CrossTabRow {
                label: label.to_string(),
                total,
                cells,
            }
        })
        .collect();
    debug!(
        "cross_tab: {} x {}: columns {:?} rows {:?}",
        row_column, col_column, col_labels, rows
    );
    Ok(CrossTab {
        row_column: row_column.to_string(),
        col_column: col_column.to_string(),
        col_labels,
        rows,
    })
}

/// The distribution of `category_column` within each value of `group_column`,
/// in long form.
///
/// Groups follow `group_order` when one is given: listed groups that were not
/// observed are omitted, observed groups that are not listed come last in label
/// order. Without an order, groups are sorted by label. Within a group,
/// categories come by decreasing share, and a category with no observation in
/// that group has no entry.
pub fn grouped_proportion(
    ds: &Dataset,
    group_column: &str,
    category_column: &str,
    group_order: Option<&[&str]>,
) -> Result<GroupedProportion, StatsError> {
    let group_cells = ds.column(group_column)?;
    let cat_cells = ds.column(category_column)?;

    let mut groups: BTreeMap<&str, HashMap<&str, u64>> = BTreeMap::new();
    for (g, c) in group_cells.iter().zip(cat_cells.iter()) {
        if let (Some(g), Some(c)) = (g, c) {
            *groups
                .entry(g.as_str())
                .or_default()
                .entry(c.as_str())
                .or_insert(0) += 1;
        }
    }

    let mut ordered_groups: Vec<&str> = Vec::new();
    if let Some(order) = group_order {
        for g in order.iter() {
            if groups.contains_key(g) {
                ordered_groups.push(*g);
            }
        }
    }
    for g in groups.keys() {
        if !ordered_groups.contains(g) {
            ordered_groups.push(*g);
        }
    }

    let mut entries: Vec<GroupShare> = Vec::new();
    for g in ordered_groups {
        if let Some(counts) = groups.remove(g) {
            let total: u64 = counts.values().sum();
            for (category, c) in sorted_counts(counts) {
                entries.push(GroupShare {
                    group: g.to_string(),
                    category,
                    percentage: percentage(c, total),
                });
            }
        }
    }
    debug!(
        "grouped_proportion: {} within {}: {:?}",
        category_column, group_column, entries
    );
    Ok(GroupedProportion {
        group_column: group_column.to_string(),
        category_column: category_column.to_string(),
        entries,
    })
}

/// The impact score of every factor on the rate of `target_level` in
/// `target_column`, sorted by increasing score.
///
/// The score is the rate at the comparison level minus the rate at the
/// baseline level, in percentage points. A level that does not occur in the
/// data fails the whole computation with `LevelAbsent`.
pub fn impact_scores(
    ds: &Dataset,
    factors: &[ImpactFactor],
    target_column: &str,
    target_level: &str,
) -> Result<Vec<ImpactScore>, StatsError> {
    let mut scores: Vec<ImpactScore> = Vec::new();
    for f in factors.iter() {
        let ct = cross_tab(ds, f.column, target_column)?;
        if !ct.col_labels.iter().any(|l| l == target_level) {
            return Err(StatsError::LevelAbsent {
                column: target_column.to_string(),
                level: target_level.to_string(),
            });
        }
        let comparison = ct.rate(f.comparison, target_level)?;
        let baseline = ct.rate(f.baseline, target_level)?;
        debug!(
            "impact_scores: {}: {} -> {:.2}, {} -> {:.2}",
            f.name, f.comparison, comparison, f.baseline, baseline
        );
        scores.push(ImpactScore {
            name: f.name.to_string(),
            delta: comparison - baseline,
        });
    }
    scores.sort_by(|a, b| {
        a.delta
            .partial_cmp(&b.delta)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(scores)
}

/// The share of `level` among the non-missing values of `column` (0-100).
pub fn kpi_rate(ds: &Dataset, column: &str, level: &str) -> Result<f64, StatsError> {
    distribution(ds, column)?.share(level)
}

/// A rate on the 0-100 scale with one decimal and a percent sign.
///
/// ```
/// assert_eq!(survey_stats::format_kpi(62.5), "62.5%");
/// ```
pub fn format_kpi(rate: f64) -> String {
    format!("{:.1}%", rate)
}

/// The share of `level` in `column`, formatted for display (`"70.0%"`).
pub fn kpi(ds: &Dataset, column: &str, level: &str) -> Result<String, StatsError> {
    kpi_rate(ds, column, level).map(format_kpi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    const EPSILON: f64 = 0.01;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn treatment_only(yes: usize, no: usize) -> Dataset {
        let mut b = Builder::new(&["treatment"]).unwrap();
        b.add_rows(&["Yes"], yes).unwrap();
        b.add_rows(&["No"], no).unwrap();
        b.build().unwrap()
    }

    fn family_history() -> Dataset {
        let mut b = Builder::new(&["family_history", "treatment"]).unwrap();
        b.add_rows(&["Yes", "Yes"], 8).unwrap();
        b.add_rows(&["Yes", "No"], 2).unwrap();
        b.add_rows(&["No", "Yes"], 5).unwrap();
        b.add_rows(&["No", "No"], 5).unwrap();
        b.build().unwrap()
    }

    fn leave() -> Dataset {
        let mut b = Builder::new(&["leave", "treatment", "remote_work"]).unwrap();
        b.add_rows(&["Somewhat difficult", "Yes", "No"], 6).unwrap();
        b.add_rows(&["Somewhat difficult", "No", "Yes"], 4).unwrap();
        b.add_rows(&["Very easy", "Yes", "No"], 5).unwrap();
        b.add_rows(&["Don't know", "No", "No"], 3).unwrap();
        b.add_row(&["", "Yes", "Yes"]).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn kpi_treatment_rate() {
        init();
        let ds = treatment_only(70, 30);
        assert_eq!(kpi(&ds, "treatment", "Yes").unwrap(), "70.0%");
        assert_eq!(kpi(&ds, "treatment", "No").unwrap(), "30.0%");
    }

    #[test]
    fn kpi_absent_level_fails() {
        let ds = treatment_only(0, 10);
        assert_eq!(
            kpi(&ds, "treatment", "Yes"),
            Err(StatsError::LevelAbsent {
                column: "treatment".to_string(),
                level: "Yes".to_string()
            })
        );
    }

    #[test]
    fn kpi_ignores_missing_answers() {
        let mut b = Builder::new(&["treatment"]).unwrap();
        b.add_rows(&["Yes"], 1).unwrap();
        b.add_rows(&["No"], 3).unwrap();
        b.add_rows(&["NA"], 4).unwrap();
        let ds = b.build().unwrap();
        assert_eq!(kpi(&ds, "treatment", "Yes").unwrap(), "25.0%");
    }

    #[test]
    fn family_history_impact_score() {
        init();
        let ds = family_history();
        let factors = [ImpactFactor {
            name: "Family History",
            column: "family_history",
            baseline: "No",
            comparison: "Yes",
        }];
        let scores = impact_scores(&ds, &factors, "treatment", "Yes").unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].name, "Family History");
        assert!((scores[0].delta - 30.0).abs() < EPSILON);
    }

    #[test]
    fn impact_scores_are_ascending() {
        let mut b = Builder::new(&["a", "b", "treatment"]).unwrap();
        // a: Yes -> 100%, No -> 0%. b: Yes -> 0%, No -> 100%.
        b.add_rows(&["Yes", "No", "Yes"], 2).unwrap();
        b.add_rows(&["No", "Yes", "No"], 2).unwrap();
        let ds = b.build().unwrap();
        let factors = [
            ImpactFactor {
                name: "A",
                column: "a",
                baseline: "No",
                comparison: "Yes",
            },
            ImpactFactor {
                name: "B",
                column: "b",
                baseline: "No",
                comparison: "Yes",
            },
        ];
        let scores = impact_scores(&ds, &factors, "treatment", "Yes").unwrap();
        let names: Vec<&str> = scores.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert!((scores[0].delta + 100.0).abs() < EPSILON);
        assert!((scores[1].delta - 100.0).abs() < EPSILON);
    }

    #[test]
    fn impact_score_with_absent_baseline_fails() {
        let mut b = Builder::new(&["work_interfere", "treatment"]).unwrap();
        b.add_rows(&["Often", "Yes"], 3).unwrap();
        b.add_rows(&["Sometimes", "No"], 3).unwrap();
        let ds = b.build().unwrap();
        let res = impact_scores(&ds, &IMPACT_FACTORS[1..2], "treatment", "Yes");
        assert_eq!(
            res,
            Err(StatsError::LevelAbsent {
                column: "work_interfere".to_string(),
                level: "Never".to_string()
            })
        );
    }

    #[test]
    fn impact_score_without_any_target_level_fails() {
        let mut b = Builder::new(&["family_history", "treatment"]).unwrap();
        b.add_rows(&["Yes", "No"], 4).unwrap();
        b.add_rows(&["No", "No"], 4).unwrap();
        let ds = b.build().unwrap();
        let absent = StatsError::LevelAbsent {
            column: "treatment".to_string(),
            level: "Yes".to_string(),
        };
        // Same failure as the KPI on the same data.
        assert_eq!(
            impact_scores(&ds, &IMPACT_FACTORS[0..1], "treatment", "Yes"),
            Err(absent.clone())
        );
        assert_eq!(kpi(&ds, "treatment", "Yes"), Err(absent));
    }

    #[test]
    fn cross_tab_sorted_by_yes_rate() {
        init();
        let ds = leave();
        let ct = cross_tab(&ds, "leave", "treatment")
            .unwrap()
            .sorted_by_rate_desc("Yes");
        assert_eq!(
            ct.row_labels(),
            vec!["Very easy", "Somewhat difficult", "Don't know"]
        );
        let rates = ct.rates("Yes");
        assert!((rates[0].1 - 100.0).abs() < EPSILON);
        assert!((rates[1].1 - 60.0).abs() < EPSILON);
        // No "Yes" at all for this row: a rate of zero, not a gap.
        assert_eq!(rates[2], ("Don't know".to_string(), 0.0));
    }

    #[test]
    fn cross_tab_rows_sum_to_100() {
        let ds = leave();
        let ct = cross_tab(&ds, "leave", "treatment").unwrap();
        for row in ct.rows.iter() {
            let s: f64 = row.cells.iter().sum();
            assert!((s - 100.0).abs() < EPSILON, "row {:?}", row);
        }
    }

    #[test]
    fn cross_tab_ties_keep_label_order() {
        let mut b = Builder::new(&["remote_work", "treatment"]).unwrap();
        b.add_rows(&["Yes", "Yes"], 1).unwrap();
        b.add_rows(&["No", "Yes"], 1).unwrap();
        let ds = b.build().unwrap();
        let ct = cross_tab(&ds, "remote_work", "treatment")
            .unwrap()
            .sorted_by_rate_desc("Yes");
        assert_eq!(ct.row_labels(), vec!["No", "Yes"]);
    }

    #[test]
    fn cross_tab_rate_for_absent_target_column_is_zero() {
        let mut b = Builder::new(&["leave", "treatment"]).unwrap();
        b.add_rows(&["Very easy", "No"], 4).unwrap();
        let ds = b.build().unwrap();
        let ct = cross_tab(&ds, "leave", "treatment").unwrap();
        assert_eq!(ct.rate("Very easy", "Yes"), Ok(0.0));
        assert!(matches!(
            ct.rate("Very difficult", "Yes"),
            Err(StatsError::LevelAbsent { .. })
        ));
    }

    #[test]
    fn cross_tab_labels_are_exactly_the_observed_values() {
        let ds = leave();
        let ct = cross_tab(&ds, "leave", "treatment").unwrap();
        let mut expected: Vec<String> = distribution(&ds, "leave").unwrap().labels();
        expected.sort();
        assert_eq!(ct.row_labels(), expected);
        assert_eq!(ct.col_labels, vec!["No", "Yes"]);
    }

    #[test]
    fn distribution_of_unknown_column_fails() {
        let ds = leave();
        assert_eq!(
            distribution(&ds, "Leave"),
            Err(StatsError::UnknownColumn("Leave".to_string()))
        );
        assert!(cross_tab(&ds, "leave", "Treatment").is_err());
    }

    #[test]
    fn distribution_counts_present_values() {
        let ds = leave();
        let d = distribution(&ds, "leave").unwrap();
        assert_eq!(
            d.entries,
            vec![
                ("Somewhat difficult".to_string(), 10),
                ("Very easy".to_string(), 5),
                ("Don't know".to_string(), 3),
            ]
        );
        assert_eq!(d.total(), 18);
        let total_pct: f64 = d.percentages().iter().map(|(_, p)| p).sum();
        assert!((total_pct - 100.0).abs() < EPSILON);
    }

    #[test]
    fn distribution_in_order_fills_zeros() {
        let mut b = Builder::new(&["no_employees"]).unwrap();
        b.add_rows(&["26-100"], 4).unwrap();
        b.add_rows(&["More than 1000"], 2).unwrap();
        let ds = b.build().unwrap();
        let d = distribution_in_order(&ds, "no_employees", &COMPANY_SIZE_ORDER).unwrap();
        assert_eq!(d.entries.len(), COMPANY_SIZE_ORDER.len());
        assert_eq!(d.labels(), COMPANY_SIZE_ORDER.to_vec());
        assert_eq!(d.count("5-Jan"), Some(0));
        assert_eq!(d.count("26-100"), Some(4));
        assert_eq!(d.count("More than 1000"), Some(2));
    }

    #[test]
    fn distribution_in_order_drops_unlisted_values() {
        let mut b = Builder::new(&["coworkers"]).unwrap();
        b.add_rows(&["Yes"], 2).unwrap();
        b.add_rows(&["Maybe"], 2).unwrap();
        let ds = b.build().unwrap();
        let d = distribution_in_order(&ds, "coworkers", &TRUST_ORDER).unwrap();
        assert_eq!(
            d.entries,
            vec![
                ("Yes".to_string(), 2),
                ("Some of them".to_string(), 0),
                ("No".to_string(), 0)
            ]
        );
    }

    #[test]
    fn grouped_proportion_sums_per_group() {
        let ds = leave();
        let gp = grouped_proportion(&ds, "remote_work", "leave", None).unwrap();
        assert_eq!(gp.groups(), vec!["No", "Yes"]);
        for g in gp.groups() {
            let s: f64 = gp
                .entries
                .iter()
                .filter(|e| e.group == g)
                .map(|e| e.percentage)
                .sum();
            assert!((s - 100.0).abs() < EPSILON, "group {}", g);
        }
        // Only "Somewhat difficult" for remote workers: no zero entries.
        assert_eq!(gp.share("Yes", "Somewhat difficult"), Some(100.0));
        assert_eq!(gp.share("Yes", "Very easy"), None);
    }

    #[test]
    fn grouped_proportion_follows_group_order() {
        let mut b = Builder::new(&["no_employees", "care_options"]).unwrap();
        b.add_rows(&["More than 1000", "Yes"], 3).unwrap();
        b.add_rows(&["More than 1000", "No"], 1).unwrap();
        b.add_rows(&["5-Jan", "Not sure"], 2).unwrap();
        b.add_rows(&["Unknown size", "Yes"], 1).unwrap();
        let ds = b.build().unwrap();
        let gp = grouped_proportion(
            &ds,
            "no_employees",
            "care_options",
            Some(&COMPANY_SIZE_ORDER[..]),
        )
        .unwrap();
        assert_eq!(gp.groups(), vec!["5-Jan", "More than 1000", "Unknown size"]);
        assert_eq!(gp.share("More than 1000", "Yes"), Some(75.0));
        assert_eq!(gp.share("More than 1000", "No"), Some(25.0));
        assert_eq!(gp.entries[1].category, "Yes");
    }

    #[test]
    fn histogram_counts_every_value() {
        let mut b = Builder::new(&["Age"]).unwrap();
        for age in ["20", "25", "30", "35", "40", "", "60"] {
            b.add_row(&[age]).unwrap();
        }
        let ds = b.build().unwrap();
        let h = histogram(&ds, "Age", 4).unwrap();
        assert_eq!(h.bins.len(), 4);
        assert_eq!(h.total(), 6);
        assert_eq!(h.bins[0].start, 20.0);
        assert_eq!(h.bins[3].end, 60.0);
        assert_eq!(
            h.bins.iter().map(|b| b.count).collect::<Vec<u64>>(),
            vec![2, 2, 1, 1]
        );
    }

    #[test]
    fn histogram_rejects_text() {
        let mut b = Builder::new(&["Age"]).unwrap();
        b.add_row(&["thirty"]).unwrap();
        let ds = b.build().unwrap();
        assert!(matches!(
            histogram(&ds, "Age", 10),
            Err(StatsError::NotNumeric { .. })
        ));
    }

    #[test]
    fn aggregations_are_idempotent() {
        let ds = leave();
        assert_eq!(
            cross_tab(&ds, "leave", "treatment"),
            cross_tab(&ds, "leave", "treatment")
        );
        assert_eq!(
            grouped_proportion(&ds, "remote_work", "leave", None),
            grouped_proportion(&ds, "remote_work", "leave", None)
        );
        assert_eq!(distribution(&ds, "leave"), distribution(&ds, "leave"));
    }
}
