//! Chart descriptions for plotly.js.
//!
//! Every function here takes a finished result table and lays it out as a
//! figure (`{"data": [...], "layout": {...}}`). No counting happens here: the
//! order and the values of the tables are kept as they are.

use serde_json::json;
use serde_json::Value as JSValue;
use survey_stats::*;

pub const PRIMARY: &str = "#4A5568";
pub const ACCENT_TEAL: &str = "#38B2AC";
pub const ACCENT_GRAY: &str = "#A0AEC0";
pub const UNKNOWN_GRAY: &str = "#CCCCCC";

fn figure(data: Vec<JSValue>, layout: JSValue) -> JSValue {
    json!({ "data": data, "layout": layout })
}

fn pie_trace(dist: &Distribution, hole: f64) -> JSValue {
    let (labels, values): (Vec<String>, Vec<u64>) = dist.entries.iter().cloned().unzip();
    json!({
        "type": "pie",
        "labels": labels,
        "values": values,
        "hole": hole,
        "name": dist.column,
        "hoverinfo": "label+percent+name",
    })
}

fn counts_bar_trace(dist: &Distribution, name: &str) -> JSValue {
    let (labels, values): (Vec<String>, Vec<u64>) = dist.entries.iter().cloned().unzip();
    json!({
        "type": "bar",
        "x": labels,
        "y": values,
        "name": name,
        "marker": { "color": PRIMARY },
    })
}

fn subplot_title(text: &str, x: f64) -> JSValue {
    json!({
        "text": text,
        "x": x,
        "y": 1.0,
        "xref": "paper",
        "yref": "paper",
        "xanchor": "center",
        "yanchor": "bottom",
        "showarrow": false,
    })
}

/// A pie chart of a distribution.
pub fn pie(title: &str, dist: &Distribution, hole: f64) -> JSValue {
    figure(vec![pie_trace(dist, hole)], json!({ "title": { "text": title } }))
}

/// A pie chart with one color per slice, in entry order.
pub fn pie_with_colors(title: &str, dist: &Distribution, hole: f64, colors: &[&str]) -> JSValue {
    let mut trace = pie_trace(dist, hole);
    trace["marker"] = json!({ "colors": colors });
    figure(vec![trace], json!({ "title": { "text": title } }))
}

/// A bar chart of the counts of a distribution, in entry order.
pub fn count_bar(title: &str, dist: &Distribution, x_label: &str, y_label: &str) -> JSValue {
    figure(
        vec![counts_bar_trace(dist, &dist.column)],
        json!({
            "title": { "text": title },
            "xaxis": { "title": { "text": x_label }, "type": "category" },
            "yaxis": { "title": { "text": y_label } },
        }),
    )
}

/// A histogram, drawn as adjacent bars at the bin centers.
pub fn histogram(title: &str, h: &Histogram, x_label: &str) -> JSValue {
    let centers: Vec<f64> = h.bins.iter().map(|b| (b.start + b.end) / 2.0).collect();
    let widths: Vec<f64> = h.bins.iter().map(|b| b.end - b.start).collect();
    let counts: Vec<u64> = h.bins.iter().map(|b| b.count).collect();
    figure(
        vec![json!({
            "type": "bar",
            "x": centers,
            "y": counts,
            "width": widths,
            "name": h.column,
            "marker": { "color": PRIMARY },
        })],
        json!({
            "title": { "text": title },
            "bargap": 0.1,
            "xaxis": { "title": { "text": x_label } },
            "yaxis": { "title": { "text": "count" } },
        }),
    )
}

/// Two pie charts side by side.
pub fn two_pies(
    title: &str,
    left: (&str, &Distribution),
    right: (&str, &Distribution),
) -> JSValue {
    let mut t1 = pie_trace(left.1, 0.4);
    t1["domain"] = json!({ "x": [0.0, 0.46], "y": [0.0, 1.0] });
    let mut t2 = pie_trace(right.1, 0.4);
    t2["domain"] = json!({ "x": [0.54, 1.0], "y": [0.0, 1.0] });
    figure(
        vec![t1, t2],
        json!({
            "title": { "text": title },
            "annotations": [subplot_title(left.0, 0.23), subplot_title(right.0, 0.77)],
        }),
    )
}

/// Two count bar charts side by side.
pub fn two_count_bars(
    title: &str,
    left: (&str, &Distribution),
    right: (&str, &Distribution),
) -> JSValue {
    let t1 = counts_bar_trace(left.1, left.0);
    let mut t2 = counts_bar_trace(right.1, right.0);
    t2["xaxis"] = json!("x2");
    t2["yaxis"] = json!("y2");
    figure(
        vec![t1, t2],
        json!({
            "title": { "text": title },
            "showlegend": false,
            "xaxis": { "domain": [0.0, 0.45], "type": "category" },
            "xaxis2": { "domain": [0.55, 1.0], "type": "category" },
            "yaxis2": { "anchor": "x2" },
            "annotations": [subplot_title(left.0, 0.225), subplot_title(right.0, 0.775)],
        }),
    )
}

fn rate_bar_trace(ct: &CrossTab, level: &str, name: &str) -> JSValue {
    let (labels, rates): (Vec<String>, Vec<f64>) = ct.rates(level).into_iter().unzip();
    json!({
        "type": "bar",
        "x": labels,
        "y": rates,
        "name": name,
    })
}

/// The rate of `level` for every row of a cross-tabulation, as bars in row order.
pub fn rate_bar(title: &str, ct: &CrossTab, level: &str, x_label: &str, y_label: &str) -> JSValue {
    let mut trace = rate_bar_trace(ct, level, y_label);
    trace["marker"] = json!({ "color": PRIMARY });
    figure(
        vec![trace],
        json!({
            "title": { "text": title },
            "xaxis": { "title": { "text": x_label }, "type": "category" },
            "yaxis": { "title": { "text": y_label } },
        }),
    )
}

/// Same as `rate_bar`, with one colored series per row so that every row gets
/// its own legend entry. `colors` optionally maps row labels to colors.
pub fn colored_rate_bar(
    title: &str,
    ct: &CrossTab,
    level: &str,
    x_label: &str,
    y_label: &str,
    colors: &[(&str, &str)],
) -> JSValue {
    let traces: Vec<JSValue> = ct
        .rates(level)
        .into_iter()
        .map(|(label, rate)| {
            let mut t = json!({
                "type": "bar",
                "x": [label.clone()],
                "y": [rate],
                "name": label.clone(),
            });
            if let Some((_, c)) = colors.iter().find(|(l, _)| *l == label) {
                t["marker"] = json!({ "color": c });
            }
            t
        })
        .collect();
    figure(
        traces,
        json!({
            "title": { "text": title },
            "xaxis": { "title": { "text": x_label }, "type": "category" },
            "yaxis": { "title": { "text": y_label } },
        }),
    )
}

/// A pie chart of a distribution next to the rate bars of a cross-tabulation.
pub fn pie_and_rate_bar(
    title: &str,
    left: (&str, &Distribution),
    right: (&str, &CrossTab),
    level: &str,
    y_label: &str,
) -> JSValue {
    let mut pie = pie_trace(left.1, 0.4);
    pie["domain"] = json!({ "x": [0.0, 0.45], "y": [0.0, 1.0] });
    let mut bars = rate_bar_trace(right.1, level, "Sought Treatment");
    bars["marker"] = json!({ "color": ACCENT_TEAL });
    figure(
        vec![pie, bars],
        json!({
            "title": { "text": title },
            "showlegend": false,
            "xaxis": { "domain": [0.55, 1.0], "type": "category" },
            "yaxis": { "title": { "text": y_label } },
            "annotations": [subplot_title(left.0, 0.225), subplot_title(right.0, 0.775)],
        }),
    )
}

/// Which dimension of a grouped proportion goes on the x axis. The other one
/// becomes the series.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum GroupAxis {
    Group,
    Category,
}

/// Grouped bars of a long-form proportion table.
pub fn grouped_bar(
    title: &str,
    gp: &GroupedProportion,
    x_axis: GroupAxis,
    x_label: &str,
    y_label: &str,
) -> JSValue {
    let (xs, series) = match x_axis {
        GroupAxis::Group => (gp.groups(), gp.categories()),
        GroupAxis::Category => (gp.categories(), gp.groups()),
    };
    let traces: Vec<JSValue> = series
        .iter()
        .map(|s| {
            // A combination without observations has no bar.
            let mut x: Vec<String> = Vec::new();
            let mut y: Vec<f64> = Vec::new();
            for xv in xs.iter() {
                let share = match x_axis {
                    GroupAxis::Group => gp.share(xv, s),
                    GroupAxis::Category => gp.share(s, xv),
                };
                if let Some(p) = share {
                    x.push(xv.clone());
                    y.push(p);
                }
            }
            json!({ "type": "bar", "x": x, "y": y, "name": s })
        })
        .collect();
    figure(
        traces,
        json!({
            "title": { "text": title },
            "barmode": "group",
            "xaxis": {
                "title": { "text": x_label },
                "type": "category",
                "categoryorder": "array",
                "categoryarray": xs,
            },
            "yaxis": { "title": { "text": y_label } },
        }),
    )
}

/// Horizontal bars of impact scores, in the given order (bottom to top).
pub fn impact_bar(title: &str, scores: &[ImpactScore], x_label: &str) -> JSValue {
    let names: Vec<String> = scores.iter().map(|s| s.name.clone()).collect();
    let deltas: Vec<f64> = scores.iter().map(|s| s.delta).collect();
    figure(
        vec![json!({
            "type": "bar",
            "orientation": "h",
            "x": deltas,
            "y": names,
            "marker": { "color": ACCENT_TEAL },
        })],
        json!({
            "title": { "text": title },
            "xaxis": { "title": { "text": x_label } },
            "yaxis": { "title": { "text": "Factor" }, "type": "category" },
        }),
    )
}
