// The JSON summary: every table of the dashboard in one document.

use serde_json::json;
use serde_json::Map as JSMap;

use crate::dashboard::*;

fn distribution_to_json(d: &Distribution) -> JSValue {
    let entries: Vec<JSValue> = d
        .entries
        .iter()
        .map(|(label, count)| json!({ "label": label, "count": count }))
        .collect();
    json!({ "column": d.column, "total": d.total(), "entries": entries })
}

fn cross_tab_to_json(ct: &CrossTab) -> JSValue {
    let rows: Vec<JSValue> = ct
        .rows
        .iter()
        .map(|row| {
            let mut rates: JSMap<String, JSValue> = JSMap::new();
            for (label, cell) in ct.col_labels.iter().zip(row.cells.iter()) {
                rates.insert(label.clone(), json!(cell));
            }
            json!({ "label": row.label, "total": row.total, "rates": rates })
        })
        .collect();
    json!({
        "rowColumn": ct.row_column,
        "colColumn": ct.col_column,
        "colLabels": ct.col_labels,
        "rows": rows,
    })
}

fn grouped_to_json(gp: &GroupedProportion) -> JSValue {
    let entries: Vec<JSValue> = gp
        .entries
        .iter()
        .map(|e| json!({ "group": e.group, "category": e.category, "percentage": e.percentage }))
        .collect();
    json!({
        "groupColumn": gp.group_column,
        "categoryColumn": gp.category_column,
        "entries": entries,
    })
}

fn histogram_to_json(h: &Histogram) -> JSValue {
    let bins: Vec<JSValue> = h
        .bins
        .iter()
        .map(|b| json!({ "start": b.start, "end": b.end, "count": b.count }))
        .collect();
    json!({ "column": h.column, "total": h.total(), "bins": bins })
}

fn impact_to_json(scores: &[ImpactScore]) -> JSValue {
    let l: Vec<JSValue> = scores
        .iter()
        .map(|s| json!({ "factor": s.name, "impactScore": s.delta }))
        .collect();
    json!(l)
}

fn tables(items: Vec<(&str, JSValue)>) -> JSMap<String, JSValue> {
    items
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn stat<T>(
    res: Result<T, StatsError>,
    what: &str,
    f: impl Fn(&T) -> JSValue,
) -> DashboardResult<JSValue> {
    let x = res.context(AggregationSnafu { what })?;
    Ok(f(&x))
}

/// Computes every question and writes the results as JSON.
pub fn build_summary_js(survey: &Survey) -> DashboardResult<JSValue> {
    let s = survey;
    let mut questions: Vec<JSValue> = Vec::new();
    let mut push = |id: &str, t: JSMap<String, JSValue>| {
        questions.push(json!({ "question": id, "tables": t }));
    };
    push(
        "Q1",
        tables(vec![
            ("gender", stat(s.gender_distribution(), "gender", distribution_to_json)?),
            ("age", stat(s.age_histogram(), "age", histogram_to_json)?),
        ]),
    );
    push(
        "Q2",
        tables(vec![
            (
                "companySize",
                stat(s.company_size_distribution(), "company size", distribution_to_json)?,
            ),
            (
                "techCompany",
                stat(s.tech_company_distribution(), "tech company", distribution_to_json)?,
            ),
        ]),
    );
    push(
        "Q3",
        tables(vec![(
            "familyHistory",
            stat(s.family_history_distribution(), "family history", distribution_to_json)?,
        )]),
    );
    push(
        "Q4",
        tables(vec![
            ("benefits", stat(s.benefits_distribution(), "benefits", distribution_to_json)?),
            (
                "wellnessProgram",
                stat(s.wellness_program_distribution(), "wellness program", distribution_to_json)?,
            ),
        ]),
    );
    push(
        "Q5",
        tables(vec![(
            "careOptionsByCompanySize",
            stat(s.care_options_by_company_size(), "care options", grouped_to_json)?,
        )]),
    );
    push(
        "Q6",
        tables(vec![(
            "treatmentByLeave",
            stat(s.treatment_by_leave(), "treatment by leave", cross_tab_to_json)?,
        )]),
    );
    push(
        "Q7",
        tables(vec![
            ("treatment", stat(s.treatment_distribution(), "treatment", distribution_to_json)?),
            (
                "treatmentByFamilyHistory",
                stat(
                    s.treatment_by_family_history(),
                    "treatment by family history",
                    cross_tab_to_json,
                )?,
            ),
        ]),
    );
    push(
        "Q8",
        tables(vec![(
            "treatmentByWorkInterference",
            stat(
                s.treatment_by_work_interference(),
                "treatment by work interference",
                cross_tab_to_json,
            )?,
        )]),
    );
    push(
        "Q9",
        tables(vec![(
            "treatmentByGenderUnderInterference",
            stat(
                s.treatment_by_gender_under_interference(),
                "treatment by gender",
                cross_tab_to_json,
            )?,
        )]),
    );
    push(
        "Q10",
        tables(vec![
            (
                "mentalHealthConsequence",
                stat(s.mental_consequence_distribution(), "mental consequences", distribution_to_json)?,
            ),
            (
                "physHealthConsequence",
                stat(
                    s.physical_consequence_distribution(),
                    "physical consequences",
                    distribution_to_json,
                )?,
            ),
        ]),
    );
    push(
        "Q11",
        tables(vec![(
            "treatmentByFearOfConsequences",
            stat(
                s.treatment_by_fear_of_consequences(),
                "treatment by fear of consequences",
                cross_tab_to_json,
            )?,
        )]),
    );
    push(
        "Q12",
        tables(vec![
            ("coworkers", stat(s.coworker_trust(), "coworker trust", distribution_to_json)?),
            ("supervisor", stat(s.supervisor_trust(), "supervisor trust", distribution_to_json)?),
        ]),
    );
    push(
        "Q13",
        tables(vec![(
            "mentalVsPhysical",
            stat(s.seriousness_distribution(), "seriousness", distribution_to_json)?,
        )]),
    );
    push(
        "Q14",
        tables(vec![(
            "witnessedConsequencesByTech",
            stat(
                s.witnessed_consequences_by_tech(),
                "witnessed consequences",
                cross_tab_to_json,
            )?,
        )]),
    );
    push(
        "Q15",
        tables(vec![(
            "treatmentByWitnessedConsequences",
            stat(
                s.treatment_by_witnessed_consequences(),
                "treatment by witnessed consequences",
                cross_tab_to_json,
            )?,
        )]),
    );
    push(
        "Q16",
        tables(vec![(
            "treatmentByRemoteWork",
            stat(s.treatment_by_remote_work(), "treatment by remote work", cross_tab_to_json)?,
        )]),
    );
    push(
        "Q17",
        tables(vec![(
            "leaveByRemoteWork",
            stat(s.leave_by_remote_work(), "leave by remote work", grouped_to_json)?,
        )]),
    );
    push(
        "Q18",
        tables(vec![(
            "topFactors",
            stat(s.top_factors(), "top factors", |x| impact_to_json(x))?,
        )]),
    );

    let benefits = stat(
        s.treatment_by_benefits(),
        "treatment by benefits",
        cross_tab_to_json,
    )?;
    let kpis: Vec<JSValue> = s
        .kpis()
        .context(AggregationSnafu { what: "KPIs" })?
        .into_iter()
        .map(|(k, value)| {
            json!({ "name": k.name, "column": k.column, "level": k.level, "value": value })
        })
        .collect();
    debug!("build_summary_js: {} questions", questions.len());

    Ok(json!({
        "respondents": s.dataset().num_rows(),
        "kpis": kpis,
        "treatmentByBenefits": benefits,
        "questions": questions,
    }))
}
