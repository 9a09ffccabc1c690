// Rendering of the static site: a lobby, one page per presenter and a summary.

use std::fmt::Write;

use crate::dashboard::charts::{self, GroupAxis};
use crate::dashboard::*;

/// One question on a page, answered by one or more figures.
struct Section {
    heading: String,
    figures: Vec<JSValue>,
}

struct PresenterPage {
    name: &'static str,
    questions: [&'static str; 3],
}

const PRESENTERS: [PresenterPage; 6] = [
    PresenterPage {
        name: "The HR Generalist",
        questions: [
            "What is our demographic profile?",
            "What is our workplace landscape?",
            "What is the baseline risk from family history?",
        ],
    },
    PresenterPage {
        name: "The Benefits Specialist",
        questions: [
            "How comprehensive is our formal support?",
            "Are employees aware of care options?",
            "How does leave accessibility impact treatment?",
        ],
    },
    PresenterPage {
        name: "The Lead Analyst",
        questions: [
            "How does family history impact treatment?",
            "How does work interference predict treatment?",
            "Is there a gender disparity in seeking help?",
        ],
    },
    PresenterPage {
        name: "The Culture Officer",
        questions: [
            "Is mental health stigma greater than physical?",
            "Does fear of consequences prevent treatment?",
            "Who do employees trust more: coworkers or supervisors?",
        ],
    },
    PresenterPage {
        name: "The Workplace Environment Analyst",
        questions: [
            "Is mental health taken seriously?",
            "Are negative consequences witnessed more in tech?",
            "Does witnessing negativity reduce treatment rates?",
        ],
    },
    PresenterPage {
        name: "The Modern Workplace Strategist",
        questions: [
            "How does remote work affect treatment rates?",
            "Does remote work impact taking leave?",
            "What are the top 3 summary factors?",
        ],
    },
];

const RATE_LABEL: &str = "Treatment Rate (%)";

fn agg<T>(res: Result<T, StatsError>, what: &str) -> DashboardResult<T> {
    res.context(AggregationSnafu { what })
}

fn benefit_colors() -> [(&'static str, &'static str); 3] {
    [
        (YES, charts::ACCENT_TEAL),
        (NO, charts::ACCENT_GRAY),
        ("Don't know", charts::UNKNOWN_GRAY),
    ]
}

// The figures of each presenter, in page order.
fn presenter_figures(survey: &Survey, idx: usize) -> DashboardResult<[Vec<JSValue>; 3]> {
    let figures = match idx {
        0 => {
            let gender = agg(survey.gender_distribution(), "the gender distribution")?;
            let age = agg(survey.age_histogram(), "the age histogram")?;
            let size = agg(survey.company_size_distribution(), "the company sizes")?;
            let tech = agg(survey.tech_company_distribution(), "the tech companies")?;
            let family = agg(survey.family_history_distribution(), "the family history")?;
            [
                vec![
                    charts::pie("Gender Distribution of Workforce", &gender, 0.3),
                    charts::histogram("Age Distribution of Workforce", &age, "Employee Age"),
                ],
                vec![
                    charts::count_bar(
                        "Company Size Distribution",
                        &size,
                        "Number of Employees",
                        "Count",
                    ),
                    charts::pie("Is the Company Primarily a Tech Company?", &tech, 0.3),
                ],
                vec![charts::pie_with_colors(
                    "Family History of Mental Illness",
                    &family,
                    0.3,
                    &[charts::ACCENT_TEAL, charts::ACCENT_GRAY],
                )],
            ]
        }
        1 => {
            let benefits = agg(survey.benefits_distribution(), "the benefits")?;
            let wellness = agg(survey.wellness_program_distribution(), "the wellness programs")?;
            let care = agg(
                survey.care_options_by_company_size(),
                "the care options by company size",
            )?;
            let leave = agg(survey.treatment_by_leave(), "the treatment rate by leave")?;
            [
                vec![charts::two_pies(
                    "Coverage of Formal Mental Health Support Systems",
                    ("Does Employer Provide Mental Health Benefits?", &benefits),
                    ("Is There a Formal Wellness Program?", &wellness),
                )],
                vec![charts::grouped_bar(
                    "Awareness of Care Options by Company Size",
                    &care,
                    GroupAxis::Group,
                    "Company Size",
                    "Percentage of Employees",
                )],
                vec![charts::rate_bar(
                    "Treatment Rate by Ease of Taking Medical Leave",
                    &leave,
                    YES,
                    "Ease of Taking Medical Leave",
                    RATE_LABEL,
                )],
            ]
        }
        2 => {
            let treatment = agg(survey.treatment_distribution(), "the treatment distribution")?;
            let family = agg(
                survey.treatment_by_family_history(),
                "the treatment rate by family history",
            )?;
            let interference = agg(
                survey.treatment_by_work_interference(),
                "the treatment rate by work interference",
            )?;
            let gender = agg(
                survey.treatment_by_gender_under_interference(),
                "the treatment rate by gender",
            )?;
            [
                vec![charts::pie_and_rate_bar(
                    "Impact of Family History on Seeking Treatment",
                    ("Overall Treatment Rate", &treatment),
                    ("Treatment Rate by Family History", &family),
                    YES,
                    RATE_LABEL,
                )],
                vec![interference_figure(&interference)],
                vec![charts::colored_rate_bar(
                    "Treatment Rate by Gender (for employees with work interference)",
                    &gender,
                    YES,
                    "Gender",
                    RATE_LABEL,
                    &[],
                )],
            ]
        }
        3 => {
            let mental = agg(survey.mental_consequence_distribution(), "the mental consequences")?;
            let physical = agg(
                survey.physical_consequence_distribution(),
                "the physical consequences",
            )?;
            let fear = agg(
                survey.treatment_by_fear_of_consequences(),
                "the treatment rate by fear of consequences",
            )?;
            let coworkers = agg(survey.coworker_trust(), "the coworker trust")?;
            let supervisor = agg(survey.supervisor_trust(), "the supervisor trust")?;
            [
                vec![mental_vs_physical_figure(&mental, &physical)],
                vec![charts::rate_bar(
                    "Impact of Fearing Consequences on Seeking Treatment",
                    &fear,
                    YES,
                    "Fears Negative Consequences?",
                    RATE_LABEL,
                )],
                vec![charts::two_count_bars(
                    "Whom Do Employees Trust with Mental Health Discussions?",
                    ("Willingness to Discuss with Coworkers", &coworkers),
                    ("Willingness to Discuss with Supervisor", &supervisor),
                )],
            ]
        }
        4 => {
            let serious = agg(survey.seriousness_distribution(), "the seriousness perception")?;
            let witnessed = agg(
                survey.witnessed_consequences_by_tech(),
                "the witnessed consequences by tech company",
            )?;
            let witness_treatment = agg(
                survey.treatment_by_witnessed_consequences(),
                "the treatment rate by witnessed consequences",
            )?;
            [
                vec![charts::pie(
                    "Is Mental Health Taken as Seriously as Physical Health?",
                    &serious,
                    0.4,
                )],
                vec![charts::colored_rate_bar(
                    "Percentage of Employees Who Witnessed Negative Consequences",
                    &witnessed,
                    YES,
                    "Is it a Tech Company?",
                    "% Who Witnessed Consequences",
                    &[],
                )],
                vec![witnessing_figure(&witness_treatment)],
            ]
        }
        _ => {
            let remote = agg(survey.treatment_by_remote_work(), "the treatment rate by remote work")?;
            let leave = agg(survey.leave_by_remote_work(), "the leave by remote work")?;
            let factors = agg(survey.top_factors(), "the top factors")?;
            [
                vec![charts::colored_rate_bar(
                    "Treatment Rate by Work Location",
                    &remote,
                    YES,
                    "Works Remotely?",
                    RATE_LABEL,
                    &[],
                )],
                vec![charts::grouped_bar(
                    "Perception of Leave Accessibility by Work Location",
                    &leave,
                    GroupAxis::Category,
                    "Ease of Taking Medical Leave",
                    "Percentage of Employees",
                )],
                vec![factors_figure(&factors)],
            ]
        }
    };
    Ok(figures)
}

fn mental_vs_physical_figure(mental: &Distribution, physical: &Distribution) -> JSValue {
    charts::two_pies(
        "Perceived Negative Consequences: Mental vs. Physical Health",
        ("Consequences for Mental Health", mental),
        ("Consequences for Physical Health", physical),
    )
}

fn witnessing_figure(ct: &CrossTab) -> JSValue {
    charts::colored_rate_bar(
        "Impact of Witnessing Consequences on Seeking Treatment",
        ct,
        YES,
        "Have You Witnessed Negative Consequences?",
        "Personal Treatment Rate (%)",
        &[],
    )
}

fn interference_figure(ct: &CrossTab) -> JSValue {
    charts::rate_bar(
        "Treatment Rate by Perceived Work Interference",
        ct,
        YES,
        "Level of Work Interference",
        RATE_LABEL,
    )
}

fn factors_figure(scores: &[ImpactScore]) -> JSValue {
    charts::impact_bar(
        "Most Influential Factors on Seeking Treatment",
        scores,
        "Increase in Likelihood of Seeking Treatment (%)",
    )
}

fn presenter_sections(survey: &Survey, idx: usize) -> DashboardResult<Vec<Section>> {
    let presenter = &PRESENTERS[idx];
    let figures = presenter_figures(survey, idx)?;
    Ok(presenter
        .questions
        .iter()
        .zip(figures.into_iter())
        .map(|(q, figures)| Section {
            heading: q.to_string(),
            figures,
        })
        .collect())
}

fn summary_body(survey: &Survey, out: &mut String) -> DashboardResult<()> {
    let kpis = agg(survey.kpis(), "the KPIs")?;
    let factors = agg(survey.top_factors(), "the top factors")?;
    let mental = agg(survey.mental_consequence_distribution(), "the mental consequences")?;
    let physical = agg(
        survey.physical_consequence_distribution(),
        "the physical consequences",
    )?;
    let witness = agg(
        survey.treatment_by_witnessed_consequences(),
        "the treatment rate by witnessed consequences",
    )?;
    let interference = agg(
        survey.treatment_by_work_interference(),
        "the treatment rate by work interference",
    )?;
    let benefits = agg(survey.treatment_by_benefits(), "the treatment rate by benefits")?;

    let _ = writeln!(out, "<div class=\"kpis\">");
    for (k, value) in kpis.iter() {
        let _ = writeln!(
            out,
            "<div class=\"kpi\"><div class=\"kpi-value\">{}</div><div class=\"kpi-name\">{}</div></div>",
            escape_html(value),
            escape_html(k.name)
        );
    }
    let _ = writeln!(out, "</div>");

    let sections = vec![
        Section {
            heading: "What drives employees to seek treatment?".to_string(),
            figures: vec![factors_figure(&factors)],
        },
        Section {
            heading: "Stigma".to_string(),
            figures: vec![
                mental_vs_physical_figure(&mental, &physical),
                witnessing_figure(&witness),
            ],
        },
        Section {
            heading: "Drivers".to_string(),
            figures: vec![
                interference_figure(&interference),
                charts::colored_rate_bar(
                    "Treatment Rate by Benefits Availability",
                    &benefits,
                    YES,
                    "Employer Provides Benefits?",
                    RATE_LABEL,
                    &benefit_colors(),
                ),
            ],
        },
    ];
    write_sections(out, &sections);
    Ok(())
}

pub fn escape_html(s: &str) -> String {
    let mut res = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => res.push_str("&amp;"),
            '<' => res.push_str("&lt;"),
            '>' => res.push_str("&gt;"),
            '"' => res.push_str("&quot;"),
            '\'' => res.push_str("&#39;"),
            c => res.push(c),
        }
    }
    res
}

// A figure inlined in a script element must not close the element.
fn script_json(fig: &JSValue) -> String {
    fig.to_string().replace("</", "<\\/")
}

fn write_sections(out: &mut String, sections: &[Section]) {
    let mut chart_id = 0;
    for section in sections.iter() {
        let _ = writeln!(out, "<section>");
        let _ = writeln!(out, "<h2>{}</h2>", escape_html(&section.heading));
        let _ = writeln!(out, "<div class=\"charts\">");
        for fig in section.figures.iter() {
            chart_id += 1;
            let _ = writeln!(out, "<div class=\"chart\" id=\"chart-{}\"></div>", chart_id);
            let _ = writeln!(
                out,
                "<script>(function(f) {{ Plotly.newPlot(\"chart-{}\", f.data, f.layout, {{responsive: true}}); }})({});</script>",
                chart_id,
                script_json(fig)
            );
        }
        let _ = writeln!(out, "</div>");
        let _ = writeln!(out, "</section>");
    }
}

const STYLE: &str = "body { font-family: sans-serif; color: #4A5568; margin: 2em; }
section { margin-bottom: 2em; }
.charts { display: flex; flex-wrap: wrap; gap: 1em; }
.chart { flex: 1 1 480px; min-height: 420px; }
.kpis { display: flex; gap: 1em; margin-bottom: 2em; }
.kpi { flex: 1; padding: 1em; border: 1px solid #A0AEC0; border-radius: 6px; }
.kpi-value { font-size: 2em; color: #38B2AC; }";

fn html_page(site: &SiteSettings, title: &str, home: &str, body: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html lang=\"en\">");
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, "<meta charset=\"utf-8\">");
    let _ = writeln!(
        out,
        "<title>{} - {}</title>",
        escape_html(title),
        escape_html(&site.dashboard_name)
    );
    let _ = writeln!(
        out,
        "<script src=\"{}\"></script>",
        escape_html(&site.plotly_js_url)
    );
    let _ = writeln!(out, "<style>\n{}\n</style>", STYLE);
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, "<body>");
    let _ = writeln!(
        out,
        "<nav><a href=\"{}\">{}</a></nav>",
        home,
        escape_html(&site.dashboard_name)
    );
    let _ = writeln!(out, "<h1>{}</h1>", escape_html(title));
    out.push_str(body);
    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");
    out
}

fn index_body() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<ol>");
    for (idx, p) in PRESENTERS.iter().enumerate() {
        let _ = writeln!(
            out,
            "<li><a href=\"presenter/{}.html\">{}</a><ul>",
            idx + 1,
            escape_html(p.name)
        );
        for q in p.questions.iter() {
            let _ = writeln!(out, "<li>{}</li>", escape_html(q));
        }
        let _ = writeln!(out, "</ul></li>");
    }
    let _ = writeln!(out, "</ol>");
    let _ = writeln!(out, "<p><a href=\"summary.html\">Summary dashboard</a></p>");
    out
}

fn write_file(path: &Path, contents: &str) -> DashboardResult<()> {
    debug!("write_file: {:?}: {} bytes", path, contents.len());
    fs::write(path, contents).context(WritingOutputSnafu {
        path: path.display().to_string(),
    })
}

/// Renders every page of the dashboard into `out_dir`.
///
/// All the aggregations are computed before anything is written: a failure
/// leaves no partial page behind.
pub fn write_site(survey: &Survey, site: &SiteSettings, out_dir: &Path) -> DashboardResult<()> {
    let mut pages: Vec<(String, String)> = Vec::new();
    pages.push((
        "index.html".to_string(),
        html_page(site, &site.dashboard_name, "index.html", &index_body()),
    ));

    for (idx, p) in PRESENTERS.iter().enumerate() {
        let sections = presenter_sections(survey, idx)?;
        let mut body = String::new();
        write_sections(&mut body, &sections);
        pages.push((
            format!("presenter/{}.html", idx + 1),
            html_page(site, p.name, "../index.html", &body),
        ));
    }

    let mut body = String::new();
    summary_body(survey, &mut body)?;
    pages.push((
        "summary.html".to_string(),
        html_page(site, "Summary Dashboard", "index.html", &body),
    ));

    let presenter_dir = out_dir.join("presenter");
    fs::create_dir_all(&presenter_dir).context(WritingOutputSnafu {
        path: presenter_dir.display().to_string(),
    })?;
    for (name, contents) in pages.iter() {
        write_file(&out_dir.join(name), contents)?;
    }
    info!("write_site: {} pages written to {:?}", pages.len(), out_dir);
    Ok(())
}
