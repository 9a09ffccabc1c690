use log::info;

use crate::*;

/// The survey, ready to answer the questions of the dashboard.
///
/// The dataset is checked once for all the columns the questions refer to.
/// After that, a `Survey` is never modified and can be shared freely between
/// threads (for example behind an `Arc`).
#[derive(Debug, Clone)]
pub struct Survey {
    dataset: Dataset,
}

impl Survey {
    pub fn new(dataset: Dataset) -> Result<Survey, StatsError> {
        dataset.require(&REQUIRED_COLUMNS)?;
        info!(
            "Survey: {} respondents, {} columns",
            dataset.num_rows(),
            dataset.column_names().len()
        );
        Ok(Survey { dataset })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    fn treatment_rates(&self, ds: &Dataset, row_column: &str) -> Result<CrossTab, StatsError> {
        Ok(cross_tab(ds, row_column, TREATMENT)?.sorted_by_rate_desc(YES))
    }

    // **** The HR generalist ****

    /// Q1
    pub fn gender_distribution(&self) -> Result<Distribution, StatsError> {
        distribution(&self.dataset, GENDER)
    }

    /// Q1
    pub fn age_histogram(&self) -> Result<Histogram, StatsError> {
        histogram(&self.dataset, AGE, AGE_BINS)
    }

    /// Q2, with every company size bucket present.
    pub fn company_size_distribution(&self) -> Result<Distribution, StatsError> {
        distribution_in_order(&self.dataset, COMPANY_SIZE, &COMPANY_SIZE_ORDER)
    }

    /// Q2
    pub fn tech_company_distribution(&self) -> Result<Distribution, StatsError> {
        distribution(&self.dataset, TECH_COMPANY)
    }

    /// Q3
    pub fn family_history_distribution(&self) -> Result<Distribution, StatsError> {
        distribution(&self.dataset, FAMILY_HISTORY)
    }

    // **** The benefits specialist ****

    /// Q4
    pub fn benefits_distribution(&self) -> Result<Distribution, StatsError> {
        distribution(&self.dataset, BENEFITS)
    }

    /// Q4
    pub fn wellness_program_distribution(&self) -> Result<Distribution, StatsError> {
        distribution(&self.dataset, WELLNESS_PROGRAM)
    }

    /// Q5: awareness of care options within each company size.
    pub fn care_options_by_company_size(&self) -> Result<GroupedProportion, StatsError> {
        grouped_proportion(
            &self.dataset,
            COMPANY_SIZE,
            CARE_OPTIONS,
            Some(&COMPANY_SIZE_ORDER[..]),
        )
    }

    /// Q6
    pub fn treatment_by_leave(&self) -> Result<CrossTab, StatsError> {
        self.treatment_rates(&self.dataset, LEAVE)
    }

    // **** The lead analyst ****

    /// Q7
    pub fn treatment_distribution(&self) -> Result<Distribution, StatsError> {
        distribution(&self.dataset, TREATMENT)
    }

    /// Q7, in label order.
    pub fn treatment_by_family_history(&self) -> Result<CrossTab, StatsError> {
        cross_tab(&self.dataset, FAMILY_HISTORY, TREATMENT)
    }

    /// Q8
    pub fn treatment_by_work_interference(&self) -> Result<CrossTab, StatsError> {
        self.treatment_rates(&self.dataset, WORK_INTERFERE)
    }

    /// Q9: treatment rate per gender, among the respondents whose work is
    /// affected (any answer but "Never", including no answer).
    pub fn treatment_by_gender_under_interference(&self) -> Result<CrossTab, StatsError> {
        let affected = self.dataset.without_level(WORK_INTERFERE, "Never")?;
        self.treatment_rates(&affected, GENDER)
    }

    // **** The culture officer ****

    /// Q10
    pub fn mental_consequence_distribution(&self) -> Result<Distribution, StatsError> {
        distribution(&self.dataset, MENTAL_HEALTH_CONSEQUENCE)
    }

    /// Q10
    pub fn physical_consequence_distribution(&self) -> Result<Distribution, StatsError> {
        distribution(&self.dataset, PHYS_HEALTH_CONSEQUENCE)
    }

    /// Q11
    pub fn treatment_by_fear_of_consequences(&self) -> Result<CrossTab, StatsError> {
        self.treatment_rates(&self.dataset, MENTAL_HEALTH_CONSEQUENCE)
    }

    /// Q12
    pub fn coworker_trust(&self) -> Result<Distribution, StatsError> {
        distribution_in_order(&self.dataset, COWORKERS, &TRUST_ORDER)
    }

    /// Q12
    pub fn supervisor_trust(&self) -> Result<Distribution, StatsError> {
        distribution_in_order(&self.dataset, SUPERVISOR, &TRUST_ORDER)
    }

    // **** The workplace environment analyst ****

    /// Q13
    pub fn seriousness_distribution(&self) -> Result<Distribution, StatsError> {
        distribution(&self.dataset, MENTAL_VS_PHYSICAL)
    }

    /// Q14: share of respondents who witnessed consequences, by tech company.
    pub fn witnessed_consequences_by_tech(&self) -> Result<CrossTab, StatsError> {
        cross_tab(&self.dataset, TECH_COMPANY, OBS_CONSEQUENCE)
    }

    /// Q15
    pub fn treatment_by_witnessed_consequences(&self) -> Result<CrossTab, StatsError> {
        cross_tab(&self.dataset, OBS_CONSEQUENCE, TREATMENT)
    }

    // **** The modern workplace strategist ****

    /// Q16
    pub fn treatment_by_remote_work(&self) -> Result<CrossTab, StatsError> {
        cross_tab(&self.dataset, REMOTE_WORK, TREATMENT)
    }

    /// Q17: ease of taking leave within each work location.
    pub fn leave_by_remote_work(&self) -> Result<GroupedProportion, StatsError> {
        grouped_proportion(&self.dataset, REMOTE_WORK, LEAVE, None)
    }

    /// Q18: impact of the fixed factors on seeking treatment, smallest first.
    pub fn top_factors(&self) -> Result<Vec<ImpactScore>, StatsError> {
        impact_scores(&self.dataset, &IMPACT_FACTORS, TREATMENT, YES)
    }

    // **** Summary ****

    /// The headline KPIs, formatted, in display order.
    pub fn kpis(&self) -> Result<Vec<(Kpi, String)>, StatsError> {
        KPIS.iter()
            .map(|k| kpi(&self.dataset, k.column, k.level).map(|v| (*k, v)))
            .collect()
    }

    /// Treatment rate with and without mental health benefits.
    pub fn treatment_by_benefits(&self) -> Result<CrossTab, StatsError> {
        cross_tab(&self.dataset, BENEFITS, TREATMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use std::sync::Arc;
    use std::thread;

    // Age, Gender, no_employees, tech_company, family_history, benefits,
    // wellness_program, care_options, leave, treatment, work_interfere,
    // mental_health_consequence, phys_health_consequence, coworkers,
    // supervisor, mental_vs_physical, obs_consequence, remote_work
    const ROWS: [[&str; 18]; 8] = [
        ["25", "Male", "26-100", "Yes", "Yes", "Yes", "No", "Yes", "Very easy", "Yes", "Often", "Yes", "No", "Some of them", "Yes", "Yes", "No", "No"],
        ["31", "Female", "26-100", "Yes", "Yes", "No", "No", "Not sure", "Somewhat easy", "Yes", "Sometimes", "No", "No", "Yes", "Yes", "Don't know", "Yes", "Yes"],
        ["44", "Male", "More than 1000", "No", "No", "Don't know", "Yes", "No", "Don't know", "No", "Never", "Maybe", "No", "No", "No", "No", "No", "No"],
        ["29", "Female", "5-Jan", "Yes", "No", "Yes", "No", "Yes", "Somewhat difficult", "Yes", "Rarely", "Yes", "Maybe", "Some of them", "No", "No", "No", "Yes"],
        ["38", "Other", "100-500", "Yes", "Yes", "Yes", "Don't know", "Not sure", "Very easy", "Yes", "Often", "No", "No", "Yes", "Some of them", "Yes", "No", "No"],
        ["27", "Male", "26-100", "No", "No", "No", "No", "No", "Don't know", "No", "", "No", "No", "Some of them", "Yes", "Don't know", "No", "No"],
        ["35", "Female", "More than 1000", "Yes", "Yes", "Yes", "Yes", "Yes", "Very difficult", "Yes", "Sometimes", "Yes", "No", "No", "No", "No", "Yes", "No"],
        ["52", "Male", "500-1000", "No", "No", "Don't know", "No", "No", "Somewhat easy", "No", "Never", "No", "No", "Some of them", "Yes", "Yes", "No", "Yes"],
    ];

    fn survey() -> Survey {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut b = Builder::new(&REQUIRED_COLUMNS).unwrap();
        for row in ROWS.iter() {
            b.add_row(row).unwrap();
        }
        Survey::new(b.build().unwrap()).unwrap()
    }

    #[test]
    fn survey_requires_every_column() {
        let mut b = Builder::new(&["treatment", "Gender"]).unwrap();
        b.add_row(&["Yes", "Male"]).unwrap();
        let res = Survey::new(b.build().unwrap());
        assert!(matches!(res, Err(StatsError::MissingColumn(c)) if c == "Age"));
    }

    #[test]
    fn company_sizes_are_zero_filled() {
        let d = survey().company_size_distribution().unwrap();
        assert_eq!(d.labels(), COMPANY_SIZE_ORDER.to_vec());
        assert_eq!(d.count("25-Jun"), Some(0));
        assert_eq!(d.count("26-100"), Some(3));
    }

    #[test]
    fn gender_disparity_excludes_never() {
        let s = survey();
        let ct = s.treatment_by_gender_under_interference().unwrap();
        // Rows with "Never" are dropped, the one without an answer is kept.
        let total: u64 = ct.rows.iter().map(|r| r.total).sum();
        assert_eq!(total, 6);
        assert_eq!(ct.row_labels(), vec!["Female", "Other", "Male"]);
        assert_eq!(ct.rate("Male", "Yes"), Ok(50.0));
    }

    #[test]
    fn top_factors_are_sorted() {
        let scores = survey().top_factors().unwrap();
        assert_eq!(scores.len(), IMPACT_FACTORS.len());
        for w in scores.windows(2) {
            assert!(w[0].delta <= w[1].delta);
        }
        // Often: 2/2 treated, Never: 0/2 treated.
        let wi = scores
            .iter()
            .find(|s| s.name == "Work Interference (Often vs. Never)")
            .unwrap();
        assert_eq!(wi.delta, 100.0);
    }

    #[test]
    fn kpis_are_formatted() {
        let kpis = survey().kpis().unwrap();
        let values: Vec<&str> = kpis.iter().map(|(_, v)| v.as_str()).collect();
        assert_eq!(values, vec!["62.5%", "50.0%", "37.5%"]);
    }

    #[test]
    fn care_options_groups_follow_company_size_order() {
        let gp = survey().care_options_by_company_size().unwrap();
        assert_eq!(
            gp.groups(),
            vec!["5-Jan", "26-100", "100-500", "500-1000", "More than 1000"]
        );
    }

    #[test]
    fn questions_can_run_in_parallel() {
        let s = Arc::new(survey());
        let expected = s.treatment_by_leave().unwrap();
        let handles: Vec<thread::JoinHandle<CrossTab>> = (0..4)
            .map(|_| {
                let s = Arc::clone(&s);
                thread::spawn(move || s.treatment_by_leave().unwrap())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    }
}
