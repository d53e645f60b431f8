use crate::cell::Cell;
use crate::rules::{MaturityPhase, RuleState};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepMetrics {
    pub step: usize,
    pub population: usize,
    pub births: usize,
    pub deaths: usize,
    pub maturity: f64,
    pub phase: MaturityPhase,
    pub density_cap: f64,
    pub age_limit: f64,
    pub birth_chance: f64,
    pub mutation_rate: f64,
    pub max_population: f64,
    pub mean_age: f64,
    pub meteor_active: bool,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub frames: usize,
    pub steps: usize,
    pub sample_every: usize,
    pub final_population: usize,
    pub samples: Vec<StepMetrics>,
    #[serde(default)]
    pub tectonic_shifts: usize,
    #[serde(default)]
    pub meteor_impacts: usize,
    #[serde(default)]
    pub total_births: usize,
    #[serde(default)]
    pub total_deaths: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PopulationStats {
    pub population: usize,
    pub total_births: usize,
    pub total_deaths: usize,
    pub total_steps: usize,
    pub tectonic_shifts: usize,
    pub meteor_impacts: usize,
}

pub fn collect_step_metrics(
    step: usize,
    births: usize,
    deaths: usize,
    rules: &RuleState,
    cells: &[Cell],
    meteor_active: bool,
) -> StepMetrics {
    let population = cells.len();
    let mean_age = if population > 0 {
        cells.iter().map(|c| c.age as f64).sum::<f64>() / population as f64
    } else {
        0.0
    };
    StepMetrics {
        step,
        population,
        births,
        deaths,
        maturity: rules.maturity,
        phase: rules.phase(),
        density_cap: rules.density_cap,
        age_limit: rules.age_limit,
        birth_chance: rules.birth_chance,
        mutation_rate: rules.mutation_rate,
        max_population: rules.max_population,
        mean_age,
        meteor_active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::grid::{GridKey, GridTopology};

    #[test]
    fn mean_age_is_zero_for_empty_population() {
        let rules = RuleState::from_config(&SimConfig::default());
        let m = collect_step_metrics(3, 0, 5, &rules, &[], false);
        assert_eq!(m.population, 0);
        assert_eq!(m.mean_age, 0.0);
        assert_eq!(m.deaths, 5);
        assert_eq!(m.phase, MaturityPhase::Cloud);
    }

    #[test]
    fn mean_age_averages_stored_cells() {
        let topology = GridTopology::new(10, 10, 7.0);
        let mut cells = vec![
            Cell::settled(GridKey::new(1, 1), &topology),
            Cell::settled(GridKey::new(2, 2), &topology),
        ];
        cells[0].age = 4;
        cells[1].age = 10;
        let rules = RuleState::from_config(&SimConfig::default());
        let m = collect_step_metrics(1, 2, 0, &rules, &cells, true);
        assert_eq!(m.mean_age, 7.0);
        assert!(m.meteor_active);
    }

    #[test]
    fn summary_defaults_missing_counters() {
        let json = r#"{"frames":1,"steps":0,"sample_every":1,"final_population":0,"samples":[]}"#;
        let summary: RunSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.schema_version, 1);
        assert_eq!(summary.tectonic_shifts, 0);
    }
}
