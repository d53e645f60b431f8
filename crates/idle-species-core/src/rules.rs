//! Per-step rule parameters derived from maturity, sensor inputs and population.

use crate::config::SimConfig;
use crate::constants::{
    ADAPTIVE_POPULATION_RATE, CALM_NOISE, MUTATION_NOISE, MUTATION_NOISE_MULTIPLIER,
    PHASE_GLITCH_MATURITY, PHASE_SOLID_MATURITY,
};
use crate::sensors::SensorInputs;
use serde::{Deserialize, Serialize};

/// Coarse label for the current maturity band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityPhase {
    Cloud,
    Solid,
    Glitch,
}

impl MaturityPhase {
    pub fn from_maturity(maturity: f64) -> Self {
        if maturity < PHASE_SOLID_MATURITY {
            MaturityPhase::Cloud
        } else if maturity < PHASE_GLITCH_MATURITY {
            MaturityPhase::Solid
        } else {
            MaturityPhase::Glitch
        }
    }
}

/// Rule scalars. `maturity` and `max_population` persist between steps;
/// the rest are recomputed by [`RuleState::refresh`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleState {
    pub maturity: f64,
    pub max_population: f64,
    pub density_cap: f64,
    pub age_limit: f64,
    pub birth_chance: f64,
    pub mutation_rate: f64,
}

impl RuleState {
    pub fn from_config(config: &SimConfig) -> Self {
        let maturity = config.initial_maturity.clamp(0.0, 1.0);
        Self {
            maturity,
            max_population: config.max_population,
            density_cap: density_cap(config.base_density_cap, config.max_population, maturity),
            age_limit: age_limit(config.min_age, config.max_age_cap, maturity),
            birth_chance: 1.0,
            mutation_rate: config.mutation_base,
        }
    }

    pub fn set_maturity(&mut self, maturity: f64) {
        self.maturity = clamp_unit(maturity);
    }

    pub fn phase(&self) -> MaturityPhase {
        MaturityPhase::from_maturity(self.maturity)
    }

    /// Recompute every derived parameter for the coming step.
    pub fn refresh(&mut self, config: &SimConfig, inputs: &SensorInputs, population: usize) {
        if config.adaptive_population {
            if let Some(load) = inputs.cpu_load_percent {
                self.max_population = adapt_population(
                    self.max_population,
                    load,
                    config.adaptive_population_floor,
                    config.adaptive_population_ceiling,
                );
            }
        }

        if config.auto_maturity {
            self.maturity = drift_maturity(
                self.maturity,
                inputs.noise_level,
                config.maturity_rise_rate,
                config.maturity_decay_rate,
            );
        }

        self.density_cap = density_cap(config.base_density_cap, self.max_population, self.maturity);
        self.age_limit = age_limit(config.min_age, config.max_age_cap, self.maturity);
        self.birth_chance = birth_chance(population, config.free_growth_threshold, self.density_cap);
        self.mutation_rate = mutation_rate(config.mutation_base, inputs.noise_level);
    }
}

pub fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Maturity rises slowly in a calm environment and falls faster in a noisy one.
pub fn drift_maturity(maturity: f64, noise: f64, rise: f64, decay: f64) -> f64 {
    let next = if noise < CALM_NOISE {
        maturity + rise
    } else {
        maturity - decay
    };
    clamp_unit(next)
}

pub fn density_cap(base_cap: f64, max_population: f64, maturity: f64) -> f64 {
    base_cap + maturity * (max_population - base_cap)
}

pub fn age_limit(min_age: f64, max_age_cap: f64, maturity: f64) -> f64 {
    min_age + maturity * (max_age_cap - min_age)
}

/// Free growth below the threshold, then a linear fall to zero at the density cap.
/// A cap at or below the threshold yields 0 for any population past the threshold.
pub fn birth_chance(population: usize, free_growth_threshold: usize, density_cap: f64) -> f64 {
    if population < free_growth_threshold {
        return 1.0;
    }
    let threshold = free_growth_threshold as f64;
    let range = density_cap - threshold;
    let progress = population as f64 - threshold;
    let chance = if range > 0.0 {
        1.0 - progress / range
    } else {
        0.0
    };
    clamp_unit(chance)
}

pub fn mutation_rate(base: f64, noise: f64) -> f64 {
    if noise > MUTATION_NOISE {
        base * MUTATION_NOISE_MULTIPLIER
    } else {
        base
    }
}

/// Move `current` a fixed fraction of the way toward the CPU-load-derived target.
pub fn adapt_population(current: f64, cpu_load_percent: f64, floor: f64, ceiling: f64) -> f64 {
    let target = floor + (cpu_load_percent / 100.0) * (ceiling - floor);
    current + (target - current) * ADAPTIVE_POPULATION_RATE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn birth_chance_is_free_below_threshold() {
        assert_eq!(birth_chance(0, 50, 150.0), 1.0);
        assert_eq!(birth_chance(49, 50, 150.0), 1.0);
    }

    #[test]
    fn birth_chance_falls_linearly_to_zero_at_cap() {
        assert_eq!(birth_chance(50, 50, 150.0), 1.0);
        assert!((birth_chance(100, 50, 150.0) - 0.5).abs() < 1e-12);
        assert_eq!(birth_chance(150, 50, 150.0), 0.0);
        assert_eq!(birth_chance(400, 50, 150.0), 0.0);
    }

    #[test]
    fn birth_chance_is_zero_when_cap_not_above_threshold() {
        assert_eq!(birth_chance(50, 50, 50.0), 0.0);
        assert_eq!(birth_chance(60, 50, 10.0), 0.0);
    }

    #[test]
    fn maturity_rises_when_calm_and_falls_when_noisy() {
        assert!((drift_maturity(0.5, 0.1, 0.0005, 0.002) - 0.5005).abs() < 1e-12);
        assert!((drift_maturity(0.5, 0.2, 0.0005, 0.002) - 0.498).abs() < 1e-12);
        assert_eq!(drift_maturity(1.0, 0.0, 0.0005, 0.002), 1.0);
        assert_eq!(drift_maturity(0.001, 0.9, 0.0005, 0.002), 0.0);
    }

    #[test]
    fn mutation_rate_quadruples_under_noise() {
        assert_eq!(mutation_rate(0.005, 0.3), 0.005);
        assert_eq!(mutation_rate(0.005, 0.31), 0.02);
    }

    #[test]
    fn derived_limits_interpolate_with_maturity() {
        assert_eq!(density_cap(150.0, 1000.0, 0.0), 150.0);
        assert_eq!(density_cap(150.0, 1000.0, 1.0), 1000.0);
        assert_eq!(age_limit(40.0, 300.0, 0.5), 170.0);
    }

    #[test]
    fn adaptive_population_closes_ten_percent_of_gap() {
        let next = adapt_population(150.0, 100.0, 50.0, 2500.0);
        assert!((next - (150.0 + 0.1 * 2350.0)).abs() < 1e-9);
        let mut current = 150.0;
        for _ in 0..500 {
            current = adapt_population(current, 50.0, 50.0, 2500.0);
        }
        assert!((current - 1275.0).abs() < 1e-6);
    }

    #[test]
    fn refresh_skips_drift_without_cpu_sample() {
        let config = SimConfig {
            adaptive_population: true,
            ..SimConfig::default()
        };
        let mut rules = RuleState::from_config(&config);
        rules.refresh(&config, &SensorInputs::default(), 0);
        assert_eq!(rules.max_population, config.max_population);
    }

    #[test]
    fn refresh_keeps_manual_maturity_fixed() {
        let config = SimConfig {
            auto_maturity: false,
            initial_maturity: 0.6,
            ..SimConfig::default()
        };
        let mut rules = RuleState::from_config(&config);
        for _ in 0..100 {
            rules.refresh(&config, &SensorInputs::with_noise(0.9), 10);
        }
        assert_eq!(rules.maturity, 0.6);
        assert_eq!(rules.mutation_rate, config.mutation_base * 4.0);
        assert_eq!(rules.birth_chance, 1.0);
    }

    #[test]
    fn phase_labels_follow_maturity_bands() {
        assert_eq!(MaturityPhase::from_maturity(0.0), MaturityPhase::Cloud);
        assert_eq!(MaturityPhase::from_maturity(0.3), MaturityPhase::Solid);
        assert_eq!(MaturityPhase::from_maturity(0.69), MaturityPhase::Solid);
        assert_eq!(MaturityPhase::from_maturity(0.7), MaturityPhase::Glitch);
    }
}
