use crate::config::SimConfig;
use crate::constants::METEOR_SEED_RADIUS;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeteorPhase {
    #[default]
    Inactive,
    Approaching,
    Impacting,
}

/// Meteor tuning copied out of [`SimConfig`] at trigger time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeteorParams {
    pub speed_factor: f64,
    pub radius_factor: f64,
    pub spawn_margin: f64,
    pub impact_distance: f64,
    pub expansion_rate: f64,
    pub settle_fraction: f64,
}

impl MeteorParams {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            speed_factor: config.meteor_speed_factor,
            radius_factor: config.meteor_radius_factor,
            spawn_margin: config.meteor_spawn_margin,
            impact_distance: config.meteor_impact_distance,
            expansion_rate: config.meteor_expansion_rate,
            settle_fraction: config.meteor_settle_fraction,
        }
    }
}

impl Default for MeteorParams {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MeteorTransition {
    /// The meteor landed; the caller culls cells around `target`.
    Impacted { target: [f64; 2], blast_radius: f64 },
    /// The shockwave reached its final size; the meteor is inactive again.
    Settled,
}

/// The single meteor slot: `Inactive -> Approaching -> Impacting -> Inactive`.
#[derive(Clone, Debug, PartialEq)]
pub struct Meteor {
    phase: MeteorPhase,
    position: [f64; 2],
    target: [f64; 2],
    velocity: [f64; 2],
    impact_radius: f64,
    max_radius: f64,
    params: MeteorParams,
}

impl Default for Meteor {
    fn default() -> Self {
        Self {
            phase: MeteorPhase::Inactive,
            position: [0.0; 2],
            target: [0.0; 2],
            velocity: [0.0; 2],
            impact_radius: 0.0,
            max_radius: 0.0,
            params: MeteorParams::default(),
        }
    }
}

impl Meteor {
    pub fn phase(&self) -> MeteorPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != MeteorPhase::Inactive
    }

    pub fn position(&self) -> [f64; 2] {
        self.position
    }

    pub fn target(&self) -> [f64; 2] {
        self.target
    }

    pub fn velocity(&self) -> [f64; 2] {
        self.velocity
    }

    pub fn impact_radius(&self) -> f64 {
        self.impact_radius
    }

    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// Launch from a random off-screen edge toward a random point in the viewport.
    /// Returns `false` without touching any state if a meteor is already active.
    pub fn trigger<R: Rng>(
        &mut self,
        rng: &mut R,
        width: f64,
        height: f64,
        params: MeteorParams,
    ) -> bool {
        if self.is_active() {
            return false;
        }
        let target = [rng.random::<f64>() * width, rng.random::<f64>() * height];
        let margin = params.spawn_margin;
        let entry = match rng.random_range(0..4) {
            0 => [rng.random::<f64>() * width, -margin],
            1 => [width + margin, rng.random::<f64>() * height],
            2 => [rng.random::<f64>() * width, height + margin],
            _ => [-margin, rng.random::<f64>() * height],
        };
        let speed = width.max(height) * params.speed_factor;
        let max_radius = width.min(height) * params.radius_factor;
        self.launch(entry, target, speed, max_radius, params)
    }

    /// Launch along an explicit trajectory.
    ///
    /// A zero-length or zero-speed trajectory parks the meteor on its target so
    /// the next tick lands it.
    pub fn launch(
        &mut self,
        entry: [f64; 2],
        target: [f64; 2],
        speed: f64,
        max_radius: f64,
        params: MeteorParams,
    ) -> bool {
        if self.is_active() {
            return false;
        }
        let dx = target[0] - entry[0];
        let dy = target[1] - entry[1];
        let dist = (dx * dx + dy * dy).sqrt();
        let degenerate = !(dist.is_finite() && dist > 0.0 && speed.is_finite() && speed > 0.0);
        if degenerate {
            self.position = target;
            self.velocity = [0.0; 2];
        } else {
            self.position = entry;
            self.velocity = [dx / dist * speed, dy / dist * speed];
        }
        self.target = target;
        self.impact_radius = 0.0;
        self.max_radius = max_radius.max(0.0);
        self.params = params;
        self.phase = MeteorPhase::Approaching;
        true
    }

    /// Advance by `dt` seconds of continuous time.
    pub fn update(&mut self, dt: f64) -> Option<MeteorTransition> {
        match self.phase {
            MeteorPhase::Inactive => None,
            MeteorPhase::Approaching => {
                self.position[0] += self.velocity[0] * dt;
                self.position[1] += self.velocity[1] * dt;
                let dx = self.target[0] - self.position[0];
                let dy = self.target[1] - self.position[1];
                let dist = (dx * dx + dy * dy).sqrt();
                let overshot = dx * self.velocity[0] + dy * self.velocity[1] < 0.0;
                if dist < self.params.impact_distance || overshot {
                    self.position = self.target;
                    self.impact_radius = METEOR_SEED_RADIUS;
                    self.phase = MeteorPhase::Impacting;
                    return Some(MeteorTransition::Impacted {
                        target: self.target,
                        blast_radius: self.max_radius,
                    });
                }
                None
            }
            MeteorPhase::Impacting => {
                let approach = (self.params.expansion_rate * dt).clamp(0.0, 1.0);
                self.impact_radius += (self.max_radius - self.impact_radius) * approach;
                if self.impact_radius > self.max_radius * self.params.settle_fraction {
                    self.phase = MeteorPhase::Inactive;
                    return Some(MeteorTransition::Settled);
                }
                None
            }
        }
    }
}

/// Probability that a cell `distance` away from ground zero dies on impact.
pub fn death_chance(distance: f64, blast_radius: f64) -> f64 {
    if blast_radius.is_nan() || blast_radius <= 0.0 {
        return 0.0;
    }
    (1.0 - (distance / blast_radius).min(1.0)).max(0.0)
}
