use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for reproducible simulation runs.
    pub seed: u64,
    /// Viewport width in world units (pixels for a renderer).
    pub viewport_width: f64,
    /// Viewport height in world units.
    pub viewport_height: f64,
    /// Distance between neighboring grid points in world units.
    pub grid_step: f64,
    /// Seconds of elapsed time consumed by one automaton step.
    pub step_duration: f64,
    /// Frame interval used by headless experiment runs.
    pub frame_dt: f64,
    /// Upper bound on elapsed time credited to a single frame.
    pub max_frame_dt: f64,
    /// Alpha change per frame while a cell fades toward its target.
    pub fade_speed: f64,
    /// Let maturity drift on its own according to ambient noise.
    pub auto_maturity: bool,
    /// Maturity at world creation.
    pub initial_maturity: f64,
    /// Per-step maturity gain while the environment is calm.
    pub maturity_rise_rate: f64,
    /// Per-step maturity loss while the environment is noisy.
    pub maturity_decay_rate: f64,
    /// Configured population ceiling the density cap grows toward with maturity.
    pub max_population: f64,
    /// Let `max_population` follow host CPU load.
    pub adaptive_population: bool,
    /// `max_population` target at 0% CPU load.
    pub adaptive_population_floor: f64,
    /// `max_population` target at 100% CPU load.
    pub adaptive_population_ceiling: f64,
    /// Density cap at maturity 0.
    pub base_density_cap: f64,
    /// Below this population every eligible birth succeeds.
    pub free_growth_threshold: usize,
    /// Age limit at maturity 0.
    pub min_age: f64,
    /// Age limit at maturity 1.
    pub max_age_cap: f64,
    /// Spontaneous birth rate for candidates without exactly three neighbors.
    pub mutation_base: f64,
    /// Fixed tectonic shift chance; 0 selects the maturity-driven chance.
    pub glitch_override: f64,
    /// Reseed a small cluster whenever the population dies out with no meteor in flight.
    pub auto_reseed: bool,
    /// Number of cells placed by a reseed.
    pub seed_cluster_size: usize,
    /// Side length of the square a reseed scatters cells over.
    pub seed_cluster_spread: i32,
    /// Meteor speed as a multiple of the larger viewport dimension per second.
    pub meteor_speed_factor: f64,
    /// Final shockwave radius as a fraction of the smaller viewport dimension.
    pub meteor_radius_factor: f64,
    /// How far outside the viewport a meteor enters.
    pub meteor_spawn_margin: f64,
    /// Distance to target at which a meteor lands.
    pub meteor_impact_distance: f64,
    /// Exponential-approach rate of the shockwave radius, per second.
    pub meteor_expansion_rate: f64,
    /// Fraction of the final radius at which the shockwave is considered settled.
    pub meteor_settle_fraction: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            grid_step: 7.0,
            step_duration: 0.12,
            frame_dt: 1.0 / 60.0,
            max_frame_dt: 0.1,
            fade_speed: 0.02,
            auto_maturity: true,
            initial_maturity: 0.0,
            maturity_rise_rate: 0.0005,
            maturity_decay_rate: 0.002,
            max_population: 150.0,
            adaptive_population: false,
            adaptive_population_floor: 50.0,
            adaptive_population_ceiling: 2500.0,
            base_density_cap: 150.0,
            free_growth_threshold: 50,
            min_age: 40.0,
            max_age_cap: 300.0,
            mutation_base: 0.005,
            glitch_override: 0.0,
            auto_reseed: true,
            seed_cluster_size: 12,
            seed_cluster_spread: 10,
            meteor_speed_factor: 1.5,
            meteor_radius_factor: 0.35,
            meteor_spawn_margin: 50.0,
            meteor_impact_distance: 20.0,
            meteor_expansion_rate: 4.0,
            meteor_settle_fraction: 0.95,
        }
    }
}

macro_rules! define_sim_config_error {
    (
        $(
            $variant:ident $( { $($field:ident : $type:ty),* } )? => $fmt:literal $(, $arg:expr)*
        );* $(;)?
    ) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum SimConfigError {
            $(
                $variant $( { $($field : $type),* } )?,
            )*
        }

        impl std::fmt::Display for SimConfigError {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        Self::$variant $( { $($field),* } )? => write!(f, $fmt $(, $arg)*),
                    )*
                }
            }
        }
    };
}

define_sim_config_error! {
    InvalidViewport => "viewport_width/viewport_height must be finite and non-negative";
    ViewportTooLarge { max: f64, actual: f64 } => "viewport dimension ({actual}) exceeds supported maximum ({max})";
    InvalidGridStep => "grid_step must be positive and finite";
    InvalidStepDuration => "step_duration must be positive and finite";
    InvalidFrameDt => "frame_dt must be positive and finite";
    InvalidMaxFrameDt => "max_frame_dt must be positive and finite";
    InvalidFadeSpeed => "fade_speed must be finite and within (0,1]";
    InvalidInitialMaturity => "initial_maturity must be finite and within [0,1]";
    InvalidMaturityRates => "maturity_rise_rate/maturity_decay_rate must be finite and non-negative";
    InvalidMaxPopulation => "max_population must be positive and finite";
    InvalidAdaptivePopulationBounds => "adaptive_population_floor/adaptive_population_ceiling must be finite, positive, and ordered";
    InvalidBaseDensityCap => "base_density_cap must be finite and non-negative";
    InvalidAgeBounds => "min_age/max_age_cap must be finite, non-negative, and ordered";
    InvalidMutationBase => "mutation_base must be finite and within [0,1]";
    InvalidGlitchOverride => "glitch_override must be finite and within [0,1]";
    InvalidSeedClusterSpread => "seed_cluster_spread must be positive";
    InvalidMeteorSpeedFactor => "meteor_speed_factor must be positive and finite";
    InvalidMeteorRadiusFactor => "meteor_radius_factor must be positive and finite";
    InvalidMeteorSpawnMargin => "meteor_spawn_margin must be finite and non-negative";
    InvalidMeteorImpactDistance => "meteor_impact_distance must be positive and finite";
    InvalidMeteorExpansionRate => "meteor_expansion_rate must be positive and finite";
    InvalidMeteorSettleFraction => "meteor_settle_fraction must be finite and within (0,1)";
}

impl std::error::Error for SimConfigError {}

impl SimConfig {
    pub const MAX_VIEWPORT_DIMENSION: f64 = crate::constants::MAX_VIEWPORT_DIMENSION;

    pub fn validate(&self) -> Result<(), SimConfigError> {
        self.validate_viewport()?;
        self.validate_timing()?;
        self.validate_maturity()?;
        self.validate_population()?;
        self.validate_aging()?;
        self.validate_rates()?;
        self.validate_seeding()?;
        self.validate_meteor()?;
        Ok(())
    }

    fn validate_viewport(&self) -> Result<(), SimConfigError> {
        for extent in [self.viewport_width, self.viewport_height] {
            if !(extent.is_finite() && extent >= 0.0) {
                return Err(SimConfigError::InvalidViewport);
            }
            if extent > Self::MAX_VIEWPORT_DIMENSION {
                return Err(SimConfigError::ViewportTooLarge {
                    max: Self::MAX_VIEWPORT_DIMENSION,
                    actual: extent,
                });
            }
        }
        if !(self.grid_step.is_finite() && self.grid_step > 0.0) {
            return Err(SimConfigError::InvalidGridStep);
        }
        Ok(())
    }

    fn validate_timing(&self) -> Result<(), SimConfigError> {
        if !(self.step_duration.is_finite() && self.step_duration > 0.0) {
            return Err(SimConfigError::InvalidStepDuration);
        }
        if !(self.frame_dt.is_finite() && self.frame_dt > 0.0) {
            return Err(SimConfigError::InvalidFrameDt);
        }
        if !(self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0) {
            return Err(SimConfigError::InvalidMaxFrameDt);
        }
        if !(self.fade_speed.is_finite() && self.fade_speed > 0.0 && self.fade_speed <= 1.0) {
            return Err(SimConfigError::InvalidFadeSpeed);
        }
        Ok(())
    }

    fn validate_maturity(&self) -> Result<(), SimConfigError> {
        if !(self.initial_maturity.is_finite() && (0.0..=1.0).contains(&self.initial_maturity)) {
            return Err(SimConfigError::InvalidInitialMaturity);
        }
        if !(self.maturity_rise_rate.is_finite()
            && self.maturity_rise_rate >= 0.0
            && self.maturity_decay_rate.is_finite()
            && self.maturity_decay_rate >= 0.0)
        {
            return Err(SimConfigError::InvalidMaturityRates);
        }
        Ok(())
    }

    fn validate_population(&self) -> Result<(), SimConfigError> {
        if !(self.max_population.is_finite() && self.max_population > 0.0) {
            return Err(SimConfigError::InvalidMaxPopulation);
        }
        if !(self.adaptive_population_floor.is_finite()
            && self.adaptive_population_ceiling.is_finite()
            && self.adaptive_population_floor > 0.0
            && self.adaptive_population_floor <= self.adaptive_population_ceiling)
        {
            return Err(SimConfigError::InvalidAdaptivePopulationBounds);
        }
        if !(self.base_density_cap.is_finite() && self.base_density_cap >= 0.0) {
            return Err(SimConfigError::InvalidBaseDensityCap);
        }
        Ok(())
    }

    fn validate_aging(&self) -> Result<(), SimConfigError> {
        if !(self.min_age.is_finite()
            && self.max_age_cap.is_finite()
            && self.min_age >= 0.0
            && self.min_age <= self.max_age_cap)
        {
            return Err(SimConfigError::InvalidAgeBounds);
        }
        Ok(())
    }

    fn validate_rates(&self) -> Result<(), SimConfigError> {
        if !(self.mutation_base.is_finite() && (0.0..=1.0).contains(&self.mutation_base)) {
            return Err(SimConfigError::InvalidMutationBase);
        }
        if !(self.glitch_override.is_finite() && (0.0..=1.0).contains(&self.glitch_override)) {
            return Err(SimConfigError::InvalidGlitchOverride);
        }
        Ok(())
    }

    fn validate_seeding(&self) -> Result<(), SimConfigError> {
        if self.seed_cluster_spread <= 0 {
            return Err(SimConfigError::InvalidSeedClusterSpread);
        }
        Ok(())
    }

    fn validate_meteor(&self) -> Result<(), SimConfigError> {
        if !(self.meteor_speed_factor.is_finite() && self.meteor_speed_factor > 0.0) {
            return Err(SimConfigError::InvalidMeteorSpeedFactor);
        }
        if !(self.meteor_radius_factor.is_finite() && self.meteor_radius_factor > 0.0) {
            return Err(SimConfigError::InvalidMeteorRadiusFactor);
        }
        if !(self.meteor_spawn_margin.is_finite() && self.meteor_spawn_margin >= 0.0) {
            return Err(SimConfigError::InvalidMeteorSpawnMargin);
        }
        if !(self.meteor_impact_distance.is_finite() && self.meteor_impact_distance > 0.0) {
            return Err(SimConfigError::InvalidMeteorImpactDistance);
        }
        if !(self.meteor_expansion_rate.is_finite() && self.meteor_expansion_rate > 0.0) {
            return Err(SimConfigError::InvalidMeteorExpansionRate);
        }
        if !(self.meteor_settle_fraction.is_finite()
            && self.meteor_settle_fraction > 0.0
            && self.meteor_settle_fraction < 1.0)
        {
            return Err(SimConfigError::InvalidMeteorSettleFraction);
        }
        Ok(())
    }
}
