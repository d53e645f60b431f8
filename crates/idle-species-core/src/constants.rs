/// Largest valid viewport dimension (world units). Keeps grid coordinates well inside `i32`.
pub const MAX_VIEWPORT_DIMENSION: f64 = 65_536.0;

/// Cells at or below this alpha do not count as occupied neighbors.
pub const VISIBILITY_THRESHOLD: f64 = 0.1;

/// Maturity above which cells with 1, 4 or 5 neighbors may survive.
pub const PERMISSIVE_MATURITY: f64 = 0.4;

/// Survival probability factor applied to maturity in the permissive regime.
pub const PERMISSIVE_SURVIVAL_FACTOR: f64 = 0.95;

/// Death probability for a surviving cell older than the age limit.
pub const AGING_DEATH_CHANCE: f64 = 0.3;

/// Extra aging death probability while noise exceeds [`AGING_STRESS_NOISE`].
pub const AGING_STRESS_BONUS: f64 = 0.1;
pub const AGING_STRESS_NOISE: f64 = 0.5;

/// Maturity only rises while noise stays below this level.
pub const CALM_NOISE: f64 = 0.2;

/// Noise level above which the mutation rate is multiplied by [`MUTATION_NOISE_MULTIPLIER`].
pub const MUTATION_NOISE: f64 = 0.3;
pub const MUTATION_NOISE_MULTIPLIER: f64 = 4.0;

/// Fraction of the gap toward the CPU-derived target closed per step in adaptive mode.
pub const ADAPTIVE_POPULATION_RATE: f64 = 0.1;

/// Maturity at which tectonic shifts start to occur on their own.
pub const TECTONIC_MATURITY_ONSET: f64 = 0.7;
/// Automatic tectonic chance reached at maturity 1.0.
pub const TECTONIC_MAX_CHANCE: f64 = 0.5;
/// Noise level above which [`TECTONIC_NOISE_BONUS`] is added to the tectonic chance.
pub const TECTONIC_NOISE: f64 = 0.4;
pub const TECTONIC_NOISE_BONUS: f64 = 0.1;
/// Shifted patches span `[TECTONIC_MIN_EXTENT, TECTONIC_MIN_EXTENT + TECTONIC_EXTENT_SPAN)` cells.
pub const TECTONIC_MIN_EXTENT: i32 = 5;
pub const TECTONIC_EXTENT_SPAN: i32 = 15;
pub const TECTONIC_STEP: i32 = 2;
/// Alpha forced onto shifted cells.
pub const TECTONIC_ALPHA: f64 = 0.5;

/// Fraction of maturity kept after a meteor impact that leaves survivors.
pub const METEOR_MATURITY_RETENTION: f64 = 0.8;
/// Impact radius assigned the moment the meteor lands.
pub const METEOR_SEED_RADIUS: f64 = 1.0;

/// Display positions further than this from their grid position snap instead of easing.
pub const DISPLAY_SNAP_DISTANCE: f64 = 100.0;
/// Fraction of the remaining display distance covered per frame.
pub const DISPLAY_EASING: f64 = 0.1;

/// Maturity boundaries of the Cloud / Solid / Glitch phase labels.
pub const PHASE_SOLID_MATURITY: f64 = 0.3;
pub const PHASE_GLITCH_MATURITY: f64 = 0.7;
