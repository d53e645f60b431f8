pub mod cell;
pub mod config;
pub mod constants;
pub mod events;
pub mod grid;
pub mod meteor;
pub mod metrics;
pub mod rng;
pub mod rules;
pub mod scheduler;
pub mod sensors;
pub mod spatial;
pub mod tectonic;
pub mod world;

pub use cell::Cell;
pub use config::{SimConfig, SimConfigError};
pub use events::{DeathCause, Direction, SimEvent};
pub use grid::{GridKey, GridTopology};
pub use meteor::{Meteor, MeteorPhase};
pub use metrics::{PopulationStats, RunSummary, StepMetrics};
pub use rules::{MaturityPhase, RuleState};
pub use sensors::SensorInputs;
pub use world::{ExperimentError, StepReport, World, WorldInitError};
