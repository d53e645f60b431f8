use crate::cell::Cell;
use crate::config::{SimConfig, SimConfigError};
use crate::events::SimEvent;
use crate::grid::GridTopology;
use crate::meteor::{Meteor, MeteorParams};
use crate::metrics::{PopulationStats, RunSummary};
use crate::rng::create_rng;
use crate::rules::RuleState;
use crate::scheduler::FixedStepClock;
use crate::sensors::SensorInputs;
use crate::tectonic::ShiftPlan;
use rand_chacha::ChaCha12Rng;
use std::time::Instant;
use std::{error::Error, fmt};
use tracing::{debug, info};

/// Outcome and timings of one fixed step.
#[derive(Clone, Debug)]
pub struct StepReport {
    pub births: usize,
    pub deaths: usize,
    pub shift: Option<ShiftPlan>,
    pub lookup_us: u64,
    pub evaluate_us: u64,
    pub total_us: u64,
    /// Events produced by this step, in order.
    pub events: Vec<SimEvent>,
}

/// The whole simulation state. Every mutation happens through `&mut self`.
pub struct World {
    config: SimConfig,
    topology: GridTopology,
    cells: Vec<Cell>,
    rules: RuleState,
    meteor: Meteor,
    rng: ChaCha12Rng,
    clock: FixedStepClock,
    /// Events produced since the last `advance`/`drain_events`.
    events: Vec<SimEvent>,
    step_index: usize,
    births_last_step: usize,
    deaths_last_step: usize,
    total_births: usize,
    total_deaths: usize,
    tectonic_shifts: usize,
    meteor_impacts: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorldInitError {
    Config(SimConfigError),
    TooManyCells { max: usize, actual: usize },
}

impl fmt::Display for WorldInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldInitError::Config(e) => write!(f, "{}", e),
            WorldInitError::TooManyCells { max, actual } => {
                write!(f, "initial cell count ({actual}) exceeds supported maximum ({max})")
            }
        }
    }
}

impl From<SimConfigError> for WorldInitError {
    fn from(err: SimConfigError) -> Self {
        WorldInitError::Config(err)
    }
}

impl Error for WorldInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorldInitError::Config(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperimentError {
    InvalidSampleEvery,
    InvalidMeteorEvery,
    TooManyFrames { max: usize, actual: usize },
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentError::InvalidSampleEvery => write!(f, "sample_every must be positive"),
            ExperimentError::InvalidMeteorEvery => write!(f, "meteor_every must be positive"),
            ExperimentError::TooManyFrames { max, actual } => {
                write!(f, "frames ({actual}) exceed supported maximum ({max})")
            }
        }
    }
}

impl Error for ExperimentError {}

impl World {
    pub const MAX_INITIAL_CELLS: usize = 1_000_000;
    pub const MAX_EXPERIMENT_FRAMES: usize = 10_000_000;

    pub fn new(config: SimConfig) -> Result<Self, WorldInitError> {
        config.validate()?;
        let topology = topology_for(&config);
        Ok(Self {
            topology,
            cells: Vec::new(),
            rules: RuleState::from_config(&config),
            meteor: Meteor::default(),
            rng: create_rng(config.seed),
            clock: FixedStepClock::new(config.step_duration, config.max_frame_dt),
            events: Vec::new(),
            step_index: 0,
            births_last_step: 0,
            deaths_last_step: 0,
            total_births: 0,
            total_deaths: 0,
            tectonic_shifts: 0,
            meteor_impacts: 0,
            config,
        })
    }

    /// Start from an explicit population instead of an empty grid.
    pub fn with_cells(config: SimConfig, cells: Vec<Cell>) -> Result<Self, WorldInitError> {
        if cells.len() > Self::MAX_INITIAL_CELLS {
            return Err(WorldInitError::TooManyCells {
                max: Self::MAX_INITIAL_CELLS,
                actual: cells.len(),
            });
        }
        let mut world = Self::new(config)?;
        world.cells = cells;
        Ok(world)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Swap in a new configuration at runtime.
    ///
    /// Maturity and the cell store carry over. The clock keeps its accumulated
    /// time; a changed viewport or grid step rebuilds the topology.
    pub fn set_config(&mut self, config: SimConfig) -> Result<(), WorldInitError> {
        config.validate()?;
        self.topology = topology_for(&config);
        self.clock.set_step_duration(config.step_duration);
        self.clock.set_max_frame_dt(config.max_frame_dt);
        if !config.adaptive_population {
            self.rules.max_population = config.max_population;
        }
        self.config = config;
        Ok(())
    }

    pub fn topology(&self) -> &GridTopology {
        &self.topology
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn population(&self) -> usize {
        self.cells.len()
    }

    /// Cells that currently count as occupied neighbors.
    pub fn active_population(&self) -> usize {
        self.cells.iter().filter(|c| c.is_active()).count()
    }

    pub fn rules(&self) -> &RuleState {
        &self.rules
    }

    pub fn maturity(&self) -> f64 {
        self.rules.maturity
    }

    /// Manual maturity override. Auto mode keeps drifting from the new value.
    pub fn set_maturity(&mut self, maturity: f64) {
        self.rules.set_maturity(maturity);
    }

    pub fn meteor(&self) -> &Meteor {
        &self.meteor
    }

    pub fn clock(&self) -> &FixedStepClock {
        &self.clock
    }

    pub fn population_stats(&self) -> PopulationStats {
        PopulationStats {
            population: self.cells.len(),
            total_births: self.total_births,
            total_deaths: self.total_deaths,
            total_steps: self.step_index,
            tectonic_shifts: self.tectonic_shifts,
            meteor_impacts: self.meteor_impacts,
        }
    }

    /// Change the viewport. Stored cell coordinates are re-wrapped lazily.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), WorldInitError> {
        let config = SimConfig {
            viewport_width: width,
            viewport_height: height,
            ..self.config.clone()
        };
        config.validate()?;
        self.topology = topology_for(&config);
        self.config = config;
        debug!(
            cols = self.topology.cols(),
            rows = self.topology.rows(),
            "viewport resized"
        );
        Ok(())
    }

    /// Launch a meteor from a random edge. Ignored while one is already active.
    pub fn trigger_meteor(&mut self) -> bool {
        let params = MeteorParams::from_config(&self.config);
        let launched = self.meteor.trigger(
            &mut self.rng,
            self.config.viewport_width,
            self.config.viewport_height,
            params,
        );
        if launched {
            let entry = self.meteor.position();
            let target = self.meteor.target();
            info!(?entry, ?target, "meteor triggered");
            self.events.push(SimEvent::MeteorTriggered { entry, target });
        }
        launched
    }

    /// Take the events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance by one rendered frame of `dt` seconds and return what happened.
    pub fn advance(&mut self, dt: f64, inputs: &SensorInputs) -> Vec<SimEvent> {
        let dt = self.clock.clamp_frame(dt);
        if self.config.auto_reseed && self.cells.is_empty() && !self.meteor.is_active() {
            self.reseed();
        }
        self.update_meteor_phase(dt);

        self.clock.accumulate(dt);
        while self.clock.next_step() {
            let report = self.step(inputs);
            self.events.extend(report.events);
        }

        self.presentation_phase();
        self.drain_events()
    }

    /// One logical generation: rule refresh, automaton, tectonic attempt.
    ///
    /// The step's events are handed back in the report rather than left in
    /// the frame queue, so driving the world through `step` alone never
    /// accumulates events.
    pub fn step(&mut self, inputs: &SensorInputs) -> StepReport {
        let total_start = Instant::now();
        let queued = self.events.len();
        self.step_index = self.step_index.saturating_add(1);
        self.births_last_step = 0;
        self.deaths_last_step = 0;

        self.step_rules_phase(inputs);

        let t0 = Instant::now();
        let lookup = self.build_lookup();
        let lookup_us = t0.elapsed().as_micros() as u64;

        let t1 = Instant::now();
        self.step_automaton_phase(&lookup, inputs.noise_level);
        let evaluate_us = t1.elapsed().as_micros() as u64;

        let shift = self.step_tectonic_phase(inputs.noise_level);

        debug!(
            step = self.step_index,
            births = self.births_last_step,
            deaths = self.deaths_last_step,
            population = self.cells.len(),
            maturity = self.rules.maturity,
            "step complete"
        );

        StepReport {
            births: self.births_last_step,
            deaths: self.deaths_last_step,
            shift,
            lookup_us,
            evaluate_us,
            total_us: total_start.elapsed().as_micros() as u64,
            events: self.events.split_off(queued),
        }
    }

    pub fn run_experiment(
        &mut self,
        frames: usize,
        sample_every: usize,
        inputs: &SensorInputs,
        meteor_every: Option<usize>,
    ) -> RunSummary {
        self.try_run_experiment(frames, sample_every, inputs, meteor_every)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Run `frames` frames of `config.frame_dt` with constant inputs.
    ///
    /// Metrics are sampled every `sample_every` completed steps. Events are
    /// discarded; the summary carries the counters instead.
    pub fn try_run_experiment(
        &mut self,
        frames: usize,
        sample_every: usize,
        inputs: &SensorInputs,
        meteor_every: Option<usize>,
    ) -> Result<RunSummary, ExperimentError> {
        if sample_every == 0 {
            return Err(ExperimentError::InvalidSampleEvery);
        }
        if meteor_every == Some(0) {
            return Err(ExperimentError::InvalidMeteorEvery);
        }
        if frames > Self::MAX_EXPERIMENT_FRAMES {
            return Err(ExperimentError::TooManyFrames {
                max: Self::MAX_EXPERIMENT_FRAMES,
                actual: frames,
            });
        }

        let before = self.population_stats();
        let dt = self.config.frame_dt;
        let mut samples = Vec::new();
        let mut sampled_buckets = 0;
        for frame in 1..=frames {
            if let Some(every) = meteor_every {
                if frame % every == 0 {
                    self.trigger_meteor();
                }
            }
            self.advance(dt, inputs);

            let steps = self.step_index - before.total_steps;
            if steps / sample_every > sampled_buckets {
                sampled_buckets = steps / sample_every;
                samples.push(crate::metrics::collect_step_metrics(
                    steps,
                    self.births_last_step,
                    self.deaths_last_step,
                    &self.rules,
                    &self.cells,
                    self.meteor.is_active(),
                ));
            }
        }

        let after = self.population_stats();
        Ok(RunSummary {
            schema_version: 1,
            frames,
            steps: after.total_steps - before.total_steps,
            sample_every,
            final_population: after.population,
            samples,
            tectonic_shifts: after.tectonic_shifts - before.tectonic_shifts,
            meteor_impacts: after.meteor_impacts - before.meteor_impacts,
            total_births: after.total_births - before.total_births,
            total_deaths: after.total_deaths - before.total_deaths,
        })
    }
}

fn topology_for(config: &SimConfig) -> GridTopology {
    GridTopology::from_viewport(
        config.viewport_width,
        config.viewport_height,
        config.grid_step,
    )
}

mod phases;
