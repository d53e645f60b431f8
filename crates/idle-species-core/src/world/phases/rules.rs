use super::super::World;
use crate::sensors::SensorInputs;

impl World {
    /// Refresh rule parameters from the population at the start of the step.
    pub(in crate::world) fn step_rules_phase(&mut self, inputs: &SensorInputs) {
        let population = self.cells.len();
        self.rules.refresh(&self.config, inputs, population);
    }
}
