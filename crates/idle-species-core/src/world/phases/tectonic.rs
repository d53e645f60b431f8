use super::super::World;
use crate::events::SimEvent;
use crate::tectonic::{trigger_chance, ShiftPlan};
use rand::Rng;
use tracing::debug;

impl World {
    /// At most one rigid block displacement per step.
    pub(in crate::world) fn step_tectonic_phase(&mut self, noise: f64) -> Option<ShiftPlan> {
        if self.cells.is_empty() {
            return None;
        }
        let chance = trigger_chance(self.config.glitch_override, self.rules.maturity, noise);
        if self.rng.random::<f64>() > chance {
            return None;
        }

        let plan = ShiftPlan::random(&mut self.rng, &self.topology);
        let moved = plan.apply(&mut self.cells, &self.topology);
        self.tectonic_shifts += 1;
        debug!(
            origin = ?plan.origin,
            width = plan.width,
            height = plan.height,
            direction = ?plan.direction,
            moved,
            "tectonic shift"
        );
        self.events.push(SimEvent::TectonicShift {
            origin: plan.origin,
            width: plan.width,
            height: plan.height,
            direction: plan.direction,
            moved,
        });
        Some(plan)
    }
}
