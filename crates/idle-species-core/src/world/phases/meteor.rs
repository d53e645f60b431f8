use super::super::World;
use crate::constants::METEOR_MATURITY_RETENTION;
use crate::events::{DeathCause, SimEvent};
use crate::meteor::{death_chance, MeteorTransition};
use crate::spatial;
use rand::Rng;
use tracing::info;

impl World {
    /// Continuous-time meteor update, driven by the clamped frame time.
    pub(in crate::world) fn update_meteor_phase(&mut self, dt: f64) {
        match self.meteor.update(dt) {
            Some(MeteorTransition::Impacted {
                target,
                blast_radius,
            }) => self.resolve_impact(target, blast_radius),
            Some(MeteorTransition::Settled) => {
                info!("meteor shockwave settled");
                self.events.push(SimEvent::MeteorSettled);
            }
            None => {}
        }
    }

    /// Cull cells around ground zero, then knock maturity back.
    fn resolve_impact(&mut self, target: [f64; 2], blast_radius: f64) {
        let tree = spatial::build_index(&self.cells, &self.topology);
        let mut doomed = vec![false; self.cells.len()];
        for (index, distance) in spatial::cells_within(&tree, target, blast_radius) {
            if self.rng.random::<f64>() < death_chance(distance, blast_radius) {
                doomed[index] = true;
            }
        }

        let before = self.cells.len();
        let mut flags = doomed.into_iter();
        self.cells.retain(|_| !flags.next().unwrap_or(false));
        let killed = before - self.cells.len();

        if self.cells.is_empty() {
            self.rules.set_maturity(0.0);
        } else {
            self.rules
                .set_maturity(self.rules.maturity * METEOR_MATURITY_RETENTION);
        }
        self.meteor_impacts += 1;
        self.total_deaths += killed;

        info!(
            ?target,
            blast_radius,
            killed,
            survivors = self.cells.len(),
            maturity = self.rules.maturity,
            "meteor impact"
        );
        self.events.push(SimEvent::MeteorImpact {
            position: target,
            killed,
        });
        if killed > 0 {
            self.events.push(SimEvent::BulkDeath {
                count: killed,
                cause: DeathCause::Meteor,
            });
        }
    }
}
