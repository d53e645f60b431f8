use super::super::World;
use crate::cell::Cell;
use crate::constants::{
    AGING_DEATH_CHANCE, AGING_STRESS_BONUS, AGING_STRESS_NOISE, PERMISSIVE_MATURITY,
    PERMISSIVE_SURVIVAL_FACTOR,
};
use crate::events::{DeathCause, SimEvent};
use crate::grid::{GridKey, NEIGHBOR_OFFSETS};
use rand::Rng;
use std::collections::{HashMap, HashSet};

impl World {
    /// Occupancy lookup over active cells, keyed by canonical grid key.
    /// Later cells in store order win on a shared key.
    pub(in crate::world) fn build_lookup(&self) -> HashMap<GridKey, usize> {
        let mut lookup = HashMap::with_capacity(self.cells.len());
        for (index, cell) in self.cells.iter().enumerate() {
            if cell.is_active() {
                lookup.insert(cell.key(&self.topology), index);
            }
        }
        lookup
    }

    /// Candidate keys in first-seen order: each active cell, then its 8 neighbors.
    fn collect_candidates(&self) -> Vec<GridKey> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for cell in self.cells.iter().filter(|c| c.is_active()) {
            let key = cell.key(&self.topology);
            let around = NEIGHBOR_OFFSETS
                .iter()
                .map(|&(dx, dy)| self.topology.canonicalize(key.offset(dx, dy)));
            for candidate in std::iter::once(key).chain(around) {
                if seen.insert(candidate) {
                    candidates.push(candidate);
                }
            }
        }
        candidates
    }

    /// Evaluate the modified Life rule once over every candidate.
    pub(in crate::world) fn step_automaton_phase(
        &mut self,
        lookup: &HashMap<GridKey, usize>,
        noise: f64,
    ) {
        if lookup.is_empty() {
            return;
        }
        let topology = self.topology;
        let candidates = self.collect_candidates();
        let population_before = self.cells.len();
        let maturity = self.rules.maturity;
        let age_limit = self.rules.age_limit;
        let birth_chance = self.rules.birth_chance;
        let mutation_rate = self.rules.mutation_rate;
        let aging_death = AGING_DEATH_CHANCE
            + if noise > AGING_STRESS_NOISE {
                AGING_STRESS_BONUS
            } else {
                0.0
            };

        let mut previous: Vec<Option<Cell>> =
            std::mem::take(&mut self.cells).into_iter().map(Some).collect();
        let mut next = Vec::with_capacity(population_before);
        let mut survivors = 0;
        let mut births = 0;

        for key in candidates {
            let n = topology
                .neighbors(key)
                .iter()
                .filter(|k| lookup.contains_key(*k))
                .count();

            match lookup.get(&key) {
                Some(&index) => {
                    let mut alive = n == 2 || n == 3;
                    if !alive && maturity > PERMISSIVE_MATURITY && matches!(n, 1 | 4 | 5) {
                        alive = self.rng.random::<f64>() < maturity * PERMISSIVE_SURVIVAL_FACTOR;
                    }
                    if !alive {
                        continue;
                    }
                    let Some(mut cell) = previous[index].take() else {
                        continue;
                    };
                    cell.age = cell.age.saturating_add(1);
                    if cell.age as f64 > age_limit && self.rng.random::<f64>() < aging_death {
                        continue;
                    }
                    cell.set_key(key);
                    next.push(cell);
                    survivors += 1;
                }
                None => {
                    let born = if n == 3 {
                        self.rng.random::<f64>() < birth_chance
                    } else {
                        self.rng.random::<f64>() < mutation_rate
                            && self.rng.random::<f64>() < birth_chance
                    };
                    if born {
                        let cell = Cell::newborn(key, &topology);
                        self.events.push(SimEvent::CellBorn {
                            gx: cell.gx,
                            gy: cell.gy,
                            position: cell.position,
                        });
                        next.push(cell);
                        births += 1;
                    }
                }
            }
        }

        let deaths = population_before - survivors;
        self.cells = next;
        self.births_last_step = births;
        self.deaths_last_step = deaths;
        self.total_births += births;
        self.total_deaths += deaths;
        if deaths > 0 {
            self.events.push(SimEvent::BulkDeath {
                count: deaths,
                cause: DeathCause::Automaton,
            });
        }
    }
}
