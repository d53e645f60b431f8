use crate::grid::GridKey;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    Automaton,
    Meteor,
}

/// Cardinal direction of a tectonic shift.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit grid vector; north points toward decreasing `gy`.
    pub fn unit(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// Notifications consumed by presentation and audio collaborators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimEvent {
    CellBorn {
        gx: i32,
        gy: i32,
        position: [f64; 2],
    },
    BulkDeath {
        count: usize,
        cause: DeathCause,
    },
    TectonicShift {
        origin: GridKey,
        width: i32,
        height: i32,
        direction: Direction,
        moved: usize,
    },
    MeteorTriggered {
        entry: [f64; 2],
        target: [f64; 2],
    },
    MeteorImpact {
        position: [f64; 2],
        killed: usize,
    },
    MeteorSettled,
    Reseeded {
        count: usize,
    },
}
