use serde::{Deserialize, Serialize};

/// Scalars pulled from external collaborators once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorInputs {
    /// Ambient noise, normalized to [0,1].
    pub noise_level: f64,
    /// Ambient light, normalized to [0,1]. Only the presentation layer reads it.
    pub light_level: f64,
    /// Host CPU load in [0,100]; drives adaptive population sizing when present.
    pub cpu_load_percent: Option<f64>,
}

impl SensorInputs {
    pub fn with_noise(noise_level: f64) -> Self {
        Self {
            noise_level,
            ..Self::default()
        }
    }
}
