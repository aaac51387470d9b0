//! Synthetic training data for the risk classifier.

use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::error::ModelError;
use crate::types::TelemetryReading;

pub const DEFAULT_SAMPLES: usize = 5000;

// (mean, std) per feature
const TEMPERATURE: (f64, f64) = (85.0, 8.0);
const VIBRATION: (f64, f64) = (0.25, 0.08);
const COOLANT: (f64, f64) = (60.0, 15.0);
const BATTERY: (f64, f64) = (12.4, 0.5);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabeledReading {
    pub reading: TelemetryReading,
    pub risk: bool,
}

/// Label rule for generated samples.
///
/// Battery is a model input but plays no part in the label. Keep it that way:
/// the trained decision boundary depends on it.
pub fn risk_label(r: &TelemetryReading) -> bool {
    r.temperature > 95.0 || r.vibration > 0.4 || r.coolant < 40.0
}

/// Draws `n` independent readings from fixed normals, reproducible per `seed`.
pub fn generate(n: usize, seed: u64) -> Result<Vec<LabeledReading>, ModelError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let temperature = Normal::new(TEMPERATURE.0, TEMPERATURE.1)?;
    let vibration = Normal::new(VIBRATION.0, VIBRATION.1)?;
    let coolant = Normal::new(COOLANT.0, COOLANT.1)?;
    let battery = Normal::new(BATTERY.0, BATTERY.1)?;

    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let reading = TelemetryReading {
            temperature: temperature.sample(&mut rng),
            vibration: vibration.sample(&mut rng),
            coolant: coolant.sample(&mut rng),
            battery: battery.sample(&mut rng),
        };
        out.push(LabeledReading {
            risk: risk_label(&reading),
            reading,
        });
    }
    Ok(out)
}
