use crate::error::ModelError;
use crate::types::TelemetryReading;

/// Anything that turns a reading into a risk probability.
///
/// Implementations must be immutable once built; the server shares one
/// instance across all request handlers without locking.
pub trait Scorer: Send + Sync {
    /// Probability of the risk class, in [0, 1].
    fn score(&self, reading: &TelemetryReading) -> Result<f64, ModelError>;
}
