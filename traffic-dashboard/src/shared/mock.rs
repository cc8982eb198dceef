/// Synthetic metrics for running the dashboard without a live feed
use crate::shared::{render::GREEN_CORRIDOR_THRESHOLD, types::MetricsSnapshot};
use chrono::Utc;
use rand::{Rng, rngs::ThreadRng};

/// Emission factor applied per main-route vehicle
pub const CO2_PER_VEHICLE: f64 = 2.31;

/// Period divisor of the main-route wave, in milliseconds
const MAIN_WAVE_DIVISOR_MS: f64 = 5000.0;

/// Generates one fresh [`MetricsSnapshot`] per call.
///
/// The only state carried between calls is the random number generator; the
/// main-route wave follows the wall clock.
#[derive(Debug, Clone)]
pub struct MockGenerator<R = ThreadRng> {
    rng: R,
}

impl MockGenerator<ThreadRng> {
    /// Create a new generator backed by the thread-local RNG
    pub fn new() -> Self {
        Self::with_rng(rand::rng())
    }
}

impl Default for MockGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> MockGenerator<R> {
    /// Create a new generator with a custom RNG
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Generate a snapshot for the current wall-clock time
    pub fn generate(&mut self) -> MetricsSnapshot {
        self.generate_at(Utc::now().timestamp_millis() as f64)
    }

    /// Generate a snapshot for the given time in epoch milliseconds
    pub fn generate_at(&mut self, now_ms: f64) -> MetricsSnapshot {
        let wave = 5.0 * (now_ms / MAIN_WAVE_DIVISOR_MS).sin();
        let noise = self.rng.random_range(-1.5..1.5);
        let main = round_count(10.0 + wave + noise);

        let corridor = round_count(self.rng.random_range(0.0..3.0));
        let amb = if self.rng.random_bool(0.05) { 1 } else { 0 };
        let amb_violation = self.rng.random_bool(0.02);
        let latency = self.rng.random_range(0.9..1.5);
        let over2pct = if self.rng.random_bool(0.02) { 3.0 } else { 0.8 };

        MetricsSnapshot {
            main,
            corridor,
            amb,
            amb_violation,
            latency,
            over2pct,
            co2: main as f64 * CO2_PER_VEHICLE,
            corridor_open: main > GREEN_CORRIDOR_THRESHOLD,
        }
    }
}

/// Round half up and clamp at zero
fn round_count(value: f64) -> u64 {
    (value + 0.5).floor().max(0.0) as u64
}
