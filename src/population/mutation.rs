//! Survivor mutation trial.

use rand::Rng;
use rand_distr::StandardNormal;

/// Decides whether a single survivor mutates this generation.
///
/// Samples `z ~ N(0, 1)` and fires when `|z · deviation| ≥ 1`. The chance of
/// mutating therefore grows with `deviation`: `0.0` never mutates, `1.0`
/// mutates about 32% of the time, and large deviations approach certainty.
pub fn mutation_event<R: Rng>(deviation: f64, rng: &mut R) -> bool {
    if deviation <= 0.0 {
        return false;
    }
    let z: f64 = rng.sample(StandardNormal);
    (z * deviation).abs() >= 1.0
}
