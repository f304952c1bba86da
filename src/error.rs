//! Error types for population evolution.
//!
//! Every fallible operation in the crate returns [`PopulationError`].
//! Configuration problems are reported separately as [`ConfigError`] and
//! wrapped when they surface through a [`Population`](crate::population::Population)
//! constructor.

use thiserror::Error;

/// Boxed error produced by a domain fitness evaluator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Invalid configuration parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Mutation deviation is negative or not finite.
    #[error("mutation_deviation must be a finite non-negative number, got {0}")]
    InvalidMutationDeviation(f64),

    /// Crossover percentage is outside `[0, 1]`.
    #[error("crossover_percentage must be within [0, 1], got {0}")]
    InvalidCrossoverPercentage(f64),

    /// Die-off percentage is outside `[0, 1]`.
    #[error("die_off_percentage must be within [0, 1], got {0}")]
    InvalidDieOffPercentage(f64),

    /// Worker pool was configured with zero threads.
    #[error("worker pool needs at least one thread")]
    NoWorkerThreads,

    /// Run configuration allows no generations.
    #[error("max_generations must be at least 1")]
    NoGenerations,

    /// Zero wall-clock limit.
    #[error("time_limit_ms must be positive or None")]
    ZeroTimeLimit,
}

/// Fatal conditions raised while seeding or advancing a population.
///
/// Apart from [`TooSmall`](PopulationError::TooSmall) and
/// [`InsufficientSurvivors`](PopulationError::InsufficientSurvivors), which
/// are detected before any state changes, an error leaves the population
/// poisoned. A poisoned population must be discarded and rebuilt.
#[derive(Debug, Error)]
pub enum PopulationError {
    /// Not enough members to run a generation.
    #[error("population must have at least {required} members, currently {actual}")]
    TooSmall { required: usize, actual: usize },

    /// The die-off rate would leave fewer than two parents.
    #[error("culling would leave {survivors} survivors, at least 2 are needed to breed")]
    InsufficientSurvivors { survivors: usize },

    /// The fitness evaluator reported a failure.
    #[error("fitness evaluation failed: {0}")]
    Evaluation(#[source] BoxError),

    /// The fitness evaluator panicked inside a worker thread.
    #[error("evaluation worker panicked: {0}")]
    WorkerPanicked(String),

    /// The dedicated worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),

    /// An earlier failure left the population unusable.
    #[error("population was poisoned by an earlier failure and must be rebuilt")]
    Poisoned,

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl PopulationError {
    /// Returns `true` if the error means the population can no longer be used.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PopulationError::Evaluation(_)
                | PopulationError::WorkerPanicked(_)
                | PopulationError::Poisoned
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_small_message() {
        let err = PopulationError::TooSmall {
            required: 4,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "population must have at least 4 members, currently 3"
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_evaluation_keeps_source() {
        let inner: BoxError = "bad genome".into();
        let err = PopulationError::Evaluation(inner);
        assert!(err.is_fatal());
        let source = std::error::Error::source(&err).expect("source must be kept");
        assert_eq!(source.to_string(), "bad genome");
    }

    #[test]
    fn test_config_error_converts() {
        let err: PopulationError = ConfigError::InvalidDieOffPercentage(1.5).into();
        assert!(matches!(
            err,
            PopulationError::Config(ConfigError::InvalidDieOffPercentage(_))
        ));
        assert!(!err.is_fatal());
    }
}
