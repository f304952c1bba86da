//! Population and run configuration.
//!
//! [`PopulationConfig`] holds the genetic-algorithm parameters that govern a
//! single generational step. [`RunConfig`] holds the termination conditions
//! used by [`EvolutionRunner`](super::EvolutionRunner).

use crate::error::ConfigError;

/// Configuration of the dedicated evaluation worker pool.
///
/// # Defaults
///
/// ```
/// use u_evolve::population::PoolConfig;
///
/// let config = PoolConfig::default();
/// assert!(config.num_threads.is_none());
/// assert!(config.resolved_threads() >= 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolConfig {
    /// Number of worker threads.
    ///
    /// `None` uses the available hardware concurrency.
    pub num_threads: Option<usize>,

    /// Prefix for worker thread names. Threads are named `{prefix}-{index}`.
    pub thread_name_prefix: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            thread_name_prefix: "u-evolve-eval".into(),
        }
    }
}

impl PoolConfig {
    /// Sets a fixed number of worker threads.
    pub fn with_num_threads(mut self, n: usize) -> Self {
        self.num_threads = Some(n);
        self
    }

    /// Sets the worker thread name prefix.
    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Number of threads the pool will actually start.
    pub fn resolved_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_threads == Some(0) {
            return Err(ConfigError::NoWorkerThreads);
        }
        Ok(())
    }
}

/// Genetic-algorithm parameters of a [`Population`](super::Population).
///
/// # Defaults
///
/// ```
/// use u_evolve::population::PopulationConfig;
///
/// let config = PopulationConfig::default();
/// assert_eq!(config.die_off_percentage, 0.4);
/// assert!(config.seed.is_none());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_evolve::population::{PoolConfig, PopulationConfig};
///
/// let config = PopulationConfig::new(0.5, 0.9, 0.25)
///     .with_seed(42)
///     .with_pool(PoolConfig::default().with_num_threads(2));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulationConfig {
    /// Deviation handed to the mutation trial and to [`Organism::mutate`](super::Organism::mutate).
    ///
    /// `0.0` disables survivor mutation entirely.
    pub mutation_deviation: f64,

    /// Crossover rate handed to [`Organism::mate`](super::Organism::mate) (0.0–1.0).
    pub crossover_percentage: f64,

    /// Fraction of the population culled each generation (0.0–1.0).
    ///
    /// The culled count is rounded down to an even number.
    pub die_off_percentage: f64,

    /// Random seed for parent selection and mutation trials.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Worker pool used for fitness evaluation.
    pub pool: PoolConfig,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            mutation_deviation: 1.0,
            crossover_percentage: 0.5,
            die_off_percentage: 0.4,
            seed: None,
            pool: PoolConfig::default(),
        }
    }
}

impl PopulationConfig {
    /// Creates a configuration from the three GA parameters.
    ///
    /// Values are stored as given; call [`validate`](Self::validate) to check them.
    pub fn new(mutation_deviation: f64, crossover_percentage: f64, die_off_percentage: f64) -> Self {
        Self {
            mutation_deviation,
            crossover_percentage,
            die_off_percentage,
            ..Self::default()
        }
    }

    /// Sets the mutation deviation.
    pub fn with_mutation_deviation(mut self, deviation: f64) -> Self {
        self.mutation_deviation = deviation.max(0.0);
        self
    }

    /// Sets the crossover percentage.
    pub fn with_crossover_percentage(mut self, rate: f64) -> Self {
        self.crossover_percentage = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the die-off percentage.
    pub fn with_die_off_percentage(mut self, rate: f64) -> Self {
        self.die_off_percentage = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the worker pool configuration.
    pub fn with_pool(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    /// Number of members culled from a population of `size`.
    ///
    /// `floor(size × die_off_percentage)`, rounded down to an even number so
    /// breeding always replaces whole pairs.
    pub fn cull_count(&self, size: usize) -> usize {
        let lost = (size as f64 * self.die_off_percentage) as usize;
        lost.min(size) & !1
    }

    /// Validates the configuration, including the worker pool settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_parameters()?;
        self.pool.validate()
    }

    /// Validates the three GA parameters only.
    pub fn validate_parameters(&self) -> Result<(), ConfigError> {
        if !self.mutation_deviation.is_finite() || self.mutation_deviation < 0.0 {
            return Err(ConfigError::InvalidMutationDeviation(self.mutation_deviation));
        }
        if !(0.0..=1.0).contains(&self.crossover_percentage) {
            return Err(ConfigError::InvalidCrossoverPercentage(
                self.crossover_percentage,
            ));
        }
        if !(0.0..=1.0).contains(&self.die_off_percentage) {
            return Err(ConfigError::InvalidDieOffPercentage(self.die_off_percentage));
        }
        Ok(())
    }
}

/// Termination conditions for [`EvolutionRunner`](super::EvolutionRunner).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunConfig {
    /// Maximum number of generations to advance.
    pub max_generations: usize,

    /// Number of generations without a strictly better winner before stopping.
    ///
    /// Set to 0 to disable stagnation-based termination.
    pub stagnation_limit: usize,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked before each generation, so a run may overshoot by one
    /// generation's worth of work.
    pub time_limit_ms: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_generations: 500,
            stagnation_limit: 50,
            time_limit_ms: None,
        }
    }
}

impl RunConfig {
    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::ZeroTimeLimit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PopulationConfig::default();
        assert!((config.mutation_deviation - 1.0).abs() < 1e-10);
        assert!((config.crossover_percentage - 0.5).abs() < 1e-10);
        assert!((config.die_off_percentage - 0.4).abs() < 1e-10);
        assert!(config.seed.is_none());
        assert_eq!(config.pool, PoolConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = PopulationConfig::default()
            .with_mutation_deviation(0.3)
            .with_crossover_percentage(0.8)
            .with_die_off_percentage(0.2)
            .with_seed(7)
            .with_pool(PoolConfig::default().with_num_threads(3));

        assert!((config.mutation_deviation - 0.3).abs() < 1e-10);
        assert!((config.crossover_percentage - 0.8).abs() < 1e-10);
        assert!((config.die_off_percentage - 0.2).abs() < 1e-10);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.pool.num_threads, Some(3));
    }

    #[test]
    fn test_clamp_rates() {
        let config = PopulationConfig::default()
            .with_mutation_deviation(-1.0)
            .with_crossover_percentage(1.5)
            .with_die_off_percentage(-0.5);

        assert!((config.mutation_deviation - 0.0).abs() < 1e-10);
        assert!((config.crossover_percentage - 1.0).abs() < 1e-10);
        assert!((config.die_off_percentage - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert_eq!(
            PopulationConfig::new(-0.1, 0.5, 0.5).validate(),
            Err(ConfigError::InvalidMutationDeviation(-0.1))
        );
        assert_eq!(
            PopulationConfig::new(0.0, 1.1, 0.5).validate(),
            Err(ConfigError::InvalidCrossoverPercentage(1.1))
        );
        assert_eq!(
            PopulationConfig::new(0.0, 0.5, 2.0).validate(),
            Err(ConfigError::InvalidDieOffPercentage(2.0))
        );
        assert!(PopulationConfig::new(f64::NAN, 0.5, 0.5).validate().is_err());
    }

    #[test]
    fn test_validate_zero_threads() {
        let config =
            PopulationConfig::default().with_pool(PoolConfig::default().with_num_threads(0));
        assert_eq!(config.validate(), Err(ConfigError::NoWorkerThreads));
        assert_eq!(config.validate_parameters(), Ok(()));
    }

    // ---- cull_count ----

    #[test]
    fn test_cull_count_is_even() {
        let config = PopulationConfig::new(0.0, 0.5, 0.3);
        // floor(10 * 0.3) = 3 -> 2
        assert_eq!(config.cull_count(10), 2);
        // floor(20 * 0.3) = 6
        assert_eq!(config.cull_count(20), 6);
        // floor(7 * 0.3) = 2
        assert_eq!(config.cull_count(7), 2);
    }

    #[test]
    fn test_cull_count_scenarios() {
        let half = PopulationConfig::new(0.0, 0.5, 0.5);
        assert_eq!(half.cull_count(4), 2);
        assert_eq!(half.cull_count(8), 4);
        assert_eq!(half.cull_count(5), 2);

        let none = PopulationConfig::new(0.0, 0.5, 0.0);
        assert_eq!(none.cull_count(100), 0);

        let all = PopulationConfig::new(0.0, 0.5, 1.0);
        assert_eq!(all.cull_count(5), 4);
    }

    // ---- RunConfig ----

    #[test]
    fn test_run_config_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.max_generations, 500);
        assert_eq!(config.stagnation_limit, 50);
        assert!(config.time_limit_ms.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_run_config_validate() {
        assert_eq!(
            RunConfig::default().with_max_generations(0).validate(),
            Err(ConfigError::NoGenerations)
        );
        assert_eq!(
            RunConfig::default().with_time_limit_ms(0).validate(),
            Err(ConfigError::ZeroTimeLimit)
        );
        assert!(RunConfig::default().with_time_limit_ms(1).validate().is_ok());
    }
}
