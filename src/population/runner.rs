//! Multi-generation evolution loop.
//!
//! [`EvolutionRunner`] drives [`Population::advance`] until a termination
//! condition from [`RunConfig`] is met:
//! generation cap → stagnation → time limit → external cancellation.

use super::config::RunConfig;
use super::population::Population;
use super::types::{Fitness, FitnessEvaluator, Organism};
use crate::error::PopulationError;
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Result of an evolution run.
#[derive(Debug, Clone)]
pub struct EvolutionResult<F> {
    /// Best fitness in the population when the run stopped.
    pub best_fitness: Option<F>,

    /// Number of generations advanced by this run.
    pub generations: usize,

    /// Whether the run was terminated due to stagnation.
    pub stagnated: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Whether the wall-clock limit stopped the run.
    pub timed_out: bool,

    /// Best fitness before the run and after each generation.
    pub fitness_history: Vec<f64>,
}

/// Executes the evolution loop on an existing, seeded population.
///
/// # Usage
///
/// ```ignore
/// let mut population = Population::new(evaluator, PopulationConfig::default())?;
/// population.seed(organisms)?;
/// let result = EvolutionRunner::run(&mut population, &RunConfig::default())?;
/// println!("Best fitness: {:?}", result.best_fitness);
/// ```
pub struct EvolutionRunner;

impl EvolutionRunner {
    /// Advances `population` until a termination condition is met.
    ///
    /// Any error from [`Population::advance`] aborts the run.
    pub fn run<O, E>(
        population: &mut Population<O, E>,
        config: &RunConfig,
    ) -> Result<EvolutionResult<E::Fitness>, PopulationError>
    where
        O: Organism,
        E: FitnessEvaluator<O>,
    {
        Self::run_with_cancel(population, config, None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the run stops
    /// before the next generation starts.
    pub fn run_with_cancel<O, E>(
        population: &mut Population<O, E>,
        config: &RunConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<EvolutionResult<E::Fitness>, PopulationError>
    where
        O: Organism,
        E: FitnessEvaluator<O>,
    {
        config.validate()?;

        let start = Instant::now();
        let mut best = population.best_fitness();
        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        if let Some(f) = best {
            fitness_history.push(f.to_f64());
        }

        let mut generations = 0usize;
        let mut stagnation_counter = 0usize;
        let mut stagnated = false;
        let mut cancelled = false;
        let mut timed_out = false;

        while generations < config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if let Some(limit) = config.time_limit_ms {
                if start.elapsed().as_millis() >= u128::from(limit) {
                    timed_out = true;
                    break;
                }
            }

            population.advance()?;
            generations += 1;

            let gen_best = population.best_fitness();
            let improved = match (gen_best, best) {
                (Some(new), Some(old)) => new.rank_cmp(&old).is_gt(),
                (Some(_), None) => true,
                _ => false,
            };
            if improved {
                best = gen_best;
                stagnation_counter = 0;
            } else {
                stagnation_counter += 1;
            }

            if let Some(f) = gen_best {
                fitness_history.push(f.to_f64());
            }

            if config.stagnation_limit > 0 && stagnation_counter >= config.stagnation_limit {
                stagnated = true;
                break;
            }
        }

        info!(
            "evolution stopped after {generations} generation(s): best {:?}, stagnated={stagnated}, cancelled={cancelled}, timed_out={timed_out}",
            population.best_fitness()
        );

        Ok(EvolutionResult {
            best_fitness: population.best_fitness(),
            generations,
            stagnated,
            cancelled,
            timed_out,
            fitness_history,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
