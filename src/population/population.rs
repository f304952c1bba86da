//! Fitness-ordered population and the generational transition.
//!
//! [`Population`] keeps its members in a `BTreeMap` keyed by [`RankKey`],
//! so the weakest member is always `first` and the winner always `last`.
//! [`advance`](Population::advance) runs one generation:
//! cull → mutate survivors → breed → evaluate children in parallel → merge.

use super::config::PopulationConfig;
use super::mutation::mutation_event;
use super::pool::{evaluate_guarded, WorkerPool};
use super::record::{FitnessRecord, RankKey};
use super::types::{Fitness, FitnessEvaluator, Organism};
use crate::error::PopulationError;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Smallest population that can run a generation.
pub const MIN_POPULATION: usize = 4;

/// Summary of one completed generation, returned by [`Population::advance`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport<F> {
    /// Generation number reached by this advance.
    pub generation: usize,

    /// Fitness of every culled member, weakest first.
    pub culled: Vec<F>,

    /// Number of survivors mutated in place.
    pub mutated: usize,

    /// Number of children bred and merged.
    pub children: usize,

    /// Number of discarded self-mating draws.
    pub redraws: usize,

    /// Number of breed/evaluate rounds needed to reach the target size.
    pub rounds: usize,
}

/// Fitness statistics of the current members.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationStats<F> {
    /// Highest fitness.
    pub best: F,
    /// Lowest fitness.
    pub worst: F,
    /// Mean fitness, as `f64`.
    pub mean: f64,
    /// Number of members.
    pub size: usize,
}

/// A population of organisms governed by genetic-algorithm parameters.
///
/// Members are ordered by stored fitness, ascending. Fitness is computed
/// once, when a member is inserted; survivors mutated during
/// [`advance`](Self::advance) keep their old score.
///
/// # Usage
///
/// ```ignore
/// let mut population = Population::new(evaluator, PopulationConfig::new(0.5, 0.8, 0.4))?;
/// population.seed(initial_organisms)?;
/// for _ in 0..100 {
///     population.advance()?;
/// }
/// let best = population.winner();
/// ```
///
/// # Failures
///
/// An evaluator failure or worker panic poisons the population: nothing
/// from the failed call is merged, the generation counter is unchanged and
/// every later `seed`/`add`/`advance` returns [`PopulationError::Poisoned`].
pub struct Population<O, E>
where
    O: Organism,
    E: FitnessEvaluator<O>,
{
    members: BTreeMap<RankKey<E::Fitness>, O>,
    evaluator: E,
    config: PopulationConfig,
    pool: Arc<WorkerPool>,
    rng: StdRng,
    generation: usize,
    next_sequence: u64,
    poisoned: bool,
}

impl<O, E> Population<O, E>
where
    O: Organism,
    E: FitnessEvaluator<O>,
{
    /// Creates an empty population with its own worker pool.
    pub fn new(evaluator: E, config: PopulationConfig) -> Result<Self, PopulationError> {
        config.validate()?;
        let pool = Arc::new(WorkerPool::new(&config.pool)?);
        Self::with_pool(evaluator, config, pool)
    }

    /// Creates an empty population evaluating on a shared worker pool.
    ///
    /// `config.pool` is ignored and not validated.
    pub fn with_pool(
        evaluator: E,
        config: PopulationConfig,
        pool: Arc<WorkerPool>,
    ) -> Result<Self, PopulationError> {
        config.validate_parameters()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Ok(Self {
            members: BTreeMap::new(),
            evaluator,
            config,
            pool,
            rng,
            generation: 0,
            next_sequence: 0,
            poisoned: false,
        })
    }

    /// Evaluates `organisms` in parallel and adds them all.
    ///
    /// All-or-nothing: if any evaluation fails, none of the batch is added
    /// and the population is poisoned.
    pub fn seed<I>(&mut self, organisms: I) -> Result<(), PopulationError>
    where
        I: IntoIterator<Item = O>,
    {
        self.ensure_usable()?;
        let batch: Vec<O> = organisms.into_iter().collect();
        let count = batch.len();
        let records = self.evaluate(batch)?;
        self.merge(records);
        debug!("seeded {count} organisms, population size {}", self.len());
        Ok(())
    }

    /// Evaluates one organism on the calling thread and adds it.
    ///
    /// Failures are handled as in [`seed`](Self::seed): an evaluator error
    /// or panic poisons the population.
    pub fn add(&mut self, organism: O) -> Result<(), PopulationError> {
        self.ensure_usable()?;
        match evaluate_guarded(organism, &self.evaluator) {
            Ok(record) => {
                self.merge(vec![record]);
                Ok(())
            }
            Err(err) => {
                self.poisoned = true;
                Err(err)
            }
        }
    }

    /// Runs one full generation.
    ///
    /// 1. Cull the weakest `cull_count(size)` members.
    /// 2. Mutate each survivor in place when its mutation trial fires.
    /// 3. Breed children from random survivor pairs (never a member with
    ///    itself) until the original size is reached.
    /// 4. Evaluate the children on the worker pool.
    /// 5. Merge them and increment the generation counter.
    ///
    /// # Errors
    ///
    /// - [`PopulationError::TooSmall`] if fewer than [`MIN_POPULATION`]
    ///   members are present. Nothing changes.
    /// - [`PopulationError::InsufficientSurvivors`] if culling would leave
    ///   fewer than two parents. Nothing changes.
    /// - [`PopulationError::Evaluation`] / [`PopulationError::WorkerPanicked`]
    ///   if a child could not be evaluated. The culled members are restored,
    ///   so the size is unchanged, and the population is poisoned.
    pub fn advance(&mut self) -> Result<GenerationReport<E::Fitness>, PopulationError> {
        self.ensure_usable()?;

        let target = self.members.len();
        if target < MIN_POPULATION {
            return Err(PopulationError::TooSmall {
                required: MIN_POPULATION,
                actual: target,
            });
        }

        let lost = self.config.cull_count(target);
        let remaining = target - lost;
        if remaining < 2 {
            return Err(PopulationError::InsufficientSurvivors {
                survivors: remaining,
            });
        }

        // Cull; the removed entries are held until the children are merged.
        let mut culled = Vec::with_capacity(lost);
        while self.members.len() > remaining {
            match self.members.pop_first() {
                Some(entry) => culled.push(entry),
                None => break,
            }
        }

        // Mutate survivors; stored fitness is left as is.
        let deviation = self.config.mutation_deviation;
        let mut mutated = 0;
        for organism in self.members.values_mut() {
            if mutation_event(deviation, &mut self.rng) {
                organism.mutate(deviation, &mut self.rng);
                mutated += 1;
            }
        }

        // Breed and evaluate; children stay staged until every round succeeded.
        let parents: Vec<RankKey<E::Fitness>> = self.members.keys().copied().collect();
        let mut staged: Vec<FitnessRecord<O, E::Fitness>> = Vec::with_capacity(lost);
        let mut redraws = 0;
        let mut rounds = 0;
        while remaining + staged.len() < target {
            let needed = target - remaining - staged.len();
            let (children, round_redraws) = self.breed(&parents, needed);
            redraws += round_redraws;
            rounds += 1;
            match self.evaluate(children) {
                Ok(records) => staged.extend(records),
                Err(err) => {
                    self.members.extend(culled);
                    return Err(err);
                }
            }
        }
        let culled: Vec<E::Fitness> = culled.into_iter().map(|(key, _)| key.fitness()).collect();

        // Merge
        let children = staged.len();
        self.merge(staged);
        self.generation += 1;

        debug!(
            "generation {}: culled {}, mutated {mutated}, bred {children} in {rounds} round(s), {redraws} redraw(s), best {:?}",
            self.generation,
            culled.len(),
            self.best_fitness()
        );

        Ok(GenerationReport {
            generation: self.generation,
            culled,
            mutated,
            children,
            redraws,
            rounds,
        })
    }

    /// Returns the organism with the highest stored fitness.
    pub fn winner(&self) -> Option<&O> {
        self.members.last_key_value().map(|(_, organism)| organism)
    }

    /// Returns the highest stored fitness.
    pub fn best_fitness(&self) -> Option<E::Fitness> {
        self.members.last_key_value().map(|(key, _)| key.fitness())
    }

    /// Number of completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the population has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether an earlier failure made the population unusable.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// The population's configuration.
    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }

    /// The worker pool used for evaluation.
    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    /// Iterates over members in ascending fitness order.
    pub fn members(&self) -> impl Iterator<Item = &O> + '_ {
        self.members.values()
    }

    /// Iterates over `(fitness, organism)` pairs in ascending fitness order.
    pub fn records(&self) -> impl Iterator<Item = (E::Fitness, &O)> + '_ {
        self.members
            .iter()
            .map(|(key, organism)| (key.fitness(), organism))
    }

    /// Best, worst and mean stored fitness. `None` when empty.
    pub fn stats(&self) -> Option<PopulationStats<E::Fitness>> {
        let (worst, _) = self.members.first_key_value()?;
        let (best, _) = self.members.last_key_value()?;
        let size = self.members.len();
        let sum: f64 = self.members.keys().map(|k| k.fitness().to_f64()).sum();
        Some(PopulationStats {
            best: best.fitness(),
            worst: worst.fitness(),
            mean: sum / size as f64,
            size,
        })
    }

    fn ensure_usable(&self) -> Result<(), PopulationError> {
        if self.poisoned {
            Err(PopulationError::Poisoned)
        } else {
            Ok(())
        }
    }

    /// Draws parent pairs uniformly from `parents` until `needed` children
    /// are queued. Returns the children and the number of self-mating draws.
    fn breed(&mut self, parents: &[RankKey<E::Fitness>], needed: usize) -> (Vec<O>, usize) {
        let crossover = self.config.crossover_percentage;
        let mut children = Vec::with_capacity(needed);
        let mut redraws = 0;
        while children.len() < needed {
            let i = self.rng.random_range(0..parents.len());
            let j = self.rng.random_range(0..parents.len());
            if i == j {
                redraws += 1;
                trace!("self-mating draw of parent {i}, redrawing");
                continue;
            }
            let first = &self.members[&parents[i]];
            let second = &self.members[&parents[j]];
            children.push(first.mate(second, crossover, &mut self.rng));
            if children.len() < needed {
                children.push(second.mate(first, crossover, &mut self.rng));
            }
        }
        (children, redraws)
    }

    /// Runs the batch barrier, poisoning the population on failure.
    fn evaluate(
        &mut self,
        organisms: Vec<O>,
    ) -> Result<Vec<FitnessRecord<O, E::Fitness>>, PopulationError> {
        let result = self.pool.evaluate_batch(organisms, &self.evaluator);
        if result.is_err() {
            self.poisoned = true;
        }
        result
    }

    fn merge(&mut self, records: Vec<FitnessRecord<O, E::Fitness>>) {
        for record in records {
            let (organism, fitness) = record.into_parts();
            let key = RankKey::new(fitness, self.next_sequence);
            self.next_sequence += 1;
            self.members.insert(key, organism);
        }
    }
}

impl<O, E> std::fmt::Debug for Population<O, E>
where
    O: Organism,
    E: FitnessEvaluator<O>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Population")
            .field("size", &self.members.len())
            .field("generation", &self.generation)
            .field("best", &self.best_fitness())
            .field("poisoned", &self.poisoned)
            .field("config", &self.config)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
