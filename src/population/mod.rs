//! Generational evolution of a fitness-ordered population.
//!
//! A domain plugs in by implementing [`Organism`] (mutate in place, mate with
//! a peer) and [`FitnessEvaluator`] (score an organism). The engine handles
//! everything else: elitist culling, survivor mutation, breeding, parallel
//! evaluation on a bounded [`WorkerPool`] and the ordered merge.
//!
//! # Core Traits
//!
//! - [`Organism`]: a candidate solution, opaque to the engine
//! - [`FitnessEvaluator`]: scores organisms; higher fitness is better
//! - [`Fitness`]: totally ordered score type
//!
//! # Key Types
//!
//! - [`PopulationConfig`]: mutation deviation, crossover and die-off rates
//! - [`Population`]: the ordered members and the generational step
//! - [`EvolutionRunner`]: repeats generations until a [`RunConfig`] limit
//!
//! # Generation
//!
//! 1. Cull `floor(size × die_off)` members, rounded down to an even count
//! 2. Mutate survivors whose [`mutation_event`] fires (fitness is not rescored)
//! 3. Breed children from random pairs of distinct survivors
//! 4. Evaluate children in parallel and merge them all at once
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - De Jong (2006), *Evolutionary Computation: A Unified Approach*

mod config;
mod mutation;
#[allow(clippy::module_inception)]
mod population;
mod pool;
mod record;
mod runner;
mod types;

pub use config::{PoolConfig, PopulationConfig, RunConfig};
pub use mutation::mutation_event;
pub use pool::WorkerPool;
pub use population::{GenerationReport, Population, PopulationStats, MIN_POPULATION};
pub use record::{FitnessRecord, RankKey};
pub use runner::{EvolutionResult, EvolutionRunner};
pub use types::{from_fn, Fitness, FitnessEvaluator, FnEvaluator, Organism};
