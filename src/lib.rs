//! Domain-agnostic generational evolution engine.
//!
//! Advances a population of candidate solutions ("organisms") across
//! generations:
//!
//! - **Culling**: the weakest members die off each generation (strict
//!   elitism, always an even count).
//! - **Mutation**: survivors are perturbed in place by a configurable trial.
//! - **Breeding**: random pairs of distinct survivors mate to refill the
//!   population.
//! - **Parallel evaluation**: new organisms are scored on a bounded worker
//!   pool behind a batch barrier, and merged all-or-nothing.
//!
//! # Architecture
//!
//! The engine never inspects a genome. Domains implement
//! [`population::Organism`] and [`population::FitnessEvaluator`]; genome
//! encodings, fitness landscapes and mutation distributions all live in
//! consumer crates.
//!
//! # Example
//!
//! ```
//! use rand::Rng;
//! use u_evolve::population::{from_fn, Organism, PoolConfig, Population, PopulationConfig};
//!
//! #[derive(Clone)]
//! struct Guess(f64);
//!
//! impl Organism for Guess {
//!     fn mutate<R: Rng>(&mut self, deviation: f64, rng: &mut R) {
//!         self.0 += rng.random_range(-1.0..1.0) * deviation;
//!     }
//!
//!     fn mate<R: Rng>(&self, peer: &Self, _crossover: f64, _rng: &mut R) -> Self {
//!         Guess((self.0 + peer.0) / 2.0)
//!     }
//! }
//!
//! let evaluator = from_fn(|g: &Guess| -> Result<f64, std::convert::Infallible> {
//!     Ok(-(g.0 - 3.0).abs())
//! });
//! let config = PopulationConfig::new(0.5, 0.9, 0.5)
//!     .with_seed(42)
//!     .with_pool(PoolConfig::default().with_num_threads(2));
//!
//! let mut population = Population::new(evaluator, config).unwrap();
//! population.seed((0..8).map(|i| Guess(i as f64))).unwrap();
//! population.advance().unwrap();
//!
//! assert_eq!(population.len(), 8);
//! assert_eq!(population.generation(), 1);
//! assert!(population.winner().is_some());
//! ```

pub mod error;
pub mod population;

pub use error::{ConfigError, PopulationError};
