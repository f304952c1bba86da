//! Fitness records and their ordering.
//!
//! A [`FitnessRecord`] couples an organism with the fitness computed for it
//! exactly once. Inside a population every record is keyed by a
//! [`RankKey`], which orders by fitness and breaks ties by insertion
//! sequence so the ordered container stays deterministic.

use super::types::{Fitness, FitnessEvaluator};
use crate::error::PopulationError;
use log::error;
use std::cmp::Ordering;

/// An organism paired with its evaluated fitness.
///
/// The fitness is fixed at construction and never recomputed, even if the
/// organism is later mutated in place.
#[derive(Debug, Clone)]
pub struct FitnessRecord<O, F> {
    organism: O,
    fitness: F,
}

impl<O, F: Fitness> FitnessRecord<O, F> {
    /// Runs `evaluator` once on `organism` and wraps the result.
    ///
    /// An evaluator failure is logged and returned as
    /// [`PopulationError::Evaluation`]; it is never turned into a score.
    pub fn evaluate<E>(organism: O, evaluator: &E) -> Result<Self, PopulationError>
    where
        E: FitnessEvaluator<O, Fitness = F> + ?Sized,
    {
        match evaluator.evaluate(&organism) {
            Ok(fitness) => Ok(Self { organism, fitness }),
            Err(err) => {
                error!("fitness evaluation failed: {err}");
                Err(PopulationError::Evaluation(Box::new(err)))
            }
        }
    }

    /// The evaluated fitness.
    pub fn fitness(&self) -> F {
        self.fitness
    }

    /// The wrapped organism.
    pub fn organism(&self) -> &O {
        &self.organism
    }

    /// Splits the record into organism and fitness.
    pub fn into_parts(self) -> (O, F) {
        (self.organism, self.fitness)
    }
}

/// Ordering key of a record inside a population.
///
/// Orders by fitness ([`Fitness::rank_cmp`]), then by insertion sequence.
/// Sequences are unique within a population, so two keys are equal only if
/// they name the same record.
#[derive(Debug, Clone, Copy)]
pub struct RankKey<F> {
    fitness: F,
    sequence: u64,
}

impl<F: Fitness> RankKey<F> {
    pub(crate) fn new(fitness: F, sequence: u64) -> Self {
        Self { fitness, sequence }
    }

    /// Fitness stored for the record.
    pub fn fitness(&self) -> F {
        self.fitness
    }

    /// Insertion sequence of the record.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl<F: Fitness> PartialEq for RankKey<F> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<F: Fitness> Eq for RankKey<F> {}

impl<F: Fitness> PartialOrd for RankKey<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<F: Fitness> Ord for RankKey<F> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fitness
            .rank_cmp(&other.fitness)
            .then(self.sequence.cmp(&other.sequence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::types::from_fn;
    use std::collections::BTreeSet;
    use std::fmt;

    #[derive(Debug)]
    struct Rejected;

    impl fmt::Display for Rejected {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "rejected")
        }
    }

    impl std::error::Error for Rejected {}

    #[test]
    fn test_evaluate_once() {
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let evaluator = from_fn(|x: &i64| -> Result<i64, Rejected> {
            calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(x * 2)
        });
        let record = FitnessRecord::evaluate(21i64, &evaluator).unwrap();
        assert_eq!(record.fitness(), 42);
        assert_eq!(*record.organism(), 21);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_evaluate_failure_is_not_a_score() {
        let evaluator = from_fn(|_: &i64| -> Result<f64, Rejected> { Err(Rejected) });
        let err = FitnessRecord::evaluate(1i64, &evaluator).unwrap_err();
        assert!(matches!(err, PopulationError::Evaluation(_)));
        assert_eq!(err.to_string(), "fitness evaluation failed: rejected");
    }

    #[test]
    fn test_rank_key_orders_by_fitness_then_sequence() {
        let mut keys = BTreeSet::new();
        keys.insert(RankKey::new(2.0, 0));
        keys.insert(RankKey::new(1.0, 1));
        keys.insert(RankKey::new(2.0, 2));
        keys.insert(RankKey::new(0.5, 3));

        let order: Vec<u64> = keys.iter().map(|k| k.sequence()).collect();
        assert_eq!(order, vec![3, 1, 0, 2]);
    }

    #[test]
    fn test_equal_fitness_distinct_records() {
        let a = RankKey::new(5i64, 0);
        let b = RankKey::new(5i64, 1);
        assert_ne!(a, b);
        assert!(a < b);
        assert_eq!(a, RankKey::new(5i64, 0));
    }
}
