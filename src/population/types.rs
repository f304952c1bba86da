//! Core trait definitions for the evolution engine.
//!
//! [`Organism`] and [`FitnessEvaluator`] are the whole contract between the
//! generic engine and a domain: the engine never looks inside a genome, it
//! only asks organisms to mutate and mate, and asks the evaluator to score
//! them.

use rand::Rng;
use std::cmp::Ordering;
use std::marker::PhantomData;

/// Marker trait for fitness values.
///
/// Fitness must be cheaply copyable and totally ordered through
/// [`rank_cmp`](Fitness::rank_cmp). **Higher fitness is better.**
///
/// Built-in implementations exist for `f64`, `f32` and the common integer
/// types. Floats are ranked with IEEE total ordering so a `NaN` score can
/// never corrupt the ordered population.
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// Total comparison used to order the population.
    fn rank_cmp(&self, other: &Self) -> Ordering;

    /// Converts the fitness to `f64` for logging and statistics.
    fn to_f64(self) -> f64;
}

impl Fitness for f64 {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn to_f64(self) -> f64 {
        self
    }
}

impl Fitness for f32 {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

macro_rules! impl_integer_fitness {
    ($($t:ty),*) => {
        $(
            impl Fitness for $t {
                fn rank_cmp(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_integer_fitness!(i32, i64, u32, u64, usize);

/// A candidate solution in the population.
///
/// The engine treats organisms as opaque. It only needs two capabilities:
///
/// 1. **Mutation**: perturb the organism in place
/// 2. **Mating**: combine with a peer to produce one new organism
///
/// Mating is directional: `a.mate(&b, ..)` need not equal `b.mate(&a, ..)`,
/// and the engine calls both directions when it needs two children from one
/// pair.
///
/// Organisms are moved to worker threads for evaluation, hence `Send`.
///
/// # Implementing
///
/// ```
/// use rand::Rng;
/// use u_evolve::population::Organism;
///
/// struct Point(f64);
///
/// impl Organism for Point {
///     fn mutate<R: Rng>(&mut self, deviation: f64, rng: &mut R) {
///         self.0 += rng.random_range(-1.0..1.0) * deviation;
///     }
///
///     fn mate<R: Rng>(&self, peer: &Self, crossover: f64, rng: &mut R) -> Self {
///         if rng.random_bool(crossover) {
///             Point((self.0 + peer.0) / 2.0)
///         } else {
///             Point(self.0)
///         }
///     }
/// }
/// ```
pub trait Organism: Send {
    /// Mutates the organism in place.
    ///
    /// `deviation` is the population's configured mutation deviation; how it
    /// shapes the perturbation is up to the domain.
    fn mutate<R: Rng>(&mut self, deviation: f64, rng: &mut R);

    /// Produces one child combining `self` with `peer`.
    ///
    /// `crossover_percentage` is the population's configured crossover rate,
    /// typically the chance that genes are actually recombined rather than
    /// cloned from `self`.
    fn mate<R: Rng>(&self, peer: &Self, crossover_percentage: f64, rng: &mut R) -> Self;
}

/// Scores organisms.
///
/// Evaluation is expected to be deterministic and must not mutate the
/// organism. It runs on worker threads, hence `Sync`.
///
/// A failure is never interpreted as a bad score: it aborts the current
/// `seed`/`advance` call and poisons the population.
///
/// Closures become evaluators through [`from_fn`]:
///
/// ```
/// use u_evolve::population::{from_fn, FitnessEvaluator};
///
/// let evaluator = from_fn(|x: &f64| -> Result<f64, std::convert::Infallible> { Ok(-x * x) });
/// assert_eq!(evaluator.evaluate(&2.0).unwrap(), -4.0);
/// ```
pub trait FitnessEvaluator<O>: Send + Sync {
    /// The fitness type. Must implement [`Fitness`].
    type Fitness: Fitness;

    /// The failure type reported by [`evaluate`](FitnessEvaluator::evaluate).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Computes the fitness of `organism`.
    fn evaluate(&self, organism: &O) -> Result<Self::Fitness, Self::Error>;
}

/// Evaluator backed by a closure. Built with [`from_fn`].
pub struct FnEvaluator<Func, F, E> {
    func: Func,
    _marker: PhantomData<fn() -> (F, E)>,
}

/// Wraps `func` as a [`FitnessEvaluator`].
pub fn from_fn<O, F, E, Func>(func: Func) -> FnEvaluator<Func, F, E>
where
    Func: Fn(&O) -> Result<F, E> + Send + Sync,
{
    FnEvaluator {
        func,
        _marker: PhantomData,
    }
}

impl<O, F, E, Func> FitnessEvaluator<O> for FnEvaluator<Func, F, E>
where
    Func: Fn(&O) -> Result<F, E> + Send + Sync,
    F: Fitness,
    E: std::error::Error + Send + Sync + 'static,
{
    type Fitness = F;
    type Error = E;

    fn evaluate(&self, organism: &O) -> Result<F, E> {
        (self.func)(organism)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_rank_is_total() {
        assert_eq!(1.0f64.rank_cmp(&2.0), Ordering::Less);
        assert_eq!(f64::NAN.rank_cmp(&f64::NAN), Ordering::Equal);
        assert_eq!(f64::NAN.rank_cmp(&f64::INFINITY), Ordering::Greater);
        assert_eq!((-0.0f32).rank_cmp(&0.0), Ordering::Less);
    }

    #[test]
    fn test_integer_rank() {
        assert_eq!(3i64.rank_cmp(&-3), Ordering::Greater);
        assert_eq!(7usize.rank_cmp(&7), Ordering::Equal);
        assert!((42u32.to_f64() - 42.0).abs() < 1e-12);
    }

    #[test]
    fn test_closure_evaluator() {
        let evaluator = from_fn(|v: &Vec<i64>| -> Result<i64, std::fmt::Error> { Ok(v.iter().sum()) });
        assert_eq!(evaluator.evaluate(&vec![1, 2, 3]).unwrap(), 6);
    }
}
