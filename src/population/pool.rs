//! Bounded worker pool for parallel fitness evaluation.
//!
//! [`WorkerPool`] owns a dedicated rayon thread pool. Its only operation,
//! [`evaluate_batch`](WorkerPool::evaluate_batch), is a fork/join batch
//! barrier: one task per organism, and the caller blocks until every task
//! has finished.

use super::config::PoolConfig;
use super::record::FitnessRecord;
use super::types::FitnessEvaluator;
use crate::error::PopulationError;
use log::{error, info};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Dedicated thread pool used to evaluate organisms.
///
/// A pool can be shared between several populations through an `Arc`; each
/// batch still blocks only its own caller.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    threads: usize,
}

impl WorkerPool {
    /// Builds a pool from `config`.
    pub fn new(config: &PoolConfig) -> Result<Self, PopulationError> {
        config.validate()?;
        let threads = config.resolved_threads();
        let prefix = config.thread_name_prefix.clone();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(move |i| format!("{prefix}-{i}"))
            .build()?;
        info!("started evaluation pool with {threads} worker threads");
        Ok(Self { pool, threads })
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Evaluates every organism in parallel and waits for all of them.
    ///
    /// Records come back in submission order. If any evaluation fails, or
    /// an evaluator panics, the whole batch fails and no record is
    /// returned. A panic is caught at the task boundary and reported as
    /// [`PopulationError::WorkerPanicked`].
    pub fn evaluate_batch<O, E>(
        &self,
        organisms: Vec<O>,
        evaluator: &E,
    ) -> Result<Vec<FitnessRecord<O, E::Fitness>>, PopulationError>
    where
        O: Send,
        E: FitnessEvaluator<O> + ?Sized,
    {
        if organisms.is_empty() {
            return Ok(Vec::new());
        }
        self.pool.install(|| {
            organisms
                .into_par_iter()
                .map(|organism| evaluate_guarded(organism, evaluator))
                .collect()
        })
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.threads)
            .finish()
    }
}

/// Evaluates one organism, turning an evaluator panic into
/// [`PopulationError::WorkerPanicked`].
pub(crate) fn evaluate_guarded<O, E>(
    organism: O,
    evaluator: &E,
) -> Result<FitnessRecord<O, E::Fitness>, PopulationError>
where
    E: FitnessEvaluator<O> + ?Sized,
{
    panic::catch_unwind(AssertUnwindSafe(|| FitnessRecord::evaluate(organism, evaluator)))
        .unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            error!("evaluation worker panicked: {message}");
            Err(PopulationError::WorkerPanicked(message))
        })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
