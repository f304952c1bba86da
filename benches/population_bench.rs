//! Criterion benchmarks for u-evolve.
//!
//! Uses a synthetic sphere problem to measure the overhead of one
//! generational step independent of any domain.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::convert::Infallible;
use u_evolve::population::{
    from_fn, FitnessEvaluator, Organism, PoolConfig, Population, PopulationConfig,
};

// ===========================================================================
// Sphere function: maximize -sum(x_i^2)
// ===========================================================================

#[derive(Clone)]
struct SphereOrganism {
    genes: Vec<f64>,
}

impl Organism for SphereOrganism {
    fn mutate<R: Rng>(&mut self, deviation: f64, rng: &mut R) {
        let i = rng.random_range(0..self.genes.len());
        self.genes[i] += rng.random_range(-0.5..0.5) * deviation;
    }

    fn mate<R: Rng>(&self, peer: &Self, crossover: f64, rng: &mut R) -> Self {
        let mut child = self.clone();
        if rng.random_bool(crossover) {
            let point = rng.random_range(0..self.genes.len());
            child.genes[point..].copy_from_slice(&peer.genes[point..]);
        }
        child
    }
}

fn sphere(o: &SphereOrganism) -> Result<f64, Infallible> {
    Ok(-o.genes.iter().map(|x| x * x).sum::<f64>())
}

fn seeded(
    size: usize,
    dim: usize,
    threads: usize,
) -> Population<SphereOrganism, impl FitnessEvaluator<SphereOrganism, Fitness = f64>> {
    let config = PopulationConfig::new(0.5, 0.9, 0.5)
        .with_seed(42)
        .with_pool(PoolConfig::default().with_num_threads(threads));
    let mut population = Population::new(from_fn(sphere), config).expect("valid config");
    let mut rng = StdRng::seed_from_u64(7);
    let organisms: Vec<SphereOrganism> = (0..size)
        .map(|_| SphereOrganism {
            genes: (0..dim).map(|_| rng.random_range(-5.0..5.0)).collect(),
        })
        .collect();
    population.seed(organisms).expect("seeding succeeds");
    population
}

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("population_advance");
    group.sample_size(20);

    for &size in &[50usize, 200, 1000] {
        group.bench_with_input(BenchmarkId::new("sphere_10d", size), &size, |b, &size| {
            let mut population = seeded(size, 10, 4);
            b.iter(|| {
                let report = population.advance().expect("advance succeeds");
                black_box(report.children)
            });
        });
    }

    group.finish();
}

fn bench_seed(c: &mut Criterion) {
    let mut group = c.benchmark_group("population_seed");
    group.sample_size(20);

    for &threads in &[1usize, 4] {
        group.bench_with_input(BenchmarkId::new("threads", threads), &threads, |b, &threads| {
            b.iter(|| black_box(seeded(500, 30, threads).len()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_advance, bench_seed);
criterion_main!(benches);
