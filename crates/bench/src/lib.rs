use std::time::Duration;

use criterion::BenchmarkGroup;
use criterion::measurement::Measurement;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SMALL_RUNTIME_SAMPLE_SIZE: usize = 15;
const SMALL_RUNTIME_WARM_UP_MS: u64 = 100;
const SMALL_RUNTIME_MEASURE_MS: u64 = 200;
const MEDIUM_RUNTIME_SAMPLE_SIZE: usize = 15;
const MEDIUM_RUNTIME_WARM_UP_MS: u64 = 500;
const MEDIUM_RUNTIME_MEASURE_MS: u64 = 1000;
const LARGE_RUNTIME_SAMPLE_SIZE: usize = 10;
const LARGE_RUNTIME_WARM_UP_MS: u64 = 800;
const LARGE_RUNTIME_MEASURE_MS: u64 = 1500;
const RNG_SEED: u64 = 0x5EED_2026;

pub fn apply_small_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(SMALL_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(SMALL_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(SMALL_RUNTIME_MEASURE_MS));
}

pub fn apply_medium_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(MEDIUM_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(MEDIUM_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(MEDIUM_RUNTIME_MEASURE_MS));
}

pub fn apply_large_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(LARGE_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(LARGE_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(LARGE_RUNTIME_MEASURE_MS));
}

pub fn default_rng() -> StdRng {
    StdRng::seed_from_u64(RNG_SEED)
}

/// Input shapes with different amounts of existing order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pattern {
    Random,
    Ascending,
    Descending,
    /// Ascending with about 1% of the positions overwritten by random values.
    AscendingWithNoise,
    /// Ascending runs of the given length, each one starting below the previous.
    Sawtooth(usize),
    /// Alternating ascending and descending blocks of the given length.
    Zigzag(usize),
}

impl Pattern {
    pub fn label(self) -> String {
        match self {
            Self::Random => "random".to_owned(),
            Self::Ascending => "ascending".to_owned(),
            Self::Descending => "descending".to_owned(),
            Self::AscendingWithNoise => "ascending_with_noise".to_owned(),
            Self::Sawtooth(run) => format!("sawtooth_{run}"),
            Self::Zigzag(block) => format!("zigzag_{block}"),
        }
    }
}

pub fn generate<R: Rng + ?Sized>(rng: &mut R, pattern: Pattern, len: usize) -> Vec<u64> {
    match pattern {
        Pattern::Random => (0..len).map(|_| rng.random::<u64>()).collect(),
        Pattern::Ascending => (0..len as u64).collect(),
        Pattern::Descending => (0..len as u64).rev().collect(),
        Pattern::AscendingWithNoise => {
            let mut data: Vec<u64> = (0..len as u64).collect();
            if len > 0 {
                for _ in 0..(len / 100).max(1) {
                    let at = rng.random_range(0..len);
                    data[at] = rng.random_range(0..len as u64);
                }
            }
            data
        }
        Pattern::Sawtooth(run) => {
            let run = run.max(1);
            (0..len)
                .map(|i| ((len / run - i / run) * run + i % run) as u64)
                .collect()
        }
        Pattern::Zigzag(block) => {
            let mut data: Vec<u64> = (0..len as u64).collect();
            for chunk in data.chunks_mut(block.max(1)).skip(1).step_by(2) {
                chunk.reverse();
            }
            data
        }
    }
}
