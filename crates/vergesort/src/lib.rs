mod algorithms;
mod fallback;
pub mod sequence;

use std::cmp::Ordering;

use thiserror::Error;
use tracing::debug;

use algorithms::buffer::TempBuffer;
use algorithms::{bidirectional, random_access};

pub use algorithms::buffer::BufferPolicy;
pub use fallback::{FallbackSort, HeapSort, Pdqsort, QuickMergeSort, StdStable, StdUnstable};
pub use sequence::{ListCursor, Sequence, StepList, Stepwise, Traversal};

#[derive(Clone, Copy, Debug)]
pub struct TunedParams {
    pub insertion_threshold: usize,
    pub introsort_depth_factor_num: usize,
    pub introsort_depth_factor_den: usize,
}

pub const TUNED_PARAMS: TunedParams = TunedParams {
    insertion_threshold: 24,
    introsort_depth_factor_num: 5,
    introsort_depth_factor_den: 2,
};

/// Per-call parameters of [`Vergesort`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct VergeParams {
    /// Single-step inputs shorter than this go straight to quick merge sort.
    pub single_step_threshold: usize,
    /// Random-access inputs shorter than this go straight to the fallback.
    pub random_access_threshold: usize,
    pub buffer: BufferPolicy,
}

impl VergeParams {
    pub const DEFAULT: Self = Self {
        single_step_threshold: 80,
        random_access_threshold: 128,
        buffer: BufferPolicy::Unbounded,
    };

    const MIN_THRESHOLD: usize = 2;

    pub fn validate(&self) -> Result<(), ParamsError> {
        let thresholds = [
            ("single_step_threshold", self.single_step_threshold),
            ("random_access_threshold", self.random_access_threshold),
        ];
        for (name, value) in thresholds {
            if value < Self::MIN_THRESHOLD {
                return Err(ParamsError::ThresholdTooSmall {
                    name,
                    value,
                    min: Self::MIN_THRESHOLD,
                });
            }
        }
        Ok(())
    }
}

impl Default for VergeParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum ParamsError {
    #[error("{name} must be at least {min}, got {value}")]
    ThresholdTooSmall {
        name: &'static str,
        value: usize,
        min: usize,
    },
}

/// Adaptive sorter that merges the long runs already present in the input.
///
/// Random-access sequences are probed every `len / log2(len)` elements and the spans between
/// long runs are handed to `Fb`; single-step sequences are scanned run by run. Neither path is
/// stable.
#[derive(Clone, Debug, Default)]
pub struct Vergesort<Fb = Pdqsort> {
    params: VergeParams,
    fallback: Fb,
}

impl Vergesort {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<Fb: FallbackSort> Vergesort<Fb> {
    pub fn with_params(self, params: VergeParams) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self { params, ..self })
    }

    pub fn with_fallback<G: FallbackSort>(self, fallback: G) -> Vergesort<G> {
        Vergesort {
            params: self.params,
            fallback,
        }
    }

    pub fn with_buffer_policy(mut self, buffer: BufferPolicy) -> Self {
        self.params.buffer = buffer;
        self
    }

    pub fn params(&self) -> &VergeParams {
        &self.params
    }

    pub fn sort<S>(&mut self, seq: &mut S)
    where
        S: Sequence + ?Sized,
        S::Item: Ord,
    {
        self.sort_with(seq, &mut |a: &S::Item, b: &S::Item| a.lt(b));
    }

    pub fn sort_by<S, C>(&mut self, seq: &mut S, mut compare: C)
    where
        S: Sequence + ?Sized,
        C: FnMut(&S::Item, &S::Item) -> Ordering,
    {
        self.sort_with(seq, &mut |a: &S::Item, b: &S::Item| {
            compare(a, b) == Ordering::Less
        });
    }

    pub fn sort_by_key<S, K, P>(&mut self, seq: &mut S, mut key: P)
    where
        S: Sequence + ?Sized,
        K: Ord,
        P: FnMut(&S::Item) -> K,
    {
        self.sort_with(seq, &mut |a: &S::Item, b: &S::Item| key(a).lt(&key(b)));
    }

    /// Sorts by `compare` applied to `projection` of each element. Every comparison goes through
    /// the projection.
    pub fn sort_by_projection<S, K, P, C>(&mut self, seq: &mut S, mut projection: P, mut compare: C)
    where
        S: Sequence + ?Sized,
        P: FnMut(&S::Item) -> K,
        C: FnMut(&K, &K) -> Ordering,
    {
        self.sort_with(seq, &mut |a: &S::Item, b: &S::Item| {
            compare(&projection(a), &projection(b)) == Ordering::Less
        });
    }

    fn sort_with<S, F>(&mut self, seq: &mut S, is_less: &mut F)
    where
        S: Sequence + ?Sized,
        F: FnMut(&S::Item, &S::Item) -> bool,
    {
        debug!(len = seq.len(), traversal = ?S::TRAVERSAL, "vergesort");
        let mut buffer = TempBuffer::new(self.params.buffer);

        if S::TRAVERSAL == Traversal::RandomAccess {
            if let Some(v) = seq.as_contiguous_mut() {
                random_access::sort(v, is_less, &mut self.fallback, &self.params, &mut buffer);
                return;
            }
        }
        bidirectional::sort(seq, is_less, &self.params, &mut buffer);
    }
}

pub fn vergesort<S>(seq: &mut S)
where
    S: Sequence + ?Sized,
    S::Item: Ord,
{
    Vergesort::new().sort(seq);
}

pub fn vergesort_by<S, C>(seq: &mut S, compare: C)
where
    S: Sequence + ?Sized,
    C: FnMut(&S::Item, &S::Item) -> Ordering,
{
    Vergesort::new().sort_by(seq, compare);
}

pub fn vergesort_by_key<S, K, P>(seq: &mut S, key: P)
where
    S: Sequence + ?Sized,
    K: Ord,
    P: FnMut(&S::Item) -> K,
{
    Vergesort::new().sort_by_key(seq, key);
}

pub fn vergesort_by_projection<S, K, P, C>(seq: &mut S, projection: P, compare: C)
where
    S: Sequence + ?Sized,
    P: FnMut(&S::Item) -> K,
    C: FnMut(&K, &K) -> Ordering,
{
    Vergesort::new().sort_by_projection(seq, projection, compare);
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::panic::{self, AssertUnwindSafe};

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    enum View {
        Slice,
        Stepwise,
        List,
    }

    const VIEWS: [View; 3] = [View::Slice, View::Stepwise, View::List];

    fn sort_through<T: Clone, Fb: FallbackSort>(
        sorter: &mut Vergesort<Fb>,
        view: View,
        data: &[T],
        is_less: &mut dyn FnMut(&T, &T) -> bool,
    ) -> Vec<T> {
        let mut compare = |a: &T, b: &T| {
            if is_less(a, b) {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        };
        match view {
            View::Slice => {
                let mut v = data.to_vec();
                sorter.sort_by(&mut v[..], &mut compare);
                v
            }
            View::Stepwise => {
                let mut v = data.to_vec();
                sorter.sort_by(&mut Stepwise::new(&mut v), &mut compare);
                v
            }
            View::List => {
                let mut list: StepList<T> = data.iter().cloned().collect();
                sorter.sort_by(&mut list, &mut compare);
                list.into_vec()
            }
        }
    }

    fn sort_counting(view: View, data: &[u64]) -> (Vec<u64>, usize) {
        let mut comparisons = 0;
        let sorted = sort_through(&mut Vergesort::new(), view, data, &mut |a: &u64, b: &u64| {
            comparisons += 1;
            a < b
        });
        (sorted, comparisons)
    }

    fn assert_sorts_like_std(data: &[u64]) {
        let mut expected = data.to_vec();
        expected.sort_unstable();
        for view in VIEWS {
            let (actual, _) = sort_counting(view, data);
            assert_eq!(actual, expected, "view={view:?} input_len={}", data.len());
        }
    }

    #[derive(Default)]
    struct Recording {
        calls: usize,
        elements: usize,
    }

    impl FallbackSort for Recording {
        fn sort_by<T, F>(&mut self, v: &mut [T], is_less: &mut F)
        where
            F: FnMut(&T, &T) -> bool,
        {
            self.calls += 1;
            self.elements += v.len();
            Pdqsort.sort_by(v, is_less);
        }
    }

    fn sawtooth(len: usize, run: usize) -> Vec<u64> {
        (0..len)
            .map(|i| ((len / run - i / run) * run * 10 + i % run) as u64)
            .collect()
    }

    #[test]
    fn edge_cases() {
        let cases = [
            vec![],
            vec![42],
            vec![1, 2, 3, 4, 5, 6],
            vec![6, 5, 4, 3, 2, 1],
            vec![7; 128],
            vec![7; 300],
            vec![u64::MIN, 1, u64::MAX, 0, u64::MAX - 1, 2],
            vec![5, 5, 3, 3, 1, 1, 4, 4, 2, 2, 0, 0],
        ];

        for case in &cases {
            assert_sorts_like_std(case);
        }
    }

    #[test]
    fn fixed_seed_random_cases() {
        let mut rng = StdRng::seed_from_u64(0x5EED_2026);
        for &size in &[2_usize, 3, 31, 79, 80, 81, 127, 128, 129, 511, 2048] {
            let data: Vec<u64> = (0..size).map(|_| rng.random::<u64>()).collect();
            assert_sorts_like_std(&data);
        }
    }

    #[test]
    fn fixed_seed_many_duplicates() {
        let mut rng = StdRng::seed_from_u64(0xD0D1_2026);
        for &size in &[64_usize, 1024, 4096] {
            let data: Vec<u64> = (0..size).map(|_| (rng.random::<u64>() % 16) * 17).collect();
            assert_sorts_like_std(&data);
        }
    }

    #[test]
    fn runs_with_noise() {
        let mut rng = StdRng::seed_from_u64(0x5EED_2026);
        for &size in &[200_usize, 1000, 5000] {
            let mut data: Vec<u64> = (0..size as u64).collect();
            for chunk in data.chunks_mut(size / 5).skip(1).step_by(2) {
                chunk.reverse();
            }
            for _ in 0..size / 50 {
                let at = rng.random_range(0..size);
                data[at] = rng.random_range(0..size as u64);
            }
            assert_sorts_like_std(&data);
        }
    }

    #[test]
    fn sorted_input_is_left_untouched() {
        let data: Vec<u64> = (0..1000).map(|i| i * 3).collect();
        for view in VIEWS {
            let (actual, comparisons) = sort_counting(view, &data);
            assert_eq!(actual, data, "view={view:?}");
            assert_eq!(comparisons, data.len() - 1, "view={view:?}");
        }
    }

    #[test]
    fn descending_input_is_one_reversed_run() {
        let data: Vec<u64> = (0..1000).rev().collect();
        let expected: Vec<u64> = (0..1000).collect();
        let mut recording = Recording::default();
        let mut sorter = Vergesort::new().with_fallback(&mut recording);
        for view in VIEWS {
            let actual = sort_through(&mut sorter, view, &data, &mut |a: &u64, b: &u64| a < b);
            assert_eq!(actual, expected, "view={view:?}");
        }
        assert_eq!(recording.calls, 0);
    }

    #[test]
    fn single_step_threshold_boundary() {
        for (len, fast_path) in [(79_usize, false), (80, true)] {
            let data: Vec<u64> = (0..len as u64).collect();
            for view in [View::Stepwise, View::List] {
                let (actual, comparisons) = sort_counting(view, &data);
                assert_eq!(actual, data);
                assert_eq!(comparisons == len - 1, fast_path, "len={len} view={view:?}");
            }
        }
    }

    #[test]
    fn random_access_threshold_boundary() {
        for (len, calls) in [(127_usize, 1), (128, 0)] {
            let mut data: Vec<u64> = (0..len as u64).collect();
            let mut recording = Recording::default();
            Vergesort::new()
                .with_fallback(&mut recording)
                .sort(&mut data[..]);
            assert_eq!(recording.calls, calls, "len={len}");
            assert_eq!(data, (0..len as u64).collect::<Vec<_>>());
        }
    }

    #[test]
    fn sawtooth_goes_through_the_unstable_region() {
        let data = sawtooth(500, 3);
        let mut expected = data.clone();
        expected.sort_unstable();

        let mut recording = Recording::default();
        let mut sorter = Vergesort::new().with_fallback(&mut recording);
        for view in VIEWS {
            let actual = sort_through(&mut sorter, view, &data, &mut |a: &u64, b: &u64| a < b);
            assert_eq!(actual, expected, "view={view:?}");
        }
        assert_eq!((recording.calls, recording.elements), (1, 500));
    }

    #[test]
    fn projection_is_applied_to_every_comparison() {
        let mut rng = StdRng::seed_from_u64(0xD0D1_2026);
        let data: Vec<(u32, u32)> = (0..600)
            .map(|i| (i, rng.random_range(0..50)))
            .collect();
        let mut expected = data.clone();
        expected.sort_by_key(|p| p.1);

        let mut v = data.clone();
        vergesort_by_projection(&mut v, |p: &(u32, u32)| p.1, |a: &u32, b: &u32| a.cmp(b));
        let mut list: StepList<(u32, u32)> = data.iter().copied().collect();
        vergesort_by_key(&mut list, |p: &(u32, u32)| p.1);

        for actual in [v, list.into_vec()] {
            let keys: Vec<u32> = actual.iter().map(|p| p.1).collect();
            let expected_keys: Vec<u32> = expected.iter().map(|p| p.1).collect();
            assert_eq!(keys, expected_keys);

            let mut all = actual;
            all.sort_unstable();
            let mut original = data.clone();
            original.sort_unstable();
            assert_eq!(all, original);
        }
    }

    #[test]
    fn reverse_order_through_sort_by() {
        let mut data: Vec<i32> = (0..300).collect();
        vergesort_by(&mut data, |a: &i32, b: &i32| b.cmp(a));
        assert_eq!(data, (0..300).rev().collect::<Vec<_>>());
    }

    #[test]
    fn degrades_without_temporary_memory() {
        let mut rng = StdRng::seed_from_u64(0x5EED_2026);
        let mut data: Vec<u64> = (0..3000).collect();
        for chunk in data.chunks_mut(400).step_by(2) {
            chunk.reverse();
        }
        for _ in 0..60 {
            let at = rng.random_range(0..data.len());
            data[at] = rng.random_range(0..3000);
        }
        let mut expected = data.clone();
        expected.sort_unstable();

        for policy in [BufferPolicy::Disabled, BufferPolicy::Capped(1), BufferPolicy::Capped(16)] {
            let mut sorter = Vergesort::new().with_buffer_policy(policy);
            for view in VIEWS {
                let actual = sort_through(&mut sorter, view, &data, &mut |a: &u64, b: &u64| a < b);
                assert_eq!(actual, expected, "policy={policy:?} view={view:?}");
            }
        }
    }

    #[test]
    fn every_fallback_plugs_in() {
        let mut rng = StdRng::seed_from_u64(0xD0D1_2026);
        let data: Vec<u64> = (0..2000)
            .map(|i| if i % 500 < 250 { i } else { rng.random_range(0..2000) })
            .collect();
        let mut expected = data.clone();
        expected.sort_unstable();

        fn check<Fb: FallbackSort>(fallback: Fb, data: &[u64], expected: &[u64]) {
            let mut sorter = Vergesort::new().with_fallback(fallback);
            let actual = sort_through(&mut sorter, View::Slice, data, &mut |a: &u64, b: &u64| a < b);
            assert_eq!(actual, expected);
        }

        check(Pdqsort, &data, &expected);
        check(HeapSort, &data, &expected);
        check(QuickMergeSort::default(), &data, &expected);
        check(
            QuickMergeSort {
                buffer: BufferPolicy::Disabled,
            },
            &data,
            &expected,
        );
        check(StdUnstable, &data, &expected);
        check(StdStable, &data, &expected);
    }

    #[test]
    fn sorts_vec_and_wrapped_deque() {
        let mut v = vec![5, 3, 9, 1, 1, 0];
        vergesort(&mut v);
        assert_eq!(v, vec![0, 1, 1, 3, 5, 9]);

        let mut deque: VecDeque<u64> = VecDeque::with_capacity(400);
        for i in 0..200 {
            deque.push_back(i);
            deque.push_front(1000 - i);
        }
        vergesort(&mut deque);
        let actual: Vec<u64> = deque.into_iter().collect();
        let mut expected: Vec<u64> = (0..200).chain(801..=1000).collect();
        expected.sort_unstable();
        assert_eq!(actual, expected);
    }

    #[test]
    fn panicking_comparison_keeps_every_element() {
        let mut rng = StdRng::seed_from_u64(0x5EED_2026);
        let mut original: Vec<String> = (0..600).map(|i| format!("{:05}", i)).collect();
        for chunk in original.chunks_mut(150).skip(1).step_by(2) {
            chunk.reverse();
        }
        for _ in 0..40 {
            let (a, b) = (rng.random_range(0..600), rng.random_range(0..600));
            original.swap(a, b);
        }
        let mut expected = original.clone();
        expected.sort();

        for view in VIEWS {
            for panic_at in [0_usize, 10, 300, 900] {
                let comparisons = Cell::new(0_usize);
                let is_less = |a: &String, b: &String| {
                    if comparisons.get() == panic_at {
                        panic!("comparison {panic_at}");
                    }
                    comparisons.set(comparisons.get() + 1);
                    a < b
                };

                let mut v = original.clone();
                let mut list: StepList<String> = original.iter().cloned().collect();
                let res = panic::catch_unwind(AssertUnwindSafe(|| {
                    let mut compare = |a: &String, b: &String| {
                        if is_less(a, b) { Ordering::Less } else { Ordering::Greater }
                    };
                    match view {
                        View::Slice => vergesort_by(&mut v[..], &mut compare),
                        View::Stepwise => vergesort_by(&mut Stepwise::new(&mut v), &mut compare),
                        View::List => vergesort_by(&mut list, &mut compare),
                    }
                }));
                assert!(res.is_err(), "view={view:?} panic_at={panic_at}");

                let mut after = if view == View::List { list.into_vec() } else { v };
                after.sort();
                assert_eq!(after, expected, "view={view:?} panic_at={panic_at}");
            }
        }
    }

    #[test]
    fn params_are_validated() {
        let params = VergeParams {
            single_step_threshold: 1,
            ..VergeParams::DEFAULT
        };
        let err = Vergesort::new().with_params(params).unwrap_err();
        assert_eq!(
            err,
            ParamsError::ThresholdTooSmall {
                name: "single_step_threshold",
                value: 1,
                min: 2
            }
        );
        assert_eq!(err.to_string(), "single_step_threshold must be at least 2, got 1");

        let params = VergeParams {
            random_access_threshold: 0,
            ..VergeParams::DEFAULT
        };
        assert!(Vergesort::new().with_params(params).is_err());

        let sorter = Vergesort::new()
            .with_params(VergeParams {
                single_step_threshold: 2,
                random_access_threshold: 2,
                buffer: BufferPolicy::Capped(4),
            })
            .unwrap();
        assert_eq!(sorter.params().buffer, BufferPolicy::Capped(4));
        assert_eq!(VergeParams::default(), VergeParams::DEFAULT);
    }

    #[test]
    fn lowest_thresholds_still_sort() {
        let mut rng = StdRng::seed_from_u64(0xD0D1_2026);
        let mut sorter = Vergesort::new()
            .with_params(VergeParams {
                single_step_threshold: 2,
                random_access_threshold: 2,
                buffer: BufferPolicy::Unbounded,
            })
            .unwrap();
        for &size in &[2_usize, 3, 4, 5, 9, 17, 100] {
            let data: Vec<u64> = (0..size).map(|_| rng.random_range(0..10)).collect();
            let mut expected = data.clone();
            expected.sort_unstable();
            for view in VIEWS {
                let actual = sort_through(&mut sorter, view, &data, &mut |a: &u64, b: &u64| a < b);
                assert_eq!(actual, expected, "size={size} view={view:?}");
            }
        }
    }
}
