use tracing::{debug, trace};

use crate::VergeParams;
use crate::fallback::FallbackSort;

use super::buffer::TempBuffer;
use super::{common, merge};

/// Vergesort over a slice: probes for long runs every `size / log2(size)` elements, sorts the
/// gaps between them with `fallback` and merges the resulting spans pairwise.
pub fn sort<T, F, Fb>(
    v: &mut [T],
    is_less: &mut F,
    fallback: &mut Fb,
    params: &VergeParams,
    buffer: &mut TempBuffer<T>,
) where
    F: FnMut(&T, &T) -> bool,
    Fb: FallbackSort + ?Sized,
{
    let size = v.len();
    if size < params.random_access_threshold {
        debug!(size, "small random-access input, using fallback");
        fallback.sort_by(v, is_less);
        return;
    }

    let limit = common::unstable_limit(size);
    debug!(size, limit, "random-access scan");

    // Ends of the sorted spans, in order; the first span starts at 0.
    let mut runs: Vec<usize> = Vec::new();
    let mut begin_unstable: Option<usize> = None;
    let mut current = 0;
    let mut next = 1;

    loop {
        let begin_range = current;
        if size - next <= limit {
            begin_unstable.get_or_insert(begin_range);
            break;
        }

        current += limit;
        next += limit;

        let descending = is_less(&v[next], &v[current]);
        let mut start = current;
        while start > begin_range && in_run(v, start - 1, descending, is_less) {
            start -= 1;
        }
        let mut end = next + 1;
        while end < size && in_run(v, end - 1, descending, is_less) {
            end += 1;
        }

        if end - start >= limit {
            trace!(start, end, descending, "run");
            if descending {
                v[start..end].reverse();
            }
            if start > begin_range && begin_unstable.is_none() {
                begin_unstable = Some(begin_range);
            }
            if let Some(b) = begin_unstable.take() {
                trace!(begin = b, end = start, "sorting unstable region");
                fallback.sort_by(&mut v[b..start], is_less);
                runs.push(start);
            }
            runs.push(end);
        } else {
            begin_unstable.get_or_insert(begin_range);
        }

        if end == size {
            break;
        }
        current = end;
        next = end + 1;
    }

    if let Some(b) = begin_unstable {
        trace!(begin = b, end = size, "sorting trailing unstable region");
        runs.push(size);
        fallback.sort_by(&mut v[b..], is_less);
    }
    debug_assert_eq!(runs.last(), Some(&size));
    debug_assert!(runs.windows(2).all(|w| w[0] < w[1]));

    if runs.len() < 2 {
        return;
    }
    debug!(spans = runs.len(), "merging spans");

    while runs.len() > 1 {
        let mut begin = 0;
        let mut write = 0;
        let mut read = 0;
        while read + 1 < runs.len() {
            let (middle, end) = (runs[read], runs[read + 1]);
            merge::merge(v, begin, middle, end, middle - begin, end - middle, is_less, buffer);
            runs[write] = end;
            write += 1;
            begin = end;
            read += 2;
        }
        if read < runs.len() {
            runs[write] = runs[read];
            write += 1;
        }
        runs.truncate(write);
    }
}

// Whether `v[at + 1]` continues a run of the given direction ending at `v[at]`.
#[inline]
fn in_run<T, F>(v: &[T], at: usize, descending: bool, is_less: &mut F) -> bool
where
    F: FnMut(&T, &T) -> bool,
{
    if descending {
        !is_less(&v[at], &v[at + 1])
    } else {
        !is_less(&v[at + 1], &v[at])
    }
}
