use tracing::{debug, trace};

use crate::VergeParams;
use crate::sequence::Sequence;

use super::buffer::TempBuffer;
use super::{common, merge, quick_merge_sort, scan};

// Short runs collected since the last long one, not sorted yet.
struct Pending<C> {
    begin: C,
    // Distance from the start of the sequence to `begin`.
    offset: usize,
    len: usize,
}

/// Vergesort over single steps: runs are scanned one after the other and each long run is merged
/// into the sorted prefix as soon as it is found.
pub fn sort<S, F>(
    seq: &mut S,
    is_less: &mut F,
    params: &VergeParams,
    buffer: &mut TempBuffer<S::Item>,
) where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> bool,
{
    let size = seq.len();
    let (first, last) = (seq.begin(), seq.end());

    if size < params.single_step_threshold {
        debug!(size, "small single-step input, using quick merge sort");
        quick_merge_sort::sort(seq, first, last, size, is_less, buffer);
        return;
    }

    let limit = common::unstable_limit(size);
    let (mut next, sorted) = common::is_sorted_until(&*seq, first, last, is_less);
    if next == last {
        debug!(size, "input already sorted");
        return;
    }
    debug!(size, limit, sorted, "single-step scan");

    // The first run starts at the last element of the sorted prefix.
    let mut current = seq.prev(next);
    let mut pos = sorted - 1;
    let mut pending: Option<Pending<S::Cursor>> = None;

    loop {
        let begin_rng = current;
        let run = scan::next_run(&*seq, current, next, last, is_less);
        trace!(pos, len = run.len, descending = run.descending, "run");

        if run.len > limit {
            if run.descending {
                common::reverse(seq, begin_rng, run.next, run.len);
            }
            match pending.take() {
                Some(p) => {
                    trace!(offset = p.offset, len = p.len, "flushing unstable region");
                    quick_merge_sort::sort(seq, p.begin, begin_rng, p.len, is_less, buffer);
                    merge::merge(seq, p.begin, begin_rng, run.next, p.len, run.len, is_less, buffer);
                    merge::merge(
                        seq,
                        first,
                        p.begin,
                        run.next,
                        p.offset,
                        p.len + run.len,
                        is_less,
                        buffer,
                    );
                }
                None => {
                    merge::merge(seq, first, begin_rng, run.next, pos, run.len, is_less, buffer);
                }
            }
        } else {
            let p = pending.get_or_insert(Pending {
                begin: begin_rng,
                offset: pos,
                len: 0,
            });
            p.len += run.len;
        }

        pos += run.len;
        if run.next == last {
            break;
        }
        current = run.next;
        next = seq.next(current);
    }
    debug_assert_eq!(pos, size);

    if let Some(p) = pending {
        trace!(offset = p.offset, len = p.len, "flushing trailing unstable region");
        quick_merge_sort::sort(seq, p.begin, last, p.len, is_less, buffer);
        merge::merge(seq, first, p.begin, last, p.offset, p.len, is_less, buffer);
    }
}
