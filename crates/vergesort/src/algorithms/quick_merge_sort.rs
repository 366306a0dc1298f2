use crate::TUNED_PARAMS;
use crate::sequence::Sequence;

use super::buffer::TempBuffer;
use super::{common, merge};

/// Sorts the `len` elements of `[first, last)` with quicksort, switching to merge sort when the
/// partitions degrade. Only single steps are taken, so this works on any [`Sequence`].
pub fn sort<S, F>(
    seq: &mut S,
    first: S::Cursor,
    last: S::Cursor,
    len: usize,
    is_less: &mut F,
    buffer: &mut TempBuffer<S::Item>,
) where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> bool,
{
    if len < 2 {
        return;
    }
    let depth_limit = common::introsort_depth_limit(len) + 1;
    quick_merge_sort(seq, first, last, len, is_less, buffer, depth_limit);
}

#[allow(clippy::too_many_arguments)]
fn quick_merge_sort<S, F>(
    seq: &mut S,
    mut first: S::Cursor,
    mut last: S::Cursor,
    mut len: usize,
    is_less: &mut F,
    buffer: &mut TempBuffer<S::Item>,
    mut depth_limit: usize,
) where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> bool,
{
    while len > TUNED_PARAMS.insertion_threshold {
        if depth_limit == 0 {
            merge_sort(seq, first, len, is_less, buffer);
            return;
        }
        depth_limit -= 1;

        let middle = seq.advance(first, len / 2);
        let pivot = common::median3(&*seq, first, middle, seq.prev(last), is_less);
        seq.swap(first, pivot);
        let (split, left_len) = partition(seq, first, last, len, is_less);
        let right_len = len - left_len - 1;
        let right_first = seq.next(split);

        let unbalanced = left_len < (len / 8) || right_len < (len / 8);
        if unbalanced {
            if left_len < right_len {
                quick_merge_sort(seq, first, split, left_len, is_less, buffer, depth_limit);
                merge_sort(seq, right_first, right_len, is_less, buffer);
            } else {
                quick_merge_sort(seq, right_first, last, right_len, is_less, buffer, depth_limit);
                merge_sort(seq, first, left_len, is_less, buffer);
            }
            return;
        }

        if left_len < right_len {
            quick_merge_sort(seq, first, split, left_len, is_less, buffer, depth_limit);
            first = right_first;
            len = right_len;
        } else {
            quick_merge_sort(seq, right_first, last, right_len, is_less, buffer, depth_limit);
            last = split;
            len = left_len;
        }
    }

    common::insertion_sort(seq, first, last, is_less);
}

/// Partitions around the pivot stored at `first` and moves the pivot to its final place.
///
/// Returns the pivot's cursor and its offset from `first`; elements before it are not greater,
/// elements after it are not smaller.
fn partition<S, F>(
    seq: &mut S,
    first: S::Cursor,
    last: S::Cursor,
    len: usize,
    is_less: &mut F,
) -> (S::Cursor, usize)
where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> bool,
{
    let hi = len - 1;
    let (mut i, mut li) = (first, 0);
    let (mut j, mut lj) = (last, len);

    loop {
        loop {
            i = seq.next(i);
            li += 1;
            if li == hi || !is_less(seq.get(i), seq.get(first)) {
                break;
            }
        }
        loop {
            j = seq.prev(j);
            lj -= 1;
            if lj == 0 || !is_less(seq.get(first), seq.get(j)) {
                break;
            }
        }
        if li >= lj {
            break;
        }
        seq.swap(i, j);
    }

    seq.swap(first, j);
    (j, lj)
}

/// Top-down merge sort of the `len` elements at `first`; returns the position after them.
fn merge_sort<S, F>(
    seq: &mut S,
    first: S::Cursor,
    len: usize,
    is_less: &mut F,
    buffer: &mut TempBuffer<S::Item>,
) -> S::Cursor
where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> bool,
{
    if len <= TUNED_PARAMS.insertion_threshold {
        let last = seq.advance(first, len);
        common::insertion_sort(seq, first, last, is_less);
        return last;
    }

    let half = len / 2;
    let middle = merge_sort(seq, first, half, is_less, buffer);
    let last = merge_sort(seq, middle, len - half, is_less, buffer);
    merge::merge(seq, first, middle, last, half, len - half, is_less, buffer);
    last
}
