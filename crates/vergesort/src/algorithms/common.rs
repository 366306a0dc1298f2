use crate::TUNED_PARAMS;
use crate::sequence::Sequence;

#[inline]
pub fn floor_log2(n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        usize::BITS as usize - 1 - n.leading_zeros() as usize
    }
}

/// Runs shorter than or equal to this are not worth isolating: `size / log2(size)`.
#[inline]
pub fn unstable_limit(size: usize) -> usize {
    debug_assert!(size >= 2);
    size / floor_log2(size)
}

#[inline]
pub fn introsort_depth_limit(n: usize) -> usize {
    let log = floor_log2(n);
    (log * TUNED_PARAMS.introsort_depth_factor_num) / TUNED_PARAMS.introsort_depth_factor_den
}

/// Sorts `[first, last)` by sinking each element towards the front.
pub fn insertion_sort<S, F>(seq: &mut S, first: S::Cursor, last: S::Cursor, is_less: &mut F)
where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> bool,
{
    if first == last {
        return;
    }

    let mut i = seq.next(first);
    while i != last {
        let mut j = i;
        while j != first {
            let p = seq.prev(j);
            if !is_less(seq.get(j), seq.get(p)) {
                break;
            }
            seq.swap(j, p);
            j = p;
        }
        i = seq.next(i);
    }
}

/// Returns the end of the longest non-decreasing prefix of `[first, last)` and its length.
pub fn is_sorted_until<S, F>(
    seq: &S,
    first: S::Cursor,
    last: S::Cursor,
    is_less: &mut F,
) -> (S::Cursor, usize)
where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> bool,
{
    if first == last {
        return (last, 0);
    }

    let mut count = 1;
    let mut prev = first;
    let mut next = seq.next(first);
    while next != last {
        if is_less(seq.get(next), seq.get(prev)) {
            break;
        }
        prev = next;
        next = seq.next(next);
        count += 1;
    }
    (next, count)
}

/// Reverses the `len` elements starting at `first`; `last` is the position after them.
pub fn reverse<S>(seq: &mut S, mut first: S::Cursor, mut last: S::Cursor, len: usize)
where
    S: Sequence + ?Sized,
{
    for _ in 0..len / 2 {
        last = seq.prev(last);
        seq.swap(first, last);
        first = seq.next(first);
    }
}

/// Rotates `[first, middle, last)` so the right part comes first; returns the new middle.
pub fn rotate<S>(
    seq: &mut S,
    first: S::Cursor,
    middle: S::Cursor,
    last: S::Cursor,
    left_len: usize,
    right_len: usize,
) -> S::Cursor
where
    S: Sequence + ?Sized,
{
    if left_len == 0 {
        return last;
    }
    if right_len == 0 {
        return first;
    }

    reverse(seq, first, middle, left_len);
    reverse(seq, middle, last, right_len);
    reverse(seq, first, last, left_len + right_len);
    seq.advance(first, right_len)
}

/// First position in the sorted `len` elements at `first` whose element is not less than
/// `value`, with its offset from `first`.
pub fn lower_bound<S, F>(
    seq: &S,
    mut first: S::Cursor,
    mut len: usize,
    value: &S::Item,
    is_less: &mut F,
) -> (S::Cursor, usize)
where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> bool,
{
    let mut offset = 0;
    while len > 0 {
        let half = len / 2;
        let mid = seq.advance(first, half);
        if is_less(seq.get(mid), value) {
            first = seq.next(mid);
            offset += half + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }
    (first, offset)
}

/// First position in the sorted `len` elements at `first` whose element is greater than
/// `value`, with its offset from `first`.
pub fn upper_bound<S, F>(
    seq: &S,
    mut first: S::Cursor,
    mut len: usize,
    value: &S::Item,
    is_less: &mut F,
) -> (S::Cursor, usize)
where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> bool,
{
    let mut offset = 0;
    while len > 0 {
        let half = len / 2;
        let mid = seq.advance(first, half);
        if is_less(value, seq.get(mid)) {
            len = half;
        } else {
            first = seq.next(mid);
            offset += half + 1;
            len -= half + 1;
        }
    }
    (first, offset)
}

/// Cursor of the median of three elements.
#[inline]
pub fn median3<S, F>(seq: &S, a: S::Cursor, b: S::Cursor, c: S::Cursor, is_less: &mut F) -> S::Cursor
where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> bool,
{
    let (a, b) = if is_less(seq.get(b), seq.get(a)) {
        (b, a)
    } else {
        (a, b)
    };

    if is_less(seq.get(c), seq.get(b)) {
        if is_less(seq.get(c), seq.get(a)) { a } else { c }
    } else {
        b
    }
}
