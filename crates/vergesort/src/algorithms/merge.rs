use std::ptr;

use tracing::trace;

use super::buffer::TempBuffer;
use super::common;
use crate::sequence::Sequence;

/// Merges the sorted runs `[first, middle)` (`len1` elements) and `[middle, last)` (`len2`
/// elements) in place.
///
/// The smaller run is moved into `buffer` when it fits, after asking the buffer to grow. When it
/// does not, the runs are split around a binary-searched cut, rotated and merged recursively, so
/// the merge still completes with no temporary memory at all.
#[allow(clippy::too_many_arguments)]
pub fn merge<S, F>(
    seq: &mut S,
    first: S::Cursor,
    middle: S::Cursor,
    last: S::Cursor,
    len1: usize,
    len2: usize,
    is_less: &mut F,
    buffer: &mut TempBuffer<S::Item>,
) where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> bool,
{
    if len1 == 0 || len2 == 0 {
        return;
    }
    if !is_less(seq.get(middle), seq.get(seq.prev(middle))) {
        return;
    }

    let smaller = len1.min(len2);
    if buffer.capacity() < smaller && !buffer.try_grow(smaller) {
        trace!(
            smaller,
            granted = buffer.capacity(),
            "merge buffer short, rotating"
        );
    }

    merge_adaptive(seq, first, middle, last, len1, len2, is_less, buffer);
}

#[allow(clippy::too_many_arguments)]
fn merge_adaptive<S, F>(
    seq: &mut S,
    mut first: S::Cursor,
    mut middle: S::Cursor,
    mut last: S::Cursor,
    mut len1: usize,
    mut len2: usize,
    is_less: &mut F,
    buffer: &mut TempBuffer<S::Item>,
) where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> bool,
{
    loop {
        if len1 == 0 || len2 == 0 {
            return;
        }

        let capacity = buffer.capacity();
        if len1 <= len2 && len1 <= capacity {
            // SAFETY: the buffer holds at least `len1` uninitialized slots.
            unsafe { merge_forward(seq, first, middle, last, len1, is_less, buffer.as_mut_ptr()) };
            return;
        }
        if len2 <= capacity {
            // SAFETY: the buffer holds at least `len2` uninitialized slots.
            unsafe { merge_backward(seq, first, middle, len2, is_less, buffer.as_mut_ptr()) };
            return;
        }

        // Elements of the left run already smaller than the right run's head stay put.
        while !is_less(seq.get(middle), seq.get(first)) {
            first = seq.next(first);
            len1 -= 1;
            if len1 == 0 {
                return;
            }
        }

        let (cut1, cut2, len11, len21) = if len1 < len2 {
            let len21 = len2 / 2;
            let cut2 = seq.advance(middle, len21);
            let (cut1, len11) = common::upper_bound(&*seq, first, len1, seq.get(cut2), is_less);
            (cut1, cut2, len11, len21)
        } else {
            if len1 == 1 {
                // Both runs hold one element and the skip above proved them out of order.
                seq.swap(first, middle);
                return;
            }
            let len11 = len1 / 2;
            let cut1 = seq.advance(first, len11);
            let (cut2, len21) = common::lower_bound(&*seq, middle, len2, seq.get(cut1), is_less);
            (cut1, cut2, len11, len21)
        };

        let len12 = len1 - len11;
        let len22 = len2 - len21;
        let new_middle = common::rotate(seq, cut1, middle, cut2, len12, len21);

        // Recurse into the smaller half, loop on the larger one.
        if len11 + len21 < len12 + len22 {
            merge_adaptive(seq, first, cut1, new_middle, len11, len21, is_less, buffer);
            first = new_middle;
            middle = cut2;
            len1 = len12;
            len2 = len22;
        } else {
            merge_adaptive(seq, new_middle, cut2, last, len12, len22, is_less, buffer);
            last = new_middle;
            middle = cut1;
            len1 = len11;
            len2 = len21;
        }
    }
}

/// Moves the left run into `buf` and merges front to back.
///
/// # Safety
///
/// `buf` must be valid for writes of `len1` elements and must not overlap the sequence.
unsafe fn merge_forward<S, F>(
    seq: &mut S,
    first: S::Cursor,
    middle: S::Cursor,
    last: S::Cursor,
    len1: usize,
    is_less: &mut F,
    buf: *mut S::Item,
) where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> bool,
{
    let mut at = first;
    for i in 0..len1 {
        unsafe { ptr::write(buf.add(i), ptr::read(seq.get_mut(at))) };
        at = seq.next(at);
    }
    debug_assert!(at == middle);

    // From here on the positions `[hole.dest, right)` are logically empty and exactly as many as
    // the unconsumed buffered elements.
    let mut hole = MergeHole {
        seq,
        buf,
        start: 0,
        end: len1,
        dest: first,
    };
    let mut right = middle;

    while hole.start < hole.end && right != last {
        let out = hole.dest;
        unsafe {
            // If equal, prefer the left run to maintain stability.
            if is_less(hole.seq.get(right), &*hole.buf.add(hole.start)) {
                let value = ptr::read(hole.seq.get_mut(right));
                ptr::write(hole.seq.get_mut(out), value);
                right = hole.seq.next(right);
            } else {
                let value = ptr::read(hole.buf.add(hole.start));
                ptr::write(hole.seq.get_mut(out), value);
                hole.start += 1;
            }
        }
        hole.dest = hole.seq.next(out);
    }
    // Dropping `hole` moves whatever is left of the left run into `[hole.dest, last)`.
}

/// Moves the right run into `buf` and merges back to front.
///
/// # Safety
///
/// `buf` must be valid for writes of `len2` elements and must not overlap the sequence.
unsafe fn merge_backward<S, F>(
    seq: &mut S,
    first: S::Cursor,
    middle: S::Cursor,
    len2: usize,
    is_less: &mut F,
    buf: *mut S::Item,
) where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> bool,
{
    let mut at = middle;
    for i in 0..len2 {
        unsafe { ptr::write(buf.add(i), ptr::read(seq.get_mut(at))) };
        at = seq.next(at);
    }
    let mut out = at;

    // `hole.dest` is one past the unconsumed left elements; `[hole.dest, out)` is empty.
    let mut hole = MergeHole {
        seq,
        buf,
        start: 0,
        end: len2,
        dest: middle,
    };

    while hole.dest != first && hole.start < hole.end {
        let left = hole.seq.prev(hole.dest);
        out = hole.seq.prev(out);
        unsafe {
            // If equal, prefer the right run to maintain stability.
            if is_less(&*hole.buf.add(hole.end - 1), hole.seq.get(left)) {
                let value = ptr::read(hole.seq.get_mut(left));
                ptr::write(hole.seq.get_mut(out), value);
                hole.dest = left;
            } else {
                hole.end -= 1;
                let value = ptr::read(hole.buf.add(hole.end));
                ptr::write(hole.seq.get_mut(out), value);
            }
        }
    }
    // Dropping `hole` moves whatever is left of the right run into `[first, out)`.
}

// When dropped, moves `buf[start..end]` into consecutive positions starting at `dest`.
struct MergeHole<'a, S>
where
    S: Sequence + ?Sized,
{
    seq: &'a mut S,
    buf: *mut S::Item,
    start: usize,
    end: usize,
    dest: S::Cursor,
}

impl<S> Drop for MergeHole<'_, S>
where
    S: Sequence + ?Sized,
{
    fn drop(&mut self) {
        let mut at = self.dest;
        for i in self.start..self.end {
            // SAFETY: `buf[start..end]` holds initialized elements that are owned by nobody else,
            // and exactly that many positions starting at `dest` are empty.
            unsafe {
                let value = ptr::read(self.buf.add(i));
                ptr::write(self.seq.get_mut(at), value);
            }
            at = self.seq.next(at);
        }
    }
}
