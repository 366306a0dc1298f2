use std::collections::VecDeque;
use std::fmt;

/// How a [`Sequence`] can be walked.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Traversal {
    /// Only `next`/`prev` steps; offsets and distances cost one step per element.
    SingleStep,
    /// Positions support arbitrary offsets and a contiguous view is available.
    RandomAccess,
}

/// A mutable sequence addressed through cursors.
///
/// Cursors name positions, not values: swapping or moving elements leaves every cursor pointing
/// at the same position. `end()` is one past the last element and is never dereferenced.
///
/// # Safety
///
/// The sorting routines move elements bitwise through `get_mut`, so implementors must uphold:
///
/// - `get_mut` on two distinct in-range cursors returns references to non-overlapping places,
/// - the address returned by `get`/`get_mut` for a cursor does not change while the sequence is
///   mutably borrowed, and no method other than `swap` moves elements,
/// - `next`/`prev`/`advance`/`distance` are consistent with `len`.
pub unsafe trait Sequence {
    type Item;
    type Cursor: Copy + Eq + fmt::Debug;

    const TRAVERSAL: Traversal = Traversal::SingleStep;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn begin(&self) -> Self::Cursor;
    fn end(&self) -> Self::Cursor;
    fn next(&self, at: Self::Cursor) -> Self::Cursor;
    fn prev(&self, at: Self::Cursor) -> Self::Cursor;
    fn get(&self, at: Self::Cursor) -> &Self::Item;
    fn get_mut(&mut self, at: Self::Cursor) -> &mut Self::Item;
    fn swap(&mut self, a: Self::Cursor, b: Self::Cursor);

    fn advance(&self, mut at: Self::Cursor, n: usize) -> Self::Cursor {
        for _ in 0..n {
            at = self.next(at);
        }
        at
    }

    /// Number of `next` steps from `from` to `to`.
    ///
    /// Linear for single-step sequences, so the sorting routines count offsets while they walk
    /// instead of calling this. It stays on the trait for callers that hold two cursors into a
    /// sequence, and so that random-access implementors can answer it in constant time.
    fn distance(&self, mut from: Self::Cursor, to: Self::Cursor) -> usize {
        let mut n = 0;
        while from != to {
            from = self.next(from);
            n += 1;
        }
        n
    }

    /// Random-access view of the elements, `None` for single-step sequences.
    fn as_contiguous_mut(&mut self) -> Option<&mut [Self::Item]> {
        None
    }
}

unsafe impl<T> Sequence for [T] {
    type Item = T;
    type Cursor = usize;

    const TRAVERSAL: Traversal = Traversal::RandomAccess;

    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn begin(&self) -> usize {
        0
    }

    #[inline]
    fn end(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn next(&self, at: usize) -> usize {
        at + 1
    }

    #[inline]
    fn prev(&self, at: usize) -> usize {
        at - 1
    }

    #[inline]
    fn get(&self, at: usize) -> &T {
        &self[at]
    }

    #[inline]
    fn get_mut(&mut self, at: usize) -> &mut T {
        &mut self[at]
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        <[T]>::swap(self, a, b);
    }

    #[inline]
    fn advance(&self, at: usize, n: usize) -> usize {
        at + n
    }

    #[inline]
    fn distance(&self, from: usize, to: usize) -> usize {
        to - from
    }

    fn as_contiguous_mut(&mut self) -> Option<&mut [T]> {
        Some(self)
    }
}

unsafe impl<T> Sequence for Vec<T> {
    type Item = T;
    type Cursor = usize;

    const TRAVERSAL: Traversal = Traversal::RandomAccess;

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn begin(&self) -> usize {
        0
    }

    fn end(&self) -> usize {
        self.as_slice().len()
    }

    fn next(&self, at: usize) -> usize {
        at + 1
    }

    fn prev(&self, at: usize) -> usize {
        at - 1
    }

    fn get(&self, at: usize) -> &T {
        &self[at]
    }

    fn get_mut(&mut self, at: usize) -> &mut T {
        &mut self[at]
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.as_mut_slice().swap(a, b);
    }

    fn advance(&self, at: usize, n: usize) -> usize {
        at + n
    }

    fn distance(&self, from: usize, to: usize) -> usize {
        to - from
    }

    fn as_contiguous_mut(&mut self) -> Option<&mut [T]> {
        Some(self.as_mut_slice())
    }
}

// The ring buffer is rotated into one slice before sorting, so it takes the random-access path.
unsafe impl<T> Sequence for VecDeque<T> {
    type Item = T;
    type Cursor = usize;

    const TRAVERSAL: Traversal = Traversal::RandomAccess;

    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn begin(&self) -> usize {
        0
    }

    fn end(&self) -> usize {
        VecDeque::len(self)
    }

    fn next(&self, at: usize) -> usize {
        at + 1
    }

    fn prev(&self, at: usize) -> usize {
        at - 1
    }

    fn get(&self, at: usize) -> &T {
        &self[at]
    }

    fn get_mut(&mut self, at: usize) -> &mut T {
        &mut self[at]
    }

    fn swap(&mut self, a: usize, b: usize) {
        VecDeque::swap(self, a, b);
    }

    fn advance(&self, at: usize, n: usize) -> usize {
        at + n
    }

    fn distance(&self, from: usize, to: usize) -> usize {
        to - from
    }

    fn as_contiguous_mut(&mut self) -> Option<&mut [T]> {
        Some(self.make_contiguous())
    }
}

/// A slice seen through single steps only.
///
/// Sorting a `Stepwise` runs the single-step strategy even though the storage is contiguous.
pub struct Stepwise<'a, T> {
    inner: &'a mut [T],
}

impl<'a, T> Stepwise<'a, T> {
    pub fn new(inner: &'a mut [T]) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> &'a mut [T] {
        self.inner
    }
}

unsafe impl<T> Sequence for Stepwise<'_, T> {
    type Item = T;
    type Cursor = usize;

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn begin(&self) -> usize {
        0
    }

    fn end(&self) -> usize {
        self.inner.len()
    }

    fn next(&self, at: usize) -> usize {
        at + 1
    }

    fn prev(&self, at: usize) -> usize {
        at - 1
    }

    fn get(&self, at: usize) -> &T {
        &self.inner[at]
    }

    fn get_mut(&mut self, at: usize) -> &mut T {
        &mut self.inner[at]
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.inner.swap(a, b);
    }
}

const NONE: usize = usize::MAX;

/// Position inside a [`StepList`]. The past-the-end position is a dedicated sentinel.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ListCursor(usize);

struct Node<T> {
    value: T,
    prev: usize,
    next: usize,
}

/// Doubly linked list whose nodes live in one arena and are linked by index.
///
/// Logical order follows the links, not the arena, so the list offers single-step traversal
/// only.
pub struct StepList<T> {
    nodes: Vec<Node<T>>,
    head: usize,
    tail: usize,
}

impl<T> StepList<T> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            head: NONE,
            tail: NONE,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: NONE,
            tail: NONE,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn push_back(&mut self, value: T) {
        let id = self.nodes.len();
        self.nodes.push(Node {
            value,
            prev: self.tail,
            next: NONE,
        });
        if self.tail == NONE {
            self.head = id;
        } else {
            self.nodes[self.tail].next = id;
        }
        self.tail = id;
    }

    pub fn push_front(&mut self, value: T) {
        let id = self.nodes.len();
        self.nodes.push(Node {
            value,
            prev: NONE,
            next: self.head,
        });
        if self.head == NONE {
            self.tail = id;
        } else {
            self.nodes[self.head].prev = id;
        }
        self.head = id;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            at: self.head,
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut at = self.head;
        while at != NONE {
            order.push(at);
            at = self.nodes[at].next;
        }

        let mut slots: Vec<Option<T>> = self.nodes.into_iter().map(|n| Some(n.value)).collect();
        order
            .into_iter()
            .filter_map(|id| slots[id].take())
            .collect()
    }
}

impl<T> Default for StepList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for StepList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut list = Self::with_capacity(iter.size_hint().0);
        for value in iter {
            list.push_back(value);
        }
        list
    }
}

impl<T: fmt::Debug> fmt::Debug for StepList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

pub struct Iter<'a, T> {
    list: &'a StepList<T>,
    at: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.at == NONE {
            return None;
        }
        let node = &self.list.nodes[self.at];
        self.at = node.next;
        Some(&node.value)
    }
}

unsafe impl<T> Sequence for StepList<T> {
    type Item = T;
    type Cursor = ListCursor;

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn begin(&self) -> ListCursor {
        ListCursor(self.head)
    }

    fn end(&self) -> ListCursor {
        ListCursor(NONE)
    }

    fn next(&self, at: ListCursor) -> ListCursor {
        ListCursor(self.nodes[at.0].next)
    }

    fn prev(&self, at: ListCursor) -> ListCursor {
        if at.0 == NONE {
            ListCursor(self.tail)
        } else {
            ListCursor(self.nodes[at.0].prev)
        }
    }

    fn get(&self, at: ListCursor) -> &T {
        &self.nodes[at.0].value
    }

    fn get_mut(&mut self, at: ListCursor) -> &mut T {
        &mut self.nodes[at.0].value
    }

    fn swap(&mut self, a: ListCursor, b: ListCursor) {
        if a == b {
            return;
        }
        let (lo, hi) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        let (left, right) = self.nodes.split_at_mut(hi);
        std::mem::swap(&mut left[lo].value, &mut right[0].value);
    }
}
