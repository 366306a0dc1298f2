use std::cmp::Ordering;

use crate::algorithms::buffer::{BufferPolicy, TempBuffer};
use crate::algorithms::{heap_sort, pdqsort_like, quick_merge_sort};

/// Sorter for the spans that are not covered by long runs, and for whole inputs below the
/// random-access threshold. Stability is not required.
pub trait FallbackSort {
    fn sort_by<T, F>(&mut self, v: &mut [T], is_less: &mut F)
    where
        F: FnMut(&T, &T) -> bool;
}

impl<Fb: FallbackSort + ?Sized> FallbackSort for &mut Fb {
    fn sort_by<T, F>(&mut self, v: &mut [T], is_less: &mut F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        (**self).sort_by(v, is_less);
    }
}

/// Pattern-defeating quicksort. The default fallback.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pdqsort;

impl FallbackSort for Pdqsort {
    fn sort_by<T, F>(&mut self, v: &mut [T], is_less: &mut F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        pdqsort_like::sort(v, is_less);
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct HeapSort;

impl FallbackSort for HeapSort {
    fn sort_by<T, F>(&mut self, v: &mut [T], is_less: &mut F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        heap_sort::heap_sort(v, is_less);
    }
}

/// Quicksort that turns into merge sort on bad partitions; merges draw from `buffer`.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuickMergeSort {
    pub buffer: BufferPolicy,
}

impl FallbackSort for QuickMergeSort {
    fn sort_by<T, F>(&mut self, v: &mut [T], is_less: &mut F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        let len = v.len();
        // The largest merge of the merge-sort path moves half of the slice.
        let mut buffer = TempBuffer::acquire(len / 2, self.buffer);
        quick_merge_sort::sort(v, 0, len, len, is_less, &mut buffer);
    }
}

/// `slice::sort_unstable_by`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdUnstable;

impl FallbackSort for StdUnstable {
    fn sort_by<T, F>(&mut self, v: &mut [T], is_less: &mut F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        v.sort_unstable_by(|a, b| ordering(a, b, is_less));
    }
}

/// `slice::sort_by`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdStable;

impl FallbackSort for StdStable {
    fn sort_by<T, F>(&mut self, v: &mut [T], is_less: &mut F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        v.sort_by(|a, b| ordering(a, b, is_less));
    }
}

#[inline]
fn ordering<T, F>(a: &T, b: &T, is_less: &mut F) -> Ordering
where
    F: FnMut(&T, &T) -> bool,
{
    if is_less(a, b) {
        Ordering::Less
    } else if is_less(b, a) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}
