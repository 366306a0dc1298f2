use crate::TUNED_PARAMS;

use super::{common, heap_sort};

pub fn sort<T, F>(data: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    if data.len() < 2 {
        return;
    }
    let bad_allowed = common::floor_log2(data.len()) + 2;
    pdqsort_like(data, is_less, bad_allowed, true);
}

fn pdqsort_like<T, F>(
    mut data: &mut [T],
    is_less: &mut F,
    mut bad_allowed: usize,
    mut was_balanced: bool,
)
where
    F: FnMut(&T, &T) -> bool,
{
    while data.len() > TUNED_PARAMS.insertion_threshold {
        if bad_allowed == 0 {
            heap_sort::heap_sort(data, is_less);
            return;
        }

        if !was_balanced {
            break_patterns(data);
        }

        let len = data.len();
        let pivot = choose_pivot_ninther(data, is_less);
        data.swap(0, pivot);
        let (lt, gt) = partition_3way(data, is_less);
        if lt == 0 && gt == len {
            return;
        }

        let left_len = lt;
        let right_len = len - gt;
        let unbalanced = left_len < (len / 8) || right_len < (len / 8);
        if unbalanced {
            bad_allowed = bad_allowed.saturating_sub(1);
        }
        was_balanced = !unbalanced;

        let (left, rest) = data.split_at_mut(lt);
        let (_, right) = rest.split_at_mut(gt - lt);

        if left.len() < right.len() {
            pdqsort_like(left, is_less, bad_allowed, was_balanced);
            data = right;
        } else {
            pdqsort_like(right, is_less, bad_allowed, was_balanced);
            data = left;
        }
    }

    let len = data.len();
    common::insertion_sort(data, 0, len, is_less);
}

/// Partitions around the pivot stored at `data[0]`.
///
/// Returns `(lt, gt)` with `data[..lt] < pivot`, `data[lt..gt] == pivot`, `data[gt..] > pivot`.
fn partition_3way<T, F>(data: &mut [T], is_less: &mut F) -> (usize, usize)
where
    F: FnMut(&T, &T) -> bool,
{
    let (head, rest) = data.split_at_mut(1);
    let pivot = &head[0];
    let mut lt = 0usize;
    let mut i = 0usize;
    let mut gt = rest.len();

    while i < gt {
        if is_less(&rest[i], pivot) {
            rest.swap(i, lt);
            i += 1;
            lt += 1;
        } else if is_less(pivot, &rest[i]) {
            gt -= 1;
            rest.swap(i, gt);
        } else {
            i += 1;
        }
    }

    // The pivot joins the equal block: everything before it is smaller.
    data.swap(0, lt);
    (lt, gt + 1)
}

fn choose_pivot_ninther<T, F>(data: &[T], is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let len = data.len();
    if len < 64 {
        return common::median3(data, 0, len >> 1, len - 1, is_less);
    }

    let step = len / 8;
    let mid = len / 2;
    let r = len - 1;
    let m1 = common::median3(data, 0, step, step * 2, is_less);
    let m2 = common::median3(data, mid - step, mid, mid + step, is_less);
    let m3 = common::median3(data, r - step * 2, r - step, r, is_less);
    common::median3(data, m1, m2, m3, is_less)
}

fn break_patterns<T>(data: &mut [T]) {
    if data.len() < 8 {
        return;
    }

    let len = data.len();
    let mid = len / 2;
    let a = len / 4;
    let b = (len * 3) / 4;

    data.swap(0, mid);
    data.swap(a, len - 1);
    data.swap(b, (mid + 1).min(len - 1));
}
