use crate::sequence::Sequence;

/// A maximal monotonic run found by [`next_run`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Run<C> {
    /// Last element of the run.
    pub current: C,
    /// Position after the run; `last` when the run reaches the end.
    pub next: C,
    pub len: usize,
    /// Strictly decreasing first step; equal neighbours are then kept in the run.
    pub descending: bool,
}

/// Scans the run that starts at `current`, whose successor is `next`.
///
/// The direction is fixed by the first pair: a strict decrease starts a non-increasing run,
/// anything else a non-decreasing one. The run ends at the first element breaking it.
pub fn next_run<S, F>(
    seq: &S,
    mut current: S::Cursor,
    mut next: S::Cursor,
    last: S::Cursor,
    is_less: &mut F,
) -> Run<S::Cursor>
where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> bool,
{
    let mut len = 1;
    if next == last {
        return Run {
            current,
            next,
            len,
            descending: false,
        };
    }

    let descending = is_less(seq.get(next), seq.get(current));
    loop {
        let breaks = if descending {
            is_less(seq.get(current), seq.get(next))
        } else {
            is_less(seq.get(next), seq.get(current))
        };
        if breaks {
            break;
        }
        len += 1;
        current = next;
        next = seq.next(next);
        if next == last {
            break;
        }
    }

    Run {
        current,
        next,
        len,
        descending,
    }
}
