use tracing::trace;

/// How much temporary memory merges may request.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum BufferPolicy {
    /// Request as much as the merge wants; only real allocation failure shrinks it.
    #[default]
    Unbounded,
    /// Never hand out more than this many elements.
    Capped(usize),
    /// Never allocate; every merge takes the rotation path.
    Disabled,
}

impl BufferPolicy {
    #[inline]
    fn clamp(self, requested: usize) -> usize {
        match self {
            Self::Unbounded => requested,
            Self::Capped(max) => requested.min(max),
            Self::Disabled => 0,
        }
    }
}

/// Uninitialized scratch storage for merges, owned by one sort call.
///
/// The storage never holds live elements between two uses, so dropping it only releases memory.
pub(crate) struct TempBuffer<T> {
    storage: Vec<T>,
    // Tracked separately from `storage.capacity()`, which is meaningless for zero-sized types.
    granted: usize,
    policy: BufferPolicy,
}

impl<T> TempBuffer<T> {
    pub(crate) fn new(policy: BufferPolicy) -> Self {
        Self {
            storage: Vec::new(),
            granted: 0,
            policy,
        }
    }

    /// Acquires a buffer for up to `requested` elements. Never fails; may hold fewer or none.
    pub(crate) fn acquire(requested: usize, policy: BufferPolicy) -> Self {
        let mut buffer = Self::new(policy);
        buffer.try_grow(requested);
        buffer
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.granted
    }

    /// Tries to replace the storage with a bigger one, halving the request on allocation failure.
    ///
    /// Returns `false` and keeps the old storage when nothing bigger than it could be obtained.
    pub(crate) fn try_grow(&mut self, requested: usize) -> bool {
        let mut count = self.policy.clamp(requested);
        while count > self.granted {
            let mut storage = Vec::new();
            if storage.try_reserve_exact(count).is_ok() {
                self.storage = storage;
                self.granted = count;
                return true;
            }
            trace!(count, "temporary buffer allocation failed, halving");
            count /= 2;
        }
        false
    }

    /// Start of the uninitialized storage, valid for `capacity()` elements.
    #[inline]
    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.spare_capacity_mut().as_mut_ptr().cast::<T>()
    }
}
