use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Shared, reference-counted payload cell.
///
/// Cloning a block adds a holder; dropping one releases it. The payload is
/// destroyed exactly once, when the last holder goes away. Counting is atomic,
/// so holders may be cloned and dropped from different threads.
pub struct DataBlock<T: ?Sized> {
    inner: Arc<T>,
}

impl<T> DataBlock<T> {
    /// Create a block holding `payload`, with one holder
    pub fn new(payload: T) -> Self {
        Self { inner: Arc::new(payload) }
    }

    /// Recover the payload if `self` is the only holder
    pub fn try_unwrap(self) -> Result<T, Self> {
        Arc::try_unwrap(self.inner).map_err(|inner| Self { inner })
    }
}

impl<T: ?Sized> DataBlock<T> {
    /// Add a holder. Same as `clone`, spelled out for call sites that
    /// want to make the sharing explicit.
    pub fn share(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }

    /// Release this holder
    pub fn release(self) {
        drop(self);
    }

    /// Number of live holders
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Whether two blocks hold the same payload instance
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    pub fn data(&self) -> &T {
        &self.inner
    }
}

impl<T: ?Sized> Clone for DataBlock<T> {
    fn clone(&self) -> Self {
        self.share()
    }
}

impl<T: ?Sized> Deref for DataBlock<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for DataBlock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataBlock")
            .field("holders", &self.holders())
            .field("data", &&*self.inner)
            .finish()
    }
}

impl<T> From<T> for DataBlock<T> {
    fn from(payload: T) -> Self {
        DataBlock::new(payload)
    }
}
