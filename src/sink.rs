//! Output buffers that rendered templates are written into.
//!
//! A [`Sink`] is an append only byte destination. Callers may implement
//! it over any storage; [`PooledSink`] is the default implementation,
//! backed by a region acquired from a [`Pool`] and returned to it when
//! the sink goes out of scope.

use std::sync::{Mutex, OnceLock};

/// Regions smaller than this are never acquired; keeps tiny space
/// requests from defeating amortization.
const MIN_REGION: usize = 256;

/// An append only byte destination.
///
/// Writers stage bytes in two steps: [`request_space`][`Sink::request_space`]
/// grants an exclusive mutable view, and [`commit`][`Sink::commit`]
/// permanently appends a prefix of that view. Bytes committed earlier are
/// preserved verbatim, in order, for the life of the sink.
pub trait Sink {
    /// Request an exclusive view of at least `hint` writable bytes.
    ///
    /// A hint of 0 grants a view of any non-zero size.
    fn request_space(&mut self, hint: usize) -> &mut [u8];

    /// Permanently append the first `count` bytes of the most recently
    /// granted view.
    ///
    /// # Panics
    ///
    /// Panics when `count` exceeds the length of the last granted view.
    fn commit(&mut self, count: usize);

    /// Return all bytes committed so far, in order.
    fn written(&self) -> &[u8];
}

/// A shelf of reusable byte regions.
///
/// Regions released by a [`PooledSink`] are kept and handed out again on
/// the next acquisition, so repeated renders do not repeatedly allocate.
/// A `Pool` is internally synchronized and may be shared across threads.
pub struct Pool {
    shelf: Mutex<Vec<Vec<u8>>>,
}

impl Pool {
    /// Create a new empty Pool.
    pub fn new() -> Self {
        Self {
            shelf: Mutex::new(Vec::new()),
        }
    }

    /// Return the process wide shared Pool.
    pub fn shared() -> &'static Pool {
        static SHARED: OnceLock<Pool> = OnceLock::new();

        SHARED.get_or_init(Pool::new)
    }

    /// Return the number of idle regions currently held by the Pool.
    pub fn idle(&self) -> usize {
        self.lock().len()
    }

    /// Take a region of at least `capacity` bytes off the shelf,
    /// allocating a new one when nothing on the shelf is large enough.
    fn acquire(&self, capacity: usize) -> Vec<u8> {
        let capacity = capacity.max(MIN_REGION);
        let mut shelf = self.lock();

        match shelf.iter().position(|region| region.len() >= capacity) {
            Some(index) => shelf.swap_remove(index),
            None => vec![0; capacity],
        }
    }

    /// Put a region back on the shelf.
    fn release(&self, region: Vec<u8>) {
        self.lock().push(region);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Vec<u8>>> {
        self.shelf
            .lock()
            .expect("pool lock should not be poisoned")
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

/// The default [`Sink`], backed by a region from a [`Pool`].
///
/// The backing region is acquired on construction and released back to
/// the Pool exactly once, when the sink is dropped, whether the render
/// completed or failed. When a space request exceeds the remaining
/// region, a replacement sized to committed + requested is acquired,
/// committed bytes are copied over, and the old region is released.
pub struct PooledSink<'pool> {
    /// The Pool that the backing region came from, and returns to.
    pool: &'pool Pool,
    /// The backing region.
    region: Vec<u8>,
    /// Bytes permanently appended so far.
    committed: usize,
    /// Length of the last granted view; 0 when no grant is outstanding.
    granted: usize,
}

impl<'pool> PooledSink<'pool> {
    /// Create a new PooledSink backed by the given Pool.
    pub fn new(pool: &'pool Pool) -> Self {
        Self::with_capacity(pool, 0)
    }

    /// Create a new PooledSink with room for at least `capacity` bytes
    /// before the first growth.
    pub fn with_capacity(pool: &'pool Pool, capacity: usize) -> Self {
        Self {
            pool,
            region: pool.acquire(capacity),
            committed: 0,
            granted: 0,
        }
    }

    /// Copy all committed bytes into a new Vec.
    pub fn to_vec(&self) -> Vec<u8> {
        self.written().to_vec()
    }

    /// Swap the backing region for one holding at least `required`
    /// bytes, preserving everything committed so far.
    fn grow(&mut self, required: usize) {
        let mut next = self.pool.acquire(required);
        next[..self.committed].copy_from_slice(&self.region[..self.committed]);

        let old = std::mem::replace(&mut self.region, next);
        self.pool.release(old);
    }
}

impl Sink for PooledSink<'_> {
    fn request_space(&mut self, hint: usize) -> &mut [u8] {
        let hint = hint.max(1);
        if self.committed + hint > self.region.len() {
            self.grow(self.committed + hint);
        }
        self.granted = self.region.len() - self.committed;

        &mut self.region[self.committed..]
    }

    fn commit(&mut self, count: usize) {
        assert!(
            count <= self.granted,
            "commit of {count} bytes exceeds the granted view of {} bytes",
            self.granted
        );
        self.committed += count;
        self.granted = 0;
    }

    fn written(&self) -> &[u8] {
        &self.region[..self.committed]
    }
}

impl Drop for PooledSink<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.region));
    }
}
