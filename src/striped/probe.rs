//! Per-worker probe hashes used to route updates to cells.
//!
//! A [`Probe`] is a small pseudorandom hash owned by one execution context.
//! The accumulator masks it to pick a table slot and advances it with an
//! xorshift step whenever the chosen slot turns out to be contended.
//!
//! Probes are explicit values passed to
//! [`Striped::accumulate`](super::Striped::accumulate), so tests and custom
//! schedulers can drive the engine with simulated contexts. Ordinary callers
//! use [`Probe::with_current`], which keeps one probe per thread in
//! thread-local storage.

use std::sync::atomic::{AtomicU32, Ordering};

/// Increment applied to the global generator for every fresh probe.
///
/// The golden-ratio constant spreads consecutive seeds over the whole
/// 32-bit space.
const PROBE_INCREMENT: u32 = 0x9e37_79b9;

/// Global seed generator shared by all probes.
static PROBE_GENERATOR: AtomicU32 = AtomicU32::new(0);

thread_local! {
    /// The calling thread's stored probe; `0` until first use.
    static THREAD_PROBE: std::cell::Cell<u32> = const { std::cell::Cell::new(0) };
}

/// Draws the next non-zero seed from the global generator.
fn next_seed() -> u32 {
    let seed = PROBE_GENERATOR
        .fetch_add(PROBE_INCREMENT, Ordering::Relaxed)
        .wrapping_add(PROBE_INCREMENT);
    // 0 is reserved for "uninitialized"
    if seed == 0 {
        1
    } else {
        seed
    }
}

/// Applies one xorshift step to `probe`.
///
/// Non-zero inputs always produce non-zero outputs.
#[inline]
pub const fn xorshift(mut probe: u32) -> u32 {
    probe ^= probe << 13;
    probe ^= probe >> 17;
    probe ^= probe << 5;
    probe
}

/// A per-execution-context hash used to select and rehash table slots.
///
/// The value `0` is a reserved sentinel meaning "not yet initialized". It is
/// never used as a real hash: [`get`](Probe::get) replaces it with a fresh
/// seed on first use.
///
/// # Examples
///
/// ```rust
/// use strisce::striped::Probe;
///
/// let mut probe = Probe::uninit();
/// assert!(!probe.is_initialized());
///
/// let h = probe.get();
/// assert_ne!(h, 0);
/// assert_ne!(probe.advance(), h);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Probe {
    hash: u32,
}

impl Probe {
    /// Creates a probe with a fresh, non-zero seed.
    pub fn new() -> Self {
        Probe { hash: next_seed() }
    }

    /// Creates a probe in the uninitialized state.
    pub const fn uninit() -> Self {
        Probe { hash: 0 }
    }

    /// Creates a probe holding exactly `hash`.
    ///
    /// Passing `0` yields an uninitialized probe.
    pub const fn from_raw(hash: u32) -> Self {
        Probe { hash }
    }

    /// Returns the stored hash without initializing it.
    #[inline]
    pub const fn raw(&self) -> u32 {
        self.hash
    }

    /// Returns `true` once the probe holds a real hash.
    #[inline]
    pub const fn is_initialized(&self) -> bool {
        self.hash != 0
    }

    /// Returns the current hash, seeding it first if it is still `0`.
    #[inline]
    pub fn get(&mut self) -> u32 {
        if self.hash == 0 {
            self.hash = next_seed();
        }
        self.hash
    }

    /// Advances the hash by one xorshift step, stores it and returns it.
    #[inline]
    pub fn advance(&mut self) -> u32 {
        self.hash = xorshift(self.get());
        self.hash
    }

    /// Runs `f` with the calling thread's probe.
    ///
    /// Any advance performed by `f` is persisted for the next call on the
    /// same thread.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use strisce::striped::Probe;
    ///
    /// let first = Probe::with_current(|probe| probe.get());
    /// let again = Probe::with_current(|probe| probe.get());
    /// assert_eq!(first, again);
    /// ```
    #[inline]
    pub fn with_current<R>(f: impl FnOnce(&mut Probe) -> R) -> R {
        THREAD_PROBE.with(|slot| {
            let mut probe = Probe::from_raw(slot.get());
            let result = f(&mut probe);
            slot.set(probe.hash);
            result
        })
    }
}

impl Default for Probe {
    /// Creates a probe with a fresh seed.
    fn default() -> Self {
        Self::new()
    }
}
