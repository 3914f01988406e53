//! The contention-adaptive striped accumulator.

use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicPtr, Ordering};
use std::sync::OnceLock;

use log::{debug, trace, warn};

use super::table::{Table, INITIAL_LEN};
use super::{Cell, CellValue, Combine, Probe};
use crate::error::{Error, Result};

/// Largest execution-unit count accepted by
/// [`Striped::with_parallelism`].
pub const MAX_PARALLELISM: usize = 1 << 16;

/// Returns the table cap for `parallelism` execution units.
///
/// The cap is the smallest power of two not below `parallelism`, and never
/// below the length of a freshly created table.
pub const fn cells_for(parallelism: usize) -> usize {
    let cap = parallelism.next_power_of_two();
    if cap < INITIAL_LEN {
        INITIAL_LEN
    } else {
        cap
    }
}

/// The default table cap, derived once per process from the host's
/// available parallelism.
pub fn default_max_cells() -> usize {
    static MAX_CELLS: OnceLock<usize> = OnceLock::new();
    *MAX_CELLS.get_or_init(|| {
        let parallelism = match std::thread::available_parallelism() {
            Ok(n) => n.get(),
            Err(err) => {
                warn!("cannot query available parallelism ({err}), assuming 1");
                1
            }
        };
        cells_for(parallelism.min(MAX_PARALLELISM))
    })
}

/// Holds the busy flag; releases it on drop.
struct Busy<'a> {
    flag: &'a AtomicBool,
}

impl Drop for Busy<'_> {
    #[inline]
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// A striped accumulator of `T` values.
///
/// Updates first target a single `base` word. The first time a
/// compare-and-swap on `base` fails, a table of two padded [`Cell`]s is
/// created and contending threads spread their updates across it, each
/// picking a slot with its [`Probe`]. Repeated collisions double the table,
/// up to [`max_cells`](Striped::max_cells).
///
/// The logical value is `base` folded with every planted cell. Reads are not
/// linearizable: [`fold`](Striped::fold) may observe each word at a
/// different instant.
///
/// Cells and retired tables are retained until the accumulator drops. Their
/// number is bounded by the cap, so the memory cost is bounded too.
///
/// # Examples
///
/// ```rust
/// use strisce::striped::{Probe, Striped, Sum};
///
/// let acc: Striped<i64> = Striped::new();
/// let mut probe = Probe::new();
///
/// acc.update(5, &Sum, &mut probe);
/// acc.update(-2, &Sum, &mut probe);
///
/// assert_eq!(acc.fold(&Sum), 3);
/// assert_eq!(acc.table_len(), 0);
/// ```
pub struct Striped<T: CellValue> {
    base: Cell,
    table: AtomicPtr<Table>,
    busy: AtomicBool,
    // 0 selects `default_max_cells()`
    max_cells: usize,
    _marker: PhantomData<T>,
}

impl<T: CellValue> Striped<T> {
    /// Creates an accumulator whose base holds the all-zero word.
    ///
    /// That is `0` for `i64` and `0.0` for `f64`.
    pub const fn new() -> Self {
        Self::from_bits(0)
    }

    /// Creates an accumulator whose base holds `initial`.
    pub fn with_initial(initial: T) -> Self {
        Self::from_bits(initial.to_bits())
    }

    /// Creates an accumulator whose base holds the raw word `bits`.
    pub(crate) const fn from_bits(bits: i64) -> Self {
        Striped {
            base: Cell::new(bits),
            table: AtomicPtr::new(ptr::null_mut()),
            busy: AtomicBool::new(false),
            max_cells: 0,
            _marker: PhantomData,
        }
    }

    /// Caps the table for `parallelism` execution units instead of the
    /// host's.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroParallelism`] for `0` and
    /// [`Error::ParallelismTooLarge`] above [`MAX_PARALLELISM`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use strisce::striped::Striped;
    ///
    /// let acc = Striped::<i64>::new().with_parallelism(6).unwrap();
    /// assert_eq!(acc.max_cells(), 8);
    /// assert!(Striped::<i64>::new().with_parallelism(0).is_err());
    /// ```
    pub fn with_parallelism(mut self, parallelism: usize) -> Result<Self> {
        match parallelism {
            0 => Err(Error::ZeroParallelism),
            n if n > MAX_PARALLELISM => Err(Error::ParallelismTooLarge {
                requested: n,
                max: MAX_PARALLELISM,
            }),
            n => {
                self.max_cells = cells_for(n);
                Ok(self)
            }
        }
    }

    /// The largest length the table may reach.
    #[inline]
    pub fn max_cells(&self) -> usize {
        match self.max_cells {
            0 => default_max_cells(),
            n => n,
        }
    }

    /// The current table length, `0` until the first contention.
    pub fn table_len(&self) -> usize {
        self.current().map_or(0, Table::len)
    }

    /// Reads `base`.
    #[inline]
    pub fn base(&self) -> T {
        T::from_bits(self.base.load())
    }

    /// Iterates over the values of the planted cells of the current table.
    ///
    /// Each value is read when the iterator reaches it.
    pub fn cells(&self) -> impl Iterator<Item = T> + '_ {
        self.current()
            .into_iter()
            .flat_map(|table| table.cells())
            .map(|cell| T::from_bits(cell.load()))
    }

    /// Folds `base` with every planted cell.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use strisce::striped::{Max, Striped};
    ///
    /// let acc = Striped::with_initial(i64::MIN);
    /// strisce::striped::Probe::with_current(|probe| {
    ///     acc.update(7, &Max, probe);
    ///     acc.update(3, &Max, probe);
    /// });
    /// assert_eq!(acc.fold(&Max), 7);
    /// ```
    pub fn fold<F: Combine<T>>(&self, combine: &F) -> T {
        self.cells()
            .fold(self.base(), |acc, value| combine.combine(acc, value))
    }

    /// Writes `identity` into `base` and every planted cell.
    ///
    /// Updates racing with the reset may survive it or be wiped out.
    pub fn reset(&self, identity: T) {
        let bits = identity.to_bits();
        self.base.exchange(bits);
        for cell in self.current().into_iter().flat_map(|table| table.cells()) {
            cell.exchange(bits);
        }
    }

    /// Folds `base` with every planted cell, exchanging each with
    /// `identity` as it is read.
    ///
    /// Every update lands either in the returned value or in the state left
    /// behind, never in both.
    pub fn fold_then_reset<F: Combine<T>>(&self, identity: T, combine: &F) -> T {
        let bits = identity.to_bits();
        let mut result = T::from_bits(self.base.exchange(bits));
        for cell in self.current().into_iter().flat_map(|table| table.cells()) {
            result = combine.combine(result, T::from_bits(cell.exchange(bits)));
        }
        result
    }

    /// Folds `x` in with a single compare-and-swap, falling back on
    /// [`accumulate`](Striped::accumulate) when that attempt is contended.
    ///
    /// Without a table the attempt targets `base`; otherwise it targets the
    /// cell selected by `probe`. An update that would not change the target
    /// word is skipped.
    #[inline]
    pub fn update<F: Combine<T>>(&self, x: T, combine: &F, probe: &mut Probe) {
        match self.current() {
            None => {
                if !try_combine(&self.base, x, combine) {
                    self.accumulate(x, combine, false, probe);
                }
            }
            Some(table) => match table.get(probe.raw()) {
                None => self.accumulate(x, combine, true, probe),
                Some(cell) => {
                    if !try_combine(cell, x, combine) {
                        self.accumulate(x, combine, false, probe);
                    }
                }
            },
        }
    }

    /// Folds `x` into the accumulator, adapting the table to contention.
    ///
    /// This is the slow path. `was_uncontended` must be `false` when the
    /// caller has just failed a direct compare-and-swap, and `true`
    /// otherwise. The call never blocks: it retries, rehashing `probe`,
    /// creating cells, growing the table or falling back on `base`, until
    /// one compare-and-swap lands.
    pub fn accumulate<F: Combine<T>>(
        &self,
        x: T,
        combine: &F,
        mut was_uncontended: bool,
        probe: &mut Probe,
    ) {
        if !probe.is_initialized() {
            // a fresh hash says nothing about contention
            was_uncontended = true;
        }
        let mut h = probe.get();
        let mut collide = false;

        loop {
            let sampled = self.table.load(Ordering::Acquire);
            // SAFETY: tables are freed only when `self` drops.
            if let Some(table) = unsafe { sampled.as_ref() } {
                let n = table.len();
                match table.get(h) {
                    None => {
                        if !self.busy.load(Ordering::Relaxed) {
                            let cell = Box::new(Cell::new(x.to_bits()));
                            if let Some(_busy) = self.try_lock() {
                                if self.plant(h, cell) {
                                    return;
                                }
                                // slot was taken meanwhile
                                continue;
                            }
                        }
                        collide = false;
                    }
                    Some(cell) => {
                        if !was_uncontended {
                            was_uncontended = true;
                        } else if try_combine(cell, x, combine) {
                            return;
                        } else if n >= self.max_cells()
                            || self.table.load(Ordering::Acquire) != sampled
                        {
                            collide = false;
                        } else if !collide {
                            collide = true;
                        } else if let Some(_busy) = self.try_lock() {
                            self.grow(table, sampled);
                            collide = false;
                            continue;
                        }
                    }
                }
                h = probe.advance();
            } else if let Some(_busy) = self.try_lock_if_absent() {
                if self.init(h, x) {
                    return;
                }
            } else if try_combine(&self.base, x, combine) {
                return;
            }
        }
    }

    /// The current table, if one has been created.
    #[inline]
    fn current(&self) -> Option<&Table> {
        // SAFETY: tables are freed only when `self` drops.
        unsafe { self.table.load(Ordering::Acquire).as_ref() }
    }

    /// Acquires the busy flag without waiting.
    #[inline]
    fn try_lock(&self) -> Option<Busy<'_>> {
        if self.busy.load(Ordering::Relaxed) {
            return None;
        }
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Busy { flag: &self.busy })
    }

    /// Acquires the busy flag if no table exists yet.
    #[inline]
    fn try_lock_if_absent(&self) -> Option<Busy<'_>> {
        if self.table.load(Ordering::Acquire).is_null() {
            self.try_lock()
        } else {
            None
        }
    }

    /// Plants `cell` at `h` in the current table. Requires the busy flag.
    fn plant(&self, h: u32, cell: Box<Cell>) -> bool {
        match self.current() {
            Some(table) if table.plant(h, cell) => {
                trace!("planted cell {} of {}", h as usize & (table.len() - 1), table.len());
                true
            }
            _ => false,
        }
    }

    /// Creates the table holding `x` at `h`. Requires the busy flag.
    fn init(&self, h: u32, x: T) -> bool {
        if !self.table.load(Ordering::Acquire).is_null() {
            return false;
        }
        let table = Table::with_cell(h, Box::new(Cell::new(x.to_bits())));
        self.table.store(Box::into_raw(Box::new(table)), Ordering::Release);
        debug!("created striped table of {INITIAL_LEN} cells");
        true
    }

    /// Doubles `table`, read through `sampled`, unless it has been replaced
    /// since. Requires the busy flag.
    fn grow(&self, table: &Table, sampled: *mut Table) -> bool {
        if self.table.load(Ordering::Acquire) != sampled {
            return false;
        }
        let grown = Table::grown_from(table, sampled);
        let len = grown.len();
        self.table.store(Box::into_raw(Box::new(grown)), Ordering::Release);
        debug!("grew striped table to {len} cells");
        true
    }
}

/// Applies `combine` to the content of `cell` with one compare-and-swap.
///
/// Returns `true` when the cell now reflects `x`, including when the
/// combination left it unchanged.
#[inline]
fn try_combine<T: CellValue, F: Combine<T>>(cell: &Cell, x: T, combine: &F) -> bool {
    let current = cell.load();
    let next = combine.combine(T::from_bits(current), x).to_bits();
    next == current || cell.cas(current, next)
}

impl<T: CellValue> Default for Striped<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CellValue> Drop for Striped<T> {
    fn drop(&mut self) {
        let table = *self.table.get_mut();
        if !table.is_null() {
            // SAFETY: `&mut self` rules out any outstanding borrow of the
            // tables or cells, and `table` is the newest of its chain.
            unsafe { Table::destroy(table) };
        }
    }
}

impl<T: CellValue> Debug for Striped<T> {
    /// Shows the base and every planted cell by slot index.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ base:{:?}", self.base())?;
        if let Some(table) = self.current() {
            for i in 0..table.len() {
                if let Some(cell) = table.get(i as u32) {
                    write!(f, " [{i}]:{:?}", T::from_bits(cell.load()))?;
                }
            }
        }
        write!(f, " }}")
    }
}
