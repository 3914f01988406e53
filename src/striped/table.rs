//! The power-of-two table of lazily planted cells.

use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};

use super::Cell;

/// Length of a freshly created table.
pub(crate) const INITIAL_LEN: usize = 2;

/// An array of optional cell pointers.
///
/// A table is never resized in place. Growth builds a new table twice as long
/// that reuses every cell pointer of the old one, and links the old table
/// through `prev` so it stays readable by threads that sampled it before the
/// swap. The owning [`Striped`](super::Striped) frees the whole chain, and
/// the cells, when it is dropped.
///
/// Slots go from null to a cell pointer exactly once and are written only by
/// the holder of the owner's busy flag.
pub(crate) struct Table {
    slots: Box<[AtomicPtr<Cell>]>,
    prev: *mut Table,
}

impl Table {
    /// Creates a table of [`INITIAL_LEN`] with `cell` planted at `hash & 1`.
    pub(crate) fn with_cell(hash: u32, cell: Box<Cell>) -> Self {
        let table = Table {
            slots: empty_slots(INITIAL_LEN),
            prev: ptr::null_mut(),
        };
        table.slot(hash).store(Box::into_raw(cell), Ordering::Relaxed);
        table
    }

    /// Creates a table twice as long as `old`, sharing all of its cells.
    ///
    /// `old_ptr` must be the pointer `old` was read through; it becomes the
    /// new table's `prev` link.
    pub(crate) fn grown_from(old: &Table, old_ptr: *mut Table) -> Self {
        let slots = empty_slots(old.len() << 1);
        for (new, old) in slots.iter().zip(old.slots.iter()) {
            new.store(old.load(Ordering::Acquire), Ordering::Relaxed);
        }
        Table {
            slots,
            prev: old_ptr,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns the slot selected by `hash`.
    #[inline]
    pub(crate) fn slot(&self, hash: u32) -> &AtomicPtr<Cell> {
        &self.slots[hash as usize & (self.slots.len() - 1)]
    }

    /// Returns the cell at the slot selected by `hash`, if one is planted.
    #[inline]
    pub(crate) fn get(&self, hash: u32) -> Option<&Cell> {
        let cell = self.slot(hash).load(Ordering::Acquire);
        // SAFETY: planted cells are never removed and are freed only when the
        // owning accumulator drops, which outlives every borrow of its tables.
        unsafe { cell.as_ref() }
    }

    /// Plants `cell` at the slot selected by `hash` if it is still empty.
    ///
    /// The caller must hold the owner's busy flag. Returns `false`, dropping
    /// `cell`, when the slot is already taken.
    pub(crate) fn plant(&self, hash: u32, cell: Box<Cell>) -> bool {
        let slot = self.slot(hash);
        if !slot.load(Ordering::Acquire).is_null() {
            return false;
        }
        slot.store(Box::into_raw(cell), Ordering::Release);
        true
    }

    /// Iterates over the planted cells in slot order.
    pub(crate) fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.slots.iter().filter_map(|slot| {
            let cell = slot.load(Ordering::Acquire);
            // SAFETY: see `get`.
            unsafe { cell.as_ref() }
        })
    }

    /// Frees the cells of this table and every table in its `prev` chain.
    ///
    /// # Safety
    ///
    /// `this` must be the newest table of its chain, obtained from
    /// `Box::into_raw`, and no other reference to any table of the chain or
    /// to any of its cells may exist.
    pub(crate) unsafe fn destroy(this: *mut Table) {
        let table = Box::from_raw(this);
        // The newest table holds every cell ever planted, each exactly once.
        for slot in table.slots.iter() {
            let cell = slot.load(Ordering::Relaxed);
            if !cell.is_null() {
                drop(Box::from_raw(cell));
            }
        }

        let mut prev = table.prev;
        while !prev.is_null() {
            let older = Box::from_raw(prev);
            prev = older.prev;
        }
    }
}

fn empty_slots(len: usize) -> Box<[AtomicPtr<Cell>]> {
    (0..len).map(|_| AtomicPtr::new(ptr::null_mut())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leak(table: Table) -> *mut Table {
        Box::into_raw(Box::new(table))
    }

    #[test]
    fn test_with_cell_plants_at_low_bit() {
        let table = leak(Table::with_cell(3, Box::new(Cell::new(9))));
        let t = unsafe { &*table };
        assert_eq!(t.len(), 2);
        assert!(t.get(0).is_none());
        assert_eq!(t.get(1).map(Cell::load), Some(9));
        unsafe { Table::destroy(table) };
    }

    #[test]
    fn test_plant_only_into_empty_slot() {
        let table = leak(Table::with_cell(0, Box::new(Cell::new(1))));
        let t = unsafe { &*table };
        assert!(!t.plant(2, Box::new(Cell::new(5))));
        assert!(t.plant(1, Box::new(Cell::new(5))));
        assert_eq!(t.cells().map(Cell::load).collect::<Vec<_>>(), vec![1, 5]);
        unsafe { Table::destroy(table) };
    }

    #[test]
    fn test_grown_shares_cells() {
        let old = leak(Table::with_cell(1, Box::new(Cell::new(4))));
        let grown = leak(Table::grown_from(unsafe { &*old }, old));
        let (o, g) = unsafe { (&*old, &*grown) };

        assert_eq!(g.len(), 4);
        assert!(std::ptr::eq(o.get(1).unwrap(), g.get(1).unwrap()));
        assert!(g.get(3).is_none());

        // An update through the old table is visible through the new one.
        let cell = o.get(1).unwrap();
        assert!(cell.cas(4, 6));
        assert_eq!(g.get(1).map(Cell::load), Some(6));

        unsafe { Table::destroy(grown) };
    }
}
