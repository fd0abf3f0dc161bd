use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::domain::order::SequenceId;
use crate::domain::slot::Slot;

pub const DEFAULT_SLOT_CAPACITY: u8 = 2;

/// Process-wide delivery-slot booking board, shared by every active
/// conversation. Bookings never decrement and slots are never reopened
/// within a run; there is no cancellation path.
pub struct SlotBoard {
    slots: Vec<Slot>,
    capacity: u8,
    booked: Mutex<BTreeMap<Slot, u8>>,
}

impl SlotBoard {
    /// Evening delivery window of the source system: 19:00 to 23:00
    /// inclusive, 15-minute steps.
    pub fn evening(capacity: u8) -> Self {
        let start = Slot::new(19, 0).expect("valid window start");
        let end = Slot::new(23, 0).expect("valid window end");
        Self::with_window(start, end, capacity)
    }

    pub fn with_window(start: Slot, end: Slot, capacity: u8) -> Self {
        let mut slots = Vec::new();
        let mut current = Some(start);
        while let Some(slot) = current {
            if slot > end {
                break;
            }
            slots.push(slot);
            current = slot.succ();
        }
        Self { slots, capacity, booked: Mutex::new(BTreeMap::new()) }
    }

    pub fn capacity(&self) -> u8 {
        self.capacity
    }

    /// Ordered list of slots still under capacity.
    pub fn available_slots(&self) -> Vec<Slot> {
        let booked = self.booked.lock().expect("slot board lock");
        self.slots
            .iter()
            .copied()
            .filter(|slot| booked.get(slot).copied().unwrap_or(0) < self.capacity)
            .collect()
    }

    /// Books one delivery into `slot`. The capacity check and the
    /// increment happen under a single lock so concurrent bookings cannot
    /// both observe free capacity and overshoot the ceiling.
    pub fn book(&self, slot: Slot) -> bool {
        if !self.slots.contains(&slot) {
            return false;
        }
        let mut booked = self.booked.lock().expect("slot board lock");
        let count = booked.entry(slot).or_insert(0);
        if *count >= self.capacity {
            return false;
        }
        *count += 1;
        true
    }

    pub fn booked_count(&self, slot: Slot) -> u8 {
        self.booked.lock().expect("slot board lock").get(&slot).copied().unwrap_or(0)
    }
}

/// Process-wide order number source. Owned and injected, never a global:
/// ids are monotonically increasing and never reused, even when the order
/// that claimed one is later restarted.
#[derive(Debug, Default)]
pub struct SequenceCounter {
    next: AtomicU64,
}

impl SequenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> SequenceId {
        SequenceId(self.next.fetch_add(1, Ordering::Relaxed) + 1)
    }
}
