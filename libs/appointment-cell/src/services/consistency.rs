// libs/appointment-cell/src/services/consistency.rs
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tracing::debug;

/// In-process guard that serializes the authoritative check-and-insert for
/// one slot. Two submissions for the same `(doctor, date, time)` racing
/// inside this process cannot interleave between check and insert; the
/// loser is turned away immediately.
///
/// This does not cover multiple server processes sharing one store. Across
/// processes the check-then-act window remains, bounded by a store-level
/// unique constraint on the triple where the store supports one.
#[derive(Clone, Default)]
pub struct SlotGuard {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl SlotGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot_key(doctor: &str, date: NaiveDate, time: &str) -> String {
        format!("{}|{}|{}", doctor, date, time)
    }

    /// Claim a slot for the duration of one booking attempt. Returns `None`
    /// when another attempt for the same slot is already in flight.
    pub fn try_acquire(&self, key: &str) -> Option<SlotPermit> {
        let mut in_flight = self.in_flight.lock().unwrap();

        if in_flight.contains(key) {
            debug!("Slot {} already has a booking attempt in flight", key);
            return None;
        }

        in_flight.insert(key.to_string());
        Some(SlotPermit {
            key: key.to_string(),
            registry: Arc::clone(&self.in_flight),
        })
    }
}

/// Releases the claimed slot on drop, whether the booking succeeded or not.
pub struct SlotPermit {
    key: String,
    registry: Arc<Mutex<HashSet<String>>>,
}

impl Drop for SlotPermit {
    fn drop(&mut self) {
        if let Ok(mut in_flight) = self.registry.lock() {
            in_flight.remove(&self.key);
        }
    }
}
