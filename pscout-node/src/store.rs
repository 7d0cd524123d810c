//! Latest-value measurement store shared by the acquisition workers and
//! the round controller.

use std::sync::atomic::{AtomicI32, Ordering};

/// One cell per sensor channel. Values are already scaled integers (see
/// the packet layout in pscout-telemetry for the per-channel scaling).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Channel {
    Brightness,
    Moisture,
    AccelX,
    AccelY,
    AccelZ,
    Temperature,
    Humidity,
    Red,
    Green,
    Blue,
    Clear,
    GpsLat,
    GpsLon,
    GpsAlt,
    GpsSats,
    GpsTime,
}

const CHANNEL_COUNT: usize = 16;

/// Per-cell atomic overwrite store. `set` never fails, `get` never
/// blocks, and only same-channel last-writer-wins is guaranteed; there
/// are no cross-cell transactions. Cross-task visibility of a round's
/// writes comes from the trigger/done handshake, not from the cells.
#[derive(Debug, Default)]
pub struct MeasurementStore {
    cells: [AtomicI32; CHANNEL_COUNT],
}

impl MeasurementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, channel: Channel, value: i32) {
        self.cells[channel as usize].store(value, Ordering::Relaxed);
    }

    pub fn get(&self, channel: Channel) -> i32 {
        self.cells[channel as usize].load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_default_to_zero() {
        let store = MeasurementStore::new();
        assert_eq!(store.get(Channel::Brightness), 0);
        assert_eq!(store.get(Channel::GpsTime), 0);
    }

    #[test]
    fn last_writer_wins_per_channel() {
        let store = MeasurementStore::new();
        store.set(Channel::Moisture, 512);
        store.set(Channel::Moisture, 513);
        assert_eq!(store.get(Channel::Moisture), 513);
        // disjoint channels are untouched
        assert_eq!(store.get(Channel::Brightness), 0);
    }

    #[test]
    fn negative_values_survive() {
        let store = MeasurementStore::new();
        store.set(Channel::GpsTime, -1);
        assert_eq!(store.get(Channel::GpsTime), -1);
        store.set(Channel::GpsLat, -33_868_820);
        assert_eq!(store.get(Channel::GpsLat), -33_868_820);
    }
}
