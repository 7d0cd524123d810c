//! Position acquisition worker and serial intake.
//!
//! The intake is free-running: it drains the serial byte channel as fast
//! as bytes arrive, feeds the line assembler, and publishes each parsed
//! fix into a single-slot watch handoff, overwriting anything the worker
//! has not consumed yet. The worker itself only runs on the controller's
//! round trigger and bounds its wait for a fresh fix.

use std::sync::Arc;

use pscout_telemetry::nmea::LineAssembler;
use pscout_telemetry::GpsFix;
use tokio::sync::{mpsc, watch};

use crate::config::{HomePosition, NodeConfig};
use crate::controller::RoundSignals;
use crate::store::{Channel, MeasurementStore};

pub type FixSender = watch::Sender<Option<GpsFix>>;
pub type FixReceiver = watch::Receiver<Option<GpsFix>>;

/// Single-slot handoff between the intake and the position worker.
pub fn fix_channel() -> (FixSender, FixReceiver) {
    watch::channel(None)
}

/// Drains the serial byte stream into the line assembler and publishes
/// parsed fixes. Runs until the byte channel closes. Publishing never
/// waits on the consumer.
pub async fn run_serial_intake(mut bytes: mpsc::UnboundedReceiver<u8>, fixes: FixSender) {
    let mut assembler = LineAssembler::new();
    while let Some(byte) = bytes.recv().await {
        if let Some(fix) = assembler.push_byte(byte) {
            log::trace!("parsed fix: {} sats", fix.sats);
            fixes.send_replace(Some(fix));
        }
    }
    log::warn!("serial byte channel closed, intake exiting");
}

/// Round loop: trigger in, bounded fix wait, store update, done out.
/// A timeout leaves the previous position values in place and still
/// completes the round.
pub async fn run(
    store: Arc<MeasurementStore>,
    signals: Arc<RoundSignals>,
    mut fixes: FixReceiver,
    config: NodeConfig,
) {
    loop {
        signals.gps_trigger.notified().await;
        match tokio::time::timeout(config.fix_wait(), fixes.changed()).await {
            Ok(Ok(())) => {
                let fix = fixes.borrow_and_update().clone();
                if let Some(fix) = fix {
                    update_store(&fix, &store, &config.home);
                }
            }
            Ok(Err(_)) => log::warn!("fix handoff closed, no more position updates"),
            Err(_) => log::warn!("timeout: no position sentence received"),
        }
        signals.gps_done.notify_one();
    }
}

/// Writes one fix into the store as scaled integers.
pub(crate) fn update_store(fix: &GpsFix, store: &MeasurementStore, home: &HomePosition) {
    if fix.lat == 0.0 && fix.lon == 0.0 && fix.alt == 0.0 {
        // no satellite lock yet; report the configured home position
        // instead of a bogus (0, 0, 0)
        store.set(Channel::GpsLat, (home.lat * 1e6) as i32);
        store.set(Channel::GpsLon, (home.lon * 1e6) as i32);
        store.set(Channel::GpsAlt, (home.alt * 100.0) as i32);
    } else {
        store.set(Channel::GpsLat, (fix.lat * 1e6) as i32);
        store.set(Channel::GpsLon, (fix.lon * 1e6) as i32);
        store.set(Channel::GpsAlt, (fix.alt * 100.0) as i32);
    }

    store.set(Channel::GpsSats, fix.sats as i32);

    let utc = fix.utc.as_bytes();
    if utc.len() >= 6 {
        let digit = |i: usize| utc[i] as i32 - '0' as i32;
        // the hour goes on the wire with a +1 offset
        let hh = digit(0) * 10 + digit(1) + 1;
        let mm = digit(2) * 10 + digit(3);
        let ss = digit(4) * 10 + digit(5);
        store.set(Channel::GpsTime, hh * 10000 + mm * 100 + ss);
    } else {
        store.set(Channel::GpsTime, -1);
    }
}
