//! Round controller: drives the acquisition handshake, snapshots the
//! store into the wire packet, and hands it to the radio.

use std::sync::Arc;

use pscout_telemetry::{CompactTelemetry, Telemetry};
use tokio::sync::Notify;

use crate::config::NodeConfig;
use crate::sensor::Radio;
use crate::store::{Channel, MeasurementStore};

/// Trigger/done pairs for the two acquisition workers. Each raise is
/// consumed by exactly one wait; a raise with no waiter is held until
/// the next wait, so worker startup order does not matter.
#[derive(Debug, Default)]
pub struct RoundSignals {
    pub sensors_trigger: Notify,
    pub sensors_done: Notify,
    pub gps_trigger: Notify,
    pub gps_done: Notify,
}

pub struct Controller {
    store: Arc<MeasurementStore>,
    signals: Arc<RoundSignals>,
    radio: Box<dyn Radio>,
    config: NodeConfig,
}

impl Controller {
    pub fn new(
        store: Arc<MeasurementStore>,
        signals: Arc<RoundSignals>,
        radio: Box<dyn Radio>,
        config: NodeConfig,
    ) -> Self {
        Self {
            store,
            signals,
            radio,
            config,
        }
    }

    /// Runs rounds forever at the configured period.
    pub async fn run(mut self) {
        log::info!("starting report rounds, period {:?}", self.config.round_period());
        loop {
            self.round().await;
            tokio::time::sleep(self.config.round_period()).await;
        }
    }

    /// One complete round: trigger both workers, wait for both
    /// completions, snapshot, transmit. There is no controller-level
    /// timeout on the waits; the workers bound their own reads where
    /// the hardware allows it.
    pub async fn round(&mut self) {
        self.signals.sensors_trigger.notify_one();
        self.signals.gps_trigger.notify_one();

        self.signals.sensors_done.notified().await;
        self.signals.gps_done.notified().await;

        let telemetry = self.snapshot();

        let result = if self.config.compact_uplink {
            self.radio.send(&CompactTelemetry::from(&telemetry).encode()).await
        } else {
            self.radio.send(&telemetry.encode()).await
        };
        match result {
            // next round's packet supersedes a failed one; no retry
            Err(e) => log::error!("uplink send failed: {e}"),
            Ok(()) => log::info!("uplink sent"),
        }

        log_report(&telemetry);
    }

    /// Reads every store cell exactly once and applies the wire scaling
    /// that is not already done at acquisition time: time splitting,
    /// color normalization against the clear channel, and the accel
    /// one-decimal reduction.
    fn snapshot(&self) -> Telemetry {
        let store = &self.store;

        let full_time = store.get(Channel::GpsTime) as u32;
        let time = [
            (full_time / 10000) as u8,
            ((full_time / 100) % 100) as u8,
            (full_time % 100) as u8,
        ];

        let clear = store.get(Channel::Clear);
        let (red_norm, green_norm, blue_norm) = if clear > 0 {
            (
                ((store.get(Channel::Red) * 100) / clear) as u8,
                ((store.get(Channel::Green) * 100) / clear) as u8,
                ((store.get(Channel::Blue) * 100) / clear) as u8,
            )
        } else {
            (0, 0, 0)
        };

        Telemetry {
            lat: store.get(Channel::GpsLat),
            lon: store.get(Channel::GpsLon),
            alt: store.get(Channel::GpsAlt),
            time,
            sats: store.get(Channel::GpsSats) as u8,
            temp: store.get(Channel::Temperature) as i16,
            hum: store.get(Channel::Humidity) as u16,
            light: store.get(Channel::Brightness) as u16,
            moisture: store.get(Channel::Moisture) as u16,
            red_norm,
            green_norm,
            blue_norm,
            accel: [
                (store.get(Channel::AccelX) / 10) as i8,
                (store.get(Channel::AccelY) / 10) as i8,
                (store.get(Channel::AccelZ) / 10) as i8,
            ],
        }
    }
}

fn log_report(t: &Telemetry) {
    log::info!("--- SENSOR REPORT ---");
    log::info!("soil moisture: {:.1}%", t.moisture as f64 / 10.0);
    log::info!("light: {:.1}%", t.light as f64 / 10.0);
    log::info!(
        "gps: sats {} | time {:02}:{:02}:{:02}",
        t.sats,
        t.time[0],
        t.time[1],
        t.time[2]
    );
    log::info!(
        "position: lat {:.6}, lon {:.6}, alt {:.2} m",
        t.lat as f64 / 1e6,
        t.lon as f64 / 1e6,
        t.alt as f64 / 100.0
    );
    log::info!(
        "color: r {}% g {}% b {}%",
        t.red_norm,
        t.green_norm,
        t.blue_norm
    );
    log::info!(
        "accel: x {:.1} y {:.1} z {:.1} m/s2",
        t.accel[0] as f64 / 10.0,
        t.accel[1] as f64 / 10.0,
        t.accel[2] as f64 / 10.0
    );
    log::info!(
        "temp: {:.2} C | hum: {:.2}%",
        t.temp as f64 / 100.0,
        t.hum as f64 / 100.0
    );
}
