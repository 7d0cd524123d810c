//! Runs the full node pipeline against simulated collaborators: a
//! replayed GGA stream, fixed sensor readings, and a radio that decodes
//! its own uplinks with the server-side decoder so the round trip is
//! visible in the logs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pscout_node::sensor::{AccelAxes, ColorReading, Radio, RadioError};
use pscout_node::sensors::EnvironmentalSensors;
use pscout_node::{gps, led, sensors, Controller, MeasurementStore, NodeConfig, RoundSignals};
use pscout_tests::mocks::{feed_sentence, RecordingLed, SimAccel, SimAdc, SimColor, SimTempHum};
use tokio::sync::mpsc;

const GGA_SENTENCES: &[&str] = &[
    "$GPGGA,123456.00,3542.5797,N,13948.6476,E,1,08,0.9,43.5,M,39.5,M,,*47\r\n",
    "$GPGGA,123457.00,3542.5801,N,13948.6470,E,1,09,0.8,43.7,M,39.5,M,,*41\r\n",
    "$GNGGA,123458.00,3542.5805,N,13948.6465,E,1,09,0.8,43.9,M,39.5,M,,*4C\r\n",
];

/// Logs each uplink as hex and immediately decodes it back.
struct LoopbackRadio;

#[async_trait]
impl Radio for LoopbackRadio {
    async fn send(&mut self, payload: &[u8]) -> Result<(), RadioError> {
        if payload.len() > pscout_telemetry::PACKET_LEN {
            return Err(RadioError::PayloadSize(payload.len()));
        }
        log::info!("uplink payload: {}", hex::encode(payload));
        match pscout_decoder::decode(payload) {
            Ok(decoded) => log::info!("server side would see: {decoded:?}"),
            Err(e) => log::error!("decoder rejected our own payload: {e}"),
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    log::info!("Initializing simulated node");

    let config = NodeConfig {
        round_period_millis: 5_000,
        ..NodeConfig::default()
    };

    let store = Arc::new(MeasurementStore::new());
    let signals = Arc::new(RoundSignals::default());

    let (brightness, _, _) = SimAdc::new(1650, 3300);
    let (moisture, moisture_mv, _) = SimAdc::new(825, 3300);
    let (temp_hum, _) = SimTempHum::new(48.25, 21.5);
    let env = EnvironmentalSensors {
        brightness: Box::new(brightness),
        moisture: Box::new(moisture),
        accelerometer: Box::new(SimAccel {
            axes: AccelAxes {
                x: 0.1,
                y: -0.5,
                z: 9.8125,
            },
        }),
        temp_hum: Box::new(temp_hum),
        color: Box::new(SimColor {
            reading: ColorReading {
                red: 100,
                green: 200,
                blue: 50,
                clear: 400,
            },
        }),
    };
    tokio::spawn(sensors::run(env, store.clone(), signals.clone()));

    let (serial_tx, serial_rx) = mpsc::unbounded_channel();
    let (fix_tx, fix_rx) = gps::fix_channel();
    tokio::spawn(gps::run_serial_intake(serial_rx, fix_tx));
    tokio::spawn(gps::run(
        store.clone(),
        signals.clone(),
        fix_rx,
        config.clone(),
    ));

    // replayed receiver output, one sentence a second
    tokio::spawn(async move {
        for &sentence in GGA_SENTENCES.iter().cycle() {
            feed_sentence(&serial_tx, sentence);
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    });

    // slow moisture drift so successive reports differ
    tokio::spawn(async move {
        let mut mv = 825;
        loop {
            tokio::time::sleep(Duration::from_secs(7)).await;
            mv = (mv + 33) % 3300;
            moisture_mv.store(mv, std::sync::atomic::Ordering::Relaxed);
        }
    });

    // downlink demo: ask for a green LED shortly after startup
    let (status_led, _) = RecordingLed::new();
    let (downlink_tx, downlink_rx) = mpsc::unbounded_channel();
    tokio::spawn(led::run_downlink(downlink_rx, Box::new(status_led)));
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(3)).await;
        downlink_tx.send(b"Green".to_vec()).ok();
    });

    log::info!("Starting to send data...");
    Controller::new(store, signals, Box::new(LoopbackRadio), config)
        .run()
        .await;

    Ok(())
}
