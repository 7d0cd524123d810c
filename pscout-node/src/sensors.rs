//! Environmental acquisition worker.
//!
//! Waits for the controller's round trigger, performs one blocking read
//! per collaborator in a fixed order, writes whatever succeeded into the
//! store, and signals completion. A failed read is logged and leaves the
//! previous value in place; a round is never aborted by a single sensor.

use std::sync::Arc;

use crate::controller::RoundSignals;
use crate::sensor::{Accelerometer, AdcChannel, ColorSensor, TempHumSensor};
use crate::store::{Channel, MeasurementStore};

pub struct EnvironmentalSensors {
    pub brightness: Box<dyn AdcChannel>,
    pub moisture: Box<dyn AdcChannel>,
    pub accelerometer: Box<dyn Accelerometer>,
    pub temp_hum: Box<dyn TempHumSensor>,
    pub color: Box<dyn ColorSensor>,
}

pub async fn run(
    mut sensors: EnvironmentalSensors,
    store: Arc<MeasurementStore>,
    signals: Arc<RoundSignals>,
) {
    loop {
        signals.sensors_trigger.notified().await;
        sample_round(&mut sensors, &store).await;
        signals.sensors_done.notify_one();
    }
}

pub(crate) async fn sample_round(sensors: &mut EnvironmentalSensors, store: &MeasurementStore) {
    read_adc_percentage(
        sensors.brightness.as_mut(),
        store,
        Channel::Brightness,
        "brightness",
    )
    .await;
    read_adc_percentage(
        sensors.moisture.as_mut(),
        store,
        Channel::Moisture,
        "moisture",
    )
    .await;
    read_accelerometer(sensors.accelerometer.as_mut(), store).await;
    read_temperature_humidity(sensors.temp_hum.as_mut(), store).await;
    read_color(sensors.color.as_mut(), store).await;
}

/// Raw millivolts to percent x 10 against the channel's reference.
async fn read_adc_percentage(
    adc: &mut dyn AdcChannel,
    store: &MeasurementStore,
    channel: Channel,
    label: &str,
) {
    match adc.read_millivolts().await {
        Ok(mv) => {
            let percent10 = (mv * 1000) / adc.reference_millivolts();
            store.set(channel, percent10);
        }
        Err(e) => log::error!("{label} read error: {e}"),
    }
}

async fn read_accelerometer(accel: &mut dyn Accelerometer, store: &MeasurementStore) {
    match accel.read_axes().await {
        Ok(axes) => {
            store.set(Channel::AccelX, (axes.x * 100.0) as i32);
            store.set(Channel::AccelY, (axes.y * 100.0) as i32);
            store.set(Channel::AccelZ, (axes.z * 100.0) as i32);
        }
        Err(e) => log::error!("accelerometer read error: {e}"),
    }
}

/// Humidity first; the device latches the paired temperature sample
/// during that measurement. If either step fails neither value is
/// stored, so the pair stays consistent.
async fn read_temperature_humidity(dev: &mut dyn TempHumSensor, store: &MeasurementStore) {
    let humidity = match dev.read_humidity().await {
        Ok(h) => h,
        Err(e) => {
            log::error!("humidity read error: {e}");
            return;
        }
    };
    let temperature = match dev.read_temperature().await {
        Ok(t) => t,
        Err(e) => {
            log::error!("temperature read error: {e}");
            return;
        }
    };
    store.set(Channel::Humidity, (humidity * 100.0) as i32);
    store.set(Channel::Temperature, (temperature * 100.0) as i32);
}

async fn read_color(color: &mut dyn ColorSensor, store: &MeasurementStore) {
    match color.read_rgbc().await {
        Ok(reading) => {
            store.set(Channel::Red, reading.red as i32);
            store.set(Channel::Green, reading.green as i32);
            store.set(Channel::Blue, reading.blue as i32);
            // clear is the divisor for normalization at encode time
            store.set(Channel::Clear, reading.clear.max(1) as i32);
        }
        Err(e) => log::error!("color read error: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{AccelAxes, ColorReading, SensorError};
    use async_trait::async_trait;

    struct Adc(Result<i32, SensorError>);

    #[async_trait]
    impl AdcChannel for Adc {
        async fn read_millivolts(&mut self) -> Result<i32, SensorError> {
            self.0
        }
        fn reference_millivolts(&self) -> i32 {
            3300
        }
    }

    struct Accel(Result<AccelAxes, SensorError>);

    #[async_trait]
    impl Accelerometer for Accel {
        async fn read_axes(&mut self) -> Result<AccelAxes, SensorError> {
            self.0
        }
    }

    struct TempHum {
        hum: Result<f32, SensorError>,
        temp: Result<f32, SensorError>,
    }

    #[async_trait]
    impl TempHumSensor for TempHum {
        async fn read_humidity(&mut self) -> Result<f32, SensorError> {
            self.hum
        }
        async fn read_temperature(&mut self) -> Result<f32, SensorError> {
            self.temp
        }
    }

    struct Color(Result<ColorReading, SensorError>);

    #[async_trait]
    impl ColorSensor for Color {
        async fn read_rgbc(&mut self) -> Result<ColorReading, SensorError> {
            self.0
        }
    }

    fn sensors(
        brightness: Result<i32, SensorError>,
        hum: Result<f32, SensorError>,
        temp: Result<f32, SensorError>,
        color: Result<ColorReading, SensorError>,
    ) -> EnvironmentalSensors {
        EnvironmentalSensors {
            brightness: Box::new(Adc(brightness)),
            moisture: Box::new(Adc(Ok(1650))),
            accelerometer: Box::new(Accel(Ok(AccelAxes {
                x: 0.1,
                y: -0.5,
                z: 9.8125,
            }))),
            temp_hum: Box::new(TempHum { hum, temp }),
            color: Box::new(Color(color)),
        }
    }

    #[tokio::test]
    async fn scales_adc_reading_to_percent_x10() {
        let store = MeasurementStore::new();
        let mut s = sensors(
            Ok(1650),
            Ok(48.25),
            Ok(21.5),
            Ok(ColorReading {
                red: 100,
                green: 200,
                blue: 50,
                clear: 400,
            }),
        );
        sample_round(&mut s, &store).await;

        // 1650 mV against a 3300 mV reference is 50.0%
        assert_eq!(store.get(Channel::Brightness), 500);
        assert_eq!(store.get(Channel::Moisture), 500);
        assert_eq!(store.get(Channel::AccelX), 10);
        assert_eq!(store.get(Channel::AccelY), -50);
        assert_eq!(store.get(Channel::AccelZ), 981);
        assert_eq!(store.get(Channel::Humidity), 4825);
        assert_eq!(store.get(Channel::Temperature), 2150);
        assert_eq!(store.get(Channel::Red), 100);
        assert_eq!(store.get(Channel::Clear), 400);
    }

    #[tokio::test]
    async fn failed_read_retains_previous_value() {
        let store = MeasurementStore::new();
        store.set(Channel::Brightness, 473);

        let mut s = sensors(
            Err(SensorError::ReadError),
            Ok(48.25),
            Ok(21.5),
            Ok(ColorReading::default()),
        );
        sample_round(&mut s, &store).await;

        assert_eq!(store.get(Channel::Brightness), 473);
        // the rest of the round still ran
        assert_eq!(store.get(Channel::Moisture), 500);
    }

    #[tokio::test]
    async fn humidity_failure_skips_paired_temperature() {
        let store = MeasurementStore::new();
        store.set(Channel::Temperature, 1999);
        store.set(Channel::Humidity, 3999);

        let mut s = sensors(
            Ok(1650),
            Err(SensorError::ReadError),
            Ok(21.5),
            Ok(ColorReading::default()),
        );
        sample_round(&mut s, &store).await;

        assert_eq!(store.get(Channel::Temperature), 1999);
        assert_eq!(store.get(Channel::Humidity), 3999);
    }

    #[tokio::test]
    async fn temperature_failure_stores_neither() {
        let store = MeasurementStore::new();
        let mut s = sensors(
            Ok(1650),
            Ok(48.25),
            Err(SensorError::BusError),
            Ok(ColorReading::default()),
        );
        sample_round(&mut s, &store).await;

        assert_eq!(store.get(Channel::Humidity), 0);
        assert_eq!(store.get(Channel::Temperature), 0);
    }

    #[tokio::test]
    async fn clear_channel_is_floored_to_one() {
        let store = MeasurementStore::new();
        let mut s = sensors(
            Ok(1650),
            Ok(48.25),
            Ok(21.5),
            Ok(ColorReading {
                red: 10,
                green: 10,
                blue: 10,
                clear: 0,
            }),
        );
        sample_round(&mut s, &store).await;

        assert_eq!(store.get(Channel::Clear), 1);
    }
}
