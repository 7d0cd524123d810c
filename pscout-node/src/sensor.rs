//! Collaborator contracts for the sensor drivers and the radio.
//!
//! Every driver boils down to a small set of blocking calls that return
//! either a numeric reading or an error; the pipeline treats each call
//! as independently fallible. Implementations live outside this crate
//! (hardware builds) or in pscout-tests (mocks).

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    #[error("Setup Error")]
    SetupError,
    #[error("Read Error")]
    ReadError,
    #[error("Bus Error")]
    BusError,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    #[error("Radio not ready")]
    NotReady,
    #[error("Send failed ({0})")]
    SendError(i32),
    #[error("Payload too large ({0} bytes)")]
    PayloadSize(usize),
}

/// Raw counts from the color sensor. `clear` is the unfiltered channel
/// the RGB counts get normalized against at encode time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorReading {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub clear: u16,
}

/// Acceleration per axis in m/s^2.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AccelAxes {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A single-ended ADC input (phototransistor, soil probe).
#[async_trait]
pub trait AdcChannel: Send {
    /// One blocking conversion, in millivolts.
    async fn read_millivolts(&mut self) -> Result<i32, SensorError>;

    /// Reference voltage the percentage scaling is computed against.
    fn reference_millivolts(&self) -> i32;
}

#[async_trait]
pub trait Accelerometer: Send {
    async fn read_axes(&mut self) -> Result<AccelAxes, SensorError>;
}

/// Combined temperature/humidity device. The hardware latches a
/// temperature sample while measuring relative humidity, so
/// `read_temperature` is only meaningful after a successful
/// `read_humidity` on the same device.
#[async_trait]
pub trait TempHumSensor: Send {
    async fn read_humidity(&mut self) -> Result<f32, SensorError>;
    async fn read_temperature(&mut self) -> Result<f32, SensorError>;
}

#[async_trait]
pub trait ColorSensor: Send {
    async fn read_rgbc(&mut self) -> Result<ColorReading, SensorError>;
}

/// Uplink transport. One unconfirmed payload per call; no retry, no
/// acknowledgment, delivery is best effort.
#[async_trait]
pub trait Radio: Send {
    async fn send(&mut self, payload: &[u8]) -> Result<(), RadioError>;
}
