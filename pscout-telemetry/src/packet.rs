//! Uplink packet layouts.
//!
//! Both layouts are packed little-endian with no padding, one field at a
//! time; nothing here relies on native struct layout. The full layout is
//! what the standard sensor-suite build reports; the compact layout is
//! for the reduced build (light + position + temperature/humidity).

use serde::{Deserialize, Serialize};

/// Full-suite payload size in bytes.
pub const PACKET_LEN: usize = 30;
/// Reduced-build payload size in bytes.
pub const COMPACT_PACKET_LEN: usize = 14;

/// One round's snapshot, already scaled for the wire.
///
/// Field encodings:
/// - `lat`/`lon`: degrees x 1e6
/// - `alt`: meters x 100
/// - `time`: wall clock as `[hours, minutes, seconds]`
/// - `temp`: Celsius x 100, `hum`: %RH x 100
/// - `light`/`moisture`: percent x 10
/// - `red_norm`/`green_norm`/`blue_norm`: percent of the clear channel
/// - `accel`: (m/s^2 x 100) / 10 per axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Telemetry {
    pub lat: i32,
    pub lon: i32,
    pub alt: i32,
    pub time: [u8; 3],
    pub sats: u8,
    pub temp: i16,
    pub hum: u16,
    pub light: u16,
    pub moisture: u16,
    pub red_norm: u8,
    pub green_norm: u8,
    pub blue_norm: u8,
    pub accel: [i8; 3],
}

impl Telemetry {
    pub fn encode(&self) -> [u8; PACKET_LEN] {
        let mut buf = [0u8; PACKET_LEN];
        buf[0..4].copy_from_slice(&self.lat.to_le_bytes());
        buf[4..8].copy_from_slice(&self.lon.to_le_bytes());
        buf[8..12].copy_from_slice(&self.alt.to_le_bytes());
        buf[12] = self.time[0];
        buf[13] = self.time[1];
        buf[14] = self.time[2];
        buf[15] = self.sats;
        buf[16..18].copy_from_slice(&self.temp.to_le_bytes());
        buf[18..20].copy_from_slice(&self.hum.to_le_bytes());
        buf[20..22].copy_from_slice(&self.light.to_le_bytes());
        buf[22..24].copy_from_slice(&self.moisture.to_le_bytes());
        buf[24] = self.red_norm;
        buf[25] = self.green_norm;
        buf[26] = self.blue_norm;
        buf[27] = self.accel[0] as u8;
        buf[28] = self.accel[1] as u8;
        buf[29] = self.accel[2] as u8;
        buf
    }
}

/// Reduced-build snapshot: ambient light plus position and temp/hum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactTelemetry {
    pub light: u16,
    pub lat: i32,
    pub lon: i32,
    pub temp: i16,
    pub hum: u16,
}

impl CompactTelemetry {
    pub fn encode(&self) -> [u8; COMPACT_PACKET_LEN] {
        let mut buf = [0u8; COMPACT_PACKET_LEN];
        buf[0..2].copy_from_slice(&self.light.to_le_bytes());
        buf[2..6].copy_from_slice(&self.lat.to_le_bytes());
        buf[6..10].copy_from_slice(&self.lon.to_le_bytes());
        buf[10..12].copy_from_slice(&self.temp.to_le_bytes());
        buf[12..14].copy_from_slice(&self.hum.to_le_bytes());
        buf
    }
}

impl From<&Telemetry> for CompactTelemetry {
    fn from(full: &Telemetry) -> Self {
        Self {
            light: full.light,
            lat: full.lat,
            lon: full.lon,
            temp: full.temp,
            hum: full.hum,
        }
    }
}
