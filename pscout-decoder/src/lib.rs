//! Server-side decoder for plant-scout uplink payloads.
//!
//! Takes the payload as delivered by the network backend (a hex string
//! or raw bytes) and recovers the physical values the node started
//! from. The byte layout is re-derived here field by field rather than
//! shared with the node: every multi-byte value is combined explicitly
//! under the little-endian rule, with explicit two's-complement
//! correction for the signed fields, so the decoder works the same on
//! any host regardless of native byte order or available conversion
//! helpers.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Full-suite payload size in bytes.
pub const PAYLOAD_LEN: usize = 30;
/// Reduced-build payload size in bytes.
pub const COMPACT_PAYLOAD_LEN: usize = 14;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Hex Error")]
    Hex(#[from] hex::FromHexError),
    #[error("Unexpected payload length {0}")]
    PayloadLength(usize),
}

/// Physical values recovered from a full-suite payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Report {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_m: f64,
    pub time: String,
    pub satellites: u8,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub light_pct: f64,
    pub moisture_pct: f64,
    pub red_pct: u8,
    pub green_pct: u8,
    pub blue_pct: u8,
    pub accel_ms2: [f64; 3],
    /// Receipt timestamp, seconds since the epoch; stamped by the caller.
    pub ts: i64,
}

/// Physical values recovered from a reduced-build payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompactReport {
    pub light_pct: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub ts: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum DecodedPayload {
    Full(Report),
    Compact(CompactReport),
}

/// Combines `bytes` little-endian into an unsigned value.
fn unsigned_le(bytes: &[u8]) -> u64 {
    let mut value = 0u64;
    for (i, byte) in bytes.iter().enumerate() {
        value |= (*byte as u64) << (8 * i);
    }
    value
}

/// Combines `bytes` little-endian and applies two's-complement
/// correction for the declared width.
fn signed_le(bytes: &[u8]) -> i64 {
    let raw = unsigned_le(bytes);
    let width = 8 * bytes.len() as u32;
    if raw >= 1u64 << (width - 1) {
        raw as i64 - (1i64 << width)
    } else {
        raw as i64
    }
}

fn signed_byte(byte: u8) -> i64 {
    if byte > 127 {
        byte as i64 - 256
    } else {
        byte as i64
    }
}

/// Decodes a payload, selecting the layout by length.
pub fn decode(payload: &[u8]) -> Result<DecodedPayload, DecodeError> {
    match payload.len() {
        PAYLOAD_LEN => Ok(DecodedPayload::Full(decode_full(payload))),
        COMPACT_PAYLOAD_LEN => Ok(DecodedPayload::Compact(decode_compact(payload))),
        len => Err(DecodeError::PayloadLength(len)),
    }
}

/// Decodes a payload delivered as a hex string.
pub fn decode_hex(payload: &str) -> Result<DecodedPayload, DecodeError> {
    let bytes = hex::decode(payload.trim())?;
    decode(&bytes)
}

fn decode_full(p: &[u8]) -> Report {
    Report {
        latitude: signed_le(&p[0..4]) as f64 / 1e6,
        longitude: signed_le(&p[4..8]) as f64 / 1e6,
        altitude_m: signed_le(&p[8..12]) as f64 / 100.0,
        time: format!("{:02}:{:02}:{:02}", p[12], p[13], p[14]),
        satellites: p[15],
        temperature_c: signed_le(&p[16..18]) as f64 / 100.0,
        humidity_pct: unsigned_le(&p[18..20]) as f64 / 100.0,
        light_pct: unsigned_le(&p[20..22]) as f64 / 10.0,
        moisture_pct: unsigned_le(&p[22..24]) as f64 / 10.0,
        red_pct: p[24],
        green_pct: p[25],
        blue_pct: p[26],
        accel_ms2: [
            signed_byte(p[27]) as f64 / 10.0,
            signed_byte(p[28]) as f64 / 10.0,
            signed_byte(p[29]) as f64 / 10.0,
        ],
        ts: 0,
    }
}

fn decode_compact(p: &[u8]) -> CompactReport {
    CompactReport {
        light_pct: unsigned_le(&p[0..2]) as f64 / 10.0,
        latitude: signed_le(&p[2..6]) as f64 / 1e6,
        longitude: signed_le(&p[6..10]) as f64 / 1e6,
        temperature_c: signed_le(&p[10..12]) as f64 / 100.0,
        humidity_pct: unsigned_le(&p[12..14]) as f64 / 100.0,
        ts: 0,
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- SENSOR REPORT ---")?;
        writeln!(f, "SOIL MOISTURE: {:.1}%", self.moisture_pct)?;
        writeln!(f, "LIGHT: {:.1}%", self.light_pct)?;
        writeln!(f, "GPS: #Sats: {} | Time: {}", self.satellites, self.time)?;
        writeln!(
            f,
            "GPS POS: Lat: {:.6}, Lon: {:.6}, Alt: {:.2} m",
            self.latitude, self.longitude, self.altitude_m
        )?;
        writeln!(
            f,
            "COLOR: R:{}% G:{}% B:{}%",
            self.red_pct, self.green_pct, self.blue_pct
        )?;
        writeln!(
            f,
            "ACCELEROMETER: X: {:.1} m/s2, Y: {:.1} m/s2, Z: {:.1} m/s2",
            self.accel_ms2[0], self.accel_ms2[1], self.accel_ms2[2]
        )?;
        writeln!(
            f,
            "TEMP: {:.2} C | HUM: {:.2} %",
            self.temperature_c, self.humidity_pct
        )?;
        write!(f, "---------------------")
    }
}

impl fmt::Display for CompactReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- SENSOR REPORT ---")?;
        writeln!(f, "LIGHT: {:.1}%", self.light_pct)?;
        writeln!(
            f,
            "GPS POS: Lat: {:.6}, Lon: {:.6}",
            self.latitude, self.longitude
        )?;
        writeln!(
            f,
            "TEMP: {:.2} C | HUM: {:.2} %",
            self.temperature_c, self.humidity_pct
        )?;
        write!(f, "---------------------")
    }
}
