//! Shared telemetry types for plant-scout builds.
//!
//! Holds the pieces both sides of the radio link have to agree on: the
//! GPS fix record and GGA sentence handling used by the node's position
//! worker, and the scaled-integer wire packet the controller packs once
//! per reporting round.
//!
//! The server side deliberately does NOT link against this crate for
//! unpacking; the pscout-decoder package in this workspace re-derives the
//! layout byte by byte so the tables here stay an agreement, not a shared
//! codec. Round-trip coverage lives in pscout-tests.
//!
//! Builds as no_std for microcontroller targets; the `std` feature turns
//! the plain error enums into thiserror ones for host-side builds.
#![cfg_attr(not(feature = "std"), no_std)]

pub mod nmea;
pub mod packet;

pub use nmea::{nmea_to_degrees, GpsFix, LineAssembler};
pub use packet::{CompactTelemetry, Telemetry, COMPACT_PACKET_LEN, PACKET_LEN};
