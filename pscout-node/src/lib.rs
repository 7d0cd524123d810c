//! The plant-scout node pipeline.
//!
//! One controller task drives two acquisition workers over a
//! trigger/completion handshake, once per reporting round:
//!
//! 1. the environmental worker polls the ADC and I2C sensor collaborators
//!    and writes scaled integers into the shared [`store::MeasurementStore`]
//! 2. the position worker waits (bounded) for the latest parsed GGA fix
//!    coming out of the free-running serial intake and stores it
//! 3. the controller snapshots the store into the wire packet and hands
//!    it to the radio collaborator, then sleeps out the round period
//!
//! Sensor drivers, the radio stack, and the status LED are external
//! collaborators behind the traits in [`sensor`] and [`led`]; everything
//! they do is treated as fallible and a failed read never aborts a round.

pub mod config;
pub mod controller;
pub mod gps;
pub mod led;
pub mod sensor;
pub mod sensors;
pub mod store;

pub use config::{HomePosition, NodeConfig};
pub use controller::{Controller, RoundSignals};
pub use store::{Channel, MeasurementStore};
