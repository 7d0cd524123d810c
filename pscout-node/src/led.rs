//! Downlink command handling for the status LED.
//!
//! The transport's downlink channel delivers short ASCII tokens; they
//! drive the RGB status LED collaborator and nothing else. Unknown
//! tokens are logged and dropped.

use tokio::sync::mpsc;

use crate::sensor::SensorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedCommand {
    Off,
    Red,
    Green,
}

impl LedCommand {
    pub fn parse(payload: &[u8]) -> Option<Self> {
        match payload {
            b"OFF" => Some(Self::Off),
            b"Red" => Some(Self::Red),
            b"Green" => Some(Self::Green),
            _ => None,
        }
    }
}

pub trait StatusLed: Send {
    fn apply(&mut self, command: LedCommand) -> Result<(), SensorError>;
}

/// Applies downlink payloads to the LED until the channel closes.
pub async fn run_downlink(
    mut commands: mpsc::UnboundedReceiver<Vec<u8>>,
    mut led: Box<dyn StatusLed>,
) {
    while let Some(payload) = commands.recv().await {
        match LedCommand::parse(&payload) {
            Some(command) => {
                log::info!("downlink command: {command:?}");
                if let Err(e) = led.apply(command) {
                    log::error!("status led error: {e}");
                }
            }
            None => log::warn!(
                "unrecognized downlink payload ({} bytes), ignoring",
                payload.len()
            ),
        }
    }
}
