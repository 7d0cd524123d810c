//! Mock collaborators and end-to-end coverage for the node pipeline.
//!
//! The mocks stand in for the hardware drivers and the radio stack so
//! the full trigger/acquire/encode/transmit round can run on a dev
//! machine. The node-sim-test bin drives them continuously; the test
//! module here drives single rounds and checks the uplink bytes against
//! the server-side decoder.

pub mod mocks {
    use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use pscout_node::led::{LedCommand, StatusLed};
    use pscout_node::sensor::{
        AccelAxes, Accelerometer, AdcChannel, ColorReading, ColorSensor, Radio, RadioError,
        SensorError, TempHumSensor,
    };
    use tokio::sync::mpsc;

    /// ADC input returning a settable millivolt value. Flip `fail` to
    /// make every read report an error.
    pub struct SimAdc {
        pub millivolts: Arc<AtomicI32>,
        pub reference: i32,
        pub fail: Arc<AtomicBool>,
    }

    impl SimAdc {
        pub fn new(millivolts: i32, reference: i32) -> (Self, Arc<AtomicI32>, Arc<AtomicBool>) {
            let mv = Arc::new(AtomicI32::new(millivolts));
            let fail = Arc::new(AtomicBool::new(false));
            (
                Self {
                    millivolts: mv.clone(),
                    reference,
                    fail: fail.clone(),
                },
                mv,
                fail,
            )
        }
    }

    #[async_trait]
    impl AdcChannel for SimAdc {
        async fn read_millivolts(&mut self) -> Result<i32, SensorError> {
            if self.fail.load(Ordering::Relaxed) {
                return Err(SensorError::ReadError);
            }
            Ok(self.millivolts.load(Ordering::Relaxed))
        }

        fn reference_millivolts(&self) -> i32 {
            self.reference
        }
    }

    pub struct SimAccel {
        pub axes: AccelAxes,
    }

    #[async_trait]
    impl Accelerometer for SimAccel {
        async fn read_axes(&mut self) -> Result<AccelAxes, SensorError> {
            Ok(self.axes)
        }
    }

    pub struct SimTempHum {
        pub humidity: f32,
        pub temperature: f32,
        pub fail: Arc<AtomicBool>,
    }

    impl SimTempHum {
        pub fn new(humidity: f32, temperature: f32) -> (Self, Arc<AtomicBool>) {
            let fail = Arc::new(AtomicBool::new(false));
            (
                Self {
                    humidity,
                    temperature,
                    fail: fail.clone(),
                },
                fail,
            )
        }
    }

    #[async_trait]
    impl TempHumSensor for SimTempHum {
        async fn read_humidity(&mut self) -> Result<f32, SensorError> {
            if self.fail.load(Ordering::Relaxed) {
                return Err(SensorError::ReadError);
            }
            Ok(self.humidity)
        }

        async fn read_temperature(&mut self) -> Result<f32, SensorError> {
            if self.fail.load(Ordering::Relaxed) {
                return Err(SensorError::ReadError);
            }
            Ok(self.temperature)
        }
    }

    pub struct SimColor {
        pub reading: ColorReading,
    }

    #[async_trait]
    impl ColorSensor for SimColor {
        async fn read_rgbc(&mut self) -> Result<ColorReading, SensorError> {
            Ok(self.reading)
        }
    }

    /// Radio that records every payload it is handed.
    pub struct CapturingRadio {
        pub sent: Arc<Mutex<Vec<Vec<u8>>>>,
        pub fail: Arc<AtomicBool>,
    }

    impl CapturingRadio {
        pub fn new() -> (Self, Arc<Mutex<Vec<Vec<u8>>>>, Arc<AtomicBool>) {
            let sent = Arc::new(Mutex::new(Vec::new()));
            let fail = Arc::new(AtomicBool::new(false));
            (
                Self {
                    sent: sent.clone(),
                    fail: fail.clone(),
                },
                sent,
                fail,
            )
        }
    }

    #[async_trait]
    impl Radio for CapturingRadio {
        async fn send(&mut self, payload: &[u8]) -> Result<(), RadioError> {
            if self.fail.load(Ordering::Relaxed) {
                return Err(RadioError::SendError(-1));
            }
            if payload.len() > pscout_telemetry::PACKET_LEN {
                return Err(RadioError::PayloadSize(payload.len()));
            }
            self.sent.lock().unwrap().push(payload.to_vec());
            Ok(())
        }
    }

    pub struct RecordingLed {
        pub last: Arc<Mutex<Option<LedCommand>>>,
    }

    impl RecordingLed {
        pub fn new() -> (Self, Arc<Mutex<Option<LedCommand>>>) {
            let last = Arc::new(Mutex::new(None));
            (Self { last: last.clone() }, last)
        }
    }

    impl StatusLed for RecordingLed {
        fn apply(&mut self, command: LedCommand) -> Result<(), SensorError> {
            *self.last.lock().unwrap() = Some(command);
            Ok(())
        }
    }

    /// Pushes a sentence into the serial byte channel one byte at a
    /// time, the way the UART hands bytes to the intake.
    pub fn feed_sentence(tx: &mpsc::UnboundedSender<u8>, sentence: &str) {
        for byte in sentence.bytes() {
            tx.send(byte).ok();
        }
    }
}
