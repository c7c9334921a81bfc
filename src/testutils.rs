use simple_logger;
use std::sync::Once;
use std::vec::Vec;

use super::traits::Platform;

static INIT: Once = Once::new();

pub fn setup_log() {
    INIT.call_once(|| {
        simple_logger::init().unwrap();
    });
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SendError;

/// Records everything the driver asks of the platform.
#[derive(Default)]
pub struct TestPlatform {
    pub sent: Vec<Vec<u8>>,
    pub delays: Vec<u16>,
    pub init_calls: usize,
    pub deinit_calls: usize,
    pub init_result: Option<SendError>,
    // Zero based index of the send call which should fail.
    pub fail_on_send: Option<usize>,
    send_calls: usize,
}

impl TestPlatform {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn failing_on_send(n: usize) -> Self {
        TestPlatform {
            fail_on_send: Some(n),
            ..Default::default()
        }
    }

    pub fn send_calls(&self) -> usize {
        self.send_calls
    }

    pub fn last_sent(&self) -> Option<&[u8]> {
        self.sent.last().map(|frame| frame.as_slice())
    }
}

impl Platform for TestPlatform {
    type Error = SendError;

    fn send(&mut self, data: &[u8]) -> Result<(), SendError> {
        let call = self.send_calls;
        self.send_calls += 1;
        if self.fail_on_send == Some(call) {
            return Err(SendError);
        }
        self.sent.push(data.to_vec());
        Ok(())
    }

    fn delay_ms(&mut self, ms: u16) {
        self.delays.push(ms);
    }

    fn init(&mut self) -> Result<(), SendError> {
        self.init_calls += 1;
        match self.init_result {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn deinit(&mut self) -> Result<(), SendError> {
        self.deinit_calls += 1;
        Ok(())
    }
}
