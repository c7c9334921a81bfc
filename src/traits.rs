/// Serial parameters the module expects: 9600 baud, 8 data bits, no parity,
/// 1 stop bit.
pub const BAUD_RATE: u32 = 9600;

/// Platform dependent layer used by the driver to talk to the module.
pub trait Platform {
    type Error;

    /// Called to write an entire frame to the serial port.
    fn send(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Blocks for the given number of milliseconds.
    fn delay_ms(&mut self, ms: u16);

    /// Called at the start of driver initialization, e.g. to set up the UART.
    fn init(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when the driver is deinitialized.
    fn deinit(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Reports whether the mandatory capabilities (send and delay) are
    /// available.
    fn is_configured(&self) -> bool {
        true
    }
}

pub type InitDeinitFn = fn() -> Result<(), ()>;
pub type DelayFn = fn(u16);
pub type SendFn = fn(&[u8]) -> Result<(), ()>;

/// A `Platform` assembled from plain functions. Init and deinit are
/// optional; delay and send must be linked before the driver will
/// initialize.
#[derive(Default, Clone, Copy)]
pub struct FnPlatform {
    init: Option<InitDeinitFn>,
    deinit: Option<InitDeinitFn>,
    delay: Option<DelayFn>,
    send: Option<SendFn>,
}

impl FnPlatform {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_init(mut self, init: InitDeinitFn) -> Self {
        self.init = Some(init);
        self
    }

    pub fn with_deinit(mut self, deinit: InitDeinitFn) -> Self {
        self.deinit = Some(deinit);
        self
    }

    pub fn with_delay(mut self, delay: DelayFn) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_send(mut self, send: SendFn) -> Self {
        self.send = Some(send);
        self
    }
}

impl Platform for FnPlatform {
    type Error = ();

    fn send(&mut self, data: &[u8]) -> Result<(), ()> {
        match self.send {
            Some(send) => send(data),
            None => Err(()),
        }
    }

    fn delay_ms(&mut self, ms: u16) {
        if let Some(delay) = self.delay {
            delay(ms);
        }
    }

    fn init(&mut self) -> Result<(), ()> {
        self.init.map_or(Ok(()), |init| init())
    }

    fn deinit(&mut self) -> Result<(), ()> {
        self.deinit.map_or(Ok(()), |deinit| deinit())
    }

    fn is_configured(&self) -> bool {
        self.delay.is_some() && self.send.is_some()
    }
}

// ===========================================================================
//
// Tests
//
// ===========================================================================
