#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

use core::fmt;
use log::{debug, error, info, warn};
use pretty_hex::*;

#[macro_use]
pub mod macros;

pub mod command;
pub mod response;
pub mod status;
pub mod traits;

#[cfg(test)]
mod testutils;

use command::{clamp_volume, encode, split_u16, Command};
use response::{FrameParser, FrameResult, ResponseCode};
use status::DeviceState;
use traits::Platform;

/// Time given to the module to settle after power up and after each
/// initialization command.
pub const DEFAULT_INIT_DELAY_MS: u16 = 500;

c_like_enum! {
    /// Playback media the module can be switched to.
    Source {
        UsbDisk = 0x01,
        SdCard = 0x02,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub init_delay_ms: u16,
    pub source: Source,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            init_delay_ms: DEFAULT_INIT_DELAY_MS,
            source: Source::SdCard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error<E> {
    /// A mandatory platform capability is missing.
    InvalidConfiguration,
    /// The platform failed to send a frame.
    CommunicationFailure(E),
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfiguration => write!(f, "invalid platform configuration"),
            Error::CommunicationFailure(err) => write!(f, "communication failure: {:?}", err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParseResult {
    /// The byte was buffered; no frame is complete yet.
    MoreDataNeeded,
    /// A frame was completed and the device state updated.
    ResponseReceived(ResponseCode),
    /// A frame was completed but carried an unrecognized response code.
    UnknownResponse(u8),
}

/// Driver for the YX5300 serial MP3 module.
///
/// Commands are fire and forget. Replies arrive asynchronously and have to
/// be fed, one byte at a time, into `parse_byte`, which keeps `state()` up
/// to date. Only one command should be outstanding at a time.
pub struct Yx5300<P: Platform> {
    platform: P,
    config: Config,
    parser: FrameParser,
    state: DeviceState,
    initialized: bool,
}

impl<P: Platform> Yx5300<P> {
    pub fn new(platform: P) -> Self {
        Self::with_config(platform, Config::default())
    }

    pub fn with_config(platform: P, config: Config) -> Self {
        Self {
            platform,
            config,
            parser: FrameParser::new(),
            state: DeviceState::new(),
            initialized: false,
        }
    }

    /// Brings the module up: platform init, reset, then select the
    /// configured source, pausing after each step.
    pub fn init(&mut self) -> Result<(), Error<P::Error>> {
        self.initialized = false;
        if !self.platform.is_configured() {
            error!("Platform is missing send or delay");
            return Err(Error::InvalidConfiguration);
        }
        info!("Initializing");

        if self.platform.init().is_err() {
            warn!("Platform init failed");
        }
        self.platform.delay_ms(self.config.init_delay_ms);

        if let Err(err) = self.send_command(Command::Reset, 0, 0) {
            error!("Failed to send reset");
            return Err(err);
        }
        self.platform.delay_ms(self.config.init_delay_ms);

        let source = self.config.source;
        if let Err(err) = self.send_command(Command::SelectDevice, 0, source.code()) {
            error!("Failed to select {:?}", source);
            return Err(err);
        }
        self.platform.delay_ms(self.config.init_delay_ms);

        self.initialized = true;
        info!("Initialized");
        Ok(())
    }

    /// Releases the platform. Always succeeds; a platform failure is only
    /// logged.
    pub fn deinit(&mut self) {
        self.initialized = false;
        if self.platform.deinit().is_err() {
            warn!("Platform deinit failed");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Consumes the driver and hands back the platform.
    pub fn release(self) -> P {
        self.platform
    }

    /// Feeds one byte received from the module. Check `state()` once this
    /// reports a completed frame.
    pub fn parse_byte(&mut self, byte: u8) -> ParseResult {
        match self.parser.parse_byte(byte) {
            FrameResult::FrameReceived(response) => match self.state.apply(&response) {
                Some(code) => ParseResult::ResponseReceived(code),
                None => ParseResult::UnknownResponse(response.code),
            },
            FrameResult::MoreDataNeeded => ParseResult::MoreDataNeeded,
        }
    }

    // Queries. The answer shows up in state() once the reply is parsed.

    pub fn request_status(&mut self) -> Result<(), Error<P::Error>> {
        self.send_command(Command::QueryStatus, 0, 0)
    }

    pub fn request_volume(&mut self) -> Result<(), Error<P::Error>> {
        self.send_command(Command::QueryVolume, 0, 0)
    }

    pub fn request_track(&mut self) -> Result<(), Error<P::Error>> {
        self.send_command(Command::QueryPlayingIndex, 0, 0)
    }

    pub fn request_track_count(&mut self) -> Result<(), Error<P::Error>> {
        self.send_command(Command::QueryTrackCount, 0, 0)
    }

    pub fn request_folder_track_count(&mut self, folder: u8) -> Result<(), Error<P::Error>> {
        self.send_command(Command::QueryFolderTrackCount, 0, folder)
    }

    pub fn request_folder_count(&mut self) -> Result<(), Error<P::Error>> {
        self.send_command(Command::QueryFolderCount, 0, 0)
    }

    // Playback control.

    pub fn play_next(&mut self) -> Result<(), Error<P::Error>> {
        self.send_command(Command::Next, 0, 0)
    }

    pub fn play_prev(&mut self) -> Result<(), Error<P::Error>> {
        self.send_command(Command::Previous, 0, 0)
    }

    pub fn play_track(&mut self, track: u16) -> Result<(), Error<P::Error>> {
        let (hi, lo) = split_u16(track);
        self.send_command(Command::PlayIndex, hi, lo)
    }

    pub fn play_folder_file(&mut self, folder: u8, file: u8) -> Result<(), Error<P::Error>> {
        self.send_command(Command::PlayFolderFile, folder, file)
    }

    /// Sets the volume and plays a track in one command.
    pub fn play_with_volume(&mut self, volume: u8, track: u8) -> Result<(), Error<P::Error>> {
        self.send_command(Command::PlayWithVolume, clamp_volume(volume), track)
    }

    /// Repeats a single track.
    pub fn loop_track(&mut self, track: u16) -> Result<(), Error<P::Error>> {
        let (hi, lo) = split_u16(track);
        self.send_command(Command::LoopTrack, hi, lo)
    }

    /// Plays all files of a folder on repeat.
    pub fn loop_folder(&mut self, folder: u8) -> Result<(), Error<P::Error>> {
        self.send_command(Command::LoopFolder, 0, folder)
    }

    /// Turns single-track repeat of the current track on or off.
    pub fn set_single_cycle(&mut self, enable: bool) -> Result<(), Error<P::Error>> {
        self.send_command(Command::SingleCycle, 0, if enable { 0x00 } else { 0x01 })
    }

    pub fn resume(&mut self) -> Result<(), Error<P::Error>> {
        self.send_command(Command::Play, 0, 0)
    }

    pub fn pause(&mut self) -> Result<(), Error<P::Error>> {
        self.send_command(Command::Pause, 0, 0)
    }

    pub fn stop(&mut self) -> Result<(), Error<P::Error>> {
        self.send_command(Command::Stop, 0, 0)
    }

    // Volume and output.

    pub fn volume_up(&mut self) -> Result<(), Error<P::Error>> {
        self.send_command(Command::VolumeUp, 0, 0)
    }

    pub fn volume_down(&mut self) -> Result<(), Error<P::Error>> {
        self.send_command(Command::VolumeDown, 0, 0)
    }

    /// Sets the volume level. Anything above 30 is sent as 30.
    pub fn set_volume(&mut self, volume: u8) -> Result<(), Error<P::Error>> {
        self.send_command(Command::SetVolume, 0, clamp_volume(volume))
    }

    pub fn set_dac(&mut self, enable: bool) -> Result<(), Error<P::Error>> {
        self.send_command(Command::SetDac, 0, if enable { 0x00 } else { 0x01 })
    }

    // Power.

    pub fn sleep(&mut self) -> Result<(), Error<P::Error>> {
        self.send_command(Command::Sleep, 0, 0)
    }

    pub fn wake_up(&mut self) -> Result<(), Error<P::Error>> {
        self.send_command(Command::WakeUp, 0, 0)
    }

    fn send_command(
        &mut self,
        command: Command,
        data_hi: u8,
        data_lo: u8,
    ) -> Result<(), Error<P::Error>> {
        let frame = encode(command, data_hi, data_lo);
        debug!("Tx {:?} {:?}", command, frame.as_slice().hex_dump());
        self.platform
            .send(&frame)
            .map_err(Error::CommunicationFailure)?;

        // Only record commands which actually went out.
        self.state.record_command(command, data_hi, data_lo);
        Ok(())
    }
}

// ===========================================================================
//
// Tests
//
// ===========================================================================
