use log::{debug, warn};

use crate::command::Command;
use crate::response::{Response, ResponseCode};

c_like_enum! {
    /// Playback state reported by a status reply.
    PlaybackStatus {
        Stopped = 0x00,
        Playing = 0x01,
        Paused = 0x02,
    }
}

c_like_enum! {
    /// Error codes carried in the data of an error reply (0x40).
    ModuleError {
        Busy = 0x01,
        Sleeping = 0x02,
        SerialRxError = 0x03,
        Checksum = 0x04,
        TrackNotInScope = 0x05,
        TrackNotFound = 0x06,
        InsertionError = 0x07,
        EnterSleep = 0x08,
    }
}

/// Last-known state of the module.
///
/// Values are only as fresh as the last matching reply. Issue the matching
/// query and wait for the parser to report a completed frame before relying
/// on them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DeviceState {
    last_command: u8,
    last_command_data: u16,
    last_response: u8,
    last_response_data: u16,
    volume: u8,
    track: u16,
    status: u8,
    memory_inserted: bool,
}

impl DeviceState {
    pub fn new() -> Self {
        Default::default()
    }

    /// Code of the last command that was successfully transmitted.
    pub fn last_command(&self) -> u8 {
        self.last_command
    }

    pub fn last_command_data(&self) -> u16 {
        self.last_command_data
    }

    /// Code of the last response frame, or 0 if none arrived since the last
    /// command was sent.
    pub fn last_response(&self) -> u8 {
        self.last_response
    }

    pub fn last_response_data(&self) -> u16 {
        self.last_response_data
    }

    /// Cached volume level (0-30).
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Cached track number. 0 means nothing is playing.
    pub fn track(&self) -> u16 {
        self.track
    }

    /// Raw status byte: 0 stopped, 1 playing, 2 paused.
    pub fn status(&self) -> u8 {
        self.status
    }

    pub fn playback_status(&self) -> Option<PlaybackStatus> {
        PlaybackStatus::from_u8(self.status)
    }

    pub fn memory_inserted(&self) -> bool {
        self.memory_inserted
    }

    /// Decodes the error carried by the last response, if it was an error
    /// reply.
    pub fn module_error(&self) -> Option<ModuleError> {
        if self.last_response != ResponseCode::Error.code() {
            return None;
        }
        ModuleError::from_u8(self.last_response_data as u8)
    }

    /// Records a transmitted command. Any previous response is stale from
    /// here on.
    pub(crate) fn record_command(&mut self, command: Command, data_hi: u8, data_lo: u8) {
        self.last_command = command.code();
        self.last_command_data = ((data_hi as u16) << 8) | (data_lo as u16);
        self.last_response = 0;
        self.last_response_data = 0;
    }

    /// Applies a completed response frame. The last-response fields are
    /// written for every frame, recognized or not.
    pub(crate) fn apply(&mut self, response: &Response) -> Option<ResponseCode> {
        self.last_response = response.code;
        self.last_response_data = response.data;

        let code = match ResponseCode::from_u8(response.code) {
            Some(code) => code,
            None => {
                warn!("Unrecognized response 0x{:02x}", response.code);
                return None;
            }
        };
        debug!("Received {:?} data: 0x{:04x}", code, response.data);

        match code {
            ResponseCode::CardInserted => {
                self.memory_inserted = true;
            }
            ResponseCode::TrackFinished => {
                self.track = 0;
            }
            ResponseCode::Error => {
                warn!("Module reported error 0x{:04x}", response.data);
            }
            ResponseCode::Status => {
                self.status = response.data as u8;
                if self.status == PlaybackStatus::Stopped.code() {
                    self.track = 0;
                }
            }
            ResponseCode::Volume => {
                self.volume = response.data as u8;
            }
            ResponseCode::TrackCount => {
                self.track = response.data;
            }
            ResponseCode::Ack
            | ResponseCode::PlayingIndex
            | ResponseCode::FolderTrackCount
            | ResponseCode::FolderCount => {}
        }
        Some(code)
    }
}

// ===========================================================================
//
// Tests
//
// ===========================================================================
