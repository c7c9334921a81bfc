use generic_array::GenericArray;
use typenum::U8;

pub const START_BYTE: u8 = 0x7e;
pub const VERSION: u8 = 0xff;
pub const LENGTH: u8 = 0x06;
pub const FEEDBACK: u8 = 0x01;
pub const END_BYTE: u8 = 0xef;

/// Highest volume level the module accepts.
pub const MAX_VOLUME: u8 = 30;

pub type CommandFrameSize = U8;

/// An outbound command frame:
/// START VERSION LENGTH CMD FEEDBACK DATA_HI DATA_LO END
pub type CommandFrame = GenericArray<u8, CommandFrameSize>;

c_like_enum! {
    /// Command codes understood by the module.
    Command {
        Next = 0x01,
        Previous = 0x02,
        PlayIndex = 0x03,
        VolumeUp = 0x04,
        VolumeDown = 0x05,
        SetVolume = 0x06,
        LoopTrack = 0x08,
        SelectDevice = 0x09,
        Sleep = 0x0a,
        WakeUp = 0x0b,
        Reset = 0x0c,
        Play = 0x0d,
        Pause = 0x0e,
        PlayFolderFile = 0x0f,
        Stop = 0x16,
        LoopFolder = 0x17,
        SingleCycle = 0x19,
        SetDac = 0x1a,
        PlayWithVolume = 0x22,
        QueryStatus = 0x42,
        QueryVolume = 0x43,
        QueryTrackCount = 0x48,
        QueryPlayingIndex = 0x4c,
        QueryFolderTrackCount = 0x4e,
        QueryFolderCount = 0x4f,
    }
}

/// Builds the 8 byte frame for `command`. Any payload byte values are valid.
pub fn encode(command: Command, data_hi: u8, data_lo: u8) -> CommandFrame {
    let mut frame = CommandFrame::default();
    frame[0] = START_BYTE;
    frame[1] = VERSION;
    frame[2] = LENGTH;
    frame[3] = command.code();
    frame[4] = FEEDBACK;
    frame[5] = data_hi;
    frame[6] = data_lo;
    frame[7] = END_BYTE;
    frame
}

/// Builds a frame carrying a 16-bit parameter, high byte first.
pub fn encode_u16(command: Command, value: u16) -> CommandFrame {
    let (hi, lo) = split_u16(value);
    encode(command, hi, lo)
}

/// Builds a set-volume frame. Levels above `MAX_VOLUME` are reduced to it.
pub fn encode_volume(volume: u8) -> CommandFrame {
    encode(Command::SetVolume, 0, clamp_volume(volume))
}

pub fn clamp_volume(volume: u8) -> u8 {
    if volume > MAX_VOLUME {
        MAX_VOLUME
    } else {
        volume
    }
}

pub fn split_u16(value: u16) -> (u8, u8) {
    ((value >> 8) as u8, (value & 0xff) as u8)
}

// ===========================================================================
//
// Tests
//
// ===========================================================================
