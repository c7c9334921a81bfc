use core::fmt;
use generic_array::GenericArray;
use log::debug;
use pretty_hex::*;
use typenum::{Unsigned, U10};

use crate::command::{END_BYTE, START_BYTE};

pub type ResponseFrameSize = U10;

/// Number of bytes in a response frame.
pub const RESPONSE_SIZE: usize = ResponseFrameSize::USIZE;

const RESPONSE_CODE_OFFSET: usize = 3;
const DATA_HI_OFFSET: usize = 5;
const DATA_LO_OFFSET: usize = 6;

c_like_enum! {
    /// Response codes sent by the module.
    ResponseCode {
        CardInserted = 0x3a,
        TrackFinished = 0x3d,
        Error = 0x40,
        Ack = 0x41,
        Status = 0x42,
        Volume = 0x43,
        TrackCount = 0x48,
        PlayingIndex = 0x4c,
        FolderTrackCount = 0x4e,
        FolderCount = 0x4f,
    }
}

/// The fields of a completed response frame, before the code is interpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Response {
    pub code: u8,
    pub data: u16,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum FrameState {
    AwaitingStart,
    InFrame,
}

#[derive(PartialEq, Debug)]
pub enum FrameResult {
    FrameReceived(Response),
    MoreDataNeeded,
}

/// Fixed capacity receive buffer. The cursor always stays below the
/// capacity; storing the last byte without completing a frame wraps it back
/// to 0.
pub struct RxBuffer {
    buf: GenericArray<u8, ResponseFrameSize>,
    idx: usize,
}

impl Default for RxBuffer {
    fn default() -> Self {
        RxBuffer {
            buf: GenericArray::default(),
            idx: 0,
        }
    }
}

impl RxBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the current write position.
    pub fn len(&self) -> usize {
        self.idx
    }

    pub fn is_empty(&self) -> bool {
        self.idx == 0
    }

    /// Stores a byte at the write position without advancing.
    fn store(&mut self, byte: u8) {
        if let Some(slot) = self.buf.get_mut(self.idx) {
            *slot = byte;
        }
    }

    /// Advances the write position. Returns false, leaving the buffer empty,
    /// if that would run off the end.
    fn advance(&mut self) -> bool {
        self.idx += 1;
        if self.idx >= self.capacity() {
            self.idx = 0;
            return false;
        }
        true
    }

    fn reset(&mut self) {
        self.idx = 0;
    }

    fn byte_at(&self, offset: usize) -> u8 {
        self.buf.get(offset).copied().unwrap_or(0)
    }

    pub fn data(&self) -> &[u8] {
        &self.buf[..]
    }
}

impl fmt::Debug for RxBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.data().hex_dump())
    }
}

// A response frame is 10 bytes:
// START VERSION LENGTH CODE FEEDBACK DATA_HI DATA_LO CHK_HI CHK_LO END
//
// Only START and END are used for framing. There is no escaping, so an END
// byte anywhere after START terminates the frame.
pub struct FrameParser {
    frame_state: FrameState,
    rx: RxBuffer,
}

impl Default for FrameParser {
    fn default() -> Self {
        FrameParser {
            frame_state: FrameState::AwaitingStart,
            rx: RxBuffer::new(),
        }
    }
}

impl FrameParser {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn frame_state(&self) -> FrameState {
        self.frame_state
    }

    pub fn buffer(&self) -> &RxBuffer {
        &self.rx
    }

    /// Feeds a single byte into the parser. Once an END byte follows a START
    /// byte, the buffered frame is decoded and returned.
    pub fn parse_byte(&mut self, byte: u8) -> FrameResult {
        self.rx.store(byte);

        match self.frame_state {
            FrameState::AwaitingStart => {
                if byte == START_BYTE {
                    self.rx.advance();
                    self.frame_state = FrameState::InFrame;
                }
                FrameResult::MoreDataNeeded
            }
            FrameState::InFrame => {
                if byte == END_BYTE {
                    debug!("Rx frame {:?}", self.rx);
                    self.reset();
                    return FrameResult::FrameReceived(self.response());
                }
                if !self.rx.advance() {
                    // No END seen within a frame's worth of bytes. Things
                    // resynchronize on the next START.
                    debug!("Rx overflow, dropping {:?}", self.rx);
                    self.frame_state = FrameState::AwaitingStart;
                }
                FrameResult::MoreDataNeeded
            }
        }
    }

    fn response(&self) -> Response {
        Response {
            code: self.rx.byte_at(RESPONSE_CODE_OFFSET),
            data: ((self.rx.byte_at(DATA_HI_OFFSET) as u16) << 8)
                | (self.rx.byte_at(DATA_LO_OFFSET) as u16),
        }
    }

    pub fn reset(&mut self) {
        self.frame_state = FrameState::AwaitingStart;
        self.rx.reset();
    }
}

// ===========================================================================
//
// Tests
//
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::setup_log;
    use log::info;

    // Feed bytes until the first completed frame.
    fn parse_bytes(parser: &mut FrameParser, bytes: &[u8]) -> FrameResult {
        for byte in bytes {
            if let FrameResult::FrameReceived(response) = parser.parse_byte(*byte) {
                info!("Response = {:?}", response);
                return FrameResult::FrameReceived(response);
            }
        }
        FrameResult::MoreDataNeeded
    }

    #[test]
    fn test_volume_reply() {
        setup_log();
        let mut parser = FrameParser::new();

        let frame = [0x7e, 0xff, 0x06, 0x43, 0x00, 0x00, 0x1a, 0xfe, 0x9e, 0xef];
        for byte in &frame[..9] {
            assert_eq!(parser.parse_byte(*byte), FrameResult::MoreDataNeeded);
            assert_eq!(parser.frame_state(), FrameState::InFrame);
        }
        assert_eq!(
            parser.parse_byte(frame[9]),
            FrameResult::FrameReceived(Response {
                code: 0x43,
                data: 26
            })
        );
        assert_eq!(parser.frame_state(), FrameState::AwaitingStart);
        assert!(parser.buffer().is_empty());
    }

    #[test]
    fn test_sixteen_bit_data() {
        setup_log();
        let mut parser = FrameParser::new();

        assert_eq!(
            parse_bytes(
                &mut parser,
                &[0x7e, 0xff, 0x06, 0x48, 0x00, 0x01, 0x2c, 0x00, 0x00, 0xef]
            ),
            FrameResult::FrameReceived(Response {
                code: 0x48,
                data: 300
            })
        );
    }

    #[test]
    fn test_garbage_before_start_is_ignored() {
        setup_log();
        let mut parser = FrameParser::new();

        for byte in [0x00u8, 0x43, 0xef, 0xff, 0x06].iter() {
            assert_eq!(parser.parse_byte(*byte), FrameResult::MoreDataNeeded);
            assert_eq!(parser.frame_state(), FrameState::AwaitingStart);
            assert!(parser.buffer().is_empty());
        }

        assert_eq!(
            parse_bytes(
                &mut parser,
                &[0x7e, 0xff, 0x06, 0x3d, 0x00, 0x00, 0x05, 0xfe, 0xb7, 0xef]
            ),
            FrameResult::FrameReceived(Response {
                code: 0x3d,
                data: 5
            })
        );
    }

    #[test]
    fn test_overflow_resynchronizes() {
        setup_log();
        let mut parser = FrameParser::new();

        // A START followed by far more than a frame's worth of bytes with no
        // END in sight.
        assert_eq!(parser.parse_byte(0x7e), FrameResult::MoreDataNeeded);
        for i in 0..(RESPONSE_SIZE * 3) {
            assert_eq!(parser.parse_byte((i % 0x70) as u8), FrameResult::MoreDataNeeded);
            assert!(parser.buffer().len() < parser.buffer().capacity());
        }

        for _ in 0..RESPONSE_SIZE {
            parser.parse_byte(0x55);
        }
        assert_eq!(parser.frame_state(), FrameState::AwaitingStart);

        assert_eq!(
            parse_bytes(
                &mut parser,
                &[0x7e, 0xff, 0x06, 0x42, 0x00, 0x00, 0x01, 0xfe, 0xb8, 0xef]
            ),
            FrameResult::FrameReceived(Response {
                code: 0x42,
                data: 1
            })
        );
    }

    #[test]
    fn test_overflow_drops_partial_frame() {
        setup_log();
        let mut parser = FrameParser::new();

        // START plus 9 non-END bytes fills the buffer and drops the frame.
        let bytes = [0x7e, 0xff, 0x06, 0x43, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00];
        assert_eq!(parse_bytes(&mut parser, &bytes), FrameResult::MoreDataNeeded);
        assert_eq!(parser.frame_state(), FrameState::AwaitingStart);

        // A stray END is not a frame on its own.
        assert_eq!(parser.parse_byte(0xef), FrameResult::MoreDataNeeded);
    }

    #[test]
    fn test_short_frame_ends_at_first_end_byte() {
        setup_log();
        let mut parser = FrameParser::new();

        assert_eq!(
            parse_bytes(&mut parser, &[0x7e, 0xff, 0x06, 0x41, 0x00, 0x00, 0x00, 0xef]),
            FrameResult::FrameReceived(Response {
                code: 0x41,
                data: 0
            })
        );
    }

    #[test]
    fn test_back_to_back_frames() {
        setup_log();
        let mut parser = FrameParser::new();
        let bytes = [
            0x7e, 0xff, 0x06, 0x3a, 0x00, 0x00, 0x02, 0xfe, 0xbf, 0xef, //
            0x7e, 0xff, 0x06, 0x43, 0x00, 0x00, 0x0f, 0xfe, 0xa9, 0xef,
        ];

        assert_eq!(
            parse_bytes(&mut parser, &bytes[..10]),
            FrameResult::FrameReceived(Response {
                code: 0x3a,
                data: 2
            })
        );
        assert_eq!(
            parse_bytes(&mut parser, &bytes[10..]),
            FrameResult::FrameReceived(Response {
                code: 0x43,
                data: 15
            })
        );
    }
}
