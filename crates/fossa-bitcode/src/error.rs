//! Error types for fossa-bitcode.

use thiserror::Error;

/// Sentinel the radio driver receives instead of a frame on framing failure.
pub const FRAME_ERROR_SENTINEL: &[u8] = b"Frame error!";

/// Sentinel the radio driver receives instead of a frame on CRC failure.
pub const CRC_ERROR_SENTINEL: &[u8] = b"CRC error!";

/// Errors that can occur while recovering an AX.25 frame from a capture.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// Closing flag missing, misaligned, or malformed.
    #[error("Frame error: {0}")]
    Frame(String),

    /// Frame check sequence does not match the frame contents.
    #[error("CRC error: received {received:#06x}, computed {computed:#06x}")]
    Crc {
        /// FCS carried by the frame.
        received: u16,
        /// FCS computed over the frame.
        computed: u16,
    },

    /// Capture text is not an even run of hex nibbles.
    #[error("Invalid hex capture: {0}")]
    InvalidHex(String),

    /// Capture too short to hold the sync byte and any data.
    #[error("Capture too short: {len} bytes")]
    TooShort {
        /// Capture length in bytes.
        len: usize,
    },
}

impl LinkError {
    /// Create a framing error.
    pub fn frame(message: impl Into<String>) -> Self {
        LinkError::Frame(message.into())
    }

    /// Bytes handed to the radio driver in place of the frame.
    ///
    /// Only CRC mismatches report `CRC error!`; everything that prevents
    /// locating a frame reports `Frame error!`.
    pub fn sentinel(&self) -> &'static [u8] {
        match self {
            LinkError::Crc { .. } => CRC_ERROR_SENTINEL,
            LinkError::Frame(_) | LinkError::InvalidHex(_) | LinkError::TooShort { .. } => {
                FRAME_ERROR_SENTINEL
            }
        }
    }
}

impl From<hex::FromHexError> for LinkError {
    fn from(err: hex::FromHexError) -> Self {
        LinkError::InvalidHex(err.to_string())
    }
}
