//! Error types for fossa-fcp.

use thiserror::Error;

/// Success status code shared with the radio driver.
pub const ERR_NONE: i16 = 0;
/// Callsign is absent or does not match the frame.
pub const ERR_CALLSIGN_INVALID: i16 = -1;
/// Frame is truncated or otherwise malformed.
pub const ERR_FRAME_INVALID: i16 = -2;
/// Encrypted section does not carry the expected password.
pub const ERR_INCORRECT_PASSWORD: i16 = -3;
/// Optional data length field disagrees with the frame length.
pub const ERR_LENGTH_MISMATCH: i16 = -4;

/// Errors that can occur during frame operations.
///
/// Every variant corresponds to one of the status codes exchanged with the
/// radio driver, see [`FcpError::code`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FcpError {
    /// Callsign is empty or does not match the one carried by the frame.
    #[error("Invalid callsign")]
    CallsignInvalid,

    /// Frame is too short, its fields are inconsistent, or the caller
    /// supplied inconsistent optional data.
    #[error("Invalid frame: {0}")]
    FrameInvalid(String),

    /// Decrypted section does not start with the station password.
    #[error("Incorrect password")]
    IncorrectPassword,

    /// The optional data length byte does not match the frame length.
    #[error("Length mismatch: length field says {declared}, frame carries {actual}")]
    LengthMismatch {
        /// Value of the length byte.
        declared: u8,
        /// Number of optional data bytes actually present.
        actual: usize,
    },
}

impl FcpError {
    /// Create an invalid frame error.
    pub fn frame_invalid(message: impl Into<String>) -> Self {
        FcpError::FrameInvalid(message.into())
    }

    /// Status code of this error as used on the radio driver boundary.
    pub fn code(&self) -> i16 {
        match self {
            FcpError::CallsignInvalid => ERR_CALLSIGN_INVALID,
            FcpError::FrameInvalid(_) => ERR_FRAME_INVALID,
            FcpError::IncorrectPassword => ERR_INCORRECT_PASSWORD,
            FcpError::LengthMismatch { .. } => ERR_LENGTH_MISMATCH,
        }
    }

    /// Map a status code back to an error.
    ///
    /// Returns `None` for [`ERR_NONE`] and for unknown codes. Details that
    /// the bare code does not carry are left empty.
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            ERR_CALLSIGN_INVALID => Some(FcpError::CallsignInvalid),
            ERR_FRAME_INVALID => Some(FcpError::FrameInvalid(String::new())),
            ERR_INCORRECT_PASSWORD => Some(FcpError::IncorrectPassword),
            ERR_LENGTH_MISMATCH => Some(FcpError::LengthMismatch {
                declared: 0,
                actual: 0,
            }),
            _ => None,
        }
    }
}

/// Errors raised when a telemetry buffer cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TelemetryError {
    /// Buffer is shorter than the layout requires.
    #[error("Telemetry buffer too short: {actual} bytes (layout needs {needed})")]
    TooShort {
        /// Bytes required by the layout.
        needed: usize,
        /// Bytes supplied.
        actual: usize,
    },

    /// Unknown layout name.
    #[error("Unknown telemetry layout: {0}")]
    UnknownLayout(String),
}
