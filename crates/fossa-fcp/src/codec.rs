//! Frame encoding and decoding.
//!
//! This module builds and parses FOSSA communication protocol frames. The
//! callsign is never length-prefixed on the wire, so every operation takes
//! it from the caller.
//!
//! ## Frame Format
//!
//! | Field       | Size (bytes)        | Description                                      |
//! |-------------|---------------------|--------------------------------------------------|
//! | callsign    | `callsign.len()`    | Station identifier, not null-terminated          |
//! | function_id | 1                   | Command or response code                         |
//! | opt_len     | 1 (optional)        | Optional data length (unencrypted frames only)   |
//! | opt_data    | `opt_len`           | Optional data (unencrypted frames only)          |
//! | section     | multiple of 16      | Encrypted section (see [`crate::cipher`])        |
//!
//! Frames arrive with noise-influenced lengths, so each accessor checks its
//! own preconditions and never indexes past the supplied slice.

use bytes::BufMut;
use rand::Rng;
use tracing::{debug, trace};

use crate::cipher::{
    build_section, padding_len, Credentials, PassthroughCipher, SectionCipher, BLOCK_SIZE,
};
use crate::{FcpError, Result};

/// Largest optional data block a single length byte can describe.
pub const MAX_OPT_DATA_LEN: usize = u8::MAX as usize;

// ============================================================================
// Stateless helpers
// ============================================================================

fn check_callsign(callsign: &str) -> Result<usize> {
    if callsign.is_empty() {
        return Err(FcpError::CallsignInvalid);
    }
    Ok(callsign.len())
}

/// Compute the total wire length of a frame.
///
/// Unencrypted frames are `callsign + function_id`, plus `1 + opt_data_len`
/// when optional data is present. With a password the encrypted section
/// always carries its length byte and is padded to a 16-byte boundary.
pub fn frame_length(callsign: &str, opt_data_len: usize, password: Option<&str>) -> Result<usize> {
    let mut len = check_callsign(callsign)? + 1;

    if opt_data_len > 0 {
        len += 1 + opt_data_len;
    }

    if let Some(password) = password {
        len += password.len();
        if opt_data_len == 0 {
            len += 1;
        }
        len += padding_len(1 + opt_data_len + password.len());
    }

    Ok(len)
}

/// Read the function ID of a frame.
pub fn function_id(callsign: &str, frame: &[u8]) -> Result<u8> {
    let cs_len = check_callsign(callsign)?;

    match frame.get(cs_len) {
        Some(&id) => Ok(id),
        None => Err(FcpError::frame_invalid(format!(
            "frame of {} bytes has no function id after a {}-byte callsign",
            frame.len(),
            cs_len
        ))),
    }
}

/// Length of the optional data carried by a frame.
///
/// See [`FcpCodec::opt_data_length`].
pub fn opt_data_length(callsign: &str, frame: &[u8], credentials: Option<&Credentials<'_>>) -> Result<usize> {
    FcpCodec::new().opt_data_length(callsign, frame, credentials)
}

/// Copy the optional data of a frame into `out`.
///
/// See [`FcpCodec::opt_data`].
pub fn opt_data(
    callsign: &str,
    frame: &[u8],
    out: &mut [u8],
    credentials: Option<&Credentials<'_>>,
) -> Result<usize> {
    FcpCodec::new().opt_data(callsign, frame, out, credentials)
}

/// Encode a frame, drawing padding from the thread-local RNG.
///
/// See [`FcpCodec::encode`].
pub fn encode(
    callsign: &str,
    function_id: u8,
    opt_data: Option<&[u8]>,
    credentials: Option<&Credentials<'_>>,
) -> Result<Vec<u8>> {
    FcpCodec::new().encode(callsign, function_id, opt_data, credentials)
}

// ============================================================================
// Codec
// ============================================================================

/// Frame codec bound to a section cipher.
///
/// The codec holds no per-frame state; the cipher is the only thing it
/// carries between calls.
#[derive(Debug, Clone, Default)]
pub struct FcpCodec<C = PassthroughCipher> {
    cipher: C,
}

impl FcpCodec<PassthroughCipher> {
    /// Create a codec that leaves the encrypted section in clear text.
    pub fn new() -> Self {
        FcpCodec {
            cipher: PassthroughCipher,
        }
    }
}

impl<C: SectionCipher> FcpCodec<C> {
    /// Create a codec that uses `cipher` for the encrypted section.
    pub fn with_cipher(cipher: C) -> Self {
        FcpCodec { cipher }
    }

    /// Get the cipher.
    pub fn cipher(&self) -> &C {
        &self.cipher
    }

    /// Length of the optional data carried by a frame.
    ///
    /// A frame made of callsign and function ID only has no optional data.
    /// Unencrypted frames must have a length byte matching the rest of the
    /// frame. Encrypted frames are decrypted and must start with the
    /// password; the declared length then covers password and data.
    pub fn opt_data_length(
        &self,
        callsign: &str,
        frame: &[u8],
        credentials: Option<&Credentials<'_>>,
    ) -> Result<usize> {
        let cs_len = check_callsign(callsign)?;

        if frame.len() < cs_len + 1 {
            return Err(FcpError::frame_invalid(format!(
                "frame of {} bytes is shorter than callsign and function id",
                frame.len()
            )));
        }
        if frame.len() == cs_len + 1 {
            return Ok(0);
        }

        if let Some(credentials) = credentials {
            let section = self.open_section(&frame[cs_len + 1..], credentials)?;
            return verify_section(&section, credentials.password_bytes());
        }

        let declared = frame[cs_len + 1];
        let actual = frame.len() - cs_len - 2;
        if declared as usize != actual {
            debug!(declared, actual, "optional data length mismatch");
            return Err(FcpError::LengthMismatch { declared, actual });
        }

        Ok(actual)
    }

    /// Copy the optional data of a frame into `out`, returning its length.
    ///
    /// `out` must be at least as long as [`FcpCodec::opt_data_length`]
    /// reports. Unencrypted frames must start with `callsign`.
    pub fn opt_data(
        &self,
        callsign: &str,
        frame: &[u8],
        out: &mut [u8],
        credentials: Option<&Credentials<'_>>,
    ) -> Result<usize> {
        let cs_len = check_callsign(callsign)?;

        if frame.len() < cs_len + 1 {
            return Err(FcpError::frame_invalid(format!(
                "frame of {} bytes is shorter than callsign and function id",
                frame.len()
            )));
        }

        let (data, len) = match credentials {
            Some(credentials) => {
                if frame.len() == cs_len + 1 {
                    return Ok(0);
                }
                let password = credentials.password_bytes();
                let section = self.open_section(&frame[cs_len + 1..], credentials)?;
                let len = verify_section(&section, password)?;
                let start = 1 + password.len();
                (section[start..start + len].to_vec(), len)
            }
            None => {
                if &frame[..cs_len] != callsign.as_bytes() {
                    debug!(callsign, "frame addressed to another callsign");
                    return Err(FcpError::CallsignInvalid);
                }
                if frame.len() == cs_len + 1 {
                    return Ok(0);
                }
                let len = frame[cs_len + 1] as usize;
                let start = cs_len + 2;
                let Some(data) = frame.get(start..start + len) else {
                    return Err(FcpError::frame_invalid(format!(
                        "length byte announces {} bytes, frame carries {}",
                        len,
                        frame.len() - start
                    )));
                };
                (data.to_vec(), len)
            }
        };

        if out.len() < len {
            return Err(FcpError::frame_invalid(format!(
                "output buffer of {} bytes cannot hold {} bytes of optional data",
                out.len(),
                len
            )));
        }
        out[..len].copy_from_slice(&data);

        trace!(len, "optional data extracted");
        Ok(len)
    }

    /// Extract the optional data of a frame into a new vector.
    pub fn opt_data_vec(
        &self,
        callsign: &str,
        frame: &[u8],
        credentials: Option<&Credentials<'_>>,
    ) -> Result<Vec<u8>> {
        let len = self.opt_data_length(callsign, frame, credentials)?;
        let mut out = vec![0u8; len];
        self.opt_data(callsign, frame, &mut out, credentials)?;
        Ok(out)
    }

    /// Encode a frame, drawing padding from the thread-local RNG.
    pub fn encode(
        &self,
        callsign: &str,
        function_id: u8,
        opt_data: Option<&[u8]>,
        credentials: Option<&Credentials<'_>>,
    ) -> Result<Vec<u8>> {
        self.encode_with_rng(callsign, function_id, opt_data, credentials, &mut rand::thread_rng())
    }

    /// Encode a frame.
    ///
    /// `opt_data` must be either absent or non-empty. With credentials the
    /// optional data is wrapped into a padded section, passed through the
    /// cipher and copied into the frame verbatim. Padding bytes come from
    /// `rng`.
    pub fn encode_with_rng<R: Rng>(
        &self,
        callsign: &str,
        function_id: u8,
        opt_data: Option<&[u8]>,
        credentials: Option<&Credentials<'_>>,
        rng: &mut R,
    ) -> Result<Vec<u8>> {
        let cs_len = check_callsign(callsign)?;

        let data: &[u8] = match opt_data {
            Some([]) => {
                return Err(FcpError::frame_invalid(
                    "optional data supplied with zero length",
                ))
            }
            Some(data) => data,
            None => &[],
        };
        if data.len() > MAX_OPT_DATA_LEN {
            return Err(FcpError::frame_invalid(format!(
                "optional data of {} bytes exceeds {}",
                data.len(),
                MAX_OPT_DATA_LEN
            )));
        }

        let password = credentials.map(|c| c.password);
        let mut buf: Vec<u8> = Vec::with_capacity(frame_length(callsign, data.len(), password)?);

        // 1. Callsign
        buf.put_slice(callsign.as_bytes());

        // 2. Function ID
        buf.put_u8(function_id);

        match credentials {
            Some(credentials) => {
                let password = credentials.password_bytes();
                if data.len() + password.len() > u8::MAX as usize {
                    return Err(FcpError::frame_invalid(format!(
                        "password and optional data of {} bytes do not fit the length byte",
                        data.len() + password.len()
                    )));
                }

                // 3. Encrypted section
                let mut section = build_section(password, data, rng);
                self.cipher.encrypt(credentials.key, &mut section);
                buf.put_slice(&section);
            }
            None => {
                // 3. Length byte and optional data
                if !data.is_empty() {
                    buf.put_u8(data.len() as u8);
                    buf.put_slice(data);
                }
            }
        }

        trace!(len = buf.len(), cs_len, function_id, "frame encoded");
        Ok(buf)
    }

    /// Decrypt the encrypted section. The cipher only ever sees whole blocks.
    fn open_section(&self, sealed: &[u8], credentials: &Credentials<'_>) -> Result<Vec<u8>> {
        if sealed.is_empty() || sealed.len() % BLOCK_SIZE != 0 {
            debug!(len = sealed.len(), "encrypted section is not block aligned");
            return Err(FcpError::frame_invalid(format!(
                "encrypted section of {} bytes is not a multiple of {}",
                sealed.len(),
                BLOCK_SIZE
            )));
        }

        let mut section = sealed.to_vec();
        self.cipher.decrypt(credentials.key, &mut section);
        Ok(section)
    }
}

/// Check the password at the start of a decrypted section and return the
/// optional data length it declares.
fn verify_section(section: &[u8], password: &[u8]) -> Result<usize> {
    let Some(embedded) = section.get(1..1 + password.len()) else {
        return Err(FcpError::frame_invalid(format!(
            "encrypted section of {} bytes cannot hold the password",
            section.len()
        )));
    };
    if embedded != password {
        debug!("encrypted section rejected: password mismatch");
        return Err(FcpError::IncorrectPassword);
    }

    let declared = section[0] as usize;
    if declared < password.len() || 1 + declared > section.len() {
        return Err(FcpError::frame_invalid(format!(
            "encrypted section declares {} bytes in a {}-byte section",
            declared,
            section.len()
        )));
    }

    Ok(declared - password.len())
}

// ============================================================================
// Tests
// ============================================================================
