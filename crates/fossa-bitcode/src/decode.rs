//! Capture to AX.25 frame decoding.

use tracing::{debug, warn};

use crate::crc::crc16;
use crate::hdlc::{remove_bit_stuffing, reverse_bytes};
use crate::nrzi::nrz_to_nrzi;
use crate::{LinkError, Result};

/// Length of the frame check sequence trailer.
pub const FCS_LEN: usize = 2;

/// AX.25 frame recovered from a capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ax25Frame {
    /// Frame bytes in AX.25 bit order, without the FCS.
    pub payload: Vec<u8>,
    /// Frame check sequence as carried on the wire.
    pub fcs: u16,
}

/// Parse capture text, one hex character per nibble.
///
/// Surrounding whitespace is ignored; either letter case is accepted.
pub fn parse_capture(text: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(text.trim())?)
}

/// Decode a capture given as hex nibble text.
pub fn nrz_to_ax25(capture: &str) -> Result<Ax25Frame> {
    nrz_bytes_to_ax25(&parse_capture(capture)?)
}

/// Decode a capture of sampled channel bytes.
///
/// The pipeline is differential decoding, bit unstuffing up to the closing
/// flag, an FCS check over the unstuffed bytes, and finally per-byte bit
/// reversal into AX.25 order.
pub fn nrz_bytes_to_ax25(capture: &[u8]) -> Result<Ax25Frame> {
    let nrzi = nrz_to_nrzi(capture, false);
    let unstuffed = match remove_bit_stuffing(&nrzi) {
        Ok(unstuffed) => unstuffed,
        Err(err) => {
            debug!(capture_len = capture.len(), %err, "framing failed");
            return Err(err);
        }
    };
    let frame = verify_fcs(&unstuffed)?;

    debug!(
        capture_len = capture.len(),
        frame_len = frame.payload.len(),
        "AX.25 frame decoded"
    );
    Ok(frame)
}

/// Check the FCS trailer of an unstuffed buffer and split it off.
pub fn verify_fcs(unstuffed: &[u8]) -> Result<Ax25Frame> {
    if unstuffed.len() < FCS_LEN {
        return Err(LinkError::frame(format!(
            "{} bytes between flags cannot hold an FCS",
            unstuffed.len()
        )));
    }

    let (body, trailer) = unstuffed.split_at(unstuffed.len() - FCS_LEN);
    let received = u16::from_be_bytes([trailer[0], trailer[1]]);
    let computed = crc16(body);
    if received != computed {
        warn!(received, computed, "FCS mismatch");
        return Err(LinkError::Crc { received, computed });
    }

    Ok(Ax25Frame {
        payload: reverse_bytes(body),
        fcs: received,
    })
}

/// Decode a capture the way the radio driver expects it: the frame bytes on
/// success, otherwise the `Frame error!` or `CRC error!` sentinel.
pub fn nrz_to_ax25_or_sentinel(capture: &str) -> Vec<u8> {
    match nrz_to_ax25(capture) {
        Ok(frame) => frame.payload,
        Err(err) => err.sentinel().to_vec(),
    }
}
