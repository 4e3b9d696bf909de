//! AX.25 frame to capture encoding.
//!
//! Produces the channel samples a receiver would capture for a frame, which
//! is what the decoder consumes. Useful for loopback tests and for feeding
//! recorded frames back through the receive path.

use tracing::trace;

use crate::crc::crc16;
use crate::hdlc::{reverse_bytes, stuff_bits, BitWriter, FLAG};
use crate::nrzi::nrzi_to_nrz;

/// Encode an AX.25 frame into sampled channel bytes.
///
/// The FCS is computed and appended, the frame is put into transmission bit
/// order, stuffed between an opening and a closing flag, padded to a whole
/// byte, and finally NRZ-S encoded from an idle channel.
pub fn ax25_to_nrz(frame: &[u8]) -> Vec<u8> {
    let mut unstuffed = reverse_bytes(frame);
    let fcs = crc16(&unstuffed);
    unstuffed.extend_from_slice(&fcs.to_be_bytes());

    capture_from_unstuffed(&unstuffed)
}

/// Encode an AX.25 frame into upper-case hex nibble text.
pub fn ax25_to_nrz_hex(frame: &[u8]) -> String {
    hex::encode_upper(ax25_to_nrz(frame))
}

/// Frame an already unstuffed buffer, FCS included, and encode it.
pub(crate) fn capture_from_unstuffed(unstuffed: &[u8]) -> Vec<u8> {
    let mut bits = BitWriter::new();
    bits.push_byte(FLAG);
    stuff_bits(unstuffed, &mut bits);
    bits.push_byte(FLAG);

    let stream = bits.into_padded_bytes();
    trace!(unstuffed_len = unstuffed.len(), stream_len = stream.len(), "frame stuffed");
    nrzi_to_nrz(&stream, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nrzi::synchword;

    #[test]
    fn test_capture_starts_with_sync_byte() {
        for frame in [&[][..], &[0x00][..], &[0xFF, 0xFF][..]] {
            assert_eq!(ax25_to_nrz(frame)[0], 0xFE);
        }
    }

    #[test]
    fn test_capture_matches_synchword() {
        // With no stuffing in the first data byte, the capture starts with
        // the sync word computed from the flag and the transmitted bytes.
        let frame = [0x92u8, 0x9C];
        let capture = ax25_to_nrz(&frame);
        let transmitted = reverse_bytes(&frame);
        let sw = synchword(&[FLAG, transmitted[0], transmitted[1]]);
        assert_eq!(&capture[..3], &sw[..]);
    }

    #[test]
    fn test_hex_is_upper_case() {
        let text = ax25_to_nrz_hex(b"abc");
        assert_eq!(text, text.to_uppercase());
        assert_eq!(text.len() % 2, 0);
    }
}
