//! HDLC bit stuffing and flag detection.
//!
//! Inside an HDLC frame the transmitter inserts a 0 after every run of five
//! 1s, so that six 1s in a row only ever appear in the `01111110` flag.
//! Receiving reverses that and stops at the closing flag.

use tracing::trace;

use crate::LinkError;

/// HDLC flag byte.
pub const FLAG: u8 = 0x7E;

/// Run of 1s after which a 0 is stuffed.
const MAX_ONES: u32 = 5;

// ============================================================================
// Bit buffers
// ============================================================================

/// Iterate the bits of `bytes`, most significant bit first.
pub(crate) fn bits(bytes: &[u8]) -> impl Iterator<Item = bool> + '_ {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1 == 1))
}

/// Packs bits into bytes, most significant bit first.
#[derive(Debug, Default)]
pub(crate) struct BitWriter {
    bytes: Vec<u8>,
    current: u8,
    filled: u8,
}

impl BitWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, bit: bool) {
        self.current = (self.current << 1) | bit as u8;
        self.filled += 1;
        if self.filled == 8 {
            self.bytes.push(self.current);
            self.current = 0;
            self.filled = 0;
        }
    }

    pub(crate) fn push_byte(&mut self, byte: u8) {
        for shift in (0..8).rev() {
            self.push((byte >> shift) & 1 == 1);
        }
    }

    /// Bits written to the byte in progress.
    pub(crate) fn pending_bits(&self) -> u8 {
        self.filled
    }

    /// Completed bytes; a partial byte is dropped.
    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// All bytes, the last one completed with 0 bits.
    pub(crate) fn into_padded_bytes(mut self) -> Vec<u8> {
        while self.filled != 0 {
            self.push(false);
        }
        self.bytes
    }
}

// ============================================================================
// Stuffing
// ============================================================================

/// Write `data` into `out` with a 0 inserted after every five 1s.
pub(crate) fn stuff_bits(data: &[u8], out: &mut BitWriter) {
    let mut ones = 0;
    for bit in bits(data) {
        out.push(bit);
        if !bit {
            ones = 0;
            continue;
        }
        ones += 1;
        if ones == MAX_ONES {
            out.push(false);
            ones = 0;
        }
    }
}

/// Remove bit stuffing from a decoded bitstream and stop at the closing
/// flag.
///
/// The first byte is the opening flag recovered from the sync word and is
/// skipped. The remaining bits are scanned through a three-bit window. After
/// five 1s, a following 0 is a stuffed bit and is dropped, while a following
/// `10` is the closing flag.
///
/// The flag must start on a byte boundary of the unstuffed output, i.e. its
/// leading 0 and five 1s leave exactly six bits in the byte in progress.
/// This holds as long as the sync byte is exactly `0xFE`; any capture that
/// violates it is reported as a framing error.
pub fn remove_bit_stuffing(nrzi: &[u8]) -> Result<Vec<u8>, LinkError> {
    let Some(stream) = nrzi.get(1..).filter(|rest| !rest.is_empty()) else {
        return Err(LinkError::TooShort { len: nrzi.len() });
    };

    let mut stream = bits(stream);
    // At least eight bits remain, so both reads succeed.
    let mut bit2 = stream.next().unwrap_or(false);
    let mut bit3 = stream.next().unwrap_or(false);

    let mut out = BitWriter::new();
    let mut ones = 0;
    let mut skip = false;

    for bit in stream {
        let bit1 = bit2;
        bit2 = bit3;
        bit3 = bit;

        if skip {
            skip = false;
            continue;
        }

        out.push(bit1);
        if !bit1 {
            ones = 0;
            continue;
        }

        ones += 1;
        if ones < MAX_ONES {
            continue;
        }

        if !bit2 {
            // Stuffed bit.
            ones = 0;
            skip = true;
            continue;
        }

        if bit3 {
            return Err(LinkError::frame("seven consecutive ones"));
        }
        if out.pending_bits() != 6 {
            return Err(LinkError::frame(format!(
                "closing flag misaligned by {} bits",
                (out.pending_bits() + 8 - 6) % 8
            )));
        }

        let bytes = out.into_bytes();
        trace!(len = bytes.len(), "closing flag found");
        return Ok(bytes);
    }

    Err(LinkError::frame("closing flag not found"))
}

/// Reverse the bit order of every byte.
pub fn reverse_bytes(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().map(|b| b.reverse_bits()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stuffed_stream(unstuffed: &[u8]) -> Vec<u8> {
        let mut w = BitWriter::new();
        w.push_byte(FLAG);
        stuff_bits(unstuffed, &mut w);
        w.push_byte(FLAG);
        w.into_padded_bytes()
    }

    #[test]
    fn test_bit_writer() {
        let mut w = BitWriter::new();
        w.push_byte(0xA5);
        w.push(true);
        w.push(false);
        assert_eq!(w.pending_bits(), 2);
        assert_eq!(w.into_padded_bytes(), vec![0xA5, 0x80]);
    }

    #[test]
    fn test_stuff_bits() {
        let mut w = BitWriter::new();
        stuff_bits(&[0xFF], &mut w);
        // 11111 0 111
        assert_eq!(w.pending_bits(), 1);
        assert_eq!(w.into_padded_bytes(), vec![0xFB, 0x80]);
    }

    #[test]
    fn test_remove_stuffing_roundtrip() {
        let data = [0x00, 0xFF, 0xFF, 0x7E, 0x7C, 0x3E, 0x1F, 0xF8, 0x01];
        let stream = stuffed_stream(&data);
        assert_eq!(remove_bit_stuffing(&stream).unwrap(), data);
    }

    #[test]
    fn test_empty_frame() {
        let stream = stuffed_stream(&[]);
        assert_eq!(remove_bit_stuffing(&stream).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_missing_flag() {
        let err = remove_bit_stuffing(&[FLAG, 0x00, 0x12, 0x34, 0x00]).unwrap_err();
        assert_eq!(err, LinkError::frame("closing flag not found"));
        assert_eq!(err.sentinel(), b"Frame error!");
    }

    #[test]
    fn test_seven_ones() {
        let err = remove_bit_stuffing(&[FLAG, 0x00, 0xFF]).unwrap_err();
        assert_eq!(err, LinkError::frame("seven consecutive ones"));
    }

    #[test]
    fn test_misaligned_flag() {
        let mut w = BitWriter::new();
        w.push_byte(FLAG);
        w.push(false);
        w.push(false);
        w.push(false);
        w.push_byte(FLAG);
        let stream = w.into_padded_bytes();

        assert!(matches!(remove_bit_stuffing(&stream), Err(LinkError::Frame(_))));
    }

    #[test]
    fn test_too_short() {
        assert_eq!(remove_bit_stuffing(&[]), Err(LinkError::TooShort { len: 0 }));
        assert_eq!(remove_bit_stuffing(&[FLAG]), Err(LinkError::TooShort { len: 1 }));
    }

    #[test]
    fn test_reverse_bytes() {
        assert_eq!(reverse_bytes(&[0x01, 0x80, 0xF0, 0x7E]), vec![0x80, 0x01, 0x0F, 0x7E]);
    }
}
