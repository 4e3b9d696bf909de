//! CRC-16/CCITT over the unstuffed HDLC buffer.
//!
//! The receive buffer still holds every byte in transmission bit order, so
//! the CRC runs MSB first without reflection and the FCS reads back as a
//! big-endian trailer.

/// Generator polynomial `x^16 + x^12 + x^5 + 1`.
pub const CRC_POLY: u16 = 0x1021;

/// Register preset.
pub const CRC_INIT: u16 = 0xFFFF;

/// Compute the complemented CRC-16/CCITT of `data`.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = CRC_INIT;
    for &byte in data {
        for shift in (0..8).rev() {
            let bit = (byte >> shift) & 1 == 1;
            let msb = crc & 0x8000 != 0;
            crc <<= 1;
            if bit != msb {
                crc ^= CRC_POLY;
            }
        }
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_value() {
        assert_eq!(crc16(b"123456789"), 0xD64E);
    }

    #[test]
    fn test_empty() {
        assert_eq!(crc16(&[]), 0x0000);
    }

    #[test]
    fn test_residue() {
        // Appending the FCS makes the uncomplemented register land on a
        // fixed residue regardless of the data.
        let mut data = b"FOSSASAT".to_vec();
        let fcs = crc16(&data);
        data.extend_from_slice(&fcs.to_be_bytes());
        let a = crc16(&data);

        let mut other = vec![0x00, 0x11, 0x22];
        let fcs = crc16(&other);
        other.extend_from_slice(&fcs.to_be_bytes());
        assert_eq!(crc16(&other), a);
    }
}
