//! Differential line coding.
//!
//! The satellite transmits NRZ-S: a zero data bit flips the channel state
//! and a one holds it. The radio samples the channel as plain NRZ, so every
//! capture has to be translated back before the HDLC layer can read it.
//!
//! Both directions walk bytes most significant bit first and carry a single
//! bit of channel state across byte boundaries.

/// Recover data bits from sampled channel states.
///
/// A data bit is 1 when the channel held its state and 0 when it changed.
/// `prev` is the channel state before the first sample.
pub fn nrz_to_nrzi(input: &[u8], prev: bool) -> Vec<u8> {
    let mut prev = prev;
    input
        .iter()
        .map(|&byte| {
            let mut out = 0u8;
            for shift in (0..8).rev() {
                let cur = (byte >> shift) & 1 == 1;
                out = (out << 1) | (prev == cur) as u8;
                prev = cur;
            }
            out
        })
        .collect()
}

/// Produce channel states for data bits.
///
/// Inverse of [`nrz_to_nrzi`] for the same initial state.
pub fn nrzi_to_nrz(input: &[u8], prev: bool) -> Vec<u8> {
    let mut state = prev;
    input
        .iter()
        .map(|&byte| {
            let mut out = 0u8;
            for shift in (0..8).rev() {
                if (byte >> shift) & 1 == 0 {
                    state = !state;
                }
                out = (out << 1) | state as u8;
            }
            out
        })
        .collect()
}

/// Sync word the receiver has to match for a transmission starting with
/// `leading` (the opening flag and the first data bytes).
///
/// The channel is assumed to sit at 0 before the first transmitted bit.
pub fn synchword(leading: &[u8]) -> Vec<u8> {
    nrzi_to_nrz(leading, false)
}
