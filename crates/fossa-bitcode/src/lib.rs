//! AX.25 over FSK bit-level link layer
//!
//! FSK radios sample the channel as plain NRZ, while the satellites this
//! crate targets transmit AX.25 HDLC frames in NRZ-S. This crate recovers the
//! frame from such a capture and builds captures from frames.
//!
//! # Receive Pipeline
//!
//! | Stage               | Function                   | Output                          |
//! |---------------------|----------------------------|---------------------------------|
//! | hex parsing         | [`parse_capture`]          | sampled channel bytes           |
//! | differential decode | [`nrz_to_nrzi`]            | HDLC bitstream                  |
//! | unstuffing          | [`remove_bit_stuffing`]    | bytes between the flags         |
//! | integrity check     | [`verify_fcs`]             | FCS checked and split off       |
//! | bit reversal        | [`reverse_bytes`]          | AX.25 frame                     |
//!
//! [`nrz_to_ax25`] runs all of them. Failures come back as [`LinkError`],
//! whose [`LinkError::sentinel`] gives the short strings radio drivers
//! expect in place of a frame.
//!
//! # Example
//!
//! ```rust,ignore
//! use fossa_bitcode::{nrz_to_ax25, synchword};
//!
//! let sync = synchword(&[0x7E, 0x49, 0x39]); // [0xFE, 0xDB, 0x7B]
//! let frame = nrz_to_ax25("FEDB7B...")?;
//! ```

mod crc;
mod decode;
mod encode;
mod error;
mod hdlc;
mod nrzi;

pub use crc::*;
pub use decode::*;
pub use encode::{ax25_to_nrz, ax25_to_nrz_hex};
pub use error::*;
pub use hdlc::{remove_bit_stuffing, reverse_bytes, FLAG};
pub use nrzi::*;

/// Result type for link layer operations.
pub type Result<T> = std::result::Result<T, LinkError>;
