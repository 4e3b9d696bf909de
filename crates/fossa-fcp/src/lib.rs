//! FOSSA Communication Protocol
//!
//! This crate builds and parses the frames exchanged between a ground
//! station and a FOSSA satellite over LoRa, and decodes the telemetry they
//! carry.
//!
//! # Frame Overview
//!
//! Every frame starts with the station callsign and a one-byte function ID:
//!
//! - **Public frames**: optional data follows as `[len][data]`
//! - **Private frames**: optional data travels inside an encrypted section
//!   `[len][password][data][padding]`, aligned to 16 bytes
//!
//! The callsign is not length-prefixed, so every operation takes it from the
//! caller. All operations are pure and validate the buffer they are given.
//!
//! # Example
//!
//! ```rust,ignore
//! use fossa_fcp::{encode, Frame, DownlinkMessage, TelemetryLayout, RESP_SYSTEM_INFO};
//!
//! let bytes = encode("FOSSASAT-1", RESP_SYSTEM_INFO, Some(&record), None)?;
//! let frame = Frame::parse("FOSSASAT-1", &bytes, None)?;
//! let message = DownlinkMessage::from_frame(&frame, TelemetryLayout::V2)?;
//! ```

mod cipher;
mod codec;
mod error;
mod function;
mod message;
pub mod telemetry;

pub use cipher::*;
pub use codec::*;
pub use error::*;
pub use function::*;
pub use message::*;
pub use telemetry::{SystemInfo, TelemetryLayout};

/// Result type for frame operations.
pub type Result<T> = std::result::Result<T, FcpError>;
