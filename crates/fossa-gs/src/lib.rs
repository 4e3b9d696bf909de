//! FOSSA ground station tools
//!
//! This crate ties the frame codec and the link layer decoder to a station
//! configuration and exposes them as commands:
//!
//! - **encode**: build an uplink frame for the configured callsign
//! - **decode**: parse a downlink frame and decode its telemetry
//! - **link**: recover an AX.25 frame from a raw FSK capture
//! - **synchword**: compute the receiver sync word for a transmission
//!
//! The `fossa-gs` binary prints every report as JSON on stdout and logs to
//! stderr.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;

pub use commands::*;
pub use config::*;
pub use error::*;
