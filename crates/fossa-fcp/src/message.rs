//! Received frames and the downlink messages they carry.

use serde::Serialize;
use tracing::debug;

use crate::cipher::{Credentials, SectionCipher};
use crate::codec::{function_id, FcpCodec};
use crate::function::{
    CMD_GET_PACKET_INFO, CMD_PING, CMD_RETRANSMIT, CMD_RETRANSMIT_CUSTOM,
    CMD_TRANSMIT_SYSTEM_INFO,
};
use crate::telemetry::{SystemInfo, TelemetryLayout};
use crate::{Result, TelemetryError};

/// A received frame with its optional data extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Function ID.
    pub function_id: u8,
    /// Optional data, empty when the frame carries none.
    pub opt_data: Vec<u8>,
}

impl Frame {
    /// Parse a received frame with the passthrough cipher.
    pub fn parse(callsign: &str, bytes: &[u8], credentials: Option<&Credentials<'_>>) -> Result<Self> {
        Self::parse_with(&FcpCodec::new(), callsign, bytes, credentials)
    }

    /// Parse a received frame: function ID, then optional data length, then
    /// the optional data itself.
    pub fn parse_with<C: SectionCipher>(
        codec: &FcpCodec<C>,
        callsign: &str,
        bytes: &[u8],
        credentials: Option<&Credentials<'_>>,
    ) -> Result<Self> {
        let function_id = function_id(callsign, bytes)?;
        let len = codec.opt_data_length(callsign, bytes, credentials)?;

        let mut opt_data = vec![0u8; len];
        codec.opt_data(callsign, bytes, &mut opt_data, credentials)?;

        Ok(Frame {
            function_id,
            opt_data,
        })
    }

    /// Optional data, or `None` when the frame carries none.
    pub fn opt_data(&self) -> Option<&[u8]> {
        if self.opt_data.is_empty() {
            None
        } else {
            Some(&self.opt_data)
        }
    }
}

/// Link quality the satellite measured on the last packet it received.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PacketInfo {
    /// Signal to noise ratio in dB.
    pub snr_db: f32,
    /// Received signal strength in dBm.
    pub rssi_dbm: f32,
}

impl PacketInfo {
    /// Decode the first two bytes of a packet info response.
    ///
    /// SNR is reported in quarter dB steps, RSSI in negative half dBm steps.
    pub fn decode(data: &[u8]) -> Option<Self> {
        let &[snr, rssi, ..] = data else {
            return None;
        };
        Some(PacketInfo {
            snr_db: (snr as i8) as f32 / 4.0,
            rssi_dbm: rssi as f32 / -2.0,
        })
    }
}

/// Downlink response decoded according to its function ID.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DownlinkMessage {
    /// Reply to a ping.
    Pong,
    /// System info telemetry.
    SystemInfo(SystemInfo),
    /// Link quality report.
    PacketInfo(PacketInfo),
    /// Message repeated back by the satellite.
    RepeatedMessage {
        /// Repeated bytes.
        data: Vec<u8>,
    },
    /// Any response without a dedicated decoder.
    Other {
        /// Function ID.
        function_id: u8,
        /// Optional data.
        data: Vec<u8>,
    },
}

impl DownlinkMessage {
    /// Decode the optional data of a response.
    ///
    /// `layout` names the protocol revision. It picks the function ID table
    /// the response is looked up in and the system info record layout, since
    /// neither is carried on the wire.
    pub fn decode(
        function_id: u8,
        opt_data: Option<&[u8]>,
        layout: TelemetryLayout,
    ) -> std::result::Result<Self, TelemetryError> {
        let message = match layout.functions().answered_command(function_id) {
            Some(CMD_PING) => DownlinkMessage::Pong,
            Some(CMD_TRANSMIT_SYSTEM_INFO) => {
                DownlinkMessage::SystemInfo(SystemInfo::decode(layout, opt_data)?)
            }
            Some(CMD_GET_PACKET_INFO) => match opt_data.and_then(PacketInfo::decode) {
                Some(info) => DownlinkMessage::PacketInfo(info),
                None => {
                    debug!("packet info response without link quality bytes");
                    DownlinkMessage::Other {
                        function_id,
                        data: opt_data.map(<[u8]>::to_vec).unwrap_or_default(),
                    }
                }
            },
            Some(CMD_RETRANSMIT | CMD_RETRANSMIT_CUSTOM) => DownlinkMessage::RepeatedMessage {
                data: opt_data.map(<[u8]>::to_vec).unwrap_or_default(),
            },
            _ => DownlinkMessage::Other {
                function_id,
                data: opt_data.map(<[u8]>::to_vec).unwrap_or_default(),
            },
        };
        Ok(message)
    }

    /// Decode a parsed frame.
    pub fn from_frame(frame: &Frame, layout: TelemetryLayout) -> std::result::Result<Self, TelemetryError> {
        Self::decode(frame.function_id, frame.opt_data(), layout)
    }
}
