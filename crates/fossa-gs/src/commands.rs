//! Ground station commands.
//!
//! Each command returns a serializable report; the binary prints it as JSON.

use fossa_bitcode::{nrz_to_ax25, synchword, LinkError};
use fossa_fcp::{DownlinkMessage, FcpCodec, Frame, FunctionClass, TelemetryLayout};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{info, warn};

use crate::{GsError, StationConfig};

// ============================================================================
// Encode
// ============================================================================

/// Frame to encode.
#[derive(Debug, Clone, Default)]
pub struct EncodeRequest {
    /// Function ID.
    pub function_id: u8,
    /// Optional data.
    pub opt_data: Option<Vec<u8>>,
    /// Put the optional data into an encrypted section.
    pub encrypt: bool,
    /// Seed for the padding RNG, for reproducible frames.
    pub seed: Option<u64>,
}

/// Encoded frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodeReport {
    pub callsign: String,
    pub function_id: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<&'static str>,
    pub encrypted: bool,
    pub length: usize,
    /// Frame bytes as upper-case hex.
    pub frame: String,
}

/// Encode a frame for `station`.
pub fn encode_frame(station: &StationConfig, request: &EncodeRequest) -> Result<EncodeReport, GsError> {
    station.validate()?;

    let layout = station.telemetry_layout;
    let class = layout.functions().classify(request.function_id);
    if class.requires_encryption() && !request.encrypt {
        warn!(
            function_id = request.function_id,
            "private command encoded without encryption"
        );
    }

    let credentials = if request.encrypt {
        Some(station.require_credentials("encryption")?)
    } else {
        None
    };

    let codec = FcpCodec::new();
    let opt_data = request.opt_data.as_deref();
    let frame = match request.seed {
        Some(seed) => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            codec.encode_with_rng(
                &station.callsign,
                request.function_id,
                opt_data,
                credentials.as_ref(),
                &mut rng,
            )?
        }
        None => codec.encode(
            &station.callsign,
            request.function_id,
            opt_data,
            credentials.as_ref(),
        )?,
    };

    info!(
        function_id = request.function_id,
        len = frame.len(),
        encrypted = request.encrypt,
        "frame encoded"
    );

    Ok(EncodeReport {
        callsign: station.callsign.clone(),
        function_id: request.function_id,
        function_name: layout.function_name(request.function_id),
        encrypted: request.encrypt,
        length: frame.len(),
        frame: hex::encode_upper(&frame),
    })
}

// ============================================================================
// Decode
// ============================================================================

/// Decoded frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodeReport {
    pub function_id: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<&'static str>,
    pub function_class: FunctionClass,
    /// Optional data as upper-case hex.
    pub opt_data: String,
    pub message: DownlinkMessage,
}

/// Decode a received frame given as hex.
///
/// `layout` overrides the station's protocol revision.
pub fn decode_frame(
    station: &StationConfig,
    frame_hex: &str,
    encrypted: bool,
    layout: Option<TelemetryLayout>,
) -> Result<DecodeReport, GsError> {
    station.validate()?;

    let bytes = hex::decode(frame_hex.trim())?;
    let credentials = if encrypted {
        Some(station.require_credentials("decryption")?)
    } else {
        None
    };

    let layout = layout.unwrap_or(station.telemetry_layout);
    let frame = Frame::parse(&station.callsign, &bytes, credentials.as_ref())?;
    let message = DownlinkMessage::from_frame(&frame, layout)?;

    info!(
        function_id = frame.function_id,
        opt_len = frame.opt_data.len(),
        "frame decoded"
    );

    Ok(DecodeReport {
        function_id: frame.function_id,
        function_name: layout.function_name(frame.function_id),
        function_class: layout.functions().classify(frame.function_id),
        opt_data: hex::encode_upper(&frame.opt_data),
        message,
    })
}

// ============================================================================
// Link
// ============================================================================

/// Outcome of a link layer decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    Ok,
    FrameError,
    CrcError,
}

/// Link layer decode result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub status: LinkStatus,
    /// AX.25 frame as upper-case hex.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fcs: Option<u16>,
    /// Sentinel a radio driver would receive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentinel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Recover an AX.25 frame from a capture given as hex nibbles.
///
/// Decoding failures are part of the report, not errors.
pub fn decode_link(capture: &str) -> LinkReport {
    match nrz_to_ax25(capture) {
        Ok(frame) => {
            info!(len = frame.payload.len(), "AX.25 frame recovered");
            LinkReport {
                status: LinkStatus::Ok,
                length: Some(frame.payload.len()),
                frame: Some(hex::encode_upper(&frame.payload)),
                fcs: Some(frame.fcs),
                sentinel: None,
                error: None,
            }
        }
        Err(err) => {
            warn!(%err, "link decode failed");
            let status = match err {
                LinkError::Crc { .. } => LinkStatus::CrcError,
                _ => LinkStatus::FrameError,
            };
            LinkReport {
                status,
                frame: None,
                length: None,
                fcs: None,
                sentinel: Some(String::from_utf8_lossy(err.sentinel()).into_owned()),
                error: Some(err.to_string()),
            }
        }
    }
}

// ============================================================================
// Synchword
// ============================================================================

/// Receiver sync word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynchwordReport {
    /// Leading transmitted bytes as upper-case hex.
    pub leading: String,
    /// Sync word as upper-case hex.
    pub synchword: String,
    pub bytes: Vec<u8>,
}

/// Compute the sync word for the leading bytes of a transmission.
pub fn compute_synchword(leading_hex: &str) -> Result<SynchwordReport, GsError> {
    let leading = hex::decode(leading_hex.trim())?;
    if leading.is_empty() {
        return Err(GsError::config("sync word needs at least one leading byte"));
    }
    let bytes = synchword(&leading);

    Ok(SynchwordReport {
        leading: hex::encode_upper(&leading),
        synchword: hex::encode_upper(&bytes),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fossa_fcp::{FcpError, CMD_PING, CMD_SET_CALLSIGN, RESP_PONG};

    fn station() -> StationConfig {
        StationConfig {
            callsign: "FOSSASAT-1".to_string(),
            password: Some("password".to_string()),
            key: Some("000102030405060708090a0b0c0d0e0f".parse().unwrap()),
            telemetry_layout: TelemetryLayout::V2,
        }
    }

    #[test]
    fn test_encode_ping() {
        let report = encode_frame(
            &station(),
            &EncodeRequest {
                function_id: CMD_PING,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(report.frame, "464F5353415341542D3100");
        assert_eq!(report.length, 11);
        assert_eq!(report.function_name, Some("ping"));
    }

    #[test]
    fn test_encode_seeded_is_reproducible() {
        let request = EncodeRequest {
            function_id: CMD_SET_CALLSIGN,
            opt_data: Some(b"NEWCALL".to_vec()),
            encrypt: true,
            seed: Some(7),
        };
        let a = encode_frame(&station(), &request).unwrap();
        let b = encode_frame(&station(), &request).unwrap();
        assert_eq!(a, b);
        assert!(a.encrypted);
        assert_eq!((a.length - 11) % 16, 0);
    }

    #[test]
    fn test_encrypt_without_credentials() {
        let mut station = station();
        station.key = None;
        station.password = None;
        let request = EncodeRequest {
            function_id: CMD_SET_CALLSIGN,
            encrypt: true,
            ..Default::default()
        };
        assert!(matches!(encode_frame(&station, &request), Err(GsError::Config(_))));
    }

    #[test]
    fn test_decode_pong() {
        let report = decode_frame(&station(), "464F5353415341542D3120", false, None).unwrap();
        assert_eq!(report.function_id, RESP_PONG);
        assert_eq!(report.function_class, FunctionClass::PublicResponse);
        assert_eq!(report.message, DownlinkMessage::Pong);
        assert_eq!(report.opt_data, "");
    }

    #[test]
    fn test_legacy_revision_names() {
        let mut station = station();
        station.telemetry_layout = TelemetryLayout::V1;

        let report = encode_frame(
            &station,
            &EncodeRequest {
                function_id: 0x24,
                opt_data: Some(b"NEW".to_vec()),
                encrypt: true,
                seed: Some(1),
            },
        )
        .unwrap();
        assert_eq!(report.function_name, Some("set_callsign"));

        // Legacy pong is 0x10.
        let report = decode_frame(&station, "464F5353415341542D3110", false, None).unwrap();
        assert_eq!(report.function_name, Some("pong"));
        assert_eq!(report.function_class, FunctionClass::PublicResponse);
        assert_eq!(report.message, DownlinkMessage::Pong);
    }

    #[test]
    fn test_decode_other_callsign() {
        // Pong addressed to FOSSASAT-2.
        let err = decode_frame(&station(), "464F5353415341542D3220", false, None).unwrap_err();
        assert!(matches!(err, GsError::Fcp(FcpError::CallsignInvalid)));
        assert!(err.to_string().starts_with("FCP error: "));
    }

    #[test]
    fn test_decode_bad_hex() {
        assert!(matches!(
            decode_frame(&station(), "46Z", false, None),
            Err(GsError::Hex(_))
        ));
    }

    #[test]
    fn test_decode_link_errors() {
        let report = decode_link("FE");
        assert_eq!(report.status, LinkStatus::FrameError);
        assert_eq!(report.sentinel.as_deref(), Some("Frame error!"));
        assert!(report.frame.is_none());
    }

    #[test]
    fn test_synchword() {
        let report = compute_synchword("7e4939").unwrap();
        assert_eq!(report.synchword, "FEDB7B");
        assert_eq!(report.bytes, vec![0xFE, 0xDB, 0x7B]);
        assert!(compute_synchword("").is_err());
    }
}
