//! Integration tests for the ground station tools.
//!
//! These tests drive the frame codec and the link layer decoder together
//! through the station commands.

use fossa_bitcode::{ax25_to_nrz_hex, nrz_to_ax25};
use fossa_fcp::{
    encode, legacy, telemetry, DownlinkMessage, Frame, TelemetryLayout, CMD_SET_CALLSIGN,
    RESP_PACKET_INFO, RESP_SYSTEM_INFO,
};
use fossa_gs::{
    decode_frame, decode_link, encode_frame, load_config, load_config_from_str, EncodeRequest,
    LinkStatus,
};

const STATION_YAML: &str = r#"
callsign: FOSSASAT-1
password: password
key: "000102030405060708090a0b0c0d0e0f"
telemetry_layout: v2
"#;

fn system_info_record() -> Vec<u8> {
    let mut rec = vec![0u8; 15];
    rec[0] = 210;
    rec[3] = 195;
    rec[4] = 100;
    rec[7..9].copy_from_slice(&(-250i16).to_le_bytes());
    rec[12..14].copy_from_slice(&42u16.to_le_bytes());
    rec
}

// ============================================================================
// Frame Codec Flows
// ============================================================================

#[test]
fn test_system_info_downlink() {
    let station = load_config_from_str(STATION_YAML).unwrap();
    let bytes = encode(&station.callsign, RESP_SYSTEM_INFO, Some(&system_info_record()), None).unwrap();

    let report = decode_frame(&station, &hex::encode(&bytes), false, None).unwrap();
    match report.message {
        DownlinkMessage::SystemInfo(info) => {
            assert_eq!(info.battery_charging_voltage, 4.2);
            assert_eq!(info.battery_voltage, 3.9);
            assert_eq!(info.solar_cell_voltages[0], 2.0);
            assert_eq!(info.battery_temperature, -2.5);
            assert_eq!(info.reset_counter, 42);
        }
        other => panic!("expected system info, got {:?}", other),
    }
}

#[test]
fn test_system_info_legacy_layout_override() {
    let station = load_config_from_str(STATION_YAML).unwrap();
    let rec = system_info_record();

    // The FOSSA-1 record needs 15 bytes.
    let bytes = encode(&station.callsign, RESP_SYSTEM_INFO, Some(&rec[..14]), None).unwrap();
    assert!(decode_frame(&station, &hex::encode(&bytes), false, None).is_err());

    // A legacy downlink is not a response in the FOSSA-1 table.
    let bytes = encode(&station.callsign, legacy::RESP_SYSTEM_INFO, Some(&rec[..14]), None).unwrap();
    let report = decode_frame(&station, &hex::encode(&bytes), false, None).unwrap();
    assert!(matches!(report.message, DownlinkMessage::Other { .. }));

    let report = decode_frame(&station, &hex::encode(&bytes), false, Some(TelemetryLayout::V1)).unwrap();
    assert_eq!(report.function_name, Some("system_info"));
    match report.message {
        DownlinkMessage::SystemInfo(info) => {
            assert_eq!(info.layout, TelemetryLayout::V1);
            assert_eq!(info.battery_voltage, 3.9);
            assert_eq!(info.reset_counter, 42);
            assert_eq!(info.power_configuration, 0);
        }
        other => panic!("expected system info, got {:?}", other),
    }
}

#[test]
fn test_encrypted_uplink_roundtrip() {
    let station = load_config_from_str(STATION_YAML).unwrap();
    let request = EncodeRequest {
        function_id: CMD_SET_CALLSIGN,
        opt_data: Some(b"FOSSASAT-2".to_vec()),
        encrypt: true,
        seed: Some(1),
    };
    let report = encode_frame(&station, &request).unwrap();

    let decoded = decode_frame(&station, &report.frame, true, None).unwrap();
    assert_eq!(decoded.function_id, CMD_SET_CALLSIGN);
    assert_eq!(decoded.opt_data, hex::encode_upper(b"FOSSASAT-2"));
}

#[test]
fn test_frame_for_other_station_rejected() {
    let station = load_config_from_str(STATION_YAML).unwrap();
    let bytes = encode("FOSSASAT-2", RESP_PACKET_INFO, Some(&[8, 200]), None).unwrap();

    // Same length callsign, different text.
    assert!(decode_frame(&station, &hex::encode(&bytes), false, None).is_err());
}

#[test]
fn test_accessors_match_record_view() {
    let rec = system_info_record();
    let layout = TelemetryLayout::V2;
    assert_eq!(telemetry::battery_voltage(layout, Some(&rec)), 3.9);
    assert_eq!(telemetry::battery_temperature(layout, Some(&rec)), -2.5);
    assert_eq!(telemetry::reset_counter(layout, None), 0);
}

// ============================================================================
// Link Layer Flows
// ============================================================================

#[test]
fn test_fcp_frame_over_ax25_capture() {
    let station = load_config_from_str(STATION_YAML).unwrap();
    let fcp = encode(&station.callsign, RESP_PACKET_INFO, Some(&[(-10i8) as u8, 190]), None).unwrap();

    let capture = ax25_to_nrz_hex(&fcp);
    let report = decode_link(&capture);
    assert_eq!(report.status, LinkStatus::Ok);
    assert_eq!(report.frame.as_deref(), Some(hex::encode_upper(&fcp).as_str()));

    let recovered = nrz_to_ax25(&capture).unwrap().payload;
    let frame = Frame::parse(&station.callsign, &recovered, None).unwrap();
    match DownlinkMessage::from_frame(&frame, station.telemetry_layout).unwrap() {
        DownlinkMessage::PacketInfo(info) => {
            assert_eq!(info.snr_db, -2.5);
            assert_eq!(info.rssi_dbm, -95.0);
        }
        other => panic!("expected packet info, got {:?}", other),
    }
}

#[test]
fn test_corrupted_capture_reports_sentinel() {
    let mut capture = ax25_to_nrz_hex(b"FOSSASAT-1 telemetry").into_bytes();
    // Flip a nibble in the middle of the frame.
    let mid = capture.len() / 2;
    capture[mid] = if capture[mid] == b'0' { b'F' } else { b'0' };
    let capture = String::from_utf8(capture).unwrap();

    let report = decode_link(&capture);
    assert_ne!(report.status, LinkStatus::Ok);
    let sentinel = report.sentinel.unwrap();
    assert!(sentinel == "CRC error!" || sentinel == "Frame error!");
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join(format!("fossa-gs-station-{}.yaml", std::process::id()));
    std::fs::write(&path, STATION_YAML).unwrap();

    let config = load_config(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.callsign, "FOSSASAT-1");
    assert!(config.credentials().is_some());
}

#[test]
fn test_missing_config_file() {
    let path = std::env::temp_dir().join("fossa-gs-does-not-exist.yaml");
    assert!(matches!(load_config(&path), Err(fossa_gs::GsError::Io(_))));
}
