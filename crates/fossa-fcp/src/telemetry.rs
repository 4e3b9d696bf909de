//! System info telemetry decoding.
//!
//! The optional data of a system info response is a fixed-offset,
//! little-endian record. Two revisions of the record are in use:
//!
//! | Field                     | Type | V1 offset | V2 offset | Scale        |
//! |---------------------------|------|-----------|-----------|--------------|
//! | battery charging voltage  | u8   | 0         | 0         | 20 mV        |
//! | battery charging current  | i16  | 1         | 1         | 10 uA        |
//! | battery voltage           | u8   | 3         | 3         | 20 mV        |
//! | solar cell A/B/C voltage  | u8   | 4, 5, 6   | 4, 5, 6   | 20 mV        |
//! | battery temperature       | i16  | 7         | 7         | 0.01 degC    |
//! | board temperature         | i16  | 9         | 9         | 0.01 degC    |
//! | MCU temperature           | i8   | 10        | 10        | 1 degC, raw  |
//! | reset counter             | u16  | 12        | 12        | raw          |
//! | power configuration       | u8   | -         | 14        | raw bitfield |
//!
//! V1 is the 14-byte legacy record, V2 the 15-byte FOSSA-1 record. In both
//! the MCU temperature byte overlaps the high byte of the board temperature;
//! that is how the satellite packs it.
//!
//! The layout also names the protocol revision, so it selects the function
//! ID table as well (see [`crate::FunctionTable`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::function::{self, legacy, FunctionTable, FOSSA1_FUNCTIONS, LEGACY_FUNCTIONS};
use crate::TelemetryError;

// ============================================================================
// Scale pairs
// ============================================================================

/// Voltage multiplier (raw step in mV).
pub const VOLTAGE_MULTIPLIER: i32 = 20;
/// Voltage unit (mV per V).
pub const VOLTAGE_UNIT: i32 = 1000;
/// Current multiplier (raw step in uA).
pub const CURRENT_MULTIPLIER: i32 = 10;
/// Current unit (uA per A).
pub const CURRENT_UNIT: i32 = 1_000_000;
/// Temperature multiplier (raw step in 0.001 degC).
pub const TEMPERATURE_MULTIPLIER: i32 = 10;
/// Temperature unit.
pub const TEMPERATURE_UNIT: i32 = 1000;

/// Scale a raw voltage reading to volts.
pub fn voltage_field(raw: u8) -> f32 {
    scale(raw as i32, VOLTAGE_MULTIPLIER, VOLTAGE_UNIT)
}

/// Scale a raw current reading to amperes.
pub fn current_field(raw: i16) -> f32 {
    scale(raw as i32, CURRENT_MULTIPLIER, CURRENT_UNIT)
}

/// Scale a raw temperature reading to degrees Celsius.
pub fn temperature_field(raw: i16) -> f32 {
    scale(raw as i32, TEMPERATURE_MULTIPLIER, TEMPERATURE_UNIT)
}

fn scale(raw: i32, multiplier: i32, unit: i32) -> f32 {
    // Multiply in integers so that whole steps stay exact.
    (raw * multiplier) as f32 / unit as f32
}

// ============================================================================
// Layouts
// ============================================================================

/// Protocol revision: the system info record and the function ID table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TelemetryLayout {
    /// Legacy 14-byte record.
    V1,
    /// FOSSA-1 15-byte record.
    #[default]
    V2,
}

struct Offsets {
    charging_voltage: usize,
    charging_current: usize,
    battery_voltage: usize,
    solar_cells: usize,
    battery_temperature: usize,
    board_temperature: usize,
    mcu_temperature: usize,
    reset_counter: Option<usize>,
    power_configuration: Option<usize>,
    len: usize,
}

const V1_OFFSETS: Offsets = Offsets {
    charging_voltage: 0,
    charging_current: 1,
    battery_voltage: 3,
    solar_cells: 4,
    battery_temperature: 7,
    board_temperature: 9,
    mcu_temperature: 10,
    reset_counter: Some(12),
    power_configuration: None,
    len: 14,
};

const V2_OFFSETS: Offsets = Offsets {
    charging_voltage: 0,
    charging_current: 1,
    battery_voltage: 3,
    solar_cells: 4,
    battery_temperature: 7,
    board_temperature: 9,
    mcu_temperature: 10,
    reset_counter: Some(12),
    power_configuration: Some(14),
    len: 15,
};

impl TelemetryLayout {
    /// Number of bytes a complete record occupies.
    pub fn record_len(self) -> usize {
        self.offsets().len
    }

    /// Function ID table of this revision.
    pub fn functions(self) -> &'static FunctionTable {
        match self {
            TelemetryLayout::V1 => &LEGACY_FUNCTIONS,
            TelemetryLayout::V2 => &FOSSA1_FUNCTIONS,
        }
    }

    /// Human readable name of a function ID in this revision.
    pub fn function_name(self, function_id: u8) -> Option<&'static str> {
        match self {
            TelemetryLayout::V1 => legacy::function_name(function_id),
            TelemetryLayout::V2 => function::function_name(function_id),
        }
    }

    fn offsets(self) -> &'static Offsets {
        match self {
            TelemetryLayout::V1 => &V1_OFFSETS,
            TelemetryLayout::V2 => &V2_OFFSETS,
        }
    }
}

impl fmt::Display for TelemetryLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryLayout::V1 => write!(f, "v1"),
            TelemetryLayout::V2 => write!(f, "v2"),
        }
    }
}

impl FromStr for TelemetryLayout {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" | "legacy" => Ok(TelemetryLayout::V1),
            "v2" | "fossa-1" | "fossa1" => Ok(TelemetryLayout::V2),
            _ => Err(TelemetryError::UnknownLayout(s.to_string())),
        }
    }
}

// ============================================================================
// Raw readers
// ============================================================================

fn read_u8(data: &[u8], offset: usize) -> Option<u8> {
    data.get(offset).copied()
}

fn read_i8(data: &[u8], offset: usize) -> Option<i8> {
    read_u8(data, offset).map(|b| b as i8)
}

fn read_i16(data: &[u8], offset: usize) -> Option<i16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(i16::from_le_bytes([bytes[0], bytes[1]]))
}

fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

// ============================================================================
// Field accessors
// ============================================================================
//
// Each accessor returns zero when the buffer is absent or does not reach
// the field.

/// Battery charging voltage in volts.
pub fn battery_charging_voltage(layout: TelemetryLayout, data: Option<&[u8]>) -> f32 {
    data.and_then(|d| read_u8(d, layout.offsets().charging_voltage))
        .map_or(0.0, voltage_field)
}

/// Battery charging current in amperes.
pub fn battery_charging_current(layout: TelemetryLayout, data: Option<&[u8]>) -> f32 {
    data.and_then(|d| read_i16(d, layout.offsets().charging_current))
        .map_or(0.0, current_field)
}

/// Battery voltage in volts.
pub fn battery_voltage(layout: TelemetryLayout, data: Option<&[u8]>) -> f32 {
    data.and_then(|d| read_u8(d, layout.offsets().battery_voltage))
        .map_or(0.0, voltage_field)
}

/// Voltage of solar cell `cell` (0, 1 or 2) in volts. Other cells read 0.
pub fn solar_cell_voltage(layout: TelemetryLayout, cell: usize, data: Option<&[u8]>) -> f32 {
    if cell > 2 {
        return 0.0;
    }
    data.and_then(|d| read_u8(d, layout.offsets().solar_cells + cell))
        .map_or(0.0, voltage_field)
}

/// Battery temperature in degrees Celsius.
pub fn battery_temperature(layout: TelemetryLayout, data: Option<&[u8]>) -> f32 {
    data.and_then(|d| read_i16(d, layout.offsets().battery_temperature))
        .map_or(0.0, temperature_field)
}

/// Board temperature in degrees Celsius.
pub fn board_temperature(layout: TelemetryLayout, data: Option<&[u8]>) -> f32 {
    data.and_then(|d| read_i16(d, layout.offsets().board_temperature))
        .map_or(0.0, temperature_field)
}

/// MCU temperature in whole degrees Celsius.
pub fn mcu_temperature(layout: TelemetryLayout, data: Option<&[u8]>) -> i8 {
    data.and_then(|d| read_i8(d, layout.offsets().mcu_temperature))
        .unwrap_or(0)
}

/// Reset counter.
pub fn reset_counter(layout: TelemetryLayout, data: Option<&[u8]>) -> u16 {
    match (data, layout.offsets().reset_counter) {
        (Some(d), Some(offset)) => read_u16(d, offset).unwrap_or(0),
        _ => 0,
    }
}

/// Power configuration bitfield. Always 0 for the legacy record.
pub fn power_configuration(layout: TelemetryLayout, data: Option<&[u8]>) -> u8 {
    match (data, layout.offsets().power_configuration) {
        (Some(d), Some(offset)) => read_u8(d, offset).unwrap_or(0),
        _ => 0,
    }
}

// ============================================================================
// Record view
// ============================================================================

/// Decoded system info record in engineering units.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SystemInfo {
    /// Record revision this was decoded from.
    pub layout: TelemetryLayout,
    pub battery_charging_voltage: f32,
    pub battery_charging_current: f32,
    pub battery_voltage: f32,
    pub solar_cell_voltages: [f32; 3],
    pub battery_temperature: f32,
    pub board_temperature: f32,
    pub mcu_temperature: i8,
    pub reset_counter: u16,
    pub power_configuration: u8,
}

impl SystemInfo {
    /// Decode a complete record.
    ///
    /// An absent buffer yields the default (all zero) record. A present
    /// buffer must hold the whole record.
    pub fn decode(layout: TelemetryLayout, data: Option<&[u8]>) -> Result<Self, TelemetryError> {
        let Some(bytes) = data else {
            return Ok(SystemInfo {
                layout,
                ..Default::default()
            });
        };

        let needed = layout.record_len();
        if bytes.len() < needed {
            return Err(TelemetryError::TooShort {
                needed,
                actual: bytes.len(),
            });
        }

        Ok(SystemInfo {
            layout,
            battery_charging_voltage: battery_charging_voltage(layout, data),
            battery_charging_current: battery_charging_current(layout, data),
            battery_voltage: battery_voltage(layout, data),
            solar_cell_voltages: [
                solar_cell_voltage(layout, 0, data),
                solar_cell_voltage(layout, 1, data),
                solar_cell_voltage(layout, 2, data),
            ],
            battery_temperature: battery_temperature(layout, data),
            board_temperature: board_temperature(layout, data),
            mcu_temperature: mcu_temperature(layout, data),
            reset_counter: reset_counter(layout, data),
            power_configuration: power_configuration(layout, data),
        })
    }
}

/// Decode a legacy system info record.
pub fn system_info_v1(data: Option<&[u8]>) -> Result<SystemInfo, TelemetryError> {
    SystemInfo::decode(TelemetryLayout::V1, data)
}

/// Decode a FOSSA-1 system info record.
pub fn system_info_v2(data: Option<&[u8]>) -> Result<SystemInfo, TelemetryError> {
    SystemInfo::decode(TelemetryLayout::V2, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v2_record() -> Vec<u8> {
        let mut rec = vec![0u8; 15];
        rec[0] = 210; // 4.2 V
        rec[1..3].copy_from_slice(&(-5000i16).to_le_bytes()); // -0.05 A
        rec[3] = 200; // 4.0 V
        rec[4] = 100;
        rec[5] = 101;
        rec[6] = 102;
        rec[7..9].copy_from_slice(&2500i16.to_le_bytes()); // 25 degC
        rec[9] = 0x18; // board low byte
        rec[10] = 0x1E; // board high byte, MCU temperature 30
        rec[12..14].copy_from_slice(&513u16.to_le_bytes());
        rec[14] = 0b1010_0101;
        rec
    }

    #[test]
    fn test_scaling() {
        assert_eq!(voltage_field(50), 1.0);
        assert_eq!(temperature_field(250), 2.5);
        assert_eq!(temperature_field(-100), -1.0);
        assert!((current_field(100) - 0.001).abs() < 1e-9);
        assert!((current_field(i16::MIN) + 0.32768).abs() < 1e-6);
    }

    #[test]
    fn test_absent_buffer_reads_zero() {
        for layout in [TelemetryLayout::V1, TelemetryLayout::V2] {
            assert_eq!(battery_voltage(layout, None), 0.0);
            assert_eq!(battery_charging_current(layout, None), 0.0);
            assert_eq!(mcu_temperature(layout, None), 0);
            assert_eq!(reset_counter(layout, None), 0);

            let info = SystemInfo::decode(layout, None).unwrap();
            assert_eq!(info.layout, layout);
            assert_eq!(info.battery_voltage, 0.0);
        }
    }

    #[test]
    fn test_short_buffer() {
        let short = [10u8, 0, 0];
        assert_eq!(
            SystemInfo::decode(TelemetryLayout::V2, Some(&short)),
            Err(TelemetryError::TooShort {
                needed: 15,
                actual: 3
            })
        );
        // Fields inside the buffer still read, fields past it read zero.
        assert_eq!(battery_charging_voltage(TelemetryLayout::V2, Some(&short)), 0.2);
        assert_eq!(battery_voltage(TelemetryLayout::V2, Some(&short)), 0.0);
        assert_eq!(board_temperature(TelemetryLayout::V2, Some(&short)), 0.0);
    }

    #[test]
    fn test_decode_v2() {
        let rec = v2_record();
        let info = system_info_v2(Some(&rec)).unwrap();

        assert_eq!(info.battery_charging_voltage, 4.2);
        assert!((info.battery_charging_current + 0.05).abs() < 1e-6);
        assert_eq!(info.battery_voltage, 4.0);
        assert_eq!(info.solar_cell_voltages, [2.0, 2.02, 2.04]);
        assert_eq!(info.battery_temperature, 25.0);
        assert_eq!(info.board_temperature, temperature_field(0x1E18));
        assert_eq!(info.mcu_temperature, 30);
        assert_eq!(info.reset_counter, 513);
        assert_eq!(info.power_configuration, 0b1010_0101);
    }

    #[test]
    fn test_decode_v1() {
        let mut rec = v2_record();
        rec.truncate(14);
        rec[10] = 25;
        rec[12..14].copy_from_slice(&7u16.to_le_bytes());

        let info = system_info_v1(Some(&rec)).unwrap();
        assert_eq!(info.layout, TelemetryLayout::V1);
        assert_eq!(info.battery_voltage, 4.0);
        assert_eq!(info.solar_cell_voltages, [2.0, 2.02, 2.04]);
        assert_eq!(info.battery_temperature, 25.0);
        assert_eq!(info.mcu_temperature, 25);
        assert_eq!(info.reset_counter, 7);
        assert_eq!(info.power_configuration, 0);

        assert_eq!(
            system_info_v1(Some(&rec[..13])),
            Err(TelemetryError::TooShort {
                needed: 14,
                actual: 13
            })
        );
        assert!(SystemInfo::decode(TelemetryLayout::V2, Some(&rec)).is_err());
    }

    #[test]
    fn test_solar_cell_out_of_range() {
        let rec = v2_record();
        assert_eq!(solar_cell_voltage(TelemetryLayout::V2, 3, Some(&rec)), 0.0);
    }

    #[test]
    fn test_layout_selects_function_table() {
        assert_eq!(TelemetryLayout::V1.functions().response_offset, 0x10);
        assert_eq!(TelemetryLayout::V2.functions().response_offset, 0x20);
        assert_eq!(TelemetryLayout::V1.function_name(0x13), Some("system_info"));
        assert_eq!(TelemetryLayout::V2.function_name(0x13), None);
        assert_eq!(TelemetryLayout::V2.function_name(0x23), Some("system_info"));
    }

    #[test]
    fn test_layout_parse() {
        assert_eq!("v1".parse::<TelemetryLayout>().unwrap(), TelemetryLayout::V1);
        assert_eq!("FOSSA-1".parse::<TelemetryLayout>().unwrap(), TelemetryLayout::V2);
        assert!(matches!(
            "v3".parse::<TelemetryLayout>(),
            Err(TelemetryError::UnknownLayout(_))
        ));
        assert_eq!(TelemetryLayout::V1.to_string(), "v1");
    }
}
