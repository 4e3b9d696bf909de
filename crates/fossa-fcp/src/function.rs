//! Function identifiers.
//!
//! Every frame carries a single function ID byte. Public commands are sent
//! in the clear and public responses answer them at a fixed offset. Private
//! commands only ever travel inside the encrypted section.
//!
//! The FOSSA-1 table is the default:
//!
//! ```text
//! 0x00 ..= 0x08   public commands   (uplink, unencrypted)
//! 0x20 ..= 0x32   public responses  (downlink, unencrypted)
//! 0x40 ..= 0x53   private commands  (uplink, encrypted)
//! ```
//!
//! The legacy revision uses smaller offsets (see [`legacy`]):
//!
//! ```text
//! 0x00 ..= 0x04   public commands
//! 0x10 ..= 0x14   public responses
//! 0x20 ..= 0x27   private commands
//! 0x30 ..= 0x31   private responses (downlink, encrypted)
//! ```

use serde::Serialize;

/// Distance between a public command and its response.
pub const RESPONSE_OFFSET: u8 = 0x20;
/// Base of the private (encrypted) command range.
pub const PRIVATE_OFFSET: u8 = 0x40;

// ============================================================================
// Public Commands (uplink, unencrypted)
// ============================================================================

/// Ask the satellite for a pong.
pub const CMD_PING: u8 = 0x00;
/// Ask the satellite to repeat the optional data.
pub const CMD_RETRANSMIT: u8 = 0x01;
/// Repeat with custom radio settings.
pub const CMD_RETRANSMIT_CUSTOM: u8 = 0x02;
/// Request the system info telemetry block.
pub const CMD_TRANSMIT_SYSTEM_INFO: u8 = 0x03;
/// Request reception info about the last uplink packet.
pub const CMD_GET_PACKET_INFO: u8 = 0x04;
/// Request statistics.
pub const CMD_GET_STATISTICS: u8 = 0x05;
/// Request the full system info block.
pub const CMD_GET_FULL_SYSTEM_INFO: u8 = 0x06;
/// Store a message for later forwarding.
pub const CMD_STORE_AND_FORWARD_ADD: u8 = 0x07;
/// Request a stored message.
pub const CMD_STORE_AND_FORWARD_REQUEST: u8 = 0x08;

/// Number of public commands.
pub const NUM_PUBLIC_COMMANDS: u8 = 9;

// ============================================================================
// Public Responses (downlink, unencrypted)
// ============================================================================

/// Answer to [`CMD_PING`].
pub const RESP_PONG: u8 = CMD_PING + RESPONSE_OFFSET;
/// Answer to [`CMD_RETRANSMIT`].
pub const RESP_REPEATED_MESSAGE: u8 = CMD_RETRANSMIT + RESPONSE_OFFSET;
/// Answer to [`CMD_RETRANSMIT_CUSTOM`].
pub const RESP_REPEATED_MESSAGE_CUSTOM: u8 = CMD_RETRANSMIT_CUSTOM + RESPONSE_OFFSET;
/// Answer to [`CMD_TRANSMIT_SYSTEM_INFO`].
pub const RESP_SYSTEM_INFO: u8 = CMD_TRANSMIT_SYSTEM_INFO + RESPONSE_OFFSET;
/// Answer to [`CMD_GET_PACKET_INFO`].
pub const RESP_PACKET_INFO: u8 = CMD_GET_PACKET_INFO + RESPONSE_OFFSET;
/// Answer to [`CMD_GET_STATISTICS`].
pub const RESP_STATISTICS: u8 = CMD_GET_STATISTICS + RESPONSE_OFFSET;
/// Answer to [`CMD_GET_FULL_SYSTEM_INFO`].
pub const RESP_FULL_SYSTEM_INFO: u8 = CMD_GET_FULL_SYSTEM_INFO + RESPONSE_OFFSET;
/// Answer to [`CMD_STORE_AND_FORWARD_ADD`].
pub const RESP_STORE_AND_FORWARD_ASSIGNED_SLOT: u8 = CMD_STORE_AND_FORWARD_ADD + RESPONSE_OFFSET;
/// Answer to [`CMD_STORE_AND_FORWARD_REQUEST`].
pub const RESP_FORWARDED_MESSAGE: u8 = CMD_STORE_AND_FORWARD_REQUEST + RESPONSE_OFFSET;
/// Deployment state report.
pub const RESP_DEPLOYMENT_STATE: u8 = NUM_PUBLIC_COMMANDS + RESPONSE_OFFSET;
/// Recorded solar cell samples.
pub const RESP_RECORDED_SOLAR_CELLS: u8 = NUM_PUBLIC_COMMANDS + 1 + RESPONSE_OFFSET;
/// Camera state.
pub const RESP_CAMERA_STATE: u8 = NUM_PUBLIC_COMMANDS + 2 + RESPONSE_OFFSET;
/// Recorded IMU samples.
pub const RESP_RECORDED_IMU: u8 = NUM_PUBLIC_COMMANDS + 3 + RESPONSE_OFFSET;
/// ADCS run result.
pub const RESP_ADCS_RESULT: u8 = NUM_PUBLIC_COMMANDS + 4 + RESPONSE_OFFSET;
/// GPS log chunk.
pub const RESP_GPS_LOG: u8 = NUM_PUBLIC_COMMANDS + 5 + RESPONSE_OFFSET;
/// GPS log length.
pub const RESP_GPS_LOG_LENGTH: u8 = NUM_PUBLIC_COMMANDS + 6 + RESPONSE_OFFSET;
/// Flash contents dump.
pub const RESP_FLASH_CONTENTS: u8 = NUM_PUBLIC_COMMANDS + 7 + RESPONSE_OFFSET;
/// Camera picture chunk.
pub const RESP_CAMERA_PICTURE: u8 = NUM_PUBLIC_COMMANDS + 8 + RESPONSE_OFFSET;
/// Camera picture length.
pub const RESP_CAMERA_PICTURE_LENGTH: u8 = NUM_PUBLIC_COMMANDS + 9 + RESPONSE_OFFSET;

/// Number of public responses.
pub const NUM_PUBLIC_RESPONSES: u8 = RESP_CAMERA_PICTURE_LENGTH - RESPONSE_OFFSET + 1;

// ============================================================================
// Private Commands (uplink, encrypted)
// ============================================================================

/// Deploy the antennas.
pub const CMD_DEPLOY: u8 = 0x00 + PRIVATE_OFFSET;
/// Restart the satellite.
pub const CMD_RESTART: u8 = 0x01 + PRIVATE_OFFSET;
/// Wipe EEPROM.
pub const CMD_WIPE_EEPROM: u8 = 0x02 + PRIVATE_OFFSET;
/// Enable or disable transmission.
pub const CMD_SET_TRANSMIT_ENABLE: u8 = 0x03 + PRIVATE_OFFSET;
/// Change the satellite callsign.
pub const CMD_SET_CALLSIGN: u8 = 0x04 + PRIVATE_OFFSET;
/// Change the spreading factor mode.
pub const CMD_SET_SF_MODE: u8 = 0x05 + PRIVATE_OFFSET;
/// Change the MPPT mode.
pub const CMD_SET_MPPT_MODE: u8 = 0x06 + PRIVATE_OFFSET;
/// Enable or disable low power mode.
pub const CMD_SET_LOW_POWER_ENABLE: u8 = 0x07 + PRIVATE_OFFSET;
/// Set the receive windows.
pub const CMD_SET_RECEIVE_WINDOWS: u8 = 0x08 + PRIVATE_OFFSET;
/// Record solar cell samples.
pub const CMD_RECORD_SOLAR_CELLS: u8 = 0x09 + PRIVATE_OFFSET;
/// Capture a picture.
pub const CMD_CAMERA_CAPTURE: u8 = 0x0A + PRIVATE_OFFSET;
/// Set the power limits.
pub const CMD_SET_POWER_LIMITS: u8 = 0x0B + PRIVATE_OFFSET;
/// Set the real time clock.
pub const CMD_SET_RTC: u8 = 0x0C + PRIVATE_OFFSET;
/// Record IMU samples.
pub const CMD_RECORD_IMU: u8 = 0x0D + PRIVATE_OFFSET;
/// Run the attitude control system.
pub const CMD_RUN_ADCS: u8 = 0x0E + PRIVATE_OFFSET;
/// Start GPS logging.
pub const CMD_LOG_GPS: u8 = 0x0F + PRIVATE_OFFSET;
/// Download the GPS log.
pub const CMD_GET_GPS_LOG: u8 = 0x10 + PRIVATE_OFFSET;
/// Download flash contents.
pub const CMD_GET_FLASH_CONTENTS: u8 = 0x11 + PRIVATE_OFFSET;
/// Ask for the stored picture length.
pub const CMD_GET_PICTURE_LENGTH: u8 = 0x12 + PRIVATE_OFFSET;
/// Download a picture burst.
pub const CMD_GET_PICTURE_BURST: u8 = 0x13 + PRIVATE_OFFSET;

/// Number of private commands.
pub const NUM_PRIVATE_COMMANDS: u8 = 20;

// ============================================================================
// Legacy revision
// ============================================================================

/// Function IDs of the legacy protocol revision.
///
/// Public command numbers are shared with the FOSSA-1 table. Responses and
/// private commands sit at smaller offsets, and two private responses exist.
pub mod legacy {
    pub use super::{CMD_PING, CMD_RETRANSMIT, CMD_RETRANSMIT_CUSTOM, CMD_TRANSMIT_SYSTEM_INFO};

    /// Distance between a command and its response.
    pub const RESPONSE_OFFSET: u8 = 0x10;
    /// Base of the private command range.
    pub const PRIVATE_OFFSET: u8 = 0x20;

    /// Request reception info about the last uplink packet.
    pub const CMD_GET_LAST_PACKET_INFO: u8 = 0x04;
    /// Number of public commands.
    pub const NUM_PUBLIC_COMMANDS: u8 = 5;

    pub const RESP_PONG: u8 = CMD_PING + RESPONSE_OFFSET;
    pub const RESP_REPEATED_MESSAGE: u8 = CMD_RETRANSMIT + RESPONSE_OFFSET;
    pub const RESP_REPEATED_MESSAGE_CUSTOM: u8 = CMD_RETRANSMIT_CUSTOM + RESPONSE_OFFSET;
    pub const RESP_SYSTEM_INFO: u8 = CMD_TRANSMIT_SYSTEM_INFO + RESPONSE_OFFSET;
    pub const RESP_LAST_PACKET_INFO: u8 = CMD_GET_LAST_PACKET_INFO + RESPONSE_OFFSET;

    pub const CMD_DEPLOY: u8 = 0x00 + PRIVATE_OFFSET;
    pub const CMD_RESTART: u8 = 0x01 + PRIVATE_OFFSET;
    pub const CMD_WIPE_EEPROM: u8 = 0x02 + PRIVATE_OFFSET;
    pub const CMD_SET_TRANSMIT_ENABLE: u8 = 0x03 + PRIVATE_OFFSET;
    pub const CMD_SET_CALLSIGN: u8 = 0x04 + PRIVATE_OFFSET;
    pub const CMD_SET_SF_MODE: u8 = 0x05 + PRIVATE_OFFSET;
    pub const CMD_SET_MPPT_MODE: u8 = 0x06 + PRIVATE_OFFSET;
    pub const CMD_SET_LOW_POWER_ENABLE: u8 = 0x07 + PRIVATE_OFFSET;
    /// Number of private commands.
    pub const NUM_PRIVATE_COMMANDS: u8 = 8;

    /// Answer to [`CMD_DEPLOY`], encrypted.
    pub const RESP_DEPLOYMENT_STATE: u8 = CMD_DEPLOY + RESPONSE_OFFSET;
    /// Sent when a private command carried the wrong password.
    pub const RESP_INCORRECT_PASSWORD: u8 = CMD_RESTART + RESPONSE_OFFSET;
    /// Number of private responses.
    pub const NUM_PRIVATE_RESPONSES: u8 = 2;

    /// Human readable name of a known legacy function ID.
    pub fn function_name(function_id: u8) -> Option<&'static str> {
        let name = match function_id {
            CMD_PING => "ping",
            CMD_RETRANSMIT => "retransmit",
            CMD_RETRANSMIT_CUSTOM => "retransmit_custom",
            CMD_TRANSMIT_SYSTEM_INFO => "transmit_system_info",
            CMD_GET_LAST_PACKET_INFO => "get_last_packet_info",
            RESP_PONG => "pong",
            RESP_REPEATED_MESSAGE => "repeated_message",
            RESP_REPEATED_MESSAGE_CUSTOM => "repeated_message_custom",
            RESP_SYSTEM_INFO => "system_info",
            RESP_LAST_PACKET_INFO => "last_packet_info",
            CMD_DEPLOY => "deploy",
            CMD_RESTART => "restart",
            CMD_WIPE_EEPROM => "wipe_eeprom",
            CMD_SET_TRANSMIT_ENABLE => "set_transmit_enable",
            CMD_SET_CALLSIGN => "set_callsign",
            CMD_SET_SF_MODE => "set_sf_mode",
            CMD_SET_MPPT_MODE => "set_mppt_mode",
            CMD_SET_LOW_POWER_ENABLE => "set_low_power_enable",
            RESP_DEPLOYMENT_STATE => "deployment_state",
            RESP_INCORRECT_PASSWORD => "incorrect_password",
            _ => return None,
        };
        Some(name)
    }
}

// ============================================================================
// Function tables
// ============================================================================

/// Range sizes and offsets of one protocol revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionTable {
    /// Distance between a command and its response.
    pub response_offset: u8,
    /// Base of the private command range.
    pub private_offset: u8,
    pub public_commands: u8,
    pub public_responses: u8,
    pub private_commands: u8,
    /// Private responses start at `private_offset + response_offset`.
    pub private_responses: u8,
}

/// FOSSA-1 function table.
pub const FOSSA1_FUNCTIONS: FunctionTable = FunctionTable {
    response_offset: RESPONSE_OFFSET,
    private_offset: PRIVATE_OFFSET,
    public_commands: NUM_PUBLIC_COMMANDS,
    public_responses: NUM_PUBLIC_RESPONSES,
    private_commands: NUM_PRIVATE_COMMANDS,
    private_responses: 0,
};

/// Legacy function table.
pub const LEGACY_FUNCTIONS: FunctionTable = FunctionTable {
    response_offset: legacy::RESPONSE_OFFSET,
    private_offset: legacy::PRIVATE_OFFSET,
    public_commands: legacy::NUM_PUBLIC_COMMANDS,
    public_responses: legacy::NUM_PUBLIC_COMMANDS,
    private_commands: legacy::NUM_PRIVATE_COMMANDS,
    private_responses: legacy::NUM_PRIVATE_RESPONSES,
};

fn in_range(function_id: u8, base: u16, count: u8) -> bool {
    (base..base + count as u16).contains(&(function_id as u16))
}

impl FunctionTable {
    /// Classify a function ID.
    pub fn classify(&self, function_id: u8) -> FunctionClass {
        let response_offset = self.response_offset as u16;
        let private_offset = self.private_offset as u16;

        if function_id < self.public_commands {
            FunctionClass::PublicCommand
        } else if in_range(function_id, response_offset, self.public_responses) {
            FunctionClass::PublicResponse
        } else if in_range(function_id, private_offset, self.private_commands) {
            FunctionClass::PrivateCommand
        } else if in_range(function_id, private_offset + response_offset, self.private_responses) {
            FunctionClass::PrivateResponse
        } else {
            FunctionClass::Unknown
        }
    }

    /// Response ID the satellite uses to answer `command`.
    ///
    /// Returns `None` for IDs that are not commands, and for private
    /// commands the revision sends no response for.
    pub fn response_to(&self, command: u8) -> Option<u8> {
        let response = command.checked_add(self.response_offset)?;
        match (self.classify(command), self.classify(response)) {
            (FunctionClass::PublicCommand, _) => Some(response),
            (FunctionClass::PrivateCommand, FunctionClass::PrivateResponse) => Some(response),
            _ => None,
        }
    }

    /// Public command a response answers.
    pub fn answered_command(&self, response: u8) -> Option<u8> {
        match self.classify(response) {
            FunctionClass::PublicResponse => Some(response - self.response_offset),
            _ => None,
        }
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Range a function ID belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionClass {
    /// Unencrypted uplink command.
    PublicCommand,
    /// Unencrypted downlink response.
    PublicResponse,
    /// Encrypted uplink command.
    PrivateCommand,
    /// Encrypted downlink response.
    PrivateResponse,
    /// Outside every known range.
    Unknown,
}

impl FunctionClass {
    /// Classify a function ID against the FOSSA-1 table.
    pub fn of(function_id: u8) -> Self {
        FOSSA1_FUNCTIONS.classify(function_id)
    }

    /// Whether frames of this class must travel in the encrypted section.
    pub fn requires_encryption(self) -> bool {
        matches!(
            self,
            FunctionClass::PrivateCommand | FunctionClass::PrivateResponse
        )
    }
}

/// Response ID the satellite uses to answer a public command.
///
/// Returns `None` for IDs that are not public commands.
pub fn response_to(command: u8) -> Option<u8> {
    FOSSA1_FUNCTIONS.response_to(command)
}

/// Human readable name of a known function ID.
pub fn function_name(function_id: u8) -> Option<&'static str> {
    let name = match function_id {
        CMD_PING => "ping",
        CMD_RETRANSMIT => "retransmit",
        CMD_RETRANSMIT_CUSTOM => "retransmit_custom",
        CMD_TRANSMIT_SYSTEM_INFO => "transmit_system_info",
        CMD_GET_PACKET_INFO => "get_packet_info",
        CMD_GET_STATISTICS => "get_statistics",
        CMD_GET_FULL_SYSTEM_INFO => "get_full_system_info",
        CMD_STORE_AND_FORWARD_ADD => "store_and_forward_add",
        CMD_STORE_AND_FORWARD_REQUEST => "store_and_forward_request",
        RESP_PONG => "pong",
        RESP_REPEATED_MESSAGE => "repeated_message",
        RESP_REPEATED_MESSAGE_CUSTOM => "repeated_message_custom",
        RESP_SYSTEM_INFO => "system_info",
        RESP_PACKET_INFO => "packet_info",
        RESP_STATISTICS => "statistics",
        RESP_FULL_SYSTEM_INFO => "full_system_info",
        RESP_STORE_AND_FORWARD_ASSIGNED_SLOT => "store_and_forward_assigned_slot",
        RESP_FORWARDED_MESSAGE => "forwarded_message",
        RESP_DEPLOYMENT_STATE => "deployment_state",
        RESP_RECORDED_SOLAR_CELLS => "recorded_solar_cells",
        RESP_CAMERA_STATE => "camera_state",
        RESP_RECORDED_IMU => "recorded_imu",
        RESP_ADCS_RESULT => "adcs_result",
        RESP_GPS_LOG => "gps_log",
        RESP_GPS_LOG_LENGTH => "gps_log_length",
        RESP_FLASH_CONTENTS => "flash_contents",
        RESP_CAMERA_PICTURE => "camera_picture",
        RESP_CAMERA_PICTURE_LENGTH => "camera_picture_length",
        CMD_DEPLOY => "deploy",
        CMD_RESTART => "restart",
        CMD_WIPE_EEPROM => "wipe_eeprom",
        CMD_SET_TRANSMIT_ENABLE => "set_transmit_enable",
        CMD_SET_CALLSIGN => "set_callsign",
        CMD_SET_SF_MODE => "set_sf_mode",
        CMD_SET_MPPT_MODE => "set_mppt_mode",
        CMD_SET_LOW_POWER_ENABLE => "set_low_power_enable",
        CMD_SET_RECEIVE_WINDOWS => "set_receive_windows",
        CMD_RECORD_SOLAR_CELLS => "record_solar_cells",
        CMD_CAMERA_CAPTURE => "camera_capture",
        CMD_SET_POWER_LIMITS => "set_power_limits",
        CMD_SET_RTC => "set_rtc",
        CMD_RECORD_IMU => "record_imu",
        CMD_RUN_ADCS => "run_adcs",
        CMD_LOG_GPS => "log_gps",
        CMD_GET_GPS_LOG => "get_gps_log",
        CMD_GET_FLASH_CONTENTS => "get_flash_contents",
        CMD_GET_PICTURE_LENGTH => "get_picture_length",
        CMD_GET_PICTURE_BURST => "get_picture_burst",
        _ => return None,
    };
    Some(name)
}
