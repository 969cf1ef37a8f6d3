//! MECOS MPDO messages used to read and set the chopper speed.
//!
//! Every message is a single standard CAN frame. The CAN identifier selects the
//! role (request, answer, command) and the first four payload bytes, the
//! signature, select the parameter within that role.

mod codec;
pub use codec::*;
mod reader;
pub use reader::*;
mod setpoint;
pub use setpoint::*;

use crate::frame::StandardId;

/// REQ_MPDO, sent to the device to ask for a parameter.
pub const SPEED_QUERY_REQUEST_ID: StandardId = StandardId::new_unchecked(0x340);
/// Ans_MPDO, the device's reply.
pub const SPEED_QUERY_ANSWER_ID: StandardId = StandardId::new_unchecked(0x2C0);
/// Write MPDO carrying a new setpoint.
pub const SPEED_SETPOINT_COMMAND_ID: StandardId = StandardId::new_unchecked(0x1C0);

pub const SPEED_QUERY_REQUEST_SIGNATURE: [u8; 4] = [0xC0, 0x01, 0x20, 0x00];
pub const SPEED_QUERY_ANSWER_SIGNATURE: [u8; 4] = [0x40, 0x01, 0x20, 0x00];
pub const SPEED_SETPOINT_COMMAND_SIGNATURE: [u8; 4] = [0xC0, 0x00, 0x20, 0x00];

/// Shortest answer that still carries the speed field.
pub const SPEED_QUERY_ANSWER_MIN_LENGTH: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolMessage {
    SpeedQueryRequest,
    /// Actual speed in Hz.
    SpeedQueryAnswer { hz: u16 },
    /// Desired speed in Hz.
    SpeedSetpointCommand { hz: u16 },
}

impl ProtocolMessage {
    #[inline]
    pub fn identifier(&self) -> StandardId {
        match self {
            Self::SpeedQueryRequest => SPEED_QUERY_REQUEST_ID,
            Self::SpeedQueryAnswer { .. } => SPEED_QUERY_ANSWER_ID,
            Self::SpeedSetpointCommand { .. } => SPEED_SETPOINT_COMMAND_ID,
        }
    }

    #[inline]
    pub fn signature(&self) -> [u8; 4] {
        match self {
            Self::SpeedQueryRequest => SPEED_QUERY_REQUEST_SIGNATURE,
            Self::SpeedQueryAnswer { .. } => SPEED_QUERY_ANSWER_SIGNATURE,
            Self::SpeedSetpointCommand { .. } => SPEED_SETPOINT_COMMAND_SIGNATURE,
        }
    }

    /// Payload length on the wire.
    #[inline]
    pub fn length(&self) -> usize {
        match self {
            Self::SpeedQueryRequest => 4,
            Self::SpeedQueryAnswer { .. } |
            Self::SpeedSetpointCommand { .. } => 8,
        }
    }
}
