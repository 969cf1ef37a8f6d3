use crate::constants::CAN_FRAME_MAX_SIZE;
use crate::frame::{CanFrame, StandardId};
use super::{ProtocolMessage, SPEED_QUERY_ANSWER_ID, SPEED_QUERY_ANSWER_MIN_LENGTH, SPEED_QUERY_ANSWER_SIGNATURE};

/// Encode a message into the frame that carries it. Numeric fields are little-endian.
pub fn encode(message: &ProtocolMessage) -> CanFrame {
    let mut data = [0; CAN_FRAME_MAX_SIZE];
    data[..4].copy_from_slice(&message.signature());
    match message {
        ProtocolMessage::SpeedQueryRequest => {},
        ProtocolMessage::SpeedQueryAnswer { hz } |
        ProtocolMessage::SpeedSetpointCommand { hz } => {
            data[4..6].copy_from_slice(&hz.to_le_bytes());
        },
    }

    CanFrame::from_raw(message.identifier().as_raw() as u32, message.length(), data)
}

/// Decode a received frame.
///
/// Only a speed answer is recognised. Any other identifier, a wrong signature
/// or a payload shorter than 6 bytes gives `None`: the bus is shared, so
/// unrelated traffic is routine and never an error.
pub fn decode(frame: &CanFrame) -> Option<ProtocolMessage> {
    if !is_identifier(frame, SPEED_QUERY_ANSWER_ID)
        || frame.length() < SPEED_QUERY_ANSWER_MIN_LENGTH {
        return None;
    }

    let data = frame.data();
    if data[..4] != SPEED_QUERY_ANSWER_SIGNATURE {
        return None;
    }

    let hz = u16::from_le_bytes([data[4], data[5]]);
    Some(ProtocolMessage::SpeedQueryAnswer { hz })
}

#[inline(always)]
fn is_identifier(frame: &CanFrame, id: StandardId) -> bool {
    frame.id_bits() == id.as_raw() as u32
}
