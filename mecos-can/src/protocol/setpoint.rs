use crate::channel::{transmit, BusChannel, ChannelGuard};
use crate::error::Error;
use super::{encode, ProtocolMessage};

/// Parse a setpoint in Hz.
///
/// The wire field is 16 bits wide. Values outside `0..=65535` are rejected
/// rather than truncated.
pub fn parse_setpoint(value: &str) -> Result<u16, Error> {
    let value = value.trim();
    let hz: i64 = value.parse()
        .map_err(|_| Error::invalid_argument(format!("speed setpoint `{}` is not a number", value)))?;

    u16::try_from(hz)
        .map_err(|_| Error::invalid_argument(format!("speed setpoint {} Hz is out of range 0..={}", hz, u16::MAX)))
}

/// Send one setpoint command. No acknowledgement is awaited.
pub fn send_setpoint<C: BusChannel + ?Sized>(channel: &mut C, hz: u16) -> Result<(), Error> {
    log::debug!("MECOS-CAN - required setpoint: {} Hz", hz);
    transmit(channel, &encode(&ProtocolMessage::SpeedSetpointCommand { hz }))
}

/// Own `channel` for one write: disable reception, send once, release.
pub fn write_setpoint<C: BusChannel>(channel: C, hz: u16) -> Result<(), Error> {
    let mut channel = ChannelGuard::new(channel);
    channel.set_receive_filter(&[])?;
    send_setpoint(&mut *channel, hz)
}
