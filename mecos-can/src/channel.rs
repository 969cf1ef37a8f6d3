use std::{ops::{Deref, DerefMut}, time::Duration};
use crate::constants::{CAN_MTU, SFF_MASK};
use crate::error::Error;
use crate::frame::{CanFrame, StandardId};

/// CAN receive filter: a frame passes when `received_id & can_mask == can_id & can_mask`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Filter {
    pub can_id: u32,
    pub can_mask: u32,
}

impl Filter {
    /// Match exactly one standard identifier.
    #[inline]
    pub fn standard(id: StandardId) -> Self {
        Self { can_id: id.as_raw() as u32, can_mask: SFF_MASK }
    }

    #[inline]
    pub fn accept_all() -> Self {
        Self { can_id: 0, can_mask: 0 }
    }

    #[inline]
    pub fn matches(&self, raw_id: u32) -> bool {
        raw_id & self.can_mask == self.can_id & self.can_mask
    }
}

impl From<(u32, u32)> for Filter {
    #[inline]
    fn from((can_id, can_mask): (u32, u32)) -> Self {
        Self { can_id, can_mask }
    }
}

/// A bound, readable and writable CAN bus channel.
///
/// This is the only seam where operating-system or hardware specifics live.
pub trait BusChannel {
    /// Open and bind a channel on the named interface.
    fn open(interface: &str) -> Result<Self, Error>
    where
        Self: Sized;
    fn interface(&self) -> &str;
    /// Replace the receive filters. An empty slice drops all reception.
    fn set_receive_filter(&mut self, filters: &[Filter]) -> Result<(), Error>;
    /// Bytes a complete write of one frame occupies on this channel.
    #[inline]
    fn frame_size(&self) -> usize {
        CAN_MTU
    }
    /// Send one frame, returning how many bytes the channel accepted.
    /// The write is complete only when that equals [`BusChannel::frame_size`].
    fn send(&mut self, frame: &CanFrame) -> Result<usize, Error>;
    /// Block until one frame arrives, or fail with [`Error::ReceiveTimeout`].
    fn receive(&mut self, timeout: Duration) -> Result<CanFrame, Error>;
    /// Release the channel. Calling it twice is harmless.
    fn close(&mut self);
}

/// Send one frame; a short write is fatal.
pub fn transmit<C: BusChannel + ?Sized>(channel: &mut C, frame: &CanFrame) -> Result<(), Error> {
    log::trace!("MECOS-CAN - {} Tx {}", channel.interface(), frame);
    let expected = channel.frame_size();
    let written = channel.send(frame)?;
    if written != expected {
        return Err(Error::TransmitIncomplete { written, expected });
    }

    Ok(())
}

/// Owns a channel for the length of one cycle and closes it on drop.
#[derive(Debug)]
pub struct ChannelGuard<C: BusChannel> {
    channel: C,
}

impl<C: BusChannel> ChannelGuard<C> {
    pub fn new(channel: C) -> Self {
        log::debug!("MECOS-CAN - channel {} acquired", channel.interface());
        Self { channel }
    }
}

impl<C: BusChannel> Deref for ChannelGuard<C> {
    type Target = C;

    fn deref(&self) -> &Self::Target {
        &self.channel
    }
}

impl<C: BusChannel> DerefMut for ChannelGuard<C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.channel
    }
}

impl<C: BusChannel> Drop for ChannelGuard<C> {
    fn drop(&mut self) {
        log::debug!("MECOS-CAN - channel {} released", self.channel.interface());
        self.channel.close();
    }
}
