use libc::can_frame;
use mecos_can::{CanFrame, CAN_FRAME_MAX_SIZE};
use crate::socket;

/// Bytes of one `can_frame` on a raw CAN socket.
pub(crate) const FRAME_SIZE: usize = std::mem::size_of::<can_frame>();

impl From<&CanFrame> for RawFrame {
    fn from(frame: &CanFrame) -> Self {
        let mut raw = socket::can_frame_default();
        raw.can_id = frame.raw_id();
        raw.can_dlc = frame.length() as u8;
        raw.data = *frame.raw_data();
        Self(raw)
    }
}

impl From<RawFrame> for CanFrame {
    fn from(frame: RawFrame) -> Self {
        let frame = frame.0;
        let length = (frame.can_dlc as usize).min(CAN_FRAME_MAX_SIZE);
        CanFrame::from_raw(frame.can_id, length, frame.data)
    }
}

/// A classic `can_frame` as the kernel reads and writes it.
pub struct RawFrame(pub(crate) can_frame);

impl RawFrame {
    #[inline(always)]
    pub fn size(&self) -> usize {
        FRAME_SIZE
    }
}

impl Default for RawFrame {
    fn default() -> Self {
        Self(socket::can_frame_default())
    }
}
