mod identifier;
pub use identifier::*;

use std::fmt::{Display, Formatter, Write};
use crate::constants::CAN_FRAME_MAX_SIZE;

/// A classic CAN data frame, at most 8 bytes of payload.
///
/// The identifier is kept as the raw 32-bit word, so frames read from a bus
/// keep any flag bits the driver set. Use [`CanFrame::id`] or
/// [`CanFrame::id_bits`] to look at the identifier itself.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CanFrame {
    raw_id: u32,
    length: usize,
    data: [u8; CAN_FRAME_MAX_SIZE],
}

impl CanFrame {
    /// Returns `None` when `data` is longer than 8 bytes.
    pub fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        let length = data.len();
        if length > CAN_FRAME_MAX_SIZE {
            return None;
        }

        let id = id.into();
        let mut raw_id = id.into_bits();
        if id.is_extended() {
            raw_id |= IdentifierFlags::EXTENDED.bits();
        }

        let mut buffer = [0; CAN_FRAME_MAX_SIZE];
        buffer[..length].copy_from_slice(data);
        Some(Self { raw_id, length, data: buffer })
    }

    /// Build from the fields of a received frame. `length` is clamped to 8 and
    /// bytes past it are zeroed.
    pub fn from_raw(raw_id: u32, length: usize, data: [u8; CAN_FRAME_MAX_SIZE]) -> Self {
        let length = length.min(CAN_FRAME_MAX_SIZE);
        let mut buffer = [0; CAN_FRAME_MAX_SIZE];
        buffer[..length].copy_from_slice(&data[..length]);
        Self { raw_id, length, data: buffer }
    }

    #[inline]
    pub fn id(&self) -> Id {
        Id::from_bits(self.raw_id)
    }

    /// The identifier word including flag bits.
    #[inline(always)]
    pub fn raw_id(&self) -> u32 {
        self.raw_id
    }

    /// The identifier with flag bits stripped.
    #[inline(always)]
    pub fn id_bits(&self) -> u32 {
        strip_flags(self.raw_id)
    }

    #[inline]
    pub fn is_extended(&self) -> bool {
        self.flags().contains(IdentifierFlags::EXTENDED)
    }

    #[inline]
    pub fn is_remote(&self) -> bool {
        self.flags().contains(IdentifierFlags::REMOTE)
    }

    #[inline]
    pub fn is_error_frame(&self) -> bool {
        self.flags().contains(IdentifierFlags::ERROR)
    }

    #[inline(always)]
    pub fn length(&self) -> usize {
        self.length
    }

    /// ensure return the actual length of data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data[..self.length]
    }

    /// All 8 payload bytes, zero-filled past `length`.
    #[inline(always)]
    pub fn raw_data(&self) -> &[u8; CAN_FRAME_MAX_SIZE] {
        &self.data
    }

    #[inline(always)]
    fn flags(&self) -> IdentifierFlags {
        IdentifierFlags::from_bits_truncate(self.raw_id)
    }
}

impl Display for CanFrame {
    /// One trace line: `<id> [x] <d|r> <len> <data>`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let data_str = self.data()
            .iter()
            .fold(String::new(), |mut out, &b| {
                let _ = write!(out, "{b:02x} ");
                out
            });

        write!(f, "{: >8x}{: <2} {} {: >2} {}",
               self.id_bits(),
               if self.is_extended() { "x" } else { "" },
               if self.is_remote() { "r" } else { "d" },
               self.length,
               data_str.trim_end(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_long_payload() {
        assert!(CanFrame::new(StandardId::new_unchecked(0x123), &[0; 9]).is_none());
        let frame = CanFrame::new(StandardId::new_unchecked(0x123), &[1, 2, 3]).unwrap();
        assert_eq!(frame.length(), 3);
        assert_eq!(frame.data(), &[1, 2, 3]);
        assert_eq!(frame.raw_data(), &[1, 2, 3, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_from_raw_clamps() {
        let frame = CanFrame::from_raw(0x2C0, 15, [0xFF; 8]);
        assert_eq!(frame.length(), 8);

        let frame = CanFrame::from_raw(0x2C0, 2, [0xFF; 8]);
        assert_eq!(frame.raw_data(), &[0xFF, 0xFF, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_extended_flag() {
        let frame = CanFrame::new(Id::Extended(0x1234), &[]).unwrap();
        assert!(frame.is_extended());
        assert_eq!(frame.id_bits(), 0x1234);
        assert_eq!(frame.id(), Id::Extended(0x1234));
    }

    #[test]
    fn test_display() {
        let frame = CanFrame::new(StandardId::new_unchecked(0x340), &[0xC0, 0x01, 0x20, 0x00]).unwrap();
        assert_eq!(frame.to_string(), "     340   d  4 c0 01 20 00");
    }
}
