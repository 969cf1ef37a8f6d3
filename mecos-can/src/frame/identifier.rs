use std::fmt::{Display, Formatter};
use bitflags::bitflags;
use crate::constants::{EFF_MASK, SFF_MASK};

bitflags! {
    /// Identifier flags for indicating various frame types.
    ///
    /// Flag values correspond to the format used by the Linux [SocketCAN][socketcan]
    /// library, where they share the 32-bit identifier word with the identifier itself.
    ///
    /// [socketcan]: https://www.kernel.org/doc/Documentation/networking/can.txt
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IdentifierFlags: u32 {
        /// The frame is using the extended format i.e. 29-bit extended identifiers.
        const EXTENDED = 0x8000_0000;
        /// The frame is a remote transmission request.
        const REMOTE = 0x4000_0000;
        /// The frame is an error frame.
        const ERROR = 0x2000_0000;
    }
}

/// Strip the flag bits from a raw identifier word.
#[inline(always)]
pub const fn strip_flags(raw: u32) -> u32 {
    raw & EFF_MASK
}

/// An 11-bit standard identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StandardId(u16);

impl StandardId {
    pub const MAX: Self = Self(SFF_MASK as u16);

    /// Returns `None` when `id` does not fit in 11 bits.
    #[inline]
    pub const fn new(id: u16) -> Option<Self> {
        if id as u32 <= SFF_MASK {
            Some(Self(id))
        } else {
            None
        }
    }

    /// Caller guarantees `id <= 0x7FF`; higher bits are masked off.
    #[inline]
    pub const fn new_unchecked(id: u16) -> Self {
        Self(id & SFF_MASK as u16)
    }

    #[inline(always)]
    pub const fn as_raw(self) -> u16 {
        self.0
    }
}

impl Display for StandardId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:03X}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Id {
    Standard(u16),
    Extended(u32),
}

impl From<StandardId> for Id {
    #[inline]
    fn from(id: StandardId) -> Self {
        Self::Standard(id.as_raw())
    }
}

impl From<u32> for Id {
    #[inline]
    fn from(raw: u32) -> Self {
        Self::from_bits(raw)
    }
}

impl From<Id> for u32 {
    #[inline]
    fn from(id: Id) -> Self {
        id.into_bits()
    }
}

impl Id {
    /// Decode a raw identifier word as it appears on a SocketCAN socket.
    ///
    /// Flag bits are stripped. The result is `Standard` only when the extended
    /// flag is clear and the value fits in 11 bits.
    #[inline]
    pub fn from_bits(raw: u32) -> Self {
        let bits = strip_flags(raw);
        if raw & IdentifierFlags::EXTENDED.bits() != 0 || bits > SFF_MASK {
            Self::Extended(bits)
        } else {
            Self::Standard(bits as u16)
        }
    }

    #[inline]
    pub fn into_bits(self) -> u32 {
        match self {
            Self::Standard(id) => id as u32,
            Self::Extended(id) => id,
        }
    }

    #[inline]
    pub fn is_extended(&self) -> bool {
        matches!(self, Self::Extended(_))
    }

    /// The standard identifier, if this is one.
    #[inline]
    pub fn standard(self) -> Option<StandardId> {
        match self {
            Self::Standard(id) => StandardId::new(id),
            Self::Extended(_) => None,
        }
    }
}
