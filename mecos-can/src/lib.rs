//! **`mecos-can`**, query and command the rotational speed of a MECOS chopper over CAN.

mod constants;
pub use constants::*;
mod frame;
pub use frame::*;
mod channel;
pub use channel::*;

pub mod config;
pub mod error;
pub mod protocol;
