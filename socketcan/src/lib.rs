//! Linux SocketCAN channel for the MECOS chopper speed protocol.

mod frame;
pub use frame::*;
mod socket;
pub use socket::*;

pub mod link;
#[cfg(feature = "cli")]
pub mod cli;

use std::{os::fd::{AsFd, AsRawFd, FromRawFd, OwnedFd}, time::{Duration, Instant}};
use libc::{can_filter, CAN_RAW_FILTER, SOL_CAN_RAW};
use nix::{errno::Errno, poll::{poll, PollFd, PollFlags}};
use mecos_can::{error::Error, BusChannel, CanFrame, Filter};

/// Longest wait a single `poll` call takes, in `u16` milliseconds.
const MAX_POLL_WAIT: Duration = Duration::from_millis(u16::MAX as u64);

/// Milliseconds for one `poll` call, rounded up so a sub-millisecond wait still blocks.
#[inline]
fn poll_millis(wait: Duration) -> u16 {
    u16::try_from(wait.as_micros().div_ceil(1000)).unwrap_or(u16::MAX)
}

/// A raw CAN socket bound to one interface.
#[derive(Debug)]
pub struct SocketCan {
    interface: String,
    socket: Option<OwnedFd>,
}

impl SocketCan {
    #[inline]
    fn socket(&self) -> Result<&OwnedFd, Error> {
        self.socket.as_ref()
            .ok_or_else(|| Error::channel_not_opened(&self.interface))
    }

    /// Wait up to `timeout` for a frame, polling at most `max_wait` at a time.
    fn read_timeout(&self, timeout: Duration, max_wait: Duration) -> Result<CanFrame, Error> {
        let s = self.socket()?;
        let start = Instant::now();
        loop {
            let remaining = timeout.saturating_sub(start.elapsed());
            let wait = remaining.min(max_wait);
            let pollfd = PollFd::new(s.as_fd(), PollFlags::POLLIN);

            match poll::<u16>(&mut [pollfd], poll_millis(wait)) {
                Ok(0) if wait < remaining => continue,
                Ok(0) => return Err(Error::channel_timeout(&self.interface)),
                Ok(_) => return self.read(),
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(Error::operation_error(e)),
            }
        }
    }

    fn read(&self) -> Result<CanFrame, Error> {
        let s = self.socket()?;
        let mut frame = RawFrame::default();
        match raw_read_frame(s.as_raw_fd(), &mut frame.0) {
            Ok(rd) if rd == frame.size() => Ok(frame.into()),
            Ok(rd) => Err(Error::OperationError(format!("incomplete frame, {} bytes read", rd))),
            Err(e) if e.should_retry() => Err(Error::channel_timeout(&self.interface)),
            Err(e) => Err(Error::operation_error(e)),
        }
    }
}

impl BusChannel for SocketCan {
    fn open(interface: &str) -> Result<Self, Error> {
        let addr = CanAddr::from_iface(interface)
            .map_err(|e| Error::channel_open_failed(interface, e))?;
        let fd = raw_open_socket(&addr)
            .map_err(|e| Error::channel_open_failed(interface, e))?;
        log::debug!("SocketCAN - {} opened, ifindex: {}", interface, addr.ifindex());

        Ok(Self {
            interface: interface.into(),
            socket: Some(unsafe { OwnedFd::from_raw_fd(fd) }),
        })
    }

    #[inline(always)]
    fn interface(&self) -> &str {
        &self.interface
    }

    /// Sets CAN ID filters on the socket.
    ///
    /// Frames received by SocketCAN are matched against these filters and
    /// only matching ones are returned. An empty slice disables reception.
    fn set_receive_filter(&mut self, filters: &[Filter]) -> Result<(), Error> {
        let s = self.socket()?;
        let filters: Vec<can_filter> = filters.iter()
            .map(|&f| {
                can_filter {
                    can_id: f.can_id,
                    can_mask: f.can_mask,
                }
            })
            .collect();
        set_socket_option_mult(s.as_raw_fd(), SOL_CAN_RAW, CAN_RAW_FILTER, &filters)
            .map_err(Error::operation_error)
    }

    #[inline(always)]
    fn frame_size(&self) -> usize {
        FRAME_SIZE
    }

    fn send(&mut self, frame: &CanFrame) -> Result<usize, Error> {
        let s = self.socket()?;
        let frame = RawFrame::from(frame);
        raw_write_frame(s.as_raw_fd(), &frame.0)
            .map_err(Error::operation_error)
    }

    /// Blocking read a single can frame with timeout.
    fn receive(&mut self, timeout: Duration) -> Result<CanFrame, Error> {
        self.read_timeout(timeout, MAX_POLL_WAIT)
    }

    fn close(&mut self) {
        if self.socket.take().is_some() {
            log::debug!("SocketCAN - {} closed", self.interface);
        }
    }
}
