//! Raw SocketCAN helpers over libc.

use std::{ffi::CString, fmt, io, mem, os::raw::{c_int, c_void}, ptr};
use libc::*;

/// Tries to open a raw CAN socket and bind it to the interface.
pub fn raw_open_socket(addr: &CanAddr) -> io::Result<c_int> {
    let fd = unsafe { socket(PF_CAN, SOCK_RAW, CAN_RAW) };

    if fd == -1 {
        return Err(io::Error::last_os_error());
    }

    let ret = unsafe { bind(fd, addr.as_sockaddr_ptr(), CanAddr::len() as socklen_t) };

    if ret == -1 {
        let err = io::Error::last_os_error();
        unsafe { close(fd) };
        Err(err)
    } else {
        Ok(fd)
    }
}

/// Write a single frame to the socket, returning the bytes written.
pub fn raw_write_frame<T>(fd: c_int, frame: &T) -> io::Result<usize> {
    let ret = unsafe { write(fd, frame as *const T as *const c_void, mem::size_of::<T>()) };

    if ret < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(ret as usize)
    }
}

/// Read a single frame from the socket, returning the bytes read.
pub fn raw_read_frame<T>(fd: c_int, frame: &mut T) -> io::Result<usize> {
    let ret = unsafe { read(fd, frame as *mut T as *mut c_void, mem::size_of::<T>()) };

    if ret < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(ret as usize)
    }
}

/// Sets a collection of multiple socket options with one call.
///
/// An empty slice is passed to the kernel as a null pointer with zero length,
/// which for `CAN_RAW_FILTER` means "receive nothing".
pub fn set_socket_option_mult<T>(
    fd: c_int,
    level: c_int,
    name: c_int,
    values: &[T],
) -> io::Result<()> {
    let ret = if values.is_empty() {
        unsafe { setsockopt(fd, level, name, ptr::null(), 0) }
    } else {
        unsafe {
            setsockopt(
                fd,
                level,
                name,
                values.as_ptr().cast(),
                mem::size_of_val(values) as socklen_t,
            )
        }
    };

    if ret != 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}

/// Creates a default C `can_frame`.
/// This initializes the entire structure to zeros.
#[inline(always)]
pub fn can_frame_default() -> can_frame {
    unsafe { mem::zeroed() }
}

/// Check an error return value for timeouts.
///
/// EAGAIN and EWOULDBLOCK map to `WouldBlock`; EINPROGRESS is also possible.
pub trait ShouldRetry {
    fn should_retry(&self) -> bool;
}

impl ShouldRetry for io::Error {
    fn should_retry(&self) -> bool {
        match self.kind() {
            io::ErrorKind::WouldBlock => true,
            io::ErrorKind::Other => {
                matches!(self.raw_os_error(), Some(errno) if errno == EINPROGRESS)
            }
            _ => false,
        }
    }
}

/// CAN socket address, compatible with `sockaddr_can`.
#[derive(Clone, Copy)]
pub struct CanAddr(sockaddr_can);

impl CanAddr {
    /// Creates a new CAN socket address for the specified interface by index.
    pub fn new(ifindex: u32) -> Self {
        let mut addr = Self::default();
        addr.0.can_ifindex = ifindex as c_int;
        addr
    }

    /// Try to create an address from an interface name.
    pub fn from_iface(ifname: &str) -> io::Result<Self> {
        let ifname = CString::new(ifname)?;
        let ifindex = unsafe { if_nametoindex(ifname.as_ptr()) };
        if ifindex == 0 {
            Err(io::Error::last_os_error())
        }
        else {
            Ok(Self::new(ifindex))
        }
    }

    pub fn ifindex(&self) -> u32 {
        self.0.can_ifindex as u32
    }

    /// Gets the address of the structure as a `sockaddr` pointer.
    pub fn as_sockaddr_ptr(&self) -> *const sockaddr {
        (&self.0 as *const sockaddr_can).cast()
    }

    /// Gets the size of the address structure.
    pub fn len() -> usize {
        mem::size_of::<sockaddr_can>()
    }
}

impl Default for CanAddr {
    fn default() -> Self {
        let mut addr: sockaddr_can = unsafe { mem::zeroed() };
        addr.can_family = AF_CAN as sa_family_t;
        Self(addr)
    }
}

impl fmt::Debug for CanAddr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "CanAddr {{ can_family: {}, can_ifindex: {} }}",
            self.0.can_family, self.0.can_ifindex
        )
    }
}
