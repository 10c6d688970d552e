//! # Raw RFCOMM Socket
//!
//! Opens `AF_BLUETOOTH` / `SOCK_STREAM` / `BTPROTO_RFCOMM` sockets directly
//! through libc, so no `rfcomm bind` or `/dev/rfcommN` node is needed.
//!
//! ## Write Semantics
//!
//! - `SO_SNDTIMEO` bounds each `send`, so a stalled printer surfaces as a
//!   write error instead of blocking forever.
//! - `MSG_NOSIGNAL` turns a dropped link into `EPIPE` rather than SIGPIPE.

use std::io;
use std::os::fd::{AsRawFd, FromRawFd, IntoRawFd, OwnedFd};
use std::time::Duration;

use super::{BdAddr, SerialSocket};
use crate::error::PrinterError;

/// From `<bluetooth/bluetooth.h>`; libc does not export it.
const BTPROTO_RFCOMM: libc::c_int = 3;

/// `struct sockaddr_rc` from `<bluetooth/rfcomm.h>`.
#[repr(C)]
struct SockaddrRc {
    rc_family: libc::sa_family_t,
    rc_bdaddr: [u8; 6],
    rc_channel: u8,
}

/// An open RFCOMM connection.
pub struct RfcommSocket {
    fd: Option<OwnedFd>,
    address: BdAddr,
}

impl RfcommSocket {
    /// Connect to `address` on `channel`. Blocks until the link is up or the
    /// kernel gives up.
    pub fn connect(
        address: &BdAddr,
        channel: u8,
        write_timeout: Duration,
    ) -> Result<Self, PrinterError> {
        let raw = unsafe { libc::socket(libc::AF_BLUETOOTH, libc::SOCK_STREAM, BTPROTO_RFCOMM) };
        if raw < 0 {
            return Err(PrinterError::Io(io::Error::last_os_error()));
        }
        // Closed on every early return below.
        let fd = unsafe { OwnedFd::from_raw_fd(raw) };

        let sa = SockaddrRc {
            rc_family: libc::AF_BLUETOOTH as libc::sa_family_t,
            rc_bdaddr: address.to_bluez(),
            rc_channel: channel,
        };
        let ret = unsafe {
            libc::connect(
                fd.as_raw_fd(),
                &sa as *const SockaddrRc as *const libc::sockaddr,
                std::mem::size_of::<SockaddrRc>() as libc::socklen_t,
            )
        };
        if ret < 0 {
            return Err(PrinterError::Transport(format!(
                "connect to {} channel {} failed: {}",
                address,
                channel,
                io::Error::last_os_error()
            )));
        }

        set_send_timeout(&fd, write_timeout)?;

        tracing::debug!(%address, channel, "rfcomm socket connected");
        Ok(Self {
            fd: Some(fd),
            address: *address,
        })
    }
}

impl SerialSocket for RfcommSocket {
    fn is_connected(&self) -> bool {
        let Some(fd) = &self.fd else {
            return false;
        };
        let mut sa = std::mem::MaybeUninit::<SockaddrRc>::zeroed();
        let mut len = std::mem::size_of::<SockaddrRc>() as libc::socklen_t;
        let ret = unsafe {
            libc::getpeername(fd.as_raw_fd(), sa.as_mut_ptr() as *mut libc::sockaddr, &mut len)
        };
        ret == 0
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), PrinterError> {
        let fd = self
            .fd
            .as_ref()
            .ok_or_else(|| PrinterError::Transport("socket is closed".to_string()))?;

        let mut sent = 0;
        while sent < data.len() {
            let rest = &data[sent..];
            let n = unsafe {
                libc::send(
                    fd.as_raw_fd(),
                    rest.as_ptr() as *const libc::c_void,
                    rest.len(),
                    libc::MSG_NOSIGNAL,
                )
            };
            if n < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(PrinterError::Transport(format!("Write failed: {}", err)));
            }
            if n == 0 {
                return Err(PrinterError::Io(io::ErrorKind::WriteZero.into()));
            }
            sent += n as usize;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), PrinterError> {
        let Some(fd) = self.fd.take() else {
            return Ok(());
        };
        let ret = unsafe { libc::close(fd.into_raw_fd()) };
        if ret != 0 {
            return Err(PrinterError::Io(io::Error::last_os_error()));
        }
        tracing::debug!(address = %self.address, "rfcomm socket closed");
        Ok(())
    }
}

fn set_send_timeout(fd: &OwnedFd, timeout: Duration) -> Result<(), PrinterError> {
    let tv = libc::timeval {
        tv_sec: timeout.as_secs() as libc::time_t,
        tv_usec: timeout.subsec_micros() as libc::suseconds_t,
    };
    let ret = unsafe {
        libc::setsockopt(
            fd.as_raw_fd(),
            libc::SOL_SOCKET,
            libc::SO_SNDTIMEO,
            &tv as *const libc::timeval as *const libc::c_void,
            std::mem::size_of::<libc::timeval>() as libc::socklen_t,
        )
    };
    if ret < 0 {
        return Err(PrinterError::Io(io::Error::last_os_error()));
    }
    Ok(())
}
