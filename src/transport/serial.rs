//! # Serial TTY Link
//!
//! This module opens the printer's serial device (USB-serial adapter or the
//! board's own UART) and configures it for raw binary output at fixed link
//! parameters.
//!
//! ## TTY Configuration
//!
//! The device is opened in raw mode so binary data passes unmodified:
//!
//! - **No input processing**: Disable IGNBRK, BRKINT, PARMRK, ISTRIP, etc.
//! - **No output processing**: Disable OPOST (no CR/LF translation)
//! - **No software flow control**: IXON/IXOFF/IXANY off, since 0x11 and 0x13
//!   show up in bit-image data all the time
//! - **No echo, non-canonical**
//! - **Frame**: baud rate, data bits, parity and stop bits from
//!   [`SerialLinkConfig`]
//!
//! ## Finding the Device
//!
//! ```bash
//! # USB-serial adapters usually show up as ttyUSB*
//! $ ls /dev/ttyUSB* /dev/serial/by-id/
//!
//! # The user needs access to the device
//! $ sudo usermod -aG dialout $USER
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use super::PrinterLink;
use crate::error::{BoothprintError, Result};
use crate::printer::config::{Parity, SerialLinkConfig};

/// # Serial Printer Link
///
/// ## Example
///
/// ```no_run
/// use boothprint::printer::config::SerialLinkConfig;
/// use boothprint::transport::SerialPort;
/// use std::io::Write;
///
/// let mut port = SerialPort::open("/dev/ttyUSB0", &SerialLinkConfig::default())?;
/// port.write_all(&[0x1B, 0x40])?;
///
/// # Ok::<(), boothprint::BoothprintError>(())
/// ```
#[derive(Debug)]
pub struct SerialPort {
    file: File,
    path: PathBuf,
    write_timeout: Option<Duration>,
}

impl SerialPort {
    /// Open and configure a serial device.
    ///
    /// ## Errors
    ///
    /// Returns [`BoothprintError::Configuration`] if:
    /// - The device can't be opened (missing, permission denied)
    /// - The baud rate or data bits aren't supported
    /// - TTY configuration fails
    pub fn open<P: AsRef<Path>>(device: P, link: &SerialLinkConfig) -> Result<Self> {
        let path = device.as_ref();

        let file = open_device(path).map_err(|e| {
            BoothprintError::Configuration(format!("Failed to open {}: {}", path.display(), e))
        })?;

        configure_tty(file.as_raw_fd(), link)?;
        debug!(
            device = %path.display(),
            baud = link.baud_rate,
            data_bits = link.data_bits,
            stop_bits = link.stop_bits,
            "serial link configured"
        );

        Ok(Self {
            file,
            path: path.to_path_buf(),
            write_timeout: None,
        })
    }

    /// Fail writes that can't start within `timeout`.
    ///
    /// Without a timeout a wedged printer blocks the caller indefinitely.
    pub fn set_write_timeout(&mut self, timeout: Option<Duration>) {
        self.write_timeout = timeout;
    }

    /// Device path this port was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Write for SerialPort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(timeout) = self.write_timeout {
            wait_writable(self.file.as_raw_fd(), timeout)?;
        }
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl PrinterLink for SerialPort {
    /// Flush, then wait for the kernel to push out everything queued.
    fn close(&mut self) -> io::Result<()> {
        self.file.flush()?;
        drain(self.file.as_raw_fd())
    }
}

fn open_device(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .write(true)
        .custom_flags(libc::O_NOCTTY)
        .open(path)
}

/// Map a numeric baud rate to its termios speed constant.
fn baud_constant(baud: u32) -> Option<libc::speed_t> {
    Some(match baud {
        1200 => libc::B1200,
        2400 => libc::B2400,
        4800 => libc::B4800,
        9600 => libc::B9600,
        19200 => libc::B19200,
        38400 => libc::B38400,
        57600 => libc::B57600,
        115200 => libc::B115200,
        _ => return None,
    })
}

fn data_bits_flag(bits: u8) -> Option<libc::tcflag_t> {
    Some(match bits {
        5 => libc::CS5,
        6 => libc::CS6,
        7 => libc::CS7,
        8 => libc::CS8,
        _ => return None,
    })
}

/// Configure a file descriptor for raw output with the given frame.
///
/// ## What Gets Disabled
///
/// - **Input flags**: IGNBRK, BRKINT, PARMRK, ISTRIP, INLCR, IGNCR, ICRNL, IXON, IXOFF, IXANY
/// - **Output flags**: OPOST
/// - **Local flags**: ECHO, ECHONL, ICANON, ISIG, IEXTEN
/// - **Control flags**: CSIZE, PARENB, PARODD, CSTOPB (then set from `link`)
fn configure_tty(fd: i32, link: &SerialLinkConfig) -> Result<()> {
    use std::mem::MaybeUninit;

    let speed = baud_constant(link.baud_rate).ok_or_else(|| {
        BoothprintError::Configuration(format!("Unsupported baud rate {}", link.baud_rate))
    })?;
    let size = data_bits_flag(link.data_bits).ok_or_else(|| {
        BoothprintError::Configuration(format!("Unsupported data bits {}", link.data_bits))
    })?;

    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(BoothprintError::Configuration(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);

    termios.c_oflag &= !libc::OPOST;

    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);

    termios.c_cflag &= !(libc::CSIZE | libc::PARENB | libc::PARODD | libc::CSTOPB);
    termios.c_cflag |= size | libc::CLOCAL;
    match link.parity {
        Parity::None => {}
        Parity::Even => termios.c_cflag |= libc::PARENB,
        Parity::Odd => termios.c_cflag |= libc::PARENB | libc::PARODD,
    }
    if link.stop_bits == 2 {
        termios.c_cflag |= libc::CSTOPB;
    }

    let speed_ok = unsafe {
        libc::cfsetispeed(&mut termios, speed) == 0 && libc::cfsetospeed(&mut termios, speed) == 0
    };
    if !speed_ok {
        return Err(BoothprintError::Configuration(format!(
            "cfsetspeed failed: {}",
            io::Error::last_os_error()
        )));
    }

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(BoothprintError::Configuration(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}

/// Block until `fd` accepts writes or `timeout` passes.
fn wait_writable(fd: i32, timeout: Duration) -> io::Result<()> {
    let mut pollfd = libc::pollfd {
        fd,
        events: libc::POLLOUT,
        revents: 0,
    };
    let millis = timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;

    loop {
        let ready = unsafe { libc::poll(&mut pollfd, 1, millis) };
        match ready {
            0 => {
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("printer not writable after {:?}", timeout),
                ));
            }
            n if n > 0 => return Ok(()),
            _ => {
                let err = io::Error::last_os_error();
                if err.kind() != io::ErrorKind::Interrupted {
                    return Err(err);
                }
            }
        }
    }
}

fn drain(fd: i32) -> io::Result<()> {
    if unsafe { libc::tcdrain(fd) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baud_constants() {
        assert_eq!(baud_constant(19200), Some(libc::B19200));
        assert_eq!(baud_constant(9600), Some(libc::B9600));
        assert_eq!(baud_constant(12345), None);
    }

    #[test]
    fn test_data_bits_flags() {
        assert_eq!(data_bits_flag(8), Some(libc::CS8));
        assert_eq!(data_bits_flag(5), Some(libc::CS5));
        assert_eq!(data_bits_flag(9), None);
    }

    #[test]
    fn test_open_missing_device_is_configuration_error() {
        let err = SerialPort::open(
            "/dev/boothprint-does-not-exist",
            &SerialLinkConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BoothprintError::Configuration(_)));
    }

    #[test]
    fn test_open_non_tty_fails_configuration() {
        // A regular file opens fine but isn't a terminal
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = SerialPort::open(file.path(), &SerialLinkConfig::default()).unwrap_err();
        assert!(matches!(err, BoothprintError::Configuration(_)));
    }

    /// Non-blocking pipe as (read end, write end).
    fn pipe() -> (File, File) {
        use std::os::unix::io::FromRawFd;

        let mut fds = [0; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        for fd in fds {
            let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
            assert_eq!(unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) }, 0);
        }
        unsafe { (File::from_raw_fd(fds[0]), File::from_raw_fd(fds[1])) }
    }

    /// Write until the kernel buffer is full.
    fn fill(file: &mut File) {
        let chunk = [0u8; 4096];
        loop {
            match file.write(&chunk) {
                Ok(_) => continue,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return,
                Err(e) => panic!("unexpected error filling pipe: {}", e),
            }
        }
    }

    #[test]
    fn test_wait_writable_ready_pipe() {
        let (_reader, writer) = pipe();
        assert!(wait_writable(writer.as_raw_fd(), Duration::from_millis(10)).is_ok());
    }

    #[test]
    fn test_wait_writable_times_out_on_full_pipe() {
        let (_reader, mut writer) = pipe();
        fill(&mut writer);

        let err = wait_writable(writer.as_raw_fd(), Duration::from_millis(10)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }

    #[test]
    fn test_write_timeout_surfaces_as_write_failure() {
        use crate::transport::{ChunkedTransport, PrinterConnection};

        let (_reader, mut writer) = pipe();
        fill(&mut writer);
        let port = SerialPort {
            file: writer,
            path: PathBuf::from("pipe"),
            write_timeout: Some(Duration::from_millis(10)),
        };
        let transport = ChunkedTransport::with_pacing(
            PrinterConnection::Connected(port),
            400,
            Duration::ZERO,
        );

        let err = transport.send(&[0x1B, 0x40]).unwrap_err();
        match err {
            BoothprintError::Write { written, total, source } => {
                assert_eq!((written, total), (0, 2));
                assert_eq!(source.kind(), io::ErrorKind::TimedOut);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
