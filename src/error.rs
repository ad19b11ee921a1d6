//! Error types for the Fn key monitor.

use thiserror::Error;

/// Result type alias for fnwatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while monitoring the Fn key.
#[derive(Debug, Error)]
pub enum Error {
    /// Monitor is already running.
    #[error("monitor is already running")]
    AlreadyRunning,

    /// Monitor is not running.
    #[error("monitor is not running")]
    NotRunning,

    /// The HID manager handle could not be created.
    #[error("failed to create HID manager")]
    ManagerCreateFailed,

    /// The HID manager was created but could not be opened.
    ///
    /// Carries the native `IOReturn` status. On macOS this usually means
    /// the Input Monitoring permission has not been granted.
    #[error("failed to open HID manager (IOReturn=0x{0:08x})")]
    OpenFailed(i32),

    /// Failed to start the monitor.
    #[error("failed to start monitor: {0}")]
    MonitorStartFailed(String),

    /// The operation requires elevated permissions.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Thread-related error.
    #[error("thread error: {0}")]
    ThreadError(String),

    /// Fn key monitoring is not available on this platform.
    #[error("not supported: {0}")]
    NotSupported(String),
}

impl Error {
    /// Raw status code for errors originating in the platform HID layer.
    ///
    /// `-1` when the manager handle could not be created (nothing was
    /// allocated), the native `IOReturn` when opening the manager failed.
    /// Errors raised by this crate itself have no platform code.
    pub fn os_code(&self) -> Option<i32> {
        match self {
            Error::ManagerCreateFailed => Some(-1),
            Error::OpenFailed(code) => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_code_mapping() {
        assert_eq!(Error::ManagerCreateFailed.os_code(), Some(-1));
        assert_eq!(Error::OpenFailed(0x2c9).os_code(), Some(0x2c9));
        assert_eq!(Error::AlreadyRunning.os_code(), None);
        assert_eq!(Error::NotSupported("test".into()).os_code(), None);
    }
}
