//! Stub implementation for non-macOS targets.

use crate::error::{Error, Result};
use crate::monitor::{Backend, FnKeySink};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Always fails: there is no Apple top-case controller to monitor here.
pub fn run_monitor<S: FnKeySink + 'static>(
    _running: &Arc<AtomicBool>,
    _sink: S,
    _backend: Backend,
) -> Result<()> {
    Err(Error::NotSupported(
        "Fn key monitoring is only available on macOS".into(),
    ))
}

/// Nothing to stop; succeeds so teardown paths stay uniform.
pub fn stop_monitor() -> Result<()> {
    Ok(())
}
