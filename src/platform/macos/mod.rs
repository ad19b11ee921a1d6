//! macOS backends: IOHIDManager (primary) and CGEventTap (secondary).

use crate::error::{Error, Result};
use crate::monitor::{Backend, FnKeySink};
use objc2_core_foundation::CFRunLoop;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

mod hid;
mod tap;

/// Stored sink for the callbacks
static SINK: Mutex<Option<Box<dyn FnKeySink>>> = Mutex::new(None);

/// Flag to signal the run loop to stop
static STOP_FLAG: Mutex<Option<Arc<AtomicBool>>> = Mutex::new(None);

/// Wrapper for raw pointer to CFRunLoop that implements Send + Sync
/// Safety: the pointer is only stopped, never dereferenced for data access,
/// and run loops are thread-safe to signal from other threads
struct RunLoopPointer(*const CFRunLoop);
unsafe impl Send for RunLoopPointer {}
unsafe impl Sync for RunLoopPointer {}

/// The run loop the active monitor is scheduled on, for stop()
static MONITOR_LOOP: Mutex<Option<RunLoopPointer>> = Mutex::new(None);

/// Store the sink and stop flag before entering a backend's run loop.
fn install(running: &Arc<AtomicBool>, sink: Box<dyn FnKeySink>) -> Result<()> {
    {
        let mut s = SINK
            .lock()
            .map_err(|_| Error::ThreadError("mutex poisoned".into()))?;
        *s = Some(sink);
    }
    {
        let mut f = STOP_FLAG
            .lock()
            .map_err(|_| Error::ThreadError("mutex poisoned".into()))?;
        *f = Some(running.clone());
    }
    Ok(())
}

/// Clear the statics after a backend's run loop exits.
fn uninstall() -> Result<()> {
    {
        let mut s = SINK
            .lock()
            .map_err(|_| Error::ThreadError("mutex poisoned".into()))?;
        *s = None;
    }
    {
        let mut f = STOP_FLAG
            .lock()
            .map_err(|_| Error::ThreadError("mutex poisoned".into()))?;
        *f = None;
    }
    {
        let mut l = MONITOR_LOOP
            .lock()
            .map_err(|_| Error::ThreadError("mutex poisoned".into()))?;
        *l = None;
    }
    Ok(())
}

/// Record the run loop the monitor scheduled on so stop() can reach it.
fn remember_run_loop(run_loop: &CFRunLoop) {
    if let Ok(mut guard) = MONITOR_LOOP.lock() {
        *guard = Some(RunLoopPointer(run_loop as *const CFRunLoop));
    }
}

/// Check the stop flag from inside a callback; stops the current run loop
/// and reports true when a stop was requested.
fn stop_requested() -> bool {
    if let Ok(guard) = STOP_FLAG.lock()
        && let Some(ref flag) = *guard
        && !flag.load(Ordering::SeqCst)
    {
        if let Some(run_loop) = CFRunLoop::current() {
            run_loop.stop();
        }
        return true;
    }
    false
}

/// Feed a raw value record through the shared filter and sink.
fn dispatch(usage_page: u32, usage: u32, value: i64) -> Option<crate::event::FnKeyState> {
    if let Ok(guard) = SINK.lock()
        && let Some(ref sink) = *guard
    {
        return crate::monitor::dispatch_raw_value(sink.as_ref(), usage_page, usage, value);
    }
    None
}

/// Run the selected backend (blocking).
pub fn run_monitor<S: FnKeySink + 'static>(
    running: &Arc<AtomicBool>,
    sink: S,
    backend: Backend,
) -> Result<()> {
    match backend {
        Backend::Hid => hid::run(running, Box::new(sink)),
        Backend::EventTap => tap::run(running, Box::new(sink)),
    }
}

/// Stop the running monitor's run loop.
pub fn stop_monitor() -> Result<()> {
    if let Ok(guard) = MONITOR_LOOP.lock()
        && let Some(ref ptr) = *guard
        && !ptr.0.is_null()
    {
        unsafe {
            (*ptr.0).stop();
        }
        return Ok(());
    }
    // Monitor may be between scheduling and running; fall back to the main
    // loop like the stop flag check will on the next event.
    if let Some(run_loop) = CFRunLoop::main() {
        run_loop.stop();
    }
    Ok(())
}
