//! Main Monitor struct and FnKeySink trait.

use crate::error::{Error, Result};
use crate::event::FnKeyEvent;
use crate::platform;
use crate::usage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread::JoinHandle;

/// Trait for receiving Fn key transitions.
///
/// Implement this trait (or just pass a closure) to receive one call per
/// press and one per release. Calls are made synchronously on the thread
/// running the platform event loop; keep the handler fast.
pub trait FnKeySink: Send + Sync {
    /// Called when the Fn key changes state.
    fn handle_event(&self, event: &FnKeyEvent);
}

/// Implement FnKeySink for closures.
impl<F> FnKeySink for F
where
    F: Fn(&FnKeyEvent) + Send + Sync,
{
    fn handle_event(&self, event: &FnKeyEvent) {
        self(event);
    }
}

/// Which platform event source to monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// IOKit HID manager, matching all devices and filtering for the
    /// vendor top-case Fn usage. Requires the Input Monitoring permission.
    #[default]
    Hid,
    /// CGEventTap listening for the Fn/Globe modifier flag. Requires the
    /// Accessibility permission.
    EventTap,
}

/// Monitor that watches the Fn key and reports transitions to a sink.
pub struct Monitor {
    running: Arc<AtomicBool>,
    thread_handle: RwLock<Option<JoinHandle<()>>>,
    backend: Backend,
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Monitor {
    /// Create a monitor using the HID backend.
    pub fn new() -> Self {
        Self::with_backend(Backend::Hid)
    }

    /// Create a monitor using the given backend.
    pub fn with_backend(backend: Backend) -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            thread_handle: RwLock::new(None),
            backend,
        }
    }

    /// Start monitoring (blocking).
    ///
    /// This will block the current thread inside the platform event loop
    /// until `stop()` is called from another thread.
    pub fn run<S: FnKeySink + 'static>(&self, sink: S) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyRunning);
        }

        // Reset level state before starting
        crate::state::reset();

        let result = platform::run_monitor(&self.running, sink, self.backend);

        self.running.store(false, Ordering::SeqCst);
        result
    }

    /// Start monitoring in a background thread (non-blocking).
    ///
    /// Returns immediately. Use `stop()` to terminate the monitor.
    pub fn run_async<S: FnKeySink + 'static>(&self, sink: S) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyRunning);
        }

        // Reset level state before starting
        crate::state::reset();

        let running = self.running.clone();
        let backend = self.backend;
        let handle = std::thread::spawn(move || {
            if let Err(e) = platform::run_monitor(&running, sink, backend) {
                log::warn!("Fn key monitor exited with error: {e}");
            }
            running.store(false, Ordering::SeqCst);
        });

        *self.thread_handle.write().unwrap() = Some(handle);
        Ok(())
    }

    /// Stop the monitor.
    pub fn stop(&self) -> Result<()> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Err(Error::NotRunning);
        }

        platform::stop_monitor()?;

        // Wait for the thread to finish if running async
        if let Some(handle) = self.thread_handle.write().unwrap().take() {
            handle
                .join()
                .map_err(|_| Error::ThreadError("failed to join monitor thread".into()))?;
        }

        Ok(())
    }

    /// Check if the monitor is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        if self.is_running() {
            let _ = self.stop();
        }
    }
}

/// Convenience function to start watching the Fn key.
///
/// This is a simpler alternative to creating a Monitor instance.
/// Blocks until the monitor is stopped externally or an error occurs.
///
/// # Example
///
/// ```no_run
/// use fnwatch::watch;
///
/// watch(|event| {
///     if event.is_pressed() {
///         println!("Fn down");
///     } else {
///         println!("Fn up");
///     }
/// }).expect("Failed to start monitor");
/// ```
pub fn watch<F>(callback: F) -> Result<()>
where
    F: Fn(&FnKeyEvent) + Send + Sync + 'static,
{
    let monitor = Monitor::new();
    monitor.run(callback)
}

/// Filter a raw HID value record and forward a matching transition.
///
/// This is the platform-independent half of the input value callback. The
/// sink is invoked at most once per record, synchronously, and only for
/// records identifying the Fn key. Non-matching records are a no-op, not an
/// error. Returns the transition (if any) so the calling backend can update
/// its level flag in [`crate::state`].
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub(crate) fn dispatch_raw_value<S: FnKeySink + ?Sized>(
    sink: &S,
    usage_page: u32,
    usage: u32,
    value: i64,
) -> Option<crate::event::FnKeyState> {
    let state = usage::fn_key_transition(usage_page, usage, value)?;
    sink.handle_event(&FnKeyEvent::new(state, usage_page, usage));
    Some(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::FnKeyState;
    use std::sync::Mutex;

    /// Sink that records every transition it receives.
    struct RecordingSink {
        seen: Mutex<Vec<FnKeyState>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl FnKeySink for RecordingSink {
        fn handle_event(&self, event: &FnKeyEvent) {
            self.seen.lock().unwrap().push(event.state);
        }
    }

    #[test]
    fn test_dispatch_press_and_release() {
        let sink = RecordingSink::new();
        dispatch_raw_value(&sink, 0xFF00, 0x0003, 1);
        dispatch_raw_value(&sink, 0xFF00, 0x0003, 0);
        assert_eq!(
            *sink.seen.lock().unwrap(),
            vec![FnKeyState::Pressed, FnKeyState::Released]
        );
    }

    #[test]
    fn test_dispatch_ignores_non_matching_records() {
        let sink = RecordingSink::new();
        dispatch_raw_value(&sink, 0x0007, 0x0004, 1);
        dispatch_raw_value(&sink, 0xFF00, 0x0004, 1);
        dispatch_raw_value(&sink, 0x0001, 0x0030, 127);
        assert!(sink.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dispatch_sequence_in_order() {
        // Simulated delivery: press, release, unrelated key press.
        let sink = RecordingSink::new();
        dispatch_raw_value(&sink, 0xFF00, 0x0003, 1);
        dispatch_raw_value(&sink, 0xFF00, 0x0003, 0);
        dispatch_raw_value(&sink, 0x0007, 0x0004, 1);
        assert_eq!(
            *sink.seen.lock().unwrap(),
            vec![FnKeyState::Pressed, FnKeyState::Released]
        );
    }

    #[test]
    fn test_dispatch_legacy_vendor_page() {
        let sink = RecordingSink::new();
        dispatch_raw_value(&sink, 0xFF, 0x0003, 1);
        let seen = sink.seen.lock().unwrap();
        assert_eq!(*seen, vec![FnKeyState::Pressed]);
    }

    #[test]
    fn test_closure_sink() {
        // Closures satisfy the sink trait directly.
        let seen = Mutex::new(Vec::new());
        let sink = |event: &FnKeyEvent| {
            seen.lock().unwrap().push(event.is_pressed());
        };
        dispatch_raw_value(&sink, 0xFF00, 0x0003, 1);
        dispatch_raw_value(&sink, 0xFF00, 0x0003, 0);
        assert_eq!(*seen.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn test_stop_when_not_running() {
        let monitor = Monitor::new();
        assert!(!monitor.is_running());
        assert!(matches!(monitor.stop(), Err(Error::NotRunning)));
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_run_unsupported_platform() {
        let monitor = Monitor::new();
        let result = monitor.run(|_event: &FnKeyEvent| {});
        assert!(matches!(result, Err(Error::NotSupported(_))));
        // The failed run must leave the monitor startable again.
        assert!(!monitor.is_running());
    }
}
