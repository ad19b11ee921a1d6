//! Channel-based delivery for non-blocking Fn key processing.
//!
//! This module provides channel-based alternatives to the callback sink,
//! allowing you to receive Fn key transitions in the background and process
//! them in your main application.
//!
//! # Example (Sync)
//!
//! ```no_run
//! use fnwatch::channel::watch_channel;
//! use std::time::Duration;
//!
//! let (handle, rx) = watch_channel(16).expect("Failed to start monitor");
//!
//! loop {
//!     match rx.recv_timeout(Duration::from_millis(100)) {
//!         Ok(event) => println!("Fn pressed: {}", event.is_pressed()),
//!         Err(_) => {
//!             // Timeout - do other work or check exit condition
//!         }
//!     }
//! }
//! ```
//!
//! # Example (Async with Tokio)
//!
//! ```ignore
//! use fnwatch::channel::watch_async_channel;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (handle, mut rx) = watch_async_channel(16).expect("Failed to start monitor");
//!
//!     while let Some(event) = rx.recv().await {
//!         println!("Fn pressed: {}", event.is_pressed());
//!     }
//! }
//! ```

use crate::error::{Error, Result};
use crate::event::FnKeyEvent;
use crate::monitor::{Backend, FnKeySink};
use crate::platform;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::thread::{self, JoinHandle};

/// Handle to control a channel-based monitor.
///
/// Use this to stop the monitor when you're done receiving events.
/// The monitor will also stop automatically when this handle is dropped.
pub struct ChannelMonitorHandle {
    running: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

impl ChannelMonitorHandle {
    /// Stop the monitor and wait for the background thread to finish.
    pub fn stop(mut self) -> Result<()> {
        self.stop_inner()
    }

    /// Check if the monitor is still running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn stop_inner(&mut self) -> Result<()> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Ok(()); // Already stopped
        }

        platform::stop_monitor()?;

        if let Some(handle) = self.thread_handle.take() {
            handle
                .join()
                .map_err(|_| Error::ThreadError("failed to join monitor thread".into()))?;
        }

        Ok(())
    }
}

impl Drop for ChannelMonitorHandle {
    fn drop(&mut self) {
        let _ = self.stop_inner();
    }
}

/// Sink that sends events to a bounded sync channel.
struct ChannelSink {
    sender: SyncSender<FnKeyEvent>,
}

impl FnKeySink for ChannelSink {
    fn handle_event(&self, event: &FnKeyEvent) {
        // Try to send, but don't block if the channel is full.
        // This prevents the callback from blocking the event loop
        // if the consumer is slow.
        let _ = self.sender.try_send(event.clone());
    }
}

/// Sink that sends events to an unbounded sync channel.
struct UnboundedChannelSink {
    sender: Sender<FnKeyEvent>,
}

impl FnKeySink for UnboundedChannelSink {
    fn handle_event(&self, event: &FnKeyEvent) {
        let _ = self.sender.send(event.clone());
    }
}

fn spawn_monitor<S: FnKeySink + 'static>(
    sink: S,
) -> (Arc<AtomicBool>, JoinHandle<()>) {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    // Reset level state before starting
    crate::state::reset();

    let thread_handle = thread::spawn(move || {
        if let Err(e) = platform::run_monitor(&running_clone, sink, Backend::Hid) {
            log::warn!("Fn key monitor exited with error: {e}");
        }
        running_clone.store(false, Ordering::SeqCst);
    });

    (running, thread_handle)
}

/// Start a monitor that sends transitions to a bounded channel.
///
/// Returns a handle to control the monitor and a receiver for events.
/// The monitor runs in a background thread.
///
/// # Arguments
///
/// * `capacity` - Maximum number of events to buffer. If the buffer is full,
///   new events are dropped to keep the event loop from blocking.
///
/// # Example
///
/// ```no_run
/// use fnwatch::channel::watch_channel;
///
/// let (handle, rx) = watch_channel(16).expect("Failed to start monitor");
///
/// for event in rx.iter() {
///     println!("Fn pressed: {}", event.is_pressed());
/// }
/// ```
pub fn watch_channel(capacity: usize) -> Result<(ChannelMonitorHandle, Receiver<FnKeyEvent>)> {
    let (sender, receiver) = mpsc::sync_channel(capacity);
    let (running, thread_handle) = spawn_monitor(ChannelSink { sender });

    let handle = ChannelMonitorHandle {
        running,
        thread_handle: Some(thread_handle),
    };

    Ok((handle, receiver))
}

/// Start a monitor that sends transitions to an unbounded channel.
///
/// Similar to `watch_channel`, but uses an unbounded channel. Fn key
/// transitions are rare, so memory growth is not a practical concern; use
/// this if you must not drop a transition.
pub fn watch_unbounded_channel() -> Result<(ChannelMonitorHandle, Receiver<FnKeyEvent>)> {
    let (sender, receiver) = mpsc::channel();
    let (running, thread_handle) = spawn_monitor(UnboundedChannelSink { sender });

    let handle = ChannelMonitorHandle {
        running,
        thread_handle: Some(thread_handle),
    };

    Ok((handle, receiver))
}

// ============================================================================
// Tokio async support (behind feature flag)
// ============================================================================

#[cfg(feature = "tokio")]
pub use tokio_channel::*;

#[cfg(feature = "tokio")]
mod tokio_channel {
    use super::*;
    use tokio::sync::mpsc as tokio_mpsc;

    /// Sink that sends events to a tokio async channel.
    struct TokioChannelSink {
        sender: tokio_mpsc::Sender<FnKeyEvent>,
    }

    impl FnKeySink for TokioChannelSink {
        fn handle_event(&self, event: &FnKeyEvent) {
            // Use try_send to avoid blocking the event loop thread
            let _ = self.sender.try_send(event.clone());
        }
    }

    /// Start a monitor that sends transitions to a tokio async channel.
    ///
    /// Returns a handle to control the monitor and an async receiver for
    /// events. The monitor runs in a background thread.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use fnwatch::channel::watch_async_channel;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let (handle, mut rx) = watch_async_channel(16).expect("Failed to start monitor");
    ///
    ///     while let Some(event) = rx.recv().await {
    ///         println!("Fn pressed: {}", event.is_pressed());
    ///     }
    /// }
    /// ```
    pub fn watch_async_channel(
        capacity: usize,
    ) -> Result<(ChannelMonitorHandle, tokio_mpsc::Receiver<FnKeyEvent>)> {
        let (sender, receiver) = tokio_mpsc::channel(capacity);
        let (running, thread_handle) = spawn_monitor(TokioChannelSink { sender });

        let handle = ChannelMonitorHandle {
            running,
            thread_handle: Some(thread_handle),
        };

        Ok((handle, receiver))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_channel_closes_when_monitor_cannot_start() {
        // On unsupported platforms the background thread exits immediately,
        // dropping the sender; the receiver must observe disconnection
        // rather than hanging.
        let (handle, rx) = watch_channel(16).unwrap();
        assert!(rx.recv().is_err());
        assert!(!handle.is_running() || handle.stop().is_ok());
    }
}
