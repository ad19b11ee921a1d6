//! # fnwatch
//!
//! Monitoring of the Apple Fn (Globe) key via the IOKit HID subsystem.
//!
//! The Fn key never reaches ordinary keyboard APIs: the top-case keyboard
//! controller reports it on an Apple vendor usage page. This crate opens an
//! IOHIDManager matched against all devices, filters input value records
//! for that usage, and forwards press/release transitions to your sink.
//!
//! ## Features
//!
//! - Press/release callbacks for the Fn key, delivered synchronously from
//!   the platform event loop
//! - A secondary CGEventTap backend for setups where only the
//!   Accessibility permission is available
//! - Pollable level state ([`is_fn_pressed`]) in addition to edges
//! - Channel-based delivery (sync and tokio) for non-blocking consumers
//!
//! ## Quick Start
//!
//! ```no_run
//! use fnwatch::watch;
//!
//! watch(|event| {
//!     if event.is_pressed() {
//!         println!("Fn down");
//!     } else {
//!         println!("Fn up");
//!     }
//! }).expect("Failed to start monitor");
//! ```
//!
//! ## Permissions
//!
//! The HID backend requires the Input Monitoring permission; the event tap
//! backend requires Accessibility. Without them, starting the monitor fails
//! with [`Error::OpenFailed`] or [`Error::PermissionDenied`].
//!
//! ## Platform support
//!
//! macOS only. On other targets the crate builds, but starting a monitor
//! returns [`Error::NotSupported`].

pub mod channel;
pub mod error;
pub mod event;
pub mod monitor;
pub mod state;
pub mod usage;

mod platform;

// Re-exports
pub use error::{Error, Result};
pub use event::{FnKeyEvent, FnKeyState};
pub use monitor::{Backend, FnKeySink, Monitor, watch};
pub use state::is_fn_pressed;
pub use usage::{
    APPLE_VENDOR_PAGE_LEGACY, APPLE_VENDOR_TOP_CASE_PAGE, TOP_CASE_FN_USAGE, is_fn_usage,
};
