//! CGEventTap-based Fn key monitoring.
//!
//! Secondary backend: watches the Fn/Globe modifier through the window
//! server instead of the HID layer. Useful when the Input Monitoring
//! permission is unavailable but Accessibility is granted. Transitions are
//! deduplicated and fed through the same dispatch path as HID records,
//! reported under the canonical top-case usage pair.

#![allow(improper_ctypes_definitions)]
#![allow(unsafe_op_in_unsafe_fn)]

use crate::error::{Error, Result};
use crate::monitor::FnKeySink;
use crate::state;
use crate::usage::{APPLE_VENDOR_TOP_CASE_PAGE, TOP_CASE_FN_USAGE};
use core::ptr::NonNull;
use objc2_core_foundation::{CFMachPort, CFRunLoop, kCFRunLoopCommonModes};
use objc2_core_graphics::{
    CGEvent, CGEventField, CGEventFlags, CGEventTapCallBack, CGEventTapLocation, CGEventTapOptions,
    CGEventTapPlacement, CGEventTapProxy, CGEventType,
};
use objc2_foundation::NSAutoreleasePool;
use std::ffi::c_void;
use std::ptr::null_mut;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Virtual keycode of the Fn key.
const FUNCTION_KEYCODE: i64 = 0x3F;

/// Wrapper for raw pointer to CFMachPort that implements Send + Sync
/// Safety: the pointer is only accessed from the callback which runs on the
/// same thread that created the tap
struct TapPointer(*const CFMachPort);
unsafe impl Send for TapPointer {}
unsafe impl Sync for TapPointer {}

/// Stored event tap for timeout recovery
static EVENT_TAP: Mutex<Option<TapPointer>> = Mutex::new(None);

/// Last Fn level seen, for suppressing duplicate FlagsChanged edges
static LAST_FN_DOWN: AtomicBool = AtomicBool::new(false);

/// The CGEventTap callback
unsafe extern "C-unwind" fn tap_callback(
    _proxy: CGEventTapProxy,
    event_type: CGEventType,
    cg_event: NonNull<CGEvent>,
    _user_info: *mut c_void,
) -> *mut CGEvent {
    // Check if we should stop
    if super::stop_requested() {
        return cg_event.as_ptr();
    }

    // macOS disables the tap if the callback takes too long; re-enable it
    if event_type == CGEventType::TapDisabledByTimeout
        || event_type == CGEventType::TapDisabledByUserInput
    {
        if let Ok(guard) = EVENT_TAP.lock()
            && let Some(ref tap_ptr) = *guard
        {
            log::warn!("Event tap was disabled (timeout or user input), re-enabling...");
            if !tap_ptr.0.is_null() {
                CGEvent::tap_enable(&*tap_ptr.0, true);
            }
        }
        return cg_event.as_ptr();
    }

    let keycode =
        CGEvent::integer_value_field(Some(cg_event.as_ref()), CGEventField::KeyboardEventKeycode);
    let is_fn_key = keycode == FUNCTION_KEYCODE;

    let level = match event_type {
        CGEventType::FlagsChanged => {
            let flags = CGEvent::flags(Some(cg_event.as_ref()));
            let fn_down = flags.contains(CGEventFlags::MaskSecondaryFn);
            if is_fn_key || fn_down {
                Some(fn_down)
            } else {
                None
            }
        }
        CGEventType::KeyDown if is_fn_key => Some(true),
        CGEventType::KeyUp if is_fn_key => Some(false),
        _ => None,
    };

    // Only forward actual transitions; FlagsChanged repeats the Fn level
    // whenever any other modifier changes while Fn is held.
    if let Some(down) = level
        && LAST_FN_DOWN.swap(down, Ordering::SeqCst) != down
    {
        super::dispatch(APPLE_VENDOR_TOP_CASE_PAGE, TOP_CASE_FN_USAGE, down as i64);
        state::set_tap_pressed(down);
    }

    cg_event.as_ptr()
}

/// Run the event tap monitor (blocking).
pub(super) fn run(running: &Arc<AtomicBool>, sink: Box<dyn FnKeySink>) -> Result<()> {
    super::install(running, sink)?;
    LAST_FN_DOWN.store(false, Ordering::SeqCst);

    let result = unsafe { run_event_loop() };

    {
        if let Ok(mut guard) = EVENT_TAP.lock() {
            *guard = None;
        }
    }
    super::uninstall()?;
    result
}

unsafe fn run_event_loop() -> Result<()> {
    let _pool = NSAutoreleasePool::new();

    let mask: u64 = (1 << CGEventType::KeyDown.0)
        | (1 << CGEventType::KeyUp.0)
        | (1 << CGEventType::FlagsChanged.0);

    let callback: CGEventTapCallBack = Some(tap_callback);
    let tap = CGEvent::tap_create(
        CGEventTapLocation::HIDEventTap,
        CGEventTapPlacement::HeadInsertEventTap,
        CGEventTapOptions::ListenOnly,
        mask,
        callback,
        null_mut(),
    )
    .ok_or_else(|| {
        Error::PermissionDenied(
            "Failed to create event tap. Make sure Accessibility permissions are granted.".into(),
        )
    })?;

    // Store the tap reference for timeout recovery
    {
        let mut tap_guard = EVENT_TAP
            .lock()
            .map_err(|_| Error::ThreadError("mutex poisoned".into()))?;
        *tap_guard = Some(TapPointer(&*tap as *const CFMachPort));
    }

    let source = CFMachPort::new_run_loop_source(None, Some(&tap), 0)
        .ok_or_else(|| Error::MonitorStartFailed("failed to create run loop source".into()))?;

    let current_loop = CFRunLoop::current()
        .ok_or_else(|| Error::MonitorStartFailed("failed to get current run loop".into()))?;
    super::remember_run_loop(&current_loop);

    current_loop.add_source(Some(&source), kCFRunLoopCommonModes);

    CGEvent::tap_enable(&tap, true);

    log::debug!("Fn key event tap running");
    CFRunLoop::run();
    log::debug!("Fn key event tap stopped");

    CGEvent::tap_enable(&tap, false);

    Ok(())
}
