//! IOHIDManager-based Fn key monitoring.
//!
//! The manager is configured to match every device and the Fn filtering
//! happens entirely in the input value callback, because the vendor
//! top-case usage is not something device matching dictionaries can
//! express portably across keyboard revisions.

#![allow(unsafe_op_in_unsafe_fn)]

use crate::error::{Error, Result};
use crate::monitor::FnKeySink;
use crate::state;
use core::ptr::NonNull;
use objc2_core_foundation::{CFRunLoop, kCFRunLoopCommonModes};
use objc2_io_kit::{IOHIDManager, IOHIDValue, IOReturn, kIOHIDOptionsTypeNone, kIOReturnSuccess};
use std::ffi::c_void;
use std::ptr::null_mut;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// The IOHIDManager input value callback.
///
/// Invoked for every value change on every matched device; reads the
/// element's usage pair and the record's integer value synchronously and
/// retains nothing past its return.
unsafe extern "C-unwind" fn input_value_callback(
    _context: *mut c_void,
    _result: IOReturn,
    _sender: *mut c_void,
    value: NonNull<IOHIDValue>,
) {
    // Check if we should stop
    if super::stop_requested() {
        return;
    }

    let value = value.as_ref();
    let element = value.element();
    let usage_page = element.usage_page();
    let usage = element.usage();
    let raw = value.integer_value();

    if let Some(transition) = super::dispatch(usage_page, usage, raw as i64) {
        state::set_hid_pressed(transition.is_pressed());
    }
}

/// Run the HID monitor (blocking).
pub(super) fn run(running: &Arc<AtomicBool>, sink: Box<dyn FnKeySink>) -> Result<()> {
    super::install(running, sink)?;

    let result = unsafe { run_event_loop() };

    super::uninstall()?;
    result
}

unsafe fn run_event_loop() -> Result<()> {
    // Default allocator, no options. Nothing has been allocated if this
    // fails, so there is nothing to release on this path.
    let manager =
        IOHIDManager::new(None, kIOHIDOptionsTypeNone).ok_or(Error::ManagerCreateFailed)?;

    // Match all devices; the callback does the filtering.
    manager.set_device_matching(None);
    manager.register_input_value_callback(Some(input_value_callback), null_mut());

    let current_loop = CFRunLoop::current()
        .ok_or_else(|| Error::MonitorStartFailed("failed to get current run loop".into()))?;
    super::remember_run_loop(&current_loop);

    manager.schedule_with_run_loop(&current_loop, kCFRunLoopCommonModes);

    let status = manager.open(kIOHIDOptionsTypeNone);
    if status != kIOReturnSuccess {
        log::warn!(
            "IOHIDManagerOpen failed (IOReturn=0x{:08x}); Input Monitoring permission may be required",
            status as u32
        );
        manager.unschedule_from_run_loop(&current_loop, kCFRunLoopCommonModes);
        // The manager handle itself is released when `manager` drops.
        return Err(Error::OpenFailed(status));
    }

    log::debug!("Fn key HID monitor running");
    CFRunLoop::run();
    log::debug!("Fn key HID monitor stopped");

    let status = manager.close(kIOHIDOptionsTypeNone);
    if status != kIOReturnSuccess {
        log::warn!("IOHIDManagerClose failed (IOReturn=0x{:08x})", status as u32);
    }
    manager.unschedule_from_run_loop(&current_loop, kCFRunLoopCommonModes);

    Ok(())
}
