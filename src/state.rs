//! Global level-triggered Fn key state.
//!
//! Each backend keeps its own atomic pressed flag, updated from its
//! callback. [`is_fn_pressed`] ORs them, so an application that runs both
//! backends (the HID manager occasionally misses transitions right after a
//! permission grant, the event tap occasionally misses the Globe key on
//! external keyboards) sees a press as long as either source does.

use std::sync::atomic::{AtomicBool, Ordering};

/// Fn state as last reported by the HID backend.
static FN_PRESSED_HID: AtomicBool = AtomicBool::new(false);

/// Fn state as last reported by the event tap backend.
static FN_PRESSED_TAP: AtomicBool = AtomicBool::new(false);

/// Check whether the Fn key is currently held according to any backend.
#[inline]
pub fn is_fn_pressed() -> bool {
    FN_PRESSED_HID.load(Ordering::SeqCst) || FN_PRESSED_TAP.load(Ordering::SeqCst)
}

/// Record the Fn level seen by the HID backend.
#[inline]
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub(crate) fn set_hid_pressed(pressed: bool) {
    FN_PRESSED_HID.store(pressed, Ordering::SeqCst);
}

/// Record the Fn level seen by the event tap backend.
#[inline]
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub(crate) fn set_tap_pressed(pressed: bool) {
    FN_PRESSED_TAP.store(pressed, Ordering::SeqCst);
}

/// Reset both flags. Called when a monitor starts.
#[inline]
pub(crate) fn reset() {
    FN_PRESSED_HID.store(false, Ordering::SeqCst);
    FN_PRESSED_TAP.store(false, Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: the flags are process-global, so separate tests would
    // race under the parallel test runner.
    #[test]
    fn test_pressed_is_or_of_backends() {
        reset();
        assert!(!is_fn_pressed());

        set_hid_pressed(true);
        assert!(is_fn_pressed());

        set_tap_pressed(true);
        assert!(is_fn_pressed());

        set_hid_pressed(false);
        assert!(is_fn_pressed());

        set_tap_pressed(false);
        assert!(!is_fn_pressed());

        set_hid_pressed(true);
        set_tap_pressed(true);
        reset();
        assert!(!is_fn_pressed());
    }
}
