//! HID usage constants and the Fn key filter predicate.
//!
//! The Fn key on Apple keyboards is not reported on the standard keyboard
//! usage page. The keyboard controller in the top case reports it on the
//! Apple vendor page `0xFF00` as usage `0x0003`; some hardware revisions
//! report the same usage on page `0xFF` instead. Both are matched as
//! explicit literal cases.

use crate::event::FnKeyState;

/// Apple vendor top case usage page.
pub const APPLE_VENDOR_TOP_CASE_PAGE: u32 = 0xFF00;

/// Vendor page variant seen on some hardware revisions.
pub const APPLE_VENDOR_PAGE_LEGACY: u32 = 0xFF;

/// Usage of the Fn key on either vendor page.
pub const TOP_CASE_FN_USAGE: u32 = 0x0003;

/// Check whether a (usage page, usage) pair identifies the Fn key.
pub fn is_fn_usage(usage_page: u32, usage: u32) -> bool {
    (usage_page == APPLE_VENDOR_TOP_CASE_PAGE && usage == TOP_CASE_FN_USAGE)
        || (usage_page == APPLE_VENDOR_PAGE_LEGACY && usage == TOP_CASE_FN_USAGE)
}

/// Classify a raw input value record.
///
/// Returns `None` for records that are not the Fn key, otherwise the
/// press/release state derived from the record's integer value.
pub fn fn_key_transition(usage_page: u32, usage: u32, value: i64) -> Option<FnKeyState> {
    if is_fn_usage(usage_page, usage) {
        Some(FnKeyState::from_value(value))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_usage_matches_both_vendor_pages() {
        assert!(is_fn_usage(0xFF00, 0x0003));
        assert!(is_fn_usage(0xFF, 0x0003));
    }

    #[test]
    fn test_fn_usage_rejects_near_misses() {
        // Same page, wrong usage
        assert!(!is_fn_usage(0xFF00, 0x0004));
        assert!(!is_fn_usage(0xFF, 0x0004));
        assert!(!is_fn_usage(0xFF00, 0x0002));
        // Wrong page, right usage
        assert!(!is_fn_usage(0xFF01, 0x0003));
        assert!(!is_fn_usage(0xFE, 0x0003));
        assert!(!is_fn_usage(0x0007, 0x0003));
        // Standard keyboard page
        assert!(!is_fn_usage(0x0007, 0x0004));
        assert!(!is_fn_usage(0, 0));
    }

    #[test]
    fn test_transition_for_matching_records() {
        assert_eq!(
            fn_key_transition(0xFF00, 0x0003, 1),
            Some(FnKeyState::Pressed)
        );
        assert_eq!(
            fn_key_transition(0xFF00, 0x0003, 0),
            Some(FnKeyState::Released)
        );
        // Any nonzero value counts as pressed
        assert_eq!(
            fn_key_transition(0xFF, 0x0003, 255),
            Some(FnKeyState::Pressed)
        );
        assert_eq!(
            fn_key_transition(0xFF, 0x0003, -1),
            Some(FnKeyState::Pressed)
        );
    }

    #[test]
    fn test_transition_ignores_other_records() {
        assert_eq!(fn_key_transition(0x0007, 0x0004, 1), None);
        assert_eq!(fn_key_transition(0xFF00, 0x0004, 1), None);
        assert_eq!(fn_key_transition(0xFF01, 0x0003, 0), None);
    }
}
