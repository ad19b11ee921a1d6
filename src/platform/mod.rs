//! Platform-specific implementations.

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "macos")]
pub use macos::*;

// The Fn key as monitored here only exists on Apple top-case keyboard
// controllers; other targets get a stub so the crate still builds in
// cross-platform workspaces.
#[cfg(not(target_os = "macos"))]
mod fallback;
#[cfg(not(target_os = "macos"))]
pub use fallback::*;
