//! Basic example demonstrating Fn key watching.
//!
//! Run with: cargo run --example basic
//!
//! Note: On macOS, you need to grant the Input Monitoring permission to the
//! terminal.

use fnwatch::watch;

fn main() {
    println!("fnwatch basic example");
    println!("Hold and release the Fn key. Press Ctrl+C to exit.\n");

    if let Err(e) = watch(|event| {
        if event.is_pressed() {
            println!(
                "Fn pressed  (page=0x{:04X}, usage=0x{:04X})",
                event.usage_page, event.usage
            );
        } else {
            println!("Fn released");
        }
    }) {
        eprintln!("Failed to start monitor: {e}");
        if let Some(code) = e.os_code() {
            eprintln!("Platform status code: 0x{:08x}", code as u32);
        }
        std::process::exit(1);
    }
}
