//! Sync channel example - receive Fn transitions in the background.
//!
//! Run with: cargo run --example channel_sync

use fnwatch::channel::watch_channel;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

fn main() {
    println!("fnwatch channel example (sync)");
    println!("Hold and release the Fn key. Press Ctrl+C to exit.\n");

    let (handle, rx) = match watch_channel(16) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Failed to start monitor: {e}");
            std::process::exit(1);
        }
    };

    let stop = Arc::new(AtomicBool::new(false));
    let stop_clone = stop.clone();
    ctrlc::set_handler(move || {
        stop_clone.store(true, Ordering::SeqCst);
    })
    .expect("Failed to set Ctrl+C handler");

    let mut transitions = 0u32;
    while !stop.load(Ordering::SeqCst) {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => {
                transitions += 1;
                println!(
                    "[{}] Fn {}",
                    transitions,
                    if event.is_pressed() { "pressed" } else { "released" }
                );
            }
            Err(_) => {
                if !handle.is_running() {
                    eprintln!("Monitor stopped unexpectedly");
                    break;
                }
            }
        }
    }

    println!("\nStopping...");
    let _ = handle.stop();
}
