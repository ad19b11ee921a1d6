//! Async channel example with Tokio.
//!
//! Run with: cargo run --example channel_async --features tokio

use fnwatch::channel::watch_async_channel;
use fnwatch::is_fn_pressed;
use std::time::Duration;
use tokio::time::interval;

#[tokio::main]
async fn main() {
    println!("fnwatch channel example (async/tokio)");
    println!("Hold and release the Fn key. Press Ctrl+C to exit.\n");

    let (handle, mut rx) = match watch_async_channel(16) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Failed to start monitor: {e}");
            std::process::exit(1);
        }
    };

    let mut heartbeat = interval(Duration::from_secs(5));

    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Some(event) => {
                        println!(
                            "Fn {}",
                            if event.is_pressed() { "pressed" } else { "released" }
                        );
                    }
                    None => {
                        eprintln!("Monitor stopped");
                        break;
                    }
                }
            }
            _ = heartbeat.tick() => {
                println!("(heartbeat) fn currently pressed: {}", is_fn_pressed());
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    println!("\nStopping...");
    let _ = handle.stop();
}
