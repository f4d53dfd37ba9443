//! Terminal spinner shown while a request is in flight
//!
//! Drawn on stderr so stdout only carries results. Without a TTY a single
//! status line is printed instead.

use owo_colors::OwoColorize;
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Braille spinner frames
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner update interval (ms)
const SPINNER_INTERVAL_MS: u64 = 120;

pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<std::thread::JoinHandle<()>>,
    is_tty: bool,
}

impl Spinner {
    /// Start a new spinner with message
    pub fn new(message: &str) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let is_tty = io::stderr().is_terminal();

        if !is_tty {
            eprintln!("[claimctl]  ... {}", message);
            return Self {
                running,
                handle: None,
                is_tty,
            };
        }

        let running_clone = running.clone();
        let message = message.to_string();
        let handle = std::thread::spawn(move || {
            let mut frame = 0;
            while running_clone.load(Ordering::Relaxed) {
                eprint!(
                    "\r{}  {} {}",
                    "[claimctl]".bright_cyan(),
                    SPINNER_FRAMES[frame].bright_yellow(),
                    message.dimmed()
                );
                let _ = io::stderr().flush();
                frame = (frame + 1) % SPINNER_FRAMES.len();
                std::thread::sleep(Duration::from_millis(SPINNER_INTERVAL_MS));
            }
        });

        Self {
            running,
            handle: Some(handle),
            is_tty,
        }
    }

    /// A spinner that draws nothing (for `--json`)
    pub fn hidden() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
            is_tty: false,
        }
    }

    /// Stop spinner and clear its line
    pub fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }

        if self.is_tty {
            eprint!("\r{}\r", " ".repeat(80));
            let _ = io::stderr().flush();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_spinner_draws_nothing() {
        let spinner = Spinner::hidden();
        assert!(spinner.handle.is_none());
        assert!(!spinner.is_tty);
        spinner.stop();
    }

    #[test]
    fn test_stop_joins_drawing_thread() {
        let spinner = Spinner::new("Analyzing claim...");
        let running = spinner.running.clone();
        spinner.stop();
        assert!(!running.load(Ordering::Relaxed));
    }
}
