// Stdout console

use std::io::Write;
use suno_core::port::ConsoleChannel;

/// Operator console on the process's stdout
///
/// Each line is written and flushed immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl StdoutConsole {
    pub fn new() -> Self {
        Self
    }
}

impl ConsoleChannel for StdoutConsole {
    fn send(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        // Console delivery is treated as infallible; a closed stdout drops the line
        let _ = writeln!(out, "{}", line).and_then(|_| out.flush());
    }
}
