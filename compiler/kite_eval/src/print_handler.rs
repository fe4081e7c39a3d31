//! Destination of the `print` builtin.
//!
//! Scripts run by a CLI print to stdout; embedding hosts and tests capture
//! output in a buffer; some hosts discard it. The handler is shared with the
//! host through an `Arc`, so a host thread can read captured output while
//! the interpreter owns its clone.

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

/// Where printed lines go.
pub enum PrintHandler {
    /// Process stdout (default).
    Stdout,
    /// In-memory capture.
    Buffer(Mutex<String>),
    /// Discard.
    Silent,
}

impl PrintHandler {
    /// Write one line; the newline is appended here.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        match self {
            Self::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(line.as_bytes())?;
                out.write_all(b"\n")
            }
            Self::Buffer(buffer) => {
                let mut buf = buffer.lock();
                buf.push_str(line);
                buf.push('\n');
                Ok(())
            }
            Self::Silent => Ok(()),
        }
    }

    /// Captured output so far. Empty for stdout and silent handlers.
    pub fn output(&self) -> String {
        match self {
            Self::Buffer(buffer) => buffer.lock().clone(),
            Self::Stdout | Self::Silent => String::new(),
        }
    }

    /// Take the captured output, leaving the buffer empty.
    pub fn take_output(&self) -> String {
        match self {
            Self::Buffer(buffer) => std::mem::take(&mut *buffer.lock()),
            Self::Stdout | Self::Silent => String::new(),
        }
    }
}

/// Print handler shared between the host and an interpreter.
pub type SharedPrintHandler = Arc<PrintHandler>;

/// Handler writing to stdout.
pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Stdout)
}

/// Handler capturing output in memory.
pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Buffer(Mutex::new(String::new())))
}

/// Handler discarding output.
pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Silent)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;

    #[test]
    fn buffer_collects_lines() {
        let handler = buffer_handler();
        handler.write_line("hello").unwrap();
        handler.write_line("").unwrap();
        handler.write_line("world").unwrap();
        assert_eq!(handler.output(), "hello\n\nworld\n");
    }

    #[test]
    fn take_output_drains_buffer() {
        let handler = buffer_handler();
        handler.write_line("a").unwrap();
        assert_eq!(handler.take_output(), "a\n");
        assert_eq!(handler.output(), "");
    }

    #[test]
    fn silent_and_stdout_capture_nothing() {
        let silent = silent_handler();
        silent.write_line("dropped").unwrap();
        assert_eq!(silent.output(), "");
        assert_eq!(stdout_handler().take_output(), "");
    }

    #[test]
    fn host_thread_reads_captured_output() {
        let handler = buffer_handler();
        let reader = Arc::clone(&handler);
        handler.write_line("from script").unwrap();
        let seen = std::thread::spawn(move || reader.output()).join().unwrap();
        assert_eq!(seen, "from script\n");
    }
}
