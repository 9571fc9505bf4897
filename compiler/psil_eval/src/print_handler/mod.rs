//! Output sink for the `out` builtin.
//!
//! The interpreter never writes to stdout directly. Output goes through a
//! shared handler so that the embedding decides where it lands:
//! - `psil run` / the REPL: stdout
//! - tests: a buffer that can be read back
//! - benchmarks and dry runs: discarded
//!
//! Enum dispatch keeps the per-line cost to a match.

use std::sync::Arc;

use parking_lot::Mutex;

/// Writes each line to stdout.
#[derive(Default)]
pub struct StdoutPrintHandler;

impl StdoutPrintHandler {
    pub fn println(&self, line: &str) {
        println!("{line}");
    }
}

/// Collects lines in memory.
#[derive(Default)]
pub struct BufferPrintHandler {
    buffer: Mutex<String>,
    lines: Mutex<usize>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        BufferPrintHandler::default()
    }

    pub fn println(&self, line: &str) {
        let mut buffer = self.buffer.lock();
        buffer.push_str(line);
        buffer.push('\n');
        *self.lines.lock() += 1;
    }

    /// Everything written so far, one `\n`-terminated line per call.
    pub fn output(&self) -> String {
        self.buffer.lock().clone()
    }

    pub fn line_count(&self) -> usize {
        *self.lines.lock()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
        *self.lines.lock() = 0;
    }
}

/// Where interpreter output goes.
pub enum PrintHandlerImpl {
    Stdout(StdoutPrintHandler),
    Buffer(BufferPrintHandler),
    /// Discards everything.
    Silent,
}

impl PrintHandlerImpl {
    /// Write one line.
    pub fn println(&self, line: &str) {
        match self {
            Self::Stdout(h) => h.println(line),
            Self::Buffer(h) => h.println(line),
            Self::Silent => {}
        }
    }

    /// Captured output; empty for handlers that do not capture.
    pub fn output(&self) -> String {
        match self {
            Self::Buffer(h) => h.output(),
            Self::Stdout(_) | Self::Silent => String::new(),
        }
    }

    /// Number of captured lines; zero for handlers that do not capture.
    pub fn line_count(&self) -> usize {
        match self {
            Self::Buffer(h) => h.line_count(),
            Self::Stdout(_) | Self::Silent => 0,
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(h) = self {
            h.clear();
        }
    }
}

/// Print handler shared between the interpreter and its embedding.
pub type SharedPrintHandler = Arc<PrintHandlerImpl>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Stdout(StdoutPrintHandler))
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Buffer(BufferPrintHandler::new()))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Silent)
}
