//! Verbose per-operation trace lines
//!
//! Each materialized entry produces one line. The operation text is written
//! before the operation runs and the line is terminated afterwards, so when
//! an operation fails the last line names the entry that failed. Write
//! failures on the sink are ignored.

use std::fmt;
use std::io::Write;

/// Destination for verbose trace lines.
pub struct Diagnostics {
    sink: Option<Box<dyn Write + Send>>,
}

impl Diagnostics {
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn stderr() -> Self {
        Self::to_writer(std::io::stderr())
    }

    pub fn to_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Some(Box::new(writer)),
        }
    }

    /// stderr when `verbose`, otherwise disabled.
    pub fn for_verbosity(verbose: bool) -> Self {
        if verbose { Self::stderr() } else { Self::disabled() }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Append text to the current line.
    pub fn write(&mut self, args: fmt::Arguments<'_>) {
        if let Some(sink) = self.sink.as_mut() {
            let _ = sink.write_fmt(args);
        }
    }

    /// Terminate the current line.
    pub fn end_line(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            let _ = sink.write_all(b"\n");
            let _ = sink.flush();
        }
    }

    /// Write a complete line.
    pub fn line(&mut self, args: fmt::Arguments<'_>) {
        self.write(args);
        self.end_line();
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::disabled()
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
