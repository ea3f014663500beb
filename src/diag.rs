//! Diagnostics sink for recoverable conditions.
//!
//! Resolution misses, registration collisions, and skipped shapes are data,
//! not control flow: they go through this channel and never abort the run.

use std::io::{self, Write};

pub struct Diagnostics {
    sink: Box<dyn Write>,
    /// Number of warnings emitted so far.
    pub warnings: usize,
}

impl Diagnostics {
    pub fn new(sink: Box<dyn Write>) -> Self {
        Diagnostics { sink, warnings: 0 }
    }

    /// Standard sink for the CLI: one `warning:` line per diagnostic on stderr.
    pub fn stderr() -> Self {
        Self::new(Box::new(io::stderr()))
    }

    /// Diagnostics that are counted but discarded.
    #[cfg(test)]
    pub fn ignore() -> Self {
        Self::new(Box::new(io::sink()))
    }

    pub fn warn(&mut self, message: &str) {
        self.warnings += 1;
        // A broken diagnostics stream must not abort the run.
        let _ = writeln!(self.sink, "warning: {}", message);
    }
}
