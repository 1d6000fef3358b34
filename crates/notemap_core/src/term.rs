//! Terminal capabilities consumed by the shell.
//!
//! # Responsibility
//! - Define the line-input and display seams the shell talks through.
//! - Provide adapters over any `BufRead` / `Write` pair.
//!
//! # Invariants
//! - End of input is reported as `NoteMapError::InputExhausted`, never as an
//!   I/O failure.
//! - Input that is not valid UTF-8 is decoded lossily, never rejected.
//! - `clear_screen` is best effort; `false` means the caller must fall back.

use crate::error::{NoteMapError, NoteMapResult};
use std::io::{BufRead, Write};

/// Source of user input lines.
pub trait LineReader {
    /// Reads one line without its trailing newline.
    fn read_line(&mut self) -> NoteMapResult<String>;
}

/// Sink for user-visible output.
pub trait Display {
    /// Writes `text` as-is (no newline appended) and flushes.
    fn print(&mut self, text: &str) -> NoteMapResult<()>;

    /// Clears the screen. Returns `false` when unsupported.
    fn clear_screen(&mut self) -> bool;
}

/// `LineReader` over any buffered reader.
pub struct BufLineReader<R: BufRead> {
    inner: R,
}

impl<R: BufRead> BufLineReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: BufRead> LineReader for BufLineReader<R> {
    fn read_line(&mut self) -> NoteMapResult<String> {
        let mut raw = Vec::new();
        let read = self.inner.read_until(b'\n', &mut raw)?;
        if read == 0 {
            return Err(NoteMapError::InputExhausted);
        }
        // Undecodable bytes become U+FFFD so one bad line stays one bad command.
        let line = String::from_utf8_lossy(&raw);
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }
}

/// `Display` over any writer. Screen clearing is delegated to an optional
/// hook so platforms without one fall back to line skipping.
pub struct WriterDisplay<W: Write> {
    inner: W,
    clear_hook: Option<fn() -> bool>,
}

impl<W: Write> WriterDisplay<W> {
    /// Display that cannot clear the screen.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            clear_hook: None,
        }
    }

    /// Display that clears the screen through `clear_hook`.
    pub fn with_clear_hook(inner: W, clear_hook: fn() -> bool) -> Self {
        Self {
            inner,
            clear_hook: Some(clear_hook),
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Display for WriterDisplay<W> {
    fn print(&mut self, text: &str) -> NoteMapResult<()> {
        self.inner.write_all(text.as_bytes())?;
        self.inner.flush()?;
        Ok(())
    }

    fn clear_screen(&mut self) -> bool {
        match self.clear_hook {
            Some(hook) => {
                // Flush first so the clear does not race buffered output.
                let _ = self.inner.flush();
                hook()
            }
            None => false,
        }
    }
}
