//! Interactive menu and navigation shell.
//!
//! # Responsibility
//! - Drive the main menu, map creation/selection and open-map sessions over
//!   the `LineReader` / `Display` capabilities.
//! - Recover from every core error by showing it and re-prompting.
//!
//! # Invariants
//! - End of input leaves the current screen like "menu"/"quit" would.
//! - Leaving a session never commits or discards staged edits.
//! - Only terminal output failures propagate out of `Shell::run`.

pub mod command;
mod menu;
pub mod render;
mod session;

use crate::app::SaveReport;
use crate::error::{NoteMapError, NoteMapResult};
use crate::settings::SettingsResolver;
use crate::term::{Display, LineReader};
use log::warn;

/// Consecutive read failures tolerated by one prompt.
const MAX_READ_FAILURES: usize = 3;

/// How the shell finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellExit {
    /// Changes were committed and written on quit.
    Saved(SaveReport),
    /// Quit without writing; `pending` staged edits were left behind.
    Unsaved { pending: usize },
}

/// Menu/session driver bound to one input and one output.
pub struct Shell<R: LineReader, D: Display> {
    reader: R,
    display: D,
}

impl<R: LineReader, D: Display> Shell<R, D> {
    pub fn new(reader: R, display: D) -> Self {
        Self { reader, display }
    }

    pub fn into_parts(self) -> (R, D) {
        (self.reader, self.display)
    }

    fn say(&mut self, text: &str) -> NoteMapResult<()> {
        self.display.print(text)
    }

    /// Prints `text` and reads one line. `None` means input is exhausted.
    ///
    /// A failed read is shown and the prompt repeated; after
    /// `MAX_READ_FAILURES` consecutive failures input counts as exhausted.
    fn prompt(&mut self, text: &str) -> NoteMapResult<Option<String>> {
        self.display.print(text)?;
        let mut failures = 0usize;
        loop {
            match self.reader.read_line() {
                Ok(line) => return Ok(Some(line)),
                Err(NoteMapError::InputExhausted) => return Ok(None),
                Err(err) => {
                    failures += 1;
                    warn!(
                        "event=read_line module=shell status=error attempt={failures} error={err}"
                    );
                    if failures >= MAX_READ_FAILURES {
                        return Ok(None);
                    }
                    self.display.print(&format!("\n Failed to read input: {err}\n{text}"))?;
                }
            }
        }
    }

    /// Clears the screen, or prints the configured number of blank lines.
    fn clear(&mut self, settings: &SettingsResolver) -> NoteMapResult<()> {
        if self.display.clear_screen() {
            return Ok(());
        }
        let skips = settings.line_skip_count();
        if skips == 0 {
            return Ok(());
        }
        self.display.print(&"\n".repeat(skips))
    }
}

#[cfg(test)]
mod tests {
    use super::{Shell, MAX_READ_FAILURES};
    use crate::error::{NoteMapError, NoteMapResult};
    use crate::term::{LineReader, WriterDisplay};
    use std::collections::VecDeque;

    struct ScriptedReader {
        lines: VecDeque<NoteMapResult<String>>,
    }

    impl LineReader for ScriptedReader {
        fn read_line(&mut self) -> NoteMapResult<String> {
            self.lines
                .pop_front()
                .unwrap_or(Err(NoteMapError::InputExhausted))
        }
    }

    fn broken_read() -> NoteMapResult<String> {
        Err(NoteMapError::Io(std::io::Error::other("device went away")))
    }

    #[test]
    fn prompt_reprompts_after_a_failed_read() {
        let reader = ScriptedReader {
            lines: VecDeque::from([broken_read(), Ok("2".to_string())]),
        };
        let mut shell = Shell::new(reader, WriterDisplay::new(Vec::new()));

        assert_eq!(shell.prompt("pick: ").unwrap(), Some("2".to_string()));
        let (_, display) = shell.into_parts();
        let output = String::from_utf8(display.into_inner()).unwrap();
        assert!(output.contains("Failed to read input: terminal i/o failure: device went away"));
        assert_eq!(output.matches("pick: ").count(), 2);
    }

    #[test]
    fn prompt_gives_up_after_repeated_failures() {
        let reader = ScriptedReader {
            lines: (0..MAX_READ_FAILURES).map(|_| broken_read()).collect(),
        };
        let mut shell = Shell::new(reader, WriterDisplay::new(Vec::new()));

        assert_eq!(shell.prompt("pick: ").unwrap(), None);
    }
}
