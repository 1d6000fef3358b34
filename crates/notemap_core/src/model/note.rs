//! Note domain model.
//!
//! # Responsibility
//! - Define the note record: subject, content and ordered relations.
//! - Render content into fixed-width display lines.
//!
//! # Invariants
//! - `relations` keeps insertion order; duplicates and self-loops are legal.
//! - Rendering is pure and never mutates the note.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a note inside its owning map.
pub type NoteId = Uuid;

/// Column width used when the shell renders note content.
pub const CONTENT_WRAP_WIDTH: usize = 64;

/// One content node of a note map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Short display label. Not unique within a map.
    pub subject: String,
    /// Free-text body.
    pub content: String,
    /// Outgoing, non-owning links to notes of the same map.
    pub relations: Vec<NoteId>,
}

impl Note {
    /// Creates an empty note with no subject, content or relations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a note with the given subject and empty body.
    pub fn with_subject(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }

    /// Appends a relation to `to`. No duplicate or self-loop checks.
    pub fn add_relation(&mut self, to: NoteId) {
        self.relations.push(to);
    }

    /// Wraps `content` into lines of at most `width` characters.
    ///
    /// Words are packed greedily; a word longer than `width` is split.
    /// Explicit line breaks in the content are kept. Empty content yields no
    /// lines. A `width` of zero behaves like one.
    pub fn render(&self, width: usize) -> Vec<String> {
        if self.content.is_empty() {
            return Vec::new();
        }

        let width = width.max(1);
        let mut lines = Vec::new();
        for paragraph in self.content.lines() {
            wrap_paragraph(paragraph, width, &mut lines);
        }
        lines
    }
}

fn wrap_paragraph(paragraph: &str, width: usize, out: &mut Vec<String>) {
    let mut line = String::new();
    let mut line_len = 0usize;

    for word in paragraph.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();

        while chars.len() > width {
            if line_len > 0 {
                out.push(std::mem::take(&mut line));
                line_len = 0;
            }
            let rest = chars.split_off(width);
            out.push(chars.into_iter().collect());
            chars = rest;
        }

        let word_len = chars.len();
        if word_len == 0 {
            continue;
        }
        let needed = if line_len == 0 {
            word_len
        } else {
            line_len + 1 + word_len
        };
        if needed > width {
            out.push(std::mem::take(&mut line));
            line_len = 0;
        }
        if line_len > 0 {
            line.push(' ');
            line_len += 1;
        }
        line.extend(chars);
        line_len += word_len;
    }

    // Blank paragraphs still occupy one display line.
    if line_len > 0 || paragraph.trim().is_empty() {
        out.push(line);
    }
}
