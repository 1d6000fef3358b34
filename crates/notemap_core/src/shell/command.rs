//! Parsing of menu and session input lines.

use once_cell::sync::Lazy;
use regex::Regex;

static INDEX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)$").expect("valid index regex"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i:l|link)\s+(\d+)$").expect("valid link regex"));

/// Main menu options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    NewMap,
    OpenMap,
    Quit,
    Save,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::NewMap),
            "2" => Some(Self::OpenMap),
            "3" => Some(Self::Quit),
            "4" => Some(Self::Save),
            _ => None,
        }
    }
}

/// Commands accepted while a map is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Open relation at this position.
    Enter(usize),
    Back,
    Menu,
    Edit,
    New,
    /// Relate the current note to this history position.
    Link(usize),
    Discard,
    Help,
}

impl SessionCommand {
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Some(captures) = INDEX_RE.captures(input) {
            return captures[1].parse().ok().map(Self::Enter);
        }
        if let Some(captures) = LINK_RE.captures(input) {
            return captures[1].parse().ok().map(Self::Link);
        }

        match input.to_ascii_lowercase().as_str() {
            "b" | "back" => Some(Self::Back),
            "m" | "menu" => Some(Self::Menu),
            "e" | "edit" => Some(Self::Edit),
            "n" | "new" => Some(Self::New),
            "d" | "discard" => Some(Self::Discard),
            "h" | "help" | "?" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Parses a yes/no answer, case-insensitively.
pub fn parse_confirmation(input: &str) -> Option<bool> {
    match input.trim().to_ascii_uppercase().as_str() {
        "Y" | "YES" => Some(true),
        "N" | "NO" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_confirmation, MenuChoice, SessionCommand};

    #[test]
    fn session_commands_parse_indexes_and_words() {
        assert_eq!(SessionCommand::parse(" 12 "), Some(SessionCommand::Enter(12)));
        assert_eq!(SessionCommand::parse("BACK"), Some(SessionCommand::Back));
        assert_eq!(SessionCommand::parse("link 0"), Some(SessionCommand::Link(0)));
        assert_eq!(SessionCommand::parse("L 2"), Some(SessionCommand::Link(2)));
        assert_eq!(SessionCommand::parse("-1"), None);
        assert_eq!(SessionCommand::parse("link"), None);
        assert_eq!(SessionCommand::parse("99999999999999999999999"), None);
    }

    #[test]
    fn menu_and_confirmation_parse() {
        assert_eq!(MenuChoice::parse("2\n"), Some(MenuChoice::OpenMap));
        assert_eq!(MenuChoice::parse("5"), None);
        assert_eq!(parse_confirmation("y"), Some(true));
        assert_eq!(parse_confirmation("N"), Some(false));
        assert_eq!(parse_confirmation("maybe"), None);
    }
}
