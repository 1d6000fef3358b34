//! Text layout for menu and session screens.

use crate::app::SaveReport;
use crate::model::note_map::NoteMap;
use crate::navigation::NoteView;
use chrono::{DateTime, Utc};
use std::fmt::Write;

pub const GREETING: &str = "
 ****************************************
 ************* NoteMap v1.0 *************
 ****************************************
";

pub const MENU: &str = "
 Main Menu

 Select an Option
 [1] New Map
 [2] Open Map
 [3] Quit
 [4] Save Changes

 |--> ";

pub const SESSION_HELP: &str = " Commands:
   <number>   open the relation at that index
   b          back to the previous note
   m          return to the main menu (edits stay pending)
   e          edit subject and content of this note
   n          add a new note related to this one
   l <depth>  relate this note to an entry of the path
   d          discard the pending edit of this note
   h          show this help";

const UNTITLED: &str = "(untitled)";

/// Formats epoch milliseconds for listings.
pub fn format_timestamp(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}

/// Outcome line printed after a save.
pub fn save_summary(report: &SaveReport) -> String {
    let mut out = format!(
        " Saved {} map(s); {} staged edit(s) applied.\n",
        report.maps_saved, report.committed
    );
    if !report.durable {
        out.push_str(" Storage is in memory only; nothing was written to disk.\n");
    }
    out
}

/// Lists maps with their selection index.
pub fn map_listing(maps: &[(usize, &NoteMap)]) -> String {
    let mut out = String::from("\n Select a NoteMap to open\n\n");
    for (index, map) in maps {
        let _ = write!(
            out,
            "\t[{index}] {}\tLast Updated: {}\tCreated: {}\n\t{}\n\n",
            map.name(),
            format_timestamp(map.updated_at()),
            format_timestamp(map.created_at()),
            map.description()
        );
    }
    out
}

/// Full session screen for the current note, ending with the input prompt.
pub fn note_screen(map: &NoteMap, view: &NoteView, notice: Option<&str>) -> String {
    let mut out = String::new();
    let _ = write!(out, "\n\n{}\n{}\n\n", map.name(), map.description());

    let path = view
        .breadcrumb
        .iter()
        .enumerate()
        .map(|(depth, subject)| format!("[{depth}] {}", label(subject)))
        .collect::<Vec<_>>()
        .join(" > ");
    let _ = writeln!(out, " Path: {path}\n");

    let _ = write!(out, " == {} ==", label(&view.subject));
    if view.has_pending_edit {
        out.push_str("  (unsaved edit pending)");
    }
    out.push('\n');
    for line in &view.lines {
        let _ = writeln!(out, "   {line}");
    }

    out.push_str("\n Relations:\n");
    if view.relations.is_empty() {
        out.push_str("\t(none)\n");
    }
    for row in view.relation_rows() {
        for entry in row {
            let _ = write!(out, "\t[{}] {}", entry.index, label(&entry.subject));
        }
        out.push('\n');
    }

    if let Some(notice) = notice {
        let _ = write!(out, "\n{notice}\n");
    }

    out.push_str("\n input command ([h] for help)\n |--> ");
    out
}

fn label(subject: &str) -> &str {
    if subject.trim().is_empty() {
        UNTITLED
    } else {
        subject
    }
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, note_screen, save_summary};
    use crate::app::SaveReport;
    use crate::edit_cache::EditCache;
    use crate::model::note_map::NoteMap;
    use crate::navigation::Navigator;

    #[test]
    fn timestamps_render_in_utc() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00 UTC");
    }

    #[test]
    fn screen_lists_relations_in_rows_of_three() {
        let mut map = NoteMap::try_new("Trip", "Planning").unwrap();
        for subject in ["Flights", "Hotels", "Cars", "Food"] {
            map.create_linked_note(map.root_id(), subject).unwrap();
        }
        let view = Navigator::open(&map)
            .view(&map, &EditCache::new(), 40)
            .unwrap();

        let screen = note_screen(&map, &view, None);
        assert!(screen.contains("\t[0] Flights\t[1] Hotels\t[2] Cars\n\t[3] Food\n"));
        assert!(screen.contains("Path: [0] (untitled)"));
    }

    #[test]
    fn save_summary_warns_when_nothing_reaches_disk() {
        let mut report = SaveReport {
            committed: 1,
            maps_saved: 2,
            durable: true,
        };
        assert_eq!(
            save_summary(&report),
            " Saved 2 map(s); 1 staged edit(s) applied.\n"
        );

        report.durable = false;
        assert!(save_summary(&report).contains("nothing was written to disk"));
    }
}
