//! Open-map session loop.

use super::command::SessionCommand;
use super::render::{note_screen, SESSION_HELP};
use super::Shell;
use crate::app::AppContext;
use crate::error::NoteMapResult;
use crate::model::note::CONTENT_WRAP_WIDTH;
use crate::navigation::{BackOutcome, NoteEdit, Navigator};
use crate::term::{Display, LineReader};
use log::info;

enum Flow {
    Stay(Option<String>),
    Leave,
}

impl<R: LineReader, D: Display> Shell<R, D> {
    /// Navigates the map at `map_index` until the user returns to the menu.
    pub(super) fn run_session(
        &mut self,
        ctx: &mut AppContext,
        map_index: usize,
    ) -> NoteMapResult<()> {
        let mut nav = Navigator::open(ctx.catalog.select_map(map_index)?);
        info!(
            "event=session_open module=shell status=ok map_id={}",
            nav.map_id()
        );
        let mut notice: Option<String> = None;

        loop {
            self.clear(&ctx.settings)?;
            let screen = {
                let map = ctx.catalog.select_map(map_index)?;
                let view = nav.view(map, &ctx.edits, CONTENT_WRAP_WIDTH)?;
                note_screen(map, &view, notice.take().as_deref())
            };

            let Some(line) = self.prompt(&screen)? else {
                break;
            };
            let Some(command) = SessionCommand::parse(&line) else {
                notice = Some(format!(" input not recognized - {}", line.trim()));
                continue;
            };

            match self.apply(ctx, map_index, &mut nav, command)? {
                Flow::Stay(message) => notice = message,
                Flow::Leave => break,
            }
        }

        info!(
            "event=session_close module=shell status=ok map_id={} pending_edits={}",
            nav.map_id(),
            ctx.edits.len()
        );
        Ok(())
    }

    fn apply(
        &mut self,
        ctx: &mut AppContext,
        map_index: usize,
        nav: &mut Navigator,
        command: SessionCommand,
    ) -> NoteMapResult<Flow> {
        let flow = match command {
            SessionCommand::Enter(index) => {
                let map = ctx.catalog.select_map(map_index)?;
                match nav.enter(map, index) {
                    Ok(_) => Flow::Stay(None),
                    Err(err) => Flow::Stay(Some(format!(" {err}"))),
                }
            }
            SessionCommand::Back => match nav.back() {
                BackOutcome::Moved(_) => Flow::Stay(None),
                BackOutcome::AtRoot => {
                    Flow::Stay(Some(" Already at the root note.".to_string()))
                }
            },
            SessionCommand::Menu => Flow::Leave,
            SessionCommand::Edit => return self.edit_current(ctx, map_index, nav),
            SessionCommand::New => {
                let Some(subject) = self.prompt("\n New note subject: ")? else {
                    return Ok(Flow::Leave);
                };
                let map = ctx.catalog.select_map_mut(map_index)?;
                match map.create_linked_note(nav.current(), subject.trim()) {
                    Ok(_) => Flow::Stay(Some(" Note added.".to_string())),
                    Err(err) => Flow::Stay(Some(format!(" {err}"))),
                }
            }
            SessionCommand::Link(depth) => {
                let map = ctx.catalog.select_map_mut(map_index)?;
                match nav.link_to_history(map, depth) {
                    Ok(_) => Flow::Stay(Some(format!(" Linked to path entry [{depth}]."))),
                    Err(err) => Flow::Stay(Some(format!(" {err}"))),
                }
            }
            SessionCommand::Discard => match ctx.edits.discard(nav.current()) {
                Some(_) => Flow::Stay(Some(" Pending edit discarded.".to_string())),
                None => Flow::Stay(Some(" No pending edit for this note.".to_string())),
            },
            SessionCommand::Help => Flow::Stay(Some(SESSION_HELP.to_string())),
        };
        Ok(flow)
    }

    fn edit_current(
        &mut self,
        ctx: &mut AppContext,
        map_index: usize,
        nav: &Navigator,
    ) -> NoteMapResult<Flow> {
        let Some(subject) = self.prompt("\n New subject (blank keeps current): ")? else {
            return Ok(Flow::Leave);
        };
        let Some(content) = self.prompt(" New content (blank keeps current): ")? else {
            return Ok(Flow::Leave);
        };

        let edit = NoteEdit {
            subject: non_blank(subject),
            content: non_blank(content),
        };
        if edit.is_empty() {
            return Ok(Flow::Stay(Some(" Nothing changed.".to_string())));
        }

        let map = ctx.catalog.select_map(map_index)?;
        nav.stage_edit(map, &mut ctx.edits, edit)?;
        Ok(Flow::Stay(Some(
            " Edit staged; save from the main menu to keep it.".to_string(),
        )))
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
