//! Main menu flow: create, open, save and quit.

use super::command::{parse_confirmation, MenuChoice};
use super::render::{map_listing, save_summary, GREETING, MENU};
use super::{Shell, ShellExit};
use crate::app::AppContext;
use crate::error::NoteMapResult;
use crate::store::CatalogStore;
use crate::term::{Display, LineReader};
use log::info;

impl<R: LineReader, D: Display> Shell<R, D> {
    /// Runs the main menu until the user quits or input is exhausted.
    pub fn run<S: CatalogStore>(
        &mut self,
        ctx: &mut AppContext,
        store: &mut S,
    ) -> NoteMapResult<ShellExit> {
        self.say(GREETING)?;

        loop {
            let Some(choice) = self.prompt(MENU)? else {
                return self.quit(ctx, store);
            };

            match MenuChoice::parse(&choice) {
                Some(MenuChoice::NewMap) => self.new_map(ctx)?,
                Some(MenuChoice::OpenMap) => self.open_map(ctx)?,
                Some(MenuChoice::Quit) => return self.quit(ctx, store),
                Some(MenuChoice::Save) => self.save(ctx, store)?,
                None => self.say("\n\tInput not recognized as valid option\n")?,
            }
        }
    }

    fn new_map(&mut self, ctx: &mut AppContext) -> NoteMapResult<()> {
        self.clear(&ctx.settings)?;
        let Some(name) = self.prompt(" Creating new NoteMap\n Enter Name: ")? else {
            return Ok(());
        };
        let Some(description) = self.prompt("\n Enter Description: ")? else {
            return Ok(());
        };

        if let Err(err) = ctx.catalog.create_map(name, description) {
            return self.say(&format!("\n Failed to create new NoteMap: {err}\n"));
        }
        let index = ctx.catalog.len() - 1;
        self.run_session(ctx, index)
    }

    fn open_map(&mut self, ctx: &mut AppContext) -> NoteMapResult<()> {
        let listing = match ctx.catalog.list_maps() {
            Ok(maps) => map_listing(&maps),
            Err(err) => return self.say(&format!("\n Failed to display maps: {err}\n")),
        };
        self.clear(&ctx.settings)?;
        self.say(&listing)?;

        loop {
            let Some(choice) = self.prompt(" Map index ([m] main menu): ")? else {
                return Ok(());
            };
            let choice = choice.trim();
            if choice.eq_ignore_ascii_case("m") {
                return Ok(());
            }

            match choice.parse::<usize>() {
                Ok(index) => match ctx.catalog.select_map(index).map(|_| ()) {
                    Ok(()) => return self.run_session(ctx, index),
                    Err(err) => self.say(&format!(" {err}\n"))?,
                },
                Err(_) => self.say(&format!(" input not recognized - {choice}\n"))?,
            }
        }
    }

    fn save<S: CatalogStore>(
        &mut self,
        ctx: &mut AppContext,
        store: &mut S,
    ) -> NoteMapResult<()> {
        self.say("\n Saving...\n")?;
        match ctx.save(store) {
            Ok(report) => self.say(&save_summary(&report)),
            Err(err) => self.say(&format!(" Save failed: {err}\n")),
        }
    }

    fn quit<S: CatalogStore>(
        &mut self,
        ctx: &mut AppContext,
        store: &mut S,
    ) -> NoteMapResult<ShellExit> {
        self.say("\n\tQuitting...\n")?;

        loop {
            let Some(answer) = self.prompt(" Save all changes? [y/n]: ")? else {
                return Ok(self.leave_unsaved(ctx));
            };

            match parse_confirmation(&answer) {
                Some(true) => {
                    self.say(" Saving...\n")?;
                    return match ctx.save(store) {
                        Ok(report) => {
                            self.say(&save_summary(&report))?;
                            Ok(ShellExit::Saved(report))
                        }
                        Err(err) => {
                            self.say(&format!(" Save failed: {err}\n"))?;
                            Ok(self.leave_unsaved(ctx))
                        }
                    };
                }
                Some(false) => return Ok(self.leave_unsaved(ctx)),
                None => self.say(&format!(
                    "\n input not a valid option - {answer}\n \
                     enter 'Y/y' to save or 'N/n' to exit without saving changes\n\n"
                ))?,
            }
        }
    }

    fn leave_unsaved(&self, ctx: &AppContext) -> ShellExit {
        let pending = ctx.edits.len();
        info!("event=quit module=shell status=unsaved pending={pending}");
        ShellExit::Unsaved { pending }
    }
}
