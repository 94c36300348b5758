// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! File list and search box key handling.

use std::path::{Path, PathBuf};

use crossterm::event::{Event, KeyEvent};
use tui_input::backend::crossterm::EventHandler;

use crate::{
    controller::{Flow, MainViewController, ViewState},
    keys::{Action, Context},
};

impl MainViewController {
    pub(super) fn handle_browsing_key(&mut self, key: KeyEvent) -> Flow {
        match self.keys.resolve(Context::Main, &key) {
            Some(action) => self.dispatch_browsing(action),
            None => Flow::Continue,
        }
    }

    fn dispatch_browsing(&mut self, action: Action) -> Flow {
        let len = self.visible().len();
        let page = self.page();

        match action {
            Action::Quit => return Flow::Exit,
            Action::Redraw => return Flow::Redraw,

            Action::LineUp => self.cursor.up(len),
            Action::LineDown => self.cursor.down(len),
            Action::PageUp => self.cursor.page_up(len, page),
            Action::PageDown => self.cursor.page_down(len, page),
            Action::GotoTop => self.cursor.home(len),
            Action::GotoBottom => self.cursor.end(len),

            Action::Search => self.start_search(),
            Action::Activate => self.activate(),
            Action::ToggleSelect => {
                if let Some(path) = self.current_path() {
                    self.selection.toggle(&path);
                }
            }
            Action::InvertSelection => {
                let visible = self.visible();
                let entries = self.library.entries();
                self.selection
                    .invert(visible.iter().map(|&i| entries[i].path.as_path()));
            }
            Action::SelectVisible => {
                let visible = self.visible();
                for &i in &visible {
                    self.selection.add(&self.library.entries()[i].path);
                }
                self.info(format!("{} files selected", self.selection.len()));
            }
            Action::Back => self.escape(),
            Action::Reload => self.reload(),
            Action::Preferences => self.state = ViewState::PreferencesEdit,
            Action::CommandLine => self.commander.open(),
            Action::FilesView => {}

            Action::ConfirmSearch
            | Action::CancelSearch
            | Action::SaveTags
            | Action::CancelSavingTags
            | Action::NextField
            | Action::PrevField
            | Action::SubmitField
            | Action::CompleteGenre
            | Action::DropdownNext
            | Action::DropdownPrev
            | Action::DropdownAccept
            | Action::DropdownCancel => {}
        }

        Flow::Continue
    }

    /// Escape clears an active search first. Only when no search is active
    /// does it clear the selection.
    fn escape(&mut self) {
        if self.search.is_active() {
            let current = self.current_path();
            self.search.cancel();
            self.search_input.reset();
            self.retarget(current);
        } else if !self.selection.is_empty() {
            self.selection.clear();
        }
    }

    fn start_search(&mut self) {
        let current = self.current_path();
        self.search.start(self.library.entries());
        self.search_input.reset();
        self.state = ViewState::Searching;
        self.retarget(current);
    }

    /// Opens the edit form for the cursor entry, or for the selection plus
    /// the cursor entry when files are selected.
    fn activate(&mut self) {
        let Some(current) = self.current_path() else {
            return;
        };

        if self.selection.is_empty() {
            self.open_single(current);
        } else {
            let mut paths: Vec<PathBuf> = self.selection.paths().map(Path::to_path_buf).collect();
            if !self.selection.contains(&current) {
                paths.push(current);
            }
            paths.sort_by_key(|path| self.library.position(path));
            self.open_batch(paths);
        }
    }

    pub(super) fn handle_search_key(&mut self, key: KeyEvent) -> Flow {
        match self.keys.resolve(Context::Search, &key) {
            Some(Action::ConfirmSearch) => {
                let current = self.current_path();
                self.search.confirm();
                if !self.search.is_active() {
                    self.search_input.reset();
                }
                self.state = ViewState::Browsing;
                self.retarget(current);
            }
            Some(Action::CancelSearch) => {
                let current = self.current_path();
                self.search.cancel();
                self.search_input.reset();
                self.state = ViewState::Browsing;
                self.retarget(current);
            }
            _ => {
                let changed = self.search_input.handle_event(&Event::Key(key)).is_some();
                if changed {
                    self.update_search();
                }
            }
        }

        Flow::Continue
    }

    fn update_search(&mut self) {
        let current = self.current_path();
        let query = self.search_input.value().to_string();

        if let Err(e) = self.search.update(&query, self.library.entries()) {
            self.error(&e);
        }

        self.retarget(current);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use crate::{
        controller::{StatusKind, ViewState, tests::Fixture},
        model::search::SearchMode,
    };

    const NAMES: [&str; 6] = ["apple", "apricot", "banana", "blueberry", "cherry", "grape"];

    #[test]
    fn movement_clamps_and_ignores_empty_list() {
        let mut fx = Fixture::new(&NAMES);

        fx.press(KeyCode::Up);
        assert_eq!(fx.controller.cursor_index(), 0);
        fx.press(KeyCode::End);
        fx.press(KeyCode::Char('j'));
        assert_eq!(fx.controller.cursor_index(), 5);

        let mut empty = Fixture::new(&[]);
        empty.press(KeyCode::Char('j'));
        empty.press(KeyCode::End);
        empty.press(KeyCode::Enter);
        assert_eq!(empty.controller.state(), ViewState::Browsing);
    }

    #[test]
    fn search_filters_visible_list() {
        let mut fx = Fixture::new(&NAMES);

        fx.press(KeyCode::Char('/'));
        assert_eq!(fx.controller.state(), ViewState::Searching);
        fx.type_text("ap");

        assert_eq!(fx.visible_names(), vec!["apple", "apricot", "grape"]);

        fx.press(KeyCode::Enter);
        assert_eq!(fx.controller.state(), ViewState::Browsing);
        assert!(fx.controller.search().is_active());
        assert_eq!(fx.visible_names().len(), 3);
    }

    #[test]
    fn cursor_follows_entry_when_search_narrows() {
        let mut fx = Fixture::new(&NAMES);
        fx.press(KeyCode::End);

        fx.press(KeyCode::Char('/'));
        fx.type_text("ap");
        assert_eq!(fx.controller.current_entry().unwrap().display_name, "grape");

        fx.type_text("p");
        assert_eq!(fx.visible_names(), vec!["apple"]);
        assert_eq!(fx.controller.cursor_index(), 0);
    }

    #[test]
    fn escape_clears_search_before_selection() {
        let mut fx = Fixture::new(&NAMES);

        fx.press(KeyCode::Char('j'));
        fx.press(KeyCode::Char('j'));
        fx.press(KeyCode::Char(' '));
        fx.press(KeyCode::Char('j'));
        fx.press(KeyCode::Char(' '));
        assert!(fx.is_selected("banana"));
        assert!(fx.is_selected("blueberry"));

        fx.press(KeyCode::Char('/'));
        fx.type_text("ap");
        fx.press(KeyCode::Enter);
        assert_eq!(fx.visible_names().len(), 3);

        fx.press(KeyCode::Esc);
        assert!(!fx.controller.search().is_active());
        assert_eq!(fx.visible_names().len(), NAMES.len());
        assert_eq!(fx.controller.selection().len(), 2);

        fx.press(KeyCode::Esc);
        assert!(fx.controller.selection().is_empty());
    }

    #[test]
    fn escape_gates_on_search_even_with_no_results() {
        let mut fx = Fixture::new(&NAMES);
        fx.press(KeyCode::Char(' '));

        fx.press(KeyCode::Char('/'));
        fx.type_text("zzz");
        fx.press(KeyCode::Enter);
        assert!(fx.visible_names().is_empty());

        fx.press(KeyCode::Esc);
        assert!(!fx.controller.search().is_active());
        assert_eq!(fx.controller.selection().len(), 1);
    }

    #[test]
    fn search_never_changes_selection() {
        let mut fx = Fixture::new(&NAMES);
        fx.press(KeyCode::Char(' '));

        fx.press(KeyCode::Char('/'));
        fx.type_text("an");
        fx.press(KeyCode::Enter);
        assert!(fx.is_selected("apple"));
        assert_eq!(fx.controller.selection().len(), 1);

        fx.press(KeyCode::Char('/'));
        fx.press(KeyCode::Esc);
        assert_eq!(fx.controller.selection().len(), 1);
    }

    #[test]
    fn invert_is_scoped_to_visible_entries() {
        let mut fx = Fixture::new(&NAMES);

        fx.ctrl('t');
        assert_eq!(fx.controller.selection().len(), NAMES.len());

        fx.press(KeyCode::Char('/'));
        fx.type_text("b");
        fx.press(KeyCode::Enter);
        fx.ctrl('t');

        assert!(!fx.is_selected("banana"));
        assert!(!fx.is_selected("blueberry"));
        assert!(fx.is_selected("apple"));
        assert_eq!(fx.controller.selection().len(), 4);
    }

    #[test]
    fn select_visible_adds_search_results() {
        let mut fx = Fixture::new(&NAMES);

        fx.press(KeyCode::Char('/'));
        fx.type_text("berry");
        fx.press(KeyCode::Enter);
        fx.ctrl('a');

        assert!(fx.is_selected("blueberry"));
        assert_eq!(fx.controller.selection().len(), 1);
    }

    #[test]
    fn invalid_regex_reports_and_keeps_results() {
        let mut fx = Fixture::new(&NAMES);
        fx.type_text(":set use_regex_in_search=true");
        fx.press(KeyCode::Enter);
        assert_eq!(fx.controller.search().mode(), SearchMode::Regex);

        fx.press(KeyCode::Char('/'));
        fx.type_text("^b");
        assert_eq!(fx.visible_names(), vec!["banana", "blueberry"]);

        fx.type_text("(");
        assert_eq!(fx.controller.status().unwrap().kind, StatusKind::Error);
        assert_eq!(fx.visible_names(), vec!["banana", "blueberry"]);
        assert_eq!(fx.controller.state(), ViewState::Searching);
    }

    #[test]
    fn reload_keeps_cursor_and_prunes_selection() {
        let mut fx = Fixture::new(&NAMES);
        fx.press(KeyCode::Char(' '));
        fx.press(KeyCode::End);
        fx.press(KeyCode::Char(' '));

        std::fs::remove_file(fx.path("apple")).unwrap();
        fx.press(KeyCode::Char('u'));

        assert_eq!(fx.visible_names().len(), NAMES.len() - 1);
        assert_eq!(fx.controller.current_entry().unwrap().display_name, "grape");
        assert!(!fx.is_selected("apple"));
        assert!(fx.is_selected("grape"));
    }

    #[test]
    fn preferences_key_switches_view() {
        let mut fx = Fixture::new(&NAMES);

        fx.press(KeyCode::Char('2'));
        assert_eq!(fx.controller.state(), ViewState::PreferencesEdit);

        fx.press(KeyCode::Char('1'));
        assert_eq!(fx.controller.state(), ViewState::Browsing);
    }
}
