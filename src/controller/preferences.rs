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

//! The preferences view.
//!
//! Lists every option with its current value. Flags toggle in place; other
//! options open a line editor. Accepted changes are saved immediately.

use crossterm::event::{Event, KeyEvent};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::{
    config::PrefOption,
    controller::{Flow, MainViewController, ViewState},
    keys::{Action, Context},
    model::cursor::NavigationCursor,
};

#[derive(Debug, Default)]
pub(crate) struct PreferencesView {
    cursor: NavigationCursor,
    editing: Option<Input>,
}

impl PreferencesView {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn selected(&self) -> PrefOption {
        PrefOption::ALL[self.cursor.index()]
    }

    pub(crate) fn index(&self) -> usize {
        self.cursor.index()
    }

    /// The value being typed, if an option is open for editing.
    pub(crate) fn editing(&self) -> Option<&Input> {
        self.editing.as_ref()
    }
}

impl MainViewController {
    pub(super) fn handle_preferences_key(&mut self, key: KeyEvent) -> Flow {
        if self.preferences.editing.is_some() {
            self.handle_preference_input(key);
            return Flow::Continue;
        }

        let Some(action) = self.keys.resolve(Context::Main, &key) else {
            return Flow::Continue;
        };

        let len = PrefOption::ALL.len();

        match action {
            Action::Quit => return Flow::Exit,
            Action::Redraw => return Flow::Redraw,
            Action::LineUp => self.preferences.cursor.up(len),
            Action::LineDown => self.preferences.cursor.down(len),
            Action::PageUp | Action::GotoTop => self.preferences.cursor.home(len),
            Action::PageDown | Action::GotoBottom => self.preferences.cursor.end(len),
            Action::Activate | Action::ToggleSelect => self.activate_preference(),
            Action::Back | Action::FilesView => self.state = ViewState::Browsing,
            Action::CommandLine => self.commander.open(),
            _ => {}
        }

        Flow::Continue
    }

    fn activate_preference(&mut self) {
        let option = self.preferences.selected();

        if option.is_flag() {
            let toggled = (!self.prefs.is_enabled(option)).to_string();
            self.apply_preference_value(option, &toggled);
        } else {
            self.preferences.editing = Some(Input::new(self.prefs.get(option)));
        }
    }

    fn handle_preference_input(&mut self, key: KeyEvent) {
        match self.keys.resolve(Context::TextField, &key) {
            Some(Action::SubmitField | Action::SaveTags) => {
                let option = self.preferences.selected();
                let value = self
                    .preferences
                    .editing
                    .as_ref()
                    .map(|input| input.value().to_string())
                    .unwrap_or_default();

                if self.apply_preference_value(option, &value) {
                    self.preferences.editing = None;
                }
            }
            Some(Action::CancelSavingTags) => self.preferences.editing = None,
            _ => {
                if let Some(input) = self.preferences.editing.as_mut() {
                    input.handle_event(&Event::Key(key));
                }
            }
        }
    }

    /// Validates, stores and saves one option. Returns false if the value
    /// was rejected.
    fn apply_preference_value(&mut self, option: PrefOption, value: &str) -> bool {
        if let Err(e) = self.prefs.set(option, value) {
            self.error(&e);
            return false;
        }

        if self.save_prefs() {
            self.info(format!("{} = {}", option.name(), self.prefs.get(option)));
        }
        self.apply_preference(option);
        true
    }
}
