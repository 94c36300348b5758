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

//! The main view controller.
//!
//! [`MainViewController`] owns all interaction state: the file list, the
//! search, the selection, the cursor and whichever form is open. Key events
//! are resolved to actions through the [`KeyBindingRegistry`] for the
//! active context and dispatched to the handler for the current
//! [`ViewState`]. Nothing else mutates this state.
//!
//! # Organization
//!
//! * [`browser`]: File list and search box handling.
//! * [`editor`]: Single and batch tag edit forms.
//! * [`preferences`]: The preferences view.

pub(crate) mod browser;
pub(crate) mod editor;
pub(crate) mod preferences;

use std::{path::PathBuf, rc::Rc};

use crossterm::event::{KeyEvent, KeyEventKind};
use tui_input::Input;

use crate::{
    commander::{Command, Commander},
    config::{PrefOption, PreferencesStore},
    controller::{
        editor::{EditForm, FieldKind},
        preferences::PreferencesView,
    },
    error::AppError,
    keys::{Action, Context, KeyBindingRegistry},
    model::{
        FileEntry, cursor::NavigationCursor, library::Library, search::SearchMode,
        search::SearchState, selection::SelectionModel,
    },
    tags::TagStore,
    util::format::PreviewFormat,
};

/// Lines of overlap kept when paging through the file list.
const PAGE_OVERLAP: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ViewState {
    Browsing,
    Searching,
    EditingSingle,
    EditingBatch,
    PreferencesEdit,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    /// Clear the terminal and draw everything again.
    Redraw,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Info,
    Error,
}

/// A one-line message shown until the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Status {
    pub(crate) kind: StatusKind,
    pub(crate) text: String,
}

fn search_mode(prefs: &PreferencesStore) -> SearchMode {
    if prefs.is_enabled(PrefOption::UseRegexInSearch) {
        SearchMode::Regex
    } else {
        SearchMode::Literal
    }
}

pub(crate) struct MainViewController {
    state: ViewState,
    store: Rc<dyn TagStore>,
    prefs: PreferencesStore,
    keys: KeyBindingRegistry,
    library: Library,
    search: SearchState,
    search_input: Input,
    selection: SelectionModel,
    cursor: NavigationCursor,
    format: PreviewFormat,
    smooth_scroll: bool,
    viewport: usize,
    editor: Option<EditForm>,
    last_field: Option<FieldKind>,
    preferences: PreferencesView,
    commander: Commander,
    status: Option<Status>,
}

impl MainViewController {
    /// Creates the controller from its collaborators.
    ///
    /// Key binding overrides from the configuration are applied here; any
    /// that are skipped are reported on the status line.
    pub(crate) fn new(store: Rc<dyn TagStore>, prefs: PreferencesStore, library: Library) -> Self {
        let mut keys = KeyBindingRegistry::new();
        let warnings = keys.load_overrides(prefs.keybindings());

        let mut controller = Self {
            state: ViewState::Browsing,
            store,
            keys,
            library,
            search: SearchState::new(search_mode(&prefs)),
            search_input: Input::default(),
            selection: SelectionModel::new(),
            cursor: NavigationCursor::new(),
            format: PreviewFormat::compile(prefs.preview_format()),
            smooth_scroll: prefs.is_enabled(PrefOption::SmoothScroll),
            viewport: 20,
            editor: None,
            last_field: None,
            preferences: PreferencesView::new(),
            commander: Commander::new(),
            status: None,
            prefs,
        };

        if let Some(first) = warnings.first() {
            controller.error_text(format!("Ignored key binding {first}"));
        }

        controller
    }

    /// Processes one key press to completion.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }

        self.status = None;

        if self.commander.active() {
            return self.handle_command_key(key);
        }

        match self.state {
            ViewState::Browsing => self.handle_browsing_key(key),
            ViewState::Searching => self.handle_search_key(key),
            ViewState::EditingSingle | ViewState::EditingBatch => self.handle_editor_key(key),
            ViewState::PreferencesEdit => self.handle_preferences_key(key),
        }
    }

    pub(crate) fn state(&self) -> ViewState {
        self.state
    }

    pub(crate) fn library(&self) -> &Library {
        &self.library
    }

    pub(crate) fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub(crate) fn search(&self) -> &SearchState {
        &self.search
    }

    pub(crate) fn search_input(&self) -> &Input {
        &self.search_input
    }

    pub(crate) fn editor(&self) -> Option<&EditForm> {
        self.editor.as_ref()
    }

    pub(crate) fn preferences_view(&self) -> &PreferencesView {
        &self.preferences
    }

    pub(crate) fn prefs(&self) -> &PreferencesStore {
        &self.prefs
    }

    pub(crate) fn commander(&self) -> &Commander {
        &self.commander
    }

    pub(crate) fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// The key bindings, for the help line.
    pub(crate) fn keys(&self) -> &KeyBindingRegistry {
        &self.keys
    }

    /// Full-list indices of the entries currently on screen.
    pub(crate) fn visible(&self) -> Vec<usize> {
        if self.search.is_active() {
            self.search.matched().to_vec()
        } else {
            (0..self.library.len()).collect()
        }
    }

    /// Position of the cursor within the visible entries.
    pub(crate) fn cursor_index(&self) -> usize {
        self.cursor.index()
    }

    pub(crate) fn current_entry(&self) -> Option<&FileEntry> {
        self.cursor
            .current(&self.visible())
            .and_then(|i| self.library.entry(i))
    }

    fn current_path(&self) -> Option<PathBuf> {
        self.current_entry().map(|entry| entry.path.clone())
    }

    /// Updates the file list viewport height and returns its first row.
    pub(crate) fn scroll_offset(&mut self, height: usize) -> usize {
        self.viewport = height.max(1);
        let len = self.visible().len();
        self.cursor.scroll(len, self.viewport, self.smooth_scroll)
    }

    fn page(&self) -> usize {
        self.viewport.saturating_sub(PAGE_OVERLAP).max(1)
    }

    /// The tag preview for the entry under the cursor.
    pub(crate) fn preview_line(&self) -> String {
        let Some(entry) = self.current_entry() else {
            return if self.search.is_active() {
                String::new()
            } else {
                "No files found in directory".to_string()
            };
        };

        if let Some(reason) = self.library.read_error(&entry.path) {
            return format!("! {reason}");
        }

        self.library
            .record(&entry.path)
            .map(|record| self.format.render(record))
            .unwrap_or_default()
    }

    fn info(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            kind: StatusKind::Info,
            text: text.into(),
        });
    }

    fn error(&mut self, error: &AppError) {
        tracing::debug!(%error, "reporting error on status line");
        self.error_text(error.to_string());
    }

    fn error_text(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            kind: StatusKind::Error,
            text: text.into(),
        });
    }

    /// Keeps the cursor on `path` if it is still visible.
    fn retarget(&mut self, path: Option<PathBuf>) {
        let entry = path.and_then(|path| self.library.position(&path));
        let visible = self.visible();
        self.cursor.retarget(entry, &visible);
    }

    /// Rescans the music directory.
    ///
    /// Selected files that disappeared are dropped from the selection, an
    /// active search is re-run and the cursor stays on the same file if it
    /// still exists.
    fn reload(&mut self) {
        let current = self.current_path();
        let root = self.prefs.music_dir();

        let library = match Library::load(&root, self.store.as_ref()) {
            Ok(library) => library,
            Err(e) => {
                tracing::error!(root = %root.display(), error = %e, "reload failed");
                self.error(&e);
                return;
            }
        };

        self.library = library;
        let library = &self.library;
        self.selection.retain(|path| library.position(path).is_some());

        if self.refresh_search() {
            self.info(format!("Loaded {} files", self.library.len()));
        }

        self.retarget(current);
    }

    /// Re-runs an active search over the current entries. A search that no
    /// longer compiles is cancelled and reported. Returns false in that case.
    fn refresh_search(&mut self) -> bool {
        match self.search.refresh(self.library.entries()) {
            Ok(()) => true,
            Err(e) => {
                self.search_input.reset();
                if self.state == ViewState::Searching {
                    self.state = ViewState::Browsing;
                }
                self.error(&e);
                false
            }
        }
    }

    /// Re-reads the configuration file and re-derives everything from it.
    /// The music directory is rescanned only if it changed.
    fn reload_prefs(&mut self) {
        let music_dir = self.prefs.music_dir();

        if let Err(e) = self.prefs.reload() {
            tracing::error!(error = %e, "failed to reload configuration");
            self.error(&e);
            return;
        }

        let mut keys = KeyBindingRegistry::new();
        let warnings = keys.load_overrides(self.prefs.keybindings());
        self.keys = keys;

        for option in [
            PrefOption::PreviewFormat,
            PrefOption::SmoothScroll,
            PrefOption::UseRegexInSearch,
        ] {
            self.apply_preference(option);
        }
        if self.prefs.music_dir() != music_dir {
            self.reload();
        }

        match warnings.first() {
            Some(first) => self.error_text(format!("Ignored key binding {first}")),
            None if self.status.is_none() => {
                self.info(format!("Reloaded {}", self.prefs.path().display()))
            }
            None => {}
        }
    }

    /// Re-derives whatever depends on `option` after it changed.
    fn apply_preference(&mut self, option: PrefOption) {
        match option {
            PrefOption::PreviewFormat => {
                if self.format.source() != self.prefs.preview_format() {
                    self.format = PreviewFormat::compile(self.prefs.preview_format());
                }
            }
            PrefOption::SmoothScroll => {
                self.smooth_scroll = self.prefs.is_enabled(PrefOption::SmoothScroll);
            }
            PrefOption::UseRegexInSearch => {
                let current = self.current_path();
                self.search.set_mode(search_mode(&self.prefs));
                self.refresh_search();
                self.retarget(current);
            }
            PrefOption::MusicDir => self.reload(),
            // Read when the next edit form opens.
            PrefOption::VimMode => {}
        }
    }

    fn save_prefs(&mut self) -> bool {
        match self.prefs.save() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "failed to save configuration");
                self.error(&e);
                false
            }
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) -> Flow {
        match self.keys.resolve(Context::TextField, &key) {
            Some(Action::SubmitField) => match self.commander.submit() {
                Ok(command) => self.run_command(command),
                Err(e) => {
                    self.error(&e);
                    Flow::Continue
                }
            },
            Some(Action::CancelSavingTags) => {
                self.commander.close();
                Flow::Continue
            }
            _ => {
                self.commander.handle_key(key);
                Flow::Continue
            }
        }
    }

    /// Carries out a `:` command.
    pub(crate) fn run_command(&mut self, command: Command) -> Flow {
        match command {
            Command::Quit => return Flow::Exit,

            Command::Reload => self.reload_prefs(),

            Command::Set { option, value } => match self.prefs.set_by_name(&option, &value) {
                Ok(option) => {
                    if self.save_prefs() {
                        self.info(format!("{} = {}", option.name(), self.prefs.get(option)));
                    }
                    self.apply_preference(option);
                }
                Err(e) => self.error(&e),
            },

            Command::Bind { action, chord } => match self.keys.bind_str(&action, &chord) {
                Ok(action) => {
                    let chord = self.keys.chord_for(action).to_string();
                    self.prefs.set_binding(action.name(), &chord);
                    if self.save_prefs() {
                        self.info(format!("Bound {} to {chord}", action.name()));
                    }
                }
                Err(e) => self.error(&e),
            },
        }

        Flow::Continue
    }
}
