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

//! Key binding registry.
//!
//! Every user-facing command is an [`Action`]. Each action belongs to one
//! [`Context`] and is bound to exactly one [`Chord`]. The registry resolves
//! a key event in the active context to the action bound to it.
//!
//! Defaults are built in; bindings from the configuration file are merged
//! over them at startup and `:bind` changes them at runtime.

pub(crate) mod chord;

use std::collections::{BTreeMap, HashMap, HashSet};

use crossterm::event::KeyEvent;

pub(crate) use chord::{Chord, NamedKey};

use crate::error::{AppError, Result};

/// Which set of bindings is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Context {
    /// The file list and the preferences list.
    Main,
    /// The search box.
    Search,
    /// Edit form fields and single line inputs.
    TextField,
    /// The genre completion dropdown.
    GenreDropdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Action {
    Quit,
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    GotoTop,
    GotoBottom,
    Search,
    Activate,
    ToggleSelect,
    InvertSelection,
    SelectVisible,
    Back,
    Reload,
    Preferences,
    FilesView,
    CommandLine,
    Redraw,
    ConfirmSearch,
    CancelSearch,
    SaveTags,
    CancelSavingTags,
    NextField,
    PrevField,
    SubmitField,
    CompleteGenre,
    DropdownNext,
    DropdownPrev,
    DropdownAccept,
    DropdownCancel,
}

impl Action {
    pub(crate) const ALL: [Action; 30] = [
        Action::Quit,
        Action::LineUp,
        Action::LineDown,
        Action::PageUp,
        Action::PageDown,
        Action::GotoTop,
        Action::GotoBottom,
        Action::Search,
        Action::Activate,
        Action::ToggleSelect,
        Action::InvertSelection,
        Action::SelectVisible,
        Action::Back,
        Action::Reload,
        Action::Preferences,
        Action::FilesView,
        Action::CommandLine,
        Action::Redraw,
        Action::ConfirmSearch,
        Action::CancelSearch,
        Action::SaveTags,
        Action::CancelSavingTags,
        Action::NextField,
        Action::PrevField,
        Action::SubmitField,
        Action::CompleteGenre,
        Action::DropdownNext,
        Action::DropdownPrev,
        Action::DropdownAccept,
        Action::DropdownCancel,
    ];

    /// The name used in the configuration file and by `:bind`.
    pub(crate) fn name(self) -> &'static str {
        match self {
            Action::Quit => "quit",
            Action::LineUp => "line_up",
            Action::LineDown => "line_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::GotoTop => "goto_top",
            Action::GotoBottom => "goto_bottom",
            Action::Search => "search",
            Action::Activate => "activate",
            Action::ToggleSelect => "toggle_select",
            Action::InvertSelection => "invert_selection",
            Action::SelectVisible => "select_visible",
            Action::Back => "back",
            Action::Reload => "reload",
            Action::Preferences => "preferences",
            Action::FilesView => "files_view",
            Action::CommandLine => "command_line",
            Action::Redraw => "redraw",
            Action::ConfirmSearch => "confirm_search",
            Action::CancelSearch => "cancel_search",
            Action::SaveTags => "save_tags",
            Action::CancelSavingTags => "cancel_saving_tags",
            Action::NextField => "next_field",
            Action::PrevField => "prev_field",
            Action::SubmitField => "submit_field",
            Action::CompleteGenre => "complete_genre",
            Action::DropdownNext => "dropdown_next",
            Action::DropdownPrev => "dropdown_prev",
            Action::DropdownAccept => "dropdown_accept",
            Action::DropdownCancel => "dropdown_cancel",
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }

    pub(crate) fn context(self) -> Context {
        match self {
            Action::ConfirmSearch | Action::CancelSearch => Context::Search,
            Action::SaveTags
            | Action::CancelSavingTags
            | Action::NextField
            | Action::PrevField
            | Action::SubmitField
            | Action::CompleteGenre => Context::TextField,
            Action::DropdownNext
            | Action::DropdownPrev
            | Action::DropdownAccept
            | Action::DropdownCancel => Context::GenreDropdown,
            _ => Context::Main,
        }
    }

    fn default_chord(self) -> Chord {
        match self {
            Action::Quit => Chord::Char('q'),
            Action::LineUp => Chord::Char('k'),
            Action::LineDown => Chord::Char('j'),
            Action::PageUp => Chord::Named(NamedKey::PageUp),
            Action::PageDown => Chord::Named(NamedKey::PageDown),
            Action::GotoTop => Chord::Named(NamedKey::Home),
            Action::GotoBottom => Chord::Named(NamedKey::End),
            Action::Search => Chord::Char('/'),
            Action::Activate => Chord::Named(NamedKey::Enter),
            Action::ToggleSelect => Chord::Named(NamedKey::Space),
            Action::InvertSelection => Chord::Ctrl('t'),
            Action::SelectVisible => Chord::Ctrl('a'),
            Action::Back => Chord::Named(NamedKey::Esc),
            Action::Reload => Chord::Char('u'),
            Action::Preferences => Chord::Char('2'),
            Action::FilesView => Chord::Char('1'),
            Action::CommandLine => Chord::Char(':'),
            Action::Redraw => Chord::Ctrl('l'),
            Action::ConfirmSearch => Chord::Named(NamedKey::Enter),
            Action::CancelSearch => Chord::Named(NamedKey::Esc),
            Action::SaveTags => Chord::Ctrl('s'),
            Action::CancelSavingTags => Chord::Named(NamedKey::Esc),
            Action::NextField => Chord::Named(NamedKey::Tab),
            Action::PrevField => Chord::Ctrl('p'),
            Action::SubmitField => Chord::Named(NamedKey::Enter),
            Action::CompleteGenre => Chord::Ctrl('g'),
            Action::DropdownNext => Chord::Ctrl('n'),
            Action::DropdownPrev => Chord::Ctrl('p'),
            Action::DropdownAccept => Chord::Named(NamedKey::Enter),
            Action::DropdownCancel => Chord::Named(NamedKey::Esc),
        }
    }
}

/// Arrow keys move within a context even when they are not bound.
fn arrow_alias(context: Context, key: NamedKey) -> Option<Action> {
    match (context, key) {
        (Context::Main, NamedKey::Up) => Some(Action::LineUp),
        (Context::Main, NamedKey::Down) => Some(Action::LineDown),
        (Context::TextField, NamedKey::Up) => Some(Action::PrevField),
        (Context::TextField, NamedKey::Down) => Some(Action::NextField),
        (Context::GenreDropdown, NamedKey::Up) => Some(Action::DropdownPrev),
        (Context::GenreDropdown, NamedKey::Down) => Some(Action::DropdownNext),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub(crate) struct KeyBindingRegistry {
    chords: HashMap<Action, Chord>,
    lookup: HashMap<(Context, Chord), Action>,
}

impl Default for KeyBindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindingRegistry {
    /// Creates a registry holding the built-in bindings.
    pub(crate) fn new() -> Self {
        let mut chords = HashMap::new();
        let mut lookup = HashMap::new();

        for action in Action::ALL {
            let chord = action.default_chord();
            chords.insert(action, chord);
            lookup.insert((action.context(), chord), action);
        }

        Self { chords, lookup }
    }

    /// Binds `action` to `chord`, replacing its previous chord.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidBinding`] if another action in the same
    /// context already uses `chord`. Nothing changes in that case.
    pub(crate) fn bind(&mut self, action: Action, chord: Chord) -> Result<()> {
        let context = action.context();

        if let Some(&other) = self.lookup.get(&(context, chord))
            && other != action
        {
            return Err(AppError::InvalidBinding(format!(
                "{chord} is already bound to {}",
                other.name()
            )));
        }

        if let Some(old) = self.chords.insert(action, chord) {
            self.lookup.remove(&(context, old));
        }
        self.lookup.insert((context, chord), action);

        tracing::debug!(action = action.name(), %chord, "bound key");
        Ok(())
    }

    /// Binds an action given by name to a chord given as text.
    pub(crate) fn bind_str(&mut self, action: &str, chord: &str) -> Result<Action> {
        let action = Action::from_name(action.trim())
            .ok_or_else(|| AppError::InvalidBinding(format!("unknown action '{}'", action.trim())))?;
        let chord: Chord = chord.trim().parse()?;

        self.bind(action, chord)?;
        Ok(action)
    }

    /// Merges bindings from the configuration file over the current ones.
    ///
    /// All overrides are applied together and conflicts are checked on the
    /// result, so swapped chords load regardless of file order. Unknown
    /// actions and bad chords are skipped. An override whose chord still
    /// clashes with another action in its context keeps the previous chord.
    /// Returns a warning for each skipped entry.
    pub(crate) fn load_overrides(&mut self, overrides: &BTreeMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut chords = self.chords.clone();
        let mut overridden = HashSet::new();

        for (name, text) in overrides {
            let parsed = Action::from_name(name.trim())
                .ok_or_else(|| AppError::InvalidBinding(format!("unknown action '{}'", name.trim())))
                .and_then(|action| Ok((action, text.trim().parse::<Chord>()?)));

            match parsed {
                Ok((action, chord)) => {
                    chords.insert(action, chord);
                    overridden.insert(action);
                }
                Err(e) => {
                    tracing::warn!(action = %name, chord = %text, error = %e, "ignoring key binding");
                    warnings.push(format!("{name}: {e}"));
                }
            }
        }

        // The current bindings are conflict free, so reverting clashing
        // overrides always settles.
        loop {
            let mut users: HashMap<(Context, Chord), Vec<Action>> = HashMap::new();
            for action in Action::ALL {
                users
                    .entry((action.context(), chords[&action]))
                    .or_default()
                    .push(action);
            }

            let clashing: Vec<Action> = users
                .values()
                .filter(|actions| actions.len() > 1)
                .flatten()
                .copied()
                .filter(|action| overridden.remove(action))
                .collect();

            if clashing.is_empty() {
                break;
            }

            for action in clashing {
                let chord = chords[&action];
                tracing::warn!(action = action.name(), %chord, "ignoring conflicting key binding");
                warnings.push(format!(
                    "{}: {}",
                    action.name(),
                    AppError::InvalidBinding(format!("{chord} clashes with another binding"))
                ));
                chords.insert(action, self.chords[&action]);
            }
        }

        self.lookup = chords
            .iter()
            .map(|(&action, &chord)| ((action.context(), chord), action))
            .collect();
        self.chords = chords;

        warnings
    }

    /// Resolves a key event in `context` to its action.
    pub(crate) fn resolve(&self, context: Context, key: &KeyEvent) -> Option<Action> {
        let chord = Chord::from_key_event(key)?;

        if let Some(&action) = self.lookup.get(&(context, chord)) {
            return Some(action);
        }

        match chord {
            Chord::Named(named) => arrow_alias(context, named),
            _ => None,
        }
    }

    pub(crate) fn chord_for(&self, action: Action) -> Chord {
        self.chords
            .get(&action)
            .copied()
            .unwrap_or_else(|| action.default_chord())
    }
}
