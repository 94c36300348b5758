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

//! Key chords.
//!
//! A chord is what a binding maps to: a single printable character, a
//! control combination written `^X`, or one of a fixed set of named keys.

use std::{fmt, str::FromStr};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum NamedKey {
    Esc,
    Tab,
    End,
    Home,
    Space,
    Insert,
    Delete,
    PageUp,
    PageDown,
    Enter,
    Up,
    Down,
    Left,
    Right,
    Backspace,
}

impl NamedKey {
    const ALL: [NamedKey; 15] = [
        NamedKey::Esc,
        NamedKey::Tab,
        NamedKey::End,
        NamedKey::Home,
        NamedKey::Space,
        NamedKey::Insert,
        NamedKey::Delete,
        NamedKey::PageUp,
        NamedKey::PageDown,
        NamedKey::Enter,
        NamedKey::Up,
        NamedKey::Down,
        NamedKey::Left,
        NamedKey::Right,
        NamedKey::Backspace,
    ];

    pub(crate) fn name(self) -> &'static str {
        match self {
            NamedKey::Esc => "esc",
            NamedKey::Tab => "tab",
            NamedKey::End => "end",
            NamedKey::Home => "home",
            NamedKey::Space => "space",
            NamedKey::Insert => "insert",
            NamedKey::Delete => "delete",
            NamedKey::PageUp => "page_up",
            NamedKey::PageDown => "page_down",
            NamedKey::Enter => "enter",
            NamedKey::Up => "up",
            NamedKey::Down => "down",
            NamedKey::Left => "left",
            NamedKey::Right => "right",
            NamedKey::Backspace => "backspace",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.name().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Chord {
    Char(char),
    /// Control plus an ASCII letter, stored lowercase.
    Ctrl(char),
    Named(NamedKey),
}

impl Chord {
    /// Converts a terminal key event into a chord, if it has one.
    ///
    /// Alt combinations and keys outside the chord grammar have no chord.
    pub(crate) fn from_key_event(key: &KeyEvent) -> Option<Self> {
        if key.modifiers.contains(KeyModifiers::ALT) {
            return None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let named = |k| Some(Chord::Named(k));

        match key.code {
            KeyCode::Char(c) if ctrl => c
                .is_ascii_alphabetic()
                .then(|| Chord::Ctrl(c.to_ascii_lowercase())),
            KeyCode::Char(' ') => named(NamedKey::Space),
            KeyCode::Char(c) => Some(Chord::Char(c)),
            _ if ctrl => None,
            KeyCode::Esc => named(NamedKey::Esc),
            KeyCode::Tab => named(NamedKey::Tab),
            KeyCode::End => named(NamedKey::End),
            KeyCode::Home => named(NamedKey::Home),
            KeyCode::Insert => named(NamedKey::Insert),
            KeyCode::Delete => named(NamedKey::Delete),
            KeyCode::PageUp => named(NamedKey::PageUp),
            KeyCode::PageDown => named(NamedKey::PageDown),
            KeyCode::Enter => named(NamedKey::Enter),
            KeyCode::Up => named(NamedKey::Up),
            KeyCode::Down => named(NamedKey::Down),
            KeyCode::Left => named(NamedKey::Left),
            KeyCode::Right => named(NamedKey::Right),
            KeyCode::Backspace => named(NamedKey::Backspace),
            _ => None,
        }
    }
}

impl FromStr for Chord {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::InvalidBinding(format!("'{s}' is not a valid key"));

        if let Some(key) = NamedKey::from_name(s) {
            return Ok(Chord::Named(key));
        }

        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(' '), None, None) => Ok(Chord::Named(NamedKey::Space)),
            (Some(c), None, None) if !c.is_control() => Ok(Chord::Char(c)),
            (Some('^'), Some(c), None) if c.is_ascii_alphabetic() => {
                Ok(Chord::Ctrl(c.to_ascii_lowercase()))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chord::Char(c) => write!(f, "{c}"),
            Chord::Ctrl(c) => write!(f, "^{}", c.to_ascii_uppercase()),
            Chord::Named(key) => f.write_str(key.name()),
        }
    }
}
