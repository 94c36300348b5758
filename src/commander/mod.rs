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

//! Command-line input logic and state management.
//!
//! The command line opens at the bottom of the screen on `:`. It owns a text
//! input; when a line is submitted it is parsed into a [`Command`] for the
//! controller to carry out.

use crossterm::event::{Event, KeyEvent};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// `set <option>=<value>`
    Set { option: String, value: String },
    /// `bind <action>=<chord>`
    Bind { action: String, chord: String },
    /// `reload`: re-read the configuration file
    Reload,
    /// `q` or `quit`
    Quit,
}

fn split_assignment(verb: &str, operand: &str) -> Result<(String, String)> {
    let (name, value) = operand.split_once('=').ok_or_else(|| {
        AppError::Command(format!("Usage: {verb} <name>=<value>"))
    })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Command(format!("Usage: {verb} <name>=<value>")));
    }

    Ok((name.to_string(), value.trim().to_string()))
}

impl Command {
    /// Parses one command line.
    ///
    /// The verb ends at the first whitespace. For `set` and `bind` the
    /// operand is split at the first `=`, so values may contain spaces.
    pub(crate) fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, operand) = line
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((line, ""));

        match verb {
            "q" | "quit" if operand.is_empty() => Ok(Command::Quit),
            "reload" if operand.is_empty() => Ok(Command::Reload),
            "set" => {
                let (option, value) = split_assignment(verb, operand)?;
                Ok(Command::Set { option, value })
            }
            "bind" => {
                let (action, chord) = split_assignment(verb, operand)?;
                Ok(Command::Bind { action, chord })
            }
            "" => Err(AppError::Command("No command given".to_string())),
            _ => Err(AppError::Command(format!("Unknown command: {line}"))),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Commander {
    active: bool,
    pub(crate) input: Input,
}

impl Commander {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn active(&self) -> bool {
        self.active
    }

    pub(crate) fn open(&mut self) {
        self.active = true;
        self.input.reset();
    }

    pub(crate) fn close(&mut self) {
        self.active = false;
        self.input.reset();
    }

    /// Delegates a key press to the managed input component.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        self.input.handle_event(&Event::Key(key));
    }

    /// Closes the command line and parses what was typed.
    pub(crate) fn submit(&mut self) -> Result<Command> {
        let buffer = self.input.value().to_string();
        self.close();
        Command::parse(&buffer)
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    #[test]
    fn parses_quit() {
        assert_eq!(Command::parse("q").unwrap(), Command::Quit);
        assert_eq!(Command::parse("  quit ").unwrap(), Command::Quit);
    }

    #[test]
    fn parses_reload() {
        assert_eq!(Command::parse("reload").unwrap(), Command::Reload);
        assert!(Command::parse("reload now").is_err());
    }

    #[test]
    fn set_value_may_contain_spaces_and_equals() {
        let command = Command::parse("set preview_format=%a - %t (x=y)").unwrap();

        assert_eq!(
            command,
            Command::Set {
                option: "preview_format".to_string(),
                value: "%a - %t (x=y)".to_string(),
            }
        );
    }

    #[test]
    fn parses_bind() {
        assert_eq!(
            Command::parse("bind quit=^Q").unwrap(),
            Command::Bind {
                action: "quit".to_string(),
                chord: "^Q".to_string(),
            }
        );
    }

    #[test]
    fn malformed_commands_are_errors() {
        for line in ["", "frobnicate", "set vim_mode", "bind =q", "q now"] {
            let err = Command::parse(line).unwrap_err();
            assert!(matches!(err, AppError::Command(_)), "{line:?}");
        }
    }

    #[test]
    fn submit_closes_and_parses_typed_text() {
        let mut commander = Commander::new();
        commander.open();
        for c in "q".chars() {
            commander.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }

        assert_eq!(commander.submit().unwrap(), Command::Quit);
        assert!(!commander.active());
        assert!(commander.input.value().is_empty());
    }
}
