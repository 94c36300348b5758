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

//! Application error types.
//!
//! Every recoverable failure in the interaction engine is one of the
//! [`AppError`] variants below. The controller turns these into status line
//! messages; only the binary entry point converts them into `anyhow` errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    /// A key chord could not be parsed, or clashes with another binding.
    #[error("Invalid key binding: {0}")]
    InvalidBinding(String),

    /// The search query is not a valid regular expression.
    #[error("Invalid search pattern: {0}")]
    SearchPattern(String),

    /// User-entered tag data (date, track number, filename) was rejected.
    #[error("{0}")]
    Validation(String),

    /// A `:` command could not be parsed.
    #[error("{0}")]
    Command(String),

    #[error("Invalid value for '{option}': {reason}")]
    InvalidOptionValue { option: String, reason: String },

    #[error("Failed to read tags from {}: {reason}", path.display())]
    TagRead { path: PathBuf, reason: String },

    #[error("Failed to write tags to {}: {reason}", path.display())]
    TagWrite { path: PathBuf, reason: String },

    /// The music directory itself could not be scanned.
    #[error("Cannot scan {}: {reason}", path.display())]
    Scan { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] confy::ConfyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn invalid_option(option: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOptionValue {
            option: option.to_string(),
            reason: reason.into(),
        }
    }
}

pub(crate) type Result<T> = std::result::Result<T, AppError>;
