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

//! Domain models and core data structures.
//!
//! This module defines the central entities of the application: the
//! [`FileEntry`] rows shown in the file list, the [`TagRecord`] holding one
//! file's editable tags, and the [`TagTemplate`] filled in by the edit forms.

pub(crate) mod cursor;
pub(crate) mod library;
pub(crate) mod search;
pub(crate) mod selection;

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;

use crate::error::{AppError, Result};

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));

/// The editable tag fields, in the order the edit forms show them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum TagField {
    Title,
    Album,
    Artist,
    AlbumArtist,
    Genre,
    Date,
    TrackNumber,
    Comment,
}

impl TagField {
    pub(crate) const ALL: [TagField; 8] = [
        TagField::Title,
        TagField::Album,
        TagField::Artist,
        TagField::AlbumArtist,
        TagField::Genre,
        TagField::Date,
        TagField::TrackNumber,
        TagField::Comment,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            TagField::Title => "Title",
            TagField::Album => "Album",
            TagField::Artist => "Artist",
            TagField::AlbumArtist => "Album Artist",
            TagField::Genre => "Genre",
            TagField::Date => "Date",
            TagField::TrackNumber => "Track Number",
            TagField::Comment => "Comment",
        }
    }
}

/// Checks a user-entered value against the rules for `field`.
///
/// Empty values are always accepted; they mean "no value".
pub(crate) fn validate_field(field: TagField, value: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }

    match field {
        TagField::Date if !DATE_PATTERN.is_match(value) => Err(AppError::validation(format!(
            "Date should be of the form YYYY-MM-DD, got '{value}'"
        ))),
        TagField::TrackNumber => parse_track_number(value).map(|_| ()),
        _ => Ok(()),
    }
}

fn parse_track_number(value: &str) -> Result<u32> {
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::validation(format!(
            "Track number can only take integer values, got '{value}'"
        )));
    }

    value
        .parse()
        .map_err(|_| AppError::validation(format!("Track number '{value}' is out of range")))
}

/// A file discovered by the directory scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FileEntry {
    pub(crate) path: PathBuf,
    pub(crate) display_name: String,
}

impl FileEntry {
    pub(crate) fn new(path: PathBuf) -> Self {
        let display_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Self { path, display_name }
    }
}

/// One file's editable tags.
///
/// The path is the record's identity and never changes. Fields changed with
/// [`TagRecord::set`] are remembered as dirty, so a tag store only has to
/// touch what was edited.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct TagRecord {
    path: PathBuf,
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) album: String,
    pub(crate) album_artist: String,
    pub(crate) track_number: Option<u32>,
    pub(crate) date: String,
    pub(crate) genre: String,
    pub(crate) comment: String,
    dirty: BTreeSet<TagField>,
}

impl TagRecord {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn get(&self, field: TagField) -> String {
        match field {
            TagField::Title => self.title.clone(),
            TagField::Album => self.album.clone(),
            TagField::Artist => self.artist.clone(),
            TagField::AlbumArtist => self.album_artist.clone(),
            TagField::Genre => self.genre.clone(),
            TagField::Date => self.date.clone(),
            TagField::TrackNumber => self.track_number.map(|n| n.to_string()).unwrap_or_default(),
            TagField::Comment => self.comment.clone(),
        }
    }

    /// Sets a field from user-entered text.
    ///
    /// Setting a field to its current value is a no-op and does not mark it
    /// dirty. On a validation error the record is left unchanged.
    pub(crate) fn set(&mut self, field: TagField, value: &str) -> Result<()> {
        if self.get(field) == value {
            return Ok(());
        }

        validate_field(field, value)?;

        match field {
            TagField::Title => self.title = value.to_string(),
            TagField::Album => self.album = value.to_string(),
            TagField::Artist => self.artist = value.to_string(),
            TagField::AlbumArtist => self.album_artist = value.to_string(),
            TagField::Genre => self.genre = value.to_string(),
            TagField::Date => self.date = value.to_string(),
            TagField::TrackNumber => {
                self.track_number = if value.is_empty() {
                    None
                } else {
                    Some(parse_track_number(value)?)
                }
            }
            TagField::Comment => self.comment = value.to_string(),
        }

        self.dirty.insert(field);
        Ok(())
    }

    pub(crate) fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub(crate) fn dirty_fields(&self) -> impl Iterator<Item = TagField> + '_ {
        self.dirty.iter().copied()
    }

    /// Returns a copy of this record with exactly `fields` marked dirty.
    ///
    /// Used to restore a file to a previously read state.
    pub(crate) fn with_dirty(&self, fields: impl IntoIterator<Item = TagField>) -> Self {
        Self {
            dirty: fields.into_iter().collect(),
            ..self.clone()
        }
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty.clear();
    }

    /// Moves the record to a new identity after the file was renamed.
    pub(crate) fn relocate(&self, path: PathBuf) -> Self {
        Self {
            path,
            ..self.clone()
        }
    }
}

/// Raw field values typed into an edit form.
///
/// Values are kept as text until they are applied to a [`TagRecord`], so a
/// template may hold an invalid date or track number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TagTemplate {
    values: BTreeMap<TagField, String>,
}

impl TagTemplate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, field: TagField, value: &str) -> Self {
        self.set(field, value);
        self
    }

    pub(crate) fn set(&mut self, field: TagField, value: &str) {
        self.values.insert(field, value.to_string());
    }

    pub(crate) fn get(&self, field: TagField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Fields holding a non-empty value.
    pub(crate) fn filled(&self) -> impl Iterator<Item = (TagField, &str)> + '_ {
        TagField::ALL
            .into_iter()
            .map(|field| (field, self.get(field)))
            .filter(|(_, value)| !value.is_empty())
    }

    /// Validates every non-empty value.
    pub(crate) fn validate(&self) -> Result<()> {
        self.filled()
            .try_for_each(|(field, value)| validate_field(field, value))
    }
}
