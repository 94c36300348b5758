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

//! Audio file discovery.
//!
//! Walks the music directory with `WalkDir` and returns every file whose
//! extension looks like audio. Nothing is read from the files here; tags are
//! loaded separately through a [`TagStore`](super::TagStore).

use std::path::Path;

use walkdir::WalkDir;

use crate::{
    error::{AppError, Result},
    model::FileEntry,
};

const AUDIO_EXTENSIONS: [&str; 10] = [
    "mp3", "flac", "ogg", "opus", "m4a", "mp4", "wav", "aiff", "wma", "ape",
];

fn is_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| AUDIO_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

/// Recursively collects the audio files below `root`.
///
/// Entries are ordered by display name, ignoring case, with the path as a
/// tie-breaker. A directory without audio files yields an empty list.
///
/// # Errors
///
/// Returns [`AppError::Scan`] if `root` is not a readable directory.
/// Unreadable subdirectories are skipped.
pub(crate) fn scan(root: &Path) -> Result<Vec<FileEntry>> {
    if !root.is_dir() {
        return Err(AppError::Scan {
            path: root.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    std::fs::read_dir(root).map_err(|e| AppError::Scan {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut entries: Vec<FileEntry> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_audio(e.path()))
        .map(|e| FileEntry::new(e.into_path()))
        .collect();

    entries.sort_by(|a, b| {
        a.display_name
            .to_lowercase()
            .cmp(&b.display_name.to_lowercase())
            .then_with(|| a.path.cmp(&b.path))
    });

    tracing::debug!(root = %root.display(), files = entries.len(), "scanned music directory");

    Ok(entries)
}
