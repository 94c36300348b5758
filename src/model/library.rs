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

//! The scanned music library.
//!
//! Holds the file list produced by the last scan together with the tags read
//! for each file. Files whose tags could not be read stay in the list but are
//! flagged, so one broken file never hides the rest of the directory.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::{
    error::Result,
    model::{FileEntry, TagRecord},
    tags::{TagStore, scan},
};

#[derive(Debug, Default)]
pub(crate) struct Library {
    root: PathBuf,
    entries: Vec<FileEntry>,
    records: HashMap<PathBuf, TagRecord>,
    unreadable: HashMap<PathBuf, String>,
}

impl Library {
    /// Scans `root` and reads the tags of every file found.
    ///
    /// # Errors
    ///
    /// Fails only if `root` itself cannot be scanned. Per-file read errors
    /// are logged and recorded.
    pub(crate) fn load(root: &Path, store: &dyn TagStore) -> Result<Self> {
        let entries = scan::scan(root)?;
        let mut library = Self::from_entries(root, entries);
        library.read_all(store);

        tracing::info!(
            root = %root.display(),
            files = library.entries.len(),
            unreadable = library.unreadable.len(),
            "loaded music library"
        );

        Ok(library)
    }

    pub(crate) fn from_entries(root: &Path, entries: Vec<FileEntry>) -> Self {
        Self {
            root: root.to_path_buf(),
            entries,
            ..Self::default()
        }
    }

    fn read_all(&mut self, store: &dyn TagStore) {
        for entry in &self.entries {
            match store.read_tags(&entry.path) {
                Ok(record) => {
                    self.records.insert(entry.path.clone(), record);
                }
                Err(e) => {
                    tracing::warn!(path = %entry.path.display(), error = %e, "skipping unreadable tags");
                    self.unreadable.insert(entry.path.clone(), e.to_string());
                }
            }
        }
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    pub(crate) fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entry(&self, index: usize) -> Option<&FileEntry> {
        self.entries.get(index)
    }

    pub(crate) fn position(&self, path: &Path) -> Option<usize> {
        self.entries.iter().position(|e| e.path == path)
    }

    /// Cached tags for `path`, if they could be read.
    pub(crate) fn record(&self, path: &Path) -> Option<&TagRecord> {
        self.records.get(path)
    }

    /// Why the tags of `path` could not be read, if they could not.
    pub(crate) fn read_error(&self, path: &Path) -> Option<&str> {
        self.unreadable.get(path).map(String::as_str)
    }

    /// Stores freshly written tags.
    pub(crate) fn update_record(&mut self, mut record: TagRecord) {
        record.mark_clean();
        self.unreadable.remove(record.path());
        self.records.insert(record.path().to_path_buf(), record);
    }

    /// Points an entry at its new path after a rename.
    pub(crate) fn replace_entry(&mut self, old: &Path, new: PathBuf) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.path == old) {
            *entry = FileEntry::new(new.clone());
        }
        if let Some(record) = self.records.remove(old) {
            self.records.insert(new.clone(), record.relocate(new.clone()));
        }
        if let Some(reason) = self.unreadable.remove(old) {
            self.unreadable.insert(new, reason);
        }
    }
}
