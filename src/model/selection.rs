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

//! Multi-file selection for batch tagging.
//!
//! Membership is keyed by file path and is independent of what the file list
//! currently shows: entries hidden by a search stay selected.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

#[derive(Debug, Default)]
pub(crate) struct SelectionModel {
    selected: HashSet<PathBuf>,
}

impl SelectionModel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.selected.len()
    }

    pub(crate) fn contains(&self, path: &Path) -> bool {
        self.selected.contains(path)
    }

    pub(crate) fn paths(&self) -> impl Iterator<Item = &Path> {
        self.selected.iter().map(PathBuf::as_path)
    }

    pub(crate) fn toggle(&mut self, path: &Path) {
        if !self.selected.remove(path) {
            self.selected.insert(path.to_path_buf());
        }
    }

    pub(crate) fn add(&mut self, path: &Path) {
        self.selected.insert(path.to_path_buf());
    }

    /// Inverts membership of the visible entries.
    ///
    /// With nothing selected this selects every visible entry. Entries
    /// outside `visible` are never touched.
    pub(crate) fn invert<'a>(&mut self, visible: impl IntoIterator<Item = &'a Path>) {
        if self.selected.is_empty() {
            self.selected
                .extend(visible.into_iter().map(Path::to_path_buf));
            return;
        }

        for path in visible {
            self.toggle(path);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drops paths for which `keep` returns false, e.g. after a rescan.
    pub(crate) fn retain(&mut self, keep: impl Fn(&Path) -> bool) {
        self.selected.retain(|path| keep(path));
    }

    pub(crate) fn rename(&mut self, old: &Path, new: &Path) {
        if self.selected.remove(old) {
            self.selected.insert(new.to_path_buf());
        }
    }
}
