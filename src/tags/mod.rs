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

//! Reading and writing audio file tags.
//!
//! The rest of the application talks to files only through the [`TagStore`]
//! trait. [`LoftyTagStore`] is the real implementation; tests use an
//! in-memory store.

pub(crate) mod genres;
pub(crate) mod scan;

use std::path::Path;

use lofty::config::WriteOptions;
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};

use crate::{
    error::{AppError, Result},
    model::{TagField, TagRecord},
};

/// Per-file tag access.
pub(crate) trait TagStore {
    /// Reads the editable tags of one file.
    fn read_tags(&self, path: &Path) -> Result<TagRecord>;

    /// Writes the dirty fields of `record` to `path`. Clean fields are left
    /// as they are on disk.
    fn write_tags(&self, path: &Path, record: &TagRecord) -> Result<()>;

    /// Renames a file on disk.
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
}

#[derive(Debug, Default)]
pub(crate) struct LoftyTagStore;

impl LoftyTagStore {
    pub(crate) fn new() -> Self {
        Self
    }
}

fn text_item(tag: &Tag, key: ItemKey) -> String {
    tag.get(&key)
        .and_then(|item| item.value().text())
        .map(|s| s.to_string())
        .unwrap_or_default()
}

fn set_text_item(tag: &mut Tag, key: ItemKey, value: &str) {
    if value.is_empty() {
        tag.remove_key(&key);
    } else {
        tag.insert_text(key, value.to_string());
    }
}

fn record_from_tag(path: &Path, tag: &Tag) -> TagRecord {
    let mut record = TagRecord::new(path);

    record.title = tag.title().map(|s| s.to_string()).unwrap_or_default();
    record.artist = tag.artist().map(|s| s.to_string()).unwrap_or_default();
    record.album = tag.album().map(|s| s.to_string()).unwrap_or_default();
    record.album_artist = text_item(tag, ItemKey::AlbumArtist);
    record.track_number = tag.track();
    record.date = text_item(tag, ItemKey::RecordingDate);
    record.genre = genres::resolve_genre(&tag.genre().map(|s| s.to_string()).unwrap_or_default());
    record.comment = tag.comment().map(|s| s.to_string()).unwrap_or_default();

    record
}

fn apply_field(tag: &mut Tag, field: TagField, record: &TagRecord) {
    match field {
        TagField::Title if record.title.is_empty() => tag.remove_title(),
        TagField::Title => tag.set_title(record.title.clone()),
        TagField::Artist if record.artist.is_empty() => tag.remove_artist(),
        TagField::Artist => tag.set_artist(record.artist.clone()),
        TagField::Album if record.album.is_empty() => tag.remove_album(),
        TagField::Album => tag.set_album(record.album.clone()),
        TagField::Genre if record.genre.is_empty() => tag.remove_genre(),
        TagField::Genre => tag.set_genre(record.genre.clone()),
        TagField::Comment if record.comment.is_empty() => tag.remove_comment(),
        TagField::Comment => tag.set_comment(record.comment.clone()),
        TagField::TrackNumber => match record.track_number {
            Some(n) => tag.set_track(n),
            None => tag.remove_track(),
        },
        TagField::AlbumArtist => set_text_item(tag, ItemKey::AlbumArtist, &record.album_artist),
        TagField::Date => set_text_item(tag, ItemKey::RecordingDate, &record.date),
    }
}

impl TagStore for LoftyTagStore {
    fn read_tags(&self, path: &Path) -> Result<TagRecord> {
        let tagged_file = Probe::open(path)
            .and_then(|p| p.read())
            .map_err(|e| AppError::TagRead {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok(match tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
            Some(tag) => record_from_tag(path, tag),
            None => TagRecord::new(path),
        })
    }

    fn write_tags(&self, path: &Path, record: &TagRecord) -> Result<()> {
        if !record.is_dirty() {
            return Ok(());
        }

        let write_error = |reason: String| AppError::TagWrite {
            path: path.to_path_buf(),
            reason,
        };

        let mut tagged_file = Probe::open(path)
            .and_then(|p| p.read())
            .map_err(|e| write_error(e.to_string()))?;

        // Reads fall back to the first tag when there is no primary one, so a
        // new primary tag starts as a copy of it.
        let tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            let mut seeded = Tag::new(tag_type);
            if let Some(existing) = tagged_file.first_tag() {
                let current = record_from_tag(path, existing);
                for field in TagField::ALL {
                    apply_field(&mut seeded, field, &current);
                }
            }
            tagged_file.insert_tag(seeded);
        }

        let tag = tagged_file
            .tag_mut(tag_type)
            .ok_or_else(|| write_error(format!("file does not support {tag_type:?} tags")))?;

        for field in record.dirty_fields() {
            apply_field(tag, field, record);
        }

        tag.save_to_path(path, WriteOptions::default())
            .map_err(|e| write_error(e.to_string()))?;

        tracing::debug!(path = %path.display(), "wrote tags");
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        std::fs::rename(from, to)?;
        tracing::info!(from = %from.display(), to = %to.display(), "renamed file");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory [`TagStore`] for tests.

    use std::{
        cell::{Cell, RefCell},
        collections::{HashMap, HashSet},
        path::{Path, PathBuf},
    };

    use super::TagStore;
    use crate::{
        error::{AppError, Result},
        model::TagRecord,
    };

    #[derive(Debug, Default)]
    pub(crate) struct MemoryTagStore {
        records: RefCell<HashMap<PathBuf, TagRecord>>,
        unreadable: HashSet<PathBuf>,
        failing: RefCell<HashSet<PathBuf>>,
        writes: RefCell<Vec<PathBuf>>,
        failing_renames: Cell<bool>,
    }

    impl MemoryTagStore {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn with_record(self, record: TagRecord) -> Self {
            self.records
                .borrow_mut()
                .insert(record.path().to_path_buf(), record);
            self
        }

        pub(crate) fn with_unreadable(mut self, path: &str) -> Self {
            self.unreadable.insert(PathBuf::from(path));
            self
        }

        /// Makes every write to `path` fail.
        pub(crate) fn fail_writes_to(&self, path: &str) {
            self.failing.borrow_mut().insert(PathBuf::from(path));
        }

        /// Makes every rename fail.
        pub(crate) fn fail_renames(&self) {
            self.failing_renames.set(true);
        }

        pub(crate) fn record(&self, path: &str) -> TagRecord {
            self.records.borrow()[Path::new(path)].clone()
        }

        pub(crate) fn has(&self, path: &str) -> bool {
            self.records.borrow().contains_key(Path::new(path))
        }

        /// Paths written so far, in order.
        pub(crate) fn writes(&self) -> Vec<PathBuf> {
            self.writes.borrow().clone()
        }
    }

    impl TagStore for MemoryTagStore {
        fn read_tags(&self, path: &Path) -> Result<TagRecord> {
            if self.unreadable.contains(path) {
                return Err(AppError::TagRead {
                    path: path.to_path_buf(),
                    reason: "unsupported file".to_string(),
                });
            }

            Ok(self
                .records
                .borrow()
                .get(path)
                .cloned()
                .unwrap_or_else(|| TagRecord::new(path)))
        }

        fn write_tags(&self, path: &Path, record: &TagRecord) -> Result<()> {
            if self.failing.borrow().contains(path) {
                return Err(AppError::TagWrite {
                    path: path.to_path_buf(),
                    reason: "read-only file system".to_string(),
                });
            }

            let mut records = self.records.borrow_mut();
            let stored = records
                .entry(path.to_path_buf())
                .or_insert_with(|| TagRecord::new(path));
            for field in record.dirty_fields() {
                stored.set(field, &record.get(field))?;
            }
            stored.mark_clean();

            self.writes.borrow_mut().push(path.to_path_buf());
            Ok(())
        }

        fn rename(&self, from: &Path, to: &Path) -> Result<()> {
            if self.failing_renames.get() {
                return Err(AppError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("cannot rename {}", from.display()),
                )));
            }

            let mut records = self.records.borrow_mut();
            if let Some(record) = records.remove(from) {
                records.insert(to.to_path_buf(), record.relocate(to.to_path_buf()));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use lofty::tag::TagType;
    use tempfile::TempDir;

    use super::*;

    /// An MPEG-1 Layer III frame header: 128 kbps, 44.1 kHz, joint stereo.
    const FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x64];
    const FRAME_LEN: usize = 417;

    /// Writes a short silent MP3 with no tags.
    fn silent_mp3(dir: &TempDir, name: &str) -> PathBuf {
        let mut bytes = Vec::with_capacity(FRAME_LEN * 8);
        for _ in 0..8 {
            bytes.extend_from_slice(&FRAME_HEADER);
            bytes.resize(bytes.len() + FRAME_LEN - FRAME_HEADER.len(), 0);
        }

        let path = dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn written_fields_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = silent_mp3(&dir, "song.mp3");
        let store = LoftyTagStore::new();

        let mut record = store.read_tags(&path).unwrap();
        record.set(TagField::Title, "Blue in Green").unwrap();
        record.set(TagField::AlbumArtist, "Miles Davis").unwrap();
        record.set(TagField::TrackNumber, "3").unwrap();
        store.write_tags(&path, &record).unwrap();

        let read = store.read_tags(&path).unwrap();
        assert_eq!(read.title, "Blue in Green");
        assert_eq!(read.album_artist, "Miles Davis");
        assert_eq!(read.track_number, Some(3));
        assert_eq!(read.album, "");
    }

    #[test]
    fn editing_secondary_tag_keeps_untouched_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = silent_mp3(&dir, "old.mp3");

        let mut v1 = Tag::new(TagType::Id3v1);
        v1.set_title("Old Title".to_string());
        v1.set_artist("Old Artist".to_string());
        v1.save_to_path(&path, WriteOptions::default()).unwrap();

        let store = LoftyTagStore::new();
        let mut record = store.read_tags(&path).unwrap();
        assert_eq!(record.artist, "Old Artist");

        record.set(TagField::Album, "New Album").unwrap();
        store.write_tags(&path, &record).unwrap();

        let read = store.read_tags(&path).unwrap();
        assert_eq!(read.album, "New Album");
        assert_eq!(read.title, "Old Title");
        assert_eq!(read.artist, "Old Artist");
    }

    #[test]
    fn clearing_a_field_removes_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = silent_mp3(&dir, "song.mp3");
        let store = LoftyTagStore::new();

        let mut record = store.read_tags(&path).unwrap();
        record.set(TagField::Date, "2001-02-03").unwrap();
        record.set(TagField::Artist, "Someone").unwrap();
        store.write_tags(&path, &record).unwrap();

        let mut record = store.read_tags(&path).unwrap();
        record.mark_clean();
        record.set(TagField::Date, "").unwrap();
        store.write_tags(&path, &record).unwrap();

        let read = store.read_tags(&path).unwrap();
        assert_eq!(read.date, "");
        assert_eq!(read.artist, "Someone");
    }
}
