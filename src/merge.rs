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

//! Field-level write planning for tag edits.
//!
//! A batch edit fills in a [`TagTemplate`]. Only the template's non-empty
//! fields are written, and they are written to every selected file; blank
//! fields never erase existing data. Commits are all-or-nothing: the plan is
//! validated before anything is written, and a failed write restores the
//! files already written.

use std::path::Path;

use crate::{
    error::{AppError, Result},
    model::{TagRecord, TagTemplate},
    tags::TagStore,
};

/// One file's tags before and after the edit.
#[derive(Debug, Clone)]
pub(crate) struct PlannedWrite {
    original: TagRecord,
    updated: TagRecord,
}

impl PlannedWrite {
    pub(crate) fn path(&self) -> &Path {
        self.original.path()
    }

    pub(crate) fn updated(&self) -> &TagRecord {
        &self.updated
    }

    /// The original values of the fields this write changes.
    fn restore(&self) -> TagRecord {
        self.original.with_dirty(self.updated.dirty_fields())
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct WritePlan {
    writes: Vec<PlannedWrite>,
}

impl WritePlan {
    /// Plans a single-file edit. An unchanged record yields an empty plan.
    pub(crate) fn single(original: TagRecord, updated: TagRecord) -> Self {
        let writes = if updated.is_dirty() {
            vec![PlannedWrite { original, updated }]
        } else {
            Vec::new()
        };
        Self { writes }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.writes.len()
    }

    pub(crate) fn writes(&self) -> &[PlannedWrite] {
        &self.writes
    }
}

/// Plans a batch edit of `records` from `template`.
///
/// Files whose tags already hold every template value are left out of the
/// plan.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any non-empty template field is
/// invalid.
pub(crate) fn plan(template: &TagTemplate, records: &[TagRecord]) -> Result<WritePlan> {
    template.validate()?;

    let mut writes = Vec::with_capacity(records.len());
    for original in records {
        let mut updated = original.clone();
        updated.mark_clean();
        for (field, value) in template.filled() {
            updated.set(field, value)?;
        }
        if updated.is_dirty() {
            writes.push(PlannedWrite {
                original: original.clone(),
                updated,
            });
        }
    }

    Ok(WritePlan { writes })
}

/// Writes every file in `plan`, or none of them.
///
/// On a write failure the files already written are restored to their
/// original values and the error names the file that failed.
pub(crate) fn commit(store: &dyn TagStore, plan: &WritePlan) -> Result<()> {
    for (done, write) in plan.writes.iter().enumerate() {
        if let Err(e) = store.write_tags(write.path(), &write.updated) {
            tracing::error!(path = %write.path().display(), error = %e, "write failed, rolling back");
            rollback(store, &plan.writes[..done]);
            return Err(match e {
                AppError::TagWrite { .. } => e,
                other => AppError::TagWrite {
                    path: write.path().to_path_buf(),
                    reason: other.to_string(),
                },
            });
        }
    }

    tracing::info!(files = plan.len(), "committed tag edit");
    Ok(())
}

/// Restores every file in a committed `plan` to its original values.
pub(crate) fn revert(store: &dyn TagStore, plan: &WritePlan) {
    rollback(store, &plan.writes);
}

fn rollback(store: &dyn TagStore, written: &[PlannedWrite]) {
    for write in written.iter().rev() {
        if let Err(e) = store.write_tags(write.path(), &write.restore()) {
            tracing::warn!(path = %write.path().display(), error = %e, "rollback failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::TagField, tags::memory::MemoryTagStore};

    fn record(path: &str, title: &str, album: &str) -> TagRecord {
        let mut record = TagRecord::new(path);
        record.title = title.into();
        record.album = album.into();
        record
    }

    fn store() -> MemoryTagStore {
        MemoryTagStore::new()
            .with_record(record("/m/a.mp3", "A", "Old"))
            .with_record(record("/m/b.mp3", "B", "Old"))
            .with_record(record("/m/c.mp3", "C", "Keep"))
    }

    #[test]
    fn only_non_empty_template_fields_are_written() {
        let store = store();
        let records = vec![store.record("/m/a.mp3"), store.record("/m/b.mp3")];
        let template = TagTemplate::new()
            .with(TagField::Album, "New")
            .with(TagField::Title, "");

        let plan = plan(&template, &records).unwrap();
        commit(&store, &plan).unwrap();

        assert_eq!(store.record("/m/a.mp3"), record("/m/a.mp3", "A", "New"));
        assert_eq!(store.record("/m/b.mp3"), record("/m/b.mp3", "B", "New"));
        assert_eq!(store.record("/m/c.mp3"), record("/m/c.mp3", "C", "Keep"));
    }

    #[test]
    fn invalid_track_number_writes_nothing() {
        let store = store();
        let records = vec![store.record("/m/a.mp3"), store.record("/m/b.mp3")];
        let template = TagTemplate::new()
            .with(TagField::Album, "New")
            .with(TagField::TrackNumber, "abc");

        let err = plan(&template, &records).unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.writes().is_empty());
    }

    #[test]
    fn unchanged_files_are_not_planned() {
        let store = store();
        let records = vec![store.record("/m/a.mp3"), store.record("/m/c.mp3")];
        let template = TagTemplate::new().with(TagField::Album, "Keep");

        let plan = plan(&template, &records).unwrap();

        assert_eq!(plan.len(), 1);
        assert_eq!(plan.writes()[0].path(), Path::new("/m/a.mp3"));
    }

    #[test]
    fn failed_write_rolls_back_and_names_file() {
        let store = store();
        store.fail_writes_to("/m/b.mp3");
        let records = vec![store.record("/m/a.mp3"), store.record("/m/b.mp3")];
        let template = TagTemplate::new().with(TagField::Album, "New");

        let plan = plan(&template, &records).unwrap();
        let err = commit(&store, &plan).unwrap_err();

        match err {
            AppError::TagWrite { path, .. } => assert_eq!(path, Path::new("/m/b.mp3")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.record("/m/a.mp3"), record("/m/a.mp3", "A", "Old"));
        assert_eq!(store.record("/m/b.mp3"), record("/m/b.mp3", "B", "Old"));
    }

    #[test]
    fn single_plan_skips_clean_record() {
        let original = record("/m/a.mp3", "A", "Old");

        assert!(WritePlan::single(original.clone(), original.clone()).is_empty());

        let mut updated = original.clone();
        updated.set(TagField::Title, "A2").unwrap();
        assert_eq!(WritePlan::single(original, updated).len(), 1);
    }

    #[test]
    fn revert_restores_committed_plan() {
        let store = store();
        let records = vec![store.record("/m/a.mp3"), store.record("/m/c.mp3")];
        let template = TagTemplate::new().with(TagField::Album, "New");

        let plan = plan(&template, &records).unwrap();
        commit(&store, &plan).unwrap();
        revert(&store, &plan);

        assert_eq!(store.record("/m/a.mp3"), record("/m/a.mp3", "A", "Old"));
        assert_eq!(store.record("/m/c.mp3"), record("/m/c.mp3", "C", "Keep"));
    }
}
