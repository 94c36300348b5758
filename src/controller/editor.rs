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

//! Tag edit forms.
//!
//! A single edit shows one file's tags plus its filename and writes back
//! the fields that changed. A batch edit starts with blank fields and writes
//! only the fields that were filled in, to every file in the edit set.
//!
//! With `vim_mode` enabled the fields start in normal mode, where letters
//! move the cursor or switch fields instead of being typed.

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tui_input::{Input, InputRequest, backend::crossterm::EventHandler};

use crate::{
    config::PrefOption,
    controller::{Flow, MainViewController, ViewState},
    error::{AppError, Result},
    keys::{Action, Context},
    merge::{self, WritePlan},
    model::{TagField, TagRecord, TagTemplate},
    tags::genres,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Filename,
    Tag(TagField),
}

impl FieldKind {
    pub(crate) fn label(self) -> &'static str {
        match self {
            FieldKind::Filename => "Filename",
            FieldKind::Tag(field) => field.label(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct FormField {
    pub(crate) kind: FieldKind,
    pub(crate) input: Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VimMode {
    Normal,
    Insert,
}

/// Genre completions waiting for a choice.
#[derive(Debug)]
pub(crate) struct GenreDropdown {
    pub(crate) candidates: Vec<&'static str>,
    pub(crate) index: usize,
}

#[derive(Debug)]
enum Target {
    Single(TagRecord),
    Batch(Vec<TagRecord>),
}

#[derive(Debug)]
pub(crate) struct EditForm {
    target: Target,
    fields: Vec<FormField>,
    focus: usize,
    vim: Option<VimMode>,
    dropdown: Option<GenreDropdown>,
}

impl EditForm {
    fn new(target: Target, vim_mode: bool, focus: Option<FieldKind>) -> Self {
        let mut fields = Vec::with_capacity(TagField::ALL.len() + 1);

        if let Target::Single(record) = &target {
            let stem = record
                .path()
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            fields.push(FormField {
                kind: FieldKind::Filename,
                input: Input::new(stem),
            });
        }

        for field in TagField::ALL {
            let value = match &target {
                Target::Single(record) => record.get(field),
                Target::Batch(_) => String::new(),
            };
            fields.push(FormField {
                kind: FieldKind::Tag(field),
                input: Input::new(value),
            });
        }

        let focus = focus
            .and_then(|kind| fields.iter().position(|f| f.kind == kind))
            .unwrap_or(0);

        Self {
            target,
            fields,
            focus,
            vim: vim_mode.then_some(VimMode::Normal),
            dropdown: None,
        }
    }

    /// The heading shown above the form.
    pub(crate) fn title(&self) -> String {
        match &self.target {
            Target::Single(record) => format!("Editing {}", record.path().display()),
            Target::Batch(records) => format!("Batch tagging {} files", records.len()),
        }
    }

    pub(crate) fn is_batch(&self) -> bool {
        matches!(self.target, Target::Batch(_))
    }

    pub(crate) fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub(crate) fn focus(&self) -> usize {
        self.focus
    }

    pub(crate) fn vim_mode(&self) -> Option<VimMode> {
        self.vim
    }

    pub(crate) fn dropdown(&self) -> Option<&GenreDropdown> {
        self.dropdown.as_ref()
    }

    fn focused_kind(&self) -> FieldKind {
        self.fields[self.focus].kind
    }

    fn value(&self, kind: FieldKind) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.kind == kind)
            .map(|f| f.input.value())
    }

    fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    fn prev_field(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    fn input(&mut self) -> &mut Input {
        &mut self.fields[self.focus].input
    }

    fn set_focused_value(&mut self, value: &str) {
        *self.input() = Input::new(value.to_string());
    }

    /// The batch template: every tag field as typed.
    fn template(&self) -> TagTemplate {
        self.fields
            .iter()
            .fold(TagTemplate::new(), |template, f| match f.kind {
                FieldKind::Tag(field) => template.with(field, f.input.value()),
                FieldKind::Filename => template,
            })
    }

    /// Leaves vim insert mode. Returns false if there was nothing to leave.
    fn leave_insert_mode(&mut self) -> bool {
        if self.vim != Some(VimMode::Insert) {
            return false;
        }
        self.vim = Some(VimMode::Normal);
        self.input().handle(InputRequest::GoToPrevChar);
        true
    }

    fn enter_insert_mode(&mut self, then: Option<InputRequest>) {
        self.vim = Some(VimMode::Insert);
        if let Some(request) = then {
            self.input().handle(request);
        }
    }

    /// Handles a key that is not bound in the text field context.
    fn handle_text_key(&mut self, key: KeyEvent) {
        if self.vim == Some(VimMode::Normal) {
            self.handle_normal_mode_key(key);
        } else {
            self.input().handle_event(&Event::Key(key));
        }
    }

    fn handle_normal_mode_key(&mut self, key: KeyEvent) {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return;
        }

        let request = match key.code {
            KeyCode::Char('h') | KeyCode::Backspace => InputRequest::GoToPrevChar,
            KeyCode::Char('l') | KeyCode::Char(' ') => InputRequest::GoToNextChar,
            KeyCode::Char('x') => InputRequest::DeleteNextChar,
            KeyCode::Char('X') => InputRequest::DeletePrevChar,
            KeyCode::Char('j') => return self.next_field(),
            KeyCode::Char('k') => return self.prev_field(),
            KeyCode::Char('i') => return self.enter_insert_mode(None),
            KeyCode::Char('a') => return self.enter_insert_mode(Some(InputRequest::GoToNextChar)),
            KeyCode::Char('A') => return self.enter_insert_mode(Some(InputRequest::GoToEnd)),
            KeyCode::Char(_) => return,
            _ => {
                self.input().handle_event(&Event::Key(key));
                return;
            }
        };

        self.input().handle(request);
    }
}

/// The path a file moves to when its filename field is changed.
///
/// The extension is kept. Returns `None` when the name is unchanged.
fn renamed_path(path: &Path, stem: &str) -> Result<Option<PathBuf>> {
    let stem = stem.trim();
    if stem.is_empty() {
        return Err(AppError::validation("Filename cannot be empty"));
    }
    if stem.contains('/') || stem.contains(MAIN_SEPARATOR) {
        return Err(AppError::validation("Filename cannot contain a path separator"));
    }

    let mut name = stem.to_string();
    if let Some(ext) = path.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }

    let renamed = path.with_file_name(name);
    if renamed == path {
        return Ok(None);
    }
    if renamed.exists() {
        return Err(AppError::validation(format!(
            "{} already exists",
            renamed.display()
        )));
    }

    Ok(Some(renamed))
}

impl MainViewController {
    fn vim_enabled(&self) -> bool {
        self.prefs.is_enabled(PrefOption::VimMode)
    }

    /// Opens the single edit form, reading fresh tags from the file.
    pub(super) fn open_single(&mut self, path: PathBuf) {
        match self.store.read_tags(&path) {
            Ok(record) => {
                self.library.update_record(record.clone());
                let vim = self.vim_enabled();
                self.editor = Some(EditForm::new(Target::Single(record), vim, self.last_field));
                self.state = ViewState::EditingSingle;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot open file for editing");
                self.error(&e);
            }
        }
    }

    /// Opens the batch edit form. Fails without opening if any file in the
    /// edit set cannot be read.
    pub(super) fn open_batch(&mut self, paths: Vec<PathBuf>) {
        let records: Result<Vec<_>> = paths.iter().map(|p| self.store.read_tags(p)).collect();

        match records {
            Ok(records) => {
                for record in &records {
                    self.library.update_record(record.clone());
                }
                let vim = self.vim_enabled();
                self.editor = Some(EditForm::new(Target::Batch(records), vim, self.last_field));
                self.state = ViewState::EditingBatch;
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot open files for batch editing");
                self.error(&e);
            }
        }
    }

    pub(super) fn handle_editor_key(&mut self, key: KeyEvent) -> Flow {
        let Some(form) = self.editor.as_mut() else {
            self.state = ViewState::Browsing;
            return Flow::Continue;
        };

        if let Some(dropdown) = form.dropdown.as_mut() {
            let len = dropdown.candidates.len();
            match self.keys.resolve(Context::GenreDropdown, &key) {
                Some(Action::DropdownNext) => dropdown.index = (dropdown.index + 1) % len,
                Some(Action::DropdownPrev) => dropdown.index = (dropdown.index + len - 1) % len,
                Some(Action::DropdownAccept) => {
                    let genre = dropdown.candidates[dropdown.index];
                    form.dropdown = None;
                    form.set_focused_value(genre);
                }
                Some(Action::DropdownCancel) => form.dropdown = None,
                _ => {}
            }
            return Flow::Continue;
        }

        match self.keys.resolve(Context::TextField, &key) {
            Some(Action::SaveTags) => self.save_edit(),
            Some(Action::CancelSavingTags) => {
                if !form.leave_insert_mode() {
                    self.close_edit();
                }
            }
            Some(Action::NextField | Action::SubmitField) => form.next_field(),
            Some(Action::PrevField) => form.prev_field(),
            Some(Action::CompleteGenre) => self.complete_genre(),
            _ => form.handle_text_key(key),
        }

        Flow::Continue
    }

    fn complete_genre(&mut self) {
        let Some(form) = self.editor.as_mut() else {
            return;
        };
        if form.focused_kind() != FieldKind::Tag(TagField::Genre) {
            return;
        }

        let candidates = genres::completions(form.fields[form.focus].input.value());
        match candidates.len() {
            0 => self.info("No matching genre"),
            1 => form.set_focused_value(candidates[0]),
            _ => {
                form.dropdown = Some(GenreDropdown {
                    candidates,
                    index: 0,
                })
            }
        }
    }

    /// Leaves the form without writing anything.
    fn close_edit(&mut self) {
        if let Some(form) = self.editor.take() {
            self.last_field = Some(form.focused_kind());
        }
        self.state = ViewState::Browsing;
    }

    fn save_edit(&mut self) {
        let Some(form) = self.editor.take() else {
            return;
        };

        let result = match &form.target {
            Target::Single(original) => self.commit_single(&form, original),
            Target::Batch(records) => self.commit_batch(&form, records),
        };

        match result {
            Ok(message) => {
                self.last_field = Some(form.focused_kind());
                self.state = ViewState::Browsing;
                self.info(message);
            }
            Err(e) => {
                self.error(&e);
                self.editor = Some(form);
            }
        }
    }

    fn commit_single(&mut self, form: &EditForm, original: &TagRecord) -> Result<String> {
        let mut updated = original.clone();
        updated.mark_clean();
        for f in &form.fields {
            if let FieldKind::Tag(field) = f.kind {
                updated.set(field, f.input.value())?;
            }
        }

        let renamed = match form.value(FieldKind::Filename) {
            Some(stem) => renamed_path(original.path(), stem)?,
            None => None,
        };

        let plan = WritePlan::single(original.clone(), updated.clone());
        merge::commit(self.store.as_ref(), &plan)?;

        if let Some(new_path) = &renamed
            && let Err(e) = self.store.rename(original.path(), new_path)
        {
            tracing::error!(path = %original.path().display(), error = %e, "rename failed, restoring tags");
            merge::revert(self.store.as_ref(), &plan);
            return Err(e);
        }

        self.library.update_record(updated);

        match renamed {
            Some(new_path) => {
                self.follow_rename(original.path(), new_path.clone());
                Ok(format!("Saved and renamed to {}", new_path.display()))
            }
            None if plan.is_empty() => Ok("Nothing to save".to_string()),
            None => Ok("Saved tags".to_string()),
        }
    }

    /// Moves every reference to a renamed file over to its new path.
    fn follow_rename(&mut self, old: &Path, new: PathBuf) {
        self.library.replace_entry(old, new.clone());
        self.selection.rename(old, &new);
        self.refresh_search();
        self.retarget(Some(new));
    }

    fn commit_batch(&mut self, form: &EditForm, records: &[TagRecord]) -> Result<String> {
        let plan = merge::plan(&form.template(), records)?;
        merge::commit(self.store.as_ref(), &plan)?;

        for write in plan.writes() {
            self.library.update_record(write.updated().clone());
        }
        self.selection.clear();

        Ok(format!("Saved tags to {} of {} files", plan.len(), records.len()))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crossterm::event::KeyCode;

    use super::*;
    use crate::controller::{StatusKind, tests::Fixture};

    fn focused_value(fx: &Fixture) -> String {
        let form = fx.controller.editor().unwrap();
        form.fields()[form.focus()].input.value().to_string()
    }

    fn tab(fx: &mut Fixture, times: usize) {
        for _ in 0..times {
            fx.press(KeyCode::Tab);
        }
    }

    #[test]
    fn single_edit_writes_changed_fields() {
        let mut fx = Fixture::new(&["a", "b"]);

        fx.press(KeyCode::Enter);
        assert_eq!(fx.controller.state(), ViewState::EditingSingle);
        tab(&mut fx, 2);
        fx.type_text("Blue");
        fx.ctrl('s');

        assert_eq!(fx.controller.state(), ViewState::Browsing);
        let record = fx.store.record(&fx.path("a"));
        assert_eq!(record.album, "Blue");
        assert_eq!(record.title, "a");
        assert_eq!(fx.store.writes().len(), 1);
        assert_eq!(
            fx.controller.library().record(Path::new(&fx.path("a"))).unwrap().album,
            "Blue"
        );
    }

    #[test]
    fn invalid_date_keeps_form_open() {
        let mut fx = Fixture::new(&["a"]);

        fx.press(KeyCode::Enter);
        tab(&mut fx, 6);
        fx.type_text("2019");
        fx.ctrl('s');

        assert_eq!(fx.controller.state(), ViewState::EditingSingle);
        assert_eq!(fx.controller.status().unwrap().kind, StatusKind::Error);
        assert!(fx.store.writes().is_empty());
        assert_eq!(focused_value(&fx), "2019");
    }

    #[test]
    fn cancel_leaves_tags_untouched() {
        let mut fx = Fixture::new(&["a", "b"]);
        let before = fx.store.record(&fx.path("a"));

        fx.press(KeyCode::Enter);
        tab(&mut fx, 1);
        fx.type_text("changed");
        fx.press(KeyCode::Esc);
        fx.press(KeyCode::Esc);

        assert_eq!(fx.controller.state(), ViewState::Browsing);
        assert!(fx.store.writes().is_empty());
        assert_eq!(fx.store.record(&fx.path("a")), before);
        assert_eq!(
            fx.controller.library().record(Path::new(&fx.path("a"))),
            Some(&before)
        );
    }

    #[test]
    fn batch_edit_includes_cursor_entry_and_clears_selection() {
        let mut fx = Fixture::new(&["a", "b", "c", "d"]);
        fx.press(KeyCode::Char(' '));
        fx.press(KeyCode::Char('j'));
        fx.press(KeyCode::Char(' '));
        fx.press(KeyCode::Char('j'));

        fx.press(KeyCode::Enter);
        assert_eq!(fx.controller.state(), ViewState::EditingBatch);
        assert_eq!(fx.controller.editor().unwrap().title(), "Batch tagging 3 files");

        tab(&mut fx, 1);
        fx.type_text("Shared");
        fx.ctrl('s');

        assert_eq!(fx.controller.state(), ViewState::Browsing);
        assert!(fx.controller.selection().is_empty());
        for name in ["a", "b", "c"] {
            let record = fx.store.record(&fx.path(name));
            assert_eq!(record.album, "Shared");
            assert_eq!(record.title, name);
        }
        assert_eq!(fx.store.record(&fx.path("d")).album, "");
    }

    #[test]
    fn batch_with_bad_track_number_writes_nothing() {
        let mut fx = Fixture::new(&["a", "b"]);
        fx.press(KeyCode::Char(' '));
        fx.press(KeyCode::Enter);

        tab(&mut fx, 1);
        fx.type_text("Shared");
        tab(&mut fx, 5);
        fx.type_text("abc");
        fx.ctrl('s');

        assert_eq!(fx.controller.state(), ViewState::EditingBatch);
        assert_eq!(fx.controller.status().unwrap().kind, StatusKind::Error);
        assert!(fx.store.writes().is_empty());
        assert_eq!(fx.controller.selection().len(), 1);
    }

    #[test]
    fn batch_write_failure_reports_file() {
        let mut fx = Fixture::new(&["a", "b"]);
        fx.store.fail_writes_to(&fx.path("b"));
        fx.press(KeyCode::Char(' '));
        fx.press(KeyCode::Char('j'));
        fx.press(KeyCode::Enter);

        tab(&mut fx, 1);
        fx.type_text("Shared");
        fx.ctrl('s');

        let status = fx.controller.status().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.contains("b.mp3"));
        assert_eq!(fx.store.record(&fx.path("a")).album, "");
        assert_eq!(fx.controller.state(), ViewState::EditingBatch);
    }

    #[test]
    fn batch_cancel_keeps_selection() {
        let mut fx = Fixture::new(&["a", "b"]);
        fx.press(KeyCode::Char(' '));
        fx.press(KeyCode::Enter);

        fx.press(KeyCode::Esc);

        assert_eq!(fx.controller.state(), ViewState::Browsing);
        assert_eq!(fx.controller.selection().len(), 1);
        assert!(fx.store.writes().is_empty());
    }

    #[test]
    fn filename_field_renames_file() {
        let mut fx = Fixture::new(&["a", "b"]);
        let old = fx.path("a");

        fx.press(KeyCode::Enter);
        fx.press(KeyCode::Backspace);
        fx.type_text("zed");
        fx.ctrl('s');

        let new = fx.path("zed");
        assert_eq!(fx.controller.state(), ViewState::Browsing);
        assert!(fx.store.has(&new));
        assert!(!fx.store.has(&old));
        assert_eq!(fx.controller.current_entry().unwrap().display_name, "zed");
    }

    #[test]
    fn failed_rename_restores_written_tags() {
        let mut fx = Fixture::new(&["a", "b"]);
        fx.store.fail_renames();
        let before = fx.store.record(&fx.path("a"));

        fx.press(KeyCode::Enter);
        fx.press(KeyCode::Backspace);
        fx.type_text("zed");
        tab(&mut fx, 2);
        fx.type_text("Blue");
        fx.ctrl('s');

        assert_eq!(fx.controller.state(), ViewState::EditingSingle);
        assert_eq!(fx.controller.status().unwrap().kind, StatusKind::Error);
        assert_eq!(fx.store.record(&fx.path("a")), before);
        assert!(!fx.store.has(&fx.path("zed")));
        assert_eq!(
            fx.controller.library().record(Path::new(&fx.path("a"))),
            Some(&before)
        );
    }

    #[test]
    fn rename_onto_existing_file_is_rejected() {
        let mut fx = Fixture::new(&["a", "b"]);

        fx.press(KeyCode::Enter);
        fx.press(KeyCode::Backspace);
        fx.type_text("b");
        fx.ctrl('s');

        assert_eq!(fx.controller.state(), ViewState::EditingSingle);
        assert_eq!(fx.controller.status().unwrap().kind, StatusKind::Error);
        assert!(fx.store.writes().is_empty());
    }

    #[test]
    fn unreadable_file_cannot_be_opened() {
        let mut fx = Fixture::new(&["a"]);
        let bad = fx.path("bad");
        std::fs::write(&bad, b"").unwrap();
        let store = crate::tags::memory::MemoryTagStore::new().with_unreadable(&bad);
        fx.controller.store = std::rc::Rc::new(store);

        fx.press(KeyCode::Char('u'));
        fx.press(KeyCode::Char('j'));
        assert!(fx.controller.preview_line().starts_with('!'));
        fx.press(KeyCode::Enter);

        assert_eq!(fx.controller.state(), ViewState::Browsing);
        assert_eq!(fx.controller.status().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn genre_completion_fills_single_match() {
        let mut fx = Fixture::new(&["a"]);

        fx.press(KeyCode::Enter);
        tab(&mut fx, 5);
        fx.type_text("synthp");
        fx.ctrl('g');

        assert_eq!(focused_value(&fx), "Synthpop");
    }

    #[test]
    fn genre_dropdown_picks_candidate() {
        let mut fx = Fixture::new(&["a"]);

        fx.press(KeyCode::Enter);
        tab(&mut fx, 5);
        fx.type_text("jaz");
        fx.ctrl('g');
        assert_eq!(
            fx.controller.editor().unwrap().dropdown().unwrap().candidates,
            vec!["Jazz", "Jazz+Funk", "Acid Jazz"]
        );

        fx.ctrl('n');
        fx.press(KeyCode::Enter);

        assert!(fx.controller.editor().unwrap().dropdown().is_none());
        assert_eq!(focused_value(&fx), "Jazz+Funk");
    }

    #[test]
    fn vim_mode_normal_and_insert_keys() {
        let mut fx = Fixture::new(&["apple"]);
        fx.type_text(":set vim_mode=on");
        fx.press(KeyCode::Enter);

        fx.press(KeyCode::Enter);
        assert_eq!(fx.controller.editor().unwrap().vim_mode(), Some(VimMode::Normal));

        fx.type_text("hx");
        assert_eq!(focused_value(&fx), "appl");

        fx.type_text("Aes");
        assert_eq!(focused_value(&fx), "apples");

        fx.press(KeyCode::Esc);
        assert_eq!(fx.controller.state(), ViewState::EditingSingle);
        assert_eq!(fx.controller.editor().unwrap().vim_mode(), Some(VimMode::Normal));

        fx.press(KeyCode::Char('j'));
        assert_eq!(fx.controller.editor().unwrap().focus(), 1);

        fx.press(KeyCode::Esc);
        assert_eq!(fx.controller.state(), ViewState::Browsing);
    }

    #[test]
    fn last_focused_field_is_remembered() {
        let mut fx = Fixture::new(&["a"]);

        fx.press(KeyCode::Enter);
        tab(&mut fx, 2);
        fx.press(KeyCode::Esc);

        fx.press(KeyCode::Enter);
        let form = fx.controller.editor().unwrap();
        assert_eq!(form.fields()[form.focus()].kind, FieldKind::Tag(TagField::Album));
    }

    #[test]
    fn renamed_path_keeps_extension() {
        let path = Path::new("/nonexistent/dir/old.flac");

        assert_eq!(
            renamed_path(path, "new").unwrap(),
            Some(PathBuf::from("/nonexistent/dir/new.flac"))
        );
        assert_eq!(renamed_path(path, "old").unwrap(), None);
        assert!(renamed_path(path, "  ").is_err());
        assert!(renamed_path(path, "a/b").is_err());
    }
}
