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

//! Live file list search.
//!
//! This module provides state for the incremental search over the file list.
//! A search is either being typed (every keystroke re-runs the query) or
//! confirmed (the filtered list stays on screen but the query is frozen).

use regex::Regex;

use crate::{
    error::{AppError, Result},
    model::FileEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SearchMode {
    /// Case-insensitive substring match.
    #[default]
    Literal,
    Regex,
}

#[derive(Debug, Default)]
pub(crate) struct SearchState {
    active: bool,
    editing: bool,
    query: String,
    mode: SearchMode,
    matched: Vec<usize>,
}

impl SearchState {
    pub(crate) fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing
    }

    pub(crate) fn query(&self) -> &str {
        &self.query
    }

    pub(crate) fn mode(&self) -> SearchMode {
        self.mode
    }

    pub(crate) fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
    }

    /// Indices into the full file list matched by the current query.
    pub(crate) fn matched(&self) -> &[usize] {
        &self.matched
    }

    /// Opens a new search. An empty query matches every entry.
    pub(crate) fn start(&mut self, entries: &[FileEntry]) {
        self.active = true;
        self.editing = true;
        self.query.clear();
        self.matched = (0..entries.len()).collect();
    }

    /// Re-runs the search with a new query while it is being typed.
    ///
    /// An invalid pattern leaves the previous results in place.
    pub(crate) fn update(&mut self, query: &str, entries: &[FileEntry]) -> Result<()> {
        if !self.editing {
            return Ok(());
        }

        self.matched = self.compute(query, entries)?;
        self.query = query.to_string();
        Ok(())
    }

    /// Re-applies the current query, e.g. after a rescan or a mode change.
    ///
    /// If the query no longer compiles the search is cancelled, since the
    /// old matches may index a different list.
    pub(crate) fn refresh(&mut self, entries: &[FileEntry]) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        match self.compute(&self.query, entries) {
            Ok(matched) => {
                self.matched = matched;
                Ok(())
            }
            Err(e) => {
                self.cancel();
                Err(e)
            }
        }
    }

    /// Freezes the query and keeps the filtered list. Confirming an empty
    /// query is the same as cancelling.
    pub(crate) fn confirm(&mut self) {
        if self.query.is_empty() {
            self.cancel();
        } else {
            self.editing = false;
        }
    }

    pub(crate) fn cancel(&mut self) {
        self.active = false;
        self.editing = false;
        self.query.clear();
        self.matched.clear();
    }

    fn compute(&self, query: &str, entries: &[FileEntry]) -> Result<Vec<usize>> {
        let matches: Box<dyn Fn(&str) -> bool> = match self.mode {
            SearchMode::Literal => {
                let needle = query.to_lowercase();
                Box::new(move |name: &str| name.to_lowercase().contains(&needle))
            }
            SearchMode::Regex => {
                let re = Regex::new(query).map_err(|e| AppError::SearchPattern(e.to_string()))?;
                Box::new(move |name: &str| re.is_match(name))
            }
        };

        Ok(entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| matches(&entry.display_name))
            .map(|(i, _)| i)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn entries(names: &[&str]) -> Vec<FileEntry> {
        names
            .iter()
            .map(|n| FileEntry::new(PathBuf::from(format!("/m/{n}.mp3"))))
            .collect()
    }

    #[test]
    fn literal_search_is_case_insensitive() {
        let list = entries(&["Blue Train", "Giant Steps", "blue in green"]);
        let mut search = SearchState::new(SearchMode::Literal);

        search.start(&list);
        assert_eq!(search.matched(), &[0, 1, 2]);

        search.update("BLUE", &list).unwrap();
        assert_eq!(search.matched(), &[0, 2]);
    }

    #[test]
    fn regex_search_matches_pattern() {
        let list = entries(&["01 Intro", "02 Song", "Bonus"]);
        let mut search = SearchState::new(SearchMode::Regex);

        search.start(&list);
        search.update(r"^\d+ ", &list).unwrap();

        assert_eq!(search.matched(), &[0, 1]);
    }

    #[test]
    fn invalid_regex_keeps_previous_results() {
        let list = entries(&["alpha", "beta"]);
        let mut search = SearchState::new(SearchMode::Regex);

        search.start(&list);
        search.update("alp", &list).unwrap();

        let err = search.update("alp(", &list).unwrap_err();
        assert!(matches!(err, AppError::SearchPattern(_)));
        assert_eq!(search.matched(), &[0]);
        assert_eq!(search.query(), "alp");
        assert!(search.is_active());
    }

    #[test]
    fn confirm_freezes_query() {
        let list = entries(&["alpha", "beta"]);
        let mut search = SearchState::new(SearchMode::Literal);

        search.start(&list);
        search.update("be", &list).unwrap();
        search.confirm();

        assert!(search.is_active());
        assert!(!search.is_editing());

        search.update("al", &list).unwrap();
        assert_eq!(search.matched(), &[1]);
        assert_eq!(search.query(), "be");
    }

    #[test]
    fn confirming_empty_query_cancels() {
        let list = entries(&["alpha"]);
        let mut search = SearchState::new(SearchMode::Literal);

        search.start(&list);
        search.confirm();

        assert!(!search.is_active());
        assert!(search.matched().is_empty());
    }

    #[test]
    fn cancel_clears_everything() {
        let list = entries(&["alpha", "beta"]);
        let mut search = SearchState::new(SearchMode::Literal);

        search.start(&list);
        search.update("zzz", &list).unwrap();
        search.cancel();

        assert!(!search.is_active());
        assert!(search.query().is_empty());
        assert!(search.matched().is_empty());
    }

    #[test]
    fn refresh_cancels_query_that_no_longer_compiles() {
        let list = entries(&["a(b", "c"]);
        let mut search = SearchState::new(SearchMode::Literal);

        search.start(&list);
        search.update("a(", &list).unwrap();
        search.confirm();
        assert_eq!(search.matched(), &[0]);

        search.set_mode(SearchMode::Regex);
        let err = search.refresh(&entries(&["c"])).unwrap_err();

        assert!(matches!(err, AppError::SearchPattern(_)));
        assert!(!search.is_active());
        assert!(search.matched().is_empty());
    }
}
