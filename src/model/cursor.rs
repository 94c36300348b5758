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

//! Cursor over the visible file list.

/// Position in the visible sequence plus the first row on screen.
///
/// All movement clamps to the list bounds. On an empty list every movement
/// is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct NavigationCursor {
    index: usize,
    offset: usize,
}

impl NavigationCursor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn up(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.index = self.index.saturating_sub(1).min(len - 1);
    }

    pub(crate) fn down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.index = (self.index + 1).min(len - 1);
    }

    pub(crate) fn page_up(&mut self, len: usize, page: usize) {
        if len == 0 {
            return;
        }
        self.index = self.index.saturating_sub(page.max(1)).min(len - 1);
    }

    pub(crate) fn page_down(&mut self, len: usize, page: usize) {
        if len == 0 {
            return;
        }
        self.index = self.index.saturating_add(page.max(1)).min(len - 1);
    }

    pub(crate) fn home(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.index = 0;
    }

    pub(crate) fn end(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.index = len - 1;
    }

    /// The full-list index of the entry under the cursor, if any.
    pub(crate) fn current(&self, visible: &[usize]) -> Option<usize> {
        visible.get(self.index).copied()
    }

    /// Moves to `entry` in the new visible sequence, or to the top if it is
    /// no longer visible.
    pub(crate) fn retarget(&mut self, entry: Option<usize>, visible: &[usize]) {
        self.index = entry
            .and_then(|entry| visible.iter().position(|&i| i == entry))
            .unwrap_or(0);
        self.offset = self.offset.min(self.index);
    }

    /// Adjusts the viewport so the cursor stays on screen and returns the
    /// first visible row.
    ///
    /// With `smooth` the list scrolls one line at a time. Without it, the
    /// cursor is recentred whenever it leaves the viewport.
    pub(crate) fn scroll(&mut self, len: usize, height: usize, smooth: bool) -> usize {
        if len <= height || height == 0 {
            self.offset = 0;
            return self.offset;
        }

        let max_offset = len - height;
        if self.index < self.offset || self.index >= self.offset + height {
            self.offset = if smooth {
                if self.index < self.offset {
                    self.index
                } else {
                    self.index + 1 - height
                }
            } else {
                self.index.saturating_sub(height / 2)
            };
        }

        self.offset = self.offset.min(max_offset);
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_clamps_to_bounds() {
        let mut cursor = NavigationCursor::new();

        cursor.up(5);
        assert_eq!(cursor.index(), 0);

        cursor.end(5);
        cursor.down(5);
        assert_eq!(cursor.index(), 4);

        cursor.page_up(5, 10);
        assert_eq!(cursor.index(), 0);

        cursor.page_down(5, 3);
        assert_eq!(cursor.index(), 3);
        cursor.page_down(5, 3);
        assert_eq!(cursor.index(), 4);
    }

    #[test]
    fn empty_list_is_a_no_op() {
        let mut cursor = NavigationCursor::new();

        cursor.up(0);
        cursor.down(0);
        cursor.page_up(0, 10);
        cursor.page_down(0, 10);
        cursor.home(0);
        cursor.end(0);

        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.current(&[]), None);
    }

    #[test]
    fn retarget_follows_visible_entry() {
        let mut cursor = NavigationCursor::new();
        cursor.end(5);
        let entry = cursor.current(&[0, 1, 2, 3, 4]);
        assert_eq!(entry, Some(4));

        cursor.retarget(entry, &[1, 4]);
        assert_eq!(cursor.index(), 1);
        assert_eq!(cursor.current(&[1, 4]), Some(4));
    }

    #[test]
    fn retarget_resets_when_entry_hidden() {
        let mut cursor = NavigationCursor::new();
        cursor.down(5);
        cursor.down(5);

        cursor.retarget(Some(2), &[0, 3]);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn smooth_scroll_moves_one_line() {
        let mut cursor = NavigationCursor::new();
        for _ in 0..10 {
            cursor.down(100);
        }

        assert_eq!(cursor.scroll(100, 10, true), 1);
        cursor.down(100);
        assert_eq!(cursor.scroll(100, 10, true), 2);
    }

    #[test]
    fn jump_scroll_recentres_cursor() {
        let mut cursor = NavigationCursor::new();
        for _ in 0..10 {
            cursor.down(100);
        }

        assert_eq!(cursor.scroll(100, 10, false), 5);
        cursor.down(100);
        assert_eq!(cursor.scroll(100, 10, false), 5);

        cursor.end(100);
        assert_eq!(cursor.scroll(100, 10, false), 90);
    }
}
