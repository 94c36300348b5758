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

//! Render the file list and the search bar.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
};

use crate::{
    controller::{MainViewController, ViewState},
    keys::Action,
    model::search::SearchMode,
    render::help_line,
    theme::Theme,
};

/// Renders the visible slice of the file list with the cursor row
/// highlighted and selected files marked.
pub(crate) fn draw_files(f: &mut Frame, area: Rect, controller: &mut MainViewController, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_colour))
        .title(files_title(controller));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let height = inner.height as usize;
    let offset = controller.scroll_offset(height);
    let visible = controller.visible();
    let library = controller.library();
    let selection = controller.selection();

    let rows = visible.iter().skip(offset).take(height).filter_map(|&i| {
        let entry = library.entry(i)?;

        let unreadable = library.read_error(&entry.path).is_some();

        let marker = if selection.contains(&entry.path) {
            Line::from("+").style(Style::default().fg(Color::Black).bg(theme.accent_colour))
        } else if unreadable {
            Line::from("!").style(Style::default().fg(theme.status_error_fg))
        } else {
            Line::from("")
        };

        let name_style = if unreadable {
            Style::default().fg(theme.unreadable_fg).add_modifier(Modifier::ITALIC)
        } else if selection.contains(&entry.path) {
            Style::default().fg(theme.selected_fg)
        } else {
            Style::default().fg(theme.file_fg)
        };

        Some(Row::new(vec![
            Cell::from(marker),
            Cell::from(Line::from(entry.display_name.as_str()).style(name_style)),
        ]))
    });

    let table = Table::new(rows, [Constraint::Length(1), Constraint::Min(0)])
        .column_spacing(1)
        .row_highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

    let mut state = TableState::default();
    if !visible.is_empty() {
        state.select(Some(controller.cursor_index().saturating_sub(offset)));
    }

    f.render_stateful_widget(table, inner, &mut state);
}

fn files_title(controller: &MainViewController) -> String {
    let total = controller.library().len();
    let selected = controller.selection().len();

    let root = controller.library().root().display();

    let mut title = if controller.search().is_active() {
        format!(" {root} ({} of {total}) ", controller.search().matched().len())
    } else {
        format!(" {root} ({total}) ")
    };

    if selected > 0 {
        title.push_str(&format!("[{selected} selected] "));
    }

    title
}

/// Renders the search box while a search is being typed or applied, and
/// the key help otherwise.
pub(crate) fn draw_search_bar(f: &mut Frame, area: Rect, controller: &MainViewController, theme: &Theme) {
    let search = controller.search();

    let browsing = matches!(controller.state(), ViewState::Browsing | ViewState::Searching);

    if search.is_active() && browsing {
        let input = controller.search_input();
        let mut spans = vec![
            Span::styled("/", Style::default().fg(theme.accent_colour)),
            Span::raw(if search.is_editing() { input.value() } else { search.query() }),
        ];
        if search.mode() == SearchMode::Regex {
            spans.push(Span::styled("  [regex]", Style::default().fg(theme.help_fg)));
        }
        let line = Line::from(spans);
        f.render_widget(line, area);

        if controller.state() == ViewState::Searching && !controller.commander().active() {
            let cursor_x = area.x + 1 + input.cursor() as u16;
            f.set_cursor_position((cursor_x, area.y));
        }
        return;
    }

    let keys = controller.keys();
    let line = match controller.state() {
        ViewState::Browsing | ViewState::Searching => help_line(
            keys,
            &[
                (Action::Quit, "quit"),
                (Action::Search, "search"),
                (Action::ToggleSelect, "select"),
                (Action::Activate, "edit"),
                (Action::Reload, "reload"),
                (Action::Preferences, "preferences"),
            ],
            theme,
        ),
        ViewState::EditingSingle | ViewState::EditingBatch => help_line(
            keys,
            &[
                (Action::SaveTags, "save"),
                (Action::CancelSavingTags, "cancel"),
                (Action::NextField, "next field"),
                (Action::CompleteGenre, "complete genre"),
            ],
            theme,
        ),
        ViewState::PreferencesEdit => help_line(
            keys,
            &[
                (Action::Activate, "change"),
                (Action::FilesView, "files"),
                (Action::CommandLine, "command"),
            ],
            theme,
        ),
    };

    f.render_widget(line, area);
}
