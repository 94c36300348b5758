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

//! Render the preferences view.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
};

use crate::{config::PrefOption, controller::MainViewController, theme::Theme};

pub(crate) fn draw_preferences(f: &mut Frame, area: Rect, controller: &MainViewController, theme: &Theme) {
    let view = controller.preferences_view();
    let prefs = controller.prefs();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_colour))
        .title(format!(" Preferences ({}) ", prefs.path().display()));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let name_width = PrefOption::ALL
        .iter()
        .map(|option| option.name().len())
        .max()
        .unwrap_or(0) as u16;

    let rows = PrefOption::ALL.iter().enumerate().map(|(i, &option)| {
        let value = match view.editing() {
            Some(input) if i == view.index() => input.value().to_string(),
            _ => prefs.get(option),
        };

        Row::new(vec![
            Cell::from(Line::from(option.name()).style(Style::default().fg(theme.label_fg))),
            Cell::from(Line::from(value).style(Style::default().fg(theme.file_fg))),
        ])
    });

    let table = Table::new(rows, [Constraint::Length(name_width), Constraint::Min(0)])
        .column_spacing(2)
        .row_highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

    let mut state = TableState::default();
    state.select(Some(view.index()));
    f.render_stateful_widget(table, inner, &mut state);

    if let Some(input) = view.editing() {
        let cursor_x = inner.x + name_width + 2 + input.cursor() as u16;
        let cursor_y = inner.y + view.index() as u16;
        if cursor_y < inner.bottom() {
            f.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), cursor_y));
        }
    }
}
