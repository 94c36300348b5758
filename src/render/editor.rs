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

//! Render the tag edit form.
//!
//! The form is a popup over the file list: one row per field with its
//! label and value, the focused row highlighted, and the genre completion
//! candidates listed below the form when open.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph},
};

use crate::{
    controller::editor::{EditForm, GenreDropdown, VimMode},
    render::centred,
    theme::Theme,
};

const LABEL_WIDTH: u16 = 14;

pub(crate) fn draw_editor(f: &mut Frame, area: Rect, form: &EditForm, theme: &Theme) {
    let fields = form.fields();
    let height = fields.len() as u16 + 4;
    let popup = centred(area, area.width.saturating_sub(8).max(40), height);

    let mut title = format!(" {} ", form.title());
    match form.vim_mode() {
        Some(VimMode::Normal) => title.push_str("[NORMAL] "),
        Some(VimMode::Insert) => title.push_str("[INSERT] "),
        None => {}
    }

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent_colour))
        .title(title)
        .padding(Padding::uniform(1));

    if form.is_batch() {
        block = block.title_bottom(Line::from(" Empty fields are left unchanged ").style(Style::default().fg(theme.help_fg)));
    }

    let inner = block.inner(popup);
    f.render_widget(Clear, popup);
    f.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(1)))
        .split(inner);

    for (i, (field, row)) in fields.iter().zip(rows.iter()).enumerate() {
        let focused = i == form.focus();

        let label_style = if focused {
            Style::default().fg(theme.accent_colour).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.label_fg)
        };

        let line = Line::from(vec![
            Span::styled(
                format!("{:>width$} ", field.kind.label(), width = LABEL_WIDTH as usize - 1),
                label_style,
            ),
            Span::styled(field.input.value(), Style::default().fg(theme.file_fg)),
        ]);
        f.render_widget(Paragraph::new(line), *row);

        if focused && form.dropdown().is_none() {
            let cursor_x = row.x + LABEL_WIDTH + field.input.cursor() as u16;
            f.set_cursor_position((cursor_x.min(row.right().saturating_sub(1)), row.y));
        }
    }

    if let Some(dropdown) = form.dropdown() {
        let anchor = rows.get(form.focus()).copied().unwrap_or(inner);
        draw_dropdown(f, area, anchor, dropdown, theme);
    }
}

fn draw_dropdown(f: &mut Frame, area: Rect, anchor: Rect, dropdown: &GenreDropdown, theme: &Theme) {
    let height = (dropdown.candidates.len() as u16 + 2).min(10);
    let width = dropdown
        .candidates
        .iter()
        .map(|genre| genre.len() as u16)
        .max()
        .unwrap_or(0)
        + 6;

    let x = anchor.x + LABEL_WIDTH;
    let y = anchor.y + 1;
    let rect = Rect {
        x,
        y,
        width: width.min(area.right().saturating_sub(x)),
        height: height.min(area.bottom().saturating_sub(y)),
    };

    let items: Vec<ListItem> = dropdown
        .candidates
        .iter()
        .map(|genre| ListItem::new(*genre))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_colour))
                .title(" Genre "),
        )
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(dropdown.index));

    f.render_widget(Clear, rect);
    f.render_stateful_widget(list, rect, &mut state);
}
