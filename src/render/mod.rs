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

//! User interface rendering logic.
//!
//! This module translates the [`MainViewController`] state into widgets
//! using the `ratatui` framework. Nothing here changes what the controller
//! would do with the next key; the only feedback is the height of the file
//! list, which the controller needs for scrolling and paging.
//!
//! # Rendering Pipeline
//!
//! The primary entry point is the [`draw`] function, which is called after
//! every key press.
//!
//! [`MainViewController`]: crate::controller::MainViewController

mod browser;
mod commander;
mod editor;
mod preferences;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    App,
    controller::ViewState,
    keys::{Action, KeyBindingRegistry},
    render::{
        browser::{draw_files, draw_search_bar},
        commander::draw_commander,
        editor::draw_editor,
        preferences::draw_preferences,
    },
    theme::Theme,
};

/// Renders the user interface to the terminal frame.
///
/// The screen is split into the main pane (file list or preferences), the
/// tag preview of the entry under the cursor, a search or help bar, and the
/// status or command line. Edit forms are drawn as a popup over the file
/// list.
pub(crate) fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    match app.controller.state() {
        ViewState::PreferencesEdit => draw_preferences(f, outer[0], &app.controller, &app.theme),
        _ => draw_files(f, outer[0], &mut app.controller, &app.theme),
    }

    f.render_widget(
        Paragraph::new(app.controller.preview_line())
            .style(Style::default().fg(app.theme.accent_colour).bg(app.theme.bar_colour)),
        outer[1],
    );

    draw_search_bar(f, outer[2], &app.controller, &app.theme);

    if let Some(form) = app.controller.editor() {
        draw_editor(f, outer[0], form, &app.theme);
    }

    draw_commander(f, outer[3], &app.controller, &app.theme);
}

/// Builds a help line of `chord label` pairs for the given actions.
fn help_line<'a>(keys: &KeyBindingRegistry, entries: &[(Action, &'a str)], theme: &Theme) -> Line<'a> {
    let mut spans = Vec::with_capacity(entries.len() * 2);

    for (action, label) in entries {
        spans.push(Span::styled(
            format!(" {} ", keys.chord_for(*action)),
            Style::default().fg(theme.accent_colour),
        ));
        spans.push(Span::styled(*label, Style::default().fg(theme.help_fg)));
    }

    Line::from(spans)
}

/// A rectangle of the given size centred in `area`, clipped to fit.
fn centred(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
