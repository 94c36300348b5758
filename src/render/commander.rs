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

//! Render the command-line and status line.
//!
//! The bottom row shows the command being typed while the command line is
//! open, and the latest status message otherwise.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Paragraph,
};

use crate::{
    controller::{MainViewController, StatusKind},
    theme::Theme,
    util,
};

pub(crate) fn draw_commander(f: &mut Frame, area: Rect, controller: &MainViewController, theme: &Theme) {
    let commander = controller.commander();

    let container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1)])
        .horizontal_margin(1)
        .split(area);

    if commander.active() {
        f.render_widget(
            Paragraph::new(format!(":{}", commander.input.value()))
                .style(Style::default().fg(theme.accent_colour).bg(theme.bar_colour)),
            container[0],
        );

        let cursor_x = container[0].x + 1 + commander.input.cursor() as u16;
        let cursor_y = container[0].y;
        f.set_cursor_position((cursor_x, cursor_y));
        return;
    }

    if let Some(status) = controller.status() {
        let colour = match status.kind {
            StatusKind::Info => theme.status_info_fg,
            StatusKind::Error => theme.status_error_fg,
        };

        let text = util::truncate(&status.text, container[0].width as usize);
        f.render_widget(Paragraph::new(text).style(Style::default().fg(colour)), container[0]);
    }
}
