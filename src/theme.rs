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

//! Visual styling and color configuration for the TUI.

use ratatui::style::Color;

#[derive(Clone, Copy)]
pub(crate) struct Theme {
    pub(crate) accent_colour: Color,
    pub(crate) border_colour: Color,
    pub(crate) bar_colour: Color,

    pub(crate) file_fg: Color,
    pub(crate) selected_fg: Color,
    pub(crate) unreadable_fg: Color,
    pub(crate) label_fg: Color,
    pub(crate) help_fg: Color,

    pub(crate) status_info_fg: Color,
    pub(crate) status_error_fg: Color,
}

impl Default for Theme {
    // Returns the standard application theme.
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    // Constructs the default theme.
    pub(crate) const fn default_theme() -> Self {
        Self {
            accent_colour: Color::Rgb(250, 189, 47),
            border_colour: Color::Rgb(102, 102, 102),
            bar_colour: Color::Rgb(50, 30, 60),

            file_fg: Color::Rgb(255, 255, 255),
            selected_fg: Color::Rgb(255, 215, 0),
            unreadable_fg: Color::Rgb(162, 161, 166),
            label_fg: Color::Rgb(179, 157, 219),
            help_fg: Color::Rgb(162, 161, 166),

            status_info_fg: Color::Rgb(255, 255, 255),
            status_error_fg: Color::Rgb(255, 95, 95),
        }
    }
}
