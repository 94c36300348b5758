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

//! Preview line formatting.
//!
//! The preview line under the file list shows the tags of the file under
//! the cursor, laid out by a user-configurable format string such as
//! `%a - %l [%n] %t (%y)`.

use crate::{
    error::{AppError, Result},
    model::{TagField, TagRecord},
};

/// One piece of a compiled format string.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Field(TagField),
}

/// A preview format string compiled into literal text and tag specifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PreviewFormat {
    source: String,
    tokens: Vec<Token>,
}

fn specifier(c: char) -> Option<TagField> {
    match c {
        't' => Some(TagField::Title),
        'a' => Some(TagField::Artist),
        'l' => Some(TagField::Album),
        'n' => Some(TagField::TrackNumber),
        'c' => Some(TagField::Comment),
        'A' => Some(TagField::AlbumArtist),
        'y' => Some(TagField::Date),
        'g' => Some(TagField::Genre),
        _ => None,
    }
}

/// Checks that `format` is a well-formed preview format.
///
/// The only malformed case is a trailing `%` with nothing after it.
pub(crate) fn validate_format(format: &str) -> Result<()> {
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c == '%' && chars.next().is_none() {
            return Err(AppError::invalid_option(
                "preview_format",
                "format string ends with a lone '%'",
            ));
        }
    }
    Ok(())
}

impl PreviewFormat {
    /// Compiles a format string.
    ///
    /// # Specifiers
    ///
    /// * `%t` title, `%a` artist, `%l` album, `%n` track number
    /// * `%c` comment, `%A` album artist, `%y` date, `%g` genre
    ///
    /// Any other `%x` sequence is kept as literal text.
    pub(crate) fn compile(format: &str) -> Self {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = format.chars();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }

            match chars.next() {
                Some(next) => match specifier(next) {
                    Some(field) => {
                        if !literal.is_empty() {
                            tokens.push(Token::Literal(std::mem::take(&mut literal)));
                        }
                        tokens.push(Token::Field(field));
                    }
                    None => {
                        literal.push('%');
                        literal.push(next);
                    }
                },
                None => literal.push('%'),
            }
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Self {
            source: format.to_string(),
            tokens,
        }
    }

    pub(crate) fn source(&self) -> &str {
        &self.source
    }

    /// Expands the format for `record`. Empty tags expand to nothing.
    pub(crate) fn render(&self, record: &TagRecord) -> String {
        self.tokens
            .iter()
            .map(|token| match token {
                Token::Literal(text) => text.clone(),
                Token::Field(field) => record.get(*field),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_default_format_with_blank_date() {
        let mut record = TagRecord::new("/m/z.mp3");
        record.artist = "X".into();
        record.album = "Y".into();
        record.track_number = Some(3);
        record.title = "Z".into();

        let format = PreviewFormat::compile("%a - %l [%n] %t (%y)");

        assert_eq!(format.render(&record), "X - Y [3] Z ()");
    }

    #[test]
    fn all_specifiers_expand() {
        let mut record = TagRecord::new("/m/z.mp3");
        record.title = "t".into();
        record.artist = "a".into();
        record.album = "l".into();
        record.track_number = Some(9);
        record.comment = "c".into();
        record.album_artist = "A".into();
        record.date = "2001-02-03".into();
        record.genre = "g".into();

        let format = PreviewFormat::compile("%t|%a|%l|%n|%c|%A|%y|%g");

        assert_eq!(format.render(&record), "t|a|l|9|c|A|2001-02-03|g");
    }

    #[test]
    fn unknown_specifiers_pass_through() {
        let record = TagRecord::new("/m/z.mp3");

        assert_eq!(PreviewFormat::compile("100%% %x %").render(&record), "100%% %x %");
    }

    #[test]
    fn empty_record_renders_literals_only() {
        let record = TagRecord::new("/m/z.mp3");

        assert_eq!(PreviewFormat::compile("%t - %a").render(&record), " - ");
    }

    #[test]
    fn trailing_percent_is_rejected() {
        assert!(validate_format("%a - %t").is_ok());
        assert!(validate_format("100%%").is_ok());
        assert!(validate_format("%a %").is_err());
    }
}
