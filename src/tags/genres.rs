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

//! ID3v1 genre names.
//!
//! Some taggers store the genre as its ID3v1 number in parentheses, e.g.
//! `(17)`. Those values are resolved to their names when tags are read, and
//! the same table feeds genre completion in the edit form.

use std::sync::LazyLock;

use regex::Regex;

static NUMERIC_GENRE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\((\d+)\)$").expect("valid genre pattern"));

pub(crate) const GENRES: [&str; 148] = [
    "Blues", "Classic Rock", "Country", "Dance", "Disco", "Funk", "Grunge", "Hip-Hop",
    "Jazz", "Metal", "New Age", "Oldies", "Other", "Pop", "R&B", "Rap",
    "Reggae", "Rock", "Techno", "Industrial", "Alternative", "Ska", "Death Metal", "Pranks",
    "Soundtrack", "Euro-Techno", "Ambient", "Trip-Hop", "Vocal", "Jazz+Funk", "Fusion", "Trance",
    "Classical", "Instrumental", "Acid", "House", "Game", "Sound Clip", "Gospel", "Noise",
    "Alternative Rock", "Bass", "Soul", "Punk", "Space", "Meditative", "Instrumental Pop",
    "Instrumental Rock", "Ethnic", "Gothic", "Darkwave", "Techno-Industrial", "Electronic",
    "Pop-Folk", "Eurodance", "Dream", "Southern Rock", "Comedy", "Cult", "Gangsta", "Top 40",
    "Christian Rap", "Pop/Funk", "Jungle", "Native American", "Cabaret", "New Wave",
    "Psychedelic", "Rave", "Showtunes", "Trailer", "Lo-Fi", "Tribal", "Acid Punk", "Acid Jazz",
    "Polka", "Retro", "Musical", "Rock & Roll", "Hard Rock", "Folk", "Folk-Rock",
    "National Folk", "Swing", "Fast Fusion", "Bebop", "Latin", "Revival", "Celtic", "Bluegrass",
    "Avantgarde", "Gothic Rock", "Progressive Rock", "Psychedelic Rock", "Symphonic Rock",
    "Slow Rock", "Big Band", "Chorus", "Easy Listening", "Acoustic", "Humour", "Speech",
    "Chanson", "Opera", "Chamber Music", "Sonata", "Symphony", "Booty Bass", "Primus",
    "Porn Groove", "Satire", "Slow Jam", "Club", "Tango", "Samba", "Folklore", "Ballad",
    "Power Ballad", "Rhythmic Soul", "Freestyle", "Duet", "Punk Rock", "Drum Solo", "A Cappella",
    "Euro-House", "Dance Hall", "Goa", "Drum & Bass", "Club-House", "Hardcore", "Terror",
    "Indie", "BritPop", "Negerpunk", "Polsk Punk", "Beat", "Christian Gangsta Rap",
    "Heavy Metal", "Black Metal", "Crossover", "Contemporary Christian", "Christian Rock",
    "Merengue", "Salsa", "Thrash Metal", "Anime", "JPop", "Synthpop",
];

/// Turns a numeric genre like `(17)` into its name.
///
/// Values that are not numeric genres come back unchanged. A numeric genre
/// outside the table resolves to an empty string.
pub(crate) fn resolve_genre(value: &str) -> String {
    let Some(caps) = NUMERIC_GENRE.captures(value.trim()) else {
        return value.to_string();
    };

    caps[1]
        .parse::<usize>()
        .ok()
        .and_then(|n| GENRES.get(n))
        .map(|name| name.to_string())
        .unwrap_or_default()
}

/// Genre names containing `partial`, ignoring case.
pub(crate) fn completions(partial: &str) -> Vec<&'static str> {
    let needle = partial.trim().to_lowercase();
    GENRES
        .iter()
        .copied()
        .filter(|genre| genre.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_genres_resolve_to_names() {
        assert_eq!(resolve_genre("(17)"), "Rock");
        assert_eq!(resolve_genre("(0)"), "Blues");
        assert_eq!(resolve_genre("(999)"), "");
    }

    #[test]
    fn plain_genres_are_untouched() {
        assert_eq!(resolve_genre("Shoegaze"), "Shoegaze");
        assert_eq!(resolve_genre("17"), "17");
        assert_eq!(resolve_genre(""), "");
    }

    #[test]
    fn completions_match_substrings_ignoring_case() {
        let found = completions("jaz");
        assert!(found.contains(&"Jazz"));
        assert!(found.contains(&"Acid Jazz"));
        assert!(found.iter().all(|g| g.to_lowercase().contains("jaz")));

        assert_eq!(completions("synthp"), vec!["Synthpop"]);
        assert!(completions("zzzz").is_empty());
    }
}
