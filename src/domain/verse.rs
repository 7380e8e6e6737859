//! Verse records and verse references.

use serde::{Deserialize, Serialize};

/// A single verse as delivered by the verse collaborator.
///
/// `absolute_verse_nr` increases monotonically across a whole translation and
/// is the only field used to detect contiguity between verses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseRecord {
    pub id: i64,
    pub bible_book_id: i64,
    pub chapter: u32,
    pub verse_nr: u32,
    pub absolute_verse_nr: u64,
    pub content: String,
}

/// Where a rendered verse lives: its book code plus chapter and verse.
///
/// Produced by the host for hover and search-hit events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseLocation {
    pub book_code: String,
    pub chapter: u32,
    pub verse: u32,
}

impl VerseLocation {
    #[must_use]
    pub fn new(book_code: impl Into<String>, chapter: u32, verse: u32) -> Self {
        Self {
            book_code: book_code.into(),
            chapter,
            verse,
        }
    }
}

/// Parses a `chapter<sep>verse` reference such as `"3:16"`.
///
/// Returns `None` when either part is missing or not a number.
///
/// # Examples
///
/// ```
/// use versenav::domain::parse_reference;
///
/// assert_eq!(parse_reference("3:16", ':'), Some((3, 16)));
/// assert_eq!(parse_reference("3", ':'), None);
/// ```
#[must_use]
pub fn parse_reference(reference: &str, separator: char) -> Option<(u32, u32)> {
    let (chapter, verse) = reference.trim().split_once(separator)?;
    Some((chapter.trim().parse().ok()?, verse.trim().parse().ok()?))
}
