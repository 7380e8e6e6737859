//! Partitioning of a book's tagged verses into contiguous blocks.

use crate::domain::VerseRecord;

/// A non-empty run of verses of one book whose absolute verse numbers are
/// consecutive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseBlock {
    verses: Vec<VerseRecord>,
}

impl VerseBlock {
    fn start(first: VerseRecord) -> Self {
        Self {
            verses: vec![first],
        }
    }

    fn continues_with(&self, verse: &VerseRecord) -> bool {
        self.last().absolute_verse_nr.checked_add(1) == Some(verse.absolute_verse_nr)
    }

    #[must_use]
    pub fn verses(&self) -> &[VerseRecord] {
        &self.verses
    }

    #[must_use]
    pub fn first(&self) -> &VerseRecord {
        &self.verses[0]
    }

    #[must_use]
    pub fn last(&self) -> &VerseRecord {
        &self.verses[self.verses.len() - 1]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.verses.len()
    }

    /// Always `false`; a block holds at least one verse.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// Renders the block's reference, e.g. `3:16`, `3:16-18` or `3:35-4:2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use versenav::domain::VerseRecord;
    /// use versenav::export::segment;
    ///
    /// let verse = |abs, chapter, nr| VerseRecord {
    ///     id: abs as i64,
    ///     bible_book_id: 1,
    ///     chapter,
    ///     verse_nr: nr,
    ///     absolute_verse_nr: abs,
    ///     content: String::new(),
    /// };
    ///
    /// let blocks = segment(1, &[verse(90, 3, 35), verse(91, 3, 36), verse(92, 4, 1)]);
    /// assert_eq!(blocks[0].reference(':'), "3:35-4:1");
    /// ```
    #[must_use]
    pub fn reference(&self, separator: char) -> String {
        let first = self.first();
        let start = format!("{}{separator}{}", first.chapter, first.verse_nr);
        if self.verses.len() < 2 {
            return start;
        }

        let last = self.last();
        if last.chapter == first.chapter {
            format!("{start}-{}", last.verse_nr)
        } else {
            format!("{start}-{}{separator}{}", last.chapter, last.verse_nr)
        }
    }
}

/// Splits the verses of `book_id` into blocks of consecutive absolute verse
/// numbers.
///
/// `verses` must be sorted ascending by absolute verse number. Verses of other
/// books are skipped. Concatenating the returned blocks reproduces the
/// filtered input exactly.
#[must_use]
pub fn segment(book_id: i64, verses: &[VerseRecord]) -> Vec<VerseBlock> {
    let mut blocks: Vec<VerseBlock> = Vec::new();

    for verse in verses.iter().filter(|v| v.bible_book_id == book_id) {
        match blocks.last_mut() {
            Some(block) if block.continues_with(verse) => block.verses.push(verse.clone()),
            _ => blocks.push(VerseBlock::start(verse.clone())),
        }
    }

    tracing::trace!(book_id, block_count = blocks.len(), "verses segmented");
    blocks
}
