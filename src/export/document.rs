//! Rendering of tagged verses into an exportable document.
//!
//! [`DocumentExporter::render`] is a pure transform producing an
//! [`ExportDocument`]. Writing goes through a [`DocumentSink`]; a failing sink
//! is reported as [`BrowserError::ExportIo`] and leaves nothing else changed,
//! so the export can simply be retried.

use super::segment::segment;
use crate::domain::{BibleBook, BrowserError, Result, VerseRecord};
use std::io::Write;
use std::path::PathBuf;

/// Prefix of the document title line.
pub const TITLE_PREFIX: &str = "Bible verses tagged with: ";

/// One line of an exported document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocLine {
    Title(String),
    BookHeading(String),
    /// Block reference such as `Genesis 1:1-3`.
    Reference(String),
    /// A verse; the number is set apart from the content when written.
    Verse { number: u32, content: String },
    Blank,
}

/// Structured body of an export, independent of the output format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportDocument {
    lines: Vec<DocLine>,
}

impl ExportDocument {
    #[must_use]
    pub fn lines(&self) -> &[DocLine] {
        &self.lines
    }

    /// Plain-text rendering with superscript verse numbers.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line {
                DocLine::Title(text) | DocLine::BookHeading(text) | DocLine::Reference(text) => {
                    out.push_str(text);
                }
                DocLine::Verse { number, content } => {
                    out.push_str(&superscript(*number));
                    out.push(' ');
                    out.push_str(content);
                }
                DocLine::Blank => {}
            }
            out.push('\n');
        }
        out
    }
}

fn superscript(number: u32) -> String {
    const DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
    number
        .to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| DIGITS[d as usize])
        .collect()
}

/// Destination of an exported document.
pub trait DocumentSink {
    /// Writes the whole document.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the document cannot be written.
    fn write_document(&mut self, document: &ExportDocument) -> std::io::Result<()>;
}

/// Writes the plain-text rendering to any writer.
#[derive(Debug)]
pub struct TextSink<W: Write> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DocumentSink for TextSink<W> {
    fn write_document(&mut self, document: &ExportDocument) -> std::io::Result<()> {
        self.writer.write_all(document.to_text().as_bytes())?;
        self.writer.flush()
    }
}

/// Writes the plain-text rendering to a file, replacing it atomically.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl DocumentSink for FileSink {
    fn write_document(&mut self, document: &ExportDocument) -> std::io::Result<()> {
        let tmp_path = self.path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing export to temporary file");
        std::fs::write(&tmp_path, document.to_text())?;
        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e);
        }

        tracing::debug!(path = ?self.path, "export written");
        Ok(())
    }
}

/// Turns a tagged verse dataset into an [`ExportDocument`].
#[derive(Debug, Clone, Copy)]
pub struct DocumentExporter {
    reference_separator: char,
}

impl Default for DocumentExporter {
    fn default() -> Self {
        Self::new(crate::DEFAULT_REFERENCE_SEPARATOR)
    }
}

impl DocumentExporter {
    #[must_use]
    pub const fn new(reference_separator: char) -> Self {
        Self {
            reference_separator,
        }
    }

    /// Renders `books` in the given order. Every book gets a heading followed
    /// by its verse blocks; `verses` must be sorted by absolute verse number.
    ///
    /// # Examples
    ///
    /// ```
    /// use versenav::domain::{BibleBook, VerseRecord};
    /// use versenav::export::{DocLine, DocumentExporter};
    ///
    /// let books = vec![BibleBook::new(1, "Gen", "Genesis", 1)];
    /// let verses = vec![VerseRecord {
    ///     id: 1,
    ///     bible_book_id: 1,
    ///     chapter: 1,
    ///     verse_nr: 1,
    ///     absolute_verse_nr: 1,
    ///     content: "In the beginning".into(),
    /// }];
    ///
    /// let document = DocumentExporter::default().render("creation", &books, &verses);
    /// assert_eq!(document.lines()[0], DocLine::Title("Bible verses tagged with: creation".into()));
    /// assert!(document.lines().contains(&DocLine::Reference("Genesis 1:1".into())));
    /// ```
    #[must_use]
    pub fn render(&self, tag_titles: &str, books: &[BibleBook], verses: &[VerseRecord]) -> ExportDocument {
        let _span = tracing::debug_span!(
            "render_export",
            book_count = books.len(),
            verse_count = verses.len()
        )
        .entered();

        let mut lines = vec![DocLine::Title(format!("{TITLE_PREFIX}{tag_titles}")), DocLine::Blank];

        for book in books {
            lines.push(DocLine::BookHeading(book.long_title.clone()));

            for block in segment(book.id, verses) {
                lines.push(DocLine::Reference(format!(
                    "{} {}",
                    book.long_title,
                    block.reference(self.reference_separator)
                )));
                lines.extend(block.verses().iter().map(|verse| DocLine::Verse {
                    number: verse.verse_nr,
                    content: verse.content.clone(),
                }));
                lines.push(DocLine::Blank);
            }

            lines.push(DocLine::Blank);
        }

        ExportDocument { lines }
    }

    /// Writes `document` to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::ExportIo`] when the sink fails.
    pub fn write(&self, document: &ExportDocument, sink: &mut dyn DocumentSink) -> Result<()> {
        sink.write_document(document).map_err(|e| {
            tracing::error!(error = %e, "export sink failed");
            BrowserError::ExportIo(e)
        })
    }
}
