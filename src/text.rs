use std::path::Path;

use scraper::ElementRef;
use thiserror::Error;
use tracing::info;

use crate::page::{self, PageError, WebPage, stripped_text};

#[derive(Error, Debug)]
pub enum TextError {
    #[error("PageError: {0}")]
    PageError(#[from] PageError),
    #[error("I/O error: {0}")]
    IOError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TextError>;

const TEXT_TAGS: &str = "p, h1, h2, h3, h4, h5, h6, table, div";

/// Removed from every emitted line, wherever it occurs.
pub const STRIPPED_FRAGMENT: &str = "вот";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {

    pub fn name(&self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
            Self::H6 => "h6",
        }
    }
}

/// Text-bearing tags the report knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Paragraph,
    Heading(HeadingLevel),
    Div,
    Table,
    Title,
}

impl TagKind {

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "p" => Some(Self::Paragraph),
            "h1" => Some(Self::Heading(HeadingLevel::H1)),
            "h2" => Some(Self::Heading(HeadingLevel::H2)),
            "h3" => Some(Self::Heading(HeadingLevel::H3)),
            "h4" => Some(Self::Heading(HeadingLevel::H4)),
            "h5" => Some(Self::Heading(HeadingLevel::H5)),
            "h6" => Some(Self::Heading(HeadingLevel::H6)),
            "div" => Some(Self::Div),
            "table" => Some(Self::Table),
            "title" => Some(Self::Title),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Paragraph => "p",
            Self::Heading(level) => level.name(),
            Self::Div => "div",
            Self::Table => "table",
            Self::Title => "title",
        }
    }
}

pub fn sanitize(text: &str) -> String {
    text.replace(STRIPPED_FRAGMENT, "")
}

pub fn format_line(kind: TagKind, text: &str) -> String {
    format!("Тег: {}, Текст: {}\n", kind.name(), sanitize(text))
}

/// Newline-terminated `Тег: <tag>, Текст: <text>` lines in document order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextReport {
    pub lines: Vec<String>,
}

impl TextReport {

    pub fn from_page(page: &WebPage) -> Result<Self> {

        let text_selector = page::selector(TEXT_TAGS)?;
        let mut report = TextReport::default();

        for element in page.document.select(&text_selector) {
            let Some(kind) = TagKind::from_name(element.value().name()) else { continue };

            let text = stripped_text(element);
            if text.is_empty() {
                continue;
            }

            match kind {
                TagKind::Table => report.push_table(element)?,
                _ => report.lines.push(format_line(kind, &text)),
            }
        }

        let title_selector = page::selector("title")?;
        if let Some(title) = page.document.select(&title_selector).next() {
            let text = stripped_text(title);
            if !text.is_empty() {
                report.lines.push(format_line(TagKind::Title, &text));
            }
        }

        Ok(report)
    }

    /// One line per non-empty `td`, never the table's aggregate text.
    fn push_table(&mut self, table: ElementRef<'_>) -> Result<()> {

        let row_selector = page::selector("tr")?;
        let cell_selector = page::selector("td")?;

        for row in table.select(&row_selector) {
            for cell in row.select(&cell_selector) {
                let text = stripped_text(cell);
                if !text.is_empty() {
                    self.lines.push(format_line(TagKind::Table, &text));
                }
            }
        }

        Ok(())
    }

    pub fn content(&self) -> String {
        self.lines.concat()
    }

    /// Overwrites `filename` with the report.
    pub fn write_to_disk(&self, filename: &Path) -> Result<()> {
        std::fs::write(filename, self.content())?;
        info!(lines = self.lines.len(), file = %filename.display(), "text report saved");
        Ok(())
    }
}
