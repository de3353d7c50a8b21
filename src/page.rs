use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::{ParseError, Url};

use crate::fetch::{FetchError, Fetcher};

#[derive(Error, Debug)]
pub enum PageError {
    #[error("UrlError, can't parse given URL: {0}")]
    UrlError(#[from] ParseError),
    #[error("FetchError: {0}")]
    FetchError(#[from] FetchError),
    #[error("SelectorError: {0}")]
    SelectorError(String),
}

pub type Result<T> = std::result::Result<T, PageError>;

/// A fetched page, parsed once and shared by every extractor.
pub struct WebPage {
    pub url: Url,
    pub document: Html,
}

impl WebPage {

    pub fn load<F: Fetcher>(fetcher: &F, url: &str) -> Result<Self> {

        let url = Url::parse(url)?;
        let html = fetcher.fetch_text(&url)?;

        Ok(Self::from_html(url, &html))
    }

    pub fn from_html(url: Url, html: &str) -> Self {
        Self { url, document: Html::parse_document(html) }
    }
}

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| PageError::SelectorError(e.to_string()))
}

/// Elements whose text is code or inert markup, never page content.
const NON_CONTENT_TAGS: [&str; 3] = ["script", "style", "template"];

/// Descendant text nodes, each trimmed, empties dropped, joined by one space.
/// Text inside `script`, `style` and `template` is left out.
pub(crate) fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|el| NON_CONTENT_TAGS.contains(&el.value().name()));
            (!hidden).then_some(&**text)
        })
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
