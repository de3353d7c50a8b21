use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::page::{self, PageError, WebPage};
use crate::resolve;

#[derive(Error, Debug)]
pub enum LinksError {
    #[error("PageError: {0}")]
    PageError(#[from] PageError),
    #[error("I/O error: {0}")]
    IOError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LinksError>;

/// Absolute targets of every `a[href]`, in document order, duplicates kept.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Links(pub Vec<String>);

impl Links {

    pub fn from_page(page: &WebPage) -> Result<Self> {

        let link_selector = page::selector("a[href]")?;

        let links = page
            .document
            .select(&link_selector)
            .filter_map(|a| a.value().attr("href"))
            .map(|href| resolve::absolute_url(&page.url, href))
            .collect();

        Ok(Self(links))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One URL per line, overwriting `filename`.
    pub fn write_to_disk(&self, filename: &Path) -> Result<()> {

        let content: String = self.0.iter().map(|link| format!("{}\n", link)).collect();
        std::fs::write(filename, content)?;

        info!(links = self.len(), file = %filename.display(), "links saved");
        Ok(())
    }
}
