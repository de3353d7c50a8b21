use std::path::{Path, PathBuf};

use sha1::{Digest, Sha1};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::fetch::{FetchError, Fetcher};
use crate::page::{self, PageError, WebPage};
use crate::resolve;

#[derive(Error, Debug)]
pub enum PhotosError {
    #[error("PageError: {0}")]
    PageError(#[from] PageError),
    #[error("FetchError: {0}")]
    FetchError(#[from] FetchError),
    #[error("I/O error: {0}")]
    IOError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PhotosError>;

/// A downloaded photo and where it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub url: String,
    pub path: PathBuf,
}

/// Absolute image references in document order, with the files actually saved.
#[derive(Debug, Default)]
pub struct Photos {
    pub urls: Vec<String>,
    pub saved: Vec<SavedFile>,
}

/// `<sha1 hex of the absolute URL>.jpg`, whatever the real image format is.
pub fn photo_filename(url: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(url.as_bytes());
    format!("{:x}.jpg", hasher.finalize())
}

fn is_downloadable(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl Photos {

    /// Downloads every `img[src]` of `page` into `save_folder`.
    ///
    /// References with another protocol are skipped but still listed in `urls`.
    pub fn extract<F: Fetcher>(page: &WebPage, fetcher: &F, save_folder: &Path) -> Result<Self> {

        std::fs::create_dir_all(save_folder)?;

        let img_selector = page::selector("img[src]")?;
        let mut photos = Photos::default();

        for element in page.document.select(&img_selector) {
            let Some(src) = element.value().attr("src") else { continue };

            let photo_url = resolve::absolute_url(&page.url, src);

            if let Some(saved) = Self::save_photo(fetcher, &photo_url, save_folder)? {
                photos.saved.push(saved);
            }
            photos.urls.push(photo_url);
        }

        info!(found = photos.urls.len(), saved = photos.saved.len(), folder = %save_folder.display(), "photos extracted");

        Ok(photos)
    }

    fn save_photo<F: Fetcher>(fetcher: &F, photo_url: &str, save_folder: &Path) -> Result<Option<SavedFile>> {

        let target = match Url::parse(photo_url) {
            Ok(url) if is_downloadable(photo_url) => url,
            _ => {
                warn!(url = photo_url, "unsupported protocol, photo will not be saved");
                return Ok(None);
            }
        };

        let bytes = fetcher.fetch_bytes(&target)?;
        let path = save_folder.join(photo_filename(photo_url));
        std::fs::write(&path, bytes)?;

        Ok(Some(SavedFile { url: photo_url.to_string(), path }))
    }
}
