pub mod config;
pub mod extractor;
pub mod fetch;
pub mod links;
pub mod page;
pub mod photos;
pub mod resolve;
pub mod text;

pub use config::{ExtractConfig, FetchConfig};
pub use extractor::{Category, ExtractError, ExtractionResult, Mode, SitePageExtractor};
pub use fetch::{Fetcher, HttpFetcher};
pub use page::WebPage;
