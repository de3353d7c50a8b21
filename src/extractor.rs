use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::ExtractConfig;
use crate::fetch::Fetcher;
use crate::links::{Links, LinksError};
use crate::page::{PageError, WebPage};
use crate::photos::{Photos, PhotosError};
use crate::text::{TextError, TextReport};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Unsupported data type: {0} (expected photo, txt, urls or all)")]
    UnsupportedMode(String),
    #[error("PageError: {0}")]
    PageError(#[from] PageError),
    #[error("PhotosError: {0}")]
    PhotosError(#[from] PhotosError),
    #[error("TextError: {0}")]
    TextError(#[from] TextError),
    #[error("LinksError: {0}")]
    LinksError(#[from] LinksError),
    #[error("I/O Error: {0}")]
    IO(#[from] std::io::Error),
    #[error("JSON conversion error: {0}")]
    JsonConversionError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Photo,
    Text,
    Urls,
    All,
}

impl Mode {

    pub fn categories(&self) -> &'static [Category] {
        match self {
            Mode::Photo => &[Category::Photos],
            Mode::Text => &[Category::Text],
            Mode::Urls => &[Category::Urls],
            Mode::All => &[Category::Photos, Category::Text, Category::Urls],
        }
    }
}

impl FromStr for Mode {
    type Err = ExtractError;

    fn from_str(token: &str) -> Result<Self> {
        match token {
            "photo" => Ok(Mode::Photo),
            "txt" => Ok(Mode::Text),
            "urls" => Ok(Mode::Urls),
            "all" => Ok(Mode::All),
            other => Err(ExtractError::UnsupportedMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Photos,
    Text,
    Urls,
}

impl Category {

    /// Stem of the `<category>.json` index file.
    pub fn index_name(&self) -> &'static str {
        match self {
            Category::Photos => "photos",
            Category::Text => "text",
            Category::Urls => "urls",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.index_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    /// Every image reference, saved or skipped.
    PhotoList(Vec<String>),
    TextReport { path: PathBuf, content: String },
    LinkList(Vec<String>),
}

#[derive(Serialize)]
#[serde(untagged)]
enum IndexValue<'a> {
    List(&'a [String]),
    File(String),
}

impl ExtractionResult {

    pub fn category(&self) -> Category {
        match self {
            ExtractionResult::PhotoList(_) => Category::Photos,
            ExtractionResult::TextReport { .. } => Category::Text,
            ExtractionResult::LinkList(_) => Category::Urls,
        }
    }

    fn index_value(&self) -> IndexValue<'_> {
        match self {
            ExtractionResult::PhotoList(urls) | ExtractionResult::LinkList(urls) => IndexValue::List(urls),
            ExtractionResult::TextReport { path, .. } => IndexValue::File(path.display().to_string()),
        }
    }
}

/// Fetches one page and writes the requested artifacts.
pub struct SitePageExtractor<F: Fetcher> {
    fetcher: F,
    config: ExtractConfig,
}

impl<F: Fetcher> SitePageExtractor<F> {

    pub fn new(fetcher: F, config: ExtractConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Fetches `url` once, extracts every category of `mode`, then writes
    /// the JSON index. Nothing is indexed unless every category succeeded.
    pub fn run(&self, url: &str, mode: Mode) -> Result<Vec<ExtractionResult>> {

        let page = WebPage::load(&self.fetcher, url)?;

        let results = mode
            .categories()
            .iter()
            .map(|category| self.extract(&page, *category))
            .collect::<Result<Vec<_>>>()?;

        self.write_index(&results)?;

        Ok(results)
    }

    /// Validates the mode token before anything is fetched or written.
    pub fn run_token(&self, url: &str, token: &str) -> Result<Vec<ExtractionResult>> {
        let mode: Mode = token.parse()?;
        self.run(url, mode)
    }

    pub fn extract(&self, page: &WebPage, category: Category) -> Result<ExtractionResult> {
        match category {
            Category::Photos => self.extract_photos(page),
            Category::Text => self.extract_text(page),
            Category::Urls => self.extract_links(page),
        }
    }

    pub fn extract_photos(&self, page: &WebPage) -> Result<ExtractionResult> {
        let photos = Photos::extract(page, &self.fetcher, &self.config.photos_dir)?;
        Ok(ExtractionResult::PhotoList(photos.urls))
    }

    pub fn extract_text(&self, page: &WebPage) -> Result<ExtractionResult> {

        let report = TextReport::from_page(page)?;
        report.write_to_disk(&self.config.text_file)?;

        Ok(ExtractionResult::TextReport {
            path: self.config.text_file.clone(),
            content: report.content(),
        })
    }

    pub fn extract_links(&self, page: &WebPage) -> Result<ExtractionResult> {

        let links = Links::from_page(page)?;
        links.write_to_disk(&self.config.links_file)?;

        Ok(ExtractionResult::LinkList(links.0))
    }

    /// Writes `<category>.json` for each result, returning the written paths.
    pub fn write_index(&self, results: &[ExtractionResult]) -> Result<Vec<PathBuf>> {

        std::fs::create_dir_all(&self.config.index_dir)?;

        let mut written = Vec::with_capacity(results.len());
        for result in results {
            let output_path = self.config.index_dir.join(format!("{}.json", result.category()));
            let json = serde_json::to_string(&result.index_value())?;
            std::fs::write(&output_path, json)?;

            info!(file = %output_path.display(), "data saved");
            written.push(output_path);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::stub::StubFetcher;
    use crate::photos::photo_filename;
    use std::path::Path;

    const PAGE_URL: &str = "http://x.test/p";

    const PAGE: &str = r#"<html><head><title>Title вот</title></head><body>
        <h1>Welcome</h1>
        <img src="a.png"><img src="data:image/png;base64,AAA">
        <table><tr><td>вот1</td><td>2</td></tr></table>
        <a href="/one">1</a><a href="two">2</a>
        </body></html>"#;

    fn read_json(dir: &Path, name: &str) -> serde_json::Value {
        let raw = std::fs::read_to_string(dir.join(name)).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn parses_mode_tokens() {
        assert_eq!("photo".parse::<Mode>().unwrap(), Mode::Photo);
        assert_eq!("txt".parse::<Mode>().unwrap(), Mode::Text);
        assert_eq!("urls".parse::<Mode>().unwrap(), Mode::Urls);
        assert_eq!("all".parse::<Mode>().unwrap(), Mode::All);
        assert!(matches!("xml".parse::<Mode>(), Err(ExtractError::UnsupportedMode(t)) if t == "xml"));
        assert!("Photo".parse::<Mode>().is_err());
        assert!("".parse::<Mode>().is_err());
    }

    #[test]
    fn unsupported_token_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StubFetcher::new()
            .with(PAGE_URL, PAGE)
            .with("http://x.test/a.png", b"img".to_vec());
        let extractor = SitePageExtractor::new(&fetcher, ExtractConfig::rooted_at(dir.path()));

        let result = extractor.run_token(PAGE_URL, "xml");

        assert!(matches!(result, Err(ExtractError::UnsupportedMode(t)) if t == "xml"));
        assert_eq!(entries(dir.path()), 0);
        assert!(fetcher.requests.borrow().is_empty());
    }

    #[test]
    fn supported_token_runs_its_mode() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StubFetcher::new().with(PAGE_URL, PAGE);
        let extractor = SitePageExtractor::new(&fetcher, ExtractConfig::rooted_at(dir.path()));

        let results = extractor.run_token(PAGE_URL, "txt").unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].category(), Category::Text);
        assert!(dir.path().join("text.json").is_file());
    }

    #[test]
    fn all_mode_writes_every_artifact_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StubFetcher::new()
            .with(PAGE_URL, PAGE)
            .with("http://x.test/a.png", b"img".to_vec());
        let extractor = SitePageExtractor::new(&fetcher, ExtractConfig::rooted_at(dir.path()));

        let results = extractor.run(PAGE_URL, Mode::All).unwrap();

        let categories: Vec<_> = results.iter().map(ExtractionResult::category).collect();
        assert_eq!(categories, vec![Category::Photos, Category::Text, Category::Urls]);

        // page fetched once, then one download
        assert_eq!(*fetcher.requests.borrow(), vec![PAGE_URL, "http://x.test/a.png"]);

        let photo = dir.path().join("photos").join(photo_filename("http://x.test/a.png"));
        assert_eq!(std::fs::read(photo).unwrap(), b"img");

        let text = std::fs::read_to_string(dir.path().join("text_output.txt")).unwrap();
        assert_eq!(
            text,
            "Тег: h1, Текст: Welcome\n\
             Тег: table, Текст: 1\n\
             Тег: table, Текст: 2\n\
             Тег: title, Текст: Title \n"
        );

        let urls = std::fs::read_to_string(dir.path().join("urls_output.txt")).unwrap();
        assert_eq!(urls, "http://x.test/one\nhttp://x.test/two\n");

        assert_eq!(
            read_json(dir.path(), "photos.json"),
            serde_json::json!(["http://x.test/a.png", "data:image/png;base64,AAA"])
        );
        assert_eq!(
            read_json(dir.path(), "text.json"),
            serde_json::json!(dir.path().join("text_output.txt").display().to_string())
        );
        assert_eq!(
            read_json(dir.path(), "urls.json"),
            serde_json::json!(["http://x.test/one", "http://x.test/two"])
        );
    }

    #[test]
    fn single_mode_writes_only_its_category() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StubFetcher::new().with(PAGE_URL, PAGE);
        let extractor = SitePageExtractor::new(&fetcher, ExtractConfig::rooted_at(dir.path()));

        let results = extractor.run(PAGE_URL, Mode::Urls).unwrap();

        assert_eq!(
            results,
            vec![ExtractionResult::LinkList(vec![
                "http://x.test/one".to_string(),
                "http://x.test/two".to_string(),
            ])]
        );
        assert!(dir.path().join("urls.json").is_file());
        assert!(!dir.path().join("photos.json").exists());
        assert!(!dir.path().join("text.json").exists());
        assert!(!dir.path().join("photos").exists());
        assert_eq!(fetcher.requests.borrow().len(), 1);
    }

    #[test]
    fn empty_page_still_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StubFetcher::new().with(PAGE_URL, "");
        let extractor = SitePageExtractor::new(&fetcher, ExtractConfig::rooted_at(dir.path()));

        extractor.run(PAGE_URL, Mode::All).unwrap();

        assert_eq!(entries(&dir.path().join("photos")), 0);
        assert_eq!(std::fs::read_to_string(dir.path().join("text_output.txt")).unwrap(), "");
        assert_eq!(std::fs::read_to_string(dir.path().join("urls_output.txt")).unwrap(), "");
        assert_eq!(read_json(dir.path(), "photos.json"), serde_json::json!([]));
        assert_eq!(read_json(dir.path(), "urls.json"), serde_json::json!([]));
        assert!(read_json(dir.path(), "text.json").is_string());
    }

    #[test]
    fn failed_page_fetch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StubFetcher::new();
        let extractor = SitePageExtractor::new(&fetcher, ExtractConfig::rooted_at(dir.path()));

        let result = extractor.run(PAGE_URL, Mode::All);

        assert!(matches!(result, Err(ExtractError::PageError(_))));
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn failed_category_skips_index() {
        let dir = tempfile::tempdir().unwrap();
        // page is served but the image is not
        let fetcher = StubFetcher::new().with(PAGE_URL, PAGE);
        let extractor = SitePageExtractor::new(&fetcher, ExtractConfig::rooted_at(dir.path()));

        let result = extractor.run(PAGE_URL, Mode::All);

        assert!(matches!(result, Err(ExtractError::PhotosError(_))));
        assert!(!dir.path().join("photos.json").exists());
        assert!(!dir.path().join("text_output.txt").exists());
    }

    #[test]
    fn custom_file_names_are_honored() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StubFetcher::new().with(PAGE_URL, PAGE);
        let config = ExtractConfig::rooted_at(dir.path())
            .with_text_file(dir.path().join("report.txt"))
            .with_links_file(dir.path().join("links.txt"))
            .with_index_dir(dir.path().join("index"));
        let extractor = SitePageExtractor::new(&fetcher, config);

        extractor.run(PAGE_URL, Mode::Text).unwrap();
        extractor.run(PAGE_URL, Mode::Urls).unwrap();

        assert!(dir.path().join("report.txt").is_file());
        assert!(dir.path().join("links.txt").is_file());
        assert_eq!(
            read_json(&dir.path().join("index"), "text.json"),
            serde_json::json!(dir.path().join("report.txt").display().to_string())
        );
    }
}
