use std::path::PathBuf;
use std::time::Duration;

/// Where extracted artifacts end up.
///
/// Every extraction call receives this explicitly; nothing is stored on the
/// extractors themselves.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub photos_dir: PathBuf,
    pub text_file: PathBuf,
    pub links_file: PathBuf,
    /// Directory receiving the `<category>.json` result files.
    pub index_dir: PathBuf,
    pub fetch: FetchConfig,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            photos_dir: PathBuf::from("photos"),
            text_file: PathBuf::from("text_output.txt"),
            links_file: PathBuf::from("urls_output.txt"),
            index_dir: PathBuf::from("."),
            fetch: FetchConfig::default(),
        }
    }
}

impl ExtractConfig {

    pub fn with_photos_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.photos_dir = dir.into();
        self
    }

    pub fn with_text_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.text_file = file.into();
        self
    }

    pub fn with_links_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.links_file = file.into();
        self
    }

    pub fn with_index_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.index_dir = dir.into();
        self
    }

    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    /// Places every output under `root`, keeping the default file names.
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let defaults = Self::default();
        Self {
            photos_dir: root.join(defaults.photos_dir),
            text_file: root.join(defaults.text_file),
            links_file: root.join(defaults.links_file),
            index_dir: root,
            fetch: defaults.fetch,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// `None` waits forever.
    pub timeout: Option<Duration>,
    /// Reject non-2xx responses instead of parsing the error page.
    pub check_status: bool,
    pub user_agent: String,
}

impl FetchConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const USER_AGENT: &'static str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Self::DEFAULT_TIMEOUT),
            check_status: true,
            user_agent: Self::USER_AGENT.to_string(),
        }
    }
}
