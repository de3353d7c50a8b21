use reqwest::blocking::{Client, Response};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::FetchConfig;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("NetworkError: {0}")]
    Network(#[from] reqwest::Error),
    #[error("NetworkError, {url} answered with status {status}")]
    Status { url: String, status: u16 },
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// One blocking GET per call. Implemented over HTTP by [`HttpFetcher`].
pub trait Fetcher {

    /// Body decoded with the declared charset, UTF-8 when none is declared.
    fn fetch_text(&self, url: &Url) -> Result<String>;

    fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>>;
}

pub struct HttpFetcher {
    client: Client,
    check_status: bool,
}

impl HttpFetcher {

    pub fn new(config: &FetchConfig) -> Result<Self> {

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, check_status: config.check_status })
    }

    fn get(&self, url: &Url) -> Result<Response> {

        debug!(%url, "GET");
        let response = self.client.get(url.clone()).send()?;

        let status = response.status();
        if !status.is_success() {
            if self.check_status {
                return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
            }
            warn!(%url, status = status.as_u16(), "non-success response, using body anyway");
        }

        Ok(response)
    }
}

impl Fetcher for HttpFetcher {

    fn fetch_text(&self, url: &Url) -> Result<String> {
        Ok(self.get(url)?.text_with_charset("utf-8")?)
    }

    fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        Ok(self.get(url)?.bytes()?.to_vec())
    }
}

impl<F: Fetcher + ?Sized> Fetcher for &F {

    fn fetch_text(&self, url: &Url) -> Result<String> {
        (**self).fetch_text(url)
    }

    fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        (**self).fetch_bytes(url)
    }
}
