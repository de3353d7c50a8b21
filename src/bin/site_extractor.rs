use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use site_extractor::{ExtractConfig, FetchConfig, HttpFetcher, SitePageExtractor};

/// Fetches a webpage and saves its photos, text or links
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// URL of the webpage to analyse, asked for when missing
    url: Option<String>,

    /// What to extract: photo, txt, urls or all, asked for when missing
    mode: Option<String>,

    /// Directory receiving downloaded photos
    #[arg(long, default_value = "photos")]
    photos_dir: PathBuf,

    /// File receiving the text report
    #[arg(long, default_value = "text_output.txt")]
    text_file: PathBuf,

    /// File receiving the link list
    #[arg(long, default_value = "urls_output.txt")]
    links_file: PathBuf,

    /// Directory receiving the <category>.json result files
    #[arg(long, default_value = ".")]
    index_dir: PathBuf,

    /// Request timeout in seconds, 0 waits forever
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Parse error pages instead of failing on non-2xx responses
    #[arg(long)]
    lenient: bool,
}

impl Args {
    fn config(&self) -> ExtractConfig {
        let fetch = FetchConfig {
            timeout: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
            check_status: !self.lenient,
            ..FetchConfig::default()
        };

        ExtractConfig::default()
            .with_photos_dir(&self.photos_dir)
            .with_text_file(&self.text_file)
            .with_links_file(&self.links_file)
            .with_index_dir(&self.index_dir)
            .with_fetch(fetch)
    }
}

fn prompt(question: &str) -> io::Result<String> {
    print!("{}", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let url = match &args.url {
        Some(url) => url.clone(),
        None => prompt("Website URL to analyse: ")?,
    };
    let token = match &args.mode {
        Some(mode) => mode.clone(),
        None => prompt("What to analyse (photo, txt, urls, all): ")?,
    };

    let config = args.config();
    let fetcher = HttpFetcher::new(&config.fetch).context("Can't build HTTP client")?;
    let extractor = SitePageExtractor::new(fetcher, config);

    // an unsupported token fails here, before anything is fetched or written
    let results = extractor
        .run_token(&url, &token)
        .with_context(|| format!("Can't extract {} from {}", token, url))?;

    for result in &results {
        println!(
            "Data saved to {}",
            extractor.config().index_dir.join(format!("{}.json", result.category())).display()
        );
    }

    Ok(())
}
