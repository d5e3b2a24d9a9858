use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::mohave::{MohaveScraper, RunSummary};
use crate::traits::Scraper;

/// One book-range scrape request.
#[derive(Debug, Clone)]
pub struct BookScrapeRequest {
    pub start_book: u32,
    pub end_book: u32,
    pub output_dir: PathBuf,
    pub from_date: String,
    pub to_date: String,
    pub property_type: String,
    pub headless: bool,
    pub debug: bool,
}

impl BookScrapeRequest {
    pub fn new(start_book: u32, end_book: u32) -> Self {
        let defaults = ScrapeConfig::default();
        Self {
            start_book,
            end_book,
            output_dir: defaults.output_dir,
            from_date: defaults.from_date,
            to_date: defaults.to_date,
            property_type: defaults.property_type,
            headless: defaults.headless,
            debug: defaults.debug,
        }
    }

    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    pub fn with_date_range(
        mut self,
        from_date: impl Into<String>,
        to_date: impl Into<String>,
    ) -> Self {
        self.from_date = from_date.into();
        self.to_date = to_date.into();
        self
    }

    pub fn with_property_type(mut self, property_type: impl Into<String>) -> Self {
        self.property_type = property_type.into();
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

impl From<&BookScrapeRequest> for ScrapeConfig {
    fn from(req: &BookScrapeRequest) -> Self {
        ScrapeConfig::new(req.from_date.clone(), req.to_date.clone())
            .with_output_dir(req.output_dir.clone())
            .with_property_type(req.property_type.clone())
            .with_headless(req.headless)
            .with_debug(req.debug)
    }
}

/// tower::Service front door around the scraper.
#[derive(Debug, Clone, Default)]
pub struct ScraperService {
    // Reserved for future extensions (rate limiting, caching).
}

impl ScraperService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Service<BookScrapeRequest> for ScraperService {
    type Response = RunSummary;
    type Error = ScrapeError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: BookScrapeRequest) -> Self::Future {
        info!(
            "scrape request received: books {} to {}",
            req.start_book, req.end_book
        );

        Box::pin(async move {
            let config: ScrapeConfig = (&req).into();
            let mut scraper = MohaveScraper::new(config);

            let summary = scraper.execute(req.start_book, req.end_book).await?;

            info!(
                "scrape request complete: success={}, failed={}, combined={:?}",
                summary.success_count, summary.fail_count, summary.combined_path
            );

            Ok(summary)
        })
    }
}
