//! Mohave County Affidavit of Value scraper: browser session lifecycle and
//! the per-book orchestration loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use chrono::Utc;
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::{ScrapeConfig, USER_AGENT};
use crate::error::ScrapeError;
use crate::traits::Scraper;

use super::output;
use super::paginate;
use super::search::{self, SearchOutcome};
use super::types::{BookOutcome, BookStatus, RunSummary, SaleRecord, SearchParameters};

pub struct MohaveScraper {
    config: ScrapeConfig,
    browser: Option<Browser>,
    page: Option<Arc<Page>>,
}

impl MohaveScraper {
    pub fn new(config: ScrapeConfig) -> Self {
        Self {
            config,
            browser: None,
            page: None,
        }
    }

    fn get_page(&self) -> Result<&Arc<Page>, ScrapeError> {
        self.page
            .as_ref()
            .ok_or_else(|| ScrapeError::BrowserInit("browser not initialized".into()))
    }

    fn params_for(&self, book_number: u32) -> SearchParameters {
        SearchParameters {
            book_number,
            date_from: self.config.from_date.clone(),
            date_to: self.config.to_date.clone(),
            property_type: self.config.property_type.clone(),
        }
    }

    /// Scrape one book. `Ok(None)` means the portal had nothing for it,
    /// either by explicit indicator or an empty harvest.
    pub async fn scrape_book(
        &self,
        book_number: u32,
    ) -> Result<Option<Vec<SaleRecord>>, ScrapeError> {
        let page = self.get_page()?.clone();
        info!("scraping book number: {}", book_number);

        page.goto(self.config.url.as_str())
            .await
            .map_err(|e| ScrapeError::Navigation(e.to_string()))?;
        let _ = page.wait_for_navigation().await;
        sleep(Duration::from_secs(2)).await;

        search::submit_search(&page, &self.params_for(book_number)).await?;

        match search::wait_for_search_outcome(&page, self.config.results_timeout).await? {
            SearchOutcome::NoResults => {
                warn!("no results found for book {}", book_number);
                return Ok(None);
            }
            SearchOutcome::Results => {}
        }

        let rows = paginate::collect_all_pages(&page, &self.config).await?;
        if rows.is_empty() {
            warn!("no data extracted for book {}", book_number);
            return Ok(None);
        }

        let retrieved_at = Utc::now().to_rfc3339();
        let records: Vec<SaleRecord> = rows
            .into_iter()
            .map(|row| SaleRecord::from_row(row, book_number, &retrieved_at))
            .collect();

        info!("scraped {} records for book {}", records.len(), book_number);
        Ok(Some(records))
    }

    async fn debug_screenshot(&self, book_number: u32) {
        if !self.config.debug {
            return;
        }
        let Ok(page) = self.get_page() else { return };
        if let Ok(screenshot) = page
            .screenshot(ScreenshotParams::builder().full_page(true).build())
            .await
        {
            use base64::Engine;
            let encoded = base64::engine::general_purpose::STANDARD.encode(&screenshot);
            debug!(
                "book {} failure screenshot: data:image/png;base64,{}",
                book_number, encoded
            );
        }
    }
}

/// Widen whatever a book's scrape produced into its outcome. Any error is a
/// Failure here; the loop never stops for one book.
fn classify_book(
    book_number: u32,
    result: &Result<Option<Vec<SaleRecord>>, ScrapeError>,
) -> BookOutcome {
    match result {
        Ok(Some(records)) => BookOutcome {
            book_number,
            status: BookStatus::Success,
            record_count: records.len(),
        },
        Ok(None) => BookOutcome {
            book_number,
            status: BookStatus::NoResults,
            record_count: 0,
        },
        Err(_) => BookOutcome {
            book_number,
            status: BookStatus::Failure,
            record_count: 0,
        },
    }
}

#[async_trait]
impl Scraper for MohaveScraper {
    async fn initialize(&mut self) -> Result<(), ScrapeError> {
        info!("initializing browser...");

        std::fs::create_dir_all(&self.config.output_dir)?;
        info!("output directory: {:?}", self.config.output_dir);
        info!(
            "date range: {} to {}",
            self.config.from_date, self.config.to_date
        );
        info!("property type: {}", self.config.property_type);

        let unique_id = format!(
            "{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );
        let user_data_dir = std::env::temp_dir().join(format!("mohave-{}", unique_id));

        let chrome_path = std::env::var("CHROME_PATH")
            .or_else(|_| std::env::var("CHROMIUM_PATH"))
            .unwrap_or_else(|_| "chromium".to_string());

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .user_data_dir(&user_data_dir)
            .window_size(1920, 1080)
            .no_sandbox()
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg(format!("--user-agent={}", USER_AGENT));

        if !self.config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(ScrapeError::BrowserInit)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScrapeError::BrowserInit(e.to_string()))?;

        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!("Browser event: {:?}", event);
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScrapeError::BrowserInit(e.to_string()))?;

        self.browser = Some(browser);
        self.page = Some(Arc::new(page));

        info!("browser initialized");
        Ok(())
    }

    async fn scrape_range(
        &mut self,
        start_book: u32,
        end_book: u32,
    ) -> Result<RunSummary, ScrapeError> {
        info!("starting scrape for books {} to {}", start_book, end_book);
        // An inverted range is empty, not an error.
        let total = (start_book..=end_book).count() as u32;
        let mut summary = RunSummary::default();

        for book_number in start_book..=end_book {
            let result = self.scrape_book(book_number).await;
            let mut outcome = classify_book(book_number, &result);

            match result {
                Ok(Some(records)) => {
                    if self.config.debug {
                        output::write_book_json(&self.config.output_dir, book_number, &records);
                    }
                    if let Err(e) =
                        output::write_book_file(&self.config.output_dir, book_number, &records)
                    {
                        error!("failed to save data for book {}: {}", book_number, e);
                        outcome.status = BookStatus::Failure;
                        outcome.record_count = 0;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    error!("failed to process book {}: {}", book_number, e);
                    self.debug_screenshot(book_number).await;
                }
            }
            summary.record(outcome);

            // Politeness pause between books.
            sleep(self.config.pacing).await;

            let processed = book_number - start_book + 1;
            if processed % 10 == 0 {
                info!("progress: {}/{} books processed", processed, total);
            }
        }

        info!(
            "scraping complete! success: {}, failed: {}",
            summary.success_count, summary.fail_count
        );
        Ok(summary)
    }

    async fn combine(&self) -> Result<Option<PathBuf>, ScrapeError> {
        output::combine_books(&self.config.output_dir)
    }

    async fn close(&mut self) -> Result<(), ScrapeError> {
        info!("closing browser...");

        self.page = None;
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                debug!("browser close: {}", e);
            }
        }

        info!("browser closed");
        Ok(())
    }
}
