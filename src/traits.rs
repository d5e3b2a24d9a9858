use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::ScrapeError;
use crate::mohave::RunSummary;

#[async_trait]
pub trait Scraper: Send + Sync {
    /// Launch the browser session.
    async fn initialize(&mut self) -> Result<(), ScrapeError>;

    /// Scrape every book in the inclusive range, one at a time.
    async fn scrape_range(
        &mut self,
        start_book: u32,
        end_book: u32,
    ) -> Result<RunSummary, ScrapeError>;

    /// Concatenate the per-book files already on disk into the combined
    /// file. Reads only; may be re-run without re-scraping.
    async fn combine(&self) -> Result<Option<PathBuf>, ScrapeError>;

    /// Release the browser session.
    async fn close(&mut self) -> Result<(), ScrapeError>;

    /// Full run: initialize → scrape_range → close → combine. The session
    /// is torn down exactly once whether the range loop succeeded or not;
    /// combining happens after teardown since it only touches files.
    async fn execute(
        &mut self,
        start_book: u32,
        end_book: u32,
    ) -> Result<RunSummary, ScrapeError> {
        self.initialize().await?;
        let result = self.scrape_range(start_book, end_book).await;
        self.close().await?;
        let mut summary = result?;
        summary.combined_path = self.combine().await?;
        Ok(summary)
    }
}
