//! County assessor Affidavit of Value search scraper.
//!
//! Retrieves recorded real-property sale data from the Mohave County
//! Assessor's search portal, one book number at a time across a range, and
//! persists the rows as per-book CSV files plus a combined file.
//!
//! # Range scrape
//!
//! ```rust,ignore
//! use assessor_scraper::{MohaveScraper, ScrapeConfig, Scraper};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ScrapeConfig::new("01/01/2010", "10/31/2025")
//!         .with_output_dir("./data/raw/mohave")
//!         .with_property_type("Vacant Land");
//!
//!     let mut scraper = MohaveScraper::new(config);
//!     let summary = scraper.execute(100, 410).await.unwrap();
//!     println!("success: {}, failed: {}", summary.success_count, summary.fail_count);
//! }
//! ```
//!
//! # As a tower Service
//!
//! ```rust,ignore
//! use assessor_scraper::{BookScrapeRequest, ScraperService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = ScraperService::new();
//!     let request = BookScrapeRequest::new(100, 110)
//!         .with_output_dir("./data/raw/mohave");
//!
//!     let summary = service.call(request).await.unwrap();
//!     println!("combined file: {:?}", summary.combined_path);
//! }
//! ```

pub mod config;
pub mod error;
pub mod mohave;
pub mod service;
pub mod traits;

pub use config::ScrapeConfig;
pub use error::ScrapeError;
pub use service::{BookScrapeRequest, ScraperService};
pub use traits::Scraper;

pub use mohave::{
    combine_books, BookOutcome, BookStatus, MohaveScraper, RunSummary, SaleRecord,
    SearchParameters, COMBINED_FILENAME,
};
