//! Mohave County Affidavit of Value search scraper.
//!
//! Walks a range of book numbers against the county's search portal,
//! persisting each book's sale records as a CSV file.

mod extract;
mod locate;
mod output;
mod paginate;
mod scraper;
mod search;
mod types;

pub use output::{combine_books, COMBINED_FILENAME};
pub use scraper::MohaveScraper;
pub use types::{
    BookOutcome, BookStatus, RunSummary, SaleRecord, SaleRow, SearchParameters,
};
