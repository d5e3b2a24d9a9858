// Rebuild the combined CSV from whatever per-book files are on disk,
// without re-scraping anything.

use std::path::PathBuf;

use assessor_scraper::combine_books;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let dir = PathBuf::from(
        std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "./data/raw/mohave".to_string()),
    );

    match combine_books(&dir) {
        Ok(Some(path)) => println!("Combined file created: {:?}", path),
        Ok(None) => println!("No per-book files found in {:?}", dir),
        Err(e) => eprintln!("combine failed: {}", e),
    }
}
