use assessor_scraper::{MohaveScraper, ScrapeConfig, Scraper};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("info,assessor_scraper=debug")
        .init();

    let start: u32 = std::env::var("START_BOOK")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(100);
    let end: u32 = std::env::var("END_BOOK")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(410);
    let output_dir =
        std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "./data/raw/mohave".to_string());

    let config = ScrapeConfig::new("01/01/2010", "10/31/2025")
        .with_output_dir(&output_dir)
        .with_property_type("Vacant Land");

    let mut scraper = MohaveScraper::new(config);

    match scraper.execute(start, end).await {
        Ok(summary) => {
            println!("\n{}", "=".repeat(50));
            println!("SCRAPING SUMMARY");
            println!("{}", "=".repeat(50));
            println!("Successfully scraped: {} books", summary.success_count);
            println!("Failed to scrape: {} books", summary.fail_count);
            println!("Output directory: {}", output_dir);
            if let Some(path) = &summary.combined_path {
                println!("Combined file: {:?}", path);
            }
            println!("{}", "=".repeat(50));
        }
        Err(e) => {
            eprintln!("scrape run failed: {}", e);
        }
    }
}
