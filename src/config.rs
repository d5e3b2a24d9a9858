use std::path::PathBuf;
use std::time::Duration;

/// Default search URL (Mohave County Assessor, Affidavit of Value Search).
pub const DEFAULT_SEARCH_URL: &str =
    "https://www.mohave.gov/departments/assessor/affidavit-of-value-search/";

/// Static user agent presented to the portal.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Search page URL.
    pub url: String,
    /// Directory receiving the per-book and combined CSV files.
    pub output_dir: PathBuf,
    /// Sale date range start, canonical MM/DD/YYYY.
    pub from_date: String,
    /// Sale date range end, canonical MM/DD/YYYY.
    pub to_date: String,
    /// Human-readable property type filter (e.g. "Vacant Land").
    pub property_type: String,
    pub headless: bool,
    /// Extra diagnostics: failure screenshots, raw JSON sidecars.
    pub debug: bool,
    /// Bound on waiting for the results container or a no-results indicator.
    pub results_timeout: Duration,
    /// Render-settle delay after a page advance.
    pub settle_delay: Duration,
    /// Politeness pause between books.
    pub pacing: Duration,
    /// Hard ceiling on pages walked per book. The portal's "Next" control has
    /// been observed stuck enabled; this bound prevents an endless walk.
    pub max_pages: u32,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SEARCH_URL.to_string(),
            output_dir: PathBuf::from("./data/raw/mohave"),
            from_date: "01/01/2010".to_string(),
            to_date: "10/31/2025".to_string(),
            property_type: "Vacant Land".to_string(),
            headless: true,
            debug: false,
            results_timeout: Duration::from_secs(10),
            settle_delay: Duration::from_secs(3),
            pacing: Duration::from_secs(2),
            max_pages: 200,
        }
    }
}

impl ScrapeConfig {
    pub fn new(from_date: impl Into<String>, to_date: impl Into<String>) -> Self {
        Self {
            from_date: from_date.into(),
            to_date: to_date.into(),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
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

    pub fn with_results_timeout(mut self, timeout: Duration) -> Self {
        self.results_timeout = timeout;
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }
}
