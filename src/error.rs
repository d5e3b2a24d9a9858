use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("browser init error: {0}")]
    BrowserInit(String),

    #[error("navigation error: {0}")]
    Navigation(String),

    #[error("javascript error: {0}")]
    JavaScript(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("file io error: {0}")]
    FileIO(#[from] std::io::Error),
}
