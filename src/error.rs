use thiserror::Error;

/// Failure of a single page fetch, before the page number is known.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Recoverable scrape outcomes. The display strings are shown to the user
/// as inline warnings.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Failed to retrieve page {page}. Skipping...")]
    Status { page: u32, status: u16 },

    #[error("Failed to retrieve page {page}. Skipping...")]
    Transport {
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("No products found on page {page}.")]
    NoResults { page: u32 },
}

impl ScrapeError {
    pub fn from_fetch(page: u32, err: FetchError) -> Self {
        match err {
            FetchError::Status(status) => ScrapeError::Status { page, status },
            FetchError::Transport(source) => ScrapeError::Transport { page, source },
        }
    }

    pub fn page(&self) -> u32 {
        match self {
            ScrapeError::Status { page, .. }
            | ScrapeError::Transport { page, .. }
            | ScrapeError::NoResults { page } => *page,
        }
    }
}

/// A filter value that is not one of the fixed options for its dimension.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {dimension}: {value:?}")]
pub struct SelectionError {
    pub dimension: &'static str,
    pub value: String,
}

/// Failure to load or persist a browsing session.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session store error: {0}")]
    Store(#[from] tower_sessions::session::Error),

    #[error("session was saved without an id")]
    MissingId,
}
