use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Exchange error: {0}")]
    Exchange(String),

    #[error("Notification channel error: {0}")]
    Channel(String),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
