use thiserror::Error;

/// Candidate search failed. The pipeline keeps the previous candidate list.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("location search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("location search returned status {status}: {body}")]
    Service { status: u16, body: String },

    #[error("failed to parse location search response: {0}")]
    Parse(String),
}

/// Forecast fetch failed. Terminal for that attempt; the session goes back to idle.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("forecast request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("no matching location found for '{0}'")]
    UnknownCity(String),

    #[error("forecast service returned status {status}: {body}")]
    Service { status: u16, body: String },

    #[error("failed to parse forecast response: {0}")]
    Parse(String),
}

/// Preference read or write failed. Treated as "no preference".
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference file is malformed: {0}")]
    Format(#[from] serde_json::Error),

    #[error("could not determine platform data directory")]
    NoDataDir,
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
