//! Categorized errors surfaced by the movie directory.
//!
//! OMDb has no structured error codes, only free text in its `Error` field,
//! so classification is a case-insensitive substring match against [`PHRASES`].
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NoResults,
    TooManyResults,
    Unauthorized,
    Network,
    Unknown,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NoResults => "NO_RESULTS",
            ErrorKind::TooManyResults => "TOO_MANY_RESULTS",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Network => "NETWORK_ERROR",
            ErrorKind::Unknown => "API_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Known service phrases, matched in order against the lowercased error text.
pub const PHRASES: &[(&str, ErrorKind)] = &[
    ("movie not found", ErrorKind::NoResults),
    ("series not found", ErrorKind::NoResults),
    ("incorrect imdb id", ErrorKind::NoResults),
    ("too many results", ErrorKind::TooManyResults),
    ("invalid api key", ErrorKind::Unauthorized),
    ("no api key provided", ErrorKind::Unauthorized),
    ("request limit reached", ErrorKind::Unauthorized),
    ("unauthorized", ErrorKind::Unauthorized),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct CategorizedError {
    pub kind: ErrorKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

impl CategorizedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            suggestions: default_suggestions(kind),
        }
    }

    /// Classify the text of a service-reported `Error` field.
    pub fn from_service_text(text: &str) -> Self {
        let kind = classify(text);
        let message = match kind {
            ErrorKind::NoResults => {
                "No movies matched your search. Try a different title.".to_string()
            }
            ErrorKind::TooManyResults => {
                "Your search matched too many movies. Please be more specific.".to_string()
            }
            ErrorKind::Unauthorized => {
                "The movie service rejected our credentials. Please contact support.".to_string()
            }
            ErrorKind::Network | ErrorKind::Unknown => {
                if text.trim().is_empty() {
                    "The movie service returned an error.".to_string()
                } else {
                    text.trim().to_string()
                }
            }
        };
        Self::new(kind, message)
    }

    pub fn network(detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::Network,
            format!("Could not reach the movie service: {detail}"),
        )
    }

    pub fn timeout(after: std::time::Duration) -> Self {
        Self::new(
            ErrorKind::Network,
            format!(
                "The movie service did not respond within {}s.",
                after.as_secs_f32()
            ),
        )
    }

    pub fn unexpected(detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::Unknown,
            format!("Unexpected response from the movie service: {detail}"),
        )
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            ErrorKind::NoResults => "No movies found",
            ErrorKind::TooManyResults => "Too many results",
            ErrorKind::Unauthorized => "Service unavailable",
            ErrorKind::Network => "Connection problem",
            ErrorKind::Unknown => "Oops! Something went wrong",
        }
    }

    /// Whether the user should be offered a retry action.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::Network | ErrorKind::Unknown)
    }
}

pub fn classify(text: &str) -> ErrorKind {
    let lower = text.to_lowercase();
    PHRASES
        .iter()
        .find(|(phrase, _)| lower.contains(phrase))
        .map(|(_, kind)| *kind)
        .unwrap_or(ErrorKind::Unknown)
}

fn default_suggestions(kind: ErrorKind) -> Vec<String> {
    let list: &[&str] = match kind {
        ErrorKind::NoResults => &[
            "Check the spelling of the title",
            "Try fewer or more general keywords",
            "Search by the original title",
        ],
        ErrorKind::TooManyResults => &[
            "Add more words from the title",
            "Include the release year",
        ],
        ErrorKind::Unauthorized => &["Check that OMDB_API_KEY is set and valid"],
        ErrorKind::Network => &[
            "Check your internet connection",
            "Try again in a few moments",
        ],
        ErrorKind::Unknown => &["Try again in a few moments"],
    };
    list.iter().map(|s| s.to_string()).collect()
}
