use std::fmt;

use thiserror::Error;

/// Longest body excerpt carried into an error's display text.
const BODY_SNIPPET_CHARS: usize = 200;

/// Diagnosis attached to a body that could not be turned into JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseHint {
    /// The body starts with `<`: almost always an HTML error or captive page.
    HtmlPage,
    InvalidJson,
    /// A source-specific parser rejected the body.
    CustomParser,
}

impl fmt::Display for ParseHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlPage => write!(f, "Non-JSON (HTML) response"),
            Self::InvalidJson => write!(f, "Invalid JSON"),
            Self::CustomParser => write!(f, "Unparseable response"),
        }
    }
}

/// One failed source in an ordered fallback chain.
#[derive(Debug)]
pub struct Attempt {
    pub label: String,
    pub error: FeedError,
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.error)
    }
}

/// Errors produced anywhere in the feed pipeline.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}{}", body_suffix(.body))]
    Http {
        status: u16,
        url: String,
        /// Best-effort response body; empty when it could not be read.
        body: String,
    },

    #[error("{hint} from {url}: {detail}")]
    Parse {
        url: String,
        hint: ParseHint,
        detail: String,
    },

    #[error("could not read {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("enter a city or coordinates to search")]
    EmptyQuery,

    /// Geocoding returned no candidates.
    #[error("no matching location found for \"{query}\"")]
    NotFound { query: String },

    /// The payload parsed but matched no known shape, or yielded nothing usable.
    #[error("unusable payload: {reason}")]
    Shape { reason: String },

    #[error("all {} sources failed: {}", .attempts.len(), join_attempts(.attempts))]
    Chain { attempts: Vec<Attempt> },
}

impl FeedError {
    /// `true` for an HTTP 401, i.e. the provider rejected our credentials.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401, .. })
    }

    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        Self::Shape {
            reason: reason.into(),
        }
    }
}

fn body_suffix(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let snippet: String = trimmed.chars().take(BODY_SNIPPET_CHARS).collect();
    format!(": {snippet}")
}

fn join_attempts(attempts: &[Attempt]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
