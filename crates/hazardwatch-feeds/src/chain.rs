//! Ordered fallback: try candidates in turn, keep the first success.
//!
//! [`first_success`] is the single combinator behind both the aurora source
//! chain and the weather provider cascade. Candidates are lazy futures, so
//! nothing after the winning candidate is ever polled.

use std::future::Future;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::error::{Attempt, FeedError};
use crate::fetch::{JsonFetcher, ResponseParser};

/// A labelled, not-yet-started attempt.
pub struct Candidate<'a, T> {
    label: String,
    attempt: BoxFuture<'a, Result<T, FeedError>>,
}

impl<'a, T> Candidate<'a, T> {
    pub fn new<F>(label: impl Into<String>, attempt: F) -> Self
    where
        F: Future<Output = Result<T, FeedError>> + Send + 'a,
    {
        Self {
            label: label.into(),
            attempt: Box::pin(attempt),
        }
    }
}

/// The winning candidate plus every failure that preceded it.
#[derive(Debug)]
pub struct Resolved<T> {
    pub label: String,
    pub value: T,
    pub failures: Vec<Attempt>,
}

/// Awaits `candidates` strictly in order and returns the first success.
///
/// # Errors
///
/// Returns [`FeedError::Chain`] listing every label and its error when no
/// candidate succeeds (an empty list yields an empty attempt log).
pub async fn first_success<T>(candidates: Vec<Candidate<'_, T>>) -> Result<Resolved<T>, FeedError> {
    let mut failures = Vec::new();
    for Candidate { label, attempt } in candidates {
        match attempt.await {
            Ok(value) => {
                return Ok(Resolved {
                    label,
                    value,
                    failures,
                })
            }
            Err(error) => {
                tracing::debug!(label = %label, error = %error, "source failed, trying next");
                failures.push(Attempt { label, error });
            }
        }
    }
    Err(FeedError::Chain { attempts: failures })
}

/// One entry of a JSON source chain.
#[derive(Debug, Clone)]
pub struct RawSource {
    /// Unique within its chain; used in attempt logs.
    pub label: String,
    pub url: String,
    pub parse: Option<ResponseParser>,
}

impl RawSource {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            parse: None,
        }
    }

    #[must_use]
    pub fn with_parser(mut self, parse: ResponseParser) -> Self {
        self.parse = Some(parse);
        self
    }
}

/// Fetches each source in order and returns the first decoded payload.
///
/// # Errors
///
/// Returns [`FeedError::Chain`] naming every source when all of them fail.
pub async fn resolve_chain(
    fetcher: &JsonFetcher,
    sources: &[RawSource],
) -> Result<Resolved<Value>, FeedError> {
    let candidates = sources
        .iter()
        .map(|source| {
            Candidate::new(
                source.label.clone(),
                fetcher.fetch_json(&source.url, source.parse),
            )
        })
        .collect();
    first_success(candidates).await
}
