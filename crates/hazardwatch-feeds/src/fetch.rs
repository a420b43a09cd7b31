//! GET-and-decode-JSON primitive shared by every feed.
//!
//! One network attempt per call; no retries at this layer. `file://` URLs
//! are read from disk and always count as a successful response, the way a
//! browser reports status 0 for local files.

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;

use hazardwatch_core::AppConfig;

use crate::error::{FeedError, ParseHint};

/// Characters of the body inspected when diagnosing a JSON parse failure.
const HINT_SAMPLE_CHARS: usize = 80;

/// Source-specific decoder applied to a successful response body.
pub type ResponseParser = fn(&str) -> Result<Value, String>;

/// Thin wrapper over `reqwest` that classifies every failure as a [`FeedError`].
#[derive(Debug, Clone)]
pub struct JsonFetcher {
    client: Client,
}

impl JsonFetcher {
    /// # Errors
    ///
    /// Returns [`FeedError::Transport`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// # Errors
    ///
    /// See [`JsonFetcher::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, FeedError> {
        Self::new(config.request_timeout_secs, &config.user_agent)
    }

    /// Fetches `url` and decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// See [`JsonFetcher::fetch_json`].
    pub async fn get_json(&self, url: &str) -> Result<Value, FeedError> {
        self.fetch_json(url, None).await
    }

    /// Fetches `url` and decodes the body with `parser`, or as plain JSON
    /// when no parser is given.
    ///
    /// # Errors
    ///
    /// - [`FeedError::InvalidUrl`] if `url` does not parse.
    /// - [`FeedError::Transport`] if no response was received.
    /// - [`FeedError::Http`] on a non-2xx status, carrying the body text.
    /// - [`FeedError::File`] if a `file://` URL cannot be read.
    /// - [`FeedError::Parse`] if the body is not JSON or `parser` rejects it.
    pub async fn fetch_json(
        &self,
        url: &str,
        parser: Option<ResponseParser>,
    ) -> Result<Value, FeedError> {
        let parsed = Url::parse(url).map_err(|e| FeedError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        let body = if parsed.scheme() == "file" {
            read_local(&parsed).await?
        } else {
            let response = self.client.get(parsed).send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                tracing::debug!(url, status = status.as_u16(), "non-success response");
                return Err(FeedError::Http {
                    status: status.as_u16(),
                    url: url.to_owned(),
                    body,
                });
            }
            response.text().await?
        };

        decode_body(url, &body, parser)
    }
}

async fn read_local(url: &Url) -> Result<String, FeedError> {
    let path = url.to_file_path().map_err(|()| FeedError::InvalidUrl {
        url: url.to_string(),
        reason: "not a local file path".to_string(),
    })?;
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| FeedError::File {
            path: path.display().to_string(),
            source,
        })
}

/// Applies `parser` to `body`, or parses it as JSON with a diagnosis hint.
pub(crate) fn decode_body(
    url: &str,
    body: &str,
    parser: Option<ResponseParser>,
) -> Result<Value, FeedError> {
    if let Some(parse) = parser {
        return parse(body).map_err(|detail| FeedError::Parse {
            url: url.to_owned(),
            hint: ParseHint::CustomParser,
            detail,
        });
    }

    serde_json::from_str(body).map_err(|e| {
        let sample: String = body.chars().take(HINT_SAMPLE_CHARS).collect();
        let hint = if sample.trim().starts_with('<') {
            ParseHint::HtmlPage
        } else {
            ParseHint::InvalidJson
        };
        FeedError::Parse {
            url: url.to_owned(),
            hint,
            detail: e.to_string(),
        }
    })
}

/// Builds `base + path` with percent-encoded query parameters.
pub(crate) fn endpoint_url(
    base: &str,
    path: &str,
    params: &[(&str, &str)],
) -> Result<Url, FeedError> {
    let joined = format!("{}{}", base.trim_end_matches('/'), path);
    let mut url = Url::parse(&joined).map_err(|e| FeedError::InvalidUrl {
        url: joined.clone(),
        reason: e.to_string(),
    })?;
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in params {
            pairs.append_pair(k, v);
        }
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reject_all(_: &str) -> Result<Value, String> {
        Err("nope".to_string())
    }

    #[test]
    fn decode_body_parses_json() {
        let value = decode_body("u", r#"{"a": 1}"#, None).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn decode_body_flags_html_pages() {
        let err = decode_body("u", "  <!DOCTYPE html><html>", None).unwrap_err();
        assert!(
            matches!(err, FeedError::Parse { hint: ParseHint::HtmlPage, .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn decode_body_flags_generic_invalid_json() {
        let err = decode_body("u", "{not json", None).unwrap_err();
        assert!(
            matches!(err, FeedError::Parse { hint: ParseHint::InvalidJson, .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn custom_parser_errors_become_parse_errors() {
        let err = decode_body("u", "{}", Some(reject_all)).unwrap_err();
        match err {
            FeedError::Parse { hint, detail, .. } => {
                assert_eq!(hint, ParseHint::CustomParser);
                assert_eq!(detail, "nope");
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn endpoint_url_joins_and_encodes() {
        let url = endpoint_url(
            "https://api.openweathermap.org/",
            "/geo/1.0/direct",
            &[("q", "Fairbanks, Alaska"), ("limit", "1")],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.openweathermap.org/geo/1.0/direct?q=Fairbanks%2C+Alaska&limit=1"
        );
    }

    #[test]
    fn endpoint_url_rejects_garbage_base() {
        assert!(matches!(
            endpoint_url("not a url", "/x", &[]),
            Err(FeedError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn file_urls_are_read_from_disk() {
        let path = std::env::temp_dir()
            .join(format!("hazardwatch-fetch-{}.json", std::process::id()));
        std::fs::write(&path, r#"[{"lat": 1, "lon": 2, "value": 3}]"#).unwrap();
        let url = Url::from_file_path(&path).unwrap();

        let fetcher = JsonFetcher::new(5, "hazardwatch-test/0.1").unwrap();
        let value = fetcher.get_json(url.as_str()).await.unwrap();
        assert_eq!(value[0]["value"], 3);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn missing_file_is_a_file_error() {
        let fetcher = JsonFetcher::new(5, "hazardwatch-test/0.1").unwrap();
        let err = fetcher
            .get_json("file:///definitely/not/here/aurora.json")
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::File { .. }), "got {err:?}");
    }
}
