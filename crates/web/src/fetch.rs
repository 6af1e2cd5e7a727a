// ABOUTME: HTTP fetching with default browser-like headers, timeouts and a 403 retry.
// ABOUTME: Decodes bodies to UTF-8 from the content-type charset or by detection.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::USER_AGENT;
use url::Url;

use crate::error::WebError;

/// Crawler user agent sent by default.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; YandexBot/3.0; +http://yandex.com/bots)";

/// User agent used for the single retry after a 403.
pub const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 12_0 like Mac OS X) \
    AppleWebKit/605.1.15 (KHTML, like Gecko) Version/12.0 Mobile/15E148 Safari/604.1";

pub const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml,application/rss+xml;q=0.9,image/webp,*/*;q=0.8";

pub const DEFAULT_ACCEPT_LANGUAGE: &str = "ru-RU,ru;q=0.8,en-US;q=0.5,en;q=0.3";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetcher configuration.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub user_agent: String,
    /// Sent with every request; `User-Agent` is controlled by `user_agent` instead.
    pub headers: HashMap<String, String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        let mut headers = HashMap::new();
        headers.insert("Accept".to_string(), DEFAULT_ACCEPT.to_string());
        headers.insert(
            "Accept-Language".to_string(),
            DEFAULT_ACCEPT_LANGUAGE.to_string(),
        );
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers,
        }
    }
}

/// Builder for [`Fetcher`].
#[derive(Debug, Clone, Default)]
pub struct FetcherBuilder {
    opts: FetchOptions,
}

impl FetcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the whole-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the default User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Add or replace a header sent with every request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Result<Fetcher, WebError> {
        Fetcher::new(self.opts)
    }
}

/// Result of a successful (2xx) fetch.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body as UTF-8 text using the response charset, or detection when absent.
    pub fn text_utf8(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Decode body bytes to a String using charset from content-type header or detection.
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(encoding) = content_type
        .and_then(extract_charset)
        .and_then(|charset| encoding_rs::Encoding::for_label(charset.as_bytes()))
    {
        let (decoded, _, _) = encoding.decode(body);
        return decoded.into_owned();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from a Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .to_lowercase()
        .split(';')
        .find_map(|part| {
            part.trim()
                .strip_prefix("charset=")
                .map(|cs| cs.trim_matches('"').trim_matches('\'').to_string())
        })
}

/// Prefix `http://` when the URL does not start with `http`, then parse it.
pub fn normalize_url(raw: &str) -> Result<Url, WebError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(WebError::invalid_url(raw, "normalize_url", None));
    }
    let candidate = if trimmed.starts_with("http") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };
    Url::parse(&candidate).map_err(|e| {
        WebError::invalid_url(raw, "normalize_url", Some(anyhow::anyhow!("invalid URL: {}", e)))
    })
}

/// HTTP client with the crawler's default headers.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    opts: FetchOptions,
}

impl Fetcher {
    pub fn new(opts: FetchOptions) -> Result<Self, WebError> {
        let client = reqwest::Client::builder()
            .timeout(opts.timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| WebError::fetch("", "Fetcher::new", Some(e.into())))?;
        Ok(Self { client, opts })
    }

    pub fn builder() -> FetcherBuilder {
        FetcherBuilder::new()
    }

    pub fn options(&self) -> &FetchOptions {
        &self.opts
    }

    /// GET `url`, optionally overriding the User-Agent for this request.
    ///
    /// Only 2xx responses succeed; any other status is a [`WebError`] with
    /// code `Status`.
    pub async fn get(&self, url: &str, user_agent: Option<&str>) -> Result<FetchResult, WebError> {
        let parsed = normalize_url(url)?;

        let mut request = self
            .client
            .get(parsed.as_str())
            .header(USER_AGENT, user_agent.unwrap_or(self.opts.user_agent.as_str()));
        for (key, value) in &self.opts.headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| WebError::from_reqwest(url, "get", e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url, status = status.as_u16(), "non-success status");
            return Err(WebError::status(url, "get", status.as_u16()));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_lowercase());

        let body = response
            .bytes()
            .await
            .map_err(|e| WebError::from_reqwest(url, "get", e))?;

        tracing::debug!(url, bytes = body.len(), "fetched");
        Ok(FetchResult {
            status: status.as_u16(),
            url: parsed.to_string(),
            final_url,
            content_type,
            body,
        })
    }

    /// GET `url`, retrying exactly once with a mobile User-Agent after a 403.
    pub async fn get_with_retry(&self, url: &str) -> Result<FetchResult, WebError> {
        match self.get(url, None).await {
            Err(err) if err.is_forbidden() => {
                tracing::warn!(url, "403 Forbidden, retrying with mobile user agent");
                self.get(url, Some(MOBILE_USER_AGENT)).await
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn fetcher() -> Fetcher {
        Fetcher::builder().build().unwrap()
    }

    #[tokio::test]
    async fn test_get_ok_utf8() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/page")
                .header("user-agent", DEFAULT_USER_AGENT)
                .header("accept-language", DEFAULT_ACCEPT_LANGUAGE);
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body("привет");
        });

        let result = fetcher().get(&server.url("/page"), None).await;
        mock.assert();

        let result = result.expect("fetch should succeed");
        assert_eq!(result.status, 200);
        assert_eq!(result.content_type.as_deref(), Some("text/html; charset=utf-8"));
        assert_eq!(result.text_utf8(), "привет");
    }

    #[tokio::test]
    async fn test_get_non_2xx_is_status_error() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("not found");
        });

        let err = fetcher()
            .get(&server.url("/missing"), None)
            .await
            .expect_err("should fail on 404");
        mock.assert();
        assert!(err.is_status());
        assert_eq!(err.status, Some(404));
    }

    #[tokio::test]
    async fn test_forbidden_retries_once_with_mobile_agent() {
        let server = MockServer::start();
        let blocked = server.mock(|when, then| {
            when.method(GET)
                .path("/guarded")
                .header("user-agent", DEFAULT_USER_AGENT);
            then.status(403);
        });
        let allowed = server.mock(|when, then| {
            when.method(GET)
                .path("/guarded")
                .header("user-agent", MOBILE_USER_AGENT);
            then.status(200).body("welcome");
        });

        let result = fetcher()
            .get_with_retry(&server.url("/guarded"))
            .await
            .expect("retry should succeed");
        blocked.assert_hits(1);
        allowed.assert_hits(1);
        assert_eq!(result.text_utf8(), "welcome");
    }

    #[tokio::test]
    async fn test_second_forbidden_is_terminal() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/never");
            then.status(403);
        });

        let err = fetcher()
            .get_with_retry(&server.url("/never"))
            .await
            .expect_err("should stay forbidden");
        mock.assert_hits(2);
        assert!(err.is_forbidden());
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/broken");
            then.status(500);
        });

        let err = fetcher()
            .get_with_retry(&server.url("/broken"))
            .await
            .expect_err("should fail");
        mock.assert_hits(1);
        assert_eq!(err.status, Some(500));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200)
                .delay(Duration::from_millis(500))
                .body("late");
        });

        let fetcher = Fetcher::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let err = fetcher
            .get(&server.url("/slow"), None)
            .await
            .expect_err("should time out");
        assert!(err.is_timeout());
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("example.com/a").unwrap().as_str(),
            "http://example.com/a"
        );
        assert_eq!(
            normalize_url("https://example.com/").unwrap().as_str(),
            "https://example.com/"
        );
        assert!(normalize_url("").unwrap_err().is_invalid_url());
        assert!(normalize_url("http://").unwrap_err().is_invalid_url());
    }

    #[test]
    fn test_extract_charset() {
        assert_eq!(
            extract_charset("text/html; charset=ISO-8859-1"),
            Some("iso-8859-1".to_string())
        );
        assert_eq!(
            extract_charset("text/html; charset=\"utf-8\""),
            Some("utf-8".to_string())
        );
        assert_eq!(extract_charset("text/html"), None);
    }

    #[test]
    fn test_decode_windows_1251_from_header() {
        // "мир" in windows-1251
        let body: &[u8] = &[0xEC, 0xE8, 0xF0];
        assert_eq!(decode_body(body, Some("text/html; charset=windows-1251")), "мир");
    }

    #[test]
    fn test_decode_without_charset_uses_detection() {
        assert_eq!(decode_body("plain ascii".as_bytes(), None), "plain ascii");
    }
}
