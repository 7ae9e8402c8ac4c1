use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::FetchError;

/// Some sites refuse requests without a browser identification.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Decoded with the charset from `Content-Type`, UTF-8 when absent.
    pub body: String,
    pub final_url: String,
}

/// Single-attempt HTTP GET with a hard timeout. There is no retry.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches `url`, which must already carry a scheme (see [`normalize_url`]).
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let url = Url::parse(url)?;

        let res = self.client.get(url).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let final_url = res.url().to_string();
        let body = res.text().await?;
        debug!(%final_url, bytes = body.len(), "fetched page");

        Ok(FetchedPage { body, final_url })
    }
}

/// Prepends `https://` unless the input already starts with an http(s) scheme.
pub fn normalize_url(raw_url: &str) -> String {
    if raw_url.starts_with("http://") || raw_url.starts_with("https://") {
        raw_url.to_string()
    } else {
        format!("https://{raw_url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[test]
    fn bare_host_gets_https() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("example.com/a?b=c"), "https://example.com/a?b=c");
    }

    #[test]
    fn existing_scheme_is_kept() {
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
    }

    #[test]
    fn other_schemes_are_prefixed_too() {
        assert_eq!(normalize_url("ftp://example.com"), "https://ftp://example.com");
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_user_agent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .match_header("user-agent", USER_AGENT)
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><title>ok</title></html>")
            .create_async()
            .await;

        let fetcher = Fetcher::new().unwrap();
        let page = fetcher.fetch(&format!("{}/page", server.url())).await.unwrap();

        assert_eq!(page.body, "<html><title>ok</title></html>");
        assert!(page.final_url.ends_with("/page"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_decodes_declared_charset() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/latin1")
            .with_status(200)
            .with_header("content-type", "text/html; charset=iso-8859-1")
            .with_body(b"<title>Caf\xe9</title>".to_vec())
            .create_async()
            .await;

        let fetcher = Fetcher::new().unwrap();
        let page = fetcher.fetch(&format!("{}/latin1", server.url())).await.unwrap();

        assert_eq!(page.body, "<title>Caf\u{e9}</title>");
    }

    #[tokio::test]
    async fn test_fetch_reports_http_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = Fetcher::new().unwrap();
        let err = fetcher
            .fetch(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::HttpStatus(404));
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        // Accepts connections but never answers.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let fetcher = Fetcher::with_timeout(Duration::from_millis(200)).unwrap();
        let err = fetcher.fetch(&format!("http://{addr}/")).await.unwrap_err();

        assert_eq!(err, FetchError::Timeout);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = Fetcher::new().unwrap();
        let err = fetcher.fetch(&format!("http://{addr}/")).await.unwrap_err();

        assert!(matches!(err, FetchError::Connection(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_fetch_rejects_unparsable_url() {
        let fetcher = Fetcher::new().unwrap();
        let err = fetcher.fetch("https://exa mple.com").await.unwrap_err();

        assert!(matches!(err, FetchError::InvalidUrl(_)), "got {err:?}");
    }
}
