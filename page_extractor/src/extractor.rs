use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::classifier::classify;
use crate::fetcher::{normalize_url, Fetcher};
use crate::fields::extract_fields;
use crate::normalizer::normalize;
use crate::summarizer::summarize;
use crate::{ExtractionResult, FetchError};

/// Runs the whole pipeline for one URL at a time.
///
/// Holds no per-call state, so one value can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Extractor {
    fetcher: Fetcher,
}

impl Extractor {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            fetcher: Fetcher::new()?,
        })
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            fetcher: Fetcher::with_timeout(timeout)?,
        })
    }

    /// Never fails: transport errors come back as an error-status record.
    #[instrument(skip(self))]
    pub async fn extract(&self, raw_url: &str) -> ExtractionResult {
        let url = normalize_url(raw_url);

        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(err) => {
                warn!(%url, error = %err, "fetch failed");
                return classify(&err, &url);
            }
        };

        // The parsed tree is not Send; keep it out of any await.
        let fields = {
            let document = normalize(&page.body);
            extract_fields(&document)
        };
        let result = summarize(fields, url);

        info!(
            url = %result.url,
            final_url = %page.final_url,
            words = result.word_count,
            headings = result.headings.len(),
            "extracted webpage content"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::TIMEOUT_MESSAGE;
    use crate::summarizer::MAX_CONTENT_CHARS;
    use crate::{ExtractionStatus, Heading};
    use tokio::net::TcpListener;

    async fn serve(server: &mut mockito::ServerGuard, path: &str, html: &str) -> String {
        server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(html)
            .create_async()
            .await;
        format!("{}{}", server.url(), path)
    }

    #[tokio::test]
    async fn test_extracts_simple_page() {
        let mut server = mockito::Server::new_async().await;
        let url = serve(
            &mut server,
            "/",
            "<title>Hi</title><body><h1>A</h1><p>Text  here</p></body>",
        )
        .await;

        let result = Extractor::new().unwrap().extract(&url).await;

        assert_eq!(result.status, ExtractionStatus::Success);
        assert_eq!(result.title, "Hi");
        assert_eq!(result.headings, vec![Heading { level: 1, text: "A".to_string() }]);
        assert!(result.content.contains("Text here"), "{}", result.content);
        assert_eq!(result.url, url);
        assert_eq!(result.word_count, result.content.split_whitespace().count());
    }

    #[tokio::test]
    async fn test_extracts_metadata_and_skips_boilerplate() {
        let mut server = mockito::Server::new_async().await;
        let html = r#"<html><head>
            <title> Guide </title>
            <meta property="og:description" content="An og summary">
            <meta name="keywords" content="rust,html">
            <script>track()</script>
        </head><body>
            <nav>Menu</nav>
            <main>
                <h2>Setup</h2>
                <p>Install   the tool.</p>
            </main>
            <footer>Legal</footer>
        </body></html>"#;
        let url = serve(&mut server, "/guide", html).await;

        let result = Extractor::new().unwrap().extract(&url).await;

        assert_eq!(result.title, "Guide");
        assert_eq!(result.description, "An og summary");
        assert_eq!(result.keywords, "rust,html");
        assert_eq!(result.content, "Setup Install the tool.");
        assert_eq!(result.word_count, 4);
    }

    #[tokio::test]
    async fn test_latin1_page_is_decoded() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/menu")
            .with_status(200)
            .with_header("content-type", "text/html; charset=iso-8859-1")
            .with_body(b"<title>Caf\xe9</title><body><h1>Dessert</h1><p>Cr\xe8me br\xfbl\xe9e</p></body>".to_vec())
            .create_async()
            .await;
        let url = format!("{}/menu", server.url());

        let result = Extractor::new().unwrap().extract(&url).await;

        assert_eq!(result.title, "Caf\u{e9}");
        assert_eq!(result.content, "Dessert Cr\u{e8}me br\u{fb}l\u{e9}e");
        assert!(!result.content.contains('\u{fffd}'));
    }

    #[tokio::test]
    async fn test_heading_cap() {
        let mut server = mockito::Server::new_async().await;
        let headings: String = (0..15).map(|i| format!("<h2>Section {i}</h2>")).collect();
        let url = serve(&mut server, "/", &format!("<body>{headings}</body>")).await;

        let result = Extractor::new().unwrap().extract(&url).await;

        assert_eq!(result.headings.len(), 10);
        assert_eq!(result.headings[9].text, "Section 9");
    }

    #[tokio::test]
    async fn test_long_body_is_truncated() {
        let mut server = mockito::Server::new_async().await;
        let body = "abcde ".repeat(1000);
        let url = serve(&mut server, "/", &format!("<body><p>{body}</p></body>")).await;

        let result = Extractor::new().unwrap().extract(&url).await;

        assert_eq!(result.content.chars().count(), MAX_CONTENT_CHARS + 3);
        assert!(result.content.ends_with("..."));
        assert_eq!(result.word_count, result.content.split_whitespace().count());
    }

    #[tokio::test]
    async fn test_http_error_becomes_error_record() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/gone").with_status(500).create_async().await;
        let url = format!("{}/gone", server.url());

        let result = Extractor::new().unwrap().extract(&url).await;

        assert_eq!(result.status, ExtractionStatus::Error);
        assert_eq!(result.word_count, 0);
        assert!(result.headings.is_empty());
        assert!(result.content.ends_with("Error: HTTP error 500 - webpage not accessible."));
    }

    #[tokio::test]
    async fn test_unreachable_bare_host_gets_scheme() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let extractor = Extractor::new().unwrap();
        let first = extractor.extract(&addr.to_string()).await;
        let second = extractor.extract(&addr.to_string()).await;

        assert_eq!(first.status, ExtractionStatus::Error);
        assert_eq!(first.title, "External webpage");
        assert!(first.url.starts_with("https://"));
        assert!(first.content.starts_with(&format!("Viewing: https://{addr}")));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_timeout_becomes_error_record() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let extractor = Extractor::with_timeout(Duration::from_millis(200)).unwrap();
        let result = extractor.extract(&format!("http://{addr}/")).await;

        assert_eq!(result.status, ExtractionStatus::Error);
        assert!(result.content.ends_with(&format!("Error: {TIMEOUT_MESSAGE}")));
    }
}
