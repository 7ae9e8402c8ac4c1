use tracing::error;

use crate::{ExtractionResult, ExtractionStatus, FetchError};

pub const ERROR_TITLE: &str = "External webpage";
pub const ERROR_DESCRIPTION: &str = "Could not extract content";

pub const TIMEOUT_MESSAGE: &str = "Request timeout - the webpage took too long to respond.";
pub const CONNECTION_MESSAGE: &str = "Connection error - unable to reach the webpage.";
pub const GENERIC_MESSAGE: &str = "Could not extract content from this webpage.";

/// User-facing explanation for a fetch failure.
///
/// Unclassified causes are logged here and replaced with a generic message.
pub fn failure_message(err: &FetchError, url: &str) -> String {
    match err {
        FetchError::Timeout => TIMEOUT_MESSAGE.to_string(),
        FetchError::Connection(_) => CONNECTION_MESSAGE.to_string(),
        FetchError::HttpStatus(code) => format!("HTTP error {code} - webpage not accessible."),
        FetchError::InvalidUrl(_) | FetchError::Other(_) => {
            error!(url, error = %err, "Error extracting webpage content");
            GENERIC_MESSAGE.to_string()
        }
    }
}

pub fn classify(err: &FetchError, url: &str) -> ExtractionResult {
    error_result(url, &failure_message(err, url))
}

pub fn error_result(url: &str, message: &str) -> ExtractionResult {
    ExtractionResult {
        title: ERROR_TITLE.to_string(),
        description: ERROR_DESCRIPTION.to_string(),
        keywords: String::new(),
        content: format!("Viewing: {url}\n\nError: {message}"),
        url: url.to_string(),
        headings: Vec::new(),
        word_count: 0,
        status: ExtractionStatus::Error,
    }
}
