//! Single-page content extraction and the assistant that answers questions
//! about the extracted page.
//!
//! The pipeline is fetch → normalize → field extraction → summarize. Every
//! outcome, including transport failures, is an [`ExtractionResult`] of the
//! same shape.

pub mod assistant;
pub mod classifier;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod fields;
pub mod normalizer;
pub mod summarizer;
pub mod utils;

use serde::{Deserialize, Serialize};

pub use error::FetchError;
pub use extractor::Extractor;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    Success,
    Error,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

/// Bounded summary of one webpage.
///
/// Built once per extraction and never mutated afterwards. Success and error
/// results share this shape; only `status` tells them apart.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub content: String,
    pub url: String,
    pub headings: Vec<Heading>,
    pub word_count: usize,
    pub status: ExtractionStatus,
}

impl ExtractionResult {
    pub fn is_success(&self) -> bool {
        self.status == ExtractionStatus::Success
    }
}

/// Counts whitespace-delimited tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
