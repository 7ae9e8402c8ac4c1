use page_extractor::ExtractionResult;
use serde::{Deserialize, Serialize};

/// The page a user is currently chatting about.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatSession {
    pub url: String,
    pub webpage_info: ExtractionResult,
}
