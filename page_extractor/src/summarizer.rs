use crate::fields::PageFields;
use crate::{word_count, ExtractionResult, ExtractionStatus};

pub const MAX_CONTENT_CHARS: usize = 5000;
pub const MAX_HEADINGS: usize = 10;
pub const TRUNCATION_MARKER: &str = "...";

/// Builds the success record, enforcing the content and heading caps.
pub fn summarize(fields: PageFields, url: String) -> ExtractionResult {
    let PageFields {
        title,
        description,
        keywords,
        mut headings,
        body_text,
    } = fields;

    let content = truncate_content(body_text);
    headings.truncate(MAX_HEADINGS);

    ExtractionResult {
        title,
        description,
        keywords,
        word_count: word_count(&content),
        content,
        url,
        headings,
        status: ExtractionStatus::Success,
    }
}

/// Cuts to [`MAX_CONTENT_CHARS`] characters and appends the marker, which is
/// not counted against the budget.
pub fn truncate_content(mut text: String) -> String {
    if let Some((idx, _)) = text.char_indices().nth(MAX_CONTENT_CHARS) {
        text.truncate(idx);
        text.push_str(TRUNCATION_MARKER);
    }
    text
}
