//! Recovers a JSON payload from free-form model output.
//!
//! Nothing here knows about schemas. The helpers only isolate a candidate span;
//! callers decode and validate it.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static LEADING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^```(?:json)?").expect("LEADING_FENCE is a valid regex pattern"));
static TRAILING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```$").expect("TRAILING_FENCE is a valid regex pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsonPayloadError {
    #[error("No JSON payload found in model response")]
    NotFound,
}

/// Removes a leading ```` ``` ```` / ```` ```json ```` marker and a trailing
/// ```` ``` ```` marker, trimming whitespace around both.
pub fn strip_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_leading = LEADING_FENCE.replace(trimmed, "");
    let without_trailing = TRAILING_FENCE.replace(without_leading.trim_end(), "");
    without_trailing.trim().to_string()
}

/// True when the fence-stripped text opens a JSON object or array but does
/// not close it with the matching delimiter.
pub fn looks_truncated(raw: &str) -> bool {
    let text = strip_fences(raw);
    if text.starts_with('{') {
        !text.ends_with('}')
    } else if text.starts_with('[') {
        !text.ends_with(']')
    } else {
        false
    }
}

/// Returns the span from the first `{` to the last `}`, or from the first `[`
/// to the last `]`, whichever opening delimiter comes first. A bare array of
/// card objects therefore yields the whole array, not its first object. When
/// the earlier delimiter has no closing partner the other kind is tried.
///
/// Known limitation: the span is chosen by position only. Prose that contains
/// its own braces before the real payload widens the span, and the caller's
/// JSON decode then fails.
pub fn extract_json_payload(raw: &str) -> Result<String, JsonPayloadError> {
    let text = strip_fences(raw);

    let array_first = match (text.find('['), text.find('{')) {
        (Some(bracket), Some(brace)) => bracket < brace,
        (Some(_), None) => true,
        _ => false,
    };
    let order = if array_first {
        [('[', ']'), ('{', '}')]
    } else {
        [('{', '}'), ('[', ']')]
    };

    order
        .iter()
        .find_map(|&(open, close)| delimited_span(&text, open, close))
        .map(str::to_string)
        .ok_or(JsonPayloadError::NotFound)
}

fn delimited_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}
