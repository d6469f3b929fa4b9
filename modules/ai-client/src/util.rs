use serde_json::{Map, Value};

use crate::error::JsonExtractError;

/// Upper bound on `{` positions tried by [`extract_json_object`].
pub const MAX_JSON_CANDIDATES: usize = 64;

/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

/// Find the first valid JSON object embedded in free-form model output.
///
/// Each top-level `{` is tried in order as the start of a JSON value; the
/// first one that decodes wins and anything after it is ignored. Prose,
/// markdown fences and stray braces before the object are skipped. When a
/// candidate fails, every `{` nested inside it is skipped too, so a truncated
/// or malformed object never yields one of its inner objects. Gives up after
/// [`MAX_JSON_CANDIDATES`] candidates.
pub fn extract_json_object(response: &str) -> Result<Map<String, Value>, JsonExtractError> {
    let mut first_error = None;
    let mut resume_at = 0;
    let mut tried = 0;

    for (start, _) in response.match_indices('{') {
        if start < resume_at {
            continue;
        }
        if tried == MAX_JSON_CANDIDATES {
            break;
        }
        tried += 1;

        let mut stream =
            serde_json::Deserializer::from_str(&response[start..]).into_iter::<Map<String, Value>>();
        match stream.next() {
            Some(Ok(object)) => return Ok(object),
            Some(Err(e)) => {
                first_error.get_or_insert(e);
                resume_at = candidate_end(response, start);
            }
            None => {}
        }
    }

    Err(match first_error {
        Some(e) => JsonExtractError::Malformed(e),
        None => JsonExtractError::NotFound,
    })
}

/// Byte offset just past the `}` that balances the `{` at `start`, or the end
/// of `text` when it never closes. Braces inside string literals don't count.
fn candidate_end(text: &str, start: usize) -> usize {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in text.as_bytes()[start..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return start + offset + 1;
                }
            }
            _ => {}
        }
    }

    text.len()
}
