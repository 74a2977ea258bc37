use serde::Deserialize;
use thiserror::Error;

/// The completion model is asked for a bare JSON object but routinely wraps
/// it in prose or code fences. Extraction here is purely syntactic; whether
/// the decoded object is a legal command is `Command::validate`'s job.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseFailure {
    #[error("no structured object found")]
    NoObject,
    #[error("decode failure")]
    Decode,
}

/// Loosely decoded model reply, mirroring the wire shape the prompt asks for:
/// `{"type":"action","function":"create","input":"Buy milk"}`. Every field is
/// optional; nothing is trusted yet.
#[derive(Debug, Deserialize)]
pub struct WireIntent {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub function: Option<String>,
    pub input: Option<String>,
    pub message: Option<String>,
}

/// Extracts and decodes the first balanced JSON object in `raw`.
pub fn parse(raw: &str) -> Result<WireIntent, ParseFailure> {
    let span = first_object_span(raw).ok_or(ParseFailure::NoObject)?;
    serde_json::from_str(span).map_err(|_| ParseFailure::Decode)
}

/// First balanced `{ ... }` span, tracking string and escape state so braces
/// inside JSON strings do not terminate the span early.
fn first_object_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in raw[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
