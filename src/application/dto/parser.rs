// src/application/dto/parser.rs
// Parsers for extraction output

use serde::Deserialize;

use super::{ApplicationError, TradePayloadDto};

/// One line of CLI input: an extraction result and the text it came from
#[derive(Debug, Clone, PartialEq)]
pub struct InputLine {
    pub raw_payload: String,
    pub original_input: String,
}

/// Optional wrapper pairing an extraction result with its source text
#[derive(Debug, Deserialize)]
struct Envelope {
    input: String,
    payload: serde_json::Value,
}

/// Split an input line into payload text and original trade call.
///
/// Lines of the form `{"input": "...", "payload": ...}` carry the source text.
/// A string payload is raw model output and is passed on verbatim so code
/// fences survive; an object payload is re-encoded. Any other line is taken
/// as a bare payload.
pub fn parse_input_line(line: &str) -> InputLine {
    match serde_json::from_str::<Envelope>(line) {
        Ok(envelope) => InputLine {
            raw_payload: match envelope.payload {
                serde_json::Value::String(raw) => raw,
                other => other.to_string(),
            },
            original_input: envelope.input,
        },
        Err(_) => InputLine {
            raw_payload: line.to_string(),
            original_input: String::new(),
        },
    }
}

/// Parse one extraction result into a payload DTO.
///
/// Models often wrap their JSON in a Markdown code fence; the fence and any
/// language tag are stripped before parsing.
pub fn parse_payload_json(raw: &str) -> Result<TradePayloadDto, ApplicationError> {
    serde_json::from_str(strip_code_fence(raw)).map_err(ApplicationError::JsonError)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner).trim();

    // Drop an info string such as `json`, on its own line or before the body
    let tag_len = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    let body = inner[tag_len..].trim_start();
    if tag_len > 0 && (body.starts_with('{') || body.starts_with('[')) {
        body
    } else {
        inner
    }
}
