//! Wire protocol helpers shared by the transports.

use bada_core::{ApiResult, Envelope, TransportError};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde_json::Value;

/// Serialize an envelope as the JSON request body.
///
/// # Errors
/// Returns error if the payload cannot be serialized.
pub fn encode_envelope(envelope: &Envelope) -> Result<String, TransportError> {
    serde_json::to_string(envelope).map_err(|e| TransportError::Decode(e.to_string()))
}

/// Decode a JSON response body into a normalized result.
///
/// # Errors
/// Returns error if the body is not JSON.
pub fn decode_result(body: &str) -> Result<ApiResult, TransportError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| TransportError::Decode(e.to_string()))?;
    Ok(ApiResult::from_value(value))
}

/// Split a callback script `name({...});` into callback name and argument.
///
/// Tolerates surrounding whitespace, a trailing semicolon and the `/**/`
/// prefix some backends emit.
///
/// # Errors
/// Returns error if the script is not a single callback invocation with a
/// JSON argument.
pub fn parse_callback(script: &str) -> Result<(String, Value), TransportError> {
    let script = script.trim();
    let script = script.strip_prefix("/**/").unwrap_or(script).trim_start();
    let script = script.strip_suffix(';').unwrap_or(script).trim_end();

    let malformed = || TransportError::Decode("malformed callback script".to_string());

    let open = script.find('(').ok_or_else(malformed)?;
    let name = script[..open].trim();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
        return Err(malformed());
    }
    let args = script[open + 1..].strip_suffix(')').ok_or_else(malformed)?;

    let value = serde_json::from_str(args).map_err(|e| TransportError::Decode(e.to_string()))?;
    Ok((name.to_string(), value))
}

/// Base64-encode raw image bytes for upload.
#[must_use]
pub fn encode_image(data: &[u8]) -> String {
    BASE64.encode(data)
}
