//! Inline attachment decoding

use base64::{engine::general_purpose::STANDARD, Engine};
use percent_encoding::percent_decode_str;

use crate::errors::DeployError;
use crate::models::request::Attachment;

/// Bytes of an inline attachment, `None` for one given by external URL.
///
/// The payload is whatever follows the first `,` of the `data:` URL. It is
/// read as standard base64 when the header ends in `;base64`, ignoring
/// whitespace, and percent-decoded otherwise.
pub fn inline_bytes(attachment: &Attachment) -> Result<Option<Vec<u8>>, DeployError> {
    if !attachment.is_inline() {
        return Ok(None);
    }

    let invalid = |message: String| DeployError::AttachmentError {
        name: attachment.name.clone(),
        message,
    };

    let (header, payload) = attachment
        .url
        .split_once(',')
        .ok_or_else(|| invalid("data URL has no payload".to_string()))?;

    if !is_base64(header) {
        return Ok(Some(percent_decode_str(payload).collect()));
    }

    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| invalid(format!("invalid base64: {}", e)))?;

    Ok(Some(bytes))
}

fn is_base64(header: &str) -> bool {
    header
        .rsplit(';')
        .next()
        .is_some_and(|param| param.trim().eq_ignore_ascii_case("base64"))
}
