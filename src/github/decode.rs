// src/github/decode.rs
// =============================================================================
// Transfer decoding of file bodies.
//
// The contents and readme endpoints embed file bodies in JSON as base64,
// wrapped at 60 columns with '\n'. Every code path that consumes a file body
// goes through `decode_file` so there is exactly one decoder.
// =============================================================================

use data_encoding::BASE64;

use super::types::{FileContent, RawFile};
use crate::error::{ExploreError, ExploreResult};

/// Decodes a raw file body into its bytes
pub fn decode_file(raw: RawFile) -> ExploreResult<FileContent> {
    let encoding = raw.encoding.as_deref().unwrap_or("base64");
    let content = raw.content.unwrap_or_default();

    let bytes = match encoding {
        "base64" => decode_base64(&content)?,
        // Files above the contents API size limit come back with
        // encoding "none" and an empty body
        "none" => {
            return Err(ExploreError::malformed(format!(
                "{} is too large to be returned by the contents API",
                raw.path
            )))
        }
        "utf-8" | "utf8" => content.into_bytes(),
        other => {
            return Err(ExploreError::malformed(format!(
                "unsupported content encoding '{}' for {}",
                other, raw.path
            )))
        }
    };

    Ok(FileContent { name: raw.name, path: raw.path, bytes })
}

/// Decodes base64 that may contain line breaks
pub fn decode_base64(content: &str) -> ExploreResult<Vec<u8>> {
    let compact: Vec<u8> = content
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    BASE64
        .decode(&compact)
        .map_err(|e| ExploreError::malformed(format!("invalid base64 content: {}", e)))
}
