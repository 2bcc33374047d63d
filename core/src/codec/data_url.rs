//! `data:` URL handling for embedded images.
//!
//! The front end never sees filesystem paths, so image content travels as self-describing
//! strings of the form `data:image/<subtype>;base64,<payload>`. Files on disk hold the raw
//! decoded bytes; the type tag is recovered from the file extension when reading back.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use crate::error::ShellError;

use super::Result;

const SCHEME: &str = "data:";
const IMAGE_PREFIX: &str = "image/";
const BASE64_MARKER: &str = ";base64";

/// Decoded image payload together with its declared subtype (`png`, `jpeg`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    subtype: String,
    bytes: Vec<u8>,
}

impl DataUrl {
    pub fn new(subtype: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { subtype: subtype.into().to_ascii_lowercase(), bytes }
    }

    /// Parse an image `data:` URL, rejecting non-image media types and non-base64 payloads.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let rest = strip_prefix_ignore_case(trimmed, SCHEME)
            .ok_or_else(|| ShellError::InvalidImageData("expected a data: URL".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| ShellError::InvalidImageData("missing payload separator".into()))?;

        let header = header.trim();
        let media = strip_suffix_ignore_case(header, BASE64_MARKER)
            .ok_or_else(|| ShellError::InvalidImageData("payload is not base64 encoded".into()))?;
        // Drop parameters such as `;charset=...`; only the media type matters.
        let media_type = media.split(';').next().unwrap_or_default().trim();
        let subtype = strip_prefix_ignore_case(media_type, IMAGE_PREFIX)
            .filter(|subtype| !subtype.is_empty())
            .ok_or_else(|| {
                ShellError::InvalidImageData(format!("unsupported media type {media_type:?}"))
            })?;

        let compact: String = payload.chars().filter(|ch| !ch.is_ascii_whitespace()).collect();
        let bytes = BASE64_STANDARD
            .decode(compact.as_bytes())
            .map_err(|err| ShellError::InvalidImageData(format!("base64 decode failed: {err}")))?;

        Ok(Self::new(subtype, bytes))
    }

    /// Rebuild a data URL for bytes stored under `file_name`.
    pub fn for_file(file_name: &str, bytes: Vec<u8>) -> Self {
        Self::new(mime_subtype_for_file(file_name), bytes)
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// File extension conventionally used for this subtype, if it is one the store lists.
    pub fn file_extension(&self) -> Option<&'static str> {
        match self.subtype.as_str() {
            "jpeg" | "jpg" => Some("jpg"),
            "png" => Some("png"),
            "gif" => Some("gif"),
            "webp" => Some("webp"),
            _ => None,
        }
    }

    pub fn encode(&self) -> String {
        format!(
            "{SCHEME}{IMAGE_PREFIX}{};base64,{}",
            self.subtype,
            BASE64_STANDARD.encode(&self.bytes)
        )
    }
}

/// Type tag for a stored file: the lowercased extension, with `jpg` spelled `jpeg` and `png`
/// assumed when the name carries no extension.
pub fn mime_subtype_for_file(file_name: &str) -> String {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty());

    match ext.as_deref() {
        None => "png".to_string(),
        Some("jpg") => "jpeg".to_string(),
        Some(other) => other.to_string(),
    }
}

fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let head = input.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &input[prefix.len()..])
}

fn strip_suffix_ignore_case<'a>(input: &'a str, suffix: &str) -> Option<&'a str> {
    let split = input.len().checked_sub(suffix.len())?;
    let tail = input.get(split..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &input[..split])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_png_data_url() {
        let parsed = DataUrl::parse("data:image/png;base64,AQIDBA==").expect("parse");
        assert_eq!(parsed.subtype(), "png");
        assert_eq!(parsed.bytes(), &[1, 2, 3, 4]);
        assert_eq!(parsed.file_extension(), Some("png"));
    }

    #[test]
    fn tolerates_parameters_case_and_whitespace() {
        let parsed =
            DataUrl::parse("  DATA:Image/JPEG;name=map.jpg;BASE64,AQID\nBA==  ").expect("parse");
        assert_eq!(parsed.subtype(), "jpeg");
        assert_eq!(parsed.bytes(), &[1, 2, 3, 4]);
        assert_eq!(parsed.file_extension(), Some("jpg"));
    }

    #[test]
    fn rejects_non_image_and_non_base64_payloads() {
        for input in [
            "AQIDBA==",
            "data:text/plain;base64,AQIDBA==",
            "data:image/png,rawtext",
            "data:image/;base64,AQIDBA==",
            "data:image/png;base64,***",
        ] {
            let err = DataUrl::parse(input).expect_err(input);
            assert!(matches!(err, ShellError::InvalidImageData(_)), "{input}: {err}");
        }
    }

    #[test]
    fn encodes_back_to_data_url() {
        let url = DataUrl::new("gif", vec![0x47, 0x49, 0x46]).encode();
        assert_eq!(url, "data:image/gif;base64,R0lG");
    }

    #[test]
    fn subtype_follows_extension() {
        assert_eq!(mime_subtype_for_file("goblin.JPG"), "jpeg");
        assert_eq!(mime_subtype_for_file("map.webp"), "webp");
        assert_eq!(mime_subtype_for_file("token"), "png");
        assert_eq!(DataUrl::for_file("a.gif", vec![]).subtype(), "gif");
    }
}
