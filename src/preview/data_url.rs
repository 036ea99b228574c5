/// Self-contained `data:` URLs for previewed files
///
/// The URL carries the whole file as base64, so it can be used directly
/// as an image source without a separate fetch.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use image::ImageFormat;
use std::path::Path;

use crate::error::PreviewError;

/// MIME type used when neither the bytes nor the extension say otherwise
const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl(String);

impl DataUrl {
    /// Encode `bytes` read from `path`
    ///
    /// The MIME type is sniffed from the magic bytes first, then guessed
    /// from the file extension.
    pub fn encode(path: &Path, bytes: &[u8]) -> Self {
        Self::with_mime(mime_type(path, bytes), bytes)
    }

    pub fn with_mime(mime: &str, bytes: &[u8]) -> Self {
        DataUrl(format!("data:{};base64,{}", mime, BASE64_STANDARD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// MIME type declared in the URL header
    pub fn mime(&self) -> Option<&str> {
        let header = self.0.strip_prefix("data:")?.split_once(',')?.0;
        header.strip_suffix(";base64")
    }

    /// Recover the original bytes
    pub fn decode(&self) -> Result<Vec<u8>, PreviewError> {
        let (_, payload) = self.0.split_once(";base64,").ok_or(PreviewError::Malformed)?;
        Ok(BASE64_STANDARD.decode(payload)?)
    }
}

fn mime_type(path: &Path, bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .or_else(|_| ImageFormat::from_path(path))
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}
