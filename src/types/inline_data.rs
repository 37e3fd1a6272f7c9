use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// An inline, base64-encoded media payload.
///
/// This is the attachment representation used both in the conversation
/// store and on the wire. The media_type must be one of the supported
/// image formats: "image/jpeg", "image/png", "image/gif", or "image/webp".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// The media type of the payload.
    pub mime_type: ImageMediaType,

    /// The base64-encoded bytes of the payload.
    pub data: String,
}

/// Supported image media types
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ImageMediaType {
    #[serde(rename = "image/jpeg")]
    Jpeg,

    #[serde(rename = "image/png")]
    Png,

    #[serde(rename = "image/gif")]
    Gif,

    #[serde(rename = "image/webp")]
    Webp,
}

impl ImageMediaType {
    /// The MIME type string for this media type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMediaType::Jpeg => "image/jpeg",
            ImageMediaType::Png => "image/png",
            ImageMediaType::Gif => "image/gif",
            ImageMediaType::Webp => "image/webp",
        }
    }
}

impl InlineData {
    /// Create a new InlineData from an already base64-encoded string.
    pub fn new(data: String, mime_type: ImageMediaType) -> Self {
        Self { mime_type, data }
    }

    /// Create InlineData by base64-encoding raw bytes.
    pub fn from_bytes(bytes: &[u8], mime_type: ImageMediaType) -> Self {
        let data = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self { mime_type, data }
    }

    /// Create InlineData from an image file on disk.
    ///
    /// This reads the whole file and encodes it as base64. The media type
    /// is determined from the file extension. No size validation is
    /// performed.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mime_type = match path.extension().and_then(|ext| ext.to_str()) {
            Some("jpg") | Some("jpeg") => ImageMediaType::Jpeg,
            Some("png") => ImageMediaType::Png,
            Some("gif") => ImageMediaType::Gif,
            Some("webp") => ImageMediaType::Webp,
            _ => {
                return Err(Error::validation(
                    "unsupported file extension; must be jpeg, png, gif, or webp",
                    Some("path".to_string()),
                ));
            }
        };

        let mut file = File::open(path)
            .map_err(|err| Error::io(format!("failed to open {}", path.display()), err))?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)
            .map_err(|err| Error::io(format!("failed to read {}", path.display()), err))?;

        Ok(Self::from_bytes(&buffer, mime_type))
    }
}
