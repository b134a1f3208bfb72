//! Embedded raster images.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::BoundingBox;

/// Default pixel size when an image header cannot be decoded.
pub const DEFAULT_IMAGE_SIZE: u32 = 100;

/// An image extracted from a page, carried as a data URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    /// `data:image/<ext>;base64,...`
    pub data: String,
    /// Pixel width
    pub width: u32,
    /// Pixel height
    pub height: u32,
    /// Placement on the page
    pub bbox: BoundingBox,
    /// Payload format extension (`png`, `jpeg`, `jpx`, ...)
    pub ext: String,
    /// 1-based page number
    pub page: u32,
}

impl ImageElement {
    /// Build an element from a raw payload.
    pub fn from_bytes(
        bytes: &[u8],
        ext: &str,
        (width, height): (u32, u32),
        bbox: BoundingBox,
        page: u32,
    ) -> Self {
        Self {
            data: to_data_uri(ext, bytes),
            width,
            height,
            bbox,
            ext: ext.to_string(),
            page,
        }
    }

    /// Decoded payload bytes.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        parse_data_uri(&self.data).map(|(_, bytes)| bytes)
    }
}

/// Encode bytes as a base64 data URI.
pub fn to_data_uri(ext: &str, bytes: &[u8]) -> String {
    format!("data:image/{};base64,{}", ext, BASE64.encode(bytes))
}

/// Split a base64 data URI into its format extension and payload.
pub fn parse_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| Error::ImageDecode("not a data URI".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::ImageDecode("data URI without payload".to_string()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| Error::ImageDecode("data URI is not base64".to_string()))?;
    let ext = mime.rsplit('/').next().unwrap_or(mime).to_string();
    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|e| Error::ImageDecode(e.to_string()))?;
    Ok((ext, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_prefix() {
        let uri = to_data_uri("png", &[1, 2, 3]);
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_parse_data_uri() {
        let (ext, bytes) = parse_data_uri("data:image/jpeg;base64,AQID").unwrap();
        assert_eq!(ext, "jpeg");
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_rejects_plain_urls() {
        assert!(parse_data_uri("https://example.com/x.png").is_err());
        assert!(parse_data_uri("data:image/png,raw").is_err());
    }

    #[test]
    fn test_element_bytes() {
        let img = ImageElement::from_bytes(
            b"abc",
            "png",
            (4, 2),
            BoundingBox::new(0.0, 0.0, 4.0, 2.0),
            1,
        );
        assert_eq!(img.bytes().unwrap(), b"abc");
        assert_eq!(img.ext, "png");
    }
}
