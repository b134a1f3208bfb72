//! Raster images prepared for embedding as image XObjects.

use std::io::{Cursor, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::{ColorType, ImageFormat};
use lopdf::{dictionary, Stream};

use crate::error::{Error, Result};

/// Image payload ready to become an XObject stream.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    pub width: u32,
    pub height: u32,
    color_space: &'static str,
    filter: &'static str,
    data: Vec<u8>,
}

impl EmbeddedImage {
    /// Prepare encoded image bytes.
    ///
    /// JPEG payloads pass through as DCT; anything else the `image` crate
    /// decodes is stored as Flate-compressed RGB.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let format = image::guess_format(bytes)?;
        let decoded = image::load_from_memory(bytes)?;
        let (width, height) = (decoded.width(), decoded.height());
        if width == 0 || height == 0 {
            return Err(Error::ImageDecode("empty image".to_string()));
        }

        if format == ImageFormat::Jpeg {
            let color_space = match decoded.color() {
                ColorType::L8 | ColorType::L16 => "DeviceGray",
                _ => "DeviceRGB",
            };
            return Ok(Self {
                width,
                height,
                color_space,
                filter: "DCTDecode",
                data: bytes.to_vec(),
            });
        }

        let rgb = decoded.to_rgb8();
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(rgb.as_raw())?;
        let data = encoder.finish()?;

        Ok(Self {
            width,
            height,
            color_space: "DeviceRGB",
            filter: "FlateDecode",
            data,
        })
    }

    /// Width over height.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// The XObject stream.
    pub fn into_stream(self) -> Stream {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.width as i64,
            "Height" => self.height as i64,
            "ColorSpace" => self.color_space,
            "BitsPerComponent" => 8,
            "Filter" => self.filter,
        };
        // Already encoded; keep lopdf from compressing it again.
        Stream::new(dict, self.data).with_compression(false)
    }
}

/// Encode an RGB buffer as PNG.
pub fn rgb_to_png(width: u32, height: u32, pixels: Vec<u8>) -> Result<Vec<u8>> {
    let buffer = image::RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| Error::ImageDecode("pixel buffer size mismatch".to_string()))?;
    let mut out = Cursor::new(Vec::new());
    buffer.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}
