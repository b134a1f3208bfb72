//! Image XObject extraction.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use super::content::{page_resources, resolve_dict, stream_bytes, PageContent};
use crate::error::{Error, Result};
use crate::geometry::BoundingBox;
use crate::model::{ImageElement, DEFAULT_IMAGE_SIZE};

/// Extract every image XObject in a page's resources.
///
/// Images that cannot be decoded are skipped; only an unreadable resource
/// table fails the step.
pub fn extract_page_images(
    doc: &LopdfDocument,
    page_id: ObjectId,
    page_number: u32,
    content: Option<&PageContent>,
) -> Result<Vec<ImageElement>> {
    let Some(resources) = page_resources(doc, page_id) else {
        return Ok(Vec::new());
    };
    let Ok(xobjects) = resources.get(b"XObject") else {
        return Ok(Vec::new());
    };
    let xobjects = resolve_dict(doc, xobjects)
        .ok_or_else(|| Error::ImageDecode("XObject resource is not a dictionary".to_string()))?;

    let mut images = Vec::new();
    for (name, obj) in xobjects.iter() {
        let Ok(id) = obj.as_reference() else {
            continue;
        };
        let Ok(Object::Stream(stream)) = doc.get_object(id) else {
            continue;
        };
        if !is_image(&stream.dict) {
            continue;
        }

        match extract_image(stream) {
            Ok((bytes, ext)) => {
                let (width, height) = pixel_dimensions(&bytes);
                let bbox = content
                    .and_then(|c| c.placement_of(id))
                    .map(|p| p.bbox)
                    .unwrap_or_else(|| BoundingBox::new(0.0, 0.0, width as f32, height as f32));
                images.push(ImageElement::from_bytes(
                    &bytes,
                    ext,
                    (width, height),
                    bbox,
                    page_number,
                ));
            }
            Err(e) => log::warn!(
                "Page {}: skipping image {}: {}",
                page_number,
                String::from_utf8_lossy(name),
                e
            ),
        }
    }

    // Document order of placement, then declaration order.
    if let Some(content) = content {
        images.sort_by_key(|img| {
            content
                .placements
                .iter()
                .position(|p| p.bbox == img.bbox)
                .unwrap_or(usize::MAX)
        });
    }

    Ok(images)
}

fn is_image(dict: &Dictionary) -> bool {
    dict.get(b"Subtype")
        .ok()
        .and_then(|o| o.as_name().ok())
        .map(|n| n == b"Image")
        .unwrap_or(false)
}

/// Last filter in the stream's filter chain.
fn final_filter(dict: &Dictionary) -> Option<String> {
    match dict.get(b"Filter").ok()? {
        Object::Name(n) => Some(String::from_utf8_lossy(n).to_string()),
        Object::Array(arr) => arr
            .last()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string()),
        _ => None,
    }
}

/// Payload bytes and their format extension.
fn extract_image(stream: &Stream) -> Result<(Vec<u8>, &'static str)> {
    let dict = &stream.dict;

    match final_filter(dict).as_deref() {
        Some("DCTDecode") => Ok((stream.content.clone(), "jpeg")),
        Some("JPXDecode") => Ok((stream.content.clone(), "jpx")),
        _ => {
            let data = stream_bytes(stream).map_err(|e| Error::ImageDecode(e.to_string()))?;
            let png = encode_raw_as_png(dict, data)?;
            Ok((png, "png"))
        }
    }
}

/// Re-encode raw 8-bit samples as PNG.
fn encode_raw_as_png(dict: &Dictionary, data: Vec<u8>) -> Result<Vec<u8>> {
    let dim = |key: &[u8]| {
        dict.get(key)
            .ok()
            .and_then(|o| o.as_i64().ok())
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| *v > 0)
            .ok_or_else(|| Error::ImageDecode("missing image dimensions".to_string()))
    };
    let width = dim(b"Width")?;
    let height = dim(b"Height")?;

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8);
    if bits != 8 {
        return Err(Error::ImageDecode(format!(
            "unsupported bits per component: {}",
            bits
        )));
    }

    let components = color_components(dict);
    let Some((pixels, needed)) = (width as usize)
        .checked_mul(height as usize)
        .and_then(|p| Some((p, p.checked_mul(components)?)))
    else {
        return Err(Error::ImageDecode(format!(
            "image dimensions overflow: {}x{}",
            width, height
        )));
    };
    if data.len() < needed {
        return Err(Error::ImageDecode("truncated image data".to_string()));
    }

    let image = match components {
        1 => GrayImage::from_raw(width, height, data[..pixels].to_vec()).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(width, height, data[..pixels * 3].to_vec())
            .map(DynamicImage::ImageRgb8),
        4 => {
            let rgb: Vec<u8> = data[..pixels * 4]
                .chunks_exact(4)
                .flat_map(|p| {
                    let k = 255 - p[3] as u16;
                    [
                        ((255 - p[0] as u16) * k / 255) as u8,
                        ((255 - p[1] as u16) * k / 255) as u8,
                        ((255 - p[2] as u16) * k / 255) as u8,
                    ]
                })
                .collect();
            RgbImage::from_raw(width, height, rgb).map(DynamicImage::ImageRgb8)
        }
        n => {
            return Err(Error::ImageDecode(format!(
                "unsupported color component count: {}",
                n
            )))
        }
    }
    .ok_or_else(|| Error::ImageDecode("image buffer size mismatch".to_string()))?;

    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Number of color components declared by the image's color space.
fn color_components(dict: &Dictionary) -> usize {
    let Ok(cs) = dict.get(b"ColorSpace") else {
        return 1;
    };
    let name = match cs {
        Object::Name(n) => n.as_slice(),
        Object::Array(arr) => match arr.first() {
            Some(Object::Name(n)) => n.as_slice(),
            _ => return 0,
        },
        _ => return 0,
    };
    match name {
        b"DeviceGray" | b"CalGray" | b"G" => 1,
        b"DeviceRGB" | b"CalRGB" | b"RGB" => 3,
        b"DeviceCMYK" | b"CMYK" => 4,
        b"ICCBased" => icc_components(cs),
        _ => 0,
    }
}

fn icc_components(cs: &Object) -> usize {
    // Referenced profiles are assumed RGB.
    cs.as_array()
        .ok()
        .and_then(|arr| arr.get(1))
        .and_then(|o| o.as_stream().ok())
        .and_then(|s| s.dict.get(b"N").ok())
        .and_then(|n| n.as_i64().ok())
        .map(|n| n as usize)
        .unwrap_or(3)
}

/// Pixel size from the encoded header, or the default size.
pub fn pixel_dimensions(bytes: &[u8]) -> (u32, u32) {
    image::io::Reader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()
        .and_then(|reader| reader.into_dimensions().ok())
        .unwrap_or((DEFAULT_IMAGE_SIZE, DEFAULT_IMAGE_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn test_raw_rgb_becomes_png() {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 2,
            "Height" => 1,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };
        let stream = Stream::new(dict, vec![255, 0, 0, 0, 0, 255]);
        let (bytes, ext) = extract_image(&stream).unwrap();
        assert_eq!(ext, "png");
        assert_eq!(pixel_dimensions(&bytes), (2, 1));
    }

    #[test]
    fn test_cmyk_converts() {
        let dict = dictionary! {
            "Subtype" => "Image",
            "Width" => 1,
            "Height" => 1,
            "ColorSpace" => "DeviceCMYK",
            "BitsPerComponent" => 8,
        };
        let png = encode_raw_as_png(&dict, vec![0, 0, 0, 0]).unwrap();
        assert_eq!(pixel_dimensions(&png), (1, 1));
    }

    #[test]
    fn test_truncated_data_is_rejected() {
        let dict = dictionary! {
            "Subtype" => "Image",
            "Width" => 10,
            "Height" => 10,
            "ColorSpace" => "DeviceRGB",
        };
        assert!(encode_raw_as_png(&dict, vec![0; 5]).is_err());
    }

    #[test]
    fn test_oversized_dimensions_are_rejected() {
        let dict = dictionary! {
            "Subtype" => "Image",
            "Width" => u32::MAX as i64,
            "Height" => u32::MAX as i64,
            "ColorSpace" => "DeviceCMYK",
            "BitsPerComponent" => 8,
        };
        let err = encode_raw_as_png(&dict, vec![0; 16]).unwrap_err();
        assert!(err.to_string().contains("overflow"), "unexpected error: {err}");

        let stream = Stream::new(dict, vec![0; 16]);
        assert!(extract_image(&stream).is_err());
    }

    #[test]
    fn test_jpeg_passthrough() {
        let dict = dictionary! {
            "Subtype" => "Image",
            "Filter" => "DCTDecode",
            "Width" => 4,
            "Height" => 4,
        };
        let stream = Stream::new(dict, vec![0xFF, 0xD8, 0xFF]);
        let (bytes, ext) = extract_image(&stream).unwrap();
        assert_eq!(ext, "jpeg");
        assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_undecodable_header_uses_default_size() {
        assert_eq!(pixel_dimensions(b"not an image"), (100, 100));
    }
}
