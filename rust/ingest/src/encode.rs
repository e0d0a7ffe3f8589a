// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Page image encoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, Rgb, RgbImage};

use crate::IngestError;

/// Encode raw bytes as a `data:` URI.
pub fn data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

/// JPEG-encode a rendered page as a data URI.
///
/// Lossy: drawing pages compress far better as JPEG than PNG, and request
/// size to the inference service is the binding constraint, not fidelity.
/// Transparency is flattened onto white first, matching how the page would
/// print.
pub fn encode_jpeg_data_uri(image: &DynamicImage, quality: u8) -> Result<String, IngestError> {
    let rgb = flatten_onto_white(image);

    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| IngestError::PageEncode(e.to_string()))?;

    Ok(data_uri("image/jpeg", &buffer))
}

/// Composite an image onto a white background, discarding alpha.
fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = pixel[3] as u32;
        let blend = |channel: u8| -> u8 {
            ((channel as u32 * alpha + 255 * (255 - alpha)) / 255) as u8
        };
        rgb.put_pixel(x, y, Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
    }

    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn data_uri_has_expected_prefix() {
        let uri = data_uri("image/png", &[1, 2, 3]);
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(uri, "data:image/png;base64,AQID");
    }

    #[test]
    fn transparent_pixels_flatten_to_white() {
        let mut rgba = image::RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        rgba.put_pixel(1, 0, Rgba([10, 20, 30, 255]));

        let rgb = flatten_onto_white(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(rgb.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(rgb.get_pixel(1, 0).0, [10, 20, 30]);
    }

    #[test]
    fn jpeg_encoding_produces_a_jpeg_data_uri() {
        let image = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            8,
            8,
            Rgba([200, 200, 200, 255]),
        ));
        let uri = encode_jpeg_data_uri(&image, 80).unwrap();
        assert!(uri.starts_with("data:image/jpeg;base64,"));
    }
}
