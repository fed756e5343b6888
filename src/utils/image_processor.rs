use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader, Rgb, RgbImage, Rgba};
use std::io::Cursor;
use tracing::warn;

use crate::error::AppError;

/// Prepares a reference photo for the image-generation provider: applies the
/// EXIF orientation, flattens transparency onto white and re-encodes as RGB PNG.
pub fn normalize_reference_image(data: &[u8]) -> Result<Vec<u8>, AppError> {
    // 1. Decode, honouring the orientation tag
    let mut decoder = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| AppError::InternalServerError(format!("Failed to read image: {}", e)))?
        .into_decoder()
        .map_err(|e| AppError::InternalServerError(format!("Failed to load image: {}", e)))?;
    let orientation = decoder
        .orientation()
        .map_err(|e| AppError::InternalServerError(format!("Failed to read orientation: {}", e)))?;
    let mut img = DynamicImage::from_decoder(decoder)
        .map_err(|e| AppError::InternalServerError(format!("Failed to decode image: {}", e)))?;
    img.apply_orientation(orientation);

    // 2. Drop alpha
    let rgb = flatten_onto_white(img);

    // 3. Encode
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(rgb)
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| AppError::InternalServerError(format!("Failed to encode image: {}", e)))?;

    Ok(buffer.into_inner())
}

/// Best-effort variant of [`normalize_reference_image`]: any failure hands back
/// the original bytes.
pub fn normalize_or_original(data: &[u8]) -> Vec<u8> {
    match normalize_reference_image(data) {
        Ok(normalized) => normalized,
        Err(e) => {
            warn!(error = %e, "Could not normalize reference image, sending original bytes");
            data.to_vec()
        }
    }
}

fn flatten_onto_white(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// MIME type of an encoded image, defaulting to JPEG when the format is unknown.
pub fn mime_type(data: &[u8]) -> &'static str {
    match image::guess_format(data) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::WebP) => "image/webp",
        _ => "image/jpeg",
    }
}
