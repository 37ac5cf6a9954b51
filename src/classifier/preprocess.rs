use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{imageops, DynamicImage};
use ndarray::Array4;

use super::error::ClassifierError;

/// Per-channel normalization applied after scaling pixels to [0,1].
/// These are the statistics the pretrained weights were fit against.
const CHANNEL_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const CHANNEL_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Decodes raw image bytes into a three-channel RGB bitmap.
///
/// Camera uploads frequently carry an EXIF orientation tag instead of
/// physically rotated pixels; the model has no knowledge of source
/// orientation, so the tag is applied here before anything else sees the
/// image. Bytes without EXIF data pass through unchanged.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ClassifierError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ClassifierError::ImageError(format!("Failed to decode image: {}", e)))?;
    let oriented = apply_exif_orientation(decoded, bytes);
    Ok(DynamicImage::ImageRgb8(oriented.to_rgb8()))
}

fn exif_orientation(bytes: &[u8]) -> Option<u32> {
    let exif = Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;
    exif.get_field(Tag::Orientation, In::PRIMARY)?
        .value
        .get_uint(0)
}

fn apply_exif_orientation(image: DynamicImage, bytes: &[u8]) -> DynamicImage {
    orient(image, exif_orientation(bytes))
}

fn orient(image: DynamicImage, orientation: Option<u32>) -> DynamicImage {
    match orientation {
        Some(2) => image.fliph(),
        Some(3) => image.rotate180(),
        Some(4) => image.flipv(),
        Some(5) => image.rotate90().fliph(),
        Some(6) => image.rotate90(),
        Some(7) => image.rotate270().fliph(),
        Some(8) => image.rotate270(),
        _ => image,
    }
}

/// Scales the image to fit the target dimensions, padding non-square inputs
/// onto a black canvas so the aspect ratio survives.
pub fn resize_image(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    if image.width() != image.height() {
        let (w, h) = (image.width() as f32, image.height() as f32);
        let scale = (width as f32 / w).min(height as f32 / h);
        let new_w = (w * scale) as u32;
        let new_h = (h * scale) as u32;

        let scaled = image.resize(new_w, new_h, imageops::FilterType::Triangle);

        let mut canvas = image::RgbImage::new(width, height);
        let x_offset = (width - new_w) / 2;
        let y_offset = (height - new_h) / 2;

        imageops::overlay(&mut canvas, &scaled.to_rgb8(), x_offset as i64, y_offset as i64);
        DynamicImage::ImageRgb8(canvas)
    } else {
        image.resize_exact(width, height, imageops::FilterType::Triangle)
    }
}

/// Converts an RGB bitmap into a normalized NCHW tensor of shape
/// [1, 3, height, width].
pub fn image_to_tensor(image: &DynamicImage) -> Array4<f32> {
    let rgb = image.to_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    let mut tensor = Array4::<f32>::zeros((1, 3, height, width));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            let value = pixel[c] as f32 / 255.0;
            tensor[[0, c, y as usize, x as usize]] = (value - CHANNEL_MEAN[c]) / CHANNEL_STD[c];
        }
    }

    tensor
}

/// Full preprocessing pipeline: resize to the model's input dimensions and
/// convert to a normalized tensor.
pub fn prepare(image: &DynamicImage, width: u32, height: u32) -> Array4<f32> {
    let resized = resize_image(image, width, height);
    image_to_tensor(&resized)
}
