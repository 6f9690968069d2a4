use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

use crate::shared::data_uri::encode_data_uri;

/// Synthetic "photographic" RGB image: smooth gradients overlaid with
/// deterministic noise, so lossy encoders have detail to throw away.
pub fn photo_image(width: u32, height: u32) -> DynamicImage {
    let mut state: u32 = 0x9E37_79B9;
    let img = RgbImage::from_fn(width, height, |x, y| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let noise = (state % 48) as u8;
        Rgb([
            ((x * 255 / width.max(1)) as u8).saturating_add(noise),
            ((y * 255 / height.max(1)) as u8).saturating_add(noise / 2),
            (((x + y) % 256) as u8).wrapping_add(noise),
        ])
    });
    DynamicImage::ImageRgb8(img)
}

/// Semi-transparent RGBA image
pub fn translucent_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 200, ((x + y) % 256) as u8])
    });
    DynamicImage::ImageRgba8(img)
}

/// Encode `img` into `format` with the image crate defaults
pub fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(&photo_image(width, height), ImageFormat::Png)
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(&photo_image(width, height), ImageFormat::Jpeg)
}

pub fn png_data_uri(width: u32, height: u32) -> String {
    encode_data_uri("image/png", &png_bytes(width, height))
}

pub fn jpeg_data_uri(width: u32, height: u32) -> String {
    encode_data_uri("image/jpeg", &jpeg_bytes(width, height))
}
