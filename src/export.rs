// Turns a FrameBuffer into bytes that can be stored and shown again later.
// PNG: lossless, so a saved drawing looks exactly like the canvas.

use crate::error::Error;
use crate::types::FrameBuffer;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};

pub const PNG_MIME: &str = "image/png";

/// Encode the buffer as an 8-bit RGB PNG.
pub fn encode_png(fb: &FrameBuffer) -> Result<Vec<u8>, Error> {
    if fb.width == 0 || fb.height == 0 || fb.pixels.len() != fb.width * fb.height {
        return Err(Error::Encode(format!(
            "buffer is {}x{} with {} pixels",
            fb.width,
            fb.height,
            fb.pixels.len()
        )));
    }

    // 0x00RRGGBB -> packed RGB bytes
    let mut rgb = Vec::with_capacity(fb.pixels.len() * 3);
    for &px in &fb.pixels {
        rgb.push(((px >> 16) & 0xFF) as u8);
        rgb.push(((px >> 8) & 0xFF) as u8);
        rgb.push((px & 0xFF) as u8);
    }

    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(&rgb, fb.width as u32, fb.height as u32, ExtendedColorType::Rgb8)
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(out)
}

/// Decode a PNG (or any format `image` can read) back into a FrameBuffer.
pub fn decode_image(bytes: &[u8]) -> Result<FrameBuffer, Error> {
    let img: RgbImage = image::load_from_memory(bytes)
        .map_err(|e| Error::Encode(e.to_string()))?
        .to_rgb8();
    Ok(from_rgb_image(&img))
}

/// Pack an `image` RGB buffer as 0x00RRGGBB pixels.
pub fn from_rgb_image(img: &RgbImage) -> FrameBuffer {
    let (w, h) = img.dimensions();
    let mut pixels = Vec::with_capacity((w as usize) * (h as usize));
    for pixel in img.pixels() {
        let [r, g, b] = pixel.0;
        pixels.push(((r as u32) << 16) | ((g as u32) << 8) | b as u32);
    }
    FrameBuffer { width: w as usize, height: h as usize, pixels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgb;

    #[test]
    fn png_keeps_pixels_exact() {
        let mut fb = FrameBuffer::new(5, 3, Rgb::WHITE);
        fb.pixels[7] = Rgb::new(0xE5, 0x39, 0x35).0;

        let bytes = encode_png(&fb).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        assert_eq!(decode_image(&bytes).unwrap(), fb);
    }

    #[test]
    fn malformed_buffer_is_an_encode_error() {
        let fb = FrameBuffer { width: 4, height: 4, pixels: vec![0; 3] };
        assert!(matches!(encode_png(&fb), Err(Error::Encode(_))));
    }
}
