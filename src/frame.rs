//! Decoded image payloads.
//!
//! The server ships each camera capture as an encoded image (JPEG in
//! practice) inside one wire frame. This module turns that payload into a
//! flat RGB8 buffer the detector and the color scorer can read.

use crate::detect::BoundingBox;

/// A decoded camera frame: RGB8 pixels, row-major, no padding.
pub struct DecodedFrame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl DecodedFrame {
    /// Wrap an already-decoded RGB8 buffer. `pixels.len()` must equal
    /// `width * height * 3`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 3);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Decode a wire payload. Returns `None` when the payload is not a
    /// decodable image; the caller skips the frame with a neutral command.
    pub fn from_wire(payload: &[u8]) -> Option<Self> {
        let decoded = match image::load_from_memory(payload) {
            Ok(img) => img,
            Err(e) => {
                log::debug!("image decode failed ({} byte payload): {}", payload.len(), e);
                return None;
            }
        };
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        Some(Self {
            width,
            height,
            pixels: rgb.into_raw(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB triple at a pixel. `x`/`y` must be in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = ((y * self.width + x) * 3) as usize;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    /// Iterate the pixels inside a box, clamped to the image.
    pub fn region_pixels<'a>(
        &'a self,
        bbox: &BoundingBox,
    ) -> impl Iterator<Item = [u8; 3]> + 'a {
        let clamped = bbox.clamp_to(self.width, self.height);
        let x0 = clamped.x as u32;
        let y0 = clamped.y as u32;
        let w = clamped.w as u32;
        let h = clamped.h as u32;
        (y0..y0 + h).flat_map(move |y| (x0..x0 + w).map(move |x| self.pixel(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_payload_yields_none() {
        assert!(DecodedFrame::from_wire(b"definitely not an image").is_none());
    }

    #[test]
    fn empty_payload_yields_none() {
        assert!(DecodedFrame::from_wire(b"").is_none());
    }

    #[test]
    fn png_payload_decodes_with_dimensions() {
        let img = image::RgbImage::from_pixel(8, 6, image::Rgb([10, 200, 30]));
        let mut encoded = std::io::Cursor::new(Vec::new());
        img.write_to(&mut encoded, image::ImageFormat::Png).unwrap();

        let frame = DecodedFrame::from_wire(encoded.get_ref()).unwrap();
        assert_eq!((frame.width(), frame.height()), (8, 6));
        assert_eq!(frame.pixel(0, 0), [10, 200, 30]);
    }

    #[test]
    fn region_pixels_counts_clamped_area() {
        let frame = DecodedFrame::new(4, 4, vec![7; 4 * 4 * 3]);
        let bbox = BoundingBox::new(2, 2, 10, 10);
        assert_eq!(frame.region_pixels(&bbox).count(), 4);
    }
}
