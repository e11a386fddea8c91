//! PNG encoding of captured frames.

use std::io::Cursor;

use image::{ImageFormat, RgbImage};

use crate::error::CaptureError;

/// Encode a frame as lossless PNG for the describer.
///
/// Capture frequency is low (one frame every few seconds at most), so
/// fidelity wins over bandwidth.
pub fn encode_png(frame: &RgbImage) -> Result<Vec<u8>, CaptureError> {
    let mut buf = Vec::new();
    frame.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_frame_starts_with_png_magic() {
        let frame = RgbImage::from_pixel(4, 4, image::Rgb([200, 10, 10]));
        let png = encode_png(&frame).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
    }

    #[test]
    fn encoded_frame_decodes_back_to_same_dimensions() {
        let frame = RgbImage::from_pixel(6, 3, image::Rgb([0, 128, 255]));
        let png = encode_png(&frame).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), 6);
        assert_eq!(decoded.height(), 3);
    }
}
