//! Texture re-encoding into Radiance RGBE pictures.

use crate::error::Result;
use image::codecs::hdr::HdrEncoder as RgbeEncoder;
use image::Rgb;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Converts a source texture into a Radiance `.hdr` picture.
pub trait HdrEncoder {
    fn encode(&self, source: &Path, target: &Path) -> Result<()>;
}

/// Decodes with the `image` crate (PNG, JPEG, HDR) and writes RGBE.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageHdrEncoder;

impl HdrEncoder for ImageHdrEncoder {
    fn encode(&self, source: &Path, target: &Path) -> Result<()> {
        let picture = image::open(source)?.to_rgb32f();
        let (width, height) = picture.dimensions();
        let pixels: Vec<Rgb<f32>> = picture.pixels().copied().collect();

        let writer = BufWriter::new(File::create(target)?);
        RgbeEncoder::new(writer).encode(&pixels, width as usize, height as usize)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb as Rgb8};

    #[test]
    fn test_png_to_hdr() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("checker.png");
        let target = dir.path().join("checker.hdr");

        let png: ImageBuffer<Rgb8<u8>, Vec<u8>> = ImageBuffer::from_fn(4, 2, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb8([255, 255, 255])
            } else {
                Rgb8([0, 0, 0])
            }
        });
        png.save(&source).unwrap();

        ImageHdrEncoder.encode(&source, &target).unwrap();
        let bytes = std::fs::read(&target).unwrap();
        assert!(bytes.starts_with(b"#?RADIANCE"));

        let decoded = image::open(&target).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 2));
    }

    #[test]
    fn test_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let result = ImageHdrEncoder.encode(&dir.path().join("nope.png"), &dir.path().join("x.hdr"));
        assert!(result.is_err());
    }
}
