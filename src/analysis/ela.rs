use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};
use jpeg_encoder::{ColorType, Encoder, SamplingFactor};

use crate::{
    ElaResult,
    error::{DetectionError, Result},
    image_utils::channel_extrema,
};

pub struct ElaAnalyzer {
    quality: u8,
}

impl ElaAnalyzer {
    pub fn new(quality: u8) -> Self {
        Self { quality }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn analyze_path<P: AsRef<Path>>(&self, path: P) -> Result<ElaResult> {
        let image = image::open(path)?;
        self.analyze(&image)
    }

    pub fn analyze(&self, image: &DynamicImage) -> Result<ElaResult> {
        if self.quality > 100 {
            return Err(DetectionError::InvalidParameter(format!(
                "JPEG quality must be within 0..=100, got {}",
                self.quality
            )));
        }

        let rgb_image = image.to_rgb8();
        let (width, height) = rgb_image.dimensions();

        let recompressed = self.recompress_jpeg(&rgb_image)?.to_rgb8();

        let mut difference = RgbImage::new(width, height);
        let mut total = 0u64;

        for ((out, orig), recomp) in difference
            .pixels_mut()
            .zip(rgb_image.pixels())
            .zip(recompressed.pixels())
        {
            for c in 0..3 {
                let diff = orig[c].abs_diff(recomp[c]);
                out[c] = diff;
                total += diff as u64;
            }
        }

        let max_difference = channel_extrema(&difference)
            .iter()
            .map(|&(_, max)| max)
            .max()
            .unwrap_or(0);

        // An identical recompression leaves every channel at zero.
        let divisor = max_difference.max(1);
        let ela_image = rescale(&difference, divisor);

        let samples = width as u64 * height as u64 * 3;
        let mean_difference = if samples > 0 {
            total as f64 / samples as f64
        } else {
            0.0
        };

        log::debug!(
            "ELA at quality {}: {}x{}, max difference {}, mean difference {:.3}",
            self.quality,
            width,
            height,
            max_difference,
            mean_difference
        );

        Ok(ElaResult {
            image: ela_image,
            quality: self.quality,
            max_difference,
            scale: 255.0 / divisor as f64,
            mean_difference,
        })
    }

    fn recompress_jpeg(&self, image: &RgbImage) -> Result<DynamicImage> {
        let encoded = self.encode_jpeg(image)?;
        let recompressed = image::load_from_memory_with_format(&encoded, ImageFormat::Jpeg)?;

        Ok(recompressed)
    }

    // Baseline JPEG with 4:2:0 chroma subsampling, the libjpeg default.
    fn encode_jpeg(&self, image: &RgbImage) -> Result<Vec<u8>> {
        let (width, height) = image.dimensions();
        let (width, height) = match (u16::try_from(width), u16::try_from(height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => {
                return Err(DetectionError::InvalidParameter(format!(
                    "{}x{} exceeds the JPEG size limit",
                    width, height
                )));
            }
        };

        let mut buffer = Vec::new();
        let mut encoder = Encoder::new(&mut buffer, self.quality.max(1));
        encoder.set_sampling_factor(SamplingFactor::R_4_2_0);
        encoder.encode(image.as_raw(), width, height, ColorType::Rgb)?;

        Ok(buffer)
    }
}

fn rescale(difference: &RgbImage, divisor: u8) -> RgbImage {
    let divisor = divisor.max(1) as u32;
    let mut scaled = difference.clone();

    for value in scaled.iter_mut() {
        *value = ((*value as u32 * 255) / divisor).min(255) as u8;
    }

    scaled
}

pub fn convert_to_ela_image<P: AsRef<Path>>(path: P, quality: u8) -> Result<RgbImage> {
    Ok(ElaAnalyzer::new(quality).analyze_path(path)?.image)
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x ^ y) * 5 % 256) as u8])
        }))
    }

    #[test]
    fn test_ela_analyzer_creation() {
        let analyzer = ElaAnalyzer::new(90);
        assert_eq!(analyzer.quality(), 90);
    }

    #[test]
    fn test_dimensions_preserved() {
        let result = ElaAnalyzer::new(90).analyze(&gradient(37, 21)).unwrap();
        assert_eq!(result.image.dimensions(), (37, 21));
    }

    #[test]
    fn test_max_difference_maps_to_full_brightness() {
        let result = ElaAnalyzer::new(50).analyze(&gradient(64, 64)).unwrap();
        assert!(result.max_difference > 0);

        let brightest = result.image.iter().copied().max().unwrap();
        assert_eq!(brightest, 255);
    }

    #[test]
    fn test_rescale_zero_difference_unchanged() {
        let zeros = RgbImage::new(8, 8);
        let scaled = rescale(&zeros, 0);
        assert!(scaled.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_rescale_floor() {
        let mut diff = RgbImage::new(1, 1);
        diff.put_pixel(0, 0, Rgb([7, 3, 0]));

        let scaled = rescale(&diff, 7);
        assert_eq!(scaled.get_pixel(0, 0), &Rgb([255, 109, 0]));
    }

    #[test]
    fn test_rejects_quality_above_100() {
        let err = ElaAnalyzer::new(101).analyze(&gradient(8, 8)).unwrap_err();
        assert!(matches!(err, DetectionError::InvalidParameter(_)));
    }

    fn sof0_sampling(jpeg: &[u8]) -> Vec<(u8, u8)> {
        let start = jpeg
            .windows(2)
            .position(|w| w == [0xFF, 0xC0])
            .expect("baseline SOF0 marker");
        let components = jpeg[start + 9] as usize;

        (0..components)
            .map(|i| {
                let byte = jpeg[start + 11 + i * 3];
                (byte >> 4, byte & 0x0F)
            })
            .collect()
    }

    #[test]
    fn test_recompression_uses_420_subsampling() {
        let rgb = gradient(40, 24).to_rgb8();
        let jpeg = ElaAnalyzer::new(90).encode_jpeg(&rgb).unwrap();

        assert_eq!(sof0_sampling(&jpeg), vec![(2, 2), (1, 1), (1, 1)]);
    }

    #[test]
    fn test_quality_zero_still_encodes() {
        let result = ElaAnalyzer::new(0).analyze(&gradient(16, 16)).unwrap();
        assert_eq!(result.image.dimensions(), (16, 16));
    }

    #[test]
    fn test_flat_image_has_small_error() {
        let flat = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([128, 128, 128])));
        let result = ElaAnalyzer::new(90).analyze(&flat).unwrap();

        assert!(result.max_difference <= 2);
        assert!(result.scale >= 255.0 / 2.0);
    }
}
