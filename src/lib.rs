use std::path::{Path, PathBuf};

use image::RgbImage;

pub mod error;
pub mod image_utils;
pub mod analysis;
pub mod detection;
pub mod report;
pub mod session;

pub use detection::{Classifier, Detection, Prediction, Verdict};
pub use error::{DetectionError, Result};
pub use session::{DetectionOutcome, ForgeryDetector};

pub const DEFAULT_MODEL_PATH: &str = "final_forgery_detection_model.onnx";

#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub model_path: PathBuf,
    pub ela_quality: u8,
    pub input_size: u32,
    pub preview_size: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            ela_quality: 90,
            input_size: 128,
            preview_size: 300,
        }
    }
}

impl DetectorConfig {
    pub fn with_model_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.model_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_ela_quality(mut self, quality: u8) -> Self {
        self.ela_quality = quality;
        self
    }

    pub fn with_preview_size(mut self, size: u32) -> Self {
        self.preview_size = size;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ElaResult {
    pub image: RgbImage,
    pub quality: u8,
    /// Largest raw per-channel difference before rescaling.
    pub max_difference: u8,
    pub scale: f64,
    pub mean_difference: f64,
}

impl ElaResult {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }
}
