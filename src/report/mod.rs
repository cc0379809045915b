use std::path::Path;

use serde::Serialize;

use crate::{ElaResult, detection::{Detection, Verdict}};

#[derive(Debug, Serialize)]
pub struct DetectionReport {
    pub image_path: String,
    pub verdict: Verdict,
    pub confidence: f64,
    pub tampered_probability: f32,
    pub authentic_probability: f32,
    pub ela: ElaReportSection,
}

#[derive(Debug, Serialize)]
pub struct ElaReportSection {
    pub quality: u8,
    pub max_difference: u8,
    pub mean_difference: f64,
}

impl DetectionReport {
    pub fn new(path: &Path, detection: &Detection, ela: &ElaResult) -> Self {
        Self {
            image_path: path.to_string_lossy().to_string(),
            verdict: detection.verdict,
            confidence: detection.confidence,
            tampered_probability: detection.prediction.tampered,
            authentic_probability: detection.prediction.authentic,
            ela: ElaReportSection {
                quality: ela.quality,
                max_difference: ela.max_difference,
                mean_difference: ela.mean_difference,
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
