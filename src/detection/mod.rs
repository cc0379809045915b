pub mod onnx;

use std::fmt;

use image::RgbImage;
use ndarray::Array4;
use serde::{Deserialize, Serialize};

use crate::{error::Result, image_utils::rgb_to_input_array};

pub type ClassifierInput = Array4<f32>;

pub fn prepare_input(ela_image: &RgbImage, size: u32) -> ClassifierInput {
    rgb_to_input_array(ela_image, size)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Authentic,
    Tampered,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Authentic => "AUTHENTIC",
            Verdict::Tampered => "TAMPERED",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub tampered: f32,
    pub authentic: f32,
}

impl Prediction {
    pub fn new(tampered: f32, authentic: f32) -> Self {
        Self { tampered, authentic }
    }

    pub fn from_slice(values: &[f32]) -> Option<Self> {
        match values {
            [tampered, authentic] => Some(Self::new(*tampered, *authentic)),
            _ => None,
        }
    }

    pub fn sum(&self) -> f32 {
        self.tampered + self.authentic
    }

    /// Equal probabilities fall through to `Tampered`.
    pub fn verdict(&self) -> Verdict {
        if self.authentic > self.tampered {
            Verdict::Authentic
        } else {
            Verdict::Tampered
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub verdict: Verdict,
    pub confidence: f64,
    pub prediction: Prediction,
}

impl Detection {
    pub fn from_prediction(prediction: Prediction) -> Self {
        let verdict = prediction.verdict();
        let probability = match verdict {
            Verdict::Authentic => prediction.authentic,
            Verdict::Tampered => prediction.tampered,
        };

        Self {
            verdict,
            confidence: probability as f64 * 100.0,
            prediction,
        }
    }

    pub fn summary(&self) -> String {
        format!("Result: {}\nConfidence: {:.2}%", self.verdict, self.confidence)
    }
}

pub trait Classifier {
    fn predict(&mut self, input: &ClassifierInput) -> Result<Prediction>;

    fn name(&self) -> &str;
}
