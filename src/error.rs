use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Image loading error: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("JPEG encoding error: {0}")]
    Encode(#[from] jpeg_encoder::EncodingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("failed to load model from {path}: {source}")]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: ort::Error,
    },

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("tensor shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("No image selected")]
    NoImageSelected,

    #[error("Model not loaded")]
    ModelNotLoaded,
}

impl DetectionError {
    /// Text shown to the user in an error dialog.
    pub fn user_message(&self) -> String {
        match self {
            DetectionError::NoImageSelected => "Please select an image first!".into(),
            DetectionError::ModelNotLoaded => "Model not loaded!".into(),
            DetectionError::ModelLoad { .. } => "Could not load the model!".into(),
            other => format!("Error during detection: {}", other),
        }
    }
}

impl From<ort::Error> for DetectionError {
    fn from(err: ort::Error) -> Self {
        DetectionError::Inference(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DetectionError>;
