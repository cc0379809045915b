use std::path::{Path, PathBuf};

use ort::{session::Session, value::Tensor};

use crate::{
    detection::{Classifier, ClassifierInput, Prediction},
    error::{DetectionError, Result},
};

const PROBABILITY_SUM_TOLERANCE: f32 = 1e-2;

// Input [1, H, W, 3], output [1, 2] as (tampered, authentic).
pub struct OnnxClassifier {
    session: Session,
    path: PathBuf,
}

impl OnnxClassifier {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let session = Session::builder()
            .map_err(|source| DetectionError::ModelLoad {
                path: path.clone(),
                source,
            })?
            .commit_from_file(&path)
            .map_err(|source| DetectionError::ModelLoad {
                path: path.clone(),
                source,
            })?;

        log::info!("Loaded classifier from {}", path.display());

        Ok(Self { session, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&mut self, input: &ClassifierInput) -> Result<Prediction> {
        let (batch, height, width, channels) = input.dim();
        let data: Vec<f32> = input.iter().copied().collect();
        let tensor = Tensor::from_array(([batch, height, width, channels], data))?;

        let outputs = self.session.run(ort::inputs![tensor])?;

        let output = outputs
            .values()
            .next()
            .ok_or_else(|| DetectionError::ShapeMismatch {
                expected: "probability output".into(),
                actual: "no output".into(),
            })?;

        let (_, values) = output.try_extract_tensor::<f32>()?;
        let values = values.to_vec();

        parse_probabilities(&values)
    }

    fn name(&self) -> &str {
        "onnx"
    }
}

fn parse_probabilities(values: &[f32]) -> Result<Prediction> {
    let prediction = Prediction::from_slice(values).ok_or_else(|| DetectionError::ShapeMismatch {
        expected: "2 class probabilities".into(),
        actual: format!("{} values", values.len()),
    })?;

    if !prediction.tampered.is_finite() || !prediction.authentic.is_finite() {
        return Err(DetectionError::Inference(format!(
            "non-finite probabilities {:?}",
            values
        )));
    }

    if (prediction.sum() - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
        log::warn!(
            "Class probabilities sum to {:.4}, expected ~1",
            prediction.sum()
        );
    }

    Ok(prediction)
}
