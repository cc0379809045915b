use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::{
    DetectorConfig, ElaResult,
    analysis::ela::ElaAnalyzer,
    detection::{Classifier, Detection, onnx::OnnxClassifier, prepare_input},
    error::{DetectionError, Result},
    image_utils::thumbnail,
    report::DetectionReport,
};

#[derive(Debug, Clone)]
pub struct DetectionOutcome {
    pub detection: Detection,
    pub ela: ElaResult,
}

pub struct ForgeryDetector<C: Classifier = OnnxClassifier> {
    config: DetectorConfig,
    classifier: Option<C>,
    model_error: Option<DetectionError>,
    selected: Option<PathBuf>,
}

impl ForgeryDetector<OnnxClassifier> {
    // A load failure is kept in `model_error` rather than returned.
    pub fn new(config: DetectorConfig) -> Self {
        match OnnxClassifier::load(&config.model_path) {
            Ok(classifier) => Self::with_classifier(config, Some(classifier)),
            Err(err) => {
                log::error!("Error loading model: {}", err);
                let mut detector = Self::with_classifier(config, None);
                detector.model_error = Some(err);
                detector
            }
        }
    }
}

impl<C: Classifier> ForgeryDetector<C> {
    pub fn with_classifier(config: DetectorConfig, classifier: Option<C>) -> Self {
        Self {
            config,
            classifier,
            model_error: None,
            selected: None,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn model_error(&self) -> Option<&DetectionError> {
        self.model_error.as_ref()
    }

    pub fn is_model_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn selected_image(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    /// `None` clears the selection. A path that fails to decode leaves the
    /// previous selection in place.
    pub fn select_image(&mut self, path: Option<PathBuf>) -> Result<Option<RgbaImage>> {
        let Some(path) = path else {
            self.selected = None;
            return Ok(None);
        };

        let image = image::open(&path)?;
        let preview = thumbnail(&image, self.config.preview_size);

        log::info!("Selected {} ({}x{})", path.display(), image.width(), image.height());
        self.selected = Some(path);

        Ok(Some(preview))
    }

    pub fn detect(&mut self) -> Result<DetectionOutcome> {
        let path = self.selected.as_ref().ok_or(DetectionError::NoImageSelected)?;
        let classifier = self.classifier.as_mut().ok_or(DetectionError::ModelNotLoaded)?;

        let ela = ElaAnalyzer::new(self.config.ela_quality).analyze_path(path)?;
        let input = prepare_input(&ela.image, self.config.input_size);
        let prediction = classifier.predict(&input)?;
        let detection = Detection::from_prediction(prediction);

        match DetectionReport::new(path, &detection, &ela).to_json() {
            Ok(json) => log::info!("Detection via {}: {}", classifier.name(), json),
            Err(err) => log::warn!("Could not serialize detection report: {}", err),
        }

        Ok(DetectionOutcome { detection, ela })
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;
    use crate::detection::{ClassifierInput, Prediction, Verdict};

    struct FixedClassifier {
        prediction: Prediction,
        last_shape: Option<Vec<usize>>,
    }

    impl Classifier for FixedClassifier {
        fn predict(&mut self, input: &ClassifierInput) -> Result<Prediction> {
            self.last_shape = Some(input.shape().to_vec());
            Ok(self.prediction)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingClassifier;

    impl Classifier for FailingClassifier {
        fn predict(&mut self, _input: &ClassifierInput) -> Result<Prediction> {
            Err(DetectionError::Inference("boom".into()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn fixed(tampered: f32, authentic: f32) -> Option<FixedClassifier> {
        Some(FixedClassifier {
            prediction: Prediction::new(tampered, authentic),
            last_shape: None,
        })
    }

    fn write_sample(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("sample.png");
        RgbImage::from_fn(64, 48, |x, y| Rgb([(x * 4) as u8, (y * 5) as u8, 90]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_detect_without_selection() {
        let mut detector = ForgeryDetector::with_classifier(DetectorConfig::default(), fixed(0.5, 0.5));
        let err = detector.detect().unwrap_err();

        assert!(matches!(err, DetectionError::NoImageSelected));
        assert_eq!(err.user_message(), "Please select an image first!");
    }

    #[test]
    fn test_detect_without_model() {
        let dir = tempfile::tempdir().unwrap();
        let mut detector: ForgeryDetector<FixedClassifier> =
            ForgeryDetector::with_classifier(DetectorConfig::default(), None);

        detector.select_image(Some(write_sample(&dir))).unwrap();
        let err = detector.detect().unwrap_err();

        assert!(matches!(err, DetectionError::ModelNotLoaded));
    }

    #[test]
    fn test_detect_reports_verdict() {
        let dir = tempfile::tempdir().unwrap();
        let config = DetectorConfig::default().with_ela_quality(85);
        let mut detector = ForgeryDetector::with_classifier(config, fixed(0.3, 0.7));

        let preview = detector.select_image(Some(write_sample(&dir))).unwrap().unwrap();
        assert_eq!(preview.dimensions(), (64, 48));

        let outcome = detector.detect().unwrap();
        assert_eq!(outcome.detection.verdict, Verdict::Authentic);
        assert_eq!(outcome.ela.image.dimensions(), (64, 48));
        assert_eq!(outcome.ela.quality, 85);

        let shape = detector.classifier.as_ref().unwrap().last_shape.clone();
        assert_eq!(shape, Some(vec![1, 128, 128, 3]));
    }

    #[test]
    fn test_bad_image_keeps_previous_selection() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_sample(&dir);
        let bad = dir.path().join("broken.png");
        std::fs::write(&bad, b"not an image").unwrap();

        let mut detector = ForgeryDetector::with_classifier(DetectorConfig::default(), fixed(0.9, 0.1));
        detector.select_image(Some(good.clone())).unwrap();

        assert!(detector.select_image(Some(bad)).is_err());
        assert_eq!(detector.selected_image(), Some(good.as_path()));
    }

    #[test]
    fn test_cancelled_selection_clears() {
        let dir = tempfile::tempdir().unwrap();
        let mut detector = ForgeryDetector::with_classifier(DetectorConfig::default(), fixed(0.9, 0.1));

        detector.select_image(Some(write_sample(&dir))).unwrap();
        assert!(detector.select_image(None).unwrap().is_none());
        assert!(detector.selected_image().is_none());
        assert!(matches!(detector.detect(), Err(DetectionError::NoImageSelected)));
    }

    #[test]
    fn test_inference_error_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        let mut detector =
            ForgeryDetector::with_classifier(DetectorConfig::default(), Some(FailingClassifier));

        detector.select_image(Some(write_sample(&dir))).unwrap();
        let err = detector.detect().unwrap_err();

        assert_eq!(err.user_message(), "Error during detection: Inference failed: boom");
        assert!(detector.selected_image().is_some());
    }

    #[test]
    fn test_missing_model_is_recorded() {
        let config = DetectorConfig::default().with_model_path("missing/model.onnx");
        let detector = ForgeryDetector::new(config);

        assert!(!detector.is_model_loaded());
        assert!(matches!(detector.model_error(), Some(DetectionError::ModelLoad { .. })));
    }
}
