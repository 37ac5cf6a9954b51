use std::collections::HashMap;
use std::sync::Arc;

use image::DynamicImage;
use ort::session::Session;
use ort::value::Tensor;

use super::error::ClassifierError;
use super::utils::{argmax, softmax};
use super::{Classify, ClassifierInfo, Prediction};
use crate::ModelCharacteristics;

/// A thread-safe image classifier backed by an ONNX model.
///
/// # Thread Safety
///
/// This type is automatically `Send + Sync` because all of its fields are
/// thread-safe: `String` and `ModelCharacteristics` are `Send + Sync`, and
/// `Session` and the label vocabulary are wrapped in `Arc`. The classifier is
/// loaded once at startup and shared read-only for the process lifetime.
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use lookbook::{BuiltinModel, ImageClassifier};
///
/// let classifier = ImageClassifier::builder()
///     .with_model(BuiltinModel::SqueezeNet)?
///     .build()?;
///
/// let image = image::open("photo.jpg")?;
/// let prediction = classifier.predict(&image)?;
/// println!("{} ({:.2}%)", prediction.label,
///     prediction.probabilities[prediction.label_index] * 100.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ImageClassifier {
    pub model_path: String,
    pub labels_path: String,
    pub session: Arc<Session>,
    pub labels: Arc<Vec<String>>,
    pub model_characteristics: ModelCharacteristics,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<ImageClassifier>();
    }
};

impl ImageClassifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> ClassifierInfo {
        ClassifierInfo {
            model_path: self.model_path.clone(),
            labels_path: self.labels_path.clone(),
            num_labels: self.labels.len(),
            labels: self.labels.as_ref().clone(),
            input_width: self.model_characteristics.input_width,
            input_height: self.model_characteristics.input_height,
        }
    }

    /// Predicts the label of a decoded image and returns the full probability
    /// vector.
    ///
    /// The image must already be orientation-normalized (see
    /// [`preprocess::decode_image`](super::preprocess::decode_image));
    /// resizing and tensor conversion happen here. The returned probabilities
    /// are softmax output, index-aligned with the vocabulary.
    pub fn predict(&self, image: &DynamicImage) -> Result<Prediction, ClassifierError> {
        let tensor = super::preprocess::prepare(
            image,
            self.model_characteristics.input_width,
            self.model_characteristics.input_height,
        );
        let input_dyn = tensor.into_dyn();
        let input = input_dyn.as_standard_layout();

        let input_name = self
            .session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| ClassifierError::ModelError("Model has no inputs".into()))?;

        let mut input_tensors = HashMap::new();
        input_tensors.insert(
            input_name.as_str(),
            Tensor::from_array(&input).map_err(|e| {
                ClassifierError::ModelError(format!("Failed to create input tensor: {}", e))
            })?,
        );

        let outputs = self
            .session
            .run(input_tensors)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to run model: {}", e)))?;
        let output_tensor = outputs[0].try_extract_tensor::<f32>().map_err(|e| {
            ClassifierError::ModelError(format!("Failed to extract output tensor: {}", e))
        })?;

        let scores: Vec<f32> = output_tensor.iter().cloned().collect();
        if scores.len() != self.labels.len() {
            return Err(ClassifierError::PredictionError(format!(
                "Model produced {} scores for {} labels; vocabulary does not match the model",
                scores.len(),
                self.labels.len()
            )));
        }

        let probabilities = softmax(&scores);
        let label_index = argmax(&probabilities).ok_or_else(|| {
            ClassifierError::PredictionError("Model produced an empty probability vector".into())
        })?;

        Ok(Prediction {
            label: self.labels[label_index].clone(),
            label_index,
            probabilities,
        })
    }
}

impl Classify for ImageClassifier {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn predict_image(&self, image: &DynamicImage) -> Result<Prediction, ClassifierError> {
        self.predict(image)
    }
}
