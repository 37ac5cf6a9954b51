use image::DynamicImage;

pub mod builder;
mod classifier;
mod error;
pub mod preprocess;
mod utils;

pub use builder::ClassifierBuilder;
pub use classifier::ImageClassifier;
pub use error::ClassifierError;

/// The outcome of a single inference call.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// The label with the highest probability
    pub label: String,
    /// Position of `label` in the vocabulary and in `probabilities`
    pub label_index: usize,
    /// Softmax output, one value per label, summing to ~1
    pub probabilities: Vec<f32>,
}

/// The inference contract the presentation layer depends on.
///
/// `ImageClassifier` is the production implementation; tests substitute a
/// deterministic fixture so the page can be exercised without model files.
pub trait Classify: Send + Sync {
    /// The ordered label vocabulary the classifier predicts over
    fn labels(&self) -> &[String];

    /// Runs inference on a decoded, orientation-normalized bitmap
    fn predict_image(&self, image: &DynamicImage) -> Result<Prediction, ClassifierError>;
}

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Path to the ONNX model file
    pub model_path: String,
    /// Path to the label vocabulary file
    pub labels_path: String,
    /// Number of labels the classifier predicts over
    pub num_labels: usize,
    /// The label vocabulary, in model output order
    pub labels: Vec<String>,
    /// Width of the model's input bitmap
    pub input_width: u32,
    /// Height of the model's input bitmap
    pub input_height: u32,
}
