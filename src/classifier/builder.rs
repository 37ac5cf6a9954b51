use std::collections::HashSet;
use std::fs;
use std::sync::Arc;

use log::{error, info};
use ort::session::Session;

use super::classifier::ImageClassifier;
use super::error::ClassifierError;
use crate::{
    runtime::{create_session_builder, RuntimeConfig},
    BuiltinModel, ModelCharacteristics, ModelManager,
};

const DEFAULT_INPUT_EDGE: u32 = 224;

/// A builder for constructing an ImageClassifier with a fluent interface.
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    model_path: Option<String>,
    labels_path: Option<String>,
    session: Option<Session>,
    labels: Option<Vec<String>>,
    model_characteristics: Option<ModelCharacteristics>,
    runtime_config: RuntimeConfig,
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance with default configuration
    pub fn new() -> Self {
        Self {
            model_path: None,
            labels_path: None,
            session: None,
            labels: None,
            model_characteristics: None,
            runtime_config: RuntimeConfig::default(),
        }
    }

    /// Sets the runtime configuration for ONNX model execution
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Sets the model to use for classification using a built-in model type.
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - The model paths are already set
    ///   - The model is not downloaded
    ///   - The model or label vocabulary failed to load
    ///   - The model structure is invalid
    pub fn with_model(self, model: BuiltinModel) -> Result<Self, ClassifierError> {
        let manager = ModelManager::new_default().map_err(|e| {
            ClassifierError::BuildError(format!("Failed to create model manager: {}", e))
        })?;

        let info = model.get_model_info();
        if !manager.is_model_downloaded(&info.name) {
            return Err(ClassifierError::BuildError(format!(
                "Model '{}' is not downloaded. Please download it first using ModelManager::download_model()",
                info.name
            )));
        }

        let model_path = manager.get_model_path(&info.name);
        let labels_path = manager.get_labels_path(&info.name);
        self.load(
            &model_path.to_string_lossy(),
            &labels_path.to_string_lossy(),
            model.characteristics(),
        )
    }

    /// Sets a custom model and label vocabulary path for the classifier.
    ///
    /// # Arguments
    /// * `model_path` - Path to the ONNX model file
    /// * `labels_path` - Path to the label vocabulary file (JSON array of strings)
    /// * `input_size` - Optional (width, height) the model expects. Defaults to
    ///   224x224, the most common contract for pretrained image classifiers.
    pub fn with_custom_model(
        self,
        model_path: &str,
        labels_path: &str,
        input_size: Option<(u32, u32)>,
    ) -> Result<Self, ClassifierError> {
        if model_path.is_empty() || labels_path.is_empty() {
            return Err(ClassifierError::BuildError(
                "Model and labels paths cannot be empty".to_string(),
            ));
        }
        if !std::path::Path::new(model_path).exists() {
            return Err(ClassifierError::BuildError(format!(
                "Model file not found: {}",
                model_path
            )));
        }
        if !std::path::Path::new(labels_path).exists() {
            return Err(ClassifierError::BuildError(format!(
                "Labels file not found: {}",
                labels_path
            )));
        }

        let (input_width, input_height) =
            input_size.unwrap_or((DEFAULT_INPUT_EDGE, DEFAULT_INPUT_EDGE));
        let characteristics = ModelCharacteristics {
            input_width,
            input_height,
            model_size_mb: 0, // Not critical for functionality
        };
        self.load(model_path, labels_path, characteristics)
    }

    fn load(
        mut self,
        model_path: &str,
        labels_path: &str,
        characteristics: ModelCharacteristics,
    ) -> Result<Self, ClassifierError> {
        if self.model_path.is_some() || self.labels_path.is_some() {
            return Err(ClassifierError::BuildError(
                "Model and labels paths already set".to_string(),
            ));
        }

        let labels = Self::load_labels(labels_path)?;
        info!("Loaded {} labels from {}", labels.len(), labels_path);

        // Create session using the singleton environment
        let session = create_session_builder(&self.runtime_config)?.commit_from_file(model_path)?;

        Self::validate_model(&session)?;
        info!("Model structure validated successfully");

        self.model_path = Some(model_path.to_string());
        self.labels_path = Some(labels_path.to_string());
        self.session = Some(session);
        self.labels = Some(labels);
        self.model_characteristics = Some(characteristics);
        Ok(self)
    }

    /// Loads and validates the label vocabulary:
    /// - the file must be a JSON array of strings
    /// - the vocabulary must not be empty
    /// - no label may be blank
    /// - labels must be unique
    fn load_labels(path: &str) -> Result<Vec<String>, ClassifierError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            error!("Failed to read labels file: {}", e);
            ClassifierError::BuildError(format!("Failed to read labels file: {}", e))
        })?;
        let labels: Vec<String> = serde_json::from_str(&raw).map_err(|e| {
            error!("Failed to parse labels file: {}", e);
            ClassifierError::BuildError(format!(
                "Labels file must be a JSON array of strings: {}",
                e
            ))
        })?;

        if labels.is_empty() {
            return Err(ClassifierError::ValidationError(
                "Label vocabulary cannot be empty".into(),
            ));
        }
        if let Some(pos) = labels.iter().position(|l| l.trim().is_empty()) {
            return Err(ClassifierError::ValidationError(format!(
                "Label {} is blank",
                pos + 1
            )));
        }
        let mut seen = HashSet::new();
        if let Some(duplicate) = labels.iter().find(|l| !seen.insert(l.as_str())) {
            return Err(ClassifierError::ValidationError(format!(
                "Duplicate label '{}' in vocabulary",
                duplicate
            )));
        }

        Ok(labels)
    }

    /// Builds and returns the final ImageClassifier instance
    pub fn build(mut self) -> Result<ImageClassifier, ClassifierError> {
        let session = self
            .session
            .take()
            .ok_or_else(|| ClassifierError::BuildError("No ONNX model loaded".into()))?;
        let labels = self
            .labels
            .take()
            .ok_or_else(|| ClassifierError::BuildError("No label vocabulary loaded".into()))?;
        let model_characteristics = self
            .model_characteristics
            .take()
            .ok_or_else(|| ClassifierError::BuildError("Model characteristics not set".into()))?;

        Ok(ImageClassifier {
            model_path: self.model_path.take().unwrap_or_default(),
            labels_path: self.labels_path.take().unwrap_or_default(),
            session: Arc::new(session),
            labels: Arc::new(labels),
            model_characteristics,
        })
    }

    /// Validates that the model has the expected input/output structure
    fn validate_model(session: &Session) -> Result<(), ClassifierError> {
        let inputs = &session.inputs;
        if inputs.is_empty() {
            return Err(ClassifierError::ModelError(
                "Model must have at least 1 input for the image tensor".to_string(),
            ));
        }

        let outputs = &session.outputs;
        if outputs.is_empty() {
            return Err(ClassifierError::ModelError(
                "Model must have at least 1 output for the class scores".to_string(),
            ));
        }

        Ok(())
    }
}
