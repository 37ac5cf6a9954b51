use serde::{Deserialize, Serialize};

/// Models the demo knows how to fetch out of the box.
///
/// The built-in model is a convenience default; any ONNX image classifier can
/// be used instead by pointing the server at custom URLs or local files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinModel {
    /// SqueezeNet 1.1 trained on ImageNet. Small enough to download quickly
    /// while still producing a 1000-label probability vector.
    SqueezeNet,
}

/// Remote location and integrity hashes for a model and its label vocabulary.
///
/// The labels file is a JSON array of strings, one per output position of the
/// model, in output order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub model_url: String,
    pub labels_url: String,
    pub model_hash: String,
    pub labels_hash: String,
}

/// Static characteristics of a model's input contract.
#[derive(Debug, Clone)]
pub struct ModelCharacteristics {
    /// Width of the bitmap the model expects, in pixels
    pub input_width: u32,
    /// Height of the bitmap the model expects, in pixels
    pub input_height: u32,
    /// Approximate download size, used for log messages only
    pub model_size_mb: usize,
}

impl BuiltinModel {
    /// Returns the remote source description for this model
    pub fn get_model_info(&self) -> ModelInfo {
        match self {
            BuiltinModel::SqueezeNet => ModelInfo {
                name: "squeezenet".to_string(),
                model_url: "https://huggingface.co/lookbook-demo/squeezenet1.1/resolve/main/model.onnx".to_string(),
                labels_url: "https://huggingface.co/lookbook-demo/squeezenet1.1/resolve/main/labels.json".to_string(),
                model_hash: "c7055e63932dcc9dc2b14d4b79c9d875ab5dc0b1eb59f4dff5c71b9cbb04a4b9".to_string(),
                labels_hash: "2f04df25935e5b2eb3b794addbd6a77d69d3e2f4318d8725ebea1eca5a7dd1c0".to_string(),
            },
        }
    }

    /// Returns the input contract for this model
    pub fn characteristics(&self) -> ModelCharacteristics {
        match self {
            BuiltinModel::SqueezeNet => ModelCharacteristics {
                input_width: 224,
                input_height: 224,
                model_size_mb: 5,
            },
        }
    }
}
