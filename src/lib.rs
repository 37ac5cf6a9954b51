//! An image classification showcase built on ONNX models: submit an image,
//! get a predicted label with the full probability vector, and browse curated
//! content for each label.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use lookbook::{BuiltinModel, ImageClassifier};
//!
//! let classifier = ImageClassifier::builder()
//!     .with_model(BuiltinModel::SqueezeNet)?
//!     .build()?;
//!
//! let image = image::open("photo.jpg")?;
//! let prediction = classifier.predict(&image)?;
//! println!("Predicted label: {}", prediction.label);
//! # Ok(())
//! # }
//! ```
//!
//! # The content side
//!
//! Predictions pair with a static [`ContentRegistry`]: a JSON file mapping
//! label names to curated text snippets, image references and video links.
//! Lookup never fails — labels without an entry return an empty selection:
//!
//! ```
//! use lookbook::ContentRegistry;
//!
//! let registry = ContentRegistry::from_json(
//!     r#"{"tabby": {"texts": ["A striped domestic cat."]}}"#,
//! ).unwrap();
//!
//! assert_eq!(registry.lookup("tabby").texts.len(), 1);
//! assert!(registry.lookup("warplane").is_empty());
//! ```

pub mod classifier;
pub mod content;
pub mod model_manager;
pub mod models;
pub mod ranking;
mod runtime;
pub mod server;
pub mod session;
pub mod video;

pub use classifier::{
    ClassifierBuilder, ClassifierError, ClassifierInfo, Classify, ImageClassifier, Prediction,
};
pub use content::{
    ContentEntry, ContentError, ContentRegistry, ContentSelection, CoverageReport,
    MAX_ITEMS_PER_KIND,
};
pub use model_manager::{ModelError, ModelManager};
pub use models::{BuiltinModel, ModelCharacteristics, ModelInfo};
pub use ranking::{rank, RankedLabel};
pub use runtime::{create_session_builder, RuntimeConfig};
pub use session::SessionContext;

pub fn init_logger() {
    env_logger::init();
}
