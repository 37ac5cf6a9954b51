use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use crate::models::ModelInfo;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model not downloaded: {0}")]
    NotDownloaded(String),
    #[error("Download error: {0}")]
    DownloadError(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Model verification failed")]
    VerificationFailed,
    #[error("Hash mismatch: expected {expected}, got {actual} for {file_type} file")]
    HashMismatch {
        file_type: String,
        expected: String,
        actual: String,
    },
}

/// Fetches model artifacts into a local cache and verifies their integrity.
///
/// A model is two files: the serialized ONNX graph and the label vocabulary it
/// was trained with. Both are keyed by the model's name inside the cache
/// directory. The download path is serialized behind an async mutex so
/// concurrent callers cannot trigger duplicate downloads.
#[derive(Clone)]
pub struct ModelManager {
    models_dir: PathBuf,
    download_lock: Arc<Mutex<()>>,
}

impl ModelManager {
    /// Creates a new ModelManager with the default models directory
    pub fn new_default() -> io::Result<Self> {
        Self::new(Self::get_default_models_dir())
    }

    /// Returns the default models directory path
    pub fn get_default_models_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var("LOOKBOOK_CACHE") {
            return PathBuf::from(path).join("models");
        }

        // 2. Use platform-specific cache directory
        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join("lookbook").join("models");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".cache").join("lookbook").join("models");
        }

        // 4. If all else fails, use system temp directory (platform agnostic)
        env::temp_dir().join("lookbook").join("models")
    }

    pub fn new<P: AsRef<Path>>(models_dir: P) -> io::Result<Self> {
        let models_dir = models_dir.as_ref().to_path_buf();
        fs::create_dir_all(&models_dir)?;
        Ok(Self {
            models_dir,
            download_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn get_model_path(&self, name: &str) -> PathBuf {
        self.models_dir.join(name).join("model.onnx")
    }

    pub fn get_labels_path(&self, name: &str) -> PathBuf {
        self.models_dir.join(name).join("labels.json")
    }

    pub fn is_model_downloaded(&self, name: &str) -> bool {
        let model_path = self.get_model_path(name);
        let labels_path = self.get_labels_path(name);
        log::info!("Checking if model '{}' is downloaded:", name);
        log::info!("  Model path: {:?} (exists: {})", model_path, model_path.exists());
        log::info!("  Labels path: {:?} (exists: {})", labels_path, labels_path.exists());
        model_path.exists() && labels_path.exists()
    }

    pub async fn download_model(&self, info: &ModelInfo) -> Result<(), ModelError> {
        let _lock = self.download_lock.lock().await;

        let model_dir = self.models_dir.join(&info.name);
        log::info!("Creating model directory at {:?}", model_dir);
        fs::create_dir_all(&model_dir)?;

        let model_path = self.get_model_path(&info.name);
        let model_result = if model_path.exists() {
            log::info!("Model file exists at {:?}, verifying...", model_path);
            if !self.verify_file(&model_path, &info.model_hash)? {
                log::warn!("Model file verification failed, redownloading");
                self.download_and_verify_file(&info.model_url, &model_path, &info.model_hash, "model")
                    .await
            } else {
                log::info!("Existing model file verified successfully");
                Ok(())
            }
        } else {
            log::info!("Model file does not exist, downloading...");
            self.download_and_verify_file(&info.model_url, &model_path, &info.model_hash, "model")
                .await
        };

        let labels_path = self.get_labels_path(&info.name);
        let labels_result = if labels_path.exists() {
            log::info!("Labels file exists at {:?}, verifying...", labels_path);
            if !self.verify_file(&labels_path, &info.labels_hash)? {
                log::warn!("Labels file verification failed, redownloading");
                self.download_and_verify_file(&info.labels_url, &labels_path, &info.labels_hash, "labels")
                    .await
            } else {
                log::info!("Existing labels file verified successfully");
                Ok(())
            }
        } else {
            log::info!("Labels file does not exist, downloading...");
            self.download_and_verify_file(&info.labels_url, &labels_path, &info.labels_hash, "labels")
                .await
        };

        match (model_result, labels_result) {
            (Ok(()), Ok(())) => {
                log::info!("Model and labels ready to use");
                Ok(())
            }
            (Err(e), _) => {
                log::error!("Failed to setup model file: {}", e);
                // Cleanup on failure
                let _ = self.remove_download(&info.name);
                Err(e)
            }
            (_, Err(e)) => {
                log::error!("Failed to setup labels file: {}", e);
                // Cleanup on failure
                let _ = self.remove_download(&info.name);
                Err(e)
            }
        }
    }

    fn verify_file(&self, path: &Path, expected_hash: &str) -> Result<bool, ModelError> {
        let bytes = fs::read(path)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let hash = format!("{:x}", hasher.finalize());
        log::info!("Verified {:?}: calculated {} expected {}", path, hash, expected_hash);
        Ok(hash == expected_hash)
    }

    pub fn verify_model(&self, info: &ModelInfo) -> Result<bool, ModelError> {
        let model_path = self.get_model_path(&info.name);
        let labels_path = self.get_labels_path(&info.name);

        if !model_path.exists() || !labels_path.exists() {
            log::info!("One or both model files do not exist");
            return Ok(false);
        }

        let model_ok = self.verify_file(&model_path, &info.model_hash)?;
        let labels_ok = self.verify_file(&labels_path, &info.labels_hash)?;

        log::info!("Verification results: model {} labels {}", model_ok, labels_ok);

        Ok(model_ok && labels_ok)
    }

    async fn download_and_verify_file(
        &self,
        url: &str,
        path: &Path,
        expected_hash: &str,
        file_type: &str,
    ) -> Result<(), ModelError> {
        log::info!("Downloading {} file from {} to {:?}", file_type, url, path);
        let response = reqwest::get(url).await?;
        log::info!("Download response status: {}", response.status());
        let bytes = response.bytes().await?;
        log::info!("Downloaded {} bytes", bytes.len());

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let hash = format!("{:x}", hasher.finalize());

        if hash != expected_hash {
            log::error!("{} hash mismatch: expected {}, got {}", file_type, expected_hash, hash);
            return Err(ModelError::HashMismatch {
                file_type: file_type.to_string(),
                expected: expected_hash.to_string(),
                actual: hash,
            });
        }

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        log::info!("Writing {} bytes to {:?}", bytes.len(), path);
        fs::write(path, bytes)?;

        // Verify after writing
        if !self.verify_file(path, expected_hash)? {
            return Err(ModelError::VerificationFailed);
        }

        log::info!("{} file downloaded and verified successfully", file_type);
        Ok(())
    }

    pub fn remove_download(&self, name: &str) -> Result<(), ModelError> {
        let model_path = self.get_model_path(name);
        let labels_path = self.get_labels_path(name);

        if model_path.exists() {
            fs::remove_file(&model_path)?;
        }
        if labels_path.exists() {
            fs::remove_file(&labels_path)?;
        }
        Ok(())
    }

    /// Ensures that a model is downloaded and verified.
    /// If the model doesn't exist, it will be downloaded.
    /// If verification fails, it will be re-downloaded.
    pub async fn ensure_model_downloaded(&self, info: &ModelInfo) -> Result<(), ModelError> {
        log::info!("Checking if model '{}' is downloaded...", info.name);
        if !self.is_model_downloaded(&info.name) {
            log::info!("Model not found, downloading...");
            self.download_model(info).await?;
        } else {
            log::info!("Model exists, verifying...");
            if !self.verify_model(info)? {
                log::info!("Model verification failed, re-downloading...");
                self.remove_download(&info.name)?;
                self.download_model(info).await?;
            } else {
                log::info!("Model verification successful");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_of(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }

    #[test]
    fn test_default_models_dir() {
        // Test with environment variable
        env::set_var("LOOKBOOK_CACHE", "/tmp/test-cache");
        let path = ModelManager::get_default_models_dir();
        assert!(path.to_str().unwrap().contains("/tmp/test-cache/models"));
        env::remove_var("LOOKBOOK_CACHE");

        // Test without environment variable
        let path = ModelManager::get_default_models_dir();
        assert!(path.to_str().unwrap().contains("lookbook/models"));
    }

    #[test]
    fn test_artifact_paths_are_keyed_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ModelManager::new(dir.path()).unwrap();
        assert_eq!(
            manager.get_model_path("pets"),
            dir.path().join("pets").join("model.onnx")
        );
        assert_eq!(
            manager.get_labels_path("pets"),
            dir.path().join("pets").join("labels.json")
        );
    }

    #[test]
    fn test_verify_model_detects_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ModelManager::new(dir.path()).unwrap();

        let model_bytes = b"model bytes";
        let labels_bytes = br#"["cat","dog"]"#;
        let info = ModelInfo {
            name: "pets".to_string(),
            model_url: "http://localhost/model.onnx".to_string(),
            labels_url: "http://localhost/labels.json".to_string(),
            model_hash: hash_of(model_bytes),
            labels_hash: hash_of(labels_bytes),
        };

        // Nothing on disk yet
        assert!(!manager.verify_model(&info).unwrap());

        fs::create_dir_all(dir.path().join("pets")).unwrap();
        fs::write(manager.get_model_path("pets"), model_bytes).unwrap();
        fs::write(manager.get_labels_path("pets"), labels_bytes).unwrap();
        assert!(manager.is_model_downloaded("pets"));
        assert!(manager.verify_model(&info).unwrap());

        // Corrupt the model file
        fs::write(manager.get_model_path("pets"), b"corrupted data").unwrap();
        assert!(!manager.verify_model(&info).unwrap());
    }

    #[test]
    fn test_remove_download() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ModelManager::new(dir.path()).unwrap();

        fs::create_dir_all(dir.path().join("pets")).unwrap();
        fs::write(manager.get_model_path("pets"), b"model").unwrap();
        fs::write(manager.get_labels_path("pets"), b"[]").unwrap();

        manager.remove_download("pets").unwrap();
        assert!(!manager.is_model_downloaded("pets"));
    }
}
