use crate::core::{LinearCoefficients, ModelStore};
use crate::utils::error::{BedtimeError, Result};
use crate::utils::validation::{validate_file_extension, validate_path};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub const MODEL_EXTENSIONS: [&str; 2] = ["json", "toml"];

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        validate_path("model.path", path)?;
        validate_file_extension("model.path", path, &MODEL_EXTENSIONS)?;
        Ok(self.base_path.join(path))
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("toml")
}

#[async_trait]
impl ModelStore for LocalStorage {
    async fn load_model(&self, path: &str) -> Result<LinearCoefficients> {
        let full_path = self.resolve(path)?;
        tracing::debug!("Loading model from {}", full_path.display());

        let data = tokio::fs::read(&full_path).await?;
        let coefficients: LinearCoefficients = if is_toml(&full_path) {
            let text = String::from_utf8(data).map_err(|e| BedtimeError::ConfigError {
                message: format!("model file is not valid UTF-8: {}", e),
            })?;
            toml::from_str(&text)?
        } else {
            serde_json::from_slice(&data)?
        };

        Ok(coefficients)
    }

    async fn save_model(&self, path: &str, coefficients: &LinearCoefficients) -> Result<()> {
        let full_path = self.resolve(path)?;

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let data = if is_toml(&full_path) {
            toml::to_string_pretty(coefficients)?
        } else {
            serde_json::to_string_pretty(coefficients)?
        };

        tokio::fs::write(&full_path, data).await?;
        tracing::debug!("Model saved to {}", full_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn coefficients() -> LinearCoefficients {
        LinearCoefficients {
            intercept: 0.5,
            wake: 1.5e-6,
            estimated_sleep: 0.95,
            coffee: -0.1,
        }
    }

    #[tokio::test]
    async fn test_save_and_load_json_model() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.save_model("models/sleep.json", &coefficients()).await.unwrap();
        assert!(dir.path().join("models/sleep.json").exists());

        let loaded = storage.load_model("models/sleep.json").await.unwrap();
        assert_eq!(loaded, coefficients());
    }

    #[tokio::test]
    async fn test_load_toml_model() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("sleep.toml"),
            "intercept = 1.0\nwake = 0.0\nestimated_sleep = 0.75\ncoffee = -0.25\n",
        )
        .unwrap();

        let storage = LocalStorage::new(dir.path());
        let loaded = storage.load_model("sleep.toml").await.unwrap();
        assert_eq!(loaded.estimated_sleep, 0.75);
        assert_eq!(loaded.coffee, -0.25);
    }

    #[tokio::test]
    async fn test_load_missing_model_is_io_error() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        let err = storage.load_model("absent.json").await.unwrap_err();
        assert!(matches!(err, BedtimeError::IoError(_)));
    }

    #[tokio::test]
    async fn test_unsupported_extension_rejected() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        let err = storage.load_model("SleepCalculator.mlmodel").await.unwrap_err();
        assert!(matches!(err, BedtimeError::InvalidConfigValueError { .. }));
    }

    #[tokio::test]
    async fn test_malformed_json_model() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{\"intercept\": 1.0}").unwrap();
        let storage = LocalStorage::new(dir.path());
        let err = storage.load_model("broken.json").await.unwrap_err();
        assert!(matches!(err, BedtimeError::SerializationError(_)));
    }
}
