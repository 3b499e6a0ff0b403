#[cfg(feature = "kaggle")]
pub mod credentials;
#[cfg(feature = "kaggle")]
pub mod handle;
#[cfg(feature = "huggingface")]
pub mod huggingface;
#[cfg(feature = "kaggle")]
pub mod kaggle;

use crate::config::schema::{Config, HubKind};
use crate::error::{HubError, Result};
use std::path::PathBuf;

#[cfg(feature = "huggingface")]
pub use huggingface::HuggingFaceHub;
#[cfg(feature = "kaggle")]
pub use kaggle::KaggleHub;

/// Client that resolves a model handle to a local directory of model files
pub trait ModelHub {
    /// Fetch (or reuse from cache) the model's files
    ///
    /// # Returns
    /// Path inside the hub's cache holding the model files. The caller only
    /// reads from it.
    fn model_download(&self, handle: &str) -> std::result::Result<PathBuf, HubError>;

    /// Hub name for logging/debugging
    fn name(&self) -> &str;

    /// Credential setup instructions shown after unexpected failures
    fn setup_hint(&self) -> &'static str;
}

/// Build the hub client selected in config
pub fn from_config(config: &Config) -> Result<Box<dyn ModelHub>> {
    match config.hub {
        HubKind::Kaggle => kaggle_hub(config),
        HubKind::HuggingFace => huggingface_hub(config),
    }
}

#[cfg(feature = "kaggle")]
fn kaggle_hub(config: &Config) -> Result<Box<dyn ModelHub>> {
    Ok(Box::new(KaggleHub::from_config(config)?))
}

#[cfg(not(feature = "kaggle"))]
fn kaggle_hub(_config: &Config) -> Result<Box<dyn ModelHub>> {
    Err(crate::error::StageError::MissingDependency {
        backend: "kaggle",
        feature: "kaggle",
    })
}

#[cfg(feature = "huggingface")]
fn huggingface_hub(config: &Config) -> Result<Box<dyn ModelHub>> {
    Ok(Box::new(HuggingFaceHub::from_config(config)))
}

#[cfg(not(feature = "huggingface"))]
fn huggingface_hub(_config: &Config) -> Result<Box<dyn ModelHub>> {
    Err(crate::error::StageError::MissingDependency {
        backend: "huggingface",
        feature: "huggingface",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StageError;

    #[cfg(feature = "kaggle")]
    #[test]
    fn test_default_config_selects_kaggle() {
        let hub = from_config(&Config::default()).unwrap();
        assert_eq!(hub.name(), "kaggle");
    }

    #[cfg(feature = "huggingface")]
    #[test]
    fn test_huggingface_selection() {
        let config = Config {
            hub: HubKind::HuggingFace,
            ..Config::default()
        };
        let hub = from_config(&config).unwrap();
        assert_eq!(hub.name(), "huggingface");
    }

    #[cfg(not(feature = "huggingface"))]
    #[test]
    fn test_huggingface_missing_dependency() {
        let config = Config {
            hub: HubKind::HuggingFace,
            ..Config::default()
        };
        let err = from_config(&config).err().unwrap();
        assert!(matches!(err, StageError::MissingDependency { .. }));
    }

    #[cfg(not(feature = "kaggle"))]
    #[test]
    fn test_kaggle_missing_dependency() {
        let err = from_config(&Config::default()).err().unwrap();
        assert!(matches!(err, StageError::MissingDependency { .. }));
    }

    #[test]
    fn test_missing_dependency_is_not_generic() {
        let err = StageError::MissingDependency {
            backend: "kaggle",
            feature: "kaggle",
        };
        assert!(!err.is_generic());
    }
}
