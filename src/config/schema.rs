use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};

/// Model fetched when none is given
pub const DEFAULT_MODEL_HANDLE: &str = "google/gemma-3/gemmaCpp/3.0-4b-it-sfp";

/// Staging directory, relative to the base directory
pub const DEFAULT_TARGET_SUBDIR: &str = "Assets/StreamingAssets/gemma-3.0-4b";

/// Which model hub resolves the handle
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HubKind {
    #[default]
    Kaggle,
    #[value(name = "huggingface", alias = "hf")]
    HuggingFace,
}

impl fmt::Display for HubKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kaggle => f.write_str("kaggle"),
            Self::HuggingFace => f.write_str("huggingface"),
        }
    }
}

/// Parameters of a single staging run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub model: String,
    pub hub: HubKind,
    pub base_dir: PathBuf,
    pub target_subdir: PathBuf,
    /// Overrides the hub's own cache location
    pub cache_dir: Option<PathBuf>,
    pub force_download: bool,
    pub hf_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL_HANDLE.to_string(),
            hub: HubKind::default(),
            base_dir: PathBuf::from("."),
            target_subdir: PathBuf::from(DEFAULT_TARGET_SUBDIR),
            cache_dir: None,
            force_download: false,
            hf_token: None,
        }
    }
}

impl Config {
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    #[must_use]
    pub fn with_target_subdir(mut self, subdir: impl Into<PathBuf>) -> Self {
        self.target_subdir = subdir.into();
        self
    }

    #[must_use]
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    /// Directory the model files are staged into
    #[must_use]
    pub fn target_dir(&self) -> PathBuf {
        self.base_dir.join(&self.target_subdir)
    }

    #[must_use]
    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache_dir.as_deref()
    }
}
