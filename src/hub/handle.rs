use crate::error::HubError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Kaggle model handle: `owner/model/framework/variation[/version]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelHandle {
    pub owner: String,
    pub model: String,
    pub framework: String,
    pub variation: String,
    pub version: Option<u32>,
}

impl ModelHandle {
    /// Same handle pinned to a version
    #[must_use]
    pub fn with_version(&self, version: u32) -> Self {
        Self {
            version: Some(version),
            ..self.clone()
        }
    }

    /// `owner/model/framework/variation`, the part shared by every version
    #[must_use]
    pub fn instance_path(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.owner, self.model, self.framework, self.variation
        )
    }

    /// Cache directory of this instance below the cache root
    #[must_use]
    pub fn instance_cache_dir(&self, cache_root: &Path) -> PathBuf {
        cache_root
            .join("models")
            .join(&self.owner)
            .join(&self.model)
            .join(&self.framework)
            .join(&self.variation)
    }
}

impl FromStr for ModelHandle {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('/').collect();

        if !(4..=5).contains(&parts.len()) || parts.iter().any(|p| p.is_empty()) {
            return Err(HubError::InvalidHandle(format!(
                "{s} (expected owner/model/framework/variation[/version])"
            )));
        }

        let version = match parts.get(4) {
            Some(v) => match v.parse::<u32>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Err(HubError::InvalidHandle(format!(
                        "{s} (version must be a positive integer, got '{v}')"
                    )))
                }
            },
            None => None,
        };

        Ok(Self {
            owner: parts[0].to_string(),
            model: parts[1].to_string(),
            framework: parts[2].to_string(),
            variation: parts[3].to_string(),
            version,
        })
    }
}

impl fmt::Display for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.instance_path())?;
        if let Some(version) = self.version {
            write!(f, "/{version}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_without_version() {
        let handle: ModelHandle = "google/gemma-3/gemmaCpp/3.0-4b-it-sfp".parse().unwrap();
        assert_eq!(handle.owner, "google");
        assert_eq!(handle.model, "gemma-3");
        assert_eq!(handle.framework, "gemmaCpp");
        assert_eq!(handle.variation, "3.0-4b-it-sfp");
        assert_eq!(handle.version, None);
    }

    #[test]
    fn test_parse_with_version() {
        let handle: ModelHandle = "google/gemma-3/gemmaCpp/3.0-4b-it-sfp/2".parse().unwrap();
        assert_eq!(handle.version, Some(2));
        assert_eq!(handle.to_string(), "google/gemma-3/gemmaCpp/3.0-4b-it-sfp/2");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!("google/gemma-3".parse::<ModelHandle>().is_err());
        assert!("google//gemmaCpp/x".parse::<ModelHandle>().is_err());
        assert!("a/b/c/d/e/f".parse::<ModelHandle>().is_err());
        assert!("".parse::<ModelHandle>().is_err());
    }

    #[test]
    fn test_parse_rejects_bad_version() {
        let err = "google/gemma-3/gemmaCpp/x/latest"
            .parse::<ModelHandle>()
            .unwrap_err();
        assert!(err.to_string().contains("positive integer"));
        assert!("google/gemma-3/gemmaCpp/x/0".parse::<ModelHandle>().is_err());
    }

    #[test]
    fn test_with_version_keeps_instance() {
        let handle: ModelHandle = "google/gemma-3/gemmaCpp/x".parse().unwrap();
        let pinned = handle.with_version(3);
        assert_eq!(pinned.instance_path(), handle.instance_path());
        assert_eq!(pinned.version, Some(3));
    }

    #[test]
    fn test_instance_cache_dir() {
        let handle: ModelHandle = "google/gemma-3/gemmaCpp/x".parse().unwrap();
        assert_eq!(
            handle.instance_cache_dir(Path::new("/cache")),
            PathBuf::from("/cache/models/google/gemma-3/gemmaCpp/x")
        );
    }
}
