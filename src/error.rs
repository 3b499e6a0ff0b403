use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gemma-stage
#[derive(Error, Debug)]
pub enum StageError {
    #[error("The '{backend}' model hub client is not available in this build\n\nTroubleshooting:\n- Reinstall with the hub enabled: cargo install gemma-stage --features {feature}\n- Or select another hub with --hub")]
    MissingDependency {
        backend: &'static str,
        feature: &'static str,
    },

    #[error("Download path {} does not exist after download attempt\n\nTroubleshooting:\n- Re-run with --force-download to refetch the model\n- Check the hub cache directory for partial downloads", .0.display())]
    DownloadVerification(PathBuf),

    #[error("Downloaded path {} is neither a file nor a directory\n\nTroubleshooting:\n- Check for a dangling symlink in the hub cache\n- Remove the cached model and re-run with --force-download", .0.display())]
    UnexpectedPathType(PathBuf),

    #[error("Hub error: {0}")]
    Hub(#[from] HubError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error at {}: {source}", path.display())]
    Fs {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StageError {
    /// Attach the offending path to an I/O error
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Fs {
            path: path.into(),
            source,
        }
    }

    /// Whether this error falls outside the known failure causes
    ///
    /// These get the hub's credential setup hint appended when reported.
    #[must_use]
    pub const fn is_generic(&self) -> bool {
        !matches!(
            self,
            Self::MissingDependency { .. }
                | Self::DownloadVerification(_)
                | Self::UnexpectedPathType(_)
        )
    }
}

/// Model hub client errors
#[derive(Error, Debug)]
pub enum HubError {
    #[error("Invalid model handle: {0}")]
    InvalidHandle(String),

    #[error("No hub credentials found")]
    MissingCredentials,

    #[error("Malformed credentials file {}: {reason}", path.display())]
    BadCredentials { path: PathBuf, reason: String },

    #[error("Authentication rejected for {0}")]
    Unauthorized(String),

    #[error("Access denied for {0}\n\nTroubleshooting:\n- Accept the model's license terms on the hub's model page\n- Make sure the credentials belong to the account that accepted them")]
    Forbidden(String),

    #[error("Model not found: {0}\n\nTroubleshooting:\n- Check the handle spelling and version on the hub's model page\n- Omit the version to fetch the latest one")]
    NotFound(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}\n\nTroubleshooting:\n- Check internet connection\n- Verify firewall/proxy settings\n- Run with RUST_LOG=debug for more details")]
    Network(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_failures_are_not_generic() {
        let missing = StageError::MissingDependency {
            backend: "kaggle",
            feature: "kaggle",
        };
        assert!(!missing.is_generic());
        assert!(!StageError::DownloadVerification(PathBuf::from("/x")).is_generic());
        assert!(!StageError::UnexpectedPathType(PathBuf::from("/x")).is_generic());
    }

    #[test]
    fn test_hub_and_io_failures_are_generic() {
        assert!(StageError::from(HubError::MissingCredentials).is_generic());
        assert!(StageError::from(std::io::Error::other("boom")).is_generic());
        assert!(StageError::fs("/x", std::io::Error::other("boom")).is_generic());
    }

    #[test]
    fn test_missing_dependency_message() {
        let err = StageError::MissingDependency {
            backend: "huggingface",
            feature: "huggingface",
        };
        let msg = err.to_string();
        assert!(msg.contains("'huggingface' model hub client is not available"));
        assert!(msg.contains("--features huggingface"));
    }

    #[test]
    fn test_verification_message_names_path() {
        let err = StageError::DownloadVerification(PathBuf::from("/cache/gemma/1"));
        assert!(err
            .to_string()
            .contains("Download path /cache/gemma/1 does not exist"));
    }

    #[test]
    fn test_fs_error_names_path() {
        let err = StageError::fs(
            "/target/file.bin",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(err.to_string().starts_with("IO error at /target/file.bin"));
    }
}
