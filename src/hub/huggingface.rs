use crate::config::schema::Config;
use crate::error::HubError;
use crate::hub::ModelHub;
use hf_hub::api::sync::{Api, ApiBuilder};
use hf_hub::{Repo, RepoType};
use std::path::{Path, PathBuf};

const DEFAULT_REVISION: &str = "main";

const SETUP_HINT: &str = "Please ensure you have Hugging Face credentials configured.\n\
This typically involves:\n\
1. Creating an access token at https://huggingface.co/settings/tokens\n\
2. Exporting it as HF_TOKEN, passing --hf-token, or running: huggingface-cli login\n\
Also, ensure you have accepted the license for gated models (such as Gemma) on the model page.";

/// Hugging Face Hub client backed by the `hf-hub` cache
#[derive(Debug, Clone, Default)]
pub struct HuggingFaceHub {
    token: Option<String>,
    cache_dir: Option<PathBuf>,
    force_download: bool,
}

impl HuggingFaceHub {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            token: config.hf_token.clone(),
            cache_dir: config.cache_dir.clone(),
            force_download: config.force_download,
        }
    }

    fn api(&self) -> Result<Api, HubError> {
        let mut builder = ApiBuilder::new().with_progress(true);

        // Without an explicit token, hf-hub falls back to its stored login
        if let Some(token) = &self.token {
            builder = builder.with_token(Some(token.clone()));
        }
        if let Some(dir) = &self.cache_dir {
            builder = builder.with_cache_dir(dir.clone());
        }

        builder.build().map_err(|e| {
            HubError::Network(format!("Failed to initialize HuggingFace API: {e}"))
        })
    }
}

impl ModelHub for HuggingFaceHub {
    fn model_download(&self, handle: &str) -> Result<PathBuf, HubError> {
        let (repo_id, revision) = parse_repo_handle(handle)?;

        let api = self.api()?;
        let repo = api.repo(Repo::with_revision(
            repo_id.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));

        let info = repo.info().map_err(|e| {
            HubError::Network(format!("Failed to fetch file list for {repo_id}: {e}"))
        })?;

        tracing::info!(
            "Fetching {} files from {repo_id}@{revision}",
            info.siblings.len()
        );

        let mut snapshot_dir = None;
        for sibling in &info.siblings {
            let remote = sibling.rfilename.as_str();
            let fetched = if self.force_download {
                repo.download(remote)
            } else {
                repo.get(remote)
            }
            .map_err(|e| HubError::Network(format!("Failed to download {remote}: {e}")))?;

            tracing::debug!("Fetched {remote} -> {}", fetched.display());

            if snapshot_dir.is_none() {
                snapshot_dir = snapshot_root(&fetched, remote);
            }
        }

        snapshot_dir.ok_or_else(|| HubError::NotFound(format!("{repo_id}@{revision} has no files")))
    }

    fn name(&self) -> &str {
        "huggingface"
    }

    fn setup_hint(&self) -> &'static str {
        SETUP_HINT
    }
}

/// Split `owner/name[@revision]`
fn parse_repo_handle(handle: &str) -> Result<(&str, &str), HubError> {
    let handle = handle.trim();
    let (repo_id, revision) = match handle.split_once('@') {
        Some((repo, rev)) => (repo, rev),
        None => (handle, DEFAULT_REVISION),
    };

    let parts: Vec<&str> = repo_id.split('/').collect();
    if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) || revision.is_empty() {
        return Err(HubError::InvalidHandle(format!(
            "{handle} (expected owner/name[@revision])"
        )));
    }

    Ok((repo_id, revision))
}

/// Snapshot directory a fetched file lives under
///
/// `rfilename` may contain subdirectories, so strip one level per component.
fn snapshot_root(fetched: &Path, rfilename: &str) -> Option<PathBuf> {
    let depth = rfilename.split('/').filter(|c| !c.is_empty()).count();
    let mut root = fetched;
    for _ in 0..depth {
        root = root.parent()?;
    }
    Some(root.to_path_buf())
}
