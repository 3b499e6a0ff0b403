use crate::config::schema::Config;
use crate::error::{HubError, StageError};
use crate::hub::credentials::KaggleCredentials;
use crate::hub::handle::ModelHandle;
use crate::hub::ModelHub;
use flate2::read::GzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

const DEFAULT_ENDPOINT: &str = "https://www.kaggle.com";

const SETUP_HINT: &str = "Please ensure you have Kaggle API credentials configured.\n\
This typically involves:\n\
1. Creating an API token: download 'kaggle.json' from your Kaggle account settings page\n\
2. Placing it in ~/.kaggle/kaggle.json (Linux/macOS) or C:\\Users\\<Your-Username>\\.kaggle\\kaggle.json (Windows)\n\
Alternatively, set the KAGGLE_USERNAME and KAGGLE_KEY environment variables.\n\
Also, ensure you have accepted the terms for the Gemma model on Kaggle.";

/// Model instance metadata returned by the Kaggle API
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ModelInstance {
    version_number: u32,
}

/// Kaggle Models hub client with a local extracted-archive cache
pub struct KaggleHub {
    client: Client,
    endpoint: String,
    cache_root: PathBuf,
    force_download: bool,
}

impl std::fmt::Debug for KaggleHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KaggleHub")
            .field("client", &"Client { ... }")
            .field("endpoint", &self.endpoint)
            .field("cache_root", &self.cache_root)
            .field("force_download", &self.force_download)
            .finish()
    }
}

impl KaggleHub {
    /// Create a client caching below `cache_root`
    pub fn new(cache_root: impl Into<PathBuf>) -> Result<Self, HubError> {
        // Model archives are several GB; no request timeout
        let client = Client::builder()
            .user_agent(concat!("gemma-stage/", env!("CARGO_PKG_VERSION")))
            .timeout(None::<std::time::Duration>)
            .build()
            .map_err(|e| HubError::Network(format!("Failed to build HTTP client: {e}")))?;

        let endpoint = std::env::var("KAGGLE_API_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            cache_root: cache_root.into(),
            force_download: false,
        })
    }

    /// Create from config, resolving the cache root
    ///
    /// Cache root precedence: `cache_dir` in config, `$KAGGLEHUB_CACHE`,
    /// then `~/.cache/kagglehub`.
    pub fn from_config(config: &Config) -> Result<Self, StageError> {
        let cache_root = match config.cache_dir() {
            Some(dir) => dir.to_path_buf(),
            None => default_cache_root()?,
        };

        Ok(Self::new(cache_root)?.with_force_download(config.force_download))
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub const fn with_force_download(mut self, force: bool) -> Self {
        self.force_download = force;
        self
    }

    #[must_use]
    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Directory an extracted model version lives in
    #[must_use]
    pub fn version_dir(&self, handle: &ModelHandle, version: u32) -> PathBuf {
        handle
            .instance_cache_dir(&self.cache_root)
            .join(version.to_string())
    }

    /// Marker written next to the version dir once it is fully extracted
    ///
    /// Same `<version>.complete` layout kagglehub uses, so the two share a
    /// cache.
    #[must_use]
    pub fn completion_marker(&self, handle: &ModelHandle, version: u32) -> PathBuf {
        handle
            .instance_cache_dir(&self.cache_root)
            .join(format!("{version}.complete"))
    }

    fn cached(&self, handle: &ModelHandle, version: u32) -> Option<PathBuf> {
        if self.force_download || !self.completion_marker(handle, version).exists() {
            return None;
        }
        let dir = self.version_dir(handle, version);
        tracing::info!("Using cached {} at {}", handle.with_version(version), dir.display());
        Some(dir)
    }

    /// Ask the API for the newest version of a model instance
    fn latest_version(
        &self,
        handle: &ModelHandle,
        creds: &KaggleCredentials,
    ) -> Result<u32, HubError> {
        let url = format!(
            "{}/api/v1/models/{}/get",
            self.endpoint,
            handle.instance_path()
        );
        tracing::debug!("Resolving latest version: GET {url}");

        let response = self
            .client
            .get(&url)
            .basic_auth(&creds.username, Some(&creds.key))
            .send()
            .map_err(|e| HubError::Network(format!("Failed to query {handle}: {e}")))?;

        let instance: ModelInstance = check_status(response, &handle.to_string())?
            .json()
            .map_err(|e| HubError::Api {
                status: 200,
                message: format!("Unexpected model metadata for {handle}: {e}"),
            })?;

        tracing::info!("Latest version of {handle} is {}", instance.version_number);
        Ok(instance.version_number)
    }

    /// Download and extract one version into the cache
    fn download_version(
        &self,
        handle: &ModelHandle,
        version: u32,
        creds: &KaggleCredentials,
    ) -> Result<PathBuf, HubError> {
        let pinned = handle.with_version(version);
        let out_dir = self.version_dir(handle, version);
        let marker = self.completion_marker(handle, version);
        let archive_path = out_dir.with_file_name(format!("{version}.archive"));

        // Leftovers from an interrupted or forced run
        if out_dir.exists() {
            tracing::debug!("Removing stale cache dir {}", out_dir.display());
            fs::remove_dir_all(&out_dir)?;
        }
        if marker.exists() {
            fs::remove_file(&marker)?;
        }
        if let Some(parent) = out_dir.parent() {
            fs::create_dir_all(parent)?;
        }

        let url = format!(
            "{}/api/v1/models/{}/{version}/download",
            self.endpoint,
            handle.instance_path()
        );
        tracing::info!("Downloading {pinned}: GET {url}");

        let response = self
            .client
            .get(&url)
            .basic_auth(&creds.username, Some(&creds.key))
            .send()
            .map_err(|e| HubError::Network(format!("Failed to download {pinned}: {e}")))?;
        let response = check_status(response, &pinned.to_string())?;

        let progress = download_progress(response.content_length());
        let mut file = File::create(&archive_path)?;
        let copied = io::copy(&mut progress.wrap_read(response), &mut file)
            .map_err(|e| HubError::Network(format!("Download of {pinned} interrupted: {e}")));
        progress.finish_and_clear();
        let bytes = copied?;
        drop(file);

        tracing::info!("Downloaded {bytes} bytes, extracting to {}", out_dir.display());
        extract_archive(&archive_path, &out_dir)?;
        fs::remove_file(&archive_path)?;

        fs::write(&marker, b"")?;

        Ok(out_dir)
    }
}

impl ModelHub for KaggleHub {
    fn model_download(&self, handle: &str) -> Result<PathBuf, HubError> {
        let handle: ModelHandle = handle.parse()?;

        // Pinned and already extracted: no credentials or network needed
        if let Some(version) = handle.version {
            if let Some(dir) = self.cached(&handle, version) {
                return Ok(dir);
            }
        }

        let creds = KaggleCredentials::load()?;

        let version = match handle.version {
            Some(v) => v,
            None => self.latest_version(&handle, &creds)?,
        };

        if let Some(dir) = self.cached(&handle, version) {
            return Ok(dir);
        }

        self.download_version(&handle, version, &creds)
    }

    fn name(&self) -> &str {
        "kaggle"
    }

    fn setup_hint(&self) -> &'static str {
        SETUP_HINT
    }
}

/// `$KAGGLEHUB_CACHE`, else `~/.cache/kagglehub`
fn default_cache_root() -> Result<PathBuf, StageError> {
    if let Ok(dir) = std::env::var("KAGGLEHUB_CACHE") {
        return Ok(PathBuf::from(dir));
    }

    dirs::home_dir()
        .map(|home| home.join(".cache").join("kagglehub"))
        .ok_or_else(|| {
            StageError::Config(
                "Cannot determine home directory for the Kaggle cache; pass --cache-dir"
                    .to_string(),
            )
        })
}

fn check_status(response: Response, what: &str) -> Result<Response, HubError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(status_error(status, what, body))
}

/// Map a non-success HTTP status to a hub error
fn status_error(status: StatusCode, what: &str, body: String) -> HubError {
    match status {
        StatusCode::UNAUTHORIZED => HubError::Unauthorized(what.to_string()),
        StatusCode::FORBIDDEN => HubError::Forbidden(what.to_string()),
        StatusCode::NOT_FOUND => HubError::NotFound(what.to_string()),
        _ => {
            let message = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            } else {
                body.trim().chars().take(200).collect()
            };
            HubError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

fn download_progress(total: Option<u64>) -> ProgressBar {
    let Some(total) = total else {
        return ProgressBar::new_spinner();
    };

    let progress = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
    ) {
        progress.set_style(style.progress_chars("=> "));
    }
    progress
}

/// Unpack a zip, tar or gzip-compressed tar archive into `dest`
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<(), HubError> {
    let mut file = File::open(archive)?;

    let mut header = Vec::with_capacity(512);
    (&mut file).take(512).read_to_end(&mut header)?;
    file.seek(SeekFrom::Start(0))?;

    fs::create_dir_all(dest)?;

    let unpacked = if header.starts_with(b"PK\x03\x04") {
        zip::ZipArchive::new(file)
            .and_then(|mut zip| zip.extract(dest))
            .map_err(|e| e.to_string())
    } else if header.starts_with(&[0x1f, 0x8b]) {
        tar::Archive::new(GzDecoder::new(file))
            .unpack(dest)
            .map_err(|e| e.to_string())
    } else if header.get(257..262) == Some(b"ustar".as_slice()) {
        tar::Archive::new(file)
            .unpack(dest)
            .map_err(|e| e.to_string())
    } else {
        return Err(HubError::Archive(format!(
            "{} is not a zip, tar or tar.gz archive",
            archive.display()
        )));
    };

    unpacked.map_err(|e| {
        HubError::Archive(format!("Failed to extract {}: {e}", archive.display()))
    })
}
