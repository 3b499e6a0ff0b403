pub mod fsops;
pub mod report;

use crate::config::schema::Config;
use crate::error::{Result, StageError};
use crate::hub::ModelHub;
use fsops::PathKind;
use std::fs;
use std::path::{Path, PathBuf};

pub use report::{format_bytes, EntryKind, StageReport, StagedEntry};

/// Fetches a model through a hub and mirrors it into the target directory
#[derive(Debug, Clone)]
pub struct Stager {
    config: Config,
}

impl Stager {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn target_dir(&self) -> PathBuf {
        self.config.target_dir()
    }

    /// Run the whole staging sequence once
    ///
    /// The target directory is created, the model fetched, the target
    /// emptied, then every top-level cache entry copied in. The target is
    /// only touched after the cache path has been verified.
    pub fn run(&self, hub: &dyn ModelHub) -> Result<StageReport> {
        let target_dir = self.target_dir();

        println!("\nEnsuring target directory exists: {}", target_dir.display());
        fs::create_dir_all(&target_dir).map_err(|e| StageError::fs(&target_dir, e))?;
        println!("Target directory ready.");

        println!("\nDownloading model: {}...", self.config.model);
        println!("This may take some time depending on your internet connection and model size.");
        tracing::info!("Fetching {} via {} hub", self.config.model, hub.name());

        let cache_path = hub.model_download(&self.config.model)?;

        let cache_kind = fsops::classify(&cache_path);
        match cache_kind {
            PathKind::Missing => return Err(StageError::DownloadVerification(cache_path)),
            PathKind::Other => return Err(StageError::UnexpectedPathType(cache_path)),
            PathKind::File | PathKind::Directory => {}
        }
        println!("Model downloaded to cache: {}", cache_path.display());

        println!("\nPreparing to copy model files to {}...", target_dir.display());
        println!(
            "Cleaning target directory: {} (if it contains old files)...",
            target_dir.display()
        );
        let removed = fsops::clear_dir(&target_dir)?;
        tracing::info!("Removed {removed} stale entries from {}", target_dir.display());
        println!("Target directory cleaned.");

        println!(
            "Copying model files from cache ({}) to target ({})...",
            cache_path.display(),
            target_dir.display()
        );

        let mut report = StageReport {
            cache_path,
            target_dir,
            copied: Vec::new(),
            skipped: Vec::new(),
            removed,
        };

        if cache_kind == PathKind::File {
            let entry = stage_entry(&report.cache_path, &report.target_dir)?;
            println!(
                "Successfully copied single file {} to {}",
                entry.name,
                report.target_dir.display()
            );
            report.copied.push(entry);
            return Ok(report);
        }

        let entries =
            fs::read_dir(&report.cache_path).map_err(|e| StageError::fs(&report.cache_path, e))?;
        for entry in entries {
            let path = entry.map_err(|e| StageError::fs(&report.cache_path, e))?.path();

            match fsops::classify(&path) {
                PathKind::File | PathKind::Directory => {
                    let staged = stage_entry(&path, &report.target_dir)?;
                    match staged.kind {
                        EntryKind::File => println!("  Copied file: {}", staged.name),
                        EntryKind::Directory => println!("  Copied directory: {}", staged.name),
                    }
                    report.copied.push(staged);
                }
                PathKind::Missing | PathKind::Other => {
                    let name = file_name(&path);
                    tracing::warn!("Skipping {}: neither file nor directory", path.display());
                    println!("  Skipped: {name}");
                    report.skipped.push(name);
                }
            }
        }

        if report.is_empty() {
            tracing::warn!("Cache directory {} is empty", report.cache_path.display());
            println!(
                "Warning: No files or directories were found in the downloaded path {} to copy.",
                report.cache_path.display()
            );
        } else {
            println!(
                "Successfully copied {} item(s) ({}) to {}",
                report.copied.len(),
                format_bytes(report.total_bytes()),
                report.target_dir.display()
            );
        }

        Ok(report)
    }
}

/// Copy one cache entry (file or directory) into `target_dir`
fn stage_entry(path: &Path, target_dir: &Path) -> Result<StagedEntry> {
    let Some(os_name) = path.file_name() else {
        return Err(StageError::UnexpectedPathType(path.to_path_buf()));
    };
    let name = os_name.to_string_lossy().into_owned();
    let destination = target_dir.join(os_name);

    let meta = fs::metadata(path).map_err(|e| StageError::fs(path, e))?;
    let (kind, size_bytes) = if meta.is_dir() {
        (
            EntryKind::Directory,
            fsops::copy_dir_recursive(path, &destination)?,
        )
    } else {
        (EntryKind::File, fsops::copy_file(path, &destination)?)
    };

    tracing::debug!("Staged {} -> {}", path.display(), destination.display());

    Ok(StagedEntry {
        name,
        kind,
        size_bytes,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
