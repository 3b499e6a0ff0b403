use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn gemma_stage(base: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gemma-stage"))
        .arg("--base-dir")
        .arg(base)
        .arg("--cache-dir")
        .arg(base.join("cache"))
        .args(args)
        .env_remove("GEMMA_STAGE_MODEL")
        .env_remove("GEMMA_STAGE_HUB")
        .env_remove("RUST_LOG")
        .env_remove("KAGGLE_USERNAME")
        .env_remove("KAGGLE_KEY")
        .env("KAGGLE_CONFIG_DIR", base.join("kaggle"))
        .output()
        .expect("Failed to run gemma-stage")
}

#[test]
fn test_help_exits_zero() {
    let output = Command::new(env!("CARGO_BIN_EXE_gemma-stage"))
        .arg("--help")
        .output()
        .expect("Failed to run gemma-stage");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--force-download"));
    assert!(stdout.contains("--base-dir"));
}

#[cfg(feature = "kaggle")]
#[test]
fn test_invalid_kaggle_handle_exits_one_with_hint() {
    let temp_dir = TempDir::new().unwrap();

    let output = gemma_stage(temp_dir.path(), &["--model", "not-a-handle"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr.matches("Invalid model handle").count(),
        1,
        "stderr: {stderr}"
    );
    assert!(stderr.contains("kaggle.json"), "stderr: {stderr}");

    // Target directory is created before the fetch
    assert!(temp_dir
        .path()
        .join("Assets/StreamingAssets/gemma-3.0-4b")
        .is_dir());
}

#[cfg(feature = "kaggle")]
#[test]
fn test_missing_kaggle_credentials_exits_one() {
    let temp_dir = TempDir::new().unwrap();

    let output = gemma_stage(temp_dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No hub credentials found"), "stderr: {stderr}");
    assert!(stderr.contains("KAGGLE_USERNAME"), "stderr: {stderr}");
}

#[cfg(feature = "kaggle")]
#[test]
fn test_cached_kaggle_model_is_staged_offline() {
    let temp_dir = TempDir::new().unwrap();
    let instance = temp_dir
        .path()
        .join("cache/models/google/gemma-3/gemmaCpp/3.0-4b-it-sfp");
    std::fs::create_dir_all(instance.join("1")).unwrap();
    std::fs::write(instance.join("1/tokenizer.spm"), "spm").unwrap();
    std::fs::write(instance.join("1.complete"), "").unwrap();

    let output = gemma_stage(
        temp_dir.path(),
        &["--model", "google/gemma-3/gemmaCpp/3.0-4b-it-sfp/1"],
    );

    assert!(output.status.success(), "{output:?}");
    let staged = temp_dir
        .path()
        .join("Assets/StreamingAssets/gemma-3.0-4b/tokenizer.spm");
    assert_eq!(std::fs::read_to_string(staged).unwrap(), "spm");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Copied file: tokenizer.spm"));
    assert!(stdout.contains("Gemma model download and setup complete!"));
}

#[cfg(feature = "kaggle")]
#[test]
fn test_empty_cached_model_warns_and_exits_zero() {
    let temp_dir = TempDir::new().unwrap();
    let instance = temp_dir
        .path()
        .join("cache/models/google/gemma-3/gemmaCpp/3.0-4b-it-sfp");
    std::fs::create_dir_all(instance.join("1")).unwrap();
    std::fs::write(instance.join("1.complete"), "").unwrap();

    let target = temp_dir.path().join("Assets/StreamingAssets/gemma-3.0-4b");
    std::fs::create_dir_all(&target).unwrap();
    std::fs::write(target.join("stale.sbs"), "stale").unwrap();

    let output = gemma_stage(
        temp_dir.path(),
        &["--model", "google/gemma-3/gemmaCpp/3.0-4b-it-sfp/1"],
    );

    assert_eq!(output.status.code(), Some(0), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Warning: No files or directories were found"),
        "stdout: {stdout}"
    );
    assert_eq!(std::fs::read_dir(&target).unwrap().count(), 0);
}

#[cfg(feature = "huggingface")]
#[test]
fn test_invalid_huggingface_handle_exits_one() {
    let temp_dir = TempDir::new().unwrap();

    let output = gemma_stage(
        temp_dir.path(),
        &["--hub", "huggingface", "--model", "not-a-repo"],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid model handle"), "stderr: {stderr}");
    assert!(stderr.contains("HF_TOKEN"), "stderr: {stderr}");
}
