use clap::Parser;
use gemma_stage::config::{Config, HubKind, DEFAULT_MODEL_HANDLE, DEFAULT_TARGET_SUBDIR};
use gemma_stage::error::Result;
use gemma_stage::{hub, ModelHub, Stager};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gemma-stage")]
#[command(about = "Download a model from a model hub and stage it for the game", long_about = None)]
struct Cli {
    /// Model handle to fetch
    #[arg(long, env = "GEMMA_STAGE_MODEL", default_value = DEFAULT_MODEL_HANDLE)]
    model: String,

    /// Model hub to fetch from
    #[arg(long, env = "GEMMA_STAGE_HUB", value_enum, default_value_t = HubKind::Kaggle)]
    hub: HubKind,

    /// Project root the target directory is resolved against [default: current directory]
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Staging directory, relative to the base directory
    #[arg(long, value_name = "DIR", default_value = DEFAULT_TARGET_SUBDIR)]
    target_subdir: PathBuf,

    /// Hub cache directory [default: the hub's own]
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Refetch even if the model is already cached
    #[arg(long)]
    force_download: bool,

    /// Hugging Face access token
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    hf_token: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let base_dir = match self.base_dir {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };

        Ok(Config {
            model: self.model,
            hub: self.hub,
            base_dir,
            target_subdir: self.target_subdir,
            cache_dir: self.cache_dir,
            force_download: self.force_download,
            hf_token: self.hf_token,
        })
    }
}

fn main() {
    // Diagnostics go to stderr; stdout carries the progress lines
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    println!("Gemma Downloader");
    println!("----------------");

    let mut active_hub: Option<Box<dyn ModelHub>> = None;
    if let Err(e) = run(cli, &mut active_hub) {
        tracing::debug!("Staging failed: {e:?}");
        eprintln!("\nError: {e}");

        if e.is_generic() {
            if let Some(hub) = &active_hub {
                eprintln!("\n{}", hub.setup_hint());
            }
        }

        std::process::exit(1);
    }
}

fn run(cli: Cli, active_hub: &mut Option<Box<dyn ModelHub>>) -> Result<()> {
    let config = cli.into_config()?;

    println!("Model to download: {}", config.model);
    println!("Model hub: {}", config.hub);
    println!("Target directory for model files: {}", config.target_dir().display());

    let stager = Stager::new(config);
    let hub = active_hub.insert(hub::from_config(stager.config())?);

    let report = stager.run(&**hub)?;

    println!("\n-------------------------------------");
    println!("Gemma model download and setup complete!");
    println!("Model files are now in: {}", report.target_dir.display());
    println!("-------------------------------------");

    Ok(())
}
