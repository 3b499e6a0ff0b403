//! Configuration for a staging run
//!
//! There is no configuration file. The binary builds a [`Config`] from its
//! command line, and library callers (tests included) construct one directly.
//! Every field has a default matching the stock Gemma setup.
//!
//! # Example
//!
//! ```
//! use gemma_stage::config::Config;
//!
//! let config = Config::default().with_base_dir("/srv/game");
//! assert!(config.target_dir().ends_with("Assets/StreamingAssets/gemma-3.0-4b"));
//! ```

pub mod schema;

pub use schema::{Config, HubKind, DEFAULT_MODEL_HANDLE, DEFAULT_TARGET_SUBDIR};
