pub mod config;
pub mod error;
pub mod hub;
pub mod stage;

pub use config::Config;
pub use error::{HubError, Result, StageError};
pub use hub::ModelHub;
pub use stage::{StageReport, Stager};
