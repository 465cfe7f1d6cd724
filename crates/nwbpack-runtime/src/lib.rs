mod config;
mod driver;
mod error;
mod executor;
mod writer;

pub use config::{Config, WriterConfig, expand_tilde, resolve_config_path};
pub use driver::{BatchDriver, BatchOptions, BatchProgress, ShutdownFlag};
pub use error::{Error, Result};
pub use executor::Executor;
pub use writer::{ArtifactWriter, CommandWriter, WriteError};
