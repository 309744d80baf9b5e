pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::RosterConfig};
pub use core::{RosterFilter, RosterManager};
pub use domain::model::StudentRecord;
pub use utils::error::{Result, RosterError};
