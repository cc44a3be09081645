pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{load_sleep_model, LinearSleepModel, UnavailableModel};
pub use config::{cli::LocalStorage, toml_config::TomlConfig, ResolvedConfig};
pub use core::{
    bedtime::{BedtimeCalculator, BedtimeOutcome, SleepForm},
    estimator::Estimator,
    session::{AlertState, BedtimeSession},
};
pub use utils::error::{BedtimeError, Result};
