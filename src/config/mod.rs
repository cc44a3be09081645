pub mod cli;
pub mod toml_config;

use crate::core::{ConfigProvider, TimeFormat, WakeEncoding};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, Validate,
};
use cli::MODEL_EXTENSIONS;
use serde::{Deserialize, Serialize};
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "better-rest")]
#[command(about = "Suggests a bedtime from wake time, desired sleep and coffee intake")]
pub struct CliConfig {
    /// Wake-up time, e.g. 07:00 or 7:00 AM
    #[arg(long)]
    pub wake: Option<String>,

    /// Desired hours of sleep (4 to 12, in 0.25 steps)
    #[arg(long)]
    pub sleep: Option<f64>,

    /// Cups of coffee per day (1 to 12)
    #[arg(long)]
    pub coffee: Option<u32>,

    /// Path to a TOML configuration file; a relative `[model] path` in it is
    /// resolved against the file's directory
    #[arg(short, long)]
    pub config: Option<String>,

    /// Path to a model file (.json or .toml), relative to the working directory
    #[arg(long)]
    pub model: Option<String>,

    /// Wake time encoding fed to the model: legacy or corrected
    #[arg(long)]
    pub encoding: Option<WakeEncoding>,

    /// Bedtime display format: 24h or 12h
    #[arg(long)]
    pub format: Option<TimeFormat>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Settings after layering command line flags over the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub model_path: Option<String>,
    pub wake_encoding: WakeEncoding,
    pub time_format: TimeFormat,
    pub wake: String,
    pub sleep_hours: f64,
    pub coffee_cups: u32,
}

impl From<&TomlConfig> for ResolvedConfig {
    fn from(file: &TomlConfig) -> Self {
        Self {
            model_path: file.model.path.clone(),
            wake_encoding: file.estimator.wake_encoding,
            time_format: file.display.time_format,
            wake: file.defaults.wake.clone(),
            sleep_hours: file.defaults.sleep_hours,
            coffee_cups: file.defaults.coffee_cups,
        }
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self::from(&TomlConfig::default())
    }
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 命令列參數優先於設定檔
    pub fn resolve(&self, file: &TomlConfig) -> ResolvedConfig {
        let base = ResolvedConfig::from(file);
        ResolvedConfig {
            model_path: self.model.clone().or(base.model_path),
            wake_encoding: self.encoding.unwrap_or(base.wake_encoding),
            time_format: self.format.unwrap_or(base.time_format),
            wake: self.wake.clone().unwrap_or(base.wake),
            sleep_hours: self.sleep.unwrap_or(base.sleep_hours),
            coffee_cups: self.coffee.unwrap_or(base.coffee_cups),
        }
    }
}

impl ConfigProvider for ResolvedConfig {
    fn model_path(&self) -> Option<&str> {
        self.model_path.as_deref()
    }

    fn wake_encoding(&self) -> WakeEncoding {
        self.wake_encoding
    }

    fn time_format(&self) -> TimeFormat {
        self.time_format
    }
}

impl Validate for ResolvedConfig {
    /// 只檢查設定本身；睡眠時數與咖啡杯數屬於使用者輸入，由 SleepForm 驗證
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.model_path {
            validate_path("model.path", path)?;
            validate_file_extension("model.path", path, &MODEL_EXTENSIONS)?;
        }
        validate_non_empty_string("wake", &self.wake)
    }
}
