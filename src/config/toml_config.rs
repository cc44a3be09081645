use crate::config::cli::MODEL_EXTENSIONS;
use crate::core::{ConfigProvider, TimeFormat, WakeEncoding};
use crate::domain::model::{
    DEFAULT_COFFEE_CUPS, DEFAULT_SLEEP_HOURS, DEFAULT_WAKE_HOUR, DEFAULT_WAKE_MINUTE,
    MAX_COFFEE_CUPS, MAX_SLEEP_HOURS, MIN_COFFEE_CUPS, MIN_SLEEP_HOURS, SLEEP_STEP_HOURS,
};
use crate::utils::error::{BedtimeError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_range,
    validate_step, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub model: ModelConfig,
    pub estimator: EstimatorConfig,
    pub display: DisplayConfig,
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub wake_encoding: WakeEncoding,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub time_format: TimeFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub wake: String,
    pub sleep_hours: f64,
    pub coffee_cups: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            wake: format!("{:02}:{:02}", DEFAULT_WAKE_HOUR, DEFAULT_WAKE_MINUTE),
            sleep_hours: DEFAULT_SLEEP_HOURS,
            coffee_cups: DEFAULT_COFFEE_CUPS,
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置；相對的模型路徑以設定檔所在目錄為基準
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(&path).await?;
        let mut config = Self::from_toml_str(&content)?;
        if let Some(dir) = path.as_ref().parent() {
            config.anchor_model_path(dir);
        }
        Ok(config)
    }

    fn anchor_model_path(&mut self, dir: &Path) {
        if let Some(model_path) = &self.model.path {
            if Path::new(model_path).is_relative() && !dir.as_os_str().is_empty() {
                self.model.path = Some(dir.join(model_path).to_string_lossy().into_owned());
            }
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| BedtimeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MODEL_DIR})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn model_path(&self) -> Option<&str> {
        self.model.path.as_deref()
    }

    fn wake_encoding(&self) -> WakeEncoding {
        self.estimator.wake_encoding
    }

    fn time_format(&self) -> TimeFormat {
        self.display.time_format
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.model.path {
            validate_path("model.path", path)?;
            validate_file_extension("model.path", path, &MODEL_EXTENSIONS)?;
        }

        validate_non_empty_string("defaults.wake", &self.defaults.wake)?;
        validate_range(
            "defaults.sleep_hours",
            self.defaults.sleep_hours,
            MIN_SLEEP_HOURS,
            MAX_SLEEP_HOURS,
        )?;
        validate_step(
            "defaults.sleep_hours",
            self.defaults.sleep_hours,
            MIN_SLEEP_HOURS,
            SLEEP_STEP_HOURS,
        )?;
        validate_range(
            "defaults.coffee_cups",
            self.defaults.coffee_cups,
            MIN_COFFEE_CUPS,
            MAX_COFFEE_CUPS,
        )?;

        Ok(())
    }
}
