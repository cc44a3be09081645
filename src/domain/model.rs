use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_WAKE_HOUR: u32 = 6;
pub const DEFAULT_WAKE_MINUTE: u32 = 0;
pub const DEFAULT_SLEEP_HOURS: f64 = 8.0;
pub const DEFAULT_COFFEE_CUPS: u32 = 3;

pub const MIN_SLEEP_HOURS: f64 = 4.0;
pub const MAX_SLEEP_HOURS: f64 = 12.0;
pub const SLEEP_STEP_HOURS: f64 = 0.25;
pub const MIN_COFFEE_CUPS: u32 = 1;
pub const MAX_COFFEE_CUPS: u32 = 12;

pub const SUCCESS_TITLE: &str = "You should go to bed at...";
pub const ERROR_TITLE: &str = "Error";
pub const ERROR_MESSAGE: &str = "Sorry, there was a problem calculating your bedtime.";

/// 模型無法產生預測時的唯一錯誤類型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    #[error("invalid model input '{field}': {value}")]
    InvalidInput { field: &'static str, value: f64 },

    #[error("model produced a non-finite value: {value}")]
    NonFiniteOutput { value: f64 },

    #[error("model produced a negative sleep duration: {value}")]
    NegativeOutput { value: f64 },
}

/// How the wake clock time is turned into the model's `wake` feature.
///
/// `Legacy` multiplies minutes by 3600, the historical encoding, so existing
/// inputs keep giving the same bedtimes. `Corrected` uses 60 seconds per
/// minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WakeEncoding {
    #[default]
    Legacy,
    Corrected,
}

impl WakeEncoding {
    pub fn encode(self, hour: u32, minute: u32) -> f64 {
        let seconds_per_minute = match self {
            WakeEncoding::Legacy => 60 * 60,
            WakeEncoding::Corrected => 60,
        };
        f64::from(hour * 60 * 60 + minute * seconds_per_minute)
    }

    /// 23:59 編碼後的最大值
    pub fn max_seconds(self) -> f64 {
        match self {
            WakeEncoding::Legacy => self.encode(23, 59),
            WakeEncoding::Corrected => 86_399.0,
        }
    }
}

impl std::str::FromStr for WakeEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(WakeEncoding::Legacy),
            "corrected" => Ok(WakeEncoding::Corrected),
            other => Err(format!(
                "unknown wake encoding '{}', expected 'legacy' or 'corrected'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
    #[serde(rename = "12h")]
    TwelveHour,
}

impl TimeFormat {
    pub fn pattern(self) -> &'static str {
        match self {
            TimeFormat::TwentyFourHour => "%H:%M",
            TimeFormat::TwelveHour => "%-I:%M %p",
        }
    }
}

impl std::str::FromStr for TimeFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "24h" | "24" => Ok(TimeFormat::TwentyFourHour),
            "12h" | "12" => Ok(TimeFormat::TwelveHour),
            other => Err(format!("unknown time format '{}', expected '24h' or '12h'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepRequest {
    pub wake_time_seconds: f64,
    pub desired_sleep_hours: f64,
    pub coffee_cups: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepEstimate {
    pub actual_sleep_hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BedtimeResult {
    pub bedtime: NaiveDateTime,
}

impl BedtimeResult {
    pub fn format(&self, time_format: TimeFormat) -> String {
        self.bedtime.format(time_format.pattern()).to_string()
    }
}

/// 傳給模型的三個特徵，全部是浮點數
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelInput {
    pub wake: f64,
    pub estimated_sleep: f64,
    pub coffee: f64,
}

impl From<&SleepRequest> for ModelInput {
    fn from(request: &SleepRequest) -> Self {
        Self {
            wake: request.wake_time_seconds,
            estimated_sleep: request.desired_sleep_hours,
            coffee: f64::from(request.coffee_cups),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelOutput {
    pub actual_sleep: f64,
}

/// Coefficients of a linear sleep regression, as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearCoefficients {
    pub intercept: f64,
    pub wake: f64,
    pub estimated_sleep: f64,
    pub coffee: f64,
}

impl Default for LinearCoefficients {
    fn default() -> Self {
        Self {
            intercept: 0.6,
            wake: 2.0e-6,
            estimated_sleep: 0.9,
            coffee: -0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn bedtime(formatted: String) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: SUCCESS_TITLE.to_string(),
            message: formatted,
        }
    }

    pub fn calculation_failed() -> Self {
        Self {
            kind: NotificationKind::Error,
            title: ERROR_TITLE.to_string(),
            message: ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}
