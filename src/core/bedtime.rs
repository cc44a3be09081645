use crate::core::estimator::Estimator;
use crate::core::{
    BedtimeResult, ConfigProvider, Notification, SleepEstimate, SleepModel, SleepRequest,
    TimeFormat, WakeEncoding,
};
use crate::domain::model::{
    DEFAULT_WAKE_HOUR, DEFAULT_WAKE_MINUTE, MAX_COFFEE_CUPS, MAX_SLEEP_HOURS, MIN_COFFEE_CUPS,
    MIN_SLEEP_HOURS, SLEEP_STEP_HOURS,
};
use crate::utils::error::{BedtimeError, Result};
use crate::utils::validation::{validate_range, validate_step, Validate};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

const WAKE_TIME_PATTERNS: [&str; 4] = ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"];

/// 06:00 on the given day.
pub fn default_wake_time(day: NaiveDate) -> NaiveDateTime {
    let time = NaiveTime::from_hms_opt(DEFAULT_WAKE_HOUR, DEFAULT_WAKE_MINUTE, 0).unwrap_or_default();
    day.and_time(time)
}

pub fn parse_wake_time(text: &str, day: NaiveDate) -> Option<NaiveDateTime> {
    let text = text.trim();
    WAKE_TIME_PATTERNS
        .iter()
        .find_map(|pattern| NaiveTime::parse_from_str(text, pattern).ok())
        .map(|time| day.and_time(time))
}

/// 無法解析時退回預設的 06:00，不視為錯誤
pub fn wake_time_or_default(text: &str, day: NaiveDate) -> NaiveDateTime {
    parse_wake_time(text, day).unwrap_or_else(|| {
        tracing::warn!(
            "⚠️ Could not read wake time '{}', using {:02}:{:02}",
            text,
            DEFAULT_WAKE_HOUR,
            DEFAULT_WAKE_MINUTE
        );
        default_wake_time(day)
    })
}

/// The three values a user picks before asking for a bedtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SleepForm {
    pub wake_up: NaiveDateTime,
    pub desired_sleep_hours: f64,
    pub coffee_cups: u32,
}

impl SleepForm {
    pub fn new(wake_up: NaiveDateTime, desired_sleep_hours: f64, coffee_cups: u32) -> Self {
        Self {
            wake_up,
            desired_sleep_hours,
            coffee_cups,
        }
    }

    pub fn wake_components(&self) -> (u32, u32) {
        (self.wake_up.hour(), self.wake_up.minute())
    }
}

/// 使用者輸入錯誤歸類為 Input，而非設定錯誤
fn as_input_error(e: BedtimeError) -> BedtimeError {
    BedtimeError::ValidationError {
        message: e.to_string(),
    }
}

impl Validate for SleepForm {
    fn validate(&self) -> Result<()> {
        validate_range(
            "desired_sleep_hours",
            self.desired_sleep_hours,
            MIN_SLEEP_HOURS,
            MAX_SLEEP_HOURS,
        )
        .and_then(|_| {
            validate_step(
                "desired_sleep_hours",
                self.desired_sleep_hours,
                MIN_SLEEP_HOURS,
                SLEEP_STEP_HOURS,
            )
        })
        .and_then(|_| {
            validate_range("coffee_cups", self.coffee_cups, MIN_COFFEE_CUPS, MAX_COFFEE_CUPS)
        })
        .map_err(as_input_error)
    }
}

impl SleepRequest {
    pub fn from_form(form: &SleepForm, encoding: WakeEncoding) -> Self {
        let (hour, minute) = form.wake_components();
        Self {
            wake_time_seconds: encoding.encode(hour, minute),
            desired_sleep_hours: form.desired_sleep_hours,
            coffee_cups: form.coffee_cups,
        }
    }

    /// 驗證表單後再建立請求，超出範圍回傳 ValidationError
    pub fn try_from_form(form: &SleepForm, encoding: WakeEncoding) -> Result<Self> {
        form.validate()?;
        let request = Self::from_form(form, encoding);
        request.validate_for(encoding)?;
        Ok(request)
    }

    pub fn validate_for(&self, encoding: WakeEncoding) -> Result<()> {
        validate_range(
            "wake_time_seconds",
            self.wake_time_seconds,
            0.0,
            encoding.max_seconds(),
        )
        .and_then(|_| {
            validate_range(
                "desired_sleep_hours",
                self.desired_sleep_hours,
                MIN_SLEEP_HOURS,
                MAX_SLEEP_HOURS,
            )
        })
        .and_then(|_| {
            validate_range("coffee_cups", self.coffee_cups, MIN_COFFEE_CUPS, MAX_COFFEE_CUPS)
        })
        .map_err(as_input_error)
    }
}

/// Subtracts the predicted sleep from the wake time. `None` when the duration
/// cannot be represented as a clock offset.
pub fn bedtime_for(wake_up: NaiveDateTime, estimate: &SleepEstimate) -> Option<BedtimeResult> {
    let millis = (estimate.actual_sleep_hours * 3_600_000.0).round();
    if !millis.is_finite() || millis < 0.0 || millis > i64::MAX as f64 {
        return None;
    }
    let sleep = TimeDelta::try_milliseconds(millis as i64)?;
    wake_up
        .checked_sub_signed(sleep)
        .map(|bedtime| BedtimeResult { bedtime })
}

#[derive(Debug, Clone, PartialEq)]
pub enum BedtimeOutcome {
    Bedtime {
        request: SleepRequest,
        estimate: SleepEstimate,
        result: BedtimeResult,
        formatted: String,
    },
    Failed,
}

impl BedtimeOutcome {
    pub fn notification(&self) -> Notification {
        match self {
            BedtimeOutcome::Bedtime { formatted, .. } => Notification::bedtime(formatted.clone()),
            BedtimeOutcome::Failed => Notification::calculation_failed(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, BedtimeOutcome::Failed)
    }
}

pub struct BedtimeCalculator<M: SleepModel> {
    estimator: Estimator<M>,
    encoding: WakeEncoding,
    time_format: TimeFormat,
}

impl<M: SleepModel> BedtimeCalculator<M> {
    pub fn new(model: M) -> Self {
        Self {
            estimator: Estimator::new(model),
            encoding: WakeEncoding::default(),
            time_format: TimeFormat::default(),
        }
    }

    pub fn from_config<C: ConfigProvider>(model: M, config: &C) -> Self {
        Self::new(model)
            .with_encoding(config.wake_encoding())
            .with_time_format(config.time_format())
    }

    pub fn with_encoding(mut self, encoding: WakeEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_time_format(mut self, time_format: TimeFormat) -> Self {
        self.time_format = time_format;
        self
    }

    pub fn encoding(&self) -> WakeEncoding {
        self.encoding
    }

    pub fn calculate(&self, form: &SleepForm) -> BedtimeOutcome {
        let request = SleepRequest::from_form(form, self.encoding);
        tracing::debug!("Estimating sleep for {:?}", request);

        // 預測失敗一律轉成固定訊息，不記錄細節
        let Ok(estimate) = self.estimator.estimate(&request) else {
            return BedtimeOutcome::Failed;
        };

        let Some(result) = bedtime_for(form.wake_up, &estimate) else {
            return BedtimeOutcome::Failed;
        };

        let formatted = result.format(self.time_format);
        tracing::debug!(
            "Predicted {:.2}h of sleep, bedtime {}",
            estimate.actual_sleep_hours,
            formatted
        );

        BedtimeOutcome::Bedtime {
            request,
            estimate,
            result,
            formatted,
        }
    }
}
