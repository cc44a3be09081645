use better_rest::core::bedtime::wake_time_or_default;
use better_rest::core::{
    ModelInput, ModelOutput, PredictionError, SleepModel, SleepRequest, TimeFormat, WakeEncoding,
};
use better_rest::{
    AlertState, BedtimeCalculator, BedtimeOutcome, BedtimeSession, Estimator, LinearSleepModel,
    SleepForm, UnavailableModel,
};
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Mutex;

/// 記錄收到的輸入，回傳固定的睡眠時數
struct StubModel {
    actual_sleep: f64,
    seen: Mutex<Vec<ModelInput>>,
}

impl StubModel {
    fn new(actual_sleep: f64) -> Self {
        Self {
            actual_sleep,
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl SleepModel for StubModel {
    fn predict(&self, input: &ModelInput) -> Result<ModelOutput, PredictionError> {
        self.seen.lock().unwrap().push(*input);
        Ok(ModelOutput {
            actual_sleep: self.actual_sleep,
        })
    }
}

struct BrokenModel;

impl SleepModel for BrokenModel {
    fn predict(&self, input: &ModelInput) -> Result<ModelOutput, PredictionError> {
        Err(PredictionError::InvalidInput {
            field: "wake",
            value: input.wake,
        })
    }
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 5, 23).unwrap()
}

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    day().and_hms_opt(hour, minute, 0).unwrap()
}

#[test]
fn test_seven_am_scenario() {
    let model = StubModel::new(9.25);
    let calculator = BedtimeCalculator::new(&model);

    let outcome = calculator.calculate(&SleepForm::new(at(7, 0), 8.0, 2));

    match &outcome {
        BedtimeOutcome::Bedtime {
            request,
            estimate,
            result,
            formatted,
        } => {
            assert_eq!(request.wake_time_seconds, 25_200.0);
            assert_eq!(estimate.actual_sleep_hours, 9.25);
            assert_eq!(
                result.bedtime,
                NaiveDate::from_ymd_opt(2021, 5, 22)
                    .unwrap()
                    .and_hms_opt(21, 45, 0)
                    .unwrap()
            );
            assert_eq!(formatted, "21:45");
        }
        BedtimeOutcome::Failed => panic!("expected a bedtime"),
    }

    let seen = model.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].wake, 25_200.0);
    assert_eq!(seen[0].estimated_sleep, 8.0);
    assert_eq!(seen[0].coffee, 2.0);
}

#[test]
fn test_legacy_encoding_sent_to_model() {
    let model = StubModel::new(8.0);
    let calculator = BedtimeCalculator::new(&model);
    calculator.calculate(&SleepForm::new(at(6, 45), 8.0, 1));

    let corrected = StubModel::new(8.0);
    BedtimeCalculator::new(&corrected)
        .with_encoding(WakeEncoding::Corrected)
        .calculate(&SleepForm::new(at(6, 45), 8.0, 1));

    assert_eq!(model.seen.lock().unwrap()[0].wake, 6.0 * 3600.0 + 45.0 * 3600.0);
    assert_eq!(corrected.seen.lock().unwrap()[0].wake, 6.0 * 3600.0 + 45.0 * 60.0);
}

#[test]
fn test_boundary_requests_do_not_fail() {
    let estimator = Estimator::new(LinearSleepModel::default());
    for encoding in [WakeEncoding::Legacy, WakeEncoding::Corrected] {
        for (hour, minute) in [(0, 0), (7, 0), (23, 59)] {
            for sleep in [4.0, 12.0] {
                for coffee in [1, 12] {
                    let form = SleepForm::new(at(hour, minute), sleep, coffee);
                    let request = SleepRequest::try_from_form(&form, encoding).unwrap();

                    let estimate = estimator.estimate(&request).unwrap();
                    assert!(estimate.actual_sleep_hours.is_finite());
                    assert!(estimate.actual_sleep_hours >= 0.0);
                }
            }
        }
    }
}

#[test]
fn test_identical_inputs_give_identical_bedtimes() {
    let calculator = BedtimeCalculator::new(LinearSleepModel::default());
    let form = SleepForm::new(at(7, 0), 8.0, 2);
    assert_eq!(calculator.calculate(&form), calculator.calculate(&form));
}

#[test]
fn test_failing_model_shows_fixed_error() {
    let mut session = BedtimeSession::new(BedtimeCalculator::new(BrokenModel));
    let outcome = session.calculate(&SleepForm::new(at(7, 0), 8.0, 2));

    assert!(outcome.is_failed());
    let notification = session.notification().unwrap();
    assert_eq!(notification.title, "Error");
    assert_eq!(
        notification.message,
        "Sorry, there was a problem calculating your bedtime."
    );

    session.dismiss();
    assert_eq!(session.state(), &AlertState::Idle);
}

#[test]
fn test_unavailable_model_shows_fixed_error() {
    let calculator = BedtimeCalculator::new(UnavailableModel::new("model not found"));
    let notification = calculator
        .calculate(&SleepForm::new(at(7, 0), 8.0, 2))
        .notification();
    assert!(notification.is_error());
    assert_eq!(notification.title, "Error");
}

#[test]
fn test_unreadable_wake_time_falls_back_to_six() {
    let model = StubModel::new(8.0);
    let calculator = BedtimeCalculator::new(&model).with_time_format(TimeFormat::TwentyFourHour);

    let wake_up = wake_time_or_default("half past seven", day());
    let outcome = calculator.calculate(&SleepForm::new(wake_up, 8.0, 2));

    assert_eq!(outcome.notification().message, "22:00");
    assert_eq!(model.seen.lock().unwrap()[0].wake, 21_600.0);
}
