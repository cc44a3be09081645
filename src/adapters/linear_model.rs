use crate::domain::model::{LinearCoefficients, ModelInput, ModelOutput, PredictionError};
use crate::domain::ports::{ConfigProvider, ModelStore, SleepModel};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearSleepModel {
    coefficients: LinearCoefficients,
}

impl LinearSleepModel {
    pub fn new(coefficients: LinearCoefficients) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &LinearCoefficients {
        &self.coefficients
    }
}

impl SleepModel for LinearSleepModel {
    fn predict(&self, input: &ModelInput) -> Result<ModelOutput, PredictionError> {
        let features = [
            ("wake", input.wake),
            ("estimatedSleep", input.estimated_sleep),
            ("coffee", input.coffee),
        ];
        for (field, value) in features {
            if !value.is_finite() {
                return Err(PredictionError::InvalidInput { field, value });
            }
        }

        let c = &self.coefficients;
        let raw = c.intercept
            + c.wake * input.wake
            + c.estimated_sleep * input.estimated_sleep
            + c.coffee * input.coffee;

        if !raw.is_finite() {
            return Err(PredictionError::NonFiniteOutput { value: raw });
        }

        // 睡眠時數不可能為負
        Ok(ModelOutput {
            actual_sleep: raw.max(0.0),
        })
    }
}

/// Stands in for a model that could not be loaded; every prediction fails.
#[derive(Debug, Clone, PartialEq)]
pub struct UnavailableModel {
    reason: String,
}

impl UnavailableModel {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl SleepModel for UnavailableModel {
    fn predict(&self, _input: &ModelInput) -> Result<ModelOutput, PredictionError> {
        Err(PredictionError::ModelUnavailable {
            reason: self.reason.clone(),
        })
    }
}

/// Loads the configured model, or the built-in coefficients when no path is set.
///
/// A model that fails to load is not fatal: the returned [`UnavailableModel`]
/// makes the next calculation end in the error notification.
pub async fn load_sleep_model<S: ModelStore, C: ConfigProvider>(
    store: &S,
    config: &C,
) -> Box<dyn SleepModel> {
    let Some(path) = config.model_path() else {
        tracing::debug!("No model path configured, using built-in coefficients");
        return Box::new(LinearSleepModel::default());
    };

    match store.load_model(path).await {
        Ok(coefficients) => {
            tracing::info!("✅ Loaded sleep model from {}", path);
            Box::new(LinearSleepModel::new(coefficients))
        }
        Err(e) => {
            tracing::warn!("⚠️ Sleep model '{}' unavailable: {}", path, e);
            Box::new(UnavailableModel::new(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolvedConfig;
    use crate::utils::error::{BedtimeError, Result};
    use async_trait::async_trait;

    struct FixedStore(Option<LinearCoefficients>);

    #[async_trait]
    impl ModelStore for FixedStore {
        async fn load_model(&self, path: &str) -> Result<LinearCoefficients> {
            self.0.ok_or_else(|| BedtimeError::ConfigError {
                message: format!("no model at {}", path),
            })
        }

        async fn save_model(&self, _path: &str, _coefficients: &LinearCoefficients) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_load_without_path_uses_default() {
        let model = load_sleep_model(&FixedStore(None), &ResolvedConfig::default()).await;
        let expected = LinearSleepModel::default()
            .predict(&input(25_200.0, 8.0, 3.0))
            .unwrap();
        assert_eq!(model.predict(&input(25_200.0, 8.0, 3.0)).unwrap(), expected);
    }

    #[tokio::test]
    async fn test_load_failure_yields_unavailable_model() {
        let config = ResolvedConfig {
            model_path: Some("missing.json".to_string()),
            ..ResolvedConfig::default()
        };
        let model = load_sleep_model(&FixedStore(None), &config).await;
        assert!(matches!(
            model.predict(&input(25_200.0, 8.0, 3.0)),
            Err(PredictionError::ModelUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_uses_stored_coefficients() {
        let coefficients = LinearCoefficients {
            intercept: 2.0,
            wake: 0.0,
            estimated_sleep: 0.5,
            coffee: 0.0,
        };
        let config = ResolvedConfig {
            model_path: Some("model.json".to_string()),
            ..ResolvedConfig::default()
        };
        let model = load_sleep_model(&FixedStore(Some(coefficients)), &config).await;
        let output = model.predict(&input(0.0, 8.0, 1.0)).unwrap();
        assert_eq!(output.actual_sleep, 6.0);
    }

    fn input(wake: f64, estimated_sleep: f64, coffee: f64) -> ModelInput {
        ModelInput {
            wake,
            estimated_sleep,
            coffee,
        }
    }

    #[test]
    fn test_linear_prediction() {
        let model = LinearSleepModel::new(LinearCoefficients {
            intercept: 1.0,
            wake: 0.0,
            estimated_sleep: 1.0,
            coffee: -0.5,
        });
        let output = model.predict(&input(25_200.0, 8.0, 2.0)).unwrap();
        assert!((output.actual_sleep - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_prediction_clamped_at_zero() {
        let model = LinearSleepModel::new(LinearCoefficients {
            intercept: 0.0,
            wake: 0.0,
            estimated_sleep: 0.0,
            coffee: -1.0,
        });
        let output = model.predict(&input(0.0, 4.0, 12.0)).unwrap();
        assert_eq!(output.actual_sleep, 0.0);
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let model = LinearSleepModel::default();
        let err = model.predict(&input(f64::NAN, 8.0, 2.0)).unwrap_err();
        assert!(matches!(err, PredictionError::InvalidInput { field: "wake", .. }));
    }

    #[test]
    fn test_overflowing_output_rejected() {
        let model = LinearSleepModel::new(LinearCoefficients {
            intercept: f64::MAX,
            wake: 0.0,
            estimated_sleep: f64::MAX,
            coffee: 0.0,
        });
        let err = model.predict(&input(0.0, 12.0, 1.0)).unwrap_err();
        assert!(matches!(err, PredictionError::NonFiniteOutput { .. }));
    }

    #[test]
    fn test_default_model_stays_positive_across_ranges() {
        let model = LinearSleepModel::default();
        for wake in [0.0, 25_200.0, 295_200.0] {
            for sleep in [4.0, 8.0, 12.0] {
                for coffee in [1.0, 12.0] {
                    let out = model.predict(&input(wake, sleep, coffee)).unwrap();
                    assert!(out.actual_sleep.is_finite());
                    assert!(out.actual_sleep > 0.0);
                }
            }
        }
    }

    #[test]
    fn test_unavailable_model_always_fails() {
        let model = UnavailableModel::new("file missing");
        let err = model.predict(&input(25_200.0, 8.0, 2.0)).unwrap_err();
        assert_eq!(
            err,
            PredictionError::ModelUnavailable {
                reason: "file missing".to_string()
            }
        );
    }
}
