use crate::core::{ModelInput, PredictionError, SleepEstimate, SleepModel, SleepRequest};

pub struct Estimator<M: SleepModel> {
    model: M,
}

impl<M: SleepModel> Estimator<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// 不檢查輸入範圍，範圍驗證由呼叫端負責
    pub fn estimate(&self, request: &SleepRequest) -> Result<SleepEstimate, PredictionError> {
        let output = self.model.predict(&ModelInput::from(request))?;

        if !output.actual_sleep.is_finite() {
            return Err(PredictionError::NonFiniteOutput {
                value: output.actual_sleep,
            });
        }
        if output.actual_sleep < 0.0 {
            return Err(PredictionError::NegativeOutput {
                value: output.actual_sleep,
            });
        }

        Ok(SleepEstimate {
            actual_sleep_hours: output.actual_sleep,
        })
    }
}
