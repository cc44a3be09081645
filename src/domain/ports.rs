use crate::domain::model::{LinearCoefficients, ModelInput, ModelOutput, PredictionError};
use crate::domain::model::{TimeFormat, WakeEncoding};
use crate::utils::error::Result;
use async_trait::async_trait;

/// A trained regression that maps the three input features to actual sleep hours.
pub trait SleepModel: Send + Sync {
    fn predict(&self, input: &ModelInput) -> std::result::Result<ModelOutput, PredictionError>;
}

impl<M: SleepModel + ?Sized> SleepModel for Box<M> {
    fn predict(&self, input: &ModelInput) -> std::result::Result<ModelOutput, PredictionError> {
        (**self).predict(input)
    }
}

impl<M: SleepModel + ?Sized> SleepModel for &M {
    fn predict(&self, input: &ModelInput) -> std::result::Result<ModelOutput, PredictionError> {
        (**self).predict(input)
    }
}

#[async_trait]
pub trait ModelStore: Send + Sync {
    async fn load_model(&self, path: &str) -> Result<LinearCoefficients>;
    async fn save_model(&self, path: &str, coefficients: &LinearCoefficients) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn model_path(&self) -> Option<&str>;
    fn wake_encoding(&self) -> WakeEncoding;
    fn time_format(&self) -> TimeFormat;
}
