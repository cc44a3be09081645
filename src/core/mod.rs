pub mod bedtime;
pub mod estimator;
pub mod session;
pub mod training;

pub use crate::domain::model::{
    BedtimeResult, LinearCoefficients, ModelInput, ModelOutput, Notification, NotificationKind,
    PredictionError, SleepEstimate, SleepRequest, TimeFormat, WakeEncoding,
};
pub use crate::domain::ports::{ConfigProvider, ModelStore, SleepModel};
pub use crate::utils::error::Result;
