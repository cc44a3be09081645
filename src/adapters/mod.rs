// Adapters layer: concrete sleep models behind the SleepModel port.

pub mod linear_model;

pub use linear_model::{load_sleep_model, LinearSleepModel, UnavailableModel};
