//! Ordinary least squares fit of a [`LinearCoefficients`] model from CSV rows.
//!
//! Features are standardized before solving the normal equations so that the
//! wake column (tens of thousands of seconds) and the small coffee counts end
//! up on the same scale.

use crate::core::LinearCoefficients;
use crate::utils::error::{BedtimeError, Result};
use serde::{Deserialize, Serialize};

const FEATURES: [&str; 3] = ["wake", "estimatedSleep", "coffee"];
const MIN_SAMPLES: usize = FEATURES.len() + 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub wake: f64,
    #[serde(rename = "estimatedSleep")]
    pub estimated_sleep: f64,
    pub coffee: f64,
    #[serde(rename = "actualSleep")]
    pub actual_sleep: f64,
}

impl TrainingSample {
    fn features(&self) -> [f64; 3] {
        [self.wake, self.estimated_sleep, self.coffee]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SleepUnit {
    #[default]
    Hours,
    Seconds,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitReport {
    pub coefficients: LinearCoefficients,
    pub samples: usize,
    pub rmse: f64,
    pub r_squared: f64,
}

pub fn read_samples<R: std::io::Read>(reader: R, unit: SleepUnit) -> Result<Vec<TrainingSample>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();
    for row in csv_reader.deserialize() {
        let mut sample: TrainingSample = row?;
        if unit == SleepUnit::Seconds {
            sample.actual_sleep /= 3600.0;
        }
        samples.push(sample);
    }

    tracing::debug!("Read {} training rows", samples.len());
    Ok(samples)
}

pub fn fit_linear(samples: &[TrainingSample]) -> Result<FitReport> {
    let n = samples.len();
    if n < MIN_SAMPLES {
        return Err(BedtimeError::TrainingError {
            message: format!("need at least {} rows, got {}", MIN_SAMPLES, n),
        });
    }

    if let Some((row, _)) = samples.iter().enumerate().find(|(_, s)| {
        !s.features().iter().all(|v| v.is_finite()) || !s.actual_sleep.is_finite()
    }) {
        return Err(BedtimeError::TrainingError {
            message: format!("row {} contains a non-finite value", row + 1),
        });
    }

    let count = n as f64;
    let y_mean = samples.iter().map(|s| s.actual_sleep).sum::<f64>() / count;

    let mut means = [0.0; 3];
    for sample in samples {
        for (mean, value) in means.iter_mut().zip(sample.features()) {
            *mean += value / count;
        }
    }

    let mut scales = [0.0; 3];
    for sample in samples {
        for (j, value) in sample.features().into_iter().enumerate() {
            scales[j] += (value - means[j]).powi(2) / count;
        }
    }
    for (j, scale) in scales.iter_mut().enumerate() {
        *scale = scale.sqrt();
        if *scale <= 1e-12 * (means[j].abs() + 1.0) {
            return Err(BedtimeError::TrainingError {
                message: format!("column '{}' has no variation", FEATURES[j]),
            });
        }
    }

    // 標準化後的正規方程 Z^T Z g = Z^T (y - ȳ)
    let mut gram = [[0.0; 3]; 3];
    let mut rhs = [0.0; 3];
    for sample in samples {
        let z: Vec<f64> = sample
            .features()
            .iter()
            .enumerate()
            .map(|(j, value)| (value - means[j]) / scales[j])
            .collect();
        let centered = sample.actual_sleep - y_mean;
        for i in 0..3 {
            rhs[i] += z[i] * centered;
            for k in 0..3 {
                gram[i][k] += z[i] * z[k];
            }
        }
    }

    let solution = solve(gram, rhs, 1e-10 * count).ok_or_else(|| BedtimeError::TrainingError {
        message: "feature columns are collinear".to_string(),
    })?;

    let slopes: Vec<f64> = solution
        .iter()
        .zip(scales)
        .map(|(g, scale)| g / scale)
        .collect();
    let intercept = y_mean
        - slopes
            .iter()
            .zip(means)
            .map(|(slope, mean)| slope * mean)
            .sum::<f64>();

    let coefficients = LinearCoefficients {
        intercept,
        wake: slopes[0],
        estimated_sleep: slopes[1],
        coffee: slopes[2],
    };

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for sample in samples {
        let predicted = coefficients.intercept
            + coefficients.wake * sample.wake
            + coefficients.estimated_sleep * sample.estimated_sleep
            + coefficients.coffee * sample.coffee;
        ss_res += (sample.actual_sleep - predicted).powi(2);
        ss_tot += (sample.actual_sleep - y_mean).powi(2);
    }

    let report = FitReport {
        coefficients,
        samples: n,
        rmse: (ss_res / count).sqrt(),
        r_squared: if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 },
    };

    tracing::info!(
        "📈 Fitted {} rows: RMSE {:.4}h, R² {:.4}",
        report.samples,
        report.rmse,
        report.r_squared
    );
    Ok(report)
}

/// Gaussian elimination with partial pivoting. `None` when a pivot falls under `tolerance`.
fn solve<const N: usize>(mut a: [[f64; N]; N], mut b: [f64; N], tolerance: f64) -> Option<[f64; N]> {
    for col in 0..N {
        let pivot_row = (col..N).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot_row][col].abs() < tolerance {
            return None;
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in col + 1..N {
            let factor = a[row][col] / a[col][col];
            for k in col..N {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0; N];
    for row in (0..N).rev() {
        let tail: f64 = (row + 1..N).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}
