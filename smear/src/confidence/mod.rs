//! Whole-image confidence from per-cell classifier confidences.
//!
//! Only infected cells contribute. The default statistic is the median of
//! their confidences. Values are collected in detection order and then
//! ordered before the middle is taken, so the score does not depend on where
//! segmentation happened to find each cell. For an even number of infected
//! cells the two middle values are averaged.

mod session_log;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::cells::CellResults;

pub use session_log::ConfidenceLog;

/// Statistic used to reduce infected-cell confidences to one score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMethod {
    /// Median of infected-cell confidences.
    #[default]
    Median,
    /// Arithmetic mean of infected-cell confidences.
    Mean,
}

/// Confidence score for a whole image. Zero when no cell is infected.
pub fn image_confidence(cells: &CellResults, method: AggregationMethod) -> f32 {
    let mut confidences: Vec<f32> = cells.infected_confidences().collect();
    if confidences.is_empty() {
        return 0.0;
    }

    match method {
        AggregationMethod::Median => median_f32_mut(&mut confidences),
        AggregationMethod::Mean => mean_f32(&confidences),
    }
}

/// Calculate the median of f32 values in-place.
///
/// Mutates the input buffer (partial sort via quickselect). Even lengths
/// average the two middle values. NaN sorts above every number.
pub fn median_f32_mut(data: &mut [f32]) -> f32 {
    debug_assert!(!data.is_empty());

    let len = data.len();
    let mid = len / 2;

    let (left_part, median, _) = data.select_nth_unstable_by(mid, f32::total_cmp);
    let right = *median;

    if len & 1 == 1 {
        right
    } else {
        let left = left_part
            .iter()
            .copied()
            .reduce(|a, b| if a.total_cmp(&b).is_ge() { a } else { b })
            .unwrap_or(right);
        (left + right) * 0.5
    }
}

fn mean_f32(data: &[f32]) -> f32 {
    debug_assert!(!data.is_empty());
    let sum: f64 = data.iter().map(|&v| v as f64).sum();
    (sum / data.len() as f64) as f32
}
