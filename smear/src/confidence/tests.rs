use super::*;
use crate::cells::{CellLocation, Classification};

fn cells_from(classifications: &[Classification]) -> CellResults {
    let locations: Vec<_> = (0..classifications.len() as u32)
        .map(|i| CellLocation::new(i * 10, i * 10))
        .collect();
    CellResults::from_parts(&locations, classifications).unwrap()
}

// ---------------------------------------------------------------------------
// image_confidence
// ---------------------------------------------------------------------------

#[test]
fn test_no_cells_gives_zero() {
    let cells = CellResults::new();
    assert_eq!(image_confidence(&cells, AggregationMethod::Median), 0.0);
    assert_eq!(image_confidence(&cells, AggregationMethod::Mean), 0.0);
}

#[test]
fn test_only_uninfected_gives_zero() {
    let cells = cells_from(&[
        Classification::uninfected(),
        Classification {
            label: crate::cells::CellLabel::Uninfected,
            confidence: 0.99,
        },
    ]);
    assert_eq!(image_confidence(&cells, AggregationMethod::Median), 0.0);
}

#[test]
fn test_single_infected_returns_its_confidence() {
    for c in [0.0f32, 0.37, 0.5, 0.81, 1.0] {
        let cells = cells_from(&[
            Classification::uninfected(),
            Classification::infected(c),
            Classification::uninfected(),
        ]);
        assert_eq!(image_confidence(&cells, AggregationMethod::Median), c);
        assert_eq!(image_confidence(&cells, AggregationMethod::Mean), c);
    }
}

#[test]
fn test_two_infected_average_middle_values() {
    let cells = cells_from(&[
        Classification::infected(0.65),
        Classification::uninfected(),
        Classification::infected(0.92),
    ]);
    let conf = image_confidence(&cells, AggregationMethod::Median);
    assert!((conf - 0.785).abs() < 1e-6, "got {conf}");
}

#[test]
fn test_median_sorts_before_taking_middle() {
    // Detection order 0.95, 0.55, 0.75: the unsorted middle element is 0.55,
    // the statistical median is 0.75.
    let cells = cells_from(&[
        Classification::infected(0.95),
        Classification::infected(0.55),
        Classification::infected(0.75),
    ]);
    assert_eq!(image_confidence(&cells, AggregationMethod::Median), 0.75);
}

#[test]
fn test_median_independent_of_detection_order() {
    let forward = cells_from(&[
        Classification::infected(0.9),
        Classification::infected(0.6),
        Classification::infected(0.7),
        Classification::infected(0.8),
    ]);
    let reversed = cells_from(&[
        Classification::infected(0.8),
        Classification::infected(0.7),
        Classification::infected(0.6),
        Classification::infected(0.9),
    ]);

    let a = image_confidence(&forward, AggregationMethod::Median);
    let b = image_confidence(&reversed, AggregationMethod::Median);
    assert_eq!(a, b);
    assert!((a - 0.75).abs() < 1e-6);
}

#[test]
fn test_uninfected_confidences_are_ignored() {
    let cells = cells_from(&[
        Classification {
            label: crate::cells::CellLabel::Uninfected,
            confidence: 0.1,
        },
        Classification::infected(0.8),
        Classification {
            label: crate::cells::CellLabel::Uninfected,
            confidence: 0.2,
        },
    ]);
    assert_eq!(image_confidence(&cells, AggregationMethod::Median), 0.8);
}

#[test]
fn test_mean_statistic() {
    let cells = cells_from(&[
        Classification::infected(0.6),
        Classification::infected(0.7),
        Classification::infected(1.0),
    ]);
    let conf = image_confidence(&cells, AggregationMethod::Mean);
    assert!((conf - 0.766_666_7).abs() < 1e-6, "got {conf}");
}

// ---------------------------------------------------------------------------
// median_f32_mut
// ---------------------------------------------------------------------------

#[test]
fn test_median_odd() {
    let mut values = [1.0f32, 3.0, 2.0, 5.0, 4.0];
    assert_eq!(median_f32_mut(&mut values), 3.0);
}

#[test]
fn test_median_even() {
    let mut values = [4.0f32, 1.0, 3.0, 2.0];
    assert!((median_f32_mut(&mut values) - 2.5).abs() < f32::EPSILON);
}

#[test]
fn test_median_with_nan_does_not_panic() {
    let mut values = [0.7f32, f32::NAN, 0.6];
    // NaN orders last, so the middle of [0.6, 0.7, NaN] is 0.7.
    assert_eq!(median_f32_mut(&mut values), 0.7);
}

// ---------------------------------------------------------------------------
// ConfidenceLog
// ---------------------------------------------------------------------------

#[test]
fn test_log_appends_in_order_and_shares_state() {
    let log = ConfidenceLog::new();
    let handle = log.clone();

    log.append(0.5);
    handle.append(0.0);
    log.append(0.9);

    assert_eq!(log.snapshot(), vec![0.5, 0.0, 0.9]);
    assert_eq!(handle.len(), 3);

    handle.clear();
    assert!(log.is_empty());
}

#[test]
fn test_log_sequential_appends_from_threads() {
    let log = ConfidenceLog::new();
    std::thread::scope(|s| {
        for i in 0..4 {
            let log = log.clone();
            s.spawn(move || {
                for _ in 0..25 {
                    log.append(i as f32 / 10.0);
                }
            });
        }
    });
    assert_eq!(log.len(), 100);
}
