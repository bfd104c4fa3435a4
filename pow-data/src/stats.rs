//! Scalar reducers used by the merge stage.
//!
//! Empty input is not an error for any of them: each returns 0.

/// Round to two decimals, applied at every stage boundary.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Middle value, or the average of the two middle values for an even count.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Most frequent value. Ties go to whichever value was seen first.
pub fn mode<T: Copy + PartialEq + Default>(values: &[T]) -> T {
    let mut counts: Vec<(T, usize)> = Vec::new();
    let mut best = T::default();
    let mut best_count = 0;
    for &v in values {
        let count = match counts.iter_mut().find(|(seen, _)| *seen == v) {
            Some((_, c)) => {
                *c += 1;
                *c
            }
            None => {
                counts.push((v, 1));
                1
            }
        };
        if count > best_count {
            best_count = count;
            best = v;
        }
    }
    best
}

/// Mean of compass bearings in degrees, normalized to [0, 360).
///
/// Averages unit vectors so that 350° and 10° give 0°, not 180°.
pub fn circular_mean(degrees: &[f64]) -> f64 {
    if degrees.is_empty() {
        return 0.0;
    }
    let (sin_sum, cos_sum) = degrees.iter().fold((0.0, 0.0), |(s, c), d| {
        let rad = d.to_radians();
        (s + rad.sin(), c + rad.cos())
    });
    let n = degrees.len() as f64;
    let avg = (sin_sum / n).atan2(cos_sum / n).to_degrees().rem_euclid(360.0);
    // a tiny negative angle rounds up to exactly 360 after rem_euclid
    if avg >= 360.0 {
        0.0
    } else {
        avg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs_are_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(median(&[]), 0.0);
        assert_eq!(mode::<f64>(&[]), 0.0);
        assert_eq!(mode::<i32>(&[]), 0);
        assert_eq!(circular_mean(&[]), 0.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[7.0]), 7.0);
        assert_eq!(mean(&[1.0, 2.0, 3.0, 50.0]), 14.0);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[10.0, 0.5, 1.0]), 1.0);
    }

    #[test]
    fn test_median_resists_outliers() {
        let values = [1.0, 2.0, 3.0, 50.0];
        assert_eq!(median(&values), 2.5);
        assert_eq!(mean(&values), 14.0);
    }

    #[test]
    fn test_mode() {
        assert_eq!(mode(&[71, 73, 71]), 71);
        assert_eq!(mode(&[3, 2, 2, 3]), 3);
        assert_eq!(mode(&[0.5, 1.5]), 0.5);
    }

    #[test]
    fn test_circular_mean_wraps() {
        let avg = circular_mean(&[350.0, 10.0]);
        assert!(avg < 10.0, "got {}", avg);
        assert!(avg >= 0.0);
        let avg = circular_mean(&[340.0, 30.0]);
        assert!((avg - 5.0).abs() < 1e-9, "got {}", avg);
    }

    #[test]
    fn test_circular_mean_plain() {
        assert!((circular_mean(&[90.0, 180.0]) - 135.0).abs() < 1e-9);
        assert!((circular_mean(&[270.0]) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(-1.234), -1.23);
        assert_eq!(round2(2.0), 2.0);
    }
}
