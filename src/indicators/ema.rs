use crate::errors::IndicatorError;

/// Exponential moving average seeded with the first value of the series.
///
/// Output has the same length as `series`; an empty series yields an empty vec.
pub fn ema(series: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::zero_period("ema"));
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut result = Vec::with_capacity(series.len());

    for &price in series {
        let value = match result.last() {
            Some(&prev) => (price - prev) * k + prev,
            None => price,
        };
        result.push(value);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_value_is_seed() {
        for period in [1, 5, 20, 50] {
            assert_eq!(ema(&[42.5], period).unwrap(), vec![42.5]);
        }
    }

    #[test]
    fn test_empty_series() {
        assert!(ema(&[], 10).unwrap().is_empty());
    }

    #[test]
    fn test_recursive_smoothing() {
        // k = 2 / 4 = 0.5
        let values = ema(&[10.0, 20.0, 30.0], 3).unwrap();
        assert_eq!(values.len(), 3);
        assert_relative_eq!(values[0], 10.0);
        assert_relative_eq!(values[1], 15.0);
        assert_relative_eq!(values[2], 22.5);
    }

    #[test]
    fn test_period_one_tracks_series() {
        let series = [3.0, 1.0, 4.0, 1.0, 5.0];
        assert_eq!(ema(&series, 1).unwrap(), series.to_vec());
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(matches!(
            ema(&[1.0, 2.0], 0),
            Err(IndicatorError::InvalidArgument { indicator: "ema", .. })
        ));
    }
}
