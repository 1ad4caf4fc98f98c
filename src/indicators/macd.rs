use super::ema::ema;
use crate::errors::IndicatorError;
use crate::models::Macd;

/// MACD line, signal line and histogram at the end of `closes`.
///
/// Both EMAs are recomputed over the entire history on every call.
pub fn macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Result<Macd, IndicatorError> {
    let fast_ema = ema(closes, fast)?;
    let slow_ema = ema(closes, slow)?;

    let macd_series: Vec<f64> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| f - s)
        .collect();
    let signal_series = ema(&macd_series, signal_period)?;

    let (Some(&value), Some(&signal)) = (macd_series.last(), signal_series.last()) else {
        return Ok(Macd::default());
    };

    Ok(Macd {
        value,
        signal,
        histogram: value - signal,
    })
}
