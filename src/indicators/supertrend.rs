use crate::errors::IndicatorError;
use crate::models::{Candle, Direction, Supertrend};

/// Mean of the last `period` true ranges (or of all, if fewer exist).
///
/// Returns 0 when fewer than two candles are available.
pub fn average_true_range(candles: &[Candle], period: usize) -> Result<f64, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::zero_period("atr"));
    }

    let true_ranges: Vec<f64> = candles
        .windows(2)
        .map(|w| {
            let (prev, cur) = (&w[0], &w[1]);
            (cur.high - cur.low)
                .max((cur.high - prev.close).abs())
                .max((cur.low - prev.close).abs())
        })
        .collect();

    if true_ranges.is_empty() {
        return Ok(0.0);
    }

    let recent = &true_ranges[true_ranges.len().saturating_sub(period)..];
    Ok(recent.iter().sum::<f64>() / recent.len() as f64)
}

/// Single-step Supertrend classification of the last candle.
///
/// Bands come from the last bar only; no band state carries across candles.
pub fn supertrend(
    candles: &[Candle],
    period: usize,
    multiplier: f64,
) -> Result<Supertrend, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::zero_period("supertrend"));
    }
    if !multiplier.is_finite() || multiplier < 0.0 {
        return Err(IndicatorError::InvalidArgument {
            indicator: "supertrend",
            name: "multiplier",
            value: multiplier.to_string(),
        });
    }

    let Some(last) = candles.last().filter(|_| candles.len() > period) else {
        return Ok(Supertrend::flat());
    };

    let atr = average_true_range(candles, period)?;
    let hl2 = (last.high + last.low) / 2.0;
    let basic_upper = hl2 + multiplier * atr;
    let basic_lower = hl2 - multiplier * atr;

    Ok(if last.close > basic_lower {
        Supertrend {
            direction: Direction::Up,
            value: basic_lower,
        }
    } else {
        Supertrend {
            direction: Direction::Down,
            value: basic_upper,
        }
    })
}
