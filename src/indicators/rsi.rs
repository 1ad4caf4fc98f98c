use crate::errors::IndicatorError;

const NEUTRAL: f64 = 50.0;

/// Relative strength index over the trailing `period` transitions.
///
/// Gains and losses are a flat average over the window, recomputed on every
/// call (no Wilder smoothing). With fewer transitions than `period` the whole
/// series is used.
///
/// Any window with neither gains nor losses reads 50, whatever its length;
/// 100 needs at least one gain and no loss.
pub fn rsi(closes: &[f64], period: usize) -> Result<f64, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::zero_period("rsi"));
    }
    if closes.len() < 2 {
        return Ok(NEUTRAL);
    }

    let effective_period = (closes.len() - 1).min(period);
    let start = closes.len() - effective_period;

    let (gains, losses) = closes[start - 1..]
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold((0.0, 0.0), |(gains, losses), delta| {
            if delta > 0.0 {
                (gains + delta, losses)
            } else {
                (gains, losses - delta)
            }
        });

    let avg_gain = gains / effective_period as f64;
    let avg_loss = losses / effective_period as f64;

    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return Ok(NEUTRAL);
        }
        return Ok(100.0);
    }

    let rs = avg_gain / avg_loss;
    Ok(100.0 - 100.0 / (1.0 + rs))
}
