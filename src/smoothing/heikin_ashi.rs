use crate::models::{Candle, CandleColor, SmoothedCandle};

/// Wick or body sizes at or below this are treated as float noise.
pub const WICK_EPSILON: f64 = 1e-5;

/// Heikin-Ashi transform of an ordered candle sequence.
///
/// Each smoothed open depends on the previous *smoothed* bar, so the output is
/// only meaningful when computed over the whole sequence from its start.
pub fn heikin_ashi(candles: &[Candle]) -> Vec<SmoothedCandle> {
    let mut smoothed: Vec<SmoothedCandle> = Vec::with_capacity(candles.len());

    for candle in candles {
        let close = (candle.open + candle.high + candle.low + candle.close) / 4.0;

        let (open, high, low) = match smoothed.last() {
            None => (candle.open, candle.high, candle.low),
            Some(prev) => {
                let open = (prev.open() + prev.close()) / 2.0;
                (
                    open,
                    candle.high.max(open).max(close),
                    candle.low.min(open).min(close),
                )
            }
        };

        smoothed.push(shape(Candle {
            time: candle.time,
            open,
            high,
            low,
            close,
            synthetic: candle.synthetic,
        }));
    }

    smoothed
}

fn shape(candle: Candle) -> SmoothedCandle {
    let body_top = candle.open.max(candle.close);
    let body_bottom = candle.open.min(candle.close);

    let upper_wick_size = denoise(candle.high - body_top);
    let lower_wick_size = denoise(body_bottom - candle.low);

    SmoothedCandle {
        candle,
        color: if candle.close >= candle.open {
            CandleColor::Up
        } else {
            CandleColor::Down
        },
        has_upper_wick: upper_wick_size > 0.0,
        has_lower_wick: lower_wick_size > 0.0,
        body_size: denoise(body_top - body_bottom),
        upper_wick_size,
        lower_wick_size,
    }
}

fn denoise(size: f64) -> f64 {
    if size > WICK_EPSILON {
        size
    } else {
        0.0
    }
}
