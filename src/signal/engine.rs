use log::{debug, error};

use crate::errors::IndicatorError;
use crate::indicators::{
    ema, macd, rsi, supertrend, MACD_FAST, MACD_SIGNAL, MACD_SLOW, RSI_PERIOD, SUPERTREND_MULTIPLIER,
    SUPERTREND_PERIOD,
};
use crate::models::{
    AnalysisResult, Candle, CandleColor, Direction, Macd, Signal, SmoothedCandle, Supertrend, Trend,
};
use crate::smoothing::heikin_ashi;

const BASE_CONFIDENCE: i32 = 30;
const TIE_BREAK_THRESHOLD: i32 = 40;
const TIE_BREAK_CONFIDENCE: i32 = 45;
const MAX_CONFIDENCE: i32 = 99;
const SMALL_BODY_RATIO: f64 = 0.3;

const FAST_EMA: usize = 20;
const SLOW_EMA: usize = 50;

/// Confluence scoring over the Heikin-Ashi view of a candle window.
///
/// Holds no state: every call depends only on the candles passed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalEngine;

struct Inputs<'a> {
    current: &'a SmoothedCandle,
    prev: &'a SmoothedCandle,
    rsi: f64,
    ema20: f64,
    ema50: f64,
    macd: Macd,
    supertrend: Supertrend,
}

impl SignalEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, candles: &[Candle]) -> AnalysisResult {
        match self.evaluate(candles) {
            Ok(result) => result,
            Err(e) => {
                error!("Indicator evaluation failed, reporting cold start: {}", e);
                AnalysisResult::cold_start()
            }
        }
    }

    fn evaluate(&self, candles: &[Candle]) -> Result<AnalysisResult, IndicatorError> {
        let smoothed = heikin_ashi(candles);
        let [.., prev, current] = smoothed.as_slice() else {
            debug!("{} smoothed candles, reporting cold start", smoothed.len());
            return Ok(AnalysisResult::cold_start());
        };

        let closes: Vec<f64> = smoothed.iter().map(SmoothedCandle::close).collect();
        let inputs = Inputs {
            current,
            prev,
            rsi: rsi(&closes, RSI_PERIOD)?,
            ema20: ema(&closes, FAST_EMA)?.last().copied().unwrap_or(0.0),
            ema50: ema(&closes, SLOW_EMA)?.last().copied().unwrap_or(0.0),
            macd: macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL)?,
            supertrend: supertrend(candles, SUPERTREND_PERIOD, SUPERTREND_MULTIPLIER)?,
        };

        Ok(Self::score(&inputs))
    }

    fn score(inputs: &Inputs<'_>) -> AnalysisResult {
        let current = inputs.current;
        let price = current.close();
        let is_small_body = current.body_size < SMALL_BODY_RATIO * current.candle.range();

        let mut signal = if current.is_up() {
            Signal::Call
        } else {
            Signal::Put
        };

        let checks: [(bool, i32); 9] = match signal {
            Signal::Call => [
                (price > inputs.ema20, 10),
                (inputs.ema20 > inputs.ema50, 10),
                (inputs.rsi > 50.0 && inputs.rsi < 80.0, 10),
                (inputs.rsi < 30.0, 15),
                (inputs.macd.histogram > 0.0, 10),
                (inputs.macd.value > inputs.macd.signal, 5),
                (inputs.supertrend.direction == Direction::Up, 10),
                (!is_small_body && !current.has_lower_wick, 10),
                (is_small_body && inputs.prev.color == CandleColor::Down, -10),
            ],
            Signal::Put => [
                (price < inputs.ema20, 10),
                (inputs.ema20 < inputs.ema50, 10),
                (inputs.rsi < 50.0 && inputs.rsi > 20.0, 10),
                (inputs.rsi > 70.0, 15),
                (inputs.macd.histogram < 0.0, 10),
                (inputs.macd.value < inputs.macd.signal, 5),
                (inputs.supertrend.direction == Direction::Down, 10),
                (!is_small_body && !current.has_upper_wick, 10),
                (is_small_body && inputs.prev.color == CandleColor::Up, -10),
            ],
        };

        let mut confidence = BASE_CONFIDENCE
            + checks
                .iter()
                .filter(|(hit, _)| *hit)
                .map(|(_, weight)| weight)
                .sum::<i32>();

        let trend = if inputs.ema20 > inputs.ema50 {
            Trend::Up
        } else if inputs.ema20 < inputs.ema50 {
            Trend::Down
        } else {
            Trend::Sideways
        };

        if confidence < TIE_BREAK_THRESHOLD {
            signal = if price > inputs.ema20 {
                Signal::Call
            } else {
                Signal::Put
            };
            confidence = TIE_BREAK_CONFIDENCE;
        }

        AnalysisResult {
            signal,
            confidence: confidence.clamp(0, MAX_CONFIDENCE) as u8,
            rsi: inputs.rsi,
            ema20: inputs.ema20,
            ema50: inputs.ema50,
            trend,
            macd: inputs.macd,
            supertrend: inputs.supertrend,
        }
    }
}
