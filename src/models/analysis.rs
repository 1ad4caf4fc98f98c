use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Call,
    Put,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Trend {
    Up,
    Down,
    Sideways,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Macd {
    pub value: f64,
    pub signal: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Supertrend {
    pub direction: Direction,
    pub value: f64,
}

impl Supertrend {
    pub fn flat() -> Self {
        Self {
            direction: Direction::Up,
            value: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub signal: Signal,
    pub confidence: u8,
    pub rsi: f64,
    pub ema20: f64,
    pub ema50: f64,
    pub trend: Trend,
    pub macd: Macd,
    pub supertrend: Supertrend,
}

impl AnalysisResult {
    /// Result reported while fewer than two smoothed candles exist.
    pub fn cold_start() -> Self {
        Self {
            signal: Signal::Call,
            confidence: 50,
            rsi: 50.0,
            ema20: 0.0,
            ema50: 0.0,
            trend: Trend::Sideways,
            macd: Macd::default(),
            supertrend: Supertrend::flat(),
        }
    }
}

impl std::fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} {}% | trend {:?} | rsi {:.2} | ema20 {:.5} ema50 {:.5} | macd {:.6}/{:.6}/{:.6} | supertrend {:?} {:.5}",
            self.signal,
            self.confidence,
            self.trend,
            self.rsi,
            self.ema20,
            self.ema50,
            self.macd.value,
            self.macd.signal,
            self.macd.histogram,
            self.supertrend.direction,
            self.supertrend.value
        )
    }
}
