use serde::Serialize;

/// Maximum number of committed candles kept in a window.
pub const WINDOW_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Fabricated bootstrap history rather than an observed bar.
    pub synthetic: bool,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            synthetic: false,
        }
    }

    pub fn synthetic(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            synthetic: true,
            ..Self::new(time, open, high, low, close)
        }
    }

    /// A fresh bar seeded from a single price.
    pub fn from_price(time: i64, price: f64) -> Self {
        Self::new(time, price, price, price, price)
    }

    pub fn update(&mut self, price: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CandleColor {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SmoothedCandle {
    pub candle: Candle,
    pub color: CandleColor,
    pub has_upper_wick: bool,
    pub has_lower_wick: bool,
    pub body_size: f64,
    pub upper_wick_size: f64,
    pub lower_wick_size: f64,
}

impl SmoothedCandle {
    pub fn time(&self) -> i64 {
        self.candle.time
    }

    pub fn open(&self) -> f64 {
        self.candle.open
    }

    pub fn high(&self) -> f64 {
        self.candle.high
    }

    pub fn low(&self) -> f64 {
        self.candle.low
    }

    pub fn close(&self) -> f64 {
        self.candle.close
    }

    pub fn is_up(&self) -> bool {
        self.color == CandleColor::Up
    }
}
