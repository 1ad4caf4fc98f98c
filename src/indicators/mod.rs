//! Stateless indicator functions. Every call recomputes from the full input.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod supertrend;

pub use ema::ema;
pub use macd::macd;
pub use rsi::rsi;
pub use supertrend::{average_true_range, supertrend};

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const SUPERTREND_PERIOD: usize = 10;
pub const SUPERTREND_MULTIPLIER: f64 = 3.0;
