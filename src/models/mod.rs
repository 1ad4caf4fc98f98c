pub mod analysis;
pub mod candle;
pub use analysis::{AnalysisResult, Direction, Macd, Signal, Supertrend, Trend};
pub use candle::{Candle, CandleColor, SmoothedCandle};
