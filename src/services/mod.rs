pub mod candle_aggregator;
pub use candle_aggregator::{CandleAggregator, TickOutcome, BOOTSTRAP_BARS};
