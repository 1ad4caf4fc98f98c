pub mod message;
pub mod simulator;
pub use message::{parse_message, FeedTick};
pub use simulator::TickSimulator;

pub const DEFAULT_STREAM_URL: &str = "wss://stream.binance.com:9443/ws";

/// Websocket endpoint for the one-second kline stream of `stream`.
pub fn stream_url(base: &str, stream: &str) -> String {
    format!("{}/{}@kline_1s", base.trim_end_matches('/'), stream)
}
