use clap::Parser;
use std::time::Duration;

use crate::config::{Instrument, Interval, SessionConfig};
use crate::errors::Error;
use crate::feed::DEFAULT_STREAM_URL;
use crate::scan::ScanGate;
use crate::services::BOOTSTRAP_BARS;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Instrument id from the catalog, e.g. "BTC/USDT"
    pub instrument: String,

    #[arg(short, long, default_value = "1m", value_parser = parse_interval)]
    pub interval: Interval,

    #[arg(long, default_value_t = BOOTSTRAP_BARS)]
    pub bootstrap_bars: usize,

    #[arg(long, default_value_t = 2_000)]
    pub scan_min_ms: u64,

    #[arg(long, default_value_t = 6_000)]
    pub scan_max_ms: u64,

    /// Websocket base url of the kline feed
    #[arg(long, default_value = DEFAULT_STREAM_URL)]
    pub url: String,

    /// Simulated ticks to generate (offline mode)
    #[arg(long, default_value_t = 600)]
    pub ticks: usize,

    #[arg(long, default_value_t = 100.0)]
    pub start_price: f64,

    /// Milliseconds between simulated ticks
    #[arg(long, default_value_t = 500)]
    pub tick_ms: i64,

    #[arg(long, default_value_t = 0.0005)]
    pub volatility: f64,
}

impl Args {
    pub fn session_config(&self) -> Result<SessionConfig, Error> {
        let instrument = Instrument::lookup(&self.instrument)?;
        Ok(SessionConfig::new(instrument, self.interval).with_bootstrap_bars(self.bootstrap_bars))
    }

    pub fn scan_gate(&self) -> ScanGate {
        ScanGate::new(
            Duration::from_millis(self.scan_min_ms),
            Duration::from_millis(self.scan_max_ms),
        )
    }
}

pub fn parse_interval(s: &str) -> Result<Interval, String> {
    s.parse::<Interval>().map_err(|e| e.to_string())
}
