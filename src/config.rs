use std::fmt;
use std::str::FromStr;

use crate::errors::Error;
use crate::services::BOOTSTRAP_BARS;

/// Tradable instruments and the feed stream each one reads from.
///
/// Stream keys are opaque: several instruments are served from another
/// market's feed.
const CATALOG: &[(&str, &str)] = &[
    ("BTC/USDT", "btcusdt"),
    ("ETH/USDT", "ethusdt"),
    ("SOL/USDT", "solusdt"),
    ("BNB/USDT", "bnbusdt"),
    ("XRP/USDT", "xrpusdt"),
    ("DOGE/USDT", "dogeusdt"),
    ("EUR/USD", "eurusdt"),
    ("GBP/USD", "btcusdt"),
    ("AUD/USD", "ethusdt"),
    ("GOLD", "paxgusdt"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    id: String,
    stream: String,
}

impl Instrument {
    pub fn lookup(id: &str) -> Result<Self, Error> {
        CATALOG
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(id))
            .map(|(name, stream)| Self {
                id: name.to_string(),
                stream: stream.to_string(),
            })
            .ok_or_else(|| Error::UnknownInstrument(id.to_string()))
    }

    pub fn all() -> Vec<Self> {
        CATALOG
            .iter()
            .map(|(name, stream)| Self {
                id: name.to_string(),
                stream: stream.to_string(),
            })
            .collect()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn stream(&self) -> &str {
        &self.stream
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    S5,
    S15,
    S30,
    M1,
    M2,
}

impl Interval {
    pub const ALL: [Interval; 5] = [
        Interval::S5,
        Interval::S15,
        Interval::S30,
        Interval::M1,
        Interval::M2,
    ];

    pub fn secs(&self) -> u64 {
        match self {
            Interval::S5 => 5,
            Interval::S15 => 15,
            Interval::S30 => 30,
            Interval::M1 => 60,
            Interval::M2 => 120,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Interval::S5 => "5s",
            Interval::S15 => "15s",
            Interval::S30 => "30s",
            Interval::M1 => "1m",
            Interval::M2 => "2m",
        }
    }
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::ALL
            .into_iter()
            .find(|interval| interval.label() == s.trim())
            .ok_or_else(|| Error::UnsupportedInterval(s.to_string()))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    instrument: Instrument,
    interval: Interval,
    bootstrap_bars: usize,
}

impl SessionConfig {
    pub fn new(instrument: Instrument, interval: Interval) -> Self {
        Self {
            instrument,
            interval,
            bootstrap_bars: BOOTSTRAP_BARS,
        }
    }

    pub fn with_bootstrap_bars(mut self, bootstrap_bars: usize) -> Self {
        self.bootstrap_bars = bootstrap_bars;
        self
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn bootstrap_bars(&self) -> usize {
        self.bootstrap_bars
    }
}
