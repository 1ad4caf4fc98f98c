pub mod cli;
pub mod config;
pub mod errors;
pub mod feed;
pub mod indicators;
pub mod models;
pub mod scan;
pub mod services;
pub mod session;
pub mod signal;
pub mod smoothing;

pub use config::{Instrument, Interval, SessionConfig};
pub use errors::{Error, IndicatorError, Result};
pub use models::{AnalysisResult, Candle, SmoothedCandle};
pub use session::SignalSession;
pub use signal::SignalEngine;
