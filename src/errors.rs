use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),
    #[error("Unsupported interval: {0}. Use one of 5s, 15s, 30s, 1m, 2m")]
    UnsupportedInterval(String),
    #[error("Websocket error: {0}")]
    Websocket(String),
    #[error("Simulation error: {0}")]
    Simulation(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("{indicator}: invalid argument {name} = {value}")]
    InvalidArgument {
        indicator: &'static str,
        name: &'static str,
        value: String,
    },
}

impl IndicatorError {
    pub(crate) fn zero_period(indicator: &'static str) -> Self {
        IndicatorError::InvalidArgument {
            indicator,
            name: "period",
            value: "0".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
