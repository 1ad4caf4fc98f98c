use log::debug;
use serde::Deserialize;

/// A price observation extracted from a kline feed message.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedTick {
    pub stream: String,
    pub time_ms: i64,
    pub price: f64,
}

impl FeedTick {
    pub fn time_secs(&self) -> i64 {
        self.time_ms.div_euclid(1000)
    }
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum Envelope {
    Combined { stream: String, data: KlineEvent },
    Raw(KlineEvent),
}

#[derive(Deserialize, Debug)]
struct KlineEvent {
    #[serde(rename = "e")]
    event_type: String,
    #[serde(rename = "E")]
    event_time: i64,
    #[serde(rename = "s")]
    symbol: String,
    #[serde(rename = "k")]
    kline: KlinePayload,
}

#[derive(Deserialize, Debug)]
struct KlinePayload {
    #[serde(rename = "c")]
    close: PriceField,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum PriceField {
    Text(String),
    Number(f64),
}

impl PriceField {
    fn value(&self) -> Option<f64> {
        match self {
            PriceField::Text(s) => s.parse().ok(),
            PriceField::Number(n) => Some(*n),
        }
    }
}

/// Extracts a tick from a kline message, raw or wrapped in a combined-stream
/// envelope. Anything else yields `None`.
pub fn parse_message(text: &str) -> Option<FeedTick> {
    let envelope: Envelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            debug!("Ignoring non-kline message: {}", e);
            return None;
        }
    };

    let (stream, event) = match envelope {
        Envelope::Combined { stream, data } => {
            let key = stream.split('@').next().unwrap_or_default().to_string();
            (key, data)
        }
        Envelope::Raw(event) => (event.symbol.to_lowercase(), event),
    };

    if event.event_type != "kline" {
        debug!("Ignoring {} event on {}", event.event_type, stream);
        return None;
    }

    let price = event.kline.close.value().filter(|p| p.is_finite())?;

    Some(FeedTick {
        stream,
        time_ms: event.event_time,
        price,
    })
}
