use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::SessionConfig;
use crate::feed::{parse_message, FeedTick};
use crate::models::{AnalysisResult, Candle};
use crate::services::CandleAggregator;
use crate::signal::SignalEngine;

/// One aggregator paired with the signal engine, plus the latest result.
///
/// All mutation happens through `&mut self`; hosts that share a session across
/// tasks wrap it in a single mutex so a tick and its evaluation are atomic.
pub struct SignalSession<R: Rng = StdRng> {
    config: SessionConfig,
    aggregator: CandleAggregator<R>,
    engine: SignalEngine,
    latest: Option<AnalysisResult>,
    connected: bool,
    evaluations: u64,
}

impl SignalSession<StdRng> {
    pub fn new(config: SessionConfig) -> Self {
        let aggregator = CandleAggregator::new(config.interval().secs(), config.bootstrap_bars());
        Self::with_aggregator(config, aggregator)
    }

    /// Tears down all candle state and starts over with a new configuration.
    pub fn reconfigure(&mut self, config: SessionConfig) {
        info!(
            "[{}] Switching to {} @ {}",
            self.config.instrument(),
            config.instrument(),
            config.interval()
        );
        self.aggregator = CandleAggregator::new(config.interval().secs(), config.bootstrap_bars());
        self.config = config;
        self.latest = None;
    }
}

impl<R: Rng> SignalSession<R> {
    pub fn with_aggregator(config: SessionConfig, aggregator: CandleAggregator<R>) -> Self {
        info!(
            "[{}] Initializing session: stream {}, interval {}, {} bootstrap bars",
            config.instrument(),
            config.instrument().stream(),
            config.interval(),
            config.bootstrap_bars()
        );

        Self {
            config,
            aggregator,
            engine: SignalEngine::new(),
            latest: None,
            connected: false,
            evaluations: 0,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Latest computed result, or `None` before the first evaluation.
    pub fn latest_result(&self) -> Option<&AnalysisResult> {
        self.latest.as_ref()
    }

    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Committed candles, oldest first.
    pub fn window(&self) -> Vec<Candle> {
        self.aggregator.window()
    }

    pub fn set_connected(&mut self, connected: bool) {
        if self.connected != connected {
            info!(
                "[{}] Feed {}",
                self.config.instrument(),
                if connected { "connected" } else { "disconnected" }
            );
        }
        self.connected = connected;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Feeds one tick and re-evaluates. Returns the candle finalized by this
    /// tick, if any.
    pub fn on_tick(&mut self, time_secs: i64, price: f64) -> Option<Candle> {
        let outcome = self.aggregator.on_tick(time_secs, price)?;

        if let Some(candle) = outcome.finalized {
            let committed = self.engine.analyze(&self.aggregator.window());
            info!(
                "[{}] Candle closed at {} (o {} h {} l {} c {}): {}",
                self.config.instrument(),
                candle.time,
                candle.open,
                candle.high,
                candle.low,
                candle.close,
                committed
            );
            self.publish(committed);
        }

        let live = self.engine.analyze(&outcome.snapshot);
        debug!("[{}] Live analysis: {}", self.config.instrument(), live);
        self.publish(live);

        outcome.finalized
    }

    /// Routes a parsed feed tick. Ticks from any stream other than the
    /// configured one are dropped.
    pub fn on_feed_tick(&mut self, tick: &FeedTick) -> Option<Candle> {
        if tick.stream != self.config.instrument().stream() {
            debug!(
                "[{}] Ignoring tick from stream {}",
                self.config.instrument(),
                tick.stream
            );
            return None;
        }
        self.on_tick(tick.time_secs(), tick.price)
    }

    /// Parses and routes a raw feed message.
    pub fn on_message(&mut self, text: &str) -> Option<Candle> {
        let tick = parse_message(text)?;
        self.on_feed_tick(&tick)
    }

    /// Discards the window, the in-progress candle and the latest result.
    pub fn reset(&mut self) {
        info!("[{}] Resetting session state", self.config.instrument());
        self.aggregator.reset();
        self.latest = None;
    }

    fn publish(&mut self, result: AnalysisResult) {
        self.evaluations += 1;
        self.latest = Some(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Instrument, Interval};
    use crate::models::Signal;
    use rand::SeedableRng;

    fn session(bootstrap_bars: usize) -> SignalSession {
        let config = SessionConfig::new(Instrument::lookup("EUR/USD").unwrap(), Interval::S5)
            .with_bootstrap_bars(bootstrap_bars);
        let aggregator =
            CandleAggregator::with_rng(5, bootstrap_bars, StdRng::seed_from_u64(3));
        SignalSession::with_aggregator(config, aggregator)
    }

    #[test]
    fn test_no_result_before_first_tick() {
        let session = session(60);
        assert!(session.latest_result().is_none());
        assert!(!session.is_connected());
    }

    #[test]
    fn test_first_tick_evaluates_bootstrap_window() {
        let mut session = session(60);
        assert!(session.on_tick(1_000, 1.08).is_none());

        assert_eq!(session.evaluations(), 1);
        let result = session.latest_result().unwrap();
        assert!(result.ema20 > 0.0);
        assert!(result.confidence <= 99);
    }

    #[test]
    fn test_first_tick_without_bootstrap_is_cold_start() {
        let mut session = session(0);
        session.on_tick(1_000, 1.08);
        assert_eq!(session.latest_result(), Some(&AnalysisResult::cold_start()));
    }

    #[test]
    fn test_boundary_runs_committed_and_live_evaluations() {
        let mut session = session(0);
        session.on_tick(1_000, 1.0);
        session.on_tick(1_002, 1.1);
        assert_eq!(session.evaluations(), 2);

        let finalized = session.on_tick(1_006, 1.2).unwrap();
        assert_eq!(finalized.high, 1.1);
        assert_eq!(session.evaluations(), 4);
        assert_eq!(session.window(), vec![finalized]);
        assert_eq!(session.latest_result().unwrap().signal, Signal::Call);
    }

    #[test]
    fn test_foreign_stream_ignored() {
        let mut session = session(0);
        let foreign = FeedTick {
            stream: "btcusdt".to_string(),
            time_ms: 1_000_000,
            price: 40_000.0,
        };
        assert!(session.on_feed_tick(&foreign).is_none());
        assert!(session.latest_result().is_none());

        let own = FeedTick {
            stream: "eurusdt".to_string(),
            ..foreign
        };
        session.on_feed_tick(&own);
        assert!(session.latest_result().is_some());
    }

    #[test]
    fn test_on_message_routes_klines() {
        let mut session = session(0);
        assert!(session.on_message(r#"{"result":null,"id":7}"#).is_none());
        assert!(session.latest_result().is_none());

        session.on_message(r#"{"e":"kline","E":1000000,"s":"EURUSDT","k":{"c":"1.0801"}}"#);
        assert!(session.latest_result().is_some());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = session(20);
        session.on_tick(100, 2.0);
        session.on_tick(106, 2.1);
        session.set_connected(true);

        session.reset();
        assert!(session.latest_result().is_none());
        assert!(session.window().is_empty());
        assert!(session.is_connected());
    }

    #[test]
    fn test_reconfigure_switches_instrument() {
        let mut session = session(0);
        session.on_tick(100, 2.0);
        session.on_tick(106, 2.1);

        let config = SessionConfig::new(Instrument::lookup("GOLD").unwrap(), Interval::M1)
            .with_bootstrap_bars(0);
        session.reconfigure(config);

        assert!(session.latest_result().is_none());
        assert!(session.window().is_empty());
        assert_eq!(session.config().instrument().stream(), "paxgusdt");

        let stale = FeedTick {
            stream: "eurusdt".to_string(),
            time_ms: 200_000,
            price: 2.2,
        };
        assert!(session.on_feed_tick(&stale).is_none());
        assert!(session.latest_result().is_none());
    }
}
