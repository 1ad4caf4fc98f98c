use std::collections::VecDeque;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::candle::{Candle, WINDOW_CAPACITY};

/// Number of synthetic bars fabricated on the first tick of a session.
pub const BOOTSTRAP_BARS: usize = 60;

/// Fraction of the first price used as per-bar volatility for bootstrap bars.
const BOOTSTRAP_VOLATILITY: f64 = 0.0005;

#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// Candle committed to the window by this tick, if a bucket boundary was crossed.
    pub finalized: Option<Candle>,
    /// Committed window followed by the in-progress candle.
    pub snapshot: Vec<Candle>,
}

pub struct CandleAggregator<R: Rng = StdRng> {
    interval_secs: i64,
    bootstrap_bars: usize,
    window: VecDeque<Candle>,
    current: Option<Candle>,
    bucket: Option<i64>,
    rng: R,
}

impl CandleAggregator<StdRng> {
    pub fn new(interval_secs: u64, bootstrap_bars: usize) -> Self {
        Self::with_rng(interval_secs, bootstrap_bars, StdRng::from_os_rng())
    }
}

impl<R: Rng> CandleAggregator<R> {
    pub fn with_rng(interval_secs: u64, bootstrap_bars: usize, rng: R) -> Self {
        Self {
            interval_secs: i64::try_from(interval_secs.max(1)).unwrap_or(i64::MAX),
            bootstrap_bars,
            window: VecDeque::with_capacity(WINDOW_CAPACITY + 1),
            current: None,
            bucket: None,
            rng,
        }
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs as u64
    }

    pub fn bucket_of(&self, time: i64) -> i64 {
        time.div_euclid(self.interval_secs)
    }

    /// Feeds one tick. Returns `None` when the tick is rejected as stale or
    /// carries an unusable price.
    pub fn on_tick(&mut self, time: i64, price: f64) -> Option<TickOutcome> {
        if !price.is_finite() || price <= 0.0 {
            debug!("Dropping tick at {} with unusable price {}", time, price);
            return None;
        }

        let bucket = self.bucket_of(time);
        let mut finalized = None;

        match self.bucket {
            None => {
                self.bootstrap(bucket, price);
                self.open(bucket, time, price);
            }
            Some(open_bucket) if bucket < open_bucket => {
                debug!(
                    "Dropping stale tick at {} (bucket {} < open bucket {})",
                    time, bucket, open_bucket
                );
                return None;
            }
            Some(open_bucket) if bucket == open_bucket => {
                if let Some(candle) = self.current.as_mut() {
                    candle.update(price);
                }
            }
            Some(_) => {
                if let Some(candle) = self.current.take() {
                    self.commit(candle);
                    finalized = Some(candle);
                }
                self.open(bucket, time, price);
            }
        }

        Some(TickOutcome {
            finalized,
            snapshot: self.snapshot(),
        })
    }

    /// Committed candles, oldest first.
    pub fn window(&self) -> Vec<Candle> {
        self.window.iter().copied().collect()
    }

    pub fn current(&self) -> Option<&Candle> {
        self.current.as_ref()
    }

    pub fn snapshot(&self) -> Vec<Candle> {
        self.window.iter().chain(self.current.iter()).copied().collect()
    }

    /// Discards the window, the in-progress candle and the bucket index.
    pub fn reset(&mut self) {
        self.window.clear();
        self.current = None;
        self.bucket = None;
    }

    fn open(&mut self, bucket: i64, time: i64, price: f64) {
        self.bucket = Some(bucket);
        self.current = Some(Candle::from_price(time, price));
    }

    fn commit(&mut self, candle: Candle) {
        self.window.push_back(candle);
        while self.window.len() > WINDOW_CAPACITY {
            self.window.pop_front();
        }
    }

    fn bootstrap(&mut self, bucket: i64, price: f64) {
        if self.bootstrap_bars == 0 {
            return;
        }

        let volatility = price * BOOTSTRAP_VOLATILITY;
        let mut last_close = price;

        for i in (1..=self.bootstrap_bars as i64).rev() {
            let open = last_close;
            let close = open + (self.rng.random::<f64>() - 0.5) * volatility;
            let high = open.max(close) + self.rng.random::<f64>() * volatility * 0.5;
            let low = open.min(close) - self.rng.random::<f64>() * volatility * 0.5;

            last_close = close;

            // bars that fall off the representable time range are skipped
            let Some(time) = bucket
                .checked_sub(i)
                .and_then(|b| b.checked_mul(self.interval_secs))
            else {
                continue;
            };
            self.commit(Candle::synthetic(time, open, high, low, close));
        }

        info!(
            "Bootstrapped {} synthetic candles ({}s interval) around price {}",
            self.bootstrap_bars, self.interval_secs, price
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(interval_secs: u64, bootstrap_bars: usize) -> CandleAggregator {
        CandleAggregator::with_rng(interval_secs, bootstrap_bars, StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_ticks_within_bucket_update_live_candle() {
        let mut agg = seeded(10, 0);
        let t = 1_000;

        let first = agg.on_tick(t, 100.0).unwrap();
        assert!(first.finalized.is_none());
        assert_eq!(first.snapshot, vec![Candle::from_price(t, 100.0)]);

        let second = agg.on_tick(t + 5, 101.0).unwrap();
        assert!(second.finalized.is_none());
        let live = agg.current().unwrap();
        assert_eq!(live.time, t);
        assert_eq!(live.open, 100.0);
        assert_eq!(live.high, 101.0);
        assert_eq!(live.low, 100.0);
        assert_eq!(live.close, 101.0);
        assert!(agg.window().is_empty());

        let third = agg.on_tick(t + 11, 99.0).unwrap();
        let finalized = third.finalized.unwrap();
        assert_eq!(finalized, Candle::new(t, 100.0, 101.0, 100.0, 101.0));
        assert_eq!(agg.window(), vec![finalized]);
        assert_eq!(agg.current(), Some(&Candle::from_price(t + 11, 99.0)));
        assert_eq!(third.snapshot.len(), 2);
    }

    #[test]
    fn test_snapshot_does_not_commit_live_candle() {
        let mut agg = seeded(5, 0);
        agg.on_tick(0, 1.0);
        agg.on_tick(1, 2.0);

        assert_eq!(agg.snapshot().len(), 1);
        assert!(agg.window().is_empty());
    }

    #[test]
    fn test_bootstrap_history() {
        let mut agg = seeded(60, BOOTSTRAP_BARS);
        let t = 1_700_000_030;
        let outcome = agg.on_tick(t, 250.0).unwrap();

        let window = agg.window();
        assert_eq!(window.len(), BOOTSTRAP_BARS);
        assert!(window.iter().all(|c| c.synthetic));
        assert!(window.windows(2).all(|w| w[0].time < w[1].time));
        assert_eq!(window.last().unwrap().time, (t / 60 - 1) * 60);
        assert!(window.last().unwrap().time < t);
        for candle in &window {
            assert!(candle.high >= candle.open.max(candle.close));
            assert!(candle.low <= candle.open.min(candle.close));
            assert!((candle.close - 250.0).abs() < 250.0 * 0.0005 * BOOTSTRAP_BARS as f64);
        }

        assert_eq!(outcome.snapshot.len(), BOOTSTRAP_BARS + 1);
        assert!(!outcome.snapshot.last().unwrap().synthetic);
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut agg = seeded(1, BOOTSTRAP_BARS);
        for i in 0..80 {
            agg.on_tick(i, 10.0 + i as f64);
        }

        let window = agg.window();
        assert_eq!(window.len(), WINDOW_CAPACITY);
        // 60 synthetic + 79 finalized, oldest 39 evicted
        assert_eq!(window.iter().filter(|c| c.synthetic).count(), 21);
        assert_eq!(window.last().unwrap().time, 78);
        assert!(window.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[test]
    fn test_stale_and_invalid_ticks_dropped() {
        let mut agg = seeded(10, 0);
        agg.on_tick(100, 5.0);
        agg.on_tick(110, 6.0);

        assert!(agg.on_tick(95, 7.0).is_none());
        assert!(agg.on_tick(111, f64::NAN).is_none());
        assert!(agg.on_tick(111, 0.0).is_none());
        assert_eq!(agg.current(), Some(&Candle::from_price(110, 6.0)));
        assert_eq!(agg.window().len(), 1);
    }

    #[test]
    fn test_gap_finalizes_single_candle() {
        let mut agg = seeded(10, 0);
        agg.on_tick(0, 1.0);
        let outcome = agg.on_tick(95, 2.0).unwrap();

        assert_eq!(outcome.finalized, Some(Candle::from_price(0, 1.0)));
        assert_eq!(agg.window().len(), 1);
    }

    #[test]
    fn test_negative_times_use_floor_buckets() {
        let agg = seeded(10, 0);
        assert_eq!(agg.bucket_of(-1), -1);
        assert_eq!(agg.bucket_of(-10), -1);
        assert_eq!(agg.bucket_of(9), 0);
    }

    #[test]
    fn test_oversized_interval_does_not_wrap() {
        let mut agg = seeded(u64::MAX, 0);
        assert_eq!(agg.interval_secs(), i64::MAX as u64);
        assert_eq!(agg.bucket_of(1_700_000_000), 0);
        assert_eq!(agg.bucket_of(-1), -1);

        agg.on_tick(0, 1.0);
        assert!(agg.on_tick(1_700_000_000, 2.0).unwrap().finalized.is_none());
    }

    #[test]
    fn test_bootstrap_near_time_floor_skips_unrepresentable_bars() {
        let mut agg = seeded(10, 5);
        let t = i64::MIN + 30;
        let outcome = agg.on_tick(t, 50.0).unwrap();

        // only the two buckets nearest the first tick are representable
        let window = agg.window();
        assert_eq!(window.len(), 2);
        assert!(window.windows(2).all(|w| w[0].time < w[1].time));
        assert!(window.iter().all(|c| c.synthetic && c.time < t));
        assert_eq!(outcome.snapshot.last(), Some(&Candle::from_price(t, 50.0)));

        // far enough from the floor every bar fits
        let mut agg = seeded(10, 5);
        agg.on_tick(i64::MIN + 1_000, 50.0);
        assert_eq!(agg.window().len(), 5);
    }

    #[test]
    fn test_reset_restarts_bootstrap() {
        let mut agg = seeded(5, 10);
        agg.on_tick(0, 1.0);
        agg.on_tick(5, 1.1);
        assert_eq!(agg.window().len(), 11);

        agg.reset();
        assert!(agg.window().is_empty());
        assert!(agg.current().is_none());

        // an earlier time is accepted after reset: no bucket is open
        let outcome = agg.on_tick(3, 2.0).unwrap();
        assert!(outcome.finalized.is_none());
        assert_eq!(agg.window().len(), 10);
        assert!(agg.window().iter().all(|c| c.synthetic));
    }
}
