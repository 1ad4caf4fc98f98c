use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use super::FeedTick;
use crate::errors::Error;

/// Gaussian random-walk tick source for offline runs.
pub struct TickSimulator<R: Rng = StdRng> {
    stream: String,
    current_price: f64,
    time_ms: i64,
    step_ms: i64,
    normal_dist: Normal<f64>,
    rng: R,
}

impl TickSimulator<StdRng> {
    pub fn new(
        stream: &str,
        initial_price: f64,
        start_ms: i64,
        step_ms: i64,
        volatility: f64,
    ) -> Result<Self, Error> {
        Self::with_rng(
            stream,
            initial_price,
            start_ms,
            step_ms,
            volatility,
            StdRng::from_os_rng(),
        )
    }
}

impl<R: Rng> TickSimulator<R> {
    pub fn with_rng(
        stream: &str,
        initial_price: f64,
        start_ms: i64,
        step_ms: i64,
        volatility: f64,
        rng: R,
    ) -> Result<Self, Error> {
        let normal_dist = Normal::new(0.0, volatility)
            .map_err(|e| Error::Simulation(format!("volatility {}: {}", volatility, e)))?;

        Ok(Self {
            stream: stream.to_string(),
            current_price: initial_price,
            time_ms: start_ms,
            step_ms: step_ms.max(1),
            normal_dist,
            rng,
        })
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn next_tick(&mut self) -> FeedTick {
        let change = self.normal_dist.sample(&mut self.rng);
        self.current_price *= 1.0 + change;
        self.time_ms += self.step_ms;

        FeedTick {
            stream: self.stream.clone(),
            time_ms: self.time_ms,
            price: self.current_price,
        }
    }
}

impl<R: Rng> Iterator for TickSimulator<R> {
    type Item = FeedTick;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_tick())
    }
}
