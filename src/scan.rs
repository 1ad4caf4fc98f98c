//! Consumer-side gate around accepting a result from a session.
//!
//! The engine never reports a waiting state; `ScanState::Waiting` exists only
//! here, while the host is still polling.

use std::time::Duration;

use crate::models::AnalysisResult;

pub const DEFAULT_MIN_DURATION: Duration = Duration::from_millis(2_000);
pub const DEFAULT_MAX_TIMEOUT: Duration = Duration::from_millis(6_000);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq)]
pub enum ScanState {
    Waiting,
    Accepted(AnalysisResult),
    /// Safety timeout hit; carries whatever result existed, or the fallback.
    TimedOut(AnalysisResult),
}

impl ScanState {
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            ScanState::Waiting => None,
            ScanState::Accepted(result) | ScanState::TimedOut(result) => Some(result),
        }
    }

    pub fn is_done(&self) -> bool {
        !matches!(self, ScanState::Waiting)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScanGate {
    min_duration: Duration,
    max_timeout: Duration,
}

impl Default for ScanGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DURATION, DEFAULT_MAX_TIMEOUT)
    }
}

impl ScanGate {
    pub fn new(min_duration: Duration, max_timeout: Duration) -> Self {
        Self {
            min_duration,
            max_timeout: max_timeout.max(min_duration),
        }
    }

    pub fn min_duration(&self) -> Duration {
        self.min_duration
    }

    pub fn max_timeout(&self) -> Duration {
        self.max_timeout
    }

    pub fn poll(&self, elapsed: Duration, latest: Option<&AnalysisResult>) -> ScanState {
        match latest {
            Some(result) if elapsed >= self.min_duration => ScanState::Accepted(*result),
            _ if elapsed >= self.max_timeout => {
                ScanState::TimedOut(latest.copied().unwrap_or_else(AnalysisResult::cold_start))
            }
            _ => ScanState::Waiting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Signal;

    fn result() -> AnalysisResult {
        AnalysisResult {
            signal: Signal::Put,
            confidence: 70,
            ..AnalysisResult::cold_start()
        }
    }

    #[test]
    fn test_waits_for_min_duration() {
        let gate = ScanGate::new(Duration::from_secs(2), Duration::from_secs(6));
        let latest = result();

        assert_eq!(gate.poll(Duration::from_millis(500), Some(&latest)), ScanState::Waiting);
        assert_eq!(
            gate.poll(Duration::from_secs(2), Some(&latest)),
            ScanState::Accepted(latest)
        );
    }

    #[test]
    fn test_waits_for_result() {
        let gate = ScanGate::default();
        assert_eq!(gate.poll(Duration::from_secs(3), None), ScanState::Waiting);
        assert!(!gate.poll(Duration::from_secs(3), None).is_done());
    }

    #[test]
    fn test_timeout_falls_back() {
        let gate = ScanGate::new(Duration::from_secs(2), Duration::from_secs(6));
        let state = gate.poll(Duration::from_secs(6), None);

        assert_eq!(state, ScanState::TimedOut(AnalysisResult::cold_start()));
        assert_eq!(state.result().unwrap().signal, Signal::Call);
    }

    #[test]
    fn test_timeout_never_shorter_than_min() {
        let gate = ScanGate::new(Duration::from_secs(5), Duration::from_secs(1));
        assert_eq!(gate.max_timeout(), Duration::from_secs(5));
        assert_eq!(gate.poll(Duration::from_secs(2), None), ScanState::Waiting);
    }
}
