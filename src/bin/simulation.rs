use std::io::{self, Write};
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use log::info;
use tickscope::{cli::Args, feed::TickSimulator, scan::ScanState, SignalSession};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.session_config()?;
    let gate = args.scan_gate();

    let mut simulator = TickSimulator::new(
        config.instrument().stream(),
        args.start_price,
        Utc::now().timestamp_millis(),
        args.tick_ms,
        args.volatility,
    )?;
    let mut session = SignalSession::new(config);
    session.set_connected(true);

    let step = Duration::from_millis(args.tick_ms.max(1) as u64);
    let mut elapsed = Duration::ZERO;
    let mut scans = 0usize;

    for _ in 0..args.ticks {
        let tick = simulator.next_tick();
        session.on_feed_tick(&tick);
        elapsed += step;

        let state = gate.poll(elapsed, session.latest_result());
        if let Some(result) = state.result() {
            scans += 1;
            let kind = match &state {
                ScanState::TimedOut(_) => "timeout",
                _ => "accepted",
            };
            println!(
                "[{}] scan #{} ({}, {:.1}s) price {:.5}: {}",
                session.config().instrument(),
                scans,
                kind,
                elapsed.as_secs_f64(),
                tick.price,
                result
            );
            io::stdout().flush()?;
            elapsed = Duration::ZERO;
        }
    }

    info!(
        "[{}] Simulation done: {} ticks, {} evaluations, {} committed candles",
        session.config().instrument(),
        args.ticks,
        session.evaluations(),
        session.window().len()
    );
    Ok(())
}
