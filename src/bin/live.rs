use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use log::{error, info, warn};
use tickscope::{
    cli::Args,
    errors::Error,
    feed::stream_url,
    scan::{ScanGate, DEFAULT_POLL_INTERVAL},
    SignalSession,
};
use tokio::sync::Mutex;
use tokio::time::{interval, sleep, Instant};
use tokio_tungstenite::{connect_async, tungstenite::Message};

const RECONNECT_DELAY: Duration = Duration::from_secs(3);

async fn run_feed(url: String, session: Arc<Mutex<SignalSession>>) {
    loop {
        if let Err(e) = stream_once(&url, &session).await {
            warn!("Feed error: {}. Reconnecting in {:?}", e, RECONNECT_DELAY);
        }
        session.lock().await.set_connected(false);
        sleep(RECONNECT_DELAY).await;
    }
}

async fn stream_once(url: &str, session: &Arc<Mutex<SignalSession>>) -> Result<(), Error> {
    let (ws_stream, _) = connect_async(url)
        .await
        .map_err(|e| Error::Websocket(e.to_string()))?;
    info!("Connected to {}", url);
    session.lock().await.set_connected(true);

    let (mut write, mut read) = ws_stream.split();
    while let Some(message) = read.next().await {
        match message.map_err(|e| Error::Websocket(e.to_string()))? {
            Message::Text(text) => {
                session.lock().await.on_message(text.as_str());
            }
            Message::Ping(payload) => {
                write
                    .send(Message::Pong(payload))
                    .await
                    .map_err(|e| Error::Websocket(e.to_string()))?;
            }
            Message::Close(frame) => {
                warn!("Feed closed: {:?}", frame);
                break;
            }
            _ => {}
        }
    }
    Ok(())
}

async fn run_scans(gate: ScanGate, session: Arc<Mutex<SignalSession>>) {
    let mut ticker = interval(DEFAULT_POLL_INTERVAL);
    let mut started = Instant::now();

    loop {
        ticker.tick().await;
        let session = session.lock().await;
        let state = gate.poll(started.elapsed(), session.latest_result());
        if let Some(result) = state.result() {
            match serde_json::to_string(result) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("Failed to encode result: {}", e),
            }
            if !session.is_connected() {
                warn!("[{}] Result produced while feed is down", session.config().instrument());
            }
            started = Instant::now();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.session_config()?;
    let url = stream_url(&args.url, config.instrument().stream());
    let session = Arc::new(Mutex::new(SignalSession::new(config)));

    let feed = tokio::spawn(run_feed(url, session.clone()));
    let scans = tokio::spawn(run_scans(args.scan_gate(), session.clone()));

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    feed.abort();
    scans.abort();
    session.lock().await.reset();
    Ok(())
}
