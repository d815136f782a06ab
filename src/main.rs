//! Console demo for vocamap
//!
//! Runs the full voice-control stack against a logging map surface, with
//! stdin standing in for the recognition engine: each typed line is one
//! recognized utterance. Lines starting with ':' take the text-entry path,
//! which always drops a marker at the destination.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use vocamap::config;
use vocamap::feedback::TracingFeedback;
use vocamap::geocode::NominatimClient;
use vocamap::listening::{ChannelSource, RecognitionEvent, VoiceSession};
use vocamap::map::{LogSurface, MapController};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cfg = config::get_config();
    tracing::info!(
        "Starting vocamap (recognition language: {})",
        cfg.recognition.language
    );

    let geocoder = NominatimClient::with_config(
        &cfg.geocoder.base_url,
        cfg.geocoder.timeout_secs,
        &cfg.geocoder.user_agent,
    );
    let controller = MapController::new(
        Arc::new(LogSurface::new()),
        Arc::new(geocoder),
        (cfg.map.initial_lat, cfg.map.initial_lon),
        cfg.map.initial_zoom,
    );
    let session = Arc::new(VoiceSession::new(controller, Arc::new(TracingFeedback)));

    // stdin stands in for the recognition engine: one line, one utterance,
    // then the engine "ends" and the session restarts it
    let (tx, rx) = mpsc::channel(16);
    let reader_session = Arc::clone(&session);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim().to_string();
            if let Some(destination) = line.strip_prefix(':') {
                // typed search path, bypasses the grammar
                reader_session.submit_destination(destination);
            } else if !line.is_empty() {
                if tx
                    .send(RecognitionEvent::Transcript(line.to_lowercase()))
                    .await
                    .is_err()
                {
                    break;
                }
                if tx.send(RecognitionEvent::Ended).await.is_err() {
                    break;
                }
            }
        }
        // dropping tx closes the channel and ends the session loop
    });

    println!("Commands: 'go to <place>', 'navigate to <place>', 'zoom in', 'zoom out',");
    println!("'satellite/terrain/dark/night/osm/default view', 'add marker'.");
    println!("Prefix a line with ':' to search like the text box (always marks). Ctrl-D quits.");

    session.run(ChannelSource::new(rx)).await?;
    Ok(())
}
