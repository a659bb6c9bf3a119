//! The run loop: a sequential input path and a concurrent dispatch path.

use std::sync::Arc;

use tracing::{error, info};

use crate::dispatch::Dispatcher;
use crate::engine::{MorseEngine, ServiceHooks};
use crate::keys::KeyEvent;
use crate::speech::SpeechFeedback;

/// Drains key events one at a time, in arrival order, and never blocks the
/// input path on network work: each commit runs as an independent spawned
/// task. Overlapping commits race, and the last reply to arrive wins the
/// audio flush.
pub async fn run(
    mut engine: MorseEngine,
    dispatcher: Dispatcher,
    speech: Arc<dyn SpeechFeedback>,
    key_rx: flume::Receiver<KeyEvent>,
    shutdown_rx: flume::Receiver<()>,
) -> anyhow::Result<()> {
    engine.on_start();
    info!(endpoint = %dispatcher.endpoint(), "service running");

    loop {
        tokio::select! {
            event = key_rx.recv_async() => {
                // A closed channel means the input source is gone.
                let Ok(event) = event else { break };
                let outcome = engine.on_key_event(event);
                if let Some(text) = outcome.commit {
                    spawn_dispatch(dispatcher.clone(), Arc::clone(&speech), text);
                }
            }
            _ = shutdown_rx.recv_async() => {
                info!("shutting down");
                break;
            }
        }
    }

    engine.on_stop();
    Ok(())
}

/// Fire-and-forget relative to the input path: nothing waits on, tracks, or
/// cancels the exchange. The payload is a snapshot taken at commit time, so
/// the sentence buffer is free to be reused immediately.
pub fn spawn_dispatch(dispatcher: Dispatcher, speech: Arc<dyn SpeechFeedback>, text: String) {
    tokio::spawn(async move {
        match dispatcher.dispatch(&text).await {
            Ok(reply) => {
                if speech.is_ready() {
                    speech.speak(&reply);
                }
            }
            // Failures never reach the input path; they end here.
            Err(e) => error!(error = %e, "dispatch failed"),
        }
    });
}
