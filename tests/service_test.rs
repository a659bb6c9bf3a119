//! End-to-end: key events through the engine, out over TCP, back to speech.

use std::sync::Arc;
use std::time::Duration;

use pocketmorse::dispatch::Dispatcher;
use pocketmorse::engine::MorseEngine;
use pocketmorse::keys::{KEY_VOLUME_DOWN, KEY_VOLUME_UP, KeyAction, KeyEvent, KeyMap};
use pocketmorse::speech::SpeechFeedback;
use pocketmorse::service;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Records every utterance on a channel so tests can await it.
struct ChannelSpeech {
    tx: flume::Sender<String>,
}

impl SpeechFeedback for ChannelSpeech {
    fn is_ready(&self) -> bool {
        true
    }

    fn speak(&self, text: &str) {
        let _ = self.tx.send(text.to_owned());
    }
}

fn event(code: u32, action: KeyAction, timestamp_ms: u64) -> KeyEvent {
    KeyEvent {
        code,
        action,
        timestamp_ms,
    }
}

/// Key events that tap out "HI" (four dots, two dots) and commit it.
fn hi_then_commit() -> Vec<KeyEvent> {
    let mut events = Vec::new();
    let mut clock = 0;
    let mut tap = |code: u32, held: u64| {
        events.push(event(code, KeyAction::Down, clock));
        events.push(event(code, KeyAction::Up, clock + held));
        clock += held + 500;
    };

    for _ in 0..4 {
        tap(KEY_VOLUME_DOWN, 50);
    }
    tap(KEY_VOLUME_UP, 50); // H
    for _ in 0..2 {
        tap(KEY_VOLUME_DOWN, 50);
    }
    tap(KEY_VOLUME_UP, 50); // I
    for _ in 0..2 {
        tap(KEY_VOLUME_DOWN, 50);
    }
    tap(KEY_VOLUME_UP, 400); // commit
    events
}

#[tokio::test]
async fn committed_sentence_is_sent_and_reply_spoken() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let n = socket.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"HI");
        socket.write_all(b"HELLO YOURSELF").await.unwrap();
    });

    let (spoken_tx, spoken_rx) = flume::unbounded();
    let speech = Arc::new(ChannelSpeech { tx: spoken_tx });
    let dispatcher = Dispatcher::new("127.0.0.1", port, Duration::from_secs(5));
    let engine = MorseEngine::new(KeyMap::default(), 180);

    let (key_tx, key_rx) = flume::unbounded();
    let (shutdown_tx, shutdown_rx) = flume::bounded(1);
    let loop_handle = tokio::spawn(service::run(
        engine,
        dispatcher,
        speech,
        key_rx,
        shutdown_rx,
    ));

    for ev in hi_then_commit() {
        key_tx.send(ev).unwrap();
    }

    let spoken = tokio::time::timeout(Duration::from_secs(5), spoken_rx.recv_async())
        .await
        .expect("no speech within deadline")
        .unwrap();
    assert_eq!(spoken, "HELLO YOURSELF");

    server.await.unwrap();
    shutdown_tx.send(()).unwrap();
    loop_handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn failed_dispatch_never_reaches_speech() {
    // A port with no listener behind it.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let (spoken_tx, spoken_rx) = flume::unbounded();
    // Keep a sender alive in this scope so the receiver below only resolves
    // if speak() actually fires, not when the dispatch task drops its clone.
    let speech = Arc::new(ChannelSpeech {
        tx: spoken_tx.clone(),
    });
    let dispatcher = Dispatcher::new("127.0.0.1", port, Duration::from_secs(1));

    service::spawn_dispatch(dispatcher, speech, "HI".to_owned());

    let outcome =
        tokio::time::timeout(Duration::from_millis(500), spoken_rx.recv_async()).await;
    assert!(outcome.is_err(), "speech must not fire on dispatch failure");
    drop(spoken_tx);
}

#[tokio::test]
async fn input_path_survives_dispatch_failures() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let (spoken_tx, _spoken_rx) = flume::unbounded();
    let speech = Arc::new(ChannelSpeech { tx: spoken_tx });
    let dispatcher = Dispatcher::new("127.0.0.1", port, Duration::from_secs(1));
    let engine = MorseEngine::new(KeyMap::default(), 180);

    let (key_tx, key_rx) = flume::unbounded();
    let (shutdown_tx, shutdown_rx) = flume::bounded(1);
    let loop_handle = tokio::spawn(service::run(
        engine,
        dispatcher,
        speech,
        key_rx,
        shutdown_rx,
    ));

    // Two commits in a row, both destined to fail; the loop must keep
    // consuming events and shut down cleanly.
    for ev in hi_then_commit() {
        key_tx.send(ev).unwrap();
    }
    for ev in hi_then_commit() {
        key_tx.send(ev).unwrap();
    }

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown_tx.send(()).unwrap();
    loop_handle.await.unwrap().unwrap();
}
