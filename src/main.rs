use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::error;

use pocketmorse::config::Config;
use pocketmorse::dispatch::Dispatcher;
use pocketmorse::engine::MorseEngine;
use pocketmorse::keys::KeyEvent;
use pocketmorse::speech::{CommandSpeech, NullSpeech, SpeechFeedback};
use pocketmorse::{logger, service, term};

#[derive(Parser)]
#[command(name = "pocketmorse", about = "Morse-code text entry with spoken replies")]
struct Cli {
    /// Path to the config file (default: ./config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the endpoint host
    #[arg(long)]
    host: Option<String>,

    /// Override the endpoint port
    #[arg(long)]
    port: Option<u16>,

    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Send one sentence to the endpoint and print the reply (no key loop)
    Send { text: String },
}

fn main() -> anyhow::Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let mut config = Config::load(cli.config.as_deref());
    if let Some(host) = cli.host {
        config.endpoint.host = host;
    }
    if let Some(port) = cli.port {
        config.endpoint.port = port;
    }

    let dispatcher = Dispatcher::new(
        &config.endpoint.host,
        config.endpoint.port,
        Duration::from_secs(config.endpoint.read_timeout_secs),
    );

    if let Some(Command::Send { text }) = cli.command {
        let reply = dispatcher.dispatch(&text).await?;
        println!("{reply}");
        return Ok(());
    }

    let speech: Arc<dyn SpeechFeedback> = if config.speech.enabled {
        Arc::new(CommandSpeech::new(&config.speech.command))
    } else {
        Arc::new(NullSpeech)
    };

    let engine = MorseEngine::new(config.keymap(), config.input.long_press_ms);

    let (key_tx, key_rx) = flume::unbounded::<KeyEvent>();
    let (shutdown_tx, shutdown_rx) = flume::bounded::<()>(1);

    let signal_tx = shutdown_tx.clone();
    ctrlc::set_handler(move || {
        let _ = signal_tx.try_send(());
    })?;

    // Key reader thread; the service loop ends when it quits.
    let control = config.input.control_key;
    let input = config.input.input_key;
    thread::spawn(move || {
        if let Err(e) = term::run_key_loop(key_tx, control, input) {
            error!(error = %e, "key loop failed");
        }
        let _ = shutdown_tx.try_send(());
    });

    eprintln!("Down arrow: tap for dot, hold for dash. Up arrow: tap to decode a letter;");
    eprintln!("hold to backspace (empty code), clear all (.), or send (..). Esc quits.");

    service::run(engine, dispatcher, speech, key_rx, shutdown_rx).await
}
