use ember::{Bridge, Config, Event, MemoryHost, Plugin, Result};
use fireboard::Client;

use log::{error, info};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio::task;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init_timed();

    info!("ember version {VERSION}");

    let config = Config::from_env()?;

    let client = match &config.api_url {
        Some(url) => Client::with_base_url(url)?,
        None => Client::new()?,
    };

    let bindings = config.bindings.clone();
    let mut bridge = Bridge::new(client, MemoryHost::new(), config);

    for binding in bindings {
        bridge.bind(binding.binding(), binding.id).await?;
    }

    bridge.start().await;

    let (sender, receiver) = mpsc::channel(8);
    task::spawn(async move {
        if let Err(err) = forward_signals(sender).await {
            error!("Error listening for signals: {err}");
        }
    });

    bridge.run(receiver).await;

    Ok(())
}

async fn forward_signals(events: mpsc::Sender<Event>) -> std::io::Result<()> {
    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut dump = signal(SignalKind::user_defined1())?;

    loop {
        let event = tokio::select! {
            _ = terminate.recv() => {
                info!("got SIGTERM, exiting...");
                Event::Shutdown
            }
            _ = interrupt.recv() => {
                info!("got SIGINT, exiting...");
                Event::Shutdown
            }
            _ = dump.recv() => Event::Dump,
        };

        let is_shutdown = matches!(event, Event::Shutdown);

        if events.send(event).await.is_err() || is_shutdown {
            return Ok(());
        }
    }
}
