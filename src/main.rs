use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use pulsewatch::{
    App, FileDocumentStore, FileSource, HeartbeatSource, Monitor, Settings, StreamSource,
};
use pulsewatch_types::Timestamp;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pulsewatch")]
#[command(about = "Derive online/offline status from a bot's heartbeat")]
struct Args {
    /// Path to a heartbeat JSON file the bot rewrites [default: <key>.json]
    #[arg(short, long, conflicts_with = "connect")]
    file: Option<PathBuf>,

    /// Connect to a TCP endpoint streaming heartbeats (host:port)
    #[arg(short, long, conflicts_with = "file")]
    connect: Option<String>,

    /// Settings file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Staleness threshold (e.g., "2m", "90s"); overrides settings
    #[arg(short, long)]
    threshold: Option<String>,

    /// Tick period (e.g., "1s", "500ms"); overrides settings
    #[arg(long)]
    tick: Option<String>,

    /// Directory of JSON documents to read the server count from
    #[arg(long)]
    documents: Option<PathBuf>,

    /// Evaluate the source once, write the status report to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if args.threshold.is_some() {
        settings.threshold = args.threshold.clone();
    }
    if args.tick.is_some() {
        settings.tick = args.tick.clone();
    }
    let threshold = settings.threshold()?;
    let tick = settings.tick()?;

    let source = open_source(&args, &settings).await?;
    let mut app = App::new(source, Monitor::with_threshold(threshold));

    if let Some(root) = args.documents.as_ref().or(settings.server_count.root.as_ref()) {
        let store = FileDocumentStore::new(root);
        app.load_server_count(&store, &settings.server_count.document);
    }

    if let Some(ref export_path) = args.export {
        app.refresh(Timestamp::now());
        app.export_state(export_path, Timestamp::now())?;
        println!("Exported status to: {}", export_path.display());
        return Ok(());
    }

    run(&mut app, tick).await
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pulsewatch=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Open the heartbeat source selected on the command line
async fn open_source(args: &Args, settings: &Settings) -> Result<Box<dyn HeartbeatSource>> {
    if let Some(ref addr) = args.connect {
        use tokio::net::TcpStream;

        info!("Connecting to {}...", addr);
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("Failed to connect to {}", addr))?;
        info!("Connected");
        return Ok(Box::new(StreamSource::spawn(stream, addr)));
    }

    let path = match args.file {
        Some(ref path) => path.clone(),
        None => PathBuf::from(format!("{}.json", settings.key)),
    };
    Ok(Box::new(FileSource::new(path)))
}

/// Tick until Ctrl-C. Returning drops the timer, and dropping the app
/// drops the source subscription.
async fn run(app: &mut App, tick: Duration) -> Result<()> {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut last_error: Option<String> = None;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = Timestamp::now();
                let refresh = app.refresh(now);

                if app.load_error != last_error {
                    if let Some(ref err) = app.load_error {
                        info!("Source error: {}", err);
                    }
                    last_error = app.load_error.clone();
                }

                let report = app.report(now);
                if refresh.transitions.is_empty() {
                    debug!("{}", report.summary());
                } else {
                    info!("{}", report.summary());
                }
            }
            result = &mut shutdown => {
                result.context("Failed to listen for Ctrl-C")?;
                info!("Stopping");
                return Ok(());
            }
        }
    }
}
