//! poi-watch: publishes Wikipedia points of interest around a vessel.
//!
//! Single-binary Tokio application that:
//! 1. Tracks the vessel position (stdin feed or a fixed `--lat/--lon`)
//! 2. Searches Wikipedia around a ring of points every poll interval
//! 3. Resolves page extracts through a write-once cache
//! 4. Writes POI deltas to stdout for the host bus

mod config;
mod host;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use common::Coordinate;
use poi_engine::{
    ChannelPublisher, DetailResolver, FixedPosition, PoiSource, PollScheduler, PositionProvider,
    SearchDispatcher, SharedPosition,
};
use tracing::{error, info, warn};
use wikipedia_client::WikipediaClient;

/// Wikipedia points-of-interest watcher
#[derive(Parser)]
#[command(name = "poi-watch", about = "Publishes Wikipedia points of interest near the vessel")]
struct Cli {
    /// Config file (defaults to ./config.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fixed latitude instead of reading positions from stdin.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Fixed longitude instead of reading positions from stdin.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Run a single cycle at the fixed position, wait for it, and exit.
    #[arg(long, requires = "lat")]
    once: bool,
}

#[tokio::main]
async fn main() {
    // Initialize logging. Stdout carries the deltas, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "poi_watch=info,poi_engine=info,wikipedia_client=info".into()
            }),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("poi-watch starting up...");

    // Load configuration.
    let cfg = match config::load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!("Upstream: {}", cfg.api_url);
    info!(
        "Search: ring={}km per_call={}m limit={}",
        cfg.search.ring_radius_km, cfg.search.search_radius_m, cfg.search.result_limit
    );
    info!(
        "Timing: startup_delay={}s poll={}s request_timeout={}s",
        cfg.timing.startup_delay_secs, cfg.timing.poll_interval_secs, cfg.timing.request_timeout_secs
    );

    let client = match WikipediaClient::new(&cfg) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to initialize Wikipedia client: {}", e);
            std::process::exit(1);
        }
    };

    // ── Wire the pipeline ────────────────────────────────────────────
    let source: Arc<dyn PoiSource> = Arc::new(client);
    let (publisher, bus_rx) = ChannelPublisher::new(&cfg);
    let resolver = Arc::new(DetailResolver::from_config(
        source.clone(),
        Arc::new(publisher),
        &cfg,
    ));
    let dispatcher = SearchDispatcher::new(source, resolver.clone());

    let position: Arc<dyn PositionProvider> = match (cli.lat, cli.lon) {
        (Some(lat), Some(lon)) => {
            let fixed = Coordinate::new(lat, lon);
            info!("Using fixed position {}", fixed);
            Arc::new(FixedPosition(fixed))
        }
        _ => {
            let shared = SharedPosition::new();
            let feed = shared.clone();
            tokio::spawn(async move {
                let stdin = tokio::io::BufReader::new(tokio::io::stdin());
                if let Err(e) = host::read_positions(stdin, feed).await {
                    warn!("Position input failed: {}", e);
                }
            });
            info!("Reading positions from stdin");
            Arc::new(shared)
        }
    };

    let writer_handle = tokio::spawn(host::write_deltas(bus_rx, tokio::io::stdout()));
    let scheduler = PollScheduler::new(position, dispatcher, &cfg);

    if cli.once {
        let published = match scheduler.trigger() {
            Some(handles) => {
                let mut total = 0;
                for handle in handles {
                    match handle.await {
                        Ok(n) => total += n,
                        Err(e) => warn!("Search task failed: {}", e),
                    }
                }
                total
            }
            None => 0,
        };
        let stats = resolver.stats();
        info!(
            "Cycle done: published={} cached={} fetch_failures={}",
            published,
            resolver.cache_len(),
            stats.fetch_failures
        );

        // Dropping the last publisher closes the bus so the writer drains.
        drop(scheduler);
        drop(resolver);
        match writer_handle.await {
            Ok(Err(e)) => error!("Output failed: {}", e),
            Err(e) => error!("Output task failed: {}", e),
            Ok(Ok(())) => {}
        }
        return;
    }

    // Task 1: Poll scheduler
    let scheduler_handle = tokio::spawn(async move {
        scheduler.run().await;
    });

    // Task 2: Heartbeat
    let hb_resolver = resolver.clone();
    let heartbeat_secs = cfg.timing.heartbeat_secs;
    let heartbeat_handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(heartbeat_secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let stats = hb_resolver.stats();
            info!(
                "HEARTBEAT: cached={} hits={} misses={} failures={} published={}",
                hb_resolver.cache_len(),
                stats.cache_hits,
                stats.cache_misses,
                stats.fetch_failures,
                stats.published
            );
        }
    });

    // ── Wait for shutdown ────────────────────────────────────────────
    info!("poi-watch is running. Press Ctrl+C to stop.");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        r = scheduler_handle => {
            error!("Scheduler task exited: {:?}", r);
        }
        r = heartbeat_handle => {
            error!("Heartbeat task exited: {:?}", r);
        }
        r = writer_handle => {
            error!("Output task exited: {:?}", r);
        }
    }

    info!("poi-watch stopped");
}
