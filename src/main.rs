use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use topizza_catalog::config::{AppConfig, CliConfig, FileConfig};
use topizza_catalog::connectivity::{
    channel_observer, ConnectivityMonitor, PathObserver, PathStatus, TcpProbeObserver,
};
use topizza_catalog::{
    main_context, CatalogDispatcher, CatalogGateway, CategoryReplacePolicy, HttpCatalogApi,
    LocalCatalogStore, MainLoop, SqliteCatalogStore,
};

#[derive(Parser, Debug)]
#[command(about = "Offline-first access to the ToPizza menu")]
struct CliArgs {
    /// Optional TOML config file. Its values override the flags below.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the catalog service.
    #[clap(long)]
    pub api_base_url: Option<String>,

    /// Path to the SQLite cache file (":memory:" for a throw-away cache).
    #[clap(long)]
    pub db_path: Option<PathBuf>,

    /// Request timeout in seconds. Unset leaves it to the HTTP client.
    #[clap(long)]
    pub request_timeout_sec: Option<u64>,

    /// What a failed category replace leaves in the cache.
    #[clap(long, value_enum)]
    pub category_replace_policy: Option<CategoryReplacePolicy>,

    /// Host probed to decide whether the network is reachable.
    #[clap(long)]
    pub probe_host: Option<String>,

    /// Port probed on the probe host.
    #[clap(long)]
    pub probe_port: Option<u16>,

    /// Seconds between reachability probes.
    #[clap(long)]
    pub probe_interval_sec: Option<u64>,

    /// Behave as if the device had no network.
    #[clap(long)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the category list.
    Categories,
    /// Fetch the products of one category.
    Products { category: String },
    /// Print everything currently cached.
    Snapshot,
    /// Remove the cached products of one category.
    ClearProducts { category: String },
    /// Probe reachability once and print the result.
    Status,
}

impl CliArgs {
    fn cli_config(&self) -> CliConfig {
        CliConfig {
            api_base_url: self.api_base_url.clone(),
            db_path: self.db_path.clone(),
            request_timeout_sec: self.request_timeout_sec,
            category_replace_policy: self.category_replace_policy,
            probe_host: self.probe_host.clone(),
            probe_port: self.probe_port,
            probe_interval_sec: self.probe_interval_sec,
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

/// Drives the main loop until the request delivers its result.
async fn await_delivery<T>(
    main_loop: &mut MainLoop,
    mut result_rx: oneshot::Receiver<Vec<T>>,
) -> Result<Vec<T>> {
    loop {
        match result_rx.try_recv() {
            Ok(result) => return Ok(result),
            Err(TryRecvError::Closed) => bail!("Request finished without delivering a result"),
            Err(TryRecvError::Empty) => {}
        }
        if !main_loop.run_next().await {
            bail!("Main loop closed before the result was delivered");
        }
    }
}

async fn make_monitor(config: &AppConfig, offline: bool) -> ConnectivityMonitor {
    if offline {
        let (reporter, observer) = channel_observer();
        let monitor = ConnectivityMonitor::spawn(observer);
        reporter.report(PathStatus::Unsatisfied);
        monitor.wait_for_status(false).await;
        return monitor;
    }
    let settings = &config.connectivity;
    info!(
        "Probing {} every {:?} for reachability",
        settings.probe_addr(),
        settings.probe_interval
    );
    ConnectivityMonitor::spawn(TcpProbeObserver::new(
        settings.probe_addr(),
        settings.probe_interval,
    ))
}

fn no_network_notice() -> Option<impl FnOnce() + Send + 'static> {
    Some(|| eprintln!("No network connection. Showing the cached menu."))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let config = AppConfig::resolve(&cli_args.cli_config(), file_config)?;

    info!("Opening catalog cache at {:?}...", config.db_path);
    let store = Arc::new(
        SqliteCatalogStore::new(&config.db_path)?
            .with_replace_policy(config.category_replace_policy),
    );

    match cli_args.command {
        Command::Snapshot => return print_json(&store.snapshot()),
        Command::ClearProducts { ref category } => {
            let removed = store.clear_products(category)?;
            return print_json(&serde_json::json!({ "category": category, "removed": removed }));
        }
        Command::Status => {
            let mut probe = TcpProbeObserver::new(
                config.connectivity.probe_addr(),
                config.connectivity.probe_interval,
            );
            let reachable = probe
                .next_status()
                .await
                .is_some_and(PathStatus::is_reachable);
            return print_json(&serde_json::json!({ "reachable": reachable }));
        }
        Command::Categories | Command::Products { .. } => {}
    }

    let api = Arc::new(HttpCatalogApi::new(
        &config.api_base_url,
        config.request_timeout,
    )?);
    let monitor = Arc::new(make_monitor(&config, cli_args.offline).await);
    let gateway = Arc::new(CatalogGateway::new(api, store, monitor));

    let (main, mut main_loop) = main_context();
    let dispatcher = CatalogDispatcher::new(gateway, main, tokio::runtime::Handle::current());

    match cli_args.command {
        Command::Categories => {
            let (tx, rx) = oneshot::channel();
            dispatcher.request_categories(
                move |categories| {
                    let _ = tx.send(categories);
                },
                no_network_notice(),
            );
            print_json(&await_delivery(&mut main_loop, rx).await?)
        }
        Command::Products { ref category } => {
            let (tx, rx) = oneshot::channel();
            dispatcher.request_products(
                category,
                move |products| {
                    let _ = tx.send(products);
                },
                no_network_notice(),
            );
            print_json(&await_delivery(&mut main_loop, rx).await?)
        }
        _ => Ok(()),
    }
}
