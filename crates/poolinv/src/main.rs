mod output;

use clap::{Parser, Subcommand, ValueEnum};
use poolinv_apiserver::{ApiServer, AppState, Config as ApiConfig};
use poolinv_core::MissingVdevPolicy;
use poolinv_runtime::{
    InventoryConfig, ManagementSession, MockSubsystem, PoolSubsystem, ZpoolCommandConfig,
    ZpoolCommandSubsystem,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "poolinv", about = "Storage pool inventory for ZFS hosts")]
struct Cli {
    /// Pool subsystem to talk to
    #[arg(long, value_enum, default_value_t = Backend::Zpool, env = "POOLINV_BACKEND", global = true)]
    backend: Backend,
    /// What to do with a pool that has no vdev tree: abort or skip
    #[arg(long, default_value = "abort", env = "POOLINV_MISSING_VDEV", global = true)]
    missing_vdev: MissingVdevPolicy,
    /// Path of the zpool utility
    #[arg(long, default_value = "zpool", env = "POOLINV_ZPOOL_BIN", global = true)]
    zpool_bin: String,
    /// ZFS control device
    #[arg(long, default_value = "/dev/zfs", env = "POOLINV_DEVICE", global = true)]
    device: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    /// ZFS through the zpool utility
    Zpool,
    /// Built-in demo pools
    Mock,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
    Table,
}

#[derive(Subcommand)]
enum Commands {
    /// List all pools once and print the inventory
    List {
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Print the inventory interface version
    Version,
    /// Serve inventories over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:9140", env = "POOLINV_BIND")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Logs go to stderr so list output stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::List { format } => run_list(&cli, *format),
        Commands::Version => {
            println!(
                "poolinv {} (inventory interface {})",
                env!("CARGO_PKG_VERSION"),
                poolinv_core::version()
            );
            Ok(())
        }
        Commands::Serve { bind } => run_serve(&cli, bind).await,
    }
}

/// Run one listing and print it
fn run_list(cli: &Cli, format: OutputFormat) -> miette::Result<()> {
    let session = open_session(cli)?;
    let inventory = session.list_pools();

    if !inventory.status.is_complete() {
        warn!("Inventory is incomplete: {}", inventory.status);
    }

    let rendered = match format {
        OutputFormat::Json => poolinv_core::to_json_pretty(&inventory)?,
        OutputFormat::Yaml => poolinv_core::to_yaml(&inventory)?,
        OutputFormat::Table => output::render_table(&inventory),
    };
    println!("{}", rendered.trim_end());

    Ok(())
}

/// Run the HTTP server until ctrl-c
async fn run_serve(cli: &Cli, bind: &str) -> miette::Result<()> {
    let listen_addr = bind
        .parse()
        .map_err(|e| miette::miette!("Invalid bind address '{}': {}", bind, e))?;

    let session = open_session(cli)?;
    let state = Arc::new(AppState::new(session));
    let server = ApiServer::new(ApiConfig { listen_addr }, state);

    server
        .run(shutdown_signal())
        .await
        .map_err(|e| miette::miette!("API server error: {}", e))?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down gracefully..."),
        Err(e) => error!("Failed to listen for ctrl-c: {}", e),
    }
}

/// Open a management session on the selected backend
fn open_session(cli: &Cli) -> miette::Result<ManagementSession> {
    let subsystem = create_subsystem(cli);
    let config = InventoryConfig::default().with_missing_vdev_policy(cli.missing_vdev);
    Ok(ManagementSession::open(subsystem.as_ref(), config)?)
}

fn create_subsystem(cli: &Cli) -> Box<dyn PoolSubsystem> {
    match cli.backend {
        Backend::Zpool => {
            info!("Using zpool backend ({})", cli.zpool_bin);
            Box::new(ZpoolCommandSubsystem::new(ZpoolCommandConfig {
                zpool_bin: cli.zpool_bin.clone(),
                device: cli.device.clone(),
            }))
        }
        Backend::Mock => {
            info!("Using mock backend (demo pools)");
            Box::new(MockSubsystem::demo())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_with_options() {
        let cli = Cli::try_parse_from([
            "poolinv",
            "--backend",
            "mock",
            "--missing-vdev",
            "skip",
            "list",
            "--format",
            "table",
        ])
        .unwrap();
        assert!(matches!(cli.backend, Backend::Mock));
        assert_eq!(cli.missing_vdev, MissingVdevPolicy::Skip);
        assert!(matches!(
            cli.command,
            Commands::List {
                format: OutputFormat::Table
            }
        ));
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let result = Cli::try_parse_from(["poolinv", "--missing-vdev", "retry", "list"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_mock_backend_lists_demo_pools() {
        let cli = Cli::try_parse_from(["poolinv", "--backend", "mock", "list"]).unwrap();
        let session = open_session(&cli).unwrap();

        let inventory = session.list_pools();
        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory.pools[0].name, "rpool");
        assert!(inventory.status.is_complete());
    }

    #[test]
    fn test_missing_device_fails_session() {
        let cli = Cli::try_parse_from([
            "poolinv",
            "--device",
            "/nonexistent/poolinv/zfs",
            "list",
        ])
        .unwrap();
        let err = open_session(&cli).unwrap_err();
        assert!(err.to_string().contains("subsystem unavailable"));
    }
}
