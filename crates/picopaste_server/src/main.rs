//! Picopaste server entrypoint.

use picopaste_server::{
    config::Config, db::Database, resolve_bind_address, serve_router, AppState, DEFAULT_PORT,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "picopaste=info,picopaste_server=info,picopaste_core=info,tower_http=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    let database = Database::open(&config.db_path)?;
    tracing::info!(
        "Opened paste store at {} ({} pastes, dedup={})",
        database.path().display(),
        database.pastes.len()?,
        config.dedup_mode
    );
    if config.rate_limit_max == 0 {
        tracing::warn!("Rate limiting disabled (PICOPASTE_RATE_LIMIT_MAX=0)");
    }
    if config.trust_proxy {
        tracing::warn!("Trusting X-Forwarded-For for client identity");
    }

    let bind_addr = resolve_bind_address(&config);
    let state = AppState::new(config, database);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("Picopaste running at http://{}", actual_addr);

    serve_router(listener, state, shutdown_signal()).await?;
    tracing::info!("Picopaste stopped");

    Ok(())
}

fn print_help() {
    println!("Picopaste Server\n");
    println!("Usage: picopaste [OPTIONS]\n");
    println!("Options:");
    println!("  --help                           Show this help message");
    println!("\nEnvironment variables:");
    println!("  PICOPASTE_DB_PATH                Database directory (default: /tmp/db)");
    println!(
        "  PICOPASTE_PORT                   Server port (default: {})",
        DEFAULT_PORT
    );
    println!(
        "  PICOPASTE_BIND                   Override bind address (e.g. 127.0.0.1:{})",
        DEFAULT_PORT
    );
    println!("  PICOPASTE_MAX_PASTE_SIZE         Maximum paste size in bytes (default: 4MB)");
    println!("  PICOPASTE_RATE_LIMIT_MAX         Submissions per window per client, 0 disables (default: 2)");
    println!("  PICOPASTE_RATE_LIMIT_WINDOW_SECS Admission window in seconds, must be > 0 (default: 30)");
    println!("  PICOPASTE_DEDUP                  Duplicate lookup: scan or digest (default: scan)");
    println!("  PICOPASTE_TRUST_PROXY            Key clients by X-Forwarded-For");
    println!("  RUST_LOG                         Log filter (default: picopaste=info)");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::{parse_cli_flags, CliFlags};

    #[test]
    fn parse_cli_flags_rejects_unknown_and_positional_arguments() {
        let cases = [
            (
                vec!["picopaste".to_string(), "--hepl".to_string()],
                "Unknown option",
            ),
            (
                vec!["picopaste".to_string(), "serve".to_string()],
                "Unexpected positional argument",
            ),
        ];

        for (args, expected_fragment) in cases {
            let err = parse_cli_flags(&args).expect_err("invalid args should be rejected");
            assert!(err.to_string().contains(expected_fragment));
        }
    }

    #[test]
    fn parse_cli_flags_accepts_help() {
        for flag in ["--help", "-h"] {
            let args = vec!["picopaste".to_string(), flag.to_string()];
            let flags = parse_cli_flags(&args).expect("help should parse");
            assert_eq!(flags, CliFlags { help: true });
        }
    }

    #[test]
    fn no_arguments_means_serve() {
        let flags = parse_cli_flags(&["picopaste".to_string()]).expect("empty args");
        assert_eq!(flags, CliFlags::default());
    }
}
