//! askdb - A knowledge-base question-answering server for restaurant staff.

use askdb::cli::Cli;
use askdb::config::Config;
use askdb::error::Result;
use askdb::http::build_router;
use askdb::logging;
use askdb::state::AppState;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // .env is optional; ignore a missing file
    let _ = dotenvy::dotenv();

    logging::init_stderr_logging();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Load configuration file
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;

    // CLI arguments override the config file; environment variables fill
    // whatever is still missing.
    if let Some(connection) = cli.to_connection_config()? {
        config.database.merge(&connection);
    }
    config.database.apply_env_defaults();

    if let Some(listen) = &cli.listen {
        let (host, port) = parse_listen_addr(listen)?;
        config.server.host = host;
        config.server.port = port;
    }

    if let Some(provider) = &cli.llm {
        config.llm.provider = provider.clone();
    }

    if cli.verbose_errors {
        config.server.verbose_errors = true;
    }

    if !cli.mock_db {
        info!("Database: {}", config.database.display_string());
    }

    let state = AppState::init(&config, cli.mock_db).await?;
    let app = build_router(state);

    let addr = config.server.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| askdb::error::AskError::config(format!("Failed to bind {addr}: {e}")))?;

    info!("Listening on {addr}");
    axum::serve(listener, app)
        .await
        .map_err(|e| askdb::error::AskError::internal(format!("Server error: {e}")))?;

    Ok(())
}

/// Splits a "host:port" listen address into its parts.
fn parse_listen_addr(addr: &str) -> Result<(String, u16)> {
    let (host, port) = addr.rsplit_once(':').ok_or_else(|| {
        askdb::error::AskError::config(format!(
            "Invalid listen address '{addr}'. Expected HOST:PORT"
        ))
    })?;

    let port = port.parse::<u16>().map_err(|_| {
        askdb::error::AskError::config(format!("Invalid port in listen address '{addr}'"))
    })?;

    Ok((host.to_string(), port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listen_addr() {
        let (host, port) = parse_listen_addr("0.0.0.0:8000").unwrap();
        assert_eq!(host, "0.0.0.0");
        assert_eq!(port, 8000);
    }

    #[test]
    fn test_parse_listen_addr_invalid() {
        assert!(parse_listen_addr("8000").is_err());
        assert!(parse_listen_addr("0.0.0.0:notaport").is_err());
    }
}
