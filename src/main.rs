mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use vv_core::config::Config;

async fn start_server(host: Option<String>, port: Option<u16>, config_path: Option<&Path>) -> Result<()> {
    // Unreadable or invalid files fall back to defaults; `validate` is strict.
    let mut config = Config::load_or_default(config_path);

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting vidvault {}", env!("CARGO_PKG_VERSION"));
    vv_server::start(config).await?;
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {}", p.display());
            Config::load(p).with_context(|| format!("loading config {}", p.display()))?
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("Configuration is valid");
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Database: {}", config.server.db_path.display());
    println!("  Upload dir: {}", config.upload.dir.display());
    println!("  Max upload: {} MB", config.upload.max_upload_mb);
    println!("  Stream chunk: {} bytes", config.streaming.effective_chunk_size());

    let warnings = config.validate();
    if !warnings.is_empty() {
        println!("Warnings:");
        for w in warnings {
            println!("  - {w}");
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise pick defaults from the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "vidvault=trace,vv_server=trace,vv_db=debug,vv_core=debug,tower_http=debug".to_string()
        } else {
            "vidvault=debug,vv_server=debug,vv_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt().with_env_filter(&env_filter).init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("vidvault {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
