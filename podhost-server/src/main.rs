//! # Podhost Server
//!
//! ```bash
//! # Run with the default configuration file
//! podhost-server
//!
//! # Run with a configuration file and catalog
//! podhost-server --config demos/config.yaml --catalog demos/catalog.yaml
//!
//! # Override the port from the environment
//! PODHOST_PORT=8080 podhost-server
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use clap::Parser;
use podhost_core::config::{ConfigLoader, Validatable};
use std::path::PathBuf;
use tracing::{error, info};

use podhost_server::config::ENV_PREFIX;
use podhost_server::{PodhostServer, ServerConfig, ServerError};

/// Podhost tenant-routing server
#[derive(Parser, Debug)]
#[command(name = "podhost-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Override server host
    #[arg(long, env = "PODHOST_HOST")]
    host: Option<String>,

    /// Override server port
    #[arg(long, env = "PODHOST_PORT")]
    port: Option<u16>,

    /// Override catalog file
    #[arg(long, env = "PODHOST_CATALOG")]
    catalog: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Validate configuration and catalog, then exit
    #[arg(long)]
    validate: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if args.validate {
        match validate_catalog(&config) {
            Ok(()) => println!("Configuration is valid"),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = run_server(config).await {
        error!(error = %e, "Server error");
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Loads the configuration file (or defaults) and applies overrides.
fn load_config(args: &Args) -> Result<ServerConfig, ServerError> {
    let mut config = if args.config.exists() {
        PodhostServer::load_config(&args.config)?
    } else {
        eprintln!(
            "Configuration file not found: {}, using defaults",
            args.config.display()
        );
        ConfigLoader::new()
            .with_env_prefix(ENV_PREFIX)
            .finish(ServerConfig::default())?
    };

    if let Some(host) = &args.host {
        config.api.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(catalog) = &args.catalog {
        config.catalog.path = Some(catalog.clone());
    }
    if args.debug {
        config.logging.level = "debug".to_string();
    }

    config.validate()?;
    Ok(config)
}

/// Parses and checks the configured catalog without starting anything.
fn validate_catalog(config: &ServerConfig) -> Result<(), ServerError> {
    if let Some(path) = &config.catalog.path {
        let platform = config.catalog.platform_hostname()?;
        let catalog = podhost_server::Catalog::load(path)?;
        let (snapshot, _) = catalog.build(platform.as_ref())?;
        println!("Catalog is valid: {} hostnames", snapshot.len());
        for tenant in &catalog.tenants {
            let hosts: Vec<&str> = snapshot
                .hostnames_for(&tenant.id)
                .into_iter()
                .map(|host| host.as_str())
                .collect();
            println!("  {} ({}): {}", tenant.slug, tenant.id, hosts.join(", "));
        }
    }
    Ok(())
}

async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let mut server = PodhostServer::new(config);
    server.initialize()?;
    info!("Podhost server initialized");
    server.run().await
}
