//! Validation engine main binary
//!
//! This binary provides the response-validation service consumed at the
//! end of the automated API-test pipeline.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use validation_engine::{
    config::StorageBackendType, init_validation_engine, ValidationEngineConfig, ENGINE_VERSION,
};

#[derive(Parser)]
#[command(name = "validation-engine")]
#[command(about = "API response validation engine")]
#[command(version = ENGINE_VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the validation engine server
    Serve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/validation-engine.toml")]
        config: PathBuf,

        /// API host
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// API port
        #[arg(long, default_value = "8083")]
        port: u16,

        /// Storage backend type
        #[arg(long)]
        storage: Option<String>,

        /// Database URL
        #[arg(long)]
        database_url: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "validation-engine.toml")]
        output: PathBuf,
    },

    /// Validate configuration file
    Validate {
        /// Configuration file path
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Show current configuration
    Show {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            storage,
            database_url,
        } => {
            // Load configuration with fallback to defaults
            let mut config = if config.exists() {
                match ValidationEngineConfig::from_file(&config) {
                    Ok(cfg) => {
                        info!("Configuration loaded from: {}", config.display());
                        cfg
                    }
                    Err(e) => {
                        error!(
                            "Failed to load configuration from {}: {}",
                            config.display(),
                            e
                        );
                        std::process::exit(1);
                    }
                }
            } else {
                warn!(
                    "Configuration file not found: {}. Using defaults.",
                    config.display()
                );
                match ValidationEngineConfig::load_with_defaults() {
                    Ok(cfg) => {
                        info!("Using default configuration");
                        cfg
                    }
                    Err(e) => {
                        error!("Failed to load default configuration: {}", e);
                        std::process::exit(1);
                    }
                }
            };

            // Override configuration with CLI arguments
            config.api.host = host.clone();
            config.api.port = port;

            if let Some(storage) = storage {
                config.storage.backend = match storage.as_str() {
                    "postgres" => StorageBackendType::Postgres,
                    "memory" => StorageBackendType::Memory,
                    _ => {
                        error!("Unsupported storage backend: {}", storage);
                        std::process::exit(1);
                    }
                };
            }

            if let Some(url) = database_url {
                match config.storage.backend {
                    StorageBackendType::Postgres => {
                        config.storage.postgres.url = url;
                    }
                    StorageBackendType::Memory => {
                        warn!("Database URL ignored for the memory storage backend");
                    }
                }
            }

            // Validate the final configuration
            if let Err(e) = config.validate() {
                error!("Configuration validation failed: {}", e);
                std::process::exit(1);
            }

            // Initialize the engine and the API server
            let engine = init_validation_engine(config).await?;
            let api = validation_engine::api::ValidationApi::new(Arc::new(engine));
            let app = api.create_app();

            // Start server
            let addr = SocketAddr::from_str(&format!("{}:{}", host, port))?;
            let listener = tokio::net::TcpListener::bind(addr).await?;

            info!("Validation engine server starting on {}", addr);

            axum::serve(listener, app).await?;
        }

        Commands::Config { command } => match command {
            ConfigCommands::Generate { output } => {
                std::fs::write(&output, ValidationEngineConfig::generate_example())?;
                println!("Configuration file generated: {}", output.display());
            }

            ConfigCommands::Validate {
                config: config_path,
            } => {
                let config = match ValidationEngineConfig::from_file(&config_path) {
                    Ok(config) => config,
                    Err(e) => {
                        error!("Failed to load configuration file: {}", e);
                        std::process::exit(1);
                    }
                };

                match config.validate() {
                    Ok(()) => {
                        println!("Configuration validation passed");
                        println!("  API: {}:{}", config.api.host, config.api.port);
                        println!("  Storage Backend: {:?}", config.storage.backend);
                        println!(
                            "  Schema Cache: {}",
                            config.validation.enable_schema_cache
                        );
                    }
                    Err(e) => {
                        error!("Configuration validation failed: {}", e);
                        std::process::exit(1);
                    }
                }
            }

            ConfigCommands::Show { config } => {
                let config = if let Some(path) = config {
                    ValidationEngineConfig::from_file(&path)?
                } else {
                    ValidationEngineConfig::load_with_defaults()?
                };

                println!("Current configuration:");
                println!("  API: {}:{}", config.api.host, config.api.port);
                println!("  Base Path: {}", config.api.base_path);
                println!("  Storage Backend: {:?}", config.storage.backend);
                println!("  Schema Cache: {}", config.validation.enable_schema_cache);
                println!("  Log Level: {}", config.monitoring.log_level);
            }
        },
    }

    Ok(())
}
