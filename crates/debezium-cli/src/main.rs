mod connector_file;

use clap::{Parser, Subcommand};
use connector_file::ConnectorFile;
use debezium_api::{handlers::AppState, ApiServer};
use debezium_client::{CallContext, CancellationToken, DebeziumClient};
use debezium_config::{AppConfig, LoggingConfig};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "debezium-cli")]
#[command(about = "Manage Debezium connectors on a Kafka Connect cluster", long_about = None)]
struct Cli {
    /// Path to configuration directory
    #[arg(short, long, default_value = "config", global = true)]
    config_dir: String,

    /// Kafka Connect REST endpoint, overriding configuration
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP gateway
    Serve,

    /// Validate configuration
    Validate {
        /// Also check that the Connect cluster answers
        #[arg(long)]
        probe: bool,
    },

    /// List connectors
    List {
        /// Include each connector's status
        #[arg(long)]
        expand_status: bool,
    },

    /// Show a connector's config and tasks
    Get { name: String },

    /// Show a connector's live status
    Status { name: String },

    /// Create a connector from a YAML or JSON file
    Create {
        #[arg(short, long)]
        file: String,
    },

    /// Replace a connector's config from a YAML or JSON file
    UpdateConfig {
        name: String,
        #[arg(short, long)]
        file: String,
    },

    /// Delete a connector
    Delete { name: String },

    /// Pause a connector and its tasks
    Pause { name: String },

    /// Resume a paused connector
    Resume { name: String },

    /// Restart a connector
    Restart { name: String },

    /// List a connector's tasks
    Tasks { name: String },

    /// Restart one task of a connector
    RestartTask { name: String, task: i32 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load app config from files and environment variables
    let app_config = AppConfig::load_with_base_url(&cli.config_dir, cli.base_url)?;

    init_tracing(&app_config.logging)?;

    let client = DebeziumClient::new(&app_config.client.base_url, app_config.client.timeout())?;

    match cli.command {
        Commands::Serve => serve(app_config, client).await?,

        Commands::Validate { probe } => {
            println!("✓ Configuration is valid");
            println!("  Connect URL: {}", app_config.client.base_url);
            println!("  Request timeout: {}s", app_config.client.timeout_secs);
            println!(
                "  Gateway: {}:{} (CORS {})",
                app_config.api.host,
                app_config.api.port,
                if app_config.api.cors_enabled { "on" } else { "off" }
            );

            if probe {
                let list = client
                    .list_connectors(&call_context(&app_config), false)
                    .await?;
                println!("✓ Connect reachable, {} connector(s)", list.len());
            }
        }

        Commands::List { expand_status } => {
            let list = client
                .list_connectors(&call_context(&app_config), expand_status)
                .await?;
            print_json(&list)?;
        }

        Commands::Get { name } => {
            let connector = client
                .get_connector(&call_context(&app_config), &name)
                .await?;
            print_json(&connector)?;
        }

        Commands::Status { name } => {
            let status = client
                .get_connector_status(&call_context(&app_config), &name)
                .await?;
            print_json(&status)?;
        }

        Commands::Create { file } => {
            let request = ConnectorFile::load(&file)?.create_request()?;
            let created = client
                .create_connector(&call_context(&app_config), &request)
                .await?;
            print_json(&created)?;
        }

        Commands::UpdateConfig { name, file } => {
            let config = ConnectorFile::load(&file)?.connector_config()?;
            let updated = client
                .update_connector_config(&call_context(&app_config), &name, &config)
                .await?;
            print_json(&updated)?;
        }

        Commands::Delete { name } => {
            client
                .delete_connector(&call_context(&app_config), &name)
                .await?;
            println!("✓ Connector '{}' deleted", name);
        }

        Commands::Pause { name } => {
            client
                .pause_connector(&call_context(&app_config), &name)
                .await?;
            println!("✓ Connector '{}' paused", name);
        }

        Commands::Resume { name } => {
            client
                .resume_connector(&call_context(&app_config), &name)
                .await?;
            println!("✓ Connector '{}' resumed", name);
        }

        Commands::Restart { name } => {
            client
                .restart_connector(&call_context(&app_config), &name)
                .await?;
            println!("✓ Connector '{}' restarted", name);
        }

        Commands::Tasks { name } => {
            let tasks = client
                .get_connector_tasks(&call_context(&app_config), &name)
                .await?;
            print_json(&tasks)?;
        }

        Commands::RestartTask { name, task } => {
            client
                .restart_connector_task(&call_context(&app_config), &name, task)
                .await?;
            println!("✓ Task {} of connector '{}' restarted", task, name);
        }
    }

    Ok(())
}

async fn serve(app_config: AppConfig, client: DebeziumClient) -> anyhow::Result<()> {
    info!(
        "Starting Debezium gateway for Connect at {}",
        app_config.client.base_url
    );

    let state = AppState::new(Arc::new(client), app_config.client.call_timeout());
    let server = ApiServer::new(
        app_config.api.host.clone(),
        app_config.api.port,
        app_config.api.cors_enabled,
        state,
    );

    info!(
        "API server available at http://{}:{}",
        app_config.api.host, app_config.api.port
    );

    // Wait for API server or shutdown signal
    tokio::select! {
        res = server.run() => {
            if let Err(e) = res {
                error!("API server error: {}", e);
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down Debezium gateway...");
        }
    }

    Ok(())
}

/// Context for a one-shot CLI call: Ctrl-C cancels it, and the configured
/// call timeout bounds it.
fn call_context(app_config: &AppConfig) -> CallContext {
    let token = CancellationToken::new();
    let on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let ctx = CallContext::with_cancellation(token);
    match app_config.client.call_timeout() {
        Some(timeout) => ctx.timeout(timeout),
        None => ctx,
    }
}

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let level = match logging.level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // RUST_LOG takes precedence over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.json {
        builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;
    } else {
        builder
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
