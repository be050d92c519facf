use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use concierge::{
    api::routes::app_router,
    cli::{output::Output, repl, Cli, Commands},
    utils::toml_config::{LogFormat, ServerConfig},
    AppState, ConfigManager,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    let command = cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    });

    match command {
        Commands::Serve { host, port } => serve(&cli.config, cli.verbose, host, port).await,
        Commands::Chat { default_order_id } => {
            chat(&cli.config, cli.verbose, default_order_id, &output).await
        }
        Commands::Config { validate } => show_config(&cli.config, validate, &output),
    }
}

fn init_tracing(server: &ServerConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match server.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

async fn serve(
    config_path: &Path,
    verbose: bool,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let config_manager = Arc::new(
        ConfigManager::new(config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?,
    );
    let config = config_manager.config();
    init_tracing(&config.server, verbose);

    config.validate().context("Invalid configuration")?;
    if let Err(e) = config_manager.start_watching() {
        tracing::warn!(error = %e, "Configuration hot-reload disabled");
    }

    let state = AppState::from_config(config_manager.clone())?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = app_router(state)
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes))
        .layer(RequestBodyLimitLayer::new(config.server.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!(
        "{}:{}",
        host.unwrap_or_else(|| config.server.host.clone()),
        port.unwrap_or(config.server.port)
    );
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(address = %addr, "Concierge listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn chat(
    config_path: &Path,
    verbose: bool,
    default_order_id: Option<String>,
    output: &Output,
) -> anyhow::Result<()> {
    let config_manager = Arc::new(ConfigManager::new(config_path)?);
    let config = config_manager.config();

    // Keep log lines out of the conversation unless asked for.
    if verbose {
        init_tracing(&config.server, true);
    }

    let state = AppState::from_config(config_manager.clone())?;
    let default_order_id = default_order_id
        .filter(|id| !id.trim().is_empty())
        .or_else(|| config.chat.default_order_id.clone());

    repl::run(&state.engine, output, default_order_id.as_deref()).await?;
    Ok(())
}

fn show_config(config_path: &Path, validate: bool, output: &Output) -> anyhow::Result<()> {
    let config_manager = ConfigManager::new(config_path)?;
    let config = config_manager.config();

    output.header("Configuration");
    output.kv("File", &config_manager.path().display().to_string());
    output.kv("Bind address", &config.bind_address());
    output.kv("Support API", &config.support_api.base_url);
    output.kv("FAQ data", &config.rag.faq_path.display().to_string());

    if validate {
        let result = config.validate().and_then(|_| config.validate_env());
        match result {
            Ok(()) => output.success("Configuration is valid"),
            Err(e) => {
                output.error(&e.to_string());
                anyhow::bail!("configuration validation failed");
            }
        }
    } else {
        if let Err(e) = config.validate_env() {
            output.warning(&e.to_string());
        }
        println!("\n{}", config.to_toml()?);
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
