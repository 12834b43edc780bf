mod cli;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use pictor_core::config::{default_config_paths, Config};
use pictor_core::ImageType;
use rand::Rng;

/// Explicit `--config`, else the first default location that exists.
fn resolve_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| default_config_paths().into_iter().find(|p| p.exists()))
}

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = Config::load_or_default(config_path);
    config.apply_process_env();

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting pictor");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    pictor_server::start(config).await?;
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let mut config = match path {
        Some(p) => {
            println!("Validating config: {}", p.display());
            Config::load(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };
    config.apply_process_env();

    println!("Configuration is valid");
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Auth enabled: {}", config.auth.enabled);
    println!(
        "  Storage: {:?} (bucket {:?}, failure policy {:?})",
        config.storage.backend, config.storage.bucket, config.storage.failure_policy
    );
    println!("  Moderation enabled: {}", config.moderation.enabled);

    let warnings = config.validate();
    if !warnings.is_empty() {
        println!("Warnings:");
        for warning in warnings {
            println!("  - {warning}");
        }
    }

    Ok(())
}

fn process_file(image_type: ImageType, input: &Path, output: &Path) -> Result<()> {
    let data =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let processed = pictor_pipeline::process(image_type, &data)
        .with_context(|| format!("Failed to process {}", input.display()))?;

    std::fs::write(output, &processed.bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} ({}x{}, {}, {} bytes)",
        output.display(),
        processed.width,
        processed.height,
        processed.mime_type,
        processed.bytes.len()
    );
    Ok(())
}

fn generate_api_key() -> Result<()> {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    println!("{}", hex::encode(bytes));
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults from the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "pictor=trace,pictor_server=trace,pictor_pipeline=trace,pictor_storage=debug,pictor_moderation=debug,tower_http=debug".to_string()
        } else {
            "pictor=info,pictor_server=info,pictor_pipeline=info,pictor_storage=info,pictor_moderation=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let config_path = resolve_config_path(cli.config);
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, config_path.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = resolve_config_path(config_path.or(cli.config));
            validate_config(path.as_deref())
        }
        Commands::Process {
            image_type,
            input,
            output,
        } => process_file(image_type, &input, &output),
        Commands::Version => {
            println!("pictor {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::GenerateApiKey => generate_api_key(),
    }
}
