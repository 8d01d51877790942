//! Picture Upload - decode, resize and store uploaded pictures as JPEG.
//!
//! This binary starts the HTTP server or runs the pipeline on a local file.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use picture_upload::{
    config::{Cli, Command, ProcessConfig, ServeConfig},
    create_router, probe_dimensions, ImageKind, ImageStore, RouterConfig, UploadParams,
    UploadService, UploadedPicture,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => run_serve(config).await,
        Command::Process(config) => run_process(config),
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let store = ImageStore::new(&config.root);
    let destination = store.directory(&config.location);
    if !destination.is_dir() {
        error!(
            "Destination directory does not exist: {} (it is not created automatically)",
            destination.display()
        );
        return ExitCode::FAILURE;
    }

    info!("Configuration:");
    info!("  Root: {}", config.root.display());
    info!("  Location: {}", config.location);
    info!("  Default width: {}", config.width);
    info!("  Max upload size: {} bytes", config.max_upload_size);

    let router = create_router(UploadService::new(store), build_router_config(&config));

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server listening on: http://{}", addr);
    info!(
        "  curl -F get_picture=@photo.jpg http://{}/pictures/<identifier>",
        addr
    );

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Build RouterConfig from the application ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    let mut router_config = RouterConfig::new(config.location.clone())
        .with_default_width(config.width)
        .with_max_width(config.max_width)
        .with_max_upload_size(config.max_upload_size)
        .with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}

// =============================================================================
// Process Command
// =============================================================================

fn run_process(config: ProcessConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let data = match std::fs::read(&config.input) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", config.input.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let picture = UploadedPicture::new(config.input_filename(), data);
    let params = UploadParams::new(
        config.location.clone(),
        config.identifier.clone(),
        config.width,
    );
    let service = UploadService::new(ImageStore::new(&config.root));

    let path = match service.process(&picture, &params) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("{}", path);

    // Report output dimensions from the written file
    let written = service
        .store()
        .physical_path(&config.location, &config.identifier);
    if let Ok(data) = std::fs::read(&written) {
        if let Ok((width, height)) = probe_dimensions(&data, ImageKind::Jpeg) {
            eprintln!("{} ({}x{})", written.display(), width, height);
        }
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "picture_upload=debug,tower_http=debug"
    } else {
        "picture_upload=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
