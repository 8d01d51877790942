//! Configuration management for the picture upload server.
//!
//! This module provides:
//! - Command-line arguments via clap
//! - Environment variables with `PICTURE_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Environment Variables
//!
//! - `PICTURE_HOST` - Server bind address (default: 0.0.0.0)
//! - `PICTURE_PORT` - Server port (default: 3000)
//! - `PICTURE_ROOT` - Directory stored paths are resolved against (default: .)
//! - `PICTURE_LOCATION` - Destination directory below the root (default: /images/)
//! - `PICTURE_WIDTH` - Default output width in pixels (default: 300)
//! - `PICTURE_MAX_WIDTH` - Largest width a request may ask for (default: 4096)
//! - `PICTURE_MAX_UPLOAD_SIZE` - Maximum request body in bytes (default: 10 MiB)
//! - `PICTURE_CORS_ORIGINS` - Allowed CORS origins, comma-separated

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::server::{DEFAULT_LOCATION, DEFAULT_MAX_UPLOAD_SIZE, DEFAULT_MAX_WIDTH, DEFAULT_WIDTH};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default store root (the process working directory).
pub const DEFAULT_ROOT: &str = ".";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Picture upload helper: decode, resize and store uploaded pictures as JPEG.
#[derive(Parser, Debug, Clone)]
#[command(name = "picture-upload")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP upload server.
    Serve(ServeConfig),

    /// Run the pipeline on a local file.
    Process(ProcessConfig),
}

// =============================================================================
// Serve Configuration
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "PICTURE_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PICTURE_PORT")]
    pub port: u16,

    /// Directory that stored paths are resolved against.
    #[arg(long, default_value = DEFAULT_ROOT, env = "PICTURE_ROOT")]
    pub root: PathBuf,

    /// Destination directory below the root, with leading and trailing `/`.
    ///
    /// The directory must already exist.
    #[arg(long, default_value = DEFAULT_LOCATION, env = "PICTURE_LOCATION")]
    pub location: String,

    /// Output width in pixels when a request gives none (0 keeps the size).
    #[arg(long, default_value_t = DEFAULT_WIDTH, env = "PICTURE_WIDTH")]
    pub width: u32,

    /// Largest output width a request may ask for.
    #[arg(long, default_value_t = DEFAULT_MAX_WIDTH, env = "PICTURE_MAX_WIDTH")]
    pub max_width: u32,

    /// Maximum accepted request body in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_SIZE, env = "PICTURE_MAX_UPLOAD_SIZE")]
    pub max_upload_size: usize,

    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "PICTURE_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        validate_location(&self.location)?;

        if self.max_upload_size == 0 {
            return Err("max_upload_size must be greater than 0".to_string());
        }

        if self.width > self.max_width {
            return Err(format!("width {} exceeds max_width {}", self.width, self.max_width));
        }

        if !self.root.is_dir() {
            return Err(format!(
                "Root directory does not exist: {}",
                self.root.display()
            ));
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Process Configuration
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct ProcessConfig {
    /// Input picture. Its extension (jpg, jpeg, png, gif) selects the decoder.
    pub input: PathBuf,

    /// Output filename stem.
    #[arg(long)]
    pub identifier: String,

    /// Destination directory below the root, with leading and trailing `/`.
    #[arg(long, default_value = DEFAULT_LOCATION)]
    pub location: String,

    /// Output width in pixels (0 keeps the size).
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Directory that stored paths are resolved against.
    #[arg(long, default_value = DEFAULT_ROOT)]
    pub root: PathBuf,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl ProcessConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        validate_location(&self.location)?;

        if self.identifier.is_empty() {
            return Err("identifier must not be empty".to_string());
        }

        Ok(())
    }

    /// Filename used for format resolution.
    pub fn input_filename(&self) -> String {
        self.input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

fn validate_location(location: &str) -> Result<(), String> {
    if location.is_empty() {
        return Err("location is required. Set --location or PICTURE_LOCATION".to_string());
    }
    if !location.starts_with('/') || !location.ends_with('/') {
        return Err(format!(
            "location must start and end with '/', got '{}'",
            location
        ));
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
