use clap::{Parser, Subcommand};
use pictor_core::ImageType;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pictor")]
#[command(author, version, about = "Image upload, moderation and avatar serving service")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Normalize a local image the way uploads are normalized
    Process {
        /// Image type deciding the size cap (user_avatar, clan_icon, ...)
        #[arg(long = "type", value_name = "IMAGE_TYPE")]
        image_type: ImageType,

        /// Image to read
        input: PathBuf,

        /// Where to write the normalized image
        output: PathBuf,
    },

    /// Display version information
    Version,

    /// Generate a random admin API key
    GenerateApiKey,
}
