use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gradewise")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Chat API base URL (overrides OPENAI_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds (overrides OPENAI_TIMEOUT_MS)
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Directory for compressed images (defaults to a temp subdirectory)
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Request feedback on a submitted file
    Feedback {
        file: PathBuf,

        #[arg(short, long)]
        student: String,

        #[arg(short, long)]
        assignment: String,

        /// Declared MIME type of the file
        #[arg(long)]
        mime_type: Option<String>,
    },

    /// Compress an image to a base64 JPEG payload
    Compress {
        image: PathBuf,

        /// Write the base64 payload here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the content type resolved for a file
    Mime {
        file: PathBuf,

        #[arg(long)]
        mime_type: Option<String>,

        #[arg(long)]
        kind: Option<String>,
    },
}
