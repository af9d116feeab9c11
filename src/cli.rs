use clap::{Parser, Subcommand};

use crate::api::{AudioBitrate, Quality};

#[derive(Parser)]
#[command(name = "tubedeck")]
#[command(author, version, about = "Terminal client for a yt-dlp web download server", long_about = None)]
pub struct Cli {
    /// Download server base URL (overrides TUBEDECK_SERVER)
    #[arg(long, global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and preview metadata for a video URL
    Info {
        /// Video URL
        url: String,
    },

    /// Start a download and follow its live progress until it finishes
    Download {
        /// Video URL
        url: String,

        /// Resolution cap for video downloads
        #[arg(long, default_value = "best")]
        quality: Quality,

        /// Download audio only (mp3)
        #[arg(long)]
        audio: bool,

        /// Audio bitrate in kbps (audio-only downloads)
        #[arg(long, default_value = "192")]
        audio_quality: AudioBitrate,

        /// Skip the metadata preview before starting
        #[arg(long)]
        no_preview: bool,
    },

    /// List past completed downloads
    History {
        /// Maximum number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Attach to the live status channel and render whatever the server is doing
    Watch,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
