use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quietcut")]
#[command(author, version, about = "Silence-based video trimming driven by ffmpeg")]
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
    /// Detect silences in a video and store the clips to keep
    CreateDatabase {
        /// Input video; the database is written next to it as <stem>.db
        #[arg(required = true)]
        input: PathBuf,

        /// Noise floor in dB below which audio counts as silence
        #[arg(long, allow_negative_numbers = true)]
        threshold: Option<f64>,

        /// Shortest silence to cut, in seconds
        #[arg(long)]
        duration: Option<f64>,

        /// Table of contents CSV (header row, then timestamp,text)
        #[arg(long)]
        toc: Option<PathBuf>,

        /// Image shown at the start of the output
        #[arg(long)]
        thumbnail: Option<PathBuf>,

        /// Where to write the chapter listing ("-" for stdout)
        #[arg(long)]
        toc_out: Option<PathBuf>,

        /// Drop audible intervals starting at or before this timestamp
        #[arg(long)]
        start: Option<String>,

        /// Drop audible intervals ending at or after this timestamp
        #[arg(long)]
        end: Option<String>,
    },

    /// Print the chapter listing of a stored database
    CreateToc {
        /// Database written by create-database
        #[arg(required = true)]
        database: PathBuf,

        /// Where to write the chapter listing ("-" for stdout)
        #[arg(long)]
        toc_out: Option<PathBuf>,
    },

    /// Render every stored clip and write the concat manifest
    CreateClips {
        /// Database written by create-database
        #[arg(required = true)]
        database: PathBuf,

        /// Render into a new temporary directory instead of <stem>/
        #[arg(long)]
        tmpdir: bool,

        /// Print the commands without running them
        #[arg(long)]
        dry_run: bool,

        /// Join the rendered clips into this file
        #[arg(long)]
        concat: Option<PathBuf>,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Display version information
    Version,
}
