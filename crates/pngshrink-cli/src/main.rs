use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pngshrink_core::encode::OutputFormat;

mod convert;
mod inspect;

#[derive(Parser)]
#[command(name = "pngshrink")]
#[command(about = "Convert PNG images to JPEG or WebP under a maximum file size")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert PNG files (or folders of PNG files)
    Convert {
        /// PNG files and/or folders containing PNG files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output folder (defaults to the selected folder, or the first file's folder)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: "jpeg" or "webp"
        #[arg(short, long, default_value = "jpeg")]
        format: OutputFormat,

        /// Maximum output size in megabytes
        #[arg(short = 's', long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..=10))]
        max_size_mb: u32,

        /// Starting (highest) quality, 1-100
        #[arg(short, long, default_value_t = 100, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: u8,

        /// Worker threads (0 = one per CPU)
        #[arg(short, long, default_value_t = 0)]
        jobs: usize,
    },
    /// Show dimensions, channels, and size of an image
    Info {
        /// Image file to inspect
        file: PathBuf,
    },
    /// Write a preview thumbnail that fits a bounding box
    Preview {
        /// Image file to preview
        file: PathBuf,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        /// Maximum preview width in pixels
        #[arg(long, default_value_t = 300, value_parser = clap::value_parser!(u32).range(1..))]
        max_width: u32,

        /// Maximum preview height in pixels
        #[arg(long, default_value_t = 300, value_parser = clap::value_parser!(u32).range(1..))]
        max_height: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Convert {
            inputs,
            output,
            format,
            max_size_mb,
            quality,
            jobs,
        } => convert::run(convert::ConvertArgs {
            inputs,
            output,
            format,
            max_size_mb,
            quality,
            jobs,
        }),
        Commands::Info { file } => inspect::run_info(&file),
        Commands::Preview {
            file,
            output,
            max_width,
            max_height,
        } => inspect::run_preview(&file, &output, max_width, max_height),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pngshrink=info,pngshrink_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_target(false))
        .init();
}
