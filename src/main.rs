//! `textcast` CLI - Generate speech audio and text video clips

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use textcast::ClipDuration;

#[derive(Parser)]
#[command(name = "textcast")]
#[command(about = "Turn text into speech audio or text-on-background video clips")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/textcast/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize speech audio from text
    Speak {
        /// Text to speak ("-" reads stdin)
        text: String,

        /// Output file (default: unique name in the output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render text onto a colored background as an MP4 clip
    Render {
        /// Text to render ("-" reads stdin)
        text: String,

        /// Background color: palette name or #RRGGBB
        #[arg(short, long, default_value = "black")]
        background: String,

        /// Text color: palette name or #RRGGBB
        #[arg(short, long, default_value = "white")]
        color: String,

        /// Clip length in seconds (5, 10, 15 or 30)
        #[arg(short, long, default_value = "10")]
        duration: ClipDuration,

        /// Output file (default: unique name in the output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that ffmpeg, fonts and the output directory are usable
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let filter = if cli.verbose {
        EnvFilter::new("textcast=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("textcast=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = textcast::Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Speak { text, output } => {
            cmd::speak::cmd_speak(&config, &text, output, cli.json).await?;
        }
        Commands::Render {
            text,
            background,
            color,
            duration,
            output,
        } => {
            cmd::render::cmd_render(
                &config, &text, &background, &color, duration, output, cli.json,
            )
            .await?;
        }
        Commands::Check => {
            cmd::check::cmd_check(&config, cli.json).await?;
        }
    }

    Ok(())
}
