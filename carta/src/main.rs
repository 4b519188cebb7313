//! Command line interface of carta.

use std::path::PathBuf;

use anyhow::{Context, Result};
use carta::{encode_pbf, render_file, RenderOptions};
use clap::{Parser, Subcommand};

/// Encodes OpenStreetMap extracts into tile files and renders them.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode an `.osm.pbf` extract into a tile file.
    Encode {
        /// Path to the `.osm.pbf` file.
        #[arg(short, long)]
        input: PathBuf,
        /// Path of the tile file to create.
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Render a tile file into a PNG image.
    Render {
        /// Path to the tile file.
        #[arg(short, long)]
        input: PathBuf,
        /// Path of the image to create.
        #[arg(short, long)]
        output: PathBuf,
        /// Width of the image in pixels.
        #[arg(long, default_value_t = RenderOptions::default().width)]
        width: u32,
        /// Height of the image in pixels.
        #[arg(long, default_value_t = RenderOptions::default().height)]
        height: u32,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Encode { input, output } => {
            encode_pbf(&input, &output)
                .with_context(|| format!("failed to encode {}", input.display()))?;
        }
        Command::Render {
            input,
            output,
            width,
            height,
        } => {
            let options = RenderOptions {
                width,
                height,
                ..Default::default()
            };
            render_file(&input, &output, &options)
                .with_context(|| format!("failed to render {}", input.display()))?;
        }
    }

    Ok(())
}
