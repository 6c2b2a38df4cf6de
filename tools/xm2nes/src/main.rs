//! xm2nes - XM to NES sound-driver converter
//!
//! Reads a FastTracker 2 module and writes the driver's pattern data, pattern
//! table and song header as assembler source.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use nes_score::{ConvertOptions, Song, asm};
use std::fs::File;
use std::io::{self, BufWriter, Write};

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let data = std::fs::read(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    let module = nes_xm::parse_xm(&data)
        .with_context(|| format!("Failed to parse {}", cli.input.display()))?;

    tracing::info!(
        "{:?}: {} channels, {} patterns, {} positions, speed {}",
        module.name,
        module.num_channels,
        module.num_patterns,
        module.song_length,
        module.default_speed
    );

    let options = ConvertOptions {
        label_prefix: cli.label_prefix(),
        channels: cli.channels,
    };
    tracing::info!("Converting channels {}", options.channels);

    let score = nes_score::convert(&Song::from(&module), &options)
        .with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            asm::write_asm(&score, &mut out)?;
            out.flush()?;
            tracing::info!("Wrote {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            asm::write_asm(&score, &mut out)?;
            out.flush()?;
        }
    }

    Ok(())
}
