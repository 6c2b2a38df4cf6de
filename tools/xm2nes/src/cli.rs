//! CLI definition using clap

use clap::Parser;
use nes_score::ChannelMask;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "xm2nes")]
#[command(about = "Convert an XM module into NES sound-driver assembler source")]
#[command(version)]
pub struct Cli {
    /// Path to the XM file
    pub input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Hardware channels to convert, e.g. 0,1,2
    #[arg(short, long, default_value = "0,1,2,3,4")]
    pub channels: ChannelMask,

    /// Label prefix (defaults to the input file name followed by `_`)
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Log progress and module details
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Label prefix to use for this run
    pub fn label_prefix(&self) -> String {
        self.prefix
            .clone()
            .unwrap_or_else(|| default_prefix(&self.input))
    }
}

fn default_prefix(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{stem}_")
}
