use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rbw",
    about = "RFID batch → MIFARE writer",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Station config file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Use the in-memory card instead of a PC/SC reader
    #[arg(long, global = true)]
    pub simulate: bool,

    /// Reader name; defaults to the first reader found
    #[arg(long, global = true)]
    pub reader: Option<String>,

    /// Sector key A as 12 hex digits
    #[arg(long, global = true)]
    pub key: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List card readers
    Readers(ReadersArgs),
    /// Resolve one RFID tag to its article
    Lookup(LookupArgs),
    /// Read tags from stdin, one per line, and build a batch
    Scan(ScanArgs),
    /// Scan the given tags and write the batch to the card
    Write(WriteArgs),
    /// Read one block from the card
    Read(ReadArgs),
    /// Show the effective configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ReadersArgs {}

#[derive(Args)]
pub struct LookupArgs {
    pub tag: String,
}

#[derive(Args)]
pub struct ScanArgs {
    /// First block of a write
    #[arg(short = 'b', long, allow_negative_numbers = true)]
    pub start_block: Option<i64>,
    /// Write the batch to the card when input ends
    #[arg(long)]
    pub write: bool,
}

#[derive(Args)]
pub struct WriteArgs {
    /// First block of the write
    #[arg(short = 'b', long, allow_negative_numbers = true)]
    pub start_block: Option<i64>,
    #[arg(required = true)]
    pub tags: Vec<String>,
}

#[derive(Args)]
pub struct ReadArgs {
    pub block: u32,
}

#[derive(Args)]
pub struct ConfigArgs {}
