use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(name = "cuemark", version, about = "Group timed captions into marked text")]
pub struct Args {
    /// JSON file with engine settings
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed of the marker RNG
    #[clap(long, global = true)]
    pub seed: Option<u32>,

    /// Bootstrap groups placed before the first real group
    #[clap(long, global = true)]
    pub fake_groups: Option<usize>,

    /// Longest span in seconds kept in one JSON file
    #[clap(long, global = true)]
    pub chunk_duration: Option<f64>,

    /// Log at debug level
    #[clap(short, long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Timed text to SRT
    Srt(Io),
    /// Timed text to marker-keyed JSON, split into parts for long inputs
    Json {
        /// File path, URL or - for stdin
        input: String,

        #[clap(long, default_value = ".")]
        out_dir: PathBuf,

        /// Base file name; defaults to the input's file stem
        #[clap(long)]
        name: Option<String>,

        /// Write one document regardless of length
        #[clap(long)]
        single: bool,
    },
    /// Timed text to labeled paragraphs
    Paragraph {
        #[clap(flatten)]
        io: Io,

        #[clap(long)]
        min: Option<usize>,

        #[clap(long)]
        max: Option<usize>,

        /// Percent chance of splitting a paragraph's last group
        #[clap(long)]
        chance: Option<u32>,
    },
    /// Labeled paragraph text back to group JSON
    Reverse(Io),
}

#[derive(ClapArgs, Debug)]
pub struct Io {
    /// File path, URL or - for stdin
    pub input: String,

    /// Output file; stdout when omitted
    #[clap(long)]
    pub out: Option<PathBuf>,
}
