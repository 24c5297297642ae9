use clap::Parser;
use std::path::PathBuf;
use tailwatch_config::TailConfig;

/// tailwatch — follow a file as it grows, is truncated, or is replaced.
#[derive(Parser, Debug)]
#[command(name = "tailwatch", version, about)]
pub struct Args {
    /// File to follow. It does not have to exist yet.
    #[arg(required_unless_present = "print_config")]
    pub file: Option<PathBuf>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Stop once the file is deleted or renamed instead of waiting for it
    /// to come back.
    #[arg(long)]
    pub no_follow_name: bool,

    /// Print the whole file before following it.
    #[arg(long)]
    pub from_start: bool,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    /// Let command-line flags override the config file.
    pub fn apply(&self, tail: &mut TailConfig) {
        if self.no_follow_name {
            tail.follow_name = false;
        }
        if self.from_start {
            tail.from_start = true;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
