//! tailwatch: follow a file and copy what is appended to stdout.
//!
//! Waits for the file if it does not exist yet, rewinds when it is
//! truncated, and picks it up again by name after it is rotated away.

mod cli;
mod tail;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tailwatch_config::TailwatchConfig;
use tailwatch_core::{FileWatcher, NotifyEventSource};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

use crate::tail::Tailer;

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    let loaded = tailwatch_config::load_config(args.config.as_deref());
    let level = args
        .log_level
        .clone()
        .or_else(|| {
            loaded
                .as_ref()
                .ok()
                .map(|c| c.logging.level.as_str().to_string())
        })
        .unwrap_or_else(|| "info".into());
    init_logging(&level);

    tracing::info!("tailwatch v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!("config load failed, using defaults: {e}");
        TailwatchConfig::default()
    });
    args.apply(&mut config.tail);

    if args.print_config {
        return match tailwatch_config::to_toml(&config) {
            Ok(text) => {
                print!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("{e}");
                ExitCode::FAILURE
            }
        };
    }
    let Some(file) = args.file else {
        tracing::error!("no file to follow");
        return ExitCode::FAILURE;
    };

    match run(file, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; stdout carries the followed file's bytes.
fn init_logging(level: &str) {
    let directive: Directive = level
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();
}

async fn run(file: PathBuf, config: TailwatchConfig) -> tailwatch_common::Result<()> {
    let source = Arc::new(NotifyEventSource::new(config.watcher.event_capacity)?);
    let watcher = FileWatcher::new(&file, source.clone())?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupted, shutting down");
                cancel.cancel();
            }
        }
    });

    let tailer = Tailer::new(watcher, config.tail);
    let mut stdout = tokio::io::stdout();
    let result = tailer.run(&mut stdout, &cancel).await;

    source.close();
    result
}
