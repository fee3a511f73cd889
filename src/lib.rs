// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod matcher;
pub mod watch;

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::validate::pattern_fits_window;
use crate::config::{load_or_default, ConfigFile};
use crate::engine::{spawn_signal_listener, CoreRuntime, LogScanner, Runtime, ShutdownFlag};
use crate::exec::{ActionController, TokioProcessBackend};
use crate::fs::{FileSystem, RealFileSystem};
use crate::matcher::{Pattern, StreamMatcher};
use crate::watch::{DirectoryWatcher, NotifyBackend, WatchTarget};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - pattern compilation
/// - notification backend + directory watcher
/// - action controller with the real process backend
/// - Ctrl-C / SIGTERM handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref(), args.chunk_size)?;
    let pattern = Pattern::compile(args.pattern.as_bytes())?;

    if !pattern_fits_window(&cfg, pattern.len()) {
        warn!(
            pattern_len = pattern.len(),
            chunk_size = cfg.chunk_size(),
            "pattern is longer than chunk_size and will never match"
        );
    }

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    if args.dry_run {
        let target = WatchTarget::resolve(&args.logfile, fs.as_ref())?;
        print_dry_run(&args, &cfg, &target, &pattern);
        return Ok(());
    }

    let backend = NotifyBackend::new()?;
    let watcher = DirectoryWatcher::init(&args.logfile, fs, backend, cfg.start_at_end())?;

    let controller = ActionController::new(args.command.clone(), TokioProcessBackend::new());
    let scanner = LogScanner::new(StreamMatcher::new(pattern), cfg.chunk_size(), controller);
    let core = CoreRuntime::new(watcher, scanner);

    let shutdown = ShutdownFlag::new();
    spawn_signal_listener(shutdown.clone());

    info!(
        logfile = %args.logfile,
        cmd = ?args.command,
        "watching for pattern"
    );

    let runtime = Runtime::new(core, shutdown, cfg.reap_interval());
    let summary = runtime.run().await?;
    debug!(?summary, "run complete");
    Ok(())
}

/// Simple dry-run output: print what would be watched and run.
fn print_dry_run(args: &CliArgs, cfg: &ConfigFile, target: &WatchTarget, pattern: &Pattern) {
    println!("logwatch dry-run");
    println!("  pattern: {:?} ({} bytes)", args.pattern, pattern.len());
    println!("  command: {}", args.command.display());
    println!("  directory: {}", target.dir().display());
    println!("  file: {}", target.file_name().to_string_lossy());
    println!();
    println!("  watch.chunk_size = {}", cfg.chunk_size());
    println!("  watch.reap_interval_ms = {}", cfg.watch().reap_interval_ms);
    println!("  watch.start_at_end = {}", cfg.start_at_end());

    debug!("dry-run complete (no watching)");
}
