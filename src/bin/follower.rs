//! follower - visual-servoing client for the simulator server.
//!
//! Connects to the server, receives image frames, runs the configured
//! detector and selection strategy, and answers each frame with a
//! two-axis motion command.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use follower_client::{
    BackendRegistry, FollowerConfig, FollowerPipeline, SelectionStrategy, Session, Smoother,
    StrategyKind, StubBackend, ZoneController,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Simulator server address (host:port).
    #[arg(long)]
    addr: Option<String>,
    /// Detector backend name.
    #[arg(long)]
    detector: Option<String>,
    /// Target-selection strategy: confidence, color, or identity.
    #[arg(long)]
    strategy: Option<String>,
    /// Minimum subject height as a fraction of image height.
    #[arg(long)]
    min_bound: Option<f64>,
    /// Maximum subject height as a fraction of image height.
    #[arg(long)]
    max_bound: Option<f64>,
    /// Left dead-band edge as a fraction of image width.
    #[arg(long)]
    left_bound: Option<f64>,
    /// Right dead-band edge as a fraction of image width.
    #[arg(long)]
    right_bound: Option<f64>,
    /// Minimum green ratio for the color strategy.
    #[arg(long)]
    green_threshold: Option<f64>,
    /// Maximum frames to coast on a stale box (unbounded when omitted).
    #[arg(long)]
    max_coast: Option<u32>,
    /// Path to a JSON config file (overrides FOLLOWER_CONFIG).
    #[arg(long)]
    config: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Some(path) = &args.config {
        std::env::set_var("FOLLOWER_CONFIG", path);
    }

    let mut cfg = FollowerConfig::load()?;
    apply_args(&mut cfg, &args)?;
    cfg.validate()?;

    let mut registry = BackendRegistry::new();
    registry.register(StubBackend::new());

    let mut backend = registry.take(Some(cfg.detector.as_str()))?;
    backend.warm_up().context("detector warm-up failed")?;

    let strategy = SelectionStrategy::from_kind(cfg.strategy, cfg.green_threshold);
    let pipeline = FollowerPipeline::new(
        backend,
        strategy,
        Smoother::new(cfg.max_coast_frames),
        ZoneController::new(cfg.bounds),
        cfg.min_confidence,
    );

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            cancel.store(true, Ordering::SeqCst);
        })
        .context("failed to install ctrl-c handler")?;
    }

    log::info!(
        "follower client starting: detector={} strategy={} bounds=[min={}, max={}, left={}, right={}]",
        pipeline.backend_name(),
        cfg.strategy.as_str(),
        cfg.bounds.min_bound,
        cfg.bounds.max_bound,
        cfg.bounds.left_bound,
        cfg.bounds.right_bound,
    );

    let session = Session::connect(&cfg.server_addr, cfg.io_timeout, pipeline, cancel)?;
    session.run()?;

    log::info!("session finished");
    Ok(())
}

fn apply_args(cfg: &mut FollowerConfig, args: &Args) -> Result<()> {
    if let Some(addr) = &args.addr {
        cfg.server_addr = addr.clone();
    }
    if let Some(detector) = &args.detector {
        cfg.detector = detector.clone();
    }
    if let Some(strategy) = &args.strategy {
        cfg.strategy = strategy.parse::<StrategyKind>()?;
    }
    if let Some(min) = args.min_bound {
        cfg.bounds.min_bound = min;
    }
    if let Some(max) = args.max_bound {
        cfg.bounds.max_bound = max;
    }
    if let Some(left) = args.left_bound {
        cfg.bounds.left_bound = left;
    }
    if let Some(right) = args.right_bound {
        cfg.bounds.right_bound = right;
    }
    if let Some(threshold) = args.green_threshold {
        cfg.green_threshold = threshold;
    }
    if let Some(frames) = args.max_coast {
        cfg.max_coast_frames = Some(frames);
    }
    Ok(())
}
