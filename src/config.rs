use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::zone::ZoneBounds;

const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:2737";
const DEFAULT_DETECTOR: &str = "stub";
const DEFAULT_GREEN_THRESHOLD: f64 = 0.2;
const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;

/// Which target-selection strategy the session runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyKind {
    Confidence,
    ColorOverlap,
    IdentityLock,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Confidence => "confidence",
            StrategyKind::ColorOverlap => "color",
            StrategyKind::IdentityLock => "identity",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "confidence" => Ok(StrategyKind::Confidence),
            "color" => Ok(StrategyKind::ColorOverlap),
            "identity" => Ok(StrategyKind::IdentityLock),
            other => Err(anyhow!(
                "unknown strategy '{}' (expected confidence, color, or identity)",
                other
            )),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct FollowerConfigFile {
    server_addr: Option<String>,
    detector: Option<String>,
    strategy: Option<String>,
    bounds: Option<BoundsConfigFile>,
    selection: Option<SelectionConfigFile>,
    max_coast_frames: Option<u32>,
    io_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct BoundsConfigFile {
    min: Option<f64>,
    max: Option<f64>,
    left: Option<f64>,
    right: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct SelectionConfigFile {
    green_threshold: Option<f64>,
    min_confidence: Option<f64>,
}

/// Resolved session configuration. Immutable once the session starts.
#[derive(Debug, Clone)]
pub struct FollowerConfig {
    pub server_addr: String,
    pub detector: String,
    pub strategy: StrategyKind,
    pub bounds: ZoneBounds,
    pub green_threshold: f64,
    pub min_confidence: f64,
    pub max_coast_frames: Option<u32>,
    pub io_timeout: Option<Duration>,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            detector: DEFAULT_DETECTOR.to_string(),
            strategy: StrategyKind::Confidence,
            bounds: ZoneBounds::default(),
            green_threshold: DEFAULT_GREEN_THRESHOLD,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            max_coast_frames: None,
            io_timeout: None,
        }
    }
}

impl FollowerConfig {
    /// Load from the JSON file named by `FOLLOWER_CONFIG` (if any), then
    /// apply env overrides, then validate.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("FOLLOWER_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: FollowerConfigFile) -> Result<Self> {
        let defaults = Self::default();
        let bounds_file = file.bounds.unwrap_or_default();
        let selection = file.selection.unwrap_or_default();
        let strategy = match file.strategy {
            Some(raw) => raw.parse()?,
            None => defaults.strategy,
        };
        Ok(Self {
            server_addr: file.server_addr.unwrap_or(defaults.server_addr),
            detector: file.detector.unwrap_or(defaults.detector),
            strategy,
            bounds: ZoneBounds {
                min_bound: bounds_file.min.unwrap_or(defaults.bounds.min_bound),
                max_bound: bounds_file.max.unwrap_or(defaults.bounds.max_bound),
                left_bound: bounds_file.left.unwrap_or(defaults.bounds.left_bound),
                right_bound: bounds_file.right.unwrap_or(defaults.bounds.right_bound),
            },
            green_threshold: selection
                .green_threshold
                .unwrap_or(defaults.green_threshold),
            min_confidence: selection.min_confidence.unwrap_or(defaults.min_confidence),
            max_coast_frames: file.max_coast_frames,
            io_timeout: file.io_timeout_secs.map(Duration::from_secs),
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(addr) = std::env::var("FOLLOWER_ADDR") {
            if !addr.trim().is_empty() {
                self.server_addr = addr;
            }
        }
        if let Ok(detector) = std::env::var("FOLLOWER_DETECTOR") {
            if !detector.trim().is_empty() {
                self.detector = detector;
            }
        }
        if let Ok(strategy) = std::env::var("FOLLOWER_STRATEGY") {
            if !strategy.trim().is_empty() {
                self.strategy = strategy.parse()?;
            }
        }
        if let Ok(frames) = std::env::var("FOLLOWER_MAX_COAST") {
            let frames: u32 = frames
                .parse()
                .map_err(|_| anyhow!("FOLLOWER_MAX_COAST must be an integer frame count"))?;
            self.max_coast_frames = Some(frames);
        }
        if let Ok(secs) = std::env::var("FOLLOWER_IO_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| anyhow!("FOLLOWER_IO_TIMEOUT_SECS must be an integer"))?;
            self.io_timeout = Some(Duration::from_secs(secs));
        }
        Ok(())
    }

    /// Reject fractions that cannot describe a dead-band.
    pub fn validate(&self) -> Result<()> {
        let b = &self.bounds;
        if !(0.0..=1.0).contains(&b.left_bound)
            || !(0.0..=1.0).contains(&b.right_bound)
            || b.left_bound >= b.right_bound
        {
            return Err(anyhow!(
                "horizontal bounds must satisfy 0 <= left < right <= 1 (got {} and {})",
                b.left_bound,
                b.right_bound
            ));
        }
        if !(b.min_bound > 0.0 && b.min_bound <= b.max_bound && b.max_bound <= 1.0) {
            return Err(anyhow!(
                "vertical bounds must satisfy 0 < min <= max <= 1 (got {} and {})",
                b.min_bound,
                b.max_bound
            ));
        }
        if !(0.0..=1.0).contains(&self.green_threshold) {
            return Err(anyhow!("green_threshold must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(anyhow!("min_confidence must be in [0, 1]"));
        }
        if self.server_addr.trim().is_empty() {
            return Err(anyhow!("server_addr must not be empty"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<FollowerConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
