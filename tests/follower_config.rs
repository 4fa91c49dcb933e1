use std::sync::Mutex;
use std::time::Duration;

use tempfile::NamedTempFile;

use follower_client::{FollowerConfig, StrategyKind};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "FOLLOWER_CONFIG",
        "FOLLOWER_ADDR",
        "FOLLOWER_DETECTOR",
        "FOLLOWER_STRATEGY",
        "FOLLOWER_MAX_COAST",
        "FOLLOWER_IO_TIMEOUT_SECS",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn defaults_without_file_or_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = FollowerConfig::load().expect("load config");
    assert_eq!(cfg.server_addr, "127.0.0.1:2737");
    assert_eq!(cfg.detector, "stub");
    assert_eq!(cfg.strategy, StrategyKind::Confidence);
    assert_eq!(cfg.bounds.min_bound, 0.5);
    assert_eq!(cfg.bounds.max_bound, 0.8);
    assert_eq!(cfg.bounds.left_bound, 0.4);
    assert_eq!(cfg.bounds.right_bound, 0.6);
    assert_eq!(cfg.green_threshold, 0.2);
    assert_eq!(cfg.max_coast_frames, None);
    assert_eq!(cfg.io_timeout, None);
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "server_addr": "10.0.0.5:2737",
        "detector": "stub",
        "strategy": "color",
        "bounds": {
            "min": 0.4,
            "max": 0.9,
            "left": 0.3,
            "right": 0.7
        },
        "selection": {
            "green_threshold": 0.35,
            "min_confidence": 0.6
        },
        "max_coast_frames": 12,
        "io_timeout_secs": 30
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("FOLLOWER_CONFIG", file.path());
    std::env::set_var("FOLLOWER_ADDR", "192.168.1.9:2737");
    std::env::set_var("FOLLOWER_STRATEGY", "identity");

    let cfg = FollowerConfig::load().expect("load config");
    clear_env();

    // Env overrides win over the file.
    assert_eq!(cfg.server_addr, "192.168.1.9:2737");
    assert_eq!(cfg.strategy, StrategyKind::IdentityLock);
    // File values survive where no env override exists.
    assert_eq!(cfg.bounds.left_bound, 0.3);
    assert_eq!(cfg.bounds.right_bound, 0.7);
    assert_eq!(cfg.green_threshold, 0.35);
    assert_eq!(cfg.min_confidence, 0.6);
    assert_eq!(cfg.max_coast_frames, Some(12));
    assert_eq!(cfg.io_timeout, Some(Duration::from_secs(30)));
}

#[test]
fn rejects_inverted_horizontal_bounds() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut cfg = FollowerConfig::load().expect("load config");
    cfg.bounds.left_bound = 0.7;
    cfg.bounds.right_bound = 0.3;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("left < right"));
}

#[test]
fn rejects_vertical_bounds_outside_range() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut cfg = FollowerConfig::load().expect("load config");
    cfg.bounds.min_bound = 0.0;
    assert!(cfg.validate().is_err());

    cfg.bounds.min_bound = 0.9;
    cfg.bounds.max_bound = 0.5;
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_unknown_strategy_string() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("FOLLOWER_STRATEGY", "teleport");
    let err = FollowerConfig::load().unwrap_err();
    clear_env();
    assert!(err.to_string().contains("unknown strategy"));
}
