use std::path::PathBuf;
use std::sync::Mutex;

use tempfile::NamedTempFile;

use rps_referee::config::RefereeConfig;
use rps_referee::ZonePolicy;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "RPS_CONFIG",
        "RPS_DEVICE",
        "RPS_BACKEND",
        "RPS_MODEL_PATH",
        "RPS_CONFIDENCE",
        "RPS_ZONE_POLICY",
        "RPS_SNAPSHOT_PATH",
        "RPS_MAX_FRAMES",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "capture": {
            "device": "/dev/video2",
            "target_fps": 15
        },
        "classifier": {
            "backend": "stub",
            "input_size": 320,
            "confidence": 0.6,
            "labels": ["Paper", "Rock", "Scissors"]
        },
        "zones": {
            "policy": "highest-confidence"
        },
        "display": {
            "snapshot_path": "/tmp/round.jpg"
        }
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("RPS_CONFIG", file.path());
    std::env::set_var("RPS_DEVICE", "stub://override");
    std::env::set_var("RPS_CONFIDENCE", "0.75");
    std::env::set_var("RPS_MAX_FRAMES", "900");

    let cfg = RefereeConfig::load((800, 600)).expect("load config");

    assert_eq!(cfg.capture.device, "stub://override");
    assert_eq!(cfg.capture.target_fps, 15);
    assert_eq!((cfg.capture.width, cfg.capture.height), (800, 600));
    assert_eq!(cfg.classifier.backend, "stub");
    assert_eq!(cfg.classifier.input_size, 320);
    assert_eq!(cfg.classifier.confidence, 0.75);
    assert_eq!(cfg.classifier.labels, vec!["paper", "rock", "scissors"]);
    assert_eq!(cfg.zone_policy, ZonePolicy::HighestConfidence);
    assert_eq!(cfg.snapshot_path, Some(PathBuf::from("/tmp/round.jpg")));
    assert_eq!(cfg.max_frames, Some(900));

    clear_env();
}

#[test]
fn defaults_apply_without_config_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = RefereeConfig::load((1280, 720)).expect("load config");
    assert_eq!(cfg.capture.device, "stub://camera");
    assert_eq!(cfg.classifier.backend, "stub");
    assert_eq!(cfg.classifier.confidence, 0.5);
    assert_eq!(cfg.zone_policy, ZonePolicy::Last);
    assert!(cfg.max_frames.is_none());
}

#[test]
fn invalid_env_values_are_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("RPS_ZONE_POLICY", "loudest");
    assert!(RefereeConfig::load((1280, 720)).is_err());
    clear_env();

    std::env::set_var("RPS_CONFIDENCE", "high");
    assert!(RefereeConfig::load((1280, 720)).is_err());
    clear_env();

    std::env::set_var("RPS_BACKEND", "tract");
    assert!(RefereeConfig::load((1280, 720)).is_err());
    clear_env();

    assert!(RefereeConfig::load((0, 720)).is_err());
}
