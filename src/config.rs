use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::ingest::CameraConfig;
use crate::zone::ZonePolicy;

const DEFAULT_DEVICE: &str = "stub://camera";
const DEFAULT_TARGET_FPS: u32 = 30;
const DEFAULT_WIDTH: u32 = 1280;
const DEFAULT_HEIGHT: u32 = 720;
const DEFAULT_BACKEND: &str = "stub";
const DEFAULT_INPUT_SIZE: u32 = 640;
const DEFAULT_CONFIDENCE: f32 = 0.5;
const DEFAULT_IOU: f32 = 0.7;
const DEFAULT_LABELS: [&str; 3] = ["paper", "rock", "scissors"];

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RefereeConfigFile {
    capture: Option<CaptureConfigFile>,
    classifier: Option<ClassifierConfigFile>,
    zones: Option<ZonesConfigFile>,
    display: Option<DisplayConfigFile>,
    max_frames: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct CaptureConfigFile {
    device: Option<String>,
    target_fps: Option<u32>,
    frame_limit: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ClassifierConfigFile {
    backend: Option<String>,
    model_path: Option<PathBuf>,
    input_size: Option<u32>,
    confidence: Option<f32>,
    iou_threshold: Option<f32>,
    labels: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ZonesConfigFile {
    policy: Option<ZonePolicy>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct DisplayConfigFile {
    snapshot_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct RefereeConfig {
    pub capture: CameraConfig,
    pub classifier: ClassifierSettings,
    pub zone_policy: ZonePolicy,
    pub snapshot_path: Option<PathBuf>,
    pub max_frames: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierSettings {
    pub backend: String,
    pub model_path: Option<PathBuf>,
    pub input_size: u32,
    pub confidence: f32,
    pub iou_threshold: f32,
    pub labels: Vec<String>,
}

impl RefereeConfig {
    /// Load from `RPS_CONFIG` (if set), apply environment overrides, then
    /// the requested capture resolution, and validate.
    pub fn load(resolution: (u32, u32)) -> Result<Self> {
        let config_path = std::env::var("RPS_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) if !path.trim().is_empty() => Some(read_config_file(Path::new(path))?),
            _ => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.capture.width = resolution.0;
        cfg.capture.height = resolution.1;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: RefereeConfigFile) -> Self {
        let capture = file.capture.unwrap_or_default();
        let classifier = file.classifier.unwrap_or_default();
        Self {
            capture: CameraConfig {
                device: capture.device.unwrap_or_else(|| DEFAULT_DEVICE.to_string()),
                target_fps: capture.target_fps.unwrap_or(DEFAULT_TARGET_FPS),
                width: DEFAULT_WIDTH,
                height: DEFAULT_HEIGHT,
                frame_limit: capture.frame_limit,
            },
            classifier: ClassifierSettings {
                backend: classifier
                    .backend
                    .unwrap_or_else(|| DEFAULT_BACKEND.to_string()),
                model_path: classifier.model_path,
                input_size: classifier.input_size.unwrap_or(DEFAULT_INPUT_SIZE),
                confidence: classifier.confidence.unwrap_or(DEFAULT_CONFIDENCE),
                iou_threshold: classifier.iou_threshold.unwrap_or(DEFAULT_IOU),
                labels: classifier
                    .labels
                    .unwrap_or_else(|| DEFAULT_LABELS.map(String::from).to_vec()),
            },
            zone_policy: file.zones.and_then(|z| z.policy).unwrap_or_default(),
            snapshot_path: file.display.and_then(|d| d.snapshot_path),
            max_frames: file.max_frames,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(device) = env_nonempty("RPS_DEVICE") {
            self.capture.device = device;
        }
        if let Some(backend) = env_nonempty("RPS_BACKEND") {
            self.classifier.backend = backend;
        }
        if let Some(path) = env_nonempty("RPS_MODEL_PATH") {
            self.classifier.model_path = Some(PathBuf::from(path));
        }
        if let Some(confidence) = env_nonempty("RPS_CONFIDENCE") {
            self.classifier.confidence = confidence
                .parse()
                .map_err(|_| anyhow!("RPS_CONFIDENCE must be a number between 0 and 1"))?;
        }
        if let Some(policy) = env_nonempty("RPS_ZONE_POLICY") {
            self.zone_policy = policy.parse()?;
        }
        if let Some(path) = env_nonempty("RPS_SNAPSHOT_PATH") {
            self.snapshot_path = Some(PathBuf::from(path));
        }
        if let Some(frames) = env_nonempty("RPS_MAX_FRAMES") {
            let frames: u64 = frames
                .parse()
                .map_err(|_| anyhow!("RPS_MAX_FRAMES must be a whole number of frames"))?;
            self.max_frames = Some(frames);
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        if self.capture.width == 0 || self.capture.height == 0 {
            return Err(anyhow!("webcam resolution must be non-zero"));
        }
        let c = &mut self.classifier;
        if !(c.confidence > 0.0 && c.confidence <= 1.0) {
            return Err(anyhow!("classifier confidence must be in (0, 1]"));
        }
        if !(c.iou_threshold > 0.0 && c.iou_threshold <= 1.0) {
            return Err(anyhow!("classifier iou_threshold must be in (0, 1]"));
        }
        if c.input_size == 0 {
            return Err(anyhow!("classifier input_size must be greater than zero"));
        }
        c.labels = c
            .labels
            .iter()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();
        if c.labels.is_empty() {
            return Err(anyhow!("classifier labels must not be empty"));
        }
        c.backend = c.backend.trim().to_lowercase();
        if c.backend == "tract" && c.model_path.is_none() {
            return Err(anyhow!("the tract backend requires classifier.model_path"));
        }
        Ok(())
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn read_config_file(path: &Path) -> Result<RefereeConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
