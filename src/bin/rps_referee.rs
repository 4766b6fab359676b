//! rps_referee - two-player rock-paper-scissors refereed from a webcam
//!
//! Each loop iteration:
//! 1. Reads a frame from the camera (blocking)
//! 2. Classifies hand gestures with the configured backend
//! 3. Assigns one gesture per zone and resolves a round when allowed
//! 4. Hands the annotated result to the presenters
//!
//! Ctrl-C ends the loop. A failed frame read also ends it, with exit code 0.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(feature = "snapshot-jpeg")]
use rps_referee::present::SnapshotPresenter;
use rps_referee::{
    config::RefereeConfig, overlay, ui::Ui, BackendRegistry, CameraSource, Presenter, Referee,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Rock-paper-scissors referee with two webcam zones")]
struct Args {
    /// Webcam resolution: width height.
    #[arg(
        long,
        num_args = 2,
        value_names = ["WIDTH", "HEIGHT"],
        default_values_t = [1280u32, 720u32]
    )]
    webcam_resolution: Vec<u32>,
}

impl Args {
    fn resolution(&self) -> Result<(u32, u32)> {
        match self.webcam_resolution.as_slice() {
            [width, height] => Ok((*width, *height)),
            _ => Err(anyhow!("--webcam-resolution takes exactly WIDTH and HEIGHT")),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = RefereeConfig::load(args.resolution()?)?;
    let ui = Ui::from_env(std::io::stderr().is_terminal());

    let mut backend = {
        let _stage = ui.stage("load classifier");
        let mut backend = BackendRegistry::builtin().build(&cfg.classifier)?;
        backend.warm_up()?;
        backend
    };

    let mut source = {
        let _stage = ui.stage("open camera");
        let mut source = CameraSource::new(cfg.capture.clone())?;
        source.connect()?;
        source
    };
    let (width, height) = source.resolution();

    let quit = Arc::new(AtomicBool::new(false));
    {
        let quit = quit.clone();
        ctrlc::set_handler(move || quit.store(true, Ordering::SeqCst))?;
    }

    let mut presenters: Vec<Box<dyn Presenter>> = vec![Box::new(ui.scoreboard())];
    presenters.extend(snapshot_presenter(&cfg));

    log::info!(
        "rps_referee running: device={} {}x{} backend={} policy={:?}",
        cfg.capture.device,
        width,
        height,
        cfg.classifier.backend,
        cfg.zone_policy
    );
    log::info!("press Ctrl-C to quit");

    let mut referee = Referee::new(cfg.zone_policy, cfg.classifier.confidence);
    let mut frames = 0u64;

    loop {
        if quit.load(Ordering::SeqCst) {
            log::info!("quit requested");
            break;
        }
        if cfg.max_frames.is_some_and(|max| frames >= max) {
            log::info!("frame budget of {} reached", frames);
            break;
        }

        let frame = match source.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("capture ended: {:#}", e);
                break;
            }
        };
        frames += 1;

        let report = match referee.process(&frame, backend.as_mut()) {
            Ok(report) => report,
            Err(e) => {
                log::warn!("frame {} skipped: {:#}", frame.sequence, e);
                continue;
            }
        };

        let ops = overlay(&report);
        for presenter in presenters.iter_mut() {
            if let Err(e) = presenter.present(&frame, &report, &ops) {
                log::warn!("presenter failed on frame {}: {:#}", frame.sequence, e);
            }
        }
    }

    for presenter in presenters.iter_mut() {
        presenter.finish()?;
    }
    let stats = source.stats();
    log::info!(
        "camera {} closed after {} frames",
        stats.device,
        stats.frames_captured
    );
    drop(source);

    let score = referee.score();
    log::info!(
        "final score: Zone 1 {} - {} Zone 2 ({} rounds, {} frames)",
        score.score_left,
        score.score_right,
        referee.session().rounds_played,
        frames
    );
    Ok(())
}

#[cfg(feature = "snapshot-jpeg")]
fn snapshot_presenter(cfg: &RefereeConfig) -> Option<Box<dyn Presenter>> {
    let path = cfg.snapshot_path.as_ref()?;
    log::info!("writing round snapshots to {}", path.display());
    Some(Box::new(SnapshotPresenter::new(path.clone())))
}

#[cfg(not(feature = "snapshot-jpeg"))]
fn snapshot_presenter(cfg: &RefereeConfig) -> Option<Box<dyn Presenter>> {
    if cfg.snapshot_path.is_some() {
        log::warn!("snapshot_path ignored: built without the snapshot-jpeg feature");
    }
    None
}
