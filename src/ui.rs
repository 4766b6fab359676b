use anyhow::Result;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::{Duration, Instant};

use crate::frame::Frame;
use crate::present::{DrawOp, Presenter};
use crate::referee::FrameReport;
use crate::zone::{Zone, ZoneAssignment};

#[derive(Clone, Copy, Debug)]
pub enum UiMode {
    Auto,
    Plain,
    Pretty,
}

#[derive(Clone, Debug)]
pub struct Ui {
    mode: UiMode,
    is_tty: bool,
}

impl Ui {
    pub fn new(mode: UiMode, is_tty: bool) -> Self {
        Self { mode, is_tty }
    }

    pub fn from_env(is_tty: bool) -> Self {
        let mode = match std::env::var("RPS_UI").ok().as_deref() {
            Some("plain") => UiMode::Plain,
            Some("pretty") => UiMode::Pretty,
            _ => UiMode::Auto,
        };
        Self::new(mode, is_tty)
    }

    fn use_pretty(&self) -> bool {
        self.is_tty
            && match self.mode {
                UiMode::Pretty | UiMode::Auto => true,
                UiMode::Plain => false,
            }
    }

    pub fn stage(&self, name: &str) -> StageGuard {
        if self.use_pretty() {
            let spinner = spinner();
            spinner.set_message(format!("{name}…"));
            StageGuard::new(name.to_string(), Some(spinner))
        } else {
            eprintln!("==> {}", name);
            StageGuard::new(name.to_string(), None)
        }
    }

    /// Live scoreboard presenter for the referee loop.
    pub fn scoreboard(&self) -> ConsolePresenter {
        let spinner = self.use_pretty().then(spinner);
        ConsolePresenter {
            spinner,
            frames: 0,
        }
    }
}

fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_draw_target(ProgressDrawTarget::stderr());
    spinner.enable_steady_tick(Duration::from_millis(120));
    let style = ProgressStyle::with_template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner
}

pub struct StageGuard {
    name: String,
    start: Instant,
    spinner: Option<ProgressBar>,
}

impl StageGuard {
    fn new(name: String, spinner: Option<ProgressBar>) -> Self {
        Self {
            name,
            start: Instant::now(),
            spinner,
        }
    }
}

impl Drop for StageGuard {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        let message = format!("✔ {} ({})", self.name, format_duration(elapsed));
        if let Some(spinner) = &self.spinner {
            spinner.finish_with_message(message);
        } else {
            eprintln!("{message}");
        }
    }
}

/// Prints the running score to the terminal.
///
/// With a TTY the status line is redrawn in place every frame; otherwise a
/// line is printed per resolved round.
pub struct ConsolePresenter {
    spinner: Option<ProgressBar>,
    frames: u64,
}

impl ConsolePresenter {
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Presenter for ConsolePresenter {
    fn present(&mut self, _frame: &Frame, report: &FrameReport, _ops: &[DrawOp]) -> Result<()> {
        self.frames += 1;
        let status = status_line(report);
        match (&self.spinner, report.outcome()) {
            (Some(spinner), Some(outcome)) => {
                spinner.println(format!("{} {}", outcome.banner(), scores(report)));
                spinner.set_message(status);
            }
            (Some(spinner), None) => spinner.set_message(status),
            (None, Some(outcome)) => eprintln!("{} {}", outcome.banner(), scores(report)),
            (None, None) => {}
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        Ok(())
    }
}

fn scores(report: &FrameReport) -> String {
    format!(
        "[{} {} - {} {}]",
        Zone::Left,
        report.score.score_left,
        report.score.score_right,
        Zone::Right
    )
}

/// One-line summary of a frame for the live status display.
pub fn status_line(report: &FrameReport) -> String {
    let cooldown = if report.cooldown_remaining > 0 {
        format!("cooldown {}", report.cooldown_remaining)
    } else {
        "ready".to_string()
    };
    format!(
        "{}: {} | {}: {} | {} | {}",
        Zone::Left,
        zone_label(&report.zones, Zone::Left),
        Zone::Right,
        zone_label(&report.zones, Zone::Right),
        scores(report),
        cooldown
    )
}

fn zone_label(zones: &ZoneAssignment, zone: Zone) -> &str {
    zones.get(zone).map(|e| e.label.as_str()).unwrap_or("-")
}

fn format_duration(duration: Duration) -> String {
    if duration.as_secs() >= 1 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{BoundingBox, Detection, DetectionResult};
    use crate::referee::Referee;
    use crate::zone::ZonePolicy;

    #[test]
    fn status_line_reports_zones_and_cooldown() {
        let frame = Frame::solid(1280, 720, [0, 0, 0], 1).unwrap();
        let mut referee = Referee::new(ZonePolicy::Last, 0.5);
        let dets = vec![Detection::new(
            "rock",
            0.9,
            BoundingBox::centered(200, 360, 100, 100),
        )];
        let report = referee.apply(&frame, DetectionResult::new(dets));
        assert_eq!(
            status_line(&report),
            "Zone 1: rock | Zone 2: - | [Zone 1 0 - 0 Zone 2] | ready"
        );
    }

    #[test]
    fn plain_scoreboard_counts_frames() {
        let ui = Ui::new(UiMode::Plain, false);
        let mut presenter = ui.scoreboard();
        let frame = Frame::solid(64, 48, [0, 0, 0], 1).unwrap();
        let mut referee = Referee::new(ZonePolicy::Last, 0.5);
        let report = referee.apply(&frame, DetectionResult::default());
        presenter.present(&frame, &report, &[]).unwrap();
        presenter.finish().unwrap();
        assert_eq!(presenter.frames(), 1);
    }

    #[test]
    fn durations_format_by_magnitude() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }
}
