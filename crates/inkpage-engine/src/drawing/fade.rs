//! Highlighter fade-out and the frame loop that drives it

use std::time::Duration;

use crate::models::{StrokeTool, Timestamp};

/// Time from fade start until a highlighter stroke is removed
pub const HIGHLIGHTER_FADE_DURATION: Duration = Duration::from_millis(1000);
/// Opacity of a highlighter stroke before it starts fading
pub const HIGHLIGHTER_BASE_OPACITY: f64 = 0.5;
pub const PEN_OPACITY: f64 = 1.0;

/// Render opacity of a stroke at `now`
pub fn opacity(tool: StrokeTool, fade_start: Option<Timestamp>, now: Timestamp) -> f64 {
    match (tool, fade_start) {
        (StrokeTool::Pen, _) => PEN_OPACITY,
        (StrokeTool::Highlighter, None) => HIGHLIGHTER_BASE_OPACITY,
        (StrokeTool::Highlighter, Some(start)) => {
            let elapsed = now.saturating_since(start).as_secs_f64();
            let progress = elapsed / HIGHLIGHTER_FADE_DURATION.as_secs_f64();
            (HIGHLIGHTER_BASE_OPACITY * (1.0 - progress)).max(0.0)
        }
    }
}

/// A fading stroke is gone once the full fade duration has elapsed
pub fn is_expired(fade_start: Option<Timestamp>, now: Timestamp) -> bool {
    fade_start.is_some_and(|start| now.saturating_since(start) >= HIGHLIGHTER_FADE_DURATION)
}

/// Host timer delivering one callback per frame until cancelled.
///
/// The host calls back into the engine (`fade_tick`) on every frame while
/// requested.
pub trait FrameScheduler {
    fn request_frames(&mut self);
    fn cancel_frames(&mut self);
}

/// Scheduler for hosts that poll `fade_tick` on their own cadence
impl FrameScheduler for () {
    fn request_frames(&mut self) {}
    fn cancel_frames(&mut self) {}
}

/// Remembers whether frames are currently requested so the host timer is
/// started once per fade episode and stopped once when it ends, however
/// often mode and tool flip in between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FadeLoop {
    running: bool,
}

impl FadeLoop {
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start or stop the host frames to match `needed`. Returns true when
    /// the scheduler was called.
    pub fn sync<S: FrameScheduler + ?Sized>(&mut self, needed: bool, scheduler: &mut S) -> bool {
        match (self.running, needed) {
            (false, true) => {
                log::debug!("Starting fade frame loop");
                scheduler.request_frames();
                self.running = true;
                true
            }
            (true, false) => {
                log::debug!("Stopping fade frame loop");
                scheduler.cancel_frames();
                self.running = false;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Default)]
    struct CountingScheduler {
        requested: usize,
        cancelled: usize,
    }

    impl FrameScheduler for CountingScheduler {
        fn request_frames(&mut self) {
            self.requested += 1;
        }

        fn cancel_frames(&mut self) {
            self.cancelled += 1;
        }
    }

    #[rstest]
    #[case(0, 0.5)]
    #[case(250, 0.375)]
    #[case(500, 0.25)]
    #[case(1000, 0.0)]
    #[case(1500, 0.0)]
    fn test_highlighter_fade_curve(#[case] elapsed_ms: u64, #[case] expected: f64) {
        let start = Timestamp::from_millis(2_000);
        let now = start + Duration::from_millis(elapsed_ms);
        let value = opacity(StrokeTool::Highlighter, Some(start), now);
        assert!((value - expected).abs() < 1e-9, "{value} != {expected}");
    }

    #[test]
    fn test_unfaded_opacities() {
        let now = Timestamp::from_millis(5);
        assert_eq!(opacity(StrokeTool::Pen, None, now), 1.0);
        assert_eq!(opacity(StrokeTool::Highlighter, None, now), 0.5);
    }

    #[test]
    fn test_expiry_boundary() {
        let start = Timestamp::from_millis(0);
        assert!(!is_expired(None, Timestamp::from_millis(10_000)));
        assert!(!is_expired(Some(start), Timestamp::from_millis(999)));
        assert!(is_expired(Some(start), Timestamp::from_millis(1000)));
    }

    #[test]
    fn test_fade_loop_never_double_starts() {
        let mut scheduler = CountingScheduler::default();
        let mut fade_loop = FadeLoop::default();

        for _ in 0..5 {
            fade_loop.sync(true, &mut scheduler);
        }
        assert_eq!(scheduler.requested, 1);

        fade_loop.sync(false, &mut scheduler);
        fade_loop.sync(false, &mut scheduler);
        assert_eq!(scheduler.cancelled, 1);

        fade_loop.sync(true, &mut scheduler);
        assert_eq!(scheduler.requested, 2);
        assert!(fade_loop.is_running());
    }
}
