//! Wall clock and fixed-interval pacing for the growth check.
//!
//! `draw_web()` calls at ~60fps. Crop growth only needs checking about once
//! a second, so `GrowthTimer` turns frame timestamps into "a check is due"
//! signals. Growth itself is judged against absolute timestamps, so a late
//! or skipped check never changes the outcome, only when it is observed.

#[cfg(test)]
use std::cell::Cell;
#[cfg(test)]
use std::rc::Rc;

/// Source of "now" in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Real time: `Date.now()` in the browser, `SystemTime` elsewhere.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Hand-driven clock for tests. Clones share the same time.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

pub struct GrowthTimer {
    /// Milliseconds between checks (e.g. 1000ms = once per second)
    interval_ms: u64,
    /// Timestamp of the last check that fired, None before the first one
    last_check: Option<u64>,
    /// Number of checks fired since creation
    pub total_checks: u64,
}

impl GrowthTimer {
    /// `checks_per_sec`: how many growth checks per real-time second.
    pub fn new(checks_per_sec: u32) -> Self {
        Self {
            interval_ms: 1000 / checks_per_sec.max(1) as u64,
            last_check: None,
            total_checks: 0,
        }
    }

    /// Feed the frame timestamp. Returns true when a growth check should run.
    ///
    /// The first frame always fires. After that at most one check fires per
    /// frame no matter how long the gap was (a backgrounded tab does not
    /// queue up a burst of checks).
    pub fn due(&mut self, now_ms: u64) -> bool {
        let fire = match self.last_check {
            None => true,
            // Clock stepped backwards (NTP, manual change): re-anchor.
            Some(prev) if now_ms < prev => true,
            Some(prev) => now_ms - prev >= self.interval_ms,
        };
        if fire {
            self.last_check = Some(now_ms);
            self.total_checks += 1;
        }
        fire
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_fires() {
        let mut timer = GrowthTimer::new(1);
        assert!(timer.due(5_000));
        assert_eq!(timer.total_checks, 1);
    }

    #[test]
    fn frames_inside_interval_do_not_fire() {
        let mut timer = GrowthTimer::new(1);
        timer.due(0);
        assert!(!timer.due(16));
        assert!(!timer.due(500));
        assert!(!timer.due(999));
        assert!(timer.due(1_000));
        assert_eq!(timer.total_checks, 2);
    }

    #[test]
    fn long_gap_fires_once() {
        let mut timer = GrowthTimer::new(1);
        timer.due(0);
        assert!(timer.due(60_000));
        assert!(!timer.due(60_016));
        assert_eq!(timer.total_checks, 2);
    }

    #[test]
    fn interval_measured_from_last_fire() {
        let mut timer = GrowthTimer::new(1);
        timer.due(0);
        timer.due(1_500);
        assert!(!timer.due(2_000));
        assert!(timer.due(2_500));
    }

    #[test]
    fn clock_going_backwards_reanchors() {
        let mut timer = GrowthTimer::new(1);
        timer.due(10_000);
        assert!(timer.due(3_000));
        assert!(!timer.due(3_500));
    }

    #[test]
    fn steady_60fps_fires_about_once_per_second() {
        let mut timer = GrowthTimer::new(1);
        let mut fired = 0;
        // 5 seconds at ~16.67ms per frame
        for i in 0..300 {
            if timer.due((i as f64 * 16.667) as u64) {
                fired += 1;
            }
        }
        assert!((5..=6).contains(&fired), "expected ~5 checks, got {}", fired);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(100);
        let other = clock.clone();
        clock.advance(50);
        assert_eq!(other.now_ms(), 150);
        other.set(7);
        assert_eq!(clock.now_ms(), 7);
    }
}
