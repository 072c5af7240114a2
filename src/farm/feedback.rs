//! Player feedback signals: on-screen toasts and haptic cues.
//!
//! The game only queues these; the renderer draws toasts and the host bridge
//! plays haptics.

use std::collections::VecDeque;

use super::actions::{ActionError, ActionOutcome};

/// How long a toast stays on screen.
pub const TOAST_MS: u64 = 3_000;
/// Oldest toasts are dropped beyond this.
pub const MAX_TOASTS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub text: String,
    pub kind: ToastKind,
    /// Set by the first frame that shows it.
    pub shown_at: Option<u64>,
}

#[derive(Default)]
pub struct ToastLog {
    toasts: VecDeque<Toast>,
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ToastKind, text: impl Into<String>) {
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            text: text.into(),
            kind,
            shown_at: None,
        });
    }

    /// Stamp new toasts with `now` and drop the expired ones.
    pub fn update(&mut self, now: u64) {
        for toast in self.toasts.iter_mut() {
            toast.shown_at.get_or_insert(now);
        }
        self.toasts
            .retain(|t| t.shown_at.is_some_and(|at| now.saturating_sub(at) < TOAST_MS));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImpactStyle {
    Light,
    Medium,
    Heavy,
}

impl ImpactStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactStyle::Light => "light",
            ImpactStyle::Medium => "medium",
            ImpactStyle::Heavy => "heavy",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        }
    }
}

/// A vibration request for the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HapticCue {
    Impact(ImpactStyle),
    Notification(NotificationKind),
    Selection,
}

impl HapticCue {
    pub fn for_outcome(outcome: &ActionOutcome) -> HapticCue {
        match outcome {
            ActionOutcome::Bought { .. } => HapticCue::Selection,
            ActionOutcome::Planted { .. } => HapticCue::Impact(ImpactStyle::Light),
            ActionOutcome::Harvested { .. } | ActionOutcome::Sold { .. } => {
                HapticCue::Notification(NotificationKind::Success)
            }
        }
    }

    /// Cue for a reported failure. Silent errors get none.
    pub fn for_error(err: &ActionError) -> Option<HapticCue> {
        match err {
            ActionError::LevelTooLow { .. } | ActionError::InsufficientFunds { .. } => {
                Some(HapticCue::Notification(NotificationKind::Error))
            }
            ActionError::NoSeeds(_) => Some(HapticCue::Notification(NotificationKind::Warning)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::farm::config::CropKind;

    #[test]
    fn toast_expires_after_its_time_on_screen() {
        let mut log = ToastLog::new();
        log.push(ToastKind::Info, "hello");
        log.update(1_000);
        assert_eq!(log.len(), 1);
        log.update(1_000 + TOAST_MS - 1);
        assert_eq!(log.len(), 1);
        log.update(1_000 + TOAST_MS);
        assert!(log.is_empty());
    }

    #[test]
    fn toast_clock_starts_when_first_shown() {
        let mut log = ToastLog::new();
        log.update(0);
        log.push(ToastKind::Success, "late");
        log.update(10_000);
        assert_eq!(log.iter().next().and_then(|t| t.shown_at), Some(10_000));
    }

    #[test]
    fn oldest_toast_dropped_when_full() {
        let mut log = ToastLog::new();
        for i in 0..MAX_TOASTS + 2 {
            log.push(ToastKind::Info, format!("t{i}"));
        }
        assert_eq!(log.len(), MAX_TOASTS);
        assert_eq!(log.iter().next().map(|t| t.text.as_str()), Some("t2"));
    }

    #[test]
    fn outcome_cues() {
        let bought = ActionOutcome::Bought {
            crop: CropKind::Wheat,
            cost: 10,
        };
        assert_eq!(HapticCue::for_outcome(&bought), HapticCue::Selection);
        let sold = ActionOutcome::Sold {
            crop: CropKind::Wheat,
            count: 1,
            total: 15,
        };
        assert_eq!(
            HapticCue::for_outcome(&sold),
            HapticCue::Notification(NotificationKind::Success)
        );
    }

    #[test]
    fn silent_errors_have_no_cue() {
        assert_eq!(HapticCue::for_error(&ActionError::PlotNotReady(0)), None);
        assert_eq!(HapticCue::for_error(&ActionError::UnknownPlot(12)), None);
        assert_eq!(
            HapticCue::for_error(&ActionError::InsufficientFunds { cost: 10, money: 0 }),
            Some(HapticCue::Notification(NotificationKind::Error))
        );
    }
}
