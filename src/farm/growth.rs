//! Crop growth: the growing -> ready transition shared by the offline
//! catch-up on load and the live tick.

use super::state::{Plot, PlotStatus};

/// Whether a growing plot has had its full duration by `now`.
///
/// A timestamp in the future (clock moved backwards) counts as no time
/// elapsed.
pub fn is_mature(plot: &Plot, now: u64) -> bool {
    match (plot.status, plot.planted_at, plot.duration_ms) {
        (PlotStatus::Growing, Some(planted_at), Some(duration)) => {
            now.saturating_sub(planted_at) >= duration
        }
        _ => false,
    }
}

/// Mark every mature growing plot as ready. Returns how many changed.
pub fn advance(plots: &mut [Plot], now: u64) -> usize {
    let mut changed = 0;
    for plot in plots.iter_mut() {
        if is_mature(plot, now) {
            plot.mark_ready();
            changed += 1;
        }
    }
    changed
}

/// Growth fraction for progress bars (0.0..=1.0). Ready plots report 1.0,
/// plots with nothing planted 0.0.
pub fn progress(plot: &Plot, now: u64) -> f64 {
    match (plot.status, plot.planted_at, plot.duration_ms) {
        (PlotStatus::Ready, _, _) => 1.0,
        (PlotStatus::Growing, Some(planted_at), Some(duration)) => {
            if duration == 0 {
                return 1.0;
            }
            let elapsed = now.saturating_sub(planted_at);
            (elapsed as f64 / duration as f64).min(1.0)
        }
        _ => 0.0,
    }
}

/// Milliseconds until a growing plot is ready. None unless growing.
pub fn remaining_ms(plot: &Plot, now: u64) -> Option<u64> {
    if plot.status != PlotStatus::Growing {
        return None;
    }
    let planted_at = plot.planted_at?;
    let duration = plot.duration_ms?;
    Some(planted_at.saturating_add(duration).saturating_sub(now))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::farm::config::CropKind;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_ready_iff_duration_elapsed(
            planted_at in 0u64..1_000_000_000,
            duration in 0u64..10_000_000,
            elapsed in 0u64..20_000_000,
        ) {
            let mut plots = vec![Plot::growing(0, CropKind::Corn, planted_at, duration)];
            advance(&mut plots, planted_at + elapsed);
            prop_assert_eq!(plots[0].is_ready(), elapsed >= duration);
        }

        #[test]
        fn prop_ready_never_reverts(
            duration in 0u64..10_000,
            checks in proptest::collection::vec(0u64..50_000, 1..20),
        ) {
            let mut plots = vec![Plot::growing(0, CropKind::Wheat, 0, duration)];
            let mut was_ready = false;
            for now in checks {
                advance(&mut plots, now);
                if was_ready {
                    prop_assert!(plots[0].is_ready());
                }
                was_ready = plots[0].is_ready();
            }
        }

        #[test]
        fn prop_progress_in_unit_range(
            planted_at in 0u64..1_000_000,
            duration in 0u64..1_000_000,
            now in 0u64..3_000_000,
        ) {
            let plot = Plot::growing(0, CropKind::Wheat, planted_at, duration);
            let p = progress(&plot, now);
            prop_assert!((0.0..=1.0).contains(&p), "progress {}", p);
        }
    }
}
