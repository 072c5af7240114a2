//! Royal Farm state tree.

use std::collections::BTreeMap;

use super::config::{
    CropKind, DEFAULT_PLAYER_NAME, PLOT_COUNT, START_LEVEL, START_MONEY, START_UNLOCKED_PLOTS,
    START_XP, STARTER_WHEAT_SEEDS,
};
use super::save::SAVE_VERSION;

/// Top-level key of the state tree. Scopes change notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Player,
    Inventory,
    Farm,
    Settings,
    /// Everything changed (after load or reset).
    All,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Meta {
    pub version: u32,
    /// Last time the state was saved or loaded (ms since epoch).
    pub last_login: u64,
    pub game_start: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub name: String,
    pub money: u64,
    pub xp: u64,
    pub level: u32,
}

/// Seed and harvest counts. Both maps hold every catalog crop.
#[derive(Clone, Debug, PartialEq)]
pub struct Inventory {
    pub seeds: BTreeMap<CropKind, u32>,
    pub crops: BTreeMap<CropKind, u32>,
}

impl Inventory {
    /// Zeroed counts for every crop, plus the starter wheat.
    pub fn new() -> Self {
        let mut seeds: BTreeMap<CropKind, u32> =
            CropKind::all().iter().map(|k| (*k, 0)).collect();
        let crops = seeds.clone();
        seeds.insert(CropKind::Wheat, STARTER_WHEAT_SEEDS);
        Self { seeds, crops }
    }

    pub fn seed_count(&self, kind: CropKind) -> u32 {
        self.seeds.get(&kind).copied().unwrap_or(0)
    }

    pub fn crop_count(&self, kind: CropKind) -> u32 {
        self.crops.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_seeds(&self) -> u32 {
        self.seeds.values().sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlotStatus {
    Empty,
    Growing,
    Ready,
    Locked,
}

impl PlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlotStatus::Empty => "empty",
            PlotStatus::Growing => "growing",
            PlotStatus::Ready => "ready",
            PlotStatus::Locked => "locked",
        }
    }
}

/// A single farmable slot.
///
/// `crop`, `planted_at` and `duration_ms` are `Some` exactly when the status is
/// `Growing` or `Ready`. Only the methods below change the status, which keeps
/// that invariant in one place.
#[derive(Clone, Debug, PartialEq)]
pub struct Plot {
    pub id: usize,
    pub status: PlotStatus,
    pub crop: Option<CropKind>,
    pub planted_at: Option<u64>,
    /// Grow time captured at planting. Later catalog changes do not affect it.
    pub duration_ms: Option<u64>,
}

impl Plot {
    pub fn empty(id: usize) -> Self {
        Self {
            id,
            status: PlotStatus::Empty,
            crop: None,
            planted_at: None,
            duration_ms: None,
        }
    }

    pub fn locked(id: usize) -> Self {
        Self {
            status: PlotStatus::Locked,
            ..Self::empty(id)
        }
    }

    pub fn growing(id: usize, crop: CropKind, planted_at: u64, duration_ms: u64) -> Self {
        Self {
            id,
            status: PlotStatus::Growing,
            crop: Some(crop),
            planted_at: Some(planted_at),
            duration_ms: Some(duration_ms),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status == PlotStatus::Empty
    }

    pub fn is_ready(&self) -> bool {
        self.status == PlotStatus::Ready
    }

    pub(crate) fn start_growing(&mut self, crop: CropKind, now: u64, duration_ms: u64) {
        *self = Plot::growing(self.id, crop, now, duration_ms);
    }

    pub(crate) fn mark_ready(&mut self) {
        if self.status == PlotStatus::Growing {
            self.status = PlotStatus::Ready;
        }
    }

    /// Back to the empty lifecycle state. Returns the crop that was on the plot.
    pub(crate) fn clear(&mut self) -> Option<CropKind> {
        let crop = self.crop.take();
        *self = Plot::empty(self.id);
        crop
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Farm {
    pub plots: Vec<Plot>,
    pub unlocked_plots: usize,
}

impl Farm {
    pub fn new() -> Self {
        Self {
            plots: Self::default_plots(PLOT_COUNT, START_UNLOCKED_PLOTS),
            unlocked_plots: START_UNLOCKED_PLOTS,
        }
    }

    /// Template plot for index `id`: empty if unlocked, locked otherwise.
    pub fn template_plot(id: usize, unlocked: usize) -> Plot {
        if id < unlocked {
            Plot::empty(id)
        } else {
            Plot::locked(id)
        }
    }

    fn default_plots(count: usize, unlocked: usize) -> Vec<Plot> {
        (0..count).map(|i| Self::template_plot(i, unlocked)).collect()
    }

    pub fn plot(&self, id: usize) -> Option<&Plot> {
        self.plots.get(id)
    }

    pub fn count_with(&self, status: PlotStatus) -> usize {
        self.plots.iter().filter(|p| p.status == status).count()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub sound: bool,
    pub music: bool,
    pub vibration: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            music: true,
            vibration: true,
        }
    }
}

/// A toggleable entry in [`Settings`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingKey {
    Sound,
    Music,
    Vibration,
}

impl Settings {
    pub fn get(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::Sound => self.sound,
            SettingKey::Music => self.music,
            SettingKey::Vibration => self.vibration,
        }
    }

    pub fn set(&mut self, key: SettingKey, value: bool) {
        match key {
            SettingKey::Sound => self.sound = value,
            SettingKey::Music => self.music = value,
            SettingKey::Vibration => self.vibration = value,
        }
    }
}

/// The whole persisted game.
#[derive(Clone, Debug, PartialEq)]
pub struct FarmState {
    pub meta: Meta,
    pub player: Player,
    pub inventory: Inventory,
    pub farm: Farm,
    pub settings: Settings,
}

impl FarmState {
    /// Default template for a new player starting at `now`.
    pub fn new(now: u64) -> Self {
        Self {
            meta: Meta {
                version: SAVE_VERSION,
                last_login: now,
                game_start: now,
            },
            player: Player {
                name: DEFAULT_PLAYER_NAME.to_string(),
                money: START_MONEY,
                xp: START_XP,
                level: START_LEVEL,
            },
            inventory: Inventory::new(),
            farm: Farm::new(),
            settings: Settings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_has_starter_wheat_and_empty_plots() {
        let state = FarmState::new(1_000);
        assert_eq!(state.inventory.seed_count(CropKind::Wheat), 3);
        assert_eq!(state.inventory.total_seeds(), 3);
        assert_eq!(state.farm.plots.len(), PLOT_COUNT);
        assert!(state.farm.plots.iter().all(Plot::is_empty));
        assert_eq!(state.meta.game_start, 1_000);
        assert_eq!(state.player.level, 1);
    }

    #[test]
    fn inventory_is_total_over_catalog() {
        let inv = Inventory::new();
        for kind in CropKind::all() {
            assert!(inv.seeds.contains_key(kind));
            assert!(inv.crops.contains_key(kind));
        }
    }

    #[test]
    fn plot_ids_are_indices() {
        let farm = Farm::new();
        for (i, plot) in farm.plots.iter().enumerate() {
            assert_eq!(plot.id, i);
        }
    }

    #[test]
    fn template_plot_locks_beyond_unlocked() {
        assert_eq!(Farm::template_plot(2, 3).status, PlotStatus::Empty);
        assert_eq!(Farm::template_plot(3, 3).status, PlotStatus::Locked);
    }

    #[test]
    fn clear_resets_all_planting_fields() {
        let mut plot = Plot::growing(4, CropKind::Corn, 10, 20);
        plot.mark_ready();
        assert_eq!(plot.clear(), Some(CropKind::Corn));
        assert_eq!(plot, Plot::empty(4));
    }

    #[test]
    fn mark_ready_ignores_non_growing_plots() {
        let mut plot = Plot::empty(0);
        plot.mark_ready();
        assert_eq!(plot.status, PlotStatus::Empty);
    }

    #[test]
    fn settings_toggle_by_key() {
        let mut s = Settings::default();
        s.set(SettingKey::Vibration, false);
        assert!(!s.get(SettingKey::Vibration));
        assert!(s.get(SettingKey::Sound));
    }
}
