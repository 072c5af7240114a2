//! The state store: owns the live [`FarmState`], persists after every
//! mutation and notifies subscribers.
//!
//! All mutation goes through [`FarmStore::transact`]. A transaction may touch
//! several sections; when it ends the store saves once, then notifies each
//! touched section in the order it was first touched, then delivers queued
//! level-up events. Listeners therefore only ever see fully applied, already
//! persisted state.

use crate::log;
use crate::time::Clock;

use super::config::{self, CropKind, SAVE_KEY};
use super::error::CorruptionError;
use super::events::{EventBus, ListenerError, StoreEvent, SubscriberId};
use super::growth;
use super::save;
use super::state::{FarmState, Player, Section, SettingKey};
use super::storage::SaveStorage;

/// Result of [`FarmStore::load`].
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// No save under the key: new player.
    Fresh,
    /// Save restored. `matured` plots finished growing while away.
    Restored { matured: usize, away_ms: u64 },
    /// Save was unreadable and has been discarded.
    Corrupted(CorruptionError),
}

/// Single-step level-up check against the next threshold.
///
/// Advances at most one level per call even if the xp already clears
/// several thresholds; the next xp change picks up the following level.
pub fn check_level_up(player: &mut Player) -> Option<StoreEvent> {
    let level = player.level.checked_add(1)?;
    let next = config::level_def(level)?;
    if player.xp < next.xp {
        return None;
    }
    player.level = level;
    Some(StoreEvent::LevelUp {
        level: player.level,
        title: next.title,
    })
}

/// Mutable view of the state for the duration of one [`FarmStore::transact`].
pub struct Transaction<'a> {
    state: &'a mut FarmState,
    now: u64,
    touched: Vec<Section>,
    pending: Vec<StoreEvent>,
}

impl<'a> Transaction<'a> {
    pub fn state(&self) -> &FarmState {
        &*self.state
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn touch(&mut self, section: Section) {
        if !self.touched.contains(&section) {
            self.touched.push(section);
        }
    }

    fn evaluate_level_up(&mut self) {
        if let Some(event) = check_level_up(&mut self.state.player) {
            self.pending.push(event);
        }
    }

    /// Returns false (and touches nothing) if the name is unchanged.
    pub fn set_player_name(&mut self, name: &str) -> bool {
        if self.state.player.name == name {
            return false;
        }
        self.state.player.name = name.to_string();
        self.touch(Section::Player);
        true
    }

    /// Negative deltas spend; the balance saturates at zero.
    pub fn add_money(&mut self, delta: i64) {
        let money = &mut self.state.player.money;
        *money = if delta >= 0 {
            money.saturating_add(delta as u64)
        } else {
            money.saturating_sub(delta.unsigned_abs())
        };
        self.evaluate_level_up();
        self.touch(Section::Player);
    }

    pub fn add_xp(&mut self, amount: u64) {
        self.state.player.xp = self.state.player.xp.saturating_add(amount);
        self.evaluate_level_up();
        self.touch(Section::Player);
    }

    /// Guarded decrement. No mutation when none are held.
    pub fn use_seed(&mut self, crop: CropKind) -> bool {
        match self.state.inventory.seeds.get_mut(&crop) {
            Some(n) if *n > 0 => {
                *n -= 1;
                self.touch(Section::Inventory);
                true
            }
            _ => false,
        }
    }

    pub fn add_seeds(&mut self, crop: CropKind, amount: u32) {
        let n = self.state.inventory.seeds.entry(crop).or_insert(0);
        *n = n.saturating_add(amount);
        self.touch(Section::Inventory);
    }

    pub fn add_crop(&mut self, crop: CropKind, amount: u32) {
        let n = self.state.inventory.crops.entry(crop).or_insert(0);
        *n = n.saturating_add(amount);
        self.touch(Section::Inventory);
    }

    /// Remove and return the whole harvested stock of `crop`.
    pub fn take_crops(&mut self, crop: CropKind) -> u32 {
        let taken = self
            .state
            .inventory
            .crops
            .insert(crop, 0)
            .unwrap_or(0);
        if taken > 0 {
            self.touch(Section::Inventory);
        }
        taken
    }

    /// Start `crop` growing on an empty plot, stamped with the transaction
    /// time. Returns false if the plot is missing or not empty.
    pub fn plant(&mut self, plot: usize, crop: CropKind, duration_ms: u64) -> bool {
        let now = self.now;
        match self.state.farm.plots.get_mut(plot) {
            Some(p) if p.is_empty() => {
                p.start_growing(crop, now, duration_ms);
                self.touch(Section::Farm);
                true
            }
            _ => false,
        }
    }

    /// Reset a plot to empty. Returns the crop it held.
    pub fn clear_plot(&mut self, plot: usize) -> Option<CropKind> {
        let crop = self.state.farm.plots.get_mut(plot)?.clear();
        self.touch(Section::Farm);
        crop
    }

    pub fn set_setting(&mut self, key: SettingKey, value: bool) {
        if self.state.settings.get(key) != value {
            self.state.settings.set(key, value);
            self.touch(Section::Settings);
        }
    }

    /// Growth pass at the transaction time. Touches the farm only on change.
    pub fn advance_growth(&mut self) -> usize {
        let changed = growth::advance(&mut self.state.farm.plots, self.now);
        if changed > 0 {
            self.touch(Section::Farm);
        }
        changed
    }
}

pub struct FarmStore<S: SaveStorage, C: Clock> {
    state: FarmState,
    storage: S,
    clock: C,
    bus: EventBus,
}

impl<S: SaveStorage, C: Clock> FarmStore<S, C> {
    /// A store holding the default template. Call [`load`](Self::load) to
    /// pick up an existing save.
    pub fn new(storage: S, clock: C) -> Self {
        let state = FarmState::new(clock.now_ms());
        Self {
            state,
            storage,
            clock,
            bus: EventBus::new(),
        }
    }

    pub fn state(&self) -> &FarmState {
        &self.state
    }

    pub fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriberId
    where
        F: FnMut(&FarmState, &StoreEvent) -> Result<(), ListenerError> + 'static,
    {
        self.bus.subscribe(listener)
    }

    #[allow(dead_code)] // the shipping view never drops its listener
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Restore from durable storage, catch up offline growth, stamp the
    /// login time and notify everything.
    pub fn load(&mut self) -> LoadOutcome {
        let now = self.now();
        let outcome = match self.storage.read(SAVE_KEY) {
            None => {
                log::info("no save found, starting a new farm");
                LoadOutcome::Fresh
            }
            Some(blob) => match save::decode(&blob, FarmState::new(now)) {
                Ok(mut state) => {
                    let away_ms = now.saturating_sub(state.meta.last_login);
                    let matured = growth::advance(&mut state.farm.plots, now);
                    self.state = state;
                    if matured > 0 {
                        log::info(&format!("{matured} plot(s) finished growing while away"));
                    }
                    log::info("save loaded");
                    LoadOutcome::Restored { matured, away_ms }
                }
                Err(e) => {
                    log::warn(&format!("save data unreadable, starting fresh: {e}"));
                    self.storage.remove(SAVE_KEY);
                    self.state = FarmState::new(now);
                    LoadOutcome::Corrupted(e)
                }
            },
        };

        self.state.meta.last_login = now;
        if matches!(outcome, LoadOutcome::Restored { matured, .. } if matured > 0) {
            self.save();
        }
        self.notify_all();
        outcome
    }

    /// Stamp the login time, encode, write. Failures are logged; the
    /// in-memory state stays authoritative.
    pub fn save(&mut self) {
        self.state.meta.last_login = self.now();
        let blob = match save::encode(&self.state) {
            Ok(b) => b,
            Err(e) => {
                log::warn(&format!("failed to serialize save: {e}"));
                return;
            }
        };
        if let Err(e) = self.storage.write(SAVE_KEY, &blob) {
            log::warn(&e.to_string());
        }
    }

    /// Delete the save and start over with the default template.
    pub fn reset(&mut self) {
        self.storage.remove(SAVE_KEY);
        self.state = FarmState::new(self.now());
        log::info("farm reset");
        self.notify_all();
    }

    pub fn notify(&mut self, section: Section) {
        self.bus.dispatch(&self.state, &StoreEvent::Changed(section));
    }

    pub fn notify_all(&mut self) {
        self.notify(Section::All);
    }

    /// Run `f` as one unit: save once and notify afterwards if anything was
    /// touched. A transaction that touches nothing neither saves nor notifies.
    pub fn transact<R>(&mut self, f: impl FnOnce(&mut Transaction<'_>) -> R) -> R {
        let now = self.now();
        let mut tx = Transaction {
            state: &mut self.state,
            now,
            touched: Vec::new(),
            pending: Vec::new(),
        };
        let result = f(&mut tx);
        let Transaction {
            touched, pending, ..
        } = tx;

        if touched.is_empty() && pending.is_empty() {
            return result;
        }
        self.save();
        for section in touched {
            self.notify(section);
        }
        for event in pending {
            self.bus.dispatch(&self.state, &event);
        }
        result
    }

    /// Apply the host's display name if it differs.
    pub fn set_player_name(&mut self, name: &str) -> bool {
        self.transact(|tx| tx.set_player_name(name))
    }

    #[cfg(test)]
    pub fn add_money(&mut self, delta: i64) {
        self.transact(|tx| tx.add_money(delta));
    }

    #[cfg(test)]
    pub fn add_xp(&mut self, amount: u64) {
        self.transact(|tx| tx.add_xp(amount));
    }

    pub fn has_seed(&self, crop: CropKind) -> bool {
        self.state.inventory.seed_count(crop) > 0
    }

    #[cfg(test)]
    pub fn use_seed(&mut self, crop: CropKind) -> bool {
        self.transact(|tx| tx.use_seed(crop))
    }

    #[cfg(test)]
    pub fn add_seeds(&mut self, crop: CropKind, amount: u32) {
        self.transact(|tx| tx.add_seeds(crop, amount));
    }

    #[cfg(test)]
    pub fn add_crop(&mut self, crop: CropKind, amount: u32) {
        self.transact(|tx| tx.add_crop(crop, amount));
    }

    /// Flip a setting. Returns the new value.
    pub fn toggle_setting(&mut self, key: SettingKey) -> bool {
        let value = !self.state.settings.get(key);
        self.transact(|tx| tx.set_setting(key, value));
        value
    }

    /// Live growth tick. Saves and notifies `Farm` only when a plot matured.
    pub fn tick_growth(&mut self) -> usize {
        self.transact(|tx| tx.advance_growth())
    }
}
