//! Royal Farm: plant, wait, harvest, sell.
//!
//! `FarmGame` is the view controller. It owns the store, turns key presses
//! into actions, and collects toasts and haptic cues for the shell.

pub mod actions;
pub mod codec;
pub mod config;
pub mod error;
pub mod events;
pub mod feedback;
pub mod growth;
pub mod render;
pub mod save;
pub mod state;
pub mod storage;
pub mod store;

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::InputEvent;
use crate::time::{Clock, GrowthTimer};

use actions::{ActionError, ActionOutcome};
use config::{CropKind, GROWTH_CHECKS_PER_SEC};
use events::StoreEvent;
use feedback::{HapticCue, ImpactStyle, NotificationKind, ToastKind, ToastLog};
use state::{PlotStatus, SettingKey};
use storage::SaveStorage;
use store::{FarmStore, LoadOutcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Farm,
    Shop,
    Inventory,
    /// Choosing what to plant on `plot`.
    SeedPicker { plot: usize },
    ConfirmReset,
}

pub struct FarmGame<S: SaveStorage, C: Clock> {
    store: FarmStore<S, C>,
    screen: Screen,
    toasts: Rc<RefCell<ToastLog>>,
    haptics: Rc<RefCell<Vec<HapticCue>>>,
    timer: GrowthTimer,
}

impl<S: SaveStorage, C: Clock> FarmGame<S, C> {
    pub fn new(storage: S, clock: C) -> Self {
        let mut store = FarmStore::new(storage, clock);
        let toasts = Rc::new(RefCell::new(ToastLog::new()));
        let haptics = Rc::new(RefCell::new(Vec::new()));

        // Level-ups are celebrated from the event stream, wherever the xp came from.
        store.subscribe({
            let toasts = toasts.clone();
            let haptics = haptics.clone();
            move |state, event| {
                if let StoreEvent::LevelUp { level, title } = event {
                    toasts
                        .try_borrow_mut()?
                        .push(ToastKind::Success, format!("🎉 Level {level}: {title}!"));
                    if state.settings.vibration {
                        haptics
                            .try_borrow_mut()?
                            .push(HapticCue::Notification(NotificationKind::Success));
                    }
                }
                Ok(())
            }
        });

        Self {
            store,
            screen: Screen::Farm,
            toasts,
            haptics,
            timer: GrowthTimer::new(GROWTH_CHECKS_PER_SEC),
        }
    }

    /// Load the save and apply the host's display name.
    pub fn start(&mut self, host_name: Option<&str>) -> LoadOutcome {
        let outcome = self.store.load();
        match &outcome {
            LoadOutcome::Restored { matured, .. } if *matured > 0 => self.toast(
                ToastKind::Info,
                format!("Welcome back! {matured} crop(s) ready to harvest"),
            ),
            LoadOutcome::Corrupted(_) => self.toast(
                ToastKind::Error,
                "Save data was damaged. Starting a new farm.",
            ),
            _ => {}
        }
        if let Some(name) = host_name.map(str::trim).filter(|n| !n.is_empty()) {
            self.store.set_player_name(name);
        }
        outcome
    }

    pub fn store(&self) -> &FarmStore<S, C> {
        &self.store
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn toasts(&self) -> Ref<'_, ToastLog> {
        self.toasts.borrow()
    }

    /// Take the queued haptic cues for the host to play.
    pub fn drain_haptics(&self) -> Vec<HapticCue> {
        std::mem::take(&mut *self.haptics.borrow_mut())
    }

    /// Per-frame work: expire toasts and run the paced growth check.
    /// Returns how many plots became ready.
    pub fn frame(&mut self) -> usize {
        let now = self.store.now();
        self.toasts.borrow_mut().update(now);
        if self.timer.due(now) {
            self.store.tick_growth()
        } else {
            0
        }
    }

    /// Handle an input event. Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match self.screen {
            Screen::Farm => self.input_farm(event),
            Screen::Shop => self.input_shop(event),
            Screen::Inventory => self.input_inventory(event),
            Screen::SeedPicker { plot } => self.input_seed_picker(plot, event),
            Screen::ConfirmReset => self.input_confirm_reset(event),
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        render::render(self, f, area);
    }

    fn input_farm(&mut self, event: &InputEvent) -> bool {
        if let Some(plot) = event.digit_index() {
            return self.tap_plot(plot);
        }
        match event {
            InputEvent::Key('s') => self.screen = Screen::Shop,
            InputEvent::Key('i') => self.screen = Screen::Inventory,
            InputEvent::Key('v') => self.toggle(SettingKey::Vibration, "Vibration"),
            InputEvent::Key('m') => self.toggle(SettingKey::Music, "Music"),
            InputEvent::Key('a') => self.toggle(SettingKey::Sound, "Sound"),
            InputEvent::Key('r') => {
                self.haptic(HapticCue::Impact(ImpactStyle::Medium));
                self.screen = Screen::ConfirmReset;
            }
            _ => return false,
        }
        true
    }

    fn tap_plot(&mut self, plot: usize) -> bool {
        let status = match self.store.state().farm.plot(plot) {
            Some(p) => p.status,
            None => return false,
        };
        match status {
            PlotStatus::Empty => self.screen = Screen::SeedPicker { plot },
            PlotStatus::Locked => self.toast(ToastKind::Info, "This plot is still locked"),
            PlotStatus::Ready | PlotStatus::Growing => {
                let result = actions::harvest(&mut self.store, plot);
                self.report(result);
            }
        }
        true
    }

    fn input_shop(&mut self, event: &InputEvent) -> bool {
        if let Some(crop) = crop_for(event) {
            let result = actions::buy(&mut self.store, crop);
            self.report(result);
            return true;
        }
        match event {
            InputEvent::Key('i') => self.screen = Screen::Inventory,
            InputEvent::Key('f') | InputEvent::Back => self.screen = Screen::Farm,
            _ => return false,
        }
        true
    }

    fn input_inventory(&mut self, event: &InputEvent) -> bool {
        if let Some(crop) = crop_for(event) {
            let result = actions::sell(&mut self.store, crop);
            self.report(result);
            return true;
        }
        match event {
            InputEvent::Key('s') => self.screen = Screen::Shop,
            InputEvent::Key('f') | InputEvent::Back => self.screen = Screen::Farm,
            _ => return false,
        }
        true
    }

    fn input_seed_picker(&mut self, plot: usize, event: &InputEvent) -> bool {
        if let Some(crop) = crop_for(event) {
            let result = actions::plant(&mut self.store, plot, crop);
            // Missing seeds keep the picker open so another crop can be chosen.
            if !matches!(result, Err(ActionError::NoSeeds(_))) {
                self.screen = Screen::Farm;
            }
            self.report(result);
            return true;
        }
        match event {
            InputEvent::Key('s') => self.screen = Screen::Shop,
            InputEvent::Back => self.screen = Screen::Farm,
            _ => return false,
        }
        true
    }

    fn input_confirm_reset(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key('y') => {
                self.store.reset();
                self.haptic(HapticCue::Impact(ImpactStyle::Heavy));
                self.toast(ToastKind::Info, "Your farm has been reset");
                self.screen = Screen::Farm;
            }
            InputEvent::Key('n') | InputEvent::Back => self.screen = Screen::Farm,
            _ => return false,
        }
        true
    }

    fn toggle(&mut self, key: SettingKey, label: &str) {
        let on = self.store.toggle_setting(key);
        let state = if on { "on" } else { "off" };
        self.toast(ToastKind::Info, format!("{label} {state}"));
    }

    /// Turn an action result into feedback. Silent failures produce none.
    fn report(&mut self, result: Result<ActionOutcome, ActionError>) {
        match result {
            Ok(outcome) => {
                self.toast(ToastKind::Success, outcome.to_string());
                self.haptic(HapticCue::for_outcome(&outcome));
            }
            Err(e) if e.is_silent() => {}
            Err(e) => {
                self.toast(ToastKind::Error, e.to_string());
                if let Some(cue) = HapticCue::for_error(&e) {
                    self.haptic(cue);
                }
            }
        }
    }

    fn toast(&self, kind: ToastKind, text: impl Into<String>) {
        self.toasts.borrow_mut().push(kind, text);
    }

    fn haptic(&self, cue: HapticCue) {
        if self.store.state().settings.vibration {
            self.haptics.borrow_mut().push(cue);
        }
    }
}

/// Catalog crop for a digit key (`'1'` is the first crop).
fn crop_for(event: &InputEvent) -> Option<CropKind> {
    event
        .digit_index()
        .and_then(|i| CropKind::all().get(i).copied())
}
