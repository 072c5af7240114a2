//! Player intents: buy, plant, harvest, sell.
//!
//! Each action validates against the catalog and the current state first and
//! only then mutates, inside a single store transaction. An `Err` always means
//! nothing changed.

use std::fmt;

use crate::time::Clock;

use super::config::CropKind;
use super::state::PlotStatus;
use super::storage::SaveStorage;
use super::store::FarmStore;

#[derive(Clone, Debug, PartialEq)]
pub enum ActionError {
    UnknownPlot(usize),
    LevelTooLow { crop: CropKind, required: u32 },
    InsufficientFunds { cost: u64, money: u64 },
    NoSeeds(CropKind),
    PlotNotEmpty(usize),
    PlotNotReady(usize),
    NothingToSell(CropKind),
}

impl ActionError {
    /// Whether the action is a plain no-op the player needs no feedback for
    /// (tapping a busy plot, selling an empty stack).
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            ActionError::PlotNotEmpty(_) | ActionError::PlotNotReady(_) | ActionError::NothingToSell(_)
        )
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::UnknownPlot(id) => write!(f, "There is no plot #{}", id + 1),
            ActionError::LevelTooLow { crop, required } => {
                write!(f, "{} unlocks at level {required}", crop.name())
            }
            ActionError::InsufficientFunds { cost, money } => {
                write!(f, "Not enough money: need ${cost}, have ${money}")
            }
            ActionError::NoSeeds(crop) => write!(f, "No {} seeds. Visit the shop!", crop.name()),
            ActionError::PlotNotEmpty(id) => write!(f, "Plot #{} is not empty", id + 1),
            ActionError::PlotNotReady(id) => write!(f, "Plot #{} is not ready yet", id + 1),
            ActionError::NothingToSell(crop) => write!(f, "No {} to sell", crop.name()),
        }
    }
}

impl std::error::Error for ActionError {}

/// What a successful action did, for toasts and haptics.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    Bought { crop: CropKind, cost: u64 },
    Planted { plot: usize, crop: CropKind },
    Harvested { plot: usize, crop: CropKind, xp: u64 },
    Sold { crop: CropKind, count: u32, total: u64 },
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionOutcome::Bought { crop, cost } => {
                write!(f, "Bought {} seed for ${cost}", crop.name())
            }
            ActionOutcome::Planted { plot, crop } => {
                write!(f, "Planted {} on plot #{}", crop.name(), plot + 1)
            }
            ActionOutcome::Harvested { crop, xp, .. } => {
                write!(f, "Harvested {} {} (+{xp} XP)", crop.icon(), crop.name())
            }
            ActionOutcome::Sold { crop, count, total } => {
                write!(f, "Sold {count} {} for ${total}", crop.name())
            }
        }
    }
}

/// Buy one seed of `crop`.
pub fn buy<S: SaveStorage, C: Clock>(
    store: &mut FarmStore<S, C>,
    crop: CropKind,
) -> Result<ActionOutcome, ActionError> {
    let player = &store.state().player;
    if player.level < crop.level_req() {
        return Err(ActionError::LevelTooLow {
            crop,
            required: crop.level_req(),
        });
    }
    let cost = crop.cost();
    if player.money < cost {
        return Err(ActionError::InsufficientFunds {
            cost,
            money: player.money,
        });
    }

    store.transact(|tx| {
        tx.add_money(-(cost as i64));
        tx.add_seeds(crop, 1);
    });
    Ok(ActionOutcome::Bought { crop, cost })
}

/// Plant a held seed on an empty plot. The grow time is captured now, so a
/// later catalog change does not affect crops already in the ground.
pub fn plant<S: SaveStorage, C: Clock>(
    store: &mut FarmStore<S, C>,
    plot: usize,
    crop: CropKind,
) -> Result<ActionOutcome, ActionError> {
    let target = store
        .state()
        .farm
        .plot(plot)
        .ok_or(ActionError::UnknownPlot(plot))?;
    if target.status != PlotStatus::Empty {
        return Err(ActionError::PlotNotEmpty(plot));
    }
    if !store.has_seed(crop) {
        return Err(ActionError::NoSeeds(crop));
    }

    let duration = crop.grow_ms();
    store.transact(|tx| {
        tx.use_seed(crop);
        tx.plant(plot, crop, duration);
    });
    Ok(ActionOutcome::Planted { plot, crop })
}

/// Collect a ready plot: one crop into the barn, xp to the player.
pub fn harvest<S: SaveStorage, C: Clock>(
    store: &mut FarmStore<S, C>,
    plot: usize,
) -> Result<ActionOutcome, ActionError> {
    let target = store
        .state()
        .farm
        .plot(plot)
        .ok_or(ActionError::UnknownPlot(plot))?;
    let crop = match (target.status, target.crop) {
        (PlotStatus::Ready, Some(crop)) => crop,
        _ => return Err(ActionError::PlotNotReady(plot)),
    };

    let xp = crop.xp();
    store.transact(|tx| {
        tx.clear_plot(plot);
        tx.add_crop(crop, 1);
        tx.add_xp(xp);
    });
    Ok(ActionOutcome::Harvested { plot, crop, xp })
}

/// Sell the whole harvested stock of `crop`.
pub fn sell<S: SaveStorage, C: Clock>(
    store: &mut FarmStore<S, C>,
    crop: CropKind,
) -> Result<ActionOutcome, ActionError> {
    if store.state().inventory.crop_count(crop) == 0 {
        return Err(ActionError::NothingToSell(crop));
    }

    let (count, total) = store.transact(|tx| {
        let count = tx.take_crops(crop);
        let total = count as u64 * crop.sell_price();
        tx.add_money(total as i64);
        (count, total)
    });
    Ok(ActionOutcome::Sold { crop, count, total })
}
