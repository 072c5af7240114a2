//! Royal Farm catalog: crop definitions, level thresholds, and game constants.

/// localStorage key holding the whole encoded save.
pub const SAVE_KEY: &str = "RoyalFarm_SaveData_v3_Secure";

/// Number of plots on the farm.
pub const PLOT_COUNT: usize = 9;

/// Plots unlocked for a new player. Plots at or beyond this index are locked.
pub const START_UNLOCKED_PLOTS: usize = PLOT_COUNT;

pub const START_MONEY: u64 = 100;
pub const START_XP: u64 = 0;
pub const START_LEVEL: u32 = 1;

/// Starter gift: wheat seeds in a fresh inventory.
pub const STARTER_WHEAT_SEEDS: u32 = 3;

pub const DEFAULT_PLAYER_NAME: &str = "New Farmer";

/// Live growth checks per real-time second.
pub const GROWTH_CHECKS_PER_SEC: u32 = 1;

/// Kinds of crops sold in the shop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CropKind {
    Wheat,
    Carrot,
    Corn,
    Tomato,
    Strawberry,
    Pumpkin,
}

impl CropKind {
    /// All crop kinds in shop order.
    pub fn all() -> &'static [CropKind] {
        &[
            CropKind::Wheat,
            CropKind::Carrot,
            CropKind::Corn,
            CropKind::Tomato,
            CropKind::Strawberry,
            CropKind::Pumpkin,
        ]
    }

    /// Stable identifier used as the save-file key.
    pub fn id(&self) -> &'static str {
        match self {
            CropKind::Wheat => "wheat",
            CropKind::Carrot => "carrot",
            CropKind::Corn => "corn",
            CropKind::Tomato => "tomato",
            CropKind::Strawberry => "strawberry",
            CropKind::Pumpkin => "pumpkin",
        }
    }

    pub fn from_id(id: &str) -> Option<CropKind> {
        CropKind::all().iter().copied().find(|k| k.id() == id)
    }

    /// Position in `all()`. Used for number-key bindings.
    pub fn index(&self) -> usize {
        match self {
            CropKind::Wheat => 0,
            CropKind::Carrot => 1,
            CropKind::Corn => 2,
            CropKind::Tomato => 3,
            CropKind::Strawberry => 4,
            CropKind::Pumpkin => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CropKind::Wheat => "Wheat",
            CropKind::Carrot => "Carrot",
            CropKind::Corn => "Corn",
            CropKind::Tomato => "Tomato",
            CropKind::Strawberry => "Strawberry",
            CropKind::Pumpkin => "Pumpkin",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            CropKind::Wheat => "🌾",
            CropKind::Carrot => "🥕",
            CropKind::Corn => "🌽",
            CropKind::Tomato => "🍅",
            CropKind::Strawberry => "🍓",
            CropKind::Pumpkin => "🎃",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CropKind::Wheat => "Quick and cheap",
            CropKind::Carrot => "Grows in half a minute",
            CropKind::Corn => "A steady earner",
            CropKind::Tomato => "Juicy, worth the wait",
            CropKind::Strawberry => "Sweet and valuable",
            CropKind::Pumpkin => "The king of the market",
        }
    }

    /// Seed price.
    pub fn cost(&self) -> u64 {
        match self {
            CropKind::Wheat => 10,
            CropKind::Carrot => 25,
            CropKind::Corn => 60,
            CropKind::Tomato => 150,
            CropKind::Strawberry => 400,
            CropKind::Pumpkin => 1_000,
        }
    }

    /// Time from planting to ready, in milliseconds.
    pub fn grow_ms(&self) -> u64 {
        match self {
            CropKind::Wheat => 5_000,
            CropKind::Carrot => 30_000,
            CropKind::Corn => 120_000,
            CropKind::Tomato => 600_000,
            CropKind::Strawberry => 1_800_000,
            CropKind::Pumpkin => 3_600_000,
        }
    }

    /// Sale price of one harvested unit.
    pub fn sell_price(&self) -> u64 {
        match self {
            CropKind::Wheat => 15,
            CropKind::Carrot => 40,
            CropKind::Corn => 100,
            CropKind::Tomato => 260,
            CropKind::Strawberry => 720,
            CropKind::Pumpkin => 1_900,
        }
    }

    /// XP granted per harvested unit.
    pub fn xp(&self) -> u64 {
        match self {
            CropKind::Wheat => 5,
            CropKind::Carrot => 10,
            CropKind::Corn => 20,
            CropKind::Tomato => 45,
            CropKind::Strawberry => 90,
            CropKind::Pumpkin => 180,
        }
    }

    /// Minimum player level to buy seeds.
    pub fn level_req(&self) -> u32 {
        match self {
            CropKind::Wheat => 1,
            CropKind::Carrot => 1,
            CropKind::Corn => 2,
            CropKind::Tomato => 3,
            CropKind::Strawberry => 5,
            CropKind::Pumpkin => 7,
        }
    }
}

/// One row of the level threshold table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelDef {
    /// Cumulative XP needed to reach this level.
    pub xp: u64,
    pub title: &'static str,
}

/// Level thresholds. Index 0 is level 1.
pub const LEVELS: &[LevelDef] = &[
    LevelDef { xp: 0, title: "Seedling" },
    LevelDef { xp: 50, title: "Farmhand" },
    LevelDef { xp: 150, title: "Grower" },
    LevelDef { xp: 350, title: "Harvester" },
    LevelDef { xp: 700, title: "Rancher" },
    LevelDef { xp: 1_200, title: "Master Farmer" },
    LevelDef { xp: 2_000, title: "Royal Farmer" },
];

/// Threshold entry for `level`, or None past the top of the table.
pub fn level_def(level: u32) -> Option<&'static LevelDef> {
    if level == 0 {
        return None;
    }
    LEVELS.get(level as usize - 1)
}

pub fn level_title(level: u32) -> &'static str {
    level_def(level).map_or("Legend", |d| d.title)
}

/// Fraction of the way from `level` to the next one (0.0..=1.0).
/// Max level reports 1.0.
pub fn level_progress(xp: u64, level: u32) -> f64 {
    let next = level.checked_add(1).and_then(level_def);
    let (Some(current), Some(next)) = (level_def(level), next) else {
        return 1.0;
    };
    let span = next.xp.saturating_sub(current.xp);
    if span == 0 {
        return 1.0;
    }
    let gained = xp.saturating_sub(current.xp);
    (gained as f64 / span as f64).clamp(0.0, 1.0)
}
