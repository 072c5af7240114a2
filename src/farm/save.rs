//! Royal Farm save/load.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: current save layout. Bump it when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: oldest layout that can still be migrated.
//!   Adding fields alone leaves it unchanged.
//!
//! The blob is the camelCase JSON tree (`meta`, `player`, `inventory`, `farm`,
//! `settings`) run through [`codec::obfuscate`]. Older saves are migrated by
//! applying every field they carry onto a fresh [`FarmState`] template, so
//! anything added since (new crops, new sections) keeps its default.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::codec;
use super::config::{self, CropKind};
use super::error::CorruptionError;
use super::state::{Farm, FarmState, Plot};

/// Current save layout.
/// v1: original tree with `plantTime`/`duration` zeroed on empty plots.
/// v2: `unlockedPlots`, settings section.
/// v3: nullable planting fields.
pub const SAVE_VERSION: u32 = 3;

/// Oldest layout that can still be migrated. Bump only on breaking changes.
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// Saves written by early builds tagged the version as a string ("2", "2.1").
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
enum VersionTag {
    Number(u32),
    Text(String),
}

impl VersionTag {
    fn major(&self) -> u32 {
        match self {
            VersionTag::Number(n) => *n,
            VersionTag::Text(s) => s
                .split('.')
                .next()
                .and_then(|major| major.trim().parse().ok())
                .unwrap_or(0),
        }
    }
}

impl Default for VersionTag {
    fn default() -> Self {
        VersionTag::Number(0)
    }
}

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct SaveData {
    meta: MetaSave,
    player: Option<PlayerSave>,
    inventory: InventorySave,
    farm: Option<FarmSave>,
    settings: Option<SettingsSave>,
}

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
struct MetaSave {
    version: VersionTag,
    last_login: Option<u64>,
    start_timestamp: Option<u64>,
}

/// Every field optional so a partial section keeps the template's values.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default)]
struct PlayerSave {
    name: Option<String>,
    money: Option<u64>,
    xp: Option<u64>,
    level: Option<u32>,
}

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default)]
struct InventorySave {
    /// Keyed by `CropKind::id()`. Unknown ids are dropped on load.
    seeds: BTreeMap<String, u32>,
    crops: BTreeMap<String, u32>,
}

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
struct FarmSave {
    plots: Vec<PlotSave>,
    unlocked_plots: Option<usize>,
}

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
struct PlotSave {
    id: usize,
    status: String,
    crop_id: Option<String>,
    plant_time: Option<u64>,
    duration: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
struct SettingsSave {
    sound: bool,
    music: bool,
    vibration: bool,
}

impl Default for SettingsSave {
    fn default() -> Self {
        Self {
            sound: true,
            music: true,
            vibration: true,
        }
    }
}

impl SaveData {
    pub(crate) fn version(&self) -> u32 {
        self.meta.version.major()
    }
}

/// Extract the save DTO from a live state.
pub(crate) fn extract_save(state: &FarmState) -> SaveData {
    let ids = |counts: &BTreeMap<CropKind, u32>| -> BTreeMap<String, u32> {
        counts.iter().map(|(k, n)| (k.id().to_string(), *n)).collect()
    };

    SaveData {
        meta: MetaSave {
            version: VersionTag::Number(SAVE_VERSION),
            last_login: Some(state.meta.last_login),
            start_timestamp: Some(state.meta.game_start),
        },
        player: Some(PlayerSave {
            name: Some(state.player.name.clone()),
            money: Some(state.player.money),
            xp: Some(state.player.xp),
            level: Some(state.player.level),
        }),
        inventory: InventorySave {
            seeds: ids(&state.inventory.seeds),
            crops: ids(&state.inventory.crops),
        },
        farm: Some(FarmSave {
            plots: state
                .farm
                .plots
                .iter()
                .map(|p| PlotSave {
                    id: p.id,
                    status: p.status.as_str().to_string(),
                    crop_id: p.crop.map(|c| c.id().to_string()),
                    plant_time: p.planted_at,
                    duration: p.duration_ms,
                })
                .collect(),
            unlocked_plots: Some(state.farm.unlocked_plots),
        }),
        settings: Some(SettingsSave {
            sound: state.settings.sound,
            music: state.settings.music,
            vibration: state.settings.vibration,
        }),
    }
}

/// Rebuild one plot from its saved form.
///
/// A plot whose planting data can't be trusted (unknown crop, missing
/// timestamp) falls back to the template plot for its slot. Saves from v1
/// did not record a duration; those take the crop's current grow time.
fn restore_plot(id: usize, saved: &PlotSave, unlocked: usize) -> Plot {
    let template = Farm::template_plot(id, unlocked);
    match saved.status.as_str() {
        "locked" => Plot::locked(id),
        "growing" | "ready" => {
            let crop = saved.crop_id.as_deref().and_then(CropKind::from_id);
            let (Some(crop), Some(planted_at)) = (crop, saved.plant_time) else {
                return template;
            };
            let duration = saved
                .duration
                .filter(|d| *d > 0)
                .unwrap_or_else(|| crop.grow_ms());
            let mut plot = Plot::growing(id, crop, planted_at, duration);
            if saved.status == "ready" {
                plot.mark_ready();
            }
            plot
        }
        _ => template,
    }
}

/// Size the plot list to `count`: extra saved plots are dropped, missing
/// ones come from the template. Ids are reassigned from position.
fn reconcile_plots(saved: &[PlotSave], count: usize, unlocked: usize) -> Vec<Plot> {
    (0..count)
        .map(|i| match saved.get(i) {
            Some(p) => restore_plot(i, p, unlocked),
            None => Farm::template_plot(i, unlocked),
        })
        .collect()
}

/// Apply a decoded save onto `template`, field by field.
/// Crops or plots the save doesn't cover keep the template's values.
pub(crate) fn migrate(save: &SaveData, template: FarmState) -> Result<FarmState, CorruptionError> {
    let version = save.version();
    if version < MIN_COMPATIBLE_VERSION {
        return Err(CorruptionError::IncompatibleVersion {
            found: version,
            min_compatible: MIN_COMPATIBLE_VERSION,
        });
    }

    let mut state = template;

    if let Some(t) = save.meta.last_login {
        state.meta.last_login = t;
    }
    if let Some(t) = save.meta.start_timestamp {
        state.meta.game_start = t;
    }

    if let Some(player) = &save.player {
        if let Some(name) = &player.name {
            state.player.name = name.clone();
        }
        if let Some(money) = player.money {
            state.player.money = money;
        }
        if let Some(xp) = player.xp {
            state.player.xp = xp;
        }
        if let Some(level) = player.level {
            state.player.level = level.clamp(1, config::LEVELS.len() as u32);
        }
    }

    for (id, n) in &save.inventory.seeds {
        if let Some(kind) = CropKind::from_id(id) {
            state.inventory.seeds.insert(kind, *n);
        }
    }
    for (id, n) in &save.inventory.crops {
        if let Some(kind) = CropKind::from_id(id) {
            state.inventory.crops.insert(kind, *n);
        }
    }

    if let Some(farm) = &save.farm {
        let count = state.farm.plots.len();
        let unlocked = farm.unlocked_plots.unwrap_or(state.farm.unlocked_plots).min(count);
        state.farm.unlocked_plots = unlocked;
        state.farm.plots = reconcile_plots(&farm.plots, count, unlocked);
    }

    if let Some(settings) = &save.settings {
        state.settings.sound = settings.sound;
        state.settings.music = settings.music;
        state.settings.vibration = settings.vibration;
    }

    state.meta.version = SAVE_VERSION;
    Ok(state)
}

/// Serialize and obfuscate the state into a storable blob.
pub fn encode(state: &FarmState) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(&extract_save(state))?;
    Ok(codec::obfuscate(&json))
}

/// Reverse the transform and parse, without migrating.
pub(crate) fn decode_save(blob: &str) -> Result<SaveData, CorruptionError> {
    let json = codec::reveal(blob)?;
    Ok(serde_json::from_str(&json)?)
}

/// Decode a blob into a current-layout state. `template` supplies everything
/// the save does not carry.
pub fn decode(blob: &str, template: FarmState) -> Result<FarmState, CorruptionError> {
    let save = decode_save(blob)?;
    migrate(&save, template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::farm::config::PLOT_COUNT;
    use crate::farm::state::PlotStatus;

    fn template() -> FarmState {
        FarmState::new(1_000)
    }

    fn blob_of(json: &str) -> String {
        codec::obfuscate(json)
    }

    #[test]
    fn encode_decode_roundtrip() {
        let mut original = template();
        original.player.name = "Amina".into();
        original.player.money = 4_321;
        original.player.xp = 77;
        original.player.level = 2;
        original.inventory.seeds.insert(CropKind::Corn, 4);
        original.inventory.crops.insert(CropKind::Wheat, 9);
        original.farm.plots[0] = Plot::growing(0, CropKind::Wheat, 500, 5_000);
        original.farm.plots[1] = Plot::growing(1, CropKind::Corn, 600, 120_000);
        original.farm.plots[1].mark_ready();
        original.settings.vibration = false;

        let blob = encode(&original).unwrap();
        let restored = decode(&blob, FarmState::new(9_999)).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn blob_is_not_plain_json() {
        let blob = encode(&template()).unwrap();
        assert!(!blob.contains('{'));
        assert!(!blob.contains("money"));
    }

    #[test]
    fn json_uses_camel_case_tree() {
        let json = serde_json::to_string(&extract_save(&template())).unwrap();
        assert!(json.contains("\"unlockedPlots\""));
        assert!(json.contains("\"startTimestamp\""));
        assert!(json.contains("\"cropId\""));
        assert!(json.contains("\"wheat\":3"));
    }

    #[test]
    fn garbage_blob_is_corruption() {
        assert!(decode("%%%%", template()).is_err());
        assert!(decode("abc", template()).is_err());
        assert!(matches!(
            decode(&blob_of("{\"player\": "), template()),
            Err(CorruptionError::Malformed(_))
        ));
    }

    /// An old save with fewer fields restores what it has.
    #[test]
    fn migrate_old_version_fills_new_fields_from_template() {
        let old = r#"{
            "meta": { "version": "1.0", "lastLogin": 2000, "startTimestamp": 500 },
            "player": { "name": "Old Timer", "money": 250, "xp": 60, "level": 2 },
            "inventory": { "seeds": { "wheat": 0, "corn": 2 }, "crops": { "wheat": 5 } },
            "farm": { "plots": [
                { "id": 0, "status": "growing", "cropId": "wheat", "plantTime": 1500, "duration": 0 },
                { "id": 1, "status": "empty", "cropId": null, "plantTime": 0, "duration": 0 }
            ] }
        }"#;

        let state = decode(&blob_of(old), template()).unwrap();
        assert_eq!(state.player.name, "Old Timer");
        assert_eq!(state.player.money, 250);
        assert_eq!(state.player.level, 2);
        assert_eq!(state.meta.game_start, 500);
        assert_eq!(state.meta.last_login, 2000);
        assert_eq!(state.meta.version, SAVE_VERSION);

        // saved wheat=0 wins over the starter gift
        assert_eq!(state.inventory.seed_count(CropKind::Wheat), 0);
        assert_eq!(state.inventory.seed_count(CropKind::Corn), 2);
        assert_eq!(state.inventory.crop_count(CropKind::Wheat), 5);
        // crops added to the catalog later are present with zero
        assert_eq!(state.inventory.seed_count(CropKind::Pumpkin), 0);
        assert_eq!(state.inventory.seeds.len(), CropKind::all().len());

        // v1 saved no duration: current grow time is used
        assert_eq!(state.farm.plots[0].duration_ms, Some(CropKind::Wheat.grow_ms()));
        assert_eq!(state.farm.plots[1], Plot::empty(1));
        // settings section did not exist
        assert!(state.settings.vibration);
    }

    #[test]
    fn missing_inventory_key_keeps_template_value() {
        let json = r#"{ "meta": { "version": 3 }, "inventory": { "seeds": { "corn": 1 } } }"#;
        let state = decode(&blob_of(json), template()).unwrap();
        assert_eq!(state.inventory.seed_count(CropKind::Wheat), 3);
        assert_eq!(state.inventory.seed_count(CropKind::Corn), 1);
    }

    #[test]
    fn unknown_crop_ids_are_dropped() {
        let json = r#"{ "meta": { "version": 3 },
            "inventory": { "seeds": { "mandrake": 7 }, "crops": {} },
            "farm": { "plots": [
                { "id": 0, "status": "ready", "cropId": "mandrake", "plantTime": 1, "duration": 1 }
            ] } }"#;
        let state = decode(&blob_of(json), template()).unwrap();
        assert_eq!(state.inventory.seeds.len(), CropKind::all().len());
        assert_eq!(state.farm.plots[0], Plot::empty(0));
    }

    #[test]
    fn out_of_range_level_is_clamped_to_the_table() {
        let json = r#"{ "meta": { "version": 3 }, "player": { "level": 4294967295 } }"#;
        let mut state = decode(&blob_of(json), template()).unwrap();
        assert_eq!(state.player.level, config::LEVELS.len() as u32);
        assert_eq!(crate::farm::store::check_level_up(&mut state.player), None);
        assert_eq!(config::level_progress(state.player.xp, state.player.level), 1.0);
    }

    #[test]
    fn far_future_plant_time_does_not_overflow() {
        let json = r#"{ "meta": { "version": 3 }, "farm": { "plots": [
            { "id": 0, "status": "growing", "cropId": "wheat",
              "plantTime": 18446744073709551615, "duration": 5000 }
        ] } }"#;
        let state = decode(&blob_of(json), template()).unwrap();
        let plot = &state.farm.plots[0];
        assert_eq!(plot.status, PlotStatus::Growing);
        assert_eq!(crate::farm::growth::remaining_ms(plot, 1_000), Some(u64::MAX - 1_000));
        assert_eq!(crate::farm::growth::progress(plot, 1_000), 0.0);
        assert!(!crate::farm::growth::is_mature(plot, 1_000));
    }

    #[test]
    fn long_plot_list_is_truncated() {
        let plots: Vec<String> = (0..PLOT_COUNT + 4)
            .map(|i| format!(r#"{{ "id": {i}, "status": "empty" }}"#))
            .collect();
        let json = format!(
            r#"{{ "meta": {{ "version": 3 }}, "farm": {{ "plots": [{}] }} }}"#,
            plots.join(",")
        );
        let state = decode(&blob_of(&json), template()).unwrap();
        assert_eq!(state.farm.plots.len(), PLOT_COUNT);
    }

    #[test]
    fn short_plot_list_is_padded_from_template() {
        let json = r#"{ "meta": { "version": 3 }, "farm": { "plots": [
            { "id": 0, "status": "growing", "cropId": "corn", "plantTime": 10, "duration": 99 }
        ], "unlockedPlots": 4 } }"#;
        let state = decode(&blob_of(json), template()).unwrap();
        assert_eq!(state.farm.plots.len(), PLOT_COUNT);
        assert_eq!(state.farm.plots[0].status, PlotStatus::Growing);
        assert_eq!(state.farm.plots[0].duration_ms, Some(99));
        assert_eq!(state.farm.plots[3].status, PlotStatus::Empty);
        assert_eq!(state.farm.plots[4].status, PlotStatus::Locked);
        for (i, p) in state.farm.plots.iter().enumerate() {
            assert_eq!(p.id, i);
        }
    }

    #[test]
    fn growing_plot_without_timestamp_falls_back_to_template() {
        let json = r#"{ "meta": { "version": 3 }, "farm": { "plots": [
            { "id": 0, "status": "growing", "cropId": "corn" }
        ] } }"#;
        let state = decode(&blob_of(json), template()).unwrap();
        assert_eq!(state.farm.plots[0], Plot::empty(0));
    }

    /// Anything below MIN_COMPATIBLE_VERSION is incompatible.
    #[test]
    fn version_below_min_compatible_is_rejected() {
        let json = r#"{ "meta": { "version": 0 }, "player": { "money": 1 } }"#;
        assert_eq!(
            decode(&blob_of(json), template()),
            Err(CorruptionError::IncompatibleVersion {
                found: 0,
                min_compatible: MIN_COMPATIBLE_VERSION,
            })
        );
    }

    #[test]
    fn unknown_fields_in_json_are_ignored() {
        let json = r#"{ "meta": { "version": 3 },
            "player": { "money": 42, "avatar": null },
            "barn": { "milk": 3.5, "cows": 1 } }"#;
        let state = decode(&blob_of(json), template()).unwrap();
        assert_eq!(state.player.money, 42);
    }

    #[test]
    fn level_zero_is_clamped_to_one() {
        let json = r#"{ "meta": { "version": 3 }, "player": { "level": 0 } }"#;
        let state = decode(&blob_of(json), template()).unwrap();
        assert_eq!(state.player.level, 1);
    }

    #[test]
    fn version_tag_parses_numbers_and_strings() {
        assert_eq!(VersionTag::Number(3).major(), 3);
        assert_eq!(VersionTag::Text("2.1".into()).major(), 2);
        assert_eq!(VersionTag::Text("beta".into()).major(), 0);
    }
}
