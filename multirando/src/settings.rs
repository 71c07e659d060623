use std::collections::BTreeMap;

use anyhow::{bail, Result};
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumString, VariantNames};

use crate::difficulty::Difficulty;
use crate::randomize::chapter_costs::CostLadderSettings;
use crate::world::GameKind;
use crate::worlds::hat_in_time::LOCATIONS;

// Trap weights are relative; capping them keeps their sum well inside usize.
const MAX_TRAP_WEIGHT: usize = 100;

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
#[serde(default)]
pub struct GenerationSettings {
    pub game: GameKind,
    pub difficulty: Difficulty,
    pub hat_in_time: HatInTimeSettings,
}

impl GenerationSettings {
    pub fn validate(&self) -> Result<()> {
        match self.game {
            GameKind::HatInTime => self.hat_in_time.validate(),
        }
    }
}

#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumString,
    VariantNames,
    TryFromPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum ChapterIndex {
    Spaceship = 0,
    Mafia = 1,
    Birds = 2,
    Subcon = 3,
    Alpine = 4,
    Finale = 5,
    Cruise = 6,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumString, VariantNames, Serialize, Deserialize)]
pub enum ActRandomizer {
    Disabled,
    // Time rifts only swap with time rifts of the same color.
    Light,
    Insanity,
}

/// What, besides the Time Stop Hat, counts as a way to clear Cheating the Race.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumString, VariantNames, Serialize, Deserialize)]
pub enum CtrLogic {
    TimeStopOnly,
    Scooter,
    Sprint,
    Nothing,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct HatInTimeSettings {
    pub starting_chapter: ChapterIndex,
    pub act_randomizer: ActRandomizer,
    pub finale_shuffle: bool,
    // Act region name -> name of the act region to put behind it.
    pub act_plando: BTreeMap<String, String>,
    pub shuffle_act_contracts: bool,
    pub shuffle_alpine_ziplines: bool,
    pub umbrella_logic: bool,
    // Subcon Forest paintings are locked until their Progressive Painting Unlock is found.
    pub shuffle_subcon_paintings: bool,
    // Moderate and up otherwise assume the painting walls can be skipped.
    pub no_painting_skips: bool,
    pub hat_items: bool,
    pub randomize_hat_order: bool,
    pub enable_dlc1: bool,
    pub exclude_tour: bool,
    pub ctr_logic: CtrLogic,
    pub chapter_costs: CostLadderSettings,
    pub final_chapter_min_cost: usize,
    pub final_chapter_max_cost: usize,
    pub time_piece_count: usize,
    pub max_extra_time_pieces: usize,
    pub time_piece_balance_percent: usize,
    pub yarn_balance_percent: usize,
    pub yarn_cost_min: usize,
    pub yarn_cost_max: usize,
    pub yarn_available: usize,
    pub min_extra_yarn: usize,
    pub trap_chance: usize,
    pub baby_trap_weight: usize,
    pub laser_trap_weight: usize,
    pub parade_trap_weight: usize,
    pub badge_seller_min_items: usize,
    pub badge_seller_max_items: usize,
}

impl Default for HatInTimeSettings {
    fn default() -> Self {
        HatInTimeSettings {
            starting_chapter: ChapterIndex::Mafia,
            act_randomizer: ActRandomizer::Light,
            finale_shuffle: false,
            act_plando: BTreeMap::new(),
            shuffle_act_contracts: true,
            shuffle_alpine_ziplines: false,
            umbrella_logic: false,
            shuffle_subcon_paintings: false,
            no_painting_skips: false,
            hat_items: false,
            randomize_hat_order: true,
            enable_dlc1: false,
            exclude_tour: false,
            ctr_logic: CtrLogic::TimeStopOnly,
            chapter_costs: CostLadderSettings {
                lowest: 4,
                highest: 16,
                increment: 4,
                min_difference: 4,
            },
            final_chapter_min_cost: 20,
            final_chapter_max_cost: 24,
            time_piece_count: 30,
            max_extra_time_pieces: 6,
            time_piece_balance_percent: 35,
            yarn_balance_percent: 20,
            yarn_cost_min: 2,
            yarn_cost_max: 4,
            yarn_available: 16,
            min_extra_yarn: 4,
            trap_chance: 0,
            baby_trap_weight: 40,
            laser_trap_weight: 40,
            parade_trap_weight: 20,
            badge_seller_min_items: 4,
            badge_seller_max_items: 8,
        }
    }
}

impl HatInTimeSettings {
    pub fn validate(&self) -> Result<()> {
        if !matches!(
            self.starting_chapter,
            ChapterIndex::Mafia | ChapterIndex::Birds | ChapterIndex::Subcon | ChapterIndex::Alpine
        ) {
            bail!(
                "Invalid starting chapter {:?}: must be one of Mafia, Birds, Subcon, Alpine",
                self.starting_chapter
            );
        }
        if self.shuffle_subcon_paintings && self.starting_chapter == ChapterIndex::Subcon {
            bail!("Cannot start in Subcon Forest with shuffle_subcon_paintings");
        }
        self.chapter_costs.validate()?;
        if self.final_chapter_min_cost > self.final_chapter_max_cost {
            bail!(
                "final_chapter_min_cost ({}) exceeds final_chapter_max_cost ({})",
                self.final_chapter_min_cost,
                self.final_chapter_max_cost
            );
        }
        if self.final_chapter_max_cost > self.time_piece_count {
            bail!(
                "final_chapter_max_cost ({}) exceeds time_piece_count ({})",
                self.final_chapter_max_cost,
                self.time_piece_count
            );
        }
        // Every count below ends up as a number of pool items, so none can exceed the
        // location table.
        let max_count = LOCATIONS.len();
        let time_pieces = self
            .time_piece_count
            .checked_add(self.max_extra_time_pieces)
            .filter(|&n| n <= max_count);
        if time_pieces.is_none() {
            bail!(
                "time_piece_count ({}) plus max_extra_time_pieces ({}) exceeds {} locations",
                self.time_piece_count,
                self.max_extra_time_pieces,
                max_count
            );
        }
        for (name, value) in [
            ("chapter_costs.increment", self.chapter_costs.increment),
            ("chapter_costs.min_difference", self.chapter_costs.min_difference),
        ] {
            if value > self.time_piece_count {
                bail!(
                    "{name} ({value}) exceeds time_piece_count ({})",
                    self.time_piece_count
                );
            }
        }
        for (name, value) in [
            ("yarn_cost_max", self.yarn_cost_max),
            ("yarn_available", self.yarn_available),
            ("min_extra_yarn", self.min_extra_yarn),
            ("badge_seller_max_items", self.badge_seller_max_items),
        ] {
            if value > max_count {
                bail!("{name} ({value}) exceeds {max_count} locations");
            }
        }
        for (name, value) in [
            ("baby_trap_weight", self.baby_trap_weight),
            ("laser_trap_weight", self.laser_trap_weight),
            ("parade_trap_weight", self.parade_trap_weight),
        ] {
            if value > MAX_TRAP_WEIGHT {
                bail!("{name} ({value}) must be at most {MAX_TRAP_WEIGHT}");
            }
        }
        if self.chapter_costs.highest > self.time_piece_count {
            bail!(
                "Highest chapter cost ({}) exceeds time_piece_count ({})",
                self.chapter_costs.highest,
                self.time_piece_count
            );
        }
        if self.yarn_cost_min > self.yarn_cost_max {
            bail!(
                "yarn_cost_min ({}) exceeds yarn_cost_max ({})",
                self.yarn_cost_min,
                self.yarn_cost_max
            );
        }
        if self.badge_seller_min_items > self.badge_seller_max_items {
            bail!(
                "badge_seller_min_items ({}) exceeds badge_seller_max_items ({})",
                self.badge_seller_min_items,
                self.badge_seller_max_items
            );
        }
        if self.time_piece_balance_percent > 100 || self.yarn_balance_percent > 100 {
            bail!("Balance percentages must be at most 100");
        }
        if self.trap_chance > 100 {
            bail!("trap_chance ({}) must be at most 100", self.trap_chance);
        }
        if self.trap_chance > 0
            && self.baby_trap_weight + self.laser_trap_weight + self.parade_trap_weight == 0
        {
            bail!("trap_chance is set but every trap weight is 0");
        }
        Ok(())
    }
}

pub fn parse_generation_settings(settings_json: &str) -> Result<GenerationSettings> {
    let mut des = serde_json::Deserializer::from_str(settings_json);
    let settings: GenerationSettings = serde_path_to_error::deserialize(&mut des)?;
    settings.validate()?;
    Ok(settings)
}
