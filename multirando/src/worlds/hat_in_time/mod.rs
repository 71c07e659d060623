//! A Hat in Time: chapters gated by Time Piece costs, acts reachable through a
//! telescope hub, and optionally shuffled acts and time rifts.

mod items;
mod locations;
mod regions;
mod rules;

use std::collections::BTreeMap;

use anyhow::Result;
use log::info;
use multirando_game::{DlcFlags, Item, ItemCatalog, LocationCatalog, Rule};
use rand::rngs::StdRng;
use serde_json::json;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::difficulty::Difficulty;
use crate::graph::WorldGraph;
use crate::settings::{ActRandomizer, ChapterIndex, HatInTimeSettings};
use crate::world::{GameKind, World};

pub use items::{item_catalog, ITEM_TABLE};
pub use locations::{
    act_completion, location_catalog, LocationEntry, EVENTS, LOCATIONS, TIME_PIECE_CLUSTER,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum HatType {
    Sprint,
    Brewing,
    Ice,
    Dweller,
    TimeStop,
}

impl HatType {
    pub fn item_name(self) -> &'static str {
        match self {
            HatType::Sprint => "Sprint Hat",
            HatType::Brewing => "Brewing Hat",
            HatType::Ice => "Ice Hat",
            HatType::Dweller => "Dweller Mask",
            HatType::TimeStop => "Time Stop Hat",
        }
    }
}

pub struct HatInTimeWorld {
    settings: HatInTimeSettings,
    difficulty: Difficulty,
    enabled_dlc: DlcFlags,
    catalog: ItemCatalog,
    location_catalog: LocationCatalog,
    graph: WorldGraph,
    chapter_costs: BTreeMap<ChapterIndex, usize>,
    // Indexed by HatType.
    hat_yarn_costs: [usize; 5],
    hat_craft_order: Vec<HatType>,
    // Act identifier -> identifier of the act now played in its place.
    act_connections: BTreeMap<String, String>,
    act_assignments: Vec<(String, String)>,
    badge_seller_item_count: usize,
}

impl HatInTimeWorld {
    pub fn new(settings: HatInTimeSettings, difficulty: Difficulty) -> Result<Self> {
        settings.validate()?;
        let mut enabled_dlc = DlcFlags::empty();
        if settings.enable_dlc1 {
            enabled_dlc |= DlcFlags::DLC1;
        }
        Ok(HatInTimeWorld {
            settings,
            difficulty,
            enabled_dlc,
            catalog: item_catalog()?,
            location_catalog: location_catalog()?,
            graph: WorldGraph::new(),
            chapter_costs: BTreeMap::new(),
            hat_yarn_costs: [0; 5],
            hat_craft_order: HatType::iter().collect(),
            act_connections: BTreeMap::new(),
            act_assignments: vec![],
            badge_seller_item_count: 0,
        })
    }

    pub fn dlc1(&self) -> bool {
        self.enabled_dlc.contains(DlcFlags::DLC1)
    }

    pub fn chapter_cost(&self, chapter: ChapterIndex) -> usize {
        self.chapter_costs.get(&chapter).copied().unwrap_or(0)
    }

    /// Yarn needed to craft `hat`, counting every hat crafted before it.
    pub fn hat_yarn_requirement(&self, hat: HatType) -> usize {
        let mut total = 0;
        for &h in &self.hat_craft_order {
            total += self.hat_yarn_costs[h as usize];
            if h == hat {
                break;
            }
        }
        total
    }
}

impl World for HatInTimeWorld {
    fn game(&self) -> GameKind {
        GameKind::HatInTime
    }

    fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    fn graph(&self) -> &WorldGraph {
        &self.graph
    }

    fn catalog_and_graph_mut(&mut self) -> (&ItemCatalog, &mut WorldGraph) {
        (&self.catalog, &mut self.graph)
    }

    fn build_regions(&mut self, rng: &mut StdRng) -> Result<()> {
        self.create_regions(rng)?;
        if self.settings.act_randomizer != ActRandomizer::Disabled {
            self.randomize_act_entrances(rng)?;
        }
        self.create_events()?;
        self.place_contracts()?;
        info!(
            "Created {} regions, {} entrances, {} locations",
            self.graph.regions.len(),
            self.graph.entrances.len(),
            self.graph.locations.len()
        );
        Ok(())
    }

    fn build_item_pool(&mut self, rng: &mut StdRng) -> Result<Vec<Item>> {
        self.create_item_pool(rng)
    }

    fn build_rules(&mut self, rng: &mut StdRng) -> Result<()> {
        self.set_rules(rng)
    }

    fn completion_condition(&self) -> Result<Rule> {
        Ok(Rule::item(self.catalog.item_idx(TIME_PIECE_CLUSTER)?))
    }

    fn slot_data(&self) -> BTreeMap<String, serde_json::Value> {
        let mut data = BTreeMap::new();
        for (&chapter, &cost) in &self.chapter_costs {
            data.insert(format!("Chapter{}Cost", chapter as u8), json!(cost));
        }
        if !self.settings.hat_items {
            let costs: BTreeMap<String, usize> = HatType::iter()
                .map(|hat| (format!("{hat:?}"), self.hat_yarn_costs[hat as usize]))
                .collect();
            data.insert("HatYarnCosts".to_string(), json!(costs));
            let order: Vec<String> = self.hat_craft_order.iter().map(|h| format!("{h:?}")).collect();
            data.insert("HatCraftOrder".to_string(), json!(order));
        }
        data.insert("ActConnections".to_string(), json!(self.act_connections));
        data.insert("BadgeSellerItemCount".to_string(), json!(self.badge_seller_item_count));
        data.insert("Difficulty".to_string(), json!(self.difficulty));
        data.insert("HatItems".to_string(), json!(self.settings.hat_items));
        data.insert("UmbrellaLogic".to_string(), json!(self.settings.umbrella_logic));
        data.insert(
            "ShuffleSubconPaintings".to_string(),
            json!(self.settings.shuffle_subcon_paintings),
        );
        data.insert("NoPaintingSkips".to_string(), json!(self.settings.no_painting_skips));
        data.insert("EnableDLC1".to_string(), json!(self.dlc1()));
        data.insert(
            "ShuffleActContracts".to_string(),
            json!(self.settings.shuffle_act_contracts),
        );
        data.insert(
            "ShuffleAlpineZiplines".to_string(),
            json!(self.settings.shuffle_alpine_ziplines),
        );
        data
    }

    fn spoiler_entrances(&self) -> Vec<(String, String)> {
        self.act_assignments.clone()
    }
}
