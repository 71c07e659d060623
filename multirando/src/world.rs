use std::collections::BTreeMap;

use anyhow::Result;
use multirando_game::{Item, ItemCatalog, Rule};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumString, VariantNames};

use crate::graph::WorldGraph;
use crate::settings::GenerationSettings;
use crate::worlds::hat_in_time::HatInTimeWorld;

#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, EnumString, VariantNames, Serialize, Deserialize,
)]
pub enum GameKind {
    #[default]
    HatInTime,
}

/// One game's contribution to a generation.
///
/// The driver calls `build_regions`, `build_item_pool` and `build_rules` once each,
/// in that order, all with the same generator.
pub trait World {
    fn game(&self) -> GameKind;
    fn catalog(&self) -> &ItemCatalog;
    fn graph(&self) -> &WorldGraph;
    // For callers that fill the graph while looking items up in the catalog.
    fn catalog_and_graph_mut(&mut self) -> (&ItemCatalog, &mut WorldGraph);

    fn build_regions(&mut self, rng: &mut StdRng) -> Result<()>;
    /// Items to place, one per empty location.
    fn build_item_pool(&mut self, rng: &mut StdRng) -> Result<Vec<Item>>;
    fn build_rules(&mut self, rng: &mut StdRng) -> Result<()>;
    fn completion_condition(&self) -> Result<Rule>;

    fn slot_data(&self) -> BTreeMap<String, serde_json::Value>;
    /// Shuffled region assignments as (entrance slot, destination) names.
    fn spoiler_entrances(&self) -> Vec<(String, String)> {
        vec![]
    }
}

pub fn make_world(settings: &GenerationSettings) -> Result<Box<dyn World>> {
    settings.validate()?;
    Ok(match settings.game {
        GameKind::HatInTime => Box::new(HatInTimeWorld::new(
            settings.hat_in_time.clone(),
            settings.difficulty,
        )?),
    })
}
