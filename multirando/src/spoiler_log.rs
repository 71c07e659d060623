use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::traverse::{collect_spheres, new_state};
use crate::world::{GameKind, World};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpoilerItemLoc {
    pub item: String,
    pub location: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpoilerSphere {
    pub sphere: usize,
    pub items: Vec<SpoilerItemLoc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpoilerEntrance {
    pub entrance: String,
    pub destination: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpoilerLog {
    pub game: GameKind,
    pub seed: usize,
    pub difficulty: Difficulty,
    pub entrances: Vec<SpoilerEntrance>,
    // Per-game details, same as the slot data handed to the client.
    pub game_data: BTreeMap<String, serde_json::Value>,
    pub playthrough: Vec<SpoilerSphere>,
    pub all_items: Vec<SpoilerItemLoc>,
}

/// Builds the spoiler log of a filled world. Event locations are left out, and
/// playthrough spheres only list progression items.
pub fn get_spoiler_log(world: &dyn World, difficulty: Difficulty, seed: usize) -> Result<SpoilerLog> {
    let graph = world.graph();
    let catalog = world.catalog();

    let item_loc = |loc: usize| -> Option<SpoilerItemLoc> {
        let location = &graph.locations[loc];
        let item = location.item?;
        if !location.show_in_spoiler {
            return None;
        }
        Some(SpoilerItemLoc {
            item: catalog.item_name(item.idx).to_string(),
            location: location.name.clone(),
        })
    };

    let mut state = new_state(graph, catalog);
    let spheres = collect_spheres(graph, catalog, &mut state);
    let mut playthrough = vec![];
    for sphere in spheres {
        let items: Vec<SpoilerItemLoc> = sphere
            .into_iter()
            .filter(|&loc| {
                graph.locations[loc]
                    .item
                    .is_some_and(|x| x.classification.is_progression())
            })
            .filter_map(item_loc)
            .collect();
        if !items.is_empty() {
            playthrough.push(SpoilerSphere {
                sphere: playthrough.len() + 1,
                items,
            });
        }
    }

    let all_items = (0..graph.locations.len()).filter_map(item_loc).collect();
    let entrances = world
        .spoiler_entrances()
        .into_iter()
        .map(|(entrance, destination)| SpoilerEntrance {
            entrance,
            destination,
        })
        .collect();

    Ok(SpoilerLog {
        game: world.game(),
        seed,
        difficulty,
        entrances,
        game_data: world.slot_data(),
        playthrough,
        all_items,
    })
}
