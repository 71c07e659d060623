use anyhow::{bail, Result};
use log::{debug, info};
use multirando_game::{Item, ItemCatalog, LocationIdx};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::graph::WorldGraph;
use crate::traverse::{can_reach_location, new_state, sweep};

/// Assumed fill: each progression item goes to a random empty location that is
/// reachable while holding every progression item not yet placed, plus whatever the
/// placed items and events already unlock.
pub fn fill_progression<R: Rng>(
    graph: &mut WorldGraph,
    catalog: &ItemCatalog,
    mut items: Vec<Item>,
    rng: &mut R,
) -> Result<()> {
    items.shuffle(rng);
    let total = items.len();
    while let Some(item) = items.pop() {
        let mut state = new_state(graph, catalog);
        for other in &items {
            state.collect(other.idx, catalog);
        }
        sweep(graph, catalog, &mut state);

        let open: Vec<LocationIdx> = graph
            .empty_locations()
            .into_iter()
            .filter(|&loc| can_reach_location(graph, &mut state, loc))
            .collect();
        let Some(&loc) = open.choose(rng) else {
            bail!(
                "No reachable location left for {} ({} progression items unplaced)",
                catalog.item_name(item.idx),
                items.len() + 1
            );
        };
        debug!(
            "Placing {} at {} ({} candidates)",
            catalog.item_name(item.idx),
            graph.locations[loc].name,
            open.len()
        );
        graph.place_item(loc, item)?;
    }
    info!("Placed {total} progression items");
    Ok(())
}

/// Fills every remaining empty location, one item each.
pub fn fill_remaining<R: Rng>(graph: &mut WorldGraph, mut items: Vec<Item>, rng: &mut R) -> Result<()> {
    let mut locations = graph.empty_locations();
    if locations.len() != items.len() {
        bail!(
            "{} items left for {} empty locations",
            items.len(),
            locations.len()
        );
    }
    locations.shuffle(rng);
    items.shuffle(rng);
    for (loc, item) in locations.into_iter().zip(items) {
        graph.place_item(loc, item)?;
    }
    Ok(())
}
