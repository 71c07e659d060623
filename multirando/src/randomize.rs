pub mod chapter_costs;
pub mod entrance_shuffle;

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use log::info;
use multirando_game::Item;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::item_placement::{fill_progression, fill_remaining};
use crate::settings::GenerationSettings;
use crate::spoiler_log::{get_spoiler_log, SpoilerLog};
use crate::traverse::is_beatable;
use crate::world::{make_world, GameKind, World};

pub fn seeded_rng(seed: usize) -> StdRng {
    let mut rng_seed = [0u8; 32];
    rng_seed[..8].copy_from_slice(&seed.to_le_bytes());
    StdRng::from_seed(rng_seed)
}

pub struct Randomization {
    pub seed: usize,
    pub game: GameKind,
    // Location name -> item name, real locations only.
    pub placements: BTreeMap<String, String>,
    pub spoiler_log: SpoilerLog,
    pub slot_data: BTreeMap<String, serde_json::Value>,
}

/// Runs one generation attempt for `world`, drawing every random choice from `seed`.
pub fn generate(world: &mut dyn World, settings: &GenerationSettings, seed: usize) -> Result<Randomization> {
    let mut rng = seeded_rng(seed);
    world.build_regions(&mut rng).context("building regions")?;
    let pool = world.build_item_pool(&mut rng).context("building item pool")?;
    world.build_rules(&mut rng).context("building rules")?;
    let completion = world.completion_condition()?;

    let (catalog, graph) = world.catalog_and_graph_mut();
    graph.check_well_formed()?;
    let open = graph.empty_locations().len();
    if pool.len() != open {
        bail!("Item pool has {} items for {open} empty locations", pool.len());
    }
    let (progression, filler): (Vec<Item>, Vec<Item>) = pool
        .into_iter()
        .partition(|item| item.classification.is_progression());
    fill_progression(graph, catalog, progression, &mut rng)?;
    fill_remaining(graph, filler, &mut rng)?;
    if !is_beatable(graph, catalog, &completion) {
        bail!("Completion condition unreachable after fill");
    }

    let graph = world.graph();
    let catalog = world.catalog();
    let placements = graph
        .locations
        .iter()
        .filter(|loc| !loc.is_event())
        .filter_map(|loc| {
            loc.item
                .map(|item| (loc.name.clone(), catalog.item_name(item.idx).to_string()))
        })
        .collect();
    let spoiler_log = get_spoiler_log(&*world, settings.difficulty, seed)?;
    info!("Generated {:?} seed {seed}", world.game());
    Ok(Randomization {
        seed,
        game: world.game(),
        placements,
        spoiler_log,
        slot_data: world.slot_data(),
    })
}

pub fn randomize(settings: &GenerationSettings, seed: usize) -> Result<Randomization> {
    let mut world = make_world(settings)?;
    generate(world.as_mut(), settings, seed)
}
