use anyhow::Result;
use multirando::difficulty::{apply_difficulty_tiers, Difficulty, TierPass};
use multirando::graph::WorldGraph;
use multirando::rules::{Combinator, RuleTarget};
use multirando::traverse::{can_reach_location, can_reach_region, new_state};
use multirando_game::{
    DlcFlags, ItemCatalog, ItemClassification, ItemData, ItemIdx, LocationIdx, Rule,
};
use multirando_logic::CollectionState;

fn catalog() -> Result<ItemCatalog> {
    let items = ["Umbrella", "Brewing Hat", "Hookshot Badge", "Token"]
        .iter()
        .enumerate()
        .map(|(i, name)| ItemData {
            name: name.to_string(),
            code: Some(2_000_300_000 + i as u64),
            classification: ItemClassification::Progression,
            dlc: DlcFlags::empty(),
        })
        .collect();
    ItemCatalog::new(items)
}

fn state_with(graph: &WorldGraph, catalog: &ItemCatalog, items: &[(ItemIdx, usize)]) -> CollectionState {
    let mut state = new_state(graph, catalog);
    for &(item, count) in items {
        for _ in 0..count {
            state.collect(item, catalog);
        }
    }
    state
}

#[test]
fn and_then_or_composition() -> Result<()> {
    let catalog = catalog()?;
    let umbrella = catalog.item_idx("Umbrella")?;
    let brewing = catalog.item_idx("Brewing Hat")?;
    let mut graph = WorldGraph::new();
    let menu = graph.create_region("Menu")?;
    let chest = graph.add_location(menu, "Chest", Some(1))?;
    graph.add_rule(RuleTarget::Location(chest), Rule::item(umbrella), Combinator::And);
    graph.add_rule(RuleTarget::Location(chest), Rule::item(brewing), Combinator::Or);

    let mut state = state_with(&graph, &catalog, &[(umbrella, 1)]);
    assert!(can_reach_location(&graph, &mut state, chest));
    let mut state = state_with(&graph, &catalog, &[(brewing, 1)]);
    assert!(can_reach_location(&graph, &mut state, chest));
    let mut state = state_with(&graph, &catalog, &[]);
    assert!(!can_reach_location(&graph, &mut state, chest));
    Ok(())
}

struct TieredWorld {
    graph: WorldGraph,
    ledge: LocationIdx,
}

fn free_ledge(world: &mut TieredWorld) -> Result<()> {
    world.graph.set_rule(RuleTarget::Location(world.ledge), Rule::Free);
    Ok(())
}

#[test]
fn hard_tier_frees_location() -> Result<()> {
    let catalog = catalog()?;
    let hookshot = catalog.item_idx("Hookshot Badge")?;
    let passes = [TierPass {
        tier: Difficulty::Hard,
        name: "free ledge",
        apply: free_ledge,
    }];

    for difficulty in [
        Difficulty::Normal,
        Difficulty::Moderate,
        Difficulty::Hard,
        Difficulty::Expert,
    ] {
        let mut graph = WorldGraph::new();
        let menu = graph.create_region("Menu")?;
        let ledge = graph.add_location(menu, "Ledge", Some(1))?;
        graph.set_rule(RuleTarget::Location(ledge), Rule::item(hookshot));
        let mut world = TieredWorld { graph, ledge };
        apply_difficulty_tiers(&mut world, difficulty, &passes)?;

        let mut empty = state_with(&world.graph, &catalog, &[]);
        let reachable = can_reach_location(&world.graph, &mut empty, ledge);
        assert_eq!(reachable, difficulty >= Difficulty::Hard, "{difficulty:?}");

        let mut with_hookshot = state_with(&world.graph, &catalog, &[(hookshot, 1)]);
        assert!(can_reach_location(&world.graph, &mut with_hookshot, ledge));
    }
    Ok(())
}

#[test]
fn token_cost_gates_chapter() -> Result<()> {
    let catalog = catalog()?;
    let token = catalog.item_idx("Token")?;
    let mut graph = WorldGraph::new();
    let menu = graph.create_region("Menu")?;
    let chapter = graph.create_region("Chapter")?;
    let door = graph.connect(menu, chapter, "Telescope")?;
    graph.set_rule(RuleTarget::Entrance(door), Rule::item_count(token, 5));

    let mut state = state_with(&graph, &catalog, &[(token, 4)]);
    assert!(!can_reach_region(&graph, &mut state, chapter));
    state.collect(token, &catalog);
    assert_eq!(state.count(token), 5);
    assert!(can_reach_region(&graph, &mut state, chapter));
    Ok(())
}

#[test]
fn indirect_condition_opens_portal() -> Result<()> {
    // The portal sits in an early region but opens once the act region far away is
    // reached, which happens only after the portal was first looked at.
    let catalog = catalog()?;
    let mut graph = WorldGraph::new();
    let menu = graph.create_region("Menu")?;
    let hub = graph.create_region("Hub")?;
    let corridor = graph.create_region("Corridor")?;
    let act = graph.create_region("Act")?;
    let rift = graph.create_region("Rift")?;
    graph.connect(menu, hub, "Menu -> Hub")?;
    let portal = graph.connect(hub, rift, "Rift Portal")?;
    graph.connect(menu, corridor, "Menu -> Corridor")?;
    graph.connect(corridor, act, "Corridor -> Act")?;
    graph.set_rule(RuleTarget::Entrance(portal), Rule::Region(act));
    graph.register_indirect_condition(act, portal);

    let mut state = state_with(&graph, &catalog, &[]);
    assert!(can_reach_region(&graph, &mut state, rift));
    Ok(())
}

#[test]
fn event_sees_later_rule_edits() -> Result<()> {
    let mut catalog = catalog()?;
    let umbrella = catalog.item_idx("Umbrella")?;
    let hookshot = catalog.item_idx("Hookshot Badge")?;
    let event_item = catalog.add_event_item("Act Completion (Barrel Battle)")?;
    let mut graph = WorldGraph::new();
    let menu = graph.create_region("Menu")?;
    let completion = graph.add_location(menu, "Act Completion", Some(1))?;
    graph.set_rule(RuleTarget::Location(completion), Rule::item(hookshot));
    let event = graph.create_event(menu, "Barrel Battle Cleared", catalog.create_item("Act Completion (Barrel Battle)")?)?;
    graph.copy_location_rule(RuleTarget::Location(event), completion);

    // Tightened after the event was wired up.
    graph.add_rule(RuleTarget::Location(completion), Rule::item(umbrella), Combinator::And);

    let mut state = state_with(&graph, &catalog, &[(hookshot, 1)]);
    assert!(!can_reach_location(&graph, &mut state, event));
    let mut state = state_with(&graph, &catalog, &[(hookshot, 1), (umbrella, 1)]);
    assert!(can_reach_location(&graph, &mut state, event));

    let locked = &graph.locations[event];
    assert!(locked.locked);
    assert!(!locked.show_in_spoiler);
    assert_eq!(locked.item.map(|x| x.idx), Some(event_item));
    Ok(())
}
