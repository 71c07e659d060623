use std::collections::VecDeque;

use log::debug;
use multirando_game::{ItemCatalog, LocationIdx, RegionIdx, Rule};
use multirando_logic::CollectionState;

use crate::graph::{WorldGraph, START_REGION};

// Bounds chains of location rule references, which could otherwise loop forever.
const MAX_RULE_DEPTH: usize = 64;

pub fn new_state(graph: &WorldGraph, catalog: &ItemCatalog) -> CollectionState {
    CollectionState::new(catalog, graph.regions.len(), graph.locations.len())
}

/// Evaluates a rule against the state's current reachability memo.
///
/// This never fails: a rule referencing an unreachable region, or a chain of
/// location rule references deeper than the limit, simply evaluates to false.
pub fn apply_rule(rule: &Rule, state: &CollectionState, graph: &WorldGraph) -> bool {
    apply_rule_depth(rule, state, graph, 0)
}

fn apply_rule_depth(rule: &Rule, state: &CollectionState, graph: &WorldGraph, depth: usize) -> bool {
    if depth > MAX_RULE_DEPTH {
        return false;
    }
    match rule {
        Rule::Free => true,
        Rule::Never => false,
        Rule::Item { item, count } => state.has(*item, *count),
        Rule::Group { group, count } => state.has_group(*group, *count),
        Rule::Region(r) => state.can_reach_region(*r),
        Rule::Location(l) => {
            let loc = &graph.locations[*l];
            state.can_reach_region(loc.region)
                && loc
                    .rule
                    .as_ref()
                    .map_or(true, |r| apply_rule_depth(r, state, graph, depth + 1))
        }
        Rule::LocationRule(l) => graph.locations[*l]
            .rule
            .as_ref()
            .map_or(true, |r| apply_rule_depth(r, state, graph, depth + 1)),
        Rule::And(rules) => rules
            .iter()
            .all(|r| apply_rule_depth(r, state, graph, depth + 1)),
        Rule::Or(rules) => rules
            .iter()
            .any(|r| apply_rule_depth(r, state, graph, depth + 1)),
    }
}

/// Brings the reachable-region memo up to date with the items in `state`.
///
/// Entrances are examined in queue order: first the ones blocked on the previous
/// update (in index order), then the exits of each region as it becomes reachable,
/// along with any entrances registered as depending on that region. An entrance whose
/// rule looks at a region without being registered is only rechecked on the next
/// update, after another item is collected.
pub fn update_reachability(graph: &WorldGraph, state: &mut CollectionState) {
    if !state.stale {
        return;
    }
    state.stale = false;

    let mut queue: VecDeque<usize> = VecDeque::new();
    queue.extend(std::mem::take(&mut state.blocked_entrances));
    if let Some(&start) = graph.region_isv.index_by_key.get(START_REGION) {
        if state.mark_reachable(start) {
            queue.extend(graph.regions[start].exits.iter().copied());
        }
    }

    let mut blocked: Vec<usize> = vec![];
    while let Some(e) = queue.pop_front() {
        let entrance = &graph.entrances[e];
        if state.can_reach_region(entrance.target) || !state.can_reach_region(entrance.parent) {
            continue;
        }
        let passable = entrance
            .rule
            .as_ref()
            .map_or(true, |r| apply_rule(r, state, graph));
        if passable {
            state.mark_reachable(entrance.target);
            queue.extend(graph.regions[entrance.target].exits.iter().copied());
            queue.extend(graph.indirect_conditions[entrance.target].iter().copied());
        } else {
            blocked.push(e);
        }
    }
    blocked.sort();
    blocked.dedup();
    blocked.retain(|&e| !state.can_reach_region(graph.entrances[e].target));
    state.blocked_entrances = blocked;
}

pub fn can_reach_region(graph: &WorldGraph, state: &mut CollectionState, region: RegionIdx) -> bool {
    update_reachability(graph, state);
    state.can_reach_region(region)
}

pub fn can_reach_location(
    graph: &WorldGraph,
    state: &mut CollectionState,
    location: LocationIdx,
) -> bool {
    update_reachability(graph, state);
    apply_rule(&Rule::Location(location), state, graph)
}

/// Repeatedly collects every reachable placed item until nothing new is found.
/// Returns the newly checked locations grouped by the round they were found in.
pub fn collect_spheres(
    graph: &WorldGraph,
    catalog: &ItemCatalog,
    state: &mut CollectionState,
) -> Vec<Vec<LocationIdx>> {
    let mut spheres: Vec<Vec<LocationIdx>> = vec![];
    loop {
        update_reachability(graph, state);
        let mut found: Vec<LocationIdx> = vec![];
        for (l, loc) in graph.locations.iter().enumerate() {
            if loc.item.is_none() || state.is_checked(l) {
                continue;
            }
            if apply_rule(&Rule::Location(l), state, graph) {
                found.push(l);
            }
        }
        if found.is_empty() {
            break;
        }
        for &l in &found {
            state.mark_checked(l);
            if let Some(item) = graph.locations[l].item {
                state.collect(item.idx, catalog);
            }
        }
        debug!("Sphere {}: {} locations", spheres.len(), found.len());
        spheres.push(found);
    }
    spheres
}

pub fn sweep(graph: &WorldGraph, catalog: &ItemCatalog, state: &mut CollectionState) {
    collect_spheres(graph, catalog, state);
}

pub fn is_beatable(graph: &WorldGraph, catalog: &ItemCatalog, completion: &Rule) -> bool {
    let mut state = new_state(graph, catalog);
    sweep(graph, catalog, &mut state);
    apply_rule(completion, &state, graph)
}
