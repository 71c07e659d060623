use std::cmp::Reverse;
use std::collections::BTreeMap;

use anyhow::{bail, Result};
use hashbrown::{HashMap, HashSet};
use log::{info, warn};
use multirando_game::{EntranceIdx, RegionIdx};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::graph::WorldGraph;

/// A region whose incoming entrances get rewired together to a shuffled destination.
#[derive(Clone, Debug)]
pub struct ShuffleSlot {
    pub region: RegionIdx,
    pub entrances: Vec<EntranceIdx>,
    pub group: usize,
    // Slots with higher priority are matched earlier, while more candidates remain.
    pub priority: u8,
}

#[derive(Clone, Debug)]
pub struct ShuffleCandidate {
    pub region: RegionIdx,
    pub group: usize,
}

#[derive(Clone, Debug, Default)]
pub struct ShuffleConstraints {
    pub separate_groups: bool,
    // (slot region, candidate region) pairs that must not be matched.
    pub blacklist: HashSet<(RegionIdx, RegionIdx)>,
    // The slot that provides the very first access point, and the regions it may lead to.
    pub first_access_slot: Option<RegionIdx>,
    pub first_access_candidates: Vec<RegionIdx>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShuffleAssignment {
    pub slot: RegionIdx,
    pub target: RegionIdx,
    pub pinned: bool,
    pub relaxed: bool,
}

/// Turns user pins (slot region name -> target region name) into region pairs,
/// warning about and dropping any pin that cannot be honored.
pub fn validate_pins(
    graph: &WorldGraph,
    slots: &[ShuffleSlot],
    candidates: &[ShuffleCandidate],
    constraints: &ShuffleConstraints,
    requested: &BTreeMap<String, String>,
) -> Vec<(RegionIdx, RegionIdx)> {
    let mut pins: Vec<(RegionIdx, RegionIdx)> = vec![];
    let mut pinned_targets: HashSet<RegionIdx> = HashSet::new();
    for (slot_name, target_name) in requested {
        let slot = graph
            .get_region(slot_name)
            .ok()
            .filter(|r| slots.iter().any(|s| s.region == *r));
        let target = graph
            .get_region(target_name)
            .ok()
            .filter(|r| candidates.iter().any(|c| c.region == *r));
        let (Some(slot), Some(target)) = (slot, target) else {
            warn!("Plando {slot_name} -> {target_name} names an unknown or unshuffled region; ignoring it");
            continue;
        };
        if constraints.blacklist.contains(&(slot, target)) {
            warn!("Plando {slot_name} -> {target_name} is a disallowed combination; ignoring it");
            continue;
        }
        if constraints.first_access_slot == Some(slot)
            && !constraints.first_access_candidates.contains(&target)
        {
            warn!("Plando {slot_name} -> {target_name} would put an uncompletable region first; ignoring it");
            continue;
        }
        if !pinned_targets.insert(target) {
            warn!("Plando {slot_name} -> {target_name} reuses a target that is already pinned; ignoring it");
            continue;
        }
        pins.push((slot, target));
    }
    pins
}

/// Matches every slot to a distinct candidate region and rewires the slot's
/// entrances to lead there.
///
/// Slots are shuffled, then ordered: the first access slot, pinned slots, then the
/// rest by decreasing priority. Each slot takes its pin if still free, otherwise a
/// uniformly random candidate passing the constraints. When no candidate passes, the
/// first unused candidate is taken anyway; only running out of unused candidates fails.
pub fn shuffle_entrances<R: Rng>(
    graph: &mut WorldGraph,
    slots: &[ShuffleSlot],
    candidates: &[ShuffleCandidate],
    constraints: &ShuffleConstraints,
    pins: &[(RegionIdx, RegionIdx)],
    rng: &mut R,
) -> Result<Vec<ShuffleAssignment>> {
    let pin_by_slot: HashMap<RegionIdx, RegionIdx> = pins.iter().copied().collect();
    let pinned_targets: HashSet<RegionIdx> = pins.iter().map(|&(_, t)| t).collect();

    let mut order: Vec<usize> = (0..slots.len()).collect();
    order.shuffle(rng);
    order.sort_by_key(|&i| {
        let slot = &slots[i];
        let class = if constraints.first_access_slot == Some(slot.region) {
            0
        } else if pin_by_slot.contains_key(&slot.region) {
            1
        } else {
            2
        };
        (class, Reverse(slot.priority))
    });

    let mut candidate_order: Vec<usize> = (0..candidates.len()).collect();
    candidate_order.shuffle(rng);
    let mut used = vec![false; candidates.len()];
    let mut assignments: Vec<ShuffleAssignment> = vec![];

    for &i in &order {
        let slot = &slots[i];
        let slot_name = graph.regions[slot.region].name.clone();
        let pin = pin_by_slot.get(&slot.region).copied();
        let mut chosen: Option<usize> = None;
        if let Some(target) = pin {
            chosen = candidate_order
                .iter()
                .copied()
                .find(|&j| !used[j] && candidates[j].region == target);
            if chosen.is_none() {
                warn!(
                    "Pinned target {} for {slot_name} is already taken",
                    graph.regions[target].name
                );
            }
        }
        let pinned = chosen.is_some();

        let mut relaxed = false;
        if chosen.is_none() {
            let is_first = constraints.first_access_slot == Some(slot.region);
            let valid: Vec<usize> = candidate_order
                .iter()
                .copied()
                .filter(|&j| {
                    let c = &candidates[j];
                    !used[j]
                        && !pinned_targets.contains(&c.region)
                        && !constraints.blacklist.contains(&(slot.region, c.region))
                        && (!constraints.separate_groups || c.group == slot.group)
                        && (!is_first || constraints.first_access_candidates.contains(&c.region))
                })
                .collect();
            if !valid.is_empty() {
                chosen = Some(valid[rng.gen_range(0..valid.len())]);
            } else {
                chosen = candidate_order.iter().copied().find(|&j| !used[j]);
                relaxed = true;
            }
        }

        let Some(j) = chosen else {
            bail!("No unused region left to shuffle {slot_name} into");
        };
        used[j] = true;
        let target = candidates[j].region;
        if relaxed {
            warn!(
                "No candidate satisfies the constraints for {slot_name}; falling back to {}",
                graph.regions[target].name
            );
        }
        for &e in &slot.entrances {
            let parent = graph.entrances[e].parent;
            graph.reconnect(e, parent, target);
        }
        assignments.push(ShuffleAssignment {
            slot: slot.region,
            target,
            pinned,
            relaxed,
        });
    }
    info!(
        "Shuffled {} regions ({} pinned, {} relaxed)",
        assignments.len(),
        assignments.iter().filter(|a| a.pinned).count(),
        assignments.iter().filter(|a| a.relaxed).count()
    );
    Ok(assignments)
}
