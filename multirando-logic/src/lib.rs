use multirando_game::{EntranceIdx, GroupIdx, ItemCatalog, ItemIdx, LocationIdx, RegionIdx};

/// Items obtained so far, plus the region reachability memo derived from them.
///
/// The state only ever grows: items are never removed, and once a region is marked
/// reachable it stays reachable. Collecting an item marks the memo stale so the next
/// reachability update re-examines the blocked entrances.
#[derive(Clone, Debug)]
pub struct CollectionState {
    pub counts: Vec<usize>,
    pub group_counts: Vec<usize>,
    pub reachable_regions: Vec<bool>,
    // Entrances with a reachable parent whose rule failed on the last update.
    pub blocked_entrances: Vec<EntranceIdx>,
    pub checked_locations: Vec<bool>,
    pub stale: bool,
}

impl CollectionState {
    pub fn new(catalog: &ItemCatalog, num_regions: usize, num_locations: usize) -> Self {
        CollectionState {
            counts: vec![0; catalog.num_items()],
            group_counts: vec![0; catalog.num_groups()],
            reachable_regions: vec![false; num_regions],
            blocked_entrances: vec![],
            checked_locations: vec![false; num_locations],
            stale: true,
        }
    }

    pub fn collect(&mut self, item: ItemIdx, catalog: &ItemCatalog) {
        self.counts[item] += 1;
        for &group in &catalog.groups_by_item[item] {
            self.group_counts[group] += 1;
        }
        self.stale = true;
    }

    pub fn has(&self, item: ItemIdx, count: usize) -> bool {
        self.counts[item] >= count
    }

    pub fn count(&self, item: ItemIdx) -> usize {
        self.counts[item]
    }

    pub fn count_group(&self, group: GroupIdx) -> usize {
        self.group_counts[group]
    }

    pub fn has_group(&self, group: GroupIdx, count: usize) -> bool {
        self.group_counts[group] >= count
    }

    /// Reads the memo only; it is current after the last reachability update.
    pub fn can_reach_region(&self, region: RegionIdx) -> bool {
        self.reachable_regions[region]
    }

    /// Returns true if the region was not reachable before.
    pub fn mark_reachable(&mut self, region: RegionIdx) -> bool {
        if self.reachable_regions[region] {
            false
        } else {
            self.reachable_regions[region] = true;
            true
        }
    }

    pub fn is_checked(&self, location: LocationIdx) -> bool {
        self.checked_locations[location]
    }

    pub fn mark_checked(&mut self, location: LocationIdx) {
        self.checked_locations[location] = true;
    }

    /// Item-wise containment: every item count here is at least the other state's count.
    pub fn contains(&self, other: &CollectionState) -> bool {
        self.counts.len() == other.counts.len()
            && self.counts.iter().zip(&other.counts).all(|(a, b)| a >= b)
    }
}
