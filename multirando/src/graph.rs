use anyhow::{bail, Result};
use multirando_game::{
    EntranceIdx, IndexedVec, Item, ItemClassification, LocationCode, LocationIdx, RegionIdx, Rule,
};

pub const START_REGION: &str = "Menu";

#[derive(Clone, Debug)]
pub struct Region {
    pub name: String,
    pub locations: Vec<LocationIdx>,
    pub exits: Vec<EntranceIdx>,
    pub entrances: Vec<EntranceIdx>,
}

#[derive(Clone, Debug)]
pub struct Entrance {
    pub name: String,
    pub parent: RegionIdx,
    pub target: RegionIdx,
    // None means always passable.
    pub rule: Option<Rule>,
    pub group: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Location {
    pub name: String,
    // None for event locations.
    pub code: Option<LocationCode>,
    pub region: RegionIdx,
    pub rule: Option<Rule>,
    pub item: Option<Item>,
    pub locked: bool,
    pub show_in_spoiler: bool,
}

impl Location {
    pub fn is_event(&self) -> bool {
        self.code.is_none()
    }
}

/// Arena holding one world's regions, entrances and locations, addressed by index.
///
/// `reconnect` is the only operation that changes which regions an existing
/// entrance joins, and it keeps the exit and entrance lists of every region in sync.
#[derive(Clone, Debug, Default)]
pub struct WorldGraph {
    pub regions: Vec<Region>,
    pub entrances: Vec<Entrance>,
    pub locations: Vec<Location>,
    pub region_isv: IndexedVec<String>,
    pub entrance_isv: IndexedVec<String>,
    pub location_isv: IndexedVec<String>,
    // Entrances to re-examine when the region (by index) becomes reachable.
    pub indirect_conditions: Vec<Vec<EntranceIdx>>,
}

impl WorldGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_region(&mut self, name: &str) -> Result<RegionIdx> {
        if self.region_isv.index_by_key.contains_key(name) {
            bail!("Duplicate region: {name}");
        }
        let idx = self.region_isv.add(name);
        self.regions.push(Region {
            name: name.to_string(),
            locations: vec![],
            exits: vec![],
            entrances: vec![],
        });
        self.indirect_conditions.push(vec![]);
        Ok(idx)
    }

    /// Creates a one-way entrance. Games with two-way transitions connect both directions.
    pub fn connect(&mut self, from: RegionIdx, to: RegionIdx, name: &str) -> Result<EntranceIdx> {
        if self.entrance_isv.index_by_key.contains_key(name) {
            bail!("Duplicate entrance: {name}");
        }
        let idx = self.entrance_isv.add(name);
        self.entrances.push(Entrance {
            name: name.to_string(),
            parent: from,
            target: to,
            rule: None,
            group: None,
        });
        self.regions[from].exits.push(idx);
        self.regions[to].entrances.push(idx);
        Ok(idx)
    }

    pub fn reconnect(&mut self, entrance: EntranceIdx, new_from: RegionIdx, new_to: RegionIdx) {
        let old_from = self.entrances[entrance].parent;
        let old_to = self.entrances[entrance].target;

        // Remove by value from every list that could hold the entrance, so that a
        // repeated call, or a call on an entrance already in the new lists, is harmless.
        for r in [old_from, new_from] {
            self.regions[r].exits.retain(|&e| e != entrance);
        }
        for r in [old_to, new_to] {
            self.regions[r].entrances.retain(|&e| e != entrance);
        }

        self.regions[new_from].exits.push(entrance);
        self.regions[new_to].entrances.push(entrance);
        let e = &mut self.entrances[entrance];
        e.parent = new_from;
        e.target = new_to;
    }

    pub fn get_region(&self, name: &str) -> Result<RegionIdx> {
        match self.region_isv.index_by_key.get(name) {
            Some(&idx) => Ok(idx),
            None => bail!("Region not found: {name}"),
        }
    }

    pub fn get_entrance(&self, name: &str) -> Result<EntranceIdx> {
        match self.entrance_isv.index_by_key.get(name) {
            Some(&idx) => Ok(idx),
            None => bail!("Entrance not found: {name}"),
        }
    }

    pub fn get_location(&self, name: &str) -> Result<LocationIdx> {
        match self.location_isv.index_by_key.get(name) {
            Some(&idx) => Ok(idx),
            None => bail!("Location not found: {name}"),
        }
    }

    pub fn start_region(&self) -> Result<RegionIdx> {
        self.get_region(START_REGION)
    }

    pub fn add_location(
        &mut self,
        region: RegionIdx,
        name: &str,
        code: Option<LocationCode>,
    ) -> Result<LocationIdx> {
        if self.location_isv.index_by_key.contains_key(name) {
            bail!("Duplicate location: {name}");
        }
        let idx = self.location_isv.add(name);
        self.locations.push(Location {
            name: name.to_string(),
            code,
            region,
            rule: None,
            item: None,
            locked: false,
            show_in_spoiler: true,
        });
        self.regions[region].locations.push(idx);
        Ok(idx)
    }

    pub fn place_item(&mut self, location: LocationIdx, item: Item) -> Result<()> {
        let loc = &mut self.locations[location];
        if let Some(existing) = loc.item {
            bail!(
                "Location {} already holds item {}",
                loc.name,
                existing.idx
            );
        }
        loc.item = Some(item);
        Ok(())
    }

    pub fn place_locked_item(&mut self, location: LocationIdx, item: Item) -> Result<()> {
        self.place_item(location, item)?;
        self.locations[location].locked = true;
        Ok(())
    }

    /// Creates an event location in `region` holding the locked progression item `item`.
    /// Events have no code and are left out of the spoiler log.
    pub fn create_event(
        &mut self,
        region: RegionIdx,
        name: &str,
        item: Item,
    ) -> Result<LocationIdx> {
        let location = self.add_location(region, name, None)?;
        self.place_locked_item(
            location,
            Item {
                idx: item.idx,
                classification: ItemClassification::Progression,
            },
        )?;
        self.locations[location].show_in_spoiler = false;
        Ok(location)
    }

    /// Declares that the rule of `entrance` depends on whether `region` is reachable.
    pub fn register_indirect_condition(&mut self, region: RegionIdx, entrance: EntranceIdx) {
        let deps = &mut self.indirect_conditions[region];
        if !deps.contains(&entrance) {
            deps.push(entrance);
        }
    }

    /// Non-event locations that have not been filled yet, in index order.
    pub fn empty_locations(&self) -> Vec<LocationIdx> {
        (0..self.locations.len())
            .filter(|&i| !self.locations[i].is_event() && self.locations[i].item.is_none())
            .collect()
    }

    pub fn check_well_formed(&self) -> Result<()> {
        let mut exit_count = vec![0; self.entrances.len()];
        let mut entrance_count = vec![0; self.entrances.len()];
        for (r, region) in self.regions.iter().enumerate() {
            for &e in &region.exits {
                exit_count[e] += 1;
                if self.entrances[e].parent != r {
                    bail!(
                        "Entrance {} is listed as an exit of {} but its parent is {}",
                        self.entrances[e].name,
                        region.name,
                        self.regions[self.entrances[e].parent].name
                    );
                }
            }
            for &e in &region.entrances {
                entrance_count[e] += 1;
                if self.entrances[e].target != r {
                    bail!(
                        "Entrance {} is listed as leading into {} but its target is {}",
                        self.entrances[e].name,
                        region.name,
                        self.regions[self.entrances[e].target].name
                    );
                }
            }
        }
        for (e, entrance) in self.entrances.iter().enumerate() {
            if exit_count[e] != 1 || entrance_count[e] != 1 {
                bail!(
                    "Entrance {} appears in {} exit lists and {} entrance lists",
                    entrance.name,
                    exit_count[e],
                    entrance_count[e]
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_names_fail() -> Result<()> {
        let mut graph = WorldGraph::new();
        let menu = graph.create_region("Menu")?;
        assert!(graph.create_region("Menu").is_err());
        graph.connect(menu, menu, "Loop")?;
        assert!(graph.connect(menu, menu, "Loop").is_err());
        Ok(())
    }

    #[test]
    fn test_missing_names_are_reported() {
        let graph = WorldGraph::new();
        let err = graph.get_region("Nowhere").unwrap_err().to_string();
        assert!(err.contains("Nowhere"));
        assert!(graph.get_entrance("Nowhere -> Elsewhere").is_err());
    }

    #[test]
    fn test_connect_is_one_way() -> Result<()> {
        let mut graph = WorldGraph::new();
        let a = graph.create_region("A")?;
        let b = graph.create_region("B")?;
        let e = graph.connect(a, b, "A -> B")?;
        assert_eq!(graph.regions[a].exits, vec![e]);
        assert_eq!(graph.regions[b].entrances, vec![e]);
        assert!(graph.regions[b].exits.is_empty());
        assert!(graph.regions[a].entrances.is_empty());
        Ok(())
    }

    #[test]
    fn test_reconnect_is_idempotent() -> Result<()> {
        let mut graph = WorldGraph::new();
        let a = graph.create_region("A")?;
        let b = graph.create_region("B")?;
        let c = graph.create_region("C")?;
        let e = graph.connect(a, b, "A -> B")?;
        graph.reconnect(e, c, a);
        graph.reconnect(e, c, a);
        graph.check_well_formed()?;
        assert!(graph.regions[a].exits.is_empty());
        assert!(graph.regions[b].entrances.is_empty());
        assert_eq!(graph.regions[c].exits, vec![e]);
        assert_eq!(graph.regions[a].entrances, vec![e]);
        Ok(())
    }

    #[test]
    fn test_event_is_locked_and_hidden() -> Result<()> {
        let mut graph = WorldGraph::new();
        let a = graph.create_region("A")?;
        let item = Item {
            idx: 0,
            classification: ItemClassification::Filler,
        };
        let loc = graph.create_event(a, "Boss Defeated", item)?;
        let location = &graph.locations[loc];
        assert!(location.is_event() && location.locked && !location.show_in_spoiler);
        assert_eq!(
            location.item.map(|x| x.classification),
            Some(ItemClassification::Progression)
        );
        assert!(graph.empty_locations().is_empty());
        assert!(graph.place_item(loc, item).is_err());
        Ok(())
    }
}
