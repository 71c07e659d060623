// The changes suggested by this lint usually make the code more cluttered and less clear:
#![allow(clippy::needless_range_loop)]
// TODO: consider removing this later. It's not a bad lint but I don't want to deal with it now.
#![allow(clippy::too_many_arguments)]

use anyhow::{bail, Context, Result};
use bitflags::bitflags;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::borrow::ToOwned;
use std::hash::Hash;
use strum_macros::{EnumString, VariantNames};

pub type ItemIdx = usize; // Index into ItemCatalog.items
pub type GroupIdx = usize; // Index into ItemCatalog.groups
pub type RegionIdx = usize; // Index into WorldGraph.regions
pub type EntranceIdx = usize; // Index into WorldGraph.entrances
pub type LocationIdx = usize; // Index into WorldGraph.locations
pub type ItemCode = u64;
pub type LocationCode = u64;

#[derive(Default, Clone, Debug)]
pub struct IndexedVec<T: Hash + Eq> {
    pub keys: Vec<T>,
    pub index_by_key: HashMap<T, usize>,
}

impl<T: Hash + Eq> IndexedVec<T> {
    pub fn add<U: ToOwned<Owned = T> + ?Sized>(&mut self, name: &U) -> usize {
        let key = name.to_owned();
        if let Some(&idx) = self.index_by_key.get(&key) {
            idx
        } else {
            let idx = self.keys.len();
            self.index_by_key.insert(name.to_owned(), idx);
            self.keys.push(key);
            idx
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    VariantNames,
    Serialize,
    Deserialize,
    PartialOrd,
    Ord,
)]
pub enum ItemClassification {
    Filler,
    Useful,
    Trap,
    Progression,
    // Required for completion, but excluded from progression balancing.
    ProgressionSkipBalancing,
}

impl ItemClassification {
    pub fn is_progression(self) -> bool {
        matches!(
            self,
            ItemClassification::Progression | ItemClassification::ProgressionSkipBalancing
        )
    }
}

bitflags! {
    /// Content packs an item or location belongs to.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct DlcFlags: u8 {
        const DLC1 = 0b001;
        const DLC2 = 0b010;
        const DEATH_WISH = 0b100;
    }
}

impl DlcFlags {
    /// An empty flag set means base game content, which is always enabled.
    pub fn is_enabled_by(self, enabled: DlcFlags) -> bool {
        enabled.contains(self)
    }
}

#[derive(Clone, Debug)]
pub struct ItemData {
    pub name: String,
    // None for event items, which never leave their locked location.
    pub code: Option<ItemCode>,
    pub classification: ItemClassification,
    pub dlc: DlcFlags,
}

/// One instance of an item in a pool. Instances carry their own classification,
/// since a share of skip-balancing items may be promoted to full progression.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub idx: ItemIdx,
    pub classification: ItemClassification,
}

#[derive(Clone, Debug, Default)]
pub struct ItemCatalog {
    pub items: Vec<ItemData>,
    pub item_isv: IndexedVec<String>,
    pub group_isv: IndexedVec<String>,
    pub groups: Vec<Vec<ItemIdx>>,
    pub groups_by_item: Vec<Vec<GroupIdx>>,
    pub item_by_code: HashMap<ItemCode, ItemIdx>,
}

impl ItemCatalog {
    pub fn new(items: Vec<ItemData>) -> Result<Self> {
        let mut catalog = ItemCatalog::default();
        for data in items {
            catalog.add_item(data)?;
        }
        Ok(catalog)
    }

    fn add_item(&mut self, data: ItemData) -> Result<ItemIdx> {
        if self.item_isv.index_by_key.contains_key(&data.name) {
            bail!("Duplicate item name: {}", data.name);
        }
        let idx = self.item_isv.add(&data.name);
        if let Some(code) = data.code {
            if let Some(&other) = self.item_by_code.get(&code) {
                bail!(
                    "Item code {code} is used by both {} and {}",
                    self.items[other].name,
                    data.name
                );
            }
            self.item_by_code.insert(code, idx);
        }
        self.items.push(data);
        self.groups_by_item.push(vec![]);
        Ok(idx)
    }

    /// Registers a code-less progression item used only by event locations.
    /// Several events may share one event item, so an existing event item is reused.
    pub fn add_event_item(&mut self, name: &str) -> Result<ItemIdx> {
        if let Some(&idx) = self.item_isv.index_by_key.get(name) {
            if self.items[idx].code.is_some() {
                bail!("Event item {name} collides with a regular item");
            }
            return Ok(idx);
        }
        self.add_item(ItemData {
            name: name.to_string(),
            code: None,
            classification: ItemClassification::Progression,
            dlc: DlcFlags::empty(),
        })
    }

    pub fn add_group(&mut self, name: &str, members: &[&str]) -> Result<GroupIdx> {
        if self.group_isv.index_by_key.contains_key(name) {
            bail!("Duplicate item group: {name}");
        }
        let mut member_idxs = vec![];
        for &member in members {
            let item_idx = self
                .item_idx(member)
                .with_context(|| format!("in item group {name}"))?;
            member_idxs.push(item_idx);
        }
        let group_idx = self.group_isv.add(name);
        for &item_idx in &member_idxs {
            self.groups_by_item[item_idx].push(group_idx);
        }
        self.groups.push(member_idxs);
        Ok(group_idx)
    }

    pub fn item_idx(&self, name: &str) -> Result<ItemIdx> {
        match self.item_isv.index_by_key.get(name) {
            Some(&idx) => Ok(idx),
            None => bail!("Unknown item: {name}"),
        }
    }

    pub fn group_idx(&self, name: &str) -> Result<GroupIdx> {
        match self.group_isv.index_by_key.get(name) {
            Some(&idx) => Ok(idx),
            None => bail!("Unknown item group: {name}"),
        }
    }

    pub fn item_name(&self, idx: ItemIdx) -> &str {
        &self.items[idx].name
    }

    /// Creates a pool instance with the catalog's default classification.
    pub fn create_item(&self, name: &str) -> Result<Item> {
        let idx = self.item_idx(name)?;
        Ok(Item {
            idx,
            classification: self.items[idx].classification,
        })
    }

    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }
}

#[derive(Clone, Debug)]
pub struct LocationData {
    pub name: String,
    pub code: LocationCode,
    pub region: String,
    pub dlc: DlcFlags,
}

/// Flat per-game table of real (code-carrying) locations.
#[derive(Clone, Debug, Default)]
pub struct LocationCatalog {
    pub locations: Vec<LocationData>,
    pub location_isv: IndexedVec<String>,
    pub location_by_code: HashMap<LocationCode, usize>,
}

impl LocationCatalog {
    pub fn new(locations: Vec<LocationData>) -> Result<Self> {
        let mut catalog = LocationCatalog::default();
        for data in locations {
            if catalog.location_isv.index_by_key.contains_key(&data.name) {
                bail!("Duplicate location name: {}", data.name);
            }
            let idx = catalog.location_isv.add(&data.name);
            if let Some(&other) = catalog.location_by_code.get(&data.code) {
                bail!(
                    "Location code {} is used by both {} and {}",
                    data.code,
                    catalog.locations[other].name,
                    data.name
                );
            }
            catalog.location_by_code.insert(data.code, idx);
            catalog.locations.push(data);
        }
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Result<&LocationData> {
        match self.location_isv.index_by_key.get(name) {
            Some(&idx) => Ok(&self.locations[idx]),
            None => bail!("Unknown location: {name}"),
        }
    }
}

/// Access requirement attached to an entrance or location.
///
/// Rules are plain data, capturing item indices and counts by value when they are
/// built. There is no negation: every rule is monotone in the owned items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rule {
    Free,
    Never,
    Item { item: ItemIdx, count: usize },
    Group { group: GroupIdx, count: usize },
    // Region is reachable.
    Region(RegionIdx),
    // Location's region is reachable and its rule holds.
    Location(LocationIdx),
    // The current rule of another location, looked up at evaluation time.
    LocationRule(LocationIdx),
    And(Vec<Rule>),
    Or(Vec<Rule>),
}

impl Rule {
    pub fn item(item: ItemIdx) -> Rule {
        Rule::Item { item, count: 1 }
    }

    pub fn item_count(item: ItemIdx, count: usize) -> Rule {
        if count == 0 {
            Rule::Free
        } else {
            Rule::Item { item, count }
        }
    }

    pub fn group_count(group: GroupIdx, count: usize) -> Rule {
        if count == 0 {
            Rule::Free
        } else {
            Rule::Group { group, count }
        }
    }

    pub fn make_and(rules: Vec<Rule>) -> Rule {
        let mut out_rules: Vec<Rule> = vec![];
        for rule in rules {
            match rule {
                Rule::Never => return Rule::Never,
                Rule::Free => continue,
                Rule::And(and_rules) => out_rules.extend(and_rules),
                _ => out_rules.push(rule),
            }
        }
        if out_rules.len() > 1 {
            Rule::And(out_rules)
        } else {
            out_rules.pop().unwrap_or(Rule::Free)
        }
    }

    pub fn make_or(rules: Vec<Rule>) -> Rule {
        let mut out_rules: Vec<Rule> = vec![];
        for rule in rules {
            match rule {
                Rule::Never => continue,
                Rule::Free => return Rule::Free,
                Rule::Or(or_rules) => out_rules.extend(or_rules),
                _ => out_rules.push(rule),
            }
        }
        if out_rules.len() > 1 {
            Rule::Or(out_rules)
        } else {
            out_rules.pop().unwrap_or(Rule::Never)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, code: ItemCode) -> ItemData {
        ItemData {
            name: name.to_string(),
            code: Some(code),
            classification: ItemClassification::Progression,
            dlc: DlcFlags::empty(),
        }
    }

    #[test]
    fn test_make_and_identities() {
        assert_eq!(Rule::make_and(vec![]), Rule::Free);
        assert_eq!(Rule::make_and(vec![Rule::Free, Rule::item(3)]), Rule::item(3));
        assert_eq!(Rule::make_and(vec![Rule::item(3), Rule::Never]), Rule::Never);
        assert_eq!(
            Rule::make_and(vec![
                Rule::And(vec![Rule::item(1), Rule::item(2)]),
                Rule::item(3)
            ]),
            Rule::And(vec![Rule::item(1), Rule::item(2), Rule::item(3)])
        );
    }

    #[test]
    fn test_make_or_identities() {
        assert_eq!(Rule::make_or(vec![]), Rule::Never);
        assert_eq!(Rule::make_or(vec![Rule::Never, Rule::item(3)]), Rule::item(3));
        assert_eq!(Rule::make_or(vec![Rule::item(3), Rule::Free]), Rule::Free);
    }

    #[test]
    fn test_duplicate_codes_rejected() {
        let result = ItemCatalog::new(vec![item("Umbrella", 5), item("Brewing Hat", 5)]);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Umbrella") && err.contains("Brewing Hat"));
    }

    #[test]
    fn test_groups() -> Result<()> {
        let mut catalog = ItemCatalog::new(vec![item("Relic A", 1), item("Relic B", 2)])?;
        let group = catalog.add_group("Relics", &["Relic A", "Relic B"])?;
        assert_eq!(catalog.groups[group].len(), 2);
        assert_eq!(catalog.groups_by_item[catalog.item_idx("Relic B")?], vec![group]);
        assert!(catalog.add_group("Broken", &["Relic C"]).is_err());
        Ok(())
    }

    #[test]
    fn test_event_items_are_shared() -> Result<()> {
        let mut catalog = ItemCatalog::new(vec![item("Umbrella", 1)])?;
        let a = catalog.add_event_item("Chapter Cleared")?;
        let b = catalog.add_event_item("Chapter Cleared")?;
        assert_eq!(a, b);
        assert!(catalog.items[a].classification.is_progression());
        assert!(catalog.add_event_item("Umbrella").is_err());
        Ok(())
    }

    #[test]
    fn test_dlc_flags() {
        assert!(DlcFlags::empty().is_enabled_by(DlcFlags::empty()));
        assert!(!DlcFlags::DLC1.is_enabled_by(DlcFlags::empty()));
        assert!(DlcFlags::DLC1.is_enabled_by(DlcFlags::DLC1 | DlcFlags::DLC2));
    }
}
