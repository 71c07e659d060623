use anyhow::{bail, Result};
use log::info;
use multirando_game::{DlcFlags, Item, ItemCatalog, ItemClassification, ItemCode, ItemData};
use rand::seq::SliceRandom;
use rand::Rng;
use strum::IntoEnumIterator;

use super::{HatInTimeWorld, HatType, EVENTS};
use crate::difficulty::Difficulty;
use crate::settings::CtrLogic;

use ItemClassification::{Filler, Progression, ProgressionSkipBalancing, Trap, Useful};

pub struct ItemEntry {
    pub name: &'static str,
    pub code: ItemCode,
    pub classification: ItemClassification,
    pub dlc: DlcFlags,
    // Copies added to the pool.
    pub count: usize,
}

const fn item(name: &'static str, code: ItemCode, classification: ItemClassification) -> ItemEntry {
    ItemEntry {
        name,
        code,
        classification,
        dlc: DlcFlags::empty(),
        count: 1,
    }
}

const fn dlc1_item(name: &'static str, code: ItemCode, classification: ItemClassification) -> ItemEntry {
    ItemEntry {
        name,
        code,
        classification,
        dlc: DlcFlags::DLC1,
        count: 1,
    }
}

pub const YARN: &str = "Yarn";
pub const TIME_PIECE: &str = "Time Piece";
pub const HOOKSHOT_BADGE: &str = "Hookshot Badge";
pub const UMBRELLA: &str = "Umbrella";
pub const SCOOTER_BADGE: &str = "Scooter Badge";
pub const NO_BONK_BADGE: &str = "No Bonk Badge";
pub const PAINTING_UNLOCK: &str = "Progressive Painting Unlock";

pub const ITEM_TABLE: &[ItemEntry] = &[
    item(YARN, 2000300001, ProgressionSkipBalancing),
    item(TIME_PIECE, 2000300002, ProgressionSkipBalancing),
    item("Sprint Hat", 2000300049, Progression),
    item("Brewing Hat", 2000300050, Progression),
    item("Ice Hat", 2000300051, Progression),
    item("Dweller Mask", 2000300052, Progression),
    item("Time Stop Hat", 2000300053, Progression),
    item("Relic (Burger Patty)", 2000300006, Progression),
    item("Relic (Burger Cushion)", 2000300007, Progression),
    item("Relic (Mountain Set)", 2000300008, Progression),
    item("Relic (Train)", 2000300009, Progression),
    item("Relic (UFO)", 2000300010, Progression),
    item("Relic (Cow)", 2000300011, Progression),
    item("Relic (Cool Cow)", 2000300012, Progression),
    item("Relic (Tin-foil Hat Cow)", 2000300013, Progression),
    item("Relic (Crayon Box)", 2000300014, Progression),
    item("Relic (Red Crayon)", 2000300015, Progression),
    item("Relic (Blue Crayon)", 2000300016, Progression),
    item("Relic (Green Crayon)", 2000300017, Progression),
    dlc1_item("Relic (Cake Stand)", 2000300018, Progression),
    dlc1_item("Relic (Chocolate Cake)", 2000300019, Progression),
    dlc1_item("Relic (Chocolate Cake Slice)", 2000300020, Progression),
    dlc1_item("Relic (Shortcake)", 2000300021, Progression),
    item("Projectile Badge", 2000300024, Useful),
    item("Fast Hatter Badge", 2000300025, Useful),
    item("Hover Badge", 2000300026, Useful),
    item(HOOKSHOT_BADGE, 2000300027, Progression),
    item("Item Magnet Badge", 2000300028, Useful),
    item(NO_BONK_BADGE, 2000300029, Useful),
    item("Compass Badge", 2000300030, Useful),
    item(SCOOTER_BADGE, 2000300031, Useful),
    ItemEntry {
        count: 2,
        ..item("Badge Pin", 2000300043, Useful)
    },
    item(UMBRELLA, 2000300033, Progression),
    ItemEntry {
        count: 3,
        ..item(PAINTING_UNLOCK, 2000300003, Progression)
    },
    item("Zipline Unlock - The Birdhouse Path", 2000300060, Progression),
    item("Zipline Unlock - The Lava Cake Path", 2000300061, Progression),
    item("Zipline Unlock - The Windmill Path", 2000300062, Progression),
    item("Zipline Unlock - The Twilight Bell Path", 2000300063, Progression),
    item("Snatcher's Contract - The Subcon Well", 2000300200, Progression),
    item("Snatcher's Contract - Toilet of Doom", 2000300201, Progression),
    item("Snatcher's Contract - Queen Vanessa's Manor", 2000300202, Progression),
    item("Snatcher's Contract - Mail Delivery Service", 2000300203, Progression),
    item("25 Pons", 2000300034, Filler),
    item("50 Pons", 2000300035, Filler),
    item("100 Pons", 2000300036, Filler),
    item("Health Pon", 2000300037, Filler),
    item("Random Cosmetic", 2000300044, Filler),
    item("Baby Trap", 2000300039, Trap),
    item("Laser Trap", 2000300040, Trap),
    item("Parade Trap", 2000300041, Trap),
];

pub const RELIC_GROUPS: &[(&str, &[&str])] = &[
    ("Burger", &["Relic (Burger Patty)", "Relic (Burger Cushion)"]),
    ("Train", &["Relic (Mountain Set)", "Relic (Train)"]),
    (
        "UFO",
        &[
            "Relic (UFO)",
            "Relic (Cow)",
            "Relic (Cool Cow)",
            "Relic (Tin-foil Hat Cow)",
        ],
    ),
    (
        "Crayon",
        &[
            "Relic (Crayon Box)",
            "Relic (Red Crayon)",
            "Relic (Blue Crayon)",
            "Relic (Green Crayon)",
        ],
    ),
    (
        "Cake",
        &[
            "Relic (Cake Stand)",
            "Relic (Chocolate Cake)",
            "Relic (Chocolate Cake Slice)",
            "Relic (Shortcake)",
        ],
    ),
];

pub const CONTRACTS: [&str; 4] = [
    "Snatcher's Contract - The Subcon Well",
    "Snatcher's Contract - Toilet of Doom",
    "Snatcher's Contract - Queen Vanessa's Manor",
    "Snatcher's Contract - Mail Delivery Service",
];

pub const ZIPLINES: [&str; 4] = [
    "Zipline Unlock - The Birdhouse Path",
    "Zipline Unlock - The Lava Cake Path",
    "Zipline Unlock - The Windmill Path",
    "Zipline Unlock - The Twilight Bell Path",
];

const JUNK_WEIGHTS: &[(&str, usize)] = &[
    ("25 Pons", 50),
    ("50 Pons", 25),
    ("100 Pons", 10),
    ("Health Pon", 35),
    ("Random Cosmetic", 35),
];

pub fn item_catalog() -> Result<ItemCatalog> {
    let items = ITEM_TABLE
        .iter()
        .map(|entry| ItemData {
            name: entry.name.to_string(),
            code: Some(entry.code),
            classification: entry.classification,
            dlc: entry.dlc,
        })
        .collect();
    let mut catalog = ItemCatalog::new(items)?;
    for event in EVENTS {
        catalog.add_event_item(event.name)?;
    }
    for (group, members) in RELIC_GROUPS {
        catalog.add_group(group, members)?;
    }
    Ok(catalog)
}

// Promotes the first `percent`% of a run of skip-balancing items to full progression.
fn promote_share(items: &mut [Item], percent: usize) {
    let promoted = items.len() * percent / 100;
    for item in items.iter_mut().take(promoted) {
        item.classification = Progression;
    }
}

impl HatInTimeWorld {
    fn calculate_yarn_costs<R: Rng>(&mut self, rng: &mut R) -> usize {
        let min = self.settings.yarn_cost_min;
        let max = self.settings.yarn_cost_max;
        let mut total = 0;
        for hat in HatType::iter() {
            let cost = rng.gen_range(min..=max);
            self.hat_yarn_costs[hat as usize] = cost;
            total += cost;
        }
        let available = self
            .settings
            .yarn_available
            .max(total + self.settings.min_extra_yarn);
        info!("Hat yarn costs: {:?} ({total} total, {available} in pool)", self.hat_yarn_costs);
        available
    }

    fn classify(&self, name: &str, default: ItemClassification) -> ItemClassification {
        match name {
            SCOOTER_BADGE
                if self.settings.ctr_logic == CtrLogic::Scooter
                    || self.difficulty >= Difficulty::Moderate =>
            {
                Progression
            }
            NO_BONK_BADGE if self.difficulty >= Difficulty::Moderate => Progression,
            _ => default,
        }
    }

    fn pick_junk<R: Rng>(&self, rng: &mut R) -> Result<Item> {
        let settings = &self.settings;
        let name = if settings.trap_chance > 0 && rng.gen_range(1..=100) <= settings.trap_chance {
            let traps = [
                ("Baby Trap", settings.baby_trap_weight),
                ("Laser Trap", settings.laser_trap_weight),
                ("Parade Trap", settings.parade_trap_weight),
            ];
            traps.choose_weighted(rng, |x| x.1)?.0
        } else {
            JUNK_WEIGHTS.choose_weighted(rng, |x| x.1)?.0
        };
        self.catalog.create_item(name)
    }

    pub(super) fn create_item_pool<R: Rng>(&mut self, rng: &mut R) -> Result<Vec<Item>> {
        if self.settings.randomize_hat_order {
            self.hat_craft_order.shuffle(rng);
        }
        let hat_items = self.settings.hat_items;

        let mut pool: Vec<Item> = vec![];
        if !hat_items {
            let yarn_count = self.calculate_yarn_costs(rng);
            let mut yarn = vec![self.catalog.create_item(YARN)?; yarn_count];
            promote_share(&mut yarn, self.settings.yarn_balance_percent);
            pool.extend(yarn);
        }

        for entry in ITEM_TABLE {
            if !entry.dlc.is_enabled_by(self.enabled_dlc) {
                continue;
            }
            let name = entry.name;
            if name == YARN || matches!(entry.classification, Filler | Trap) {
                continue;
            }
            if HatType::iter().any(|hat| hat.item_name() == name) && !hat_items {
                continue;
            }
            if CONTRACTS.contains(&name) && !self.settings.shuffle_act_contracts {
                continue;
            }
            if ZIPLINES.contains(&name) && !self.settings.shuffle_alpine_ziplines {
                continue;
            }
            if name == PAINTING_UNLOCK && !self.settings.shuffle_subcon_paintings {
                continue;
            }

            let mut item = self.catalog.create_item(name)?;
            item.classification = self.classify(name, item.classification);
            if name == TIME_PIECE {
                let mut count = self.settings.time_piece_count;
                if self.dlc1() {
                    count += self.settings.max_extra_time_pieces;
                }
                let mut time_pieces = vec![item; count];
                promote_share(&mut time_pieces, self.settings.time_piece_balance_percent);
                pool.extend(time_pieces);
                continue;
            }
            pool.extend(std::iter::repeat(item).take(entry.count));
        }

        let total_locations = self.graph.empty_locations().len();
        if pool.len() > total_locations {
            bail!(
                "Item pool ({}) is larger than the number of open locations ({total_locations})",
                pool.len()
            );
        }
        while pool.len() < total_locations {
            pool.push(self.pick_junk(rng)?);
        }
        info!("Created item pool of {} items", pool.len());
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_builds() -> Result<()> {
        let catalog = item_catalog()?;
        let cake = catalog.group_idx("Cake")?;
        assert_eq!(catalog.groups[cake].len(), 4);
        let cluster = catalog.item_idx("Time Piece Cluster")?;
        assert!(catalog.items[cluster].code.is_none());
        Ok(())
    }

    #[test]
    fn test_painting_unlocks_only_when_shuffled() -> Result<()> {
        for shuffle_subcon_paintings in [false, true] {
            let settings = crate::settings::HatInTimeSettings {
                shuffle_subcon_paintings,
                ..Default::default()
            };
            let mut world = HatInTimeWorld::new(settings, Difficulty::Normal)?;
            let mut rng = crate::randomize::seeded_rng(11);
            world.create_regions(&mut rng)?;
            world.create_events()?;
            world.place_contracts()?;
            let pool = world.create_item_pool(&mut rng)?;
            let painting = world.catalog.item_idx(PAINTING_UNLOCK)?;
            let count = pool.iter().filter(|x| x.idx == painting).count();
            assert_eq!(count, if shuffle_subcon_paintings { 3 } else { 0 });
            assert_eq!(pool.len(), world.graph.empty_locations().len());
        }
        Ok(())
    }

    #[test]
    fn test_promote_share() {
        let item = Item {
            idx: 0,
            classification: ProgressionSkipBalancing,
        };
        let mut items = vec![item; 10];
        promote_share(&mut items, 35);
        let promoted = items.iter().filter(|x| x.classification == Progression).count();
        assert_eq!(promoted, 3);
        assert_eq!(items[0].classification, Progression);
        assert_eq!(items[9].classification, ProgressionSkipBalancing);
    }
}
