use anyhow::{Context, Result};
use hashbrown::HashSet;
use log::{debug, info};
use multirando_game::{EntranceIdx, RegionIdx};
use rand::Rng;

use super::items::CONTRACTS;
use super::locations::{badge_seller_location, BADGE_SELLER_MAX_ITEMS, BADGE_SELLER_REGION, EVENTS};
use super::HatInTimeWorld;
use crate::difficulty::Difficulty;
use crate::graph::START_REGION;
use crate::randomize::entrance_shuffle::{
    shuffle_entrances, validate_pins, ShuffleCandidate, ShuffleConstraints, ShuffleSlot,
};
use crate::settings::{ActRandomizer, ChapterIndex};

pub const CHAPTER_REGIONS: &[(ChapterIndex, &str)] = &[
    (ChapterIndex::Spaceship, "Spaceship"),
    (ChapterIndex::Mafia, "Mafia Town"),
    (ChapterIndex::Birds, "Battle of the Birds"),
    (ChapterIndex::Subcon, "Subcon Forest"),
    (ChapterIndex::Alpine, "Alpine Skyline"),
    (ChapterIndex::Finale, "Time's End"),
    (ChapterIndex::Cruise, "The Arctic Cruise"),
];

// Act region -> entrance leading into it from its chapter.
pub const ACT_ENTRANCES: &[(&str, &str)] = &[
    ("Welcome to Mafia Town", "Mafia Town - Act 1"),
    ("Barrel Battle", "Mafia Town - Act 2"),
    ("She Came from Outer Space", "Mafia Town - Act 3"),
    ("Down with the Mafia!", "Mafia Town - Act 4"),
    ("Cheating the Race", "Mafia Town - Act 5"),
    ("Heating Up Mafia Town", "Mafia Town - Act 6"),
    ("The Golden Vault", "Mafia Town - Act 7"),
    ("Dead Bird Studio", "Battle of the Birds - Act 1"),
    ("Murder on the Owl Express", "Battle of the Birds - Act 2"),
    ("Picture Perfect", "Battle of the Birds - Act 3"),
    ("Train Rush", "Battle of the Birds - Act 4"),
    ("The Big Parade", "Battle of the Birds - Act 5"),
    ("Award Ceremony", "Battle of the Birds - Finale A"),
    ("Dead Bird Studio Basement", "Battle of the Birds - Finale B"),
    ("Contractual Obligations", "Subcon Forest - Act 1"),
    ("The Subcon Well", "Subcon Forest - Act 2"),
    ("Toilet of Doom", "Subcon Forest - Act 3"),
    ("Queen Vanessa's Manor", "Subcon Forest - Act 4"),
    ("Mail Delivery Service", "Subcon Forest - Act 5"),
    ("Your Contract has Expired", "Subcon Forest - Finale"),
    ("Alpine Free Roam", "Alpine Skyline - Free Roam"),
    ("The Illness has Spread", "Alpine Skyline - Finale"),
    ("The Finale", "Time's End - Act 1"),
    ("Bon Voyage!", "The Arctic Cruise - Act 1"),
    ("Ship Shape", "The Arctic Cruise - Act 2"),
    ("Rock the Boat", "The Arctic Cruise - Finale"),
];

const MAFIA_ACTS: &[&str] = &[
    "Welcome to Mafia Town",
    "Barrel Battle",
    "She Came from Outer Space",
    "Down with the Mafia!",
    "Cheating the Race",
    "Heating Up Mafia Town",
    "The Golden Vault",
];

const SUBCON_ACTS: &[&str] = &[
    "Contractual Obligations",
    "The Subcon Well",
    "Toilet of Doom",
    "Queen Vanessa's Manor",
    "Mail Delivery Service",
];

// Time rift -> regions holding one of its portals, in portal order.
pub const RIFT_ACCESS_REGIONS: &[(&str, &[&str])] = &[
    ("Time Rift - Gallery", &["Spaceship"]),
    ("Time Rift - The Lab", &["Spaceship"]),
    ("Time Rift - Sewers", MAFIA_ACTS),
    ("Time Rift - Bazaar", MAFIA_ACTS),
    (
        "Time Rift - Mafia of Cooks",
        &[
            "Welcome to Mafia Town",
            "Barrel Battle",
            "She Came from Outer Space",
            "Down with the Mafia!",
            "Cheating the Race",
            "The Golden Vault",
        ],
    ),
    ("Time Rift - The Owl Express", &["Murder on the Owl Express"]),
    ("Time Rift - The Moon", &["Picture Perfect", "The Big Parade"]),
    (
        "Time Rift - Dead Bird Studio",
        &["Dead Bird Studio", "Dead Bird Studio Basement"],
    ),
    ("Time Rift - Pipe", SUBCON_ACTS),
    ("Time Rift - Village", SUBCON_ACTS),
    ("Time Rift - Sleepy Subcon", SUBCON_ACTS),
    ("Time Rift - The Twilight Bell", &["Alpine Free Roam"]),
    ("Time Rift - Curly Tail Trail", &["Alpine Free Roam"]),
    (
        "Time Rift - Alpine Skyline",
        &["Alpine Free Roam", "The Illness has Spread"],
    ),
    ("Time Rift - Tour", &["Time's End"]),
    ("Time Rift - Balcony", &["Cruise Ship"]),
    ("Time Rift - Deep Sea", &["Bon Voyage!"]),
];

// Act region -> identifier the game client uses for it.
pub const CHAPTER_ACT_INFO: &[(&str, ChapterIndex, &str)] = &[
    ("Time Rift - Gallery", ChapterIndex::Spaceship, "Spaceship_WaterRift_Gallery"),
    ("Time Rift - The Lab", ChapterIndex::Spaceship, "Spaceship_WaterRift_MailRoom"),
    ("Welcome to Mafia Town", ChapterIndex::Mafia, "chapter1_tutorial"),
    ("Barrel Battle", ChapterIndex::Mafia, "chapter1_barrelboss"),
    ("She Came from Outer Space", ChapterIndex::Mafia, "chapter1_cannon_repair"),
    ("Down with the Mafia!", ChapterIndex::Mafia, "chapter1_boss"),
    ("Cheating the Race", ChapterIndex::Mafia, "harbor_impossible_race"),
    ("Heating Up Mafia Town", ChapterIndex::Mafia, "mafiatown_lava"),
    ("The Golden Vault", ChapterIndex::Mafia, "mafiatown_goldenvault"),
    ("Time Rift - Mafia of Cooks", ChapterIndex::Mafia, "TimeRift_Cave_Mafia"),
    ("Time Rift - Sewers", ChapterIndex::Mafia, "TimeRift_Water_Mafia_Easy"),
    ("Time Rift - Bazaar", ChapterIndex::Mafia, "TimeRift_Water_Mafia_Hard"),
    ("Dead Bird Studio", ChapterIndex::Birds, "DeadBirdStudio"),
    ("Murder on the Owl Express", ChapterIndex::Birds, "chapter3_murder"),
    ("Picture Perfect", ChapterIndex::Birds, "moon_camerasnap"),
    ("Train Rush", ChapterIndex::Birds, "trainwreck_selfdestruct"),
    ("The Big Parade", ChapterIndex::Birds, "moon_parade"),
    ("Award Ceremony", ChapterIndex::Birds, "award_ceremony"),
    ("Dead Bird Studio Basement", ChapterIndex::Birds, "chapter3_secret_finale"),
    ("Time Rift - Dead Bird Studio", ChapterIndex::Birds, "TimeRift_Cave_BirdBasement"),
    ("Time Rift - The Owl Express", ChapterIndex::Birds, "TimeRift_Water_TWreck_Panels"),
    ("Time Rift - The Moon", ChapterIndex::Birds, "TimeRift_Water_TWreck_Parade"),
    ("Contractual Obligations", ChapterIndex::Subcon, "subcon_village_icewall"),
    ("The Subcon Well", ChapterIndex::Subcon, "subcon_cave"),
    ("Toilet of Doom", ChapterIndex::Subcon, "chapter2_toiletboss"),
    ("Queen Vanessa's Manor", ChapterIndex::Subcon, "vanessa_manor_attic"),
    ("Mail Delivery Service", ChapterIndex::Subcon, "subcon_maildelivery"),
    ("Your Contract has Expired", ChapterIndex::Subcon, "snatcher_boss"),
    ("Time Rift - Sleepy Subcon", ChapterIndex::Subcon, "TimeRift_Cave_Raccoon"),
    ("Time Rift - Pipe", ChapterIndex::Subcon, "TimeRift_Water_Subcon_Hookshot"),
    ("Time Rift - Village", ChapterIndex::Subcon, "TimeRift_Water_Subcon_Dwellers"),
    ("Alpine Free Roam", ChapterIndex::Alpine, "AlpineFreeRoam"),
    ("The Illness has Spread", ChapterIndex::Alpine, "AlpineSkyline_Finale"),
    ("Time Rift - Alpine Skyline", ChapterIndex::Alpine, "TimeRift_Cave_Alps"),
    ("Time Rift - The Twilight Bell", ChapterIndex::Alpine, "TimeRift_Water_Alp_Goats"),
    ("Time Rift - Curly Tail Trail", ChapterIndex::Alpine, "TimeRift_Water_AlpineSkyline_Cats"),
    ("The Finale", ChapterIndex::Finale, "TheFinale_FinalBoss"),
    ("Time Rift - Tour", ChapterIndex::Finale, "TimeRift_Cave_Tour"),
    ("Bon Voyage!", ChapterIndex::Cruise, "Cruise_Boarding"),
    ("Ship Shape", ChapterIndex::Cruise, "Cruise_Working"),
    ("Rock the Boat", ChapterIndex::Cruise, "Cruise_Sinking"),
    ("Time Rift - Balcony", ChapterIndex::Cruise, "Cruise_WaterRift_Slide"),
    ("Time Rift - Deep Sea", ChapterIndex::Cruise, "Cruise_CaveRift_Aquarium"),
];

// Acts that are beatable with no items and open up plenty of locations.
const GUARANTEED_FIRST_ACTS: &[&str] = &[
    "Welcome to Mafia Town",
    "Barrel Battle",
    "She Came from Outer Space",
    "Down with the Mafia!",
    "Heating Up Mafia Town",
    "The Golden Vault",
    "Contractual Obligations",
    "Queen Vanessa's Manor",
];

// Need the umbrella to complete.
const UMBRELLA_FIRST_ACTS: &[&str] = &["Heating Up Mafia Town", "Queen Vanessa's Manor"];

pub const PURPLE_TIME_RIFTS: &[&str] = &[
    "Time Rift - Mafia of Cooks",
    "Time Rift - Dead Bird Studio",
    "Time Rift - Sleepy Subcon",
    "Time Rift - Alpine Skyline",
    "Time Rift - Deep Sea",
    "Time Rift - Tour",
];

pub const CHAPTER_FINALES: &[&str] = &[
    "Dead Bird Studio Basement",
    "Your Contract has Expired",
    "The Illness has Spread",
    "Rock the Boat",
];

// Never shuffled.
const BLACKLISTED_ACTS: &[&str] = &["Award Ceremony"];

const BLACKLISTED_COMBOS: &[(&str, &[&str])] = &[
    (
        "The Illness has Spread",
        &["Alpine Free Roam", "Contractual Obligations"],
    ),
    (
        "Time Rift - The Owl Express",
        &["Alpine Free Roam", "Bon Voyage!", "Contractual Obligations"],
    ),
    (
        "Time Rift - The Moon",
        &["Alpine Free Roam", "Contractual Obligations"],
    ),
    (
        "Time Rift - Dead Bird Studio",
        &["Alpine Free Roam", "Contractual Obligations"],
    ),
    ("Time Rift - Curly Tail Trail", &["Contractual Obligations"]),
    ("Time Rift - The Twilight Bell", &["Contractual Obligations"]),
    ("Time Rift - Alpine Skyline", &["Contractual Obligations"]),
    (
        "Time Rift - Deep Sea",
        &["Alpine Free Roam", "Contractual Obligations"],
    ),
];

pub fn lookup<T: Copy>(table: &[(&str, T)], key: &str) -> Option<T> {
    table.iter().find(|(k, _)| *k == key).map(|&(_, v)| v)
}

pub fn act_entrance(region: &str) -> Option<&'static str> {
    lookup(ACT_ENTRANCES, region)
}

pub fn act_info(region: &str) -> Option<(ChapterIndex, &'static str)> {
    CHAPTER_ACT_INFO
        .iter()
        .find(|(name, _, _)| *name == region)
        .map(|&(_, chapter, id)| (chapter, id))
}

pub fn chapter_region(chapter: ChapterIndex) -> &'static str {
    CHAPTER_REGIONS
        .iter()
        .find(|(c, _)| *c == chapter)
        .map_or("Spaceship", |&(_, name)| name)
}

pub fn is_rift(region: &str) -> bool {
    region.starts_with("Time Rift - ")
}

pub fn rift_portal_name(rift: &str, i: usize) -> String {
    format!("{rift} Portal - Entrance {}", i + 1)
}

impl HatInTimeWorld {
    /// Creates a region along with every enabled table location that belongs to it.
    fn create_region(&mut self, name: &str) -> Result<RegionIdx> {
        let region = self.graph.create_region(name)?;
        for entry in self.location_catalog.locations.iter().filter(|l| l.region == name) {
            if entry.dlc.is_enabled_by(self.enabled_dlc) {
                self.graph.add_location(region, &entry.name, Some(entry.code))?;
            }
        }
        Ok(region)
    }

    fn create_region_and_connect(
        &mut self,
        name: &str,
        entrance_name: &str,
        from: RegionIdx,
    ) -> Result<RegionIdx> {
        let region = self.create_region(name)?;
        self.graph.connect(from, region, entrance_name)?;
        Ok(region)
    }

    fn create_rift(&mut self, name: &str) -> Result<RegionIdx> {
        let rift = self.create_region(name)?;
        let access = lookup(RIFT_ACCESS_REGIONS, name)
            .with_context(|| format!("No portals defined for {name}"))?;
        for (i, &access_name) in access.iter().enumerate() {
            let from = self.graph.get_region(access_name)?;
            self.graph.connect(from, rift, &rift_portal_name(name, i))?;
        }
        Ok(rift)
    }

    fn create_badge_seller<R: Rng>(&mut self, rng: &mut R) -> Result<RegionIdx> {
        let region = self.graph.create_region(BADGE_SELLER_REGION)?;
        let min = self.settings.badge_seller_min_items.min(BADGE_SELLER_MAX_ITEMS);
        let max = self.settings.badge_seller_max_items.min(BADGE_SELLER_MAX_ITEMS);
        let count = if max > 0 { rng.gen_range(min..=max) } else { 0 };
        for i in 0..count {
            let (name, _) = badge_seller_location(i);
            let code = self.location_catalog.get(&name)?.code;
            self.graph.add_location(region, &name, Some(code))?;
        }
        self.badge_seller_item_count = count;
        debug!("Badge Seller sells {count} items");
        Ok(region)
    }

    pub(super) fn create_regions<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        let menu = self.create_region(START_REGION)?;
        let spaceship = self.create_region_and_connect("Spaceship", "Save File -> Spaceship", menu)?;
        self.create_rift("Time Rift - Gallery")?;
        self.create_rift("Time Rift - The Lab")?;

        let mafia_town = self.create_region_and_connect("Mafia Town", "Telescope -> Mafia Town", spaceship)?;
        for &act in MAFIA_ACTS {
            self.create_act(act, mafia_town)?;
        }

        let botb = self.create_region_and_connect(
            "Battle of the Birds",
            "Telescope -> Battle of the Birds",
            spaceship,
        )?;
        let dbs = self.create_act("Dead Bird Studio", botb)?;
        self.create_act("Murder on the Owl Express", botb)?;
        let pp = self.create_act("Picture Perfect", botb)?;
        let tr = self.create_act("Train Rush", botb)?;
        self.create_act("The Big Parade", botb)?;
        self.create_act("Award Ceremony", botb)?;
        let basement = self.create_act("Dead Bird Studio Basement", botb)?;
        self.create_rift("Time Rift - Dead Bird Studio")?;
        self.create_rift("Time Rift - The Owl Express")?;
        self.create_rift("Time Rift - The Moon")?;

        let ev_area = self.create_region_and_connect(
            "Dead Bird Studio - Elevator Area",
            "DBS -> Elevator Area",
            dbs,
        )?;
        let post_ev_area = self.create_region_and_connect(
            "Dead Bird Studio - Post Elevator Area",
            "DBS -> Post Elevator Area",
            dbs,
        )?;
        self.graph.connect(basement, ev_area, "DBS Basement -> Elevator Area")?;
        if self.difficulty >= Difficulty::Expert {
            self.graph
                .connect(basement, post_ev_area, "DBS Basement -> Post Elevator Area")?;
        }

        let subcon_forest =
            self.create_region_and_connect("Subcon Forest", "Telescope -> Subcon Forest", spaceship)?;
        for &act in SUBCON_ACTS {
            self.create_act(act, subcon_forest)?;
        }
        self.create_act("Your Contract has Expired", subcon_forest)?;

        let alpine_skyline =
            self.create_region_and_connect("Alpine Skyline", "Telescope -> Alpine Skyline", spaceship)?;
        let alpine_freeroam = self.create_act("Alpine Free Roam", alpine_skyline)?;
        let alpine_area = self.create_region_and_connect(
            "Alpine Skyline Area",
            "AFR -> Alpine Skyline Area",
            alpine_freeroam,
        )?;
        // Much of Alpine Skyline can't be reached from The Illness has Spread.
        let alpine_area_tihs = self.create_region_and_connect(
            "Alpine Skyline Area (TIHS)",
            "-> Alpine Skyline Area (TIHS)",
            alpine_area,
        )?;
        for area in ["The Birdhouse", "The Lava Cake", "The Windmill", "The Twilight Bell"] {
            self.create_region_and_connect(area, &format!("-> {area}"), alpine_area)?;
        }
        let illness = self.create_act("The Illness has Spread", alpine_skyline)?;
        self.graph
            .connect(illness, alpine_area_tihs, "TIHS -> Alpine Skyline Area (TIHS)")?;
        self.create_rift("Time Rift - Alpine Skyline")?;
        self.create_rift("Time Rift - The Twilight Bell")?;
        self.create_rift("Time Rift - Curly Tail Trail")?;

        let mt_area = self.create_region("Mafia Town Area")?;
        let mt_area_humt = self.create_region("Mafia Town Area (HUMT)")?;
        self.graph.connect(mt_area, mt_area_humt, "MT Area -> MT Area (HUMT)")?;
        for (act, suffix) in [
            ("Welcome to Mafia Town", "WTMT"),
            ("Barrel Battle", "BB"),
            ("She Came from Outer Space", "SCFOS"),
            ("Down with the Mafia!", "DWTM"),
            ("Cheating the Race", "CTR"),
            ("The Golden Vault", "TGV"),
        ] {
            let from = self.graph.get_region(act)?;
            self.graph
                .connect(from, mt_area, &format!("Mafia Town Entrance {suffix}"))?;
        }
        let humt = self.graph.get_region("Heating Up Mafia Town")?;
        self.graph.connect(humt, mt_area_humt, "Mafia Town Entrance HUMT")?;
        self.create_rift("Time Rift - Mafia of Cooks")?;
        self.create_rift("Time Rift - Sewers")?;
        self.create_rift("Time Rift - Bazaar")?;

        let sf_area = self.create_region("Subcon Forest Area")?;
        for (act, suffix) in SUBCON_ACTS.iter().zip(["CO", "SW", "TOD", "QVM", "MDS"]) {
            let from = self.graph.get_region(act)?;
            self.graph
                .connect(from, sf_area, &format!("Subcon Forest Entrance {suffix}"))?;
        }
        self.create_rift("Time Rift - Sleepy Subcon")?;
        self.create_rift("Time Rift - Pipe")?;
        self.create_rift("Time Rift - Village")?;

        let badge_seller = self.create_badge_seller(rng)?;
        for (from, name) in [
            (mt_area, "MT Area -> Badge Seller"),
            (mt_area_humt, "MT Area (HUMT) -> Badge Seller"),
            (sf_area, "SF Area -> Badge Seller"),
            (dbs, "DBS -> Badge Seller"),
            (pp, "PP -> Badge Seller"),
            (tr, "TR -> Badge Seller"),
            (alpine_area_tihs, "ASA -> Badge Seller"),
        ] {
            self.graph.connect(from, badge_seller, name)?;
        }

        let times_end = self.create_region_and_connect("Time's End", "Telescope -> Time's End", spaceship)?;
        self.create_act("The Finale", times_end)?;

        if self.dlc1() {
            let arctic_cruise = self.create_region_and_connect(
                "The Arctic Cruise",
                "Telescope -> The Arctic Cruise",
                spaceship,
            )?;
            let cruise_ship = self.create_region("Cruise Ship")?;
            for (act, suffix) in [("Bon Voyage!", "BV"), ("Ship Shape", "SS"), ("Rock the Boat", "RTB")] {
                let region = self.create_act(act, arctic_cruise)?;
                self.graph
                    .connect(region, cruise_ship, &format!("Cruise Ship Entrance {suffix}"))?;
            }
            self.create_rift("Time Rift - Balcony")?;
            self.create_rift("Time Rift - Deep Sea")?;
            if !self.settings.exclude_tour {
                self.create_rift("Time Rift - Tour")?;
            }
            self.graph.connect(cruise_ship, badge_seller, "CS -> Badge Seller")?;
        }
        Ok(())
    }

    fn create_act(&mut self, name: &str, chapter: RegionIdx) -> Result<RegionIdx> {
        let entrance = act_entrance(name).with_context(|| format!("{name} is not an act"))?;
        self.create_region_and_connect(name, entrance, chapter)
    }

    pub(super) fn create_events(&mut self) -> Result<()> {
        let mut count = 0;
        for event in EVENTS {
            if !event.dlc.is_enabled_by(self.enabled_dlc) {
                continue;
            }
            let Some(&region) = self.graph.region_isv.index_by_key.get(event.region) else {
                continue;
            };
            let item = self.catalog.create_item(event.name)?;
            self.graph.create_event(region, event.name, item)?;
            count += 1;
        }
        debug!("Created {count} events");
        Ok(())
    }

    /// Unshuffled contracts stay where the game normally hands them out.
    pub(super) fn place_contracts(&mut self) -> Result<()> {
        if self.settings.shuffle_act_contracts {
            return Ok(());
        }
        for contract in CONTRACTS {
            let location = self.graph.get_location(contract)?;
            let item = self.catalog.create_item(contract)?;
            self.graph.place_locked_item(location, item)?;
        }
        Ok(())
    }

    fn is_act_blacklisted(&self, name: &str) -> bool {
        let plando = self.settings.act_plando.contains_key(name)
            || self.settings.act_plando.values().any(|v| v == name);
        if name == "The Finale" {
            return !plando;
        }
        BLACKLISTED_ACTS.contains(&name)
    }

    fn shuffle_group(&self, name: &str) -> usize {
        if PURPLE_TIME_RIFTS.contains(&name) {
            2
        } else if is_rift(name) {
            1
        } else {
            0
        }
    }

    fn shuffle_priority(name: &str) -> u8 {
        if is_rift(name) {
            3
        } else if CHAPTER_FINALES.contains(&name) {
            2
        } else if act_info(name).map(|(c, _)| c) == Some(ChapterIndex::Alpine) {
            1
        } else {
            0
        }
    }

    fn shuffle_entrances_of(&self, name: &str) -> Result<Vec<EntranceIdx>> {
        if let Some(access) = lookup(RIFT_ACCESS_REGIONS, name) {
            (0..access.len())
                .map(|i| self.graph.get_entrance(&rift_portal_name(name, i)))
                .collect()
        } else {
            let entrance = act_entrance(name).with_context(|| format!("{name} is not an act"))?;
            Ok(vec![self.graph.get_entrance(entrance)?])
        }
    }

    fn act_shuffle_blacklist(&self, acts: &[(RegionIdx, &'static str)]) -> HashSet<(RegionIdx, RegionIdx)> {
        let settings = &self.settings;
        let mut blacklist = HashSet::new();
        for &(slot, slot_name) in acts {
            let combos = lookup(BLACKLISTED_COMBOS, slot_name).unwrap_or(&[]);
            let access = lookup(RIFT_ACCESS_REGIONS, slot_name).unwrap_or(&[]);
            for &(candidate, candidate_name) in acts {
                let contract_lock = !settings.shuffle_act_contracts
                    && matches!(slot_name, "Your Contract has Expired" | "The Subcon Well")
                    && candidate_name == "Contractual Obligations";
                let finale_mismatch = settings.finale_shuffle
                    && CHAPTER_FINALES.contains(&slot_name)
                    && !CHAPTER_FINALES.contains(&candidate_name);
                if combos.contains(&candidate_name)
                    || access.contains(&candidate_name)
                    || contract_lock
                    || finale_mismatch
                {
                    blacklist.insert((slot, candidate));
                }
            }
        }
        blacklist
    }

    pub(super) fn randomize_act_entrances<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        let mut acts: Vec<(RegionIdx, &'static str)> = vec![];
        for &(name, _, _) in CHAPTER_ACT_INFO {
            if let Some(&region) = self.graph.region_isv.index_by_key.get(name) {
                if !self.is_act_blacklisted(name) {
                    acts.push((region, name));
                }
            }
        }

        let mut slots: Vec<ShuffleSlot> = vec![];
        let mut candidates: Vec<ShuffleCandidate> = vec![];
        for &(region, name) in &acts {
            let group = self.shuffle_group(name);
            slots.push(ShuffleSlot {
                region,
                entrances: self.shuffle_entrances_of(name)?,
                group,
                priority: Self::shuffle_priority(name),
            });
            candidates.push(ShuffleCandidate { region, group });
        }

        let start_chapter = self.settings.starting_chapter;
        let first_access_slot = acts
            .iter()
            .find(|(_, name)| {
                act_info(name).map(|(c, _)| c) == Some(start_chapter)
                    && act_entrance(name).is_some_and(|e| e.contains("Act 1") || e.contains("Free Roam"))
            })
            .map(|&(region, _)| region);
        // With shuffled paintings Subcon acts start behind a locked painting.
        let paintings = self.settings.shuffle_subcon_paintings;
        let first_access_candidates = acts
            .iter()
            .filter(|(_, name)| {
                GUARANTEED_FIRST_ACTS.contains(name)
                    && !(self.settings.umbrella_logic && UMBRELLA_FIRST_ACTS.contains(name))
                    && !(paintings && act_info(name).map(|(c, _)| c) == Some(ChapterIndex::Subcon))
            })
            .map(|&(region, _)| region)
            .collect();
        let constraints = ShuffleConstraints {
            separate_groups: self.settings.act_randomizer == ActRandomizer::Light,
            blacklist: self.act_shuffle_blacklist(&acts),
            first_access_slot,
            first_access_candidates,
        };

        let pins = validate_pins(
            &self.graph,
            &slots,
            &candidates,
            &constraints,
            &self.settings.act_plando,
        );
        let assignments =
            shuffle_entrances(&mut self.graph, &slots, &candidates, &constraints, &pins, rng)?;

        for assignment in &assignments {
            let slot_name = self.graph.regions[assignment.slot].name.clone();
            let target_name = self.graph.regions[assignment.target].name.clone();
            if let (Some((_, slot_id)), Some((_, target_id))) = (act_info(&slot_name), act_info(&target_name)) {
                self.act_connections
                    .insert(slot_id.to_string(), target_id.to_string());
            }
            debug!("{slot_name} -> {target_name}");
            self.act_assignments.push((slot_name, target_name));
        }
        for &name in BLACKLISTED_ACTS {
            if let Some((_, id)) = act_info(name) {
                self.act_connections.insert(id.to_string(), id.to_string());
            }
        }
        self.act_assignments.sort();
        info!("Act shuffle placed {} acts", assignments.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::HatInTimeSettings;

    #[test]
    fn test_tables_are_consistent() {
        for &(name, _) in ACT_ENTRANCES {
            assert!(act_info(name).is_some(), "{name}");
        }
        for &(rift, access) in RIFT_ACCESS_REGIONS {
            assert!(is_rift(rift));
            assert!(act_info(rift).is_some(), "{rift}");
            assert!(!access.is_empty());
        }
        for &name in PURPLE_TIME_RIFTS {
            assert!(lookup(RIFT_ACCESS_REGIONS, name).is_some(), "{name}");
        }
        assert_eq!(chapter_region(ChapterIndex::Alpine), "Alpine Skyline");
    }

    #[test]
    fn test_act_shuffle_light_keeps_rift_colors() -> Result<()> {
        let mut world = HatInTimeWorld::new(HatInTimeSettings::default(), Difficulty::Normal)?;
        let mut rng = crate::randomize::seeded_rng(7);
        world.create_regions(&mut rng)?;
        world.randomize_act_entrances(&mut rng)?;
        world.graph.check_well_formed()?;

        for (slot, target) in &world.act_assignments {
            assert_eq!(world.shuffle_group(slot), world.shuffle_group(target), "{slot} -> {target}");
        }
        // The first act of the starting chapter leads somewhere beatable with nothing.
        let first = world.graph.get_entrance("Mafia Town - Act 1")?;
        let target = &world.graph.regions[world.graph.entrances[first].target].name;
        assert!(GUARANTEED_FIRST_ACTS.contains(&target.as_str()), "{target}");
        // Award Ceremony is never moved.
        let award = world.graph.get_entrance("Battle of the Birds - Finale A")?;
        assert_eq!(
            world.graph.regions[world.graph.entrances[award].target].name,
            "Award Ceremony"
        );
        Ok(())
    }

    #[test]
    fn test_shuffled_paintings_keep_subcon_out_of_first_act() -> Result<()> {
        for seed in 0..30 {
            let mut settings = HatInTimeSettings {
                shuffle_subcon_paintings: true,
                act_randomizer: ActRandomizer::Insanity,
                ..Default::default()
            };
            // Would be a valid first act without paintings.
            settings
                .act_plando
                .insert("Welcome to Mafia Town".to_string(), "Contractual Obligations".to_string());
            let mut world = HatInTimeWorld::new(settings, Difficulty::Normal)?;
            let mut rng = crate::randomize::seeded_rng(seed);
            world.create_regions(&mut rng)?;
            world.randomize_act_entrances(&mut rng)?;

            let first = world.graph.get_entrance("Mafia Town - Act 1")?;
            let target = &world.graph.regions[world.graph.entrances[first].target].name;
            assert!(GUARANTEED_FIRST_ACTS.contains(&target.as_str()), "{target}");
            assert_ne!(act_info(target).map(|(c, _)| c), Some(ChapterIndex::Subcon), "{target}");
        }
        Ok(())
    }

    #[test]
    fn test_act_plando_is_honored() -> Result<()> {
        let mut settings = HatInTimeSettings::default();
        settings
            .act_plando
            .insert("Barrel Battle".to_string(), "The Golden Vault".to_string());
        settings
            .act_plando
            .insert("The Illness has Spread".to_string(), "Alpine Free Roam".to_string());
        let mut world = HatInTimeWorld::new(settings, Difficulty::Normal)?;
        let mut rng = crate::randomize::seeded_rng(3);
        world.create_regions(&mut rng)?;
        world.randomize_act_entrances(&mut rng)?;

        let bb = world.graph.get_entrance("Mafia Town - Act 2")?;
        assert_eq!(
            world.graph.regions[world.graph.entrances[bb].target].name,
            "The Golden Vault"
        );
        let illness = world.graph.get_entrance("Alpine Skyline - Finale")?;
        assert_ne!(
            world.graph.regions[world.graph.entrances[illness].target].name,
            "Alpine Free Roam"
        );
        Ok(())
    }
}
