use anyhow::{Context, Result};
use log::{debug, info};
use multirando_game::{RegionIdx, Rule};
use rand::seq::SliceRandom;
use rand::Rng;

use super::items::{
    CONTRACTS, HOOKSHOT_BADGE, PAINTING_UNLOCK, SCOOTER_BADGE, TIME_PIECE, UMBRELLA, YARN, ZIPLINES,
};
use super::locations::{act_completion, HitRequirement, EVENTS, LOCATIONS};
use super::regions::{chapter_region, lookup, rift_portal_name, RIFT_ACCESS_REGIONS};
use super::{HatInTimeWorld, HatType};
use crate::difficulty::{apply_difficulty_tiers, Difficulty, TierPass};
use crate::randomize::chapter_costs::generate_cost_ladder;
use crate::rules::{Combinator, RuleTarget};
use crate::settings::{ChapterIndex, CtrLogic};

use Combinator::{And, Or};

// Act entrance -> act entrances whose acts must be cleared first. The game unlocks
// acts in this order no matter which act ends up behind each entrance.
const ACT_CONNECTIONS: &[(&str, &[&str])] = &[
    ("Mafia Town - Act 2", &["Mafia Town - Act 1"]),
    ("Mafia Town - Act 3", &["Mafia Town - Act 1"]),
    ("Mafia Town - Act 4", &["Mafia Town - Act 2", "Mafia Town - Act 3"]),
    ("Mafia Town - Act 6", &["Mafia Town - Act 4"]),
    ("Mafia Town - Act 7", &["Mafia Town - Act 4"]),
    ("Mafia Town - Act 5", &["Mafia Town - Act 6", "Mafia Town - Act 7"]),
    ("Battle of the Birds - Act 2", &["Battle of the Birds - Act 1"]),
    ("Battle of the Birds - Act 3", &["Battle of the Birds - Act 1"]),
    (
        "Battle of the Birds - Act 4",
        &["Battle of the Birds - Act 2", "Battle of the Birds - Act 3"],
    ),
    (
        "Battle of the Birds - Act 5",
        &["Battle of the Birds - Act 2", "Battle of the Birds - Act 3"],
    ),
    (
        "Battle of the Birds - Finale A",
        &["Battle of the Birds - Act 4", "Battle of the Birds - Act 5"],
    ),
    ("Battle of the Birds - Finale B", &["Battle of the Birds - Finale A"]),
    (
        "Subcon Forest - Finale",
        &[
            "Subcon Forest - Act 1",
            "Subcon Forest - Act 2",
            "Subcon Forest - Act 3",
            "Subcon Forest - Act 4",
            "Subcon Forest - Act 5",
        ],
    ),
    ("The Arctic Cruise - Act 2", &["The Arctic Cruise - Act 1"]),
    ("The Arctic Cruise - Finale", &["The Arctic Cruise - Act 2"]),
];

const ALPINE_PATHS: [&str; 4] = ["The Birdhouse", "The Lava Cake", "The Windmill", "The Twilight Bell"];
const ALPINE_CLEARED: [&str; 4] = [
    "Birdhouse Cleared",
    "Lava Cake Cleared",
    "Windmill Cleared",
    "Twilight Bell Cleared",
];

const RULE_TIERS: &[TierPass<HatInTimeWorld>] = &[
    TierPass {
        tier: Difficulty::Moderate,
        name: "moderate",
        apply: HatInTimeWorld::moderate_rules,
    },
    TierPass {
        tier: Difficulty::Hard,
        name: "hard",
        apply: HatInTimeWorld::hard_rules,
    },
    TierPass {
        tier: Difficulty::Expert,
        name: "expert",
        apply: HatInTimeWorld::expert_rules,
    },
];

impl HatInTimeWorld {
    fn item_rule(&self, name: &str) -> Result<Rule> {
        Ok(Rule::item(self.catalog.item_idx(name)?))
    }

    fn time_pieces(&self, count: usize) -> Result<Rule> {
        Ok(Rule::item_count(self.catalog.item_idx(TIME_PIECE)?, count))
    }

    fn chapter_time_pieces(&self, chapter: ChapterIndex) -> Result<Rule> {
        self.time_pieces(self.chapter_cost(chapter))
    }

    fn hookshot(&self) -> Result<Rule> {
        self.item_rule(HOOKSHOT_BADGE)
    }

    fn umbrella(&self) -> Result<Rule> {
        self.item_rule(UMBRELLA)
    }

    fn can_use_hat(&self, hat: HatType) -> Result<Rule> {
        if self.settings.hat_items {
            self.item_rule(hat.item_name())
        } else {
            Ok(Rule::item_count(
                self.catalog.item_idx(YARN)?,
                self.hat_yarn_requirement(hat),
            ))
        }
    }

    fn can_hit(&self, umbrella_only: bool) -> Result<Rule> {
        if !self.settings.umbrella_logic {
            return Ok(Rule::Free);
        }
        if umbrella_only {
            return self.umbrella();
        }
        Ok(Rule::make_or(vec![
            self.umbrella()?,
            self.can_use_hat(HatType::Brewing)?,
        ]))
    }

    // Sprint-dash-jumping.
    fn can_sdj(&self) -> Result<Rule> {
        self.can_use_hat(HatType::Sprint)
    }

    /// Progressive Painting Unlocks needed to pass `count` painting walls in Subcon Forest.
    /// From Moderate up the walls are assumed skippable where `allow_skip` is set, unless
    /// painting skips are turned off.
    fn has_paintings(&self, count: usize, allow_skip: bool) -> Result<Rule> {
        if !self.settings.shuffle_subcon_paintings {
            return Ok(Rule::Free);
        }
        let skippable = allow_skip && !self.settings.no_painting_skips;
        if skippable && self.difficulty >= Difficulty::Moderate {
            return Ok(Rule::Free);
        }
        Ok(Rule::item_count(self.catalog.item_idx(PAINTING_UNLOCK)?, count))
    }

    fn relic_combo(&self, group: &str) -> Result<Rule> {
        let group_idx = self.catalog.group_idx(group)?;
        Ok(Rule::group_count(group_idx, self.catalog.groups[group_idx].len()))
    }

    fn region_rule(&self, name: &str) -> Result<Rule> {
        Ok(Rule::Region(self.graph.get_region(name)?))
    }

    fn any_region(&self, names: &[&str]) -> Result<Rule> {
        let rules = names
            .iter()
            .map(|name| self.region_rule(name))
            .collect::<Result<Vec<_>>>()?;
        Ok(Rule::make_or(rules))
    }

    /// Clearing whatever act sits behind `act_entrance`. Also returns the act's region,
    /// which entrances using the rule must register as an indirect condition.
    fn can_clear_act(&self, act_entrance: &str) -> Result<(Rule, RegionIdx)> {
        let entrance = self.graph.get_entrance(act_entrance)?;
        let region = self.graph.entrances[entrance].target;
        let name = &self.graph.regions[region].name;
        if name.contains("Free Roam") {
            return Ok((Rule::Region(region), region));
        }
        let completion = self.graph.get_location(&act_completion(name))?;
        Ok((Rule::Location(completion), region))
    }

    fn can_clear_alpine(&self) -> Result<Rule> {
        let rules = ALPINE_CLEARED
            .iter()
            .map(|event| self.item_rule(event))
            .collect::<Result<Vec<_>>>()?;
        Ok(Rule::make_and(rules))
    }

    fn loc_target(&self, name: &str) -> Result<RuleTarget> {
        Ok(RuleTarget::Location(self.graph.get_location(name)?))
    }

    fn entrance_target(&self, name: &str) -> Result<RuleTarget> {
        Ok(RuleTarget::Entrance(self.graph.get_entrance(name)?))
    }

    fn add_loc_rule(&mut self, name: &str, rule: Rule, combinator: Combinator) -> Result<()> {
        let target = self.loc_target(name)?;
        self.graph.add_rule(target, rule, combinator);
        Ok(())
    }

    fn set_loc_rule(&mut self, name: &str, rule: Rule) -> Result<()> {
        let target = self.loc_target(name)?;
        self.graph.set_rule(target, rule);
        Ok(())
    }

    fn add_entrance_rule(&mut self, name: &str, rule: Rule, combinator: Combinator) -> Result<()> {
        let target = self.entrance_target(name)?;
        self.graph.add_rule(target, rule, combinator);
        Ok(())
    }

    fn set_entrance_rule(&mut self, name: &str, rule: Rule) -> Result<()> {
        let target = self.entrance_target(name)?;
        self.graph.set_rule(target, rule);
        Ok(())
    }

    fn set_region_location_rules(&mut self, region: &str, rule: Rule) -> Result<()> {
        let region = self.graph.get_region(region)?;
        for location in self.graph.regions[region].locations.clone() {
            self.graph.set_rule(RuleTarget::Location(location), rule.clone());
        }
        Ok(())
    }

    fn set_chapter_costs<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        let start = self.settings.starting_chapter;
        let mut chapters = vec![
            ChapterIndex::Mafia,
            ChapterIndex::Birds,
            ChapterIndex::Subcon,
            ChapterIndex::Alpine,
        ];
        if self.dlc1() {
            chapters.push(ChapterIndex::Cruise);
        }
        chapters.retain(|&c| c != start);
        chapters.shuffle(rng);

        // The Arctic Cruise telescope also asks for the Alpine Skyline cost.
        if self.dlc1() && start != ChapterIndex::Alpine {
            chapters.retain(|&c| c != ChapterIndex::Alpine);
            let cruise = chapters
                .iter()
                .position(|&c| c == ChapterIndex::Cruise)
                .context("Cruise missing from chapter order")?;
            chapters.insert(rng.gen_range(0..=cruise), ChapterIndex::Alpine);
        }

        let costs = generate_cost_ladder(chapters.len(), &self.settings.chapter_costs, rng)?;
        self.chapter_costs.clear();
        self.chapter_costs.insert(start, 0);
        for (&chapter, &cost) in chapters.iter().zip(costs.iter().skip(1)) {
            self.chapter_costs.insert(chapter, cost);
        }
        let finale_cost = rng.gen_range(
            self.settings.final_chapter_min_cost..=self.settings.final_chapter_max_cost,
        );
        self.chapter_costs.insert(ChapterIndex::Finale, finale_cost);
        info!("Chapter order {chapters:?}, costs {:?}", self.chapter_costs);
        Ok(())
    }

    fn set_telescope_rules(&mut self) -> Result<()> {
        for chapter in [
            ChapterIndex::Mafia,
            ChapterIndex::Birds,
            ChapterIndex::Subcon,
            ChapterIndex::Alpine,
        ] {
            let name = format!("Telescope -> {}", chapter_region(chapter));
            self.add_entrance_rule(&name, self.chapter_time_pieces(chapter)?, And)?;
        }

        let times_end = Rule::make_and(vec![
            self.chapter_time_pieces(ChapterIndex::Finale)?,
            self.can_use_hat(HatType::Brewing)?,
            self.can_use_hat(HatType::Dweller)?,
        ]);
        self.add_entrance_rule("Telescope -> Time's End", times_end, And)?;

        if self.dlc1() {
            let cruise = Rule::make_and(vec![
                self.chapter_time_pieces(ChapterIndex::Alpine)?,
                self.chapter_time_pieces(ChapterIndex::Cruise)?,
            ]);
            self.add_entrance_rule("Telescope -> The Arctic Cruise", cruise, And)?;
        }
        Ok(())
    }

    /// Gates every portal of the rift slot `rift`, whichever rift now sits there.
    fn set_rift_rule(&mut self, rift: &str, base: Rule, acts: &[&str]) -> Result<()> {
        if !self.graph.region_isv.index_by_key.contains_key(rift) {
            return Ok(());
        }
        let access = lookup(RIFT_ACCESS_REGIONS, rift)
            .with_context(|| format!("No portals defined for {rift}"))?;

        let mut rules = vec![base];
        let mut act_regions = vec![];
        for act in acts {
            let (rule, region) = self.can_clear_act(act)?;
            rules.push(rule);
            act_regions.push(region);
        }
        let rule = Rule::make_and(rules);
        if rule == Rule::Free {
            return Ok(());
        }

        for i in 0..access.len() {
            let entrance = self.graph.get_entrance(&rift_portal_name(rift, i))?;
            self.graph
                .add_rule(RuleTarget::Entrance(entrance), rule.clone(), And);
            for &region in &act_regions {
                self.graph.register_indirect_condition(region, entrance);
            }
        }
        Ok(())
    }

    fn set_rift_rules(&mut self) -> Result<()> {
        let gallery = Rule::make_and(vec![
            self.can_use_hat(HatType::Brewing)?,
            self.chapter_time_pieces(ChapterIndex::Birds)?,
        ]);
        self.set_rift_rule("Time Rift - Gallery", gallery, &[])?;
        let lab = Rule::make_and(vec![
            self.can_use_hat(HatType::Dweller)?,
            self.chapter_time_pieces(ChapterIndex::Alpine)?,
        ]);
        self.set_rift_rule("Time Rift - The Lab", lab, &[])?;

        self.set_rift_rule("Time Rift - Sewers", Rule::Free, &["Mafia Town - Act 4"])?;
        self.set_rift_rule("Time Rift - Bazaar", Rule::Free, &["Mafia Town - Act 6"])?;
        self.set_rift_rule("Time Rift - Mafia of Cooks", self.relic_combo("Burger")?, &[])?;

        self.set_rift_rule(
            "Time Rift - The Owl Express",
            Rule::Free,
            &["Battle of the Birds - Act 2", "Battle of the Birds - Act 3"],
        )?;
        self.set_rift_rule(
            "Time Rift - The Moon",
            Rule::Free,
            &["Battle of the Birds - Act 4", "Battle of the Birds - Act 5"],
        )?;
        self.set_rift_rule("Time Rift - Dead Bird Studio", self.relic_combo("Train")?, &[])?;

        self.set_rift_rule(
            "Time Rift - Pipe",
            self.has_paintings(2, true)?,
            &["Subcon Forest - Act 2"],
        )?;
        self.set_rift_rule(
            "Time Rift - Village",
            self.has_paintings(2, true)?,
            &["Subcon Forest - Act 4"],
        )?;
        let sleepy = Rule::make_and(vec![self.relic_combo("UFO")?, self.has_paintings(3, true)?]);
        self.set_rift_rule("Time Rift - Sleepy Subcon", sleepy, &[])?;

        self.set_rift_rule(
            "Time Rift - Curly Tail Trail",
            self.item_rule("Windmill Cleared")?,
            &[],
        )?;
        self.set_rift_rule(
            "Time Rift - The Twilight Bell",
            self.item_rule("Twilight Bell Cleared")?,
            &[],
        )?;
        self.set_rift_rule("Time Rift - Alpine Skyline", self.relic_combo("Crayon")?, &[])?;

        if self.dlc1() {
            self.set_rift_rule("Time Rift - Balcony", Rule::Free, &["The Arctic Cruise - Finale"])?;
            self.set_rift_rule("Time Rift - Deep Sea", self.relic_combo("Cake")?, &[])?;
        }
        Ok(())
    }

    fn set_location_table_rules(&mut self) -> Result<()> {
        for entry in LOCATIONS {
            if !entry.dlc.is_enabled_by(self.enabled_dlc) || CONTRACTS.contains(&entry.name) {
                continue;
            }
            let mut rules = vec![];
            for &hat in entry.required_hats {
                rules.push(self.can_use_hat(hat)?);
            }
            if entry.hookshot {
                rules.push(self.hookshot()?);
            }
            if entry.umbrella && self.settings.umbrella_logic {
                rules.push(self.umbrella()?);
            }
            match entry.hit {
                HitRequirement::None => {}
                HitRequirement::Hit => rules.push(self.can_hit(false)?),
                HitRequirement::HitOrDweller => rules.push(Rule::make_or(vec![
                    self.can_hit(false)?,
                    self.can_use_hat(HatType::Dweller)?,
                ])),
            }
            if entry.paintings > 0 {
                rules.push(self.has_paintings(entry.paintings, true)?);
            }
            let rule = Rule::make_and(rules);
            if rule != Rule::Free {
                self.add_loc_rule(entry.name, rule, And)?;
            }
        }
        Ok(())
    }

    fn set_specific_rules(&mut self) -> Result<()> {
        let boss_shop = Rule::make_and(vec![
            self.time_pieces(12)?,
            self.chapter_time_pieces(ChapterIndex::Birds)?,
        ]);
        self.add_loc_rule("Mafia Boss Shop Item", boss_shop, And)?;
        self.add_loc_rule("Spaceship - Rumbi Abuse", self.time_pieces(4)?, And)?;

        self.set_mafia_town_rules()?;
        self.set_botb_rules()?;
        self.set_subcon_rules()?;
        self.set_alps_rules()?;
        if self.dlc1() {
            self.set_dlc1_rules()?;
        }
        Ok(())
    }

    fn set_mafia_town_rules(&mut self) -> Result<()> {
        let behind_hq = Rule::make_or(vec![
            Rule::Location(self.graph.get_location(&act_completion("Heating Up Mafia Town"))?),
            self.any_region(&["Down with the Mafia!", "Cheating the Race", "The Golden Vault"])?,
        ]);
        self.add_loc_rule("Mafia Town - Behind HQ Chest", behind_hq, And)?;

        let old_man = self.any_region(&[
            "Welcome to Mafia Town",
            "Barrel Battle",
            "Cheating the Race",
            "The Golden Vault",
            "Down with the Mafia!",
        ])?;
        self.add_loc_rule("Mafia Town - Old Man (Steel Beams)", old_man.clone(), And)?;
        self.add_loc_rule("Mafia Town - Old Man (Seaside Spaghetti)", old_man, And)?;

        let geek_platform = self.any_region(&[
            "Welcome to Mafia Town",
            "Barrel Battle",
            "Down with the Mafia!",
            "Cheating the Race",
            "Heating Up Mafia Town",
            "The Golden Vault",
        ])?;
        self.add_loc_rule("Mafia Town - Mafia Geek Platform", geek_platform, And)?;

        let scaffolding = self.any_region(&[
            "Welcome to Mafia Town",
            "Barrel Battle",
            "She Came from Outer Space",
            "Cheating the Race",
            "Heating Up Mafia Town",
            "The Golden Vault",
        ])?;
        self.add_loc_rule("Mafia Town - On Scaffolding", scaffolding, And)?;

        // The lava in Heating Up Mafia Town raises the water level.
        let humt = self.item_rule("HUMT Access")?;
        self.add_loc_rule("Mafia Town - Secret Cave", humt.clone(), Or)?;
        self.add_loc_rule("Mafia Town - Above Boats", humt, Or)?;

        let ctr = act_completion("Cheating the Race");
        match self.settings.ctr_logic {
            CtrLogic::TimeStopOnly => {}
            CtrLogic::Nothing => self.set_loc_rule(&ctr, Rule::Free)?,
            CtrLogic::Sprint => self.add_loc_rule(&ctr, self.can_use_hat(HatType::Sprint)?, Or)?,
            CtrLogic::Scooter => {
                let scooter = Rule::make_and(vec![
                    self.can_use_hat(HatType::Sprint)?,
                    self.item_rule(SCOOTER_BADGE)?,
                ]);
                self.add_loc_rule(&ctr, scooter, Or)?;
            }
        }
        Ok(())
    }

    fn set_botb_rules(&mut self) -> Result<()> {
        if self.settings.umbrella_logic || self.difficulty >= Difficulty::Moderate {
            return Ok(());
        }
        // Without umbrella logic these still need something that hits hard enough.
        let hit = Rule::make_or(vec![self.umbrella()?, self.can_use_hat(HatType::Brewing)?]);
        for name in [
            "Dead Bird Studio - DJ Grooves Sign Chest",
            "Dead Bird Studio - Tepee Chest",
            "Dead Bird Studio - Conductor Chest",
            "Act Completion (Dead Bird Studio)",
        ] {
            self.set_loc_rule(name, hit.clone())?;
        }
        Ok(())
    }

    fn set_subcon_rules(&mut self) -> Result<()> {
        let village = Rule::make_or(vec![
            self.can_use_hat(HatType::Brewing)?,
            self.umbrella()?,
            self.can_use_hat(HatType::Dweller)?,
        ]);
        self.set_loc_rule(&act_completion("Time Rift - Village"), village)?;

        let boss_arena = Rule::make_or(vec![
            Rule::make_and(vec![
                self.item_rule("TOD Access")?,
                self.hookshot()?,
                self.has_paintings(1, false)?,
            ]),
            self.item_rule("YCHE Access")?,
        ]);
        self.set_loc_rule("Subcon Forest - Boss Arena Chest", boss_arena)?;

        let toilet = Rule::make_and(vec![
            self.hookshot()?,
            self.can_hit(false)?,
            self.has_paintings(1, false)?,
        ]);
        self.set_loc_rule(&act_completion("Toilet of Doom"), toilet)?;

        if self.settings.shuffle_subcon_paintings {
            // Snatcher hands out the first contract before any painting is in the way.
            self.add_loc_rule(
                &act_completion("Contractual Obligations"),
                self.has_paintings(1, false)?,
                And,
            )?;
            for contract in &CONTRACTS[1..] {
                self.add_loc_rule(contract, self.has_paintings(1, true)?, And)?;
            }
        }

        for (i, contract) in CONTRACTS.iter().enumerate() {
            let entrance = format!("Subcon Forest - Act {}", i + 2);
            self.add_entrance_rule(&entrance, self.item_rule(contract)?, And)?;
        }
        Ok(())
    }

    fn set_alps_rules(&mut self) -> Result<()> {
        let birdhouse = Rule::make_and(vec![self.hookshot()?, self.can_use_hat(HatType::Brewing)?]);
        self.add_entrance_rule("-> The Birdhouse", birdhouse, And)?;
        self.add_entrance_rule("-> The Lava Cake", self.hookshot()?, And)?;
        self.add_entrance_rule("-> The Windmill", self.hookshot()?, And)?;
        let bell = Rule::make_and(vec![self.hookshot()?, self.can_use_hat(HatType::Dweller)?]);
        self.add_entrance_rule("-> The Twilight Bell", bell, And)?;

        let zipline = Rule::make_or(vec![
            self.can_use_hat(HatType::Sprint)?,
            self.can_use_hat(HatType::TimeStop)?,
        ]);
        self.add_loc_rule("Alpine Skyline - Mystifying Time Mesa: Zipline", zipline, And)?;
        self.add_entrance_rule("Alpine Skyline - Finale", self.can_clear_alpine()?, And)?;
        Ok(())
    }

    fn set_dlc1_rules(&mut self) -> Result<()> {
        self.add_entrance_rule("Cruise Ship Entrance BV", self.hookshot()?, And)?;
        // Only reachable while the ship is still afloat.
        let toilet = self.any_region(&["Bon Voyage!", "Ship Shape"])?;
        self.add_loc_rule("The Arctic Cruise - Toilet", toilet, And)?;
        Ok(())
    }

    fn moderate_rules(&mut self) -> Result<()> {
        self.set_loc_rule(&act_completion("Time Rift - Gallery"), Rule::Free)?;
        self.add_loc_rule("Mafia Town - Above Boats", self.can_use_hat(HatType::Ice)?, Or)?;
        self.add_loc_rule("Mafia Town - Clock Tower Chest", Rule::Free, Or)?;
        self.add_loc_rule("Mafia Town - Top of Ruined Tower", Rule::Free, Or)?;

        self.set_region_location_rules("The Subcon Well", self.has_paintings(1, true)?)?;
        self.set_region_location_rules("Queen Vanessa's Manor", Rule::Free)?;
        self.set_loc_rule("Subcon Forest - Manor Rooftop", Rule::Free)?;

        self.set_entrance_rule("-> The Birdhouse", self.hookshot()?)?;
        self.set_loc_rule("Alpine Skyline - Yellow Band Hills", self.hookshot()?)?;
        self.set_loc_rule(
            "Alpine Skyline - The Birdhouse: Dweller Platforms Relic",
            Rule::Free,
        )?;
        self.set_loc_rule("Alpine Skyline - The Twilight Path", Rule::Free)?;
        self.set_loc_rule("Alpine Skyline - Mystifying Time Mesa: Zipline", self.hookshot()?)?;
        self.set_loc_rule(
            &act_completion("The Finale"),
            self.can_use_hat(HatType::Dweller)?,
        )?;

        if self.dlc1() {
            self.add_loc_rule("Rock the Boat - Post Captain Rescue", Rule::Free, Or)?;
            self.add_loc_rule(&act_completion("Rock the Boat"), Rule::Free, Or)?;
            let deep_sea = Rule::make_and(vec![self.hookshot()?, self.can_use_hat(HatType::Dweller)?]);
            self.set_loc_rule(&act_completion("Time Rift - Deep Sea"), deep_sea)?;
        }
        Ok(())
    }

    fn hard_rules(&mut self) -> Result<()> {
        let scooter = Rule::make_and(vec![
            self.can_use_hat(HatType::Sprint)?,
            self.item_rule(SCOOTER_BADGE)?,
        ]);
        self.add_loc_rule(&act_completion("Time Rift - The Twilight Bell"), scooter, Or)?;

        for (name, paintings) in [
            ("Subcon Forest - Dweller Floating Rocks", 3),
            ("Subcon Forest - Noose Treehouse", 2),
            ("Subcon Forest - Long Tree Climb Chest", 2),
            ("Subcon Forest - Tall Tree Hookshot Swing", 3),
        ] {
            self.set_loc_rule(name, self.has_paintings(paintings, true)?)?;
        }
        let boss_arena = Rule::make_or(vec![
            self.has_paintings(1, false)?,
            self.item_rule("YCHE Access")?,
        ]);
        self.set_loc_rule("Subcon Forest - Boss Arena Chest", boss_arena)?;
        let tree_b = Rule::make_and(vec![self.can_sdj()?, self.has_paintings(3, true)?]);
        self.add_loc_rule("Subcon Forest - Dweller Platforming Tree B", tree_b, Or)?;
        self.add_loc_rule(&act_completion("Time Rift - Curly Tail Trail"), self.can_sdj()?, Or)?;

        // Ice Hat stands in for Brewing Hat and Dweller Mask; the Time Piece cost stays.
        let times_end = Rule::make_and(vec![
            self.chapter_time_pieces(ChapterIndex::Finale)?,
            Rule::make_or(vec![
                Rule::make_and(vec![
                    self.can_use_hat(HatType::Brewing)?,
                    self.can_use_hat(HatType::Dweller)?,
                ]),
                self.can_use_hat(HatType::Ice)?,
            ]),
        ]);
        self.set_entrance_rule("Telescope -> Time's End", times_end)?;

        if self.dlc1() {
            self.set_loc_rule(&act_completion("Time Rift - Deep Sea"), self.hookshot()?)?;
        }
        Ok(())
    }

    fn expert_rules(&mut self) -> Result<()> {
        self.set_entrance_rule(
            "Telescope -> Time's End",
            self.chapter_time_pieces(ChapterIndex::Finale)?,
        )?;

        for name in [
            "Mafia Town - Above Boats",
            "Mafia Town - Top of Lighthouse",
            "Mafia Town - Hot Air Balloon",
        ] {
            self.set_loc_rule(name, Rule::Free)?;
        }
        self.set_region_location_rules("Dead Bird Studio - Post Elevator Area", Rule::Free)?;
        self.set_loc_rule(&act_completion("Dead Bird Studio"), Rule::Free)?;
        self.set_region_location_rules("Dead Bird Studio Basement", Rule::Free)?;

        self.add_entrance_rule("-> The Twilight Bell", self.hookshot()?, Or)?;
        let bell = Rule::make_or(vec![
            self.can_use_hat(HatType::Brewing)?,
            self.can_use_hat(HatType::Dweller)?,
            self.can_use_hat(HatType::Sprint)?,
            Rule::make_and(vec![self.can_use_hat(HatType::TimeStop)?, self.umbrella()?]),
        ]);
        self.add_loc_rule(&act_completion("The Twilight Bell"), bell, And)?;

        for rift in [
            "Time Rift - Curly Tail Trail",
            "Time Rift - Village",
            "Time Rift - The Twilight Bell",
        ] {
            self.set_loc_rule(&act_completion(rift), Rule::Free)?;
        }

        // Cherry hovering between the forest and the Snatcher fight, in both directions.
        let yche = self.graph.get_region("Your Contract has Expired")?;
        let forest = self.graph.get_region("Subcon Forest Area")?;
        let hover_in = self.graph.connect(yche, forest, "Subcon Forest Entrance YCHE")?;
        self.graph.connect(forest, yche, "Snatcher Hover")?;
        let painting = self.has_paintings(1, true)?;
        self.graph.add_rule(RuleTarget::Entrance(hover_in), painting, And);

        let toilet = Rule::make_and(vec![
            self.hookshot()?,
            self.can_hit(false)?,
            self.has_paintings(1, true)?,
        ]);
        self.set_loc_rule(&act_completion("Toilet of Doom"), toilet)?;
        for (name, paintings) in [
            ("Subcon Forest - Boss Arena Chest", 1),
            ("Subcon Forest - Dweller Platforming Tree B", 3),
            ("Subcon Forest - Magnet Badge Bush", 3),
        ] {
            self.set_loc_rule(name, self.has_paintings(paintings, true)?)?;
        }
        self.set_loc_rule(&act_completion("Your Contract has Expired"), Rule::Free)?;
        Ok(())
    }

    // Applied after the difficulty passes so nothing relaxes them.
    fn set_alpine_area_rules(&mut self) -> Result<()> {
        let mut intro = vec![self.hookshot()?];
        if self.settings.umbrella_logic {
            intro.push(self.umbrella()?);
        }
        self.add_entrance_rule("AFR -> Alpine Skyline Area", Rule::make_and(intro), And)?;

        if self.settings.shuffle_alpine_ziplines {
            for (path, zipline) in ALPINE_PATHS.iter().zip(ZIPLINES) {
                self.add_entrance_rule(&format!("-> {path}"), self.item_rule(zipline)?, And)?;
            }
            let illness = ZIPLINES[..3]
                .iter()
                .map(|zipline| self.item_rule(zipline))
                .collect::<Result<Vec<_>>>()?;
            self.add_loc_rule(
                &act_completion("The Illness has Spread"),
                Rule::make_and(illness),
                And,
            )?;
        }

        let area = self.graph.get_region("Alpine Skyline Area (TIHS)")?;
        for location in self.graph.regions[area].locations.clone() {
            let name = self.graph.locations[location].name.clone();
            let target = RuleTarget::Location(location);
            if name.contains("Goat Village") {
                continue;
            }
            if name == "Alpine Skyline - Goat Refinery" {
                let rule = Rule::make_and(vec![
                    self.item_rule("AFR Access")?,
                    self.hookshot()?,
                    self.can_hit(true)?,
                ]);
                self.graph.add_rule(target, rule, And);
                if self.difficulty >= Difficulty::Moderate {
                    let tihs = Rule::make_and(vec![
                        self.item_rule("TIHS Access")?,
                        self.can_use_hat(HatType::Sprint)?,
                    ]);
                    self.graph.add_rule(target, tihs, Or);
                }
                continue;
            }
            let hookshot = self.hookshot()?;
            self.graph.add_rule(target, hookshot, And);
        }
        Ok(())
    }

    /// Reproduces the game's act unlock order on top of the (possibly shuffled) act
    /// entrances. Each gated entrance is replaced by one connection per required act,
    /// leading out of that act's region, and is itself closed off.
    fn set_act_connection_rules(&mut self) -> Result<()> {
        let mut replaced = vec![];
        for &(key, required) in ACT_CONNECTIONS {
            if key.starts_with("The Arctic Cruise") && !self.dlc1() {
                continue;
            }
            let entrance = self.graph.get_entrance(key)?;
            let region = self.graph.entrances[entrance].target;
            replaced.push(entrance);

            let mut rules = vec![];
            let mut connections = vec![];
            for (i, &act) in required.iter().enumerate() {
                let act_entrance = self.graph.get_entrance(act)?;
                rules.push(self.graph.rule_or_free(RuleTarget::Entrance(act_entrance)));
                let required_region = self.graph.entrances[act_entrance].target;
                let name = format!("{key}: Connection {}", i + 1);
                connections.push(self.graph.connect(required_region, region, &name)?);

                let required_name = &self.graph.regions[required_region].name;
                if !required_name.contains("Free Roam") {
                    let completion = self.graph.get_location(&act_completion(required_name))?;
                    rules.push(Rule::LocationRule(completion));
                }
            }
            let rule = Rule::make_and(rules);
            for connection in connections {
                self.graph.set_rule(RuleTarget::Entrance(connection), rule.clone());
            }
        }
        for entrance in replaced {
            self.graph.set_rule(RuleTarget::Entrance(entrance), Rule::Never);
        }
        Ok(())
    }

    fn set_event_rules(&mut self) -> Result<()> {
        for event in EVENTS.iter().filter(|e| e.act_event) {
            let Some(&location) = self.graph.location_isv.index_by_key.get(event.name) else {
                continue;
            };
            let completion = self.graph.get_location(&act_completion(event.region))?;
            self.graph
                .copy_location_rule(RuleTarget::Location(location), completion);
        }
        Ok(())
    }

    pub(super) fn set_rules<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        self.set_chapter_costs(rng)?;
        self.set_telescope_rules()?;
        self.set_rift_rules()?;
        self.set_location_table_rules()?;
        self.set_specific_rules()?;

        let difficulty = self.difficulty;
        let applied = apply_difficulty_tiers(self, difficulty, RULE_TIERS)?;
        debug!("Applied {applied} difficulty rule passes");

        self.set_alpine_area_rules()?;
        self.set_act_connection_rules()?;
        self.set_event_rules()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::randomize::seeded_rng;
    use crate::settings::{ActRandomizer, HatInTimeSettings};
    use crate::traverse::{apply_rule, new_state};

    fn build(settings: HatInTimeSettings, difficulty: Difficulty, seed: usize) -> Result<HatInTimeWorld> {
        let mut world = HatInTimeWorld::new(settings, difficulty)?;
        let mut rng = seeded_rng(seed);
        world.create_regions(&mut rng)?;
        if world.settings.act_randomizer != ActRandomizer::Disabled {
            world.randomize_act_entrances(&mut rng)?;
        }
        world.create_events()?;
        world.place_contracts()?;
        world.create_item_pool(&mut rng)?;
        world.set_rules(&mut rng)?;
        Ok(world)
    }

    fn vanilla_acts() -> HatInTimeSettings {
        HatInTimeSettings {
            act_randomizer: ActRandomizer::Disabled,
            hat_items: true,
            ..Default::default()
        }
    }

    fn entrance_rule(world: &HatInTimeWorld, name: &str) -> Result<Rule> {
        Ok(world.graph.rule_or_free(world.entrance_target(name)?))
    }

    #[test]
    fn test_hard_times_end_keeps_time_piece_requirement() -> Result<()> {
        let world = build(vanilla_acts(), Difficulty::Hard, 5)?;
        let rule = entrance_rule(&world, "Telescope -> Time's End")?;
        let cost = world.chapter_cost(ChapterIndex::Finale);
        let time_piece = world.catalog.item_idx(TIME_PIECE)?;
        let ice = world.catalog.item_idx("Ice Hat")?;

        let mut state = new_state(&world.graph, &world.catalog);
        state.collect(ice, &world.catalog);
        assert!(!apply_rule(&rule, &state, &world.graph));
        for _ in 0..cost {
            state.collect(time_piece, &world.catalog);
        }
        assert!(apply_rule(&rule, &state, &world.graph));
        Ok(())
    }

    #[test]
    fn test_chapter_costs_follow_unlock_order() -> Result<()> {
        for seed in 0..20 {
            let settings = HatInTimeSettings {
                enable_dlc1: true,
                starting_chapter: ChapterIndex::Subcon,
                ..vanilla_acts()
            };
            let world = build(settings, Difficulty::Normal, seed)?;
            let ladder = world.settings.chapter_costs;
            assert_eq!(world.chapter_cost(ChapterIndex::Subcon), 0);
            assert!(world.chapter_cost(ChapterIndex::Alpine) <= world.chapter_cost(ChapterIndex::Cruise));
            for chapter in [ChapterIndex::Mafia, ChapterIndex::Birds, ChapterIndex::Alpine] {
                let cost = world.chapter_cost(chapter);
                assert!(cost >= ladder.lowest && cost <= ladder.highest, "{chapter:?} {cost}");
            }
            let finale = world.chapter_cost(ChapterIndex::Finale);
            assert!((20..=24).contains(&finale));
        }
        Ok(())
    }

    #[test]
    fn test_act_connections_replace_gated_entrances() -> Result<()> {
        let world = build(vanilla_acts(), Difficulty::Normal, 1)?;
        assert_eq!(entrance_rule(&world, "Mafia Town - Act 4")?, Rule::Never);

        let first = world.graph.get_entrance("Mafia Town - Act 4: Connection 1")?;
        let second = world.graph.get_entrance("Mafia Town - Act 4: Connection 2")?;
        let first = &world.graph.entrances[first];
        assert_eq!(world.graph.regions[first.parent].name, "Barrel Battle");
        assert_eq!(world.graph.regions[first.target].name, "Down with the Mafia!");
        // Both connections demand clearing both prerequisite acts.
        let completion = world.graph.get_location("Act Completion (Barrel Battle)")?;
        let second = &world.graph.entrances[second];
        assert_eq!(world.graph.regions[second.parent].name, "She Came from Outer Space");
        match second.rule.clone().unwrap_or(Rule::Free) {
            Rule::And(rules) => assert!(rules.contains(&Rule::LocationRule(completion))),
            other => panic!("unexpected rule {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_rift_portals_wait_for_their_act() -> Result<()> {
        let world = build(HatInTimeSettings::default(), Difficulty::Normal, 9)?;
        let act4 = world.graph.get_entrance("Mafia Town - Act 4")?;
        let act4_region = world.graph.entrances[act4].target;
        let portal = world.graph.get_entrance(&rift_portal_name("Time Rift - Sewers", 0))?;
        assert!(world.graph.indirect_conditions[act4_region].contains(&portal));
        assert_ne!(world.graph.rule_or_free(RuleTarget::Entrance(portal)), Rule::Free);
        Ok(())
    }

    #[test]
    fn test_expert_adds_cherry_hover() -> Result<()> {
        let normal = build(vanilla_acts(), Difficulty::Normal, 2)?;
        assert!(normal.graph.get_entrance("Snatcher Hover").is_err());
        let expert = build(vanilla_acts(), Difficulty::Expert, 2)?;
        expert.graph.get_entrance("Snatcher Hover")?;
        expert.graph.get_entrance("Subcon Forest Entrance YCHE")?;
        assert_eq!(
            expert.graph.rule_or_free(expert.loc_target("Mafia Town - Top of Lighthouse")?),
            Rule::Free
        );
        expert.graph.check_well_formed()?;
        Ok(())
    }

    #[test]
    fn test_painting_walls_gate_subcon() -> Result<()> {
        let shuffled = HatInTimeSettings {
            shuffle_subcon_paintings: true,
            ..vanilla_acts()
        };
        let world = build(shuffled.clone(), Difficulty::Normal, 6)?;
        let painting = world.catalog.item_idx(PAINTING_UNLOCK)?;
        let burning = world.graph.rule_or_free(world.loc_target("Subcon Forest - Burning House")?);
        assert_eq!(burning, Rule::item_count(painting, 2));
        let pipe = world.graph.get_entrance(&rift_portal_name("Time Rift - Pipe", 0))?;
        match world.graph.rule_or_free(RuleTarget::Entrance(pipe)) {
            Rule::And(rules) => assert!(rules.contains(&Rule::item_count(painting, 2))),
            other => panic!("unexpected rule {other:?}"),
        }

        // Moderate skips the walls unless told not to, but not the ones with no way around.
        let moderate = build(shuffled.clone(), Difficulty::Moderate, 6)?;
        let burning = moderate
            .graph
            .rule_or_free(moderate.loc_target("Subcon Forest - Burning House")?);
        assert_eq!(burning, Rule::Free);
        let toilet = moderate
            .graph
            .rule_or_free(moderate.loc_target(&act_completion("Toilet of Doom"))?);
        let hookshot = moderate.catalog.item_idx(HOOKSHOT_BADGE)?;
        let mut state = new_state(&moderate.graph, &moderate.catalog);
        state.collect(hookshot, &moderate.catalog);
        assert!(!apply_rule(&toilet, &state, &moderate.graph));
        state.collect(painting, &moderate.catalog);
        assert!(apply_rule(&toilet, &state, &moderate.graph));

        let strict = HatInTimeSettings {
            no_painting_skips: true,
            ..shuffled
        };
        let strict = build(strict, Difficulty::Moderate, 6)?;
        let well = strict.graph.rule_or_free(strict.loc_target("Subcon Well - Mushroom")?);
        assert_eq!(well, Rule::item_count(painting, 1));

        let unshuffled = build(vanilla_acts(), Difficulty::Normal, 6)?;
        let burning = unshuffled
            .graph
            .rule_or_free(unshuffled.loc_target("Subcon Forest - Burning House")?);
        assert_eq!(burning, Rule::Free);
        Ok(())
    }

    #[test]
    fn test_event_follows_act_completion_rule() -> Result<()> {
        let world = build(vanilla_acts(), Difficulty::Normal, 4)?;
        let event = world.graph.get_location("Time Piece Cluster")?;
        let completion = world.graph.get_location(&act_completion("The Finale"))?;
        assert_eq!(
            world.graph.locations[event].rule,
            Some(Rule::LocationRule(completion))
        );
        Ok(())
    }
}
