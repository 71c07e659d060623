use anyhow::Result;
use multirando_game::{DlcFlags, LocationCatalog, LocationCode, LocationData};

use super::HatType;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HitRequirement {
    None,
    Hit,
    // Dweller Mask also works, by phasing through whatever blocks the way.
    HitOrDweller,
}

#[derive(Copy, Clone, Debug)]
pub struct LocationEntry {
    pub name: &'static str,
    pub code: LocationCode,
    pub region: &'static str,
    pub required_hats: &'static [HatType],
    pub hookshot: bool,
    // Only enforced with umbrella logic.
    pub umbrella: bool,
    pub hit: HitRequirement,
    // Progressive Painting Unlocks needed, when paintings are shuffled.
    pub paintings: usize,
    pub dlc: DlcFlags,
}

const fn loc(name: &'static str, code: LocationCode, region: &'static str) -> LocationEntry {
    LocationEntry {
        name,
        code,
        region,
        required_hats: &[],
        hookshot: false,
        umbrella: false,
        hit: HitRequirement::None,
        paintings: 0,
        dlc: DlcFlags::empty(),
    }
}

impl LocationEntry {
    const fn hats(self, required_hats: &'static [HatType]) -> Self {
        LocationEntry {
            required_hats,
            ..self
        }
    }

    const fn hookshot(self) -> Self {
        LocationEntry {
            hookshot: true,
            ..self
        }
    }

    const fn umbrella(self) -> Self {
        LocationEntry {
            umbrella: true,
            ..self
        }
    }

    const fn hit(self, hit: HitRequirement) -> Self {
        LocationEntry { hit, ..self }
    }

    const fn paintings(self, paintings: usize) -> Self {
        LocationEntry { paintings, ..self }
    }

    const fn dlc1(self) -> Self {
        LocationEntry {
            dlc: DlcFlags::DLC1,
            ..self
        }
    }
}

pub const LOCATIONS: &[LocationEntry] = &[
    loc("Spaceship - Rumbi Abuse", 2000310001, "Spaceship"),
    loc("Mafia Boss Shop Item", 2000310002, "Spaceship"),
    loc("Spaceship - Cooking Cat", 2000310003, "Spaceship"),
    loc(
        "Act Completion (Time Rift - Gallery)",
        2000310004,
        "Time Rift - Gallery",
    ).hats(&[HatType::Brewing]),
    loc("Act Completion (Time Rift - The Lab)", 2000310005, "Time Rift - The Lab"),
    loc("Mafia Town - Old Man (Seaside Spaghetti)", 2000310006, "Mafia Town Area"),
    loc("Mafia Town - Old Man (Steel Beams)", 2000310007, "Mafia Town Area"),
    loc("Mafia Town - Blue Vault", 2000310008, "Mafia Town Area"),
    loc("Mafia Town - Green Vault", 2000310009, "Mafia Town Area"),
    loc("Mafia Town - Red Vault", 2000310010, "Mafia Town Area"),
    loc(
        "Mafia Town - Blue Vault Brewing Crate",
        2000310011,
        "Mafia Town Area",
    ).hats(&[HatType::Brewing]),
    loc("Mafia Town - Plaza Under Boxes", 2000310012, "Mafia Town Area"),
    loc("Mafia Town - Small Boat", 2000310013, "Mafia Town Area"),
    loc("Mafia Town - Staircase Pon Cluster", 2000310014, "Mafia Town Area"),
    loc("Mafia Town - Shallow Water", 2000310015, "Mafia Town Area"),
    loc("Mafia Town - Docks Chest", 2000310016, "Mafia Town Area"),
    loc("Mafia Town - Dweller Boxes", 2000310017, "Mafia Town Area").hats(&[HatType::Dweller]),
    loc("Mafia Town - Ledge Chest", 2000310018, "Mafia Town Area"),
    loc("Mafia Town - Yellow Sphere Building Chest", 2000310019, "Mafia Town Area"),
    loc("Mafia Town - Beneath Scaffolding", 2000310020, "Mafia Town Area"),
    loc("Mafia Town - On Scaffolding", 2000310021, "Mafia Town Area"),
    loc("Mafia Town - Cargo Ship", 2000310022, "Mafia Town Area"),
    loc("Mafia Town - Beach Alcove", 2000310023, "Mafia Town Area"),
    loc("Mafia Town - Wood Cage", 2000310024, "Mafia Town Area"),
    loc("Mafia Town - Beach Patio", 2000310025, "Mafia Town Area"),
    loc("Mafia Town - Steel Beam Nest", 2000310026, "Mafia Town Area"),
    loc("Mafia Town - Top of Ruined Tower", 2000310027, "Mafia Town Area").hats(&[HatType::Ice]),
    loc("Mafia Town - Hot Air Balloon", 2000310028, "Mafia Town Area").hats(&[HatType::Ice]),
    loc("Mafia Town - Chest Beneath Aqueduct", 2000310029, "Mafia Town Area"),
    loc("Mafia Town - Secret Cave", 2000310030, "Mafia Town Area").hats(&[HatType::Brewing]),
    loc("Mafia Town - Crow Chest", 2000310031, "Mafia Town Area"),
    loc("Mafia Town - Above Boats", 2000310032, "Mafia Town Area").hookshot(),
    loc("Mafia Town - Slip Slide Chest", 2000310033, "Mafia Town Area"),
    loc("Mafia Town - Behind Faucet", 2000310034, "Mafia Town Area"),
    loc("Mafia Town - Clock Tower Chest", 2000310035, "Mafia Town Area").hookshot(),
    loc("Mafia Town - Top of Lighthouse", 2000310036, "Mafia Town Area").hookshot(),
    loc("Mafia Town - Mafia Geek Platform", 2000310037, "Mafia Town Area"),
    loc("Mafia Town - Behind HQ Chest", 2000310038, "Mafia Town Area"),
    loc("Act Completion (Welcome to Mafia Town)", 2000310039, "Welcome to Mafia Town"),
    loc("Act Completion (Barrel Battle)", 2000310040, "Barrel Battle"),
    loc("Act Completion (She Came from Outer Space)", 2000310041, "She Came from Outer Space"),
    loc(
        "Mafia HQ - Hallway Brewing Crate",
        2000310042,
        "Down with the Mafia!",
    ).hats(&[HatType::Brewing]),
    loc("Mafia HQ - Freezer Chest", 2000310043, "Down with the Mafia!"),
    loc("Mafia HQ - Secret Room", 2000310044, "Down with the Mafia!").hats(&[HatType::Ice]),
    loc("Mafia HQ - Bathroom Stall Chest", 2000310045, "Down with the Mafia!"),
    loc(
        "Act Completion (Down with the Mafia!)",
        2000310046,
        "Down with the Mafia!",
    ).hit(HitRequirement::Hit),
    loc(
        "Act Completion (Cheating the Race)",
        2000310047,
        "Cheating the Race",
    ).hats(&[HatType::TimeStop]),
    loc("Act Completion (Heating Up Mafia Town)", 2000310048, "Heating Up Mafia Town").umbrella(),
    loc("Act Completion (The Golden Vault)", 2000310049, "The Golden Vault"),
    loc("Act Completion (Time Rift - Mafia of Cooks)", 2000310050, "Time Rift - Mafia of Cooks"),
    loc("Act Completion (Time Rift - Sewers)", 2000310051, "Time Rift - Sewers"),
    loc("Act Completion (Time Rift - Bazaar)", 2000310052, "Time Rift - Bazaar"),
    loc("Dead Bird Studio - Up the Ladder", 2000310053, "Dead Bird Studio"),
    loc("Dead Bird Studio - Red Building Top", 2000310054, "Dead Bird Studio"),
    loc("Dead Bird Studio - Behind Water Tower", 2000310055, "Dead Bird Studio"),
    loc("Dead Bird Studio - Side of House", 2000310056, "Dead Bird Studio"),
    loc(
        "Act Completion (Dead Bird Studio)",
        2000310057,
        "Dead Bird Studio",
    ).hit(HitRequirement::Hit),
    loc(
        "Dead Bird Studio - DJ Grooves Sign Chest",
        2000310058,
        "Dead Bird Studio - Elevator Area",
    ).hit(HitRequirement::Hit),
    loc(
        "Dead Bird Studio - Tightrope Chest",
        2000310059,
        "Dead Bird Studio - Elevator Area",
    ).hit(HitRequirement::Hit),
    loc(
        "Dead Bird Studio - Tepee Chest",
        2000310060,
        "Dead Bird Studio - Post Elevator Area",
    ).hit(HitRequirement::Hit),
    loc(
        "Dead Bird Studio - Conductor Chest",
        2000310061,
        "Dead Bird Studio - Post Elevator Area",
    ).hit(HitRequirement::Hit),
    loc("Murder on the Owl Express - Cafeteria", 2000310062, "Murder on the Owl Express"),
    loc("Murder on the Owl Express - Luggage Room Top", 2000310063, "Murder on the Owl Express"),
    loc("Murder on the Owl Express - Raven Suite Room", 2000310064, "Murder on the Owl Express"),
    loc("Act Completion (Murder on the Owl Express)", 2000310065, "Murder on the Owl Express"),
    loc("Picture Perfect - Behind Badge Seller", 2000310066, "Picture Perfect"),
    loc("Picture Perfect - Hats Buy Building", 2000310067, "Picture Perfect"),
    loc("Act Completion (Picture Perfect)", 2000310068, "Picture Perfect"),
    loc("Act Completion (Train Rush)", 2000310069, "Train Rush").hookshot(),
    loc("The Big Parade - Basketball", 2000310070, "The Big Parade"),
    loc("Act Completion (The Big Parade)", 2000310071, "The Big Parade").umbrella(),
    loc("Act Completion (Award Ceremony)", 2000310072, "Award Ceremony"),
    loc("Dead Bird Studio Basement - Window Platform", 2000310073, "Dead Bird Studio Basement"),
    loc(
        "Dead Bird Studio Basement - Cardboard Conductor",
        2000310074,
        "Dead Bird Studio Basement",
    ).hookshot(),
    loc(
        "Dead Bird Studio Basement - Above Conductor Sign",
        2000310075,
        "Dead Bird Studio Basement",
    ).hookshot(),
    loc(
        "Act Completion (Dead Bird Studio Basement)",
        2000310076,
        "Dead Bird Studio Basement",
    ).hookshot(),
    loc(
        "Act Completion (Time Rift - Dead Bird Studio)",
        2000310077,
        "Time Rift - Dead Bird Studio",
    ),
    loc("Act Completion (Time Rift - The Owl Express)", 2000310078, "Time Rift - The Owl Express"),
    loc("Act Completion (Time Rift - The Moon)", 2000310079, "Time Rift - The Moon"),
    loc("Subcon Village - Tree Top Ice Cube", 2000310080, "Subcon Forest Area"),
    loc("Subcon Village - Graveyard Ice Cube", 2000310081, "Subcon Forest Area"),
    loc("Subcon Village - House Top", 2000310082, "Subcon Forest Area"),
    loc("Subcon Village - Ice Cube House", 2000310083, "Subcon Forest Area"),
    loc("Subcon Village - Snatcher Statue Chest", 2000310084, "Subcon Forest Area"),
    loc("Subcon Village - Stump Platform Chest", 2000310085, "Subcon Forest Area"),
    loc("Subcon Forest - Giant Tree Climb", 2000310086, "Subcon Forest Area"),
    loc(
        "Subcon Forest - Swamp Gravestone",
        2000310087,
        "Subcon Forest Area",
    ).hats(&[HatType::Brewing]).paintings(1),
    loc("Subcon Forest - Swamp Near Well", 2000310088, "Subcon Forest Area").paintings(1),
    loc("Subcon Forest - Swamp Tree A", 2000310089, "Subcon Forest Area").paintings(1),
    loc("Subcon Forest - Swamp Tree B", 2000310090, "Subcon Forest Area").paintings(1),
    loc(
        "Subcon Forest - Ice Cube Shack",
        2000310091,
        "Subcon Forest Area",
    ).hats(&[HatType::Ice]).paintings(1),
    loc(
        "Subcon Forest - Gravestone",
        2000310092,
        "Subcon Forest Area",
    ).hats(&[HatType::Brewing]).paintings(1),
    loc(
        "Subcon Forest - Noose Treehouse",
        2000310093,
        "Subcon Forest Area",
    ).hookshot().paintings(2),
    loc(
        "Subcon Forest - Long Tree Climb Chest",
        2000310094,
        "Subcon Forest Area",
    ).hats(&[HatType::Dweller]).paintings(2),
    loc("Subcon Forest - Boss Arena Chest", 2000310095, "Subcon Forest Area"),
    loc(
        "Subcon Forest - Manor Rooftop",
        2000310096,
        "Subcon Forest Area",
    ).hit(HitRequirement::HitOrDweller),
    loc(
        "Subcon Forest - Infinite Yarn Bush",
        2000310097,
        "Subcon Forest Area",
    ).hats(&[HatType::Brewing]).paintings(2),
    loc(
        "Subcon Forest - Magnet Badge Bush",
        2000310098,
        "Subcon Forest Area",
    ).hats(&[HatType::Brewing]).paintings(3),
    loc(
        "Subcon Forest - Dweller Stump",
        2000310099,
        "Subcon Forest Area",
    ).hats(&[HatType::Dweller]).paintings(3),
    loc(
        "Subcon Forest - Dweller Floating Rocks",
        2000310100,
        "Subcon Forest Area",
    ).hats(&[HatType::Dweller]).paintings(3),
    loc(
        "Subcon Forest - Dweller Platforming Tree A",
        2000310101,
        "Subcon Forest Area",
    ).paintings(3),
    loc(
        "Subcon Forest - Dweller Platforming Tree B",
        2000310102,
        "Subcon Forest Area",
    ).hats(&[HatType::Dweller]).paintings(3),
    loc(
        "Subcon Forest - Tall Tree Hookshot Swing",
        2000310103,
        "Subcon Forest Area",
    ).hats(&[HatType::Dweller]).hookshot().paintings(3),
    loc("Subcon Forest - Burning House", 2000310104, "Subcon Forest Area").paintings(2),
    loc("Subcon Forest - Burning Tree Climb", 2000310105, "Subcon Forest Area").paintings(2),
    loc("Subcon Forest - Burning Stump Chest", 2000310106, "Subcon Forest Area").paintings(2),
    loc("Subcon Forest - Burning Forest Treehouse", 2000310107, "Subcon Forest Area").paintings(2),
    loc("Snatcher's Contract - Toilet of Doom", 2000310108, "Subcon Forest Area"),
    loc("Snatcher's Contract - Queen Vanessa's Manor", 2000310109, "Subcon Forest Area"),
    loc("Snatcher's Contract - Mail Delivery Service", 2000310110, "Subcon Forest Area"),
    loc("Snatcher's Contract - The Subcon Well", 2000310111, "Contractual Obligations"),
    loc("Act Completion (Contractual Obligations)", 2000310112, "Contractual Obligations"),
    loc(
        "Subcon Well - Hookshot Badge Chest",
        2000310113,
        "The Subcon Well",
    ).hit(HitRequirement::Hit).paintings(1),
    loc(
        "Subcon Well - Above Chest",
        2000310114,
        "The Subcon Well",
    ).hit(HitRequirement::Hit).paintings(1),
    loc(
        "Subcon Well - On Pipe",
        2000310115,
        "The Subcon Well",
    ).hookshot().hit(HitRequirement::Hit).paintings(1),
    loc(
        "Subcon Well - Mushroom",
        2000310116,
        "The Subcon Well",
    ).hit(HitRequirement::Hit).paintings(1),
    loc(
        "Act Completion (The Subcon Well)",
        2000310117,
        "The Subcon Well",
    ).hookshot().hit(HitRequirement::HitOrDweller).paintings(1),
    loc(
        "Act Completion (Toilet of Doom)",
        2000310118,
        "Toilet of Doom",
    ).hookshot().hit(HitRequirement::Hit),
    loc(
        "Queen Vanessa's Manor - Cellar",
        2000310119,
        "Queen Vanessa's Manor",
    ).hit(HitRequirement::Hit),
    loc(
        "Queen Vanessa's Manor - Bedroom Chest",
        2000310120,
        "Queen Vanessa's Manor",
    ).hit(HitRequirement::Hit),
    loc(
        "Queen Vanessa's Manor - Hall Chest",
        2000310121,
        "Queen Vanessa's Manor",
    ).hit(HitRequirement::Hit),
    loc(
        "Queen Vanessa's Manor - Chandelier",
        2000310122,
        "Queen Vanessa's Manor",
    ).hit(HitRequirement::Hit),
    loc("Act Completion (Queen Vanessa's Manor)", 2000310123, "Queen Vanessa's Manor").umbrella(),
    loc(
        "Act Completion (Mail Delivery Service)",
        2000310124,
        "Mail Delivery Service",
    ).hats(&[HatType::Sprint]),
    loc(
        "Act Completion (Your Contract has Expired)",
        2000310125,
        "Your Contract has Expired",
    ).umbrella(),
    loc("Act Completion (Time Rift - Sleepy Subcon)", 2000310126, "Time Rift - Sleepy Subcon"),
    loc("Act Completion (Time Rift - Pipe)", 2000310127, "Time Rift - Pipe").hookshot(),
    loc("Act Completion (Time Rift - Village)", 2000310128, "Time Rift - Village"),
    loc("Alpine Skyline - Mystifying Time Mesa: Zipline", 2000310129, "Alpine Skyline Area"),
    loc(
        "Alpine Skyline - The Twilight Path",
        2000310130,
        "Alpine Skyline Area",
    ).hats(&[HatType::Dweller]),
    loc("Alpine Skyline - Bird Pass Fork", 2000310131, "Alpine Skyline Area"),
    loc("Alpine Skyline - The Purrloined Village: Horned Stone", 2000310132, "Alpine Skyline Area"),
    loc("Alpine Skyline - The Purrloined Village: Chest Reward", 2000310133, "Alpine Skyline Area"),
    loc("Alpine Skyline - Goat Village: Below Hookpoint", 2000310134, "Alpine Skyline Area (TIHS)"),
    loc("Alpine Skyline - Goat Village: Hidden Branch", 2000310135, "Alpine Skyline Area (TIHS)"),
    loc("Alpine Skyline - Goat Refinery", 2000310136, "Alpine Skyline Area (TIHS)"),
    loc(
        "Alpine Skyline - Yellow Band Hills",
        2000310137,
        "Alpine Skyline Area (TIHS)",
    ).hats(&[HatType::Brewing]),
    loc("Alpine Skyline - Ember Summit", 2000310138, "Alpine Skyline Area (TIHS)"),
    loc("Alpine Skyline - Windy Passage", 2000310139, "Alpine Skyline Area (TIHS)"),
    loc("Alpine Skyline - The Birdhouse: Triple Crow Chest", 2000310140, "The Birdhouse"),
    loc(
        "Alpine Skyline - The Birdhouse: Dweller Platforms Relic",
        2000310141,
        "The Birdhouse",
    ).hats(&[HatType::Dweller]),
    loc(
        "Alpine Skyline - The Birdhouse: Brewing Crate House",
        2000310142,
        "The Birdhouse",
    ).hats(&[HatType::Brewing]),
    loc("Act Completion (The Birdhouse)", 2000310143, "The Birdhouse"),
    loc("Alpine Skyline - The Lava Cake: Center Fence Cage", 2000310144, "The Lava Cake"),
    loc(
        "Alpine Skyline - The Lava Cake: Dweller Pillars",
        2000310145,
        "The Lava Cake",
    ).hats(&[HatType::Dweller]),
    loc("Alpine Skyline - The Lava Cake: Top Cake", 2000310146, "The Lava Cake"),
    loc("Act Completion (The Lava Cake)", 2000310147, "The Lava Cake"),
    loc("Alpine Skyline - The Windmill: Entrance", 2000310148, "The Windmill"),
    loc("Alpine Skyline - The Windmill: Dropdown", 2000310149, "The Windmill"),
    loc("Alpine Skyline - The Windmill: House Window", 2000310150, "The Windmill"),
    loc("Act Completion (The Windmill)", 2000310151, "The Windmill"),
    loc(
        "Alpine Skyline - The Twilight Bell: Ice Platform",
        2000310152,
        "The Twilight Bell",
    ).hats(&[HatType::Ice]),
    loc(
        "Alpine Skyline - The Twilight Bell: Wide Purple Platform",
        2000310153,
        "The Twilight Bell",
    ),
    loc("Act Completion (The Twilight Bell)", 2000310154, "The Twilight Bell"),
    loc("Act Completion (The Illness has Spread)", 2000310155, "The Illness has Spread").hookshot(),
    loc("Act Completion (Time Rift - Alpine Skyline)", 2000310156, "Time Rift - Alpine Skyline"),
    loc(
        "Act Completion (Time Rift - The Twilight Bell)",
        2000310157,
        "Time Rift - The Twilight Bell",
    ).hats(&[HatType::Dweller]),
    loc(
        "Act Completion (Time Rift - Curly Tail Trail)",
        2000310158,
        "Time Rift - Curly Tail Trail",
    ).hats(&[HatType::Dweller]),
    loc(
        "Act Completion (The Finale)",
        2000310159,
        "The Finale",
    ).hats(&[HatType::Dweller]).hookshot(),
    loc("The Arctic Cruise - Toilet", 2000310160, "Cruise Ship").dlc1(),
    loc("The Arctic Cruise - Bridge", 2000310161, "Cruise Ship").dlc1(),
    loc("The Arctic Cruise - Dinner Table", 2000310162, "Cruise Ship").dlc1(),
    loc("The Arctic Cruise - Kitchen", 2000310163, "Cruise Ship").dlc1(),
    loc("The Arctic Cruise - Captain's Cabin", 2000310164, "Cruise Ship").hookshot().dlc1(),
    loc("The Arctic Cruise - Lifeboat", 2000310165, "Cruise Ship").dlc1(),
    loc("Act Completion (Bon Voyage!)", 2000310166, "Bon Voyage!").hookshot().dlc1(),
    loc("Act Completion (Ship Shape)", 2000310167, "Ship Shape").dlc1(),
    loc(
        "Rock the Boat - Post Captain Rescue",
        2000310168,
        "Rock the Boat",
    ).hats(&[HatType::Ice]).dlc1(),
    loc("Act Completion (Rock the Boat)", 2000310169, "Rock the Boat").hats(&[HatType::Ice]).dlc1(),
    loc(
        "Act Completion (Time Rift - Balcony)",
        2000310170,
        "Time Rift - Balcony",
    ).hookshot().dlc1(),
    loc(
        "Act Completion (Time Rift - Deep Sea)",
        2000310171,
        "Time Rift - Deep Sea",
    ).hats(&[HatType::Dweller, HatType::Ice]).hookshot().dlc1(),
    loc("Act Completion (Time Rift - Tour)", 2000310172, "Time Rift - Tour").dlc1(),
];

pub const BADGE_SELLER_REGION: &str = "Badge Seller";
pub const BADGE_SELLER_MAX_ITEMS: usize = 10;
const BADGE_SELLER_BASE_CODE: LocationCode = 2000310300;

pub fn badge_seller_location(i: usize) -> (String, LocationCode) {
    (
        format!("Badge Seller - Item {}", i + 1),
        BADGE_SELLER_BASE_CODE + i as LocationCode,
    )
}

/// Code-less location holding a locked event item of the same name.
pub struct EventEntry {
    pub name: &'static str,
    pub region: &'static str,
    // Shares the rule of the act completion in the same region.
    pub act_event: bool,
    pub dlc: DlcFlags,
}

const fn event(name: &'static str, region: &'static str, act_event: bool) -> EventEntry {
    EventEntry {
        name,
        region,
        act_event,
        dlc: DlcFlags::empty(),
    }
}

pub const TIME_PIECE_CLUSTER: &str = "Time Piece Cluster";

pub const EVENTS: &[EventEntry] = &[
    event("HUMT Access", "Heating Up Mafia Town", true),
    event("TOD Access", "Toilet of Doom", true),
    event("YCHE Access", "Your Contract has Expired", true),
    event("AFR Access", "Alpine Free Roam", false),
    event("TIHS Access", "The Illness has Spread", true),
    event("Birdhouse Cleared", "The Birdhouse", true),
    event("Lava Cake Cleared", "The Lava Cake", true),
    event("Windmill Cleared", "The Windmill", true),
    event("Twilight Bell Cleared", "The Twilight Bell", true),
    event(TIME_PIECE_CLUSTER, "The Finale", true),
];

pub fn act_completion(region: &str) -> String {
    format!("Act Completion ({region})")
}

/// Every real location the game can have, with names and codes checked for uniqueness.
pub fn location_catalog() -> Result<LocationCatalog> {
    let mut locations: Vec<LocationData> = LOCATIONS
        .iter()
        .map(|entry| LocationData {
            name: entry.name.to_string(),
            code: entry.code,
            region: entry.region.to_string(),
            dlc: entry.dlc,
        })
        .collect();
    for i in 0..BADGE_SELLER_MAX_ITEMS {
        let (name, code) = badge_seller_location(i);
        locations.push(LocationData {
            name,
            code,
            region: BADGE_SELLER_REGION.to_string(),
            dlc: DlcFlags::empty(),
        });
    }
    LocationCatalog::new(locations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_and_codes_unique() -> Result<()> {
        let catalog = location_catalog()?;
        assert_eq!(catalog.locations.len(), LOCATIONS.len() + BADGE_SELLER_MAX_ITEMS);
        assert_eq!(catalog.get("Badge Seller - Item 1")?.region, BADGE_SELLER_REGION);
        Ok(())
    }

    #[test]
    fn test_every_act_event_has_a_completion() {
        for event in EVENTS.iter().filter(|e| e.act_event) {
            let completion = act_completion(event.region);
            assert!(
                LOCATIONS
                    .iter()
                    .any(|l| l.name == completion && l.region == event.region),
                "{completion}"
            );
        }
    }
}
