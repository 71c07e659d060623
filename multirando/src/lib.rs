// The changes suggested by this lint usually make the code more cluttered and less clear:
#![allow(clippy::needless_range_loop)]

pub mod difficulty;
pub mod graph;
pub mod item_placement;
pub mod randomize;
pub mod rules;
pub mod settings;
pub mod spoiler_log;
pub mod traverse;
pub mod world;
pub mod worlds;
