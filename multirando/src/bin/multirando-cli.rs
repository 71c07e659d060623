use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use multirando::difficulty::Difficulty;
use multirando::randomize::{randomize, seeded_rng, Randomization};
use multirando::settings::{parse_generation_settings, GenerationSettings};
use multirando::world::GameKind;
use rand::{RngCore, SeedableRng};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
struct Args {
    #[arg(long)]
    settings: Option<PathBuf>,

    #[arg(long)]
    game: Option<String>,

    #[arg(long)]
    difficulty: Option<String>,

    #[arg(long)]
    random_seed: Option<usize>,

    #[arg(long)]
    max_attempts: Option<usize>,

    #[arg(long)]
    output_spoiler_log: Option<PathBuf>,

    #[arg(long)]
    output_slot_data: Option<PathBuf>,
}

fn load_settings(args: &Args) -> Result<GenerationSettings> {
    let mut settings = match &args.settings {
        Some(path) => {
            let settings_str = std::fs::read_to_string(path)
                .with_context(|| format!("Unable to read settings file at {}", path.display()))?;
            parse_generation_settings(&settings_str)
                .with_context(|| format!("Unable to parse settings file at {}", path.display()))?
        }
        None => GenerationSettings::default(),
    };
    if let Some(game) = &args.game {
        settings.game = GameKind::from_str(game).with_context(|| format!("Unknown game {game}"))?;
    }
    if let Some(difficulty) = &args.difficulty {
        settings.difficulty = Difficulty::from_str(difficulty)
            .with_context(|| format!("Unknown difficulty {difficulty}"))?;
    }
    settings.validate()?;
    Ok(settings)
}

fn get_randomization(args: &Args, settings: &GenerationSettings) -> Result<Randomization> {
    let root_seed = match args.random_seed {
        Some(s) => s,
        None => (rand::rngs::StdRng::from_entropy().next_u64() & 0xFFFFFFFF) as usize,
    };
    let mut rng = seeded_rng(root_seed);
    let max_attempts = args.max_attempts.unwrap_or(100);
    for attempt_num in 1..=max_attempts {
        let seed = (rng.next_u64() & 0xFFFFFFFF) as usize;
        info!("Attempt {attempt_num}/{max_attempts}: Root seed={root_seed}, generation seed={seed}");
        match randomize(settings, seed) {
            Ok(randomization) => {
                return Ok(randomization);
            }
            Err(e) => {
                info!(
                    "Attempt {attempt_num}/{max_attempts}: Randomization failed: {:#}",
                    e
                );
            }
        }
    }
    bail!("Exhausted randomization attempts");
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let settings = load_settings(&args)?;
    let randomization = get_randomization(&args, &settings)?;

    if let Some(output_spoiler_log_path) = &args.output_spoiler_log {
        println!(
            "Writing spoiler log to {}",
            output_spoiler_log_path.display()
        );
        let spoiler_str = serde_json::to_string_pretty(&randomization.spoiler_log)?;
        std::fs::write(output_spoiler_log_path, spoiler_str)?;
    }

    if let Some(output_slot_data_path) = &args.output_slot_data {
        println!("Writing slot data to {}", output_slot_data_path.display());
        let slot_data_str = serde_json::to_string_pretty(&randomization.slot_data)?;
        std::fs::write(output_slot_data_path, slot_data_str)?;
    }

    Ok(())
}
