use anyhow::{Context, Result};
use log::info;
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumString, VariantNames};

/// Logic difficulty, ordered from strictest to most lenient.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumString,
    VariantNames,
    TryFromPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(i8)]
pub enum Difficulty {
    #[default]
    Normal = -1,
    Moderate = 0,
    Hard = 1,
    Expert = 2,
}

/// A rule pass that runs when the configured difficulty is at least `tier`.
///
/// Passes for higher tiers may only relax the rules left by lower tiers. Nothing
/// checks this; keep it in mind when writing a pass.
pub struct TierPass<W> {
    pub tier: Difficulty,
    pub name: &'static str,
    pub apply: fn(&mut W) -> Result<()>,
}

/// Runs every pass with `tier <= difficulty`, in increasing tier order. Passes of the
/// same tier keep their relative order. Returns the number of passes applied.
pub fn apply_difficulty_tiers<W>(
    target: &mut W,
    difficulty: Difficulty,
    passes: &[TierPass<W>],
) -> Result<usize> {
    let mut order: Vec<usize> = (0..passes.len()).collect();
    order.sort_by_key(|&i| passes[i].tier);
    let mut applied = 0;
    for i in order {
        let pass = &passes[i];
        if pass.tier > difficulty {
            continue;
        }
        info!("Applying {:?} rule pass: {}", pass.tier, pass.name);
        (pass.apply)(target).with_context(|| format!("in rule pass {}", pass.name))?;
        applied += 1;
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn push_moderate(log: &mut Vec<Difficulty>) -> Result<()> {
        log.push(Difficulty::Moderate);
        Ok(())
    }

    fn push_hard(log: &mut Vec<Difficulty>) -> Result<()> {
        log.push(Difficulty::Hard);
        Ok(())
    }

    fn push_expert(log: &mut Vec<Difficulty>) -> Result<()> {
        log.push(Difficulty::Expert);
        Ok(())
    }

    fn passes() -> Vec<TierPass<Vec<Difficulty>>> {
        // Deliberately registered out of order.
        vec![
            TierPass {
                tier: Difficulty::Expert,
                name: "expert",
                apply: push_expert,
            },
            TierPass {
                tier: Difficulty::Moderate,
                name: "moderate",
                apply: push_moderate,
            },
            TierPass {
                tier: Difficulty::Hard,
                name: "hard",
                apply: push_hard,
            },
        ]
    }

    #[test]
    fn test_passes_are_cumulative_and_ordered() -> Result<()> {
        let mut log = vec![];
        assert_eq!(apply_difficulty_tiers(&mut log, Difficulty::Hard, &passes())?, 2);
        assert_eq!(log, vec![Difficulty::Moderate, Difficulty::Hard]);

        let mut log = vec![];
        apply_difficulty_tiers(&mut log, Difficulty::Normal, &passes())?;
        assert!(log.is_empty());

        let mut log = vec![];
        apply_difficulty_tiers(&mut log, Difficulty::Expert, &passes())?;
        assert_eq!(
            log,
            vec![Difficulty::Moderate, Difficulty::Hard, Difficulty::Expert]
        );
        Ok(())
    }

    #[test]
    fn test_difficulty_conversions() {
        assert!(Difficulty::Normal < Difficulty::Moderate);
        assert!(Difficulty::Hard < Difficulty::Expert);
        assert_eq!(Difficulty::try_from(1i8).ok(), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("Expert").ok(), Some(Difficulty::Expert));
        assert!(Difficulty::try_from(5i8).is_err());
    }
}
