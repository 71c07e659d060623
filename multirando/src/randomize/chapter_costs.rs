use anyhow::{bail, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CostLadderSettings {
    pub lowest: usize,
    pub highest: usize,
    pub increment: usize,
    pub min_difference: usize,
}

impl CostLadderSettings {
    pub fn validate(&self) -> Result<()> {
        if self.lowest > self.highest {
            bail!(
                "Lowest chapter cost ({}) exceeds highest chapter cost ({})",
                self.lowest,
                self.highest
            );
        }
        Ok(())
    }
}

/// Generates the costs of a starting region followed by `num_gated` regions, in the
/// order they are meant to be unlocked. The starting region always costs 0.
///
/// Each cost is drawn from a window that starts at `lowest + increment * k` and ends
/// one increment past the previous cost, then pushed up to keep `min_difference`
/// from the previous gated cost. Everything is clamped to `highest`, so a tight
/// ceiling can squeeze the gap between the last few costs.
pub fn generate_cost_ladder<R: Rng>(
    num_gated: usize,
    settings: &CostLadderSettings,
    rng: &mut R,
) -> Result<Vec<usize>> {
    settings.validate()?;
    let CostLadderSettings {
        lowest,
        highest,
        increment,
        min_difference,
    } = *settings;

    let mut costs = vec![0];
    let mut last_cost: usize = 0;
    for k in 0..num_gated {
        let mut min_range = lowest.saturating_add(increment.saturating_mul(k));
        if min_range >= highest {
            // Leave room for one step below the ceiling, but never go under the floor.
            min_range = highest.saturating_sub(1).max(lowest);
        }
        let upper = highest
            .min(lowest.max(last_cost.saturating_add(increment)))
            .max(min_range);
        let value = rng.gen_range(min_range..=upper);
        let mut cost = rng.gen_range(value..=highest.min(value.saturating_add(increment)));
        if k >= 1 && last_cost.saturating_add(min_difference) > cost {
            cost = last_cost.saturating_add(min_difference);
        }
        cost = cost.min(highest);
        costs.push(cost);
        last_cost = cost;
    }
    Ok(costs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn rng(seed: u64) -> rand::rngs::StdRng {
        let mut rng_seed = [0u8; 32];
        rng_seed[..8].copy_from_slice(&seed.to_le_bytes());
        rand::rngs::StdRng::from_seed(rng_seed)
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let settings = CostLadderSettings {
            lowest: 10,
            highest: 5,
            increment: 1,
            min_difference: 1,
        };
        assert!(generate_cost_ladder(3, &settings, &mut rng(0)).is_err());
    }

    #[test]
    fn test_flat_ladder_stays_at_floor() -> Result<()> {
        let settings = CostLadderSettings {
            lowest: 7,
            highest: 7,
            increment: 3,
            min_difference: 2,
        };
        let costs = generate_cost_ladder(4, &settings, &mut rng(1))?;
        assert_eq!(costs, vec![0, 7, 7, 7, 7]);
        Ok(())
    }

    #[test]
    fn test_huge_steps_clamp_to_ceiling() -> Result<()> {
        let settings = CostLadderSettings {
            lowest: 4,
            highest: 16,
            increment: usize::MAX,
            min_difference: usize::MAX,
        };
        let costs = generate_cost_ladder(5, &settings, &mut rng(2))?;
        assert_eq!(costs.len(), 6);
        assert!(costs[1..].iter().all(|&c| (4..=16).contains(&c)));
        assert_eq!(costs[5], 16);
        Ok(())
    }

    proptest! {
        #[test]
        fn prop_cost_ladder_invariants(
            seed in any::<u64>(),
            num_gated in 1..8usize,
            lowest in 0..20usize,
            increment in 0..8usize,
            min_difference in 0..8usize,
            slack in 0..30usize,
        ) {
            // A ceiling this high is never reached, so the gap is never squeezed.
            let highest = lowest + (num_gated + 1) * (2 * increment + min_difference) + slack + 1;
            let settings = CostLadderSettings { lowest, highest, increment, min_difference };
            let costs = generate_cost_ladder(num_gated, &settings, &mut rng(seed)).unwrap();
            prop_assert_eq!(costs.len(), num_gated + 1);
            prop_assert_eq!(costs[0], 0);
            for i in 1..costs.len() {
                prop_assert!(costs[i] >= lowest && costs[i] <= highest);
                prop_assert!(costs[i] >= costs[i - 1]);
                if i >= 2 {
                    prop_assert!(costs[i] - costs[i - 1] >= min_difference);
                }
            }
        }

        #[test]
        fn prop_cost_ladder_bounded_with_tight_ceiling(
            seed in any::<u64>(),
            num_gated in 1..8usize,
            lowest in 0..20usize,
            spread in 0..10usize,
            increment in 0..8usize,
            min_difference in 0..8usize,
        ) {
            let highest = lowest + spread;
            let settings = CostLadderSettings { lowest, highest, increment, min_difference };
            let costs = generate_cost_ladder(num_gated, &settings, &mut rng(seed)).unwrap();
            for i in 1..costs.len() {
                prop_assert!(costs[i] >= lowest && costs[i] <= highest);
                prop_assert!(costs[i] >= costs[i - 1]);
            }
        }
    }
}
