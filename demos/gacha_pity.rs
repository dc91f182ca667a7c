//! Gacha banner with float drop rates and a pity counter.
//!
//! Rates are percentages with up to two decimals; the selector scales them by
//! 100 internally. Every 90th pull without the featured drop is forced to it.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use weighted_option::{Selector, WeightedOption};

const PITY_THRESHOLD: u32 = 90;
const PITY_DROP: &str = "5★ Character";

struct Banner {
    selector: Selector<&'static str>,
    pity: u32,
}

impl Banner {
    fn new(pool: Vec<WeightedOption<&'static str, f64>>) -> weighted_option::Result<Self> {
        Ok(Self {
            selector: Selector::new(pool)?,
            pity: 0,
        })
    }

    fn pull<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &'static str {
        self.pity += 1;
        let drop = if self.pity >= PITY_THRESHOLD {
            PITY_DROP
        } else {
            *self.selector.select_with_rng(rng)
        };
        if drop == PITY_DROP {
            self.pity = 0;
        }
        drop
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let pool = vec![
        WeightedOption::new(PITY_DROP, 0.6),
        WeightedOption::new("4★ Character", 3.3),
        WeightedOption::new("4★ Weapon (Sword)", 1.77),
        WeightedOption::new("3★ Weapon (Sword)", 18.86),
        WeightedOption::new("3★ Weapon (Polearm)", 18.86),
        WeightedOption::new("3★ Weapon (Bow)", 18.86),
        WeightedOption::new("3★ Weapon (Claymore)", 18.86),
        WeightedOption::new("3★ Weapon (Staff)", 18.86),
    ];
    let mut banner = Banner::new(pool)?;

    println!("normalized pool (total {}):", banner.selector.total_weight());
    for (i, (item, weight)) in banner.selector.iter().enumerate() {
        let p = banner.selector.probability_at(i).unwrap_or(0.0);
        println!("  {item:<22} w={weight:<5} p={:.4}", p);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(123);
    let mut tally: BTreeMap<&str, u32> = BTreeMap::new();
    let mut pulls = 0u32;
    // Single or ten-pulls until the featured drop appears.
    'banner: loop {
        let batch = if rng.random_bool(0.5) { 1 } else { 10 };
        for _ in 0..batch {
            let drop = banner.pull(&mut rng);
            pulls += 1;
            *tally.entry(drop).or_default() += 1;
            if drop == PITY_DROP {
                break 'banner;
            }
        }
    }

    println!("\n{PITY_DROP} after {pulls} pulls. Tally:");
    for (item, count) in tally {
        println!("  {item}: {count}");
    }

    Ok(())
}
