//! Raid drops: a flat 5% exotic drop, then a drop chance that grows with
//! every completion until the exotic finally drops.
//!
//! The second loop rebuilds a selector per completion, which is cheap for two
//! options and keeps each selector immutable.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use weighted_option::Selector;

const BASE_CHANCE: u32 = 5;
const MAX_CHANCE: u32 = 100;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let flat = Selector::from_pairs([('🔫', 5u32), ('❌', 95)])?;
    let chances: String = (0..100).map(|_| *flat.select_with_rng(&mut rng)).collect();
    println!("{chances}");

    let mut tally: HashMap<char, u32> = HashMap::new();
    for c in chances.chars() {
        *tally.entry(c).or_default() += 1;
    }
    println!(
        "\n🔫: {}\t❌: {}\n",
        tally.get(&'🔫').copied().unwrap_or(0),
        tally.get(&'❌').copied().unwrap_or(0)
    );

    let mut completions = 0u32;
    let mut achievements = 0u32;
    loop {
        completions += 1;
        if rng.random_bool(0.5) {
            achievements += 1;
        }

        let chance = (BASE_CHANCE + completions + achievements).min(MAX_CHANCE);
        // A zero no-drop weight is filtered out, guaranteeing the drop.
        let odds = Selector::from_pairs([(true, chance), (false, MAX_CHANCE - chance)])?;
        if *odds.select_with_rng(&mut rng) {
            break;
        }
    }
    println!("exotic dropped after {completions} completions and {achievements} achievements");

    Ok(())
}
