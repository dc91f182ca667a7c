//! Dice: a fair d20 roll, and a "no repeats" roll of several dice layered on
//! top of `select` with a retry loop.

use std::collections::HashSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use weighted_option::{Selector, WeightedOption};

fn die(sides: u8) -> weighted_option::Result<Selector<u8>> {
    Selector::new((1..=sides).map(|face| WeightedOption::new(face, 1u8)))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let d20 = die(20)?;
    println!("d20: {}", d20.select());

    // Distinct faces for each of five rolls; redraw on repeats.
    let d6 = die(6)?;
    let mut rng = ChaCha8Rng::seed_from_u64(20);
    let mut seen = HashSet::new();
    let mut rolls = Vec::new();
    while rolls.len() < 5 {
        let face = *d6.select_with_rng(&mut rng);
        if seen.insert(face) {
            rolls.push(face);
        }
    }
    println!("5 distinct d6 faces: {rolls:?}");

    // A loaded die: six comes up half the time.
    let loaded = Selector::from_pairs([(1u8, 1u32), (2, 1), (3, 1), (4, 1), (5, 1), (6, 5)])?;
    let mut counts = [0u32; 7];
    for _ in 0..10_000 {
        counts[usize::from(*loaded.select_with_rng(&mut rng))] += 1;
    }
    println!("loaded d6 over 10k rolls: {:?}", &counts[1..]);

    Ok(())
}
