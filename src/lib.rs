//! `weighted_option`: weighted random selection.
//!
//! Build a [`Selector`] once from `(item, weight)` options, then sample from
//! it as often as needed. Each item is returned with probability
//! `weight / total_weight`.
//!
//! Exposed modules:
//! - `normalize`: filtering, sorting and exact decimal scaling of raw weights.
//! - `selector`: the cumulative-weight index, overflow checks and sampling.
//! - `search`: lower-bound search strategies pluggable into a selector.
//! - `weight`: the [`Weight`] trait over primitive integers and floats.
//!
//! ```
//! use weighted_option::Selector;
//!
//! let loot = Selector::from_pairs([("sword", 1), ("shield", 2), ("potion", 7)])?;
//! let drop = loot.select();
//! assert!(["sword", "shield", "potion"].contains(drop));
//! # Ok::<(), weighted_option::Error>(())
//! ```
//!
//! Float weights are scaled by one shared power of ten, so `0.6` and `1.77`
//! become `60` and `177`:
//!
//! ```
//! use weighted_option::Selector;
//!
//! let s = Selector::from_pairs([('a', 0.6), ('b', 1.77)])?;
//! assert_eq!(s.cumulative_weights(), &[60, 237]);
//! # Ok::<(), weighted_option::Error>(())
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod normalize;
pub mod search;
pub mod selector;
pub mod weight;

pub use error::{Error, OverflowKind, Result};
pub use normalize::{
    normalize, NormalizedOption, WeightedOption, DEFAULT_MAX_FRACTIONAL_DIGITS,
    MAX_FRACTIONAL_DIGITS,
};
pub use search::{branchless_lower_bound, lower_bound, SearchFn};
pub use selector::{Selector, SelectorBuilder, MAX_WEIGHT};
pub use weight::Weight;
