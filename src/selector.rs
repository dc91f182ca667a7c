//! The weighted selector.
//!
//! A [`Selector`] stores its items sorted by weight next to a table of
//! cumulative weights. Item `i` owns the draws in
//! `(cumulative[i - 1], cumulative[i]]`, a bucket exactly as wide as its
//! weight. Sampling draws uniformly from `1..=total` and finds the bucket with
//! a lower-bound search, so each call costs one RNG draw plus `O(log n)`.
//!
//! All weights are bounded by [`MAX_WEIGHT`] (`i64::MAX`) on every target,
//! both individually and in total.

use rand::distr::Distribution;
use rand::Rng;

use crate::error::{Error, OverflowKind, Result};
use crate::normalize::{normalize, NormalizedOption, WeightedOption, DEFAULT_MAX_FRACTIONAL_DIGITS};
use crate::search::{lower_bound, SearchFn};
use crate::weight::Weight;

/// Largest accepted weight, and largest accepted sum of weights.
pub const MAX_WEIGHT: u64 = i64::MAX as u64;

/// Immutable weighted random selector.
///
/// `Selector<T>` is `Send + Sync` whenever `T` is, so a single instance can be
/// shared by reference between threads; each sampling call supplies (or
/// creates) its own RNG.
#[derive(Clone)]
pub struct Selector<T> {
    items: Vec<T>,
    cumulative_weights: Vec<u64>,
    total_weight: u64,
    search: SearchFn,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Selector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selector")
            .field("items", &self.items)
            .field("cumulative_weights", &self.cumulative_weights)
            .field("total_weight", &self.total_weight)
            .finish_non_exhaustive()
    }
}

/// Configuration for building a [`Selector`].
#[derive(Debug, Clone, Copy)]
pub struct SelectorBuilder {
    search: SearchFn,
    max_fractional_digits: u32,
}

impl Default for SelectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorBuilder {
    /// Default configuration: [`lower_bound`] search and
    /// [`DEFAULT_MAX_FRACTIONAL_DIGITS`].
    pub fn new() -> Self {
        Self {
            search: lower_bound,
            max_fractional_digits: DEFAULT_MAX_FRACTIONAL_DIGITS,
        }
    }

    /// Use a different lower-bound search strategy.
    ///
    /// # Panics
    ///
    /// `search` must return the leftmost index `i` with
    /// `cumulative[i] >= target` for every target in `1..=total_weight`.
    /// Sampling panics if it returns an index past the end of the table.
    pub fn search(mut self, search: SearchFn) -> Self {
        self.search = search;
        self
    }

    /// Cap the decimal precision applied to float weights.
    ///
    /// Clamped to [`MAX_FRACTIONAL_DIGITS`](crate::MAX_FRACTIONAL_DIGITS).
    pub fn max_fractional_digits(mut self, digits: u32) -> Self {
        self.max_fractional_digits = digits;
        self
    }

    /// Normalize `options` and build a selector.
    pub fn build<T, W, I>(self, options: I) -> Result<Selector<T>>
    where
        W: Weight,
        I: IntoIterator<Item = WeightedOption<T, W>>,
    {
        let normalized = normalize(options, self.max_fractional_digits)?;
        Selector::assemble(normalized, self.search)
    }
}

impl<T> Selector<T> {
    /// Build a selector with the default configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::NoValidOptions`] if no weight is positive.
    /// - [`Error::InvalidWeight`] for NaN or `+inf` float weights.
    /// - [`Error::WeightOverflow`] if a weight or the total exceeds [`MAX_WEIGHT`].
    pub fn new<W, I>(options: I) -> Result<Self>
    where
        W: Weight,
        I: IntoIterator<Item = WeightedOption<T, W>>,
    {
        SelectorBuilder::new().build(options)
    }

    /// Build from plain `(item, weight)` tuples.
    pub fn from_pairs<W, I>(pairs: I) -> Result<Self>
    where
        W: Weight,
        I: IntoIterator<Item = (T, W)>,
    {
        Self::new(pairs.into_iter().map(WeightedOption::from))
    }

    /// Build with a custom lower-bound search strategy.
    ///
    /// # Panics
    ///
    /// Sampling panics if `search` returns an index `>= len()`; see
    /// [`SelectorBuilder::search`] for the contract.
    pub fn with_search<W, I>(options: I, search: SearchFn) -> Result<Self>
    where
        W: Weight,
        I: IntoIterator<Item = WeightedOption<T, W>>,
    {
        SelectorBuilder::new().search(search).build(options)
    }

    /// Build directly from the output of [`normalize`].
    pub fn from_normalized(normalized: Vec<NormalizedOption<T>>) -> Result<Self> {
        Self::assemble(normalized, lower_bound)
    }

    fn assemble(normalized: Vec<NormalizedOption<T>>, search: SearchFn) -> Result<Self> {
        let mut items = Vec::with_capacity(normalized.len());
        let mut cumulative_weights = Vec::with_capacity(normalized.len());
        let mut total: u64 = 0;

        for option in normalized {
            let (item, weight) = option.into_parts();
            let weight_u64 = u64::try_from(weight)
                .ok()
                .filter(|&w| w <= MAX_WEIGHT)
                .ok_or(Error::WeightOverflow {
                    kind: OverflowKind::SingleWeight,
                    weight,
                    total,
                })?;
            if weight_u64 > MAX_WEIGHT - total {
                return Err(Error::WeightOverflow {
                    kind: OverflowKind::TotalWeight,
                    weight,
                    total,
                });
            }
            total += weight_u64;
            cumulative_weights.push(total);
            items.push(item);
        }

        if total == 0 {
            return Err(Error::NoValidOptions);
        }

        tracing::debug!(
            options = items.len(),
            total_weight = total,
            "built weighted selector"
        );

        Ok(Self {
            items,
            cumulative_weights,
            total_weight: total,
            search,
        })
    }

    /// Select an item using the thread-local RNG.
    pub fn select(&self) -> &T {
        let mut rng = rand::rng();
        self.select_with_rng(&mut rng)
    }

    /// Select an item using a caller-supplied RNG.
    #[inline]
    pub fn select_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        &self.items[self.select_index_with_rng(rng)]
    }

    /// Select an index into [`Selector::items`] using a caller-supplied RNG.
    #[inline]
    pub fn select_index_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let draw = rng.random_range(0..self.total_weight);
        self.index_for_target(draw + 1)
    }

    /// Map a raw uniform draw in `0..total_weight` to its item.
    ///
    /// Sampling is `select_with_draw(uniform(0..total_weight))`. Returns
    /// `None` if `draw >= total_weight`.
    pub fn select_with_draw(&self, draw: u64) -> Option<&T> {
        (draw < self.total_weight).then(|| &self.items[self.index_for_target(draw + 1)])
    }

    #[inline]
    fn index_for_target(&self, target: u64) -> usize {
        let i = (self.search)(&self.cumulative_weights, target);
        debug_assert!(i < self.items.len(), "search strategy returned {i} for target {target}");
        i
    }

    /// Number of selectable items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false` for a built selector; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all normalized weights.
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Items in ascending weight order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Running totals, co-indexed with [`Selector::items`].
    pub fn cumulative_weights(&self) -> &[u64] {
        &self.cumulative_weights
    }

    /// Normalized weight of the item at `index`.
    pub fn weight_at(&self, index: usize) -> Option<u64> {
        let upper = *self.cumulative_weights.get(index)?;
        let lower = match index {
            0 => 0,
            i => self.cumulative_weights[i - 1],
        };
        Some(upper - lower)
    }

    /// Exact selection probability of the item at `index`.
    pub fn probability_at(&self, index: usize) -> Option<f64> {
        self.weight_at(index)
            .map(|w| w as f64 / self.total_weight as f64)
    }

    /// Iterate `(item, normalized weight)` in ascending weight order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, u64)> + '_ {
        let lowers = std::iter::once(0).chain(self.cumulative_weights.iter().copied());
        self.items
            .iter()
            .zip(self.cumulative_weights.iter().zip(lowers))
            .map(|(item, (&upper, lower))| (item, upper - lower))
    }
}

/// Samples an owned copy of the selected item; `&Selector<T>` gets the same
/// impl through rand's blanket impl for references.
impl<T: Clone> Distribution<T> for Selector<T> {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.select_with_rng(rng).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::branchless_lower_bound;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn opts<T, W>(pairs: Vec<(T, W)>) -> Vec<WeightedOption<T, W>> {
        pairs.into_iter().map(WeightedOption::from).collect()
    }

    #[test]
    fn rejects_inputs_without_positive_weights() {
        let empty: Vec<WeightedOption<char, i32>> = Vec::new();
        assert_eq!(Selector::new(empty).err(), Some(Error::NoValidOptions));
        assert_eq!(
            Selector::from_pairs(vec![('a', 0), ('b', 0)]).err(),
            Some(Error::NoValidOptions)
        );
        assert_eq!(
            Selector::from_pairs(vec![('a', -1.5), ('b', 0.0)]).err(),
            Some(Error::NoValidOptions)
        );
    }

    #[test]
    fn builds_from_normalized_options() {
        let normalized = normalize(opts(vec![('b', 2.5), ('a', 0.5)]), 9).expect("valid");
        let s = Selector::from_normalized(normalized).expect("valid");
        assert_eq!(s.items(), &['a', 'b']);
        assert_eq!(s.cumulative_weights(), &[5, 30]);
    }

    #[test]
    fn single_positive_option() {
        let s = Selector::from_pairs(vec![('a', 1)]).expect("valid");
        assert_eq!(s.len(), 1);
        assert_eq!(s.total_weight(), 1);
        assert_eq!(*s.select(), 'a');
    }

    #[test]
    fn negative_weights_are_ignored() {
        let s = Selector::from_pairs(vec![('a', 3), ('b', -2)]).expect("valid");
        assert_eq!(s.items(), &['a']);
        assert_eq!(s.cumulative_weights(), &[3]);
    }

    #[test]
    fn forced_draws_map_to_buckets() {
        let s = Selector::from_pairs(vec![('a', 1), ('b', 2)]).expect("valid");
        assert_eq!(s.cumulative_weights(), &[1, 3]);
        assert_eq!(s.total_weight(), 3);
        assert_eq!(s.select_with_draw(0), Some(&'a'));
        assert_eq!(s.select_with_draw(1), Some(&'b'));
        assert_eq!(s.select_with_draw(2), Some(&'b'));
        assert_eq!(s.select_with_draw(3), None);
    }

    #[test]
    fn bucket_widths_equal_weights() {
        let s = Selector::from_pairs(vec![("x", 4u8), ("y", 1), ("z", 2)]).expect("valid");
        let mut hits = std::collections::HashMap::new();
        for draw in 0..s.total_weight() {
            *hits.entry(*s.select_with_draw(draw).expect("in range")).or_insert(0u64) += 1;
        }
        for (item, weight) in s.iter() {
            assert_eq!(hits[item], weight);
        }
        assert_eq!(s.weight_at(0), Some(1));
        assert_eq!(s.weight_at(2), Some(4));
        assert_eq!(s.weight_at(3), None);
        assert_eq!(s.probability_at(2), Some(4.0 / 7.0));
    }

    #[test]
    fn float_weights_are_scaled_before_summing() {
        let s = Selector::from_pairs(vec![
            ('a', 0.6),
            ('b', 3.3),
            ('c', 1.77),
            ('d', 18.86),
            ('e', 18.86),
        ])
        .expect("valid");
        let weights: Vec<u64> = s.iter().map(|(_, w)| w).collect();
        assert_eq!(weights, vec![60, 177, 330, 1886, 1886]);
        assert_eq!(s.total_weight(), 60 + 330 + 177 + 1886 + 1886);
    }

    #[test]
    fn single_weight_bound_is_inclusive() {
        let s = Selector::from_pairs(vec![('a', MAX_WEIGHT)]).expect("max accepted");
        assert_eq!(s.total_weight(), MAX_WEIGHT);

        let err = Selector::from_pairs(vec![('a', MAX_WEIGHT + 1)]).expect_err("over max");
        assert_eq!(err.overflow_kind(), Some(OverflowKind::SingleWeight));

        let err = Selector::from_pairs(vec![('a', u128::MAX)]).expect_err("wide");
        assert_eq!(err.overflow_kind(), Some(OverflowKind::SingleWeight));
    }

    #[test]
    fn total_weight_bound_is_inclusive() {
        let half = MAX_WEIGHT / 2;
        let err = Selector::from_pairs(vec![('a', half + 1), ('b', half + 1)]).expect_err("sum over max");
        assert_eq!(
            err,
            Error::WeightOverflow {
                kind: OverflowKind::TotalWeight,
                weight: u128::from(half + 1),
                total: half + 1,
            }
        );

        let s = Selector::from_pairs(vec![('a', half), ('b', half)]).expect("sum under max");
        assert_eq!(s.total_weight(), MAX_WEIGHT - 1);

        let third = MAX_WEIGHT / 3;
        let s = Selector::from_pairs(vec![('a', third), ('b', third), ('c', third + 1)])
            .expect("sum exactly max");
        assert_eq!(s.total_weight(), MAX_WEIGHT);
        let err = Selector::from_pairs(vec![('a', third + 1), ('b', third + 1), ('c', third + 1)])
            .expect_err("sum over max");
        assert_eq!(err.overflow_kind(), Some(OverflowKind::TotalWeight));
    }

    #[test]
    fn signed_weights_at_the_bound() {
        let s = Selector::from_pairs(vec![('a', i64::MAX)]).expect("max accepted");
        assert_eq!(s.total_weight(), MAX_WEIGHT);
        let err = Selector::from_pairs(vec![('a', i128::from(i64::MAX) + 1)]).expect_err("over max");
        assert_eq!(err.overflow_kind(), Some(OverflowKind::SingleWeight));
    }

    #[test]
    fn huge_float_weights_overflow() {
        let err = Selector::from_pairs(vec![('a', 1e300)]).expect_err("huge");
        assert_eq!(err.overflow_kind(), Some(OverflowKind::SingleWeight));
    }

    #[test]
    fn builder_configures_search_and_precision() {
        let s = SelectorBuilder::new()
            .search(branchless_lower_bound)
            .max_fractional_digits(1)
            .build(opts(vec![('a', 0.25), ('b', 0.75)]))
            .expect("valid");
        // 0.25 -> 3, 0.75 -> 8 at one digit.
        assert_eq!(s.cumulative_weights(), &[3, 11]);
        assert_eq!(s.select_with_draw(2), Some(&'a'));
        assert_eq!(s.select_with_draw(3), Some(&'b'));
    }

    #[test]
    fn search_strategies_sample_identically() {
        let pool: Vec<(u32, u32)> = (1..=50).map(|i| (i, i * 7 % 13 + 1)).collect();
        let a = Selector::from_pairs(pool.clone()).expect("valid");
        let b = Selector::with_search(opts(pool), branchless_lower_bound).expect("valid");
        let mut rng_a = ChaCha8Rng::seed_from_u64(11);
        let mut rng_b = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..10_000 {
            assert_eq!(a.select_with_rng(&mut rng_a), b.select_with_rng(&mut rng_b));
        }
    }

    #[test]
    fn sampling_is_a_pure_function_of_the_draws() {
        let s = Selector::from_pairs(vec![("common", 70), ("rare", 25), ("epic", 5)]).expect("valid");
        let first: Vec<&str> = {
            let mut rng = ChaCha8Rng::seed_from_u64(3);
            (0..1_000).map(|_| *s.select_with_rng(&mut rng)).collect()
        };
        let second: Vec<&str> = {
            let mut rng = ChaCha8Rng::seed_from_u64(3);
            (0..1_000).map(|_| *s.select_with_rng(&mut rng)).collect()
        };
        assert_eq!(first, second);
    }

    #[test]
    fn distribution_impl_samples_owned_items() {
        let s = Selector::from_pairs(vec![("a".to_string(), 1), ("b".to_string(), 3)]).expect("valid");
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let picks: Vec<String> = (&s).sample_iter(&mut rng).take(100).collect();
        assert_eq!(picks.len(), 100);
        assert!(picks.iter().all(|p| p == "a" || p == "b"));
        let one: String = rng.sample(&s);
        assert!(one == "a" || one == "b");

        // Same draws as `select_with_rng` for the same seed.
        let mut a = ChaCha8Rng::seed_from_u64(9);
        let mut b = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..100 {
            let owned: String = s.sample(&mut a);
            assert_eq!(&owned, s.select_with_rng(&mut b));
        }
    }

    #[test]
    fn negative_infinity_weights_are_excluded() {
        let s = Selector::from_pairs([('a', 1.0f64), ('b', f64::NEG_INFINITY)]).expect("valid");
        assert_eq!(s.items(), &['a']);
        assert_eq!(s.total_weight(), 1);
    }

    #[test]
    fn tiny_float_weights_are_kept() {
        let s = Selector::from_pairs([('a', 1.0), ('b', 1e-10)]).expect("valid");
        assert_eq!(s.items(), &['b', 'a']);
        assert_eq!(s.cumulative_weights(), &[1, 10_000_000_001]);
        assert_eq!(s.select_with_draw(0), Some(&'b'));
        assert_eq!(s.select_with_draw(1), Some(&'a'));

        let s = Selector::from_pairs([('a', 1e-10)]).expect("valid");
        assert_eq!(s.total_weight(), 1);
    }

    #[test]
    fn selector_is_shareable_across_threads() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<Selector<String>>();

        let s = Selector::from_pairs(vec![(1u8, 1u32), (2, 3)]).expect("valid");
        std::thread::scope(|scope| {
            for seed in 0..4u64 {
                let s = &s;
                scope.spawn(move || {
                    let mut rng = ChaCha8Rng::seed_from_u64(seed);
                    for _ in 0..1_000 {
                        assert!(matches!(*s.select_with_rng(&mut rng), 1 | 2));
                    }
                });
            }
        });
    }

    #[test]
    fn frequencies_follow_weight_order() {
        let s = Selector::from_pairs((1..=10).map(|i| (i, i))).expect("valid");
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut counts = [0u64; 11];
        for _ in 0..1_000_000 {
            counts[*s.select_with_rng(&mut rng)] += 1;
        }
        for i in 1..10 {
            assert!(
                counts[i] <= counts[i + 1],
                "weight {i} drawn {} times, weight {} drawn {} times",
                counts[i],
                i + 1,
                counts[i + 1]
            );
        }
    }

    #[test]
    fn chi_squared_goodness_of_fit() {
        // Conservative cutoff: catches off-by-one bucket boundaries without
        // being flaky.
        let weights = [1u64, 2, 3, 5, 8, 13, 21, 34];
        let s = Selector::from_pairs(weights.iter().enumerate().map(|(i, &w)| (i, w))).expect("valid");
        let trials = 200_000u64;
        let mut counts = vec![0u64; weights.len()];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..trials {
            counts[*s.select_with_rng(&mut rng)] += 1;
        }

        let total: u64 = weights.iter().sum();
        let chi2: f64 = weights
            .iter()
            .zip(&counts)
            .map(|(&w, &c)| {
                let expected = trials as f64 * w as f64 / total as f64;
                let diff = c as f64 - expected;
                diff * diff / expected
            })
            .sum();
        // df = 7; the 0.999 quantile is about 24.3.
        assert!(chi2 < 30.0, "chi2 too large (chi2={chi2:.2}). counts={counts:?}");
    }
}
