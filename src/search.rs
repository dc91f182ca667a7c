//! Lower-bound search over the cumulative-weight table.
//!
//! A search function receives the strictly increasing cumulative weights and a
//! target in `1..=total`, and returns the leftmost index `i` with
//! `cumulative[i] >= target`. Any function with that contract can be plugged
//! into a [`Selector`](crate::Selector) via
//! [`SelectorBuilder::search`](crate::SelectorBuilder::search); the two here
//! exist mainly so benchmarks can compare them.

/// Signature of a lower-bound search strategy.
pub type SearchFn = fn(&[u64], u64) -> usize;

/// Leftmost index whose value is `>= target`, via [`slice::partition_point`].
///
/// Returns `cumulative.len()` if every value is below `target`.
#[inline]
pub fn lower_bound(cumulative: &[u64], target: u64) -> usize {
    cumulative.partition_point(|&w| w < target)
}

/// Same contract as [`lower_bound`], written as a fixed-step halving loop.
///
/// The loop runs `ceil(log2(n))` iterations regardless of the data and the
/// only data-dependent operation is a conditional add, which compilers
/// usually lower to a `cmov`.
#[inline]
pub fn branchless_lower_bound(cumulative: &[u64], target: u64) -> usize {
    let mut len = cumulative.len();
    if len == 0 {
        return 0;
    }
    let mut base = 0usize;
    while len > 1 {
        let half = len / 2;
        if cumulative[base + half - 1] < target {
            base += half;
        }
        len -= half;
    }
    base + usize::from(cumulative[base] < target)
}
