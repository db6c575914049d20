//! Rank correlation based similarities of rank strings.
//!
//! Positions always refer to the first occurrence of a symbol.

use itertools::Itertools;

use crate::encoding::Symbol;

/// The reference rank of the M metric, one past the last rank of a top-10 result list.
pub const M_REFERENCE_RANK: f32 = 11.;

/// The position of the first occurrence of `symbol` in `s`.
///
/// # Panics
/// Panics if `symbol` doesn't occur in `s`.
pub(crate) fn position(s: &[Symbol], symbol: Symbol) -> usize {
    s.iter()
        .position(|known| *known == symbol)
        .unwrap(/* only called for symbols of `s` */)
}

/// The distinct results of `s` in order of first occurrence.
///
/// Missing results are padding, not results, and are skipped.
pub(crate) fn distinct(s: &[Symbol]) -> Vec<Symbol> {
    s.iter()
        .copied()
        .filter(|symbol| !symbol.is_no_result())
        .unique()
        .collect()
}

/// The distinct symbols of `u` which also occur in `v`, in order of `u`.
pub(crate) fn common(u: &[Symbol], v: &[Symbol]) -> Vec<Symbol> {
    distinct(u)
        .into_iter()
        .filter(|symbol| v.contains(symbol))
        .collect()
}

/// The distinct symbols of `u` which don't occur in `v`.
fn difference(u: &[Symbol], v: &[Symbol]) -> Vec<Symbol> {
    distinct(u)
        .into_iter()
        .filter(|symbol| !v.contains(symbol))
        .collect()
}

/// `1 - discordant / pairs` over all pairs of common symbols.
///
/// With at most one common symbol there is nothing to disagree on and the similarity is `1`.
pub fn kendall_tau(u: &[Symbol], v: &[Symbol]) -> f32 {
    let common = common(u, v);
    if common.len() <= 1 {
        return 1.;
    }

    let discordant = common
        .iter()
        .tuple_combinations()
        .filter(|&(&x, &y)| {
            let in_u = position(u, x) as isize - position(u, y) as isize;
            let in_v = position(v, x) as isize - position(v, y) as isize;
            in_u * in_v < 0
        })
        .count();
    let pairs = common.len() * (common.len() - 1) / 2;

    1. - discordant as f32 / pairs as f32
}

/// The raw Spearman footrule distance of the common symbols re-ranked within the common subset.
pub fn spearman_footrule_raw(u: &[Symbol], v: &[Symbol]) -> f32 {
    let reranked_u = common(u, v);
    let reranked_v = common(v, u);

    reranked_u
        .iter()
        .enumerate()
        .map(|(rank, symbol)| (rank as isize - position(&reranked_v, *symbol) as isize).abs())
        .sum::<isize>() as f32
}

/// The Spearman footrule distance normalized by its maximum for the number of common symbols.
///
/// With at most one common symbol the distance is `0`.
pub fn spearman_footrule(u: &[Symbol], v: &[Symbol]) -> f32 {
    let n = common(u, v).len();
    if n <= 1 {
        return 0.;
    }

    let max = if n % 2 == 0 {
        (n * n) as f32 / 2.
    } else {
        ((n - 1) * (n + 1)) as f32 / 2.
    };
    let distance = spearman_footrule_raw(u, v) / max;
    debug_assert!(
        (0. ..=1.).contains(&distance),
        "normalized footrule out of range: {}",
        distance,
    );

    distance
}

/// The G similarity `1 - G / G_max` of two top-k rank strings, `k = max(|u|, |v|)`.
///
/// G is the footrule distance of the common results plus, for every result missing in the
/// other rank string, the distance of its rank to the location `k + 1`. The earlier a missing
/// result is ranked the higher its penalty. For disjoint full lists `G = G_max = k (k + 1)`.
pub fn metric_g(u: &[Symbol], v: &[Symbol]) -> f32 {
    if u.is_empty() {
        return 0.;
    }

    let len = u.len().max(v.len());
    let missing = |s: &[Symbol], other: &[Symbol]| {
        difference(s, other)
            .into_iter()
            .map(|symbol| (len - position(s, symbol)) as f32)
            .sum::<f32>()
    };

    let g = spearman_footrule_raw(u, v) + missing(u, v) + missing(v, u);
    let g_max = (len * (len + 1)) as f32;
    debug_assert!(
        (0. ..=g_max).contains(&g),
        "G out of range: {} not in [0, {}]",
        g,
        g_max,
    );

    1. - g / g_max
}

fn inverse_rank(position: usize) -> f32 {
    1. / (position + 1) as f32
}

/// The M similarity `1 - M / M_max`.
///
/// M compares inverse ranks, results missing in the other rank string are compared against
/// the inverse of [`M_REFERENCE_RANK`]. `M_max` sums over the ranks of the longer rank string.
pub fn metric_m(u: &[Symbol], v: &[Symbol]) -> f32 {
    if u.is_empty() {
        return 0.;
    }

    let reference = 1. / M_REFERENCE_RANK;
    let missing = |s: &[Symbol], other: &[Symbol]| {
        difference(s, other)
            .into_iter()
            .map(|symbol| (inverse_rank(position(s, symbol)) - reference).abs())
            .sum::<f32>()
    };
    let shared = common(u, v)
        .into_iter()
        .map(|symbol| (inverse_rank(position(u, symbol)) - inverse_rank(position(v, symbol))).abs())
        .sum::<f32>();

    let m = shared + missing(u, v) + missing(v, u);
    let m_max = 2. * (0..u.len().max(v.len()))
        .map(|position| (inverse_rank(position) - reference).abs())
        .sum::<f32>();

    1. - m / m_max
}
