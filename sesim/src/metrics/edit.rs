//! Edit distance and alignment based similarities of rank strings.

use strsim::{
    generic_damerau_levenshtein,
    generic_hamming,
    generic_jaro,
    generic_jaro_winkler,
    generic_levenshtein,
};

use super::MetricError;
use crate::encoding::Symbol;

/// Normalizes an edit distance by the length of `u`, an empty `u` has no similarity.
fn normalize(distance: usize, u: &[Symbol]) -> f32 {
    if u.is_empty() {
        0.
    } else {
        1. - distance as f32 / u.len() as f32
    }
}

/// `1 - levenshtein(u, v) / |u|`.
pub fn levenshtein(u: &[Symbol], v: &[Symbol]) -> f32 {
    normalize(generic_levenshtein(&u.to_vec(), &v.to_vec()), u)
}

/// `1 - damerau_levenshtein(u, v) / |u|`, adjacent transpositions count as a single edit.
pub fn damerau_levenshtein(u: &[Symbol], v: &[Symbol]) -> f32 {
    normalize(generic_damerau_levenshtein(u, v), u)
}

/// `1 - hamming(u, v) / |u|`.
///
/// # Errors
/// Fails if the rank strings differ in length.
pub fn hamming(u: &[Symbol], v: &[Symbol]) -> Result<f32, MetricError> {
    generic_hamming(u.iter(), v.iter())
        .map(|distance| normalize(distance, u))
        .map_err(|_| MetricError::LengthMismatch {
            left: u.len(),
            right: v.len(),
        })
}

/// The Jaro similarity.
pub fn jaro(u: &[Symbol], v: &[Symbol]) -> f32 {
    generic_jaro(&u.to_vec(), &v.to_vec()) as f32
}

/// The Jaro-Winkler similarity.
pub fn jaro_winkler(u: &[Symbol], v: &[Symbol]) -> f32 {
    generic_jaro_winkler(&u.to_vec(), &v.to_vec()) as f32
}

/// The longest common block `(i, j, size)` of `u[lo_u..hi_u]` and `v[lo_v..hi_v]`.
///
/// Among blocks of maximal size the one starting first in `u`, then first in `v` wins.
fn longest_match(
    u: &[Symbol],
    v: &[Symbol],
    (lo_u, hi_u): (usize, usize),
    (lo_v, hi_v): (usize, usize),
) -> (usize, usize, usize) {
    let (mut best_u, mut best_v, mut best_size) = (lo_u, lo_v, 0);
    // runs[j - lo_v + 1] is the length of the common run ending at the current i and j
    let mut runs = vec![0; hi_v - lo_v + 1];
    for i in lo_u..hi_u {
        let mut next_runs = vec![0; runs.len()];
        for j in lo_v..hi_v {
            if u[i] == v[j] {
                let size = runs[j - lo_v] + 1;
                next_runs[j - lo_v + 1] = size;
                if size > best_size {
                    best_u = i + 1 - size;
                    best_v = j + 1 - size;
                    best_size = size;
                }
            }
        }
        runs = next_runs;
    }

    (best_u, best_v, best_size)
}

/// The number of symbols in the matching blocks found by the Ratcliff/Obershelp algorithm.
fn matching_symbols(u: &[Symbol], v: &[Symbol]) -> usize {
    let mut matches = 0;
    let mut queue = vec![((0, u.len()), (0, v.len()))];
    while let Some(((lo_u, hi_u), (lo_v, hi_v))) = queue.pop() {
        let (i, j, size) = longest_match(u, v, (lo_u, hi_u), (lo_v, hi_v));
        if size == 0 {
            continue;
        }
        matches += size;
        if lo_u < i && lo_v < j {
            queue.push(((lo_u, i), (lo_v, j)));
        }
        if i + size < hi_u && j + size < hi_v {
            queue.push(((i + size, hi_u), (j + size, hi_v)));
        }
    }

    matches
}

/// The sequence matching ratio `2M / (|u| + |v|)`, where `M` is the number of symbols in the
/// matching blocks. Two empty rank strings are identical.
pub fn sequence_ratio(u: &[Symbol], v: &[Symbol]) -> f32 {
    let total = u.len() + v.len();
    if total == 0 {
        return 1.;
    }

    2. * matching_symbols(u, v) as f32 / total as f32
}
