//! The composite T metric which blends rank transpositions with the textual similarity of the
//! titles and snippets of the results both engines agree on.

use itertools::izip;
use log::debug;
use ndarray::Array1;

use super::{
    rank::{common, position},
    MetricError,
};
use crate::{
    config::TConfig,
    data::CellTexts,
    encoding::Symbol,
    text::{BagOfWords, Corpus, Document, DEFAULT_TOP_WORDS},
    utils::cosine_similarity,
};

/// The titles and snippets of one engine for the compared cell.
#[derive(Clone, Copy, Debug)]
pub struct Texts<'a> {
    pub snippets: &'a CellTexts,
    pub titles: &'a CellTexts,
}

/// `1 - cos` of the bag of words vectors of two texts, vectorized one against the other.
fn text_distance(u: (&str, &str), v: (&str, &str), remove_query_term: bool) -> f32 {
    let corpora = [
        Corpus::new("u", vec![Document::new(u.0, u.1)]),
        Corpus::new("v", vec![Document::new(v.0, v.1)]),
    ];
    let bows = BagOfWords::new(&corpora, remove_query_term).build(Some(DEFAULT_TOP_WORDS));

    1. - cosine_similarity(&bows[0].matrix.row(0), &bows[1].matrix.row(0))
}

/// The text at `position` of a cell.
fn text_at(texts: &CellTexts, position: usize) -> Result<(&str, &str), MetricError> {
    texts
        .get(position)
        .map(|text| (texts.key().query.as_str(), text))
        .ok_or_else(|| MetricError::MissingPosition {
            key: texts.key().clone(),
            position,
        })
}

/// The summed displacement of the common symbols relative to its maximum for rank strings of
/// the given length.
///
/// # Errors
/// Fails if the rank strings differ in length.
pub fn transposition_penalty(
    u: &[Symbol],
    v: &[Symbol],
    common: &[Symbol],
) -> Result<f32, MetricError> {
    if u.len() != v.len() {
        return Err(MetricError::LengthMismatch {
            left: u.len(),
            right: v.len(),
        });
    }

    let len = u.len();
    let total = common
        .iter()
        .map(|symbol| (position(u, *symbol) as isize - position(v, *symbol) as isize).abs())
        .sum::<isize>() as f32;
    let max = (0..common.len())
        .map(|i| if i % 2 == 0 { len - i - 1 } else { len - i })
        .sum::<usize>() as f32;
    if max == 0. {
        return Ok(0.);
    }

    let penalty = total / max;
    debug_assert!(
        (0. ..=1.).contains(&penalty),
        "transposition penalty out of range: {}",
        penalty,
    );

    Ok(penalty)
}

/// The sum of the positional bonus over the leading ranks at which both engines returned the
/// same result.
fn positional_bonus(u: &[Symbol], v: &[Symbol], bonus: &[f32]) -> f32 {
    let ranks = u.len().min(v.len()).min(bonus.len());
    (0..ranks)
        .filter(|&rank| u[rank] == v[rank] && !u[rank].is_no_result())
        .map(|rank| bonus[rank])
        .sum()
}

/// Computes the T similarity of a cell for every weight configuration of `config`.
///
/// With `m` common results, `N = |u|`, the summed snippet distance `s`, the summed title
/// distance `k` and the transposition penalty `tr` the raw similarity of configuration `i` is
/// `(3m + 1 - a[i] s - b[i] k - c[i] tr) / (3N + 1)`. Configurations reaching the threshold of
/// the config are pulled towards `1` by the positional bonus.
///
/// Empty rank strings and rank strings without common results have a similarity of `0`.
///
/// # Errors
/// Fails if the rank strings differ in length or the texts don't cover a common result.
pub fn metric_t(
    u: &[Symbol],
    v: &[Symbol],
    texts_u: Texts<'_>,
    texts_v: Texts<'_>,
    config: &TConfig,
) -> Result<Array1<f32>, MetricError> {
    let zeros = Array1::zeros(config.configurations());
    if u.is_empty() || v.is_empty() {
        debug!("no results to compare for {}", texts_u.titles.key());
        return Ok(zeros);
    }

    let common = common(u, v);
    if common.is_empty() {
        debug!("no common results for {}", texts_u.titles.key());
        return Ok(zeros);
    }
    let tr = transposition_penalty(u, v, &common)?;

    let mut k = 0.;
    let mut s = 0.;
    for symbol in &common {
        let x = position(u, *symbol);
        let y = position(v, *symbol);
        k += text_distance(
            text_at(texts_u.titles, x)?,
            text_at(texts_v.titles, y)?,
            false,
        );
        s += text_distance(
            text_at(texts_u.snippets, x)?,
            text_at(texts_v.snippets, y)?,
            true,
        );
    }

    let m = common.len() as f32;
    let len = u.len() as f32;
    let mut weights = izip!(config.a(), config.b(), config.c())
        .map(|(a, b, c)| (3. * m + 1. - a * s - b * k - c * tr) / (3. * len + 1.))
        .collect::<Array1<f32>>();

    if let Some(bonus) = config.bonus() {
        let total = positional_bonus(u, v, bonus);
        if total != 0. {
            for weight in weights.iter_mut() {
                if *weight >= config.threshold() {
                    *weight += total * (1. - *weight);
                }
            }
        }
    }
    debug_assert!(
        weights.iter().all(|weight| *weight >= 0.),
        "negative T similarity: {:?}",
        weights,
    );

    Ok(weights)
}
