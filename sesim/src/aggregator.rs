//! Comparison of two engines over all days and queries.

use log::{debug, warn};
use ndarray::{s, Array1, Array2, Array3, ArrayView1, ArrayViewMut1, Axis};
use serde::{Deserialize, Serialize};

#[cfg(feature = "multithreaded")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    config::TConfig,
    data::{CellKey, CellTexts, EngineResults, ResultSet},
    encoding::{encode_ranks, RankPair},
    metrics::{metric_t, Metric, MetricError, Texts},
};

/// The similarities of two engines indexed by day, query and weight configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistanceTensor {
    pub days: Vec<String>,
    pub queries: Vec<String>,
    pub values: Array3<f32>,
}

impl DistanceTensor {
    fn new(days: Vec<String>, queries: Vec<String>, configurations: usize) -> Self {
        let values = Array3::zeros((days.len(), queries.len(), configurations));
        Self {
            days,
            queries,
            values,
        }
    }

    /// The number of weight configurations.
    pub fn configurations(&self) -> usize {
        self.values.len_of(Axis(2))
    }

    /// The similarities of a cell, one per weight configuration.
    pub fn cell(&self, day: usize, query: usize) -> ArrayView1<'_, f32> {
        self.values.slice(s![day, query, ..])
    }

    /// The mean similarity over all queries per day and weight configuration.
    ///
    /// Failed cells are skipped, a day without any successful cell is `NaN`.
    pub fn similarity_over_time(&self) -> Array2<f32> {
        let mut series = Array2::zeros((self.days.len(), self.configurations()));
        for (day, mut means) in series.outer_iter_mut().enumerate() {
            for (configuration, mean) in means.iter_mut().enumerate() {
                let (sum, count) = self
                    .values
                    .slice(s![day, .., configuration])
                    .iter()
                    .filter(|value| !value.is_nan())
                    .fold((0f32, 0usize), |(sum, count), value| (sum + *value, count + 1));
                *mean = if count == 0 {
                    f32::NAN
                } else {
                    sum / count as f32
                };
            }
        }

        series
    }
}

/// The result of a comparison run: the tensor and the errors of the cells which failed.
#[derive(Debug)]
pub struct DistanceReport {
    pub tensor: DistanceTensor,
    pub errors: Vec<(CellKey, MetricError)>,
}

impl DistanceReport {
    /// Whether all cells were computed successfully.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Stores the outcome of a cell, a failed cell is set to `NaN`.
fn store_cell(
    mut cell: ArrayViewMut1<'_, f32>,
    key: CellKey,
    outcome: Result<Array1<f32>, MetricError>,
    errors: &mut Vec<(CellKey, MetricError)>,
) {
    match outcome {
        Ok(similarities) => cell.assign(&similarities),
        Err(error) => {
            warn!("Failed to compare {}: {}", key, error);
            cell.fill(f32::NAN);
            errors.push((key, error));
        }
    }
}

/// The number of similarities per cell.
fn configurations(metric: Metric, config: &TConfig) -> usize {
    if metric.is_composite() {
        config.configurations()
    } else {
        1
    }
}

/// Compares a single cell, yielding one similarity per weight configuration.
///
/// A cell where either engine has no results at all is degenerate and has a similarity of `0`.
fn compare_cell(
    key: &CellKey,
    left: &ResultSet,
    right: &ResultSet,
    metric: Metric,
    depth: usize,
    config: &TConfig,
) -> Result<Array1<f32>, MetricError> {
    let left_urls = left.urls();
    let right_urls = right.urls();
    let is_empty = |urls: &[Option<&str>]| urls.iter().all(Option::is_none);
    if is_empty(&left_urls) || is_empty(&right_urls) {
        debug!("no results to compare for {}", key);
        return Ok(Array1::zeros(configurations(metric, config)));
    }

    let RankPair { u, v, .. } = encode_ranks(&left_urls, &right_urls, depth)?;

    if metric.is_composite() {
        let snippets_u = CellTexts::new(key.clone(), left.snippets(depth));
        let titles_u = CellTexts::new(key.clone(), left.titles(depth));
        let snippets_v = CellTexts::new(key.clone(), right.snippets(depth));
        let titles_v = CellTexts::new(key.clone(), right.titles(depth));
        metric_t(
            &u,
            &v,
            Texts {
                snippets: &snippets_u,
                titles: &titles_u,
            },
            Texts {
                snippets: &snippets_v,
                titles: &titles_v,
            },
            config,
        )
    } else {
        metric
            .compute(&u, &v)
            .map(|similarity| Array1::from_elem(1, similarity))
    }
}

/// Computes the similarities of the rankings of two engines for every day and query.
///
/// Days are processed in ascending order, queries in the order of the first engine. The query
/// axis is sized by the first day; a query the second engine has no results for is compared
/// against an empty result set. A cell without results on either side has a similarity of `0`.
/// The weight configurations of `config` only apply to the composite metric, all other metrics
/// yield a single similarity per cell.
///
/// A failing cell is set to `NaN` and its error is collected in the report, the remaining
/// cells are still computed. With the `multithreaded` feature the queries of a day are compared
/// in parallel.
pub fn find_distance(
    first: &EngineResults,
    second: &EngineResults,
    metric: Metric,
    depth: usize,
    config: &TConfig,
) -> DistanceReport {
    let days = first.days.keys().cloned().collect::<Vec<_>>();
    let queries: Vec<String> = first
        .days
        .values()
        .next()
        .map(|queries| queries.iter().map(|(query, _)| query.clone()).collect())
        .unwrap_or_default();
    let mut tensor = DistanceTensor::new(days, queries, configurations(metric, config));
    let mut errors = Vec::new();
    let empty = ResultSet::default();

    for (d, (day, queries)) in first.days.iter().enumerate() {
        debug!(
            "Comparing {} and {} with {} on {}",
            first.engine, second.engine, metric, day,
        );
        if queries.len() != tensor.queries.len() {
            warn!(
                "{} has {} queries on {}, expected {}",
                first.engine,
                queries.len(),
                day,
                tensor.queries.len(),
            );
        }

        let cells = queries
            .iter()
            .take(tensor.queries.len())
            .map(|(query, left)| (CellKey::new(day.as_str(), query.as_str()), left))
            .collect::<Vec<_>>();
        #[cfg(not(feature = "multithreaded"))]
        let cells = cells.into_iter();
        #[cfg(feature = "multithreaded")]
        let cells = cells.into_par_iter();

        let outcomes = cells
            .map(|(key, left)| {
                let right = second.get(&key.day, &key.query).unwrap_or_else(|| {
                    debug!("{} has no results for {}", second.engine, key);
                    &empty
                });
                let outcome = compare_cell(&key, left, right, metric, depth, config);
                (key, outcome)
            })
            .collect::<Vec<_>>();
        for (q, (key, outcome)) in outcomes.into_iter().enumerate() {
            store_cell(
                tensor.values.slice_mut(s![d, q, ..]),
                key,
                outcome,
                &mut errors,
            );
        }
    }

    DistanceReport { tensor, errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ResultEntry;
    use test_utils::assert_approx_eq;

    fn result_set(urls: &[&str]) -> ResultSet {
        urls.iter()
            .map(|url| {
                ResultEntry::new(
                    *url,
                    format!("{} title", url),
                    format!("{} snippet text", url),
                )
            })
            .collect::<Vec<_>>()
            .into()
    }

    fn engines() -> (EngineResults, EngineResults) {
        let mut first = EngineResults::new("google");
        let mut second = EngineResults::new("bing");
        for day in ["2020-01-02", "2020-01-01"] {
            first.insert(day, "athens", result_set(&["a.gr", "b.gr", "c.gr"]));
            first.insert(day, "crete", result_set(&["d.gr", "e.gr", "f.gr"]));
            first.insert(day, "rhodes", result_set(&["g.gr", "h.gr", "i.gr"]));
            second.insert(day, "athens", result_set(&["a.gr", "b.gr", "c.gr"]));
            second.insert(day, "crete", result_set(&["e.gr", "d.gr", "x.gr"]));
            second.insert(day, "rhodes", result_set(&["y.gr", "z.gr", "w.gr"]));
        }
        (first, second)
    }

    #[test]
    fn test_levenshtein_tensor() {
        let (first, second) = engines();
        let report = find_distance(&first, &second, Metric::Levenshtein, 3, &TConfig::default());

        assert!(report.is_complete());
        let tensor = report.tensor;
        assert_eq!(tensor.values.shape(), [2, 3, 1]);
        assert_eq!(tensor.days, ["2020-01-01", "2020-01-02"]);
        assert_eq!(tensor.queries, ["athens", "crete", "rhodes"]);
        assert!(tensor.values.iter().all(|value| (0. ..=1.).contains(value)));
        for day in 0..2 {
            assert_approx_eq!(f32, tensor.cell(day, 0), [1.]);
            assert_approx_eq!(f32, tensor.cell(day, 1), [0.]);
            assert_approx_eq!(f32, tensor.cell(day, 2), [0.]);
        }
    }

    #[test]
    fn test_composite_tensor() {
        let (first, second) = engines();
        let config = TConfig::default()
            .with_weights(&[0.8, 0.5], &[1., 0.5], &[0.33, 0.5])
            .unwrap();
        let report = find_distance(&first, &second, Metric::MetricT, 3, &config);

        assert!(report.is_complete());
        let tensor = report.tensor;
        assert_eq!(tensor.values.shape(), [2, 3, 2]);
        assert!(tensor.values.iter().all(|value| *value >= 0.));
        // identical rankings with identical texts
        assert_approx_eq!(f32, tensor.cell(0, 0), [1., 1.], epsilon = 1e-6);
        // no common results
        assert_approx_eq!(f32, tensor.cell(0, 2), [0., 0.]);
    }

    #[test]
    fn test_missing_query_of_second_engine() {
        let (first, mut second) = engines();
        second.days.values_mut().for_each(|queries| {
            queries.retain(|(query, _)| query != "athens");
        });
        let report = find_distance(&first, &second, Metric::Levenshtein, 3, &TConfig::default());

        assert!(report.is_complete());
        assert_approx_eq!(f32, report.tensor.cell(0, 0), [0.]);
    }

    #[test]
    fn test_cells_without_results() {
        let mut first = EngineResults::new("google");
        let mut second = EngineResults::new("bing");
        first.insert("2020-01-01", "athens", result_set(&["a.gr", "b.gr", "c.gr"]));
        first.insert("2020-01-01", "crete", ResultSet::default());
        second.insert("2020-01-01", "crete", vec![ResultEntry::no_result(); 10].into());

        for metric in Metric::ALL {
            let report = find_distance(&first, &second, metric, 10, &TConfig::default());
            assert!(report.is_complete());
            // athens is missing for bing, crete has no results for both
            assert_approx_eq!(f32, &report.tensor.values, [[[0.], [0.]]]);
        }
    }

    #[test]
    fn test_partial_result_lists() {
        let mut first = EngineResults::new("google");
        let mut second = EngineResults::new("bing");
        first.insert(
            "2020-01-01",
            "athens",
            result_set(&["a.gr", "b.gr", "c.gr", "d.gr", "e.gr", "f.gr", "g.gr", "h.gr"]),
        );
        second.insert(
            "2020-01-01",
            "athens",
            result_set(&["i.gr", "j.gr", "k.gr", "l.gr", "m.gr", "n.gr", "o.gr", "p.gr"]),
        );
        first.insert("2020-01-01", "crete", result_set(&["a.gr", "b.gr", "c.gr"]));
        second.insert("2020-01-01", "crete", result_set(&["c.gr", "x.gr", "a.gr"]));

        for metric in Metric::ALL {
            let report = find_distance(&first, &second, metric, 10, &TConfig::default());
            assert!(report.is_complete());
            assert!(
                report.tensor.values.iter().all(|value| (0. ..=1.).contains(value)),
                "{} yields {:?}",
                metric,
                report.tensor.values,
            );
        }

        let report = find_distance(&first, &second, Metric::MetricG, 10, &TConfig::default());
        // every result misses in the other list, the padding doesn't count as common
        assert_approx_eq!(f32, report.tensor.cell(0, 0), [1. - 104. / 110.]);
    }

    #[test]
    fn test_unequal_list_lengths() {
        let (mut first, second) = engines();
        first.insert(
            "2020-01-01",
            "crete",
            result_set(&["d.gr", "e.gr", "f.gr", "j.gr"]),
        );

        // both rank strings are padded to the longer list
        for metric in [Metric::Hamming, Metric::MetricT] {
            let report = find_distance(&first, &second, metric, 3, &TConfig::default());
            assert!(report.is_complete());
        }
    }

    #[test]
    fn test_failing_cell_does_not_abort() {
        let (first, second) = engines();
        let mut tensor = find_distance(&first, &second, Metric::Levenshtein, 3, &TConfig::default())
            .tensor;
        let mut errors = Vec::new();

        store_cell(
            tensor.values.slice_mut(s![0, 1, ..]),
            CellKey::new("2020-01-01", "crete"),
            Err(MetricError::LengthMismatch { left: 3, right: 2 }),
            &mut errors,
        );

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, CellKey::new("2020-01-01", "crete"));
        assert!(tensor.cell(0, 1)[0].is_nan());
        assert_approx_eq!(f32, tensor.cell(0, 0), [1.]);
        // the failed cell doesn't count towards the mean of its day
        let series = tensor.similarity_over_time();
        assert_approx_eq!(f32, series.column(0), [0.5, 1. / 3.]);
    }

    #[test]
    fn test_ragged_queries() {
        let (mut first, second) = engines();
        first.insert("2020-01-02", "corfu", result_set(&["k.gr"]));
        first
            .days
            .get_mut("2020-01-01")
            .unwrap()
            .retain(|(query, _)| query != "rhodes");
        let report = find_distance(&first, &second, Metric::Levenshtein, 3, &TConfig::default());

        let tensor = report.tensor;
        assert_eq!(tensor.queries, ["athens", "crete"]);
        assert_eq!(tensor.values.shape(), [2, 2, 1]);
    }

    #[test]
    fn test_similarity_over_time() {
        let tensor = DistanceTensor {
            days: vec!["2020-01-01".into(), "2020-01-02".into()],
            queries: vec!["athens".into(), "crete".into()],
            values: Array3::from_shape_vec(
                (2, 2, 2),
                vec![1., 0.5, 0., 0.5, 0.5, f32::NAN, f32::NAN, f32::NAN],
            )
            .unwrap(),
        };
        let series = tensor.similarity_over_time();

        assert_approx_eq!(f32, series.row(0), [0.5, 0.5]);
        assert_approx_eq!(f32, series[[1, 0]], 0.5);
        assert!(series[[1, 1]].is_nan());
        assert_eq!(series.shape(), [2, 2]);
    }

    #[test]
    fn test_empty_engine() {
        let report = find_distance(
            &EngineResults::new("google"),
            &EngineResults::new("bing"),
            Metric::KendallTau,
            10,
            &TConfig::default(),
        );
        assert!(report.is_complete());
        assert_eq!(report.tensor.values.shape(), [0, 0, 1]);
    }

    #[test]
    fn test_tensor_serializes() {
        let (first, second) = engines();
        let report = find_distance(&first, &second, Metric::KendallTau, 3, &TConfig::default());
        let json = serde_json::to_value(&report.tensor).unwrap();
        assert_eq!(json["days"][0], "2020-01-01");
        assert_eq!(json["queries"][2], "rhodes");
    }
}
