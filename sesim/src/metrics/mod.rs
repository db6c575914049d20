//! Similarity metrics of two rank strings.

mod composite;
mod edit;
mod rank;

use std::{fmt, str::FromStr};

use displaydoc::Display;
use thiserror::Error;

pub use self::{
    composite::{metric_t, transposition_penalty, Texts},
    edit::{damerau_levenshtein, hamming, jaro, jaro_winkler, levenshtein, sequence_ratio},
    rank::{
        kendall_tau,
        metric_g,
        metric_m,
        spearman_footrule,
        spearman_footrule_raw,
        M_REFERENCE_RANK,
    },
};
use crate::{config::ConfigError, data::CellKey, encoding::Symbol};

/// Potential errors of a metric computation.
#[derive(Debug, Display, Error)]
pub enum MetricError {
    /// The rank strings differ in length ({left} != {right})
    LengthMismatch { left: usize, right: usize },
    /// The T metric requires the titles and snippets of both engines
    TextsRequired,
    /// No text for position {position} of cell {key}
    MissingPosition { key: CellKey, position: usize },
    /// A comparison can't encode more than {0} distinct urls
    AlphabetExhausted(usize),
    /// Invalid configuration: {0}
    Config(#[from] ConfigError),
}

/// The supported metrics, selectable by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    Levenshtein,
    DamerauLevenshtein,
    Hamming,
    Jaro,
    JaroWinkler,
    SequenceRatio,
    KendallTau,
    SpearmanFootrule,
    MetricG,
    MetricM,
    MetricT,
}

impl Metric {
    /// All metrics in registry order.
    pub const ALL: [Metric; 11] = [
        Metric::Levenshtein,
        Metric::DamerauLevenshtein,
        Metric::Hamming,
        Metric::Jaro,
        Metric::JaroWinkler,
        Metric::SequenceRatio,
        Metric::KendallTau,
        Metric::SpearmanFootrule,
        Metric::MetricG,
        Metric::MetricM,
        Metric::MetricT,
    ];

    /// The registry name of the metric.
    pub fn name(self) -> &'static str {
        match self {
            Metric::Levenshtein => "LEV",
            Metric::DamerauLevenshtein => "DAM-LEV",
            Metric::Hamming => "HAM",
            Metric::Jaro => "JAR",
            Metric::JaroWinkler => "JAR-WIN",
            Metric::SequenceRatio => "PYTHON",
            Metric::KendallTau => "KENDALL",
            Metric::SpearmanFootrule => "SPEARMAN",
            Metric::MetricG => "G",
            Metric::MetricM => "M",
            Metric::MetricT => "T",
        }
    }

    /// Whether the metric blends in the titles and snippets of the results.
    pub fn is_composite(self) -> bool {
        self == Metric::MetricT
    }

    /// Computes a basic metric of two rank strings.
    ///
    /// All metrics yield similarities from the unit interval, except for the Spearman footrule
    /// which yields a normalized distance.
    ///
    /// # Errors
    /// Fails for the composite metric, use [`metric_t`] instead, and for rank strings of
    /// different length for the Hamming metric.
    pub fn compute(self, u: &[Symbol], v: &[Symbol]) -> Result<f32, MetricError> {
        let similarity = match self {
            Metric::Levenshtein => levenshtein(u, v),
            Metric::DamerauLevenshtein => damerau_levenshtein(u, v),
            Metric::Hamming => hamming(u, v)?,
            Metric::Jaro => jaro(u, v),
            Metric::JaroWinkler => jaro_winkler(u, v),
            Metric::SequenceRatio => sequence_ratio(u, v),
            Metric::KendallTau => kendall_tau(u, v),
            Metric::SpearmanFootrule => spearman_footrule(u, v),
            Metric::MetricG => metric_g(u, v),
            Metric::MetricM => metric_m(u, v),
            Metric::MetricT => return Err(MetricError::TextsRequired),
        };

        Ok(similarity)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .copied()
            .find(|metric| metric.name() == name)
            .ok_or_else(|| ConfigError::UnknownMetric(name.to_string()))
    }
}
