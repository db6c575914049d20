//! Similarity analysis of the result rankings of search engines.
//!
//! Two ranked result lists are encoded as rank strings over a shared url alphabet and compared
//! with edit distance, rank correlation and the composite T metric, which additionally takes the
//! titles and snippets of the results into account.

mod aggregator;
mod config;
mod data;
mod encoding;
mod metrics;
mod text;
mod utils;

pub use crate::{
    aggregator::{find_distance, DistanceReport, DistanceTensor},
    config::{ConfigError, TConfig},
    data::{CellKey, CellTexts, EngineResults, ResultEntry, ResultSet},
    encoding::{encode_ranks, RankAlphabet, RankPair, Symbol},
    metrics::{
        damerau_levenshtein,
        hamming,
        jaro,
        jaro_winkler,
        kendall_tau,
        levenshtein,
        metric_g,
        metric_m,
        metric_t,
        sequence_ratio,
        spearman_footrule,
        spearman_footrule_raw,
        transposition_penalty,
        Metric,
        MetricError,
        Texts,
        M_REFERENCE_RANK,
    },
    text::{BagOfWords, BagOfWordsMatrix, Corpus, Document, DEFAULT_TOP_WORDS},
    utils::cosine_similarity,
};
