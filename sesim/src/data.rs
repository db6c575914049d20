//! Search results as they enter the similarity analysis.

use std::{
    collections::{BTreeMap, HashMap},
    convert::TryFrom,
    fmt,
};

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// A single ranked result of a search engine.
///
/// Any field may be missing, e.g. when the engine returned fewer results than requested.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub url: Option<String>,
    pub title: Option<String>,
    pub snippet: Option<String>,
}

impl ResultEntry {
    /// Creates an entry for a result which is present.
    pub fn new(url: impl Into<String>, title: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            title: Some(title.into()),
            snippet: Some(snippet.into()),
        }
    }

    /// Placeholder for a missing result.
    pub fn no_result() -> Self {
        Self::default()
    }
}

/// The ranked results of one engine for one query on one day.
///
/// The entry at index `i` has rank `i + 1`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet(pub Vec<ResultEntry>);

impl ResultSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[ResultEntry] {
        &self.0
    }

    pub fn urls(&self) -> Vec<Option<&str>> {
        self.0.iter().map(|entry| entry.url.as_deref()).collect()
    }

    /// The titles of the results, padded with missing values up to `depth`.
    pub fn titles(&self, depth: usize) -> Vec<Option<String>> {
        self.padded(depth, |entry| entry.title.clone())
    }

    /// The snippets of the results, padded with missing values up to `depth`.
    pub fn snippets(&self, depth: usize) -> Vec<Option<String>> {
        self.padded(depth, |entry| entry.snippet.clone())
    }

    fn padded(
        &self,
        depth: usize,
        field: impl Fn(&ResultEntry) -> Option<String>,
    ) -> Vec<Option<String>> {
        let mut values = self.0.iter().map(field).collect::<Vec<_>>();
        if values.len() < depth {
            values.resize(depth, None);
        }
        values
    }
}

impl From<Vec<ResultEntry>> for ResultSet {
    fn from(entries: Vec<ResultEntry>) -> Self {
        Self(entries)
    }
}

/// The results of one engine, keyed by day and then by query.
///
/// Days iterate in ascending order, queries in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineResults {
    pub engine: String,
    pub days: BTreeMap<String, Vec<(String, ResultSet)>>,
}

impl EngineResults {
    pub fn new(engine: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            days: BTreeMap::new(),
        }
    }

    /// Adds the results of a query, replacing earlier results of the same day and query.
    pub fn insert(&mut self, day: impl Into<String>, query: impl Into<String>, results: ResultSet) {
        let query = query.into();
        let queries = self.days.entry(day.into()).or_default();
        match queries.iter_mut().find(|(known, _)| *known == query) {
            Some((_, known)) => *known = results,
            None => queries.push((query, results)),
        }
    }

    /// The results of a query on a day, if there are any.
    pub fn get(&self, day: &str, query: &str) -> Option<&ResultSet> {
        self.days.get(day).and_then(|queries| {
            queries
                .iter()
                .find_map(|(known, results)| (known == query).then(|| results))
        })
    }

    /// Moves the results of `other` into `self`.
    pub fn merge(&mut self, other: EngineResults) {
        for (day, queries) in other.days {
            for (query, results) in queries {
                self.insert(day.clone(), query, results);
            }
        }
    }
}

/// Identifies a single comparison cell: a query on a day.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub day: String,
    pub query: String,
}

impl CellKey {
    pub fn new(day: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            query: query.into(),
        }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.day, self.query)
    }
}

/// The per position texts (titles or snippets) of one engine for exactly one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellTexts {
    key: CellKey,
    texts: Vec<Option<String>>,
}

impl CellTexts {
    pub fn new(key: CellKey, texts: Vec<Option<String>>) -> Self {
        Self { key, texts }
    }

    pub fn key(&self) -> &CellKey {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// The text at `position`, a missing text reads as empty.
    ///
    /// Returns `None` if the position is out of range.
    pub fn get(&self, position: usize) -> Option<&str> {
        self.texts
            .get(position)
            .map(|text| text.as_deref().unwrap_or_default())
    }
}

impl TryFrom<HashMap<CellKey, Vec<Option<String>>>> for CellTexts {
    type Error = ConfigError;

    /// Converts a map of texts which must hold exactly one cell.
    fn try_from(map: HashMap<CellKey, Vec<Option<String>>>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(ConfigError::CellTexts(map.len()));
        }
        map.into_iter()
            .next()
            .map(|(key, texts)| Self::new(key, texts))
            .ok_or(ConfigError::CellTexts(0))
    }
}
