//! Loading of the on-disk result store.

use std::{
    fs::{read_dir, File},
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Error};
use displaydoc::Display;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use sesim::{EngineResults, ResultEntry, ResultSet};

/// The maximum number of results per query.
pub const MAX_RESULTS: usize = 10;

/// The category which pools the results of all categories.
pub const ALL_CATEGORIES: &str = "*";

/// Potential errors of reading a result document.
#[derive(Debug, Display, Error)]
pub enum StoreError {
    /// The number of top results must be up to 10, got {0}
    TooManyResults(usize),
    /// Expected a list of results in {0}
    NotAList(PathBuf),
    /// Expected a query and a suffix in the document name {0}
    DocumentName(PathBuf),
}

lazy_static! {
    static ref URL_NOISE: Regex =
        Regex::new(r"^https?://|home$|(external/)?index.(htm|asp|jsp)\?.*$")
            .unwrap(/* valid constant pattern */);
}

/// Strips the scheme and common index page suffixes from an url and lowercases it.
pub fn normalize_url(url: &str) -> String {
    URL_NOISE
        .replace_all(url, "")
        .chars()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_lowercase()
}

/// The layout of the documents of an engine in a category.
#[derive(Clone, Copy, Debug, PartialEq)]
enum DocumentFormat {
    /// `{"items": [{link, title, snippet}]}`
    GoogleWeb,
    /// `[{url, title, abstract}]`
    GoogleNews,
    /// `[{url, name, description}]`
    BingNews,
    /// `[{url, title, description}]`
    Generic,
}

impl DocumentFormat {
    fn new(engine: &str, category: &str) -> Self {
        let news = category == "News";
        if engine.contains("google") {
            if news {
                Self::GoogleNews
            } else {
                Self::GoogleWeb
            }
        } else if engine.contains("bing") && news {
            Self::BingNews
        } else {
            Self::Generic
        }
    }

    /// The keys of the url, the title and the snippet of a result.
    fn keys(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Self::GoogleWeb => ("link", "title", "snippet"),
            Self::GoogleNews => ("url", "title", "abstract"),
            Self::BingNews => ("url", "name", "description"),
            Self::Generic => ("url", "title", "description"),
        }
    }

    fn results(self, document: &Value) -> Option<&Vec<Value>> {
        match self {
            Self::GoogleWeb => match document.get("items") {
                Some(items) => items.as_array(),
                None => Some(&EMPTY),
            },
            _ => document.as_array(),
        }
    }
}

static EMPTY: Vec<Value> = Vec::new();

fn text(result: &Value, key: &str) -> Option<String> {
    result.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Reads the top `depth` results of a document, missing ranks are filled with placeholders.
fn parse_document(
    path: &Path,
    document: &Value,
    format: DocumentFormat,
    depth: usize,
) -> Result<ResultSet, StoreError> {
    let results = format
        .results(document)
        .ok_or_else(|| StoreError::NotAList(path.to_path_buf()))?;
    let (url, title, snippet) = format.keys();

    let entries = (0..depth)
        .map(|rank| match results.get(rank) {
            Some(result) => ResultEntry {
                url: text(result, url).map(|url| normalize_url(&url)),
                title: text(result, title),
                snippet: text(result, snippet),
            },
            None => ResultEntry::no_result(),
        })
        .collect::<Vec<_>>();

    Ok(entries.into())
}

/// The query of a document named `<query>-<suffix>`.
fn query_of(path: &Path) -> Result<String, StoreError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.rsplit_once('-'))
        .map(|(query, _)| query.to_string())
        .ok_or_else(|| StoreError::DocumentName(path.to_path_buf()))
}

/// The entries of a directory in sorted order, a missing directory has no entries.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut entries = read_dir(dir)
        .with_context(|| format!("Reading {} failed", dir.display()))?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();

    Ok(entries)
}

fn load_document(path: &Path) -> Result<Value, Error> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Parsing {} failed", path.display()))
}

/// Loads the top `depth` results of an engine for a category of the store.
///
/// The store is laid out as `<results>/<day>/<category>/<engine>/<query>-<suffix>`, the
/// [`ALL_CATEGORIES`] category pools all categories. Documents are read in sorted path order.
pub fn load_engine(
    results: &Path,
    category: &str,
    engine: &str,
    depth: usize,
) -> Result<EngineResults, Error> {
    if depth > MAX_RESULTS {
        return Err(StoreError::TooManyResults(depth).into());
    }
    if !results.is_dir() {
        bail!("Results directory {} not found", results.display());
    }

    let mut engine_results = EngineResults::new(engine);
    for day_dir in sorted_entries(results)?
        .into_iter()
        .filter(|path| path.is_dir())
    {
        let day = day_dir
            .file_name()
            .map(|day| day.to_string_lossy().into_owned())
            .unwrap_or_default();
        let categories = if category == ALL_CATEGORIES {
            sorted_entries(&day_dir)?
        } else {
            vec![day_dir.join(category)]
        };

        for category_dir in categories {
            let format = DocumentFormat::new(
                engine,
                &category_dir
                    .file_name()
                    .map(|category| category.to_string_lossy())
                    .unwrap_or_default(),
            );
            for path in sorted_entries(&category_dir.join(engine))? {
                let query = query_of(&path)?;
                let document = load_document(&path)?;
                let results = parse_document(&path, &document, format, depth)?;
                engine_results.insert(day.as_str(), query, results);
            }
        }
    }
    debug!(
        "Loaded {} days of {} for {}",
        engine_results.days.len(),
        engine,
        category,
    );

    Ok(engine_results)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_utils::{generic_document, google_document, ResultStore};

    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("https://www.Example.gr/Home"), "www.example.gr/home");
        assert_eq!(normalize_url("http://example.gr/home"), "example.gr/");
        assert_eq!(
            normalize_url("http://example.gr/external/index.jsp?id=1"),
            "example.gr/",
        );
        assert_eq!(normalize_url("https://example.gr/index.htm?a=b"), "example.gr/");
        assert_eq!(normalize_url("https://example.gr/páge"), "example.gr/pge");
    }

    #[test]
    fn test_document_formats() {
        assert_eq!(DocumentFormat::new("google", "Travel"), DocumentFormat::GoogleWeb);
        assert_eq!(DocumentFormat::new("google-news", "News"), DocumentFormat::GoogleNews);
        assert_eq!(DocumentFormat::new("bing", "News"), DocumentFormat::BingNews);
        assert_eq!(DocumentFormat::new("bing", "Travel"), DocumentFormat::Generic);
        assert_eq!(DocumentFormat::new("duckduckgo", "News"), DocumentFormat::Generic);
    }

    #[test]
    fn test_parse_pads_missing_results() {
        let document = generic_document(&[("https://a.gr", "A", "about a")]);
        let results =
            parse_document(Path::new("a"), &document, DocumentFormat::Generic, 3).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results.urls(), [Some("a.gr"), None, None]);
        assert_eq!(results.entries()[0].snippet.as_deref(), Some("about a"));
        assert_eq!(results.entries()[2], ResultEntry::no_result());
    }

    #[test]
    fn test_parse_bing_news() {
        let document = json!([{ "url": "https://a.gr", "name": "A", "description": "about a" }]);
        let results =
            parse_document(Path::new("a"), &document, DocumentFormat::BingNews, 1).unwrap();
        assert_eq!(results.entries()[0], ResultEntry::new("a.gr", "A", "about a"));
    }

    #[test]
    fn test_parse_google_without_items() {
        let results =
            parse_document(Path::new("a"), &json!({}), DocumentFormat::GoogleWeb, 2).unwrap();
        assert_eq!(results.urls(), [None, None]);

        let error = parse_document(Path::new("a"), &json!({}), DocumentFormat::Generic, 2);
        assert!(matches!(error, Err(StoreError::NotAList(_))));
    }

    #[test]
    fn test_query_of() {
        assert_eq!(query_of(Path::new("x/new-york-0.json")).unwrap(), "new-york");
        assert!(query_of(Path::new("x/athens.json")).is_err());
    }

    #[test]
    fn test_load_engine() {
        let store = ResultStore::new().unwrap();
        for day in ["2020-01-02", "2020-01-01"] {
            for query in ["crete", "athens"] {
                store
                    .add(
                        day,
                        "Travel",
                        "google",
                        query,
                        &google_document(&[
                            ("https://a.gr", "A", "about a"),
                            ("https://b.gr/index.asp?x=1", "B", "about b"),
                        ]),
                    )
                    .unwrap();
            }
        }
        store
            .add(
                "2020-01-01",
                "News",
                "google",
                "elections",
                &json!([{ "url": "https://c.gr", "title": "C", "abstract": "about c" }]),
            )
            .unwrap();

        let results = load_engine(&store.results(), "Travel", "google", 3).unwrap();
        assert_eq!(results.engine, "google");
        assert_eq!(
            results.days.keys().collect::<Vec<_>>(),
            ["2020-01-01", "2020-01-02"],
        );
        let queries = &results.days["2020-01-01"];
        assert_eq!(queries[0].0, "athens");
        assert_eq!(queries[1].0, "crete");
        assert_eq!(queries[0].1.urls(), [Some("a.gr"), Some("b.gr/"), None]);

        let pooled = load_engine(&store.results(), ALL_CATEGORIES, "google", 3).unwrap();
        let queries = &pooled.days["2020-01-01"];
        assert_eq!(queries.len(), 3);
        assert_eq!(queries[0].0, "elections");
        assert_eq!(queries[0].1.urls(), [Some("c.gr"), None, None]);

        let missing = load_engine(&store.results(), "Travel", "bing", 3).unwrap();
        assert!(missing.days.values().all(Vec::is_empty));
    }

    #[test]
    fn test_missing_store() {
        let store = ResultStore::new().unwrap();
        assert!(load_engine(&store.results(), "Travel", "google", 10).is_err());
    }

    #[test]
    fn test_too_many_results() {
        let store = ResultStore::new().unwrap();
        let error = load_engine(&store.results(), "Travel", "google", 11).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<StoreError>(),
            Some(StoreError::TooManyResults(11)),
        ));
    }
}
