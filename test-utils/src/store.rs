use std::{
    fs::{create_dir_all, write},
    io::{Error, ErrorKind, Result},
    path::{Path, PathBuf},
};

use serde_json::{json, Value};
use tempfile::TempDir;

/// A result store in a temporary directory, removed on drop.
///
/// Documents are laid out as `results/<day>/<category>/<engine>/<query>-<suffix>.json`.
pub struct ResultStore {
    dir: TempDir,
}

impl ResultStore {
    pub fn new() -> Result<Self> {
        TempDir::new().map(|dir| Self { dir })
    }

    /// The root of the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The directory holding the result documents.
    pub fn results(&self) -> PathBuf {
        self.path().join("results")
    }

    /// Writes a result document.
    pub fn add(
        &self,
        day: &str,
        category: &str,
        engine: &str,
        query: &str,
        document: &Value,
    ) -> Result<PathBuf> {
        let dir = self.results().join(day).join(category).join(engine);
        create_dir_all(&dir)?;
        let path = dir.join(format!("{}-0.json", query));
        let document = serde_json::to_vec(document)
            .map_err(|error| Error::new(ErrorKind::InvalidData, error.to_string()))?;
        write(&path, document)?;

        Ok(path)
    }

    /// Writes the configuration file of the store, listing the queries per category.
    pub fn config(&self, categories: &[(&str, &[&str])]) -> Result<PathBuf> {
        let categories = categories
            .iter()
            .map(|(category, queries)| (category.to_string(), json!(queries)))
            .collect::<serde_json::Map<_, _>>();
        let config = json!({
            "categories": categories,
            "results": self.results(),
        });
        let path = self.path().join(".config.sea");
        write(&path, config.to_string())?;

        Ok(path)
    }
}

/// A document in the common format `[{url, title, description}]`.
pub fn generic_document(results: &[(&str, &str, &str)]) -> Value {
    results
        .iter()
        .map(|(url, title, description)| {
            json!({ "url": url, "title": title, "description": description })
        })
        .collect()
}

/// A document in the format of the google web search `{"items": [{link, title, snippet}]}`.
pub fn google_document(results: &[(&str, &str, &str)]) -> Value {
    let items = results
        .iter()
        .map(|(link, title, snippet)| json!({ "link": link, "title": title, "snippet": snippet }))
        .collect::<Vec<_>>();
    json!({ "items": items })
}
