use std::{
    collections::BTreeMap,
    env::var_os,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Error};
use serde::Deserialize;

/// The environment variable pointing to the configuration file.
pub const CONFIG_ENV: &str = "SESIM_CONFIG";

/// The configuration file looked up if neither the option nor the environment variable is set.
pub const DEFAULT_CONFIG: &str = "../.config.sea";

/// The query categories and the location of the result store.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// The queries per category.
    pub categories: BTreeMap<String, Vec<String>>,
    /// The root directory of the result store.
    pub results: PathBuf,
}

impl Config {
    /// Resolves the path of the configuration file: the explicit path, then the environment
    /// variable, then the default.
    pub fn path(explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| var_os(CONFIG_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
    }

    pub fn load_from_file(path: &Path) -> Result<Self, Error> {
        if !path.is_file() {
            bail!("Given path {} is not a file", path.display());
        }
        let file = File::open(path)?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Your configuration file {} is not valid", path.display()))
    }

    /// Validates the requested categories, all categories are selected if none are requested.
    pub fn select_categories(&self, requested: Option<Vec<String>>) -> Result<Vec<String>, Error> {
        match requested {
            Some(requested) => {
                if let Some(unknown) = requested
                    .iter()
                    .find(|category| !self.categories.contains_key(*category))
                {
                    bail!("Unknown query category {}", unknown);
                }
                Ok(requested)
            }
            None => Ok(self.categories.keys().cloned().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use test_utils::ResultStore;

    use super::*;

    #[test]
    fn test_load() {
        let store = ResultStore::new().unwrap();
        let path = store
            .config(&[("Travel", &["athens", "crete"]), ("News", &["elections"])])
            .unwrap();
        let config = Config::load_from_file(&path).unwrap();

        assert_eq!(config.results, store.results());
        assert_eq!(config.categories["Travel"], ["athens", "crete"]);
        assert_eq!(
            config.select_categories(None).unwrap(),
            ["News", "Travel"],
        );
    }

    #[test]
    fn test_extra_keys_are_allowed() {
        let store = ResultStore::new().unwrap();
        let path = store.path().join("config.json");
        write(
            &path,
            r#"{"categories": {"Travel": ["athens"]}, "results": "res", "Sports": ["football"]}"#,
        )
        .unwrap();
        let config = Config::load_from_file(&path).unwrap();

        assert_eq!(config.results, PathBuf::from("res"));
        assert_eq!(config.categories.len(), 1);
    }

    #[test]
    fn test_missing_keys() {
        let store = ResultStore::new().unwrap();
        let path = store.path().join("config.json");
        write(&path, r#"{"categories": {"Travel": ["athens"]}}"#).unwrap();

        let error = Config::load_from_file(&path).unwrap_err();
        assert!(error.to_string().contains("is not valid"));
    }

    #[test]
    fn test_not_a_file() {
        let store = ResultStore::new().unwrap();
        assert!(Config::load_from_file(store.path()).is_err());
    }

    #[test]
    fn test_select_categories() {
        let store = ResultStore::new().unwrap();
        let path = store.config(&[("Travel", &["athens"])]).unwrap();
        let config = Config::load_from_file(&path).unwrap();

        assert_eq!(
            config
                .select_categories(Some(vec!["Travel".into()]))
                .unwrap(),
            ["Travel"],
        );
        let error = config
            .select_categories(Some(vec!["Sports".into()]))
            .unwrap_err();
        assert_eq!(error.to_string(), "Unknown query category Sports");
    }

    #[test]
    fn test_explicit_path_wins() {
        let explicit = PathBuf::from("explicit.sea");
        assert_eq!(Config::path(Some(explicit.clone())), explicit);
    }
}
