use std::path::PathBuf;

use anyhow::{bail, Context, Error};
use ndarray::Array2;
use serde::Serialize;
use structopt::StructOpt;

use sesim::{DistanceReport, DistanceTensor, EngineResults};

use crate::{
    config::Config,
    exit_code::{NON_FATAL_ERROR, NO_ERROR},
    store::load_engine,
    utils::{print_json, spin_until_done},
};

/// Options shared by all commands.
#[derive(StructOpt, Debug)]
pub struct Options {
    /// The configuration file [default: $SESIM_CONFIG or ../.config.sea].
    #[structopt(long)]
    pub config: Option<PathBuf>,

    /// The two search engines to compare, comma separated.
    #[structopt(short, long, use_delimiter = true, required = true)]
    pub search_engines: Vec<String>,

    /// The query categories to analyze, comma separated [default: all categories].
    #[structopt(long, use_delimiter = true)]
    pub categories: Option<Vec<String>>,

    /// The number of top results compared per query.
    #[structopt(short = "N", default_value = "10")]
    pub depth: usize,

    /// Pretty prints the JSON output.
    #[structopt(long)]
    pub pretty: bool,
}

impl Options {
    /// Loads the configuration and validates the options against it.
    pub fn resolve(self) -> Result<Analysis, Error> {
        let Options {
            config,
            search_engines,
            categories,
            depth,
            pretty,
        } = self;

        let engines = match search_engines.as_slice() {
            [first, second] => [first.clone(), second.clone()],
            _ => bail!(
                "Exactly two search engines are required, got {}",
                search_engines.len()
            ),
        };
        let path = Config::path(config);
        let config = Config::load_from_file(&path)
            .with_context(|| format!("Loading configuration {} failed", path.display()))?;
        let categories = config.select_categories(categories)?;

        Ok(Analysis {
            config,
            engines,
            categories,
            depth,
            pretty,
        })
    }
}

/// The validated setup of an analysis.
#[derive(Debug)]
pub struct Analysis {
    pub config: Config,
    pub engines: [String; 2],
    pub categories: Vec<String>,
    pub depth: usize,
    pub pretty: bool,
}

impl Analysis {
    /// Loads the results of both engines for a category.
    pub fn load(&self, category: &str) -> Result<[EngineResults; 2], Error> {
        let [first, second] = &self.engines;
        spin_until_done(format!("Loading {} results", category), || {
            Ok::<_, Error>([
                load_engine(&self.config.results, category, first, self.depth)?,
                load_engine(&self.config.results, category, second, self.depth)?,
            ])
        })
        .with_context(|| format!("Loading the results of {} failed", category))
    }

    /// Prints the reports of all categories and reports cell errors on stderr.
    pub fn finish(&self, outputs: &[CategoryOutput<'_>]) -> Result<i32, Error> {
        print_json(&outputs, self.pretty)?;

        let mut exit_code = NO_ERROR;
        for output in outputs {
            for error in &output.errors {
                eprintln!("{}: {}", output.category, error);
                exit_code = NON_FATAL_ERROR;
            }
        }

        Ok(exit_code)
    }
}

/// The output of one category.
#[derive(Debug, Serialize)]
pub struct CategoryOutput<'a> {
    pub category: &'a str,
    pub engines: &'a [String; 2],
    pub metric: &'static str,
    pub tensor: DistanceTensor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub over_time: Option<Array2<f32>>,
    pub errors: Vec<String>,
}

impl<'a> CategoryOutput<'a> {
    pub fn new(
        analysis: &'a Analysis,
        category: &'a str,
        metric: &'static str,
        report: DistanceReport,
    ) -> Self {
        let DistanceReport { tensor, errors } = report;
        Self {
            category,
            engines: &analysis.engines,
            metric,
            tensor,
            over_time: None,
            errors: errors
                .into_iter()
                .map(|(key, error)| format!("{}: {}", key, error))
                .collect(),
        }
    }

    /// Adds the mean similarity per day.
    pub fn with_over_time(self) -> Self {
        let over_time = self.tensor.similarity_over_time();
        Self {
            over_time: Some(over_time),
            ..self
        }
    }
}
