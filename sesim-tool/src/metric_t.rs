use std::{num::ParseFloatError, str::FromStr};

use anyhow::Error;
use structopt::StructOpt;

use sesim::{find_distance, Metric, TConfig};

use crate::{
    options::{Analysis, CategoryOutput},
    store::ALL_CATEGORIES,
};

/// Weights of the configurations, comma separated.
#[derive(Clone, Debug, PartialEq)]
pub struct Weights(Vec<f32>);

impl FromStr for Weights {
    type Err = ParseFloatError;

    fn from_str(weights: &str) -> Result<Self, Self::Err> {
        weights
            .split(',')
            .map(|weight| weight.trim().parse())
            .collect::<Result<_, _>>()
            .map(Self)
    }
}

/// Compares the rankings, titles and snippets with the composite T metric.
#[derive(StructOpt, Debug)]
pub struct MetricTCmd {
    /// The weights of the snippet distance.
    #[structopt(short, default_value = "0.8")]
    pub a: Weights,

    /// The weights of the title distance.
    #[structopt(short, default_value = "1")]
    pub b: Weights,

    /// The weights of the transposition penalty.
    #[structopt(short, default_value = "0.33")]
    pub c: Weights,

    /// Pools all categories and adds the mean similarity per day.
    #[structopt(long)]
    pub evol: bool,
}

impl MetricTCmd {
    pub fn run(self, analysis: &Analysis) -> Result<i32, Error> {
        let MetricTCmd { a, b, c, evol } = self;
        let config = TConfig::default().with_weights(&a.0, &b.0, &c.0)?;

        let categories = if evol {
            vec![ALL_CATEGORIES.to_string()]
        } else {
            analysis.categories.clone()
        };
        let mut outputs = Vec::with_capacity(categories.len());
        for category in &categories {
            let [first, second] = analysis.load(category)?;
            let report = find_distance(&first, &second, Metric::MetricT, analysis.depth, &config);
            let output = CategoryOutput::new(analysis, category, Metric::MetricT.name(), report);
            outputs.push(if evol { output.with_over_time() } else { output });
        }

        analysis.finish(&outputs)
    }
}
