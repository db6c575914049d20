use anyhow::{bail, Error};
use structopt::StructOpt;

use sesim::{find_distance, Metric, TConfig};

use crate::options::{Analysis, CategoryOutput};

/// Compares the rankings with a basic metric per category.
#[derive(StructOpt, Debug)]
pub struct RankCmd {
    /// The metric: LEV, DAM-LEV, HAM, JAR, JAR-WIN, PYTHON, KENDALL, SPEARMAN, G or M.
    #[structopt(long, parse(try_from_str = parse_basic_metric))]
    pub metric: Metric,
}

fn parse_basic_metric(name: &str) -> Result<Metric, Error> {
    let metric = name.parse::<Metric>()?;
    if metric.is_composite() {
        bail!("{} requires texts, use the metric-t command instead", metric);
    }
    Ok(metric)
}

impl RankCmd {
    pub fn run(self, analysis: &Analysis) -> Result<i32, Error> {
        let mut outputs = Vec::with_capacity(analysis.categories.len());
        for category in &analysis.categories {
            let [first, second] = analysis.load(category)?;
            let report = find_distance(
                &first,
                &second,
                self.metric,
                analysis.depth,
                &TConfig::default(),
            );
            outputs.push(CategoryOutput::new(
                analysis,
                category,
                self.metric.name(),
                report,
            ));
        }

        analysis.finish(&outputs)
    }
}
