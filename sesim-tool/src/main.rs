use std::process::exit;

use anyhow::Error;
use structopt::StructOpt;

use crate::{exit_code::FATAL_ERROR, options::Options};

mod config;
mod exit_code;
mod metric_t;
mod options;
mod rank;
mod store;
mod utils;

/// Similarity analysis of the result rankings of two search engines.
#[derive(StructOpt, Debug)]
struct Args {
    #[structopt(flatten)]
    options: Options,

    #[structopt(subcommand)]
    cmd: CommandArgs,
}

#[derive(StructOpt, Debug)]
enum CommandArgs {
    Rank(rank::RankCmd),
    MetricT(metric_t::MetricTCmd),
}

impl Args {
    fn run(self) -> Result<i32, Error> {
        let analysis = self.options.resolve()?;
        match self.cmd {
            CommandArgs::Rank(cmd) => cmd.run(&analysis),
            CommandArgs::MetricT(cmd) => cmd.run(&analysis),
        }
    }
}

fn main() {
    env_logger::init();

    let exit_code = match Args::from_args().run() {
        Ok(exit_code) => exit_code,
        Err(error) => {
            eprintln!("{:?}", error);
            FATAL_ERROR
        }
    };

    exit(exit_code);
}
