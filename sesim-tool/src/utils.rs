use anyhow::Error;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

/// Runs `func` while a spinner with the message is shown on stderr.
pub(crate) fn spin_until_done<R>(message: String, func: impl FnOnce() -> R) -> R {
    let spinner = ProgressBar::new_spinner().with_style(
        ProgressStyle::default_spinner().template("{spinner:.green} {msg} {elapsed:>8}"),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(100);
    let result = func();
    spinner.finish_and_clear();
    result
}

/// Prints a value as JSON to stdout.
pub(crate) fn print_json(value: &impl Serialize, pretty: bool) -> Result<(), Error> {
    let serialized = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", serialized);

    Ok(())
}
