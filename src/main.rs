//! Fridge - command-line tool for compositing BasePaint magnets

use std::process::ExitCode;

use fridge::cli;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    cli::run()
}
