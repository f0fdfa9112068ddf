// main.rs
mod app;
mod cli;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let args = cli::Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match args.folder.clone() {
        Some(folder) => cli::run_folder_mode(folder, &args),
        None => {
            app::run();
            Ok(ExitCode::SUCCESS)
        }
    }
}
