//! Seedling CLI entry point.

use clap::Parser;
use colored::Colorize;

mod cli;
mod commands;
mod ui;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli.execute() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
