#![forbid(unsafe_code)]

//! fng: filename length guard CLI entry point.

use clap::Parser;

mod cli_app;

fn main() {
    let args = cli_app::Cli::parse();
    match cli_app::run(&args) {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("fng: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
