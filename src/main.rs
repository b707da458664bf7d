//! img2pdf: turn a set of image files into one multi-page PDF.

use std::env;
use std::process::ExitCode;

mod cli;
mod collector;
mod config;
mod error;
mod page;
mod workflow;

use cli::{OPT_HELP, ParsedArgs};
use config::Config;

fn main() -> ExitCode {
    let args = ParsedArgs::parse(env::args().skip(1));

    if args.flag(&OPT_HELP) {
        print!("{}", cli::usage());
        return ExitCode::SUCCESS;
    }

    // No arguments at all means "convert the current directory with
    // defaults"; resolution itself cannot fail.
    let config = Config::resolve(&args);

    match workflow::run(&config) {
        Ok(path) => {
            println!("PDF created: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
