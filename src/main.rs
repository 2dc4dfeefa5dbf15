use std::process::ExitCode;

use fs_inspect::output as out;

mod app;
mod cli;
mod logging;

fn main() -> ExitCode {
    let args = cli::parse();
    match app::run(args) {
        Ok(true) => ExitCode::SUCCESS,
        // Ran to completion, but with failed entries or no match.
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
