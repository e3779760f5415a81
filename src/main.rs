//! gitr: clone repositories to organized, deterministic paths

use std::process::ExitCode;

fn main() -> ExitCode {
    match gitr::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            gitr::cli::ui::report_error(&err);
            ExitCode::FAILURE
        }
    }
}
