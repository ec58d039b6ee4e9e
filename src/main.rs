//! Friday - an interactive task-list assistant

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = friday::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
