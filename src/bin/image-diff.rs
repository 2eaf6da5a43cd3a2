use std::env;
use std::process;

use diff_tools::{ComparisonRequest, run_default};

fn main() {
    // RUST_LOG controls verbosity; stdout stays reserved for the statistics.
    env_logger::init();

    if let Err(e) = ComparisonRequest::from_args(env::args_os()).and_then(|req| run_default(&req)) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}
