//! `urbanflux` entry point.

use clap::Parser;
use urbanflux_cli::{handler, Cli};

fn main() {
    let cli = Cli::parse();
    urbanflux_core::tracing::init_tracing();

    if let Err(e) = handler::run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
