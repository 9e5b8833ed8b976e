mod cli;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    init_tracing();
    std::process::exit(cli::run_from_env());
}

// stdout carries results only; diagnostics go to stderr.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
