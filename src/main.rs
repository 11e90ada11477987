// main.rs
mod cli;

use clap::Parser;
use cli::Args;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = cli::run(args) {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}
