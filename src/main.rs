//! `topica` command-line entry point.

use std::io::Write;
use std::process;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use topica::cli::args::TopicaArgs;
use topica::cli::commands::execute_command;

/// `-q` → errors only, default → warnings, `-v` → info, `-vv` and up → debug.
fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

fn init_logging(verbosity: u8) {
    // TOPICA_LOG overrides the flag-derived level, e.g. TOPICA_LOG=topica::store=debug.
    Builder::new()
        .filter_level(level_for(verbosity))
        .parse_env("TOPICA_LOG")
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .init();
}

fn main() {
    let args = TopicaArgs::parse();
    init_logging(args.verbosity());

    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
