/*!
 * Command-line interface for repodump
 */

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use repodump::config::{Args, Config, Source};
use repodump::git::GitProgress;
use repodump::report::print_summary;
use repodump::{Result, Session};

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "repodump", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    setup_tracing(&args);

    match Config::from_args(args).and_then(run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn setup_tracing(args: &Args) {
    if let Some(level) = args.log_level.to_tracing_level() {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .without_time()
            .compact()
            .init();
    }
}

fn run(config: Config) -> Result<()> {
    let progress = clone_progress_bar(&config);
    let report = |p: &GitProgress| {
        progress.set_length(p.total_objects as u64);
        progress.set_position(p.received_objects as u64);
        progress.set_message(p.formatted_bytes());
    };

    let session = Session::prepare(config, Some(&report));
    progress.finish_and_clear();

    let summary = session?.run()?;
    print_summary(&summary);

    Ok(())
}

/// Progress bar shown while cloning; hidden for local sources
fn clone_progress_bar(config: &Config) -> ProgressBar {
    let Source::Remote(info) = &config.source else {
        return ProgressBar::hidden();
    };

    let progress = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} {prefix:.bold.cyan} {bar:30.cyan/blue} {pos}/{len} objects ({msg})")
    {
        progress.set_style(style);
    }
    progress.set_prefix(format!("Cloning {}", info));
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}
