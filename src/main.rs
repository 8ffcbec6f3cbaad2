use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::process;

use clap::Parser;
use scoretree::cli::Cli;
use scoretree::{Result, Session};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut session = Session::new(cli.settings());
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match cli.input_path() {
        Some(path) => {
            tracing::info!(path = %path.display(), "reading commands from file");
            let file = File::open(path)?;
            session.run(BufReader::new(file), &mut out)?;
        }
        None => {
            tracing::info!("reading commands from standard input");
            session.run(io::stdin().lock(), &mut out)?;
        }
    }

    session.write_report(&mut out)?;
    out.flush()?;
    Ok(())
}

/// `-d` flags pick the default level; `RUST_LOG` directives refine it.
fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    tracing::debug!(%level, "logging initialised");
}
