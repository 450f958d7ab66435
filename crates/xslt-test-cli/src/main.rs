//! Command-line runner for the XSLT golden-file regression suite

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, warn};
use xslt_test_harness::registry::{builtin_groups, select_groups};
use xslt_test_harness::{default_expander, Harness, HarnessConfig, PathExpander, PortableGlob};
use xsltproc_adapter::{XsltprocEngine, DEFAULT_PROGRAM};

#[derive(Parser, Debug)]
#[command(name = "xslt-runtest")]
#[command(version, about = "Run the XSLT regression fixtures against their golden files")]
struct Cli {
    /// Print a per-group summary line
    #[arg(short, long)]
    verbose: bool,

    /// Rewrite golden files from the current output instead of checking them
    #[arg(short, long)]
    update: bool,

    /// Suppress the per-group banners (`-quiet` is accepted too)
    #[arg(short, long)]
    quiet: bool,

    /// Write report.json and report.md into this directory
    #[arg(long)]
    out: Option<PathBuf>,

    /// xsltproc-compatible program to drive
    #[arg(long, env = "XSLT_ENGINE", default_value = DEFAULT_PROGRAM)]
    engine: PathBuf,

    /// Argument passed to the engine program before all others (repeatable)
    #[arg(long = "engine-arg", allow_hyphen_values = true)]
    engine_args: Vec<String>,

    /// Directory the group directories live in
    #[arg(long, env = "XSLT_SUITE_DIR", default_value = ".")]
    suite_dir: PathBuf,

    /// Use the directory-listing glob even where the native one is available
    #[arg(long)]
    portable_glob: bool,

    /// Only run groups whose description equals or contains one of these
    filters: Vec<String>,
}

/// Accept the historical single-dash `-quiet` spelling.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            if arg == "-quiet" {
                OsString::from("--quiet")
            } else {
                arg
            }
        })
        .collect()
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();

    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            debug!("fatal: {e:#}");
            eprintln!("Exiting tests on fatal error");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let engine = XsltprocEngine::new(cli.engine.clone()).with_leading_args(cli.engine_args.clone());
    let expander: Box<dyn PathExpander> = if cli.portable_glob {
        Box::new(PortableGlob)
    } else {
        default_expander()
    };
    let config = HarnessConfig::new(&cli.suite_dir)
        .with_update_mode(cli.update)
        .with_verbose(cli.verbose)
        .with_quiet(cli.quiet)
        .with_expander(expander);

    let mut harness = Harness::initialize(engine, config).context("engine initialization")?;

    let groups = builtin_groups();
    for group in select_groups(&groups, &cli.filters) {
        harness.run_reported(group);
    }

    let counters = harness.counters();
    println!("{}", counters.summary());

    if let Some(dir) = &cli.out {
        if let Err(e) = harness.report().write_to_dir(dir) {
            warn!(dir = %dir.display(), error = %e, "run report not written");
            return Err(e).context("writing run report");
        }
    }

    Ok(if counters.exit_status() == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
