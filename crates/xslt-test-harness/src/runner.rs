//! Test group runner
//!
//! [`Harness`] owns the process-scoped state of a run: the engine, the
//! diagnostic buffer it reports into, the golden comparator and the run
//! counters. It is initialized once, then runs groups strictly one case at
//! a time.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};
use xslt_engine_traits::{EngineSettings, XsltEngine};

use crate::capture::CapturedDiagnostics;
use crate::console::Console;
use crate::discovery::{default_expander, PathExpander};
use crate::error::Result;
use crate::executor::{CaseContext, CaseOutcome};
use crate::golden::GoldenComparator;
use crate::registry::TestGroup;
use crate::reporter::{CaseReport, GroupReport, RunReport};

/// Settings fixed for the whole run.
pub struct HarnessConfig {
    /// Directory group directories are relative to
    pub suite_root: PathBuf,
    /// Rewrite golden files instead of checking them
    pub update_mode: bool,
    /// Print a `Ran ...` line after each group
    pub verbose: bool,
    /// Suppress the `## Running ...` banners
    pub quiet: bool,
    pub engine_settings: EngineSettings,
    pub expander: Box<dyn PathExpander>,
}

impl HarnessConfig {
    pub fn new(suite_root: impl Into<PathBuf>) -> Self {
        Self {
            suite_root: suite_root.into(),
            update_mode: false,
            verbose: false,
            quiet: false,
            engine_settings: EngineSettings::default(),
            expander: default_expander(),
        }
    }

    pub fn with_update_mode(mut self, update: bool) -> Self {
        self.update_mode = update;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_expander(mut self, expander: Box<dyn PathExpander>) -> Self {
        self.expander = expander;
        self
    }
}

/// Counts for the whole run. Only ever incremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    pub tests_run: usize,
    /// Cases that failed; never more than `tests_run`
    pub errors_observed: usize,
    /// Groups that could not start
    pub setup_errors: usize,
}

impl RunCounters {
    pub fn total_errors(&self) -> usize {
        self.errors_observed + self.setup_errors
    }

    /// The final `Total ...` line.
    pub fn summary(&self) -> String {
        format!("Total {}", tests_and_errors(self.tests_run, self.total_errors()))
    }

    /// Process exit status for this run.
    pub fn exit_status(&self) -> i32 {
        if self.total_errors() == 0 {
            0
        } else {
            1
        }
    }
}

fn tests_and_errors(tests: usize, errors: usize) -> String {
    match errors {
        0 => format!("{tests} tests, no errors"),
        n => format!("{tests} tests, {n} errors"),
    }
}

pub struct Harness<E: XsltEngine> {
    engine: E,
    config: HarnessConfig,
    comparator: GoldenComparator,
    diagnostics: CapturedDiagnostics,
    counters: RunCounters,
    console: Console,
    report: RunReport,
}

impl<E: XsltEngine> Harness<E> {
    /// Configure the engine once and set up the run state.
    pub fn initialize(mut engine: E, config: HarnessConfig) -> Result<Self> {
        engine.configure(&config.engine_settings)?;
        debug!(
            engine = engine.name(),
            expander = config.expander.name(),
            suite_root = %config.suite_root.display(),
            update = config.update_mode,
            "harness initialized"
        );
        let report = RunReport::new(engine.name(), config.update_mode);
        Ok(Self {
            comparator: GoldenComparator::new(config.update_mode),
            engine,
            config,
            diagnostics: CapturedDiagnostics::new(),
            counters: RunCounters::default(),
            console: Console::default(),
            report,
        })
    }

    /// Send user-visible lines somewhere other than stdout/stderr.
    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    pub fn counters(&self) -> RunCounters {
        self.counters
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Run every case of `group`. Returns the number of failures, a group
    /// that could not start counting as one.
    pub fn run_group(&mut self, group: &TestGroup) -> usize {
        let started = Instant::now();
        let mut report = GroupReport {
            description: group.description.to_string(),
            directory: group.directory.map(str::to_string),
            pattern: group.pattern.map(str::to_string),
            tests: 0,
            errors: 0,
            cases: Vec::new(),
        };

        let base_dir = match group.directory {
            Some(dir) => {
                let base = self.config.suite_root.join(dir);
                if !base.is_dir() {
                    self.console
                        .err_line(format_args!("Can't change directory to {dir}"));
                    debug!(base = %base.display(), "group directory unreadable");
                    self.counters.setup_errors += 1;
                    report.errors = 1;
                    self.report.push_group(report);
                    return 1;
                }
                base
            }
            None => self.config.suite_root.clone(),
        };

        let failures = match group.pattern {
            Some(pattern) => {
                let paths = self.config.expander.expand(&base_dir, pattern);
                let mut failures = 0;
                for path in &paths {
                    if self.run_case(group, &base_dir, Some(path), &mut report) {
                        failures += 1;
                    }
                }
                failures
            }
            None => usize::from(self.run_case(group, &base_dir, None, &mut report)),
        };

        info!(
            group = group.description,
            tests = report.tests,
            errors = failures,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "group finished"
        );
        report.errors = failures;
        self.report.push_group(report);
        failures
    }

    /// Returns `true` when the case failed.
    fn run_case(
        &mut self,
        group: &TestGroup,
        base_dir: &Path,
        path: Option<&Path>,
        report: &mut GroupReport,
    ) -> bool {
        self.diagnostics.reset();
        self.counters.tests_run += 1;
        report.tests += 1;

        let mut ctx = CaseContext {
            engine: &mut self.engine,
            diagnostics: &mut self.diagnostics,
            comparator: &self.comparator,
            console: &mut self.console,
            base_dir,
        };
        let outcome = group.handler.run(&mut ctx, path, group.options);

        let failed = outcome.is_failure();
        if failed {
            let name = path.map(|p| p.display().to_string()).unwrap_or_default();
            self.console
                .err_line(format_args!("File {name} generated an error"));
            self.counters.errors_observed += 1;
        }
        if let CaseOutcome::Skipped(reason) = &outcome {
            debug!(group = group.description, reason = %reason, "case skipped");
        }
        report
            .cases
            .push(CaseReport::new(path.unwrap_or(Path::new("")), &outcome));

        self.diagnostics.reset();
        failed
    }

    /// Run `group` with its banner and, in verbose mode, its `Ran` line.
    /// Returns 1 if any case failed, 0 otherwise.
    pub fn run_reported(&mut self, group: &TestGroup) -> usize {
        if !self.config.quiet {
            self.console
                .out_line(format_args!("## Running {}", group.description));
        }
        let before = self.counters;
        let failures = self.run_group(group);
        if self.config.verbose {
            let tests = self.counters.tests_run - before.tests_run;
            let errors = self.counters.total_errors() - before.total_errors();
            self.console
                .out_line(format_args!("Ran {}", tests_and_errors(tests, errors)));
        }
        usize::from(failures > 0)
    }
}
