//! selcov: CSS selector coverage harness
//!
//! Loads an HTML document, evaluates a JSON array of selector groups
//! against it and prints one `[count, group]` line per group.
//!
//! Exit status:
//! - 0: the document loaded and every group was evaluated
//! - 1: the document could not be loaded, or output failed
//! - 2: bad arguments or malformed selector data

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use selcov_common::logging::init_logging;
use selcov_common::warning::{Severity, report, set_color_enabled};
use selcov_coverage::dom::NodeId;
use selcov_coverage::html::format_tree;
use selcov_coverage::{CoverageSession, InputError, NdjsonSink, SelectorSource, StripMode};
use strum_macros::{Display, EnumString};

/// Report how many elements of an HTML document each selector group matches
#[derive(Parser, Debug)]
#[command(name = "selcov")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Inline selector data
    selcov . page.html '[["div.foo"], null, ["p", "span"]]'

    # Selector data from a file, with a summary on stderr
    selcov --summary /srv/site file:///srv/site/index.html @rules.json

    # Selector data from stdin
    extract-rules site.css | selcov . index.html -
"#)]
struct Cli {
    /// Directory a relative document path is resolved against
    #[arg(value_name = "ROOT")]
    root: PathBuf,

    /// Path or file:// URL of the HTML document
    #[arg(value_name = "DOCUMENT")]
    document: String,

    /// JSON array of selector groups; `@path` reads a file, `-` reads stdin
    #[arg(value_name = "SELECTORS")]
    selectors: String,

    /// Which occurrences of the stripped pseudo-classes to remove
    #[arg(long, value_name = "MODE", default_value_t = StripMode::All)]
    strip: StripMode,

    /// Print a coverage summary on stderr after the results
    #[arg(long)]
    summary: bool,

    /// Print the parsed DOM tree on stderr before evaluating
    #[arg(long)]
    print_tree: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// When to color diagnostics
    #[arg(long, value_name = "WHEN", default_value_t = ColorChoice::Auto)]
    color: ColorChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn enabled(self) -> bool {
        match self {
            Self::Auto => io::stderr().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    set_color_enabled(cli.color.enabled());
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report("CLI", Severity::Error, &format!("{err:#}"));
            exit_code_for(&err)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let opened = CoverageSession::open(&cli.root, &cli.document)?;

    if cli.print_tree {
        let tree = format_tree(&opened.document().dom, NodeId::ROOT);
        let mut stderr = io::stderr().lock();
        stderr.write_all(tree.as_bytes())?;
    }

    let source = SelectorSource::from_arg(&cli.selectors);
    let groups = source.load()?;
    tracing::info!(groups = groups.len(), "read selector data");

    let session = opened.prepare(cli.strip);
    let mut sink = NdjsonSink::new(io::stdout().lock(), io::stderr());
    let summary = session
        .run(&groups, &mut sink)
        .context("failed to write results")?;

    if cli.summary {
        writeln!(io::stderr().lock(), "{summary}")?;
    }
    Ok(())
}

/// Selector data problems are usage errors; everything else means the run
/// could not complete.
fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    if err.downcast_ref::<InputError>().is_some() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}
