use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use redcap_core::{ExpansionStats, GroupOutline, Pipeline};
use redcap_ingest::{load_plurals, read_dictionary, write_dictionary};
use tracing::{info, info_span};

use crate::cli::{CheckArgs, ExpandArgs};

/// Outcome of `redcap-repeat expand`.
#[derive(Debug)]
pub struct ExpandResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub stats: ExpansionStats,
    pub groups: Vec<GroupOutline>,
}

/// Outcome of `redcap-repeat check`.
#[derive(Debug)]
pub struct CheckResult {
    pub input: PathBuf,
    pub records: usize,
    pub groups: Vec<GroupOutline>,
}

pub fn run_expand(args: &ExpandArgs) -> Result<ExpandResult> {
    run_expand_in(args, Path::new("."))
}

/// Runs `expand`, looking for the default plural table in `working_dir`.
///
/// The output file is written only when both passes succeed.
pub fn run_expand_in(args: &ExpandArgs, working_dir: &Path) -> Result<ExpandResult> {
    let span = info_span!("expand_command", input = %args.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let plurals =
        load_plurals(args.plurals.as_deref(), working_dir).context("load plural table")?;
    let dictionary = read_dictionary(&args.input).context("read data dictionary")?;
    let pipeline = Pipeline::new(args.options(plurals));
    let expansion = pipeline
        .run(&dictionary.records)
        .with_context(|| format!("expand {}", args.input.display()))?;

    write_dictionary(&args.output, &dictionary.with_records(expansion.records))
        .context("write expanded dictionary")?;
    info!(
        output = %args.output.display(),
        records = expansion.stats.output_records,
        duration_ms = start.elapsed().as_millis(),
        "expansion complete"
    );

    Ok(ExpandResult {
        input: args.input.clone(),
        output: args.output.clone(),
        stats: expansion.stats,
        groups: expansion.groups,
    })
}

pub fn run_check(args: &CheckArgs) -> Result<CheckResult> {
    let span = info_span!("check_command", input = %args.input.display());
    let _guard = span.enter();

    let dictionary = read_dictionary(&args.input).context("read data dictionary")?;
    let groups = Pipeline::default()
        .check(&dictionary.records)
        .with_context(|| format!("check {}", args.input.display()))?;
    Ok(CheckResult {
        input: args.input.clone(),
        records: dictionary.records.len(),
        groups,
    })
}
