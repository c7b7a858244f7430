use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context as _;
use colored::*;
use contactbook_common::error::ApiError;
use contactbook_common::models::ContactField;
use contactbook_core::import::{
    self, ColumnMapping, ColumnTarget, ImportError, ImportService, MappingOutcome, ParsedTable,
    template,
};
use tracing::{Instrument, warn};

use crate::commands::Context;
use crate::mprint;
use crate::terminal::{colors, format, print, prompt, spinner};

const SAMPLE_VALUES: usize = 3;

/// `--map header=target` given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOverride {
    pub header: String,
    pub target: ColumnTarget,
}

impl FromStr for ColumnOverride {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (header, target) = s
            .rsplit_once('=')
            .ok_or_else(|| ImportError::UnknownTarget(s.to_owned()))?;
        Ok(Self {
            header: header.trim().to_owned(),
            target: target.parse()?,
        })
    }
}

pub struct ImportOptions {
    pub mappings: Vec<ColumnOverride>,
    pub dry_run: bool,
    pub batch_size: usize,
    pub assume_yes: bool,
}

pub async fn import(ctx: &Context, file: &Path, options: ImportOptions) -> anyhow::Result<()> {
    print::header("import");
    let table = import::read_table(file).with_context(|| format!("failed to read {}", file.display()))?;
    if table.rows.is_empty() {
        print::no_results("records");
        return Ok(());
    }
    print::print_status(format!(
        "{} records, {} columns",
        table.rows.len().to_string().bold(),
        table.headers.len()
    ));

    let mapping = resolve_mapping(&table, &options)?;
    print_mapping(&mapping);

    let prepared = mapping.apply(&table);
    if !prepared.skipped.is_empty() {
        warn!(
            records = ?prepared.skipped,
            "skipping {} record(s) without name or email",
            prepared.skipped.len()
        );
    }

    if options.dry_run {
        mprint!();
        print::header("dry run");
        for row in prepared.rows.iter().take(5) {
            format::contact_tree(&row.contact, false);
        }
        print::print_status(format!(
            "{} contact(s) would be created, {} skipped",
            prepared.rows.len(),
            prepared.skipped.len()
        ));
        return Ok(());
    }

    let service = ImportService::new(ctx.api.clone(), options.batch_size);
    let bar = spinner::progress_bar(prepared.rows.len());
    let summary = service
        .submit(&prepared, |progress| {
            let message = format!("{} imported, {} failed", progress.imported, progress.failed);
            spinner::advance(&bar, progress.processed, &message);
        })
        .instrument(bar.clone())
        .await;
    drop(bar);

    mprint!();
    print::header("import summary");
    print::as_tree_one_level(format::import_summary(&summary));
    if !summary.errors.is_empty() {
        mprint!();
        let errors = summary
            .errors
            .iter()
            .map(|e| (format!("record {}", e.record), e.message.clone().red()))
            .collect();
        print::as_tree_one_level(errors);
    }

    if summary.aborted {
        return Err(ApiError::Unauthorized).context("import stopped");
    }
    if summary.failed > 0 {
        anyhow::bail!("{} record(s) could not be imported", summary.failed);
    }
    Ok(())
}

/// Automatic header mapping, then command-line overrides, then questions for
/// whatever is still unknown.
fn resolve_mapping(table: &ParsedTable, options: &ImportOptions) -> anyhow::Result<ColumnMapping> {
    let outcome = ColumnMapping::auto(&table.headers);
    if let MappingOutcome::NeedsReview { unmapped, .. } = &outcome {
        let names: Vec<&str> = unmapped.iter().map(|&c| table.headers[c].as_str()).collect();
        print::print_status(format!("unrecognised columns: {}", names.join(", ").yellow()));
    }

    let mut mapping = outcome.into_mapping();
    for column in &options.mappings {
        mapping
            .assign_header(&column.header, column.target)
            .context("invalid --map")?;
    }
    if mapping.is_complete() {
        return Ok(mapping);
    }

    if options.assume_yes || !prompt::is_interactive() {
        warn!("skipping {} unmapped column(s)", mapping.unmapped().len());
        mapping.skip_unmapped();
        return Ok(mapping);
    }

    mprint!();
    print::print_status(format!(
        "fields: {}, full_name, skip",
        ContactField::ALL.map(|f| f.key()).join(", ").color(colors::SEPARATOR)
    ));
    for column in mapping.unmapped() {
        let target = ask_target(table, column)?;
        mapping.assign(column, target)?;
    }
    Ok(mapping)
}

fn ask_target(table: &ParsedTable, column: usize) -> anyhow::Result<ColumnTarget> {
    let samples: Vec<&str> = (0..table.rows.len())
        .map(|row| table.cell(row, column))
        .filter(|value| !value.is_empty())
        .take(SAMPLE_VALUES)
        .collect();
    let question = format!(
        "Map column {} (e.g. {}) to [skip]:",
        table.headers[column].bold(),
        samples.join(" | ").italic()
    );

    loop {
        let answer = prompt::ask(&question).context("failed to read answer")?;
        if answer.is_empty() {
            return Ok(ColumnTarget::Skip);
        }
        match answer.parse::<ColumnTarget>() {
            Ok(target) => return Ok(target),
            Err(error) => warn!("{error}"),
        }
    }
}

fn print_mapping(mapping: &ColumnMapping) {
    if print::quiet() > 0 {
        return;
    }
    let details = mapping
        .headers()
        .iter()
        .enumerate()
        .map(|(column, header)| {
            let target = match mapping.target(column) {
                Some(ColumnTarget::Skip) | None => "skip".color(colors::EMPTY),
                Some(target) => target.to_string().color(colors::ACCENT),
            };
            (header.clone(), target)
        })
        .collect();
    print::as_tree_one_level(details);
}

pub fn template(json: bool, out: Option<&Path>) -> anyhow::Result<()> {
    let rendered = if json { template::json()? } else { template::csv()? };
    match out {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))?;
            print::print_status(format!("Template saved to {}", path.display().to_string().bold()));
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
