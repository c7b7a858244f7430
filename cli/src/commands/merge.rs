use anyhow::Context as _;
use colored::*;
use contactbook_core::contacts::FieldEdit;
use contactbook_core::duplicates::find_duplicates;
use contactbook_core::merge::{MergeError, MergeService};

use crate::commands::Context;
use crate::mprint;
use crate::terminal::{colors, format, print, prompt, spinner};

pub async fn merge(
    ctx: &Context,
    primary: i64,
    secondary: i64,
    overrides: &[FieldEdit],
    yes: bool,
) -> anyhow::Result<()> {
    let service = MergeService::new(ctx.api.clone());
    let mut proposal = spinner::with_spinner("Loading contacts...", service.propose(primary, secondary))
        .await
        .context("cannot prepare merge")?;
    for edit in overrides {
        proposal.set(edit.field, edit.value.clone());
    }

    print::header("merge preview");
    print::print_status(format!(
        "#{} {} absorbs #{} {}",
        primary,
        proposal.primary().display_name().color(colors::PRIMARY),
        secondary,
        proposal.secondary().display_name().color(colors::OLD_VALUE)
    ));
    mprint!();
    format::merge_preview(&proposal);
    mprint!();

    let question = format!("Save the merged contact and delete #{secondary}?");
    if !yes && !prompt::confirm(&question).context("failed to read answer")? {
        print::print_status("Merge cancelled");
        return Ok(());
    }

    match service.apply(proposal).await {
        Ok(merged) => {
            print::print_status(format!(
                "Merged into #{} {}",
                primary,
                merged.display_name().color(colors::PRIMARY).bold()
            ));
            Ok(())
        }
        Err(MergeError::SecondaryNotDeleted { merged, source }) => {
            print::print_status(format!(
                "#{} was updated, but #{} still exists",
                primary,
                secondary
            ));
            format::contact_tree(&merged, true);
            Err(MergeError::SecondaryNotDeleted { merged, source })
                .context(format!("delete #{secondary} manually to finish the merge"))
        }
        Err(error) => Err(error).context("merge failed"),
    }
}

pub async fn duplicates(ctx: &Context) -> anyhow::Result<()> {
    let contacts = spinner::with_spinner("Loading contacts...", ctx.api.list_contacts())
        .await
        .context("failed to list contacts")?;
    let pairs = find_duplicates(&contacts);

    print::header("possible duplicates");
    if pairs.is_empty() {
        print::no_results("duplicates");
        return Ok(());
    }
    for pair in &pairs {
        print::print(&format::duplicate_line(pair, &contacts));
    }
    if print::quiet() == 0 {
        mprint!();
        print::print_status(format!(
            "run {} to combine a pair",
            "contactbook merge <primary> <secondary>".bold()
        ));
    }
    Ok(())
}
