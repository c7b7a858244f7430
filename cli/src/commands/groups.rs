use anyhow::Context as _;
use colored::*;
use contactbook_common::error::ApiError;
use contactbook_core::bulk::{BulkOutcome, BulkService, Selection};
use contactbook_core::groups::GroupsService;

use crate::commands::{Context, GroupsCommand};
use crate::mprint;
use crate::terminal::{colors, format, print, prompt, spinner};

fn service(ctx: &Context) -> GroupsService {
    GroupsService::new(ctx.api.clone())
}

pub async fn run(ctx: &Context, command: GroupsCommand) -> anyhow::Result<()> {
    let groups = service(ctx);
    match command {
        GroupsCommand::List => {
            let list = spinner::with_spinner("Loading groups...", groups.list())
                .await
                .context("failed to list groups")?;
            print::header("groups");
            if list.is_empty() {
                print::no_results("groups");
            }
            for group in &list {
                print::print(&format::group_line(group));
            }
        }
        GroupsCommand::Create { name, description } => {
            let group = groups
                .create(&name, description)
                .await
                .context("failed to create group")?;
            print::print_status(format!("Created {}", format::group_line(&group)));
        }
        GroupsCommand::Rename {
            group,
            name,
            description,
        } => {
            let existing = groups.resolve(&group).await.context("failed to look up group")?;
            let renamed = groups
                .rename(&existing, &name, description)
                .await
                .context("failed to rename group")?;
            print::print_status(format!("Renamed to {}", format::group_line(&renamed)));
        }
        GroupsCommand::Delete { group, yes } => {
            let existing = groups.resolve(&group).await.context("failed to look up group")?;
            let question = format!("Delete group {:?}? Its contacts are kept.", existing.name);
            if !yes && !prompt::confirm(&question).context("failed to read answer")? {
                print::print_status("Nothing deleted");
                return Ok(());
            }
            groups.delete(&existing).await.context("failed to delete group")?;
            print::print_status(format!("Deleted group {}", existing.name.color(colors::GROUP)));
        }
        GroupsCommand::Members { group } => {
            let existing = groups.resolve(&group).await.context("failed to look up group")?;
            let members = spinner::with_spinner("Loading members...", groups.members(&existing))
                .await
                .context("failed to list group members")?;
            print::header(&existing.name);
            if members.is_empty() {
                print::no_results("members");
            }
            for contact in &members {
                print::print(&format::contact_line(contact));
            }
        }
    }
    Ok(())
}

pub async fn assign(ctx: &Context, group: &str, ids: Vec<i64>) -> anyhow::Result<()> {
    let group = service(ctx).resolve(group).await.context("failed to look up group")?;
    let mut selection: Selection = ids.into_iter().collect();
    let bulk = BulkService::new(ctx.api.clone(), ctx.config.batch_size);

    let message = format!("Adding {} contact(s) to {}...", selection.len(), group.name);
    let outcome = spinner::with_spinner(&message, bulk.assign_to_group(group.id, &mut selection)).await;
    report_bulk(&format!("added to {}", group.name), &outcome)
}

pub async fn unassign(ctx: &Context, group: &str, ids: Vec<i64>) -> anyhow::Result<()> {
    let group = service(ctx).resolve(group).await.context("failed to look up group")?;
    let mut selection: Selection = ids.into_iter().collect();
    let bulk = BulkService::new(ctx.api.clone(), ctx.config.batch_size);

    let message = format!("Removing {} contact(s) from {}...", selection.len(), group.name);
    let outcome =
        spinner::with_spinner(&message, bulk.remove_from_group(group.id, &mut selection)).await;
    report_bulk(&format!("removed from {}", group.name), &outcome)
}

/// Prints the result of a bulk action. Any failure makes the command fail.
pub fn report_bulk(action: &str, outcome: &BulkOutcome) -> anyhow::Result<()> {
    let done = format!("{} contact(s)", outcome.succeeded.len()).green().bold();
    print::print_status(format!("{done} {action}"));

    if outcome.is_complete() {
        return Ok(());
    }

    mprint!();
    let details = outcome
        .failed
        .iter()
        .map(|(id, error)| (format!("#{id}"), error.to_string().red()))
        .collect();
    print::as_tree_one_level(details);

    if outcome.unauthorized() {
        return Err(ApiError::Unauthorized.into());
    }
    anyhow::bail!(
        "{} of {} contact(s) failed",
        outcome.failed.len() + outcome.not_attempted.len(),
        outcome.succeeded.len() + outcome.failed.len() + outcome.not_attempted.len()
    )
}
