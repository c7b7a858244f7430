use anyhow::Context as _;
use colored::*;
use contactbook_common::models::{Contact, ContactField, SortOrder};
use contactbook_core::bulk::{BulkService, Selection};
use contactbook_core::contacts::{ContactsService, FieldEdit, ListQuery};
use contactbook_core::groups::GroupsService;

use crate::commands::{Context, NewContactArgs};
use crate::mprint;
use crate::terminal::{colors, format, print, prompt, spinner};

fn service(ctx: &Context) -> ContactsService {
    ContactsService::new(ctx.api.clone(), ctx.session.clone())
}

pub async fn list(
    ctx: &Context,
    search: Option<String>,
    group: Option<String>,
    sort: Option<SortOrder>,
) -> anyhow::Result<()> {
    let group = match group {
        Some(reference) => Some(
            GroupsService::new(ctx.api.clone())
                .resolve(&reference)
                .await
                .context("failed to look up group")?,
        ),
        None => None,
    };
    let query = ListQuery {
        search,
        group: group.as_ref().map(|g| g.id),
        sort,
    };

    let contacts = spinner::with_spinner("Loading contacts...", service(ctx).list(&query))
        .await
        .context("failed to list contacts")?;

    let title = match &group {
        Some(group) => format!("contacts in {}", group.name),
        None => "contacts".to_string(),
    };
    print::header(&title);
    if contacts.is_empty() {
        print::no_results("contacts");
        return Ok(());
    }

    for (idx, contact) in contacts.iter().enumerate() {
        match print::quiet() {
            0 => {
                format::contact_tree(contact, false);
                if idx + 1 != contacts.len() {
                    mprint!();
                }
            }
            _ => print::print(&format::contact_line(contact)),
        }
    }

    if print::quiet() == 0 {
        print::fat_separator();
        let count = format!("{} contacts", contacts.len()).bold().green();
        print::centerln(&format!("{count} listed"));
    }
    Ok(())
}

pub async fn show(ctx: &Context, id: i64) -> anyhow::Result<()> {
    let contact = spinner::with_spinner("Loading contact...", service(ctx).get(id))
        .await
        .with_context(|| format!("failed to load contact {id}"))?;

    print::header("contact");
    format::contact_tree(&contact, true);
    if let Some(created) = contact.created_at.as_deref() {
        mprint!();
        print::print_status(format!("created {}", created.color(colors::SEPARATOR)));
    }
    Ok(())
}

pub async fn add(ctx: &Context, args: NewContactArgs) -> anyhow::Result<()> {
    let mut contact = Contact::default();
    let named = [
        (ContactField::FirstName, args.first_name),
        (ContactField::LastName, args.last_name),
        (ContactField::Email, args.email),
        (ContactField::Phone, args.phone),
        (ContactField::Company, args.company),
        (ContactField::JobTitle, args.job_title),
    ];
    for (field, value) in named {
        field.set(&mut contact, value);
    }
    for edit in &args.fields {
        edit.apply(&mut contact);
    }

    let created = spinner::with_spinner("Saving contact...", service(ctx).create(&contact))
        .await
        .context("failed to create contact")?;

    print::header("contact created");
    format::contact_tree(&created, true);
    Ok(())
}

pub async fn edit(
    ctx: &Context,
    id: i64,
    fields: &[FieldEdit],
) -> anyhow::Result<()> {
    let updated = spinner::with_spinner("Saving contact...", service(ctx).update(id, fields))
        .await
        .with_context(|| format!("failed to update contact {id}"))?;

    print::header("contact updated");
    format::contact_tree(&updated, true);
    Ok(())
}

pub async fn delete(ctx: &Context, ids: Vec<i64>, yes: bool) -> anyhow::Result<()> {
    let mut selection: Selection = ids.into_iter().collect();
    let question = format!("Delete {} contact(s)?", selection.len());
    if !yes && !prompt::confirm(&question).context("failed to read answer")? {
        print::print_status("Nothing deleted");
        return Ok(());
    }

    let service = BulkService::new(ctx.api.clone(), ctx.config.batch_size);
    let outcome = spinner::with_spinner("Deleting...", service.delete_contacts(&mut selection)).await;

    super::groups::report_bulk("deleted", &outcome)
}
