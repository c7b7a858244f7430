use std::path::PathBuf;

use anyhow::Context as _;
use colored::*;
use contactbook_common::models::ExportFormat;
use contactbook_core::export::ExportService;

use crate::commands::Context;
use crate::terminal::{print, spinner};

pub async fn export(ctx: &Context, format: ExportFormat, out: Option<PathBuf>) -> anyhow::Result<()> {
    let path = out.unwrap_or_else(|| PathBuf::from(format.default_file_name()));
    let service = ExportService::new(ctx.api.clone());

    let message = format!("Exporting contacts as {format}...");
    let bytes = spinner::with_spinner(&message, service.export(format, &path))
        .await
        .context("export failed")?;

    print::print_status(format!(
        "Saved {} ({} bytes)",
        path.display().to_string().bold(),
        bytes
    ));
    Ok(())
}
