//! Batch assessment of counterparties listed in a CSV file.

use std::io::Read;
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::registry::RegistryClient;
use crate::risk::{assess_at, Assessment};
use crate::sanctions::SanctionsScreener;

/// Registry lookups in flight at once.
const BATCH_SIZE: usize = 25;

/// Read the `name` column of a counterparty CSV. Blank names are skipped.
pub fn load_names(path: &Path) -> Result<Vec<String>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    read_names(file).with_context(|| format!("invalid counterparty file {}", path.display()))
}

fn read_names<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let column = rdr
        .headers()?
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("name"))
        .context("no `name` column")?;

    let mut names = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        match record.get(column).map(str::trim) {
            Some(name) if !name.is_empty() => names.push(name.to_string()),
            _ => warn!(row = line + 1, "skipping row without a name"),
        }
    }
    Ok(names)
}

/// Run registry lookups concurrently in chunks, then screen and score each name.
///
/// When `sanctions_path` is given, the list is reloaded between chunks if the
/// file changed on disk.
pub async fn assess_all(
    names: &[String],
    registry: &RegistryClient,
    screener: &SanctionsScreener,
    sanctions_path: Option<&Path>,
    today: NaiveDate,
    quiet: bool,
) -> Result<Vec<Assessment>> {
    let pb = if !quiet {
        let pb = ProgressBar::new(names.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut assessments = Vec::with_capacity(names.len());
    let mut list_modified: Option<SystemTime> = sanctions_path
        .and_then(|p| std::fs::metadata(p).and_then(|m| m.modified()).ok());

    for (i, batch) in names.chunks(BATCH_SIZE).enumerate() {
        match sanctions_path {
            Some(path) if i > 0 => {
                list_modified = screener.reload_if_modified(path, list_modified);
            }
            _ => {}
        }

        let lookups = batch.iter().map(|name| registry.search(name));
        let records = join_all(lookups).await;

        for (name, record) in batch.iter().zip(records) {
            let sanctions = screener.check(name);
            assessments.push(assess_at(name, record, sanctions, today));
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    info!(count = assessments.len(), "batch assessment finished");
    Ok(assessments)
}
