use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::models::{MonthKey, MonthRecord};

const HEADER: [&str; 7] = ["card", "type", "item", "amount", "date", "completed", "notes"];

/// Write one row per item of `record`. Returns the number of rows written.
pub(crate) fn write_month_csv<W: Write>(record: &MonthRecord, out: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(HEADER)?;
    let mut count = 0;
    for card in &record.cards {
        for item in &card.items {
            let amount = format!("{:.2}", item.amount);
            wtr.write_record([
                card.title.as_str(),
                card.card_type.as_str(),
                item.name.as_str(),
                amount.as_str(),
                item.date.as_str(),
                if item.completed { "true" } else { "false" },
                item.notes.as_str(),
            ])?;
            count += 1;
        }
    }
    wtr.flush()?;
    Ok(count)
}

pub(crate) fn export_month_csv(record: &MonthRecord, path: &Path) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let count = write_month_csv(record, file)?;
    info!(path = %path.display(), rows = count, "Exported month");
    Ok(count)
}

/// `~/budgetcards-<month>.csv`
pub(crate) fn default_export_path(month: MonthKey) -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    format!("{home}/budgetcards-{month}.csv")
}
