//! Writes processed `Record`s as CSV with a fixed 9-column header.

use crate::model::Record;
use crate::Result;
use anyhow::Context;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// The header row of every file this tool writes.
pub const HEADERS: [&str; 9] = [
    "Date",
    "Description",
    "Bookkeeping No.",
    "Fund",
    "Amount",
    "Currency",
    "Number of Shares",
    "Stamp Duty Amount",
    "Investment",
];

/// One output row. Amounts are rendered through `Amount`'s two-digit `Display`.
#[derive(Debug, Serialize)]
struct Row<'a> {
    date: &'a str,
    description: &'a str,
    bookkeeping_no: &'a str,
    fund: &'a str,
    amount: String,
    currency: &'a str,
    number_of_shares: &'a str,
    stamp_duty_amount: String,
    investment: String,
}

impl<'a> From<&'a Record> for Row<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            date: record.date(),
            description: record.description(),
            bookkeeping_no: record.bookkeeping_no(),
            fund: record.fund(),
            amount: record.amount().to_string(),
            currency: record.currency(),
            number_of_shares: record.number_of_shares(),
            stamp_duty_amount: record.stamp_duty_amount().to_string(),
            investment: record.investment().to_string(),
        }
    }
}

/// Creates (or truncates) the file at `path` and writes `records` to it. A failure part way
/// through leaves whatever was already written in place.
pub fn write_path(path: &Path, records: &[Record]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
    write(file, records).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(
        path = %path.display(),
        count = records.len(),
        "Successfully wrote CSV records"
    );
    Ok(())
}

/// Writes the header and one row per record to `wtr`.
pub fn write<W: Write>(wtr: W, records: &[Record]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(wtr);
    wtr.write_record(HEADERS)
        .context("Failed to write CSV headers")?;
    for record in records {
        wtr.serialize(Row::from(record))
            .context("Failed to write CSV row")?;
    }
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Renders `records` as CSV in memory.
pub fn to_bytes(records: &[Record]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write(&mut buf, records)?;
    Ok(buf)
}
