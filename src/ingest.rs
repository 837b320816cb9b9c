//! Reads `Record`s from CSV.
//!
//! The columns are positional: date, description, bookkeeping number, fund, amount, currency
//! and number of shares, followed (in files this tool wrote) by stamp duty amount and
//! investment. Header names are not checked, only the header's length.
//!
//! A row that cannot be turned into a `Record` is logged and skipped. Anything wrong with the
//! source as a whole (unreadable, missing or short header, broken CSV) fails the entire read.

use crate::model::{Amount, Investment, Record};
use crate::Result;
use anyhow::{bail, Context};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Columns of a Selma export: date through number of shares.
pub const EXPORT_COLUMNS: usize = 7;

/// Columns of a file written by [`crate::emit`]: the export columns plus the derived ones.
pub const ENRICHED_COLUMNS: usize = 9;

/// The column layout of the source.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Layout {
    /// A Selma export. Derived fields start out empty.
    #[default]
    Export,
    /// A file previously written by this tool. Stamp duty and investment are read back from the
    /// 8th and 9th columns.
    Enriched,
}

impl Layout {
    pub fn columns(&self) -> usize {
        match self {
            Layout::Export => EXPORT_COLUMNS,
            Layout::Enriched => ENRICHED_COLUMNS,
        }
    }
}

/// Reads the CSV file at `path`.
pub fn read_path(path: &Path, layout: Layout) -> Result<Vec<Record>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open CSV file {}", path.display()))?;
    read(file, layout).with_context(|| format!("Failed to read {}", path.display()))
}

/// Reads CSV data from `rdr`. The first row is the header.
pub fn read<R: Read>(rdr: R, layout: Layout) -> Result<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);

    let headers = rdr.headers().context("Failed to read CSV headers")?.clone();
    if headers.is_empty() {
        bail!("The CSV source is empty, a header row is required");
    }
    if headers.len() < layout.columns() {
        bail!(
            "Unexpected CSV header length: expected at least {} columns, found {}",
            layout.columns(),
            headers.len()
        );
    }

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.context("Failed to read CSV rows")?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        match parse_row(&row, layout) {
            Ok(record) => records.push(record),
            Err(e) => warn!(line, row = ?row, "Skipping CSV row: {e:#}"),
        }
    }
    info!(count = records.len(), "Successfully read CSV records");
    Ok(records)
}

/// Parses one data row into a `Record`.
fn parse_row(row: &StringRecord, layout: Layout) -> Result<Record> {
    if row.len() < layout.columns() {
        bail!(
            "expected at least {} fields, found {}",
            layout.columns(),
            row.len()
        );
    }
    let field = |ix: usize| row.get(ix).unwrap_or_default();

    let amount: Amount = field(4).parse()?;
    let mut record = Record::new(field(0), field(1), amount)
        .with_bookkeeping_no(field(2))
        .with_fund(field(3))
        .with_currency(field(5))
        .with_number_of_shares(field(6));

    if layout == Layout::Enriched {
        let stamp_duty: Amount = field(7).parse().context("bad stamp duty amount")?;
        let investment: Investment = field(8)
            .parse()
            .with_context(|| format!("unknown investment '{}'", field(8)))?;
        record = record
            .with_stamp_duty_amount(stamp_duty)
            .with_investment(investment);
    }
    Ok(record)
}
