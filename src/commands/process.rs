use crate::commands::Out;
use crate::ingest::{self, Layout};
use crate::process::{process_records_with, LogObserver, Observer, Summary};
use crate::{emit, Result};
use std::cell::Cell;
use std::path::Path;

/// Reads the Selma export at `input`, categorizes it, folds stamp duty into trades and writes
/// the result to `output`.
///
/// # Errors
/// - The input cannot be opened or its header is missing or too short.
/// - The output cannot be created or written. A partially written file is left behind.
pub fn process_file(input: &Path, output: &Path) -> Result<Out<Summary>> {
    let records = ingest::read_path(input, Layout::Export)?;

    let observer = Remember::default();
    let processed = process_records_with(&records, &observer);

    emit::write_path(output, &processed)?;

    let summary = observer.0.get();
    Ok(Out::new(
        format!(
            "Wrote {} of {} records to {}",
            summary.output_count,
            summary.input_count,
            output.display()
        ),
        summary,
    ))
}

/// Logs like `LogObserver` and keeps the summary for the command output.
#[derive(Default)]
struct Remember(Cell<Summary>);

impl Observer for Remember {
    fn processed(&self, summary: &Summary) {
        LogObserver.processed(summary);
        self.0.set(*summary);
    }
}
