//! The categorization and stamp duty pass over an ordered sequence of records.
//!
//! Every record gets an [`Investment`] derived from its description (and, for trades, the sign
//! of its amount). Selma exports stamp duty as a separate `stamp_duty` row next to the trade it
//! belongs to, so trades pick up the amount of an adjacent stamp duty row and the stamp duty
//! rows themselves are dropped from the output.

use crate::model::{Investment, Kind, Record};
use serde::Serialize;
use tracing::{debug, info};

/// Counts describing one run of [`process_records_with`].
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Summary {
    /// Number of records handed to the processor.
    pub input_count: usize,
    /// Number of records in the output sequence.
    pub output_count: usize,
    /// Number of `stamp_duty` rows removed.
    pub stamp_duty_rows: usize,
    /// Removed `stamp_duty` rows whose amount no adjacent trade picked up.
    pub unclaimed_stamp_duty: usize,
}

/// Receives diagnostics from the processor. Observers never influence the output.
pub trait Observer {
    fn processed(&self, summary: &Summary);
}

/// The default `Observer`, which reports through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn processed(&self, summary: &Summary) {
        info!(
            input_count = summary.input_count,
            output_count = summary.output_count,
            "Processed records"
        );
        if summary.unclaimed_stamp_duty > 0 {
            debug!(
                unclaimed = summary.unclaimed_stamp_duty,
                "Dropped stamp duty rows that had no adjacent trade"
            );
        }
    }
}

/// Sets the investment category of `record` from its description.
pub fn categorize(mut record: Record) -> Record {
    match record.kind() {
        Some(Kind::Dividend) => record.investment = Investment::Dividend,
        Some(Kind::CashTransfer) => record.investment = Investment::Income,
        Some(Kind::SelmaFee) => record.investment = Investment::Expense,
        Some(Kind::Trade) if record.amount.is_negative() => record.investment = Investment::Buy,
        Some(Kind::Trade) => record.investment = Investment::Sell,
        Some(Kind::StampDuty) | None => {}
    }
    record
}

/// Copies the amount of a neighboring `stamp_duty` row into `record.stamp_duty_amount`.
///
/// The successor is checked first, so it wins when both neighbors are stamp duty rows. This
/// does not check that `record` is a trade; the caller decides that.
pub fn link_stamp_duty(
    mut record: Record,
    previous: Option<&Record>,
    next: Option<&Record>,
) -> Record {
    if let Some(next) = next.filter(|r| r.is_stamp_duty()) {
        record.stamp_duty_amount = next.amount;
    } else if let Some(previous) = previous.filter(|r| r.is_stamp_duty()) {
        record.stamp_duty_amount = previous.amount;
    }
    record
}

/// Runs [`process_records_with`] using the [`LogObserver`].
pub fn process_records(records: &[Record]) -> Vec<Record> {
    process_records_with(records, &LogObserver)
}

/// Categorizes every record, links stamp duty into trades and removes the `stamp_duty` rows.
///
/// Neighbors are always read from `records`, which is never modified, so the result for one
/// record cannot depend on what happened to the record before it. Relative order is preserved.
pub fn process_records_with(records: &[Record], observer: &dyn Observer) -> Vec<Record> {
    let mut output = Vec::with_capacity(records.len());
    let mut claimed = vec![false; records.len()];

    for (ix, current) in records.iter().enumerate() {
        let previous = ix.checked_sub(1).and_then(|p| records.get(p));
        let next = records.get(ix + 1);

        let mut record = categorize(current.clone());
        if record.is_trade() {
            record = link_stamp_duty(record, previous, next);
            if next.is_some_and(Record::is_stamp_duty) {
                claimed[ix + 1] = true;
            } else if previous.is_some_and(Record::is_stamp_duty) {
                claimed[ix - 1] = true;
            }
        }

        if !record.is_stamp_duty() {
            output.push(record);
        }
    }

    let stamp_duty_rows = records.iter().filter(|r| r.is_stamp_duty()).count();
    let unclaimed_stamp_duty = records
        .iter()
        .zip(&claimed)
        .filter(|(r, claimed)| r.is_stamp_duty() && !**claimed)
        .count();

    observer.processed(&Summary {
        input_count: records.len(),
        output_count: output.len(),
        stamp_duty_rows,
        unclaimed_stamp_duty,
    });
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;
    use crate::test::record;
    use std::cell::Cell;

    #[derive(Default)]
    struct Capture(Cell<Option<Summary>>);

    impl Observer for Capture {
        fn processed(&self, summary: &Summary) {
            self.0.set(Some(*summary));
        }
    }

    impl Capture {
        fn summary(&self) -> Summary {
            self.0.get().expect("observer was not called")
        }
    }

    #[test]
    fn test_categorize_fixed_categories_ignore_amount() {
        for amount in [-10, 0, 10] {
            assert_eq!(
                categorize(record("", "dividend", amount)).investment(),
                Investment::Dividend
            );
            assert_eq!(
                categorize(record("", "cash_transfer", amount)).investment(),
                Investment::Income
            );
            assert_eq!(
                categorize(record("", "selma_fee", amount)).investment(),
                Investment::Expense
            );
        }
    }

    #[test]
    fn test_categorize_trade_by_sign() {
        assert_eq!(categorize(record("", "trade", -1000)).investment(), Investment::Buy);
        assert_eq!(categorize(record("", "trade", 1000)).investment(), Investment::Sell);
        assert_eq!(categorize(record("", "trade", 0)).investment(), Investment::Sell);
    }

    #[test]
    fn test_categorize_leaves_other_descriptions_alone() {
        for description in ["stamp_duty", "interest", "", "Dividend"] {
            let before = record("2023-10-01", description, 5);
            let after = categorize(before.clone());
            assert_eq!(after, before);
        }
    }

    #[test]
    fn test_link_next_stamp_duty() {
        let next = record("", "stamp_duty", 5);
        let linked = link_stamp_duty(record("", "trade", -100), None, Some(&next));
        assert_eq!(linked.stamp_duty_amount(), Amount::from(5));
    }

    #[test]
    fn test_link_previous_stamp_duty() {
        let previous = record("", "stamp_duty", 5);
        let linked = link_stamp_duty(record("", "trade", -100), Some(&previous), None);
        assert_eq!(linked.stamp_duty_amount(), Amount::from(5));
    }

    #[test]
    fn test_link_prefers_next() {
        let previous = record("", "stamp_duty", 3);
        let next = record("", "stamp_duty", 7);
        let linked = link_stamp_duty(record("", "trade", -100), Some(&previous), Some(&next));
        assert_eq!(linked.stamp_duty_amount(), Amount::from(7));
    }

    #[test]
    fn test_link_without_stamp_duty_neighbors() {
        let previous = record("", "dividend", 3);
        let next = record("", "trade", 7);
        let linked = link_stamp_duty(record("", "trade", -100), Some(&previous), Some(&next));
        assert!(linked.stamp_duty_amount().is_zero());
        let alone = link_stamp_duty(record("", "trade", -100), None, None);
        assert!(alone.stamp_duty_amount().is_zero());
    }

    #[test]
    fn test_link_does_not_gate_on_description() {
        let next = record("", "stamp_duty", 2);
        let linked = link_stamp_duty(record("", "dividend", 10), None, Some(&next));
        assert_eq!(linked.stamp_duty_amount(), Amount::from(2));
    }

    #[test]
    fn test_process_scenario() {
        let input = vec![
            record("2023-10-01", "trade", -1000),
            record("2023-10-01", "stamp_duty", 5),
            record("2023-10-02", "dividend", 50),
            record("2023-10-03", "cash_transfer", 200),
            record("2023-10-04", "selma_fee", -10),
        ];
        let expected = vec![
            record("2023-10-01", "trade", -1000)
                .with_investment(Investment::Buy)
                .with_stamp_duty_amount(Amount::from(5)),
            record("2023-10-02", "dividend", 50).with_investment(Investment::Dividend),
            record("2023-10-03", "cash_transfer", 200).with_investment(Investment::Income),
            record("2023-10-04", "selma_fee", -10).with_investment(Investment::Expense),
        ];
        let capture = Capture::default();
        let actual = process_records_with(&input, &capture);
        assert_eq!(actual, expected);
        assert_eq!(
            capture.summary(),
            Summary {
                input_count: 5,
                output_count: 4,
                stamp_duty_rows: 1,
                unclaimed_stamp_duty: 0,
            }
        );
    }

    #[test]
    fn test_process_previous_stamp_duty() {
        let input = vec![
            record("2023-10-01", "stamp_duty", 4),
            record("2023-10-01", "trade", 800),
            record("2023-10-02", "dividend", 50),
        ];
        let actual = process_records(&input);
        assert_eq!(actual.len(), 2);
        assert_eq!(actual[0].investment(), Investment::Sell);
        assert_eq!(actual[0].stamp_duty_amount(), Amount::from(4));
        assert!(actual[1].stamp_duty_amount().is_zero());
    }

    #[test]
    fn test_process_trade_between_two_stamp_duty_rows_takes_the_next() {
        let input = vec![
            record("2023-10-01", "stamp_duty", 3),
            record("2023-10-01", "trade", -100),
            record("2023-10-01", "stamp_duty", 7),
        ];
        let capture = Capture::default();
        let actual = process_records_with(&input, &capture);
        assert_eq!(actual.len(), 1);
        assert_eq!(actual[0].investment(), Investment::Buy);
        assert_eq!(actual[0].stamp_duty_amount(), Amount::from(7));
        assert_eq!(capture.summary().stamp_duty_rows, 2);
        assert_eq!(capture.summary().unclaimed_stamp_duty, 1);
    }

    #[test]
    fn test_process_trade_without_stamp_duty() {
        let input = vec![
            record("2023-10-01", "dividend", 1),
            record("2023-10-02", "trade", -20),
            record("2023-10-03", "selma_fee", -1),
        ];
        let actual = process_records(&input);
        assert_eq!(actual.len(), 3);
        assert!(actual[1].stamp_duty_amount().is_zero());
        assert_eq!(actual[1].investment(), Investment::Buy);
    }

    #[test]
    fn test_process_neighbors_come_from_the_input() {
        // The second trade sees the stamp duty row before it even though the first trade has
        // already claimed it.
        let input = vec![
            record("2023-10-01", "trade", -100),
            record("2023-10-01", "stamp_duty", 1),
            record("2023-10-01", "trade", -200),
        ];
        let actual = process_records(&input);
        assert_eq!(actual.len(), 2);
        assert_eq!(actual[0].stamp_duty_amount(), Amount::from(1));
        assert_eq!(actual[1].stamp_duty_amount(), Amount::from(1));
    }

    #[test]
    fn test_process_unclaimed_stamp_duty_is_dropped() {
        // Lossy on purpose: a stamp duty row with no adjacent trade disappears with its amount.
        let input = vec![
            record("2023-10-01", "dividend", 50),
            record("2023-10-01", "stamp_duty", 9),
            record("2023-10-02", "selma_fee", -3),
        ];
        let capture = Capture::default();
        let actual = process_records_with(&input, &capture);
        assert_eq!(actual.len(), 2);
        assert!(actual.iter().all(|r| r.stamp_duty_amount().is_zero()));
        assert_eq!(capture.summary().stamp_duty_rows, 1);
        assert_eq!(capture.summary().unclaimed_stamp_duty, 1);
    }

    #[test]
    fn test_process_preserves_order_and_drops_all_stamp_duty() {
        let descriptions = [
            "stamp_duty",
            "trade",
            "stamp_duty",
            "stamp_duty",
            "interest",
            "trade",
            "dividend",
            "stamp_duty",
        ];
        let input: Vec<Record> = descriptions
            .iter()
            .enumerate()
            .map(|(ix, d)| record(format!("2023-10-{:02}", ix + 1), *d, ix as i64))
            .collect();
        let actual = process_records(&input);

        assert!(actual.iter().all(|r| !r.is_stamp_duty()));
        assert_eq!(actual.len(), input.len() - 4);
        let dates: Vec<&str> = actual.iter().map(Record::date).collect();
        assert_eq!(dates, ["2023-10-02", "2023-10-05", "2023-10-06", "2023-10-07"]);
        // Uncategorized descriptions keep an empty category.
        assert_eq!(actual[1].investment(), Investment::Uncategorized);
    }

    #[test]
    fn test_process_empty_input() {
        let capture = Capture::default();
        assert!(process_records_with(&[], &capture).is_empty());
        assert_eq!(capture.summary(), Summary::default());
    }

    #[test]
    fn test_process_passes_opaque_fields_through() {
        let input = vec![record("2023-10-01", "trade", -10)
            .with_bookkeeping_no("BK-1")
            .with_fund("IE00B5BMR087")
            .with_currency("CHF")
            .with_number_of_shares("n/a")];
        let actual = process_records(&input);
        assert_eq!(actual[0].bookkeeping_no(), "BK-1");
        assert_eq!(actual[0].fund(), "IE00B5BMR087");
        assert_eq!(actual[0].currency(), "CHF");
        assert_eq!(actual[0].number_of_shares(), "n/a");
    }
}
