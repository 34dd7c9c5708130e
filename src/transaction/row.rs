//! Converts backend records into table rows.

use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};
use unicode_segmentation::UnicodeSegmentation;

use crate::backend::Transaction;

use super::sort::TableSort;

/// The max number of graphemes to display in the merchant column before
/// truncating and displaying ellipses.
const MAX_MERCHANT_GRAPHEMES: usize = 32;

const ISO_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

const ISO_DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);

const DATE_LABEL_FORMAT: &[BorrowedFormatItem] = format_description!("[day]-[month]-[year]");

const DATE_TIME_LABEL_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day]-[month]-[year] [hour]:[minute]");

/// A transaction prepared for display in the table.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct TransactionRow {
    pub id: i64,
    /// Milliseconds since the Unix epoch, or zero if the date could not be parsed.
    pub timestamp: i64,
    /// The date in the local timezone, or the raw date if it could not be parsed.
    pub date_label: String,
    pub amount: f64,
    pub merchant: String,
    /// The full merchant name if it was truncated.
    pub merchant_tooltip: Option<String>,
    pub transaction_type: String,
    pub category: String,
    pub description: String,
}

/// A parsed backend date.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ParsedDate {
    /// A date without a time, read as midnight UTC.
    Day(Date),
    /// A date and time.
    Instant(OffsetDateTime),
}

/// Parse an RFC 3339 date-time, an ISO 8601 date-time without offset (read
/// in `local_offset`) or an ISO 8601 date.
fn parse_date(date: &str, local_offset: UtcOffset) -> Option<ParsedDate> {
    let date = date.trim();

    if let Ok(date_time) = OffsetDateTime::parse(date, &Rfc3339) {
        return Some(ParsedDate::Instant(date_time));
    }

    if let Ok(date_time) = PrimitiveDateTime::parse(date, ISO_DATE_TIME_FORMAT) {
        return Some(ParsedDate::Instant(date_time.assume_offset(local_offset)));
    }

    Date::parse(date, ISO_DATE_FORMAT).ok().map(ParsedDate::Day)
}

impl ParsedDate {
    fn timestamp_millis(self) -> i64 {
        let date_time = match self {
            ParsedDate::Day(date) => date.midnight().assume_utc(),
            ParsedDate::Instant(date_time) => date_time,
        };

        (date_time.unix_timestamp_nanos() / 1_000_000) as i64
    }

    fn label(self, local_offset: UtcOffset) -> Option<String> {
        match self {
            ParsedDate::Day(date) => date.format(DATE_LABEL_FORMAT).ok(),
            ParsedDate::Instant(date_time) => date_time
                .to_offset(local_offset)
                .format(DATE_TIME_LABEL_FORMAT)
                .ok(),
        }
    }
}

fn truncate_merchant(merchant: &str) -> (String, Option<String>) {
    let merchant_length = merchant.graphemes(true).count();

    if merchant_length <= MAX_MERCHANT_GRAPHEMES {
        (merchant.to_owned(), None)
    } else {
        let truncated: String = merchant
            .graphemes(true)
            .take(MAX_MERCHANT_GRAPHEMES - 3)
            .collect();
        (truncated + "...", Some(merchant.to_owned()))
    }
}

impl TransactionRow {
    pub fn new(transaction: &Transaction, local_offset: UtcOffset) -> Self {
        let parsed_date = parse_date(&transaction.date, local_offset);
        let (merchant, merchant_tooltip) =
            truncate_merchant(transaction.merchant.as_deref().unwrap_or_default());

        Self {
            id: transaction.id,
            timestamp: parsed_date.map_or(0, ParsedDate::timestamp_millis),
            date_label: parsed_date
                .and_then(|date| date.label(local_offset))
                .unwrap_or_else(|| transaction.date.clone()),
            amount: transaction.amount,
            merchant,
            merchant_tooltip,
            transaction_type: transaction.transaction_type.clone().unwrap_or_default(),
            category: transaction.category.clone().unwrap_or_default(),
            description: transaction.description.clone().unwrap_or_default(),
        }
    }
}

/// Build the table rows for `transactions` in the order given by `sort`.
///
/// Rows with unparsable dates have a zero timestamp, so they come last when
/// sorting newest first. Rows that compare equal keep the backend's order.
pub(super) fn build_rows(
    transactions: &[Transaction],
    local_offset: UtcOffset,
    sort: TableSort,
) -> Vec<TransactionRow> {
    let mut rows: Vec<_> = transactions
        .iter()
        .map(|transaction| TransactionRow::new(transaction, local_offset))
        .collect();

    sort.apply(&mut rows);
    rows
}

#[cfg(test)]
mod tests {
    use time::{UtcOffset, macros::offset};

    use crate::{
        backend::Transaction,
        transaction::sort::{SortColumn, SortOrder, TableSort},
    };

    use super::{TransactionRow, build_rows, truncate_merchant};

    const SANTIAGO_WINTER: UtcOffset = offset!(-4);

    fn transaction(id: i64, date: &str) -> Transaction {
        Transaction {
            id,
            date: date.to_owned(),
            amount: 1500.0,
            merchant: Some("Jumbo".to_owned()),
            transaction_type: Some("debito".to_owned()),
            category: None,
            description: None,
        }
    }

    #[test]
    fn iso_date_is_midnight_utc() {
        let row = TransactionRow::new(&transaction(1, "2025-06-02"), SANTIAGO_WINTER);

        assert_eq!(row.timestamp, 1_748_822_400_000);
        assert_eq!(row.date_label, "02-06-2025");
    }

    #[test]
    fn rfc3339_date_time_is_shown_in_local_time() {
        let row = TransactionRow::new(&transaction(1, "2025-06-02T15:30:00Z"), SANTIAGO_WINTER);

        assert_eq!(row.timestamp, 1_748_878_200_000);
        assert_eq!(row.date_label, "02-06-2025 11:30");
    }

    #[test]
    fn date_time_without_offset_is_local() {
        let row = TransactionRow::new(&transaction(1, "2025-06-02T11:30:00"), SANTIAGO_WINTER);

        assert_eq!(row.timestamp, 1_748_878_200_000);
        assert_eq!(row.date_label, "02-06-2025 11:30");
    }

    #[test]
    fn unparsable_date_has_zero_timestamp() {
        let row = TransactionRow::new(&transaction(1, "ayer"), SANTIAGO_WINTER);

        assert_eq!(row.timestamp, 0);
        assert_eq!(row.date_label, "ayer");
    }

    #[test]
    fn missing_fields_are_blank() {
        let row = TransactionRow::new(
            &Transaction {
                merchant: None,
                transaction_type: None,
                ..transaction(7, "2025-06-02")
            },
            SANTIAGO_WINTER,
        );

        assert_eq!(row.merchant, "");
        assert_eq!(row.transaction_type, "");
        assert_eq!(row.category, "");
        assert_eq!(row.description, "");
    }

    #[test]
    fn rows_are_newest_first() {
        let transactions = [
            transaction(1, "2025-06-01"),
            transaction(2, "not a date"),
            transaction(3, "2025-06-03"),
            transaction(4, "2025-06-02T12:00:00Z"),
        ];

        let ids: Vec<_> = build_rows(&transactions, SANTIAGO_WINTER, TableSort::default())
            .iter()
            .map(|row| row.id)
            .collect();

        assert_eq!(ids, [3, 4, 1, 2]);
    }

    #[test]
    fn rows_sort_by_amount_in_both_directions() {
        let with_amount = |id, amount| Transaction {
            amount,
            ..transaction(id, "2025-06-01")
        };
        let transactions = [
            with_amount(1, 200.0),
            with_amount(2, -50.0),
            with_amount(3, 1000.0),
            with_amount(4, 200.0),
        ];
        let ids = |order| -> Vec<i64> {
            let sort = TableSort {
                sort: SortColumn::Amount,
                order,
            };
            build_rows(&transactions, SANTIAGO_WINTER, sort)
                .iter()
                .map(|row| row.id)
                .collect()
        };

        assert_eq!(ids(SortOrder::Ascending), [2, 1, 4, 3]);
        assert_eq!(ids(SortOrder::Descending), [3, 1, 4, 2]);
    }

    #[test]
    fn rows_sort_oldest_first() {
        let transactions = [
            transaction(1, "2025-06-02"),
            transaction(2, "not a date"),
            transaction(3, "2025-06-01"),
        ];
        let sort = TableSort {
            sort: SortColumn::Date,
            order: SortOrder::Ascending,
        };

        let ids: Vec<_> = build_rows(&transactions, SANTIAGO_WINTER, sort)
            .iter()
            .map(|row| row.id)
            .collect();

        assert_eq!(ids, [2, 3, 1]);
    }

    #[test]
    fn long_merchant_is_truncated_by_grapheme() {
        let merchant = "Café ".repeat(10);

        let (truncated, tooltip) = truncate_merchant(&merchant);

        assert_eq!(truncated, "Café Café Café Café Café Café...");
        assert_eq!(tooltip.as_deref(), Some(merchant.as_str()));
    }

    #[test]
    fn short_merchant_is_kept() {
        assert_eq!(truncate_merchant("Jumbo"), ("Jumbo".to_owned(), None));
    }
}
