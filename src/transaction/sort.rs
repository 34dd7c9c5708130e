//! Ordering of the transactions table.
//!
//! The sort travels in the `sort` and `order` query parameters of the
//! transactions page, next to the filters. The column headers link to the
//! page with the filters of the current view and the toggled sort.

use serde::Deserialize;

use crate::{endpoints, filter::url_for};

use super::row::TransactionRow;

/// A column the table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(super) enum SortColumn {
    #[default]
    Date,
    Amount,
}

impl SortColumn {
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
        }
    }
}

/// The direction to sort in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub(super) enum SortOrder {
    /// Sort in order of increasing value.
    #[serde(rename = "asc")]
    Ascending,
    /// Sort in order of decreasing value.
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// The column and direction of the transactions table, newest first by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub(super) struct TableSort {
    pub sort: SortColumn,
    pub order: SortOrder,
}

impl TableSort {
    /// Read the sort from `query`, ignoring the filter parameters.
    ///
    /// Unknown columns or directions fall back to the default sort.
    pub fn from_query(query: &str) -> Self {
        serde_urlencoded::from_str(query).unwrap_or_else(|error| {
            tracing::debug!("ignoring invalid table sort in {query:?}: {error}");
            Self::default()
        })
    }

    /// The query string for this sort, e.g. `sort=amount&order=asc`.
    pub fn to_query(self) -> String {
        format!(
            "sort={}&order={}",
            self.sort.as_query_value(),
            self.order.as_query_value()
        )
    }

    /// The sort to apply when the header of `column` is clicked.
    ///
    /// Clicking the sorted column reverses it, clicking another column sorts
    /// it in descending order.
    pub fn toggled(self, column: SortColumn) -> Self {
        if self.sort == column {
            Self {
                sort: column,
                order: self.order.reversed(),
            }
        } else {
            Self {
                sort: column,
                order: SortOrder::Descending,
            }
        }
    }

    /// The URL of the transactions page for `filter_query` sorted by `self`.
    pub fn page_url(self, filter_query: &str) -> String {
        let query = if filter_query.is_empty() {
            self.to_query()
        } else {
            format!("{filter_query}&{}", self.to_query())
        };

        url_for(endpoints::TRANSACTIONS_VIEW, &query)
    }

    /// The `aria-sort` value for the header of `column`.
    pub fn aria_sort(self, column: SortColumn) -> &'static str {
        match (self.sort == column, self.order) {
            (false, _) => "none",
            (true, SortOrder::Ascending) => "ascending",
            (true, SortOrder::Descending) => "descending",
        }
    }

    /// Sort `rows` in place. Rows that compare equal keep their order.
    pub fn apply(self, rows: &mut [TransactionRow]) {
        rows.sort_by(|a, b| {
            let ordering = match self.sort {
                SortColumn::Date => a.timestamp.cmp(&b.timestamp),
                SortColumn::Amount => a.amount.total_cmp(&b.amount),
            };

            match self.order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{SortColumn, SortOrder, TableSort};

    #[test]
    fn reads_sort_among_filter_parameters() {
        let sort = TableSort::from_query(
            "dateMode=ym&year=2025&type=debito&type=credito&sort=amount&order=asc",
        );

        assert_eq!(
            sort,
            TableSort {
                sort: SortColumn::Amount,
                order: SortOrder::Ascending,
            }
        );
    }

    #[test]
    fn missing_or_unknown_sort_is_newest_first() {
        let newest_first = TableSort {
            sort: SortColumn::Date,
            order: SortOrder::Descending,
        };

        assert_eq!(TableSort::from_query(""), newest_first);
        assert_eq!(TableSort::from_query("dateMode=ym&year=2025"), newest_first);
        assert_eq!(TableSort::from_query("sort=merchant&order=up"), newest_first);
        assert_eq!(
            TableSort::from_query("order=asc"),
            TableSort {
                sort: SortColumn::Date,
                order: SortOrder::Ascending,
            }
        );
    }

    #[test]
    fn toggling_reverses_current_column_and_starts_others_descending() {
        let by_date = TableSort::default();

        let by_date_asc = by_date.toggled(SortColumn::Date);
        assert_eq!(by_date_asc.order, SortOrder::Ascending);
        assert_eq!(by_date_asc.toggled(SortColumn::Date), by_date);

        let by_amount = by_date_asc.toggled(SortColumn::Amount);
        assert_eq!(
            by_amount,
            TableSort {
                sort: SortColumn::Amount,
                order: SortOrder::Descending,
            }
        );
    }

    #[test]
    fn page_url_keeps_filters() {
        let sort = TableSort {
            sort: SortColumn::Amount,
            order: SortOrder::Ascending,
        };

        assert_eq!(
            sort.page_url("dateMode=ym&year=2025&month=6"),
            "/transactions?dateMode=ym&year=2025&month=6&sort=amount&order=asc"
        );
        assert_eq!(sort.page_url(""), "/transactions?sort=amount&order=asc");
    }

    #[test]
    fn aria_sort_marks_only_the_sorted_column() {
        let sort = TableSort {
            sort: SortColumn::Amount,
            order: SortOrder::Ascending,
        };

        assert_eq!(sort.aria_sort(SortColumn::Amount), "ascending");
        assert_eq!(sort.aria_sort(SortColumn::Date), "none");
        assert_eq!(TableSort::default().aria_sort(SortColumn::Date), "descending");
    }
}
