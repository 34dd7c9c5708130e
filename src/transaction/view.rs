//! HTML rendering for the transactions page.

use maud::{Markup, html};
use time::UtcOffset;

use crate::{
    backend::EditableField,
    endpoints,
    filter::{FilterTargets, filter_controls},
    filtered_view::FilteredView,
    html::{
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        fetch_error_banner, format_peso,
    },
    navigation::NavBar,
};

use super::{
    edit::field_cell,
    row::{TransactionRow, build_rows},
    sort::{SortColumn, SortOrder, TableSort},
};

/// The ID of the element holding the filter controls and the results.
pub(super) const TRANSACTIONS_CONTENT_ID: &str = "transactions-content";

/// The ID of the element replaced on every filter change.
pub(super) const TRANSACTIONS_RESULTS_ID: &str = "transactions-results";

/// The ID of the transactions table.
pub(super) const TRANSACTIONS_TABLE_ID: &str = "transactions-table";

/// The number of columns in the table, including the hidden ones.
const COLUMN_COUNT: usize = 8;

fn amount_class(amount: f64) -> &'static str {
    if amount < 0.0 {
        "text-red-700 dark:text-red-300"
    } else {
        "text-green-700 dark:text-green-300"
    }
}

/// Renders the full transactions page.
pub(super) fn transactions_view(
    view: &FilteredView,
    local_offset: UtcOffset,
    sort: TableSort,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="self-start text-2xl font-bold mb-4" { "Transactions" }

            (transactions_content(view, local_offset, sort))
        }
    };

    base("Transactions", &[], &content)
}

/// Renders the filter controls and the table for `view`.
pub(super) fn transactions_content(
    view: &FilteredView,
    local_offset: UtcOffset,
    sort: TableSort,
) -> Markup {
    let results_target = format!("#{TRANSACTIONS_RESULTS_ID}");
    let content_target = format!("#{TRANSACTIONS_CONTENT_ID}");
    let targets = FilterTargets {
        endpoint: endpoints::TRANSACTIONS_CONTENT,
        results: &results_target,
        content: &content_target,
    };

    html! {
        section id=(TRANSACTIONS_CONTENT_ID) class="w-full space-y-4"
        {
            (filter_controls(&view.filters, targets))
            (transactions_results(view, local_offset, sort))
        }
    }
}

/// Renders the table for `view`, or the reason it could not be loaded.
///
/// This is the element the filter form replaces on every change.
pub(super) fn transactions_results(
    view: &FilteredView,
    local_offset: UtcOffset,
    sort: TableSort,
) -> Markup {
    let rows = build_rows(&view.result.transactions, local_offset, sort);
    let message = view.result.problem.and_then(|problem| problem.message());

    html! {
        div id=(TRANSACTIONS_RESULTS_ID) class="w-full space-y-4"
        {
            @if let Some(message) = &message {
                (fetch_error_banner(message))
            }

            div class="relative overflow-x-auto rounded"
            {
                table
                    id=(TRANSACTIONS_TABLE_ID)
                    class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th
                                scope="col"
                                class=(TABLE_CELL_STYLE)
                                aria-sort=(sort.aria_sort(SortColumn::Date))
                            {
                                (sort_link("Date", SortColumn::Date, sort, &view.query))
                            }
                            th
                                scope="col"
                                class={ (TABLE_CELL_STYLE) " text-right" }
                                aria-sort=(sort.aria_sort(SortColumn::Amount))
                            {
                                (sort_link("Amount", SortColumn::Amount, sort, &view.query))
                            }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Merchant" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class="hidden" { "ID" }
                            th scope="col" class="hidden" { "Timestamp" }
                        }
                    }

                    tbody
                    {
                        @for row in &rows {
                            (row_view(row))
                        }

                        @if rows.is_empty() && message.is_none() {
                            tr
                            {
                                td
                                    colspan=(COLUMN_COUNT)
                                    data-empty-state="true"
                                    class="px-6 py-4 text-center"
                                {
                                    "No transactions match these filters."
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// A header link that sorts the table by `column` for the filters in `filter_query`.
fn sort_link(label: &str, column: SortColumn, sort: TableSort, filter_query: &str) -> Markup {
    let indicator = match (sort.sort == column, sort.order) {
        (false, _) => "",
        (true, SortOrder::Ascending) => " ▲",
        (true, SortOrder::Descending) => " ▼",
    };

    html! {
        a
            href=(sort.toggled(column).page_url(filter_query))
            data-sort=(column.as_query_value())
            class="hover:underline"
        {
            (label) (indicator)
        }
    }
}

fn row_view(row: &TransactionRow) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(row.id)
        {
            td class=(TABLE_CELL_STYLE) data-order=(row.timestamp) { (row.date_label) }

            td
                class={ (TABLE_CELL_STYLE) " text-right tabular-nums " (amount_class(row.amount)) }
                data-order=(row.amount)
            {
                (format_peso(row.amount))
            }

            @if let Some(tooltip) = &row.merchant_tooltip {
                td class=(TABLE_CELL_STYLE) title=(tooltip) { (row.merchant) }
            } @else {
                td class=(TABLE_CELL_STYLE) { (row.merchant) }
            }

            td class=(TABLE_CELL_STYLE) { (row.transaction_type) }

            (field_cell(row.id, EditableField::Category, &row.category))
            (field_cell(row.id, EditableField::Description, &row.description))

            td class="hidden" data-column="id" { (row.id) }
            td class="hidden" data-column="timestamp" { (row.timestamp) }
        }
    }
}
