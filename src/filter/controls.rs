//! The filter form, rendered from a [FilterState].
//!
//! The form submits the whole set of controls on every change and the
//! response replaces only the results. The date mode radios and the reset
//! button send their own requests, told apart through the `HX-Trigger-Name`
//! header, and their responses replace the controls as well.

use maud::{Markup, html};

use crate::html::{
    BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
    FORM_TEXT_INPUT_STYLE, loading_spinner,
};

use super::{
    event::{DATE_MODE_CONTROL, RESET_CONTROL},
    query::NO_TYPES_SENTINEL,
    state::{DateMode, FilterState, TransactionType},
};

/// The ID of the filter form.
pub const FILTER_FORM_ID: &str = "filter-form";

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Where the filter form sends its requests and what the responses replace.
#[derive(Debug, Clone, Copy)]
pub struct FilterTargets<'a> {
    /// The fragment route the form submits to.
    pub endpoint: &'a str,
    /// The CSS selector of the results, replaced after a plain change.
    pub results: &'a str,
    /// The CSS selector of the controls and results, replaced after a date
    /// mode change or a reset.
    pub content: &'a str,
}

/// Render the filter form for `state`.
pub fn filter_controls(state: &FilterState, targets: FilterTargets) -> Markup {
    let is_range = state.date_mode == DateMode::Range;
    let month = state.month.as_deref().unwrap_or_default();

    html!(
        form
            id=(FILTER_FORM_ID)
            hx-get=(targets.endpoint)
            hx-trigger="change, input changed delay:400ms from:input[type='search']"
            hx-target=(targets.results)
            hx-swap="outerHTML"
            hx-sync="this:replace"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            class="w-full grid grid-cols-1 md:grid-cols-2 xl:grid-cols-4 gap-4 mb-6
                bg-white dark:bg-gray-800 p-4 rounded-lg shadow"
        {
            fieldset class="flex gap-2"
            {
                legend class=(FORM_LABEL_STYLE) { "Dates" }

                @for mode in [DateMode::Ym, DateMode::Range] {
                    @let id = format!("date-mode-{}", mode.as_query_value());
                    div class="flex items-center"
                    {
                        input
                            type="radio"
                            id=(id)
                            name=(DATE_MODE_CONTROL)
                            value=(mode.as_query_value())
                            checked[state.date_mode == mode]
                            hx-get=(targets.endpoint)
                            hx-trigger="change consume"
                            hx-target=(targets.content)
                            hx-include="closest form"
                            hx-sync="closest form:replace"
                            class=(format!("sr-only {FORM_RADIO_INPUT_STYLE}"));

                        label for=(id) class=(FORM_RADIO_LABEL_STYLE)
                        {
                            @match mode {
                                DateMode::Ym => { "Year and month" }
                                DateMode::Range => { "Date range" }
                            }
                        }
                    }
                }
            }

            fieldset
                id="ym-group"
                class="grid grid-cols-2 gap-2"
                disabled[is_range]
                hidden[is_range]
            {
                div
                {
                    label for="filter-year" class=(FORM_LABEL_STYLE) { "Year" }
                    input
                        type="number"
                        id="filter-year"
                        name="year"
                        min="2000"
                        max="2100"
                        value=(state.year.as_deref().unwrap_or_default())
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="filter-month" class=(FORM_LABEL_STYLE) { "Month" }
                    select id="filter-month" name="month" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" selected[month.is_empty()] { "All months" }

                        @for (index, name) in MONTH_NAMES.iter().enumerate() {
                            @let value = (index + 1).to_string();
                            option value=(value) selected[month == value] { (name) }
                        }
                    }
                }
            }

            fieldset
                id="range-group"
                class="grid grid-cols-2 gap-2"
                disabled[!is_range]
                hidden[!is_range]
            {
                div
                {
                    label for="filter-start" class=(FORM_LABEL_STYLE) { "From" }
                    input
                        type="date"
                        id="filter-start"
                        name="start"
                        value=(state.start.as_deref().unwrap_or_default())
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="filter-end" class=(FORM_LABEL_STYLE) { "To" }
                    input
                        type="date"
                        id="filter-end"
                        name="end"
                        value=(state.end.as_deref().unwrap_or_default())
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                span class=(FORM_LABEL_STYLE) { "Type" }

                details id="type-dropdown" class="relative"
                {
                    summary
                        id="type-summary"
                        class=(format!("cursor-pointer list-none {FORM_TEXT_INPUT_STYLE}"))
                    {
                        (state.types.summary_label())
                    }

                    div
                        class="absolute z-10 mt-1 w-full flex flex-col gap-2 p-3 rounded
                            bg-white dark:bg-gray-700 shadow"
                    {
                        // Keeps an empty selection distinct from a full one.
                        input type="hidden" name="type" value=(NO_TYPES_SENTINEL);

                        @for transaction_type in TransactionType::ALL {
                            label class="flex items-center gap-2 text-sm"
                            {
                                input
                                    type="checkbox"
                                    name="type"
                                    value=(transaction_type.as_query_value())
                                    checked[state.types.contains(transaction_type)];

                                (transaction_type.label())
                            }
                        }
                    }
                }
            }

            div
            {
                label for="filter-category" class=(FORM_LABEL_STYLE) { "Category" }
                input
                    type="search"
                    id="filter-category"
                    name="category"
                    placeholder="e.g. comida"
                    value=(state.category.as_deref().unwrap_or_default())
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="filter-q" class=(FORM_LABEL_STYLE) { "Search" }
                input
                    type="search"
                    id="filter-q"
                    name="q"
                    placeholder="Merchant or description"
                    value=(state.q.as_deref().unwrap_or_default())
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex items-end gap-2"
            {
                button
                    type="button"
                    name=(RESET_CONTROL)
                    value="1"
                    hx-get=(targets.endpoint)
                    hx-trigger="click consume"
                    hx-target=(targets.content)
                    hx-include="closest form"
                    hx-sync="closest form:replace"
                    class=(BUTTON_SECONDARY_STYLE)
                {
                    "Reset dates"
                }

                span id="indicator" class="mb-2"
                {
                    span class="htmx-indicator" { (loading_spinner()) }
                }
            }
        }
    )
}
