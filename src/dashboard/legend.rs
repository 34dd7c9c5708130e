//! The textual legend and grand total shown under the charts.

use maud::{Markup, html};

use crate::html::format_peso;

use super::aggregation::{CategoryTotals, color_for_category};

/// The ID of the legend list.
pub(super) const LEGEND_ID: &str = "category-legend";
/// The ID of the element holding the formatted grand total.
pub(super) const TOTAL_ID: &str = "total";

pub(super) fn legend_view(totals: &CategoryTotals) -> Markup {
    html!(
        section class="w-full mb-4"
        {
            ul
                id=(LEGEND_ID)
                class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-2"
            {
                @for (category, amount) in &totals.by_category {
                    li
                        class="flex items-center justify-between px-3 py-2 rounded border
                            border-gray-200 dark:border-gray-700 bg-white dark:bg-gray-800"
                    {
                        span class="flex items-center gap-2"
                        {
                            span
                                class="inline-block w-3 h-3 rounded-full"
                                style={ "background: " (color_for_category(category)) }
                            {}

                            span { (category) }
                        }

                        span class="font-medium tabular-nums" { (format_peso(*amount)) }
                    }
                }
            }

            (total_view(totals.total))
        }
    )
}

/// The grand total, shown with the legend or on its own when nothing matched.
pub(super) fn total_view(total: f64) -> Markup {
    html!(
        p class="mt-4 text-lg font-semibold text-right"
        {
            "Total: "
            span id=(TOTAL_ID) class="tabular-nums" { (format_peso(total)) }
        }
    )
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::dashboard::aggregation::{CategoryTotals, color_for_category};

    use super::{legend_view, total_view};

    #[test]
    fn shows_swatch_name_and_amount_per_category() {
        let totals = CategoryTotals {
            by_category: [("comida".to_owned(), 1500.0), ("otros".to_owned(), 200.0)]
                .into_iter()
                .collect(),
            total: 1700.0,
        };

        let html = Html::parse_fragment(&legend_view(&totals).into_string());

        let items: Vec<_> = html
            .select(&Selector::parse("#category-legend li").unwrap())
            .collect();
        assert_eq!(items.len(), 2);

        let first_text = items[0].text().collect::<String>();
        assert!(first_text.contains("comida"), "got {first_text:?}");
        assert!(first_text.contains("$1.500"), "got {first_text:?}");

        let swatch = items[0]
            .select(&Selector::parse("span.rounded-full").unwrap())
            .next()
            .expect("No swatch found");
        assert_eq!(
            swatch.value().attr("style"),
            Some(format!("background: {}", color_for_category("comida")).as_str())
        );

        let total = html
            .select(&Selector::parse("#total").unwrap())
            .next()
            .expect("No total found");
        assert_eq!(total.text().collect::<String>(), "$1.700");
    }

    #[test]
    fn zero_total_is_shown() {
        let html = Html::parse_fragment(&total_view(0.0).into_string());

        let total = html
            .select(&Selector::parse("#total").unwrap())
            .next()
            .expect("No total found");
        assert_eq!(total.text().collect::<String>(), "$0");
    }
}
