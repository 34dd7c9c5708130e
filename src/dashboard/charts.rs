//! Chart generation and rendering for the dashboard.
//!
//! This module creates ECharts visualisations of spending per category:
//! - **Category bar chart**: one bar per category
//! - **Category donut chart**: each category's share of the total
//!
//! Both charts use the same colour for a category, see
//! [color_for_category](super::aggregation::color_for_category).

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    datatype::{DataPoint, DataPointItem},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, ItemStyle, JsFunction, Tooltip, Trigger,
    },
    series::{Bar, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::dashboard::aggregation::{CategoryTotals, color_for_category};

/// The ID of the bar chart container.
pub(super) const BAR_CHART_ID: &str = "category-bar-chart";
/// The ID of the donut chart container.
pub(super) const DONUT_CHART_ID: &str = "category-donut-chart";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Build the bar and donut charts for `totals`.
pub(super) fn category_charts(totals: &CategoryTotals) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: BAR_CHART_ID,
            options: category_bar_chart(totals).to_string(),
        },
        DashboardChart {
            id: DONUT_CHART_ID,
            options: category_donut_chart(totals).to_string(),
        },
    ]
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates the inline script that draws `charts`.
///
/// The script runs each time it is swapped into the page. Any chart already
/// attached to a container is disposed before the new one is created, and
/// containers missing from the page are skipped.
pub(super) fn charts_script(charts: &[DashboardChart]) -> Markup {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    if (!chartDom) {{
                        return;
                    }}

                    const existing = echarts.getInstanceByDom(chartDom);
                    if (existing) {{
                        existing.dispose();
                    }}

                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', () => chart.resize());

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id,
                escape_for_script(&chart.options)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    html!(
        script { (PreEscaped(script_content)) }
    )
}

/// Escapes `<`, `>` and `&` so that chart options cannot close the script
/// element or open a comment inside it.
///
/// The characters are replaced with their `\u` escapes, which JSON strings
/// read back as the same characters. Formatter functions in the options must
/// not use these characters outside string literals.
fn escape_for_script(options: &str) -> String {
    let mut escaped = String::with_capacity(options.len());

    for character in options.chars() {
        match character {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            _ => escaped.push(character),
        }
    }

    escaped
}

pub(super) fn category_bar_chart(totals: &CategoryTotals) -> Chart {
    let data: Vec<DataPoint> = totals
        .by_category
        .iter()
        .map(|(category, amount)| {
            DataPointItem::new(*amount)
                .item_style(ItemStyle::new().color(color_for_category(category).as_str()))
                .into()
        })
        .collect();

    Chart::new()
        .title(Title::new().text("Spending by category"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(currency_formatter())
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(totals.labels()),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("CLP").data(data))
}

pub(super) fn category_donut_chart(totals: &CategoryTotals) -> Chart {
    let data: Vec<DataPoint> = totals
        .by_category
        .iter()
        .map(|(category, amount)| {
            DataPointItem::new(*amount)
                .name(category.as_str())
                .item_style(ItemStyle::new().color(color_for_category(category).as_str()))
                .into()
        })
        .collect();

    Chart::new()
        .title(Title::new().text("Share of spending"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .series(
            Pie::new()
                .name("CLP")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

/// Formats chart values as Chilean pesos without decimals.
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('es-CL', {
              style: 'currency',
              currency: 'CLP',
              maximumFractionDigits: 0
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use serde_json::Value;

    use crate::dashboard::aggregation::{CategoryTotals, color_for_category};

    use super::{
        BAR_CHART_ID, DONUT_CHART_ID, category_bar_chart, category_charts, category_donut_chart,
        charts_script, charts_view, escape_for_script,
    };

    fn totals() -> CategoryTotals {
        CategoryTotals {
            by_category: [("comida".to_owned(), 1500.0), ("otros".to_owned(), 200.0)]
                .into_iter()
                .collect(),
            total: 1700.0,
        }
    }

    fn series_data(chart: &charming::Chart) -> Vec<Value> {
        let options = serde_json::to_value(chart).unwrap();

        options["series"][0]["data"]
            .as_array()
            .expect("series data missing")
            .clone()
    }

    #[test]
    fn bar_chart_colours_each_category() {
        let chart = category_bar_chart(&totals());

        let data = series_data(&chart);

        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["value"], 1500.0);
        assert_eq!(data[0]["itemStyle"]["color"], color_for_category("comida"));
        assert_eq!(data[1]["itemStyle"]["color"], color_for_category("otros"));
        assert!(chart.to_string().contains("comida"));
    }

    #[test]
    fn donut_chart_names_each_slice() {
        let chart = category_donut_chart(&totals());

        let data = series_data(&chart);

        assert_eq!(data[0]["name"], "comida");
        assert_eq!(data[1]["name"], "otros");
        assert_eq!(data[1]["value"], 200.0);
        assert_eq!(
            serde_json::to_value(&chart).unwrap()["series"][0]["radius"],
            serde_json::json!(["40%", "70%"])
        );
    }

    #[test]
    fn script_disposes_existing_chart_and_skips_missing_container() {
        let charts = category_charts(&totals());

        let script = charts_script(&charts).into_string();

        assert!(script.contains("echarts.getInstanceByDom(chartDom)"));
        assert!(script.contains("existing.dispose()"));
        assert!(script.contains("if (!chartDom)"));
        assert!(script.contains(BAR_CHART_ID));
        assert!(script.contains(DONUT_CHART_ID));
    }

    #[test]
    fn view_has_container_per_chart() {
        let charts = category_charts(&totals());

        let html = Html::parse_fragment(&charts_view(&charts).into_string());

        for id in [BAR_CHART_ID, DONUT_CHART_ID] {
            let selector = Selector::parse(&format!("#{id}")).unwrap();
            assert!(html.select(&selector).next().is_some(), "missing #{id}");
        }
    }

    #[test]
    fn category_cannot_close_the_script_element() {
        let totals = CategoryTotals {
            by_category: [("</script><script>alert(1)</script>".to_owned(), 100.0)]
                .into_iter()
                .collect(),
            total: 100.0,
        };
        let charts = category_charts(&totals);

        let script = charts_script(&charts).into_string();

        assert!(!script.contains("</script><script>alert(1)"));
        assert_eq!(script.matches("</script>").count(), 1);
        assert!(script.contains("\\u003c/script\\u003e\\u003cscript\\u003ealert(1)"));

        let html = Html::parse_fragment(&script);
        let scripts: Vec<_> = html.select(&Selector::parse("script").unwrap()).collect();
        assert_eq!(scripts.len(), 1);
    }

    #[test]
    fn escaping_leaves_formatters_and_plain_options_unchanged() {
        let options = category_bar_chart(&totals()).to_string();

        assert_eq!(escape_for_script(&options), options);
        assert_eq!(escape_for_script("a & b <c>"), "a \\u0026 b \\u003cc\\u003e");
    }
}
