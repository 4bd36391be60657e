//! Chart generation and rendering for the dashboard.
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with a matching HTML container and initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::{Line, bar::Bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    dashboard::aggregation::{CostCenterTotal, MonthSummary},
    html::HeadElement,
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

impl DashboardChart {
    pub(super) fn new(id: &'static str, chart: &Chart) -> Self {
        Self {
            id,
            options: chart.to_string(),
        }
    }
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

/// The ECharts library followed by the code that draws `charts` once the page has loaded.
///
/// Charts follow the system dark mode setting and resize with the window.
pub(super) fn charts_scripts(charts: &[DashboardChart]) -> [HeadElement; 2] {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        HeadElement::ScriptSource(PreEscaped(wrapped_script)),
    ]
}

/// Entries and exits as bars with the net result as a line, one point per month.
pub(super) fn history_chart(history: &[MonthSummary]) -> Chart {
    let labels = history
        .iter()
        .map(|month| month.month.label())
        .collect::<Vec<_>>();
    let entries = history
        .iter()
        .map(|month| month.summary.entries)
        .collect::<Vec<_>>();
    let exits = history
        .iter()
        .map(|month| month.summary.exits)
        .collect::<Vec<_>>();
    let net = history
        .iter()
        .map(|month| month.summary.net())
        .collect::<Vec<_>>();

    Chart::new()
        .title(Title::new().text("History").subtext("Every month with transactions"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(80)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Entries").data(entries))
        .series(Bar::new().name("Exits").data(exits))
        .series(Line::new().name("Net").data(net))
}

/// The month's amounts per cost center, largest first.
pub(super) fn breakdown_chart(breakdown: &[CostCenterTotal]) -> Chart {
    let labels = breakdown
        .iter()
        .map(|total| total.name.clone())
        .collect::<Vec<_>>();
    let amounts = breakdown
        .iter()
        .map(|total| total.amount)
        .collect::<Vec<_>>();

    Chart::new()
        .title(
            Title::new()
                .text("Cost Centers")
                .subtext("Amounts in the selected month"),
        )
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Amount").data(amounts))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('pt-BR', {
              style: 'currency',
              currency: 'BRL'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use crate::{
        dashboard::aggregation::{CostCenterTotal, MonthSummary, Summary},
        html::HeadElement,
        month::MonthRef,
    };

    use super::{DashboardChart, breakdown_chart, charts_scripts, history_chart};

    #[test]
    fn history_chart_has_one_label_per_month() {
        let history = vec![
            MonthSummary {
                month: MonthRef::new("2024-04").unwrap(),
                summary: Summary {
                    entries: 80.0,
                    exits: 0.0,
                    count: 1,
                },
            },
            MonthSummary {
                month: MonthRef::new("2024-05").unwrap(),
                summary: Summary {
                    entries: 500.0,
                    exits: 150.0,
                    count: 3,
                },
            },
        ];

        let options = history_chart(&history).to_string();

        assert!(options.contains("April 2024"));
        assert!(options.contains("May 2024"));
        assert!(options.contains("350"), "net for May missing from {options}");
    }

    #[test]
    fn scripts_initialize_every_chart() {
        let breakdown = vec![CostCenterTotal {
            name: "Rent".to_owned(),
            amount: 620.0,
        }];
        let charts = [DashboardChart::new("breakdown-chart", &breakdown_chart(&breakdown))];

        let [link, source] = charts_scripts(&charts);

        assert!(matches!(link, HeadElement::ScriptLink(path) if path.contains("echarts")));
        let HeadElement::ScriptSource(source) = source else {
            panic!("want script source");
        };
        assert!(source.0.contains("document.getElementById(\"breakdown-chart\")"));
        assert!(source.0.contains("Rent"));
    }
}
