//! Result Shaping
//!
//! Derives what the front ends render from a [`QueryResult`]: the bot's
//! summary line, the chart (line series keyed by year) and the table.
//! Everything here is a pure function of the borrowed result.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::result::{AreaSeries, ComparisonChart, PriceTrends, QueryResult};
use crate::table::TableData;

/// Key of the x-axis value in every chart row
pub const YEAR_KEY: &str = "year";

/// Colors of the three fixed price lines
pub const FLAT_PRICE_COLOR: &str = "#0078ff";
pub const OFFICE_PRICE_COLOR: &str = "#00bfa6";
pub const SHOP_PRICE_COLOR: &str = "#f44336";

/// Colors for the first per-area comparison lines, assigned by area index
pub const COMPARISON_PALETTE: [&str; 8] = [
    "#FF9800", // Orange
    "#4CAF50", // Green
    "#2196F3", // Blue
    "#9C27B0", // Purple
    "#F44336", // Red
    "#00BCD4", // Cyan
    "#795548", // Brown
    "#607D8B", // Blue grey
];

/// Hue step for comparison colors past the palette
const GOLDEN_ANGLE: f64 = 137.507_764;

/// Line color of the comparison area at `idx`.
///
/// Areas past the palette get an HSL color whose hue advances by the golden
/// angle, so no two areas share a color.
pub fn comparison_color(idx: usize) -> String {
    match COMPARISON_PALETTE.get(idx) {
        Some(color) => color.to_string(),
        None => {
            let step = (idx - COMPARISON_PALETTE.len()) as f64;
            let hue = (step * GOLDEN_ANGLE + 15.0) % 360.0;
            format!("hsl({:.3}, 65%, 45%)", hue)
        }
    }
}

/// One chart row: `year` plus one key per plotted value
pub type ChartRow = Map<String, Value>;

/// A line drawn from one key of the chart rows
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLine {
    pub name: String,
    pub data_key: String,
    pub color: String,
}

/// Chart rows and the lines to draw through them
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: &'static str,
    pub rows: Vec<ChartRow>,
    pub lines: Vec<SeriesLine>,
}

impl ChartSpec {
    /// Years on the x-axis, in row order
    pub fn years(&self) -> Vec<i64> {
        self.rows
            .iter()
            .filter_map(|row| row.get(YEAR_KEY).and_then(Value::as_i64))
            .collect()
    }

    /// `(row index, value)` points of one line. Rows without a numeric value are skipped.
    pub fn points(&self, line: &SeriesLine) -> Vec<(usize, f64)> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(idx, row)| {
                row.get(&line.data_key)
                    .and_then(Value::as_f64)
                    .map(|value| (idx, value))
            })
            .collect()
    }

    /// Smallest and largest plotted value across all lines
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.lines
            .iter()
            .flat_map(|line| self.points(line))
            .map(|(_, value)| value)
            .fold(None, |bounds, value| match bounds {
                None => Some((value, value)),
                Some((min, max)) => Some((f64::min(min, value), f64::max(max, value))),
            })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.lines.is_empty()
    }
}

/// Everything a front end needs to render one result
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    /// The bot's chat reply
    pub summary_line: String,
    /// Backend-written analysis text
    pub summary: Option<String>,
    pub chart: Option<ChartSpec>,
    pub table: Option<TableData>,
    pub error: Option<String>,
}

impl ResultView {
    /// Summary panel text
    pub fn summary_text(&self) -> &str {
        self.summary.as_deref().unwrap_or("No summary available")
    }
}

/// Shape a result for rendering. An error result derives no chart or table.
pub fn shape(result: &QueryResult) -> ResultView {
    let summary_line = result.summary_line();

    if let QueryResult::Error(error) = result {
        return ResultView {
            summary_line,
            summary: None,
            chart: None,
            table: None,
            error: Some(error.clone()),
        };
    }

    ResultView {
        summary_line,
        summary: result.summary().map(str::to_string),
        chart: chart_for(result),
        table: result.table_rows().and_then(TableData::from_rows),
        error: None,
    }
}

/// Chart for a result, if it carries chart data
pub fn chart_for(result: &QueryResult) -> Option<ChartSpec> {
    match result {
        QueryResult::AreaAnalysis(a) => a.chart_data.as_ref().map(price_trend_chart),
        QueryResult::PriceGrowth(g) => g.chart_data.as_ref().map(price_trend_chart),
        QueryResult::Comparison(c) => c.chart_data.as_ref().map(comparison_chart),
        QueryResult::Error(_) => None,
    }
}

/// Flat, office and shop price lines straight from the yearly trend points
pub fn price_trend_chart(trends: &PriceTrends) -> ChartSpec {
    let rows = trends
        .price_trends
        .iter()
        .map(|point| {
            let mut row = ChartRow::new();
            row.insert(YEAR_KEY.to_string(), Value::from(point.year));
            let fields = [
                ("flat_price", point.flat_price),
                ("office_price", point.office_price),
                ("shop_price", point.shop_price),
                ("total_sales", point.total_sales),
                ("units_sold", point.units_sold),
            ];
            for (key, value) in fields {
                if let Some(value) = value {
                    row.insert(key.to_string(), Value::from(value));
                }
            }
            row
        })
        .collect();

    let lines = vec![
        SeriesLine {
            name: "Flat Price".to_string(),
            data_key: "flat_price".to_string(),
            color: FLAT_PRICE_COLOR.to_string(),
        },
        SeriesLine {
            name: "Office Price".to_string(),
            data_key: "office_price".to_string(),
            color: OFFICE_PRICE_COLOR.to_string(),
        },
        SeriesLine {
            name: "Shop Price".to_string(),
            data_key: "shop_price".to_string(),
            color: SHOP_PRICE_COLOR.to_string(),
        },
    ];

    ChartSpec {
        title: "Price Trends",
        rows,
        lines,
    }
}

/// One price line per compared area over the merged yearly rows
pub fn comparison_chart(chart: &ComparisonChart) -> ChartSpec {
    let lines = chart
        .comparison
        .iter()
        .enumerate()
        .map(|(idx, series)| SeriesLine {
            name: format!("{} Price", series.area),
            data_key: price_key(&series.area),
            color: comparison_color(idx),
        })
        .collect();

    ChartSpec {
        title: "Area Comparison",
        rows: merge_comparison(&chart.comparison),
        lines,
    }
}

/// Merge per-area series into one row per distinct year, ascending.
///
/// An area contributes `{area}_price` and `{area}_demand` only to the years
/// it has a point for. Missing years are left out of the row, never
/// zero-filled.
pub fn merge_comparison(series: &[AreaSeries]) -> Vec<ChartRow> {
    let years: BTreeSet<i64> = series
        .iter()
        .flat_map(|area| area.data.iter().map(|point| point.year))
        .collect();

    years
        .into_iter()
        .map(|year| {
            let mut row = ChartRow::new();
            row.insert(YEAR_KEY.to_string(), Value::from(year));

            for area in series {
                if let Some(point) = area.data.iter().find(|point| point.year == year) {
                    row.insert(price_key(&area.area), optional_number(point.price));
                    row.insert(demand_key(&area.area), optional_number(point.demand));
                }
            }
            row
        })
        .collect()
}

pub fn price_key(area: &str) -> String {
    format!("{}_price", area)
}

pub fn demand_key(area: &str) -> String {
    format!("{}_demand", area)
}

fn optional_number(value: Option<f64>) -> Value {
    value.map(Value::from).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ComparisonPoint;
    use serde_json::json;

    fn series(area: &str, years: &[i64]) -> AreaSeries {
        AreaSeries {
            area: area.to_string(),
            data: years
                .iter()
                .map(|&year| ComparisonPoint {
                    year,
                    price: Some(year as f64 * 2.0),
                    demand: Some(10.0),
                })
                .collect(),
        }
    }

    #[test]
    fn test_merge_keeps_sparse_rows() {
        let rows = merge_comparison(&[series("A", &[2020, 2021]), series("B", &[2021, 2022])]);

        assert_eq!(rows.len(), 3);
        let years: Vec<i64> = rows.iter().map(|r| r["year"].as_i64().unwrap()).collect();
        assert_eq!(years, vec![2020, 2021, 2022]);

        assert!(rows[0].contains_key("A_price"));
        assert!(rows[0].contains_key("A_demand"));
        assert!(!rows[0].contains_key("B_price"));
        assert!(!rows[0].contains_key("B_demand"));

        for key in ["A_price", "A_demand", "B_price", "B_demand"] {
            assert!(rows[1].contains_key(key), "2021 row missing {}", key);
        }

        assert!(!rows[2].contains_key("A_price"));
        assert_eq!(rows[2]["B_price"], json!(4044.0));
    }

    #[test]
    fn test_merge_sorts_unordered_years() {
        let rows = merge_comparison(&[series("A", &[2022, 2019]), series("B", &[2020, 2019])]);
        let years: Vec<i64> = rows.iter().map(|r| r["year"].as_i64().unwrap()).collect();
        assert_eq!(years, vec![2019, 2020, 2022]);
    }

    #[test]
    fn test_comparison_lines_have_distinct_colors() {
        let chart = ComparisonChart {
            areas: vec!["A".into(), "B".into(), "C".into()],
            comparison: vec![series("A", &[2020]), series("B", &[2020]), series("C", &[2020])],
        };
        let spec = comparison_chart(&chart);

        assert_eq!(spec.title, "Area Comparison");
        let names: Vec<&str> = spec.lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["A Price", "B Price", "C Price"]);
        assert_eq!(spec.lines[1].data_key, "B_price");

        let colors: BTreeSet<&str> = spec.lines.iter().map(|l| l.color.as_str()).collect();
        assert_eq!(colors.len(), 3);
    }

    #[test]
    fn test_comparison_colors_stay_distinct_past_palette() {
        let names: Vec<String> = (0..20).map(|i| format!("Area {}", i)).collect();
        let chart = ComparisonChart {
            areas: names.clone(),
            comparison: names.iter().map(|name| series(name, &[2020])).collect(),
        };
        let spec = comparison_chart(&chart);

        assert_eq!(spec.lines.len(), 20);
        assert_eq!(spec.lines[0].color, COMPARISON_PALETTE[0]);
        assert!(spec.lines[8].color.starts_with("hsl("));

        let colors: BTreeSet<&str> = spec.lines.iter().map(|l| l.color.as_str()).collect();
        assert_eq!(colors.len(), 20);
    }

    #[test]
    fn test_price_trend_chart_leaves_gaps() {
        let result = QueryResult::from_value(json!({
            "type": "price_growth",
            "area": "Akurdi",
            "years": 3,
            "chart_data": {"price_trends": [
                {"year": 2021, "flat_price": 1.0, "office_price": 2.0, "shop_price": 3.0},
                {"year": 2022, "flat_price": 1.5}
            ]}
        }))
        .unwrap();

        let chart = chart_for(&result).unwrap();
        assert_eq!(chart.title, "Price Trends");
        assert_eq!(chart.years(), vec![2021, 2022]);
        assert_eq!(chart.lines.len(), 3);
        assert_eq!(chart.points(&chart.lines[0]), vec![(0, 1.0), (1, 1.5)]);
        assert_eq!(chart.points(&chart.lines[2]), vec![(0, 3.0)]);
        assert_eq!(chart.value_bounds(), Some((1.0, 3.0)));
    }

    #[test]
    fn test_error_result_derives_nothing() {
        let view = shape(&QueryResult::Error("no data".to_string()));
        assert!(view.chart.is_none());
        assert!(view.table.is_none());
        assert!(view.summary_line.contains("no data"));
        assert_eq!(view.error.as_deref(), Some("no data"));
    }

    #[test]
    fn test_shape_without_sections() {
        let result = QueryResult::from_value(json!({
            "type": "comparison",
            "areas": ["A", "B"],
            "table_data": []
        }))
        .unwrap();

        let view = shape(&result);
        assert!(view.chart.is_none());
        assert!(view.table.is_none());
        assert_eq!(view.summary_text(), "No summary available");
    }

    #[test]
    fn test_shaping_is_repeatable() {
        let result = QueryResult::from_value(json!({
            "type": "comparison",
            "areas": ["A", "B"],
            "summary": "A leads B.",
            "chart_data": {"areas": ["A", "B"], "comparison": [
                {"area": "A", "data": [{"year": 2020, "price": 1.0, "demand": 5.0}]},
                {"area": "B", "data": [{"year": 2021, "price": 2.0, "demand": 6.0}]}
            ]},
            "table_data": [{"area": "A", "year": 2020}, {"area": "B", "year": 2021}]
        }))
        .unwrap();
        let before = result.clone();

        let first = shape(&result);
        let second = shape(&result);
        assert_eq!(first, second);
        assert_eq!(result, before);
        assert_eq!(first.table.as_ref().unwrap().len(), 2);
        assert_eq!(first.summary_text(), "A leads B.");
    }
}
