//! Chart Component
//!
//! Yearly line chart drawn on an HTML5 canvas.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use estate_chat::ChartSpec;

/// Plot area inside the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
struct PlotArea {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl PlotArea {
    fn new(canvas_width: f64, canvas_height: f64) -> Self {
        let (margin_left, margin_right, margin_top, margin_bottom) = (70.0, 30.0, 20.0, 40.0);
        Self {
            left: margin_left,
            top: margin_top,
            width: canvas_width - margin_left - margin_right,
            height: canvas_height - margin_top - margin_bottom,
        }
    }

    /// Horizontal position of the `index`-th year out of `count`
    fn x(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            self.left + self.width / 2.0
        } else {
            self.left + (index as f64 / (count - 1) as f64) * self.width
        }
    }

    /// Vertical position of `value` (canvas y grows downward)
    fn y(&self, value: f64, (min, max): (f64, f64)) -> f64 {
        self.top + ((max - value) / (max - min)) * self.height
    }
}

/// Value range with 10% headroom, never zero-width
fn padded_bounds(bounds: Option<(f64, f64)>) -> (f64, f64) {
    let Some((min, max)) = bounds else {
        return (0.0, 1.0);
    };

    let range = max - min;
    let padding = if range > 0.0 { range * 0.1 } else { 1.0 };
    (min - padding, max + padding)
}

/// Every n-th year gets a label so they don't overlap
fn label_stride(count: usize, max_labels: usize) -> usize {
    count.div_ceil(max_labels.max(1)).max(1)
}

/// Line chart for a shaped result
#[component]
pub fn Chart(chart: ChartSpec) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();
    let chart = store_value(chart);

    create_effect(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            chart.with_value(|chart| draw_chart(&canvas, chart));
        }
    });

    let (title, legend) = chart.with_value(|chart| {
        let legend: Vec<(String, String)> = chart
            .lines
            .iter()
            .map(|line| (line.name.clone(), line.color.clone()))
            .collect();
        (chart.title, legend)
    });

    view! {
        <div class="w-full bg-white p-4 rounded-lg shadow mb-4">
            <h3 class="text-lg font-semibold mb-2">{title}</h3>
            <canvas
                node_ref=canvas_ref
                width="800"
                height="300"
                class="w-full h-64"
            />
            <div class="flex justify-center flex-wrap gap-4 mt-2">
                {legend
                    .into_iter()
                    .map(|(name, color)| view! {
                        <div class="flex items-center space-x-2">
                            <div
                                class="w-3 h-3 rounded-full"
                                style=format!("background-color: {}", color)
                            />
                            <span class="text-sm text-gray-700">{name}</span>
                        </div>
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

/// Draw the chart on canvas
fn draw_chart(canvas: &HtmlCanvasElement, chart: &ChartSpec) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    let plot = PlotArea::new(width, height);
    let bounds = padded_bounds(chart.value_bounds());
    let years = chart.years();
    let count = chart.rows.len();

    ctx.set_fill_style(&"#ffffff".into());
    ctx.fill_rect(0.0, 0.0, width, height);

    // Horizontal grid lines with y-axis labels
    ctx.set_stroke_style(&"#e5e7eb".into()); // gray-200
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");
    for i in 0..=5 {
        let y = plot.top + (i as f64 / 5.0) * plot.height;
        ctx.begin_path();
        ctx.move_to(plot.left, y);
        ctx.line_to(plot.left + plot.width, y);
        ctx.stroke();

        let value = bounds.1 - (i as f64 / 5.0) * (bounds.1 - bounds.0);
        ctx.set_fill_style(&"#6b7280".into()); // gray-500
        let _ = ctx.fill_text(&format!("{:.0}", value), 5.0, y + 4.0);
    }

    // Year labels
    let stride = label_stride(years.len(), 10);
    for (idx, year) in years.iter().enumerate().step_by(stride) {
        let x = plot.x(idx, count);
        let _ = ctx.fill_text(&year.to_string(), x - 15.0, height - 10.0);
    }

    for line in &chart.lines {
        let points = chart.points(line);
        if points.is_empty() {
            continue;
        }

        ctx.set_stroke_style(&line.color.as_str().into());
        ctx.set_line_width(2.0);
        ctx.begin_path();

        // Rows without a value break the line instead of bridging the gap
        let mut previous: Option<usize> = None;
        for &(idx, value) in &points {
            let (x, y) = (plot.x(idx, count), plot.y(value, bounds));
            match previous {
                Some(prev) if prev + 1 == idx => ctx.line_to(x, y),
                _ => ctx.move_to(x, y),
            }
            previous = Some(idx);
        }
        ctx.stroke();

        ctx.set_fill_style(&line.color.as_str().into());
        for &(idx, value) in &points {
            ctx.begin_path();
            let _ = ctx.arc(
                plot.x(idx, count),
                plot.y(value, bounds),
                3.0,
                0.0,
                std::f64::consts::PI * 2.0,
            );
            ctx.fill();
        }
    }

    if chart.value_bounds().is_none() {
        ctx.set_fill_style(&"#9ca3af".into());
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text("No chart data", width / 2.0 - 50.0, height / 2.0);
    }
}
