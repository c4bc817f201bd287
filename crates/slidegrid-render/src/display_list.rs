//! Display-list content renderer.
//!
//! Draws every block type from its resolved content using plain vector
//! primitives: text runs, rectangles, circles and paths.

use crate::renderer::{ContentRenderer, FontStyle, Scene, text_width};
use kurbo::{BezPath, Circle, CircleSegment, Point, Rect, RoundedRect};
use peniko::Color;
use slidegrid_core::content::{
    AccentColor, BlockContent, ChartDataPoint, ChartKind, HeadingLevel, MetricItem,
    ResolvedContent, TableData, Trend,
};
use std::f64::consts::{FRAC_PI_2, TAU};

const FOREGROUND: Color = Color::from_rgba8(15, 23, 42, 255);
const MUTED: Color = Color::from_rgba8(100, 116, 139, 255);
const BORDER: Color = Color::from_rgba8(226, 232, 240, 255);
const PRIMARY: Color = Color::from_rgba8(25, 128, 230, 255);
const CODE_BACKGROUND: Color = Color::from_rgba8(30, 41, 59, 255);
const CODE_FOREGROUND: Color = Color::from_rgba8(226, 232, 240, 255);
const PLACEHOLDER_FILL: Color = Color::from_rgba8(241, 245, 249, 255);

/// Pie segment colors, cycled.
const CHART_COLORS: [Color; 5] = [
    Color::from_rgba8(25, 128, 230, 255),
    Color::from_rgba8(41, 102, 163, 255),
    Color::from_rgba8(45, 89, 134, 255),
    Color::from_rgba8(46, 77, 107, 255),
    Color::from_rgba8(45, 64, 83, 255),
];

/// Chart plot insets: top, right, bottom (axis labels), left.
const CHART_INSETS: (f64, f64, f64, f64) = (10.0, 10.0, 20.0, 0.0);

fn accent(color: AccentColor) -> Color {
    match color {
        AccentColor::Blue => Color::from_rgba8(37, 99, 235, 255),
        AccentColor::Green => Color::from_rgba8(22, 163, 74, 255),
        AccentColor::Red => Color::from_rgba8(220, 38, 38, 255),
    }
}

fn trend_color(trend: Trend) -> Color {
    match trend {
        Trend::Up => accent(AccentColor::Green),
        Trend::Down => accent(AccentColor::Red),
        Trend::Neutral => MUTED,
    }
}

/// Default content renderer. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayListRenderer;

impl DisplayListRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw already-resolved content.
    pub fn render_resolved(&self, content: &ResolvedContent, bounds: Rect, scene: &mut Scene) {
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return;
        }
        match content {
            ResolvedContent::Heading { text, level } => {
                let size = match level {
                    HeadingLevel::Title => 24.0,
                    HeadingLevel::Subtitle => 18.0,
                };
                scene.text_block(bounds, text, size, FOREGROUND, FontStyle::Bold);
            }
            ResolvedContent::Text { text, color } => {
                let color = color.map(accent).unwrap_or(FOREGROUND);
                scene.text_block(bounds, text, 14.0, color, FontStyle::Regular);
            }
            ResolvedContent::AccentText { text } => {
                scene.text_block(bounds, text, 18.0, PRIMARY, FontStyle::Bold);
            }
            ResolvedContent::Quote { text } => {
                let bar = Rect::new(bounds.x0, bounds.y0, bounds.x0 + 4.0, bounds.y1);
                scene.fill(&bar, PRIMARY);
                let inner = Rect::new(bounds.x0 + 16.0, bounds.y0, bounds.x1, bounds.y1);
                scene.text_block(inner, text, 14.0, MUTED, FontStyle::Italic);
            }
            ResolvedContent::Callout { text } => {
                let frame = RoundedRect::from_rect(bounds, 8.0);
                scene.fill(&frame, PRIMARY.with_alpha(0.1));
                scene.stroke(&frame, PRIMARY.with_alpha(0.2), 1.0);
                scene.text_block(bounds.inset(-12.0), text, 14.0, FOREGROUND, FontStyle::Regular);
            }
            ResolvedContent::Code { text } => {
                scene.fill(&RoundedRect::from_rect(bounds, 4.0), CODE_BACKGROUND);
                scene.text_block(bounds.inset(-8.0), text, 12.0, CODE_FOREGROUND, FontStyle::Mono);
            }
            ResolvedContent::List { items } => render_list(items, bounds, scene),
            ResolvedContent::Timeline { items } => render_timeline(items, bounds, scene),
            ResolvedContent::Chart { kind, data, unit } => match kind {
                ChartKind::Bar => render_bar_chart(data, bounds, scene),
                ChartKind::Pie => render_pie_chart(data, bounds, scene),
                ChartKind::Line => render_series_chart(data, unit.as_deref(), false, bounds, scene),
                ChartKind::Area => render_series_chart(data, unit.as_deref(), true, bounds, scene),
            },
            ResolvedContent::Table { data } => render_table(data, bounds, scene),
            ResolvedContent::Metrics { metrics } => render_metrics(metrics, bounds, scene),
            ResolvedContent::Image {
                source,
                scale,
                offset_x,
                offset_y,
            } => match source {
                Some(_) => {
                    let size = bounds.size() * *scale;
                    let center = bounds.center()
                        + kurbo::Vec2::new(
                            bounds.width() * offset_x / 100.0,
                            bounds.height() * offset_y / 100.0,
                        );
                    let frame = Rect::from_center_size(center, size).intersect(bounds);
                    scene.fill(&frame, Color::from_rgba8(203, 213, 225, 255));
                    scene.stroke(&frame, MUTED, 1.0);
                }
                None => render_placeholder("Image", bounds, scene),
            },
            ResolvedContent::Logos { slots } => render_logos(slots, bounds, scene),
            ResolvedContent::Divider => {
                let y = bounds.center().y;
                scene.line(Point::new(bounds.x0, y), Point::new(bounds.x1, y), BORDER, 2.0);
            }
            ResolvedContent::Placeholder { label } => render_placeholder(label, bounds, scene),
        }
    }
}

impl ContentRenderer for DisplayListRenderer {
    fn render(&self, content: &BlockContent, bounds: Rect, scene: &mut Scene) {
        self.render_resolved(&content.resolve(), bounds, scene);
    }
}

fn render_placeholder(label: &str, bounds: Rect, scene: &mut Scene) {
    scene.fill(&bounds, PLACEHOLDER_FILL);
    scene.stroke(&bounds, BORDER, 1.0);
    let size = 12.0;
    let origin = Point::new(
        bounds.center().x - text_width(label, size) / 2.0,
        bounds.center().y + size / 2.0,
    );
    scene.text(origin, label, size, MUTED, FontStyle::Regular);
}

fn render_list(items: &[String], bounds: Rect, scene: &mut Scene) {
    let size = 14.0;
    let mut y = bounds.y0;
    for item in items {
        if y + size > bounds.y1 {
            break;
        }
        scene.fill(&Circle::new((bounds.x0 + 3.0, y + size / 2.0), 3.0), PRIMARY);
        let text_rect = Rect::new(bounds.x0 + 14.0, y, bounds.x1, bounds.y1);
        y = scene.text_block(text_rect, item, size, FOREGROUND, FontStyle::Regular) + 4.0;
    }
}

fn render_timeline(items: &[String], bounds: Rect, scene: &mut Scene) {
    if items.is_empty() {
        return;
    }
    let step = bounds.width() / items.len() as f64;
    let y = bounds.center().y;
    let size = 11.0;
    for (i, item) in items.iter().enumerate() {
        let x = bounds.x0 + step * i as f64 + 6.0;
        if i + 1 < items.len() {
            scene.line(Point::new(x, y), Point::new(x + step, y), BORDER, 2.0);
        }
        scene.fill(&Circle::new((x, y), 6.0), PRIMARY);
        scene.text(
            Point::new(x + 10.0, y + size / 2.0 - 1.0),
            item.as_str(),
            size,
            FOREGROUND,
            FontStyle::Regular,
        );
    }
}

/// Plot area and the baseline label row below it.
fn plot_area(bounds: Rect) -> Rect {
    let (top, right, bottom, left) = CHART_INSETS;
    let plot = Rect::new(bounds.x0 + left, bounds.y0 + top, bounds.x1 - right, bounds.y1 - bottom);
    if plot.width() <= 0.0 || plot.height() <= 0.0 {
        bounds
    } else {
        plot
    }
}

fn max_value(data: &[ChartDataPoint]) -> f64 {
    data.iter()
        .map(|point| point.value)
        .filter(|value| value.is_finite())
        .fold(0.0, f64::max)
}

/// Height of a value in a plot whose top is `max`. Negative and non-finite
/// values sit on the baseline.
fn scaled(value: f64, max: f64, height: f64) -> f64 {
    if max <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value.max(0.0) / max) * height
}

fn axis_label(scene: &mut Scene, label: &str, center_x: f64, baseline: f64) {
    let size = 10.0;
    scene.text(
        Point::new(center_x - text_width(label, size) / 2.0, baseline),
        label,
        size,
        MUTED,
        FontStyle::Regular,
    );
}

fn render_bar_chart(data: &[ChartDataPoint], bounds: Rect, scene: &mut Scene) {
    let plot = plot_area(bounds);
    scene.line(Point::new(plot.x0, plot.y1), Point::new(plot.x1, plot.y1), BORDER, 1.0);
    if data.is_empty() {
        return;
    }
    let max = max_value(data);
    let slot = plot.width() / data.len() as f64;
    let bar_width = slot * 0.6;
    for (i, point) in data.iter().enumerate() {
        let center_x = plot.x0 + slot * (i as f64 + 0.5);
        let height = scaled(point.value, max, plot.height());
        if height > 0.0 {
            let bar = Rect::new(
                center_x - bar_width / 2.0,
                plot.y1 - height,
                center_x + bar_width / 2.0,
                plot.y1,
            );
            scene.fill(&bar, PRIMARY);
        }
        axis_label(scene, &point.label, center_x, (plot.y1 + 14.0).min(bounds.y1));
    }
}

fn render_pie_chart(data: &[ChartDataPoint], bounds: Rect, scene: &mut Scene) {
    let center = bounds.center();
    let radius = bounds.width().min(bounds.height()) / 2.0 * 0.8;
    let total: f64 = data
        .iter()
        .map(|point| point.value)
        .filter(|value| value.is_finite() && *value > 0.0)
        .sum();
    if total <= 0.0 {
        scene.stroke(&Circle::new(center, radius), BORDER, 1.0);
        return;
    }
    let mut start = -FRAC_PI_2;
    for (i, point) in data.iter().enumerate() {
        if !(point.value.is_finite() && point.value > 0.0) {
            continue;
        }
        let sweep = point.value / total * TAU;
        let segment = CircleSegment::new(center, radius, 0.0, start, sweep);
        scene.fill(&segment, CHART_COLORS[i % CHART_COLORS.len()]);
        start += sweep;
    }
}

fn render_series_chart(
    data: &[ChartDataPoint],
    unit: Option<&str>,
    filled: bool,
    bounds: Rect,
    scene: &mut Scene,
) {
    let plot = plot_area(bounds);
    scene.line(Point::new(plot.x0, plot.y1), Point::new(plot.x1, plot.y1), BORDER, 1.0);
    if let Some(unit) = unit.filter(|unit| !unit.is_empty()) {
        scene.text(Point::new(bounds.x0, bounds.y0 + 9.0), unit, 9.0, MUTED, FontStyle::Regular);
    }
    if data.is_empty() {
        return;
    }
    let max = max_value(data);
    let step = if data.len() > 1 {
        plot.width() / (data.len() - 1) as f64
    } else {
        0.0
    };
    let points: Vec<Point> = data
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let x = if data.len() > 1 {
                plot.x0 + step * i as f64
            } else {
                plot.center().x
            };
            Point::new(x, plot.y1 - scaled(point.value, max, plot.height()))
        })
        .collect();

    let mut line = BezPath::new();
    for (i, point) in points.iter().enumerate() {
        if i == 0 {
            line.move_to(*point);
        } else {
            line.line_to(*point);
        }
    }
    if filled {
        let mut area = line.clone();
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            area.line_to((last.x, plot.y1));
            area.line_to((first.x, plot.y1));
            area.close_path();
        }
        scene.fill(&area, PRIMARY.with_alpha(0.3));
    }
    scene.stroke(&line, PRIMARY, 2.0);
    for (point, data_point) in points.iter().zip(data) {
        if !filled {
            scene.fill(&Circle::new(*point, 3.0), PRIMARY);
        }
        axis_label(scene, &data_point.label, point.x, (plot.y1 + 14.0).min(bounds.y1));
    }
}

fn render_table(data: &TableData, bounds: Rect, scene: &mut Scene) {
    let columns = data
        .rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(data.headers.len()))
        .max()
        .unwrap_or(0)
        .max(1);
    let rows = data.rows.len() + 1;
    let cell_width = bounds.width() / columns as f64;
    let cell_height = (bounds.height() / rows as f64).min(28.0);
    let size = 11.0;

    let header = Rect::new(bounds.x0, bounds.y0, bounds.x1, bounds.y0 + cell_height);
    scene.fill(&header, PLACEHOLDER_FILL);
    let all_rows = std::iter::once((&data.headers, FontStyle::Bold))
        .chain(data.rows.iter().map(|row| (row, FontStyle::Regular)));
    for (r, (row, style)) in all_rows.enumerate() {
        let y0 = bounds.y0 + cell_height * r as f64;
        for c in 0..columns {
            let cell = Rect::new(
                bounds.x0 + cell_width * c as f64,
                y0,
                bounds.x0 + cell_width * (c + 1) as f64,
                y0 + cell_height,
            );
            scene.stroke(&cell, BORDER, 1.0);
            if let Some(text) = row.get(c) {
                if cell_height >= size {
                    scene.text(
                        Point::new(cell.x0 + 4.0, cell.center().y + size / 2.0 - 1.0),
                        text.as_str(),
                        size,
                        FOREGROUND,
                        style,
                    );
                }
            }
        }
    }
}

fn render_metrics(metrics: &[MetricItem], bounds: Rect, scene: &mut Scene) {
    if metrics.is_empty() {
        return;
    }
    let width = bounds.width() / metrics.len() as f64;
    for (i, metric) in metrics.iter().enumerate() {
        let x = bounds.x0 + width * i as f64;
        let mut y = bounds.y0 + 10.0;
        scene.text(Point::new(x, y), metric.label.as_str(), 10.0, MUTED, FontStyle::Regular);
        y += 22.0;
        if y > bounds.y1 {
            continue;
        }
        let value_color = metric.value_color.map(accent).unwrap_or(FOREGROUND);
        scene.text(Point::new(x, y), metric.value.as_str(), 20.0, value_color, FontStyle::Bold);
        y += 14.0;
        if let Some(change) = metric.change.as_deref() {
            if y <= bounds.y1 {
                scene.text(
                    Point::new(x, y),
                    change,
                    10.0,
                    trend_color(metric.trend),
                    FontStyle::Regular,
                );
            }
        }
    }
}

fn render_logos(slots: &[Option<String>], bounds: Rect, scene: &mut Scene) {
    if slots.is_empty() {
        return;
    }
    let gap = 8.0;
    let width = (bounds.width() - gap * (slots.len() - 1) as f64) / slots.len() as f64;
    if width <= 0.0 {
        return;
    }
    for (i, slot) in slots.iter().enumerate() {
        let x = bounds.x0 + (width + gap) * i as f64;
        let frame = RoundedRect::new(x, bounds.y0, x + width, bounds.y1, 4.0);
        if slot.is_some() {
            scene.fill(&frame, Color::from_rgba8(203, 213, 225, 255));
        }
        scene.stroke(&frame, BORDER, 1.0);
    }
}
