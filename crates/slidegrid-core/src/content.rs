//! Block types and their typed content bags.
//!
//! Every block type declares exactly the optional fields it understands.
//! Absent fields fall back to the defaults in [`ResolvedContent`], which is
//! what renderers consume.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Title,
    Subtitle,
    Text,
    AccentText,
    ChartBar,
    ChartPie,
    ChartLine,
    ChartArea,
    Image,
    Table,
    List,
    Quote,
    Code,
    Timeline,
    Metrics,
    Icons,
    Logos,
    Divider,
    Callout,
}

impl BlockType {
    pub const ALL: [BlockType; 19] = [
        BlockType::Title,
        BlockType::Subtitle,
        BlockType::Text,
        BlockType::AccentText,
        BlockType::ChartBar,
        BlockType::ChartPie,
        BlockType::ChartLine,
        BlockType::ChartArea,
        BlockType::Image,
        BlockType::Table,
        BlockType::List,
        BlockType::Quote,
        BlockType::Code,
        BlockType::Timeline,
        BlockType::Metrics,
        BlockType::Icons,
        BlockType::Logos,
        BlockType::Divider,
        BlockType::Callout,
    ];

    /// Wire name of the type (`"chart-bar"`, `"accent-text"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            BlockType::Title => "title",
            BlockType::Subtitle => "subtitle",
            BlockType::Text => "text",
            BlockType::AccentText => "accent-text",
            BlockType::ChartBar => "chart-bar",
            BlockType::ChartPie => "chart-pie",
            BlockType::ChartLine => "chart-line",
            BlockType::ChartArea => "chart-area",
            BlockType::Image => "image",
            BlockType::Table => "table",
            BlockType::List => "list",
            BlockType::Quote => "quote",
            BlockType::Code => "code",
            BlockType::Timeline => "timeline",
            BlockType::Metrics => "metrics",
            BlockType::Icons => "icons",
            BlockType::Logos => "logos",
            BlockType::Divider => "divider",
            BlockType::Callout => "callout",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accent colors selectable for text and metric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    Blue,
    Green,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    pub label: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ChartDataPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub color: String,
    pub data: Vec<ChartDataPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartSettings {
    pub segments: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricItem {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<String>,
    #[serde(default)]
    pub trend: Trend,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_color: Option<AccentColor>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingContent {
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextContent {
    pub text: Option<String>,
    pub text_color: Option<AccentColor>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlainTextContent {
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemsContent {
    pub items: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartContent {
    pub chart_data: Option<Vec<ChartDataPoint>>,
    pub chart_settings: Option<ChartSettings>,
    pub line_chart_data: Option<Vec<LineSeries>>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableContent {
    pub table_data: Option<TableData>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsContent {
    pub metrics: Option<Vec<MetricItem>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageContent {
    pub images: Vec<String>,
    pub image_scale: Option<f64>,
    pub image_offset_x: Option<f64>,
    pub image_offset_y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogosContent {
    pub logo_images: Vec<String>,
    pub logo_count: Option<u32>,
}

/// Typed content of a block, tagged by block type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BlockContent {
    Title(HeadingContent),
    Subtitle(HeadingContent),
    Text(TextContent),
    AccentText(PlainTextContent),
    ChartBar(ChartContent),
    ChartPie(ChartContent),
    ChartLine(ChartContent),
    ChartArea(ChartContent),
    Image(ImageContent),
    Table(TableContent),
    List(ItemsContent),
    Quote(PlainTextContent),
    Code(PlainTextContent),
    Timeline(ItemsContent),
    Metrics(MetricsContent),
    Icons,
    Logos(LogosContent),
    Divider,
    Callout(PlainTextContent),
}

impl BlockContent {
    /// Content of the given type with every field absent.
    pub fn empty(block_type: BlockType) -> Self {
        match block_type {
            BlockType::Title => BlockContent::Title(HeadingContent::default()),
            BlockType::Subtitle => BlockContent::Subtitle(HeadingContent::default()),
            BlockType::Text => BlockContent::Text(TextContent::default()),
            BlockType::AccentText => BlockContent::AccentText(PlainTextContent::default()),
            BlockType::ChartBar => BlockContent::ChartBar(ChartContent::default()),
            BlockType::ChartPie => BlockContent::ChartPie(ChartContent::default()),
            BlockType::ChartLine => BlockContent::ChartLine(ChartContent::default()),
            BlockType::ChartArea => BlockContent::ChartArea(ChartContent::default()),
            BlockType::Image => BlockContent::Image(ImageContent::default()),
            BlockType::Table => BlockContent::Table(TableContent::default()),
            BlockType::List => BlockContent::List(ItemsContent::default()),
            BlockType::Quote => BlockContent::Quote(PlainTextContent::default()),
            BlockType::Code => BlockContent::Code(PlainTextContent::default()),
            BlockType::Timeline => BlockContent::Timeline(ItemsContent::default()),
            BlockType::Metrics => BlockContent::Metrics(MetricsContent::default()),
            BlockType::Icons => BlockContent::Icons,
            BlockType::Logos => BlockContent::Logos(LogosContent::default()),
            BlockType::Divider => BlockContent::Divider,
            BlockType::Callout => BlockContent::Callout(PlainTextContent::default()),
        }
    }

    pub fn block_type(&self) -> BlockType {
        match self {
            BlockContent::Title(_) => BlockType::Title,
            BlockContent::Subtitle(_) => BlockType::Subtitle,
            BlockContent::Text(_) => BlockType::Text,
            BlockContent::AccentText(_) => BlockType::AccentText,
            BlockContent::ChartBar(_) => BlockType::ChartBar,
            BlockContent::ChartPie(_) => BlockType::ChartPie,
            BlockContent::ChartLine(_) => BlockType::ChartLine,
            BlockContent::ChartArea(_) => BlockType::ChartArea,
            BlockContent::Image(_) => BlockType::Image,
            BlockContent::Table(_) => BlockType::Table,
            BlockContent::List(_) => BlockType::List,
            BlockContent::Quote(_) => BlockType::Quote,
            BlockContent::Code(_) => BlockType::Code,
            BlockContent::Timeline(_) => BlockType::Timeline,
            BlockContent::Metrics(_) => BlockType::Metrics,
            BlockContent::Icons => BlockType::Icons,
            BlockContent::Logos(_) => BlockType::Logos,
            BlockContent::Divider => BlockType::Divider,
            BlockContent::Callout(_) => BlockType::Callout,
        }
    }

    /// Fill every absent field from the default table.
    pub fn resolve(&self) -> ResolvedContent {
        match self {
            BlockContent::Title(c) => ResolvedContent::Heading {
                text: text_or(&c.title, defaults::TITLE),
                level: HeadingLevel::Title,
            },
            BlockContent::Subtitle(c) => ResolvedContent::Heading {
                text: text_or(&c.title, defaults::SUBTITLE),
                level: HeadingLevel::Subtitle,
            },
            BlockContent::Text(c) => ResolvedContent::Text {
                text: text_or(&c.text, defaults::TEXT),
                color: c.text_color,
            },
            BlockContent::AccentText(c) => ResolvedContent::AccentText {
                text: text_or(&c.text, defaults::ACCENT_TEXT),
            },
            BlockContent::Quote(c) => ResolvedContent::Quote {
                text: text_or(&c.text, defaults::QUOTE),
            },
            BlockContent::Callout(c) => ResolvedContent::Callout {
                text: text_or(&c.text, defaults::CALLOUT),
            },
            BlockContent::Code(c) => ResolvedContent::Code {
                text: text_or(&c.text, defaults::CODE),
            },
            BlockContent::List(c) => ResolvedContent::List {
                items: items_or(&c.items, &defaults::LIST_ITEMS),
            },
            BlockContent::Timeline(c) => ResolvedContent::Timeline {
                items: items_or(&c.items, &defaults::TIMELINE_ITEMS),
            },
            BlockContent::ChartBar(c) => ResolvedContent::Chart {
                kind: ChartKind::Bar,
                data: c.chart_data.clone().unwrap_or_else(defaults::bar_chart_data),
                unit: c.unit.clone(),
            },
            BlockContent::ChartPie(c) => ResolvedContent::Chart {
                kind: ChartKind::Pie,
                data: c.chart_data.clone().unwrap_or_else(defaults::pie_chart_data),
                unit: c.unit.clone(),
            },
            BlockContent::ChartLine(c) => ResolvedContent::Chart {
                kind: ChartKind::Line,
                data: c.chart_data.clone().unwrap_or_else(defaults::series_chart_data),
                unit: c.unit.clone(),
            },
            BlockContent::ChartArea(c) => ResolvedContent::Chart {
                kind: ChartKind::Area,
                data: c.chart_data.clone().unwrap_or_else(defaults::series_chart_data),
                unit: c.unit.clone(),
            },
            BlockContent::Table(c) => ResolvedContent::Table {
                data: c.table_data.clone().unwrap_or_else(defaults::table_data),
            },
            BlockContent::Metrics(c) => ResolvedContent::Metrics {
                metrics: c.metrics.clone().unwrap_or_else(defaults::metrics),
            },
            BlockContent::Image(c) => ResolvedContent::Image {
                source: c.images.first().cloned(),
                scale: c
                    .image_scale
                    .unwrap_or(1.0)
                    .clamp(defaults::IMAGE_SCALE_MIN, defaults::IMAGE_SCALE_MAX),
                offset_x: clamp_offset(c.image_offset_x),
                offset_y: clamp_offset(c.image_offset_y),
            },
            BlockContent::Logos(c) => {
                let count = match c.logo_count {
                    Some(count) if count > 0 => count.min(defaults::MAX_LOGO_SLOTS),
                    _ => defaults::LOGO_COUNT,
                };
                ResolvedContent::Logos {
                    slots: (0..count as usize)
                        .map(|i| c.logo_images.get(i).cloned())
                        .collect(),
                }
            }
            BlockContent::Divider => ResolvedContent::Divider,
            BlockContent::Icons => ResolvedContent::Placeholder {
                label: BlockType::Icons.name().to_string(),
            },
        }
    }
}

fn text_or(value: &Option<String>, default: &str) -> String {
    match value {
        Some(text) if !text.is_empty() => text.clone(),
        _ => default.to_string(),
    }
}

fn items_or(value: &Option<Vec<String>>, default: &[&str]) -> Vec<String> {
    match value {
        Some(items) => items.clone(),
        None => default.iter().map(|s| s.to_string()).collect(),
    }
}

fn clamp_offset(value: Option<f64>) -> f64 {
    value
        .unwrap_or(0.0)
        .clamp(-defaults::IMAGE_OFFSET_LIMIT, defaults::IMAGE_OFFSET_LIMIT)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    Title,
    Subtitle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
    Area,
}

/// Block content with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedContent {
    Heading { text: String, level: HeadingLevel },
    Text { text: String, color: Option<AccentColor> },
    AccentText { text: String },
    Quote { text: String },
    Callout { text: String },
    Code { text: String },
    List { items: Vec<String> },
    Timeline { items: Vec<String> },
    Chart { kind: ChartKind, data: Vec<ChartDataPoint>, unit: Option<String> },
    Table { data: TableData },
    Metrics { metrics: Vec<MetricItem> },
    /// `offset_x`/`offset_y` are percentages of the block size.
    Image { source: Option<String>, scale: f64, offset_x: f64, offset_y: f64 },
    /// One entry per logo slot; `None` slots draw an empty frame.
    Logos { slots: Vec<Option<String>> },
    Divider,
    /// Types without a dedicated drawing.
    Placeholder { label: String },
}

/// Default values for absent content fields.
pub mod defaults {
    use super::{ChartDataPoint, MetricItem, TableData, Trend};

    pub const TITLE: &str = "Heading";
    pub const SUBTITLE: &str = "Subheading";
    pub const TEXT: &str = "Block text";
    pub const ACCENT_TEXT: &str = "Accent text";
    pub const QUOTE: &str = "\"Quote\"";
    pub const CALLOUT: &str = "Important information";
    pub const CODE: &str = "// Code";
    pub const LIST_ITEMS: [&str; 3] = ["Item 1", "Item 2", "Item 3"];
    pub const TIMELINE_ITEMS: [&str; 3] = ["Stage 1", "Stage 2", "Stage 3"];
    pub const LOGO_COUNT: u32 = 3;
    pub const MAX_LOGO_SLOTS: u32 = 12;
    pub const IMAGE_SCALE_MIN: f64 = 0.5;
    pub const IMAGE_SCALE_MAX: f64 = 2.0;
    pub const IMAGE_OFFSET_LIMIT: f64 = 50.0;

    pub fn bar_chart_data() -> Vec<ChartDataPoint> {
        vec![
            ChartDataPoint::new("A", 30.0),
            ChartDataPoint::new("B", 50.0),
            ChartDataPoint::new("C", 40.0),
            ChartDataPoint::new("D", 70.0),
        ]
    }

    pub fn pie_chart_data() -> Vec<ChartDataPoint> {
        vec![
            ChartDataPoint::new("A", 30.0),
            ChartDataPoint::new("B", 25.0),
            ChartDataPoint::new("C", 45.0),
        ]
    }

    /// Shared by line and area charts.
    pub fn series_chart_data() -> Vec<ChartDataPoint> {
        vec![
            ChartDataPoint::new("Jan", 30.0),
            ChartDataPoint::new("Feb", 45.0),
            ChartDataPoint::new("Mar", 35.0),
            ChartDataPoint::new("Apr", 60.0),
        ]
    }

    pub fn table_data() -> TableData {
        TableData {
            headers: vec!["Column 1".to_string(), "Column 2".to_string()],
            rows: vec![
                vec!["Cell 1".to_string(), "Cell 2".to_string()],
                vec!["Cell 3".to_string(), "Cell 4".to_string()],
            ],
        }
    }

    pub fn metrics() -> Vec<MetricItem> {
        vec![MetricItem {
            label: "Metric".to_string(),
            value: "100".to_string(),
            change: None,
            trend: Trend::Up,
            value_color: None,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_matches_type() {
        for block_type in BlockType::ALL {
            assert_eq!(BlockContent::empty(block_type).block_type(), block_type);
        }
    }

    #[test]
    fn test_type_names_match_serde() {
        for block_type in BlockType::ALL {
            let json = serde_json::to_string(&block_type).unwrap();
            assert_eq!(json, format!("\"{}\"", block_type.name()));
        }
    }

    #[test]
    fn test_resolve_defaults() {
        assert_eq!(
            BlockContent::empty(BlockType::Title).resolve(),
            ResolvedContent::Heading {
                text: "Heading".to_string(),
                level: HeadingLevel::Title,
            }
        );
        match BlockContent::empty(BlockType::ChartPie).resolve() {
            ResolvedContent::Chart { kind, data, .. } => {
                assert_eq!(kind, ChartKind::Pie);
                assert_eq!(data.len(), 3);
            }
            other => panic!("unexpected {:?}", other),
        }
        match BlockContent::empty(BlockType::Logos).resolve() {
            ResolvedContent::Logos { slots } => assert_eq!(slots, vec![None, None, None]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_resolve_prefers_set_fields() {
        let content = BlockContent::Text(TextContent {
            text: Some("Revenue grew".to_string()),
            text_color: Some(AccentColor::Green),
        });
        assert_eq!(
            content.resolve(),
            ResolvedContent::Text {
                text: "Revenue grew".to_string(),
                color: Some(AccentColor::Green),
            }
        );
    }

    #[test]
    fn test_empty_text_uses_default() {
        let content = BlockContent::Quote(PlainTextContent {
            text: Some(String::new()),
        });
        assert_eq!(
            content.resolve(),
            ResolvedContent::Quote {
                text: "\"Quote\"".to_string()
            }
        );
    }

    #[test]
    fn test_image_fields_clamped() {
        let content = BlockContent::Image(ImageContent {
            images: vec!["logo.png".to_string()],
            image_scale: Some(5.0),
            image_offset_x: Some(-80.0),
            image_offset_y: None,
        });
        assert_eq!(
            content.resolve(),
            ResolvedContent::Image {
                source: Some("logo.png".to_string()),
                scale: 2.0,
                offset_x: -50.0,
                offset_y: 0.0,
            }
        );
    }

    #[test]
    fn test_icons_resolve_to_placeholder() {
        assert_eq!(
            BlockContent::Icons.resolve(),
            ResolvedContent::Placeholder {
                label: "icons".to_string()
            }
        );
    }

    #[test]
    fn test_logo_count_zero_uses_default() {
        let content = BlockContent::Logos(LogosContent {
            logo_images: vec!["a.png".to_string()],
            logo_count: Some(0),
        });
        match content.resolve() {
            ResolvedContent::Logos { slots } => {
                assert_eq!(slots.len(), defaults::LOGO_COUNT as usize);
                assert_eq!(slots[0].as_deref(), Some("a.png"));
                assert!(slots[1].is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_logo_count_is_capped() {
        let content = BlockContent::Logos(LogosContent {
            logo_images: Vec::new(),
            logo_count: Some(u32::MAX),
        });
        match content.resolve() {
            ResolvedContent::Logos { slots } => {
                assert_eq!(slots.len(), defaults::MAX_LOGO_SLOTS as usize);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_content_json_shape() {
        let content: BlockContent =
            serde_json::from_str(r#"{"type":"chart-bar","chartData":[{"label":"Q1","value":12}]}"#)
                .unwrap();
        match content {
            BlockContent::ChartBar(chart) => {
                let data = chart.chart_data.unwrap();
                assert_eq!(data[0].label, "Q1");
                assert!((data[0].value - 12.0).abs() < f64::EPSILON);
            }
            other => panic!("unexpected {:?}", other),
        }
        let divider: BlockContent = serde_json::from_str(r#"{"type":"divider"}"#).unwrap();
        assert_eq!(divider, BlockContent::Divider);
    }
}
