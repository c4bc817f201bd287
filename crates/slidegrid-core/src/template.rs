//! Sidebar block templates and the drag-and-drop payload that carries them.

use crate::content::BlockType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// MIME type of the drag payload.
pub const PAYLOAD_MIME: &str = "application/json";

/// Sidebar grouping of templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Content,
    Data,
    Media,
    Layout,
}

impl TemplateCategory {
    pub const ALL: [TemplateCategory; 4] = [
        TemplateCategory::Content,
        TemplateCategory::Data,
        TemplateCategory::Media,
        TemplateCategory::Layout,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TemplateCategory::Content => "Content",
            TemplateCategory::Data => "Data",
            TemplateCategory::Media => "Media",
            TemplateCategory::Layout => "Layout",
        }
    }
}

/// A block kind offered in the sidebar, with its default footprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTemplate {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub label: String,
    pub icon: String,
    pub default_width: u32,
    pub default_height: u32,
    pub category: TemplateCategory,
}

impl BlockTemplate {
    fn new(
        block_type: BlockType,
        label: &str,
        icon: &str,
        default_width: u32,
        default_height: u32,
        category: TemplateCategory,
    ) -> Self {
        Self {
            block_type,
            label: label.to_string(),
            icon: icon.to_string(),
            default_width,
            default_height,
            category,
        }
    }

    /// Serialize for a drag start.
    pub fn to_payload(&self) -> Result<String, PayloadError> {
        serde_json::to_string(self).map_err(PayloadError::Invalid)
    }

    /// Parse a drop payload. A missing or empty payload is an error the
    /// caller is expected to swallow.
    pub fn from_payload(payload: Option<&str>) -> Result<Self, PayloadError> {
        match payload {
            Some(data) if !data.trim().is_empty() => {
                serde_json::from_str(data).map_err(PayloadError::Invalid)
            }
            _ => Err(PayloadError::Missing),
        }
    }
}

/// Drag payload errors.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Drop carried no template payload")]
    Missing,
    #[error("Invalid template payload: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// The built-in template catalog, in sidebar order.
pub fn catalog() -> Vec<BlockTemplate> {
    use BlockType as T;
    use TemplateCategory as C;
    vec![
        BlockTemplate::new(T::Title, "Heading", "Heading1", 12, 3, C::Content),
        BlockTemplate::new(T::Subtitle, "Block heading", "Heading2", 8, 2, C::Content),
        BlockTemplate::new(T::Text, "Text", "Type", 8, 4, C::Content),
        BlockTemplate::new(T::AccentText, "Accent text", "Bold", 4, 4, C::Content),
        BlockTemplate::new(T::Quote, "Quote", "Quote", 8, 4, C::Content),
        BlockTemplate::new(T::List, "List", "List", 8, 6, C::Content),
        BlockTemplate::new(T::Callout, "Callout", "MessageSquare", 6, 4, C::Content),
        BlockTemplate::new(T::ChartBar, "Bar chart", "BarChart3", 8, 10, C::Data),
        BlockTemplate::new(T::ChartPie, "Pie chart", "PieChart", 5, 10, C::Data),
        BlockTemplate::new(T::ChartLine, "Line chart", "LineChart", 8, 10, C::Data),
        BlockTemplate::new(T::ChartArea, "Area chart", "AreaChart", 8, 10, C::Data),
        BlockTemplate::new(T::Table, "Table", "Table", 10, 6, C::Data),
        BlockTemplate::new(T::Metrics, "Metrics", "Activity", 2, 3, C::Data),
        BlockTemplate::new(T::Timeline, "Timeline", "GitBranch", 12, 3, C::Data),
        BlockTemplate::new(T::Image, "Image", "Image", 6, 8, C::Media),
        BlockTemplate::new(T::Logos, "Logos", "Shapes", 8, 4, C::Media),
        BlockTemplate::new(T::Divider, "Divider", "Minus", 12, 1, C::Layout),
        BlockTemplate::new(T::Code, "Code", "Code", 8, 6, C::Layout),
    ]
}

/// Look up the catalog entry for a block type.
pub fn template_for(block_type: BlockType) -> Option<BlockTemplate> {
    catalog()
        .into_iter()
        .find(|template| template.block_type == block_type)
}

/// Catalog entries of one category.
pub fn by_category(category: TemplateCategory) -> Vec<BlockTemplate> {
    catalog()
        .into_iter()
        .filter(|template| template.category == category)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_valid() {
        let templates = catalog();
        assert_eq!(templates.len(), 18);
        for template in &templates {
            assert!(template.default_width >= 1 && template.default_width <= 36);
            assert!(template.default_height >= 1);
        }
    }

    #[test]
    fn test_every_category_populated() {
        for category in TemplateCategory::ALL {
            assert!(!by_category(category).is_empty(), "{:?}", category);
        }
    }

    #[test]
    fn test_template_lookup() {
        let pie = template_for(BlockType::ChartPie).unwrap();
        assert_eq!((pie.default_width, pie.default_height), (5, 10));
        assert!(template_for(BlockType::Icons).is_none());
    }

    #[test]
    fn test_payload_roundtrip() {
        let template = template_for(BlockType::Table).unwrap();
        let payload = template.to_payload().unwrap();
        assert!(payload.contains("\"type\":\"table\""));
        assert!(payload.contains("\"defaultWidth\":10"));
        let parsed = BlockTemplate::from_payload(Some(&payload)).unwrap();
        assert_eq!(parsed, template);
    }

    #[test]
    fn test_missing_payload() {
        assert!(matches!(BlockTemplate::from_payload(None), Err(PayloadError::Missing)));
        assert!(matches!(BlockTemplate::from_payload(Some("  ")), Err(PayloadError::Missing)));
    }

    #[test]
    fn test_invalid_payload() {
        let result = BlockTemplate::from_payload(Some("{\"type\":\"hologram\"}"));
        assert!(matches!(result, Err(PayloadError::Invalid(_))));
    }
}
