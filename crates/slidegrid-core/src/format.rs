//! Page format catalog.

use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed set of page formats a page can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PageFormat {
    #[serde(rename = "A3")]
    A3,
    #[serde(rename = "A3-vertical")]
    A3Vertical,
    #[serde(rename = "A4-spread")]
    A4Spread,
    #[default]
    #[serde(rename = "16:9")]
    Widescreen,
}

impl PageFormat {
    /// All formats, in menu order.
    pub const ALL: [PageFormat; 4] = [
        PageFormat::Widescreen,
        PageFormat::A3,
        PageFormat::A3Vertical,
        PageFormat::A4Spread,
    ];

    /// Page dimensions in pixels.
    pub fn size(self) -> Size {
        match self {
            PageFormat::A3 => Size::new(1191.0, 842.0),
            PageFormat::A3Vertical => Size::new(842.0, 1191.0),
            // Two A4 pages side by side share the A3 canvas.
            PageFormat::A4Spread => Size::new(1191.0, 842.0),
            PageFormat::Widescreen => Size::new(1280.0, 720.0),
        }
    }

    pub fn width(self) -> f64 {
        self.size().width
    }

    pub fn height(self) -> f64 {
        self.size().height
    }

    pub fn is_landscape(self) -> bool {
        let size = self.size();
        size.width > size.height
    }

    /// Short identifier used in file names and menus.
    pub fn name(self) -> &'static str {
        match self {
            PageFormat::A3 => "A3",
            PageFormat::A3Vertical => "A3-vertical",
            PageFormat::A4Spread => "A4-spread",
            PageFormat::Widescreen => "16:9",
        }
    }

    /// Human readable label for format pickers.
    pub fn label(self) -> &'static str {
        match self {
            PageFormat::A3 => "A3 Landscape",
            PageFormat::A3Vertical => "A3 Portrait",
            PageFormat::A4Spread => "A4 Spread",
            PageFormat::Widescreen => "16:9 (Presentation)",
        }
    }

    /// Look up a format by its short identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.name() == name)
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
