//! Blocks and pages.

use crate::content::{BlockContent, BlockType};
use crate::format::PageFormat;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a block within its page.
pub type BlockId = String;

/// A positioned, typed content unit in grid coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    /// Column of the left edge.
    pub x: u32,
    /// Row of the top edge. Pages grow downward, so this is unbounded.
    pub y: u32,
    /// Width in columns, at least 1.
    pub width: u32,
    /// Height in rows, at least 1.
    pub height: u32,
    pub content: BlockContent,
}

impl Block {
    /// Create a block with a fresh id and empty content of the given type.
    pub fn new(block_type: BlockType, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            x,
            y,
            width: width.max(1),
            height: height.max(1),
            content: BlockContent::empty(block_type),
        }
    }

    /// Replace the generated id.
    pub fn with_id(mut self, id: impl Into<BlockId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_content(mut self, content: BlockContent) -> Self {
        self.content = content;
        self
    }

    pub fn block_type(&self) -> BlockType {
        self.content.block_type()
    }

    /// Column just past the right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Check the horizontal bound against a column count.
    pub fn fits_columns(&self, columns: u32) -> bool {
        self.width >= 1 && self.height >= 1 && self.right() <= columns
    }

    /// Merge the fields present in `update`.
    pub fn apply(&mut self, update: &BlockUpdate) {
        if let Some(x) = update.x {
            self.x = x;
        }
        if let Some(y) = update.y {
            self.y = y;
        }
        if let Some(width) = update.width {
            self.width = width;
        }
        if let Some(height) = update.height {
            self.height = height;
        }
        if let Some(content) = &update.content {
            self.content = content.clone();
        }
    }
}

/// Partial block update. Geometry values are stored as given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockUpdate {
    pub x: Option<u32>,
    pub y: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub content: Option<BlockContent>,
}

impl BlockUpdate {
    pub fn position(x: u32, y: u32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn size(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn content(content: BlockContent) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }
}

/// A page owning an ordered stack of blocks (later blocks draw on top).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub blocks: Vec<Block>,
    pub format: PageFormat,
}

impl Page {
    /// Create an empty page with a fresh id.
    pub fn new(format: PageFormat) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            blocks: Vec::new(),
            format,
        }
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub fn block_mut(&mut self, id: &str) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|block| block.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.block(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }
}
