//! Presentation state and its mutation operations.
//!
//! The store is the single owner of the presentation. Every operation runs
//! to completion before returning, so callers never observe a half-applied
//! change. Interactive operations never fail: stale ids and invalid page
//! indices are no-ops.

use crate::block::{Block, BlockUpdate, Page};
use crate::content::BlockType;
use crate::format::PageFormat;
use crate::settings::{GridSettings, GridSettingsUpdate};
use serde::{Deserialize, Serialize};

/// Smallest zoom factor.
pub const MIN_ZOOM: f64 = 0.25;
/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 2.0;
/// Zoom increment for zoom buttons and Ctrl+wheel.
pub const ZOOM_STEP: f64 = 0.1;

/// Number of block types shown on a page thumbnail.
const SUMMARY_PREVIEW_BLOCKS: usize = 5;

/// Root presentation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationState {
    /// Never empty.
    pub pages: Vec<Page>,
    pub current_page_index: usize,
    pub grid_settings: GridSettings,
    pub selected_block_id: Option<String>,
    pub zoom: f64,
}

impl PresentationState {
    /// One empty page in `format`.
    pub fn new(format: PageFormat, grid_settings: GridSettings) -> Self {
        Self {
            pages: vec![Page::new(format)],
            current_page_index: 0,
            grid_settings,
            selected_block_id: None,
            zoom: 1.0,
        }
    }

    pub fn current_page(&self) -> &Page {
        &self.pages[self.current_page_index]
    }

    fn current_page_mut(&mut self) -> &mut Page {
        &mut self.pages[self.current_page_index]
    }

    /// The selected block, if it exists on the current page.
    pub fn selected_block(&self) -> Option<&Block> {
        self.selected_block_id
            .as_deref()
            .and_then(|id| self.current_page().block(id))
    }

    /// Selection as consumers see it: ids not on the current page count as none.
    pub fn effective_selection(&self) -> Option<&str> {
        self.selected_block().map(|block| block.id.as_str())
    }
}

impl Default for PresentationState {
    fn default() -> Self {
        Self::new(PageFormat::default(), GridSettings::default())
    }
}

/// Thumbnail strip entry for one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub index: usize,
    pub id: String,
    pub format: PageFormat,
    pub block_count: usize,
    /// Types of the first few blocks, in z-order.
    pub preview: Vec<BlockType>,
    pub is_current: bool,
}

/// Authoritative container for the presentation being edited.
#[derive(Debug, Clone, Default)]
pub struct PresentationStore {
    state: PresentationState,
}

impl PresentationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from one empty page in `format` with the given grid.
    pub fn with_settings(format: PageFormat, grid_settings: GridSettings, zoom: f64) -> Self {
        let mut state = PresentationState::new(format, grid_settings);
        state.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        Self { state }
    }

    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    /// Copy of the current state, e.g. for export.
    pub fn snapshot(&self) -> PresentationState {
        self.state.clone()
    }

    pub fn pages(&self) -> &[Page] {
        &self.state.pages
    }

    pub fn current_page(&self) -> &Page {
        self.state.current_page()
    }

    pub fn current_page_index(&self) -> usize {
        self.state.current_page_index
    }

    pub fn grid_settings(&self) -> &GridSettings {
        &self.state.grid_settings
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    /// Raw selection, possibly dangling.
    pub fn selected_block_id(&self) -> Option<&str> {
        self.state.selected_block_id.as_deref()
    }

    pub fn selected_block(&self) -> Option<&Block> {
        self.state.selected_block()
    }

    /// Look up a block on the current page.
    pub fn block(&self, id: &str) -> Option<&Block> {
        self.current_page().block(id)
    }

    /// Append a block to the current page.
    pub fn add_block(&mut self, block: Block) {
        log::debug!(
            "Adding {} block {} at ({}, {})",
            block.block_type(),
            block.id,
            block.x,
            block.y
        );
        self.state.current_page_mut().blocks.push(block);
    }

    /// Merge `update` into a block on the current page.
    ///
    /// Geometry is stored as given; the interaction controller clamps before
    /// dispatching. Returns false for unknown ids.
    pub fn update_block(&mut self, id: &str, update: &BlockUpdate) -> bool {
        match self.state.current_page_mut().block_mut(id) {
            Some(block) => {
                block.apply(update);
                true
            }
            None => {
                log::trace!("Ignoring update for stale block {}", id);
                false
            }
        }
    }

    /// Remove a block from the current page, clearing it from the selection.
    pub fn remove_block(&mut self, id: &str) -> bool {
        let page = self.state.current_page_mut();
        let before = page.blocks.len();
        page.blocks.retain(|block| block.id != id);
        let removed = page.blocks.len() != before;
        if self.state.selected_block_id.as_deref() == Some(id) {
            self.state.selected_block_id = None;
        }
        if removed {
            log::debug!("Removed block {}", id);
        }
        removed
    }

    /// Set or clear the selection. The id is not validated.
    pub fn select_block(&mut self, id: Option<&str>) {
        self.state.selected_block_id = id.map(str::to_string);
    }

    /// Change the current page's format. Blocks keep their grid coordinates.
    pub fn set_format(&mut self, format: PageFormat) {
        self.state.current_page_mut().format = format;
    }

    /// Append an empty page in the current format and switch to it.
    pub fn add_page(&mut self) {
        let format = self.current_page().format;
        self.state.pages.push(Page::new(format));
        self.state.current_page_index = self.state.pages.len() - 1;
        log::debug!("Added page {}", self.state.current_page_index + 1);
    }

    /// Delete the page at `index`. The last remaining page is never deleted.
    pub fn delete_page(&mut self, index: usize) -> bool {
        if self.state.pages.len() <= 1 {
            log::debug!("Refusing to delete the last page");
            return false;
        }
        if index >= self.state.pages.len() {
            log::debug!("Ignoring delete of missing page {}", index);
            return false;
        }
        self.state.pages.remove(index);
        let current = self.state.current_page_index;
        if current >= index && current > 0 {
            self.state.current_page_index = current - 1;
        }
        true
    }

    /// Switch to another page. Out-of-range indices are ignored.
    pub fn set_current_page(&mut self, index: usize) -> bool {
        if index >= self.state.pages.len() {
            return false;
        }
        self.state.current_page_index = index;
        true
    }

    pub fn update_grid_settings(&mut self, update: &GridSettingsUpdate) {
        self.state.grid_settings.apply(update);
    }

    pub fn toggle_grid(&mut self) {
        let settings = &mut self.state.grid_settings;
        settings.show_grid = !settings.show_grid;
    }

    /// Add `delta` to the zoom, saturating at the bounds.
    pub fn set_zoom(&mut self, delta: f64) {
        self.state.zoom = (self.state.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(-ZOOM_STEP);
    }

    /// Per-page data for the thumbnail strip.
    pub fn page_summaries(&self) -> Vec<PageSummary> {
        self.state
            .pages
            .iter()
            .enumerate()
            .map(|(index, page)| PageSummary {
                index,
                id: page.id.clone(),
                format: page.format,
                block_count: page.blocks.len(),
                preview: page
                    .blocks
                    .iter()
                    .take(SUMMARY_PREVIEW_BLOCKS)
                    .map(Block::block_type)
                    .collect(),
                is_current: index == self.state.current_page_index,
            })
            .collect()
    }
}
