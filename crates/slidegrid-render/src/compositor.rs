//! Visual layout of a page.
//!
//! [`compose`] derives everything needed to draw a page (page box, grid
//! overlay, block boxes and selection decorations) from the model. It keeps
//! no state, so the layout is simply recomputed after every store mutation.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::Serialize;
use slidegrid_core::block::{BlockId, Page};
use slidegrid_core::content::BlockType;
use slidegrid_core::format::PageFormat;
use slidegrid_core::geometry::GridGeometry;
use slidegrid_core::input::PointerTarget;
use slidegrid_core::settings::GridSettings;
use slidegrid_core::store::PresentationStore;
use slidegrid_core::viewport::Viewport;

/// Side of the square resize handle, in page pixels.
pub const RESIZE_HANDLE_SIZE: f64 = 16.0;
/// Diameter of the delete control, in page pixels.
pub const DELETE_CONTROL_SIZE: f64 = 20.0;
/// How far the delete control sticks out past the block's top-right corner.
pub const DELETE_CONTROL_OVERHANG: f64 = 8.0;
/// Inner padding between a block's border and its content.
pub const BLOCK_PADDING: f64 = 8.0;

/// Every 4th column line is drawn strong.
const STRONG_COLUMN_EVERY: u32 = 4;
/// Every 5th row line is drawn strong.
const STRONG_ROW_EVERY: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineWeight {
    Light,
    Strong,
}

impl LineWeight {
    pub fn stroke_width(self) -> f64 {
        match self {
            LineWeight::Light => 0.5,
            LineWeight::Strong => 1.0,
        }
    }
}

/// One grid overlay line in page pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridLine {
    pub from: Point,
    pub to: Point,
    pub weight: LineWeight,
}

/// Interactive controls drawn on the selected block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decorations {
    pub resize_handle: Rect,
    pub delete_control: Rect,
}

impl Decorations {
    fn for_block(rect: Rect) -> Self {
        let resize_handle = Rect::new(
            rect.x1 - RESIZE_HANDLE_SIZE,
            rect.y1 - RESIZE_HANDLE_SIZE,
            rect.x1,
            rect.y1,
        );
        let delete_x1 = rect.x1 + DELETE_CONTROL_OVERHANG;
        let delete_y0 = rect.y0 - DELETE_CONTROL_OVERHANG;
        let delete_control = Rect::new(
            delete_x1 - DELETE_CONTROL_SIZE,
            delete_y0,
            delete_x1,
            delete_y0 + DELETE_CONTROL_SIZE,
        );
        Self {
            resize_handle,
            delete_control,
        }
    }
}

/// Placement of one block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockLayout {
    pub id: BlockId,
    pub block_type: BlockType,
    /// Absolute box in page pixels.
    pub rect: Rect,
    pub selected: bool,
    /// Present only on the selected block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decorations: Option<Decorations>,
}

impl BlockLayout {
    /// Area available to the content renderer.
    pub fn content_rect(&self) -> Rect {
        self.rect.inset(-BLOCK_PADDING)
    }
}

/// Everything needed to draw one page at the current view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasLayout {
    pub format: PageFormat,
    pub page_size: Size,
    pub viewport: Viewport,
    /// Grid area inside the margins, in page pixels.
    pub content_rect: Rect,
    /// Empty when the grid is hidden.
    pub grid_lines: Vec<GridLine>,
    /// Bottom-most first.
    pub blocks: Vec<BlockLayout>,
}

/// Lay out `page` for display.
///
/// `selection` ids that are not on the page are ignored.
pub fn compose(
    page: &Page,
    settings: &GridSettings,
    viewport: Viewport,
    selection: Option<&str>,
) -> CanvasLayout {
    let geometry = GridGeometry::new(page.format, settings);
    let content_rect = geometry.content_rect();

    let grid_lines = if settings.show_grid {
        grid_lines(&geometry)
    } else {
        Vec::new()
    };

    let blocks = page
        .blocks
        .iter()
        .map(|block| {
            let rect = geometry.grid_to_page_pixel(block.x, block.y, block.width, block.height);
            let selected = selection == Some(block.id.as_str());
            BlockLayout {
                id: block.id.clone(),
                block_type: block.block_type(),
                rect,
                selected,
                decorations: selected.then(|| Decorations::for_block(rect)),
            }
        })
        .collect();

    CanvasLayout {
        format: page.format,
        page_size: geometry.page_size(),
        viewport,
        content_rect,
        grid_lines,
        blocks,
    }
}

/// Lay out the store's current page with its effective selection.
pub fn compose_current(store: &PresentationStore, pan: Vec2) -> CanvasLayout {
    let state = store.state();
    compose(
        state.current_page(),
        &state.grid_settings,
        Viewport::new(state.zoom, pan),
        state.effective_selection(),
    )
}

fn grid_lines(geometry: &GridGeometry) -> Vec<GridLine> {
    let area = geometry.content_rect();
    let column_width = geometry.column_width();
    let row_height = geometry.row_height();
    let rows = if row_height > 0.0 {
        (area.height() / row_height).ceil().max(0.0) as u32
    } else {
        0
    };

    let vertical = (0..=geometry.columns()).map(|i| {
        let x = area.x0 + f64::from(i) * column_width;
        GridLine {
            from: Point::new(x, area.y0),
            to: Point::new(x, area.y1),
            weight: weight(i, STRONG_COLUMN_EVERY),
        }
    });
    // The last row may be partial; its closing line is clipped to the area.
    let horizontal = (0..=rows).map(|j| {
        let y = (area.y0 + f64::from(j) * row_height).min(area.y1);
        GridLine {
            from: Point::new(area.x0, y),
            to: Point::new(area.x1, y),
            weight: weight(j, STRONG_ROW_EVERY),
        }
    });
    vertical.chain(horizontal).collect()
}

fn weight(index: u32, strong_every: u32) -> LineWeight {
    if index % strong_every == 0 {
        LineWeight::Strong
    } else {
        LineWeight::Light
    }
}

impl CanvasLayout {
    /// Page-to-screen transform.
    pub fn transform(&self) -> Affine {
        self.viewport.transform()
    }

    pub fn screen_to_page(&self, screen_point: Point) -> Point {
        self.viewport.screen_to_page(screen_point)
    }

    pub fn page_rect(&self) -> Rect {
        self.page_size.to_rect()
    }

    pub fn block(&self, id: &str) -> Option<&BlockLayout> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub fn selected(&self) -> Option<&BlockLayout> {
        self.blocks.iter().find(|block| block.selected)
    }

    /// What a pointer press at `page_point` lands on.
    ///
    /// Controls of the selected block win over any block body, and bodies
    /// are tested top-most first.
    pub fn hit_test(&self, page_point: Point) -> PointerTarget {
        if let Some(selected) = self.selected() {
            if let Some(decorations) = &selected.decorations {
                if decorations.delete_control.contains(page_point) {
                    return PointerTarget::DeleteControl(selected.id.clone());
                }
                if decorations.resize_handle.contains(page_point) {
                    return PointerTarget::ResizeHandle(selected.id.clone());
                }
            }
        }
        self.blocks
            .iter()
            .rev()
            .find(|block| block.rect.contains(page_point))
            .map(|block| PointerTarget::BlockBody(block.id.clone()))
            .unwrap_or(PointerTarget::Background)
    }

    /// [`hit_test`](Self::hit_test) for a screen-space point.
    pub fn hit_test_screen(&self, screen_point: Point) -> PointerTarget {
        self.hit_test(self.screen_to_page(screen_point))
    }

    /// Copy with the grid overlay, selection and controls removed and the
    /// view reset to identity, as captured for export.
    pub fn for_export(&self) -> CanvasLayout {
        let mut layout = self.clone();
        layout.viewport = Viewport::default();
        layout.grid_lines.clear();
        for block in &mut layout.blocks {
            block.selected = false;
            block.decorations = None;
        }
        layout
    }

    pub fn has_interactive_decoration(&self) -> bool {
        !self.grid_lines.is_empty()
            || self
                .blocks
                .iter()
                .any(|block| block.selected || block.decorations.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidegrid_core::block::Block;
    use slidegrid_core::settings::GridSettingsUpdate;

    fn sample_page() -> Page {
        let mut page = Page::new(PageFormat::Widescreen);
        page.blocks
            .push(Block::new(BlockType::Text, 0, 0, 4, 2).with_id("bottom"));
        page.blocks
            .push(Block::new(BlockType::Title, 2, 1, 4, 2).with_id("top"));
        page
    }

    #[test]
    fn test_block_boxes_are_absolute() {
        let layout = compose(&sample_page(), &GridSettings::default(), Viewport::default(), None);
        assert_eq!(layout.page_size, Size::new(1280.0, 720.0));
        assert_eq!(layout.content_rect, Rect::new(40.0, 40.0, 1240.0, 680.0));
        let top = layout.block("top").unwrap();
        assert_eq!(top.rect, Rect::new(140.0, 60.0, 340.0, 100.0));
        assert_eq!(top.content_rect(), Rect::new(148.0, 68.0, 332.0, 92.0));
        assert!(layout.blocks.iter().all(|b| b.decorations.is_none()));
    }

    #[test]
    fn test_grid_lines() {
        let layout = compose(&sample_page(), &GridSettings::default(), Viewport::default(), None);
        // 25 column lines and ceil(640 / 20) + 1 = 33 row lines.
        assert_eq!(layout.grid_lines.len(), 25 + 33);
        let vertical: Vec<_> = layout.grid_lines.iter().take(25).collect();
        assert_eq!(vertical[0].weight, LineWeight::Strong);
        assert_eq!(vertical[1].weight, LineWeight::Light);
        assert_eq!(vertical[4].weight, LineWeight::Strong);
        assert!((vertical[24].from.x - 1240.0).abs() < 1e-9);
        let horizontal: Vec<_> = layout.grid_lines.iter().skip(25).collect();
        assert_eq!(horizontal[5].weight, LineWeight::Strong);
        assert_eq!(horizontal[6].weight, LineWeight::Light);
        assert!((horizontal[32].from.y - 680.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_last_row_is_clipped() {
        let mut settings = GridSettings::default();
        settings.apply(&GridSettingsUpdate::row_height(30.0));
        let layout = compose(&sample_page(), &settings, Viewport::default(), None);
        // 640 / 30 = 21.33, so 22 rows and 23 lines.
        let horizontal: Vec<_> = layout.grid_lines.iter().skip(25).collect();
        assert_eq!(horizontal.len(), 23);
        assert!((horizontal[22].from.y - 680.0).abs() < 1e-9);
    }

    #[test]
    fn test_hidden_grid() {
        let mut settings = GridSettings::default();
        settings.show_grid = false;
        let layout = compose(&sample_page(), &settings, Viewport::default(), None);
        assert!(layout.grid_lines.is_empty());
    }

    #[test]
    fn test_selection_decorations() {
        let layout = compose(
            &sample_page(),
            &GridSettings::default(),
            Viewport::default(),
            Some("top"),
        );
        let top = layout.block("top").unwrap();
        assert!(top.selected);
        let decorations = top.decorations.unwrap();
        assert_eq!(decorations.resize_handle, Rect::new(324.0, 84.0, 340.0, 100.0));
        assert_eq!(decorations.delete_control, Rect::new(328.0, 52.0, 348.0, 72.0));
        assert!(layout.block("bottom").unwrap().decorations.is_none());
    }

    #[test]
    fn test_unknown_selection_is_ignored() {
        let layout = compose(
            &sample_page(),
            &GridSettings::default(),
            Viewport::default(),
            Some("elsewhere"),
        );
        assert!(layout.selected().is_none());
    }

    #[test]
    fn test_hit_test_order() {
        let layout = compose(
            &sample_page(),
            &GridSettings::default(),
            Viewport::default(),
            Some("bottom"),
        );
        // Overlap of both bodies: the later block is on top.
        assert_eq!(
            layout.hit_test(Point::new(150.0, 70.0)),
            PointerTarget::BlockBody("top".into())
        );
        // Bottom block's resize handle lies under "top" but controls win.
        assert_eq!(
            layout.hit_test(Point::new(235.0, 75.0)),
            PointerTarget::ResizeHandle("bottom".into())
        );
        assert_eq!(
            layout.hit_test(Point::new(245.0, 35.0)),
            PointerTarget::DeleteControl("bottom".into())
        );
        assert_eq!(
            layout.hit_test(Point::new(50.0, 50.0)),
            PointerTarget::BlockBody("bottom".into())
        );
        assert_eq!(layout.hit_test(Point::new(900.0, 500.0)), PointerTarget::Background);
    }

    #[test]
    fn test_hit_test_screen_uses_viewport() {
        let layout = compose(
            &sample_page(),
            &GridSettings::default(),
            Viewport::new(2.0, Vec2::new(100.0, 0.0)),
            None,
        );
        // Page (50, 50) is at screen (200, 100).
        assert_eq!(
            layout.hit_test_screen(Point::new(200.0, 100.0)),
            PointerTarget::BlockBody("bottom".into())
        );
        let screen = layout.transform() * Point::new(50.0, 50.0);
        assert!((screen.x - 200.0).abs() < 1e-9 && (screen.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_for_export_strips_interaction() {
        let layout = compose(
            &sample_page(),
            &GridSettings::default(),
            Viewport::new(1.5, Vec2::new(30.0, -10.0)),
            Some("top"),
        );
        assert!(layout.has_interactive_decoration());
        let export = layout.for_export();
        assert!(!export.has_interactive_decoration());
        assert!(export.viewport.is_identity());
        assert_eq!(export.blocks.len(), 2);
        assert_eq!(export.block("top").unwrap().rect, layout.block("top").unwrap().rect);
    }

    #[test]
    fn test_compose_current() {
        let mut store = PresentationStore::new();
        store.add_block(Block::new(BlockType::Divider, 0, 0, 12, 1).with_id("d"));
        store.select_block(Some("d"));
        store.zoom_in();
        let layout = compose_current(&store, Vec2::new(5.0, 5.0));
        assert!((layout.viewport.zoom - 1.1).abs() < 1e-9);
        assert!(layout.block("d").unwrap().selected);
        assert_eq!(layout.viewport.pan, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_layout_serializes() {
        let layout = compose(
            &sample_page(),
            &GridSettings::default(),
            Viewport::default(),
            Some("top"),
        );
        let json = serde_json::to_value(&layout).unwrap();
        assert_eq!(json["format"], "16:9");
        assert_eq!(json["blocks"][1]["blockType"], "title");
        assert!(json["blocks"][0].get("decorations").is_none());
    }
}
