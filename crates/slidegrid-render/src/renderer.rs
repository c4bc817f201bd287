//! Renderer trait abstraction.

use crate::compositor::{BlockLayout, CanvasLayout, LineWeight};
use kurbo::{Affine, BezPath, Circle, Line, Point, Rect, RoundedRect, Shape, Size, Vec2};
use peniko::Color;
use slidegrid_core::block::Page;
use slidegrid_core::content::BlockContent;
use thiserror::Error;

/// Tolerance used when flattening shapes to paths.
pub const PATH_TOLERANCE: f64 = 0.1;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid page size {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
    #[error("Invalid export scale {0}")]
    InvalidScale(f64),
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Text face. Maps onto the standard PDF base fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    Mono,
}

/// One drawing operation in page pixels.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Fill {
        path: BezPath,
        color: Color,
    },
    Stroke {
        path: BezPath,
        color: Color,
        width: f64,
    },
    /// Single line of text; `origin` is the left end of the baseline.
    Text {
        origin: Point,
        text: String,
        size: f64,
        color: Color,
        style: FontStyle,
    },
}

impl DrawCommand {
    /// Approximate extent of the command.
    pub fn bounds(&self) -> Rect {
        match self {
            DrawCommand::Fill { path, .. } => path.bounding_box(),
            DrawCommand::Stroke { path, width, .. } => {
                path.bounding_box().inflate(width / 2.0, width / 2.0)
            }
            DrawCommand::Text {
                origin, text, size, ..
            } => Rect::new(
                origin.x,
                origin.y - size,
                origin.x + text_width(text, *size),
                origin.y,
            ),
        }
    }
}

/// Average advance of a glyph as a fraction of the font size.
const AVERAGE_GLYPH_WIDTH: f64 = 0.52;

/// Estimated rendered width of `text`.
pub fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * AVERAGE_GLYPH_WIDTH
}

/// Break `text` into lines no wider than `max_width`, on word boundaries.
///
/// Explicit newlines are kept. A single word longer than the width gets a
/// line of its own.
pub fn wrap_text(text: &str, max_width: f64, size: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if line.is_empty() {
                line.push_str(word);
                continue;
            }
            let candidate = format!("{} {}", line, word);
            if text_width(&candidate, size) > max_width {
                lines.push(std::mem::replace(&mut line, word.to_string()));
            } else {
                line = candidate;
            }
        }
        lines.push(line);
    }
    lines
}

/// Flat list of drawing commands for one page.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Page size in page pixels.
    pub size: Size,
    /// Page-to-output transform.
    pub transform: Affine,
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            transform: Affine::IDENTITY,
            commands: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn fill(&mut self, shape: &impl Shape, color: Color) {
        self.commands.push(DrawCommand::Fill {
            path: shape.to_path(PATH_TOLERANCE),
            color,
        });
    }

    pub fn stroke(&mut self, shape: &impl Shape, color: Color, width: f64) {
        self.commands.push(DrawCommand::Stroke {
            path: shape.to_path(PATH_TOLERANCE),
            color,
            width,
        });
    }

    pub fn line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        self.stroke(&Line::new(from, to), color, width);
    }

    pub fn text(
        &mut self,
        origin: Point,
        text: impl Into<String>,
        size: f64,
        color: Color,
        style: FontStyle,
    ) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.commands.push(DrawCommand::Text {
            origin,
            text,
            size,
            color,
            style,
        });
    }

    /// Wrapped text inside `rect`. Lines that would overflow the bottom are
    /// dropped. Returns the y coordinate below the last line drawn.
    pub fn text_block(
        &mut self,
        rect: Rect,
        text: &str,
        size: f64,
        color: Color,
        style: FontStyle,
    ) -> f64 {
        let line_height = size * LINE_HEIGHT;
        let mut y = rect.y0;
        for line in wrap_text(text, rect.width(), size) {
            if y + size > rect.y1 {
                break;
            }
            self.text(Point::new(rect.x0, y + size), line, size, color, style);
            y += line_height;
        }
        y
    }

    /// Text strings in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f64 = 1.4;

/// Draws the content of one block into its box.
///
/// Implementations can target a display list, a GPU scene or anything else
/// that consumes [`Scene`] commands.
pub trait ContentRenderer: Send + Sync {
    /// Draw `content` inside `bounds` (page pixels, padding already removed).
    fn render(&self, content: &BlockContent, bounds: Rect, scene: &mut Scene);
}

/// Colors for page chrome.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub page_background: Color,
    pub block_background: Color,
    pub block_border: Color,
    pub selection: Color,
    pub grid_light: Color,
    pub grid_strong: Color,
    pub delete_control: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            page_background: Color::WHITE,
            block_background: Color::WHITE,
            block_border: Color::from_rgba8(226, 232, 240, 255),
            selection: Color::from_rgba8(59, 130, 246, 255),
            grid_light: Color::from_rgba8(59, 130, 246, 30),
            grid_strong: Color::from_rgba8(59, 130, 246, 70),
            delete_control: Color::from_rgba8(239, 68, 68, 255),
        }
    }
}

/// Context for building one page scene.
pub struct RenderContext<'a> {
    pub layout: &'a CanvasLayout,
    /// Supplies block content; blocks are matched to the layout by id.
    pub page: &'a Page,
    pub palette: Palette,
}

impl<'a> RenderContext<'a> {
    pub fn new(layout: &'a CanvasLayout, page: &'a Page) -> Self {
        Self {
            layout,
            page,
            palette: Palette::default(),
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }
}

/// Build the full page scene: background, grid overlay, blocks with their
/// content, then selection controls on top.
pub fn build_scene(ctx: &RenderContext, content: &dyn ContentRenderer) -> Scene {
    let layout = ctx.layout;
    let palette = &ctx.palette;
    let mut scene = Scene::new(layout.page_size);
    scene.transform = layout.transform();

    scene.fill(&layout.page_rect(), palette.page_background);

    for line in &layout.grid_lines {
        let color = match line.weight {
            LineWeight::Light => palette.grid_light,
            LineWeight::Strong => palette.grid_strong,
        };
        scene.line(line.from, line.to, color, line.weight.stroke_width());
    }

    for block in &layout.blocks {
        let Some(model) = ctx.page.block(&block.id) else {
            log::trace!("Layout block {} missing from page", block.id);
            continue;
        };
        let frame = RoundedRect::from_rect(block.rect, BLOCK_RADIUS);
        scene.fill(&frame, palette.block_background);
        if block.selected {
            scene.stroke(&frame, palette.selection, 2.0);
        } else {
            scene.stroke(&frame, palette.block_border, 1.0);
        }
        content.render(&model.content, block.content_rect(), &mut scene);
    }

    if let Some(selected) = layout.selected() {
        render_controls(&mut scene, selected, palette);
    }

    scene
}

/// Corner radius of block frames.
const BLOCK_RADIUS: f64 = 4.0;

fn render_controls(scene: &mut Scene, block: &BlockLayout, palette: &Palette) {
    let Some(decorations) = &block.decorations else {
        return;
    };

    // Delete control: filled circle with a cross.
    let delete = decorations.delete_control;
    let center = delete.center();
    scene.fill(&Circle::new(center, delete.width() / 2.0), palette.delete_control);
    let arm = delete.width() * 0.15;
    scene.line(
        center + Vec2::new(-arm, -arm),
        center + Vec2::new(arm, arm),
        Color::WHITE,
        1.5,
    );
    scene.line(
        center + Vec2::new(-arm, arm),
        center + Vec2::new(arm, -arm),
        Color::WHITE,
        1.5,
    );

    // Resize handle: corner bracket inset by 4px.
    let handle = decorations.resize_handle.inset(-4.0);
    let mut path = BezPath::new();
    path.move_to((handle.x1, handle.y0));
    path.line_to((handle.x1, handle.y1));
    path.line_to((handle.x0, handle.y1));
    scene.stroke(&path, palette.selection, 2.0);
}
