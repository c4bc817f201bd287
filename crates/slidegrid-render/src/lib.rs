//! SlideGrid Render Library
//!
//! Visual layout, content drawing and PDF export for SlideGrid pages.
//! Drawing goes through a flat display list ([`Scene`]) that any backend
//! can consume; the in-tree backend writes vector PDF.

pub mod compositor;
pub mod display_list;
pub mod export;
pub mod pdf;
mod renderer;

pub use compositor::{
    BlockLayout, CanvasLayout, Decorations, GridLine, LineWeight, compose, compose_current,
};
pub use display_list::DisplayListRenderer;
pub use export::{
    BoxFuture, DEFAULT_EXPORT_SCALE, ExportError, ExportedFile, Exporter, SnapshotRenderer,
    SnapshotRequest, export_filename,
};
pub use pdf::PdfSnapshot;
pub use renderer::{
    ContentRenderer, DrawCommand, FontStyle, Palette, RenderContext, RenderResult, RendererError,
    Scene, build_scene, text_width, wrap_text,
};
