//! SlideGrid Core Library
//!
//! Grid layout model, presentation state and pointer interaction for the
//! SlideGrid page editor. Nothing here depends on a renderer or windowing
//! system.

pub mod block;
pub mod config;
pub mod content;
pub mod format;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod settings;
pub mod store;
pub mod template;
pub mod viewport;

pub use block::{Block, BlockId, BlockUpdate, Page};
pub use config::{ConfigError, EditorConfig};
pub use content::{BlockContent, BlockType, ResolvedContent};
pub use format::PageFormat;
pub use geometry::{GridCell, GridDelta, GridGeometry};
pub use input::{CursorIcon, Key, Modifiers, PointerTarget};
pub use interaction::{CaptureToken, GestureState, InteractionController};
pub use settings::{GridSettings, GridSettingsUpdate};
pub use store::{PageSummary, PresentationState, PresentationStore, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
pub use template::{BlockTemplate, PayloadError, TemplateCategory};
pub use viewport::Viewport;
