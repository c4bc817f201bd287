//! Drag, resize and pan gestures.
//!
//! The controller turns continuous pointer movement into discrete, clamped
//! grid updates on the [`PresentationStore`]. Clamping happens on every
//! move, so the committed state is valid whenever the pointer is released.
//!
//! A gesture owns a pointer capture for its lifetime: beginning one returns
//! a [`CaptureToken`] that the host hands back through
//! [`InteractionController::end_gesture`] when the pointer is released
//! anywhere on screen. Move and release events must be routed here for the
//! whole gesture, not only while the pointer is over the block.

use crate::block::{Block, BlockId, BlockUpdate};
use crate::geometry::GridGeometry;
use crate::input::{CursorIcon, Key, Modifiers, PointerTarget};
use crate::store::{PresentationStore, ZOOM_STEP};
use crate::template::BlockTemplate;
use crate::viewport::Viewport;
use kurbo::{Point, Vec2};

/// Where a block drag started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor {
    /// Pointer position in screen pixels.
    pub pointer: Point,
    pub x: u32,
    pub y: u32,
}

/// Where a block resize started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeAnchor {
    pub pointer: Point,
    pub width: u32,
    pub height: u32,
}

/// Where a canvas pan started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanAnchor {
    pub pointer: Point,
    pub pan: Vec2,
}

/// Current gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging { block_id: BlockId, anchor: DragAnchor },
    Resizing { block_id: BlockId, anchor: ResizeAnchor },
    PanningCanvas { anchor: PanAnchor },
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    /// Block being dragged or resized.
    pub fn subject(&self) -> Option<&str> {
        match self {
            GestureState::Dragging { block_id, .. } | GestureState::Resizing { block_id, .. } => {
                Some(block_id)
            }
            _ => None,
        }
    }
}

/// Proof of an active pointer capture. Release it with
/// [`InteractionController::end_gesture`].
#[must_use = "the gesture stays captured until the token is released"]
#[derive(Debug, PartialEq, Eq)]
pub struct CaptureToken {
    id: u64,
}

/// Left column for a block of `width` moved to `column`, kept inside the grid.
///
/// Saturates at 0 when the block is wider than the grid.
pub fn clamp_column(column: i64, width: u32, columns: u32) -> u32 {
    let max = i64::from(columns) - i64::from(width);
    column.min(max).max(0) as u32
}

/// Width for a block starting at column `x`, kept inside the grid and at
/// least one column.
pub fn clamp_width(width: i64, x: u32, columns: u32) -> u32 {
    let max = i64::from(columns) - i64::from(x);
    width.min(max).max(1) as u32
}

fn clamp_row(row: i64, min: i64) -> u32 {
    row.max(min).min(i64::from(u32::MAX)) as u32
}

/// Translates pointer and keyboard input into store mutations.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: GestureState,
    /// Id of the live capture, if any.
    capture: Option<u64>,
    next_capture: u64,
    pan: Vec2,
    space_held: bool,
    text_focus: bool,
    zoom_step: f64,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self {
            state: GestureState::Idle,
            capture: None,
            next_capture: 0,
            pan: Vec2::ZERO,
            space_held: false,
            text_focus: false,
            zoom_step: ZOOM_STEP,
        }
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zoom increment applied per Ctrl + wheel notch.
    pub fn with_zoom_step(mut self, step: f64) -> Self {
        self.zoom_step = step.abs();
        self
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Current pan offset in screen pixels.
    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn reset_pan(&mut self) {
        self.pan = Vec2::ZERO;
    }

    /// View transform for the given zoom and the current pan.
    pub fn viewport(&self, zoom: f64) -> Viewport {
        Viewport::new(zoom, self.pan)
    }

    /// Number of live pointer captures (0 or 1).
    pub fn active_captures(&self) -> usize {
        usize::from(self.capture.is_some())
    }

    pub fn is_space_held(&self) -> bool {
        self.space_held
    }

    /// While a text field has focus, Space types a space instead of arming
    /// the pan gesture.
    pub fn set_text_focus(&mut self, focused: bool) {
        self.text_focus = focused;
    }

    pub fn cursor(&self) -> CursorIcon {
        match &self.state {
            GestureState::Dragging { .. } | GestureState::PanningCanvas { .. } => {
                CursorIcon::Grabbing
            }
            GestureState::Resizing { .. } => CursorIcon::SeResize,
            GestureState::Idle if self.space_held => CursorIcon::Grab,
            GestureState::Idle => CursorIcon::Default,
        }
    }

    fn begin(&mut self, state: GestureState) -> CaptureToken {
        let id = self.next_capture;
        self.next_capture += 1;
        log::debug!("Gesture started: {:?}", state);
        self.state = state;
        self.capture = Some(id);
        CaptureToken { id }
    }

    fn finish(&mut self) {
        if !self.state.is_idle() {
            log::debug!("Gesture ended: {:?}", self.state);
        }
        self.state = GestureState::Idle;
        self.capture = None;
    }

    /// Handle a pointer press at `position` (screen pixels).
    ///
    /// Returns a capture token when a gesture begins. Presses that do not
    /// start a gesture (delete control, background click) act immediately.
    pub fn pointer_down(
        &mut self,
        store: &mut PresentationStore,
        target: PointerTarget,
        position: Point,
    ) -> Option<CaptureToken> {
        if !self.state.is_idle() {
            return None;
        }
        match target {
            PointerTarget::DeleteControl(id) => {
                store.remove_block(&id);
                None
            }
            PointerTarget::Background => {
                if self.space_held {
                    let anchor = PanAnchor {
                        pointer: position,
                        pan: self.pan,
                    };
                    Some(self.begin(GestureState::PanningCanvas { anchor }))
                } else {
                    store.select_block(None);
                    None
                }
            }
            PointerTarget::BlockBody(id) => {
                let block = store.block(&id)?;
                let anchor = DragAnchor {
                    pointer: position,
                    x: block.x,
                    y: block.y,
                };
                store.select_block(Some(&id));
                Some(self.begin(GestureState::Dragging {
                    block_id: id,
                    anchor,
                }))
            }
            PointerTarget::ResizeHandle(id) => {
                let block = store.block(&id)?;
                let anchor = ResizeAnchor {
                    pointer: position,
                    width: block.width,
                    height: block.height,
                };
                Some(self.begin(GestureState::Resizing {
                    block_id: id,
                    anchor,
                }))
            }
        }
    }

    /// Handle pointer movement anywhere on screen.
    pub fn pointer_move(&mut self, store: &mut PresentationStore, position: Point) {
        match &self.state {
            GestureState::Idle => {}
            GestureState::PanningCanvas { anchor } => {
                self.pan = anchor.pan + (position - anchor.pointer);
            }
            GestureState::Dragging { block_id, anchor } => {
                let Some(block) = store.block(block_id) else {
                    return;
                };
                let geometry =
                    GridGeometry::new(store.current_page().format, store.grid_settings());
                let delta = Viewport::new(store.zoom(), self.pan)
                    .screen_delta_to_page(position - anchor.pointer);
                let cells = geometry.pixel_delta_to_grid_delta(delta);
                let x = clamp_column(
                    i64::from(anchor.x) + cells.columns,
                    block.width,
                    geometry.columns(),
                );
                let y = clamp_row(i64::from(anchor.y) + cells.rows, 0);
                log::trace!("Drag {} to ({}, {})", block_id, x, y);
                let id = block_id.clone();
                store.update_block(&id, &BlockUpdate::position(x, y));
            }
            GestureState::Resizing { block_id, anchor } => {
                let Some(block) = store.block(block_id) else {
                    return;
                };
                let geometry =
                    GridGeometry::new(store.current_page().format, store.grid_settings());
                let delta = Viewport::new(store.zoom(), self.pan)
                    .screen_delta_to_page(position - anchor.pointer);
                let cells = geometry.pixel_delta_to_grid_delta(delta);
                let width = clamp_width(
                    i64::from(anchor.width) + cells.columns,
                    block.x,
                    geometry.columns(),
                );
                let height = clamp_row(i64::from(anchor.height) + cells.rows, 1);
                log::trace!("Resize {} to {}x{}", block_id, width, height);
                let id = block_id.clone();
                store.update_block(&id, &BlockUpdate::size(width, height));
            }
        }
    }

    /// Release the capture for a finished gesture.
    ///
    /// The last computed position is already committed. Stale tokens (the
    /// gesture was ended by a key release) are ignored.
    pub fn end_gesture(&mut self, token: CaptureToken) -> bool {
        if self.capture != Some(token.id) {
            log::trace!("Ignoring stale capture token {}", token.id);
            return false;
        }
        self.finish();
        true
    }

    pub fn key_down(&mut self, key: &Key) {
        if *key == Key::Space && !self.text_focus {
            self.space_held = true;
        }
    }

    /// Releasing Space ends a pan in progress.
    pub fn key_up(&mut self, key: &Key) {
        if *key != Key::Space {
            return;
        }
        self.space_held = false;
        if matches!(self.state, GestureState::PanningCanvas { .. }) {
            self.finish();
        }
    }

    /// Ctrl/Cmd + wheel zooms in fixed steps. Returns whether the wheel
    /// event was consumed.
    pub fn wheel(
        &mut self,
        store: &mut PresentationStore,
        delta_y: f64,
        modifiers: Modifiers,
    ) -> bool {
        if !modifiers.command() {
            return false;
        }
        let step = if delta_y > 0.0 {
            -self.zoom_step
        } else {
            self.zoom_step
        };
        store.set_zoom(step);
        true
    }

    /// Place a new block from a dropped template at a page-space point.
    ///
    /// Missing or malformed payloads are ignored. Returns the new block id.
    pub fn drop_template(
        &mut self,
        store: &mut PresentationStore,
        payload: Option<&str>,
        page_point: Point,
    ) -> Option<BlockId> {
        let template = match BlockTemplate::from_payload(payload) {
            Ok(template) => template,
            Err(e) => {
                log::debug!("Ignoring drop: {}", e);
                return None;
            }
        };
        let geometry =
            GridGeometry::new(store.current_page().format, store.grid_settings());
        let cell = geometry.pixel_point_to_grid_cell(page_point);
        let width = template.default_width.max(1);
        let height = template.default_height.max(1);
        let x = clamp_column(cell.column, width, geometry.columns());
        let y = clamp_row(cell.row, 0);
        let block = Block::new(template.block_type, x, y, width, height);
        let id = block.id.clone();
        store.add_block(block);
        Some(id)
    }
}
