//! Scripted editing sessions.
//!
//! A session owns the store, the interaction controller and the exporter,
//! and replays a JSON script of pointer, keyboard and store commands
//! against them. Pointer positions are screen pixels; targets are found by
//! hit testing the composed layout, exactly as a windowed shell would.

use kurbo::Point;
use serde::Deserialize;
use slidegrid_core::block::BlockUpdate;
use slidegrid_core::config::{ConfigError, EditorConfig};
use slidegrid_core::content::BlockType;
use slidegrid_core::format::PageFormat;
use slidegrid_core::input::{Key, Modifiers};
use slidegrid_core::interaction::{CaptureToken, InteractionController};
use slidegrid_core::settings::GridSettingsUpdate;
use slidegrid_core::store::PresentationStore;
use slidegrid_core::template::template_for;
use slidegrid_render::compositor::{CanvasLayout, compose_current};
use slidegrid_render::export::{ExportError, Exporter};
use slidegrid_render::pdf::PdfSnapshot;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no template for block type {0}")]
    NoTemplate(BlockType),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// One scripted step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Command {
    #[serde(rename_all = "camelCase")]
    PointerDown { at: Point },
    #[serde(rename_all = "camelCase")]
    PointerMove { at: Point },
    PointerUp,
    #[serde(rename_all = "camelCase")]
    KeyDown { key: String },
    #[serde(rename_all = "camelCase")]
    KeyUp { key: String },
    #[serde(rename_all = "camelCase")]
    TextFocus { focused: bool },
    #[serde(rename_all = "camelCase")]
    Wheel {
        delta_y: f64,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        meta: bool,
    },
    /// Drop a catalog template, or a raw payload, at a screen point.
    #[serde(rename_all = "camelCase")]
    Drop {
        #[serde(default)]
        block_type: Option<BlockType>,
        #[serde(default)]
        payload: Option<String>,
        at: Point,
    },
    /// Select the block at `index` on the current page.
    #[serde(rename_all = "camelCase")]
    Select { index: usize },
    ClearSelection,
    #[serde(rename_all = "camelCase")]
    UpdateSelected { update: BlockUpdate },
    RemoveSelected,
    AddPage,
    #[serde(rename_all = "camelCase")]
    DeletePage { index: usize },
    #[serde(rename_all = "camelCase")]
    SetPage { index: usize },
    #[serde(rename_all = "camelCase")]
    SetFormat { format: PageFormat },
    #[serde(rename_all = "camelCase")]
    UpdateGrid { settings: GridSettingsUpdate },
    ToggleGrid,
    ZoomIn,
    ZoomOut,
    ResetPan,
    /// Export the current page to the session's export directory.
    Export,
}

/// A list of commands.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Script {
    pub commands: Vec<Command>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let json = std::fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// Editor state driven by commands.
pub struct Session {
    store: PresentationStore,
    controller: InteractionController,
    capture: Option<CaptureToken>,
    exporter: Exporter<PdfSnapshot>,
    export_dir: PathBuf,
    exports: Vec<PathBuf>,
}

impl Session {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            store: config.new_store(),
            controller: config.new_controller(),
            capture: None,
            exporter: Exporter::new(PdfSnapshot::new()).with_scale(config.export_scale),
            export_dir: config.export_dir.clone(),
            exports: Vec::new(),
        }
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn store(&self) -> &PresentationStore {
        &self.store
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Files written by `export` commands, in order.
    pub fn exports(&self) -> &[PathBuf] {
        &self.exports
    }

    /// Current page as it would be drawn now.
    pub fn layout(&self) -> CanvasLayout {
        compose_current(&self.store, self.controller.pan())
    }

    pub fn run(&mut self, script: &Script) -> Result<(), SessionError> {
        for (i, command) in script.commands.iter().enumerate() {
            log::trace!("Step {}: {:?}", i, command);
            self.apply(command)?;
        }
        // A script that ends mid-gesture releases it like a pointer-up.
        self.release_capture();
        Ok(())
    }

    pub fn apply(&mut self, command: &Command) -> Result<(), SessionError> {
        match command {
            Command::PointerDown { at } => {
                let target = self.layout().hit_test_screen(*at);
                log::debug!("Pointer down at {:?} on {:?}", at, target);
                if let Some(token) = self.controller.pointer_down(&mut self.store, target, *at) {
                    self.release_capture();
                    self.capture = Some(token);
                }
            }
            Command::PointerMove { at } => self.controller.pointer_move(&mut self.store, *at),
            Command::PointerUp => self.release_capture(),
            Command::KeyDown { key } => self.controller.key_down(&Key::from_name(key)),
            Command::KeyUp { key } => self.controller.key_up(&Key::from_name(key)),
            Command::TextFocus { focused } => self.controller.set_text_focus(*focused),
            Command::Wheel { delta_y, ctrl, meta } => {
                let modifiers = Modifiers {
                    ctrl: *ctrl,
                    meta: *meta,
                    ..Modifiers::default()
                };
                self.controller.wheel(&mut self.store, *delta_y, modifiers);
            }
            Command::Drop {
                block_type,
                payload,
                at,
            } => {
                let payload = match block_type {
                    Some(block_type) => Some(
                        template_for(*block_type)
                            .ok_or(SessionError::NoTemplate(*block_type))?
                            .to_payload()
                            .map_err(|e| {
                                log::error!("Failed to encode template: {}", e);
                                SessionError::NoTemplate(*block_type)
                            })?,
                    ),
                    None => payload.clone(),
                };
                let page_point = self.layout().screen_to_page(*at);
                self.controller
                    .drop_template(&mut self.store, payload.as_deref(), page_point);
            }
            Command::Select { index } => {
                let id = self
                    .store
                    .current_page()
                    .blocks
                    .get(*index)
                    .map(|block| block.id.clone());
                match id {
                    Some(id) => self.store.select_block(Some(&id)),
                    None => log::debug!("No block at index {}", index),
                }
            }
            Command::ClearSelection => self.store.select_block(None),
            Command::UpdateSelected { update } => {
                if let Some(id) = self.store.selected_block().map(|block| block.id.clone()) {
                    self.store.update_block(&id, update);
                }
            }
            Command::RemoveSelected => {
                if let Some(id) = self.store.selected_block().map(|block| block.id.clone()) {
                    self.store.remove_block(&id);
                }
            }
            Command::AddPage => self.store.add_page(),
            Command::DeletePage { index } => {
                self.store.delete_page(*index);
            }
            Command::SetPage { index } => {
                self.store.set_current_page(*index);
            }
            Command::SetFormat { format } => self.store.set_format(*format),
            Command::UpdateGrid { settings } => self.store.update_grid_settings(settings),
            Command::ToggleGrid => self.store.toggle_grid(),
            Command::ZoomIn => self.store.zoom_in(),
            Command::ZoomOut => self.store.zoom_out(),
            Command::ResetPan => self.controller.reset_pan(),
            Command::Export => {
                let path = self.export()?;
                self.exports.push(path);
            }
        }
        Ok(())
    }

    /// Export the current page and save it to the export directory.
    pub fn export(&mut self) -> Result<PathBuf, SessionError> {
        let snapshot = self.store.snapshot();
        let file = pollster::block_on(self.exporter.export_current(&snapshot, |current, total| {
            log::info!("Exporting page {} of {}", current, total);
        }))?;
        Ok(file.save(&self.export_dir)?)
    }

    fn release_capture(&mut self) {
        if let Some(token) = self.capture.take() {
            self.controller.end_gesture(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(&EditorConfig::default())
    }

    fn run(session: &mut Session, json: &str) {
        session.run(&Script::from_json(json).unwrap()).unwrap();
    }

    #[test]
    fn test_parse_commands() {
        let script = Script::from_json(
            r#"{"commands": [
                {"op": "pointerDown", "at": {"x": 1, "y": 2}},
                {"op": "wheel", "deltaY": -3, "ctrl": true},
                {"op": "drop", "blockType": "chart-bar", "at": {"x": 0, "y": 0}},
                {"op": "updateGrid", "settings": {"columns": 12}},
                {"op": "export"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(script.commands.len(), 5);
        assert_eq!(
            script.commands[1],
            Command::Wheel {
                delta_y: -3.0,
                ctrl: true,
                meta: false
            }
        );
        assert!(matches!(
            script.commands[2],
            Command::Drop {
                block_type: Some(BlockType::ChartBar),
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_op_is_rejected() {
        assert!(matches!(
            Script::from_json(r#"{"commands": [{"op": "teleport"}]}"#),
            Err(SessionError::Parse(_))
        ));
    }

    #[test]
    fn test_drop_then_drag() {
        let mut session = session();
        // Drop a text template (8x4) at page (140, 60): column 2, row 1.
        run(
            &mut session,
            r#"{"commands": [
                {"op": "drop", "blockType": "text", "at": {"x": 140, "y": 60}},
                {"op": "pointerDown", "at": {"x": 150, "y": 70}},
                {"op": "pointerMove", "at": {"x": 250, "y": 110}},
                {"op": "pointerUp"}
            ]}"#,
        );
        let page = session.store().current_page();
        assert_eq!(page.len(), 1);
        let block = &page.blocks[0];
        assert_eq!((block.x, block.y, block.width, block.height), (4, 3, 8, 4));
        assert_eq!(session.store().selected_block_id(), Some(block.id.as_str()));
        assert_eq!(session.controller().active_captures(), 0);
    }

    #[test]
    fn test_resize_through_handle() {
        let mut session = session();
        run(
            &mut session,
            r#"{"commands": [
                {"op": "drop", "blockType": "text", "at": {"x": 40, "y": 40}},
                {"op": "select", "index": 0},
                {"op": "pointerDown", "at": {"x": 435, "y": 115}},
                {"op": "pointerMove", "at": {"x": 2000, "y": 135}},
                {"op": "pointerUp"}
            ]}"#,
        );
        let block = &session.store().current_page().blocks[0];
        assert_eq!((block.width, block.height), (24, 5));
    }

    #[test]
    fn test_delete_control_and_pan() {
        let mut session = session();
        run(
            &mut session,
            r#"{"commands": [
                {"op": "drop", "blockType": "divider", "at": {"x": 40, "y": 40}},
                {"op": "select", "index": 0},
                {"op": "pointerDown", "at": {"x": 638, "y": 40}},
                {"op": "pointerUp"},
                {"op": "keyDown", "key": "Space"},
                {"op": "pointerDown", "at": {"x": 600, "y": 600}},
                {"op": "pointerMove", "at": {"x": 650, "y": 580}},
                {"op": "keyUp", "key": "Space"},
                {"op": "pointerMove", "at": {"x": 900, "y": 900}},
                {"op": "pointerUp"}
            ]}"#,
        );
        assert!(session.store().current_page().is_empty());
        assert_eq!(session.controller().pan(), kurbo::Vec2::new(50.0, -20.0));
        assert_eq!(session.controller().active_captures(), 0);
    }

    #[test]
    fn test_invalid_drop_payload_is_ignored() {
        let mut session = session();
        run(
            &mut session,
            r#"{"commands": [{"op": "drop", "payload": "{oops", "at": {"x": 100, "y": 100}}]}"#,
        );
        assert!(session.store().current_page().is_empty());
    }

    #[test]
    fn test_icons_have_no_template() {
        let mut session = session();
        let script = Script::from_json(
            r#"{"commands": [
                {"op": "drop", "blockType": "icons", "at": {"x": 0, "y": 0}}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(
            session.run(&script),
            Err(SessionError::NoTemplate(BlockType::Icons))
        ));
    }

    #[test]
    fn test_pages_and_zoom() {
        let mut session = session();
        run(
            &mut session,
            r#"{"commands": [
                {"op": "addPage"},
                {"op": "setFormat", "format": "A3-vertical"},
                {"op": "zoomIn"}, {"op": "zoomIn"},
                {"op": "wheel", "deltaY": 100, "ctrl": true},
                {"op": "deletePage", "index": 0},
                {"op": "toggleGrid"}
            ]}"#,
        );
        let store = session.store();
        assert_eq!(store.pages().len(), 1);
        assert_eq!(store.current_page().format, PageFormat::A3Vertical);
        assert!((store.zoom() - 1.1).abs() < 1e-9);
        assert!(!store.grid_settings().show_grid);
        assert!(session.layout().grid_lines.is_empty());
    }

    #[test]
    fn test_export_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session().with_export_dir(dir.path());
        run(
            &mut session,
            r#"{"commands": [
                {"op": "drop", "blockType": "chart-pie", "at": {"x": 40, "y": 40}},
                {"op": "drop", "blockType": "title", "at": {"x": 500, "y": 40}},
                {"op": "select", "index": 1},
                {"op": "updateSelected", "update": {
                    "content": {"type": "title", "title": "Roadmap"}
                }},
                {"op": "export"}
            ]}"#,
        );
        assert_eq!(session.exports().len(), 1);
        let path = &session.exports()[0];
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("blueprint-16:9-") && name.ends_with(".pdf"));
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));
        // Selection is untouched by exporting.
        assert!(session.store().selected_block().is_some());
    }

    #[test]
    fn test_script_ending_mid_gesture_releases_capture() {
        let mut session = session();
        run(
            &mut session,
            r#"{"commands": [
                {"op": "drop", "blockType": "text", "at": {"x": 40, "y": 40}},
                {"op": "pointerDown", "at": {"x": 50, "y": 50}},
                {"op": "pointerMove", "at": {"x": 100, "y": 50}}
            ]}"#,
        );
        assert_eq!(session.controller().active_captures(), 0);
        assert_eq!(session.store().current_page().blocks[0].x, 1);
    }

    #[test]
    fn test_load_missing_script() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Script::load(&dir.path().join("none.json")),
            Err(SessionError::Io { .. })
        ));
    }
}
