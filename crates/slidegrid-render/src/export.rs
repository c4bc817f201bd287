//! PDF export driver.
//!
//! The [`Exporter`] captures one page of a presentation snapshot: it strips
//! interactive decoration (selection, controls, grid), resets the view to
//! identity at the page's true size and hands the resulting scene to a
//! [`SnapshotRenderer`] backend.

use crate::compositor::compose;
use crate::display_list::DisplayListRenderer;
use crate::renderer::{
    ContentRenderer, RenderContext, RenderResult, RendererError, Scene, build_scene,
};
use slidegrid_core::format::PageFormat;
use slidegrid_core::store::PresentationState;
use slidegrid_core::viewport::Viewport;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Quality multiplier applied to exports unless configured otherwise.
pub const DEFAULT_EXPORT_SCALE: f64 = 5.0;

/// Boxed future for async snapshot backends.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Export target not found: page {0}")]
    TargetNotFound(usize),
    #[error("An export is already in progress")]
    InProgress,
    #[error("Snapshot failed: {0}")]
    Snapshot(#[from] RendererError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a snapshot backend is asked to capture.
#[derive(Debug, Clone)]
pub struct SnapshotRequest {
    pub format: PageFormat,
    /// Page scene with an identity transform, sized to the page.
    pub scene: Scene,
    /// Quality multiplier for raster backends.
    pub scale: f64,
}

/// Backend that turns a page scene into PDF bytes.
pub trait SnapshotRenderer: Send + Sync {
    fn snapshot<'a>(&'a self, request: &'a SnapshotRequest) -> BoxFuture<'a, RenderResult<Vec<u8>>>;
}

/// A finished export, held in memory until saved.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub filename: String,
    pub format: PageFormat,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    /// Write the file into `dir`, creating it if needed.
    ///
    /// Bytes go to a temporary sibling first, so a failed write never leaves
    /// a truncated file under the final name.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        let partial = dir.join(format!("{}.part", self.filename));
        std::fs::write(&partial, &self.bytes)?;
        if let Err(e) = std::fs::rename(&partial, &path) {
            let _ = std::fs::remove_file(&partial);
            return Err(e.into());
        }
        log::info!("Saved {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

/// `blueprint-<format>-<unix-ms>.pdf`
pub fn export_filename(format: PageFormat, unix_ms: u128) -> String {
    format!("blueprint-{}-{}.pdf", format.name(), unix_ms)
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
}

/// Clears the busy flag when an export finishes, however it finishes.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs one export at a time.
pub struct Exporter<S> {
    backend: S,
    content: Box<dyn ContentRenderer>,
    scale: f64,
    busy: AtomicBool,
}

impl<S: SnapshotRenderer> Exporter<S> {
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            content: Box::new(DisplayListRenderer::new()),
            scale: DEFAULT_EXPORT_SCALE,
            busy: AtomicBool::new(false),
        }
    }

    pub fn with_content_renderer(mut self, content: impl ContentRenderer + 'static) -> Self {
        self.content = Box::new(content);
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Whether an export is currently running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Build the capture request for a page of `state`.
    pub fn prepare(
        &self,
        state: &PresentationState,
        page_index: usize,
    ) -> Result<SnapshotRequest, ExportError> {
        let page = state
            .pages
            .get(page_index)
            .ok_or(ExportError::TargetNotFound(page_index))?;
        let layout = compose(page, &state.grid_settings, Viewport::default(), None).for_export();
        let scene = build_scene(&RenderContext::new(&layout, page), self.content.as_ref());
        Ok(SnapshotRequest {
            format: page.format,
            scene,
            scale: self.scale,
        })
    }

    /// Export one page of `state`.
    ///
    /// `progress` receives `(current, total)` page counts. Fails with
    /// [`ExportError::InProgress`] while another export is running.
    pub async fn export(
        &self,
        state: &PresentationState,
        page_index: usize,
        mut progress: impl FnMut(usize, usize),
    ) -> Result<ExportedFile, ExportError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!("Export requested while another is running");
            return Err(ExportError::InProgress);
        }
        let _guard = BusyGuard(&self.busy);

        let request = self
            .prepare(state, page_index)
            .inspect_err(|e| log::error!("Export failed: {}", e))?;
        log::info!("Exporting page {} as {}", page_index + 1, request.format);
        progress(1, 1);

        let bytes = self.backend.snapshot(&request).await.map_err(|e| {
            log::error!("Export failed: {}", e);
            ExportError::Snapshot(e)
        })?;
        let file = ExportedFile {
            filename: export_filename(request.format, unix_millis()),
            format: request.format,
            bytes,
        };
        log::info!("Exported {} ({} bytes)", file.filename, file.bytes.len());
        Ok(file)
    }

    /// Export the state's current page.
    pub async fn export_current(
        &self,
        state: &PresentationState,
        progress: impl FnMut(usize, usize),
    ) -> Result<ExportedFile, ExportError> {
        self.export(state, state.current_page_index, progress).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawCommand;
    use slidegrid_core::block::Block;
    use slidegrid_core::content::BlockType;
    use std::sync::Mutex;
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn noop_waker() -> Waker {
        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker { dummy_raw_waker() }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }
        unsafe { Waker::from_raw(dummy_raw_waker()) }
    }

    fn block_on<F: Future>(f: F) -> F::Output {
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);
        loop {
            if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
                return result;
            }
        }
    }

    /// Records requests and returns a fixed payload.
    #[derive(Default)]
    struct Recorder {
        requests: Mutex<Vec<SnapshotRequest>>,
    }

    impl SnapshotRenderer for Recorder {
        fn snapshot<'a>(
            &'a self,
            request: &'a SnapshotRequest,
        ) -> BoxFuture<'a, RenderResult<Vec<u8>>> {
            Box::pin(async move {
                if let Ok(mut requests) = self.requests.lock() {
                    requests.push(request.clone());
                }
                Ok(b"%PDF-test".to_vec())
            })
        }
    }

    struct Failing;

    impl SnapshotRenderer for Failing {
        fn snapshot<'a>(
            &'a self,
            _request: &'a SnapshotRequest,
        ) -> BoxFuture<'a, RenderResult<Vec<u8>>> {
            Box::pin(async { Err(RendererError::RenderFailed("backend down".into())) })
        }
    }

    /// Stays pending for one poll.
    struct YieldOnce(bool);

    impl Future for YieldOnce {
        type Output = ();
        fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                Poll::Ready(())
            } else {
                self.0 = true;
                Poll::Pending
            }
        }
    }

    struct Slow;

    impl SnapshotRenderer for Slow {
        fn snapshot<'a>(
            &'a self,
            _request: &'a SnapshotRequest,
        ) -> BoxFuture<'a, RenderResult<Vec<u8>>> {
            Box::pin(async {
                YieldOnce(false).await;
                Ok(vec![1, 2, 3])
            })
        }
    }

    fn state() -> PresentationState {
        let mut state = PresentationState::default();
        state.pages[0]
            .blocks
            .push(Block::new(BlockType::Divider, 0, 0, 12, 1).with_id("d"));
        state.selected_block_id = Some("d".into());
        state.zoom = 1.7;
        state
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename(PageFormat::A3Vertical, 42), "blueprint-A3-vertical-42.pdf");
        assert_eq!(export_filename(PageFormat::Widescreen, 7), "blueprint-16:9-7.pdf");
    }

    #[test]
    fn test_export_strips_decoration() {
        let exporter = Exporter::new(Recorder::default());
        let mut calls = Vec::new();
        let file = block_on(exporter.export(&state(), 0, |current, total| {
            calls.push((current, total))
        }))
        .unwrap();
        assert_eq!(calls, vec![(1, 1)]);
        assert_eq!(file.bytes, b"%PDF-test");
        assert!(file.filename.starts_with("blueprint-16:9-"));
        assert!(file.filename.ends_with(".pdf"));

        let requests = exporter.backend.requests.lock().unwrap();
        let request = &requests[0];
        assert!((request.scale - 5.0).abs() < f64::EPSILON);
        assert_eq!(request.scene.transform, kurbo::Affine::IDENTITY);
        assert_eq!(request.scene.size, kurbo::Size::new(1280.0, 720.0));
        // Page background, block fill and border, divider line. No grid,
        // selection ring or controls.
        assert_eq!(request.scene.commands.len(), 4);
        let thick_strokes = request
            .scene
            .commands
            .iter()
            .filter(|c| {
                matches!(c, DrawCommand::Stroke { width, .. } if *width > 1.5 && *width < 2.5)
            })
            .count();
        assert_eq!(thick_strokes, 1);
        assert!(!exporter.is_busy());
    }

    #[test]
    fn test_export_missing_page() {
        let exporter = Exporter::new(Recorder::default());
        let result = block_on(exporter.export(&state(), 3, |_, _| {}));
        assert!(matches!(result, Err(ExportError::TargetNotFound(3))));
        assert!(!exporter.is_busy());
    }

    #[test]
    fn test_export_failure_is_retryable() {
        let exporter = Exporter::new(Failing);
        let result = block_on(exporter.export_current(&state(), |_, _| {}));
        assert!(matches!(result, Err(ExportError::Snapshot(_))));
        assert!(!exporter.is_busy());
        let again = block_on(exporter.export_current(&state(), |_, _| {}));
        assert!(matches!(again, Err(ExportError::Snapshot(_))));
    }

    #[test]
    fn test_concurrent_export_is_rejected() {
        let exporter = Exporter::new(Slow);
        let state = state();
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        let mut first = std::pin::pin!(exporter.export(&state, 0, |_, _| {}));
        assert!(first.as_mut().poll(&mut cx).is_pending());
        assert!(exporter.is_busy());

        let second = block_on(exporter.export(&state, 0, |_, _| {}));
        assert!(matches!(second, Err(ExportError::InProgress)));

        let file = block_on(first).unwrap();
        assert_eq!(file.bytes, vec![1, 2, 3]);
        assert!(!exporter.is_busy());
    }

    #[test]
    fn test_custom_scale() {
        let exporter = Exporter::new(Recorder::default()).with_scale(2.0);
        let request = exporter.prepare(&state(), 0).unwrap();
        assert!((request.scale - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_save_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = ExportedFile {
            filename: export_filename(PageFormat::A3, 1),
            format: PageFormat::A3,
            bytes: b"%PDF-1.7".to_vec(),
        };
        let path = file.save(&dir.path().join("out")).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7");
        let names: Vec<_> = std::fs::read_dir(dir.path().join("out"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }
}
