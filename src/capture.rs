//! Capture orchestration and composition
//!
//! One capture operation is a single logical thread of control: every remote
//! interaction is awaited in strict sequence, because each tile capture
//! depends on the scroll/layout mutation issued right before it. The layout
//! mutation performed while gathering init data is reverted on every exit
//! path, success and failure alike.

use std::time::Duration;

use serde_json::json;

use crate::blockout::{self, BlockOut, BlockOutRect};
use crate::dpr;
use crate::error::{Error, Result};
use crate::geometry::{self, PaddingOverrides, Rect};
use crate::plan::{self, Section};
use crate::raster::{Color, RasterBuffer};
use crate::remote::{InitData, RemoteTarget};
use crate::scripts;
use crate::stitching;
use crate::target;

/// Default single-capture pixel budget (32 MP).
pub const DEFAULT_MAX_CAPTURE_PIXELS: u64 = 32 * 1024 * 1024;

/// Default delay between repositioning the view and capturing, to let
/// asynchronous remote layout/paint settle.
pub const DEFAULT_SETTLE_WAIT: Duration = Duration::from_millis(100);

/// An explicit capture area. Unset fields default to the document: origin at
/// (0, 0), size extending to the document edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct AreaSpec {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl AreaSpec {
    fn resolve(&self, init: &InitData) -> Rect {
        let x = self.x.unwrap_or(0.0);
        let y = self.y.unwrap_or(0.0);
        Rect::new(
            x,
            y,
            self.width.unwrap_or(init.document.width - x),
            self.height.unwrap_or(init.document.height - y),
        )
    }
}

impl From<Rect> for AreaSpec {
    fn from(rect: Rect) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
        }
    }
}

/// What to capture: the whole document, the current viewport, or an explicit
/// area.
#[derive(Debug, Clone)]
pub enum CaptureKind {
    Document,
    Viewport,
    Area(AreaSpec),
}

impl CaptureKind {
    fn area(&self, init: &InitData) -> Rect {
        match self {
            CaptureKind::Document => {
                Rect::new(0.0, 0.0, init.document.width, init.document.height)
            }
            CaptureKind::Viewport => init.viewport,
            CaptureKind::Area(spec) => spec.resolve(init),
        }
    }
}

/// Options for one capture operation.
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    /// Horizontal padding of the document, threaded into the probe scripts
    pub horizontal_padding: u32,
    /// Per-edge padding overrides; unset fields use the target defaults
    pub padding: PaddingOverrides,
    /// Areas/elements to redact in the output image
    pub block_outs: Vec<BlockOut>,
    /// Fill color for block-outs without their own; defaults to black
    pub block_out_color: Option<Color>,
    /// Script executed on the remote target before each tile capture, with
    /// the tile index as its only argument
    pub each_script: Option<String>,
    /// Script executed on the remote target once after all captures
    pub complete_script: Option<String>,
    /// Settle delay between repositioning and capturing
    pub wait: Duration,
    /// Maximum pixels one raw capture may contain (physical pixels)
    pub max_capture_pixels: u64,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            horizontal_padding: 0,
            padding: PaddingOverrides::default(),
            block_outs: Vec::new(),
            block_out_color: None,
            each_script: None,
            complete_script: None,
            wait: DEFAULT_SETTLE_WAIT,
            max_capture_pixels: DEFAULT_MAX_CAPTURE_PIXELS,
        }
    }
}

/// Full-page screenshot engine over a remote target.
///
/// Holds the target exclusively for its lifetime: the remote view position is
/// shared mutable state, and overlapping capture operations against one
/// session would corrupt or misattribute tiles. Unrelated sessions can run
/// their own operations concurrently.
pub struct Screenshot<'a, T: RemoteTarget> {
    target: &'a mut T,
}

impl<'a, T: RemoteTarget> Screenshot<'a, T> {
    pub fn new(target: &'a mut T) -> Self {
        Self { target }
    }

    /// Captures the whole document.
    pub async fn capture_document(&mut self, options: &CaptureOptions) -> Result<Vec<u8>> {
        self.capture(CaptureKind::Document, options).await
    }

    /// Captures the currently visible viewport.
    pub async fn capture_viewport(&mut self, options: &CaptureOptions) -> Result<Vec<u8>> {
        self.capture(CaptureKind::Viewport, options).await
    }

    /// Captures an explicit area; unset fields default to the document.
    pub async fn capture_area(&mut self, area: AreaSpec, options: &CaptureOptions) -> Result<Vec<u8>> {
        self.capture(CaptureKind::Area(area), options).await
    }

    /// Captures the requested region as one encoded PNG, stitching tiles and
    /// applying block-outs as needed.
    pub async fn capture(&mut self, kind: CaptureKind, options: &CaptureOptions) -> Result<Vec<u8>> {
        let ratio = dpr::resolve(self.target, options.horizontal_padding).await?;
        let needs_stitching =
            stitching::needs_stitching(self.target, options.horizontal_padding).await?;

        // The budget is configured in physical pixels; planning happens in
        // logical pixels.
        let max_pixels = options.max_capture_pixels as f64 / ratio;

        let raw_init = self
            .target
            .execute(scripts::INIT, vec![json!(needs_stitching)])
            .await?;
        let payload = raw_init.as_str().ok_or_else(|| {
            Error::Protocol(format!("init script returned a non-string payload: {}", raw_init))
        })?;
        let init_json: serde_json::Value = serde_json::from_str(payload)?;
        let init: InitData = serde_json::from_value(init_json.clone())?;

        // The init script mutated remote layout state; from here on the
        // revert script must run no matter how the operation ends.
        let outcome = self
            .capture_composed(&kind, options, &init, &init_json, max_pixels, needs_stitching, ratio)
            .await;
        let revert = self.target.execute(scripts::REVERT, vec![init_json]).await;

        let (mut image, block_outs) = match (outcome, revert) {
            (Ok(composed), Ok(_)) => composed,
            (Ok(_), Err(err)) => return Err(err),
            (Err(err), Ok(_)) => return Err(err),
            (Err(err), Err(revert_err)) => {
                // Best-effort cleanup; the capture error is the one to surface
                log::warn!("layout revert failed while handling a capture error: {}", revert_err);
                return Err(err);
            }
        };

        apply_block_outs(&mut image, &block_outs, ratio);
        image.encode_png()
    }

    /// One raw capture of the current viewport, decoded from the wire format.
    pub async fn capture_raw(&mut self) -> Result<Vec<u8>> {
        use base64::Engine as _;
        let data = self.target.capture_raw().await?;
        Ok(base64::engine::general_purpose::STANDARD.decode(data.trim())?)
    }

    /// One raw capture decoded into a raster buffer, with per-target
    /// pre-processing (orientation correction) applied.
    pub async fn capture_processed(&mut self) -> Result<RasterBuffer> {
        let data = self.target.capture_raw().await?;
        let image = RasterBuffer::decode_base64_png(&data)?;
        Ok(self.preprocess(image))
    }

    fn preprocess(&self, image: RasterBuffer) -> RasterBuffer {
        if target::needs_rotation(self.target.info()) {
            image.rotate_ccw()
        } else {
            image
        }
    }

    /// Plans, captures, and composes, returning the composite plus the
    /// resolved block-outs. The caller applies block-outs after the revert,
    /// matching the remote-side ordering of the operation.
    #[allow(clippy::too_many_arguments)]
    async fn capture_composed(
        &mut self,
        kind: &CaptureKind,
        options: &CaptureOptions,
        init: &InitData,
        init_json: &serde_json::Value,
        max_pixels: f64,
        needs_stitching: bool,
        ratio: f64,
    ) -> Result<(RasterBuffer, Vec<BlockOutRect>)> {
        let padding = target::resolve_padding(self.target.info(), &options.padding);

        let mut area = kind.area(init);
        area.x += f64::from(padding.document.left);
        area.y += f64::from(padding.document.top);
        area.width -= f64::from(padding.document.left + padding.document.right);
        area.height -= f64::from(padding.document.top + padding.document.bottom);

        geometry::clamp_to_document(&mut area, init.document.width, init.document.height)?;

        let mut sections = plan::plan_sections(&area, &padding, init, max_pixels, needs_stitching)?;

        // Depends only on element queries, not on the view position, but the
        // target is held exclusively, so resolve before the tile loop starts
        // mutating scroll state.
        let default_color = options.block_out_color.unwrap_or(Color::BLACK);
        let block_outs =
            blockout::resolve(self.target, &area, &options.block_outs, default_color).await?;

        self.capture_tiles(&mut sections, options, init_json).await?;

        let image = if needs_stitching {
            stitch(&area, &mut sections, ratio)
        } else {
            let mut image = sections
                .first_mut()
                .and_then(|s| s.tiles.first_mut())
                .and_then(|t| t.image.take())
                .ok_or_else(|| Error::Protocol("no capture produced for the requested area".to_string()))?;
            image.crop(
                area.x.floor() as u32,
                area.y.floor() as u32,
                area.width.floor() as u32,
                area.height.floor() as u32,
            );
            image
        };

        Ok((image, block_outs))
    }

    /// Executes the plan: strictly in index order, reposition the view, wait
    /// for layout to settle, run the per-tile hook, capture.
    async fn capture_tiles(
        &mut self,
        sections: &mut [Section],
        options: &CaptureOptions,
        init_json: &serde_json::Value,
    ) -> Result<()> {
        for section in sections.iter_mut() {
            for tile in section.tiles.iter_mut() {
                let offset_x = section.x + tile.x;
                let offset_y = section.y + tile.y;
                let section_height = if section.shift {
                    json!(section.height)
                } else {
                    serde_json::Value::Null
                };

                self.target
                    .execute(
                        scripts::SCROLL,
                        vec![json!(offset_x), json!(offset_y), section_height, init_json.clone()],
                    )
                    .await?;

                // Some targets need time to repaint after repositioning
                if !options.wait.is_zero() {
                    tokio::time::sleep(options.wait).await;
                }

                if let Some(script) = &options.each_script {
                    self.target.execute(script, vec![json!(tile.index)]).await?;
                }

                let data = self.target.capture_raw().await?;
                let image = RasterBuffer::decode_base64_png(&data)?;
                tile.image = Some(self.preprocess(image));
            }
        }

        if let Some(script) = &options.complete_script {
            self.target.execute(script, Vec::new()).await?;
        }

        Ok(())
    }
}

/// Stitches captured tiles into one output buffer of size
/// `floor(area.width * ratio) x floor(area.height * ratio)`.
///
/// Each tile's image is taken out of the plan and dropped right after
/// blitting, bounding peak memory to one section's tile set.
fn stitch(area: &Rect, sections: &mut [Section], ratio: f64) -> RasterBuffer {
    let mut out = RasterBuffer::new(
        (area.width * ratio).floor() as u32,
        (area.height * ratio).floor() as u32,
    );

    for section in sections.iter_mut() {
        for tile in section.tiles.iter_mut() {
            let Some(image) = tile.image.take() else { continue };

            let width = ((tile.width * ratio).floor() as u32).min(image.width());
            let height = ((tile.height * ratio).floor() as u32).min(image.height());

            out.blit_from(
                &image,
                (tile.src_x * ratio).floor() as u32,
                (tile.src_y * ratio).floor() as u32,
                width,
                height,
                ((section.dst_x + tile.x) * ratio).floor() as u32,
                ((section.dst_y + tile.y) * ratio).floor() as u32,
            );
        }
    }

    out
}

/// Applies every resolved block-out as an opaque fill at scaled coordinates.
fn apply_block_outs(image: &mut RasterBuffer, block_outs: &[BlockOutRect], ratio: f64) {
    for block_out in block_outs {
        image.fill_rect(
            (block_out.x * ratio).floor() as u32,
            (block_out.y * ratio).floor() as u32,
            (block_out.width * ratio).floor() as u32,
            (block_out.height * ratio).floor() as u32,
            block_out.color,
        );
    }
}
