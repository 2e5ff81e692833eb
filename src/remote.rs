//! The remote collaborator seam
//!
//! Everything the engine needs from the automation layer is expressed here as
//! the [`RemoteTarget`] trait: run a script against the rendering surface,
//! capture the current viewport as a base64 raster, and resolve selectors to
//! element frames. The navigation/element-query machinery behind those calls
//! is out of scope and stays on the implementor's side.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::Rect;
use crate::target::TargetInfo;

/// Opaque handle to a remote element, as issued by the automation layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub String);

/// Dimensions of the remote document in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocumentSize {
    pub width: f64,
    pub height: f64,
}

/// Remote state gathered once at the start of a capture operation.
///
/// Immutable for the duration of the operation; the layout mutation performed
/// while gathering it is reverted when the operation ends, on success and
/// failure alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitData {
    pub document: DocumentSize,
    pub viewport: Rect,
    pub device_pixel_ratio: f64,
}

/// Capabilities consumed from the remote automation layer.
///
/// Methods take `&mut self`: one capture operation holds exclusive access to
/// the remote view state for its whole duration, since every tile capture
/// depends on the scroll/layout mutation issued right before it.
#[allow(async_fn_in_trait)]
pub trait RemoteTarget {
    /// Identity of the remote target (browser, version, device, orientation).
    fn info(&self) -> &TargetInfo;

    /// Run a script against the remote rendering surface and return its
    /// JSON-serializable result.
    async fn execute(&mut self, script: &str, args: Vec<serde_json::Value>) -> Result<serde_json::Value>;

    /// Capture the currently visible viewport as-is, base64-encoded PNG.
    async fn capture_raw(&mut self) -> Result<String>;

    /// Resolve a selector to zero or more element handles.
    async fn resolve_selector(&mut self, selector: &str) -> Result<Vec<ElementHandle>>;

    /// Resolve an element handle to its on-screen frame in document
    /// coordinates.
    async fn element_frame(&mut self, element: &ElementHandle) -> Result<Rect>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_data_parses_remote_payload() {
        let payload = r#"{
            "document": {"width": 1200, "height": 4800},
            "viewport": {"x": 0, "y": 120, "width": 1200, "height": 800},
            "devicePixelRatio": 2
        }"#;
        let init: InitData = serde_json::from_str(payload).unwrap();
        assert_eq!(init.document.width, 1200.0);
        assert_eq!(init.viewport.y, 120.0);
        assert_eq!(init.device_pixel_ratio, 2.0);
    }

    #[test]
    fn init_data_ignores_extra_revert_state() {
        // The init script piggybacks style state for the revert call; the
        // typed view only needs the geometry.
        let payload = r#"{
            "document": {"width": 800, "height": 600},
            "viewport": {"x": 0, "y": 0, "width": 800, "height": 600},
            "devicePixelRatio": 1,
            "state": {"bodyOverflow": "", "scrollY": 0}
        }"#;
        let init: InitData = serde_json::from_str(payload).unwrap();
        assert_eq!(init.document.height, 600.0);
    }
}
