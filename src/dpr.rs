//! Device pixel ratio resolution
//!
//! Client-reported `window.devicePixelRatio` cannot be trusted across
//! targets, so the ratio is measured: the probe script collapses the document
//! to a known CSS width, one raw capture is taken, and the ratio is the
//! capture's physical width divided by that CSS width. The reported value is
//! kept only as a fallback.

use serde::Deserialize;
use serde_json::json;

use crate::error::{Error, Result};
use crate::raster::RasterBuffer;
use crate::remote::RemoteTarget;
use crate::scripts;

/// Probe payload returned by [`scripts::PROBE_INIT`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProbeState {
    pub view_port_width: f64,
    pub device_pixel_ratio: f64,
    pub horizontal_padding: f64,
}

/// Runs the probe script, captures the collapsed document once, and reverts
/// the style mutation. The revert runs even when the capture fails.
pub(crate) async fn probe<T: RemoteTarget>(
    target: &mut T,
    horizontal_padding: u32,
) -> Result<(ProbeState, RasterBuffer)> {
    let raw = target
        .execute(scripts::PROBE_INIT, vec![json!(horizontal_padding)])
        .await?;
    let payload = raw
        .as_str()
        .ok_or_else(|| Error::Protocol(format!("probe init returned a non-string payload: {}", raw)))?;
    let state_value: serde_json::Value = serde_json::from_str(payload)?;

    let captured = target.capture_raw().await;
    if let Err(err) = target.execute(scripts::PROBE_REVERT, vec![state_value.clone()]).await {
        match captured {
            Ok(_) => return Err(err),
            // The capture error is the interesting one; the revert failure
            // must not mask it.
            Err(_) => log::warn!("probe revert failed after an earlier capture error: {}", err),
        }
    }

    let buffer = RasterBuffer::decode_base64_png(&captured?)?;
    let state: ProbeState = serde_json::from_value(state_value)?;
    Ok((state, buffer))
}

/// Ratio implied by one probe round: the capture's physical width over the
/// measured CSS width. The client-reported value is used only when the probe
/// measured no usable width, and `1.0` when even that is unusable.
pub(crate) fn measured_ratio(state: &ProbeState, capture: &RasterBuffer) -> f64 {
    let css_width = state.view_port_width - state.horizontal_padding;
    if css_width <= 0.0 {
        log::debug!(
            "probe measured no usable width ({}); falling back to the reported ratio {}",
            css_width,
            state.device_pixel_ratio
        );
        return if state.device_pixel_ratio > 0.0 { state.device_pixel_ratio } else { 1.0 };
    }

    capture.width() as f64 / css_width
}

/// Resolves the physical-to-logical pixel ratio for the current target.
pub async fn resolve<T: RemoteTarget>(target: &mut T, horizontal_padding: u32) -> Result<f64> {
    let (state, capture) = probe(target, horizontal_padding).await?;
    Ok(measured_ratio(&state, &capture))
}
