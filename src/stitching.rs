//! Stitching-need detection
//!
//! Some targets (Firefox, notably) return the whole document from a raw
//! capture; viewport-limited targets return only what is visible. The same
//! probe used for the pixel ratio answers this: with the document collapsed
//! to one pixel of height, a well-behaved target returns a sliver while a
//! viewport-limited one still returns a full viewport.

use crate::dpr;
use crate::error::Result;
use crate::remote::RemoteTarget;

/// Logical-pixel slack above the collapsed document height. The physical
/// threshold scales with the probe-measured pixel ratio: on a high-density
/// target the one-logical-pixel sliver spans several physical rows, which
/// must not read as a viewport-sized capture.
const PROBE_HEIGHT_SLACK: f64 = 4.0;

/// Whether the target can only capture the visible viewport, so the capture
/// area must be tiled and the tiles stitched.
pub async fn needs_stitching<T: RemoteTarget>(target: &mut T, horizontal_padding: u32) -> Result<bool> {
    let (state, capture) = dpr::probe(target, horizontal_padding).await?;
    let ratio = dpr::measured_ratio(&state, &capture);
    Ok(f64::from(capture.height()) > PROBE_HEIGHT_SLACK * ratio)
}
