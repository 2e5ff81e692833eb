//! Rectangle and padding primitives shared by all planning steps
//!
//! Coordinates are logical (CSS-like) pixels throughout. Conversion to
//! physical pixels happens only at the composition boundary, scaled by the
//! device pixel ratio.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An axis-aligned rectangle in logical pixels.
///
/// Width and height may be negative in caller input; `clamp_to_document`
/// rejects that before any planning happens. After validation both are
/// guaranteed non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Parse a rectangle out of a JSON object, requiring all four fields to
    /// be present and numeric.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let mut fields = [0.0f64; 4];
        for (slot, name) in fields.iter_mut().zip(["x", "y", "width", "height"]) {
            let field = value.get(name).ok_or_else(|| {
                Error::MalformedRect(format!("the \"{}\" property needs to be defined for item: {}", name, value))
            })?;
            *slot = field.as_f64().ok_or_else(|| {
                Error::MalformedRect(format!("the \"{}\" property needs to be numeric: {}", name, value))
            })?;
        }
        Ok(Rect::new(fields[0], fields[1], fields[2], fields[3]))
    }
}

/// Validates an area against the document bounds and clamps it inside them.
///
/// Negative dimensions are an error; everything else is corrected in place:
/// the origin is pulled into `[0, doc - 1]` and the size shrunk so the rect
/// never reaches past the document edge.
pub fn clamp_to_document(area: &mut Rect, doc_width: f64, doc_height: f64) -> Result<()> {
    if area.width < 0.0 {
        return Err(Error::InvalidArea(
            "width of area to capture cannot be negative".to_string(),
        ));
    }
    if area.height < 0.0 {
        return Err(Error::InvalidArea(
            "height of area to capture cannot be negative".to_string(),
        ));
    }

    if area.x < 0.0 {
        area.x = 0.0;
    }
    if area.x >= doc_width {
        area.x = doc_width - 1.0;
    }
    if area.y < 0.0 {
        area.y = 0.0;
    }
    if area.y >= doc_height {
        area.y = doc_height - 1.0;
    }

    if area.x + area.width > doc_width {
        area.width = doc_width - area.x;
    }
    if area.y + area.height > doc_height {
        area.height = doc_height - area.y;
    }

    Ok(())
}

/// Shrinks `item` so it lies fully inside `area`.
///
/// An item starting left/above the area keeps its far edge (the leading edge
/// is pulled in, the size reduced by the overhang); an item starting past the
/// far edge collapses to zero size.
pub fn reduce_rect_to_area(item: &mut Rect, area: &Rect) {
    if item.x < area.x {
        item.width -= (item.x - area.x).abs();
        item.x = area.x;
    }
    if item.x > area.x + area.width {
        item.x = area.x + area.width;
        item.width = 0.0;
    }

    if item.y < area.y {
        item.height -= (item.y - area.y).abs();
        item.y = area.y;
    }
    if item.y > area.y + area.height {
        item.y = area.y + area.height;
        item.height = 0.0;
    }

    if item.width < 0.0 {
        item.width = 0.0;
    }
    if item.width > area.width {
        item.width = area.width;
    }

    if item.height < 0.0 {
        item.height = 0.0;
    }
    if item.height > area.height {
        item.height = area.height;
    }
}

/// Per-edge offsets in logical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edges {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Edges {
    pub const ZERO: Edges = Edges { top: 0, bottom: 0, left: 0, right: 0 };
}

/// Fully resolved padding for one capture operation.
///
/// Built once per request from target defaults merged with caller overrides;
/// immutable afterward.
///
/// - `viewport`: regions of every viewport capture to ignore
/// - `screenshot`: regions of every raw screenshot to trim (browser chrome,
///   border artifacts)
/// - `document`: trim applied to the requested area itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Padding {
    pub viewport: Edges,
    pub screenshot: Edges,
    pub document: Edges,
}

/// Optional per-edge overrides supplied by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeOverrides {
    pub top: Option<u32>,
    pub bottom: Option<u32>,
    pub left: Option<u32>,
    pub right: Option<u32>,
}

impl EdgeOverrides {
    pub(crate) fn merge(&self, defaults: Edges) -> Edges {
        Edges {
            top: self.top.unwrap_or(defaults.top),
            bottom: self.bottom.unwrap_or(defaults.bottom),
            left: self.left.unwrap_or(defaults.left),
            right: self.right.unwrap_or(defaults.right),
        }
    }
}

/// Caller-supplied padding overrides; unset fields fall back to the
/// target-specific defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaddingOverrides {
    pub viewport: EdgeOverrides,
    pub screenshot: EdgeOverrides,
    pub document: EdgeOverrides,
}
