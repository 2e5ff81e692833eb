//! Block-out resolution
//!
//! A block-out is an opaque rectangle overlaid on the final image to redact
//! sensitive or noisy regions. Callers may specify them as literal
//! rectangles, selector strings, or element handles; resolution flattens all
//! three into clipped rectangles in output-image coordinates.

use crate::error::{Error, Result};
use crate::geometry::{self, Rect};
use crate::raster::Color;
use crate::remote::{ElementHandle, RemoteTarget};

/// One block-out spec. Selector strings may resolve to any number of
/// elements; literal rectangles may carry their own color.
#[derive(Debug, Clone)]
pub enum BlockOut {
    Area { rect: Rect, color: Option<Color> },
    Selector(String),
    Element(ElementHandle),
}

impl BlockOut {
    pub fn area(rect: Rect) -> Self {
        BlockOut::Area { rect, color: None }
    }

    pub fn selector(selector: impl Into<String>) -> Self {
        BlockOut::Selector(selector.into())
    }

    /// Parses an untyped spec the way config-driven callers hand them over:
    /// a string is a selector, an object is a literal rectangle (with an
    /// optional `color`), anything else is rejected.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(selector) => Ok(BlockOut::Selector(selector.clone())),
            serde_json::Value::Object(map) => {
                let rect = Rect::from_json(value)?;
                let color = match map.get("color") {
                    Some(c) => Some(serde_json::from_value(c.clone())?),
                    None => None,
                };
                Ok(BlockOut::Area { rect, color })
            }
            other => Err(Error::UnknownBlockOut(format!("{}", other))),
        }
    }
}

/// A resolved redaction rectangle, clipped to the capture area and expressed
/// relative to its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockOutRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Color,
}

/// Resolves every spec into output-image-relative rectangles.
///
/// Selector and element specs are resolved through the target's element
/// query capability; the result is clipped against `area`, translated so the
/// area origin becomes (0, 0), and rectangles that clip down to nothing are
/// dropped.
pub async fn resolve<T: RemoteTarget>(
    target: &mut T,
    area: &Rect,
    block_outs: &[BlockOut],
    default_color: Color,
) -> Result<Vec<BlockOutRect>> {
    let mut flat: Vec<(Rect, Option<Color>)> = Vec::new();

    for spec in block_outs {
        match spec {
            BlockOut::Area { rect, color } => flat.push((*rect, *color)),
            BlockOut::Selector(selector) => {
                for element in target.resolve_selector(selector).await? {
                    flat.push((target.element_frame(&element).await?, None));
                }
            }
            BlockOut::Element(element) => {
                flat.push((target.element_frame(element).await?, None));
            }
        }
    }

    let mut resolved = Vec::with_capacity(flat.len());
    for (mut rect, color) in flat {
        geometry::reduce_rect_to_area(&mut rect, area);
        if rect.width == 0.0 || rect.height == 0.0 {
            continue;
        }
        resolved.push(BlockOutRect {
            x: rect.x - area.x,
            y: rect.y - area.y,
            width: rect.width,
            height: rect.height,
            color: color.unwrap_or(default_color),
        });
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_string_is_a_selector() {
        let spec = BlockOut::from_json(&serde_json::json!(".banner")).unwrap();
        assert!(matches!(spec, BlockOut::Selector(s) if s == ".banner"));
    }

    #[test]
    fn json_object_is_a_literal_rect() {
        let spec = BlockOut::from_json(&serde_json::json!({
            "x": 1, "y": 2, "width": 3, "height": 4,
            "color": {"red": 255, "green": 0, "blue": 0}
        }))
        .unwrap();
        match spec {
            BlockOut::Area { rect, color } => {
                assert_eq!(rect, Rect::new(1.0, 2.0, 3.0, 4.0));
                assert_eq!(color, Some(Color::new(255, 0, 0)));
            }
            other => panic!("expected an area spec, got {:?}", other),
        }
    }

    #[test]
    fn json_rect_without_fields_is_malformed() {
        let err = BlockOut::from_json(&serde_json::json!({"x": 1})).unwrap_err();
        assert!(matches!(err, Error::MalformedRect(_)));
    }

    #[test]
    fn other_json_types_are_unknown_specs() {
        let err = BlockOut::from_json(&serde_json::json!(42)).unwrap_err();
        assert!(matches!(err, Error::UnknownBlockOut(_)));

        let err = BlockOut::from_json(&serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::UnknownBlockOut(_)));
    }
}
