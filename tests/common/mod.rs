//! Scripted in-process stand-in for the remote automation layer
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

use base64::Engine as _;
use pagestitch::{
    scripts, Color, ElementHandle, Error, RasterBuffer, Rect, RemoteTarget, Result, TargetInfo,
};
use serde_json::json;

/// Base64-encodes a composed buffer the way a remote target would hand it over.
pub fn encode_capture(buf: &RasterBuffer) -> String {
    let png = buf.encode_png().expect("encode test capture");
    base64::engine::general_purpose::STANDARD.encode(png)
}

/// Encodes a solid-color PNG capture.
pub fn solid_capture(width: u32, height: u32, color: Color) -> String {
    let mut buf = RasterBuffer::new(width, height);
    buf.fill_rect(0, 0, width, height, color);
    encode_capture(&buf)
}

/// Init payload in the shape the init script returns.
pub fn init_payload(doc_w: f64, doc_h: f64, viewport: Rect, dpr: f64) -> String {
    json!({
        "document": {"width": doc_w, "height": doc_h},
        "viewport": {"x": viewport.x, "y": viewport.y, "width": viewport.width, "height": viewport.height},
        "devicePixelRatio": dpr,
        "state": {"bodyOverflow": "", "bodyTransform": "", "scrollX": 0, "scrollY": 0}
    })
    .to_string()
}

/// A mock remote target that serves queued captures and records every call.
pub struct MockTarget {
    pub info: TargetInfo,
    /// Logical viewport width reported by the probe script
    pub probe_viewport_width: f64,
    /// Ratio the probe script would *report* (the measured one wins)
    pub reported_ratio: f64,
    /// Capture served while a probe has the document collapsed
    pub probe_capture: String,
    /// Captures served for tiles, in order
    pub tile_captures: VecDeque<String>,
    /// Payload served for the init script
    pub init_payload: String,
    pub selectors: HashMap<String, Vec<String>>,
    pub frames: HashMap<String, Rect>,
    /// Every executed script as (name, args)
    pub executed: Vec<(String, Vec<serde_json::Value>)>,
    in_probe: bool,
}

impl MockTarget {
    pub fn new(init_payload: String, probe_viewport_width: f64, probe_capture: String) -> Self {
        Self {
            info: TargetInfo::new("firefox", 115),
            probe_viewport_width,
            reported_ratio: 1.0,
            probe_capture,
            tile_captures: VecDeque::new(),
            init_payload,
            selectors: HashMap::new(),
            frames: HashMap::new(),
            executed: Vec::new(),
            in_probe: false,
        }
    }

    pub fn queue_tile(&mut self, capture: String) {
        self.tile_captures.push_back(capture);
    }

    fn script_name(script: &str) -> &'static str {
        if script == scripts::PROBE_INIT {
            "probe_init"
        } else if script == scripts::PROBE_REVERT {
            "probe_revert"
        } else if script == scripts::INIT {
            "init"
        } else if script == scripts::SCROLL {
            "scroll"
        } else if script == scripts::REVERT {
            "revert"
        } else {
            "custom"
        }
    }

    pub fn executed_names(&self) -> Vec<&str> {
        self.executed.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Recorded scroll offsets as (x, y, section_height).
    pub fn scroll_calls(&self) -> Vec<(f64, f64, Option<f64>)> {
        self.executed
            .iter()
            .filter(|(name, _)| name == "scroll")
            .map(|(_, args)| {
                (
                    args[0].as_f64().unwrap(),
                    args[1].as_f64().unwrap(),
                    args[2].as_f64(),
                )
            })
            .collect()
    }

    /// Tile indices passed to the per-tile hook script (the complete hook is
    /// the `custom` execution without arguments).
    pub fn each_hook_indices(&self) -> Vec<u64> {
        self.executed
            .iter()
            .filter(|(name, args)| name == "custom" && args.len() == 1)
            .map(|(_, args)| args[0].as_u64().unwrap())
            .collect()
    }
}

impl RemoteTarget for MockTarget {
    fn info(&self) -> &TargetInfo {
        &self.info
    }

    async fn execute(&mut self, script: &str, args: Vec<serde_json::Value>) -> Result<serde_json::Value> {
        let name = Self::script_name(script);
        self.executed.push((name.to_string(), args.clone()));

        match name {
            "probe_init" => {
                self.in_probe = true;
                let state = json!({
                    "bodyOverflow": "",
                    "bodyWidth": "",
                    "bodyHeight": "",
                    "documentWidth": "",
                    "documentHeight": "",
                    "documentOverflow": "",
                    "devicePixelRatio": self.reported_ratio,
                    "viewPortWidth": self.probe_viewport_width,
                    "horizontalPadding": args[0].as_f64().unwrap_or(0.0)
                });
                Ok(json!(state.to_string()))
            }
            "probe_revert" => {
                self.in_probe = false;
                Ok(serde_json::Value::Null)
            }
            "init" => Ok(json!(self.init_payload.clone())),
            _ => Ok(serde_json::Value::Null),
        }
    }

    async fn capture_raw(&mut self) -> Result<String> {
        if self.in_probe {
            return Ok(self.probe_capture.clone());
        }
        self.tile_captures
            .pop_front()
            .ok_or_else(|| Error::Remote("no capture queued".to_string()))
    }

    async fn resolve_selector(&mut self, selector: &str) -> Result<Vec<ElementHandle>> {
        Ok(self
            .selectors
            .get(selector)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(ElementHandle)
            .collect())
    }

    async fn element_frame(&mut self, element: &ElementHandle) -> Result<Rect> {
        self.frames
            .get(&element.0)
            .copied()
            .ok_or_else(|| Error::Remote(format!("stale element handle: {}", element.0)))
    }
}
