//! Per-target quirks: padding defaults and capture pre-processing
//!
//! Targets differ in what a raw capture contains (persistent browser chrome,
//! border artifacts) and how it is oriented. Both are open-ended lookup
//! tables keyed on target identity, so supporting a new target is a rule
//! addition, not new branching logic.

use crate::geometry::{Edges, Padding, PaddingOverrides};

/// Device orientation as reported by the automation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Identity of the remote target, used to look up padding and
/// pre-processing rules.
#[derive(Debug, Clone)]
pub struct TargetInfo {
    /// Browser name, e.g. "firefox", "iphone", "internet explorer"
    pub browser_name: String,
    /// Major browser version
    pub browser_version: u32,
    /// Device name, empty for desktop targets
    pub device_name: String,
    pub orientation: Orientation,
}

impl TargetInfo {
    pub fn new(browser_name: impl Into<String>, browser_version: u32) -> Self {
        Self {
            browser_name: browser_name.into(),
            browser_version,
            device_name: String::new(),
            orientation: Orientation::Portrait,
        }
    }

    pub fn with_device(mut self, device_name: impl Into<String>, orientation: Orientation) -> Self {
        self.device_name = device_name.into();
        self.orientation = orientation;
        self
    }
}

struct PaddingRule {
    browser: &'static str,
    min_version: u32,
    viewport: Edges,
    screenshot: Edges,
    document: Edges,
}

/// Known capture artifacts per target. All entries on a matching rule apply.
const PADDING_RULES: &[PaddingRule] = &[
    // The address bar is part of the raw capture and needs to be trimmed;
    // the reported viewport is also one pixel taller than what is returned.
    PaddingRule {
        browser: "iphone",
        min_version: 0,
        viewport: Edges::ZERO,
        screenshot: Edges { top: 65, bottom: 2, left: 0, right: 0 },
        document: Edges::ZERO,
    },
    // IE 10+ renders a black border on the right edge of document captures.
    PaddingRule {
        browser: "internet explorer",
        min_version: 10,
        viewport: Edges::ZERO,
        screenshot: Edges::ZERO,
        document: Edges { top: 0, bottom: 0, left: 0, right: 4 },
    },
];

struct RotationRule {
    browser: &'static str,
    orientation: Orientation,
}

/// Targets that report capture orientation incorrectly; their raw captures
/// need a 90° counter-clockwise correction.
const ROTATION_RULES: &[RotationRule] = &[RotationRule {
    browser: "iphone",
    orientation: Orientation::Landscape,
}];

/// Target-specific default padding, before caller overrides.
pub fn default_padding(info: &TargetInfo) -> Padding {
    let browser = info.browser_name.to_lowercase();

    for rule in PADDING_RULES {
        if rule.browser == browser && info.browser_version >= rule.min_version {
            return Padding {
                viewport: rule.viewport,
                screenshot: rule.screenshot,
                document: rule.document,
            };
        }
    }

    Padding::default()
}

/// Produces the fully populated padding for one capture request:
/// caller-supplied fields win, unset fields fall back to the target defaults.
pub fn resolve_padding(info: &TargetInfo, overrides: &PaddingOverrides) -> Padding {
    let defaults = default_padding(info);
    Padding {
        viewport: overrides.viewport.merge(defaults.viewport),
        screenshot: overrides.screenshot.merge(defaults.screenshot),
        document: overrides.document.merge(defaults.document),
    }
}

/// Whether raw captures from this target need the 90° CCW correction.
pub fn needs_rotation(info: &TargetInfo) -> bool {
    let browser = info.browser_name.to_lowercase();
    ROTATION_RULES
        .iter()
        .any(|rule| rule.browser == browser && rule.orientation == info.orientation)
}
