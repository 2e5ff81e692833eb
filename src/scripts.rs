//! Scripts executed on the remote rendering surface
//!
//! These are function bodies in the WebDriver `execute` convention: arguments
//! arrive in `arguments`, the return value must be JSON-serializable. Styles
//! mutated by `PROBE_INIT` and `INIT` are restored by the matching revert
//! script, which receives the init payload back as its first argument.

/// Shrinks the document to a single pixel row sized to the viewport width so
/// a raw capture exposes the physical-to-logical pixel ratio (capture width
/// divided by CSS width) and whether the target captures beyond the viewport
/// (capture height). `window.devicePixelRatio` alone cannot be trusted across
/// targets, so it is returned only as a fallback.
///
/// Arguments: `[horizontalPadding]`. Returns the probe state as a JSON string.
pub const PROBE_INIT: &str = r#"
var de = document.documentElement,
    body = document.body,
    horizontalPadding = arguments[0],
    el, state;

// Fixed-position probe div measures the viewport width across targets
el = document.createElement('div');
el.style.position = 'fixed';
el.style.top = 0;
el.style.left = 0;
el.style.bottom = 0;
el.style.right = 0;
de.insertBefore(el, de.firstChild);

state = {
    bodyOverflow: body.style.overflow,
    bodyWidth: body.style.width,
    bodyHeight: body.style.height,
    documentWidth: de.style.width,
    documentHeight: de.style.height,
    documentOverflow: de.style.overflow,
    devicePixelRatio: window.devicePixelRatio || 1,
    viewPortWidth: el.offsetWidth,
    horizontalPadding: horizontalPadding
};

de.removeChild(el);

// Remove scrollbars and collapse the page to one pixel of height
body.style.overflow = 'hidden';
body.style.width = (state.viewPortWidth - horizontalPadding) + 'px';
body.style.height = '1px';
body.style.minHeight = '0';
body.style.minWidth = '0';

de.style.width = (state.viewPortWidth - horizontalPadding) + 'px';
de.style.height = '1px';
de.style.minHeight = '0';
de.style.minWidth = '0';
de.style.overflow = 'hidden';

return JSON.stringify(state);
"#;

/// Restores the styles recorded by [`PROBE_INIT`]. Arguments: `[state]`.
pub const PROBE_REVERT: &str = r#"
var de = document.documentElement,
    body = document.body,
    state = arguments[0];

body.style.overflow = state.bodyOverflow;
body.style.width = state.bodyWidth;
body.style.height = state.bodyHeight;
body.style.minHeight = '';
body.style.minWidth = '';

de.style.width = state.documentWidth;
de.style.height = state.documentHeight;
de.style.minHeight = '';
de.style.minWidth = '';
de.style.overflow = state.documentOverflow;
"#;

/// Gathers the document/viewport geometry a capture operation plans against
/// and hides the scrollbars while tiles are captured.
///
/// Arguments: `[needsStitching]`. Returns [`crate::remote::InitData`] plus
/// revert state as a JSON string.
pub const INIT: &str = r#"
var de = document.documentElement,
    body = document.body,
    needsStitching = arguments[0],
    data;

data = {
    document: {
        width: Math.max(body.scrollWidth, body.offsetWidth, de.clientWidth, de.scrollWidth, de.offsetWidth),
        height: Math.max(body.scrollHeight, body.offsetHeight, de.clientHeight, de.scrollHeight, de.offsetHeight)
    },
    viewport: {
        x: window.pageXOffset || de.scrollLeft || 0,
        y: window.pageYOffset || de.scrollTop || 0,
        width: de.clientWidth,
        height: de.clientHeight
    },
    devicePixelRatio: window.devicePixelRatio || 1,
    state: {
        bodyOverflow: body.style.overflow,
        bodyTransform: body.style.transform,
        scrollX: window.pageXOffset || de.scrollLeft || 0,
        scrollY: window.pageYOffset || de.scrollTop || 0
    }
};

if (needsStitching) {
    // Scrollbars would bleed into every tile capture
    body.style.overflow = 'hidden';
}

return JSON.stringify(data);
"#;

/// Repositions the rendering surface so the given document offset sits at the
/// viewport origin.
///
/// Arguments: `[offsetX, offsetY, sectionHeight, initData]`. `sectionHeight`
/// is `null` for single-section plans; when set, offsets beyond the scrollable
/// range are realized by translating the document instead of scrolling, since
/// the page cannot scroll past its own height.
pub const SCROLL: &str = r#"
var body = document.body,
    offsetX = arguments[0],
    offsetY = arguments[1],
    sectionHeight = arguments[2],
    init = arguments[3],
    maxScrollY = init.document.height - init.viewport.height,
    translateY = 0;

if (sectionHeight !== null && offsetY > maxScrollY) {
    translateY = offsetY - maxScrollY;
    offsetY = maxScrollY;
}

body.style.transform = translateY ? ('translateY(' + (-translateY) + 'px)') : '';
window.scrollTo(offsetX, offsetY);
"#;

/// Undoes every layout mutation performed during a capture operation.
/// Arguments: `[initData]` as returned by [`INIT`].
pub const REVERT: &str = r#"
var body = document.body,
    init = arguments[0];

body.style.overflow = init.state.bodyOverflow;
body.style.transform = init.state.bodyTransform;
window.scrollTo(init.state.scrollX, init.state.scrollY);
"#;
