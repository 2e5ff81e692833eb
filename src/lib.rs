//! pagestitch
//!
//! Full-page screenshot capture and stitching for remote browser automation
//! targets. A remote target limits every single capture to a maximum pixel
//! resolution and, on some browsers, to the currently visible viewport; this
//! crate turns a logically unbounded rectangular region of the remotely
//! rendered document into one raster image anyway.
//!
//! # How it works
//!
//! - The requested region is partitioned into resolution-bounded *sections*
//!   and, when the target can only capture its viewport, into viewport-sized
//!   *tiles*.
//! - Tiles are captured strictly in order: each capture depends on a scroll/
//!   layout mutation of shared remote state, so concurrency is disallowed by
//!   construction.
//! - The device pixel ratio is measured via a probe capture rather than
//!   trusted from client metadata, and every physical-pixel operation scales
//!   by it consistently.
//! - Captured tiles are stitched into one output buffer, redaction
//!   "block-outs" are filled in, and the result is returned as PNG.
//!
//! The automation layer itself (session handling, navigation, element
//! queries) stays on the caller's side behind the [`RemoteTarget`] trait.
//!
//! # Example
//!
//! ```
//! use pagestitch::{BlockOut, CaptureOptions, Rect};
//!
//! let options = CaptureOptions {
//!     block_outs: vec![
//!         BlockOut::selector(".ad-banner"),
//!         BlockOut::area(Rect::new(10.0, 10.0, 50.0, 50.0)),
//!     ],
//!     wait: std::time::Duration::from_millis(250),
//!     ..Default::default()
//! };
//! assert_eq!(options.block_outs.len(), 2);
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod geometry;
pub use geometry::{EdgeOverrides, Edges, Padding, PaddingOverrides, Rect};

pub mod raster;
pub use raster::{Color, RasterBuffer};

pub mod remote;
pub use remote::{ElementHandle, InitData, RemoteTarget};

pub mod target;
pub use target::{Orientation, TargetInfo};

// Remote scripts (probe/init/revert/scroll), exported so target
// implementations can special-case them in tests and shims.
pub mod scripts;

pub mod dpr;
pub mod stitching;

pub mod plan;
pub use plan::{Section, Tile};

pub mod blockout;
pub use blockout::{BlockOut, BlockOutRect};

pub mod capture;
pub use capture::{AreaSpec, CaptureKind, CaptureOptions, Screenshot};

pub mod compare;
pub use compare::{CompareOptions, ComparisonStore};
