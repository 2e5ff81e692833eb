//! Capture comparison against persisted baselines
//!
//! The first capture under a title becomes the baseline; later captures with
//! the same title are compared pixel-for-pixel against it. `None` means
//! there was nothing to compare to yet.

use std::fs;
use std::path::PathBuf;

use crate::error::Result;
use crate::raster::RasterBuffer;

/// Options for one comparison.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Additional discriminator so several comparisons can share a title
    pub id: u32,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self { id: 1 }
    }
}

/// Filesystem-backed baseline store.
#[derive(Debug, Clone)]
pub struct ComparisonStore {
    dir: PathBuf,
}

impl ComparisonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn baseline_path(&self, title: &str, id: u32) -> PathBuf {
        let safe: String = title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.dir.join(format!("{}_{}.png", safe, id))
    }

    /// Compares `buffer` against the persisted baseline for `title`.
    ///
    /// Returns `Ok(None)` when no baseline exists yet (the buffer is stored
    /// as the new baseline), otherwise `Ok(Some(matched))`.
    pub fn compare(&self, title: &str, buffer: &[u8], options: &CompareOptions) -> Result<Option<bool>> {
        let path = self.baseline_path(title, options.id);

        if !path.exists() {
            fs::create_dir_all(&self.dir)?;
            fs::write(&path, buffer)?;
            return Ok(None);
        }

        let baseline = RasterBuffer::decode_png(&fs::read(&path)?)?;
        let current = RasterBuffer::decode_png(buffer)?;

        let matched = baseline.width() == current.width()
            && baseline.height() == current.height()
            && baseline.pixels() == current.pixels();

        Ok(Some(matched))
    }
}
