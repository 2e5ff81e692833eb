//! Tiling planner
//!
//! Partitions a validated capture area into resolution-bounded horizontal
//! *sections* and, when the target is viewport-limited, each section into
//! viewport-sized *tiles*. Tile indices are assigned strictly increasing in
//! section-major, then row-major, then column-major order; the orchestrator
//! and the compositor both rely on that ordering.

use crate::error::{Error, Result};
use crate::geometry::{Padding, Rect};
use crate::raster::RasterBuffer;
use crate::remote::InitData;

/// The smallest captured unit: one tile is one raw remote capture.
///
/// `src_x`/`src_y` locate the crop origin inside the raw capture (trimming
/// browser chrome); `x`/`y` position the tile within its parent section.
#[derive(Debug)]
pub struct Tile {
    pub src_x: f64,
    pub src_y: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Position in the global, strictly ordered capture sequence
    pub index: usize,
    pub image: Option<RasterBuffer>,
}

/// One resolution-bounded horizontal strip of the capture area.
#[derive(Debug)]
pub struct Section {
    pub x: f64,
    pub y: f64,
    /// Destination offset within the output image (logical pixels)
    pub dst_x: f64,
    pub dst_y: f64,
    pub width: f64,
    pub height: f64,
    /// True when more than one section exists: repositioning must account
    /// for a vertical offset beyond plain scrolling.
    pub shift: bool,
    pub tiles: Vec<Tile>,
}

/// Effective tile dimensions once the per-capture padding is trimmed away.
fn effective_viewport(padding: &Padding, init: &InitData) -> (f64, f64) {
    let width = init.viewport.width
        - f64::from(padding.viewport.left)
        - f64::from(padding.viewport.right)
        - f64::from(padding.screenshot.right);
    let height = init.viewport.height
        - f64::from(padding.viewport.top)
        - f64::from(padding.viewport.bottom)
        - f64::from(padding.screenshot.bottom);
    (width, height)
}

/// Partitions the capture area into an ordered section/tile plan.
///
/// `max_pixels` is the single-capture budget in *logical* pixels, i.e.
/// already divided by the device pixel ratio.
pub fn plan_sections(
    area: &Rect,
    padding: &Padding,
    init: &InitData,
    max_pixels: f64,
    needs_stitching: bool,
) -> Result<Vec<Section>> {
    // The document width bounds every capture, even on well-behaved targets
    // that return the whole document. If it alone blows the budget, no
    // section height can help.
    if init.document.width > max_pixels {
        return Err(Error::ResolutionBudget {
            budget: max_pixels as u64,
            document_width: init.document.width as u64,
        });
    }

    let (viewport_width, viewport_height) = effective_viewport(padding, init);
    let document_width = init.document.width - area.x;

    let mut section_height = (max_pixels / document_width).floor();

    if needs_stitching {
        if viewport_height <= 0.0 {
            return Err(Error::Config(format!(
                "padding leaves no usable viewport height (viewport {} minus padding)",
                init.viewport.height
            )));
        }
        // Align the section border on a whole number of tile rows; a partial
        // row would capture a full viewport only to discard most of it and
        // re-request the same pixels for the next section.
        section_height = (section_height / viewport_height).floor() * viewport_height;
        if section_height <= 0.0 {
            return Err(Error::Config(format!(
                "the effective viewport height ({}) exceeds the budget-derived section height; raise the capture budget",
                viewport_height
            )));
        }
    }

    let section_count = ((area.height / section_height).ceil() as usize).max(1);
    let mut sections = Vec::with_capacity(section_count);
    let mut index = 0;

    for i in 0..section_count {
        let y_offset = i as f64 * section_height;
        let mut section = Section {
            shift: section_count != 1,
            x: area.x,
            y: area.y + y_offset,
            dst_x: 0.0,
            dst_y: y_offset,
            width: area.width,
            height: section_height.min(area.height - y_offset),
            tiles: Vec::new(),
        };

        if needs_stitching {
            section.tiles = tile_section(&section, padding, viewport_width, viewport_height, index);
            index += section.tiles.len();
        } else {
            section.tiles.push(Tile {
                src_x: f64::from(padding.viewport.left + padding.screenshot.left),
                src_y: f64::from(padding.viewport.top + padding.screenshot.top),
                x: 0.0,
                y: 0.0,
                width: section.width,
                height: section.height,
                index,
                image: None,
            });
            index += 1;
        }

        sections.push(section);
    }

    log::debug!(
        "planned {} section(s), {} tile(s) for area {:?}",
        sections.len(),
        index,
        area
    );

    Ok(sections)
}

/// Tiles one section into a row/column grid of viewport-sized captures. The
/// final row/column is clamped to the remaining pixels.
fn tile_section(
    section: &Section,
    padding: &Padding,
    viewport_width: f64,
    viewport_height: f64,
    first_index: usize,
) -> Vec<Tile> {
    let columns = (section.width / viewport_width).ceil() as usize;
    let rows = (section.height / viewport_height).ceil() as usize;

    let mut tiles = Vec::with_capacity(columns * rows);
    let mut index = first_index;

    for row in 0..rows {
        for column in 0..columns {
            let offset_x = column as f64 * viewport_width;
            let offset_y = row as f64 * viewport_height;

            tiles.push(Tile {
                src_x: f64::from(padding.viewport.left + padding.screenshot.left),
                src_y: f64::from(padding.viewport.top + padding.screenshot.top),
                x: offset_x,
                y: offset_y,
                width: viewport_width.min(section.width - offset_x),
                height: viewport_height.min(section.height - offset_y),
                index,
                image: None,
            });

            index += 1;
        }
    }

    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init(doc_w: f64, doc_h: f64, vp_w: f64, vp_h: f64) -> InitData {
        InitData {
            document: crate::remote::DocumentSize { width: doc_w, height: doc_h },
            viewport: Rect::new(0.0, 0.0, vp_w, vp_h),
            device_pixel_ratio: 1.0,
        }
    }

    #[test]
    fn sections_round_down_to_viewport_multiples() {
        // 1000x3000 area, 1M pixel budget, 800px viewport:
        // raw section height 1000, rounded down to 800, four sections.
        let area = Rect::new(0.0, 0.0, 1000.0, 3000.0);
        let data = init(1000.0, 3000.0, 1000.0, 800.0);
        let sections =
            plan_sections(&area, &Padding::default(), &data, 1_000_000.0, true).unwrap();

        assert_eq!(sections.len(), 4);
        assert_eq!(sections[0].height, 800.0);
        assert_eq!(sections[1].height, 800.0);
        assert_eq!(sections[2].height, 800.0);
        assert_eq!(sections[3].height, 600.0);
        assert!(sections.iter().all(|s| s.shift));
    }

    #[test]
    fn sections_exactly_cover_the_area() {
        let area = Rect::new(0.0, 100.0, 1000.0, 3000.0);
        let data = init(1000.0, 4000.0, 1000.0, 800.0);
        let sections =
            plan_sections(&area, &Padding::default(), &data, 1_000_000.0, true).unwrap();

        let mut cursor = area.y;
        for section in &sections {
            assert_eq!(section.y, cursor, "no gap or overlap between sections");
            assert_eq!(section.x, area.x);
            assert_eq!(section.width, area.width);
            cursor += section.height;
        }
        assert_eq!(cursor, area.y + area.height);
    }

    #[test]
    fn tile_indices_are_contiguous_from_zero() {
        let area = Rect::new(0.0, 0.0, 500.0, 900.0);
        let data = init(500.0, 900.0, 200.0, 300.0);
        let sections =
            plan_sections(&area, &Padding::default(), &data, 300_000.0, true).unwrap();

        let indices: Vec<usize> = sections
            .iter()
            .flat_map(|s| s.tiles.iter().map(|t| t.index))
            .collect();
        let expected: Vec<usize> = (0..indices.len()).collect();
        assert_eq!(indices, expected);
    }

    #[test]
    fn tiles_exactly_cover_each_section() {
        let area = Rect::new(0.0, 0.0, 500.0, 700.0);
        let data = init(500.0, 700.0, 200.0, 300.0);
        let sections =
            plan_sections(&area, &Padding::default(), &data, 350_000.0, true).unwrap();

        for section in &sections {
            let tile_area: f64 = section.tiles.iter().map(|t| t.width * t.height).sum();
            assert_eq!(tile_area, section.width * section.height);

            for tile in &section.tiles {
                assert!(tile.x + tile.width <= section.width, "tile overshoots section");
                assert!(tile.y + tile.height <= section.height, "tile overshoots section");
            }
        }
    }

    #[test]
    fn last_grid_column_and_row_are_clamped() {
        let area = Rect::new(0.0, 0.0, 250.0, 250.0);
        let data = init(250.0, 250.0, 100.0, 100.0);
        let sections =
            plan_sections(&area, &Padding::default(), &data, 25_000.0, true).unwrap();

        // 100px budget-derived section height, 3 columns x 1 row each
        let last = sections[0].tiles.last().unwrap();
        assert_eq!(last.width, 50.0);

        let bottom = sections.last().unwrap();
        assert_eq!(bottom.tiles[0].height, 50.0);
    }

    #[test]
    fn single_section_single_tile_without_stitching() {
        let area = Rect::new(0.0, 0.0, 500.0, 500.0);
        let data = init(500.0, 500.0, 500.0, 500.0);
        let padding = Padding {
            viewport: crate::geometry::Edges { top: 10, bottom: 0, left: 5, right: 0 },
            screenshot: crate::geometry::Edges { top: 65, bottom: 0, left: 0, right: 0 },
            document: crate::geometry::Edges::ZERO,
        };
        let sections = plan_sections(&area, &padding, &data, 1_000_000.0, false).unwrap();

        assert_eq!(sections.len(), 1);
        assert!(!sections[0].shift);
        assert_eq!(sections[0].tiles.len(), 1);
        let tile = &sections[0].tiles[0];
        assert_eq!(tile.src_x, 5.0);
        assert_eq!(tile.src_y, 75.0);
        assert_eq!(tile.width, 500.0);
        assert_eq!(tile.height, 500.0);
    }

    #[test]
    fn document_wider_than_budget_is_fatal() {
        let area = Rect::new(0.0, 0.0, 2000.0, 100.0);
        let data = init(2000.0, 100.0, 1000.0, 800.0);
        let err = plan_sections(&area, &Padding::default(), &data, 1000.0, false).unwrap_err();
        assert!(matches!(err, Error::ResolutionBudget { budget: 1000, document_width: 2000 }));
    }

    #[test]
    fn viewport_taller_than_section_budget_is_a_config_error() {
        // Budget-derived section height is 100, viewport is 800: rounding
        // down would yield zero-height sections.
        let area = Rect::new(0.0, 0.0, 1000.0, 3000.0);
        let data = init(1000.0, 3000.0, 1000.0, 800.0);
        let err = plan_sections(&area, &Padding::default(), &data, 100_000.0, true).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
