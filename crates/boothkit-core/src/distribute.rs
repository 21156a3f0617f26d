//! Even distribution of shapes into a grid of cells covering the paper.

use crate::geometry::BoundingBox;
use crate::paper::Paper;
use crate::shapes::{MIN_SHAPE_SIZE, Shape};
use serde::{Deserialize, Serialize};

/// Gap between cells and around the outer edge of the grid.
pub const GRID_MARGIN: f64 = 20.0;

/// Options for [`distribute`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributeOptions {
    /// Fixed column count; `None` (or zero) picks `ceil(sqrt(n))`.
    pub columns: Option<usize>,
    pub margin: f64,
    /// Lower bound on the size limit a cell imposes.
    pub min_shape_size: f64,
}

impl Default for DistributeOptions {
    fn default() -> Self {
        Self {
            columns: None,
            margin: GRID_MARGIN,
            min_shape_size: MIN_SHAPE_SIZE,
        }
    }
}

impl DistributeOptions {
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = Some(columns);
        self
    }
}

/// A `columns` x `rows` partition of the paper, row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub rows: usize,
    pub cell_width: f64,
    pub cell_height: f64,
    pub margin: f64,
}

impl GridLayout {
    /// Lay out a grid for `count` items, or `None` when there is nothing to place.
    pub fn new(count: usize, paper: Paper, columns: Option<usize>, margin: f64) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let columns = columns
            .filter(|&c| c > 0)
            .unwrap_or_else(|| (count as f64).sqrt().ceil() as usize);
        let rows = count.div_ceil(columns);
        let cell_width = (paper.width - margin * (columns as f64 + 1.0)) / columns as f64;
        let cell_height = (paper.height - margin * (rows as f64 + 1.0)) / rows as f64;
        Some(Self {
            columns,
            rows,
            cell_width,
            cell_height,
            margin,
        })
    }

    /// The cell holding item `index` (row-major).
    pub fn cell(&self, index: usize) -> BoundingBox {
        let col = (index % self.columns) as f64;
        let row = (index / self.columns) as f64;
        BoundingBox::new(
            self.margin + col * (self.cell_width + self.margin),
            self.margin + row * (self.cell_height + self.margin),
            self.cell_width,
            self.cell_height,
        )
    }

    /// Shrink `size` to fit the cell (never grows it) and center it there.
    ///
    /// Width and height are limited independently, so an oversized shape can
    /// lose its aspect ratio.
    pub fn place(&self, index: usize, width: f64, height: f64, min_shape_size: f64) -> BoundingBox {
        let cell = self.cell(index);
        let max_width = min_shape_size.max(cell.width);
        let max_height = min_shape_size.max(cell.height);
        let width = width.min(max_width);
        let height = height.min(max_height);
        BoundingBox::new(
            cell.x + (cell.width - width) / 2.0,
            cell.y + (cell.height - height) / 2.0,
            width,
            height,
        )
    }
}

/// Re-tile `shapes` into an even grid over the paper.
///
/// The background shape must not be part of `shapes`. Ids and order are kept;
/// every box is rounded to whole pixels and kept on the paper. Shrinking is
/// lossy, so a second pass only reproduces the first when nothing had to be
/// shrunk.
pub fn distribute(shapes: &[Shape], paper: Paper, options: &DistributeOptions) -> Vec<Shape> {
    let Some(layout) = GridLayout::new(shapes.len(), paper, options.columns, options.margin) else {
        return Vec::new();
    };

    log::debug!(
        "distributing {} shapes into {}x{} cells of {:.1}x{:.1}",
        shapes.len(),
        layout.columns,
        layout.rows,
        layout.cell_width,
        layout.cell_height
    );

    let paper_bounds = paper.bounds();
    shapes
        .iter()
        .enumerate()
        .map(|(index, shape)| {
            let placed = layout
                .place(index, shape.bounds.width, shape.bounds.height, options.min_shape_size)
                .round()
                .clamp_to(&paper_bounds);
            Shape {
                bounds: placed,
                ..shape.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::DEFAULT_PLACEHOLDER_COLOR;

    fn landscape() -> Paper {
        Paper::new(900.0, 600.0)
    }

    fn squares(n: usize, size: f64) -> Vec<Shape> {
        (0..n)
            .map(|i| {
                Shape::placeholder(
                    format!("pic-{i}"),
                    BoundingBox::new(i as f64 * 7.0, i as f64 * 3.0, size, size),
                    DEFAULT_PLACEHOLDER_COLOR,
                )
            })
            .collect()
    }

    #[test]
    fn test_layout_auto_columns() {
        let layout = GridLayout::new(5, landscape(), None, 20.0).unwrap();
        assert_eq!((layout.columns, layout.rows), (3, 2));
        assert!(GridLayout::new(0, landscape(), None, 20.0).is_none());
        let zero_cols = GridLayout::new(4, landscape(), Some(0), 20.0).unwrap();
        assert_eq!(zero_cols.columns, 2);
    }

    #[test]
    fn test_four_squares_centered() {
        let out = distribute(&squares(4, 100.0), landscape(), &DistributeOptions::default());
        // cells are 420x270
        assert_eq!(out[0].bounds, BoundingBox::new(180.0, 105.0, 100.0, 100.0));
        assert_eq!(out[1].bounds, BoundingBox::new(620.0, 105.0, 100.0, 100.0));
        assert_eq!(out[2].bounds, BoundingBox::new(180.0, 395.0, 100.0, 100.0));
        assert_eq!(out[3].bounds, BoundingBox::new(620.0, 395.0, 100.0, 100.0));
    }

    #[test]
    fn test_preserves_ids_and_order() {
        let input = squares(3, 50.0);
        let out = distribute(&input, landscape(), &DistributeOptions::default());
        let ids: Vec<_> = out.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["pic-0", "pic-1", "pic-2"]);
        assert_eq!(out[1].content, input[1].content);
    }

    #[test]
    fn test_oversized_shape_shrinks_per_axis() {
        let wide = Shape::placeholder(
            "wide",
            BoundingBox::new(0.0, 0.0, 500.0, 100.0),
            DEFAULT_PLACEHOLDER_COLOR,
        );
        let out = distribute(
            &[wide.clone(), wide.clone(), wide.clone(), wide],
            landscape(),
            &DistributeOptions::default(),
        );
        assert_eq!(out[0].bounds, BoundingBox::new(20.0, 105.0, 420.0, 100.0));
    }

    #[test]
    fn test_never_upscales_small_shapes() {
        let out = distribute(&squares(2, 3.0), landscape(), &DistributeOptions::default());
        assert_eq!(out[0].bounds.width, 3.0);
        assert_eq!(out[0].bounds.height, 3.0);
    }

    #[test]
    fn test_explicit_columns() {
        let options = DistributeOptions::default().with_columns(3);
        let out = distribute(&squares(3, 100.0), landscape(), &options);
        let ys: Vec<f64> = out.iter().map(|s| s.bounds.y).collect();
        assert_eq!(ys, vec![250.0, 250.0, 250.0]);
        assert!(out[0].bounds.x < out[1].bounds.x && out[1].bounds.x < out[2].bounds.x);
    }

    #[test]
    fn test_idempotent_when_nothing_shrinks() {
        let options = DistributeOptions::default();
        let once = distribute(&squares(5, 120.0), landscape(), &options);
        let twice = distribute(&once, landscape(), &options);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_coverage_no_overlap() {
        let papers = [landscape(), Paper::new(600.0, 900.0)];
        for paper in papers {
            for n in 1..=24 {
                let out = distribute(&squares(n, 400.0), paper, &DistributeOptions::default());
                assert_eq!(out.len(), n);
                for (i, a) in out.iter().enumerate() {
                    assert!(a.bounds.is_within(&paper.bounds()), "n={n} shape {i} out of paper");
                    for b in out.iter().skip(i + 1) {
                        assert!(!a.bounds.overlaps(&b.bounds), "n={n} {} overlaps {}", a.id, b.id);
                    }
                }
            }
        }
    }

    #[test]
    fn test_crowded_grid_stays_on_paper() {
        let out = distribute(&squares(2000, 50.0), landscape(), &DistributeOptions::default());
        assert!(out.iter().all(|s| s.bounds.is_within(&landscape().bounds())));
    }

    #[test]
    fn test_empty_input() {
        assert!(distribute(&[], landscape(), &DistributeOptions::default()).is_empty());
    }
}
