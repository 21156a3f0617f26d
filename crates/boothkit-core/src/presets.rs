//! Hand-tuned starting layouts for a new template.

use crate::geometry::BoundingBox;
use crate::paper::Orientation;
use crate::shapes::{DEFAULT_PLACEHOLDER_COLOR, Shape};
use thiserror::Error;

/// Preset errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresetError {
    #[error("No preset layout for {0} pictures (expected 1 to 4)")]
    UnsupportedCount(usize),
}

/// Label shown on every preset picture until the user renames it.
pub const PRESET_LABEL: &str = "Guest One";

/// Picture counts that have a preset.
pub const PRESET_COUNTS: std::ops::RangeInclusive<usize> = 1..=4;

// (x, y, width, height) on the 900x600 landscape paper.
const LANDSCAPE_1: &[(f64, f64, f64, f64)] = &[(95.0, 37.0, 710.0, 526.0)];
const LANDSCAPE_2: &[(f64, f64, f64, f64)] =
    &[(20.0, 144.0, 420.0, 311.0), (460.0, 144.0, 420.0, 311.0)];
const LANDSCAPE_3: &[(f64, f64, f64, f64)] = &[
    (20.0, 202.0, 273.0, 197.0),
    (314.0, 202.0, 273.0, 197.0),
    (607.0, 202.0, 273.0, 197.0),
];
const LANDSCAPE_4: &[(f64, f64, f64, f64)] = &[
    (20.0, 375.0, 273.0, 197.0),
    (313.0, 375.0, 273.0, 197.0),
    (607.0, 375.0, 273.0, 197.0),
    (420.0, 28.0, 458.0, 330.0),
];

/// Default picture boxes for `count` pictures on a paper of `orientation`.
///
/// Portrait layouts mirror the landscape ones across the diagonal, matching
/// the transposed paper. Ids are `pic-1`, `pic-2`, ... in order.
pub fn initial_pictures(count: usize, orientation: Orientation) -> Result<Vec<Shape>, PresetError> {
    let boxes = match count {
        1 => LANDSCAPE_1,
        2 => LANDSCAPE_2,
        3 => LANDSCAPE_3,
        4 => LANDSCAPE_4,
        n => return Err(PresetError::UnsupportedCount(n)),
    };

    Ok(boxes
        .iter()
        .enumerate()
        .map(|(i, &(x, y, w, h))| {
            let bounds = match orientation {
                Orientation::Landscape => BoundingBox::new(x, y, w, h),
                Orientation::Portrait => BoundingBox::new(y, x, h, w),
            };
            Shape::placeholder(format!("pic-{}", i + 1), bounds, DEFAULT_PLACEHOLDER_COLOR)
                .with_label(PRESET_LABEL)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paper::paper_dimensions;
    use std::collections::HashSet;

    #[test]
    fn test_counts() {
        for orientation in [Orientation::Portrait, Orientation::Landscape] {
            for count in PRESET_COUNTS {
                assert_eq!(initial_pictures(count, orientation).unwrap().len(), count);
            }
        }
        assert_eq!(
            initial_pictures(0, Orientation::Landscape),
            Err(PresetError::UnsupportedCount(0))
        );
        assert!(initial_pictures(5, Orientation::Portrait).is_err());
    }

    #[test]
    fn test_presets_fit_paper_without_overlap() {
        for orientation in [Orientation::Portrait, Orientation::Landscape] {
            let paper = paper_dimensions(orientation).bounds();
            for count in PRESET_COUNTS {
                let shapes = initial_pictures(count, orientation).unwrap();
                let ids: HashSet<_> = shapes.iter().map(|s| s.id.clone()).collect();
                assert_eq!(ids.len(), count);
                for (i, a) in shapes.iter().enumerate() {
                    assert!(a.bounds.is_within(&paper), "{orientation} {count}: {} off paper", a.id);
                    for b in &shapes[i + 1..] {
                        assert!(!a.bounds.overlaps(&b.bounds));
                    }
                }
            }
        }
    }

    #[test]
    fn test_landscape_four() {
        let shapes = initial_pictures(4, Orientation::Landscape).unwrap();
        assert_eq!(shapes[3].bounds, BoundingBox::new(420.0, 28.0, 458.0, 330.0));
        assert_eq!(shapes[0].id, "pic-1");
        assert!(shapes.iter().all(|s| s.label.as_deref() == Some(PRESET_LABEL)));
    }

    #[test]
    fn test_portrait_is_transposed() {
        let shapes = initial_pictures(1, Orientation::Portrait).unwrap();
        assert_eq!(shapes[0].bounds, BoundingBox::new(37.0, 95.0, 526.0, 710.0));
    }
}
