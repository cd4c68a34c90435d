//! Connected-region extraction on binary masks.
//!
//! Foreground is 8-connected. Only regions whose outer border is not nested
//! inside a hole of another region are reported; such a nested region is
//! covered by the enclosing region's box anyway.

use crate::geometry::Rect;
use crate::util::{IdiffError, IdiffResult};
use crate::ImageView;
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType, Contour};

/// Bounding boxes of the outermost connected non-zero regions of `mask`.
///
/// Boxes are ordered by the raster position of each region's first pixel.
pub fn external_bounding_boxes(mask: ImageView<'_, u8>) -> IdiffResult<Vec<Rect>> {
    let gray = to_gray_image(mask)?;
    let contours: Vec<Contour<u32>> = find_contours(&gray);
    Ok(contours
        .iter()
        .filter(|contour| contour.border_type == BorderType::Outer && contour.parent.is_none())
        .filter_map(contour_bounds)
        .collect())
}

fn to_gray_image(mask: ImageView<'_, u8>) -> IdiffResult<GrayImage> {
    let (width, height) = (mask.width(), mask.height());
    let invalid = || IdiffError::InvalidDimensions { width, height };
    let w = u32::try_from(width).map_err(|_| invalid())?;
    let h = u32::try_from(height).map_err(|_| invalid())?;

    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        let row = mask.row(y).ok_or(IdiffError::BufferTooSmall {
            needed: (y + 1) * mask.stride(),
            got: mask.as_slice().len(),
        })?;
        data.extend_from_slice(row);
    }
    GrayImage::from_raw(w, h, data).ok_or_else(invalid)
}

fn contour_bounds(contour: &Contour<u32>) -> Option<Rect> {
    let first = contour.points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for point in &contour.points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }
    Some(Rect::new(
        min_x as usize,
        min_y as usize,
        (max_x - min_x) as usize + 1,
        (max_y - min_y) as usize + 1,
    ))
}

#[cfg(test)]
mod tests {
    use super::external_bounding_boxes;
    use crate::geometry::Rect;
    use crate::ImageView;

    fn mask_from(rows: &[&str]) -> (Vec<u8>, usize, usize) {
        let width = rows[0].len();
        let data = rows
            .iter()
            .flat_map(|row| row.bytes().map(|b| if b == b'#' { 255 } else { 0 }))
            .collect();
        (data, width, rows.len())
    }

    #[test]
    fn empty_mask_has_no_regions() {
        let data = vec![0u8; 36];
        let view = ImageView::from_slice(&data, 6, 6).unwrap();
        assert!(external_bounding_boxes(view).unwrap().is_empty());
    }

    #[test]
    fn diagonal_pixels_are_connected() {
        let (data, w, h) = mask_from(&[
            "#.....", //
            ".#....", //
            "..#..#", //
            ".....#", //
        ]);
        let view = ImageView::from_slice(&data, w, h).unwrap();
        assert_eq!(
            external_bounding_boxes(view).unwrap(),
            vec![Rect::new(0, 0, 3, 3), Rect::new(5, 2, 1, 2)]
        );
    }

    #[test]
    fn regions_inside_holes_are_not_reported() {
        let (data, w, h) = mask_from(&[
            "........", //
            ".######.", //
            ".#....#.", //
            ".#.##.#.", //
            ".#....#.", //
            ".######.", //
            "........", //
            "##......", //
        ]);
        let view = ImageView::from_slice(&data, w, h).unwrap();
        assert_eq!(
            external_bounding_boxes(view).unwrap(),
            vec![Rect::new(1, 1, 6, 5), Rect::new(0, 7, 2, 1)]
        );
    }

    #[test]
    fn region_touching_border_is_external() {
        let (data, w, h) = mask_from(&[
            "###", //
            "#.#", //
            "###", //
        ]);
        let view = ImageView::from_slice(&data, w, h).unwrap();
        assert_eq!(external_bounding_boxes(view).unwrap(), vec![Rect::new(0, 0, 3, 3)]);
    }

    #[test]
    fn adjacent_regions_on_one_row_are_both_reported() {
        let (data, w, h) = mask_from(&[
            "##..##.", //
            "##..##.", //
            ".......", //
            "...#...", //
        ]);
        let view = ImageView::from_slice(&data, w, h).unwrap();
        assert_eq!(
            external_bounding_boxes(view).unwrap(),
            vec![
                Rect::new(0, 0, 2, 2),
                Rect::new(4, 0, 2, 2),
                Rect::new(3, 3, 1, 1)
            ]
        );
    }

    #[test]
    fn strided_view_ignores_row_padding() {
        let data = [0u8, 255, 9, 9, 255, 255, 9, 9];
        let view = ImageView::new(&data, 2, 2, 4).unwrap();
        assert_eq!(
            external_bounding_boxes(view).unwrap(),
            vec![Rect::new(0, 0, 2, 2)]
        );
    }
}
