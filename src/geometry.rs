//! Axis-aligned rectangles and regions of interest.
//!
//! Coordinates are pixel offsets from the top-left corner. A `Rect` may have
//! zero area (the result of intersecting disjoint rectangles); a `Roi` never
//! does.

use crate::util::{IdiffError, IdiffResult};
use std::fmt;
use std::str::FromStr;

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge, saturating at `usize::MAX`.
    pub fn right(&self) -> usize {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge, saturating at `usize::MAX`.
    pub fn bottom(&self) -> usize {
        self.y.saturating_add(self.height)
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns true if `(px, py)` lies in `[x, x + width) x [y, y + height)`.
    pub fn contains(&self, px: usize, py: usize) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Returns the overlap of two rectangles.
    ///
    /// Disjoint inputs yield a zero-area rectangle anchored at the clamped
    /// corner; width and height never underflow.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        Rect {
            x: x0,
            y: y0,
            width: x1.saturating_sub(x0),
            height: y1.saturating_sub(y0),
        }
    }

    /// Returns true if the two rectangles share at least one pixel.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !self.intersection(other).is_empty()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[x={}, y={}, width={}, height={}]",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Caller-supplied region restricting where a search looks.
///
/// Immutable once created; width and height are always positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Roi {
    rect: Rect,
}

impl Roi {
    /// Creates a region, rejecting zero width or height and edges that do
    /// not fit in `usize`.
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> IdiffResult<Self> {
        if width == 0 || height == 0 {
            return Err(IdiffError::InvalidDimensions { width, height });
        }
        if x.checked_add(width).is_none() || y.checked_add(height).is_none() {
            return Err(IdiffError::InvalidRoi {
                input: format!("{x},{y},{width},{height}"),
                reason: "region extends past the addressable range",
            });
        }
        Ok(Self {
            rect: Rect::new(x, y, width, height),
        })
    }

    pub fn x(&self) -> usize {
        self.rect.x
    }

    pub fn y(&self) -> usize {
        self.rect.y
    }

    pub fn width(&self) -> usize {
        self.rect.width
    }

    pub fn height(&self) -> usize {
        self.rect.height
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Returns the overlap with another region, possibly zero-area.
    pub fn intersection(&self, other: &Roi) -> Rect {
        self.rect.intersection(&other.rect)
    }
}

impl fmt::Display for Roi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.rect.x, self.rect.y, self.rect.width, self.rect.height
        )
    }
}

impl FromStr for Roi {
    type Err = IdiffError;

    /// Parses `"x,y,w,h"`; whitespace around the commas is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| IdiffError::InvalidRoi {
            input: s.to_string(),
            reason,
        };
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(invalid("expected four comma-separated integers"));
        }
        let mut values = [0usize; 4];
        for (slot, part) in values.iter_mut().zip(parts.iter()) {
            *slot = part
                .parse()
                .map_err(|_| invalid("values must be non-negative integers"))?;
        }
        let [x, y, width, height] = values;
        if width == 0 || height == 0 {
            return Err(invalid("width and height must be positive"));
        }
        Roi::new(x, y, width, height)
    }
}

/// Parses a `;`-separated list of regions, e.g. `"0,0,10,10; 20,20,5,5"`.
///
/// Empty input yields an empty list (unrestricted search).
pub fn parse_rois(s: &str) -> IdiffResult<Vec<Roi>> {
    s.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(Roi::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{parse_rois, Rect, Roi};

    #[test]
    fn intersection_of_overlapping_rects() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 6, 10, 10);
        assert_eq!(a.intersection(&b), Rect::new(5, 6, 5, 4));
        assert_eq!(b.intersection(&a), Rect::new(5, 6, 5, 4));
    }

    #[test]
    fn intersection_of_disjoint_rects_has_zero_area() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(10, 1, 2, 2);
        let inter = a.intersection(&b);
        assert!(inter.is_empty());
        assert_eq!(inter.width, 0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0, 0, 5, 5);
        let b = Rect::new(5, 0, 5, 5);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&Rect::new(4, 4, 1, 1)));
    }

    #[test]
    fn contains_is_inclusive_exclusive() {
        let r = Rect::new(2, 3, 4, 5);
        assert!(r.contains(2, 3));
        assert!(r.contains(5, 7));
        assert!(!r.contains(6, 3));
        assert!(!r.contains(2, 8));
        assert!(!r.contains(1, 3));
    }

    #[test]
    fn roi_rejects_zero_area() {
        assert!(Roi::new(0, 0, 0, 3).is_err());
        assert!(Roi::new(0, 0, 3, 0).is_err());
        assert!(Roi::new(1, 2, 3, 4).is_ok());
    }

    #[test]
    fn roi_rejects_edges_past_usize_max() {
        assert!(Roi::new(usize::MAX - 2, 0, 10, 10).is_err());
        assert!(Roi::new(0, usize::MAX, 1, 1).is_err());
        assert!(Roi::new(usize::MAX - 10, 0, 10, 1).is_ok());
        assert!("18446744073709551613,0,10,10".parse::<Roi>().is_err());
    }

    #[test]
    fn far_edges_saturate_instead_of_overflowing() {
        let far = Rect::new(usize::MAX - 2, 0, 10, 10);
        assert_eq!(far.right(), usize::MAX);
        assert!(far.contains(usize::MAX - 1, 3));
        let image = Rect::new(0, 0, 100, 100);
        assert!(far.intersection(&image).is_empty());
        assert!(!far.overlaps(&image));
    }

    #[test]
    fn parses_roi_list_with_whitespace() {
        let rois = parse_rois(" 247, 137 ,325,35 ; 1,2,3,4;").unwrap();
        assert_eq!(rois.len(), 2);
        assert_eq!(rois[0].rect(), Rect::new(247, 137, 325, 35));
        assert_eq!(rois[1].to_string(), "1,2,3,4");
        assert!(parse_rois("").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_roi_text() {
        assert!("1,2,3".parse::<Roi>().is_err());
        assert!("1,2,-3,4".parse::<Roi>().is_err());
        assert!("1,2,0,4".parse::<Roi>().is_err());
        assert!(parse_rois("1,2,3,4;a,b,c,d").is_err());
    }
}
