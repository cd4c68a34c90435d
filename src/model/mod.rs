//! Match values and correlation method descriptors.

mod method;

pub use method::{Polarity, TemplateMatchMethod};

use crate::geometry::Rect;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A scored rectangle produced by either search engine.
///
/// Equality and hashing consider only the rectangle; two matches at the same
/// place with different scores compare equal. The template search relies on
/// this to detect a surface that keeps yielding the same location.
#[derive(Clone, Copy, Debug)]
pub struct Match {
    score: f64,
    rect: Rect,
}

impl Match {
    pub fn new(score: f64, x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            score,
            rect: Rect::new(x, y, width, height),
        }
    }

    pub fn from_rect(score: f64, rect: Rect) -> Self {
        Self { score, rect }
    }

    pub fn score(&self) -> f64 {
        self.score
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

    /// Returns true if `(x, y)` falls inside the match rectangle.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.rect.contains(x, y)
    }

    /// Score as a whole percentage, truncated toward zero.
    pub fn percent(&self) -> i64 {
        (self.score * 100.0) as i64
    }
}

impl PartialEq for Match {
    fn eq(&self, other: &Self) -> bool {
        self.rect == other.rect
    }
}

impl Eq for Match {}

impl Hash for Match {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rect.hash(state);
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "score={}%, {}", self.percent(), self.rect)
    }
}

#[cfg(test)]
mod tests {
    use super::Match;
    use std::collections::HashSet;

    #[test]
    fn equality_ignores_score() {
        let a = Match::new(0.9, 1, 2, 3, 4);
        let b = Match::new(0.1, 1, 2, 3, 4);
        let c = Match::new(0.9, 1, 2, 3, 5);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Match> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_truncates_percentage() {
        let m = Match::new(0.876, 5, 6, 10, 12);
        assert_eq!(m.to_string(), "score=87%, [x=5, y=6, width=10, height=12]");
    }

    #[test]
    fn contains_uses_half_open_bounds() {
        let m = Match::new(1.0, 10, 10, 5, 5);
        assert!(m.contains(10, 10));
        assert!(m.contains(14, 14));
        assert!(!m.contains(15, 10));
        assert!(!m.contains(9, 12));
    }
}
