use crate::geometry::Rect;

/// Surface cells cleared around a located peak before the next lookup.
///
/// The margins are a third of the template size on each axis, spanning
/// `[x - mx, x + mx)` and `[y - my, y + my)`. The low edge saturates at zero
/// and the high edge is left for the caller to clip. The peak cell itself is
/// always covered, even for templates smaller than three pixels.
pub(crate) fn suppression_rect(
    x: usize,
    y: usize,
    template_width: usize,
    template_height: usize,
) -> Rect {
    let mx = template_width / 3;
    let my = template_height / 3;
    let x0 = x.saturating_sub(mx);
    let y0 = y.saturating_sub(my);
    let x1 = (x + mx).max(x + 1);
    let y1 = (y + my).max(y + 1);
    Rect::new(x0, y0, x1 - x0, y1 - y0)
}

#[cfg(test)]
mod tests {
    use super::suppression_rect;
    use crate::geometry::Rect;

    #[test]
    fn margins_are_a_third_of_the_template() {
        assert_eq!(suppression_rect(10, 20, 9, 6), Rect::new(7, 18, 6, 4));
    }

    #[test]
    fn low_edge_saturates() {
        assert_eq!(suppression_rect(1, 0, 10, 10), Rect::new(0, 0, 4, 3));
    }

    #[test]
    fn tiny_templates_still_cover_the_peak() {
        let rect = suppression_rect(4, 5, 2, 1);
        assert_eq!(rect, Rect::new(4, 5, 1, 1));
        assert!(rect.contains(4, 5));
    }
}
