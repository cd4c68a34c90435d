use idiff::{DifferenceSearch, Finder, Match, MatchContext, Raster, Rect, Roi, ScalarOps};

const W: usize = 60;
const H: usize = 50;

fn background() -> Vec<u8> {
    (0..W * H).map(|i| (i % 7) as u8 * 20).collect()
}

/// Flips a one-pixel outline of `rect` to a distinct value.
fn draw_outline(data: &mut [u8], rect: Rect) {
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            let edge = y == rect.y || y + 1 == rect.bottom() || x == rect.x || x + 1 == rect.right();
            if edge {
                data[y * W + x] = 255;
            }
        }
    }
}

fn diff_context(changes: &[Rect]) -> idiff::MatchContextBuilder {
    let first = background();
    let mut second = first.clone();
    for rect in changes {
        draw_outline(&mut second, *rect);
    }
    MatchContext::builder()
        .diff()
        .source(Raster::gray(first, W, H).unwrap())
        .target(Raster::gray(second, W, H).unwrap())
}

fn run(ctx: &MatchContext) -> Vec<Match> {
    let ops = ScalarOps::new();
    DifferenceSearch::new(&ops).find(ctx).unwrap()
}

#[test]
fn identical_images_have_no_differences() {
    let data: Vec<u8> = (0..50 * 50).map(|i| (i * 31 % 256) as u8).collect();
    let mut ctx = MatchContext::builder()
        .diff()
        .source(Raster::gray(data.clone(), 50, 50).unwrap())
        .target(Raster::gray(data, 50, 50).unwrap())
        .build();
    assert!(Finder::new().find(&mut ctx).unwrap().is_empty());
    assert!(ctx.matches().is_empty());
}

#[test]
fn outline_region_scores_its_density() {
    let ctx = diff_context(&[Rect::new(10, 10, 10, 10)]).build();
    let matches = run(&ctx);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].rect(), Rect::new(10, 10, 10, 10));
    assert!((matches[0].score() - 0.36).abs() < 1e-12);
}

#[test]
fn regions_small_on_both_axes_are_ignored() {
    let ctx = diff_context(&[Rect::new(2, 2, 4, 4), Rect::new(20, 2, 4, 9)]).build();
    let matches = run(&ctx);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].rect(), Rect::new(20, 2, 4, 9));
    for m in &matches {
        assert!(m.width() >= 5 || m.height() >= 5);
    }
}

#[test]
fn scores_must_be_strictly_below_similarity() {
    let ctx = diff_context(&[Rect::new(10, 10, 10, 10)])
        .match_similarity(0.36)
        .build();
    assert!(run(&ctx).is_empty());

    let ctx = diff_context(&[Rect::new(10, 10, 10, 10)])
        .match_similarity(0.37)
        .build();
    assert_eq!(run(&ctx).len(), 1);
}

#[test]
fn roi_overlap_on_the_boundary_is_included() {
    let ctx = diff_context(&[Rect::new(10, 10, 10, 10)])
        .roi(Roi::new(19, 19, 5, 5).unwrap())
        .build();
    assert_eq!(run(&ctx).len(), 1);
}

#[test]
fn region_outside_every_roi_is_excluded() {
    let ctx = diff_context(&[Rect::new(10, 10, 10, 10)])
        .roi(Roi::new(20, 20, 5, 5).unwrap())
        .roi(Roi::new(0, 30, 60, 20).unwrap())
        .build();
    assert!(run(&ctx).is_empty());
}

#[test]
fn roi_at_the_end_of_the_address_range_matches_nothing() {
    let ctx = diff_context(&[Rect::new(10, 10, 10, 10)])
        .roi(Roi::new(usize::MAX - 10, usize::MAX - 10, 10, 10).unwrap())
        .build();
    assert!(run(&ctx).is_empty());
}

#[test]
fn limit_keeps_the_first_regions_in_scan_order() {
    let changes = [
        Rect::new(40, 30, 8, 8),
        Rect::new(2, 2, 8, 8),
        Rect::new(30, 2, 8, 8),
    ];
    let ctx = diff_context(&changes).limit(2).build();
    let matches = run(&ctx);
    assert_eq!(
        matches.iter().map(Match::rect).collect::<Vec<_>>(),
        vec![Rect::new(2, 2, 8, 8), Rect::new(30, 2, 8, 8)]
    );
}

#[test]
fn nested_outlines_report_only_the_outer_region() {
    let ctx = diff_context(&[Rect::new(5, 5, 20, 20), Rect::new(10, 10, 8, 8)]).build();
    let matches = run(&ctx);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].rect(), Rect::new(5, 5, 20, 20));
    let expected = (76.0 + 28.0) / 400.0;
    assert!((matches[0].score() - expected).abs() < 1e-12);
}

#[test]
fn finder_rejects_mismatched_sizes() {
    let mut ctx = MatchContext::builder()
        .diff()
        .source(Raster::gray(vec![0; 100], 10, 10).unwrap())
        .target(Raster::gray(vec![0; 110], 10, 11).unwrap())
        .build();
    assert!(Finder::new().find(&mut ctx).is_err());
}
