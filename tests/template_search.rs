use idiff::{
    parse_rois, validate, Finder, MatchContext, Raster, Rect, Roi, ScalarOps, TemplateMatchMethod,
    TemplateSearch,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIZE: usize = 100;
const TPL: usize = 10;

fn noise_patch(seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..TPL * TPL).map(|_| rng.random::<u8>()).collect()
}

fn place(canvas: &mut [u8], width: usize, patch: &[u8], pw: usize, x0: usize, y0: usize) {
    for (idx, &value) in patch.iter().enumerate() {
        let (x, y) = (idx % pw, idx / pw);
        canvas[(y0 + y) * width + x0 + x] = value;
    }
}

/// 100x100 black source holding the same 10x10 noise patch at (5,5) and (80,80).
fn two_patch_scene() -> (Raster, Raster) {
    let patch = noise_patch(17);
    let mut source = vec![0u8; SIZE * SIZE];
    place(&mut source, SIZE, &patch, TPL, 5, 5);
    place(&mut source, SIZE, &patch, TPL, 80, 80);
    (
        Raster::gray(source, SIZE, SIZE).unwrap(),
        Raster::gray(patch, TPL, TPL).unwrap(),
    )
}

fn context(method: TemplateMatchMethod, similarity: f64, limit: usize) -> MatchContext {
    let (source, template) = two_patch_scene();
    MatchContext::builder()
        .find()
        .source(source)
        .target(template)
        .match_method(method)
        .match_similarity(similarity)
        .limit(limit)
        .build()
}

fn rects(matches: &[idiff::Match]) -> Vec<Rect> {
    let mut out: Vec<Rect> = matches.iter().map(|m| m.rect()).collect();
    out.sort_by_key(|r| (r.y, r.x));
    out
}

#[test]
fn two_identical_patches_yield_two_matches() {
    let mut ctx = context(TemplateMatchMethod::CcoeffNormed, 0.5, 10);
    let matches = Finder::new().find(&mut ctx).unwrap();

    assert_eq!(
        rects(&matches),
        vec![Rect::new(5, 5, 10, 10), Rect::new(80, 80, 10, 10)]
    );
    for m in &matches {
        assert!(m.score() > 0.99, "{m}");
    }
    assert_eq!(ctx.matches(), matches.as_slice());
}

#[test]
fn every_method_finds_both_patches() {
    for method in TemplateMatchMethod::ALL {
        let ctx = context(method, 0.9, 10);
        let ops = ScalarOps::new();
        let matches = TemplateSearch::new(&ops).find(&ctx).unwrap();
        assert!(matches.len() >= 2, "{method}");
        assert_eq!(
            rects(&matches[..2]),
            vec![Rect::new(5, 5, 10, 10), Rect::new(80, 80, 10, 10)],
            "{method}"
        );
    }
}

#[test]
fn limit_caps_result_count() {
    let mut ctx = context(TemplateMatchMethod::CcoeffNormed, 0.5, 1);
    let matches = Finder::new().find(&mut ctx).unwrap();
    assert_eq!(matches.len(), 1);
}

#[test]
fn scores_stay_strictly_above_threshold() {
    for similarity in [0.05, 0.2, 0.5, 0.95] {
        let ctx = context(TemplateMatchMethod::CcoeffNormed, similarity, 50);
        let ops = ScalarOps::new();
        let matches = TemplateSearch::new(&ops).find(&ctx).unwrap();
        assert!(matches.len() <= 50);
        for m in &matches {
            assert!(m.score() > similarity, "{m} at {similarity}");
            assert_eq!((m.width(), m.height()), (TPL, TPL));
        }
    }
}

#[test]
fn matches_never_repeat_a_rectangle() {
    let ctx = context(TemplateMatchMethod::CcorrNormed, 0.05, 200);
    let ops = ScalarOps::new();
    let matches = TemplateSearch::new(&ops).find(&ctx).unwrap();
    for (idx, m) in matches.iter().enumerate() {
        assert!(!matches[idx + 1..].contains(m), "{m} repeated");
    }
}

#[test]
fn source_smaller_than_template_is_empty_not_error() {
    let ctx = MatchContext::builder()
        .find()
        .source(Raster::gray(vec![0; 9 * 30], 9, 30).unwrap())
        .target(Raster::gray(noise_patch(3), TPL, TPL).unwrap())
        .build();
    let ops = ScalarOps::new();
    assert!(TemplateSearch::new(&ops).find(&ctx).unwrap().is_empty());
}

#[test]
fn rois_restrict_the_search() {
    let (source, template) = two_patch_scene();
    let ctx = MatchContext::builder()
        .find()
        .source(source)
        .target(template)
        .match_similarity(0.5)
        .roi(Roi::new(70, 70, 30, 30).unwrap())
        .roi(Roi::new(0, 0, 8, 100).unwrap())
        .build();
    let ops = ScalarOps::new();
    let matches = TemplateSearch::new(&ops).find(&ctx).unwrap();
    assert_eq!(rects(&matches), vec![Rect::new(80, 80, 10, 10)]);
}

#[test]
fn roi_partly_outside_the_source_is_clipped() {
    let (source, template) = two_patch_scene();
    let ctx = MatchContext::builder()
        .find()
        .source(source)
        .target(template)
        .match_similarity(0.5)
        .roi(Roi::new(75, 75, 200, 200).unwrap())
        .build();
    let ops = ScalarOps::new();
    let matches = TemplateSearch::new(&ops).find(&ctx).unwrap();
    assert_eq!(rects(&matches), vec![Rect::new(80, 80, 10, 10)]);
}

#[test]
fn roi_at_the_end_of_the_address_range_is_searched_safely() {
    let (source, template) = two_patch_scene();
    let ctx = MatchContext::builder()
        .find()
        .source(source)
        .target(template)
        .match_method(TemplateMatchMethod::CcoeffNormed)
        .match_similarity(0.5)
        .roi(Roi::new(usize::MAX - 10, 0, 10, 10).unwrap())
        .roi(Roi::new(0, usize::MAX - 10, 10, 10).unwrap())
        .roi(Roi::new(0, 0, 20, 20).unwrap())
        .build();
    assert!(validate(&ctx).is_empty());

    let ops = ScalarOps::new();
    let matches = TemplateSearch::new(&ops).find(&ctx).unwrap();
    assert_eq!(rects(&matches), vec![Rect::new(5, 5, 10, 10)]);
}

#[test]
fn roi_overflowing_the_address_range_is_rejected() {
    assert!(Roi::new(usize::MAX - 2, 0, 10, 10).is_err());
    assert!(parse_rois("18446744073709551613,0,10,10").is_err());
}

#[test]
fn color_source_matches_like_gray() {
    let (source, template) = two_patch_scene();
    let rgb: Vec<u8> = source.data().iter().flat_map(|&v| [v, v, v]).collect();
    let gray_ctx = context(TemplateMatchMethod::CcoeffNormed, 0.5, 10);
    let rgb_ctx = MatchContext::builder()
        .find()
        .source(Raster::rgb(rgb, SIZE, SIZE).unwrap())
        .target(template)
        .match_similarity(0.5)
        .limit(10)
        .build();
    let ops = ScalarOps::new();
    let search = TemplateSearch::new(&ops);
    assert_eq!(
        search.find(&gray_ctx).unwrap(),
        search.find(&rgb_ctx).unwrap()
    );
}

#[test]
fn repeated_searches_are_identical() {
    let ctx = context(TemplateMatchMethod::SqdiffNormed, 0.8, 10);
    let ops = ScalarOps::new();
    let search = TemplateSearch::new(&ops);
    let first = search.find(&ctx).unwrap();
    let second = search.find(&ctx).unwrap();
    assert_eq!(first, second);
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.score().to_bits(), b.score().to_bits());
    }
}

#[test]
fn finder_accumulates_across_runs() {
    let mut ctx = context(TemplateMatchMethod::CcoeffNormed, 0.5, 10);
    let finder = Finder::new();
    let first = finder.find(&mut ctx).unwrap();
    finder.find(&mut ctx).unwrap();
    assert_eq!(ctx.matches().len(), first.len() * 2);
}
