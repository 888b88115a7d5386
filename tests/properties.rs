use vgtess::math::dist_pt_seg;
use vgtess::path_cache::poly_area;
use vgtess::vcgen_fill::{fill_vertex_count, fringe_vertex_count};
use vgtess::vcgen_stroke::stroke_vertex_count;
use vgtess::{
    CreateFlags, LineCap, LineJoin, PathCache, PathCommand, RecordingRenderer, RenderCall,
    RenderSession, TransAffine, Winding, MAX_STATES,
};

const TESS_TOL: f32 = 0.25;
const DIST_TOL: f32 = 0.01;

fn polygon(pts: &[(f32, f32)], winding: Option<Winding>) -> Vec<PathCommand> {
    let mut cmds = vec![PathCommand::MoveTo {
        x: pts[0].0,
        y: pts[0].1,
    }];
    cmds.extend(pts[1..].iter().map(|&(x, y)| PathCommand::LineTo { x, y }));
    cmds.push(PathCommand::Close);
    if let Some(w) = winding {
        cmds.push(PathCommand::Winding(w));
    }
    cmds
}

fn regular(n: usize, r: f32) -> Vec<(f32, f32)> {
    (0..n)
        .map(|i| {
            let a = i as f32 * std::f32::consts::TAU / n as f32;
            (50.0 + r * a.cos(), 50.0 + r * a.sin())
        })
        .collect()
}

fn flattened(cmds: &[PathCommand]) -> PathCache {
    let mut cache = PathCache::new();
    cache.flatten(cmds, TESS_TOL, DIST_TOL);
    cache
}

/// Largest distance from sampled curve points to the flattened polyline.
fn max_deviation(curve: &[f32; 8], tess_tol: f32) -> f32 {
    let [x0, y0, c1x, c1y, c2x, c2y, x1, y1] = *curve;
    let cmds = [
        PathCommand::MoveTo { x: x0, y: y0 },
        PathCommand::BezierTo {
            c1x,
            c1y,
            c2x,
            c2y,
            x: x1,
            y: y1,
        },
    ];
    let mut cache = PathCache::new();
    cache.flatten(&cmds, tess_tol, DIST_TOL);
    let pts = cache.path_points(&cache.paths()[0]).to_vec();

    let mut worst = 0.0f32;
    for i in 0..=200 {
        let t = i as f32 / 200.0;
        let it = 1.0 - t;
        let bx = it * it * it * x0 + 3.0 * it * it * t * c1x + 3.0 * it * t * t * c2x + t * t * t * x1;
        let by = it * it * it * y0 + 3.0 * it * it * t * c1y + 3.0 * it * t * t * c2y + t * t * t * y1;
        let d = pts
            .windows(2)
            .map(|s| dist_pt_seg(bx, by, s[0].x, s[0].y, s[1].x, s[1].y))
            .fold(f32::MAX, f32::min)
            .sqrt();
        worst = worst.max(d);
    }
    worst
}

#[test]
fn flattening_converges_with_tolerance() {
    let curve = [0.0, 0.0, 30.0, 120.0, 90.0, -60.0, 120.0, 40.0];
    let coarse = max_deviation(&curve, 4.0);
    let fine = max_deviation(&curve, 0.01);
    assert!(fine <= coarse);
    assert!(fine < 0.5, "fine deviation {}", fine);
}

#[test]
fn solid_winding_is_orientation_independent() {
    let ccw = regular(6, 30.0);
    let mut cw = ccw.clone();
    cw.reverse();

    let a = flattened(&polygon(&ccw, None));
    let b = flattened(&polygon(&cw, None));
    let area_a = poly_area(a.path_points(&a.paths()[0]));
    let area_b = poly_area(b.path_points(&b.paths()[0]));
    assert!(area_a > 0.0 && area_b > 0.0);

    // Enforcing again on already enforced points keeps the order.
    let again: Vec<_> = b
        .path_points(&b.paths()[0])
        .iter()
        .map(|p| (p.x, p.y))
        .collect();
    let c = flattened(&polygon(&again, None));
    let order: Vec<_> = c
        .path_points(&c.paths()[0])
        .iter()
        .map(|p| (p.x, p.y))
        .collect();
    assert_eq!(order, again);

    let hole = flattened(&polygon(&ccw, Some(Winding::Hole)));
    assert!(poly_area(hole.path_points(&hole.paths()[0])) < 0.0);
}

#[test]
fn regular_polygons_are_convex_and_stars_are_not() {
    for n in 3..=12 {
        let mut pts = regular(n, 30.0);
        pts.reverse();
        let mut cache = flattened(&polygon(&pts, None));
        cache.expand_fill(1.0, LineJoin::Miter, 2.4, 1.0);
        assert!(cache.paths()[0].convex, "{}-gon not convex", n);

        // Pull one vertex through the centre so it turns the other way.
        pts[0] = (50.0 - (pts[0].0 - 50.0) * 0.3, 50.0 - (pts[0].1 - 50.0) * 0.3);
        if n > 3 {
            let mut cache = flattened(&polygon(&pts, None));
            cache.expand_fill(1.0, LineJoin::Miter, 2.4, 1.0);
            assert!(!cache.paths()[0].convex, "dented {}-gon convex", n);
        }
    }
}

#[test]
fn closing_point_collapses_onto_first() {
    let pts = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.001)];
    let mut cmds = vec![PathCommand::MoveTo { x: 0.0, y: 0.0 }];
    cmds.extend(pts[1..].iter().map(|&(x, y)| PathCommand::LineTo { x, y }));
    let cache = flattened(&cmds);
    let path = &cache.paths()[0];
    assert_eq!(path.count, 4);
    assert!(path.closed);
}

#[test]
fn vertex_budget_matches_for_all_styles() {
    let shapes = [
        polygon(&[(0.0, 0.0), (40.0, 5.0), (10.0, 30.0), (60.0, 60.0), (0.0, 70.0)], None),
        vec![
            PathCommand::MoveTo { x: 0.0, y: 0.0 },
            PathCommand::LineTo { x: 30.0, y: 0.0 },
            PathCommand::LineTo { x: 0.0, y: 1.0 },
            PathCommand::BezierTo {
                c1x: 10.0,
                c1y: 40.0,
                c2x: 40.0,
                c2y: 40.0,
                x: 50.0,
                y: 5.0,
            },
        ],
    ];
    let caps = [LineCap::Butt, LineCap::Round, LineCap::Square];
    let joins = [LineJoin::Miter, LineJoin::Round, LineJoin::Bevel];
    for cmds in &shapes {
        for &cap in &caps {
            for &join in &joins {
                for &w in &[0.5f32, 3.0, 12.0] {
                    let mut cache = flattened(cmds);
                    cache.expand_stroke(w, cap, join, 4.0, 1.0, TESS_TOL);
                    let n_cap = vgtess::math::curve_divs(w, std::f32::consts::PI, TESS_TOL);
                    for path in cache.paths() {
                        let pts = cache.path_points(path);
                        assert_eq!(path.stroke.len(), stroke_vertex_count(path, pts, cap, join, n_cap));
                    }
                }
            }
        }
        for &aa in &[0.0f32, 1.0] {
            let mut cache = flattened(cmds);
            cache.expand_fill(aa, LineJoin::Miter, 2.4, 1.0);
            for path in cache.paths() {
                let pts = cache.path_points(path);
                assert_eq!(path.fill.len(), fill_vertex_count(path, pts, aa > 0.0));
                assert_eq!(path.fringe.len(), fringe_vertex_count(path, pts, aa > 0.0));
            }
        }
    }
}

#[test]
fn unknown_tags_are_skipped() {
    let mut vg = RenderSession::new(RecordingRenderer::new(), CreateFlags::ANTIALIAS);
    vg.begin_frame(10.0, 10.0, 1.0);
    vg.begin_path();
    vg.append_raw(&[0.0, 1.0, 2.0, 9.0, 1.0, 5.0, 6.0]);
    assert_eq!(
        vg.path_storage().commands(),
        &[
            PathCommand::MoveTo { x: 1.0, y: 2.0 },
            PathCommand::LineTo { x: 5.0, y: 6.0 },
        ]
    );
}

#[test]
fn state_stack_is_bounded() {
    let mut vg = RenderSession::new(RecordingRenderer::new(), CreateFlags::ANTIALIAS);
    vg.begin_frame(10.0, 10.0, 1.0);
    for _ in 0..40 {
        vg.save();
    }
    assert_eq!(vg.state_depth(), MAX_STATES);
    for _ in 0..40 {
        vg.restore();
    }
    assert_eq!(vg.state_depth(), 1);
}

#[test]
fn thin_strokes_fade_by_coverage_squared() {
    let mut vg = RenderSession::new(RecordingRenderer::new(), CreateFlags::ANTIALIAS);
    vg.begin_frame(10.0, 10.0, 1.0);
    vg.set_global_alpha(0.5);
    vg.set_stroke_width(0.25);
    vg.begin_path();
    vg.move_to(0.0, 0.0);
    vg.line_to(5.0, 5.0);
    vg.stroke();
    match &vg.renderer().calls()[0] {
        RenderCall::Stroke {
            paint, stroke_width, ..
        } => {
            assert_eq!(*stroke_width, 1.0);
            assert!((paint.inner_color.a - 0.25 * 0.25 * 0.5).abs() < 1e-6);
            assert!((paint.outer_color.a - 0.25 * 0.25 * 0.5).abs() < 1e-6);
        }
        other => panic!("unexpected call {:?}", other),
    }
}

#[test]
fn safe_inverse_policy() {
    let singular = TransAffine::new_scaling(0.0, 3.0);
    assert!(singular.inverse().is_none());
    assert_eq!(singular.safe_inverse(), TransAffine::new());

    let mut m = TransAffine::new_rotation(0.7);
    m.multiply(&TransAffine::new_translation(3.0, -2.0));
    m.multiply(&TransAffine::new_scaling(2.0, 0.5));
    let mut round_trip = m;
    round_trip.multiply(&m.safe_inverse());
    assert!(round_trip.is_identity(1e-4));
}
