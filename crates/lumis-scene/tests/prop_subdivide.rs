use lumis_scene::{AREA_TOLERANCE, Model, Patch, Vec3};
use proptest::prelude::*;

fn arb_quad() -> impl Strategy<Value = [Vec3; 4]> {
    // Planar parallelograms spanned by two non-parallel edges, placed anywhere.
    (
        -5.0f32..5.0,
        -5.0f32..5.0,
        -5.0f32..5.0,
        0.1f32..4.0,
        0.1f32..4.0,
        -1.0f32..1.0,
    )
        .prop_map(|(x, y, z, w, h, skew)| {
            let a = Vec3::new(x, y, z);
            let u = Vec3::new(w, 0.0, 0.0);
            let v = Vec3::new(skew, 0.0, h);
            [a, a + u, a + u + v, a + v]
        })
}

proptest! {
    #[test]
    fn subdivision_bounds_area_and_preserves_total(
        quad in arb_quad(),
        max_area in 0.05f32..2.0,
    ) {
        let mut model = Model::quad("q", quad, Vec3::ONE, 0.5);
        let before = model.total_area();
        model.subdivide(max_area);
        let after = model.total_area();
        prop_assert!((after - before).abs() <= 1e-3 * before.max(1.0));
        for p in model.patches() {
            prop_assert!(p.area() <= max_area * (1.0 + AREA_TOLERANCE) + 1e-5);
        }
    }

    #[test]
    fn subdivision_leaves_eight_valid_links(
        quads in prop::collection::vec(arb_quad(), 1..4),
        max_area in 0.1f32..1.0,
    ) {
        let patches: Vec<Patch> = quads
            .into_iter()
            .map(|q| Patch::new(q, Vec3::ONE, 0.5))
            .collect();
        let mut model = Model::from_patches("many", patches);
        model.subdivide(max_area);
        let n = model.len() as u32;
        for p in model.patches() {
            prop_assert_eq!(p.neighbors().len(), 8);
            prop_assert!(p.neighbors().iter().all(|&k| k < n));
        }
    }
}
